//! 认证注入拦截器

use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

use super::RequestInterceptor;
use crate::logging::redact_token;
use crate::request::{RequestContext, RequestDescriptor};
use crate::storage::CredentialStore;

/// 授权头名称
pub const AUTHORIZATION: &str = "Authorization";

/// 读取当前访问令牌，存在时为请求设置 `Authorization: Bearer <token>`
///
/// 自身无状态；从不阻断请求，令牌缺失或存储不可用时原样放行。
#[derive(Debug, Clone)]
pub struct AuthInjector {
    store: Arc<CredentialStore>,
}

impl AuthInjector {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    fn current_token(&self) -> Option<String> {
        match self.store.get_access() {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!(error = %e, "读取访问令牌失败，以未认证方式继续");
                None
            }
        }
    }
}

impl RequestInterceptor for AuthInjector {
    fn intercept<'a>(&self, request: &'a RequestDescriptor) -> Cow<'a, RequestDescriptor> {
        if request.context().flag(RequestContext::SKIP_AUTH) {
            debug!(path = %request.path(), "请求标记为跳过认证");
            return Cow::Borrowed(request);
        }

        match self.current_token() {
            Some(token) => {
                debug!(
                    path = %request.path(),
                    token = %redact_token(&token),
                    "附加 Bearer 凭据"
                );
                Cow::Owned(request.with_header(AUTHORIZATION, format!("Bearer {token}")))
            }
            None => Cow::Borrowed(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{BuildOptions, Method, ParameterOptions, RequestBuilder};
    use crate::storage::MemoryStorage;
    use crate::testing::UnavailableStorage;

    fn request() -> RequestDescriptor {
        RequestBuilder::new("http://localhost:8081", "/users/updateUserData", Method::PUT)
            .build(BuildOptions::default())
            .unwrap()
    }

    fn injector_with(token: Option<&str>) -> AuthInjector {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        if let Some(token) = token {
            store.save(token).unwrap();
        }
        AuthInjector::new(Arc::new(store))
    }

    #[test]
    fn test_token_present_adds_single_bearer_header() {
        let original = request();
        let decorated = injector_with(Some("abc")).intercept(&original);

        assert!(matches!(decorated, Cow::Owned(_)));
        let authorization: Vec<_> = decorated
            .headers()
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(AUTHORIZATION))
            .collect();
        assert_eq!(authorization.len(), 1);
        assert_eq!(decorated.header(AUTHORIZATION), Some("Bearer abc"));
        assert!(original.header(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_existing_header_is_overwritten() {
        let original = RequestBuilder::new("http://localhost:8081", "/x", Method::GET)
            .header("authorization", "Bearer stale", ParameterOptions::default())
            .build(BuildOptions::default())
            .unwrap();
        let decorated = injector_with(Some("fresh")).intercept(&original);

        assert_eq!(decorated.headers().len(), 1);
        assert_eq!(decorated.header(AUTHORIZATION), Some("Bearer fresh"));
        assert_eq!(original.header(AUTHORIZATION), Some("Bearer stale"));
    }

    #[test]
    fn test_no_token_passes_through_unchanged() {
        let original = request();
        let result = injector_with(None).intercept(&original);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(*result, original);

        let empty = injector_with(Some(""));
        assert!(matches!(empty.intercept(&original), Cow::Borrowed(_)));
    }

    #[test]
    fn test_storage_failure_degrades_to_unauthenticated() {
        let injector = AuthInjector::new(Arc::new(CredentialStore::new(Arc::new(
            UnavailableStorage,
        ))));
        let original = request();
        assert!(matches!(injector.intercept(&original), Cow::Borrowed(_)));
    }

    #[test]
    fn test_skip_auth_context_is_honoured() {
        let original = RequestBuilder::new("http://localhost:8081", "/auth", Method::GET)
            .build(BuildOptions::text().context(RequestContext::skip_auth()))
            .unwrap();
        let result = injector_with(Some("abc")).intercept(&original);
        assert!(result.header(AUTHORIZATION).is_none());
    }
}
