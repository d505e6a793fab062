//! 出站请求管道
//!
//! 请求描述依次经过一组拦截器装饰，然后交给传输层发送。
//! 拦截器按注册顺序执行，不能丢弃或重排请求。

mod auth_injector;
mod transport;

pub use auth_injector::{AUTHORIZATION, AuthInjector};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{ApiResponse, ReqwestTransport, ResponseBody, Transport};

use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::request::RequestDescriptor;

/// 请求拦截器：只装饰请求，不检查响应
///
/// 返回 `Cow::Borrowed` 表示原样放行；`Cow::Owned` 是装饰后的副本，
/// 调用方持有的原描述不会被修改。
pub trait RequestInterceptor: Send + Sync {
    fn intercept<'a>(&self, request: &'a RequestDescriptor) -> Cow<'a, RequestDescriptor>;
}

/// 带拦截器链的 API 客户端
#[derive(Clone)]
pub struct ApiClient {
    root_url: String,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("root_url", &self.root_url)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn builder(root_url: impl Into<String>, transport: Arc<dyn Transport>) -> PipelineBuilder {
        PipelineBuilder::new(root_url, transport)
    }

    /// 所有端点路径拼接的根地址
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// 依次应用拦截器，得到最终要发送的描述
    pub fn prepare(&self, request: &RequestDescriptor) -> RequestDescriptor {
        let mut current = request.clone();
        for interceptor in &self.interceptors {
            let decorated = match interceptor.intercept(&current) {
                Cow::Owned(decorated) => Some(decorated),
                Cow::Borrowed(_) => None,
            };
            if let Some(decorated) = decorated {
                current = decorated;
            }
        }
        current
    }

    /// 发送请求并检查状态码
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        let prepared = self.prepare(request);
        debug!(method = %prepared.method(), path = %prepared.path(), "发送请求");

        let response = self.transport.send(&prepared).await.inspect_err(|e| {
            warn!(path = %prepared.path(), error = %e, "请求传输失败");
        })?;

        response.error_for_status().inspect_err(|e| {
            warn!(path = %prepared.path(), status = ?e.status(), "后端返回错误状态");
        })
    }

    /// 发送请求，并按描述中的 `response_type` 解码响应体
    pub async fn execute_decoded(&self, request: &RequestDescriptor) -> Result<ResponseBody> {
        self.execute(request).await?.decode(request.response_type())
    }
}

/// 构建器：声明式组合拦截器链
pub struct PipelineBuilder {
    root_url: String,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl PipelineBuilder {
    pub fn new(root_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            root_url: root_url.into(),
            interceptors: Vec::new(),
            transport,
        }
    }

    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            root_url: self.root_url,
            interceptors: self.interceptors,
            transport: self.transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::request::{BuildOptions, Method, RequestBuilder};
    use crate::storage::{CredentialStore, MemoryStorage};
    use mockall::predicate::function;

    const ROOT: &str = "http://localhost:8081";

    struct TagInterceptor(&'static str);

    impl RequestInterceptor for TagInterceptor {
        fn intercept<'a>(&self, request: &'a RequestDescriptor) -> Cow<'a, RequestDescriptor> {
            let previous = request.header("x-order").unwrap_or_default().to_string();
            Cow::Owned(request.with_header("x-order", format!("{previous}{}", self.0)))
        }
    }

    fn request() -> RequestDescriptor {
        RequestBuilder::new(ROOT, "/users/updateUserData", Method::PUT)
            .build(BuildOptions::json())
            .unwrap()
    }

    #[test]
    fn test_interceptors_run_in_registration_order() {
        let client = ApiClient::builder(ROOT, Arc::new(MockTransport::new()))
            .interceptor(Arc::new(TagInterceptor("a")))
            .interceptor(Arc::new(TagInterceptor("b")))
            .build();

        assert_eq!(client.prepare(&request()).header("x-order"), Some("ab"));
    }

    #[tokio::test]
    async fn test_dispatch_carries_bearer_and_caller_copy_untouched() {
        let store = Arc::new(CredentialStore::new(Arc::new(MemoryStorage::new())));
        store.save("tok").unwrap();

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .with(function(|r: &RequestDescriptor| {
                r.header(AUTHORIZATION) == Some("Bearer tok")
            }))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, r#"{"username":"ada"}"#)));

        let client = ApiClient::builder(ROOT, Arc::new(transport))
            .interceptor(Arc::new(AuthInjector::new(store)))
            .build();

        let original = request();
        let body = client.execute_decoded(&original).await.unwrap();
        assert_eq!(body, ResponseBody::Json(serde_json::json!({"username": "ada"})));
        assert!(original.header(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_without_token_still_proceeds() {
        let store = Arc::new(CredentialStore::new(Arc::new(MemoryStorage::new())));

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .with(function(|r: &RequestDescriptor| r.headers().is_empty()))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(204, "")));

        let client = ApiClient::builder(ROOT, Arc::new(transport))
            .interceptor(Arc::new(AuthInjector::new(store)))
            .build();

        client.execute(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_http_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::new(401, r#"{"message":"bad credentials"}"#)));

        let client = ApiClient::builder(ROOT, Arc::new(transport)).build();
        let err = client.execute_decoded(&request()).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("bad credentials"));
    }

    #[tokio::test]
    async fn test_text_response_is_not_json_parsed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::new(200, "Password reset link sent")));

        let client = ApiClient::builder(ROOT, Arc::new(transport)).build();
        let text_request = RequestBuilder::new(ROOT, "/users/resetPassword", Method::POST)
            .build(BuildOptions::text())
            .unwrap();

        assert_eq!(
            client.execute_decoded(&text_request).await.unwrap(),
            ResponseBody::Text("Password reset link sent".to_string())
        );
    }

    #[tokio::test]
    async fn test_binary_response_keeps_raw_bytes() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::new(200, &b"\x00\xffraw"[..])));

        let client = ApiClient::builder(ROOT, Arc::new(transport)).build();
        let binary_request = RequestBuilder::new(ROOT, "/users/refreshToken", Method::POST)
            .build(BuildOptions::binary())
            .unwrap();

        let body = client.execute_decoded(&binary_request).await.unwrap();
        assert_eq!(body, ResponseBody::Binary(bytes::Bytes::from_static(b"\x00\xffraw")));
    }

    #[tokio::test]
    async fn test_json_mode_rejects_non_json_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::new(200, "Password reset link sent")));

        let client = ApiClient::builder(ROOT, Arc::new(transport)).build();
        let err = client.execute_decoded(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(ClientError::network("connection refused")));

        let client = ApiClient::builder(ROOT, Arc::new(transport)).build();
        let err = client.execute(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network { .. }));
    }
}
