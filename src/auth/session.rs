//! 会话生命周期：登录、刷新、登出

use std::sync::Arc;
use tracing::{info, warn};

use super::navigator::{Destination, Navigator, TASKS_ROUTE};
use crate::api::{LoginRequest, UserApi};
use crate::error::{ClientError, Result};
use crate::storage::{Credential, CredentialStore};

/// 会话服务
///
/// 持有端点客户端、凭据存储和导航器；不会在 401 时自动刷新，
/// 刷新只能由调用方显式触发。
#[derive(Clone)]
pub struct SessionService {
    api: UserApi,
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionService {
    pub fn new(api: UserApi, store: Arc<CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            store,
            navigator,
        }
    }

    pub fn api(&self) -> &UserApi {
        &self.api
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// 登录并保存两个令牌，然后进入任务页
    ///
    /// 响应缺少某个令牌时按空串保存。
    pub async fn login(&self, request: &LoginRequest) -> Result<Credential> {
        let token = self.api.login(request).await?;

        let credential = Credential::new(
            token.access_token.unwrap_or_default(),
            token.refresh_token.unwrap_or_default(),
        );
        self.store.store_credential(&credential)?;
        info!(username = %request.username, "会话已建立");

        self.go_to(Destination::route(TASKS_ROUTE));
        Ok(credential)
    }

    /// 用已保存的刷新令牌换取新令牌
    pub async fn refresh_session(&self) -> Result<Credential> {
        let refresh_token = self
            .store
            .get_refresh()?
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClientError::validation(["refreshToken"]))?;

        let token = self.api.refresh_token(&refresh_token).await?;
        self.store.store_credential(&token.credential())?;
        info!(
            expires_in = ?token.expires_in,
            rotated_refresh = token.refresh_token.is_some(),
            "会话已刷新"
        );

        self.store.credential()
    }

    /// 清除两个令牌
    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }

    /// 用当前访问令牌查询用户ID；未认证时返回 `None`
    pub async fn current_user_id(&self) -> Result<Option<String>> {
        match self.store.get_access()?.filter(|token| !token.is_empty()) {
            Some(token) => Ok(Some(self.api.get_user_id_by_token(&token).await?)),
            None => Ok(None),
        }
    }

    fn go_to(&self, destination: Destination) {
        if let Err(e) = self.navigator.navigate(&destination) {
            warn!(error = %e, "导航失败");
        }
    }
}
