//! OAuth 授权码重定向流程
//!
//! 流程被外部身份提供方的重定向切成两段：
//! [`OAuthRedirectFlow::begin_authorization`] 发起授权并跳转，
//! [`OAuthRedirectFlow::handle_callback`] 处理回调并交换授权码。
//! 两段之间不共享任何内存状态，只依靠回调地址携带的参数关联。

use std::fmt;
use tracing::{debug, error, info, warn};
use url::Url;

use super::navigator::{Destination, ExecutionContext, Navigator};
use crate::api::{AuthorizationGrant, UserApi};
use crate::config::OAuthConfig;
use crate::error::{ClientError, Result};
use crate::request::{
    BuildOptions, Method, ParameterOptions, RequestBuilder, RequestContext, RequestDescriptor,
};

/// 流程状态
#[derive(Debug)]
pub enum FlowState {
    /// 未发起，或执行环境不允许发起
    Idle,
    /// 已跳转到身份提供方
    AuthorizationRequested { target: Url },
    /// 回调已到达，授权参数解析完成
    GrantReceived(AuthorizationGrant),
    /// 正在由后端交换授权码
    Exchanging,
    /// 后端已接受授权码；凭据持久化由调用方负责
    SessionEstablished,
    /// 授权请求或交换失败，停留在当前页面
    ExchangeFailed(ClientError),
}

impl FlowState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::ExchangeFailed(_))
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AuthorizationRequested { target } => {
                write!(f, "AuthorizationRequested({})", target.host_str().unwrap_or_default())
            }
            Self::GrantReceived(_) => write!(f, "GrantReceived"),
            Self::Exchanging => write!(f, "Exchanging"),
            Self::SessionEstablished => write!(f, "SessionEstablished"),
            Self::ExchangeFailed(e) => write!(f, "ExchangeFailed({e})"),
        }
    }
}

impl AuthorizationGrant {
    /// 从回调地址的查询串解析授权参数
    ///
    /// 提供方返回 `error` 参数或缺少 `code` 时视为授权失败。
    pub fn from_callback(callback: &Url) -> Result<Self> {
        let mut grant = Self::default();
        let mut provider_error = None;

        for (name, value) in callback.query_pairs() {
            match name.as_ref() {
                "code" => grant.code = value.into_owned(),
                "scope" => grant.scope = value.into_owned(),
                "authuser" => grant.authuser = value.into_owned(),
                "prompt" => grant.prompt = value.into_owned(),
                "error" => provider_error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(reason) = provider_error {
            return Err(crate::auth_exchange_error!("身份提供方拒绝授权: {}", reason));
        }
        if grant.code.is_empty() {
            return Err(crate::auth_exchange_error!("回调地址缺少授权码"));
        }
        Ok(grant)
    }
}

/// 授权码重定向流程
#[derive(Debug, Clone)]
pub struct OAuthRedirectFlow {
    api: UserApi,
    config: OAuthConfig,
}

impl OAuthRedirectFlow {
    pub fn new(api: UserApi, config: OAuthConfig) -> Self {
        Self { api, config }
    }

    /// 授权端点请求
    ///
    /// 请求带 `skip_auth`，会话令牌不会发给身份提供方。
    pub fn authorize_request(&self) -> Result<RequestDescriptor> {
        let options = ParameterOptions::default();
        RequestBuilder::new(self.config.authorize_url.as_str(), "", Method::GET)
            .query("client_id", self.config.client_id.as_str(), options)
            .query("redirect_uri", self.config.redirect_uri.as_str(), options)
            .query("response_type", "code", options)
            .query("scope", self.config.scopes.join(" "), options)
            .query("access_type", self.config.access_type.as_str(), options)
            .build(BuildOptions::text().context(RequestContext::skip_auth()))
    }

    /// 第一段：请求授权端点，把返回的文本当作跳转地址并导航过去
    ///
    /// 非交互环境直接返回 `Idle`，不发请求也不导航；失败不重试。
    pub async fn begin_authorization(
        &self,
        context: ExecutionContext,
        navigator: &dyn Navigator,
    ) -> FlowState {
        if !context.is_interactive() {
            debug!("非交互环境，跳过授权请求");
            return FlowState::Idle;
        }

        match self.request_authorization(navigator).await {
            Ok(target) => {
                info!(host = target.host_str().unwrap_or_default(), "已跳转到身份提供方");
                FlowState::AuthorizationRequested { target }
            }
            Err(e) => {
                error!(error = %e, "授权请求失败");
                FlowState::ExchangeFailed(e)
            }
        }
    }

    async fn request_authorization(&self, navigator: &dyn Navigator) -> Result<Url> {
        let request = self.authorize_request()?;
        let body = self
            .api
            .client()
            .execute_decoded(&request)
            .await
            .map_err(|e| ClientError::auth_exchange_with_source("授权端点请求失败", e))?
            .into_text();

        let target = Url::parse(body.trim())
            .map_err(|e| ClientError::auth_exchange_with_source("授权端点返回的跳转地址无效", e))?;

        navigator
            .navigate(&Destination::External(target.clone()))
            .map_err(|e| ClientError::auth_exchange_with_source("跳转到身份提供方失败", e))?;
        Ok(target)
    }

    /// 第二段：解析回调携带的授权参数，交给后端交换
    ///
    /// 成功只表示后端接受了授权码，不会写入凭据存储。
    pub async fn handle_callback(&self, context: ExecutionContext, callback: &Url) -> FlowState {
        if !context.is_interactive() {
            debug!("非交互环境，跳过授权回调处理");
            return FlowState::Idle;
        }

        let grant = match AuthorizationGrant::from_callback(callback) {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "授权回调参数无效");
                return FlowState::ExchangeFailed(e);
            }
        };
        debug!(state = %FlowState::GrantReceived(grant.clone()), "收到授权回调");

        self.exchange(grant).await
    }

    /// 用授权参数向后端交换会话
    pub async fn exchange(&self, grant: AuthorizationGrant) -> FlowState {
        debug!(state = %FlowState::Exchanging, "交换授权码");
        match self.api.process_grant_code(&grant).await {
            Ok(()) => {
                info!("授权码交换成功");
                FlowState::SessionEstablished
            }
            Err(e) => {
                error!(error = %e, "授权码交换失败");
                FlowState::ExchangeFailed(ClientError::auth_exchange_with_source(
                    "授权码交换失败",
                    e,
                ))
            }
        }
    }
}
