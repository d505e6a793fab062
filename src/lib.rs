//! # Task Client Library
//!
//! 任务管理服务客户端的认证请求管道：凭据存储、请求构建、
//! 认证注入、OAuth 重定向流程以及用户服务端点。

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod request;
pub mod storage;
pub mod testing;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};

use std::sync::Arc;

use api::UserApi;
use auth::{Navigator, OAuthRedirectFlow, SessionService};
use pipeline::{ApiClient, AuthInjector, ReqwestTransport};
use storage::CredentialStore;

/// 按配置组装好的客户端组件
#[derive(Clone)]
pub struct TaskClient {
    pub store: Arc<CredentialStore>,
    pub api: UserApi,
    pub session: SessionService,
    pub oauth: OAuthRedirectFlow,
}

impl TaskClient {
    /// 由配置和导航器构建完整的客户端
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let store = Arc::new(CredentialStore::new(storage::storage_from_config(
            &config.storage,
        )));
        let transport = Arc::new(ReqwestTransport::new(&config.api)?);
        let client = ApiClient::builder(config.root_url()?.as_str(), transport)
            .interceptor(Arc::new(AuthInjector::new(store.clone())))
            .build();

        let api = UserApi::new(client);
        Ok(Self {
            session: SessionService::new(api.clone(), store.clone(), navigator),
            oauth: OAuthRedirectFlow::new(api.clone(), config.oauth.clone()),
            store,
            api,
        })
    }
}
