//! # 测试辅助函数

use std::sync::{Arc, Once};
use tracing::Level;

use crate::api::UserApi;
use crate::config::ClientConfig;
use crate::pipeline::{ApiClient, AuthInjector, ReqwestTransport};
use crate::storage::{CredentialStore, MemoryStorage};

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 内存凭据存储
pub fn memory_credential_store() -> Arc<CredentialStore> {
    Arc::new(CredentialStore::new(Arc::new(MemoryStorage::new())))
}

/// 指向给定根地址的配置，其余保持默认
pub fn test_client_config(root_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.root_url = root_url.to_string();
    config.api.timeout_seconds = 5;
    config
}

/// 真实传输层加认证注入器组成的用户客户端
pub fn test_user_api(root_url: &str, store: Arc<CredentialStore>) -> UserApi {
    let config = test_client_config(root_url);
    let transport = ReqwestTransport::new(&config.api).expect("测试 HTTP 客户端创建失败");
    UserApi::new(
        ApiClient::builder(root_url, Arc::new(transport))
            .interceptor(Arc::new(AuthInjector::new(store)))
            .build(),
    )
}
