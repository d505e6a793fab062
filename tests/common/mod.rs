//! 集成测试公共工具

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use task_client::TaskClient;
use task_client::config::{ClientConfig, StorageBackend};
use task_client::testing::RecordingNavigator;
use wiremock::MockServer;

/// 指向 Mock 服务器的配置，凭据写入临时目录
pub fn config_for(server: &MockServer, storage_dir: &Path) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.root_url = server.uri();
    config.api.timeout_seconds = 5;
    config.oauth.authorize_url = format!("{}/o/oauth2/v2/auth", server.uri());
    config.storage.backend = StorageBackend::File;
    config.storage.path = Some(storage_dir.join("credentials.json"));
    config
}

/// 组装客户端并返回导航记录器
pub fn client_for(config: &ClientConfig) -> (TaskClient, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let client = TaskClient::from_config(config, navigator.clone()).expect("客户端创建失败");
    (client, navigator)
}
