//! # Mock 对象
//!
//! 导航、存储和后端服务的测试替身

use serde_json::Value;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{Destination, Navigator};
use crate::error::{Result, StorageError};
use crate::storage::KeyValueStorage;

/// 记录所有导航目标，不做实际跳转
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按发生顺序返回导航记录
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &Destination) -> Result<()> {
        if let Ok(mut destinations) = self.destinations.lock() {
            destinations.push(destination.clone());
        }
        Ok(())
    }
}

/// 始终不可用的存储，模拟持久化被禁用
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
        Err(StorageError::unavailable("persistence disabled"))
    }

    fn get_items(
        &self,
        _keys: &[&str],
    ) -> std::result::Result<Vec<Option<String>>, StorageError> {
        Err(StorageError::unavailable("persistence disabled"))
    }

    fn set_item(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::unavailable("quota exceeded"))
    }

    fn remove_items(&self, _keys: &[&str]) -> std::result::Result<(), StorageError> {
        Err(StorageError::unavailable("persistence disabled"))
    }
}

/// 基于 wiremock 的后端 Mock
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// 启动 Mock 服务器
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// 服务器根地址
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// 添加 JSON 响应
    pub async fn mock_json(&self, http_method: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(http_method.to_uppercase().as_str()))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// 添加纯文本响应
    pub async fn mock_text(&self, http_method: &str, route: &str, status: u16, body: &str) {
        Mock::given(method(http_method.to_uppercase().as_str()))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// 登录端点返回一对令牌
    pub async fn mock_login_success(&self, access_token: &str, refresh_token: &str) {
        self.mock_json(
            "POST",
            "/users/login",
            200,
            serde_json::json!({
                "accessToken": access_token,
                "refreshToken": refresh_token,
                "expiresIn": 300,
            }),
        )
        .await;
    }

    /// 已收到的请求
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
