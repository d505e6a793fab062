//! # 客户端配置结构定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::Result;

/// 后端 API 默认根地址
pub const DEFAULT_ROOT_URL: &str = "http://localhost:8081";
/// 身份提供方授权端点
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// 固定的 OAuth 客户端标识
pub const DEFAULT_CLIENT_ID: &str =
    "863784785750-2ol5aj5su9a5v0t5uabium81hdpn4nlc.apps.googleusercontent.com";
/// 固定的回调地址（后端的授权码处理端点）
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/users/grantCode";

/// 客户端主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 后端 API 配置
    pub api: ApiConfig,
    /// OAuth 授权配置
    pub oauth: OAuthConfig,
    /// 凭据存储配置
    pub storage: StorageConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 根地址，所有端点路径都拼接在其后
    pub root_url: String,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
    /// User-Agent
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            timeout_seconds: 30,
            user_agent: format!("task-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// OAuth 授权配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// 授权端点
    pub authorize_url: String,
    /// 客户端ID
    pub client_id: String,
    /// 重定向URI
    pub redirect_uri: String,
    /// 作用域
    pub scopes: Vec<String>,
    /// 访问类型（`offline` 以获取刷新令牌）
    pub access_type: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
                "openid".to_string(),
            ],
            access_type: "offline".to_string(),
        }
    }
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 文件持久化（跨进程重启保留）
    #[default]
    File,
    /// 仅内存
    Memory,
}

/// 凭据存储配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 存储后端
    pub backend: StorageBackend,
    /// 凭据文件路径，为空时使用数据目录下的默认位置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// 凭据文件的实际路径
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("task-client")
                .join("credentials.json")
        })
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// 解析后的后端根地址
    pub fn root_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.api.root_url)?)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        crate::ensure_config!(
            Url::parse(&self.api.root_url).is_ok(),
            "无效的后端根地址: {}",
            self.api.root_url
        );
        crate::ensure_config!(self.api.timeout_seconds > 0, "请求超时时间必须大于0");
        crate::ensure_config!(
            Url::parse(&self.oauth.authorize_url).is_ok(),
            "无效的授权端点: {}",
            self.oauth.authorize_url
        );
        crate::ensure_config!(
            Url::parse(&self.oauth.redirect_uri).is_ok(),
            "无效的回调地址: {}",
            self.oauth.redirect_uri
        );
        crate::ensure_config!(
            !self.oauth.client_id.trim().is_empty(),
            "OAuth client_id 不能为空"
        );
        Ok(())
    }
}
