//! # 配置管理模块
//!
//! 处理客户端配置加载、验证和环境变量覆盖

mod app_config;
mod manager;

pub use app_config::{
    ApiConfig, ClientConfig, DEFAULT_AUTHORIZE_URL, DEFAULT_CLIENT_ID, DEFAULT_REDIRECT_URI,
    DEFAULT_ROOT_URL, LoggingConfig, OAuthConfig, StorageBackend, StorageConfig,
};
pub use manager::{CONFIG_PATH_ENV, ConfigLoader};
