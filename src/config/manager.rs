//! # 配置加载器
//!
//! 从 TOML 文件加载配置，并应用环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ClientConfig, StorageBackend};
use crate::error::{ClientError, Context, Result};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TASK_CLIENT_CONFIG_PATH";

/// 支持的环境变量覆盖项
const ENV_OVERRIDE_KEYS: &[&str] = &[
    "TASK_CLIENT_ROOT_URL",
    "TASK_CLIENT_OAUTH_CLIENT_ID",
    "TASK_CLIENT_STORAGE_PATH",
    "TASK_CLIENT_STORAGE_BACKEND",
    "TASK_CLIENT_LOG_LEVEL",
];

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 按约定位置加载配置
    ///
    /// 优先使用 `TASK_CLIENT_CONFIG_PATH`，否则 `config/config.{RUST_ENV}.toml`
    pub fn load() -> Result<ClientConfig> {
        let config_file = Self::default_path();
        Self::load_with_overrides(&config_file, &Self::build_env_overrides())
    }

    /// 从指定文件加载配置
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<ClientConfig> {
        Self::load_with_overrides(config_path.as_ref(), &Self::build_env_overrides())
    }

    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            PathBuf::from(path)
        } else {
            let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
            PathBuf::from(format!("config/config.{env}.toml"))
        }
    }

    /// 加载配置文件并应用给定的覆盖项
    ///
    /// 文件不存在时使用默认配置
    pub fn load_with_overrides(
        config_path: &Path,
        overrides: &HashMap<String, String>,
    ) -> Result<ClientConfig> {
        let mut config = if config_path.exists() {
            Self::load_config_file(config_path)?
        } else {
            debug!(path = %config_path.display(), "配置文件不存在，使用默认配置");
            ClientConfig::default()
        };

        Self::apply_env_overrides(&mut config, overrides)?;
        config.validate()?;

        info!(
            root_url = %config.api.root_url,
            storage = ?config.storage.backend,
            overrides = overrides.len(),
            "客户端配置加载完成"
        );
        Ok(config)
    }

    /// 解析 TOML 配置文件
    fn load_config_file(config_path: &Path) -> Result<ClientConfig> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            ClientError::config_with_source(
                format!("读取配置文件失败: {}", config_path.display()),
                e,
            )
        })?;

        toml::from_str::<ClientConfig>(&content)
            .with_context(|| format!("解析配置文件失败: {}", config_path.display()))
    }

    /// 收集当前进程的环境变量覆盖项
    pub fn build_env_overrides() -> HashMap<String, String> {
        ENV_OVERRIDE_KEYS
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| ((*key).to_string(), value)))
            .collect()
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(
        config: &mut ClientConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "TASK_CLIENT_ROOT_URL" => config.api.root_url.clone_from(value),
                "TASK_CLIENT_OAUTH_CLIENT_ID" => config.oauth.client_id.clone_from(value),
                "TASK_CLIENT_STORAGE_PATH" => config.storage.path = Some(PathBuf::from(value)),
                "TASK_CLIENT_STORAGE_BACKEND" => {
                    config.storage.backend = match value.to_lowercase().as_str() {
                        "file" => StorageBackend::File,
                        "memory" => StorageBackend::Memory,
                        other => {
                            return Err(crate::config_error!("未知的存储后端: {}", other));
                        }
                    };
                }
                "TASK_CLIENT_LOG_LEVEL" => config.logging.level.clone_from(value),
                other => debug!(key = other, "忽略未知的覆盖项"),
            }
        }
        Ok(())
    }
}
