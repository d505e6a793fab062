//! # 错误类型定义

use thiserror::Error;

/// 客户端主要错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    /// 凭据存储不可用（持久化被禁用、配额耗尽、文件损坏等）
    #[error("存储不可用: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 传输层错误（连接失败、超时、响应读取失败）
    #[error("网络错误: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 后端返回了非 2xx 状态码
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        /// 后端 JSON 响应中的 `message` 字段（如有）
        message: Option<String>,
        body: String,
    },

    /// OAuth 授权请求或授权码交换失败
    #[error("授权交换失败: {message}")]
    AuthExchange {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 调用方校验失败，请求未发出
    #[error("校验失败: {fields:?}")]
    Validation { fields: Vec<String> },

    /// 请求描述构建失败
    #[error("请求构建错误: {message}")]
    RequestBuild {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 带上下文的错误
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// 创建存储不可用错误
    pub fn storage_unavailable<T: Into<String>>(message: T) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的存储不可用错误
    pub fn storage_unavailable_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建网络错误
    pub fn network<T: Into<String>>(message: T) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的网络错误
    pub fn network_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 根据状态码和响应体创建 HTTP 错误，自动提取 `message` 字段
    pub fn http<T: Into<String>>(status: u16, body: T) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .filter(|message| !message.is_empty());

        Self::Http {
            status,
            message,
            body,
        }
    }

    /// 创建授权交换错误
    pub fn auth_exchange<T: Into<String>>(message: T) -> Self {
        Self::AuthExchange {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的授权交换错误
    pub fn auth_exchange_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::AuthExchange {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建校验错误
    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// 创建请求构建错误
    pub fn request_build<T: Into<String>>(message: T) -> Self {
        Self::RequestBuild {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的请求构建错误
    pub fn request_build_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::RequestBuild {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建序列化错误
    pub fn serialization<T: Into<String>, E: Into<anyhow::Error>>(message: T, source: E) -> Self {
        Self::Serialization {
            message: message.into(),
            source: source.into(),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 后端提供的错误消息（仅 HTTP 错误携带）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            Self::Context { source, .. } => source.server_message(),
            _ => None,
        }
    }

    /// HTTP 状态码（仅 HTTP 错误携带）
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 错误分类，用于日志和诊断
    pub fn category(&self) -> super::ErrorCategory {
        use super::ErrorCategory;
        match self {
            Self::Validation { .. } | Self::RequestBuild { .. } | Self::Config { .. } => {
                ErrorCategory::Caller
            }
            Self::Http { status, .. } if (400..500).contains(status) => ErrorCategory::Caller,
            Self::Context { source, .. } => source.category(),
            Self::StorageUnavailable { .. } => ErrorCategory::Storage,
            _ => ErrorCategory::Remote,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "请求超时".to_string()
        } else if err.is_connect() {
            "连接失败".to_string()
        } else {
            "请求发送失败".to_string()
        };
        Self::network_with_source(message, err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON处理失败", err)
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::request_build_with_source("URL解析失败", err)
    }
}
