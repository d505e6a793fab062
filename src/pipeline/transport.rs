//! HTTP 传输层

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::request::{RequestDescriptor, ResponseType};

/// 传输层返回的原始响应
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 非 2xx 转为 `ClientError::Http`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::http(self.status, self.text()))
        }
    }

    /// 以文本读取响应体
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 以 JSON 解析响应体
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::serialization("响应体解析失败", e))
    }

    /// 按请求声明的响应模式解码
    pub fn decode(self, response_type: ResponseType) -> Result<ResponseBody> {
        Ok(match response_type {
            ResponseType::Text => ResponseBody::Text(self.text()),
            ResponseType::Binary => ResponseBody::Binary(self.body),
            ResponseType::Json => ResponseBody::Json(self.json()?),
        })
    }
}

/// 解码后的响应体
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Binary(Bytes),
    Json(serde_json::Value),
}

impl ResponseBody {
    /// 文本形式；字节按 UTF-8 宽松解码
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Self::Json(value) => value.to_string(),
        }
    }

    /// 解析为结构化数据
    pub fn parse<T: DeserializeOwned>(self) -> Result<T> {
        let parsed = match self {
            Self::Text(text) => serde_json::from_str(&text),
            Self::Binary(bytes) => serde_json::from_slice(&bytes),
            Self::Json(value) => serde_json::from_value(value),
        };
        parsed.map_err(|e| ClientError::serialization("响应体解析失败", e))
    }
}

/// 把请求描述真正发送出去的传输层
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求；只有传输失败才返回错误，非 2xx 状态照常返回
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse>;
}

/// 基于 reqwest 的传输层
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::config_with_source("创建HTTP客户端失败", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .header(ACCEPT, request.accept());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, body.content_type.as_str())
                .body(body.to_bytes()?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(
            method = %request.method(),
            path = %request.path(),
            status,
            bytes = body.len(),
            "收到响应"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
