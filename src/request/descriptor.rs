//! 不可变的请求描述

use bytes::Bytes;
use indexmap::IndexMap;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};

/// 响应解码模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// 原始文本，用于只返回确认信息的端点
    Text,
    /// 原始字节，调用方稍后自行解析
    Binary,
    /// 结构化 JSON
    #[default]
    Json,
}

/// 请求体内容
#[derive(Debug, Clone, PartialEq)]
pub enum BodyContent {
    Json(Value),
    Text(String),
    Bytes(Bytes),
}

/// 请求体及其内容类型
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub content: BodyContent,
    pub content_type: String,
}

impl RequestBody {
    /// 序列化为传输层可发送的字节
    pub fn to_bytes(&self) -> Result<Bytes> {
        Ok(match &self.content {
            BodyContent::Json(value) => Bytes::from(serde_json::to_vec(value)?),
            BodyContent::Text(text) => Bytes::from(text.clone()),
            BodyContent::Bytes(bytes) => bytes.clone(),
        })
    }
}

/// 透传给下游消费者的上下文，构建器本身不解释
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    values: IndexMap<String, Value>,
}

impl RequestContext {
    /// 约定的键：为 true 时认证注入器跳过该请求
    pub const SKIP_AUTH: &'static str = "skip_auth";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// 标记跳过认证
    pub fn skip_auth() -> Self {
        Self::new().with(Self::SKIP_AUTH, true)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// 一次出站 HTTP 调用的完整描述
///
/// 只能由 [`RequestBuilder`](super::RequestBuilder) 生成，之后不可修改；
/// 拦截器通过 [`with_header`](Self::with_header) 得到装饰后的副本。
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub(super) method: Method,
    pub(super) root_url: String,
    pub(super) path: String,
    pub(super) url: Url,
    pub(super) query: IndexMap<String, Vec<String>>,
    pub(super) headers: IndexMap<String, String>,
    pub(super) body: Option<RequestBody>,
    pub(super) response_type: ResponseType,
    pub(super) accept: String,
    pub(super) context: RequestContext,
}

impl RequestDescriptor {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 完整的绝对地址，含编码后的查询串
    pub fn url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, values) in &self.query {
                for value in values {
                    pairs.append_pair(name, value);
                }
            }
        }
        url
    }

    /// 查询参数，按注册顺序
    pub fn query(&self) -> &IndexMap<String, Vec<String>> {
        &self.query
    }

    /// 单个查询参数的全部取值
    pub fn query_values(&self, name: &str) -> Option<&[String]> {
        self.query.get(name).map(Vec::as_slice)
    }

    /// 头部表，名称统一为小写
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// 返回设置（覆盖）了某个头部的副本，原描述保持不变
    pub fn with_header(&self, name: &str, value: impl Into<String>) -> Self {
        let mut decorated = self.clone();
        decorated
            .headers
            .insert(name.to_ascii_lowercase(), value.into());
        decorated
    }
}

/// 拼接根地址和路径，结果必须是合法的绝对地址
pub(super) fn join_url(root_url: &str, path: &str) -> Result<Url> {
    let joined = format!("{}{}", root_url.trim_end_matches('/'), path);
    let url = Url::parse(&joined).map_err(|e| {
        ClientError::request_build_with_source(format!("无效的请求地址: {joined}"), e)
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::request_build(format!(
            "请求地址不是层级 URL: {joined}"
        )));
    }
    Ok(url)
}
