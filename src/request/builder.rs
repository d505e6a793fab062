//! 请求构建器
//!
//! 按值链式调用，`build` 消耗构建器并产出不可变的 [`RequestDescriptor`]，
//! 因此构建后无法再修改。

use indexmap::IndexMap;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::descriptor::{
    BodyContent, RequestBody, RequestContext, RequestDescriptor, ResponseType, join_url,
};
use super::params::{ParamValue, ParameterOptions};
use crate::error::{ClientError, Result};

/// `build` 的选项
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub response_type: ResponseType,
    pub accept: String,
    pub context: RequestContext,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            response_type: ResponseType::Json,
            accept: "*/*".to_string(),
            context: RequestContext::default(),
        }
    }
}

impl BuildOptions {
    pub fn new(response_type: ResponseType) -> Self {
        Self {
            response_type,
            ..Self::default()
        }
    }

    pub fn text() -> Self {
        Self::new(ResponseType::Text).accept("text/plain")
    }

    pub fn json() -> Self {
        Self::new(ResponseType::Json).accept("application/json")
    }

    pub fn binary() -> Self {
        Self::new(ResponseType::Binary)
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// 请求构建器
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    root_url: String,
    path: String,
    method: Method,
    query: IndexMap<String, Vec<String>>,
    headers: IndexMap<String, String>,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    pub fn new(root_url: impl Into<String>, path: impl Into<String>, method: Method) -> Self {
        Self {
            root_url: root_url.into(),
            path: path.into(),
            method,
            query: IndexMap::new(),
            headers: IndexMap::new(),
            body: None,
        }
    }

    /// 注册查询参数；缺省值被跳过，重复注册同名参数时替换之前的值
    pub fn query(
        mut self,
        name: &str,
        value: impl Into<ParamValue>,
        options: ParameterOptions,
    ) -> Self {
        match options.query_values(value.into()) {
            Some(values) => {
                self.query.insert(name.to_string(), values);
            }
            None => {
                self.query.shift_remove(name);
            }
        }
        self
    }

    /// 注册头部；同名头部后写覆盖先写
    pub fn header(
        mut self,
        name: &str,
        value: impl Into<ParamValue>,
        options: ParameterOptions,
    ) -> Self {
        let name = name.to_ascii_lowercase();
        match options.header_value(value.into()) {
            Some(value) => {
                self.headers.insert(name, value);
            }
            None => {
                self.headers.shift_remove(&name);
            }
        }
        self
    }

    /// 设置请求体，多次调用时覆盖
    pub fn body(mut self, content: BodyContent, content_type: impl Into<String>) -> Self {
        self.body = Some(RequestBody {
            content,
            content_type: content_type.into(),
        });
        self
    }

    /// 以 JSON 序列化值作为请求体
    pub fn json_body<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ClientError::serialization("请求体序列化失败", e))?;
        Ok(self.body(BodyContent::Json(value), "application/json"))
    }

    /// 完成构建
    pub fn build(self, options: BuildOptions) -> Result<RequestDescriptor> {
        let url = join_url(&self.root_url, &self.path)?;

        debug!(
            method = %self.method,
            path = %self.path,
            query_params = self.query.len(),
            headers = self.headers.len(),
            has_body = self.body.is_some(),
            response_type = ?options.response_type,
            "请求描述已构建"
        );

        Ok(RequestDescriptor {
            method: self.method,
            root_url: self.root_url,
            path: self.path,
            url,
            query: self.query,
            headers: self.headers,
            body: self.body,
            response_type: options.response_type,
            accept: options.accept,
            context: options.context,
        })
    }
}
