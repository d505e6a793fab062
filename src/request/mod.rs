//! # 请求构建模块
//!
//! 每个端点函数只声明哪些字段进入查询串、头部或请求体，
//! 具体的序列化规则集中在这里。

mod builder;
mod descriptor;
mod params;

pub use builder::{BuildOptions, RequestBuilder};
pub use descriptor::{BodyContent, RequestBody, RequestContext, RequestDescriptor, ResponseType};
pub use params::{ParamValue, ParameterOptions, ParameterStyle};

pub use reqwest::Method;
