//! 用户服务端点的请求描述
//!
//! 每个端点一个子模块：`PATH` 常量加一个 `request` 函数，
//! 只声明字段放在查询串、头部还是请求体。

use crate::error::Result;
use crate::request::{
    BuildOptions, Method, ParameterOptions, RequestBuilder, RequestContext, RequestDescriptor,
};

fn text(context: RequestContext) -> BuildOptions {
    BuildOptions::new(crate::request::ResponseType::Text).context(context)
}

fn binary(context: RequestContext) -> BuildOptions {
    BuildOptions::binary().context(context)
}

fn json(context: RequestContext) -> BuildOptions {
    BuildOptions::new(crate::request::ResponseType::Json).context(context)
}

pub mod login {
    use super::*;
    use crate::api::models::LoginRequest;

    pub const PATH: &str = "/users/login";

    pub fn request(
        root_url: &str,
        body: &LoginRequest,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .json_body(body)?
            .build(json(context))
    }
}

pub mod register {
    use super::*;
    use crate::api::models::UserRequest;

    pub const PATH: &str = "/users/register";

    pub fn request(
        root_url: &str,
        body: &UserRequest,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .json_body(body)?
            .build(json(context))
    }
}

pub mod refresh_token {
    use super::*;

    pub const PATH: &str = "/users/refreshToken";

    /// 响应以字节读取，随后解析为令牌对
    pub fn request(
        root_url: &str,
        token: Option<&str>,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .query("token", token, ParameterOptions::default())
            .build(binary(context))
    }
}

pub mod forgot_password {
    use super::*;

    pub const PATH: &str = "/users/forgotPassword";

    pub fn request(
        root_url: &str,
        user_id: Option<&str>,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .query("userId", user_id, ParameterOptions::default())
            .build(text(context))
    }
}

pub mod reset_password {
    use super::*;

    pub const PATH: &str = "/users/resetPassword";

    pub fn request(
        root_url: &str,
        email: Option<&str>,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .query("email", email, ParameterOptions::default())
            .build(text(context))
    }
}

pub mod change_password {
    use super::*;
    use crate::api::models::ChangePasswordDto;

    pub const PATH: &str = "/users/changePassword";

    pub fn request(
        root_url: &str,
        token: Option<&str>,
        body: &ChangePasswordDto,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::POST)
            .query("token", token, ParameterOptions::default())
            .json_body(body)?
            .build(text(context))
    }
}

pub mod grant_code {
    use super::*;
    use crate::api::models::AuthorizationGrant;

    pub const PATH: &str = "/users/grantCode";

    pub fn request(
        root_url: &str,
        grant: &AuthorizationGrant,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        let options = ParameterOptions::default();
        RequestBuilder::new(root_url, PATH, Method::GET)
            .query("code", grant.code.as_str(), options)
            .query("scope", grant.scope.as_str(), options)
            .query("authuser", grant.authuser.as_str(), options)
            .query("prompt", grant.prompt.as_str(), options)
            .build(text(context))
    }
}

pub mod get_user_id_by_token {
    use super::*;

    pub const PATH: &str = "/users/getUserIdByToken";

    pub fn request(
        root_url: &str,
        token: Option<&str>,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::GET)
            .query("token", token, ParameterOptions::default())
            .build(binary(context))
    }
}

pub mod update_user_data {
    use super::*;
    use crate::api::models::UserRequest;

    pub const PATH: &str = "/users/updateUserData";

    /// `authorization` 是显式传入的头部参数，与拦截器注入的凭据写入同一个头
    pub fn request(
        root_url: &str,
        authorization: Option<&str>,
        body: &UserRequest,
        context: RequestContext,
    ) -> Result<RequestDescriptor> {
        RequestBuilder::new(root_url, PATH, Method::PUT)
            .header("Authorization", authorization, ParameterOptions::default())
            .json_body(body)?
            .build(binary(context))
    }
}
