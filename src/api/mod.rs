//! # 端点客户端
//!
//! 每个后端操作一个函数：构建请求描述，交给管道发送；响应先按描述声明的
//! 模式解码，再转换为具体类型。

pub mod models;
pub mod users;

pub use models::{
    AuthorizationGrant, ChangePasswordDto, LoginRequest, TokenResponse, UserEntity, UserRequest,
    UserResponse,
};

use tracing::info;

use crate::error::Result;
use crate::pipeline::ApiClient;
use crate::request::RequestContext;

/// 用户服务客户端
#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn root(&self) -> &str {
        self.client.root_url()
    }

    /// 用户名密码登录，返回令牌对；持久化由调用方负责
    pub async fn login(&self, body: &LoginRequest) -> Result<TokenResponse> {
        let request = users::login::request(self.root(), body, RequestContext::default())?;
        let token: TokenResponse = self.client.execute_decoded(&request).await?.parse()?;
        info!(username = %body.username, "登录成功");
        Ok(token)
    }

    pub async fn register(&self, body: &UserRequest) -> Result<UserEntity> {
        let request = users::register::request(self.root(), body, RequestContext::default())?;
        self.client.execute_decoded(&request).await?.parse()
    }

    /// 用刷新令牌换取新的令牌对
    pub async fn refresh_token(&self, token: &str) -> Result<TokenResponse> {
        let request =
            users::refresh_token::request(self.root(), Some(token), RequestContext::default())?;
        self.client.execute_decoded(&request).await?.parse()
    }

    pub async fn forgot_password(&self, user_id: &str) -> Result<()> {
        let request =
            users::forgot_password::request(self.root(), Some(user_id), RequestContext::default())?;
        self.client.execute_decoded(&request).await.map(|_| ())
    }

    pub async fn reset_password(&self, email: &str) -> Result<()> {
        let request =
            users::reset_password::request(self.root(), Some(email), RequestContext::default())?;
        self.client.execute_decoded(&request).await.map(|_| ())
    }

    pub async fn change_password(&self, token: &str, body: &ChangePasswordDto) -> Result<()> {
        let request = users::change_password::request(
            self.root(),
            Some(token),
            body,
            RequestContext::default(),
        )?;
        self.client.execute_decoded(&request).await.map(|_| ())
    }

    /// 把授权码交给后端处理
    pub async fn process_grant_code(&self, grant: &AuthorizationGrant) -> Result<()> {
        let request = users::grant_code::request(self.root(), grant, RequestContext::default())?;
        self.client.execute_decoded(&request).await.map(|_| ())
    }

    pub async fn get_user_id_by_token(&self, token: &str) -> Result<String> {
        let request = users::get_user_id_by_token::request(
            self.root(),
            Some(token),
            RequestContext::default(),
        )?;
        Ok(self.client.execute_decoded(&request).await?.into_text())
    }

    pub async fn update_user_data(
        &self,
        authorization: Option<&str>,
        body: &UserRequest,
    ) -> Result<UserEntity> {
        let request = users::update_user_data::request(
            self.root(),
            authorization,
            body,
            RequestContext::default(),
        )?;
        self.client.execute_decoded(&request).await?.parse()
    }
}
