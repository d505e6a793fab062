//! 后端用户服务的数据模型

use serde::{Deserialize, Serialize};

use crate::storage::Credential;

/// 用户名密码登录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }
}

/// 注册与更新用户资料时提交的用户字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

/// 用户概要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// 登录与刷新返回的令牌对
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// 访问令牌有效期（秒）
    pub expires_in: Option<i64>,
    pub user_response: Option<UserResponse>,
}

impl TokenResponse {
    /// 转为凭据快照
    pub fn credential(&self) -> Credential {
        Credential {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("credential", &self.credential())
            .field("expires_in", &self.expires_in)
            .field("user_response", &self.user_response)
            .finish()
    }
}

/// 后端保存的完整用户实体，所有字段都可能缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserEntity {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub email_verified: Option<bool>,
    pub google_account_id: Option<String>,
    pub profile_picture_url: Option<String>,
    pub roles: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub level: Option<i64>,
    pub points: Option<i64>,
    pub task_completion_rate: Option<f64>,
    pub calendar_sync_enabled: Option<bool>,
    pub created_date: Option<String>,
    pub last_login_date: Option<String>,
    pub is_deleted: Option<bool>,
}

/// 修改密码请求体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    pub password: String,
    pub confirm_password: String,
}

/// OAuth 回调携带的授权参数，只使用一次
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    pub code: String,
    pub scope: String,
    pub authuser: String,
    pub prompt: String,
}
