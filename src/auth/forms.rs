//! 表单提交逻辑
//!
//! 失败只记录在表单的消息列表中，交给界面展示，不向上抛出。

use tracing::warn;

use super::session::SessionService;
use crate::api::{ChangePasswordDto, LoginRequest, UserApi, UserEntity, UserRequest};
use crate::error::{ClientError, Result};
use crate::storage::Credential;

/// 后端未提供错误消息时的登录失败提示
pub const LOGIN_FALLBACK_MESSAGE: &str = "An error occurred during login";

/// 登录表单
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub request: LoginRequest,
    pub errors: Vec<String>,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            request: LoginRequest::new(username, password),
            errors: Vec::new(),
        }
    }

    /// 提交登录；失败时把后端消息或固定提示追加到 `errors`
    pub async fn submit(&mut self, session: &SessionService) -> Option<Credential> {
        match session.login(&self.request).await {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(error = %e, "登录失败");
                self.errors.push(
                    e.server_message()
                        .unwrap_or(LOGIN_FALLBACK_MESSAGE)
                        .to_string(),
                );
                None
            }
        }
    }
}

/// 注册表单
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub request: UserRequest,
    pub messages: Vec<String>,
}

/// 只有空串算缺失，空白字符照常提交
fn is_missing(value: &str) -> bool {
    value.is_empty()
}

impl RegistrationForm {
    pub fn new(request: UserRequest) -> Self {
        Self {
            request,
            messages: Vec::new(),
        }
    }

    /// 列出缺失的必填字段名
    pub fn missing_fields(&self) -> Vec<String> {
        [
            ("username", &self.request.username),
            ("email", &self.request.email),
            ("password", &self.request.password),
        ]
        .into_iter()
        .filter(|(_, value)| is_missing(value))
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// 提交注册；有缺失字段时不发送请求
    pub async fn submit(&mut self, api: &UserApi) -> Result<UserEntity> {
        self.messages = self.missing_fields();
        if !self.messages.is_empty() {
            return Err(ClientError::validation(self.messages.clone()));
        }

        api.register(&self.request).await.inspect_err(|e| {
            warn!(error = %e, "注册失败");
        })
    }
}

/// 修改密码表单
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub token: String,
    pub body: ChangePasswordDto,
    pub messages: Vec<String>,
}

impl ChangePasswordForm {
    pub fn new(token: impl Into<String>, password: &str, confirm_password: &str) -> Self {
        Self {
            token: token.into(),
            body: ChangePasswordDto {
                password: password.to_string(),
                confirm_password: confirm_password.to_string(),
            },
            messages: Vec::new(),
        }
    }

    fn invalid_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if is_missing(&self.body.password) {
            fields.push("password".to_string());
        }
        if self.body.password != self.body.confirm_password {
            fields.push("confirmPassword".to_string());
        }
        fields
    }

    /// 两次输入一致才发送请求
    pub async fn submit(&mut self, api: &UserApi) -> Result<()> {
        self.messages = self.invalid_fields();
        if !self.messages.is_empty() {
            return Err(ClientError::validation(self.messages.clone()));
        }
        api.change_password(&self.token, &self.body).await
    }
}
