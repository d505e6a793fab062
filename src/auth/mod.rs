//! # 认证模块
//!
//! OAuth 重定向流程、会话生命周期与表单提交

pub mod forms;
pub mod navigator;
pub mod oauth_flow;
pub mod session;

pub use forms::{ChangePasswordForm, LOGIN_FALLBACK_MESSAGE, LoginForm, RegistrationForm};
pub use navigator::{BrowserNavigator, Destination, ExecutionContext, Navigator, TASKS_ROUTE};
pub use oauth_flow::{FlowState, OAuthRedirectFlow};
pub use session::SessionService;
