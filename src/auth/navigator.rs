//! 导航抽象
//!
//! 会话层和授权流程只通过这里的接口切换页面或打开外部地址。

use std::io::IsTerminal;
use std::sync::Mutex;
use tracing::info;
use url::Url;

use crate::error::{ClientError, Result};

/// 登录成功后进入的路由
pub const TASKS_ROUTE: &str = "tasks";

/// 导航目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// 应用内部路由
    Route(String),
    /// 离开应用，打开外部地址
    External(Url),
}

impl Destination {
    pub fn route(name: impl Into<String>) -> Self {
        Self::Route(name.into())
    }
}

/// 执行环境是否能够进行网络请求和页面跳转
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Interactive,
    /// 预渲染、批处理等场景，所有授权动作都应空操作
    NonInteractive,
}

impl ExecutionContext {
    /// 根据标准输出是否连接终端推断
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Interactive
        } else {
            Self::NonInteractive
        }
    }

    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// 导航接口
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &Destination) -> Result<()>;
}

/// 命令行环境下的导航：外部地址交给系统浏览器，路由只记录
#[derive(Debug, Default)]
pub struct BrowserNavigator {
    current_route: Mutex<Option<String>>,
}

impl BrowserNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次切换到的路由
    pub fn current_route(&self) -> Option<String> {
        self.current_route
            .lock()
            .ok()
            .and_then(|route| route.clone())
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, destination: &Destination) -> Result<()> {
        match destination {
            Destination::Route(route) => {
                info!(route = %route, "切换路由");
                if let Ok(mut current) = self.current_route.lock() {
                    *current = Some(route.clone());
                }
                Ok(())
            }
            Destination::External(url) => {
                info!(host = url.host_str().unwrap_or_default(), "打开外部地址");
                webbrowser::open(url.as_str())
                    .map_err(|e| ClientError::network_with_source("无法打开系统浏览器", e))
            }
        }
    }
}
