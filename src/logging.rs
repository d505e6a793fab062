//! # 日志配置模块
//!
//! 初始化 tracing 订阅器，并提供日志相关的环境变量说明

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 对令牌做脱敏处理，日志里只暴露长度
pub fn redact_token(token: &str) -> String {
    if token.is_empty() {
        "<empty>".to_string()
    } else {
        format!("<redacted:{}>", token.len())
    }
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先；否则使用传入级别，并对本 crate 开启 debug
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let default_filter = format!("{level},task_client=debug,reqwest=warn,hyper=warn");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    // 重复初始化（例如测试里）时静默忽略
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// 环境变量设置指南
pub fn print_logging_help() {
    println!("📋 日志配置指南:");
    println!("  RUST_LOG=info                      # 标准日志级别");
    println!("  RUST_LOG=debug                     # 调试级别");
    println!("  RUST_LOG=task_client=trace         # 客户端详细追踪");
    println!("  RUST_LOG=info,reqwest=debug        # 查看底层HTTP传输");
    println!();
    println!("💡 组合示例:");
    println!("  RUST_LOG=info,task_client=debug    # 默认：请求构建与会话事件");
    println!("  RUST_LOG=warn                      # 仅存储降级、网络与授权失败");
    println!();
    println!("🔒 令牌内容永远不会写入日志，仅记录是否存在");
}
