//! # Task Client 命令行
//!
//! 登录、刷新、登出以及 OAuth 授权流程的命令行入口

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

use task_client::{
    ClientConfig, Result, TaskClient,
    api::UserRequest,
    auth::{BrowserNavigator, ExecutionContext, FlowState, LoginForm, RegistrationForm},
    config::{ConfigLoader, StorageBackend},
    logging,
};

/// 任务管理服务客户端
#[derive(Parser, Debug)]
#[command(name = "task-client")]
#[command(version, about = "Task manager client: sessions and OAuth sign-in")]
#[command(propagate_version = true)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 用户名密码登录并保存令牌
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// 清除已保存的令牌
    Logout,
    /// 用已保存的刷新令牌换取新令牌
    Refresh,
    /// 查询当前令牌对应的用户ID
    Whoami,
    /// 注册新用户
    Register {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,
    },
    /// 发起 OAuth 授权，在浏览器中打开身份提供方页面
    OauthStart,
    /// 处理身份提供方重定向回来的地址
    OauthCallback {
        /// 完整的回调地址
        url: Url,
    },
    /// 显示当前会话状态
    Status,
    /// 日志环境变量说明
    LoggingHelp,
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    match path {
        Some(path) => ConfigLoader::from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if matches!(args.command, Command::LoggingHelp) {
        logging::print_logging_help();
        return Ok(());
    }

    let config = load_config(args.config.as_ref())?;
    logging::init_logging(Some(&config.logging.level));

    let navigator = Arc::new(BrowserNavigator::new());
    let client = TaskClient::from_config(&config, navigator)?;

    if let Err(e) = run(args.command, &config, &client).await {
        error!(error = %e, category = ?e.category(), "命令执行失败");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, config: &ClientConfig, client: &TaskClient) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            remember_me,
        } => {
            let mut form = LoginForm::new(username, password);
            form.request.remember_me = remember_me;
            if form.submit(&client.session).await.is_some() {
                println!("✅ 登录成功");
            } else {
                for message in &form.errors {
                    println!("❌ {message}");
                }
            }
        }
        Command::Logout => {
            client.session.logout()?;
            println!("✅ 已登出");
        }
        Command::Refresh => {
            let credential = client.session.refresh_session().await?;
            println!("✅ 会话已刷新 (已认证: {})", credential.is_authenticated());
        }
        Command::Whoami => match client.session.current_user_id().await? {
            Some(user_id) => println!("{user_id}"),
            None => println!("未登录"),
        },
        Command::Register {
            username,
            email,
            password,
            first_name,
            last_name,
            birth_date,
        } => {
            let mut form = RegistrationForm::new(UserRequest {
                username,
                email,
                password,
                first_name,
                last_name,
                birth_date,
            });
            match form.submit(&client.api).await {
                Ok(user) => println!("✅ 注册成功: {}", user.username.unwrap_or_default()),
                Err(_) if !form.messages.is_empty() => {
                    println!("❌ 缺少必填字段: {}", form.messages.join(", "));
                }
                Err(e) => return Err(e),
            }
        }
        Command::OauthStart => {
            let state = client
                .oauth
                .begin_authorization(ExecutionContext::detect(), &BrowserNavigator::new())
                .await;
            report_flow(&state);
        }
        Command::OauthCallback { url } => {
            let state = client
                .oauth
                .handle_callback(ExecutionContext::detect(), &url)
                .await;
            report_flow(&state);
        }
        Command::Status => {
            let authenticated = client.store.is_authenticated().unwrap_or(false);
            println!("后端地址: {}", config.api.root_url);
            match config.storage.backend {
                StorageBackend::File => {
                    println!("凭据文件: {}", config.storage.resolved_path().display());
                }
                StorageBackend::Memory => println!("凭据存储: 内存"),
            }
            println!("已认证: {authenticated}");
        }
        Command::LoggingHelp => logging::print_logging_help(),
    }
    Ok(())
}

fn report_flow(state: &FlowState) {
    info!(state = %state, "授权流程结束");
    match state {
        FlowState::ExchangeFailed(e) => println!("❌ {e}"),
        FlowState::Idle => println!("ℹ️ 非交互环境，未执行授权操作"),
        other => println!("✅ {other}"),
    }
}
