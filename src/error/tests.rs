//! # 错误处理测试

use crate::error::{ClientError, Context, ErrorCategory, StorageError};
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = ClientError::config("测试配置错误");
    assert!(matches!(err, ClientError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = ClientError::config_with_source("配置文件加载失败", io_err);

    assert!(matches!(err, ClientError::Config { .. }));
    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_http_error_extracts_server_message() {
    let err = ClientError::http(401, r#"{"message":"bad credentials"}"#);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message(), Some("bad credentials"));
    assert_eq!(err.category(), ErrorCategory::Caller);
}

#[test]
fn test_http_error_without_message_field() {
    let err = ClientError::http(500, r#"{"error":"boom"}"#);
    assert_eq!(err.server_message(), None);
    assert_eq!(err.category(), ErrorCategory::Remote);

    let err = ClientError::http(502, "<html>Bad Gateway</html>");
    assert_eq!(err.server_message(), None);

    let err = ClientError::http(400, r#"{"message":""}"#);
    assert_eq!(err.server_message(), None);
}

#[test]
fn test_validation_error_lists_fields() {
    let err = ClientError::validation(["username", "password"]);
    match &err {
        ClientError::Validation { fields } => assert_eq!(fields, &["username", "password"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.category(), ErrorCategory::Caller);
}

#[test]
fn test_storage_error_conversion() {
    let err: ClientError = StorageError::unavailable("quota exceeded").into();
    assert!(matches!(err, ClientError::StorageUnavailable { .. }));
    assert_eq!(err.category(), ErrorCategory::Storage);
    assert!(err.source().unwrap().to_string().contains("quota exceeded"));
}

#[test]
fn test_auto_conversion_from_toml_error() {
    let invalid_toml = "invalid = toml = syntax";
    let toml_err = toml::from_str::<toml::Value>(invalid_toml).unwrap_err();
    let err: ClientError = toml_err.into();

    assert!(matches!(err, ClientError::Config { .. }));
    assert!(err.to_string().contains("配置错误: TOML解析失败"));
}

#[test]
fn test_auto_conversion_from_url_error() {
    let url_err = url::Url::parse("not a url").unwrap_err();
    let err: ClientError = url_err.into();
    assert!(matches!(err, ClientError::RequestBuild { .. }));
}

#[test]
fn test_error_context_trait() {
    let result: Result<(), StorageError> = Err(StorageError::LockPoisoned);

    let err = result
        .with_context(|| "读取访问令牌失败".to_string())
        .unwrap_err();
    assert!(matches!(err, ClientError::Context { .. }));
    assert!(err.to_string().starts_with("读取访问令牌失败"));
    assert_eq!(err.category(), ErrorCategory::Storage);
}

#[test]
fn test_context_keeps_server_message() {
    let err = Err::<(), _>(ClientError::http(400, r#"{"message":"taken"}"#))
        .context("注册失败")
        .unwrap_err();
    assert_eq!(err.server_message(), Some("taken"));
}

#[test]
fn test_error_macros() {
    let err = crate::config_error!("配置错误");
    assert!(matches!(err, ClientError::Config { .. }));

    let err = crate::auth_exchange_error!("缺少授权码");
    assert!(matches!(err, ClientError::AuthExchange { .. }));
}

#[test]
fn test_ensure_config_macro() {
    fn check(timeout: u64) -> crate::error::Result<()> {
        crate::ensure_config!(timeout > 0, "超时时间必须大于0: {}", timeout);
        Ok(())
    }

    assert!(check(30).is_ok());
    assert!(matches!(check(0), Err(ClientError::Config { .. })));
}
