//! 凭据存储
//!
//! 访问令牌与刷新令牌各占一个固定键。存储本身不做任何格式校验，
//! 任何字符串（包括空串）都按原样保存。

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::KeyValueStorage;
use crate::error::Result;

/// 访问令牌的存储键
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// 刷新令牌的存储键
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// 会话凭据快照，整体替换，不做局部修改
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credential {
    /// 由一对令牌构造
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// 是否处于已认证状态（访问令牌非空）
    pub fn is_authenticated(&self) -> bool {
        self.access_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_deref().map(crate::logging::redact_token);
        f.debug_struct("Credential")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

/// 凭据存储，显式构造后以 `Arc` 共享给需要它的组件
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// 基于给定的键值存储创建
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// 保存访问令牌
    pub fn save(&self, access_token: &str) -> Result<()> {
        self.storage.set_item(ACCESS_TOKEN_KEY, access_token)?;
        debug!("访问令牌已保存");
        Ok(())
    }

    /// 保存刷新令牌
    pub fn save_refresh(&self, refresh_token: &str) -> Result<()> {
        self.storage.set_item(REFRESH_TOKEN_KEY, refresh_token)?;
        debug!("刷新令牌已保存");
        Ok(())
    }

    /// 读取访问令牌
    pub fn get_access(&self) -> Result<Option<String>> {
        Ok(self.storage.get_item(ACCESS_TOKEN_KEY)?)
    }

    /// 读取刷新令牌
    pub fn get_refresh(&self) -> Result<Option<String>> {
        Ok(self.storage.get_item(REFRESH_TOKEN_KEY)?)
    }

    /// 同时清除两个令牌
    pub fn clear(&self) -> Result<()> {
        self.storage
            .remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])?;
        info!("会话凭据已清除");
        Ok(())
    }

    /// 保存完整凭据；缺失的字段保持原值
    pub fn store_credential(&self, credential: &Credential) -> Result<()> {
        if let Some(access_token) = &credential.access_token {
            self.save(access_token)?;
        }
        if let Some(refresh_token) = &credential.refresh_token {
            self.save_refresh(refresh_token)?;
        }
        Ok(())
    }

    /// 当前凭据快照，两个令牌在一次存储读取中取得
    pub fn credential(&self) -> Result<Credential> {
        let mut tokens = self
            .storage
            .get_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])?
            .into_iter();
        Ok(Credential {
            access_token: tokens.next().flatten(),
            refresh_token: tokens.next().flatten(),
        })
    }

    /// 派生的会话状态：访问令牌非空即视为已认证
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.credential()?.is_authenticated())
    }
}
