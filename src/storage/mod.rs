//! # 凭据存储模块
//!
//! 持久化访问令牌和刷新令牌。底层是按来源隔离的键值存储：
//! 文件后端可跨进程重启保留，内存后端仅用于测试和临时会话。

mod credential_store;
mod file;
mod memory;

pub use credential_store::{ACCESS_TOKEN_KEY, Credential, CredentialStore, REFRESH_TOKEN_KEY};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;

/// 键值存储接口
///
/// 所有方法都是同步的；一次调用内的多个键读取或修改对调用方是原子的。
pub trait KeyValueStorage: Send + Sync {
    /// 读取一个键，不存在时返回 `None`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 一次性读取多个键，结果与 `keys` 顺序一致
    fn get_items(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError>;

    /// 写入一个键，覆盖已有值
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// 一次性删除多个键
    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// 根据配置创建存储后端
pub fn storage_from_config(config: &StorageConfig) -> Arc<dyn KeyValueStorage> {
    match config.backend {
        StorageBackend::File => Arc::new(FileStorage::new(config.resolved_path())),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    }
}
