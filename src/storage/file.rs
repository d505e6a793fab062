//! 文件键值存储
//!
//! 所有键保存在一个 JSON 对象文件中；每次写入先写同目录下的随机临时文件再
//! `persist` 到目标路径，读者要么看到旧内容，要么看到新内容。

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::KeyValueStorage;
use crate::error::StorageError;

/// 凭据文件权限：只有所有者可读写
#[cfg(unix)]
const CREDENTIAL_FILE_MODE: u32 = 0o600;

/// JSON 文件存储
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// 串行化同一进程内的读改写
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// 创建文件存储；文件在首次写入时创建
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 存储文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // 随机文件名 + O_EXCL，多个进程同时写入互不干扰
        let mut tmp = NamedTempFile::new_in(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(CREDENTIAL_FILE_MODE))?;
        }

        let content = serde_json::to_vec_pretty(items)?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        debug!(path = %self.path.display(), entries = items.len(), "凭据文件已写入");
        Ok(())
    }

    /// 读改写；`discard_corrupted` 为真时损坏的文件按空内容处理
    fn modify<F>(&self, discard_corrupted: bool, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;
        let mut items = match self.read_all() {
            Err(StorageError::Corrupted(e)) if discard_corrupted => {
                warn!(path = %self.path.display(), error = %e, "凭据文件已损坏，按空内容重写");
                BTreeMap::new()
            }
            other => other?,
        };
        f(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn get_items(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let mut items = self.read_all()?;
        Ok(keys.iter().map(|key| items.remove(*key)).collect())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(false, |items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.modify(true, |items| {
            for key in keys {
                items.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.json"));
        assert_eq!(storage.get_item("accessToken").unwrap(), None);
    }

    #[test]
    fn test_values_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileStorage::new(&path).set_item("accessToken", "abc").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("accessToken").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_remove_items_in_one_write() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));
        storage.set_item("accessToken", "a").unwrap();
        storage.set_item("refreshToken", "r").unwrap();
        storage.set_item("other", "keep").unwrap();

        storage.remove_items(&["accessToken", "refreshToken"]).unwrap();

        assert_eq!(storage.get_item("accessToken").unwrap(), None);
        assert_eq!(storage.get_item("refreshToken").unwrap(), None);
        assert_eq!(storage.get_item("other").unwrap().as_deref(), Some("keep"));
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("accessToken"),
            Err(StorageError::Corrupted(_))
        ));
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let storage = FileStorage::new(blocker.join("credentials.json"));
        assert!(matches!(
            storage.set_item("accessToken", "x"),
            Err(StorageError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_credential_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileStorage::new(&path).set_item("accessToken", "secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_concurrent_writers_on_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let handles: Vec<_> = ["accessToken", "refreshToken"]
            .into_iter()
            .map(|key| {
                let storage = FileStorage::new(&path);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|i| storage.set_item(key, &i.to_string()))
                        .filter(Result::is_err)
                        .count()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 0);
        }
        assert!(FileStorage::new(&path).get_item("accessToken").is_ok());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_remove_items_recovers_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        storage.remove_items(&["accessToken", "refreshToken"]).unwrap();

        assert_eq!(storage.get_item("accessToken").unwrap(), None);
        assert!(matches!(
            FileStorage::new(&path).set_item("accessToken", "a"),
            Ok(())
        ));
    }

    #[test]
    fn test_get_items_reads_one_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));
        storage.set_item("accessToken", "a").unwrap();

        assert_eq!(
            storage.get_items(&["accessToken", "refreshToken"]).unwrap(),
            vec![Some("a".to_string()), None]
        );
    }
}
