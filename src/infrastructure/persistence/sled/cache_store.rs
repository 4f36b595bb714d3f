//! Sled-based Process-Wide Cache Store Implementation
//!
//! 跨请求共享；过期策略交给缓存层，调用方不设置 TTL。

use sled::{CompareAndSwapError, Db, Tree};
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{KeyValueStore, StoreError};

/// 存储所在的 sled tree
const STORE_TREE: &str = "store";

/// Sled 缓存存储配置
#[derive(Debug, Clone)]
pub struct SledCacheConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledCacheConfig {
    fn default() -> Self {
        Self {
            db_path: "data/cache.sled".to_string(),
        }
    }
}

/// Sled 缓存存储
pub struct SledCacheStore {
    db: Db,
    tree: Tree,
}

impl SledCacheStore {
    /// 创建新的存储实例
    pub fn new(config: &SledCacheConfig) -> Result<Self, StoreError> {
        let db = sled::open(&config.db_path).map_err(|e| StoreError::Backend(e.to_string()))?;
        let tree = db
            .open_tree(STORE_TREE)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            entries = tree.len(),
            "SledCacheStore initialized"
        );

        Ok(Self { db, tree })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let config = SledCacheConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for SledCacheStore {
    type Value = Vec<u8>;

    fn has(&self, key: &str) -> Result<bool, StoreError> {
        self.tree
            .contains_key(key)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn put(&self, key: &str, value: Vec<u8>, overwrite: bool) -> Result<bool, StoreError> {
        if overwrite {
            self.tree
                .insert(key, value)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        } else {
            // 单次 CAS 完成“不存在才绑定”，避免 has + insert 的竞态
            let swapped = self
                .tree
                .compare_and_swap(key, None::<&[u8]>, Some(value))
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            if let Err(CompareAndSwapError { .. }) = swapped {
                return Err(StoreError::AlreadyExists(key.to_string()));
            }
        }

        tracing::debug!(key = %key, overwrite, "Cache store put");
        self.has(key)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.tree
            .get(key)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|value| value.to_vec())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        self.tree
            .remove(key)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        tracing::debug!(key = %key, "Cache store remove");
        Ok(!self.has(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_put_get_remove() {
        let dir = tempdir().unwrap();
        let store = SledCacheStore::open(dir.path().join("test.sled")).unwrap();

        assert!(!store.has("k").unwrap());
        assert!(store.put("k", vec![1, 2, 3], false).unwrap());
        assert!(store.has("k").unwrap());
        assert_eq!(store.get("k").unwrap(), vec![1, 2, 3]);

        assert!(store.remove("k").unwrap());
        assert!(!store.has("k").unwrap());
        assert!(matches!(store.remove("k"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.get("k"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_put_without_overwrite_keeps_existing() {
        let dir = tempdir().unwrap();
        let store = SledCacheStore::open(dir.path().join("test.sled")).unwrap();

        store.put("k", vec![1], false).unwrap();
        let result = store.put("k", vec![2], false);

        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(store.get("k").unwrap(), vec![1]);

        assert!(store.put("k", vec![2], true).unwrap());
        assert_eq!(store.get("k").unwrap(), vec![2]);
    }

    #[test]
    fn test_concurrent_bind_if_absent_has_single_winner() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SledCacheStore::open(dir.path().join("test.sled")).unwrap());
        let winners = Arc::new(AtomicUsize::new(0));

        let threads: Vec<_> = (0..8u8)
            .map(|i| {
                let store = store.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    if store.put("race", vec![i], false).is_ok() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }
}
