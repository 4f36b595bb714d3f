//! Request-Scoped Store Implementation
//!
//! 每个请求新建一个实例，随请求结束丢弃，不做任何持久化。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

use crate::application::ports::{get_typed, put_typed, KeyValueStore, StoreError, StoreValue};

/// 请求级存储
pub struct RequestStore {
    values: DashMap<String, StoreValue>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 以具体类型写入
    pub fn put_typed<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: T,
        overwrite: bool,
    ) -> Result<bool, StoreError> {
        put_typed(self, key, value, overwrite)
    }

    /// 以具体类型读取
    pub fn get_typed<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, StoreError> {
        get_typed(self, key)
    }
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for RequestStore {
    type Value = StoreValue;

    fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.values.contains_key(key))
    }

    fn put(&self, key: &str, value: StoreValue, overwrite: bool) -> Result<bool, StoreError> {
        match self.values.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if !overwrite {
                    return Err(StoreError::AlreadyExists(key.to_string()));
                }
                entry.insert(value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
        tracing::trace!(key = %key, overwrite, "Request store put");
        self.has(key)
    }

    fn get(&self, key: &str) -> Result<StoreValue, StoreError> {
        self.values
            .get(key)
            .map(|v| v.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        self.values
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(!self.values.contains_key(key))
    }
}
