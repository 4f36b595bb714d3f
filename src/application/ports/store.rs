//! Key/Value Store Port - 请求级 / 进程级存储
//!
//! 两种实现共享同一契约：
//! - RequestStore: 单个请求生命周期内的内存 map（infrastructure/memory）
//! - SledCacheStore: 跨请求共享的缓存（infrastructure/persistence/sled）

use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Store 错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists in the store")]
    AlreadyExists(String),

    #[error("{0} does not exist in the store")]
    NotFound(String),

    #[error("{0} holds a value of another type")]
    TypeMismatch(String),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// 请求级存储中的值（任意类型，请求内共享）
pub type StoreValue = Arc<dyn Any + Send + Sync>;

/// 请求级存储的固定键
pub mod keys {
    pub const USER: &str = "user";
    pub const BOOK: &str = "book";
    pub const SETTINGS: &str = "settings";
}

/// Key/Value Store Port
///
/// 不变量：一个 key 在其作用域内要么不存在，要么只绑定一个值。
pub trait KeyValueStore: Send + Sync {
    type Value;

    /// key 当前是否已绑定
    fn has(&self, key: &str) -> Result<bool, StoreError>;

    /// 绑定 key
    ///
    /// - key 已绑定且 `overwrite = false` 时返回 `AlreadyExists`，原值不变
    /// - 返回调用后 `has(key)` 的结果（作为后置条件检查）
    /// - 不覆盖时为原子的“不存在才绑定”
    fn put(&self, key: &str, value: Self::Value, overwrite: bool) -> Result<bool, StoreError>;

    /// 读取 key，未绑定时返回 `NotFound`
    fn get(&self, key: &str) -> Result<Self::Value, StoreError>;

    /// 删除 key，未绑定时返回 `NotFound`；返回删除后 key 是否已不存在
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// 以具体类型写入请求级存储
pub fn put_typed<T>(
    store: &dyn KeyValueStore<Value = StoreValue>,
    key: &str,
    value: T,
    overwrite: bool,
) -> Result<bool, StoreError>
where
    T: Any + Send + Sync,
{
    store.put(key, Arc::new(value), overwrite)
}

/// 以具体类型读取请求级存储
pub fn get_typed<T>(
    store: &dyn KeyValueStore<Value = StoreValue>,
    key: &str,
) -> Result<Arc<T>, StoreError>
where
    T: Any + Send + Sync,
{
    store
        .get(key)?
        .downcast::<T>()
        .map_err(|_| StoreError::TypeMismatch(key.to_string()))
}

/// 缓存值编码（bincode）
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// 缓存值解码（bincode）
pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
