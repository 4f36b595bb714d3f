//! Memory Layer - In-Memory State Management
//!
//! 请求级 Key/Value 存储

mod request_store;

pub use request_store::RequestStore;
