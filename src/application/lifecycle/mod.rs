//! Lifecycle - 请求生命周期
//!
//! 四个固定扩展点：request-init → controller-init → action-init → shutdown

mod book_lifecycle;
mod context;
mod dispatcher;

pub use book_lifecycle::{BookLifecycle, LifecycleConfig};
pub use context::{RequestInfo, RequestInitOutcome, ViewContext};
pub use dispatcher::{LifecycleDispatcher, LifecycleListener, LifecycleStage, RequestStorePort};
