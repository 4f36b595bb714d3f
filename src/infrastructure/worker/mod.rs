//! Worker Layer - Background Task Processing
//!
//! 实现 AutosaveWorker，定时刷新编辑器的自动保存缓冲区

mod autosave_worker;

pub use autosave_worker::{AutosaveWorker, AutosaveWorkerConfig};
