//! Settings Context - 书籍设置上下文
//!
//! 字体、排版、自动保存等每本书唯一的设置

mod entity;
mod errors;

pub use entity::{Alignment, Settings, SettingsImport};
pub use errors::SettingsError;
