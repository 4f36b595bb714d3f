//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Book Context: 书籍 / 章节 / 段落 / 快照
//! - Settings Context: 每本书的排版设置

pub mod book;
pub mod settings;

mod user;

pub use user::{User, UserId};
