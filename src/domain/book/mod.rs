//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - Book 聚合（章节树）
//! - 章节 / 段落实体
//! - 快照

mod aggregate;
mod entities;
mod errors;
mod snapshot;
mod value_objects;

pub use aggregate::Book;
pub use entities::{shift_for_delete, shift_for_insert, Chapter, Section};
pub use errors::BookError;
pub use snapshot::Snapshot;
pub use value_objects::{BookId, ChapterId, SectionId, SectionKind, SnapshotId};
