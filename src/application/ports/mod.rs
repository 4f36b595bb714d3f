//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod editor_api;
mod repositories;
mod store;

pub use editor_api::{EditorApiPort, EditorError, SectionUpdate};
pub use repositories::{
    BookRecord, BookRepositoryPort, ChapterDeletion, EntityRecord, EntityRepositoryPort,
    RepositoryError, SectionRecord, SettingsRepositoryPort, SnapshotRepositoryPort,
};
pub use store::{decode, encode, get_typed, keys, put_typed, KeyValueStore, StoreError, StoreValue};
