//! SQLite Persistence - SQLite 数据库持久化实现

mod book_repo;
mod database;
mod entity_repo;
mod repository;
mod settings_repo;
mod snapshot_repo;

pub use book_repo::*;
pub use database::*;
pub use entity_repo::*;
pub use repository::{ColumnValue, SqliteRepository, TableRecord};
pub use settings_repo::*;
pub use snapshot_repo::*;
