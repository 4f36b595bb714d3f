//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod book_handlers;
mod entity_handlers;
mod settings_handlers;

pub use book_handlers::*;
pub use entity_handlers::*;
pub use settings_handlers::*;
