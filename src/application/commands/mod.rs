//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod chapter_commands;
mod section_commands;
mod settings_commands;
mod snapshot_commands;

pub mod handlers;

pub use chapter_commands::*;
pub use section_commands::*;
pub use settings_commands::*;
pub use snapshot_commands::*;
