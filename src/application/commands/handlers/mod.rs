//! Command Handlers

mod chapter_handlers;
mod section_handlers;
mod settings_handlers;
mod snapshot_handlers;

pub use chapter_handlers::{DeleteChapterHandler, InsertChapterHandler, NEW_CHAPTER_TITLE};
pub use section_handlers::UpdateSectionHandler;
pub use settings_handlers::UpdateSettingsHandler;
pub use snapshot_handlers::CreateSnapshotHandler;
