//! Editor Adapter - 编辑器客户端模块
//!
//! - HttpEditorClient: EditorApiPort 的 HTTP 实现
//! - ChapterIndex: 本地章节顺序
//! - AutosaveBuffer: 自动保存脏集合

mod autosave;
pub(crate) mod chapter_index;
mod http_editor_client;

pub use autosave::{AutosaveBuffer, FlushReport};
pub use chapter_index::ChapterIndex;
pub use http_editor_client::{HttpEditorClient, HttpEditorClientConfig};
