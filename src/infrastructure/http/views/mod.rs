//! View Helpers - HTML 片段渲染
//!
//! 每个 helper 都是纯函数：输入参数（加上构造时给定的请求上下文）→ HTML 字符串。
//! 模板位于 `templates/`，由 askama 编译并自动转义；段落内容本身就是存储的 HTML，原样输出。

mod book;
mod chapter;
mod character;
mod error_page;
mod layout;
mod notice;
mod settings_form;
mod snapshot;

pub use book::BookView;
pub use chapter::ChapterView;
pub use character::CharacterView;
pub use error_page::ErrorPage;
pub use layout::Layout;
pub use notice::{Notice, NoticeKind};
pub use settings_form::SettingsForm;
pub use snapshot::{format_ago, format_date, SnapshotOverview, SnapshotPage};

/// View helper 契约
pub trait ViewHelper<P> {
    fn render(&self, params: P) -> Result<String, askama::Error>;
}

/// 拼接站点根路径
pub(crate) fn url(root: &str, path: &str) -> String {
    format!("{}{}", root.trim_end_matches('/'), path)
}
