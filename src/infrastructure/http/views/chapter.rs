//! 章节片段

use askama::Template;

use super::ViewHelper;
use crate::domain::book::{Chapter, Section, SectionKind};

/// 章节片段（插入章节的 AJAX 响应也用它）
pub struct ChapterView {
    /// 只读页面不输出编辑控件
    pub editable: bool,
}

struct SectionRow<'a> {
    tag: &'static str,
    class: &'static str,
    id: i64,
    order: u32,
    content: &'a str,
}

impl<'a> From<&'a Section> for SectionRow<'a> {
    fn from(section: &'a Section) -> Self {
        let (tag, class) = match section.kind() {
            SectionKind::Title => ("h2", "section title"),
            SectionKind::Content => ("div", "section content"),
        };
        SectionRow {
            tag,
            class,
            id: section.id().value(),
            order: section.order(),
            content: section.content(),
        }
    }
}

#[derive(Template)]
#[template(path = "chapter.html")]
struct ChapterTemplate<'a> {
    id: u32,
    editable: bool,
    sections: Vec<SectionRow<'a>>,
}

impl<'c> ViewHelper<&'c Chapter> for ChapterView {
    fn render(&self, chapter: &'c Chapter) -> Result<String, askama::Error> {
        ChapterTemplate {
            id: chapter.id().value(),
            editable: self.editable,
            sections: chapter.sections().iter().map(SectionRow::from).collect(),
        }
        .render()
    }
}

/// 章节标题（纯文本，用于目录）
pub(crate) fn chapter_label(chapter: &Chapter) -> String {
    match chapter.title() {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => format!("Chapter {}", chapter.id()),
    }
}
