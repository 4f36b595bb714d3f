//! 书籍正文

use askama::Template;

use super::chapter::{chapter_label, ChapterView};
use super::ViewHelper;
use crate::application::ports::EntityRecord;
use crate::domain::book::Book;
use crate::domain::settings::Settings;

/// 书籍正文：目录 + 全部章节 + 角色列表，样式取自书籍设置
pub struct BookView<'a> {
    pub settings: &'a Settings,
    pub characters: &'a [EntityRecord],
    pub readonly: bool,
}

struct TocEntry {
    id: u32,
    label: String,
}

#[derive(Template)]
#[template(path = "book.html")]
struct BookTemplate<'a> {
    id: i64,
    title: &'a str,
    editable: bool,
    autosave: u8,
    comments: u8,
    style: String,
    toc: Vec<TocEntry>,
    chapters: String,
    characters: &'a [EntityRecord],
}

impl<'a> BookView<'a> {
    /// 设置 → 内联样式
    pub fn style(&self) -> String {
        let s = self.settings;
        format!(
            "font-family:{};font-size:{}px;color:{};line-height:{};text-align:{};background:{};padding:{}px",
            s.font_family,
            s.font_size,
            s.font_color,
            s.line_height,
            s.alignment.as_str(),
            s.background,
            s.page_paddings,
        )
    }
}

impl<'a, 'b> ViewHelper<&'b Book> for BookView<'a> {
    fn render(&self, book: &'b Book) -> Result<String, askama::Error> {
        // 快照永远只读
        let editable = !self.readonly && !book.is_snapshot();
        let chapter_view = ChapterView { editable };

        let toc = book
            .chapters()
            .map(|chapter| TocEntry {
                id: chapter.id().value(),
                label: chapter_label(chapter),
            })
            .collect();

        let chapters = book
            .chapters()
            .map(|chapter| chapter_view.render(chapter))
            .collect::<Result<String, _>>()?;

        BookTemplate {
            id: book.id().value(),
            title: book.title(),
            editable,
            autosave: u8::from(self.settings.autosave && editable),
            comments: u8::from(self.settings.display_comments),
            style: self.style(),
            toc,
            chapters,
            characters: self.characters,
        }
        .render()
    }
}
