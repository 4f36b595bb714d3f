//! 设置表单

use askama::Template;

use super::{url, ViewHelper};
use crate::domain::settings::{Alignment, Settings};

const ALIGNMENTS: [Alignment; 4] = [
    Alignment::Left,
    Alignment::Center,
    Alignment::Right,
    Alignment::Justify,
];

/// 设置表单，字段名与 `POST /settings/update` 一致
pub struct SettingsForm<'a> {
    pub url_root: &'a str,
}

struct AlignmentOption {
    value: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "settings_form.html")]
struct SettingsFormTemplate<'a> {
    action: String,
    book_id: i64,
    autosave: bool,
    font_family: &'a str,
    font_size: u32,
    font_color: &'a str,
    line_height: f32,
    alignments: Vec<AlignmentOption>,
    background: &'a str,
    page_paddings: u32,
    display_comments: bool,
}

impl<'a, 's> ViewHelper<&'s Settings> for SettingsForm<'a> {
    fn render(&self, settings: &'s Settings) -> Result<String, askama::Error> {
        SettingsFormTemplate {
            action: url(self.url_root, "/settings/update"),
            book_id: settings.book_id().value(),
            autosave: settings.autosave,
            font_family: &settings.font_family,
            font_size: settings.font_size,
            font_color: &settings.font_color,
            line_height: settings.line_height,
            alignments: ALIGNMENTS
                .iter()
                .map(|a| AlignmentOption {
                    value: a.as_str(),
                    selected: *a == settings.alignment,
                })
                .collect(),
            background: &settings.background,
            page_paddings: settings.page_paddings,
            display_comments: settings.display_comments,
        }
        .render()
    }
}
