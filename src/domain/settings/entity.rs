//! Settings Context - Entity

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::domain::book::BookId;

/// 文本对齐方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    Justify,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// 设置导入数据（九个字段全量替换）
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsImport {
    pub autosave: bool,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub line_height: f32,
    pub alignment: Alignment,
    pub background: String,
    pub page_paddings: u32,
    pub display_comments: bool,
}

/// 书籍设置
///
/// 不变量:
/// - 每本书唯一一份（隐式创建）
/// - 只通过 import 全量替换后保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    book_id: BookId,
    pub autosave: bool,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub line_height: f32,
    pub alignment: Alignment,
    pub background: String,
    pub page_paddings: u32,
    pub display_comments: bool,
}

impl Settings {
    /// 新书的默认设置
    pub fn defaults(book_id: BookId) -> Self {
        Self {
            book_id,
            autosave: true,
            font_family: "Georgia".to_string(),
            font_size: 16,
            font_color: "#333333".to_string(),
            line_height: 1.6,
            alignment: Alignment::default(),
            background: "#FFFFFF".to_string(),
            page_paddings: 40,
            display_comments: true,
        }
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// 导入全部九个字段
    ///
    /// 任一字段无效则整体拒绝，原值保持不变。
    pub fn import(&mut self, data: SettingsImport) -> Result<(), SettingsError> {
        validate(&data)?;

        self.autosave = data.autosave;
        self.font_family = data.font_family;
        self.font_size = data.font_size;
        self.font_color = data.font_color;
        self.line_height = data.line_height;
        self.alignment = data.alignment;
        self.background = data.background;
        self.page_paddings = data.page_paddings;
        self.display_comments = data.display_comments;

        Ok(())
    }
}

fn validate(data: &SettingsImport) -> Result<(), SettingsError> {
    let family = data.font_family.trim();
    if family.is_empty() {
        return Err(SettingsError::invalid("font_family", "不能为空"));
    }
    if family.len() > 100 || family.contains(['<', '>', ';', '{', '}']) {
        return Err(SettingsError::invalid("font_family", family));
    }

    if !(8..=72).contains(&data.font_size) {
        return Err(SettingsError::invalid(
            "font_size",
            format!("{} 不在 8-72 之间", data.font_size),
        ));
    }

    if !is_hex_color(&data.font_color) {
        return Err(SettingsError::invalid("font_color", &data.font_color));
    }

    if !(0.5..=4.0).contains(&data.line_height) {
        return Err(SettingsError::invalid(
            "line_height",
            format!("{} 不在 0.5-4.0 之间", data.line_height),
        ));
    }

    if !is_hex_color(&data.background) {
        return Err(SettingsError::invalid("background", &data.background));
    }

    if data.page_paddings > 200 {
        return Err(SettingsError::invalid(
            "page_paddings",
            format!("{} 超过 200", data.page_paddings),
        ));
    }

    Ok(())
}

/// `#rgb` 或 `#rrggbb`
fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_import() -> SettingsImport {
        SettingsImport {
            autosave: false,
            font_family: "Helvetica".to_string(),
            font_size: 18,
            font_color: "#000".to_string(),
            line_height: 1.4,
            alignment: Alignment::Left,
            background: "#FAFAFA".to_string(),
            page_paddings: 20,
            display_comments: false,
        }
    }

    #[test]
    fn test_import_replaces_all_fields() {
        let mut settings = Settings::defaults(BookId::new(3));
        settings.import(valid_import()).unwrap();

        assert_eq!(settings.book_id(), BookId::new(3));
        assert!(!settings.autosave);
        assert_eq!(settings.font_family, "Helvetica");
        assert_eq!(settings.font_size, 18);
        assert_eq!(settings.font_color, "#000");
        assert_eq!(settings.alignment, Alignment::Left);
        assert_eq!(settings.background, "#FAFAFA");
        assert_eq!(settings.page_paddings, 20);
        assert!(!settings.display_comments);
    }

    #[test]
    fn test_invalid_import_keeps_previous_values() {
        let mut settings = Settings::defaults(BookId::new(1));
        let mut data = valid_import();
        data.font_color = "red".to_string();

        let result = settings.import(data);

        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { field: "font_color", .. })
        ));
        assert_eq!(settings, Settings::defaults(BookId::new(1)));
    }

    #[test]
    fn test_font_size_bounds() {
        let mut settings = Settings::defaults(BookId::new(1));
        let mut data = valid_import();
        data.font_size = 200;
        assert!(settings.import(data).is_err());
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::from_str("justify"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_str("middle"), None);
    }

    #[test]
    fn test_alignment_defaults_to_justify() {
        assert_eq!(Alignment::default(), Alignment::Justify);
        assert_eq!(Settings::defaults(BookId::new(1)).alignment, Alignment::Justify);
    }
}
