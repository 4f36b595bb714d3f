//! Data Transfer Objects
//!
//! 浏览器以表单编码提交，字段名沿用页面上的命名。

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::settings::{Alignment, SettingsImport};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Chapter / Section / Entity
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChapterForm {
    pub book_id: i64,
    pub chapter_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct SectionUpdateForm {
    pub book_id: i64,
    pub section_id: i64,
    pub section_order: u32,
    #[serde(default)]
    pub section_content: String,
}

#[derive(Debug, Deserialize)]
pub struct EntityForm {
    pub book_id: i64,
    pub entity_id: i64,
    /// 目前只有 "view"
    #[serde(default)]
    pub action: Option<String>,
}

// ============================================================================
// Settings
// ============================================================================

/// 设置表单（九个字段）
///
/// 未勾选的复选框不会出现在表单里，按 false 处理。
#[derive(Debug, Deserialize)]
pub struct SettingsUpdateForm {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub setting_autosave: bool,
    pub setting_font_family: String,
    pub setting_font_size: u32,
    pub setting_font_color: String,
    pub setting_line_height: f32,
    pub setting_alignment: String,
    pub setting_background: String,
    pub setting_page_paddings: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub setting_display_comments: bool,
}

impl SettingsUpdateForm {
    /// 转换为导入数据；对齐方式无效时返回字段名
    pub fn into_import(self) -> Result<SettingsImport, String> {
        let alignment = Alignment::from_str(self.setting_alignment.trim())
            .ok_or_else(|| format!("Invalid setting_alignment: {}", self.setting_alignment))?;

        Ok(SettingsImport {
            autosave: self.setting_autosave,
            font_family: self.setting_font_family,
            font_size: self.setting_font_size,
            font_color: self.setting_font_color,
            line_height: self.setting_line_height,
            alignment,
            background: self.setting_background,
            page_paddings: self.setting_page_paddings,
            display_comments: self.setting_display_comments,
        })
    }
}

/// 表单布尔值："1" / "on" / "true" / "yes" 为真
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "on" | "true" | "yes"
    ))
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub book_id: i64,
    pub snapshot: i64,
    pub created: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::{FromRequest, Request};
    use axum::Form;

    async fn parse(body: String) -> SettingsUpdateForm {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let Form(form) = Form::<SettingsUpdateForm>::from_request(request, &()).await.unwrap();
        form
    }

    const BASE: &str = "setting_font_family=Georgia&setting_font_size=16&setting_font_color=%23333333\
        &setting_line_height=1.6&setting_alignment=left&setting_background=%23FFFFFF&setting_page_paddings=40";

    #[tokio::test]
    async fn test_unchecked_flags_are_false() {
        let form = parse(BASE.to_string()).await;
        assert!(!form.setting_autosave);
        assert!(!form.setting_display_comments);
    }

    #[tokio::test]
    async fn test_checked_flags() {
        let form = parse(format!("{}&setting_autosave=on&setting_display_comments=1", BASE)).await;
        assert!(form.setting_autosave);
        assert!(form.setting_display_comments);

        let import = form.into_import().unwrap();
        assert_eq!(import.alignment, Alignment::Left);
        assert_eq!(import.font_color, "#333333");
    }

    #[tokio::test]
    async fn test_invalid_alignment() {
        let form = parse(BASE.replace("alignment=left", "alignment=diagonal")).await;
        assert!(form.into_import().is_err());
    }
}
