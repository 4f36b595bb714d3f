//! SQLite Settings Repository
//!
//! `setting` 表是 [`SqliteRepository`] 的第一个具体记录。

use async_trait::async_trait;
use sqlx::FromRow;

use super::repository::{ColumnValue, SqliteRepository, TableRecord};
use super::DbPool;
use crate::application::ports::{RepositoryError, SettingsRepositoryPort};
use crate::domain::book::BookId;
use crate::domain::settings::{Alignment, Settings};

#[derive(Debug, FromRow)]
struct SettingsRow {
    book_id: i64,
    setting_autosave: bool,
    setting_font_family: String,
    setting_font_size: i64,
    setting_font_color: String,
    setting_line_height: f64,
    setting_alignment: String,
    setting_background: String,
    setting_page_paddings: i64,
    setting_display_comments: bool,
}

impl TableRecord for SettingsRow {
    const TABLE: &'static str = "setting";
    const KEY: &'static str = "book_id";
    const COLUMNS: &'static [&'static str] = &[
        "setting_autosave",
        "setting_font_family",
        "setting_font_size",
        "setting_font_color",
        "setting_line_height",
        "setting_alignment",
        "setting_background",
        "setting_page_paddings",
        "setting_display_comments",
    ];

    fn key(&self) -> i64 {
        self.book_id
    }

    fn values(&self) -> Vec<ColumnValue> {
        vec![
            ColumnValue::Bool(self.setting_autosave),
            ColumnValue::Text(self.setting_font_family.clone()),
            ColumnValue::Int(self.setting_font_size),
            ColumnValue::Text(self.setting_font_color.clone()),
            ColumnValue::Real(self.setting_line_height),
            ColumnValue::Text(self.setting_alignment.clone()),
            ColumnValue::Text(self.setting_background.clone()),
            ColumnValue::Int(self.setting_page_paddings),
            ColumnValue::Bool(self.setting_display_comments),
        ]
    }
}

impl From<&Settings> for SettingsRow {
    fn from(settings: &Settings) -> Self {
        Self {
            book_id: settings.book_id().value(),
            setting_autosave: settings.autosave,
            setting_font_family: settings.font_family.clone(),
            setting_font_size: i64::from(settings.font_size),
            setting_font_color: settings.font_color.clone(),
            setting_line_height: f64::from(settings.line_height),
            setting_alignment: settings.alignment.as_str().to_string(),
            setting_background: settings.background.clone(),
            setting_page_paddings: i64::from(settings.page_paddings),
            setting_display_comments: settings.display_comments,
        }
    }
}

fn non_negative(column: &str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::SerializationError(format!("{} out of range: {}", column, value))
    })
}

impl TryFrom<SettingsRow> for Settings {
    type Error = RepositoryError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        let alignment = Alignment::from_str(&row.setting_alignment).ok_or_else(|| {
            RepositoryError::SerializationError(format!(
                "Unknown alignment '{}'",
                row.setting_alignment
            ))
        })?;

        let font_size = non_negative("setting_font_size", row.setting_font_size)?;
        let page_paddings = non_negative("setting_page_paddings", row.setting_page_paddings)?;

        let mut settings = Settings::defaults(BookId::new(row.book_id));
        settings.autosave = row.setting_autosave;
        settings.font_family = row.setting_font_family;
        settings.font_size = font_size;
        settings.font_color = row.setting_font_color;
        settings.line_height = row.setting_line_height as f32;
        settings.alignment = alignment;
        settings.background = row.setting_background;
        settings.page_paddings = page_paddings;
        settings.display_comments = row.setting_display_comments;
        Ok(settings)
    }
}

/// SQLite Settings Repository
pub struct SqliteSettingsRepository {
    records: SqliteRepository<SettingsRow>,
}

impl SqliteSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            records: SqliteRepository::new(pool),
        }
    }
}

#[async_trait]
impl SettingsRepositoryPort for SqliteSettingsRepository {
    async fn find(&self, book_id: BookId) -> Result<Option<Settings>, RepositoryError> {
        self.records
            .get(book_id.value())
            .await?
            .map(Settings::try_from)
            .transpose()
    }

    async fn find_or_create(&self, book_id: BookId) -> Result<Settings, RepositoryError> {
        let defaults = SettingsRow::from(&Settings::defaults(book_id));

        let created = sqlx::query(
            r#"
            INSERT OR IGNORE INTO setting
                (book_id, setting_autosave, setting_font_family, setting_font_size, setting_font_color,
                 setting_line_height, setting_alignment, setting_background, setting_page_paddings,
                 setting_display_comments)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(defaults.book_id)
        .bind(defaults.setting_autosave)
        .bind(&defaults.setting_font_family)
        .bind(defaults.setting_font_size)
        .bind(&defaults.setting_font_color)
        .bind(defaults.setting_line_height)
        .bind(&defaults.setting_alignment)
        .bind(&defaults.setting_background)
        .bind(defaults.setting_page_paddings)
        .bind(defaults.setting_display_comments)
        .execute(self.records.pool())
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .rows_affected();

        if created == 1 {
            tracing::info!(book_id = %book_id, "Default settings created");
        }

        self.find(book_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Settings for book {}", book_id)))
    }

    async fn save(&self, settings: &Settings) -> Result<bool, RepositoryError> {
        self.records.save(&SettingsRow::from(settings)).await
    }
}
