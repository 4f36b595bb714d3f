//! SQLite Database - 数据库连接和迁移

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/webbook.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 种子书籍 ID（默认跳转目标）
pub const SEED_BOOK_ID: i64 = 1;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!(
        url = %config.database_url,
        max_connections = config.max_connections,
        "SQLite pool created with WAL mode and busy_timeout=5000ms"
    );

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_title TEXT NOT NULL,
            book_created TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            section_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            chapter_id INTEGER NOT NULL,
            section_type TEXT NOT NULL DEFAULT 'content',
            section_order INTEGER NOT NULL DEFAULT 0,
            section_content TEXT NOT NULL DEFAULT '',
            section_updated TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            book_id INTEGER NOT NULL,
            snapshot_created INTEGER NOT NULL,
            PRIMARY KEY (book_id, snapshot_created),
            FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snapshot_sections (
            book_id INTEGER NOT NULL,
            snapshot_created INTEGER NOT NULL,
            section_id INTEGER NOT NULL,
            chapter_id INTEGER NOT NULL,
            section_type TEXT NOT NULL,
            section_order INTEGER NOT NULL,
            section_content TEXT NOT NULL,
            PRIMARY KEY (book_id, snapshot_created, section_id),
            FOREIGN KEY (book_id, snapshot_created)
                REFERENCES snapshots(book_id, snapshot_created) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS setting (
            book_id INTEGER PRIMARY KEY,
            setting_autosave INTEGER NOT NULL DEFAULT 1,
            setting_font_family TEXT NOT NULL,
            setting_font_size INTEGER NOT NULL,
            setting_font_color TEXT NOT NULL,
            setting_line_height REAL NOT NULL,
            setting_alignment TEXT NOT NULL,
            setting_background TEXT NOT NULL,
            setting_page_paddings INTEGER NOT NULL,
            setting_display_comments INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entities (
            entity_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            entity_type TEXT NOT NULL DEFAULT 'character',
            entity_name TEXT NOT NULL,
            entity_description TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 索引: 一次查询取整本书的段落
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sections_book_chapter
        ON sections(book_id, chapter_id, section_order)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_entities_book_id
        ON entities(book_id)
        "#,
    )
    .execute(pool)
    .await?;

    seed_default_book(pool).await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 写入默认书籍：一个章节（标题 + 空段落），可重复执行
async fn seed_default_book(pool: &DbPool) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO books (book_id, book_title, book_created) VALUES (?, ?, ?)",
    )
    .bind(SEED_BOOK_ID)
    .bind("My first book")
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 1 {
        sqlx::query(
            r#"
            INSERT INTO sections (book_id, chapter_id, section_type, section_order, section_content, section_updated)
            VALUES (?, 1, 'title', 0, 'Chapter one', ?), (?, 1, 'content', 1, '', ?)
            "#,
        )
        .bind(SEED_BOOK_ID)
        .bind(&now)
        .bind(SEED_BOOK_ID)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO entities (book_id, entity_type, entity_name, entity_description)
            VALUES (?, 'character', 'Narrator', 'The voice telling the story.')
            "#,
        )
        .bind(SEED_BOOK_ID)
        .execute(&mut *tx)
        .await?;

        tracing::info!(book_id = SEED_BOOK_ID, "Seeded default book");
    }

    tx.commit().await?;
    Ok(())
}
