//! HTTP Editor Client - 编辑器模块调用服务端的 AJAX 客户端
//!
//! 实现 EditorApiPort，所有请求均为表单 POST 并带 `X-Requested-With` 头，
//! 服务端据此只返回片段或 JSON。

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::application::ports::{EditorApiPort, EditorError, SectionUpdate};
use crate::config::AppConfig;
use crate::domain::book::{BookId, ChapterId};

const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// HTTP Editor 客户端配置
#[derive(Debug, Clone)]
pub struct HttpEditorClientConfig {
    /// 服务端基础 URL（含 url_root）
    pub base_url: String,
    /// 请求超时时间（毫秒）
    pub timeout_ms: u64,
}

impl Default for HttpEditorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl HttpEditorClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// 公开地址 + 站点根路径，超时取 `editor.request_timeout_ms`
impl From<&AppConfig> for HttpEditorClientConfig {
    fn from(config: &AppConfig) -> Self {
        let base_url = format!(
            "{}{}",
            config.server.public_base_url().trim_end_matches('/'),
            config.app.url_root.trim_end_matches('/'),
        );
        Self::new(base_url).with_timeout(config.editor.request_timeout_ms)
    }
}

/// HTTP Editor 客户端
pub struct HttpEditorClient {
    client: Client,
    config: HttpEditorClientConfig,
}

impl HttpEditorClient {
    pub fn new(config: HttpEditorClientConfig) -> Result<Self, EditorError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EditorError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<Response, EditorError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "Sending editor request");

        let response = self
            .client
            .post(&url)
            .header(AJAX_HEADER.0, AJAX_HEADER.1)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EditorError::Timeout
                } else {
                    EditorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);

        tracing::warn!(
            url = %url,
            status = status.as_u16(),
            message = %message,
            "Editor request rejected"
        );

        Err(EditorError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn text(response: Response) -> Result<String, EditorError> {
        response
            .text()
            .await
            .map_err(|e| EditorError::Network(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl EditorApiPort for HttpEditorClient {
    async fn insert_chapter(&self, book_id: BookId, at: ChapterId) -> Result<String, EditorError> {
        let response = self
            .post(
                "/chapter/insert",
                &[
                    ("book_id", book_id.to_string()),
                    ("chapter_id", at.to_string()),
                ],
            )
            .await?;
        Self::text(response).await
    }

    async fn delete_chapter(&self, book_id: BookId, chapter: ChapterId) -> Result<(), EditorError> {
        self.post(
            "/chapter/delete",
            &[
                ("book_id", book_id.to_string()),
                ("chapter_id", chapter.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn update_section(
        &self,
        book_id: BookId,
        update: &SectionUpdate,
    ) -> Result<(), EditorError> {
        self.post(
            "/section/update",
            &[
                ("book_id", book_id.to_string()),
                ("section_id", update.section_id.to_string()),
                ("section_order", update.order.to_string()),
                ("section_content", update.content.clone()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn view_entity(&self, book_id: BookId, entity_id: i64) -> Result<String, EditorError> {
        let response = self
            .post(
                "/entity/get",
                &[
                    ("book_id", book_id.to_string()),
                    ("entity_id", entity_id.to_string()),
                    ("action", "view".to_string()),
                ],
            )
            .await?;
        Self::text(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::SectionId;
    use crate::infrastructure::http::create_routes;
    use crate::infrastructure::http::state::test_support::app_state;
    use tokio::net::TcpListener;

    #[test]
    fn test_config_builder() {
        let config = HttpEditorClientConfig::new("http://example.com/app/").with_timeout(500);
        assert_eq!(config.timeout_ms, 500);

        let client = HttpEditorClient::new(config).unwrap();
        assert_eq!(client.endpoint("/chapter/insert"), "http://example.com/app/chapter/insert");
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = AppConfig::default();
        app.server.base_url = Some("https://books.example.com/".to_string());
        app.app.url_root = "/wb/".to_string();
        app.editor.request_timeout_ms = 2_500;

        let config = HttpEditorClientConfig::from(&app);
        assert_eq!(config.base_url, "https://books.example.com/wb");
        assert_eq!(config.timeout_ms, 2_500);

        let client = HttpEditorClient::new(config).unwrap();
        assert_eq!(
            client.endpoint("/section/update"),
            "https://books.example.com/wb/section/update"
        );
    }

    #[test]
    fn test_config_from_defaults_uses_listen_address() {
        let config = HttpEditorClientConfig::from(&AppConfig::default());

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_ms, 10_000);
    }

    async fn serve() -> (HttpEditorClient, sqlx::SqlitePool, tempfile::TempDir) {
        let (state, pool, dir) = app_state().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_routes(state)).await.unwrap();
        });

        let client =
            HttpEditorClient::new(HttpEditorClientConfig::new(format!("http://{}", addr))).unwrap();
        (client, pool, dir)
    }

    #[tokio::test]
    async fn test_round_trip_against_server() {
        let (client, pool, _dir) = serve().await;
        let book = BookId::new(1);

        let html = client.insert_chapter(book, ChapterId::FIRST).await.unwrap();
        assert!(html.contains(r#"data-chapterid="1""#));

        let content_id: i64 = sqlx::query_scalar(
            "SELECT section_id FROM sections WHERE book_id = 1 AND chapter_id = 2 AND section_type = 'content'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        client
            .update_section(
                book,
                &SectionUpdate {
                    section_id: SectionId::new(content_id),
                    order: 1,
                    content: "<p>Once upon a time</p>".to_string(),
                },
            )
            .await
            .unwrap();

        client.delete_chapter(book, ChapterId::FIRST).await.unwrap();

        let content: String = sqlx::query_scalar(
            "SELECT section_content FROM sections WHERE section_id = ?",
        )
        .bind(content_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(content, "<p>Once upon a time</p>");

        let character = client.view_entity(book, 1).await.unwrap();
        assert!(character.contains("Narrator"));
    }

    #[tokio::test]
    async fn test_server_rejection_is_surfaced() {
        let (client, _pool, _dir) = serve().await;

        let err = client
            .delete_chapter(BookId::new(1), ChapterId::FIRST)
            .await
            .unwrap_err();

        match err {
            EditorError::Server { status, message } => {
                assert_eq!(status, 409);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = HttpEditorClient::new(
            HttpEditorClientConfig::new("http://127.0.0.1:9").with_timeout(2_000),
        )
        .unwrap();

        let err = client.view_entity(BookId::new(1), 1).await.unwrap_err();
        assert!(matches!(err, EditorError::Network(_) | EditorError::Timeout));
    }
}
