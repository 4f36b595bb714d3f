//! Section Handlers

use axum::{
    extract::{Extension, State},
    Form, Json,
};
use std::sync::Arc;

use crate::application::UpdateSection;
use crate::domain::book::SectionId;
use crate::infrastructure::events::BookEvent;
use crate::infrastructure::http::dto::{ApiResponse, Empty, SectionUpdateForm};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;

/// 更新段落内容（并发更新以最后写入为准）
pub async fn update_section(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Form(req): Form<SectionUpdateForm>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let book_id = scope.view.book.id();
    if scope.view.book.is_snapshot() {
        return Err(ApiError::Conflict(format!("Snapshot of book {} is read-only", book_id)));
    }

    state
        .update_section_handler
        .handle(UpdateSection {
            book_id,
            section_id: SectionId::new(req.section_id),
            order: req.section_order,
            content: req.section_content,
        })
        .await?;

    state.event_publisher.publish(BookEvent::SectionUpdated {
        book_id: book_id.value(),
        section_id: req.section_id,
    });

    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::test_support::app_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    fn update(section_id: i64, content: &str) -> Request<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("book_id", "1")
            .append_pair("section_id", &section_id.to_string())
            .append_pair("section_order", "1")
            .append_pair("section_content", content)
            .finish();
        Request::builder()
            .method("POST")
            .uri("/section/update")
            .header("x-requested-with", "XMLHttpRequest")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (state, pool, _dir) = app_state().await;
        let app = create_routes(state);
        let (section_id,): (i64,) = sqlx::query_as(
            "SELECT section_id FROM sections WHERE book_id = 1 AND section_type = 'content'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let first = app.clone().oneshot(update(section_id, "<p>first</p>"));
        let second = app.clone().oneshot(update(section_id, "<p>second</p>"));
        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);

        let (content,): (String,) =
            sqlx::query_as("SELECT section_content FROM sections WHERE section_id = ?")
                .bind(section_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        // 不合并：结果恰好是其中一次写入
        assert!(content == "<p>first</p>" || content == "<p>second</p>");
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app.oneshot(update(999, "x")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
