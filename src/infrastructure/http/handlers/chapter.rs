//! Chapter Handlers

use axum::{
    extract::{Extension, State},
    response::Html,
    Form, Json,
};
use std::sync::Arc;

use crate::application::{DeleteChapter, InsertChapter};
use crate::domain::book::ChapterId;
use crate::infrastructure::events::BookEvent;
use crate::infrastructure::http::dto::{ApiResponse, ChapterForm, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views::{ChapterView, ViewHelper};

fn chapter_id(raw: u32) -> Result<ChapterId, ApiError> {
    ChapterId::new(raw)
        .ok_or_else(|| ApiError::Unprocessable(format!("Invalid chapter_id: {}", raw)))
}

/// 插入章节，返回新章节的 HTML 片段
pub async fn insert_chapter(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Form(req): Form<ChapterForm>,
) -> Result<Html<String>, ApiError> {
    let book = &scope.view.book;
    let at = chapter_id(req.chapter_id)?;

    let chapter = state
        .insert_chapter_handler
        .handle(InsertChapter {
            book: book.clone(),
            at,
        })
        .await?;

    state.event_publisher.publish(BookEvent::ChapterInserted {
        book_id: book.id().value(),
        chapter_id: at.value(),
    });

    Ok(Html(ChapterView { editable: true }.render(&chapter)?))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Form(req): Form<ChapterForm>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let book = &scope.view.book;
    let chapter = chapter_id(req.chapter_id)?;

    state
        .delete_chapter_handler
        .handle(DeleteChapter {
            book: book.clone(),
            chapter,
        })
        .await?;

    state.event_publisher.publish(BookEvent::ChapterDeleted {
        book_id: book.id().value(),
        chapter_id: chapter.value(),
    });

    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::test_support::app_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    fn ajax_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-requested-with", "XMLHttpRequest")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_delete_chapter() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state.clone());
        let mut events = state.event_publisher.subscribe(1);

        let response = app
            .clone()
            .oneshot(ajax_post("/chapter/insert", "book_id=1&chapter_id=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains(r#"data-chapterid="2""#));
        assert!(events.recv().await.unwrap().is_structural());

        let response = app
            .oneshot(ajax_post("/chapter/delete", "book_id=1&chapter_id=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_only_chapter_is_conflict() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(ajax_post("/chapter/delete", "book_id=1&chapter_id=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_insert_past_end_is_rejected() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(ajax_post("/chapter/insert", "book_id=1&chapter_id=3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_insert_with_zero_position_is_rejected() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(ajax_post("/chapter/insert", "book_id=1&chapter_id=0"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
