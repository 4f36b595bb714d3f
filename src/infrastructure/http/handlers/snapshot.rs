//! Snapshot Handlers

use axum::{
    extract::{Extension, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::application::{CreateSnapshot, ListSnapshots};
use crate::infrastructure::events::BookEvent;
use crate::infrastructure::http::dto::{ApiResponse, SnapshotResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views::{format_date, SnapshotOverview, SnapshotPage, ViewHelper};

/// 快照概览
pub async fn snapshot_index(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
) -> Result<Html<String>, ApiError> {
    let book = &scope.view.book;
    let snapshots = state
        .list_snapshots_handler
        .handle(ListSnapshots { book_id: book.id() })
        .await?;

    let content = SnapshotPage {
        url_root: &scope.view.url_root,
        now: Utc::now(),
    }
    .render((book.as_ref(), snapshots.as_slice()))?;

    scope.page("Snapshots", content)
}

/// 以当前时间创建快照
///
/// AJAX 请求返回 JSON；页面表单提交后重定向回快照概览。
pub async fn create_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
) -> Result<Response, ApiError> {
    let book_id = scope.view.book.id();

    let snapshot = state
        .create_snapshot_handler
        .handle(CreateSnapshot {
            book_id,
            at: Utc::now(),
        })
        .await?;

    state.event_publisher.publish(BookEvent::SnapshotCreated {
        book_id: book_id.value(),
        snapshot: snapshot.id().value(),
    });

    if !scope.request.is_ajax {
        let target = format!(
            "{}/snapshot?id={}",
            scope.view.url_root.trim_end_matches('/'),
            book_id
        );
        return Ok(Redirect::to(&target).into_response());
    }

    let overview = SnapshotOverview {
        book_id,
        url_root: &scope.view.url_root,
        now: Utc::now(),
    };

    Ok(Json(ApiResponse::success(SnapshotResponse {
        book_id: book_id.value(),
        snapshot: snapshot.id().value(),
        created: format_date(snapshot.created_at()),
        url: overview.snapshot_url(&snapshot),
    }))
    .into_response())
}

#[cfg(test)]
mod tests {
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::test_support::app_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    async fn text(response: axum::response::Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn test_overview_empty_then_one() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);
        let index = || {
            Request::builder()
                .uri("/snapshot?id=1")
                .header("x-requested-with", "XMLHttpRequest")
                .body(Body::empty())
                .unwrap()
        };

        let html = text(app.clone().oneshot(index()).await.unwrap()).await;
        assert!(html.contains("snapshot-empty"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/snapshot/create")
                    .header("x-requested-with", "XMLHttpRequest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("book_id=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
        let url = json["data"]["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/book/view?id=1&snapshot="));

        let html = text(app.oneshot(index()).await.unwrap()).await;
        assert_eq!(html.matches(r#"class="snapshot-item""#).count(), 1);
    }

    #[tokio::test]
    async fn test_create_form_posts_and_redirects_to_overview() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let page = text(
            app.clone()
                .oneshot(Request::builder().uri("/snapshot?id=1").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains(r#"method="post" action="/snapshot/create""#));
        assert!(page.contains(r#"<input type="hidden" name="book_id" value="1">"#));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/snapshot/create")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("book_id=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/snapshot?id=1");

        let page = text(
            app.oneshot(Request::builder().uri("/snapshot?id=1").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(page.matches(r#"class="snapshot-item""#).count(), 1);
    }
}
