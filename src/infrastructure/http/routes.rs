//! HTTP Routes
//!
//! 页面 / AJAX 路由（经过生命周期中间件）:
//! - /book/edit          GET   编辑页
//! - /book/view          GET   只读页（可带 snapshot）
//! - /chapter/insert     POST  插入章节
//! - /chapter/delete     POST  删除章节
//! - /section/update     POST  更新段落
//! - /entity/get         POST  查看角色
//! - /settings           GET   设置表单
//! - /settings/update    POST  更新设置
//! - /snapshot           GET   快照概览
//! - /snapshot/create    POST  创建快照
//!
//! 其他路由:
//! - /api/ping           GET   健康检查
//! - /ws/book/{id}       WS    书籍事件推送

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::lifecycle_middleware;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(page_routes(state.clone()))
        .route("/api/ping", get(handlers::ping))
        .route("/ws/book/:book_id", get(handlers::book_websocket_handler))
        .with_state(state)
}

/// 需要书籍上下文的路由
fn page_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/book", book_routes())
        .nest("/chapter", chapter_routes())
        .route("/section/update", post(handlers::update_section))
        .route("/entity/get", post(handlers::get_entity))
        .route("/settings", get(handlers::settings_index))
        .route("/settings/update", post(handlers::update_settings))
        .route("/snapshot", get(handlers::snapshot_index))
        .route("/snapshot/create", post(handlers::create_snapshot))
        .route_layer(middleware::from_fn_with_state(state, lifecycle_middleware))
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/edit", get(handlers::edit_book))
        .route("/view", get(handlers::view_book))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insert", post(handlers::insert_chapter))
        .route("/delete", post(handlers::delete_chapter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::state::test_support::app_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_ping_skips_lifecycle() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_edit_without_id_redirects_to_default_book() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(Request::builder().uri("/book/edit").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/book/edit?id=1"
        );
    }

    #[tokio::test]
    async fn test_edit_page_renders_layout_and_chapter() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(Request::builder().uri("/book/edit?id=1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Chapter one"));
        assert!(html.contains(r#"data-chapterid="1""#));
    }

    #[tokio::test]
    async fn test_view_unknown_snapshot_is_not_found() {
        let (state, _pool, _dir) = app_state().await;
        let app = create_routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/book/view?id=1&snapshot=12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
