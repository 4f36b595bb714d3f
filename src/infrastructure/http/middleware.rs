//! HTTP Middleware
//!
//! - 错误日志中间件：记录 4xx / 5xx
//! - 生命周期中间件：框架边界上的适配层，按固定顺序驱动 [`LifecycleDispatcher`]

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use super::error::{ApiError, ApiErrorInfo};
use super::state::AppState;
use super::views::{ErrorPage, Layout, ViewHelper};
use crate::application::{LifecycleDispatcher, RequestInfo, RequestInitOutcome, ViewContext};
use crate::infrastructure::memory::RequestStore;

/// 表单请求体上限
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// 请求作用域：请求级存储 + 视图变量，请求结束即丢弃
pub struct RequestScope {
    pub store: Arc<RequestStore>,
    pub view: ViewContext,
    pub request: RequestInfo,
    /// 请求进入生命周期中间件的时刻
    pub started: Instant,
}

impl RequestScope {
    /// 片段在需要时套上页面布局
    pub fn page(&self, title: &str, content: String) -> Result<Html<String>, ApiError> {
        if !self.view.layout {
            return Ok(Html(content));
        }

        let layout = Layout {
            title,
            url_root: &self.view.url_root,
            app_status: &self.view.app_status,
            app_profile: self.view.app_profile,
            elapsed: self.started.elapsed(),
            book_id: Some(self.view.book.id().value()),
        };
        Ok(Html(layout.render(content.as_str())?))
    }
}

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误在 ApiError::into_response() 中已带 errno 记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// 是否为 AJAX 请求
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn find_param(encoded: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// 提取生命周期所需的请求信息
///
/// AJAX 请求的书籍标识来自表单 `book_id`，普通请求来自查询参数 `id`；
/// 首选来源缺失时退回另一处（例如 AJAX 的 GET 片段请求）。
pub fn request_info(path: &str, query: &str, headers: &HeaderMap, form: &[u8]) -> RequestInfo {
    let ajax = is_ajax(headers);
    let from_form = || {
        if is_form(headers) {
            find_param(form, "book_id")
        } else {
            None
        }
    };
    let from_query = || find_param(query.as_bytes(), "id");

    let book_id = if ajax {
        from_form().or_else(from_query)
    } else {
        from_query().or_else(from_form)
    };

    RequestInfo {
        path: path.to_string(),
        is_ajax: ajax,
        book_id,
        snapshot: find_param(query.as_bytes(), "snapshot"),
    }
}

/// 生命周期中间件
///
/// request-init → controller-init → action-init → (handler) → shutdown。
/// 缺少书籍标识时重定向；非 AJAX 请求的错误渲染为错误页。
pub async fn lifecycle_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let (parts, body) = request.into_parts();
    let bytes: Bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::BadRequest(format!("Unreadable body: {}", e)).into_response(),
    };

    let info = request_info(
        parts.uri.path(),
        parts.uri.query().unwrap_or(""),
        &parts.headers,
        &bytes,
    );

    let store = Arc::new(RequestStore::new());
    let mut dispatcher = LifecycleDispatcher::new(state.lifecycle.clone());

    match dispatcher.request_init(&info, store.as_ref()).await {
        Ok(RequestInitOutcome::Continue) => {}
        Ok(RequestInitOutcome::Redirect(target)) => {
            return Redirect::to(&target).into_response();
        }
        Err(e) => {
            return error_response(&state, &info, started, ApiError::from(e).into_response());
        }
    }

    let view = match dispatcher.controller_init(&info, store.as_ref()) {
        Ok(view) => view,
        Err(e) => {
            return error_response(&state, &info, started, ApiError::from(e).into_response());
        }
    };

    if let Err(e) = dispatcher.action_init(&info) {
        return error_response(&state, &info, started, ApiError::from(e).into_response());
    }

    let scope = Arc::new(RequestScope {
        store,
        view,
        request: info.clone(),
        started,
    });

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(scope);

    let response = next.run(request).await;

    if let Err(e) = dispatcher.shutdown(&info) {
        tracing::warn!(path = %info.path, error = %e, "Lifecycle shutdown failed");
    }

    error_response(&state, &info, started, response)
}

/// 非 AJAX 请求的错误响应改写为错误页（保留状态码）
fn error_response(
    state: &AppState,
    info: &RequestInfo,
    started: Instant,
    response: Response,
) -> Response {
    if info.is_ajax {
        return response;
    }
    let Some(error) = response.extensions().get::<ApiErrorInfo>().cloned() else {
        return response;
    };

    let status = if error.status.is_client_error() || error.status.is_server_error() {
        error.status
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    match render_error_page(state, &error, started) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(path = %info.path, error = %e, "Failed to render error page");
            response
        }
    }
}

fn render_error_page(
    state: &AppState,
    error: &ApiErrorInfo,
    started: Instant,
) -> Result<String, askama::Error> {
    let config = &state.lifecycle_config;
    let page = ErrorPage {
        url_root: &config.url_root,
        default_book_id: config.default_book_id,
    }
    .render((error.status.as_u16(), error.message.as_str()))?;

    Layout {
        title: error.status.canonical_reason().unwrap_or("Error"),
        url_root: &config.url_root,
        app_status: &config.app_status,
        app_profile: config.app_profile,
        elapsed: started.elapsed(),
        book_id: None,
    }
    .render(page.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::state::test_support::app_state;
    use axum::{
        extract::Extension,
        http::{HeaderValue, Request as HttpRequest},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    fn headers(ajax: bool, form: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if ajax {
            headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        }
        if form {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
        }
        headers
    }

    #[test]
    fn test_request_info_ajax_reads_form() {
        let info = request_info(
            "/chapter/insert",
            "id=9",
            &headers(true, true),
            b"book_id=3&chapter_id=2",
        );

        assert!(info.is_ajax);
        assert_eq!(info.book_id.as_deref(), Some("3"));
        assert_eq!(info.snapshot, None);
    }

    #[test]
    fn test_request_info_page_reads_query() {
        let info = request_info(
            "/book/view",
            "id=4&snapshot=1700000000",
            &headers(false, false),
            b"",
        );

        assert!(!info.is_ajax);
        assert_eq!(info.book_id.as_deref(), Some("4"));
        assert_eq!(info.snapshot.as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_request_info_falls_back_to_other_source() {
        let info = request_info("/settings", "id=5", &headers(true, false), b"");
        assert_eq!(info.book_id.as_deref(), Some("5"));

        let info = request_info("/settings/update", "", &headers(false, true), b"book_id=6");
        assert_eq!(info.book_id.as_deref(), Some("6"));
    }

    async fn scope_handler(Extension(scope): Extension<Arc<RequestScope>>) -> String {
        format!("{}:{}", scope.view.book.id(), scope.view.layout)
    }

    async fn failing_handler() -> Result<String, ApiError> {
        Err(ApiError::Conflict("A book must keep at least one chapter".to_string()))
    }

    async fn router() -> (Router, tempfile::TempDir) {
        let (state, _pool, dir) = app_state().await;
        let router = Router::new()
            .route("/scope", get(scope_handler).post(scope_handler))
            .route("/fail", post(failing_handler).get(failing_handler))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                lifecycle_middleware,
            ))
            .with_state(state);
        (router, dir)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_book_id_redirects_to_default_edit() {
        let (app, _dir) = router().await;

        let response = app
            .oneshot(HttpRequest::builder().uri("/scope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/book/edit?id=1");
    }

    #[tokio::test]
    async fn test_page_request_gets_scope_with_layout() {
        let (app, _dir) = router().await;

        let response = app
            .oneshot(HttpRequest::builder().uri("/scope?id=1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1:true");
    }

    #[tokio::test]
    async fn test_ajax_request_reads_body_and_suppresses_layout() {
        let (app, _dir) = router().await;

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/scope")
                    .header("x-requested-with", "XMLHttpRequest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("book_id=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1:false");
    }

    #[tokio::test]
    async fn test_unknown_book_renders_error_page() {
        let (app, _dir) = router().await;

        let response = app
            .oneshot(HttpRequest::builder().uri("/scope?id=77").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("error-page"));
        assert!(html.contains("Book not found: 77"));
    }

    #[tokio::test]
    async fn test_ajax_errors_stay_json() {
        let (app, _dir) = router().await;

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/fail")
                    .header("x-requested-with", "XMLHttpRequest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("book_id=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["errno"], 409);
    }

    #[tokio::test]
    async fn test_error_logging_passes_status_through() {
        async fn not_found() -> StatusCode {
            StatusCode::NOT_FOUND
        }

        let app: Router = Router::new()
            .route("/missing", get(not_found))
            .layer(axum::middleware::from_fn(error_logging_middleware));

        let response = app
            .oneshot(HttpRequest::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
