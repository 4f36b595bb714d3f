//! Book Handlers - 书籍页面

use axum::{
    extract::{Extension, State},
    response::Html,
};
use std::sync::Arc;

use crate::application::ListEntities;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views::{BookView, ViewHelper};

async fn render_book(
    state: &AppState,
    scope: &RequestScope,
    readonly: bool,
) -> Result<Html<String>, ApiError> {
    let book = &scope.view.book;
    let characters = state
        .list_entities_handler
        .handle(ListEntities { book_id: book.id() })
        .await?;

    let content = BookView {
        settings: &scope.view.settings,
        characters: &characters,
        readonly,
    }
    .render(book.as_ref())?;

    tracing::debug!(
        book_id = %book.id(),
        snapshot = ?book.snapshot(),
        readonly,
        characters = characters.len(),
        "Rendering book"
    );
    scope.page(book.title(), content)
}

/// 编辑页
pub async fn edit_book(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
) -> Result<Html<String>, ApiError> {
    render_book(&state, &scope, false).await
}

/// 只读页（可固定到快照）
pub async fn view_book(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
) -> Result<Html<String>, ApiError> {
    render_book(&state, &scope, true).await
}
