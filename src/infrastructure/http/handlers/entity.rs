//! Entity Handlers - 角色查看

use axum::{
    extract::{Extension, State},
    response::Html,
    Form,
};
use std::sync::Arc;

use crate::application::GetEntity;
use crate::infrastructure::http::dto::EntityForm;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views::{CharacterView, ViewHelper};

/// 获取实体，返回模态框内容
pub async fn get_entity(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Form(req): Form<EntityForm>,
) -> Result<Html<String>, ApiError> {
    match req.action.as_deref() {
        None | Some("view") => {}
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Unsupported entity action: {}", other)));
        }
    }

    let entity = state
        .get_entity_handler
        .handle(GetEntity {
            book_id: scope.view.book.id(),
            entity_id: req.entity_id,
        })
        .await?;

    Ok(Html(CharacterView.render(&entity)?))
}
