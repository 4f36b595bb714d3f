//! Settings Handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;

use crate::application::UpdateSettings;
use crate::domain::settings::Settings;
use crate::infrastructure::events::BookEvent;
use crate::infrastructure::http::dto::SettingsUpdateForm;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequestScope;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views::{Notice, SettingsForm, ViewHelper};

/// 设置表单
pub async fn settings_index(
    Extension(scope): Extension<Arc<RequestScope>>,
) -> Result<Html<String>, ApiError> {
    let form = SettingsForm {
        url_root: &scope.view.url_root,
    }
    .render(scope.view.settings.as_ref())?;

    scope.page("Settings", form)
}

async fn apply(
    state: &AppState,
    scope: &RequestScope,
    req: SettingsUpdateForm,
) -> Result<Settings, ApiError> {
    let data = req.into_import().map_err(ApiError::Unprocessable)?;

    let settings = state
        .update_settings_handler
        .handle(UpdateSettings {
            current: scope.view.settings.as_ref().clone(),
            data,
        })
        .await?;

    state.event_publisher.publish(BookEvent::SettingsUpdated {
        book_id: settings.book_id().value(),
    });
    Ok(settings)
}

/// 全量更新九个设置字段
///
/// 普通表单提交校验失败时带错误提示重新渲染表单（422），AJAX 请求返回 JSON 错误。
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Form(req): Form<SettingsUpdateForm>,
) -> Result<Response, ApiError> {
    match apply(&state, &scope, req).await {
        Ok(_) => {
            let notice = Notice::success().render("Settings have been successfully updated.")?;
            Ok(scope.page("Settings", notice)?.into_response())
        }
        Err(ApiError::Unprocessable(message)) if !scope.request.is_ajax => {
            let notice = Notice::error().render(&message)?;
            let form = SettingsForm {
                url_root: &scope.view.url_root,
            }
            .render(scope.view.settings.as_ref())?;

            let page = scope.page("Settings", notice + &form)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e),
    }
}
