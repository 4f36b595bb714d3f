//! Book Lifecycle - 应用的生命周期监听器
//!
//! request-init: 当前用户（暂无登录，使用默认用户）、书籍（可带快照）、设置 → 请求级存储
//! controller-init: 存储内容 + 配置 → 视图变量；AJAX 请求不套用布局

use async_trait::async_trait;

use super::context::{RequestInfo, RequestInitOutcome, ViewContext};
use super::dispatcher::{LifecycleListener, RequestStorePort};
use crate::application::error::ApplicationError;
use crate::application::ports::{get_typed, keys, put_typed};
use crate::application::queries::handlers::{LoadBookHandler, LoadSettingsHandler};
use crate::application::queries::{LoadBook, LoadSettings};
use crate::domain::book::{Book, BookId, SnapshotId};
use crate::domain::settings::Settings;
use crate::domain::{User, UserId};

/// 生命周期配置
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub default_book_id: i64,
    pub default_user_id: i64,
    pub url_root: String,
    pub app_status: String,
    pub app_profile: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_book_id: 1,
            default_user_id: 1,
            url_root: String::new(),
            app_status: "development".to_string(),
            app_profile: false,
        }
    }
}

impl LifecycleConfig {
    /// 缺少书籍标识时的重定向目标
    pub fn default_edit_url(&self) -> String {
        format!(
            "{}/book/edit?id={}",
            self.url_root.trim_end_matches('/'),
            self.default_book_id
        )
    }
}

/// BookLifecycle
pub struct BookLifecycle {
    config: LifecycleConfig,
    load_book_handler: LoadBookHandler,
    load_settings_handler: LoadSettingsHandler,
}

impl BookLifecycle {
    pub fn new(
        config: LifecycleConfig,
        load_book_handler: LoadBookHandler,
        load_settings_handler: LoadSettingsHandler,
    ) -> Self {
        Self {
            config,
            load_book_handler,
            load_settings_handler,
        }
    }
}

/// 解析书籍标识；缺失、非数字或非正数视为缺失
fn parse_book_id(raw: Option<&str>) -> Option<BookId> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .map(BookId::new)
}

fn parse_snapshot(raw: Option<&str>) -> Result<Option<SnapshotId>, ApplicationError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(|created| Some(SnapshotId::new(created)))
            .map_err(|_| ApplicationError::validation(format!("Invalid snapshot: {}", value))),
    }
}

#[async_trait]
impl LifecycleListener for BookLifecycle {
    async fn request_init(
        &self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<RequestInitOutcome, ApplicationError> {
        let Some(book_id) = parse_book_id(request.book_id.as_deref()) else {
            let target = self.config.default_edit_url();
            tracing::debug!(path = %request.path, target = %target, "No book id, redirecting");
            return Ok(RequestInitOutcome::Redirect(target));
        };
        let snapshot = parse_snapshot(request.snapshot.as_deref())?;

        let user = User::new(UserId::new(self.config.default_user_id));
        let book = self
            .load_book_handler
            .handle(LoadBook { book_id, snapshot })
            .await?;
        let settings = self
            .load_settings_handler
            .handle(LoadSettings { book_id })
            .await?;

        put_typed(store, keys::USER, user, false)?;
        put_typed(store, keys::BOOK, book, false)?;
        put_typed(store, keys::SETTINGS, settings, false)?;

        Ok(RequestInitOutcome::Continue)
    }

    fn controller_init(
        &self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<ViewContext, ApplicationError> {
        Ok(ViewContext {
            book: get_typed::<Book>(store, keys::BOOK)?,
            user: get_typed::<User>(store, keys::USER)?,
            settings: get_typed::<Settings>(store, keys::SETTINGS)?,
            url_root: self.config.url_root.clone(),
            app_status: self.config.app_status.clone(),
            app_profile: self.config.app_profile,
            layout: !request.is_ajax,
        })
    }
}
