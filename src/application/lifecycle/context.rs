//! Request Context - 生命周期各阶段共享的请求信息与视图变量

use std::sync::Arc;

use crate::domain::book::Book;
use crate::domain::settings::Settings;
use crate::domain::User;

/// 框架边界提取出的请求信息
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// 请求路径（日志用）
    pub path: String,
    /// 是否为 AJAX 请求（决定参数来源与布局）
    pub is_ajax: bool,
    /// 书籍标识原始值：AJAX 来自 POST `book_id`，否则来自查询参数 `id`
    pub book_id: Option<String>,
    /// 快照标识原始值（查询参数 `snapshot`）
    pub snapshot: Option<String>,
}

/// request-init 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestInitOutcome {
    /// 继续处理
    Continue,
    /// 缺少书籍标识，重定向到默认编辑页
    Redirect(String),
}

/// 视图变量（controller-init 由请求级存储投影而来）
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub book: Arc<Book>,
    pub user: Arc<User>,
    pub settings: Arc<Settings>,
    pub url_root: String,
    pub app_status: String,
    pub app_profile: bool,
    /// AJAX 请求只输出片段，不套用页面布局
    pub layout: bool,
}
