//! Lifecycle Dispatcher - 四阶段请求生命周期状态机
//!
//! Pending → RequestInit → ControllerInit → ActionInit → Shutdown
//!
//! 阶段顺序固定、不分支；由框架适配层（HTTP 中间件）驱动。

use std::sync::Arc;

use async_trait::async_trait;

use super::context::{RequestInfo, RequestInitOutcome, ViewContext};
use crate::application::error::ApplicationError;
use crate::application::ports::{KeyValueStore, StoreValue};

/// 请求级存储
pub type RequestStorePort = dyn KeyValueStore<Value = StoreValue>;

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Pending,
    RequestInit,
    ControllerInit,
    ActionInit,
    Shutdown,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Pending => "pending",
            LifecycleStage::RequestInit => "request-init",
            LifecycleStage::ControllerInit => "controller-init",
            LifecycleStage::ActionInit => "action-init",
            LifecycleStage::Shutdown => "shutdown",
        }
    }

    /// 下一个合法阶段
    pub fn next(&self) -> Option<LifecycleStage> {
        match self {
            LifecycleStage::Pending => Some(LifecycleStage::RequestInit),
            LifecycleStage::RequestInit => Some(LifecycleStage::ControllerInit),
            LifecycleStage::ControllerInit => Some(LifecycleStage::ActionInit),
            LifecycleStage::ActionInit => Some(LifecycleStage::Shutdown),
            LifecycleStage::Shutdown => None,
        }
    }
}

/// 生命周期监听器 - 每个阶段一个处理函数
#[async_trait]
pub trait LifecycleListener: Send + Sync {
    /// 请求开始：解析当前用户、书籍、设置并写入请求级存储
    async fn request_init(
        &self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<RequestInitOutcome, ApplicationError>;

    /// 控制器加载后：将存储内容投影为视图变量
    fn controller_init(
        &self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<ViewContext, ApplicationError>;

    /// action 执行前（扩展点）
    fn action_init(&self, _request: &RequestInfo) -> Result<(), ApplicationError> {
        Ok(())
    }

    /// 请求结束（扩展点）
    fn shutdown(&self, _request: &RequestInfo) -> Result<(), ApplicationError> {
        Ok(())
    }
}

/// 生命周期分发器
///
/// 每个请求一个实例；阶段只能按固定顺序前进，任一处理函数出错即终止请求。
pub struct LifecycleDispatcher {
    listener: Arc<dyn LifecycleListener>,
    stage: LifecycleStage,
}

impl LifecycleDispatcher {
    pub fn new(listener: Arc<dyn LifecycleListener>) -> Self {
        Self {
            listener,
            stage: LifecycleStage::Pending,
        }
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    fn advance(&mut self, to: LifecycleStage) -> Result<(), ApplicationError> {
        if self.stage.next() != Some(to) {
            return Err(ApplicationError::invalid_state(format!(
                "lifecycle cannot move from {} to {}",
                self.stage.as_str(),
                to.as_str()
            )));
        }
        tracing::trace!(stage = to.as_str(), "Lifecycle stage");
        self.stage = to;
        Ok(())
    }

    pub async fn request_init(
        &mut self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<RequestInitOutcome, ApplicationError> {
        self.advance(LifecycleStage::RequestInit)?;
        self.listener.request_init(request, store).await
    }

    pub fn controller_init(
        &mut self,
        request: &RequestInfo,
        store: &RequestStorePort,
    ) -> Result<ViewContext, ApplicationError> {
        self.advance(LifecycleStage::ControllerInit)?;
        self.listener.controller_init(request, store)
    }

    pub fn action_init(&mut self, request: &RequestInfo) -> Result<(), ApplicationError> {
        self.advance(LifecycleStage::ActionInit)?;
        self.listener.action_init(request)
    }

    pub fn shutdown(&mut self, request: &RequestInfo) -> Result<(), ApplicationError> {
        self.advance(LifecycleStage::Shutdown)?;
        self.listener.shutdown(request)
    }
}
