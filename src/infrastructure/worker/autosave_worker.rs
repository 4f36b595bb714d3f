//! Autosave Worker - 定时刷新自动保存缓冲区

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::application::ports::EditorApiPort;
use crate::config::EditorConfig;
use crate::infrastructure::adapters::editor::AutosaveBuffer;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct AutosaveWorkerConfig {
    /// 刷新间隔（毫秒）
    pub interval_ms: u64,
}

impl Default for AutosaveWorkerConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl From<&EditorConfig> for AutosaveWorkerConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            interval_ms: config.autosave_interval_ms,
        }
    }
}

/// 自动保存 Worker
///
/// 每个间隔只发送自上次成功保存后修改过的段落。
pub struct AutosaveWorker {
    config: AutosaveWorkerConfig,
    buffer: Arc<AutosaveBuffer>,
    api: Arc<dyn EditorApiPort>,
}

impl AutosaveWorker {
    pub fn new(
        config: AutosaveWorkerConfig,
        buffer: Arc<AutosaveBuffer>,
        api: Arc<dyn EditorApiPort>,
    ) -> Self {
        Self {
            config,
            buffer,
            api,
        }
    }

    /// 启动 Worker，`shutdown` 完成后做最后一次刷新并退出
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!(
            book_id = %self.buffer.book_id(),
            interval_ms = self.config.interval_ms,
            "AutosaveWorker started"
        );

        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.buffer.pending() > 0 {
                        self.buffer.flush(self.api.as_ref()).await;
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        let report = self.buffer.flush(self.api.as_ref()).await;
        if report.failed > 0 {
            tracing::warn!(
                book_id = %self.buffer.book_id(),
                unsaved = self.buffer.pending(),
                "AutosaveWorker stopped with unsaved sections"
            );
        }

        tracing::info!("AutosaveWorker stopped");
    }
}
