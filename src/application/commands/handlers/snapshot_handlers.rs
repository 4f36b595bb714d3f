//! Snapshot Command Handlers

use std::sync::Arc;

use crate::application::commands::CreateSnapshot;
use crate::application::error::ApplicationError;
use crate::application::ports::SnapshotRepositoryPort;
use crate::domain::book::{Snapshot, SnapshotId};

/// CreateSnapshot Handler
pub struct CreateSnapshotHandler {
    snapshot_repo: Arc<dyn SnapshotRepositoryPort>,
}

impl CreateSnapshotHandler {
    pub fn new(snapshot_repo: Arc<dyn SnapshotRepositoryPort>) -> Self {
        Self { snapshot_repo }
    }

    pub async fn handle(&self, command: CreateSnapshot) -> Result<Snapshot, ApplicationError> {
        let id = SnapshotId::new(command.at.timestamp());

        // 快照以秒级时间戳标识
        if self.snapshot_repo.exists(command.book_id, id).await? {
            return Err(ApplicationError::business_rule(format!(
                "Snapshot {} already exists",
                id
            )));
        }

        let snapshot = self.snapshot_repo.create(command.book_id, id).await?;

        tracing::info!(book_id = %command.book_id, snapshot = %id, "Snapshot created");

        Ok(snapshot)
    }
}
