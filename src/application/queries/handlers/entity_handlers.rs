//! Entity Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{EntityRecord, EntityRepositoryPort};
use crate::application::queries::{GetEntity, ListEntities};

/// GetEntity Handler
pub struct GetEntityHandler {
    entity_repo: Arc<dyn EntityRepositoryPort>,
}

impl GetEntityHandler {
    pub fn new(entity_repo: Arc<dyn EntityRepositoryPort>) -> Self {
        Self { entity_repo }
    }

    pub async fn handle(&self, query: GetEntity) -> Result<EntityRecord, ApplicationError> {
        self.entity_repo
            .find(query.book_id, query.entity_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Entity", query.entity_id))
    }
}

/// ListEntities Handler
pub struct ListEntitiesHandler {
    entity_repo: Arc<dyn EntityRepositoryPort>,
}

impl ListEntitiesHandler {
    pub fn new(entity_repo: Arc<dyn EntityRepositoryPort>) -> Self {
        Self { entity_repo }
    }

    pub async fn handle(&self, query: ListEntities) -> Result<Vec<EntityRecord>, ApplicationError> {
        Ok(self.entity_repo.list(query.book_id).await?)
    }
}
