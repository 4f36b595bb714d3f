//! Section Command Handlers

use std::sync::Arc;

use crate::application::commands::UpdateSection;
use crate::application::error::ApplicationError;
use crate::application::ports::BookRepositoryPort;

/// UpdateSection Handler
///
/// 最后写入者获胜：并发更新同一段落时不合并，以最后落库的内容为准。
pub struct UpdateSectionHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl UpdateSectionHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: UpdateSection) -> Result<(), ApplicationError> {
        let updated = self
            .book_repo
            .update_section(
                command.book_id,
                command.section_id,
                command.order,
                &command.content,
            )
            .await?;

        if !updated {
            return Err(ApplicationError::not_found("Section", command.section_id));
        }

        tracing::debug!(
            book_id = %command.book_id,
            section_id = %command.section_id,
            order = command.order,
            content_len = command.content.len(),
            "Section updated"
        );

        Ok(())
    }
}
