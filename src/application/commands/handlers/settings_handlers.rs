//! Settings Command Handlers

use std::sync::Arc;

use crate::application::commands::UpdateSettings;
use crate::application::error::ApplicationError;
use crate::application::ports::SettingsRepositoryPort;
use crate::domain::settings::Settings;

/// UpdateSettings Handler - import 全部字段后保存
pub struct UpdateSettingsHandler {
    settings_repo: Arc<dyn SettingsRepositoryPort>,
}

impl UpdateSettingsHandler {
    pub fn new(settings_repo: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self { settings_repo }
    }

    pub async fn handle(&self, command: UpdateSettings) -> Result<Settings, ApplicationError> {
        let mut settings = command.current;
        settings.import(command.data)?;

        if !self.settings_repo.save(&settings).await? {
            return Err(ApplicationError::not_found("Settings", settings.book_id()));
        }

        tracing::info!(book_id = %settings.book_id(), "Settings updated");

        Ok(settings)
    }
}
