//! Settings Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SettingsRepositoryPort;
use crate::application::queries::LoadSettings;
use crate::domain::settings::Settings;

/// LoadSettings Handler
pub struct LoadSettingsHandler {
    settings_repo: Arc<dyn SettingsRepositoryPort>,
}

impl LoadSettingsHandler {
    pub fn new(settings_repo: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self { settings_repo }
    }

    pub async fn handle(&self, query: LoadSettings) -> Result<Settings, ApplicationError> {
        Ok(self.settings_repo.find_or_create(query.book_id).await?)
    }
}
