//! Settings Commands

use crate::domain::settings::{Settings, SettingsImport};

/// 更新设置命令（import + save）
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub current: Settings,
    pub data: SettingsImport,
}
