use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use skillsync_shared::types::Section;

use crate::database::Database;
use crate::error::Result;

/// Client settings persisted between runs. Unset URLs fall back to the
/// environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub api_base_url: Option<String>,
    pub chat_url: Option<String>,
    pub last_section: Section,
}

impl Database {
    pub fn load_settings(&self) -> Result<AppSettings> {
        let json: Option<String> = self
            .conn()
            .query_row("SELECT json FROM app_settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(AppSettings::default()),
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO app_settings (id, json) VALUES (1, ?1)",
            params![json],
        )?;
        tracing::info!("Settings updated");
        Ok(())
    }
}
