//! Persisted bearer token.
//!
//! Written once at login and removed at logout; read at startup to restore
//! the previous session.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

const TOKEN_KEY: &str = "token";

impl Database {
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![TOKEN_KEY, token, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>> {
        let token = self
            .conn()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Returns whether a token was stored.
    pub fn clear_token(&self) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![TOKEN_KEY])?;
        Ok(affected > 0)
    }
}
