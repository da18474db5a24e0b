//! v001 -- Initial schema creation.
//!
//! Creates `local_storage` (string key/value pairs such as the session
//! token) and `app_settings` (a single JSON document).

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS local_storage (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL                -- RFC-3339
);

CREATE TABLE IF NOT EXISTS app_settings (
    id   INTEGER PRIMARY KEY CHECK (id = 1),
    json TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
