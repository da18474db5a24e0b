//! # skillsync-store
//!
//! Client-side storage for SkillSync, backed by SQLite.
//!
//! Holds what a browser client would keep in local storage: the bearer
//! token of the current session and the persisted client settings. The
//! crate exposes a synchronous `Database` handle wrapping a
//! `rusqlite::Connection` with typed helpers for each record.

pub mod database;
pub mod migrations;
pub mod settings;
pub mod token;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use settings::AppSettings;
