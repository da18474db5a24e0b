//! # skillsync-shared
//!
//! Data model and pure logic shared by every SkillSync crate: the records
//! exchanged with the backend, navigation sections, form validation rules,
//! derived learning progress, search filtering, chat markup and the
//! generative-language wire protocol.
//!
//! Nothing in this crate performs I/O.

pub mod constants;
pub mod error;
pub mod markup;
pub mod models;
pub mod progress;
pub mod protocol;
pub mod search;
pub mod types;
pub mod validation;

pub use error::{PayloadError, ValidationError};
