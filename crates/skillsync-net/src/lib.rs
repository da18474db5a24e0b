//! # skillsync-net
//!
//! HTTP boundary of the SkillSync client.
//!
//! - [`Session`]: the bearer token slot shared by every outgoing call
//! - [`ApiClient`]: authenticated REST/JSON client; one module per backend
//!   resource adds its calls (`auth`, `users`, `posts`, `plans`, `progress`)
//! - [`GenerativeClient`]: text-generation calls, normally through the
//!   SkillSync chat proxy
//! - [`oauth`]: Google implicit-flow URL building and callback parsing
//!
//! Every response is decoded into a typed record and shape-checked before it
//! reaches the caller; malformed payloads surface as [`NetError`].

pub mod auth;
pub mod error;
pub mod generative;
pub mod media;
pub mod oauth;
pub mod plans;
pub mod posts;
pub mod progress;
pub mod session;
pub mod transport;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::NetError;
pub use generative::{ChatEndpoint, GenerativeClient};
pub use media::{MediaKind, MediaUpload};
pub use session::Session;
pub use transport::ApiClient;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;
