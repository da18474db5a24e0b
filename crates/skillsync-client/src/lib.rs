//! # skillsync-client
//!
//! Headless SkillSync application shell. [`AppState`] owns the session, the
//! authenticated user, the current navigation section and one panel per
//! section; a front end renders those panels and forwards user actions to
//! their methods.

pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod form;
pub mod panels;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::ClientError;
pub use events::{AppEvent, EventBus};
pub use fetch::{FetchStatus, Remote};
pub use form::FormController;
pub use state::{AppState, AuthScreen, Context, Panels};

/// Install the global fmt subscriber. Honors `RUST_LOG`; safe to call more
/// than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("skillsync_client=debug,skillsync_net=debug,skillsync_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
