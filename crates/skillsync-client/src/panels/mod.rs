//! One panel per navigation section.
//!
//! Panels hold their section's in-memory state and expose the user actions
//! of that section. Actions that touch the backend take the shared
//! [`Context`](crate::state::Context), perform exactly one REST call, and on
//! failure log, raise an alert and leave their state unchanged.

pub mod chat;
pub mod explore;
pub mod feed;
pub mod messages;
pub mod notifications;
pub mod plans;
pub mod profile;
pub mod progress;
