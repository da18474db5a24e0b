//! In-process event bus between panels and the shell.

use tokio::sync::broadcast;

use skillsync_shared::models::User;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The profile panel saved new user details.
    ProfileUpdated(User),
    /// Login, logout or session restore changed the authenticated state.
    SessionChanged { authenticated: bool },
    /// The feed was (re)loaded.
    FeedRefreshed { posts: usize },
    /// A blocking message for the user (the dialog of a failed mutation).
    Alert(String),
    /// A post was created from the composer.
    PostCreated,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Events are fire-and-forget; having no subscriber is not an error.
    pub fn emit(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!(event = ?e.0, "No subscriber for event");
        }
    }

    /// Log a warning and raise a user-facing alert.
    pub fn alert(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "Alert");
        self.emit(AppEvent::Alert(message));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain whatever is currently queued on `rx` without waiting.
pub fn drain(rx: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event receiver lagged");
            }
            Err(_) => break,
        }
    }
    events
}
