//! Floating chat assistant.
//!
//! `Idle -> Sending -> Idle`. Each request carries only the latest user
//! message; a failed call becomes a bot entry flagged as an error.

use skillsync_net::{GenerativeClient, NetError};
use skillsync_shared::constants::CHAT_GREETING;
use skillsync_shared::markup::{escape_html, format_bot_response};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub author: Author,
    pub text: String,
    /// Display markup; bot replies are formatted, user text is escaped.
    pub html: String,
    pub is_error: bool,
}

impl ChatEntry {
    fn user(text: String) -> Self {
        Self {
            author: Author::User,
            html: escape_html(&text),
            text,
            is_error: false,
        }
    }

    fn bot(text: String, is_error: bool) -> Self {
        Self {
            author: Author::Bot,
            html: format_bot_response(&text),
            text,
            is_error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    open: bool,
    status: ChatStatus,
    input: String,
    transcript: Vec<ChatEntry>,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self {
            open: false,
            status: ChatStatus::Idle,
            input: String::new(),
            transcript: vec![ChatEntry::bot(CHAT_GREETING.to_string(), false)],
        }
    }
}

impl ChatWidget {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Input and submit are disabled while sending.
    pub fn can_send(&self) -> bool {
        self.status == ChatStatus::Idle && !self.input.trim().is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.status == ChatStatus::Idle {
            self.input = text.into();
        }
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Take the current input as the next prompt. Returns `None` (and
    /// records nothing) for blank input or while a request is outstanding.
    pub fn begin(&mut self) -> Option<String> {
        if self.status == ChatStatus::Sending {
            return None;
        }
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            return None;
        }
        self.input.clear();
        self.transcript.push(ChatEntry::user(prompt.clone()));
        self.status = ChatStatus::Sending;
        Some(prompt)
    }

    /// Record the outcome of the request started by [`Self::begin`].
    pub fn complete(&mut self, result: Result<String, NetError>) {
        let entry = match result {
            Ok(reply) => ChatEntry::bot(reply, false),
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                ChatEntry::bot(format!("Error: {e}"), true)
            }
        };
        self.transcript.push(entry);
        self.status = ChatStatus::Idle;
    }

    /// Send the current input and wait for the reply.
    pub async fn send(&mut self, client: &GenerativeClient) -> bool {
        let Some(prompt) = self.begin() else {
            return false;
        };
        debug!(chars = prompt.chars().count(), "Sending chat prompt");
        let result = client.reply(&prompt).await;
        self.complete(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::test_support::{spawn_backend, Hits};

    use super::*;

    async fn proxy(status: StatusCode, hits: Hits) -> GenerativeClient {
        let app = Router::new().route(
            "/chat",
            post(move |Json(body): Json<Value>| {
                let hits = hits.clone();
                async move {
                    hits.bump();
                    let prompt = body["contents"][0]["parts"][0]["text"].clone();
                    let reply = json!({"candidates": [{"content": {"parts": [{"text": format!("**echo** {}", prompt.as_str().unwrap_or_default())}]}}]});
                    if status.is_success() {
                        (status, Json(reply))
                    } else {
                        (status, Json(json!({"error": "quota exceeded"})))
                    }
                }
            }),
        );
        let base = spawn_backend(app).await;
        let url = base.trim_end_matches("/api").to_string() + "/chat";
        GenerativeClient::via_proxy(&url).unwrap()
    }

    #[test]
    fn starts_with_greeting() {
        let widget = ChatWidget::default();
        assert_eq!(widget.transcript().len(), 1);
        assert_eq!(widget.transcript()[0].author, Author::Bot);
        assert_eq!(widget.transcript()[0].text, CHAT_GREETING);
    }

    #[tokio::test]
    async fn blank_input_makes_no_call() {
        let hits = Hits::default();
        let client = proxy(StatusCode::OK, hits.clone()).await;
        let mut widget = ChatWidget::default();
        widget.set_input("   ");

        assert!(!widget.send(&client).await);
        assert_eq!(hits.get(), 0);
        assert_eq!(widget.transcript().len(), 1);
    }

    #[tokio::test]
    async fn reply_appends_one_formatted_bot_entry() {
        let hits = Hits::default();
        let client = proxy(StatusCode::OK, hits.clone()).await;
        let mut widget = ChatWidget::default();
        widget.set_input("hello");

        assert!(widget.send(&client).await);
        assert_eq!(hits.get(), 1);
        let entries = widget.transcript();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].author, Author::User);
        assert_eq!(entries[2].author, Author::Bot);
        assert!(!entries[2].is_error);
        assert!(entries[2].html.contains("<strong>echo</strong>"));
        assert_eq!(widget.status(), ChatStatus::Idle);
        assert!(widget.input().is_empty());
    }

    #[tokio::test]
    async fn failure_appends_one_error_entry() {
        let client = proxy(StatusCode::TOO_MANY_REQUESTS, Hits::default()).await;
        let mut widget = ChatWidget::default();
        widget.set_input("hello");

        widget.send(&client).await;
        let last = widget.transcript().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.text, "Error: quota exceeded");
        assert_eq!(widget.transcript().len(), 3);
        assert_eq!(widget.status(), ChatStatus::Idle);
    }

    #[test]
    fn no_second_prompt_while_sending() {
        let mut widget = ChatWidget::default();
        widget.set_input("first");
        assert_eq!(widget.begin().as_deref(), Some("first"));
        widget.set_input("second");
        assert!(widget.begin().is_none());
        assert!(!widget.can_send());
    }
}
