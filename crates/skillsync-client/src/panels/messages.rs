//! Direct messages. Like notifications, conversations have no backend
//! contract and are served by a [`ConversationSource`]; sent messages live
//! only in memory.

use chrono::Local;
use skillsync_shared::models::{Conversation, DirectMessage};

pub trait ConversationSource: Send + Sync {
    fn conversations(&self) -> Vec<Conversation>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleConversations;

impl ConversationSource for SampleConversations {
    fn conversations(&self) -> Vec<Conversation> {
        vec![
            Conversation {
                id: 1,
                user: "John Doe".into(),
                photo: Some("https://randomuser.me/api/portraits/men/32.jpg".into()),
                last_message: "Hey, how are you?".into(),
                last_time: "10:15 AM".into(),
                messages: vec![
                    DirectMessage {
                        from_me: false,
                        text: "Hey, how are you?".into(),
                        time: "10:15 AM".into(),
                    },
                    DirectMessage {
                        from_me: true,
                        text: "I'm good, thanks!".into(),
                        time: "10:16 AM".into(),
                    },
                ],
            },
            Conversation {
                id: 2,
                user: "Jane Smith".into(),
                photo: Some("https://randomuser.me/api/portraits/women/44.jpg".into()),
                last_message: "Let's catch up soon!".into(),
                last_time: "Yesterday".into(),
                messages: vec![DirectMessage {
                    from_me: false,
                    text: "Let's catch up soon!".into(),
                    time: "Yesterday".into(),
                }],
            },
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessagesPanel {
    conversations: Vec<Conversation>,
    selected: Option<u64>,
    draft: String,
}

impl MessagesPanel {
    pub fn load(&mut self, source: &dyn ConversationSource) {
        self.conversations = source.conversations();
        self.selected = None;
        self.draft.clear();
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn select(&mut self, id: u64) -> bool {
        if self.conversations.iter().any(|c| c.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Conversation> {
        let id = self.selected?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Append the draft to the selected conversation. Blank drafts and a
    /// missing selection are ignored.
    pub fn send(&mut self) -> bool {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return false;
        }
        let Some(id) = self.selected else {
            return false;
        };
        let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) else {
            return false;
        };

        let time = Local::now().format("%I:%M %p").to_string();
        conversation.messages.push(DirectMessage {
            from_me: true,
            text: text.clone(),
            time: time.clone(),
        });
        conversation.last_message = text;
        conversation.last_time = time;
        self.draft.clear();
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> MessagesPanel {
        let mut panel = MessagesPanel::default();
        panel.load(&SampleConversations);
        panel
    }

    #[test]
    fn send_appends_and_updates_preview() {
        let mut panel = loaded();
        assert!(panel.select(2));
        panel.set_draft("  See you Friday ");
        assert!(panel.send());

        let convo = panel.selected().unwrap();
        assert_eq!(convo.messages.len(), 2);
        let last = convo.messages.last().unwrap();
        assert!(last.from_me);
        assert_eq!(last.text, "See you Friday");
        assert_eq!(convo.last_message, "See you Friday");
        assert_eq!(convo.last_time, last.time);
        assert!(panel.draft().is_empty());
    }

    #[test]
    fn blank_or_unselected_is_ignored() {
        let mut panel = loaded();
        panel.set_draft("hello");
        assert!(!panel.send());

        panel.select(1);
        panel.set_draft("   ");
        assert!(!panel.send());
        assert_eq!(panel.selected().unwrap().messages.len(), 2);
    }

    #[test]
    fn unknown_conversation_is_not_selected() {
        let mut panel = loaded();
        assert!(!panel.select(9));
        assert!(panel.selected().is_none());
    }
}
