//! Notification list. The backend has no notification endpoint yet, so
//! entries come from a [`NotificationSource`]; the default one serves a
//! fixed sample set.

use skillsync_shared::models::{Notification, NotificationKind};

pub trait NotificationSource: Send + Sync {
    fn notifications(&self) -> Vec<Notification>;
}

/// Fixed sample notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleNotifications;

impl NotificationSource for SampleNotifications {
    fn notifications(&self) -> Vec<Notification> {
        vec![
            Notification {
                id: 1,
                kind: NotificationKind::Like,
                title: "New Like".into(),
                message: "John Doe liked your post".into(),
                time: "2025-04-18 09:30".into(),
                unread: true,
            },
            Notification {
                id: 2,
                kind: NotificationKind::Comment,
                title: "New Comment".into(),
                message: "Jane Smith commented: \"Great job!\"".into(),
                time: "2025-04-18 08:45".into(),
                unread: false,
            },
            Notification {
                id: 3,
                kind: NotificationKind::Follow,
                title: "New Follower".into(),
                message: "Michael Lee started following you".into(),
                time: "2025-04-17 17:00".into(),
                unread: true,
            },
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationsPanel {
    items: Vec<Notification>,
}

impl NotificationsPanel {
    pub fn load(&mut self, source: &dyn NotificationSource) {
        self.items = source.notifications();
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| n.unread).count()
    }

    /// Returns false for an unknown id.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.unread = false;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.unread = false;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
