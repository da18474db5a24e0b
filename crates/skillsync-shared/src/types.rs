use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

// Backend ids are opaque document ids (MongoDB ObjectId strings).
string_id!(UserId);
string_id!(PostId);
string_id!(PlanId);
string_id!(ProgressId);
string_id!(
    /// Identifier of an uploaded image or video served under `/posts/media/{id}`.
    MediaId
);

/// Top-level navigation section. Exactly one panel is mounted at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Home,
    Explore,
    LearningPlans,
    LearningProgress,
    Profile,
    Notifications,
    Messages,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Home,
        Section::Explore,
        Section::LearningPlans,
        Section::LearningProgress,
        Section::Profile,
        Section::Notifications,
        Section::Messages,
    ];

    /// Route slug, e.g. `learning-plans`.
    pub fn slug(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Explore => "explore",
            Section::LearningPlans => "learning-plans",
            Section::LearningProgress => "learning-progress",
            Section::Profile => "profile",
            Section::Notifications => "notifications",
            Section::Messages => "messages",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Explore => "Explore",
            Section::LearningPlans => "Learning Plans",
            Section::LearningProgress => "Learning Progress",
            Section::Profile => "Profile",
            Section::Notifications => "Notifications",
            Section::Messages => "Messages",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().trim_start_matches('/');
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    /// Sections that display the shared post feed.
    pub fn shows_feed(self) -> bool {
        matches!(self, Section::Home | Section::Explore)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
