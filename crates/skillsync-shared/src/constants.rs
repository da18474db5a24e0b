/// Application name
pub const APP_NAME: &str = "SkillSync";

/// Default REST backend base URL (all paths below are relative to it)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4043/api";

/// Default chat proxy endpoint
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8080/chat";

/// Upstream generative-language API
pub const DEFAULT_GENERATIVE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATIVE_MODEL: &str = "gemini-2.0-flash";

/// Google OAuth implicit flow
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_OAUTH_SCOPE: &str = "email profile openid";

/// Media path prefix, relative to the API base URL
pub const MEDIA_PATH: &str = "/posts/media";

/// Maximum number of images attached to one post
pub const MAX_POST_IMAGES: usize = 3;

/// Maximum size of a single uploaded media file (50 MiB)
pub const MAX_MEDIA_SIZE: usize = 50 * 1024 * 1024;

/// Minimum password length accepted by login and signup forms
pub const MIN_PASSWORD_LEN: usize = 6;

/// Only Gmail addresses may use the password login form
pub const LOGIN_EMAIL_DOMAIN: &str = "@gmail.com";

/// Default maximum prompt length accepted by the chat proxy
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 8000;

/// Chat widget texts
pub const CHAT_GREETING: &str = "Hi! I'm your AI assistant. How can I help you today?";
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I couldn't get a response.";

/// Default HTTP port of the chat proxy
pub const DEFAULT_PROXY_PORT: u16 = 8080;
