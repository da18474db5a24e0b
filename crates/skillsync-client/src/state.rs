//! Application shell state.
//!
//! [`AppState`] owns everything a running client has: the local store, the
//! HTTP session, the signed-in user, the current [`Section`] and one panel
//! per section. It drives the authentication flows and navigation; panel
//! actions are reached through [`AppState::active`].

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use skillsync_net::oauth::{self, OAuthRequest};
use skillsync_net::{ApiClient, GenerativeClient, NetError, Session};
use skillsync_shared::models::{Credentials, GoogleCredential, SignupRequest, User};
use skillsync_shared::types::Section;
use skillsync_shared::validation::Schema;
use skillsync_store::Database;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::{drain, AppEvent, EventBus};
use crate::form::FormController;
use crate::panels::chat::ChatWidget;
use crate::panels::explore::ExplorePanel;
use crate::panels::feed::{FeedPanel, FeedSource};
use crate::panels::messages::{ConversationSource, MessagesPanel, SampleConversations};
use crate::panels::notifications::{NotificationSource, NotificationsPanel, SampleNotifications};
use crate::panels::plans::PlansPanel;
use crate::panels::profile::ProfilePanel;
use crate::panels::progress::ProgressPanel;

/// What every backend-facing panel action needs: the API client (which
/// carries the shared session) and the event bus.
#[derive(Clone, Debug)]
pub struct Context {
    pub api: ApiClient,
    pub events: EventBus,
}

impl Context {
    pub fn new(api: ApiClient, events: EventBus) -> Self {
        Self { api, events }
    }
}

/// Screen shown while logged out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScreen {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Default)]
pub struct Panels {
    pub feed: FeedPanel,
    pub plans: PlansPanel,
    pub progress: ProgressPanel,
    pub explore: ExplorePanel,
    pub profile: ProfilePanel,
    pub notifications: NotificationsPanel,
    pub messages: MessagesPanel,
}

pub struct AppState {
    config: ClientConfig,
    store: Database,
    ctx: Context,
    chat_client: GenerativeClient,
    events_rx: broadcast::Receiver<AppEvent>,
    user: Option<User>,
    section: Section,
    auth_screen: AuthScreen,
    pending_oauth: Option<OAuthRequest>,
    notification_source: Box<dyn NotificationSource>,
    conversation_source: Box<dyn ConversationSource>,
    pub login_form: FormController,
    pub signup_form: FormController,
    pub panels: Panels,
    pub chat: ChatWidget,
}

impl AppState {
    /// Open the database under the configured data directory and build the
    /// shell on top of it.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let store = Database::open_default(config.data_dir.as_deref())?;
        Self::new(config, store)
    }

    pub fn new(config: ClientConfig, store: Database) -> Result<Self> {
        let settings = store.load_settings()?;
        let config = config.with_settings(&settings);

        let events = EventBus::new();
        let events_rx = events.subscribe();
        let api = ApiClient::new(&config.api_base_url, Session::new())?;
        let chat_client = GenerativeClient::via_proxy(&config.chat_url)?;

        info!(api = %config.api_base_url, section = %settings.last_section, "Client state ready");

        Ok(Self {
            config,
            store,
            ctx: Context::new(api, events),
            chat_client,
            events_rx,
            user: None,
            section: settings.last_section,
            auth_screen: AuthScreen::Login,
            pending_oauth: None,
            notification_source: Box::new(SampleNotifications),
            conversation_source: Box::new(SampleConversations),
            login_form: FormController::new(Schema::login(), "Login", "Logging in..."),
            signup_form: FormController::new(Schema::signup(), "Sign Up", "Signing up..."),
            panels: Panels::default(),
            chat: ChatWidget::default(),
        })
    }

    pub fn with_notification_source(mut self, source: impl NotificationSource + 'static) -> Self {
        self.notification_source = Box::new(source);
        self
    }

    pub fn with_conversation_source(mut self, source: impl ConversationSource + 'static) -> Self {
        self.conversation_source = Box::new(source);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Database {
        &self.store
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn auth_screen(&self) -> AuthScreen {
        self.auth_screen
    }

    pub fn show_signup(&mut self) {
        self.auth_screen = AuthScreen::Signup;
    }

    pub fn show_login(&mut self) {
        self.auth_screen = AuthScreen::Login;
    }

    /// Context, signed-in user and panels at once, so panel actions can be
    /// called without fighting the borrow checker. `None` while logged out.
    pub fn active(&mut self) -> Option<(&Context, &User, &mut Panels)> {
        let user = self.user.as_ref()?;
        Some((&self.ctx, user, &mut self.panels))
    }

    // -- Session -----------------------------------------------------------

    /// Restore a stored session. Returns whether the client is now signed
    /// in; a rejected or unreachable session clears the stored token.
    pub async fn restore_session(&mut self) -> Result<bool> {
        let Some(token) = self.store.load_token()? else {
            debug!("No stored session");
            return Ok(false);
        };
        self.ctx.api.session().set_token(token);

        match self.ctx.api.current_user().await {
            Ok(user) => {
                info!(user_id = %user.id, "Session restored");
                self.sign_in(user).await;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected");
                self.drop_session();
                Ok(false)
            }
        }
    }

    pub async fn login(&mut self) -> Result<()> {
        let values = self.login_form.begin_submit()?;
        let credentials = Credentials {
            email: values.get("email").map(|v| v.trim().to_string()).unwrap_or_default(),
            password: values.get("password").cloned().unwrap_or_default(),
        };

        match self.ctx.api.login(&credentials).await {
            Ok(auth) => {
                self.login_form.finish(true);
                self.after_auth(&auth.token).await
            }
            Err(e) => {
                self.login_form.finish(false);
                self.ctx.events.alert(format!("Login failed: {e}"));
                Err(e.into())
            }
        }
    }

    pub async fn signup(&mut self) -> Result<()> {
        let values = self.signup_form.begin_submit()?;
        let field = |name: &str| values.get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let request = SignupRequest {
            name: field("name"),
            email: field("email"),
            password: values.get("password").cloned().unwrap_or_default(),
        };

        match self.ctx.api.signup(&request).await {
            Ok(auth) => {
                self.signup_form.finish(true);
                self.after_auth(&auth.token).await
            }
            Err(e) => {
                self.signup_form.finish(false);
                let message = match &e {
                    NetError::Conflict(msg) => msg.clone(),
                    other => format!("Signup failed: {other}"),
                };
                self.ctx.events.alert(message);
                Err(e.into())
            }
        }
    }

    /// Start Google sign-in: returns the URL to open in a browser.
    pub fn google_authorization(&mut self) -> Result<String> {
        let (Some(client_id), Some(redirect)) = (
            self.config.google_client_id.as_deref(),
            self.config.oauth_redirect_uri.as_deref(),
        ) else {
            return Err(ClientError::Rejected("Google sign-in is not configured".into()));
        };
        let request = oauth::authorization_url(client_id, redirect)?;
        let url = request.url.clone();
        self.pending_oauth = Some(request);
        Ok(url)
    }

    /// Finish Google sign-in with the redirect fragment. `signup` selects
    /// `/auth/google-signup` over `/auth/google`.
    pub async fn complete_google(&mut self, fragment: &str, signup: bool) -> Result<()> {
        let pending = self
            .pending_oauth
            .take()
            .ok_or_else(|| ClientError::Rejected("No Google sign-in in progress".into()))?;
        let Some(access_token) = oauth::parse_callback_fragment(fragment, &pending.state) else {
            warn!("Google callback without a matching token");
            return Err(ClientError::Rejected("Google sign-in was cancelled".into()));
        };

        let credential = GoogleCredential {
            credential: access_token,
        };
        let result = if signup {
            self.ctx.api.google_signup(&credential).await
        } else {
            self.ctx.api.google_login(&credential).await
        };

        match result {
            Ok(auth) => self.after_auth(&auth.token).await,
            Err(e) => {
                let action = if signup { "Google signup" } else { "Google login" };
                self.ctx.events.alert(format!("{action} failed: {e}"));
                Err(e.into())
            }
        }
    }

    /// Persist the token, then load the profile. Nothing stays stored
    /// when the profile cannot be loaded.
    async fn after_auth(&mut self, token: &str) -> Result<()> {
        self.ctx.api.session().set_token(token);
        self.store.save_token(token)?;

        match self.ctx.api.current_user().await {
            Ok(user) => {
                info!(user_id = %user.id, "Signed in");
                self.section = Section::Home;
                self.sign_in(user).await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load profile after sign-in");
                self.drop_session();
                self.ctx.events.alert(format!("Login failed: {e}"));
                Err(e.into())
            }
        }
    }

    async fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.ctx.events.emit(AppEvent::SessionChanged { authenticated: true });
        self.mount().await;
    }

    fn drop_session(&mut self) {
        self.ctx.api.session().clear();
        if let Err(e) = self.store.clear_token() {
            error!(error = %e, "Failed to clear stored token");
        }
        self.user = None;
    }

    pub fn logout(&mut self) {
        self.drop_session();
        self.panels = Panels::default();
        self.chat = ChatWidget::default();
        self.pending_oauth = None;
        self.auth_screen = AuthScreen::Login;
        self.ctx.events.emit(AppEvent::SessionChanged { authenticated: false });
        info!("Logged out");
    }

    // -- Navigation --------------------------------------------------------

    /// Switch sections, remember the choice and load the new panel.
    pub async fn navigate(&mut self, section: Section) {
        self.section = section;
        match self.store.load_settings() {
            Ok(mut settings) => {
                settings.last_section = section;
                if let Err(e) = self.store.save_settings(&settings) {
                    warn!(error = %e, "Failed to persist section");
                }
            }
            Err(e) => warn!(error = %e, "Failed to read settings"),
        }
        self.mount().await;
    }

    /// Load data for the current section. Failures are already recorded on
    /// the panel.
    async fn mount(&mut self) {
        let Some(user) = self.user.as_ref() else {
            return;
        };
        let ctx = &self.ctx;
        let panels = &mut self.panels;

        let result = match self.section {
            Section::Home | Section::Explore => {
                if self.section == Section::Explore {
                    if let Err(e) = panels.explore.load(ctx, user).await {
                        warn!(error = %e, "Recommendations unavailable, showing feed only");
                    }
                }
                let source = FeedSource::for_section(self.section).unwrap_or_default();
                panels.feed.set_source(source);
                panels.feed.refresh(ctx, &user.id).await
            }
            Section::LearningPlans => panels.plans.load(ctx).await,
            Section::LearningProgress => panels.progress.load(ctx).await,
            Section::Profile => Ok(()),
            Section::Notifications => {
                panels.notifications.load(self.notification_source.as_ref());
                Ok(())
            }
            Section::Messages => {
                panels.messages.load(self.conversation_source.as_ref());
                Ok(())
            }
        };
        if let Err(e) = result {
            debug!(section = %self.section, error = %e, "Section loaded with errors");
        }
    }

    /// Re-fetch the feed for the current section.
    pub async fn refresh_feed(&mut self) -> Result<()> {
        let user = self.user.as_ref().ok_or(ClientError::NotAuthenticated)?;
        let source = FeedSource::for_section(self.section).unwrap_or_default();
        self.panels.feed.set_source(source);
        self.panels.feed.refresh(&self.ctx, &user.id).await
    }

    // -- Events ------------------------------------------------------------

    /// Apply queued panel events to the shell and hand them to the caller
    /// (alerts are for the front end to show).
    pub fn process_events(&mut self) -> Vec<AppEvent> {
        let events = drain(&mut self.events_rx);
        for event in &events {
            if let AppEvent::ProfileUpdated(user) = event {
                debug!(user_id = %user.id, "Applying profile update");
                self.user = Some(user.clone());
            }
        }
        events
    }

    // -- Profile and chat --------------------------------------------------

    pub async fn save_profile(&mut self) -> Result<()> {
        let user = self.user.as_ref().ok_or(ClientError::NotAuthenticated)?;
        let updated = self.panels.profile.save(&self.ctx, user).await?;
        self.user = Some(updated);
        Ok(())
    }

    /// Delete the account and log out.
    pub async fn delete_account(&mut self) -> Result<()> {
        if self.user.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        self.panels.profile.delete_account(&self.ctx).await?;
        self.logout();
        Ok(())
    }

    pub async fn send_chat(&mut self) -> bool {
        self.chat.send(&self.chat_client).await
    }
}
