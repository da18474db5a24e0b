//! Profile page and its settings dialog.

use skillsync_shared::models::{ProfileUpdate, User};
use skillsync_shared::validation::Schema;
use tracing::{info, warn};

use crate::error::Result;
use crate::events::AppEvent;
use crate::form::FormController;
use crate::state::Context;

#[derive(Debug, Clone)]
pub struct ProfilePanel {
    settings_open: bool,
    pub form: FormController,
}

impl Default for ProfilePanel {
    fn default() -> Self {
        Self {
            settings_open: false,
            form: FormController::new(Schema::profile(), "Save Changes", "Saving..."),
        }
    }
}

impl ProfilePanel {
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Open settings pre-filled from the current user. The password
    /// starts blank; leaving it blank keeps the current one.
    pub fn open_settings(&mut self, user: &User) {
        self.form.clear();
        self.form.load([
            ("name", user.name.as_str()),
            ("email", user.email.as_str()),
            ("password", ""),
        ]);
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
        self.form.clear();
    }

    /// `PUT /users/me`. The email field is display-only: the signed-in
    /// address is always sent.
    pub async fn save(&mut self, ctx: &Context, user: &User) -> Result<User> {
        let values = self.form.begin_submit()?;
        let password = values
            .get("password")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let update = ProfileUpdate {
            name: values.get("name").map(|n| n.trim().to_string()).unwrap_or_default(),
            email: user.email.clone(),
            password,
        };

        match ctx.api.update_me(&update).await {
            Ok(updated) => {
                info!(user_id = %updated.id, "Profile updated");
                self.form.finish(true);
                self.close_settings();
                ctx.events.emit(AppEvent::ProfileUpdated(updated.clone()));
                Ok(updated)
            }
            Err(e) => {
                self.form.finish(false);
                ctx.events.alert(format!("Failed to update profile: {e}"));
                Err(e.into())
            }
        }
    }

    /// `DELETE /users/me`. The caller logs out on success.
    pub async fn delete_account(&mut self, ctx: &Context) -> Result<()> {
        match ctx.api.delete_me().await {
            Ok(()) => {
                info!("Account deleted");
                self.close_settings();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error deleting account");
                ctx.events.alert(format!("Failed to delete account: {e}"));
                Err(e.into())
            }
        }
    }
}
