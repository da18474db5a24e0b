//! Learning plans: the user's own plans with a create/edit form.
//!
//! Every confirmed mutation re-fetches the list.

use skillsync_shared::models::{LearningPlan, LearningPlanDraft};
use skillsync_shared::types::PlanId;
use skillsync_shared::validation::{split_comma_list, Schema};
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::fetch::Remote;
use crate::form::FormController;
use crate::state::Context;

#[derive(Debug, Clone)]
pub struct PlansPanel {
    plans: Remote<Vec<LearningPlan>>,
    pub form: FormController,
    editing: Option<PlanId>,
}

impl Default for PlansPanel {
    fn default() -> Self {
        Self {
            plans: Remote::new(),
            form: FormController::new(Schema::learning_plan(), "Create Plan", "Saving..."),
            editing: None,
        }
    }
}

impl PlansPanel {
    pub fn plans(&self) -> &Remote<Vec<LearningPlan>> {
        &self.plans
    }

    pub fn editing(&self) -> Option<&PlanId> {
        self.editing.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        match (&self.editing, self.form.is_submitting()) {
            (_, true) => self.form.submit_label(),
            (Some(_), false) => "Update Plan",
            (None, false) => self.form.submit_label(),
        }
    }

    /// `GET /learningplans/my`
    pub async fn load(&mut self, ctx: &Context) -> Result<()> {
        self.plans.start();
        match ctx.api.my_plans().await {
            Ok(plans) => {
                self.plans.resolve(Ok::<_, ClientError>(plans));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching learning plans");
                let message = e.reason_or("Failed to fetch learning plans");
                self.plans.resolve(Err::<Vec<LearningPlan>, _>(message));
                Err(e.into())
            }
        }
    }

    /// Fill the form from a plan; lists are shown comma-joined.
    pub fn start_edit(&mut self, id: &PlanId) -> Result<()> {
        let plan = self
            .plans
            .data()
            .and_then(|plans| plans.iter().find(|p| &p.id == id))
            .ok_or_else(|| ClientError::NotFound(format!("learning plan {id}")))?
            .clone();

        self.form.clear();
        self.form.load([
            ("name", plan.name),
            ("description", plan.description),
            ("topics", plan.topics.join(", ")),
            ("resources", plan.resources.join(", ")),
        ]);
        self.editing = Some(plan.id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    /// Create, or update the plan under edit, then re-fetch.
    pub async fn submit(&mut self, ctx: &Context) -> Result<()> {
        let values = self.form.begin_submit()?;
        let field = |name: &str| values.get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let draft = LearningPlanDraft {
            name: field("name"),
            description: field("description"),
            topics: split_comma_list(&field("topics")),
            resources: split_comma_list(&field("resources")),
        };

        let result = match &self.editing {
            Some(id) => ctx.api.update_plan(id, &draft).await,
            None => ctx.api.create_plan(&draft).await,
        };

        match result {
            Ok(plan) => {
                info!(plan_id = %plan.id, "Learning plan saved");
                self.form.finish(true);
                self.cancel_edit();
                self.load(ctx).await
            }
            Err(e) => {
                self.form.finish(false);
                warn!(error = %e, "Error saving learning plan");
                ctx.events.alert(e.reason_or("Failed to save learning plan"));
                Err(e.into())
            }
        }
    }

    /// Delete and re-fetch. Deleting the plan under edit also resets the form.
    pub async fn delete(&mut self, ctx: &Context, id: &PlanId) -> Result<()> {
        match ctx.api.delete_plan(id).await {
            Ok(()) => {
                info!(plan_id = %id, "Learning plan deleted");
                if self.editing.as_ref() == Some(id) {
                    self.cancel_edit();
                }
                self.load(ctx).await
            }
            Err(e) => {
                warn!(plan_id = %id, error = %e, "Error deleting learning plan");
                ctx.events.alert(e.reason_or("Failed to delete learning plan"));
                Err(e.into())
            }
        }
    }
}
