//! Learning progress: records with topic checklists, a row editor for
//! topics and resources, and a client-side search.

use skillsync_shared::models::{LearningProgress, LearningProgressDraft, Resource, Topic};
use skillsync_shared::progress::completion_percent;
use skillsync_shared::search::filter_progress;
use skillsync_shared::types::ProgressId;
use skillsync_shared::validation::Schema;
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::fetch::Remote;
use crate::form::FormController;
use crate::state::Context;

#[derive(Debug, Clone)]
pub struct ProgressPanel {
    records: Remote<Vec<LearningProgress>>,
    pub form: FormController,
    topics: Vec<Topic>,
    resources: Vec<Resource>,
    editing: Option<ProgressId>,
    search: String,
}

impl Default for ProgressPanel {
    fn default() -> Self {
        Self {
            records: Remote::new(),
            form: FormController::new(Schema::learning_progress(), "Add Progress", "Saving..."),
            topics: vec![Topic::default()],
            resources: vec![Resource::default()],
            editing: None,
            search: String::new(),
        }
    }
}

impl ProgressPanel {
    pub fn records(&self) -> &Remote<Vec<LearningProgress>> {
        &self.records
    }

    pub fn editing(&self) -> Option<&ProgressId> {
        self.editing.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() && !self.form.is_submitting() {
            "Update Progress"
        } else {
            self.form.submit_label()
        }
    }

    // -- Search ------------------------------------------------------------

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Records matching the search term, in backend order.
    pub fn visible(&self) -> Vec<&LearningProgress> {
        let records = self.records.data().map(Vec::as_slice).unwrap_or_default();
        filter_progress(records, &self.search)
    }

    // -- Topic and resource rows -------------------------------------------

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn add_topic(&mut self) {
        self.topics.push(Topic::default());
    }

    /// Remove a row; the last remaining row is blanked instead.
    pub fn remove_topic(&mut self, index: usize) {
        remove_row(&mut self.topics, index);
    }

    pub fn update_topic(&mut self, index: usize, f: impl FnOnce(&mut Topic)) {
        if let Some(topic) = self.topics.get_mut(index) {
            f(topic);
        }
    }

    pub fn add_resource(&mut self) {
        self.resources.push(Resource::default());
    }

    pub fn remove_resource(&mut self, index: usize) {
        remove_row(&mut self.resources, index);
    }

    pub fn update_resource(&mut self, index: usize, f: impl FnOnce(&mut Resource)) {
        if let Some(resource) = self.resources.get_mut(index) {
            f(resource);
        }
    }

    /// Percentage shown under the editor, over named topics only.
    pub fn draft_percent(&self) -> u8 {
        let named: Vec<&Topic> = self
            .topics
            .iter()
            .filter(|t| !t.name.trim().is_empty())
            .collect();
        completion_percent(&named)
    }

    fn reset_editor(&mut self) {
        self.form.clear();
        self.topics = vec![Topic::default()];
        self.resources = vec![Resource::default()];
        self.editing = None;
    }

    // -- Backend actions ---------------------------------------------------

    /// `GET /learning-progress`
    pub async fn load(&mut self, ctx: &Context) -> Result<()> {
        self.records.start();
        match ctx.api.list_progress().await {
            Ok(records) => {
                self.records.resolve(Ok::<_, ClientError>(records));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching learning progress");
                self.records
                    .resolve(Err::<Vec<LearningProgress>, _>(
                        e.reason_or("Failed to fetch learning progress"),
                    ));
                Err(e.into())
            }
        }
    }

    pub fn start_edit(&mut self, id: &ProgressId) -> Result<()> {
        let record = self
            .records
            .data()
            .and_then(|records| records.iter().find(|r| &r.id == id))
            .ok_or_else(|| ClientError::NotFound(format!("learning progress {id}")))?
            .clone();

        self.reset_editor();
        self.form.load([
            ("name", record.name),
            ("description", record.description),
        ]);
        if !record.topics.is_empty() {
            self.topics = record.topics;
        }
        if !record.resources.is_empty() {
            self.resources = record.resources;
        }
        self.editing = Some(record.id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.reset_editor();
    }

    /// Create (append the stored record) or update (replace it by id).
    /// Blank topic/resource rows are not sent.
    pub async fn submit(&mut self, ctx: &Context) -> Result<()> {
        let values = self.form.begin_submit()?;
        let draft = LearningProgressDraft::new(
            values.get("name").map(|v| v.trim()).unwrap_or_default(),
            values.get("description").map(|v| v.trim()).unwrap_or_default(),
            &self.topics,
            &self.resources,
        );

        let result = match &self.editing {
            Some(id) => ctx.api.update_progress(id, &draft).await,
            None => ctx.api.create_progress(&draft).await,
        };

        match result {
            Ok(saved) => {
                info!(progress_id = %saved.id, progress = saved.progress, "Learning progress saved");
                self.form.finish(true);
                self.upsert(saved);
                self.reset_editor();
                Ok(())
            }
            Err(e) => {
                self.form.finish(false);
                warn!(error = %e, "Error saving progress");
                ctx.events.alert(e.reason_or("Failed to save progress. Please try again."));
                Err(e.into())
            }
        }
    }

    fn upsert(&mut self, saved: LearningProgress) {
        self.records.update(|records| {
            match records.iter_mut().find(|r| r.id == saved.id) {
                Some(existing) => *existing = saved,
                None => records.push(saved),
            }
        });
    }

    /// Delete; on success the record is filtered out locally.
    pub async fn delete(&mut self, ctx: &Context, id: &ProgressId) -> Result<()> {
        match ctx.api.delete_progress(id).await {
            Ok(()) => {
                info!(progress_id = %id, "Learning progress deleted");
                self.records.update(|records| records.retain(|r| &r.id != id));
                if self.editing.as_ref() == Some(id) {
                    self.reset_editor();
                }
                Ok(())
            }
            Err(e) => {
                warn!(progress_id = %id, error = %e, "Error deleting progress");
                ctx.events.alert(e.reason_or("Failed to delete progress. Please try again."));
                Err(e.into())
            }
        }
    }

    /// Tick or untick a topic of a stored record.
    pub async fn set_topic_completed(
        &mut self,
        ctx: &Context,
        id: &ProgressId,
        topic: &str,
        completed: bool,
    ) -> Result<()> {
        match ctx.api.set_topic_completed(id, topic, completed).await {
            Ok(updated) => {
                self.upsert(updated);
                Ok(())
            }
            Err(e) => {
                warn!(progress_id = %id, topic, error = %e, "Error updating topic");
                ctx.events.alert(e.reason_or("Failed to update topic status. Please try again."));
                Err(e.into())
            }
        }
    }
}

fn remove_row<T: Default>(rows: &mut Vec<T>, index: usize) {
    if index >= rows.len() {
        return;
    }
    if rows.len() == 1 {
        rows[0] = T::default();
    } else {
        rows.remove(index);
    }
}
