//! Form submission lifecycle on top of [`FormState`].
//!
//! `begin_submit` validates and marks the form in flight; exactly one
//! network call may follow, after which `finish` re-enables the form and,
//! on success, resets it to its initial values.

use std::collections::BTreeMap;

use skillsync_shared::validation::{FormState, Schema};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct FormController {
    state: FormState,
    in_flight: bool,
    idle_label: &'static str,
    busy_label: &'static str,
}

impl FormController {
    pub fn new(schema: Schema, idle_label: &'static str, busy_label: &'static str) -> Self {
        Self {
            state: FormState::new(schema),
            in_flight: false,
            idle_label,
            busy_label,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, field: &str) -> &str {
        self.state.value(field)
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.state.error(field)
    }

    pub fn change(&mut self, field: &str, value: impl Into<String>) {
        self.state.change(field, value);
    }

    pub fn blur(&mut self, field: &str) {
        self.state.blur(field);
    }

    /// Pre-populate for edit mode; values become the reset target.
    pub fn load<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.state.set_values(values);
        let values = self.state.values().clone();
        let schema = self.schema_clone();
        self.state = FormState::with_initial(schema, values);
    }

    fn schema_clone(&self) -> Schema {
        self.state.schema().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Submit is disabled while a call is outstanding.
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    pub fn submit_label(&self) -> &'static str {
        if self.in_flight {
            self.busy_label
        } else {
            self.idle_label
        }
    }

    /// Validate every field. On success the form is in flight and the
    /// values are returned; the caller must call [`Self::finish`].
    pub fn begin_submit(&mut self) -> Result<BTreeMap<String, String>> {
        if self.in_flight {
            return Err(ClientError::Busy);
        }
        let values = self.state.submit().map_err(ClientError::Validation)?;
        self.in_flight = true;
        Ok(values)
    }

    pub fn finish(&mut self, succeeded: bool) {
        self.in_flight = false;
        if succeeded {
            self.state.reset();
        }
    }

    /// Discard local edits and return to blank values without a network call.
    pub fn clear(&mut self) {
        let schema = self.schema_clone();
        self.state = FormState::new(schema);
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_form() -> FormController {
        FormController::new(Schema::learning_progress(), "Add Progress", "Saving...")
    }

    #[test]
    fn invalid_form_never_enters_flight() {
        let mut form = plan_form();
        form.change("description", "d");
        match form.begin_submit() {
            Err(ClientError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!form.is_submitting());
        assert_eq!(form.submit_label(), "Add Progress");
    }

    #[test]
    fn in_flight_blocks_second_submit() {
        let mut form = plan_form();
        form.change("name", "Rust");
        form.change("description", "Ownership");
        assert!(form.begin_submit().is_ok());
        assert_eq!(form.submit_label(), "Saving...");
        assert!(matches!(form.begin_submit(), Err(ClientError::Busy)));

        form.finish(true);
        assert!(form.can_submit());
        assert_eq!(form.value("name"), "");
    }

    #[test]
    fn failed_submit_keeps_values() {
        let mut form = plan_form();
        form.change("name", "Rust");
        form.change("description", "Ownership");
        form.begin_submit().unwrap();
        form.finish(false);
        assert_eq!(form.value("name"), "Rust");
    }

    #[test]
    fn load_sets_reset_target() {
        let mut form = plan_form();
        form.load([("name", "Go"), ("description", "Basics")]);
        form.change("name", "Go 2");
        form.begin_submit().unwrap();
        form.finish(true);
        assert_eq!(form.value("name"), "Go");

        form.clear();
        assert_eq!(form.value("name"), "");
    }
}
