//! Declarative form validation.
//!
//! A [`Schema`] lists the rules of every field. [`FormState`] holds the
//! current values and tracks which fields the user has touched; an error is
//! only visible for a touched field, and each field reports at most one
//! error (the first failing rule, with `Required` always checked first).

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{LOGIN_EMAIL_DOMAIN, MIN_PASSWORD_LEN};
use crate::error::ValidationError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    EndsWith {
        suffix: &'static str,
        message: &'static str,
    },
    MinLength {
        min: usize,
        message: &'static str,
    },
}

impl Rule {
    /// Format rules ignore empty values; only `Required` rejects them.
    fn check(&self, value: &str) -> Result<(), &'static str> {
        let blank = value.trim().is_empty();
        match self {
            Rule::Required(msg) if blank => Err(*msg),
            Rule::Required(_) => Ok(()),
            _ if blank => Ok(()),
            Rule::Email(msg) if !is_valid_email(value) => Err(*msg),
            Rule::EndsWith { suffix, message } if !value.trim().ends_with(*suffix) => {
                Err(*message)
            }
            Rule::MinLength { min, message } if value.chars().count() < *min => Err(*message),
            _ => Ok(()),
        }
    }

    fn is_required(&self) -> bool {
        matches!(self, Rule::Required(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    fn first_error(&self, value: &str) -> Option<&'static str> {
        let required = self.rules.iter().filter(|r| r.is_required());
        let others = self.rules.iter().filter(|r| !r.is_required());
        required.chain(others).find_map(|r| r.check(value).err())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// First failing rule for `field`, or `None` when valid or unknown.
    pub fn validate_field(&self, field: &str, value: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.first_error(value))
    }

    pub fn validate(&self, values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|f| {
                let value = values.get(f.name).map(String::as_str).unwrap_or_default();
                f.first_error(value).map(|msg| (f.name.to_string(), msg.to_string()))
            })
            .collect()
    }

    // -- Schemas used by the client forms ----------------------------------

    pub fn login() -> Self {
        Self::new(vec![
            FieldSpec::new(
                "email",
                vec![
                    Rule::Required("Email is required"),
                    Rule::Email("Enter a valid Gmail address"),
                    Rule::EndsWith {
                        suffix: LOGIN_EMAIL_DOMAIN,
                        message: "Only Gmail accounts allowed",
                    },
                ],
            ),
            password_field(),
        ])
    }

    pub fn signup() -> Self {
        Self::new(vec![
            FieldSpec::new("name", vec![Rule::Required("Name is required")]),
            FieldSpec::new(
                "email",
                vec![
                    Rule::Required("Email is required"),
                    Rule::Email("Enter a valid email"),
                ],
            ),
            password_field(),
        ])
    }

    pub fn profile() -> Self {
        Self::new(vec![
            FieldSpec::new("name", vec![Rule::Required("Name is required")]),
            FieldSpec::new(
                "email",
                vec![Rule::Required("Email is required"), Rule::Email("Invalid email")],
            ),
            FieldSpec::new("password", vec![]),
        ])
    }

    pub fn learning_plan() -> Self {
        Self::new(vec![
            FieldSpec::new("name", vec![Rule::Required("Name is required")]),
            FieldSpec::new("description", vec![Rule::Required("Description is required")]),
            FieldSpec::new("topics", vec![Rule::Required("At least one topic is required")]),
            FieldSpec::new(
                "resources",
                vec![Rule::Required("At least one resource is required")],
            ),
        ])
    }

    pub fn learning_progress() -> Self {
        Self::new(vec![
            FieldSpec::new("name", vec![Rule::Required("Name is required")]),
            FieldSpec::new("description", vec![Rule::Required("Description is required")]),
        ])
    }

    pub fn post() -> Self {
        Self::new(vec![FieldSpec::new(
            "content",
            vec![Rule::Required("Post text is required")],
        )])
    }
}

fn password_field() -> FieldSpec {
    FieldSpec::new(
        "password",
        vec![
            Rule::Required("Password is required"),
            Rule::MinLength {
                min: MIN_PASSWORD_LEN,
                message: "Password must be at least 6 characters",
            },
        ],
    )
}

/// Values, touched flags and errors of one form.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Schema,
    initial: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    touched: BTreeSet<String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    pub fn new(schema: Schema) -> Self {
        let initial: BTreeMap<String, String> =
            schema.field_names().map(|n| (n.to_string(), String::new())).collect();
        let errors = schema.validate(&initial);
        Self {
            schema,
            values: initial.clone(),
            initial,
            touched: BTreeSet::new(),
            errors,
        }
    }

    /// Form whose reset target is `initial` instead of blank values.
    pub fn with_initial<I, K, V>(schema: Schema, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::new(schema);
        form.set_values(initial);
        form.initial = form.values.clone();
        form
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Replace several values at once (edit mode). Touched flags are kept.
    pub fn set_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in values {
            self.values.insert(k.into(), v.into());
        }
        self.errors = self.schema.validate(&self.values);
    }

    pub fn change(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
        self.revalidate(field);
    }

    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.revalidate(field);
    }

    fn revalidate(&mut self, field: &str) {
        match self.schema.validate_field(field, self.value(field)) {
            Some(msg) => {
                self.errors.insert(field.to_string(), msg.to_string());
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Error shown next to `field`; hidden until the field is touched.
    pub fn error(&self, field: &str) -> Option<&str> {
        if !self.is_touched(field) {
            return None;
        }
        self.errors.get(field).map(String::as_str)
    }

    pub fn visible_errors(&self) -> Vec<ValidationError> {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(*field))
            .map(|(field, message)| ValidationError {
                field: field.clone(),
                message: message.clone(),
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Touch every field and validate. Returns the values when the whole
    /// form passes, otherwise one error per failing field.
    pub fn submit(&mut self) -> Result<BTreeMap<String, String>, Vec<ValidationError>> {
        self.touched.extend(self.schema.field_names().map(str::to_string));
        self.errors = self.schema.validate(&self.values);
        if self.errors.is_empty() {
            Ok(self.values.clone())
        } else {
            Err(self.visible_errors())
        }
    }

    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.errors = self.schema.validate(&self.values);
    }
}

/// Split a comma-separated input into trimmed, non-empty items.
pub fn split_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_field_yields_exactly_one_error() {
        let mut form = FormState::new(Schema::learning_progress());
        form.change("description", "Ownership deep dive");
        let errors = form.submit().unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError {
                field: "name".into(),
                message: "Name is required".into()
            }]
        );
    }

    #[test]
    fn errors_hidden_until_touched() {
        let mut form = FormState::new(Schema::signup());
        assert!(!form.is_valid());
        assert_eq!(form.error("name"), None);
        form.blur("name");
        assert_eq!(form.error("name"), Some("Name is required"));
        form.change("name", "Ada");
        assert_eq!(form.error("name"), None);
    }

    #[test]
    fn required_wins_over_format_rules() {
        let schema = Schema::login();
        assert_eq!(schema.validate_field("email", ""), Some("Email is required"));
        assert_eq!(schema.validate_field("email", "nope"), Some("Enter a valid Gmail address"));
        assert_eq!(
            schema.validate_field("email", "ada@outlook.com"),
            Some("Only Gmail accounts allowed")
        );
        assert_eq!(schema.validate_field("email", "ada@gmail.com"), None);
    }

    #[test]
    fn password_minimum_length() {
        let schema = Schema::signup();
        assert_eq!(
            schema.validate_field("password", "12345"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(schema.validate_field("password", "123456"), None);
    }

    #[test]
    fn profile_password_is_optional() {
        let mut form = FormState::with_initial(
            Schema::profile(),
            [("name", "Ada"), ("email", "ada@gmail.com")],
        );
        let values = form.submit().unwrap();
        assert_eq!(values["password"], "");
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut form = FormState::new(Schema::post());
        form.change("content", "   ");
        assert!(form.submit().is_err());
        assert_eq!(form.error("content"), Some("Post text is required"));
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut form = FormState::with_initial(Schema::learning_progress(), [("name", "Rust")]);
        form.change("name", "Go");
        form.blur("name");
        form.reset();
        assert_eq!(form.value("name"), "Rust");
        assert!(!form.is_touched("name"));
    }

    #[test]
    fn comma_lists_are_trimmed() {
        assert_eq!(split_comma_list(" a, b ,,c , "), vec!["a", "b", "c"]);
        assert!(split_comma_list(" , ").is_empty());
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("a.b@c.io"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("a@c"));
    }
}
