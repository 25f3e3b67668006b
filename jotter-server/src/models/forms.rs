//! HTML form payloads and their validation
//!
//! Forms deserialize leniently (missing fields become empty strings) so that
//! every problem is reported back on the re-rendered page instead of as a bare
//! 400 from the extractor.

use std::fmt;

use serde::Deserialize;

use super::{NoteContent, NoteTitle, Password, Username, ValidationError};

/// One message attached to a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All errors found in one submission, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error not tied to a validation rule (bad credentials, taken username).
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn record(&mut self, e: ValidationError) {
        self.push(e.field(), e.to_string());
    }

    /// Record the error of `result`, if any, and hand back the value.
    fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        result.map_err(|e| self.record(e)).ok()
    }
}

impl From<ValidationError> for FormErrors {
    fn from(e: ValidationError) -> Self {
        Self::single(e.field(), e.to_string())
    }
}

/// Create/edit note submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Validated note fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: Option<NoteTitle>,
    pub content: NoteContent,
}

impl NoteForm {
    pub fn validate(&self) -> Result<NoteInput, FormErrors> {
        let mut errors = FormErrors::new();
        let title = errors.check(NoteTitle::parse(self.title.as_deref().unwrap_or_default()));
        let content = errors.check(NoteContent::new(&self.content));

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(NoteInput { title, content }),
            _ => Err(errors),
        }
    }
}

/// Account registration submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Validated registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub password: Password,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::new();
        let username = errors.check(Username::new(&self.username));
        let password = errors.check(Password::new(&self.password));

        if self.confirm_password != self.password {
            errors.record(ValidationError::Mismatch {
                field: "password confirmation",
                other: "password",
            });
        }

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => {
                Ok(Registration { username, password })
            }
            _ => Err(errors),
        }
    }
}

/// Login submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: present (usually `"on"`) when ticked
    #[serde(default)]
    pub remember: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Login fields that passed the presence checks
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("remember", &self.remember)
            .finish()
    }
}

impl LoginForm {
    /// Only presence is checked here; the policy applied at registration is
    /// not re-applied to existing accounts.
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if username.is_empty() {
            errors.record(ValidationError::Empty { field: "username" });
        }
        if self.password.is_empty() {
            errors.record(ValidationError::Empty { field: "password" });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Credentials {
            username: username.to_owned(),
            password: self.password.clone(),
            remember: self.remember.is_some(),
        })
    }
}
