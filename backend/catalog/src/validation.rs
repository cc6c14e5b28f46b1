//! # Schema Validation
//!
//! Every create payload passes through a [`Validator`] before it becomes a
//! document.
//!
//! ## Rules
//! - Strings are trimmed first, a required string that trims to nothing is missing
//! - Failures are collected in schema field order, not reported one at a time
//! - The joined message is what the API hands back in a 400
//! - Emails are keys, so they are trimmed and lower-cased on every write and lookup
use thiserror::Error;

use crate::id::DocumentId;

/// Counted in UTF-16 code units, like a browser `maxlength`, so an emoji takes two.
pub const COMMENT_MAX_CHARS: usize = 500;

pub fn comment_length(comment: &str) -> usize {
    comment.encode_utf16().count()
}

pub const REVIEW_RATING_RANGE: &str = "Rating must be between 1 and 5";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join(", "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Default)]
pub(crate) struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn required(&mut self, value: Option<String>, message: &str) -> String {
        match trimmed(value) {
            Some(value) => value,
            None => {
                self.errors.push(message.to_string());
                String::new()
            }
        }
    }

    pub fn present<T>(&mut self, value: Option<T>, message: &str) -> Option<T> {
        if value.is_none() {
            self.errors.push(message.to_string());
        }

        value
    }

    pub fn college_id(&mut self, value: Option<String>) -> Option<DocumentId> {
        let raw = self.required(value, "College ID is required");
        if raw.is_empty() {
            return None;
        }

        match raw.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                self.errors.push("College ID is invalid".to_string());
                None
            }
        }
    }

    pub fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.errors.push(message.to_string());
        }
    }

    /// Yields the values that could only be produced by passing checks.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        if !self.errors.is_empty() {
            return Err(ValidationError(self.errors));
        }

        value.ok_or_else(|| ValidationError::single("Malformed document"))
    }
}
