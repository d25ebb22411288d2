//! Serializers: the bidirectional mapping between stored entities and
//! their external JSON representations, including payload validation.
//!
//! Validation is field-scoped: every field's check runs independently and
//! failures are aggregated under the field's name, never short-circuited.
//! A payload with three bad fields reports all three; a payload with one
//! bad field reports exactly that one.

pub mod produce;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field-keyed validation errors.
///
/// Keys are field names (nested fields use a dotted path such as
/// `profile.gender`); values are the messages collected for that field.
/// Serializes as `{"<field>": ["<message>", ...], ...}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field. Messages accumulate; adding to
    /// the same field twice keeps both.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Shorthand for the shared missing-field message.
    pub fn required(&mut self, field: &str) {
        self.add(field, "This field is required.");
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The offending field names, in sorted order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Messages recorded for one field; empty when the field is clean.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Convert the accumulator into a result: `Ok` when no field failed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for fields: {}",
            self.fields().join(", ")
        )
    }
}

impl std::error::Error for ValidationErrors {}
