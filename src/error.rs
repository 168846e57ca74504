//! Error types for schema configuration and validation runs.
//!
//! Three kinds of failure are kept apart:
//!
//! - [`SchemaError`] - programmer misuse (malformed descriptors, unknown type
//!   tags, bad registrations). Returned immediately, never recovered.
//! - [`ValidateError`] - a single field-addressed rule violation. These are
//!   collected, grouped by field path and reported in batch.
//! - [`ValidationFailure`] - the outcome of a failed run: either the collected
//!   field errors or the raw error raised by a custom validator.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Boxed error raised by a user-supplied validator.
pub type ValidatorError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration errors for schemas and the type registry.
///
/// These are typically programming errors and should be caught
/// during development rather than at runtime.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Descriptor was absent or null
    #[error("Cannot configure a schema with no rules")]
    MissingRules,

    /// Descriptor was an array or a scalar instead of an object
    #[error("Rules must be an object")]
    InvalidDescriptor,

    /// A rule without a custom validator names an unregistered type
    #[error("Unknown rule type {type_tag}")]
    UnknownType { type_tag: String },

    /// Attempt to register a validator without a type tag
    #[error("Cannot register a validator by type, type tag is empty")]
    EmptyTypeTag,

    /// Pattern source text did not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A declarative rule entry had an unusable shape
    #[error("Invalid rule for field '{field}': {details}")]
    InvalidRule { field: String, details: String },

    /// JSON deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single validation error attributed to a fully-qualified field path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateError {
    /// Resolved message text
    pub message: String,
    /// Dotted path from the validation root, e.g. `v.0.name`
    pub field: String,
    /// Value found at `field` in the root source, if any
    pub field_value: Option<Value>,
}

impl ValidateError {
    /// Create an error with no resolved field value.
    pub fn new(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            field_value: None,
        }
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-path keyed view of a flat error list.
///
/// Keys appear in the order their first error appears in the flat list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<ValidateError>)>,
    /// Field path to position in `entries`
    index: HashMap<String, usize>,
}

impl FieldErrors {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error under its field path.
    pub fn push(&mut self, error: ValidateError) {
        match self.index.get(&error.field) {
            Some(&at) => self.entries[at].1.push(error),
            None => {
                self.index.insert(error.field.clone(), self.entries.len());
                self.entries.push((error.field.clone(), vec![error]));
            }
        }
    }

    /// Errors recorded for a field path.
    pub fn get(&self, field: &str) -> Option<&[ValidateError]> {
        self.index
            .get(field)
            .map(|&at| self.entries[at].1.as_slice())
    }

    /// Field paths in first-seen order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidateError])> {
        self.entries.iter().map(|(f, l)| (f.as_str(), l.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, errors) in &self.entries {
            map.serialize_entry(field, errors)?;
        }
        map.end()
    }
}

/// Failure of a complete validation run.
#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    /// One or more fields violated their rules
    #[error("Async Validation Error: {} error(s) across {} field(s)", errors.len(), fields.len())]
    Invalid {
        errors: Vec<ValidateError>,
        fields: FieldErrors,
    },

    /// A custom validator raised instead of reporting
    #[error("Validator for field '{field}' raised: {source}")]
    Validator {
        field: String,
        #[source]
        source: ValidatorError,
    },

    /// Schema configuration problem discovered while preparing the run
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl SchemaError {
    /// Create an unknown type error
    pub fn unknown_type(type_tag: impl Into<String>) -> Self {
        Self::UnknownType {
            type_tag: type_tag.into(),
        }
    }

    /// Create an invalid rule error
    pub fn invalid_rule(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidRule {
            field: field.into(),
            details: details.into(),
        }
    }
}

impl ValidationFailure {
    /// Build the invalid outcome, deriving the field map from the flat list.
    pub fn invalid(errors: Vec<ValidateError>) -> Self {
        let fields = crate::schema::convert_fields_error(&errors);
        Self::Invalid { errors, fields }
    }

    /// Wrap an error raised by a custom validator
    pub fn validator(field: impl Into<String>, source: ValidatorError) -> Self {
        Self::Validator {
            field: field.into(),
            source,
        }
    }

    /// Flat error list, empty for non-validation failures.
    pub fn errors(&self) -> &[ValidateError] {
        match self {
            Self::Invalid { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Field-grouped errors, if this is a validation failure.
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

// Result type aliases for convenience
pub type SchemaResult<T> = Result<T, SchemaError>;
pub type ValidateResult<T> = Result<T, ValidationFailure>;
