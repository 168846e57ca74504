//! Per-call validation options.

use super::types::InternalRule;
use crate::error::ValidateError;
use crate::messages::Messages;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Custom constructor for the container-level required error.
pub type ErrorFormatter = Arc<dyn Fn(&InternalRule, String) -> ValidateError + Send + Sync>;

/// Which fields stop at their own first error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FirstFields {
    /// `true` applies to every field
    Flag(bool),
    Fields(Vec<String>),
}

impl FirstFields {
    pub fn contains(&self, field: &str) -> bool {
        match self {
            Self::Flag(all) => *all,
            Self::Fields(fields) => fields.iter().any(|f| f == field),
        }
    }
}

impl Default for FirstFields {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Options controlling a single validation run.
///
/// The serializable members can be loaded from JSON using the camelCase
/// names (`first`, `firstFields`, `shortCircuit`, `suppressWarning`,
/// `suppressValidatorError`, `keys`).
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidateOptions {
    /// Stop the whole run at the first error
    pub first: bool,
    pub first_fields: FirstFields,
    /// Run every rule serially and stop at the first failing one
    pub short_circuit: bool,
    pub suppress_warning: bool,
    pub suppress_validator_error: bool,
    /// Restrict the root level to these fields
    pub keys: Option<Vec<String>>,
    /// Template overrides for this call only
    #[serde(skip)]
    pub messages: Option<Messages>,
    #[serde(skip)]
    pub error: Option<ErrorFormatter>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self) -> Self {
        self.first = true;
        self
    }

    pub fn first_fields(mut self, first_fields: FirstFields) -> Self {
        self.first_fields = first_fields;
        self
    }

    pub fn all_first_fields(self) -> Self {
        self.first_fields(FirstFields::Flag(true))
    }

    pub fn short_circuit(mut self) -> Self {
        self.short_circuit = true;
        self
    }

    pub fn suppress_warning(mut self) -> Self {
        self.suppress_warning = true;
        self
    }

    pub fn suppress_validator_error(mut self) -> Self {
        self.suppress_validator_error = true;
        self
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn error<F>(mut self, f: F) -> Self
    where
        F: Fn(&InternalRule, String) -> ValidateError + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("first", &self.first)
            .field("first_fields", &self.first_fields)
            .field("short_circuit", &self.short_circuit)
            .field("suppress_warning", &self.suppress_warning)
            .field("suppress_validator_error", &self.suppress_validator_error)
            .field("keys", &self.keys)
            .field("messages", &self.messages.as_ref().map(Messages::len))
            .field("error", &self.error.is_some())
            .finish()
    }
}
