//! Leaf validator contract and the built-in type checkers.
//!
//! A leaf validator receives a [`LeafCall`] describing one rule applied to one
//! value and answers with an [`Outcome`]. Synchronous validators signal a
//! programming error by returning `Err`; asynchronous validators returning
//! `Err` are treated as a rejected check and reported as a field error.

mod checkers;
pub mod format;

use crate::error::{ValidateError, ValidatorError};
use crate::messages::Messages;
use crate::schema::options::ValidateOptions;
use crate::schema::types::InternalRule;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub type SyncFn = dyn Fn(&LeafCall<'_>) -> Result<Outcome, ValidatorError> + Send + Sync;
pub type AsyncFn =
    dyn Fn(&LeafCall<'_>) -> BoxFuture<'static, Result<Outcome, ValidatorError>> + Send + Sync;

/// A leaf validator, either synchronous or future-returning.
#[derive(Clone)]
pub enum Validator {
    Sync(Arc<SyncFn>),
    Async(Arc<AsyncFn>),
}

impl Validator {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&LeafCall<'_>) -> Result<Outcome, ValidatorError> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap a validator whose future owns everything it needs from the call.
    pub fn async_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(&LeafCall<'_>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Outcome, ValidatorError>> + Send + 'static,
    {
        Self::Async(Arc::new(move |call: &LeafCall<'_>| f(call).boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Validator::Sync(..)"),
            Self::Async(_) => f.write_str("Validator::Async(..)"),
        }
    }
}

/// One rule applied to one value.
#[derive(Clone, Copy)]
pub struct LeafCall<'a> {
    pub rule: &'a InternalRule,
    /// `None` when the key is missing from `source`
    pub value: Option<&'a Value>,
    /// The container the value was read from
    pub source: &'a Value,
    pub options: &'a ValidateOptions,
}

impl LeafCall<'_> {
    /// Whether validation applies: required, or the key is present.
    pub fn applies(&self) -> bool {
        self.rule.is_required() || crate::value::has_field(self.source, &self.rule.field)
    }

    /// Templates active for this run.
    pub fn messages(&self) -> &Messages {
        self.options
            .messages
            .as_ref()
            .unwrap_or_else(|| Messages::default_ref())
    }

    pub fn field_path(&self) -> &str {
        self.rule.field_path()
    }
}

/// Raw error produced by a leaf validator.
#[derive(Clone)]
pub enum ErrorToken {
    Message(String),
    /// Message computed when the error is reported
    Lazy(Arc<dyn Fn() -> String + Send + Sync>),
    /// A fully formed error; a blank field is filled with the rule's path
    Error(ValidateError),
}

impl ErrorToken {
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Lazy(Arc::new(f))
    }
}

impl fmt::Debug for ErrorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(m) => f.debug_tuple("Message").field(m).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
            Self::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

impl From<String> for ErrorToken {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for ErrorToken {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<ValidateError> for ErrorToken {
    fn from(error: ValidateError) -> Self {
        Self::Error(error)
    }
}

/// What a leaf validator concluded.
#[derive(Debug, Clone)]
pub enum Outcome {
    Valid,
    /// Failed without detail; reported with the rule message or a generic one
    Invalid,
    Errors(Vec<ErrorToken>),
}

impl Outcome {
    /// `Valid` when the list is empty.
    pub fn errors<I, T>(errors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ErrorToken>,
    {
        let tokens: Vec<ErrorToken> = errors.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            Self::Valid
        } else {
            Self::Errors(tokens)
        }
    }

    /// A single error carrying the text of `error`.
    pub fn error(error: &dyn std::error::Error) -> Self {
        Self::Errors(vec![ErrorToken::Message(error.to_string())])
    }
}

impl From<bool> for Outcome {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }
}

/// Built-in type tags and their checkers.
pub(crate) fn builtins() -> Vec<(&'static str, Validator)> {
    vec![
        ("string", Validator::sync(checkers::string)),
        ("method", Validator::sync(checkers::typed)),
        ("number", Validator::sync(checkers::number)),
        ("boolean", Validator::sync(checkers::typed)),
        ("regexp", Validator::sync(checkers::typed)),
        ("integer", Validator::sync(checkers::numeric)),
        ("float", Validator::sync(checkers::numeric)),
        ("array", Validator::sync(checkers::array)),
        ("object", Validator::sync(checkers::typed)),
        ("enum", Validator::sync(checkers::enumeration)),
        ("pattern", Validator::sync(checkers::pattern)),
        ("date", Validator::sync(checkers::date)),
        ("url", Validator::sync(checkers::format_type)),
        ("hex", Validator::sync(checkers::format_type)),
        ("email", Validator::sync(checkers::format_type)),
        ("required", Validator::sync(checkers::required)),
        ("any", Validator::sync(checkers::any)),
    ]
}
