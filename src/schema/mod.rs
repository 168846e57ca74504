//! Schemas: named rule sets and the validation engine behind them.
//!
//! A [`Schema`] owns a [`Descriptor`] (field name to rule list), its own
//! message table, and a handle to a [`TypeRegistry`]. Validation normalizes
//! the rules against the data, drives each rule's validator according to the
//! [`ValidateOptions`], recurses into nested containers, and reports errors
//! both as a flat list and grouped by field path.
//!
//! # Examples
//!
//! ```rust
//! use schema_rules::schema::{Descriptor, Rule, Schema};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let schema = Schema::new(
//!     Descriptor::new()
//!         .field("name", Rule::of_type("string").required())
//!         .field("age", Rule::of_type("integer").min(0.0)),
//! );
//!
//! let mut data = json!({"age": -1});
//! let failure = schema.validate(&mut data).await.unwrap_err();
//! assert_eq!(failure.errors().len(), 2);
//! assert!(failure.fields().unwrap().get("name").is_some());
//! # });
//! ```

pub mod aggregate;
pub mod descriptor;
pub(crate) mod normalize;
pub mod options;
pub mod registry;
pub mod types;
pub mod validation;


pub use aggregate::{complement_error, convert_fields_error};
pub use options::{ErrorFormatter, FirstFields, ValidateOptions};
pub use registry::TypeRegistry;
pub use types::{Descriptor, FieldPath, InternalRule, IntoRules, Message, Pattern, Rule, Transform};

use crate::error::{SchemaResult, ValidateResult, ValidationFailure};
use crate::messages::Messages;
use crate::validator::Validator;
use log::debug;
use normalize::Document;
use serde_json::Value;

/// A validation schema.
#[derive(Debug, Clone)]
pub struct Schema {
    rules: Descriptor,
    messages: Messages,
    registry: TypeRegistry,
}

impl Schema {
    /// Create a schema with its own registry of built-in type checkers.
    pub fn new(descriptor: Descriptor) -> Self {
        Self::with_registry(descriptor, TypeRegistry::new())
    }

    /// Create a schema sharing an existing registry.
    pub fn with_registry(descriptor: Descriptor, registry: TypeRegistry) -> Self {
        let mut schema = Self {
            rules: Descriptor::new(),
            messages: Messages::defaults(),
            registry,
        };
        schema.define(descriptor);
        schema
    }

    /// Create a schema from a JSON descriptor.
    pub fn from_json(descriptor: &Value) -> SchemaResult<Self> {
        Ok(Self::new(descriptor::parse_descriptor(descriptor)?))
    }

    /// Child schema for a nested container, sharing registry and templates.
    pub(crate) fn nested(&self, rules: Descriptor) -> Self {
        Self {
            rules,
            messages: self.messages.clone(),
            registry: self.registry.clone(),
        }
    }

    /// Add rules, replacing the rule list of fields already declared.
    pub fn define(&mut self, descriptor: Descriptor) {
        for (field, rules) in descriptor {
            self.rules.insert(field, rules);
        }
    }

    /// JSON form of [`Schema::define`].
    pub fn define_json(&mut self, descriptor: &Value) -> SchemaResult<()> {
        self.define(descriptor::parse_descriptor(descriptor)?);
        Ok(())
    }

    /// The active message table.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Replace the active table with the defaults overlaid by `overrides`.
    pub fn set_messages(&mut self, overrides: Messages) -> &Messages {
        self.messages = Messages::defaults().merge(&overrides);
        &self.messages
    }

    /// Register a type checker on this schema's registry.
    ///
    /// Every schema sharing the registry sees the new checker.
    pub fn register(&self, type_tag: impl Into<String>, validator: Validator) -> SchemaResult<()> {
        self.registry.register(type_tag, validator)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Declared rules by field.
    pub fn rules(&self) -> &Descriptor {
        &self.rules
    }

    /// Validate with default options.
    pub async fn validate<'v>(&self, source: &'v mut Value) -> ValidateResult<&'v Value> {
        self.validate_with(source, ValidateOptions::default()).await
    }

    /// Validate `source`, applying any transforms to it in place.
    ///
    /// Resolves to the (possibly transformed) source, or fails with the
    /// collected errors. A custom validator raising an error fails the run
    /// with that error unless `suppress_validator_error` is set.
    pub async fn validate_with<'v>(
        &self,
        source: &'v mut Value,
        mut options: ValidateOptions,
    ) -> ValidateResult<&'v Value> {
        if self.rules.is_empty() {
            return Ok(source);
        }
        options.messages = Some(match options.messages.take() {
            Some(overrides) => self.messages.clone().merge(&overrides),
            None => self.messages.clone(),
        });

        debug!("Validating {} field(s)", self.rules.len());
        let errors = {
            let doc = Document::new(&mut *source);
            self.run(&doc, &options, None).await?
        };
        debug!("Validation finished with {} error(s)", errors.len());

        if errors.is_empty() {
            Ok(source)
        } else {
            Err(ValidationFailure::invalid(errors))
        }
    }

    /// Validate and hand the result to `callback` before returning it.
    pub async fn validate_then<'v, F>(
        &self,
        source: &'v mut Value,
        options: ValidateOptions,
        callback: F,
    ) -> ValidateResult<&'v Value>
    where
        F: FnOnce(Result<&Value, &ValidationFailure>),
    {
        let result = self.validate_with(source, options).await;
        callback(result.as_ref().map(|value| &**value));
        result
    }
}
