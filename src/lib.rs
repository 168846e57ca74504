//! Declarative, async-aware validation of JSON values.
//!
//! Describe each field with one or more rules, then validate data against
//! the schema. Errors come back both as a flat list and grouped by the
//! dotted path of the offending field, including fields nested arbitrarily
//! deep inside objects and arrays.
//!
//! # Core Components
//!
//! - [`Schema`] - Rule set, message table and the `validate` entry points
//! - [`Rule`] - A single constraint declaration for a field
//! - [`TypeRegistry`] - Type tags mapped to leaf validators, extensible at runtime
//! - [`Messages`] - Two-level table of error message templates
//!
//! # Quick Start
//!
//! ```rust
//! use schema_rules::{Descriptor, Rule, Schema, ValidateOptions};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let schema = Schema::new(
//!     Descriptor::new()
//!         .field("email", Rule::of_type("email").required())
//!         .field(
//!             "tags",
//!             Rule::of_type("array").default_field(Rule::of_type("string")),
//!         ),
//! );
//!
//! let mut data = json!({"email": "someone@example.com", "tags": ["a", 2]});
//! let failure = schema
//!     .validate_with(&mut data, ValidateOptions::new().suppress_warning())
//!     .await
//!     .unwrap_err();
//! assert_eq!(failure.errors()[0].field, "tags.1");
//! assert_eq!(failure.errors()[0].message, "tags.1 is not a string");
//! # });
//! ```
//!
//! Applications choose a `log` backend; the engine logs run boundaries at
//! debug level and leaf failures as warnings unless `suppress_warning` is set.

pub mod error;
pub mod messages;
pub mod rule;
pub mod schema;
pub mod validator;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{
    FieldErrors, SchemaError, SchemaResult, ValidateError, ValidateResult, ValidationFailure,
    ValidatorError,
};
pub use messages::{Messages, Template, format};
pub use schema::{
    Descriptor, FieldPath, FirstFields, InternalRule, Message, Pattern, Rule, Schema,
    TypeRegistry, ValidateOptions, complement_error, convert_fields_error,
};
pub use validator::{ErrorToken, LeafCall, Outcome, Validator};
pub use value::is_empty_value;
