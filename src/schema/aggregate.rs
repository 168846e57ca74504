//! Turning raw leaf tokens into field-addressed errors.

use super::types::InternalRule;
use crate::error::{FieldErrors, ValidateError};
use crate::validator::ErrorToken;
use crate::value::value_at;
use serde_json::Value;

/// Convert one raw token into a [`ValidateError`] for `rule`.
///
/// `field_value` is read from `root` by walking the rule's path segments; a
/// token that already names a field keeps it.
pub fn complement_error(rule: &InternalRule, root: &Value, token: ErrorToken) -> ValidateError {
    let field_value = value_at(root, rule.path.segments()).cloned();
    match token {
        ErrorToken::Error(mut error) => {
            if error.field.is_empty() {
                error.field = rule.field_path().to_string();
            }
            error.field_value = field_value;
            error
        }
        ErrorToken::Message(message) => ValidateError {
            message,
            field: rule.field_path().to_string(),
            field_value,
        },
        ErrorToken::Lazy(f) => ValidateError {
            message: f(),
            field: rule.field_path().to_string(),
            field_value,
        },
    }
}

/// Group a flat error list by field path, keeping per-field order.
///
/// Errors without a field are skipped.
pub fn convert_fields_error(errors: &[ValidateError]) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for error in errors.iter().filter(|e| !e.field.is_empty()) {
        fields.push(error.clone());
    }
    fields
}
