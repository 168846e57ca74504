//! Primitive rule checks shared by the built-in type checkers.
//!
//! Each check inspects one aspect of a leaf value and pushes rendered
//! messages onto the caller's error list; none of them decide whether
//! validation applies at all; that is the checker's job.

mod range;
mod type_check;

pub use range::range;
pub use type_check::{matches_type, type_check};

use crate::validator::LeafCall;
use crate::value::{display, has_field, is_empty_value};
use serde_json::Value;

/// Report a missing or empty value on a required rule.
///
/// `type_override` replaces the rule's own type when deciding emptiness.
pub fn required(call: &LeafCall<'_>, errors: &mut Vec<String>, type_override: Option<&str>) {
    let rule = call.rule;
    if !rule.is_required() {
        return;
    }
    let rule_type = type_override.unwrap_or(&rule.rule_type);
    if !has_field(call.source, &rule.field) || is_empty_value(call.value, Some(rule_type)) {
        errors.push(
            call.messages()
                .render("required", &[Value::from(rule.field_path())]),
        );
    }
}

/// Reject strings that are empty or only whitespace.
pub fn whitespace(call: &LeafCall<'_>, errors: &mut Vec<String>) {
    if let Some(Value::String(s)) = call.value {
        if s.trim().is_empty() {
            errors.push(
                call.messages()
                    .render("whitespace", &[Value::from(call.rule.field_path())]),
            );
        }
    }
}

/// Require the value to equal one of the rule's enumerated values.
pub fn enumerable(call: &LeafCall<'_>, errors: &mut Vec<String>) {
    let allowed = call.rule.enumeration.as_deref().unwrap_or_default();
    if call.value.is_some_and(|v| allowed.contains(v)) {
        return;
    }
    let listed = allowed.iter().map(display).collect::<Vec<_>>().join(", ");
    errors.push(call.messages().render(
        "enum",
        &[Value::from(call.rule.field_path()), Value::from(listed)],
    ));
}

/// Match the value's text against the rule's pattern.
pub fn pattern(call: &LeafCall<'_>, errors: &mut Vec<String>) {
    let (Some(pattern), Some(value)) = (&call.rule.pattern, call.value) else {
        return;
    };
    let re = pattern.regex();
    let text = display(value);
    if !re.is_match(&text) {
        errors.push(call.messages().render_nested(
            "pattern",
            "mismatch",
            &[
                Value::from(call.rule.field_path()),
                Value::from(text),
                Value::from(re.as_str()),
            ],
        ));
    }
}
