//! Built-in type checkers.
//!
//! Every checker has the same shape: decide whether validation applies
//! (required, or the key is present), return early for an empty optional
//! value, always run the required check, then run the type specific checks
//! only for a non-empty value.

use super::{LeafCall, Outcome};
use crate::error::ValidatorError;
use crate::rule;
use crate::value::{is_empty_value, number_arg, type_of};

type CheckResult = Result<Outcome, ValidatorError>;

/// Shared prologue. `None` means the checker has nothing to report.
fn begin(call: &LeafCall<'_>, empty_as: Option<&str>) -> Option<Vec<String>> {
    if !call.applies() {
        return None;
    }
    if is_empty_value(call.value, empty_as) && !call.rule.is_required() {
        return None;
    }
    Some(Vec::new())
}

pub(super) fn string(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, Some("string")) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, Some("string"));
    if !is_empty_value(call.value, Some("string")) {
        rule::type_check(call, &mut errors);
        rule::range(call, &mut errors);
        rule::pattern(call, &mut errors);
        if call.rule.whitespace {
            rule::whitespace(call, &mut errors);
        }
    }
    Ok(Outcome::errors(errors))
}

/// Required plus a bare type check: boolean, object, method, regexp.
pub(super) fn typed(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, None) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    if !is_empty_value(call.value, None) {
        rule::type_check(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

pub(super) fn number(call: &LeafCall<'_>) -> CheckResult {
    // an empty string is treated as a missing number
    let value = call.value.filter(|v| v.as_str() != Some(""));
    let call = LeafCall { value, ..*call };
    numeric(&call)
}

/// Numbers, integers and floats: type and range.
pub(super) fn numeric(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, None) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    if !is_empty_value(call.value, None) {
        rule::type_check(call, &mut errors);
        rule::range(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

pub(super) fn array(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, None) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, Some("array"));
    if !is_empty_value(call.value, None) {
        rule::type_check(call, &mut errors);
        rule::range(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

pub(super) fn enumeration(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, None) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    if !is_empty_value(call.value, None) {
        rule::enumerable(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

pub(super) fn pattern(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, Some("string")) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    if !is_empty_value(call.value, Some("string")) {
        rule::pattern(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

/// Dates are range-checked on their epoch milliseconds.
pub(super) fn date(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, Some("date")) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    if let Some(value) = call.value.filter(|_| !is_empty_value(call.value, Some("date"))) {
        match super::format::parse_date(value) {
            Some(millis) => {
                let millis = number_arg(millis as f64);
                rule::range(&LeafCall { value: Some(&millis), ..*call }, &mut errors);
            }
            None => rule::type_check(call, &mut errors),
        }
    }
    Ok(Outcome::errors(errors))
}

/// Required plus a format check: url, email, hex.
pub(super) fn format_type(call: &LeafCall<'_>) -> CheckResult {
    let rule_type = call.rule.rule_type.as_str();
    let Some(mut errors) = begin(call, Some(rule_type)) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, Some(rule_type));
    if !is_empty_value(call.value, Some(rule_type)) {
        rule::type_check(call, &mut errors);
    }
    Ok(Outcome::errors(errors))
}

/// Required check with the type inferred from the value itself.
pub(super) fn required(call: &LeafCall<'_>) -> CheckResult {
    let inferred = type_of(call.value);
    let mut errors = Vec::new();
    rule::required(call, &mut errors, Some(inferred));
    Ok(Outcome::errors(errors))
}

pub(super) fn any(call: &LeafCall<'_>) -> CheckResult {
    let Some(mut errors) = begin(call, None) else {
        return Ok(Outcome::Valid);
    };
    rule::required(call, &mut errors, None);
    Ok(Outcome::errors(errors))
}
