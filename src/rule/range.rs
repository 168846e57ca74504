use crate::validator::LeafCall;
use crate::value::number_arg;
use serde_json::Value;

/// Check `len`, `min` and `max` against a number, a string's character
/// count, or an array's length. Other values are not range-checked.
pub fn range(call: &LeafCall<'_>, errors: &mut Vec<String>) {
    let Some(value) = call.value else {
        return;
    };
    let (group, measured) = match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => ("number", f),
            None => return,
        },
        // codepoints, so astral characters count once
        Value::String(s) => ("string", s.chars().count() as f64),
        Value::Array(items) => ("array", items.len() as f64),
        _ => return,
    };

    let rule = call.rule;
    let field = Value::from(rule.field_path());
    let messages = call.messages();
    let message = match (rule.len, rule.min, rule.max) {
        (Some(len), _, _) if measured != len => {
            Some(messages.render_nested(group, "len", &[field, number_arg(len)]))
        }
        (Some(_), _, _) => None,
        (None, Some(min), None) if measured < min => {
            Some(messages.render_nested(group, "min", &[field, number_arg(min)]))
        }
        (None, None, Some(max)) if measured > max => {
            Some(messages.render_nested(group, "max", &[field, number_arg(max)]))
        }
        (None, Some(min), Some(max)) if measured < min || measured > max => Some(
            messages.render_nested(group, "range", &[field, number_arg(min), number_arg(max)]),
        ),
        _ => None,
    };
    errors.extend(message);
}
