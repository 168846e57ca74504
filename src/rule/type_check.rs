use crate::validator::LeafCall;
use crate::validator::format;
use crate::value::type_of;
use serde_json::Value;

/// Whether a present value satisfies a type tag.
///
/// Tags without a dedicated check compare against the value's JSON kind.
pub fn matches_type(rule_type: &str, value: &Value) -> bool {
    match rule_type {
        "integer" => value.as_f64().is_some_and(|f| f.fract() == 0.0),
        "float" => value.as_f64().is_some_and(|f| f.fract() != 0.0),
        "number" => value.is_number(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "regexp" => value.as_str().is_some_and(|s| regex::Regex::new(s).is_ok()),
        // JSON cannot carry a callable
        "method" => false,
        "date" => format::parse_date(value).is_some(),
        "email" => value.as_str().is_some_and(format::is_email),
        "url" => value.as_str().is_some_and(format::is_url),
        "hex" => value.as_str().is_some_and(format::is_hex),
        other => type_of(Some(value)) == other,
    }
}

/// Report a value that does not match the rule's type.
pub fn type_check(call: &LeafCall<'_>, errors: &mut Vec<String>) {
    let Some(value) = call.value else {
        return;
    };
    let rule_type = call.rule.rule_type.as_str();
    if !matches_type(rule_type, value) {
        errors.push(call.messages().render_nested(
            "types",
            rule_type,
            &[Value::from(call.rule.field_path()), Value::from(rule_type)],
        ));
    }
}
