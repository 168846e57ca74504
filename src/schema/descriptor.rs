//! Loading rule descriptors from JSON.
//!
//! A descriptor is an object mapping field names to a rule object or an
//! array of rule objects. Rule objects use the keys `type`, `required`,
//! `message`, `min`, `max`, `len`, `pattern`, `enum`, `whitespace`,
//! `fields`, `defaultField` and `options`. Patterns are given as source
//! text, so they never change the rule's default type.

use super::options::ValidateOptions;
use super::types::{Descriptor, Message, Pattern, Rule};
use crate::error::{SchemaError, SchemaResult};
use log::trace;
use serde_json::{Map, Value};

/// Parse a JSON descriptor.
pub fn parse_descriptor(descriptor: &Value) -> SchemaResult<Descriptor> {
    match descriptor {
        Value::Null => Err(SchemaError::MissingRules),
        Value::Object(map) => parse_fields(map, None),
        _ => Err(SchemaError::InvalidDescriptor),
    }
}

fn parse_fields(map: &Map<String, Value>, parent: Option<&str>) -> SchemaResult<Descriptor> {
    let mut descriptor = Descriptor::new();
    for (field, rules) in map {
        let path = match parent {
            Some(parent) => format!("{parent}.{field}"),
            None => field.clone(),
        };
        descriptor.insert(field.clone(), parse_rules(&path, rules)?);
    }
    Ok(descriptor)
}

fn parse_rules(path: &str, value: &Value) -> SchemaResult<Vec<Rule>> {
    match value {
        Value::Object(rule) => Ok(vec![parse_rule(path, rule)?]),
        Value::Array(rules) => rules
            .iter()
            .map(|rule| match rule {
                Value::Object(rule) => parse_rule(path, rule),
                _ => Err(SchemaError::invalid_rule(path, "rule must be an object")),
            })
            .collect(),
        _ => Err(SchemaError::invalid_rule(
            path,
            "rules must be an object or an array of objects",
        )),
    }
}

fn parse_rule(path: &str, map: &Map<String, Value>) -> SchemaResult<Rule> {
    let mut rule = Rule::new();
    for (key, value) in map {
        match key.as_str() {
            "type" => rule.rule_type = Some(string(path, key, value)?.to_string()),
            "required" => rule.required = Some(boolean(path, key, value)?),
            "whitespace" => rule.whitespace = boolean(path, key, value)?,
            "min" => rule.min = Some(number(path, key, value)?),
            "max" => rule.max = Some(number(path, key, value)?),
            "len" => rule.len = Some(number(path, key, value)?),
            "message" => rule.message = Some(message(path, value)?),
            "pattern" => {
                let source = string(path, key, value)?;
                let pattern =
                    Pattern::source(source).map_err(|source_error| SchemaError::InvalidPattern {
                        pattern: source.to_string(),
                        source: source_error,
                    })?;
                rule.pattern = Some(pattern);
            }
            "enum" => match value {
                Value::Array(items) => rule.enumeration = Some(items.clone()),
                _ => return Err(SchemaError::invalid_rule(path, "enum must be an array")),
            },
            "fields" => match value {
                Value::Object(fields) => rule.fields = Some(parse_fields(fields, Some(path))?),
                _ => return Err(SchemaError::invalid_rule(path, "fields must be an object")),
            },
            "defaultField" => {
                rule.default_field = Some(parse_rules(&format!("{path}.*"), value)?)
            }
            "options" => {
                rule.options = Some(serde_json::from_value::<ValidateOptions>(value.clone())?)
            }
            other => trace!("Ignoring unknown rule key '{}' on '{}'", other, path),
        }
    }
    Ok(rule)
}

fn string<'v>(path: &str, key: &str, value: &'v Value) -> SchemaResult<&'v str> {
    value
        .as_str()
        .ok_or_else(|| SchemaError::invalid_rule(path, format!("{key} must be a string")))
}

fn boolean(path: &str, key: &str, value: &Value) -> SchemaResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| SchemaError::invalid_rule(path, format!("{key} must be a boolean")))
}

fn number(path: &str, key: &str, value: &Value) -> SchemaResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| SchemaError::invalid_rule(path, format!("{key} must be a number")))
}

fn message(path: &str, value: &Value) -> SchemaResult<Message> {
    match value {
        Value::String(text) => Ok(Message::Text(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SchemaError::invalid_rule(path, "message entries must be strings")
                })
            })
            .collect::<SchemaResult<Vec<_>>>()
            .map(Message::List),
        _ => Err(SchemaError::invalid_rule(
            path,
            "message must be a string or an array of strings",
        )),
    }
}
