//! Expanding declared rules into per-call work packages.

use super::registry::TypeRegistry;
use super::types::{Descriptor, FieldPath, InternalRule, Pattern, Rule};
use crate::error::{SchemaError, SchemaResult};
use crate::validator::Validator;
use crate::value::{child, set_child, value_at, value_at_mut};
use log::trace;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// The caller's value, shared by every level of a run.
///
/// Transforms write through it; validators only ever see snapshots, so the
/// lock is never held across a suspension point.
pub(crate) struct Document<'d> {
    root: Mutex<&'d mut Value>,
}

impl<'d> Document<'d> {
    pub(crate) fn new(root: &'d mut Value) -> Self {
        Self {
            root: Mutex::new(root),
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        let guard = self.root.lock().unwrap_or_else(PoisonError::into_inner);
        f(&**guard)
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut guard = self.root.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **guard)
    }
}

/// One rule bound to the value it checks.
#[derive(Debug)]
pub(crate) struct Package {
    pub rule: InternalRule,
    pub value: Option<Value>,
    /// Snapshot of the enclosing container
    pub source: Arc<Value>,
}

/// All packages of one field, in declaration order.
#[derive(Debug)]
pub(crate) struct FieldGroup {
    pub field: String,
    pub packages: Vec<Package>,
}

/// Effective type tag of a rule.
///
/// A rule without a type but with a compiled pattern is a `pattern` rule;
/// otherwise the default is `string`. Naming an unregistered type is an
/// error unless the rule brings its own validator.
pub(crate) fn rule_type(rule: &Rule, registry: &TypeRegistry) -> SchemaResult<String> {
    let declared = match (&rule.rule_type, &rule.pattern) {
        (Some(tag), _) => Some(tag.as_str()),
        (None, Some(Pattern::Regex(_))) => Some("pattern"),
        _ => None,
    };
    if let Some(tag) = declared {
        if rule.validator.is_none() && !registry.contains(tag) {
            return Err(SchemaError::unknown_type(tag));
        }
    }
    Ok(declared.unwrap_or("string").to_string())
}

/// Validator a rule runs with, if any.
fn resolve_validator(rule: &Rule, registry: &TypeRegistry) -> SchemaResult<Option<Validator>> {
    if let Some(validator) = &rule.validator {
        return Ok(Some(validator.clone()));
    }
    if rule.is_required_only() {
        return Ok(registry.get("required"));
    }
    Ok(registry.get(&rule_type(rule, registry)?))
}

/// Build the work packages for one level of a run.
///
/// `base` is the path of the container being validated (`None` at the root).
/// `keys` restricts and orders the fields; undeclared keys are skipped.
/// Transforms are applied to the document before anything is snapshotted.
pub(crate) fn normalize(
    rules: &Descriptor,
    registry: &TypeRegistry,
    doc: &Document<'_>,
    base: Option<&FieldPath>,
    keys: Option<&[String]>,
) -> SchemaResult<Vec<FieldGroup>> {
    let container_path: &[String] = base.map(FieldPath::segments).unwrap_or_default();

    let selected: Vec<(&str, &[Rule])> = match keys {
        Some(keys) => keys
            .iter()
            .filter_map(|key| rules.get(key).map(|r| (key.as_str(), r)))
            .collect(),
        None => rules.iter().collect(),
    };

    let mut pending = Vec::with_capacity(selected.len());
    for (field, field_rules) in selected {
        let path = match base {
            Some(base) => base.child(field),
            None => FieldPath::root(field),
        };
        let mut packages = Vec::with_capacity(field_rules.len());
        for rule in field_rules {
            if let Some(transform) = &rule.transform {
                doc.write(|root| {
                    if let Some(container) = value_at_mut(root, container_path) {
                        let current = child(container, field).cloned().unwrap_or(Value::Null);
                        set_child(container, field, transform.apply(&current));
                    }
                });
            }

            let Some(validator) = resolve_validator(rule, registry)? else {
                trace!("Dropping rule on '{}' with no resolvable validator", path);
                continue;
            };
            let resolved_type = rule_type(rule, registry)?;
            let value = doc.read(|root| {
                value_at(root, container_path)
                    .and_then(|container| child(container, field))
                    .cloned()
            });
            packages.push((
                InternalRule::new(rule.clone(), resolved_type, path.clone(), validator),
                value,
            ));
        }
        if !packages.is_empty() {
            pending.push((field.to_string(), packages));
        }
    }

    let source = Arc::new(doc.read(|root| {
        value_at(root, container_path)
            .cloned()
            .unwrap_or(Value::Null)
    }));

    Ok(pending
        .into_iter()
        .map(|(field, packages)| FieldGroup {
            field,
            packages: packages
                .into_iter()
                .map(|(rule, value)| Package {
                    rule,
                    value,
                    source: Arc::clone(&source),
                })
                .collect(),
        })
        .collect())
}
