//! Driving work packages through their validators.
//!
//! A run normalizes one level of rules, then executes the resulting packages
//! according to the options' concurrency policy:
//!
//! - `short_circuit`: every package, one at a time in declaration order,
//!   stopping at the first package that reports errors.
//! - otherwise each field group runs on its own, serially when the field is
//!   listed in `first_fields` and with all rules in flight at once when it is
//!   not. Every group is awaited before the run concludes.
//!
//! `first` is applied when errors are discovered: the first package to settle
//! with errors provides the whole result and suppresses its recursion.

use super::Schema;
use super::aggregate::complement_error;
use super::normalize::{Document, FieldGroup, Package, normalize};
use super::options::ValidateOptions;
use super::types::{Descriptor, FieldPath, InternalRule, Message};
use crate::error::{ValidateError, ValidateResult, ValidationFailure};
use crate::messages::Messages;
use crate::validator::{ErrorToken, LeafCall, Outcome, Validator};
use crate::value::{container_keys, is_truthy};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, trace, warn};
use serde_json::Value;
use std::sync::OnceLock;

/// Errors of the first package that failed, when `first` is set.
type FirstErrors = OnceLock<Vec<ValidateError>>;

impl Schema {
    /// Validate one level of `doc`, rooted at `base` (`None` for the root).
    pub(crate) fn run<'a>(
        &'a self,
        doc: &'a Document<'_>,
        options: &'a ValidateOptions,
        base: Option<FieldPath>,
    ) -> BoxFuture<'a, ValidateResult<Vec<ValidateError>>> {
        async move {
            if self.rules.is_empty() {
                return Ok(Vec::new());
            }
            let keys = match base {
                None => options.keys.as_deref(),
                Some(_) => None,
            };
            let groups = normalize(&self.rules, &self.registry, doc, base.as_ref(), keys)?;
            let first = FirstErrors::new();

            let errors = if options.short_circuit {
                let mut errors = Vec::new();
                for package in groups.iter().flat_map(|group| &group.packages) {
                    errors = self.execute(package, doc, options, &first).await?;
                    if !errors.is_empty() {
                        break;
                    }
                }
                errors
            } else {
                let mut pending: FuturesUnordered<_> = groups
                    .iter()
                    .map(|group| self.run_group(group, doc, options, &first))
                    .collect();
                let mut errors = Vec::new();
                while let Some(group_errors) = pending.next().await {
                    errors.extend(group_errors?);
                }
                errors
            };

            if options.first {
                return Ok(first.get().cloned().unwrap_or_default());
            }
            Ok(errors)
        }
        .boxed()
    }

    async fn run_group(
        &self,
        group: &FieldGroup,
        doc: &Document<'_>,
        options: &ValidateOptions,
        first: &FirstErrors,
    ) -> ValidateResult<Vec<ValidateError>> {
        if options.first_fields.contains(&group.field) {
            for package in &group.packages {
                let errors = self.execute(package, doc, options, first).await?;
                if !errors.is_empty() {
                    return Ok(errors);
                }
            }
            return Ok(Vec::new());
        }

        let mut pending: FuturesUnordered<_> = group
            .packages
            .iter()
            .map(|package| self.execute(package, doc, options, first))
            .collect();
        let mut errors = Vec::new();
        while let Some(package_errors) = pending.next().await {
            errors.extend(package_errors?);
        }
        Ok(errors)
    }

    /// Run one package's validator and settle its result.
    async fn execute(
        &self,
        package: &Package,
        doc: &Document<'_>,
        options: &ValidateOptions,
        first: &FirstErrors,
    ) -> ValidateResult<Vec<ValidateError>> {
        let rule = &package.rule;
        let value = package.value.as_ref();
        let deep = matches!(rule.rule_type.as_str(), "object" | "array")
            && rule.has_nested()
            && (rule.is_required() || is_truthy(value));
        trace!(
            "Validating '{}' as {} (deep: {})",
            rule.field_path(),
            rule.rule_type,
            deep
        );

        let call = LeafCall {
            rule,
            value,
            source: &package.source,
            options,
        };
        let tokens = match rule.validator() {
            Validator::Sync(check) => match check(&call) {
                Ok(outcome) => outcome_tokens(rule, outcome),
                Err(raised) => {
                    error!("Validator for '{}' raised: {}", rule.field_path(), raised);
                    if !options.suppress_validator_error {
                        return Err(ValidationFailure::validator(rule.field_path(), raised));
                    }
                    vec![ErrorToken::Message(raised.to_string())]
                }
            },
            Validator::Async(check) => match check(&call).await {
                Ok(outcome) => outcome_tokens(rule, outcome),
                Err(rejected) => vec![ErrorToken::Message(rejected.to_string())],
            },
        };

        let errors = self.settle(package, tokens, deep, doc, options).await?;
        if options.first && !errors.is_empty() {
            // only the first failure is kept
            let _ = first.set(errors.clone());
        }
        Ok(errors)
    }

    /// Turn leaf tokens into errors and recurse into nested rules.
    async fn settle(
        &self,
        package: &Package,
        tokens: Vec<ErrorToken>,
        deep: bool,
        doc: &Document<'_>,
        options: &ValidateOptions,
    ) -> ValidateResult<Vec<ValidateError>> {
        let rule = &package.rule;
        if !tokens.is_empty() && !options.suppress_warning {
            warn!("Validation failed for '{}': {:?}", rule.field_path(), tokens);
        }
        let tokens = match &rule.message {
            Some(message) if !tokens.is_empty() => message
                .texts()
                .into_iter()
                .map(ErrorToken::Message)
                .collect(),
            _ => tokens,
        };
        let mut errors: Vec<ValidateError> = doc.read(|root| {
            tokens
                .into_iter()
                .map(|token| complement_error(rule, root, token))
                .collect()
        });

        if (options.first && !errors.is_empty()) || !deep {
            return Ok(errors);
        }

        // a required container that is missing never reaches its children
        if rule.is_required() && !is_truthy(package.value.as_ref()) {
            if let Some(message) = &rule.message {
                let token = ErrorToken::Message(message.first_text());
                errors = vec![doc.read(|root| complement_error(rule, root, token))];
            } else if let Some(formatter) = &options.error {
                // rendered with the dotted path, not the local key
                let text = options
                    .messages
                    .as_ref()
                    .unwrap_or_else(|| Messages::default_ref())
                    .render("required", &[Value::from(rule.field_path())]);
                errors = vec![formatter(rule, text)];
            }
            return Ok(errors);
        }

        let child = self.nested(nested_rules(rule, package.value.as_ref()));
        let child_options = match &rule.options {
            Some(own) => ValidateOptions {
                messages: options.messages.clone(),
                error: options.error.clone(),
                keys: None,
                ..own.clone()
            },
            None => ValidateOptions {
                keys: None,
                ..options.clone()
            },
        };
        debug!(
            "Descending into '{}' ({} nested field(s))",
            rule.field_path(),
            child.rules.len()
        );
        let nested = child
            .run(doc, &child_options, Some(rule.path.clone()))
            .await?;
        errors.extend(nested);
        Ok(errors)
    }
}

/// Interpret a validator's outcome as raw error tokens.
fn outcome_tokens(rule: &InternalRule, outcome: Outcome) -> Vec<ErrorToken> {
    match outcome {
        Outcome::Valid => Vec::new(),
        Outcome::Invalid => match &rule.message {
            Some(Message::Func(f)) => vec![ErrorToken::Message(f())],
            Some(message) => message.texts().into_iter().map(ErrorToken::Message).collect(),
            None => vec![ErrorToken::Message(format!("{} fails", rule.field_path()))],
        },
        Outcome::Errors(tokens) => tokens,
    }
}

/// Rules for the children of a container: `default_field` for every key
/// present, overridden per key by `fields`.
fn nested_rules(rule: &InternalRule, value: Option<&Value>) -> Descriptor {
    let mut descriptor = Descriptor::new();
    if let Some(default_field) = &rule.default_field {
        for key in container_keys(value) {
            descriptor.insert(key, default_field.clone());
        }
    }
    if let Some(fields) = &rule.fields {
        for (name, rules) in fields.iter() {
            descriptor.insert(name.to_string(), rules.to_vec());
        }
    }
    descriptor
}
