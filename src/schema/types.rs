//! Rule declarations and the normalized rule records built from them.

use super::options::ValidateOptions;
use crate::validator::Validator;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Static or lazily built message attached to a rule.
#[derive(Clone)]
pub enum Message {
    Text(String),
    /// Each entry becomes its own error
    List(Vec<String>),
    Func(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Message {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Message texts this rule reports in place of leaf errors.
    pub fn texts(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::List(items) => items.clone(),
            Self::Func(f) => vec![f()],
        }
    }

    /// First message text; empty for an empty list.
    pub fn first_text(&self) -> String {
        match self {
            Self::List(items) => items.first().cloned().unwrap_or_default(),
            other => other.texts().into_iter().next().unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for Message {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Regular expression constraint.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Compiled expression; a rule without a type becomes a `pattern` rule
    Regex(Regex),
    /// Expression given as source text; the rule keeps the default type
    Source(Regex),
}

impl Pattern {
    /// Compile pattern source text.
    pub fn source(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self::Source)
    }

    pub fn regex(&self) -> &Regex {
        match self {
            Self::Regex(re) | Self::Source(re) => re,
        }
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// Value rewrite applied in place before validation.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// A single validation constraint declaration for a field.
///
/// All members are optional; builder methods cover the common cases.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    /// Type tag selecting the registered checker
    pub rule_type: Option<String>,
    /// Tri-state so that an explicit `false` still counts as declared
    pub required: Option<bool>,
    pub message: Option<Message>,
    pub transform: Option<Transform>,
    /// Overrides registry lookup when set
    pub validator: Option<Validator>,
    /// Explicit per-key nested rules
    pub fields: Option<Descriptor>,
    /// Rules applied to every key or index not covered by `fields`
    pub default_field: Option<Vec<Rule>>,
    /// Options used for the nested schema instead of the parent's
    pub options: Option<ValidateOptions>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub len: Option<f64>,
    pub pattern: Option<Pattern>,
    pub enumeration: Option<Vec<Value>>,
    pub whitespace: bool,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule with a type tag.
    pub fn of_type(rule_type: impl Into<String>) -> Self {
        Self::new().rule_type(rule_type)
    }

    pub fn rule_type(mut self, rule_type: impl Into<String>) -> Self {
        self.rule_type = Some(rule_type.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Transform::new(f));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn fields(mut self, fields: Descriptor) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn default_field(mut self, rules: impl IntoRules) -> Self {
        self.default_field = Some(rules.into_rules());
        self
    }

    pub fn options(mut self, options: ValidateOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn len(mut self, len: f64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn one_of(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.enumeration = Some(values.into_iter().collect());
        self
    }

    pub fn whitespace(mut self) -> Self {
        self.whitespace = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    /// Whether `required` is the only thing declared besides `message`.
    pub fn is_required_only(&self) -> bool {
        self.required.is_some()
            && self.rule_type.is_none()
            && self.transform.is_none()
            && self.validator.is_none()
            && self.fields.is_none()
            && self.default_field.is_none()
            && self.options.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.len.is_none()
            && self.pattern.is_none()
            && self.enumeration.is_none()
            && !self.whitespace
    }

    /// Whether the rule declares nested rules for its container value.
    pub fn has_nested(&self) -> bool {
        self.fields.is_some() || self.default_field.is_some()
    }
}

impl From<Validator> for Rule {
    fn from(validator: Validator) -> Self {
        Self::new().validator(validator)
    }
}

/// Anything that can stand for a field's rule list.
pub trait IntoRules {
    fn into_rules(self) -> Vec<Rule>;
}

impl IntoRules for Rule {
    fn into_rules(self) -> Vec<Rule> {
        vec![self]
    }
}

impl IntoRules for Vec<Rule> {
    fn into_rules(self) -> Vec<Rule> {
        self
    }
}

impl<const N: usize> IntoRules for [Rule; N] {
    fn into_rules(self) -> Vec<Rule> {
        self.into()
    }
}

impl IntoRules for Validator {
    fn into_rules(self) -> Vec<Rule> {
        vec![Rule::from(self)]
    }
}

/// Ordered mapping of field names to rule lists.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    entries: Vec<(String, Vec<Rule>)>,
    /// Field name to position in `entries`
    index: HashMap<String, usize>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field's rules, keeping its original position.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoRules) -> Self {
        self.insert(name.into(), rules.into_rules());
        self
    }

    pub fn insert(&mut self, name: String, rules: Vec<Rule>) {
        match self.index.get(&name) {
            Some(&at) => self.entries[at].1 = rules,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, rules));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Rule]> {
        self.index
            .get(name)
            .map(|&at| self.entries[at].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.entries.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Descriptor {
    type Item = (String, Vec<Rule>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Rule>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, R: IntoRules> FromIterator<(K, R)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |d, (name, rules)| d.field(name, rules))
    }
}

/// Immutable address of a value from the validation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Arc<[String]>,
    dotted: Arc<str>,
}

impl FieldPath {
    /// Path of a top-level field.
    pub fn root(field: &str) -> Self {
        Self {
            segments: Arc::from(vec![field.to_string()]),
            dotted: Arc::from(field),
        }
    }

    /// Path of a child key below this one.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.to_vec();
        segments.push(key.to_string());
        Self {
            segments: segments.into(),
            dotted: format!("{}.{}", self.dotted, key).into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

/// A per-call copy of a declared rule with everything resolved.
///
/// Dereferences to the declared [`Rule`] so leaf checks read constraints
/// directly.
#[derive(Debug, Clone)]
pub struct InternalRule {
    rule: Rule,
    /// Resolved type tag
    pub rule_type: String,
    /// The field's own key
    pub field: String,
    pub path: FieldPath,
    pub(crate) validator: Validator,
}

impl InternalRule {
    pub(crate) fn new(rule: Rule, rule_type: String, path: FieldPath, validator: Validator) -> Self {
        let field = path.segments().last().cloned().unwrap_or_default();
        Self {
            rule,
            rule_type,
            field,
            path,
            validator,
        }
    }

    /// Dotted path from the validation root.
    pub fn field_path(&self) -> &str {
        self.path.as_str()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl Deref for InternalRule {
    type Target = Rule;

    fn deref(&self) -> &Rule {
        &self.rule
    }
}
