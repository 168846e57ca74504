//! Message templates for validation errors.
//!
//! Templates live in a two-level table: a top-level key maps either to a
//! template directly (`required`, `enum`, ...) or to a group of templates
//! (`types.string`, `number.max`, ...). Text templates understand the
//! `%s`, `%d`, `%j` and `%%` placeholders; function templates receive the
//! raw arguments and build the message themselves.

use crate::error::{SchemaError, SchemaResult};
use crate::value::display;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Function template signature.
pub type TemplateFn = dyn Fn(&[Value]) -> String + Send + Sync;

/// A single message template.
#[derive(Clone)]
pub enum Template {
    /// Literal text with placeholders
    Text(String),
    /// Computed message
    Func(Arc<TemplateFn>),
}

impl Template {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Render the template with the given arguments.
    pub fn render(&self, args: &[Value]) -> String {
        match self {
            Self::Text(text) => format(text, args),
            Self::Func(f) => f(args),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Substitute `%s`, `%d`, `%j` and `%%` in a text template.
///
/// Placeholders beyond the supplied arguments are left as written.
pub fn format(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = args.iter();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('s' | 'd' | 'j')) => {
                chars.next();
                match next_arg.next() {
                    Some(arg) => out.push_str(&render_arg(spec, arg)),
                    None => {
                        out.push('%');
                        out.push(spec);
                    }
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

fn render_arg(spec: char, arg: &Value) -> String {
    match spec {
        'd' => match arg {
            Value::Number(n) => display(&Value::Number(n.clone())),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|f| display(&crate::value::number_arg(f)))
                .unwrap_or_else(|_| "NaN".to_string()),
            Value::Bool(b) => u8::from(*b).to_string(),
            Value::Null => "0".to_string(),
            _ => "NaN".to_string(),
        },
        'j' => serde_json::to_string(arg).unwrap_or_else(|_| "[Circular]".to_string()),
        _ => display(arg),
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Template(Template),
    Group(BTreeMap<String, Template>),
}

/// Two-level table of message templates.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: BTreeMap<String, Entry>,
}

static DEFAULT_MESSAGES: LazyLock<Messages> = LazyLock::new(Messages::build_defaults);

impl Messages {
    /// An empty table, typically used to describe overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh copy of the built-in templates.
    pub fn defaults() -> Self {
        DEFAULT_MESSAGES.clone()
    }

    /// Shared reference to the built-in templates.
    pub fn default_ref() -> &'static Messages {
        &DEFAULT_MESSAGES
    }

    fn build_defaults() -> Self {
        let range = |len: &'static str, min: &'static str, max: &'static str, range: &'static str| {
            [("len", len), ("min", min), ("max", max), ("range", range)]
        };

        Self::new()
            .with("default", "Validation error on field %s")
            .with("required", "%s is required")
            .with("enum", "%s must be one of %s")
            .with("whitespace", "%s cannot be empty")
            .with_group(
                "date",
                [
                    ("format", "%s date %s is invalid for format %s"),
                    ("parse", "%s date could not be parsed, %s is invalid "),
                    ("invalid", "%s date %s is invalid"),
                ],
            )
            .with_group(
                "types",
                [
                    ("string", "%s is not a %s"),
                    ("method", "%s is not a %s (function)"),
                    ("array", "%s is not an %s"),
                    ("object", "%s is not an %s"),
                    ("number", "%s is not a %s"),
                    ("date", "%s is not a %s"),
                    ("boolean", "%s is not a %s"),
                    ("integer", "%s is not an %s"),
                    ("float", "%s is not a %s"),
                    ("regexp", "%s is not a valid %s"),
                    ("email", "%s is not a valid %s"),
                    ("url", "%s is not a valid %s"),
                    ("hex", "%s is not a valid %s"),
                ],
            )
            .with_group(
                "string",
                range(
                    "%s must be exactly %s characters",
                    "%s must be at least %s characters",
                    "%s cannot be longer than %s characters",
                    "%s must be between %s and %s characters",
                ),
            )
            .with_group(
                "number",
                range(
                    "%s must equal %s",
                    "%s cannot be less than %s",
                    "%s cannot be greater than %s",
                    "%s must be between %s and %s",
                ),
            )
            .with_group(
                "array",
                range(
                    "%s must be exactly %s in length",
                    "%s cannot be less than %s in length",
                    "%s cannot be greater than %s in length",
                    "%s must be between %s and %s in length",
                ),
            )
            .with_group(
                "pattern",
                [("mismatch", "%s value %s does not match pattern %s")],
            )
    }

    /// Set a top-level template.
    pub fn with(mut self, key: impl Into<String>, template: impl Into<Template>) -> Self {
        self.entries
            .insert(key.into(), Entry::Template(template.into()));
        self
    }

    /// Set one template inside a group, creating the group if needed.
    pub fn with_nested(
        mut self,
        group: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<Template>,
    ) -> Self {
        let entry = self
            .entries
            .entry(group.into())
            .or_insert_with(|| Entry::Group(BTreeMap::new()));
        match entry {
            Entry::Group(map) => {
                map.insert(key.into(), template.into());
            }
            Entry::Template(_) => {
                let mut map = BTreeMap::new();
                map.insert(key.into(), template.into());
                *entry = Entry::Group(map);
            }
        }
        self
    }

    fn with_group<const N: usize>(mut self, group: &str, items: [(&str, &str); N]) -> Self {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), Template::text(v)))
            .collect();
        self.entries.insert(group.to_string(), Entry::Group(map));
        self
    }

    /// Top-level template by key.
    pub fn get(&self, key: &str) -> Option<&Template> {
        match self.entries.get(key) {
            Some(Entry::Template(t)) => Some(t),
            _ => None,
        }
    }

    /// Grouped template by group and key.
    pub fn get_nested(&self, group: &str, key: &str) -> Option<&Template> {
        match self.entries.get(group) {
            Some(Entry::Group(map)) => map.get(key),
            _ => None,
        }
    }

    /// Render a top-level template; a missing template renders as empty text.
    pub fn render(&self, key: &str, args: &[Value]) -> String {
        self.get(key).map(|t| t.render(args)).unwrap_or_default()
    }

    /// Render a grouped template; a missing template renders as empty text.
    pub fn render_nested(&self, group: &str, key: &str, args: &[Value]) -> String {
        self.get_nested(group, key)
            .map(|t| t.render(args))
            .unwrap_or_default()
    }

    /// Overlay `overrides` onto this table, two levels deep.
    ///
    /// Groups present on both sides are merged key by key; anything else in
    /// `overrides` replaces the existing entry.
    pub fn merge(mut self, overrides: &Messages) -> Self {
        for (key, entry) in &overrides.entries {
            match (self.entries.get_mut(key), entry) {
                (Some(Entry::Group(base)), Entry::Group(over)) => {
                    base.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                _ => {
                    self.entries.insert(key.clone(), entry.clone());
                }
            }
        }
        self
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a table from a JSON object of strings or objects of strings.
    pub fn from_json(value: &Value) -> SchemaResult<Self> {
        let map = value.as_object().ok_or(SchemaError::InvalidDescriptor)?;
        let mut messages = Self::new();
        for (key, entry) in map {
            messages = match entry {
                Value::String(text) => messages.with(key.as_str(), text.as_str()),
                Value::Object(group) => {
                    let mut messages = messages;
                    for (sub, text) in group {
                        let text = text.as_str().ok_or_else(|| {
                            SchemaError::invalid_rule(
                                format!("messages.{key}.{sub}"),
                                "template must be a string",
                            )
                        })?;
                        messages = messages.with_nested(key.as_str(), sub.as_str(), text);
                    }
                    messages
                }
                _ => {
                    return Err(SchemaError::invalid_rule(
                        format!("messages.{key}"),
                        "template must be a string or an object of strings",
                    ));
                }
            };
        }
        Ok(messages)
    }
}
