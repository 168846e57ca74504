//! Type-checker registry mapping type tags to leaf validators.
//!
//! The registry is a cheap, cloneable handle. Clones share one table, so a
//! registration made through any handle is seen by every schema holding it.

use crate::error::{SchemaError, SchemaResult};
use crate::validator::{self, Validator};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared table of leaf validators keyed by type tag.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    validators: Arc<RwLock<HashMap<String, Validator>>>,
}

impl TypeRegistry {
    /// Create a registry carrying the built-in type checkers.
    pub fn new() -> Self {
        let registry = Self::empty();
        {
            let mut validators = registry.write();
            for (tag, validator) in validator::builtins() {
                validators.insert(tag.to_string(), validator);
            }
        }
        registry
    }

    /// Create a registry with no type checkers at all.
    pub fn empty() -> Self {
        Self {
            validators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register or replace the validator for a type tag.
    ///
    /// Affects every schema sharing this registry from now on.
    pub fn register(&self, type_tag: impl Into<String>, validator: Validator) -> SchemaResult<()> {
        let type_tag = type_tag.into();
        if type_tag.is_empty() {
            return Err(SchemaError::EmptyTypeTag);
        }
        debug!("Registering validator for type '{}'", type_tag);
        self.write().insert(type_tag, validator);
        Ok(())
    }

    /// Validator registered for a type tag.
    pub fn get(&self, type_tag: &str) -> Option<Validator> {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_tag)
            .cloned()
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_tag)
    }

    /// Registered type tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }

    /// Whether two handles share the same table.
    pub fn same_table(&self, other: &TypeRegistry) -> bool {
        Arc::ptr_eq(&self.validators, &other.validators)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Validator>> {
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
