//! Declarative DTO transformation.
//!
//! A [`TransformTable`] maps destination keys to [`TransformRule`]s. Applying
//! a table to a raw API object produces a new object containing only the keys
//! whose rule yielded a non-null value, so "missing" and "null" collapse into
//! a single state for everything downstream.

use crate::error::RiverDataError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

/// A raw API object as decoded from JSON.
pub type Dto = Map<String, Value>;

/// Transform a single raw source value. `Ok(None)` omits the destination key.
pub type ComputeFn = fn(&Value) -> Result<Option<Value>, RiverDataError>;

/// Derive any number of destination keys from the whole raw object.
pub type SpreadFn = fn(&Dto) -> Result<Dto, RiverDataError>;

#[derive(Debug, Clone)]
pub enum TransformRule {
    /// Copy the source key of the same name.
    Copy,
    /// Copy from a differently named source key.
    Rename(String),
    /// Apply a function to the raw value of a source key.
    Compute(String, ComputeFn),
    /// Merge the keys returned by a function of the whole raw object.
    Spread(SpreadFn),
}

/// Rules keyed by destination key, in insertion order.
///
/// Rules never see each other's output, so order does not change the result.
#[derive(Debug, Clone)]
pub struct TransformTable {
    entity: &'static str,
    rules: Vec<(String, TransformRule)>,
}

impl TransformTable {
    /// Create an empty table; `entity` names the resource in errors and logs.
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rules: Vec::new(),
        }
    }

    /// A table that copies every key present in `dto`.
    pub fn identity(dto: &Dto) -> Self {
        dto.keys()
            .fold(Self::new("identity"), |table, key| table.copy(key))
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &TransformRule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    /// Set the rule for `key`, replacing any earlier rule for the same key.
    pub fn rule(mut self, key: impl Into<String>, rule: TransformRule) -> Self {
        let key = key.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((key, rule)),
        }
        self
    }

    pub fn copy(self, key: impl Into<String>) -> Self {
        self.rule(key, TransformRule::Copy)
    }

    pub fn copy_all(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |table, key| table.copy(*key))
    }

    pub fn rename(self, key: impl Into<String>, source: impl Into<String>) -> Self {
        self.rule(key, TransformRule::Rename(source.into()))
    }

    pub fn compute(self, key: impl Into<String>, source: impl Into<String>, f: ComputeFn) -> Self {
        self.rule(key, TransformRule::Compute(source.into(), f))
    }

    /// Add a spread rule. `name` only identifies the rule within the table.
    pub fn spread(self, name: impl Into<String>, f: SpreadFn) -> Self {
        self.rule(name, TransformRule::Spread(f))
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Apply `table` to `dto`, returning the transformed object.
///
/// Errors from compute and spread functions are propagated unchanged; there
/// is no per-field recovery.
pub fn apply(dto: &Dto, table: &TransformTable) -> Result<Dto, RiverDataError> {
    let mut out = Dto::new();

    for (key, rule) in table.rules() {
        match rule {
            TransformRule::Copy => {
                if let Some(value) = present(dto.get(key)) {
                    out.insert(key.to_string(), value.clone());
                }
            }
            TransformRule::Rename(source) => {
                if let Some(value) = present(dto.get(source)) {
                    out.insert(key.to_string(), value.clone());
                }
            }
            TransformRule::Compute(source, f) => {
                let Some(value) = present(dto.get(source)) else {
                    continue;
                };
                if let Some(result) = f(value)?.filter(|v| !v.is_null()) {
                    out.insert(key.to_string(), result);
                }
            }
            TransformRule::Spread(f) => {
                for (spread_key, value) in f(dto)? {
                    if !value.is_null() {
                        out.insert(spread_key, value);
                    }
                }
            }
        }
    }

    trace!(entity = table.entity(), keys = out.len(), "transformed dto");
    Ok(out)
}

/// Apply `table` to `dto` and deserialize the result into `T`.
pub fn transform_dto<T: DeserializeOwned>(
    dto: &Dto,
    table: &TransformTable,
) -> Result<T, RiverDataError> {
    let out = apply(dto, table)?;
    serde_json::from_value(Value::Object(out))
        .map_err(|e| RiverDataError::shape(table.entity(), e.to_string()))
}

/// View a JSON value as a raw object.
pub fn as_dto<'a>(value: &'a Value, entity: &'static str) -> Result<&'a Dto, RiverDataError> {
    value
        .as_object()
        .ok_or_else(|| RiverDataError::shape(entity, format!("expected an object, got {value}")))
}
