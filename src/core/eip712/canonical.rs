//! Canonical ordering of typed messages prior to hashing.
//!
//! The venue re-derives the signed hash by walking the serialized structure in
//! key order, so the client must present exactly the same order: top-level
//! sections as `domain`, `primaryType`, `types`, `message`, and the domain
//! type as the last entry of `types`. Only order changes; no value is added,
//! dropped or altered.

use super::model::{TypedMessage, DOMAIN_TYPE_NAME};
use crate::core::errors::ExchangeError;
use serde_json::{Map, Value};

/// Required order of the top-level sections.
pub const TOP_LEVEL_ORDER: [&str; 4] = ["domain", "primaryType", "types", "message"];

/// A typed message in signing order. Only obtainable through canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMessage(Map<String, Value>);

impl CanonicalMessage {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_json(&self) -> Result<String, ExchangeError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn primary_type(&self) -> Result<&str, ExchangeError> {
        self.0
            .get("primaryType")
            .and_then(Value::as_str)
            .ok_or_else(|| ExchangeError::schema("`primaryType` is not a string"))
    }

    pub fn types(&self) -> Result<&Map<String, Value>, ExchangeError> {
        self.section("types")
    }

    pub fn domain(&self) -> Result<&Map<String, Value>, ExchangeError> {
        self.section("domain")
    }

    pub fn message(&self) -> Result<&Map<String, Value>, ExchangeError> {
        self.section("message")
    }

    fn section(&self, key: &str) -> Result<&Map<String, Value>, ExchangeError> {
        self.0
            .get(key)
            .and_then(Value::as_object)
            .ok_or_else(|| ExchangeError::schema(format!("`{}` is not an object", key)))
    }
}

/// Put the top-level sections in `domain, primaryType, types, message` order.
///
/// Unrecognised sections are kept after the four known ones, in their
/// original relative order.
pub fn reorder_top_level(raw: &Map<String, Value>) -> Result<Map<String, Value>, ExchangeError> {
    let mut ordered = Map::with_capacity(raw.len());
    for key in TOP_LEVEL_ORDER {
        let value = raw.get(key).ok_or_else(|| {
            ExchangeError::schema(format!("typed message has no `{}` section", key))
        })?;
        ordered.insert(key.to_string(), value.clone());
    }
    for (key, value) in raw {
        if !TOP_LEVEL_ORDER.contains(&key.as_str()) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    Ok(ordered)
}

/// Move the domain type to the end of the registry, keeping every other
/// entry in its original relative order.
pub fn reorder_types(registry: &Map<String, Value>) -> Result<Map<String, Value>, ExchangeError> {
    let domain = registry
        .get(DOMAIN_TYPE_NAME)
        .ok_or_else(|| ExchangeError::MissingDomainTypeError(DOMAIN_TYPE_NAME.to_string()))?;

    let mut ordered: Map<String, Value> = registry
        .iter()
        .filter(|(name, _)| name.as_str() != DOMAIN_TYPE_NAME)
        .map(|(name, fields)| (name.clone(), fields.clone()))
        .collect();
    ordered.insert(DOMAIN_TYPE_NAME.to_string(), domain.clone());
    Ok(ordered)
}

/// Canonicalize an already-serialized typed message.
///
/// Applying this to its own output yields an identical structure.
pub fn canonicalize_raw(raw: &Map<String, Value>) -> Result<CanonicalMessage, ExchangeError> {
    let types = raw
        .get("types")
        .and_then(Value::as_object)
        .ok_or_else(|| ExchangeError::schema("typed message has no `types` object"))?;

    // Replacing an existing key keeps its position.
    let mut with_types = raw.clone();
    with_types.insert("types".to_string(), Value::Object(reorder_types(types)?));

    Ok(CanonicalMessage(reorder_top_level(&with_types)?))
}

pub fn canonicalize(message: &TypedMessage) -> Result<CanonicalMessage, ExchangeError> {
    canonicalize_raw(&message.to_raw())
}

/// Parse JSON text and canonicalize it.
pub fn canonicalize_json(text: &str) -> Result<CanonicalMessage, ExchangeError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(raw) => canonicalize_raw(&raw),
        _ => Err(ExchangeError::schema("typed message must be a JSON object")),
    }
}
