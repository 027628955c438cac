//! Localization engine: collapses bilingual fields to a single language.
//!
//! The engine is schema-agnostic. It never asks which fields of a schedule or
//! a quiz are bilingual; it recognizes bilingual leaves by shape (see
//! [`classify`]) and rebuilds everything else as it found it.

use crate::i18n::node::{classify, NodeKind};
use crate::i18n::LanguageRegistry;
use serde_json::{Map, Value};
use tracing::warn;

/// Errors raised by the resource projections.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocalizeError {
    /// The caller asked to project a resource that does not exist.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// Storage-adapter capability: detach a stored resource into a plain tree.
///
/// The engine only ever sees the result, never the adapter's own types.
pub trait Materialize {
    fn materialize(&self) -> Value;
}

impl Materialize for Value {
    fn materialize(&self) -> Value {
        self.clone()
    }
}

impl Materialize for Map<String, Value> {
    fn materialize(&self) -> Value {
        Value::Object(self.clone())
    }
}

/// Resolve one bilingual value to a string.
///
/// * absent or `null` gives `""`
/// * a bare string (legacy data) is returned as-is
/// * anything else is read as a bilingual leaf: `lang`, then `en`, then
///   `hi`, then `""`; only non-empty strings qualify
pub fn select(leaf: Option<&Value>, lang: &str) -> String {
    match leaf {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(map)) => {
            let pick = |code: &str| match map.get(code) {
                Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
                _ => None,
            };
            pick(lang)
                .or_else(|| {
                    LanguageRegistry::get()
                        .fallback_codes()
                        .find_map(|code| pick(code))
                })
                .unwrap_or_default()
        }
        Some(_) => String::new(),
    }
}

/// Deep-transform a tree, replacing every bilingual leaf with its text in
/// `lang`. Array order, key order and every non-bilingual value are kept.
pub fn localize(value: &Value, lang: &str) -> Value {
    match classify(value) {
        NodeKind::Null | NodeKind::Identity | NodeKind::Scalar => value.clone(),
        NodeKind::Sequence(items) => {
            Value::Array(items.iter().map(|item| localize(item, lang)).collect())
        }
        NodeKind::Leaf(_) => Value::String(select(Some(value), lang)),
        NodeKind::PlainObject(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), localize(item, lang)))
                .collect(),
        ),
    }
}

/// Materialize a single resource and localize it.
///
/// Callers are expected to have handled "not found" already; an absent
/// resource here is a sequencing bug and is reported as `InvalidInput`.
pub fn project_resource<T>(doc: Option<&T>, lang: &str) -> Result<Value, LocalizeError>
where
    T: Materialize + ?Sized,
{
    match doc {
        Some(doc) => Ok(localize(&doc.materialize(), lang)),
        None => {
            warn!("project_resource called without a resource");
            Err(LocalizeError::InvalidInput("resource is required"))
        }
    }
}

/// Materialize and localize each resource of a list.
///
/// Unlike [`project_resource`], a missing list is not an error: list
/// endpoints answer with an empty array.
pub fn project_resources<T>(docs: Option<&[T]>, lang: &str) -> Vec<Value>
where
    T: Materialize,
{
    docs.map(|docs| {
        docs.iter()
            .map(|doc| localize(&doc.materialize(), lang))
            .collect()
    })
    .unwrap_or_default()
}
