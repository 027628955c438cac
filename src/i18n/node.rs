//! Structural classification of document tree nodes.
//!
//! Every node is classified exactly once, before any recursion, so the
//! "is this a bilingual pair?" question has a single answer in one place.

use serde_json::{Map, Value};

/// Key holding the English text of a bilingual field.
pub const EN_KEY: &str = "en";

/// Key holding the Hindi text of a bilingual field.
pub const HI_KEY: &str = "hi";

/// The shape of a node, as far as localization is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    /// `null`
    Null,
    /// Ordered sequence whose elements are localized independently.
    Sequence(&'a [Value]),
    /// Date or identifier handed out by the storage adapter. Opaque.
    Identity,
    /// Object carrying both `en` and `hi`. Terminal.
    Leaf(&'a Map<String, Value>),
    /// Any other object; its values are localized key by key.
    PlainObject(&'a Map<String, Value>),
    /// String, number or boolean.
    Scalar,
}

/// Classify a node. Precedence: null, sequence, identity, leaf, plain object,
/// scalar.
pub fn classify(value: &Value) -> NodeKind<'_> {
    match value {
        Value::Null => NodeKind::Null,
        Value::Array(items) => NodeKind::Sequence(items),
        Value::Object(map) if is_tagged_scalar(map) => NodeKind::Identity,
        Value::Object(map) if is_bilingual(map) => NodeKind::Leaf(map),
        Value::Object(map) => NodeKind::PlainObject(map),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => NodeKind::Scalar,
    }
}

/// True for an object exposing both language keys. A `null` value still
/// counts as present.
pub fn is_bilingual(map: &Map<String, Value>) -> bool {
    map.contains_key(EN_KEY) && map.contains_key(HI_KEY)
}

/// Extended-JSON type tags a storage adapter may use for scalar values.
/// `$type`, `$regex` and `$options` only appear next to `$binary`/`$regex`.
const EXTENDED_JSON_TAGS: &[&str] = &[
    "$oid",
    "$date",
    "$numberLong",
    "$numberInt",
    "$numberDouble",
    "$numberDecimal",
    "$binary",
    "$type",
    "$uuid",
    "$timestamp",
    "$regularExpression",
    "$regex",
    "$options",
    "$symbol",
    "$minKey",
    "$maxKey",
];

/// Storage adapters hand dates and identifiers out as extended-JSON values
/// (`{"$oid": ..}`, `{"$date": ..}`, `{"$date": {"$numberLong": ..}}`): an
/// object whose keys are all known type tags. Other `$` keys are plain data
/// and get localized like any other object.
pub fn is_tagged_scalar(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map
            .keys()
            .all(|key| EXTENDED_JSON_TAGS.contains(&key.as_str()))
}

/// Whether a bilingual leaf appears anywhere in the tree.
pub fn contains_leaf(value: &Value) -> bool {
    match classify(value) {
        NodeKind::Leaf(_) => true,
        NodeKind::Sequence(items) => items.iter().any(contains_leaf),
        NodeKind::PlainObject(map) => map.values().any(contains_leaf),
        NodeKind::Null | NodeKind::Identity | NodeKind::Scalar => false,
    }
}
