//! Bilingual (English/Hindi) content localization.
//!
//! # Architecture
//!
//! - `registry`: the supported content languages and their fallback order
//! - `language`: validated `Language` selector parsed from requests
//! - `node`: structural classification of document tree nodes
//! - `localize`: the deep transform and the per-resource projections
//!
//! # Example
//!
//! ```rust
//! use festival_server::i18n::{localize, Language};
//! use serde_json::json;
//!
//! let doc = json!({"title": {"en": "Day 1", "hi": "दिन 1"}, "day": 1});
//! let hindi = Language::from_query(Some("hi")).unwrap();
//! assert_eq!(localize(&doc, hindi.code()), json!({"title": "दिन 1", "day": 1}));
//! ```

mod language;
mod localize;
mod node;
mod registry;

pub use language::Language;
pub use localize::{
    localize, project_resource, project_resources, select, LocalizeError, Materialize,
};
pub use node::{classify, contains_leaf, is_bilingual, is_tagged_scalar, NodeKind};
pub use registry::{LanguageConfig, LanguageRegistry};
