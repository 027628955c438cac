use crate::i18n::Materialize;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

const ID_FIELD: &str = "_id";
const CREATED_AT_FIELD: &str = "createdAt";

/// The festival collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Schedules,
    Competitions,
    Volunteers,
    Pledges,
    Quizzes,
    Ebooks,
    Gallery,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Schedules,
        Resource::Competitions,
        Resource::Volunteers,
        Resource::Pledges,
        Resource::Quizzes,
        Resource::Ebooks,
        Resource::Gallery,
    ];

    /// Path segment and seed-file key for this collection
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Schedules => "schedules",
            Resource::Competitions => "competitions",
            Resource::Volunteers => "volunteers",
            Resource::Pledges => "pledges",
            Resource::Quizzes => "quizzes",
            Resource::Ebooks => "ebooks",
            Resource::Gallery => "gallery",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque 24-hex-character document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Seconds since the epoch followed by a process-wide counter.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let sequence = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        ObjectId(format!("{:08x}{:016x}", seconds, sequence))
    }

    /// Accepts exactly 24 hex digits, in either case.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(ObjectId(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document as held by the store: identity and timestamps kept apart from
/// the authored body.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: ObjectId,
    pub created_at: DateTime<Utc>,
    pub body: Map<String, Value>,
}

impl StoredDocument {
    fn new(body: Map<String, Value>) -> Self {
        Self {
            id: ObjectId::generate(),
            created_at: Utc::now(),
            body: strip_reserved(body),
        }
    }
}

/// Extended-JSON shape: `{"_id": {"$oid"}, ..body, "createdAt": {"$date"}}`
impl Materialize for StoredDocument {
    fn materialize(&self) -> Value {
        let mut doc = Map::with_capacity(self.body.len() + 2);
        doc.insert(ID_FIELD.to_string(), json!({ "$oid": self.id.as_str() }));
        for (key, value) in &self.body {
            doc.insert(key.clone(), value.clone());
        }
        doc.insert(
            CREATED_AT_FIELD.to_string(),
            json!({ "$date": self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true) }),
        );
        Value::Object(doc)
    }
}

fn strip_reserved(mut body: Map<String, Value>) -> Map<String, Value> {
    body.remove(ID_FIELD);
    body.remove(CREATED_AT_FIELD);
    body
}

/// In-memory document store shared by all request handlers.
#[derive(Default)]
pub struct DocumentStore {
    collections: RwLock<HashMap<Resource, Vec<StoredDocument>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a seed value: an object mapping resource names to
    /// arrays of documents.
    pub fn from_seed(seed: Value) -> Result<Self> {
        let Value::Object(entries) = seed else {
            bail!("Seed data must be a JSON object keyed by resource name");
        };

        let mut collections = HashMap::new();
        for (name, docs) in entries {
            let resource = Resource::from_str(&name)?;
            let Value::Array(docs) = docs else {
                bail!("Seed data for '{}' must be an array", name);
            };

            let mut stored = Vec::with_capacity(docs.len());
            let mut seen = HashSet::with_capacity(docs.len());
            for (index, doc) in docs.into_iter().enumerate() {
                let Value::Object(body) = doc else {
                    bail!("Seed document {} of '{}' is not an object", index, name);
                };
                let doc = seeded_document(body);
                if !seen.insert(doc.id.clone()) {
                    bail!("Seed document {} of '{}' reuses _id {}", index, name, doc.id);
                }
                stored.push(doc);
            }

            info!("Seeded {} {}", stored.len(), resource);
            collections.insert(resource, stored);
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    pub fn from_seed_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read seed file at {}", path))?;
        let seed: Value = serde_json::from_str(&content)
            .context(format!("Seed file {} is not valid JSON", path))?;
        Self::from_seed(seed)
    }

    pub async fn list(&self, resource: Resource) -> Vec<StoredDocument> {
        let collections = self.collections.read().await;
        collections.get(&resource).cloned().unwrap_or_default()
    }

    pub async fn get(&self, resource: Resource, id: &ObjectId) -> Option<StoredDocument> {
        let collections = self.collections.read().await;
        collections
            .get(&resource)
            .and_then(|docs| docs.iter().find(|doc| &doc.id == id))
            .cloned()
    }

    pub async fn count(&self, resource: Resource) -> usize {
        let collections = self.collections.read().await;
        collections.get(&resource).map(Vec::len).unwrap_or(0)
    }

    /// Insert a new document. `_id` and `createdAt` in the body are ignored.
    pub async fn insert(&self, resource: Resource, body: Map<String, Value>) -> StoredDocument {
        let doc = StoredDocument::new(body);
        let mut collections = self.collections.write().await;
        collections.entry(resource).or_default().push(doc.clone());
        debug!("Inserted {} into {}", doc.id, resource);
        doc
    }

    /// Replace the body of an existing document, keeping its id and creation
    /// date. Returns `None` when the document does not exist.
    pub async fn replace(
        &self,
        resource: Resource,
        id: &ObjectId,
        body: Map<String, Value>,
    ) -> Option<StoredDocument> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&resource)?
            .iter_mut()
            .find(|doc| &doc.id == id)?;
        doc.body = strip_reserved(body);
        Some(doc.clone())
    }

    /// Returns whether a document was removed.
    pub async fn delete(&self, resource: Resource, id: &ObjectId) -> bool {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&resource) else {
            return false;
        };
        let before = docs.len();
        docs.retain(|doc| &doc.id != id);
        before != docs.len()
    }
}

/// Seed documents may carry their own `_id` and `createdAt`; malformed values
/// are replaced.
fn seeded_document(body: Map<String, Value>) -> StoredDocument {
    let id = body
        .get(ID_FIELD)
        .and_then(|value| value.get("$oid"))
        .and_then(Value::as_str)
        .and_then(ObjectId::parse)
        .unwrap_or_else(ObjectId::generate);
    let created_at = body
        .get(CREATED_AT_FIELD)
        .and_then(|value| value.get("$date"))
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    StoredDocument {
        id,
        created_at,
        body: strip_reserved(body),
    }
}
