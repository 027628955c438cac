//! HTTP surface.
//!
//! Public routes apply the localization policy: a recognized `lang` query
//! value gets a single-language projection, anything else gets the raw
//! bilingual documents. Admin routes always work on the raw form.

use crate::config::Config;
use crate::error::ApiError;
use crate::i18n::{project_resource, project_resources, Language, LanguageRegistry, Materialize};
use crate::security::{is_authorized_admin, API_KEY_HEADER};
use crate::store::{DocumentStore, ObjectId, Resource};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: Config, store: DocumentStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    fn language(&self) -> Option<Language> {
        Language::from_query(self.lang.as_deref())
    }
}

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/:resource", get(admin_list).post(admin_create))
        .route(
            "/:resource/:id",
            get(admin_get).put(admin_replace).delete(admin_delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/:resource", get(list_resources))
        .route("/api/:resource/:id", get(get_resource))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !is_authorized_admin(provided, state.config.admin_api_key.as_deref()) {
        warn!("Rejected admin request to {}", request.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn parse_id(raw: String) -> Result<ObjectId, ApiError> {
    ObjectId::parse(&raw).ok_or(ApiError::InvalidId(raw))
}

/// Unwrap a JSON body, reporting axum's rejection (bad syntax, missing
/// content type) through `ApiError` like every other failure.
fn into_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::BadRequest(
            "body must be a JSON object".to_string(),
        )),
    }
}

// ==================== Public ====================

/// Languages a client may pass as `lang`, for building a language picker.
async fn list_languages() -> Json<Value> {
    let languages: Vec<Value> = LanguageRegistry::get()
        .list_all()
        .iter()
        .map(|lang| {
            json!({
                "code": lang.code,
                "name": lang.name,
                "nativeName": lang.native_name,
            })
        })
        .collect();

    Json(json!({
        "default": Language::canonical().code(),
        "languages": languages,
    }))
}

async fn list_resources(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let resource: Resource = resource.parse()?;
    let docs = state.store.list(resource).await;

    let body = match query.language() {
        Some(lang) => {
            debug!("Localizing {} {} to {}", docs.len(), resource, lang);
            project_resources(Some(docs.as_slice()), lang.code())
        }
        None => docs.iter().map(Materialize::materialize).collect(),
    };

    Ok(Json(body))
}

async fn get_resource(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Value>, ApiError> {
    let resource: Resource = resource.parse()?;
    let id = parse_id(id)?;
    let doc = state
        .store
        .get(resource, &id)
        .await
        .ok_or_else(|| ApiError::NotFound {
            resource,
            id: id.to_string(),
        })?;

    let body = match query.language() {
        Some(lang) => project_resource(Some(&doc), lang.code())?,
        None => doc.materialize(),
    };

    Ok(Json(body))
}

// ==================== Admin ====================

async fn admin_list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let resource: Resource = resource.parse()?;
    let docs = state.store.list(resource).await;
    Ok(Json(docs.iter().map(Materialize::materialize).collect()))
}

async fn admin_get(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let resource: Resource = resource.parse()?;
    let id = parse_id(id)?;
    let doc = state
        .store
        .get(resource, &id)
        .await
        .ok_or_else(|| ApiError::NotFound {
            resource,
            id: id.to_string(),
        })?;
    Ok(Json(doc.materialize()))
}

async fn admin_create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let resource: Resource = resource.parse()?;
    let doc = state.store.insert(resource, into_object(body)?).await;
    info!("Created {} {}", resource, doc.id);
    Ok((StatusCode::CREATED, Json(doc.materialize())))
}

async fn admin_replace(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let resource: Resource = resource.parse()?;
    let id = parse_id(id)?;
    let doc = state
        .store
        .replace(resource, &id, into_object(body)?)
        .await
        .ok_or_else(|| ApiError::NotFound {
            resource,
            id: id.to_string(),
        })?;
    info!("Replaced {} {}", resource, doc.id);
    Ok(Json(doc.materialize()))
}

async fn admin_delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let resource: Resource = resource.parse()?;
    let id = parse_id(id)?;
    if !state.store.delete(resource, &id).await {
        return Err(ApiError::NotFound {
            resource,
            id: id.to_string(),
        });
    }
    info!("Deleted {} {}", resource, id);
    Ok(StatusCode::NO_CONTENT)
}
