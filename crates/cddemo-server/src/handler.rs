use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use cddemo_store::ResourceStore;
use cddemo_types::{NewResource, ResourceBody, ResourceKind, ResourceRef};

use crate::error::{ApiError, ErrorCode};
use crate::response::{Collection, ResourceResponse};
use crate::schema::{ResourceSchema, Schemas};
use crate::validate::{check_object_fields, Operation};

/// Shared state handed to every handler: the injected store and the
/// schema registry the routes were derived from.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
    pub schemas: Arc<Schemas>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>, schemas: Schemas) -> Self {
        Self {
            store,
            schemas: Arc::new(schemas),
        }
    }

    fn schema(&self, kind: ResourceKind) -> Result<&ResourceSchema, ApiError> {
        self.schemas
            .get(kind)
            .ok_or_else(|| ApiError::not_found(format!("no found resource type {kind}")))
    }
}

pub type Params = HashMap<String, String>;

fn target(schema: &ResourceSchema, params: &Params) -> Result<ResourceRef, ApiError> {
    let id = params
        .get(&schema.id_param())
        .ok_or_else(|| ApiError::not_found(format!("no {} id in path", schema.kind)))?;
    let mut target = ResourceRef::new(schema.kind, id.as_str());
    target.parent = schema.parent_ref(params);
    Ok(target)
}

fn decode_body(kind: ResourceKind, body: &Bytes) -> Result<ResourceBody, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::new(ErrorCode::InvalidBodyContent, format!("invalid request body: {e}"))
    })?;
    Ok(ResourceBody::decode(kind, value)?)
}

/// `GET` on a collection.
pub async fn list(state: AppState, kind: ResourceKind, params: Params) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    let parent = schema.parent_ref(&params);
    let resources = state.store.list(kind, parent.as_ref());
    let collection = Collection::new(&state.schemas, schema, &params, resources);
    Ok(Json(collection).into_response())
}

/// `POST` on a collection.
pub async fn create(
    state: AppState,
    kind: ResourceKind,
    params: Params,
    body: Bytes,
) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    let body = decode_body(kind, &body)?;
    check_object_fields(schema, &body, Operation::Create)?;

    let mut candidate = NewResource::new(body);
    candidate.parent = schema.parent_ref(&params);
    let resource = state.store.create(candidate)?;
    let response = ResourceResponse::new(&state.schemas, schema, &params, resource);
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// `GET` on a resource.
pub async fn get(state: AppState, kind: ResourceKind, params: Params) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    let resource = state.store.get(&target(schema, &params)?)?;
    let response = ResourceResponse::new(&state.schemas, schema, &params, resource);
    Ok(Json(response).into_response())
}

/// `PUT` on a resource.
pub async fn update(
    state: AppState,
    kind: ResourceKind,
    params: Params,
    body: Bytes,
) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    let target = target(schema, &params)?;
    let body = decode_body(kind, &body)?;
    check_object_fields(schema, &body, Operation::Update)?;

    let resource = state.store.update(&target, body)?;
    let response = ResourceResponse::new(&state.schemas, schema, &params, resource);
    Ok(Json(response).into_response())
}

/// `DELETE` on a resource.
pub async fn delete(state: AppState, kind: ResourceKind, params: Params) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    state.store.delete(&target(schema, &params)?)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `POST ...?action=<name>` on a resource. The body is the action input; an
/// empty body means no input.
pub async fn action(
    state: AppState,
    kind: ResourceKind,
    params: Params,
    query: Params,
    body: Bytes,
) -> Result<Response, ApiError> {
    let schema = state.schema(kind)?;
    let name = query
        .get("action")
        .ok_or_else(|| ApiError::new(ErrorCode::InvalidFormat, "action is required"))?;
    if !schema.has_action(name) {
        return Err(ApiError::not_found(format!("no found action {name} on {kind}")));
    }

    let input = if body.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(ErrorCode::InvalidBodyContent, format!("invalid action input: {e}"))
        })?
    };
    let output = state.store.action(&target(schema, &params)?, name, input)?;
    Ok(Json(output).into_response())
}

/// Answer for any method a route was not registered with.
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(ErrorCode::MethodNotAllow, "method not allowed")
}

/// Answer for any path no schema produced.
pub async fn unknown_resource_type(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("no found resource type for {}", uri.path()))
}

/// Health check response.
#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler: server version and the served resource types.
pub async fn info_handler(state: AppState) -> Json<serde_json::Value> {
    let version = state.schemas.version();
    let types: Vec<_> = state
        .schemas
        .iter()
        .map(|s| {
            json!({
                "type": s.kind,
                "parent": s.parent,
                "collection": state.schemas.collection_template(s.kind),
            })
        })
        .collect();
    Json(json!({
        "name": "cddemo",
        "version": env!("CARGO_PKG_VERSION"),
        "group": version.group,
        "apiVersion": version.version,
        "resourceTypes": types,
    }))
}
