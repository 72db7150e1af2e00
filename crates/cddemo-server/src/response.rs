use std::collections::{BTreeMap, HashMap};

use axum::http::Method;
use serde::Serialize;

use cddemo_types::{Resource, ResourceKind};

use crate::schema::{ResourceSchema, Schemas};

pub type Links = BTreeMap<String, String>;

/// A resource as returned to clients: its JSON form plus navigation links.
#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    #[serde(flatten)]
    pub resource: Resource,
    pub links: Links,
}

impl ResourceResponse {
    /// `params` are the path parameters of the request the resource was
    /// reached through; the resource's own id is filled in here.
    pub fn new(
        schemas: &Schemas,
        schema: &ResourceSchema,
        params: &HashMap<String, String>,
        resource: Resource,
    ) -> Self {
        let links = resource_links(schemas, schema, params, resource.id.as_str());
        Self { resource, links }
    }
}

fn resource_links(
    schemas: &Schemas,
    schema: &ResourceSchema,
    params: &HashMap<String, String>,
    id: &str,
) -> Links {
    let mut params = params.clone();
    params.insert(schema.id_param(), id.into());

    let self_url = schemas.resource_url(schema.kind, &params);
    let mut links = Links::new();
    links.insert("collection".into(), schemas.collection_url(schema.kind, &params));
    if schema.resource_methods.contains(&Method::PUT) {
        links.insert("update".into(), self_url.clone());
    }
    if schema.resource_methods.contains(&Method::DELETE) {
        links.insert("remove".into(), self_url.clone());
    }
    if let Some(parent) = schema.parent {
        links.insert("parent".into(), schemas.resource_url(parent, &params));
    }
    for child in schemas.children(schema.kind) {
        links.insert(
            child.kind.plural().into(),
            format!("{self_url}/{}", child.kind.plural()),
        );
    }
    links.insert("self".into(), self_url);
    links
}

/// `{"type":"collection","resourceType":..,"links":{"self":..},"data":[..]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub resource_type: ResourceKind,
    pub links: Links,
    pub data: Vec<ResourceResponse>,
}

impl Collection {
    pub fn new(
        schemas: &Schemas,
        schema: &ResourceSchema,
        params: &HashMap<String, String>,
        resources: Vec<Resource>,
    ) -> Self {
        let links = Links::from([(
            "self".to_string(),
            schemas.collection_url(schema.kind, params),
        )]);
        let data = resources
            .into_iter()
            .map(|r| ResourceResponse::new(schemas, schema, params, r))
            .collect();
        Self {
            kind: "collection",
            resource_type: schema.kind,
            links,
            data,
        }
    }
}
