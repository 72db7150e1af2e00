use std::collections::HashMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use cddemo_types::{FieldDescriptor, ParentRef, ResourceKind};

use crate::error::{ServerError, ServerResult};

/// API group and version; every resource URL lives under
/// `/apis/{group}/{version}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiVersion {
    pub group: String,
    pub version: String,
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self {
            group: "zcloud.example".into(),
            version: "v1".into(),
        }
    }
}

impl ApiVersion {
    pub fn prefix(&self) -> String {
        format!("/apis/{}/{}", self.group, self.version)
    }
}

/// Registration record for one resource kind.
#[derive(Clone, Debug)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    pub parent: Option<ResourceKind>,
    pub fields: &'static [FieldDescriptor],
    pub collection_methods: Vec<Method>,
    pub resource_methods: Vec<Method>,
    pub actions: Vec<String>,
}

impl ResourceSchema {
    /// A schema with the kind's fields and nothing else enabled.
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            parent: None,
            fields: kind.fields(),
            collection_methods: Vec::new(),
            resource_methods: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// Path parameter holding this kind's id, e.g. `node_id`.
    pub fn id_param(&self) -> String {
        id_param(self.kind)
    }

    /// The parent reference carried by a request's path parameters.
    pub fn parent_ref(&self, params: &HashMap<String, String>) -> Option<ParentRef> {
        let kind = self.parent?;
        params
            .get(&id_param(kind))
            .map(|id| ParentRef::new(kind, id.as_str()))
    }
}

fn id_param(kind: ResourceKind) -> String {
    format!("{}_id", kind.as_str())
}

/// Whether a route addresses a kind's collection or one of its resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlScope {
    Collection,
    Resource,
}

/// One route to register: its template and the methods it accepts.
#[derive(Clone, Debug)]
pub struct UrlMethods {
    pub kind: ResourceKind,
    pub scope: UrlScope,
    pub template: String,
    pub methods: Vec<Method>,
}

/// Registry of the resource kinds served under one [`ApiVersion`].
#[derive(Clone, Debug)]
pub struct Schemas {
    version: ApiVersion,
    schemas: Vec<ResourceSchema>,
}

impl Schemas {
    pub fn new(version: ApiVersion) -> Self {
        Self {
            version,
            schemas: Vec::new(),
        }
    }

    pub fn version(&self) -> &ApiVersion {
        &self.version
    }

    /// Register `kind`, letting `customize` set methods, parent, and actions.
    ///
    /// The declared parent must match the kind's own parent relation and be
    /// registered already; each kind may be registered once.
    pub fn import(
        &mut self,
        kind: ResourceKind,
        customize: impl FnOnce(&mut ResourceSchema),
    ) -> ServerResult<()> {
        if self.get(kind).is_some() {
            return Err(ServerError::Schema(format!("duplicate schema {kind}")));
        }

        let mut schema = ResourceSchema::new(kind);
        customize(&mut schema);

        if schema.parent != kind.parent() {
            return Err(ServerError::Schema(format!(
                "schema {kind} declares parent {:?}, resource model says {:?}",
                schema.parent,
                kind.parent()
            )));
        }
        if let Some(parent) = schema.parent {
            if self.get(parent).is_none() {
                return Err(ServerError::Schema(format!(
                    "schema {kind} registered before its parent {parent}"
                )));
            }
        }

        tracing::debug!(kind = %kind, "registered schema");
        self.schemas.push(schema);
        Ok(())
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&ResourceSchema> {
        self.schemas.iter().find(|s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.schemas.iter()
    }

    pub fn children(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceSchema> {
        self.schemas.iter().filter(move |s| s.parent == Some(kind))
    }

    /// Route template of a kind's collection, e.g.
    /// `/apis/zcloud.example/v1/clusters/:cluster_id/nodes`.
    pub fn collection_template(&self, kind: ResourceKind) -> String {
        let mut segments = Vec::new();
        let mut current = self.get(kind).and_then(|s| s.parent);
        while let Some(parent) = current {
            segments.push(format!("/{}/:{}", parent.plural(), id_param(parent)));
            current = self.get(parent).and_then(|s| s.parent);
        }
        segments.reverse();
        format!("{}{}/{}", self.version.prefix(), segments.concat(), kind.plural())
    }

    /// Route template of a single resource: the collection plus
    /// `/:{kind}_id`. Id parameters are named after their kind so nested
    /// routes never bind two names at one path position.
    pub fn resource_template(&self, kind: ResourceKind) -> String {
        format!("{}/:{}", self.collection_template(kind), id_param(kind))
    }

    pub fn collection_url(&self, kind: ResourceKind, params: &HashMap<String, String>) -> String {
        fill(&self.collection_template(kind), params)
    }

    pub fn resource_url(&self, kind: ResourceKind, params: &HashMap<String, String>) -> String {
        fill(&self.resource_template(kind), params)
    }

    /// Every registered URL template with the methods it accepts. A kind
    /// with actions also accepts `POST` on its resource URL.
    pub fn url_methods(&self) -> Vec<UrlMethods> {
        self.schemas
            .iter()
            .flat_map(|s| {
                let mut resource_methods = s.resource_methods.clone();
                if !s.actions.is_empty() && !resource_methods.contains(&Method::POST) {
                    resource_methods.push(Method::POST);
                }
                [
                    UrlMethods {
                        kind: s.kind,
                        scope: UrlScope::Collection,
                        template: self.collection_template(s.kind),
                        methods: s.collection_methods.clone(),
                    },
                    UrlMethods {
                        kind: s.kind,
                        scope: UrlScope::Resource,
                        template: self.resource_template(s.kind),
                        methods: resource_methods,
                    },
                ]
            })
            .collect()
    }
}

/// Substitute `:name` segments of a route template from `params`. Segments
/// with no matching parameter are left as-is.
fn fill(template: &str, params: &HashMap<String, String>) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params.get(name).map(String::as_str).unwrap_or(segment),
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The demo registration: clusters at the top level, nodes nested under
/// clusters, both with the usual CRUD methods and an `echo` action.
pub fn demo_schemas(version: ApiVersion) -> ServerResult<Schemas> {
    let mut schemas = Schemas::new(version);
    schemas.import(ResourceKind::Cluster, |schema| {
        schema.collection_methods = vec![Method::GET, Method::POST];
        schema.resource_methods = vec![Method::GET, Method::PUT, Method::DELETE];
        schema.actions = vec!["echo".into()];
    })?;
    schemas.import(ResourceKind::Node, |schema| {
        schema.parent = Some(ResourceKind::Cluster);
        schema.collection_methods = vec![Method::GET, Method::POST];
        schema.resource_methods = vec![Method::GET, Method::PUT, Method::DELETE];
        schema.actions = vec!["echo".into()];
    })?;
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn demo_templates() {
        let schemas = demo_schemas(ApiVersion::default()).unwrap();
        assert_eq!(
            schemas.collection_template(ResourceKind::Cluster),
            "/apis/zcloud.example/v1/clusters"
        );
        assert_eq!(
            schemas.resource_template(ResourceKind::Node),
            "/apis/zcloud.example/v1/clusters/:cluster_id/nodes/:node_id"
        );
    }

    #[test]
    fn urls_fill_parameters() {
        let schemas = demo_schemas(ApiVersion::default()).unwrap();
        let p = params(&[("cluster_id", "c1"), ("node_id", "n1")]);
        assert_eq!(
            schemas.resource_url(ResourceKind::Node, &p),
            "/apis/zcloud.example/v1/clusters/c1/nodes/n1"
        );
        assert_eq!(
            schemas.collection_url(ResourceKind::Node, &p),
            "/apis/zcloud.example/v1/clusters/c1/nodes"
        );
    }

    #[test]
    fn parent_ref_from_params() {
        let schemas = demo_schemas(ApiVersion::default()).unwrap();
        let node = schemas.get(ResourceKind::Node).unwrap();
        assert_eq!(node.id_param(), "node_id");
        assert_eq!(
            node.parent_ref(&params(&[("cluster_id", "c1")])),
            Some(ParentRef::new(ResourceKind::Cluster, "c1"))
        );
        let cluster = schemas.get(ResourceKind::Cluster).unwrap();
        assert_eq!(cluster.parent_ref(&params(&[("cluster_id", "c1")])), None);
    }

    #[test]
    fn children_of_cluster() {
        let schemas = demo_schemas(ApiVersion::default()).unwrap();
        let kinds: Vec<_> = schemas.children(ResourceKind::Cluster).map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Node]);
        assert_eq!(schemas.children(ResourceKind::Node).count(), 0);
    }

    #[test]
    fn import_rejects_duplicates() {
        let mut schemas = Schemas::new(ApiVersion::default());
        schemas.import(ResourceKind::Cluster, |_| {}).unwrap();
        assert!(matches!(
            schemas.import(ResourceKind::Cluster, |_| {}),
            Err(ServerError::Schema(_))
        ));
    }

    #[test]
    fn import_rejects_child_before_parent() {
        let mut schemas = Schemas::new(ApiVersion::default());
        let err = schemas
            .import(ResourceKind::Node, |s| s.parent = Some(ResourceKind::Cluster))
            .unwrap_err();
        assert!(err.to_string().contains("before its parent"));
    }

    #[test]
    fn import_rejects_parent_mismatch() {
        let mut schemas = Schemas::new(ApiVersion::default());
        schemas.import(ResourceKind::Cluster, |_| {}).unwrap();
        assert!(schemas.import(ResourceKind::Node, |_| {}).is_err());
    }

    #[test]
    fn url_methods_include_action_post() {
        let schemas = demo_schemas(ApiVersion::default()).unwrap();
        let urls = schemas.url_methods();
        assert_eq!(urls.len(), 4);

        let cluster_resource = &urls[1];
        assert_eq!(cluster_resource.kind, ResourceKind::Cluster);
        assert_eq!(cluster_resource.scope, UrlScope::Resource);
        assert_eq!(cluster_resource.template, "/apis/zcloud.example/v1/clusters/:cluster_id");
        assert!(cluster_resource.methods.contains(&Method::POST));
        assert!(cluster_resource.methods.contains(&Method::DELETE));

        let node_collection = &urls[2];
        assert_eq!(node_collection.scope, UrlScope::Collection);
        assert_eq!(node_collection.methods, vec![Method::GET, Method::POST]);
    }

    #[test]
    fn url_methods_without_actions_leave_resource_post_out() {
        let mut schemas = Schemas::new(ApiVersion::default());
        schemas
            .import(ResourceKind::Cluster, |s| s.resource_methods = vec![Method::GET])
            .unwrap();
        let urls = schemas.url_methods();
        assert_eq!(urls[1].methods, vec![Method::GET]);
    }

    #[test]
    fn custom_version_prefix() {
        let version = ApiVersion {
            group: "acme.io".into(),
            version: "v2".into(),
        };
        assert_eq!(version.prefix(), "/apis/acme.io/v2");
    }
}
