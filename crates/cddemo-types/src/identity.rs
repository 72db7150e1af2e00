use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::field::{FieldDescriptor, FieldKind};

/// Opaque, process-unique resource identifier.
///
/// Generated once at creation time as a UUID v7 string, so identifiers
/// sort in creation order. Immutable afterwards.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const NAMED_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("name", FieldKind::String, true)];

/// The closed set of resource kinds served by the demo.
///
/// Each kind carries its type tag, collection segment, declared parent, and
/// field descriptors. Store logic only ever goes through these accessors, so
/// a new kind is a new variant plus its match arms here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cluster,
    Node,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Cluster, ResourceKind::Node];

    /// The type tag, e.g. `"cluster"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Node => "node",
        }
    }

    /// The collection path segment, e.g. `"clusters"`.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Cluster => "clusters",
            Self::Node => "nodes",
        }
    }

    /// The kind a resource of this kind must be nested under, if any.
    pub fn parent(&self) -> Option<ResourceKind> {
        match self {
            Self::Cluster => None,
            Self::Node => Some(Self::Cluster),
        }
    }

    /// Field descriptors used by request validation.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            Self::Cluster | Self::Node => NAMED_FIELDS,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = TypeError;

    /// Accepts either the type tag or the collection segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.plural() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_owned()))
    }
}

/// Reference from a child resource to its owning resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub kind: ResourceKind,
    pub id: ResourceId,
}

impl ParentRef {
    pub fn new(kind: ResourceKind, id: impl Into<ResourceId>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Locates an existing resource: its kind, id, and the parent it was
/// addressed under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub parent: Option<ParentRef>,
    pub id: ResourceId,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<ResourceId>) -> Self {
        Self {
            kind,
            parent: None,
            id: id.into(),
        }
    }

    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = ResourceId::generate();
        let b = ResourceId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn kind_parses_tag_and_plural() {
        assert_eq!("cluster".parse::<ResourceKind>().unwrap(), ResourceKind::Cluster);
        assert_eq!("nodes".parse::<ResourceKind>().unwrap(), ResourceKind::Node);
        assert_eq!(
            "pods".parse::<ResourceKind>(),
            Err(TypeError::UnknownKind("pods".into()))
        );
    }

    #[test]
    fn node_is_nested_under_cluster() {
        assert_eq!(ResourceKind::Node.parent(), Some(ResourceKind::Cluster));
        assert_eq!(ResourceKind::Cluster.parent(), None);
    }

    #[test]
    fn name_is_required_for_every_kind() {
        for kind in ResourceKind::ALL {
            let name = kind.fields().iter().find(|f| f.name == "name").unwrap();
            assert!(name.required);
            assert_eq!(name.kind, FieldKind::String);
        }
    }

    #[test]
    fn resource_ref_builder() {
        let r = ResourceRef::new(ResourceKind::Node, "n1")
            .with_parent(ParentRef::new(ResourceKind::Cluster, "c1"));
        assert_eq!(r.id.as_str(), "n1");
        assert_eq!(r.parent.unwrap().to_string(), "cluster c1");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ResourceId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
