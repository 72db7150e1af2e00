use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::field::FieldValue;
use crate::identity::{ParentRef, ResourceId, ResourceKind, ResourceRef};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Type-specific content of a resource, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResourceBody {
    Cluster(Cluster),
    Node(Node),
}

impl ResourceBody {
    /// Decode a request payload as the body of `kind`.
    ///
    /// Unknown keys (including `id`, `type`, `links`, and
    /// `creationTimestamp` echoed back by clients) are ignored.
    pub fn decode(kind: ResourceKind, value: serde_json::Value) -> Result<Self, TypeError> {
        if !value.is_object() {
            return Err(TypeError::InvalidBody {
                kind: kind.to_string(),
                reason: "expected a JSON object".into(),
            });
        }
        let invalid = |e: serde_json::Error| TypeError::InvalidBody {
            kind: kind.to_string(),
            reason: e.to_string(),
        };
        match kind {
            ResourceKind::Cluster => serde_json::from_value(value).map(Self::Cluster).map_err(invalid),
            ResourceKind::Node => serde_json::from_value(value).map(Self::Node).map_err(invalid),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Cluster(_) => ResourceKind::Cluster,
            Self::Node(_) => ResourceKind::Node,
        }
    }

    /// The name that must be unique among live resources of the same kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Cluster(c) => &c.name,
            Self::Node(n) => &n.name,
        }
    }

    /// Field name to value map, checked against [`ResourceKind::fields`].
    pub fn field_values(&self) -> BTreeMap<&'static str, FieldValue> {
        match self {
            Self::Cluster(Cluster { name }) | Self::Node(Node { name }) => {
                BTreeMap::from([("name", FieldValue::from(name))])
            }
        }
    }
}

impl From<Cluster> for ResourceBody {
    fn from(c: Cluster) -> Self {
        Self::Cluster(c)
    }
}

impl From<Node> for ResourceBody {
    fn from(n: Node) -> Self {
        Self::Node(n)
    }
}

/// Candidate for creation: everything but the id and creation timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewResource {
    pub parent: Option<ParentRef>,
    pub body: ResourceBody,
}

impl NewResource {
    pub fn new(body: impl Into<ResourceBody>) -> Self {
        Self {
            parent: None,
            body: body.into(),
        }
    }

    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.body.kind()
    }
}

/// A stored resource.
///
/// Serializes as `{"id", "creationTimestamp", "type", ...fields}`. The parent
/// reference is not part of the JSON form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    #[serde(skip)]
    pub parent: Option<ParentRef>,
    pub creation_timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub body: ResourceBody,
}

impl Resource {
    /// Stamp a candidate with a fresh id and the current time.
    pub fn from_new(candidate: NewResource) -> Self {
        Self {
            id: ResourceId::generate(),
            parent: candidate.parent,
            creation_timestamp: Utc::now(),
            body: candidate.body,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.body.kind()
    }

    pub fn name(&self) -> &str {
        self.body.name()
    }

    pub fn locator(&self) -> ResourceRef {
        ResourceRef {
            kind: self.kind(),
            parent: self.parent.clone(),
            id: self.id.clone(),
        }
    }
}
