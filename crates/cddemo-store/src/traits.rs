use cddemo_types::{NewResource, ParentRef, Resource, ResourceBody, ResourceKind, ResourceRef};

use crate::error::StoreResult;

/// CRUD store for hierarchical resources.
///
/// All implementations must satisfy these invariants:
/// - Ids are unique across the whole store, regardless of kind.
/// - Names are unique among live resources of the same kind.
/// - A resource whose kind declares a parent exists only under a live parent.
/// - A resource with live children cannot be deleted.
/// - Each operation is atomic: checks and the mutation happen under one
///   critical section, and a failed operation mutates nothing.
pub trait ResourceStore: Send + Sync {
    /// Assign an id and creation timestamp to `candidate` and store it.
    fn create(&self, candidate: NewResource) -> StoreResult<Resource>;

    /// Fetch the resource addressed by `target`. An addressed parent must be
    /// live; the resource itself is resolved by id.
    fn get(&self, target: &ResourceRef) -> StoreResult<Resource>;

    /// All live resources of `kind`, in creation order. When `parent` is
    /// given it must be live; a missing parent yields an empty list, not an
    /// error.
    fn list(&self, kind: ResourceKind, parent: Option<&ParentRef>) -> Vec<Resource>;

    /// Replace the body of an existing resource. Id, parent, and creation
    /// timestamp are preserved.
    fn update(&self, target: &ResourceRef, body: ResourceBody) -> StoreResult<Resource>;

    /// Remove a resource that has no live children.
    fn delete(&self, target: &ResourceRef) -> StoreResult<()>;

    /// Run a named action against an existing resource.
    fn action(
        &self,
        target: &ResourceRef,
        action: &str,
        params: serde_json::Value,
    ) -> StoreResult<serde_json::Value>;
}
