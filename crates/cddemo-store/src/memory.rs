use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cddemo_types::{
    NewResource, ParentRef, Resource, ResourceBody, ResourceId, ResourceKind, ResourceRef,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::ResourceStore;

struct Entry {
    seq: u64,
    resource: Resource,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    objects: HashMap<ResourceId, Entry>,
    // (kind, name) -> id of the live resource holding that name.
    names: HashMap<(ResourceKind, String), ResourceId>,
}

impl Inner {
    fn has_parent(&self, parent: &ParentRef) -> bool {
        self.objects
            .get(&parent.id)
            .is_some_and(|e| e.resource.kind() == parent.kind)
    }

    fn has_child(&self, id: &ResourceId) -> bool {
        self.objects
            .values()
            .any(|e| e.resource.parent.as_ref().is_some_and(|p| &p.id == id))
    }

    fn name_holder(&self, kind: ResourceKind, name: &str) -> Option<&ResourceId> {
        self.names.get(&(kind, name.to_owned()))
    }

    fn check_parent(&self, target: &ResourceRef) -> StoreResult<()> {
        match &target.parent {
            Some(parent) if !self.has_parent(parent) => {
                Err(StoreError::NotFound(format!("{parent} is non-exists")))
            }
            _ => Ok(()),
        }
    }

    /// Resolve `target`: the parent (if addressed) must exist, then the id.
    fn locate(&self, target: &ResourceRef) -> StoreResult<&Entry> {
        self.check_parent(target)?;
        self.objects.get(&target.id).ok_or_else(|| not_found(target))
    }
}

fn not_found(target: &ResourceRef) -> StoreError {
    StoreError::NotFound(format!("{} {} is non-exists", target.kind, target.id))
}

/// In-memory, HashMap-based resource store.
///
/// State lives for the lifetime of the process. A single `RwLock` guards the
/// map and every operation holds it for its full duration, so uniqueness
/// scans and child checks cannot race with the insert or remove that
/// follows them.
pub struct InMemoryResourceStore {
    inner: RwLock<Inner>,
}

impl InMemoryResourceStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of live resources of all kinds.
    pub fn len(&self) -> usize {
        self.read().objects.len()
    }

    /// Returns `true` if the store holds no resources.
    pub fn is_empty(&self) -> bool {
        self.read().objects.is_empty()
    }

    // A panic while holding the lock cannot leave a half-applied mutation
    // behind (checks precede every write), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn create(&self, candidate: NewResource) -> StoreResult<Resource> {
        let kind = candidate.kind();
        let mut inner = self.write();

        let parent = match kind.parent() {
            Some(parent_kind) => match candidate.parent {
                Some(p) if p.kind == parent_kind && inner.has_parent(&p) => Some(p),
                Some(p) => {
                    return Err(StoreError::NotFound(format!(
                        "{parent_kind} {} is non-exists",
                        p.id
                    )))
                }
                None => {
                    return Err(StoreError::NotFound(format!(
                        "{kind} must be created under a {parent_kind}"
                    )))
                }
            },
            None => None,
        };

        if inner.name_holder(kind, candidate.body.name()).is_some() {
            return Err(StoreError::DuplicateResource(format!(
                "{kind} {} already exists",
                candidate.body.name()
            )));
        }

        let resource = Resource::from_new(NewResource {
            parent,
            body: candidate.body,
        });
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .names
            .insert((kind, resource.name().to_owned()), resource.id.clone());
        inner.objects.insert(
            resource.id.clone(),
            Entry {
                seq,
                resource: resource.clone(),
            },
        );
        tracing::debug!(kind = %kind, id = %resource.id, name = resource.name(), "created resource");
        Ok(resource)
    }

    fn get(&self, target: &ResourceRef) -> StoreResult<Resource> {
        let inner = self.read();
        inner.locate(target).map(|e| e.resource.clone())
    }

    fn list(&self, kind: ResourceKind, parent: Option<&ParentRef>) -> Vec<Resource> {
        let inner = self.read();
        if let Some(parent) = parent {
            if !inner.has_parent(parent) {
                return Vec::new();
            }
        }

        let mut entries: Vec<&Entry> = inner
            .objects
            .values()
            .filter(|e| e.resource.kind() == kind)
            .collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.resource.clone()).collect()
    }

    fn update(&self, target: &ResourceRef, body: ResourceBody) -> StoreResult<Resource> {
        let mut inner = self.write();
        inner.check_parent(target)?;

        let Inner { objects, names, .. } = &mut *inner;
        let entry = objects.get_mut(&target.id).ok_or_else(|| not_found(target))?;
        let kind = entry.resource.kind();
        if body.kind() != kind {
            return Err(StoreError::NotFound(format!(
                "{} {} is non-exists",
                body.kind(),
                target.id
            )));
        }
        let new_key = (kind, body.name().to_owned());
        if names.get(&new_key).is_some_and(|holder| holder != &target.id) {
            return Err(StoreError::DuplicateResource(format!(
                "{kind} {} already exists",
                body.name()
            )));
        }

        names.remove(&(kind, entry.resource.name().to_owned()));
        names.insert(new_key, target.id.clone());
        entry.resource.body = body;
        tracing::debug!(kind = %kind, id = %target.id, "updated resource");
        Ok(entry.resource.clone())
    }

    fn delete(&self, target: &ResourceRef) -> StoreResult<()> {
        let mut inner = self.write();
        let name_key = {
            let entry = inner.locate(target)?;
            (entry.resource.kind(), entry.resource.name().to_owned())
        };

        if inner.has_child(&target.id) {
            return Err(StoreError::DeleteParent(
                "resource has child resource".into(),
            ));
        }

        inner.objects.remove(&target.id);
        inner.names.remove(&name_key);
        tracing::debug!(kind = %name_key.0, id = %target.id, "deleted resource");
        Ok(())
    }

    fn action(
        &self,
        target: &ResourceRef,
        action: &str,
        params: serde_json::Value,
    ) -> StoreResult<serde_json::Value> {
        let inner = self.read();
        inner.locate(target)?;
        tracing::debug!(kind = %target.kind, id = %target.id, action, "action");
        Ok(params)
    }
}

impl std::fmt::Debug for InMemoryResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryResourceStore")
            .field("object_count", &count)
            .finish()
    }
}
