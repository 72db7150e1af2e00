//! Resource model for the cddemo REST server.
//!
//! Defines what an addressable resource looks like: an opaque id, a kind
//! tag, an optional parent reference, and a type-specific body. Every other
//! cddemo crate depends on `cddemo-types`.
//!
//! # Key Types
//!
//! - [`ResourceKind`] — closed set of kinds (`cluster`, `node`) with their parent relation
//! - [`ResourceId`] — process-unique identifier assigned at creation
//! - [`ParentRef`] — child-to-owner reference used for referential integrity
//! - [`Resource`] — a stored resource; [`NewResource`] — a creation candidate
//! - [`FieldDescriptor`] — per-kind field list driving request validation

pub mod error;
pub mod field;
pub mod identity;
pub mod resource;

pub use error::TypeError;
pub use field::{FieldDescriptor, FieldKind, FieldValue};
pub use identity::{ParentRef, ResourceId, ResourceKind, ResourceRef};
pub use resource::{Cluster, NewResource, Node, Resource, ResourceBody};
