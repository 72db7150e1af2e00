//! In-memory resource store for the cddemo REST server.
//!
//! The store is the sole owner of the id-to-resource mapping and the arbiter
//! of the three integrity rules the API promises:
//!
//! 1. Names are unique among live resources of the same kind.
//! 2. A child resource is created only under a live parent.
//! 3. A parent is deleted only once it has no live children.
//!
//! Contents last as long as the process. All backends implement the
//! [`ResourceStore`] trait; [`InMemoryResourceStore`] is the only one.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryResourceStore;
pub use traits::ResourceStore;
