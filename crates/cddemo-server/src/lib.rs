//! HTTP surface for the cddemo resource store.
//!
//! Resource kinds are registered in a [`Schemas`] registry; routes, field
//! validation, and response links are all derived from it. Requests are
//! decoded into typed resources and handed to an injected
//! [`cddemo_store::ResourceStore`]; store errors map onto HTTP statuses via
//! [`ApiError`].

pub mod config;
pub mod error;
pub mod handler;
pub mod response;
pub mod router;
pub mod schema;
pub mod server;
pub mod validate;

pub use config::{parse_listen_addr, ServerConfig};
pub use error::{ApiError, ErrorCode, ServerError, ServerResult};
pub use handler::AppState;
pub use schema::{demo_schemas, ApiVersion, ResourceSchema, Schemas, UrlMethods, UrlScope};
pub use server::DemoServer;
