//! Core handler infrastructure: context, reply middleware and the registry.

pub mod context;
pub mod middleware;
pub mod registry;

pub use context::{Context, Handler};
pub use middleware::ResponseMiddleware;
pub use registry::{Registry, RegistryError};
