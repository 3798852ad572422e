//! Request desk backend library modules.
//!
//! The domain core lives in [`domain`]; [`api`] is the inbound HTTP
//! adapter and [`outbound`] holds the driven-port adapters.

pub mod api;
pub mod doc;
pub mod domain;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
