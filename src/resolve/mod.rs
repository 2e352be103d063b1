//! The three pipeline stages.
//!
//! Each stage is a plain async component over the provider seam; spawning,
//! budgets and cancellation are layered on top by
//! [`ResolutionClient`](crate::ResolutionClient).

mod direct;
mod routes;
mod streams;

pub use direct::DirectLinkResolver;
pub use routes::RouteResolver;
pub use streams::StreamResolver;
