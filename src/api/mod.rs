//! HTTP API layer for Guardrail Core.
//!
//! Exposes the guarded chat endpoint and a liveness check.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
