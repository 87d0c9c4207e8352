//! Tubely API server library.
//!
//! Axum HTTP surface over the ingestion pipeline: authentication,
//! handlers, routing, and error mapping. The binary entry point lives in
//! `main.rs`; everything here is exported so integration tests can build
//! the router with fake collaborators.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
