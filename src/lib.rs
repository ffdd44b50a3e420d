//! Song recommendations from a generative text provider.
//!
//! The provider is asked for a JSON payload; when it answers with prose instead, records
//! are recovered heuristically. Every record leaving the pipeline is fully populated.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
