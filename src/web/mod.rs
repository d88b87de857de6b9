//! HTTP API over the Sedna client.

pub mod error;
pub mod hierarchy;
pub mod middleware;
pub mod routes;
pub mod schedule;
pub mod status;

pub use routes::*;
