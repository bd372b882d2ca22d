//! API route definitions.
//!
//! This module organizes all HTTP routes for the todos API server. Paths
//! here are relative; the router mounts them under `/api`.

mod debug;
mod health;
mod todos;

pub use debug::debug_routes;
pub use health::health_routes;
pub use todos::todos_routes;
