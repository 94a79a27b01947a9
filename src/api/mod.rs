//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into resolver and link service calls
//! and formats their results.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and tracing middleware
//! - [`routes`] - Management route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
