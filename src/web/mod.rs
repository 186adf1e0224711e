//! Web API module for filedrop.
//!
//! Provides the HTTP surface: a single multipart upload endpoint plus a
//! health check, with JSON responses throughout.

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
