//! filedrop - Small HTTP file upload service.
//!
//! Accepts a single file via a multipart/form-data POST, stores it under a
//! local directory with a collision-resistant name, and writes a JSON
//! metadata sidecar next to the stored file.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{FiledropError, Result};
pub use storage::{UploadMetadata, UploadStorage};
pub use web::WebServer;
