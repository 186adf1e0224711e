//! Request handlers for the filedrop Web API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::Local;

use crate::storage::{UploadMetadata, UploadStorage};
use crate::web::auth::{AuthError, Authorizer};
use crate::web::dto::UploadResponse;
use crate::web::error::ApiError;

/// Shared application state handed to every handler.
pub struct AppState {
    /// Physical upload storage.
    pub storage: UploadStorage,
    /// Maximum accepted file size in bytes.
    pub max_upload_bytes: u64,
    /// Authorization check applied to upload requests.
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        storage: UploadStorage,
        max_upload_bytes: u64,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            storage,
            max_upload_bytes,
            authorizer,
        }
    }
}

/// POST /upload - Accept a single file upload.
///
/// Request body: multipart/form-data with a part named "file". The pipeline
/// is linear: authorize, read the part, check size, persist, write the
/// metadata sidecar, respond. Every failure is terminal and produces one
/// JSON error response.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // Authorization check (no-op unless a token is configured)
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state.authorizer.authorize(auth_header).map_err(|e| match e {
        AuthError::MissingHeader => ApiError::unauthorized("Authorization header missing"),
        AuthError::InvalidToken => ApiError::forbidden("Invalid token"),
    })?;

    // Extract the "file" part; other parts are ignored
    let mut original_name: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::internal(format!("Upload error code: {}", e.status().as_u16()))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        original_name = field.file_name().map(|s| s.to_string());
        content = Some(
            field
                .bytes()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read file content: {}", e);
                    ApiError::internal(format!("Upload error code: {}", e.status().as_u16()))
                })?
                .to_vec(),
        );
    }

    let content = content
        .ok_or_else(|| ApiError::bad_request("No file uploaded (field \"file\" missing)"))?;
    let original_name = original_name.unwrap_or_else(|| "file".to_string());

    // Size ceiling
    if content.len() as u64 > state.max_upload_bytes {
        return Err(ApiError::payload_too_large("File too large"));
    }

    // Persist under a collision-resistant storage name
    let stored_name = state.storage.save(&content, &original_name).map_err(|e| {
        tracing::error!("Failed to persist upload: {}", e);
        ApiError::internal("Failed to move uploaded file")
    })?;

    // Metadata sidecar is best-effort: a failure here is logged but must
    // not fail a request whose file write already happened
    let meta = UploadMetadata {
        saved_as: stored_name.clone(),
        original_name: original_name.clone(),
        size_bytes: content.len() as u64,
        uploaded_at: Local::now().to_rfc3339(),
        uploader_ip: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
    };

    if let Err(e) = state.storage.write_metadata(&meta) {
        tracing::warn!(file = %stored_name, "Failed to write metadata sidecar: {}", e);
    }

    tracing::info!(
        file = %stored_name,
        original = %original_name,
        size = content.len(),
        "File uploaded"
    );

    Ok(Json(UploadResponse {
        ok: true,
        file: stored_name,
    }))
}
