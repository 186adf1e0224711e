//! Upload storage for filedrop.
//!
//! This module handles the physical side of an upload:
//! - Upload directory setup
//! - Filename sanitization (path components stripped, unsafe characters replaced)
//! - Collision-resistant storage name generation
//! - File persistence and the JSON metadata sidecar

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FiledropError, Result};

/// Metadata recorded alongside each stored file in `<stored name>.meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// Name the file was stored under.
    pub saved_as: String,
    /// Client-supplied original filename, recorded verbatim.
    pub original_name: String,
    /// Size of the stored content in bytes.
    pub size_bytes: u64,
    /// Upload time, ISO-8601 with offset.
    pub uploaded_at: String,
    /// Uploader network address, when the transport provides one.
    pub uploader_ip: Option<String>,
}

/// Storage service for uploaded files.
///
/// Files are stored flat in a single directory:
/// ```text
/// {dir}/
/// ├── 20250114_093012_a1b2c3d4_report.pdf
/// ├── 20250114_093012_a1b2c3d4_report.pdf.meta.json
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Directory uploads are written to.
    dir: PathBuf,
}

impl UploadStorage {
    /// Create a new UploadStorage rooted at the given directory.
    ///
    /// The directory (and any missing parents) is created if it doesn't
    /// exist. Safe to call against an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o755))?;
        }

        Ok(Self { dir })
    }

    /// Get the upload directory of this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reduce a client-supplied filename to a safe base name.
    ///
    /// Path components are stripped (both `/` and `\` separators) and every
    /// character outside `[A-Za-z0-9._-]` is replaced with `_`, so crafted
    /// names cannot escape the upload directory. An empty result falls back
    /// to `file`.
    pub fn sanitize_filename(name: &str) -> String {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

        let sanitized: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if sanitized.is_empty() {
            "file".to_string()
        } else {
            sanitized
        }
    }

    /// Generate a collision-resistant storage name for an upload.
    ///
    /// Format: `YYYYMMDD_HHMMSS_{8 hex chars}_{sanitized name}`. The random
    /// segment keeps two uploads of the same name within the same second
    /// from overwriting each other.
    pub fn generate_stored_name(original_name: &str) -> String {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let unique = Uuid::new_v4().simple().to_string();
        let sanitized = Self::sanitize_filename(original_name);

        format!("{stamp}_{}_{sanitized}", &unique[..8])
    }

    /// Persist uploaded content under a freshly generated storage name.
    ///
    /// # Returns
    ///
    /// The storage name the content was written under.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let stored_name = Self::generate_stored_name(original_name);
        fs::write(self.file_path(&stored_name), content)?;

        Ok(stored_name)
    }

    /// Write the metadata sidecar for a stored file.
    ///
    /// The sidecar is named `<stored name>.meta.json` and lives in the same
    /// directory as the stored file.
    pub fn write_metadata(&self, meta: &UploadMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(meta)?;
        fs::write(self.metadata_path(&meta.saved_as), json)?;

        Ok(())
    }

    /// Load stored content.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.file_path(stored_name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FiledropError::NotFound(format!("File: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a stored file exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.file_path(stored_name).exists()
    }

    /// Get the full path of a stored file.
    pub fn file_path(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }

    /// Get the full path of a stored file's metadata sidecar.
    pub fn metadata_path(&self, stored_name: &str) -> PathBuf {
        self.dir.join(format!("{stored_name}.meta.json"))
    }
}
