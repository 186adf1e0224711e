//! Response bodies for the Web API.

use serde::{Deserialize, Serialize};

/// Successful upload response: `{"ok": true, "file": "<stored name>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// Name the file was stored under.
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_shape() {
        let resp = UploadResponse {
            ok: true,
            file: "20250114_093012_a1b2c3d4_report.pdf".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            json,
            r#"{"ok":true,"file":"20250114_093012_a1b2c3d4_report.pdf"}"#
        );
    }
}
