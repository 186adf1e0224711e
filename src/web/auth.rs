//! Request authorization for uploads.
//!
//! Authorization is a pluggable capability: the upload handler hands the raw
//! `Authorization` header value to an [`Authorizer`] and maps the outcome to
//! an HTTP response. The default is no authorization at all; deployments
//! that configure an upload token get a static token check instead.

use std::sync::Arc;

/// Reason an authorization check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    MissingHeader,
    /// The supplied token did not match the expected one.
    InvalidToken,
}

/// An authorization check applied to incoming upload requests.
pub trait Authorizer: Send + Sync {
    /// Check a request given its raw `Authorization` header value, if any.
    fn authorize(&self, auth_header: Option<&str>) -> Result<(), AuthError>;
}

/// Permits every request. Used when no token is configured.
#[derive(Debug, Default)]
pub struct NoAuth;

impl Authorizer for NoAuth {
    fn authorize(&self, _auth_header: Option<&str>) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Compares the request token against a fixed expected value.
///
/// Accepts either `Bearer <token>` or the bare token as the header value.
#[derive(Debug)]
pub struct StaticToken {
    expected: String,
}

impl StaticToken {
    /// Create a new static token check.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Authorizer for StaticToken {
    fn authorize(&self, auth_header: Option<&str>) -> Result<(), AuthError> {
        let header = auth_header.ok_or(AuthError::MissingHeader)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        if token == self.expected {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Build the authorizer for an optionally configured token.
pub fn authorizer_for(token: Option<&str>) -> Arc<dyn Authorizer> {
    match token {
        Some(t) if !t.is_empty() => Arc::new(StaticToken::new(t)),
        _ => Arc::new(NoAuth),
    }
}
