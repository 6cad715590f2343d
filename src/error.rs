// src/error.rs
//
// Error taxonomy for ACL operations. Every failure a caller can branch on
// is one of these four classes.

use thiserror::Error;

/// Alias so other modules can embed arbitrary backend errors.
pub type AnyError = anyhow::Error;

#[derive(Error, Debug)]
pub enum AclError {
    /// The request was malformed; detected before any network activity.
    #[error("{0}")]
    Input(String),

    /// The addressed bucket or object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected or failed a single remote operation.
    #[error("{op} on {target} failed: {source}")]
    Remote {
        op: &'static str,
        target: String,
        source: AnyError,
    },

    /// A batch finished, but at least one item failed.
    #[error("{failed} of {attempted} updates failed; first: {first}")]
    Partial {
        failed: usize,
        succeeded: usize,
        attempted: usize,
        first: String,
    },
}

impl AclError {
    pub fn input(msg: impl Into<String>) -> Self {
        AclError::Input(msg.into())
    }

    /// `target` names what was missing, e.g. `bucket 'x'` or `s3://x/key`.
    pub fn not_found(target: impl Into<String>) -> Self {
        AclError::NotFound(target.into())
    }

    pub fn remote(op: &'static str, target: impl Into<String>, source: AnyError) -> Self {
        AclError::Remote {
            op,
            target: target.into(),
            source,
        }
    }

    /// True when the request never left the client.
    pub fn is_input(&self) -> bool {
        matches!(self, AclError::Input(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AclError::NotFound(_))
    }
}
