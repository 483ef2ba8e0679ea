//! Authorization error types.

use dirgate_core::error::DirgateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("wildcard host scope is not allowed: {0}")]
    WildcardNotAllowed(String),
}

impl From<AuthzError> for DirgateError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::MemberNotFound(uid) => DirgateError::NotFound {
                entity: "member".into(),
                id: uid,
            },
            AuthzError::WildcardNotAllowed(host) => DirgateError::InvalidHost { host },
        }
    }
}
