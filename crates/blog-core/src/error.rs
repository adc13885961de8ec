//! Error taxonomy shared by every layer.
//!
//! Callers classify failures with [`PostError::kind`] and never by message
//! text. Store adapters report [`RepoError`]; the gateway is the only place
//! that turns those into [`PostError`]s.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Fixed error categories understood by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request payload fails domain validation.
    InvalidInput,
    /// Supplied identifier is not a well-formed identity.
    InvalidId,
    /// No record matches the identity or filter.
    NotFound,
    /// State conflict. Reserved for uniqueness constraints.
    Conflict,
    /// Storage or driver failure.
    Store,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidId => "invalid_id",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Store => "db_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure: a kind, the operation context and the original cause.
#[derive(Debug, Error)]
#[error("{kind}: {context}")]
pub struct PostError {
    kind: ErrorKind,
    context: String,
    #[source]
    source: Option<BoxError>,
}

impl PostError {
    /// Error without an underlying cause.
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            source: None,
        }
    }

    /// Attach `kind` and `context` to `cause`. No cause, no error.
    pub fn wrap<E>(cause: Option<E>, kind: ErrorKind, context: impl Into<String>) -> Option<Self>
    where
        E: Into<BoxError>,
    {
        cause.map(|e| Self {
            kind,
            context: context.into(),
            source: Some(e.into()),
        })
    }

    pub fn invalid_input(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, context)
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, context)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Message safe to show to API clients.
    ///
    /// Only the client-actionable kinds expose their context and cause.
    pub fn public_message(&self) -> String {
        match self.kind {
            ErrorKind::InvalidInput | ErrorKind::InvalidId => match &self.source {
                Some(cause) => format!("{}: {}", self.context, cause),
                None => self.context.clone(),
            },
            ErrorKind::NotFound => "resource not found".to_string(),
            ErrorKind::Conflict => "state conflict".to_string(),
            ErrorKind::Store => "internal error".to_string(),
        }
    }

    /// Full cause chain for operator logs.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut next = self.source();
        while let Some(cause) = next {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            next = cause.source();
        }
        out
    }
}

/// `Result` form of [`PostError::wrap`]: `Ok` passes through untouched.
pub trait WrapErr<T> {
    fn wrap_err(self, kind: ErrorKind, context: &str) -> Result<T, PostError>;
}

impl<T, E> WrapErr<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, kind: ErrorKind, context: &str) -> Result<T, PostError> {
        self.map_err(|e| PostError {
            kind,
            context: context.to_string(),
            source: Some(e.into()),
        })
    }
}

/// Repository-level errors reported by store adapters.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Document serialization failed: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    /// Taxonomy kind this repository failure maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::NotFound => ErrorKind::NotFound,
            RepoError::Constraint(_) => ErrorKind::Conflict,
            RepoError::Connection(_) | RepoError::Query(_) | RepoError::Serialization(_) => {
                ErrorKind::Store
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_without_cause_is_none() {
        let err = PostError::wrap(None::<RepoError>, ErrorKind::Store, "insert post");
        assert!(err.is_none());
    }

    #[test]
    fn test_wrap_keeps_kind_context_and_cause() {
        let err = PostError::wrap(
            Some(RepoError::Query("socket closed".to_string())),
            ErrorKind::Store,
            "insert post",
        )
        .unwrap();

        assert!(err.is(ErrorKind::Store));
        assert_eq!(err.context(), "insert post");
        assert!(err.source().is_some());
        assert!(err.chain().contains("socket closed"));
    }

    #[test]
    fn test_wrap_err_passes_ok_through() {
        let ok: Result<u8, RepoError> = Ok(7);
        assert_eq!(ok.wrap_err(ErrorKind::Store, "noop").unwrap(), 7);

        let failed: Result<u8, RepoError> = Err(RepoError::NotFound);
        let err = failed.wrap_err(ErrorKind::NotFound, "post not found").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_public_message_hides_store_detail() {
        let err = Err::<(), _>(RepoError::Connection("10.0.0.3:27017 refused".to_string()))
            .wrap_err(ErrorKind::Store, "find post")
            .unwrap_err();
        assert_eq!(err.public_message(), "internal error");

        let err = Err::<(), _>("odd length")
            .wrap_err(ErrorKind::InvalidId, "parse post id")
            .unwrap_err();
        assert_eq!(err.public_message(), "parse post id: odd length");
    }

    #[test]
    fn test_repo_error_kinds() {
        assert_eq!(RepoError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(RepoError::Constraint("dup".into()).kind(), ErrorKind::Conflict);
        assert_eq!(RepoError::Serialization("bad".into()).kind(), ErrorKind::Store);
    }
}
