//! Query errors

use fos_dom::DomError;

/// Name used as the prefix of every error message
pub const MODULE_NAME: &str = "fOS Query";

/// Error raised by the query layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The canonical constructor name is already bound
    #[error("{module}, error in {origin}: {message}", module = MODULE_NAME)]
    DuplicateDefinition { origin: String, message: String },

    /// A helper or (in strict mode) an instance method got an unusable value
    #[error("{module}, error in {origin}: {message}", module = MODULE_NAME)]
    InvalidArgument { origin: String, message: String },

    /// Anything else reported through `raise_error`
    #[error("{module}, error in {origin}: {message}", module = MODULE_NAME)]
    Raised { origin: String, message: String },

    /// Failure reported by the DOM, passed through unchanged
    #[error("{module}, DOM resolution failed: {0}", module = MODULE_NAME)]
    Dom(#[from] DomError),
}

impl QueryError {
    pub fn duplicate_definition(origin: &str, message: impl Into<String>) -> Self {
        Self::DuplicateDefinition { origin: origin.to_string(), message: message.into() }
    }

    pub fn invalid_argument(origin: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument { origin: origin.to_string(), message: message.into() }
    }

    pub fn raised(origin: &str, message: impl Into<String>) -> Self {
        Self::Raised { origin: origin.to_string(), message: message.into() }
    }

    /// The step or helper that produced the error, if it came from this layer
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::DuplicateDefinition { origin, .. }
            | Self::InvalidArgument { origin, .. }
            | Self::Raised { origin, .. } => Some(origin),
            Self::Dom(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// Single funnel for failures: logs, then hands back the error.
pub(crate) fn fail<T>(error: QueryError) -> Result<T> {
    tracing::error!("{}", error);
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let err = QueryError::duplicate_definition("check_conflict", "jQuery is already defined");
        assert_eq!(
            err.to_string(),
            "fOS Query, error in check_conflict: jQuery is already defined"
        );
        assert_eq!(err.origin(), Some("check_conflict"));
    }

    #[test]
    fn test_dom_error_passes_through() {
        let err: QueryError = DomError::InvalidToken("a b".into()).into();
        assert_eq!(err, QueryError::Dom(DomError::InvalidToken("a b".into())));
        assert_eq!(err.origin(), None);
    }
}
