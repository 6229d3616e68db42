use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Remote call failed: {0}")]
    RemoteCallFailure(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    /// True for failures reported by the remote store or its transport.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteCallFailure(_))
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteCallFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_category() {
        let err = LedgerError::InvalidArgument("item has no id".to_string());
        assert_eq!(err.to_string(), "Invalid argument: item has no id");

        let err = LedgerError::RemoteCallFailure("422 Unprocessable Entity".to_string());
        assert!(err.is_remote());
        assert!(!LedgerError::InvalidState("dup".to_string()).is_remote());
    }
}
