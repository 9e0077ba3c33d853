/// Rejected input, detected before any lookup is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid video URL.")]
    Invalid,

    #[error("Please enter a video URL.")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The lookup service answered with a failure result.
    #[error("{0}")]
    NotFound(String),

    /// The lookup service errored or panicked.
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("A lookup is already in progress.")]
    Busy,

    #[error("No format entry with number {0}.")]
    NoSuchFormat(usize),
}

impl FlowError {
    /// Text shown in the message region.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowError, LookupError, ValidationError};

    #[test]
    fn test_messages() {
        assert_eq!(
            FlowError::from(ValidationError::Invalid).user_message(),
            "Please enter a valid video URL."
        );
        assert_eq!(FlowError::from(ValidationError::Empty).user_message(), "Please enter a video URL.");
        assert_eq!(
            FlowError::from(LookupError::NotFound("Unsupported URL or video not found.".to_string())).user_message(),
            "Unsupported URL or video not found."
        );
        assert_eq!(FlowError::NoSuchFormat(7).user_message(), "No format entry with number 7.");
    }
}
