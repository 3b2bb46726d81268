use thiserror::Error;

/// Error kinds surfaced by a document store binding.
///
/// The first six map to the transient failure modes of the managed store and
/// are the only kinds the retry policy will re-attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    ThroughputExceeded,
    Throttling,
    RequestLimitExceeded,
    ServiceUnavailable,
    InternalServerError,
    RequestTimeout,
    Serialization,
    Other,
}

impl StoreErrorKind {
    /// Wire-level error-kind string, matched against the retry allow-list.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThroughputExceeded => "ProvisionedThroughputExceededException",
            Self::Throttling => "ThrottlingException",
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::InternalServerError => "InternalServerError",
            Self::RequestTimeout => "RequestTimeout",
            Self::Serialization => "SerializationException",
            Self::Other => "UnknownError",
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ThroughputExceeded
                | Self::Throttling
                | Self::RequestLimitExceeded
                | Self::ServiceUnavailable
                | Self::InternalServerError
                | Self::RequestTimeout
        )
    }
}

/// Error type for document store operations.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", kind.as_str())]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Serialization, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}
