use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage transaction failed: {0}")]
    Transaction(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Failure of the secure random source backing code generation.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("short code already taken: {0}")]
    CodeTaken(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("code generation failed: {0}")]
    Entropy(
        #[from]
        #[source]
        GeneratorError,
    ),
    #[error("storage operation failed: {0}")]
    Storage(#[source] StorageError),
}

impl ShortenerError {
    /// Returns `true` for failures the caller should report as a server fault
    /// rather than a negative result.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShortenerError::Exhausted { .. }
                | ShortenerError::Entropy(_)
                | ShortenerError::Storage(_)
        )
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::CodeTaken(code),
            StorageError::NotFound(code) => Self::NotFound(code),
            other => Self::Storage(other),
        }
    }
}
