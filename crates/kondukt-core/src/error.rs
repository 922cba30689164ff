//! Error types for the Kondukt core library.

/// Errors that can occur while configuring connectors or moving data.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Parameter validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or option that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A file was expected at the path but none exists
    #[error("File '{path}' does not exist")]
    FileNotFound {
        /// Path that was checked
        path: String,
    },

    /// A directory was expected at the path but none exists
    #[error("Directory '{path}' does not exist")]
    DirectoryNotFound {
        /// Path that was checked
        path: String,
    },

    /// The path exists but is not a file
    #[error("'{path}' is not a file")]
    NotAFile {
        /// Offending path
        path: String,
    },

    /// The path exists but is not a directory
    #[error("'{path}' is not a directory")]
    NotADirectory {
        /// Offending path
        path: String,
    },

    /// The write target already exists and `if_exists = error` was requested
    #[error("'{path}' already exists")]
    AlreadyExists {
        /// Conflicting path
        path: String,
    },

    /// A non-recursive directory removal hit a non-empty directory
    #[error("Cannot delete non-empty directory '{path}'")]
    DirectoryNotEmpty {
        /// Directory that still has entries
        path: String,
    },

    /// The size of a transferred file does not match the source
    #[error("Size of '{path}' after transfer is {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// Transferred file
        path: String,
        /// Size reported by the source
        expected: u64,
        /// Size observed on the target
        actual: u64,
    },

    /// The content digest of a transferred file does not match the source
    #[error("Digest of '{path}' after transfer does not match the source")]
    DigestMismatch {
        /// Transferred file
        path: String,
    },

    /// State store error (HWM persistence)
    #[error("Store error: {message}")]
    Store {
        /// Human-readable error message
        message: String,
    },

    /// Connection availability check failed
    #[error("Connection '{connection}' is unavailable: {message}")]
    Unavailable {
        /// Instance URL of the connection that failed the check
        connection: String,
        /// Underlying failure description
        message: String,
    },
}

/// Convenience `Result` type alias for Kondukt operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Retryable errors include transient failures like interrupted
    /// transfers, I/O hiccups, and unavailable connections.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::SizeMismatch { .. } => true,
            Error::DigestMismatch { .. } => true,
            Error::Unavailable { .. } => true,
            Error::Store { .. } => true,
            Error::Validation { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
            Error::FileNotFound { .. } => false,
            Error::DirectoryNotFound { .. } => false,
            Error::NotAFile { .. } => false,
            Error::NotADirectory { .. } => false,
            Error::AlreadyExists { .. } => false,
            Error::DirectoryNotEmpty { .. } => false,
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new store error.
    pub fn store<S: Into<String>>(message: S) -> Self {
        Error::Store {
            message: message.into(),
        }
    }

    /// Creates a new unavailable-connection error.
    pub fn unavailable<C, M>(connection: C, message: M) -> Self
    where
        C: Into<String>,
        M: Into<String>,
    {
        Error::Unavailable {
            connection: connection.into(),
            message: message.into(),
        }
    }
}
