//! Error types and handling for the dispatch table generator
//!
//! Every failure is fatal for a generation run and is raised before any
//! artifact is written.

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the generator
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A user method collides with another user method or a reserved method
    #[error("Duplicate method name: {name}")]
    DuplicateKey {
        /// The colliding method name
        name: String,
    },

    /// A method name or parameter tag failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The hash-and-displace search exhausted its budget
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// An assembled table does not form a bijection onto its slots
    #[error("Verification failed: {0}")]
    Verification(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON descriptor serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text rendering errors
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Method table validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Method name is the empty string
    #[error("method name must not be empty")]
    EmptyKey,

    /// Method name exceeds the fixed key length
    #[error("method name {name:?} is {len} bytes (max: {max})")]
    KeyTooLong {
        /// Offending name
        name: String,
        /// Actual length in bytes
        len: usize,
        /// Maximum allowed length in bytes
        max: usize,
    },

    /// Method name contains a byte outside `[A-Za-z0-9_]`
    #[error("method name {name:?} contains invalid character {ch:?}")]
    InvalidKeyChar {
        /// Offending name
        name: String,
        /// First invalid character
        ch: char,
    },

    /// Method name starts with a digit
    #[error("method name {name:?} must not start with a digit")]
    LeadingDigit {
        /// Offending name
        name: String,
    },

    /// Parameter tag does not name a known CBOR type
    #[error("method {method:?} has unknown parameter type {tag:?}")]
    UnknownParamType {
        /// Method owning the tag
        method: String,
        /// The unrecognised tag
        tag: String,
    },

    /// Parameter list is longer than the runtime supports
    #[error("method {method:?} declares {count} parameters (max: {max})")]
    TooManyParams {
        /// Offending method
        method: String,
        /// Declared parameter count
        count: usize,
        /// Maximum allowed parameter count
        max: usize,
    },
}

/// Minimal perfect hash construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Nothing to hash
    #[error("cannot build a perfect hash over an empty key set")]
    EmptyKeySet,

    /// The bucket factor yields no usable bucket count
    #[error("bucket factor out of range for {keys} keys")]
    BucketCountOverflow {
        /// Number of keys
        keys: usize,
    },

    /// No salt pair produced a collision-free displacement
    #[error("no perfect hash found for {keys} keys over {buckets} buckets after {attempts} attempts")]
    RetriesExhausted {
        /// Number of keys
        keys: usize,
        /// Number of buckets
        buckets: usize,
        /// Salt pairs tried
        attempts: usize,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a verification error
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    /// Check if this error was caused by the method table rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateKey { .. } | Error::Validation(_) | Error::Config(_)
        )
    }
}
