// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for profile deployment and download.
//!
//! Every failure along the JSON → TOML → registry path is represented by one
//! variant of [`ProfileError`]. The HTTP layer collapses all of them into an
//! opaque `500`, so the variants carry the detail operators need in logs.

use thiserror::Error;

/// A boxed error used as the underlying cause of a [`ProfileError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for profile operations.
///
/// # Examples
///
/// ```
/// use profile_sync::domain::errors::ProfileError;
///
/// let error = ProfileError::Unavailable {
///     backend: "etcd".to_string(),
/// };
/// assert_eq!(error.to_string(), "Registry (etcd) is not running");
/// assert_eq!(error.kind(), "unavailable");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    /// A client handle to the registry could not be constructed.
    #[error("Connection to registry '{backend}' could not be made: {source}")]
    Connection {
        /// The registry backend kind
        backend: String,
        /// The underlying error reported by the client factory
        source: BoxError,
    },

    /// The client was constructed but the registry did not answer the liveness probe.
    #[error("Registry ({backend}) is not running")]
    Unavailable {
        /// The registry backend kind
        backend: String,
    },

    /// The inbound request body could not be decoded into a keyed mapping.
    #[error("Failed to decode configuration: {message}")]
    Decode {
        /// The error message
        message: String,
        /// The underlying decoding error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A configuration value has no TOML representation.
    #[error("Value at '{path}' cannot be represented in TOML: {message}")]
    Conversion {
        /// Dotted path of the offending value
        path: String,
        /// Why the value was rejected
        message: String,
    },

    /// The registry rejected the write or the connection dropped mid-write.
    #[error("Failed to write configuration to registry: {message}")]
    StoreWrite {
        /// The error message
        message: String,
        /// The underlying store error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The registry could not be read or holds no configuration for the key.
    #[error("Failed to read configuration from registry: {message}")]
    StoreRead {
        /// The error message
        message: String,
        /// The underlying store error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The registry returned a value that is not a keyed mapping.
    #[error("Configuration from registry failed type check: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The shape that was expected
        expected: &'static str,
        /// The shape that was returned
        found: &'static str,
    },

    /// The TOML encoder failed to render a document.
    #[error("Failed to serialize configuration: {message}")]
    Serialize {
        /// The error message
        message: String,
        /// The underlying encoder error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Process settings could not be loaded.
    #[error("Invalid settings: {message}")]
    InvalidSettings {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },
}

impl ProfileError {
    /// Returns a short, stable label for the error, suitable for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfileError::Connection { .. } => "connection",
            ProfileError::Unavailable { .. } => "unavailable",
            ProfileError::Decode { .. } => "decode",
            ProfileError::Conversion { .. } => "conversion",
            ProfileError::StoreWrite { .. } => "store_write",
            ProfileError::StoreRead { .. } => "store_read",
            ProfileError::ShapeMismatch { .. } => "shape_mismatch",
            ProfileError::Serialize { .. } => "serialize",
            ProfileError::InvalidSettings { .. } => "invalid_settings",
        }
    }

    /// Renders the error followed by every underlying cause, separated by `: `.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            let text = err.to_string();
            if !rendered.ends_with(&text) {
                rendered.push_str(": ");
                rendered.push_str(&text);
            }
            cause = err.source();
        }
        rendered
    }

    /// Creates a `StoreWrite` error from a backend error.
    pub fn store_write<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ProfileError::StoreWrite {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `StoreRead` error from a backend error.
    pub fn store_read<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ProfileError::StoreRead {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

/// A specialized Result type for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
