// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Unified error hierarchy for COLDLINK.
//!
//! The taxonomy mirrors how failures are surfaced to callers:
//!
//! - `NotFound` — a path segment or resource is absent; recoverable and
//!   rendered to HTTP clients as an empty mapping
//! - `Unavailable` — the underlying provider/transport failed; retryable
//!   and rendered as 5xx
//! - partial read failures are never escalated: the façade and the
//!   forwarder log the leaf and omit it
//! - connect/bind failures abort only the owning component's startup
//!
//! # Error Hierarchy
//!
//! ```text
//! ColdlinkError (root)
//! ├── SpaceError    - Address-space resolution and client transport
//! ├── ReplayError   - Dataset loading and replay task failures
//! └── ForwardError  - UDP bridge setup and send failures
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// ColdlinkError - Root Error Type
// =============================================================================

/// The root error type for COLDLINK.
#[derive(Debug, Error)]
pub enum ColdlinkError {
    /// Address-space error.
    #[error("Address-space error: {0}")]
    Space(#[from] SpaceError),

    /// Replay driver error.
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// Forwarder error.
    #[error("Forwarder error: {0}")]
    Forward(#[from] ForwardError),
}

impl ColdlinkError {
    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ColdlinkError::Space(e) => e.is_retryable(),
            ColdlinkError::Replay(e) => e.is_retryable(),
            ColdlinkError::Forward(e) => e.is_retryable(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ColdlinkError::Space(_) => "space",
            ColdlinkError::Replay(_) => "replay",
            ColdlinkError::Forward(_) => "forward",
        }
    }
}

// =============================================================================
// SpaceError
// =============================================================================

/// Address-space provider and client errors.
#[derive(Debug, Error)]
pub enum SpaceError {
    /// A path segment or leaf does not exist.
    #[error("Node not found: {path}")]
    NotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// The provider or its client transport is unavailable.
    #[error("Address space unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl SpaceError {
    /// Creates a not-found error.
    pub fn not_found(path: impl fmt::Display) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SpaceError::Unavailable { .. })
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SpaceError::NotFound { .. })
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SpaceError::NotFound { .. } => 404,
            SpaceError::Unavailable { .. } => 503,
        }
    }

    /// Returns the error type for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            SpaceError::NotFound { .. } => "not_found",
            SpaceError::Unavailable { .. } => "unavailable",
        }
    }
}

// =============================================================================
// ReplayError
// =============================================================================

/// Dataset loading and replay driver errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Failed to read the dataset file.
    #[error("Failed to read dataset '{path}': {source}")]
    Io {
        /// Path to the dataset file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A dataset row does not carry enough columns.
    #[error("Malformed dataset row {row} in '{path}': expected {expected} columns, found {found}")]
    MalformedRow {
        /// Path to the dataset file.
        path: PathBuf,
        /// 1-based row number.
        row: usize,
        /// Expected column count.
        expected: usize,
        /// Actual column count.
        found: usize,
    },

    /// A replay sequence ended up empty (start row past the dataset end).
    #[error("Empty replay sequence for '{tag}' (start row {start_row})")]
    EmptySequence {
        /// The tag the sequence was built for.
        tag: String,
        /// The configured start row.
        start_row: usize,
    },

    /// Writing a replayed value into the address space failed.
    #[error("Replay write failed for '{tag}': {source}")]
    WriteFailed {
        /// The tag being written.
        tag: String,
        /// The underlying address-space error.
        #[source]
        source: SpaceError,
    },
}

impl ReplayError {
    /// Creates an empty-sequence error.
    pub fn empty_sequence(tag: impl fmt::Display, start_row: usize) -> Self {
        Self::EmptySequence {
            tag: tag.to_string(),
            start_row,
        }
    }

    /// Creates a write-failed error.
    pub fn write_failed(tag: impl fmt::Display, source: SpaceError) -> Self {
        Self::WriteFailed {
            tag: tag.to_string(),
            source,
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReplayError::WriteFailed { source, .. } if source.is_retryable())
    }

    /// Returns the error type for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ReplayError::Io { .. } => "io",
            ReplayError::MalformedRow { .. } => "malformed_row",
            ReplayError::EmptySequence { .. } => "empty_sequence",
            ReplayError::WriteFailed { .. } => "write_failed",
        }
    }
}

// =============================================================================
// ForwardError
// =============================================================================

/// UDP forwarder errors.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Binding the UDP socket failed. Fatal to the forwarder's startup only.
    #[error("Failed to bind UDP socket: {source}")]
    Bind {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Sending a datagram failed.
    #[error("Failed to send datagram to {target}: {source}")]
    Send {
        /// The configured sink address.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding a JSON payload failed.
    #[error("Invalid JSON payload: {source}")]
    Payload {
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// Receiving a datagram failed.
    #[error("Failed to receive datagram: {source}")]
    Receive {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Registering a monitored node failed.
    #[error("Failed to register node '{tag}': {source}")]
    Register {
        /// The tag being registered.
        tag: String,
        /// The underlying address-space error.
        #[source]
        source: SpaceError,
    },

    /// The bridge was used before `connect()`.
    #[error("Forwarder is not connected")]
    NotConnected,
}

impl ForwardError {
    /// Creates a send error.
    pub fn send(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Send {
            target: target.into(),
            source,
        }
    }

    /// Creates a register error.
    pub fn register(tag: impl fmt::Display, source: SpaceError) -> Self {
        Self::Register {
            tag: tag.to_string(),
            source,
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ForwardError::Send { .. } | ForwardError::Receive { .. } | ForwardError::NotConnected
        )
    }

    /// Returns the error type for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ForwardError::Bind { .. } => "bind",
            ForwardError::Send { .. } => "send",
            ForwardError::Payload { .. } => "payload",
            ForwardError::Receive { .. } => "receive",
            ForwardError::Register { .. } => "register",
            ForwardError::NotConnected => "not_connected",
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// A Result type with ColdlinkError.
pub type ColdlinkResult<T> = Result<T, ColdlinkError>;

/// A Result type with SpaceError.
pub type SpaceResult<T> = Result<T, SpaceError>;

/// A Result type with ReplayError.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// A Result type with ForwardError.
pub type ForwardResult<T> = Result<T, ForwardError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_error_classification() {
        let not_found = SpaceError::not_found("Site9/Location1");
        assert!(not_found.is_not_found());
        assert!(!not_found.is_retryable());
        assert_eq!(not_found.status_code(), 404);

        let unavailable = SpaceError::unavailable("client is not connected");
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.status_code(), 503);
    }

    #[test]
    fn test_replay_error_retryable() {
        let write = ReplayError::write_failed(
            "Site1/Location1/Unit1/tempC1",
            SpaceError::unavailable("gone"),
        );
        assert!(write.is_retryable());

        let empty = ReplayError::empty_sequence("Site1/Location1/Unit1/tempC1", 500);
        assert!(!empty.is_retryable());
    }

    #[test]
    fn test_root_error_conversion() {
        let err: ColdlinkError = SpaceError::unavailable("down").into();
        assert!(err.is_retryable());
        assert_eq!(err.error_type(), "space");
    }

    #[test]
    fn test_forward_error_types() {
        assert_eq!(ForwardError::NotConnected.error_type(), "not_connected");
        assert!(ForwardError::NotConnected.is_retryable());
    }
}
