// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary-level error types.

use thiserror::Error;

/// A Result type with BinError.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced by the gateway binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A component failed to initialize.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A component failed while running.
    #[error("Runtime error: {0}")]
    Runtime(String),
}
