// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-bin
//!
//! The COLDLINK gateway binary: CLI parsing, logging initialization,
//! runtime orchestration, and graceful shutdown wiring.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;

pub use error::{BinError, BinResult};
pub use runtime::SimulatorRuntime;
