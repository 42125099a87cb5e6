// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-api
//!
//! The REST lookup/query façade over the COLDLINK address space.
//!
//! Four read operations, each stateless given the address space:
//!
//! - `GET /api/v1/sites`
//! - `GET /api/v1/sites/{site}/locations`
//! - `GET /api/v1/sites/{site}/locations/{location}/units`
//! - `GET /api/v1/sites/{site}/locations/{location}/units/{unit}`
//!
//! Discovery filters children by naming convention (`Site<n>`,
//! `Location<n>`, `Unit<n>`); the unit endpoint returns a snapshot of all
//! 13 sensor leaves.
//!
//! Error signaling preserves the source system's shape: unresolved paths
//! and empty pattern matches render as `200` with an empty mapping, while
//! provider/transport failures render as `503` with a JSON error body. The
//! service layer underneath does distinguish the two.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod handlers;
pub mod query;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use query::LeafReading;
pub use server::{ApiServer, ApiSettings};
pub use state::AppState;
