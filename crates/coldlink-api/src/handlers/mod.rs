// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP request handlers.

pub mod health;
pub mod sites;

pub use health::{health, ready};
pub use sites::{list_locations, list_sites, list_units, unit_snapshot};
