// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Discovery and snapshot handlers.
//!
//! Not-found is folded into an empty mapping here, matching the behavior
//! the original façade exposed; only `Unavailable` becomes an error
//! response.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use coldlink_core::error::SpaceError;

use crate::error::{ApiError, ApiResult};
use crate::query::{self, LeafReading};
use crate::state::AppState;

/// Folds `NotFound` into the default (empty) value; everything else maps
/// to an [`ApiError`].
fn empty_on_not_found<T: Default>(result: Result<T, SpaceError>) -> ApiResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_not_found() => {
            debug!(error = %err, "Rendering not-found as empty mapping");
            Ok(T::default())
        }
        Err(err) => Err(ApiError::from(err)),
    }
}

/// GET /api/v1/sites
///
/// Lists discovered sites as a name→name mapping.
pub async fn list_sites(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let sites = query::list_sites(state.client()).await;
    empty_on_not_found(sites).map(Json)
}

/// GET /api/v1/sites/{site}/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let locations = query::list_locations(state.client(), &site).await;
    empty_on_not_found(locations).map(Json)
}

/// GET /api/v1/sites/{site}/locations/{location}/units
pub async fn list_units(
    State(state): State<AppState>,
    Path((site, location)): Path<(String, String)>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let units = query::list_units(state.client(), &site, &location).await;
    empty_on_not_found(units).map(Json)
}

/// GET /api/v1/sites/{site}/locations/{location}/units/{unit}
///
/// Returns the unit's full leaf snapshot as `leaf → {value, timestamp}`.
pub async fn unit_snapshot(
    State(state): State<AppState>,
    Path((site, location, unit)): Path<(String, String, String)>,
) -> ApiResult<Json<BTreeMap<String, LeafReading>>> {
    let snapshot = query::read_unit_snapshot(state.client(), &site, &location, &unit).await;
    empty_on_not_found(snapshot).map(Json)
}
