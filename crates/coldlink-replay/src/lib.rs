// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-replay
//!
//! Replays recorded sensor samples into the address space, forever.
//!
//! - **dataset**: loads the tabular source (13 columns, one per
//!   [`SensorKind`](coldlink_core::tree::SensorKind), in fixed order) and
//!   slices it into per-leaf ring sequences by a configurable start row
//! - **driver**: spawns one independent task per `(unit, sensor)` pair;
//!   each task pops its ring's head, coerces it (numeric first, text as
//!   fallback), writes it through the [`SpaceClient`]
//!   (coldlink_space::SpaceClient) seam, rotates the sample to the tail,
//!   and repeats with no delay beyond cooperative scheduling
//!
//! A write failure is fatal to that task only: the task logs the error and
//! exits while the rest of the fleet keeps running.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod dataset;
pub mod driver;

pub use dataset::{Dataset, ReplaySequence};
pub use driver::ReplayDriver;
