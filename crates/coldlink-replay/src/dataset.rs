// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The recorded-sample dataset.
//!
//! The source is a comma-separated file with exactly one column per
//! [`SensorKind`], in [`SensorKind::ALL`] order. An optional header row is
//! detected and skipped. Samples stay raw text in the rings; coercion
//! happens at write time in the replay loop so the numeric-else-text policy
//! applies on every iteration.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use coldlink_core::error::{ReplayError, ReplayResult};
use coldlink_core::tree::{SENSORS_PER_UNIT, SensorKind};
use coldlink_core::types::Value;

// =============================================================================
// Dataset
// =============================================================================

/// The loaded dataset: raw sample rows in file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Loads a dataset from a comma-separated file.
    ///
    /// Rows with fewer than 13 columns are rejected; extra columns are
    /// ignored. A first row whose leading field is not numeric is treated
    /// as a header and skipped.
    pub fn load(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|source| ReplayError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parses dataset content. Exposed for tests and in-memory fixtures.
    pub fn parse(path: PathBuf, content: &str) -> ReplayResult<Self> {
        let mut rows = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();

            // Header detection: only valid for the very first data-bearing
            // line, and only when its first field is not numeric.
            if rows.is_empty() && index == 0 && fields[0].parse::<f64>().is_err() {
                continue;
            }

            if fields.len() < SENSORS_PER_UNIT {
                return Err(ReplayError::MalformedRow {
                    path,
                    row: index + 1,
                    expected: SENSORS_PER_UNIT,
                    found: fields.len(),
                });
            }

            rows.push(fields);
        }

        Ok(Self { path, rows })
    }

    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Builds the replay ring for one sensor column, starting at `start_row`.
    ///
    /// Fails with `EmptySequence` when the start row is at or past the end
    /// of the dataset.
    pub fn sequence(&self, kind: SensorKind, start_row: usize) -> ReplayResult<ReplaySequence> {
        let samples: VecDeque<String> = self
            .rows
            .iter()
            .skip(start_row)
            .map(|row| row[kind.column()].clone())
            .collect();

        if samples.is_empty() {
            return Err(ReplayError::empty_sequence(kind.as_str(), start_row));
        }

        Ok(ReplaySequence { samples })
    }
}

// =============================================================================
// ReplaySequence
// =============================================================================

/// A non-empty ring of raw samples for one sensor leaf.
///
/// The ring is infinite and restartable: taking the next value rotates the
/// head to the tail.
#[derive(Debug, Clone)]
pub struct ReplaySequence {
    samples: VecDeque<String>,
}

impl ReplaySequence {
    /// Builds a sequence from raw samples. Fails when `samples` is empty.
    pub fn from_samples(
        tag: impl std::fmt::Display,
        samples: Vec<String>,
    ) -> ReplayResult<Self> {
        if samples.is_empty() {
            return Err(ReplayError::empty_sequence(tag, 0));
        }
        Ok(Self {
            samples: samples.into(),
        })
    }

    /// Takes the head sample, coerced, and rotates it to the tail.
    pub fn next_value(&mut self) -> Value {
        // Non-empty by construction, so front() always yields.
        let value = self
            .samples
            .front()
            .map(|raw| Value::coerce(raw))
            .unwrap_or_default();
        self.samples.rotate_left(1);
        value
    }

    /// Returns the ring length.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
