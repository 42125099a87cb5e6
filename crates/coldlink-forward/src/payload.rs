// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The forwarder wire format.
//!
//! One JSON object per emitted snapshot:
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "values": {
//!     "compOutPres_S1L1U1": {
//!       "alias": "compOutPres_S1L1U1",
//!       "value": 12.5,
//!       "timestamp": "2025-01-01T00:00:00Z",
//!       "quality": "Good"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coldlink_core::types::{TagSample, Value};

// =============================================================================
// NodeSnapshot
// =============================================================================

/// The per-node entry of an emitted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// The registered alias.
    pub alias: String,

    /// Current value (number or string).
    pub value: Value,

    /// Source timestamp of the value.
    pub timestamp: DateTime<Utc>,

    /// Sample quality as a string.
    pub quality: String,
}

impl NodeSnapshot {
    /// Builds a snapshot entry from a leaf sample.
    pub fn from_sample(alias: impl Into<String>, sample: TagSample) -> Self {
        Self {
            alias: alias.into(),
            value: sample.value,
            timestamp: sample.timestamp,
            quality: sample.quality.to_string(),
        }
    }
}

// =============================================================================
// ForwardPayload
// =============================================================================

/// One emitted datagram: a fresh timestamp plus all current node entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardPayload {
    /// When the snapshot was emitted.
    pub timestamp: DateTime<Utc>,

    /// All monitored nodes readable this tick, keyed by alias.
    pub values: BTreeMap<String, NodeSnapshot>,
}

impl ForwardPayload {
    /// Wraps node entries with a fresh emission timestamp.
    pub fn now(values: BTreeMap<String, NodeSnapshot>) -> Self {
        Self {
            timestamp: Utc::now(),
            values,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use coldlink_core::types::TagQuality;

    #[test]
    fn test_snapshot_from_sample() {
        let sample = TagSample::now(Value::Numeric(12.5), TagQuality::Good);
        let snapshot = NodeSnapshot::from_sample("compOutPres_S1L1U1", sample);

        assert_eq!(snapshot.alias, "compOutPres_S1L1U1");
        assert_eq!(snapshot.value, Value::Numeric(12.5));
        assert_eq!(snapshot.quality, "Good");
    }

    #[test]
    fn test_payload_wire_shape() {
        let sample = TagSample::now(Value::Text("defrost".into()), TagQuality::Good);
        let mut values = BTreeMap::new();
        values.insert(
            "tempC1_S1L1U1".to_string(),
            NodeSnapshot::from_sample("tempC1_S1L1U1", sample),
        );

        let payload = ForwardPayload::now(values);
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json["timestamp"].is_string());
        assert_eq!(json["values"]["tempC1_S1L1U1"]["value"], "defrost");
        assert_eq!(json["values"]["tempC1_S1L1U1"]["quality"], "Good");
    }

    #[test]
    fn test_payload_roundtrip() {
        let sample = TagSample::now(Value::Numeric(-3.25), TagQuality::Bad);
        let mut values = BTreeMap::new();
        values.insert(
            "a".to_string(),
            NodeSnapshot::from_sample("a", sample),
        );
        let payload = ForwardPayload::now(values);

        let bytes = serde_json::to_vec(&payload).unwrap();
        let decoded: ForwardPayload = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, payload);
    }
}
