// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core data types for COLDLINK.
//!
//! These types are protocol-agnostic: the address-space provider, the replay
//! driver, the REST façade, and the UDP forwarder all speak in terms of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tree::SensorKind;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier and returns the inner string.
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// A site identifier (`Site1`, `Site2`, ...).
    ///
    /// Sites are the top level of the tag tree. The numeric-suffix naming
    /// convention is what discovery filters on.
    SiteId
}

define_id! {
    /// A location identifier within a site (`Location1`, ...).
    LocationId
}

define_id! {
    /// A refrigeration-unit identifier within a location (`Unit1`, ...).
    UnitId
}

// =============================================================================
// Value
// =============================================================================

/// A leaf value: numeric, or text when numeric coercion fails.
///
/// The replay loop coerces every raw sample with [`Value::coerce`] before
/// writing it, so a leaf's effective type can change across cycles. That
/// polymorphism is intentional and must be preserved; callers that need a
/// number use [`Value::as_f64`] and handle the `None` case.
///
/// # Examples
///
/// ```
/// use coldlink_core::types::Value;
///
/// assert_eq!(Value::coerce("4.2"), Value::Numeric(4.2));
/// assert_eq!(Value::coerce("fault"), Value::Text("fault".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit floating point value.
    Numeric(f64),

    /// A text value, produced when numeric coercion fails.
    Text(String),
}

impl Value {
    /// Coerces a raw sample: numeric first, text as fallback.
    ///
    /// This is the dispatch mechanism of the replay loop, not an error path.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Numeric(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Returns the numeric value, if this is one.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Returns the text value, if this is one.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Numeric(_) => None,
            Value::Text(s) => Some(s),
        }
    }

    /// Returns the type name of this value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Numeric(_) => "numeric",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Numeric(0.0)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Numeric(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

// =============================================================================
// Quality
// =============================================================================

/// The quality attached to a leaf sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TagQuality {
    /// The value is good and reliable.
    #[default]
    Good,

    /// The value could not be refreshed and should not be trusted.
    Bad,
}

impl TagQuality {
    /// Returns `true` if the quality is good.
    #[inline]
    pub fn is_good(&self) -> bool {
        matches!(self, TagQuality::Good)
    }

    /// Returns the quality as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagQuality::Good => "Good",
            TagQuality::Bad => "Bad",
        }
    }
}

impl fmt::Display for TagQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// TagSample
// =============================================================================

/// A timestamped leaf sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSample {
    /// The sampled value.
    pub value: Value,

    /// When the value was written.
    pub timestamp: DateTime<Utc>,

    /// Sample quality.
    pub quality: TagQuality,
}

impl TagSample {
    /// Creates a sample stamped with the current time.
    pub fn now(value: Value, quality: TagQuality) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
            quality,
        }
    }

    /// Creates the initial sample every leaf starts with.
    pub fn initial() -> Self {
        Self::now(Value::default(), TagQuality::Good)
    }
}

impl fmt::Display for TagSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] @ {}",
            self.value,
            self.quality,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

// =============================================================================
// TagPath
// =============================================================================

/// A fully-qualified path to a sensor leaf.
///
/// Replaces stringly `"{ns}:{name}"` traversal with a typed key resolved
/// through the address-space provider.
///
/// # Examples
///
/// ```
/// use coldlink_core::tree::SensorKind;
/// use coldlink_core::types::TagPath;
///
/// let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::TempC1);
/// assert_eq!(path.to_string(), "Site1/Location1/Unit1/tempC1");
/// assert_eq!(path.default_alias(), "tempC1_S1L1U1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagPath {
    /// The site segment.
    pub site: SiteId,

    /// The location segment.
    pub location: LocationId,

    /// The unit segment.
    pub unit: UnitId,

    /// The sensor leaf.
    pub sensor: SensorKind,
}

impl TagPath {
    /// Creates a new tag path.
    pub fn new(
        site: impl Into<SiteId>,
        location: impl Into<LocationId>,
        unit: impl Into<UnitId>,
        sensor: SensorKind,
    ) -> Self {
        Self {
            site: site.into(),
            location: location.into(),
            unit: unit.into(),
            sensor,
        }
    }

    /// Returns the object-node segments (site, location, unit) of this path.
    pub fn unit_segments(&self) -> [&str; 3] {
        [self.site.as_str(), self.location.as_str(), self.unit.as_str()]
    }

    /// Returns a compact default alias, e.g. `compOutPres_S1L1U1`.
    ///
    /// Built from the numeric suffixes of the object segments; identifiers
    /// without a numeric suffix fall back to their full text.
    pub fn default_alias(&self) -> String {
        fn digits(id: &str) -> String {
            let d: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
            if d.is_empty() { id.to_string() } else { d }
        }

        format!(
            "{}_S{}L{}U{}",
            self.sensor.as_str(),
            digits(self.site.as_str()),
            digits(self.location.as_str()),
            digits(self.unit.as_str()),
        )
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.site,
            self.location,
            self.unit,
            self.sensor.as_str()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
