// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # coldlink-forward
//!
//! The live forwarder: polls a registered set of sensor leaves on a fixed
//! interval, diffs the alias→value snapshot against the last emission, and
//! pushes changed snapshots as a single JSON datagram to a configured
//! `host:port` sink (fire-and-forget).
//!
//! - **payload**: the wire shape of one emitted snapshot
//! - **bridge**: the [`UdpBridge`] with its register → connect → run
//!   lifecycle
//!
//! Ticks are serialized: a new tick never starts before the previous
//! read-compare-send sequence completes. The loop terminates only on an
//! external stop signal, at which point the socket is released.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod payload;

pub use bridge::{BridgeSettings, UdpBridge};
pub use payload::{ForwardPayload, NodeSnapshot};
