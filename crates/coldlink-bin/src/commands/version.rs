// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `version` command.

/// Prints version information.
pub fn execute() {
    println!("coldlink v{}", coldlink_core::VERSION);
    println!("Cold-chain telemetry simulator and gateway");
}
