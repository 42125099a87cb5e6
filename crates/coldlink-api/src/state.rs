// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use coldlink_space::SpaceClient;

// =============================================================================
// AppState
// =============================================================================

/// State container passed to all handlers via Axum's state extraction.
///
/// Holds the injected address-space client; handlers never reach for an
/// ambient connection.
#[derive(Clone)]
pub struct AppState {
    /// The address-space client.
    pub client: Arc<dyn SpaceClient>,
}

impl AppState {
    /// Creates the state from an address-space client.
    pub fn new(client: Arc<dyn SpaceClient>) -> Self {
        Self { client }
    }

    /// Returns the client.
    pub fn client(&self) -> &dyn SpaceClient {
        self.client.as_ref()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use coldlink_space::{AddressSpace, InMemoryClient};

    #[test]
    fn test_state_is_cheaply_cloneable() {
        let space = Arc::new(AddressSpace::new());
        let state = AppState::new(Arc::new(InMemoryClient::new(space)));
        let clone = state.clone();

        assert_eq!(state.client().name(), clone.client().name());
    }
}
