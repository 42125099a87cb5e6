// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::state::AppState;

// =============================================================================
// ApiSettings
// =============================================================================

/// Runtime settings for the API server.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Address to bind.
    pub addr: SocketAddr,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Whether to allow any CORS origin.
    pub cors_allow_any: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            addr: ([0, 0, 0, 0], 8000).into(),
            request_timeout: Duration::from_secs(30),
            cors_allow_any: true,
        }
    }
}

// =============================================================================
// ApiServer
// =============================================================================

/// The API server: router construction and serving.
pub struct ApiServer {
    state: AppState,
    settings: ApiSettings,
}

impl ApiServer {
    /// Creates a new API server.
    pub fn new(state: AppState, settings: ApiSettings) -> Self {
        Self { state, settings }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.settings.request_timeout))
            .layer(create_cors_layer(&self.settings));

        Router::new()
            // Health endpoints
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Discovery and snapshot endpoints
            .route("/api/v1/sites", get(handlers::list_sites))
            .route("/api/v1/sites/{site}/locations", get(handlers::list_locations))
            .route(
                "/api/v1/sites/{site}/locations/{location}/units",
                get(handlers::list_units),
            )
            .route(
                "/api/v1/sites/{site}/locations/{location}/units/{unit}",
                get(handlers::unit_snapshot),
            )
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Returns the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.settings.addr
    }

    /// Runs the server until the shutdown future resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.settings.addr;
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer.
fn create_cors_layer(settings: &ApiSettings) -> CorsLayer {
    if settings.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use coldlink_core::tree::{SENSORS_PER_UNIT, SensorKind, Topology};
    use coldlink_core::types::{TagPath, Value};
    use coldlink_space::{AddressSpace, InMemoryClient, SpaceClient};

    use crate::query::LeafReading;

    async fn test_server(connected: bool) -> (ApiServer, Arc<InMemoryClient>) {
        let space = Arc::new(AddressSpace::from_topology(&Topology::recovered_default()));
        let client = Arc::new(InMemoryClient::new(space));
        if connected {
            client.connect().await.unwrap();
        }
        let state = AppState::new(client.clone());
        (ApiServer::new(state, ApiSettings::default()), client)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        router: Router,
        uri: &str,
    ) -> (StatusCode, T) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_sites_endpoint() {
        let (server, _client) = test_server(true).await;
        let (status, sites): (_, BTreeMap<String, String>) =
            get_json(server.router(), "/api/v1/sites").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites["Site1"], "Site1");
    }

    #[tokio::test]
    async fn test_unknown_site_renders_empty_mapping() {
        let (server, _client) = test_server(true).await;
        let (status, locations): (_, BTreeMap<String, String>) =
            get_json(server.router(), "/api/v1/sites/Site9/locations").await;

        assert_eq!(status, StatusCode::OK);
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let (server, client) = test_server(true).await;
        let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::CompOutPres);
        client.write(&path, Value::Numeric(12.5)).await.unwrap();

        let (status, snapshot): (_, BTreeMap<String, LeafReading>) = get_json(
            server.router(),
            "/api/v1/sites/Site1/locations/Location1/units/Unit1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot.len(), SENSORS_PER_UNIT);
        assert_eq!(snapshot["compOutPres"].value, Value::Numeric(12.5));
    }

    #[tokio::test]
    async fn test_disconnected_client_renders_503() {
        let (server, _client) = test_server(false).await;
        let (status, body): (_, serde_json::Value) =
            get_json(server.router(), "/api/v1/sites").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (server, client) = test_server(true).await;

        let (status, body): (_, serde_json::Value) = get_json(server.router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body): (_, serde_json::Value) = get_json(server.router(), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);

        client.disconnect().await.unwrap();
        let (status, _): (_, serde_json::Value) = get_json(server.router(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
