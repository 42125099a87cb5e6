// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! Drives the full router over a populated address space:
//!
//! - discovery endpoints and naming-convention filtering
//! - snapshot completeness and value passthrough
//! - the empty-mapping-on-not-found rendering
//! - `503` on provider unavailability
//! - the end-to-end write → snapshot path

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use coldlink_api::{ApiServer, ApiSettings, AppState, LeafReading};
use coldlink_core::tree::{SENSORS_PER_UNIT, SensorKind, Topology};
use coldlink_core::types::{TagPath, Value};
use coldlink_space::{InMemoryClient, SpaceClient};

use coldlink_tests::common::connected_client;

async fn test_router() -> (Router, Arc<InMemoryClient>) {
    let client = connected_client(&Topology::recovered_default()).await;
    let server = ApiServer::new(AppState::new(client.clone()), ApiSettings::default());
    (server.router(), client)
}

async fn get_json<T: serde::de::DeserializeOwned>(router: &Router, uri: &str) -> (StatusCode, T) {
    let response = router
        .clone()
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
async fn test_discovery_walk() {
    let (router, _client) = test_router().await;

    let (status, sites): (_, BTreeMap<String, String>) =
        get_json(&router, "/api/v1/sites").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        sites.keys().collect::<Vec<_>>(),
        vec!["Site1", "Site2"]
    );

    let (_, locations): (_, BTreeMap<String, String>) =
        get_json(&router, "/api/v1/sites/Site1/locations").await;
    assert_eq!(
        locations.keys().collect::<Vec<_>>(),
        vec!["Location1", "Location2"]
    );

    let (_, units): (_, BTreeMap<String, String>) =
        get_json(&router, "/api/v1/sites/Site1/locations/Location1/units").await;
    assert_eq!(units.keys().collect::<Vec<_>>(), vec!["Unit1", "Unit2"]);
}

#[tokio::test]
async fn test_end_to_end_write_then_snapshot() {
    let (router, client) = test_router().await;

    let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::CompOutPres);
    client.write(&path, Value::Numeric(12.5)).await.unwrap();

    let (status, snapshot): (_, BTreeMap<String, LeafReading>) = get_json(
        &router,
        "/api/v1/sites/Site1/locations/Location1/units/Unit1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot.len(), SENSORS_PER_UNIT);

    let reading = &snapshot["compOutPres"];
    assert_eq!(reading.value, Value::Numeric(12.5));
    assert!(reading.timestamp <= chrono::Utc::now());
}

#[tokio::test]
async fn test_text_values_pass_through_snapshot() {
    let (router, client) = test_router().await;

    let path = TagPath::new("Site2", "Location1", "Unit1", SensorKind::TempC2);
    client
        .write(&path, Value::Text("defrost".into()))
        .await
        .unwrap();

    let (_, snapshot): (_, BTreeMap<String, LeafReading>) = get_json(
        &router,
        "/api/v1/sites/Site2/locations/Location1/units/Unit1",
    )
    .await;
    assert_eq!(snapshot["tempC2"].value, Value::Text("defrost".into()));
}

#[tokio::test]
async fn test_not_found_renders_as_empty_mapping() {
    let (router, _client) = test_router().await;

    for uri in [
        "/api/v1/sites/Site9/locations",
        "/api/v1/sites/Site1/locations/Location9/units",
        "/api/v1/sites/Site1/locations/Location1/units/Unit9",
    ] {
        let (status, body): (_, serde_json::Value) = get_json(&router, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, serde_json::json!({}), "{}", uri);
    }
}

#[tokio::test]
async fn test_unavailable_renders_as_503() {
    let (router, client) = test_router().await;
    client.disconnect().await.unwrap();

    for uri in [
        "/api/v1/sites",
        "/api/v1/sites/Site1/locations",
        "/api/v1/sites/Site1/locations/Location1/units",
        "/api/v1/sites/Site1/locations/Location1/units/Unit1",
    ] {
        let (status, body): (_, serde_json::Value) = get_json(&router, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE", "{}", uri);
    }
}

#[tokio::test]
async fn test_unknown_route_is_plain_404() {
    let (router, _client) = test_router().await;
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/freezers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
