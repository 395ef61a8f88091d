#![allow(clippy::unwrap_used)]
// End-to-end over real HTTP: Fleet + HttpGateway against wiremock devices.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ledfleet_core::{DeviceDefinition, Fleet, FleetConfig, Hsl, Script, SelectionMode};

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "success": true,
        "message": "success",
        "data": data
    }))
}

async fn strip(scripts: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({ "scripts": scripts })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fleet_over_http() {
    let porch = strip(json!(["rainbow", {"fileName": "fire", "name": "Camp Fire"}])).await;
    let hall = strip(json!([{"fileName": "fire"}, "ocean"])).await;
    for server in [&porch, &hall] {
        Mock::given(method("GET"))
            .and(path("/api/color"))
            .and(query_param("hue", "30"))
            .respond_with(ok(json!({})))
            .expect(1)
            .mount(server)
            .await;
    }
    let dead = MockServer::start().await;
    let dead_uri = dead.uri();
    drop(dead);

    let fleet = Fleet::new(FleetConfig::with_devices(vec![
        DeviceDefinition::new("Porch", porch.uri()),
        DeviceDefinition::new("Hall", hall.uri()),
        DeviceDefinition::new("Garage", dead_uri),
    ]))
    .unwrap();

    assert_eq!(fleet.probe_all().await, 2);
    assert!(!fleet.find("Garage").unwrap().is_online());

    let selection = fleet.selection();
    selection.set_mode(SelectionMode::Multiple);
    selection.select_all(|d| d.is_online());
    assert_eq!(selection.get_selected().len(), 2);

    let shared = selection.shared_scripts().await;
    assert_eq!(shared, vec![Script::new("fire")]);
    assert_eq!(shared[0].label(), "Camp Fire");

    let outcome = selection.set_color(Hsl::new(30, 100, 50)).await;
    assert_eq!(outcome.succeeded(), 2);

    fleet.shutdown().await;
}
