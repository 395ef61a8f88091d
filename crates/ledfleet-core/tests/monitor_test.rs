#![allow(clippy::unwrap_used)]
// Connectivity monitor timing, on paused tokio time.

mod common;

use std::time::Duration;

use ledfleet_api::Method;
use ledfleet_core::FleetEvent;
use tokio::time::{Instant, sleep};

use common::{FakeGateway, drain, fleet};

#[tokio::test(start_paused = true)]
async fn test_probe_timeout_marks_offline_once_and_retries_fast() {
    let gateway = FakeGateway::new();
    gateway.hang("den.local", Method::Get, "/ping");
    let fleet = fleet(&gateway, &[("Den", "den.local")]);
    let mut rx = fleet.events();
    let started = Instant::now();

    fleet.start().await;

    let first = rx.recv().await.unwrap();
    assert!(matches!(*first, FleetEvent::DeviceOffline(_)));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(5_000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(5_100), "{elapsed:?}");
    let second = rx.recv().await.unwrap();
    assert!(matches!(*second, FleetEvent::DeviceStatusChanged(_)));

    let device = fleet.find("Den").unwrap();
    assert!(!device.is_online());
    assert!(!device.state().first_check);

    // Next probe goes out 5000ms after the transition.
    sleep(Duration::from_millis(4_900)).await;
    assert_eq!(gateway.count("den.local", Method::Get, "/ping"), 1);
    sleep(Duration::from_millis(200)).await;
    assert_eq!(gateway.count("den.local", Method::Get, "/ping"), 2);

    // Still offline after the second timeout: no new events.
    sleep(Duration::from_millis(6_000)).await;
    assert!(drain(&mut rx).is_empty());

    fleet.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_online_device_probes_slowly() {
    let gateway = FakeGateway::new();
    gateway.up("lr.local");
    let fleet = fleet(&gateway, &[("Living Room", "lr.local")]);
    let mut rx = fleet.events();

    fleet.start().await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(drain(&mut rx), ["deviceOnline", "deviceStatusChanged"]);

    sleep(Duration::from_millis(59_000)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 1);
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 2);

    // Confirmed online again: nothing to announce.
    assert!(drain(&mut rx).is_empty());
    fleet.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_command_failure_reschedules_on_offline_interval() {
    let gateway = FakeGateway::new();
    gateway.up("lr.local");
    let fleet = fleet(&gateway, &[("Living Room", "lr.local")]);
    let mut rx = fleet.events();

    fleet.start().await;
    sleep(Duration::from_millis(1_000)).await;
    drain(&mut rx);

    let device = fleet.find("lr.local").unwrap();
    let err = device.set_off().await.unwrap_err();
    assert!(err.is_offline());
    assert_eq!(drain(&mut rx), ["deviceOffline", "deviceStatusChanged"]);

    let failed_at = Instant::now();
    let event = rx.recv().await.unwrap();
    assert!(matches!(*event, FleetEvent::DeviceOnline(_)));
    let elapsed = failed_at.elapsed();
    assert!(elapsed >= Duration::from_millis(5_000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(5_100), "{elapsed:?}");
    assert!(device.is_online());

    fleet.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failure_before_start_does_not_shorten_online_interval() {
    let gateway = FakeGateway::new();
    gateway.up("lr.local");
    let fleet = fleet(&gateway, &[("Living Room", "lr.local")]);
    assert_eq!(fleet.probe_all().await, 1);

    // Unrouted: refused, so the device drops offline with no monitor running.
    let device = fleet.find("lr.local").unwrap();
    assert!(device.set_off().await.unwrap_err().is_offline());

    fleet.start().await;
    sleep(Duration::from_millis(10)).await;
    assert!(device.is_online());
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 2);

    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 2);
    sleep(Duration::from_millis(50_000)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 3);

    fleet.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_is_idempotent_and_shutdown_is_final() {
    let gateway = FakeGateway::new();
    gateway.up("lr.local");
    let fleet = fleet(&gateway, &[("Living Room", "lr.local")]);

    fleet.start().await;
    fleet.start().await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 1);

    fleet.shutdown().await;
    fleet.start().await;
    sleep(Duration::from_secs(300)).await;
    assert_eq!(gateway.count("lr.local", Method::Get, "/ping"), 1);
}
