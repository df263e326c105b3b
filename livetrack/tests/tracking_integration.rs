//! Integration tests for the tracking HTTP surface.
//!
//! Each test starts the real router on an ephemeral localhost port and talks
//! to it with `reqwest`, covering:
//! - Driver ingest → customer lookup (the order 42 / driver D9 flow)
//! - Absence states (no driver, no fresh position)
//! - Error mapping (400, 404, 503) and JSON error bodies
//! - Driver offline, nearby search, health, CORS and graceful shutdown
//!
//! Run with: `cargo test --test tracking_integration`

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use livetrack::assignment::{
    Assignment, AssignmentError, AssignmentResolver, DriverContact, InMemoryAssignments, OrderId,
};
use livetrack::position::{DriverId, PositionStore, PositionStoreConfig};
use livetrack::server::{self, AppState, ServerError};
use livetrack::time::ManualClock;
use livetrack::tracking::LookupConfig;

// ============================================================================
// Test Helpers
// ============================================================================

struct TestServer {
    base: String,
    http: reqwest::Client,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    async fn start<R: AssignmentResolver + 'static>(store: Arc<PositionStore>, resolver: R) -> Self {
        let lookup = LookupConfig {
            resolve_timeout: Duration::from_millis(300),
        };
        let app = server::router(AppState::new(store, resolver, lookup, 2));

        let listener = server::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server::serve(listener, app, shutdown.clone()));

        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::new(),
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn report(&self, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .post(self.url("/driver/location"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(2), self.handle)
            .await
            .expect("server did not shut down")
            .expect("server task panicked")
            .expect("server returned an error");
    }
}

struct Fixture {
    server: TestServer,
    store: Arc<PositionStore>,
    orders: Arc<InMemoryAssignments>,
    clock: Arc<ManualClock>,
}

async fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::from_unix_secs(1_700_000_000));
    let store = Arc::new(PositionStore::with_clock(
        PositionStoreConfig::default(),
        clock.clone(),
    ));
    let orders = Arc::new(InMemoryAssignments::new());
    let server = TestServer::start(Arc::clone(&store), Arc::clone(&orders)).await;

    Fixture {
        server,
        store,
        orders,
        clock,
    }
}

fn ravi(driver_id: &str) -> DriverContact {
    DriverContact {
        driver_id: DriverId::parse(driver_id).unwrap(),
        name: "Ravi Kumar".to_string(),
        mobile_no: "9829012345".to_string(),
    }
}

// ============================================================================
// Ingest → Lookup
// ============================================================================

#[tokio::test]
async fn test_order_with_live_driver() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", ravi("D9")),
    );

    let (status, body) = f
        .server
        .report(json!({"driver_id": "D9", "lat": 26.91, "lng": 75.78}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "out_for_delivery");
    assert_eq!(body["driver_location"]["latitude"], 26.91);
    assert_eq!(body["driver_location"]["longitude"], 75.78);
    assert_eq!(
        body["driver_location"]["recorded_at"],
        "2023-11-14T22:13:20Z"
    );
    assert_eq!(body["driver"]["name"], "Ravi Kumar");
    assert_eq!(body["driver"]["mobile_no"], "9829012345");
    assert!(body.get("message").is_none());

    f.server.stop().await;
}

#[tokio::test]
async fn test_numeric_driver_id_and_string_coordinates() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(7),
        Assignment::assigned("out_for_delivery", ravi("15")),
    );

    let (status, _) = f
        .server
        .report(json!({"driver_id": 15, "lat": "26.9124", "lng": "75.7873"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = f.server.get("/orders/7/tracking").await;
    assert_eq!(body["driver_location"]["latitude"], 26.9124);

    f.server.stop().await;
}

#[tokio::test]
async fn test_latest_report_wins() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", ravi("D9")),
    );

    f.server
        .report(json!({"driver_id": "D9", "lat": 26.91, "lng": 75.78}))
        .await;
    f.clock.advance(Duration::from_secs(5));
    f.server
        .report(json!({"driver_id": "D9", "lat": 26.92, "lng": 75.79}))
        .await;

    let (_, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(body["driver_location"]["latitude"], 26.92);
    assert_eq!(body["driver_location"]["longitude"], 75.79);
    assert_eq!(f.store.len(), 1);

    f.server.stop().await;
}

// ============================================================================
// Absence states
// ============================================================================

#[tokio::test]
async fn test_order_without_driver() {
    let f = fixture().await;
    f.orders
        .insert(OrderId::from(43), Assignment::unassigned("preparing"));

    let (status, body) = f.server.get("/orders/43/tracking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "status": "preparing",
            "driver_location": null,
            "driver": null,
            "message": "No driver assigned yet"
        })
    );

    f.server.stop().await;
}

#[tokio::test]
async fn test_driver_without_position() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", ravi("D9")),
    );

    let (status, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driver_location"], Value::Null);
    assert_eq!(body["driver"]["name"], "Ravi Kumar");
    assert_eq!(body["message"], "Driver location waiting...");

    f.server.stop().await;
}

#[tokio::test]
async fn test_stale_position_is_not_served() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", ravi("D9")),
    );
    f.server
        .report(json!({"driver_id": "D9", "lat": 26.91, "lng": 75.78}))
        .await;

    f.clock.advance(Duration::from_secs(90));
    let (_, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(body["driver_location"]["latitude"], 26.91);

    f.clock.advance(Duration::from_secs(1));
    let (_, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(body["driver_location"], Value::Null);
    assert_eq!(body["message"], "Driver location waiting...");

    f.server.stop().await;
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_invalid_reports_are_rejected() {
    let f = fixture().await;

    let cases = [
        (json!({"lat": 26.91, "lng": 75.78}), "driver_id is required"),
        (json!({"driver_id": "D1", "lng": 75.78}), "lat is required"),
        (
            json!({"driver_id": "D1", "lat": "north", "lng": 75.78}),
            "lat must be a number",
        ),
    ];
    for (body, message) in cases {
        let (status, response) = f.server.report(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"success": false, "message": message}));
    }

    let (status, response) = f
        .server
        .report(json!({"driver_id": "D1", "lat": 91.0, "lng": 75.78}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert!(f.store.is_empty());

    f.server.stop().await;
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let f = fixture().await;

    let response = f
        .server
        .http
        .post(f.server.url("/driver/location"))
        .body("driver_id=D1&lat=1&lng=2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "body must be a JSON object");

    f.server.stop().await;
}

#[tokio::test]
async fn test_unknown_order() {
    let f = fixture().await;

    let (status, body) = f.server.get("/orders/999/tracking").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Order not found"}));

    f.server.stop().await;
}

#[tokio::test]
async fn test_undecodable_path_segment_gets_json_error() {
    let f = fixture().await;

    let (status, body) = f.server.get("/orders/%FF/tracking").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(!body["message"].as_str().unwrap().is_empty());

    let response = f
        .server
        .http
        .delete(f.server.url("/driver/location/%FF%FE"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    f.server.stop().await;
}

struct DownResolver;

impl AssignmentResolver for DownResolver {
    async fn resolve(&self, _order_id: &OrderId) -> Result<Assignment, AssignmentError> {
        Err(AssignmentError::Unavailable("connection reset".to_string()))
    }
}

struct HangingResolver;

impl AssignmentResolver for HangingResolver {
    async fn resolve(&self, _order_id: &OrderId) -> Result<Assignment, AssignmentError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Assignment::unassigned("pending"))
    }
}

#[tokio::test]
async fn test_resolver_failure_is_503() {
    let server = TestServer::start(Arc::new(PositionStore::default()), DownResolver).await;

    let (status, body) = server.get("/orders/42/tracking").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("retry"));

    server.stop().await;
}

#[tokio::test]
async fn test_resolver_timeout_is_503() {
    let server = TestServer::start(Arc::new(PositionStore::default()), HangingResolver).await;

    let started = std::time::Instant::now();
    let (status, _) = server.get("/orders/42/tracking").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(started.elapsed() < Duration::from_secs(5));

    server.stop().await;
}

// ============================================================================
// Offline, nearby, health
// ============================================================================

#[tokio::test]
async fn test_driver_goes_offline() {
    let f = fixture().await;
    f.orders.insert(
        OrderId::from(42),
        Assignment::assigned("out_for_delivery", ravi("D9")),
    );
    f.server
        .report(json!({"driver_id": "D9", "lat": 26.91, "lng": 75.78}))
        .await;

    let url = f.server.url("/driver/location/D9");

    let response = f.server.http.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "removed": true}));

    let response = f.server.http.delete(&url).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["removed"], false);

    let (_, body) = f.server.get("/orders/42/tracking").await;
    assert_eq!(body["message"], "Driver location waiting...");

    f.server.stop().await;
}

#[tokio::test]
async fn test_nearby_drivers() {
    let f = fixture().await;
    // Jaipur: D1 ~0 km, D2 ~1.1 km, D3 ~2.2 km, far away in Delhi
    for (id, lat, lng) in [
        ("D2", 26.92, 75.78),
        ("D1", 26.91, 75.78),
        ("D3", 26.93, 75.78),
        ("FAR", 28.61, 77.21),
    ] {
        f.server
            .report(json!({"driver_id": id, "lat": lat, "lng": lng}))
            .await;
    }

    let (status, body) = f
        .server
        .get("/drivers/nearby?lat=26.91&lng=75.78&radius_km=10")
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["drivers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["driver_id"].as_str().unwrap())
        .collect();
    // Server caps results at 2
    assert_eq!(ids, vec!["D1", "D2"]);
    assert!(body["drivers"][1]["distance_km"].as_f64().unwrap() > 1.0);

    let (status, body) = f.server.get("/drivers/nearby?lat=26.91").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "lng is required");

    let (status, _) = f
        .server
        .get("/drivers/nearby?lat=26.91&lng=75.78&radius_km=-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = f.server.get("/drivers/nearby?lat=95&lng=75.78").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    f.server.stop().await;
}

#[tokio::test]
async fn test_health_counts() {
    let f = fixture().await;
    f.server
        .report(json!({"driver_id": "D1", "lat": 1.0, "lng": 1.0}))
        .await;
    f.clock.advance(Duration::from_secs(120));
    f.server
        .report(json!({"driver_id": "D2", "lat": 1.0, "lng": 1.0}))
        .await;

    let (status, body) = f.server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], livetrack::VERSION);
    assert_eq!(body["drivers_tracked"], 2);
    assert_eq!(body["drivers_fresh"], 1);

    f.server.stop().await;
}

#[tokio::test]
async fn test_cors_preflight() {
    let f = fixture().await;

    let response = f
        .server
        .http
        .request(reqwest::Method::OPTIONS, f.server.url("/driver/location"))
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );

    f.server.stop().await;
}
