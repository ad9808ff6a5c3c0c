/// Handler-level tests for the HTTP surface
///
/// Run with: cargo test --test server_tests -- --nocapture
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    Json,
};
use delivery_predictor::{
    server::{self, AppState},
    ArtifactBundle, RawRecord,
};
use serde_json::Value;
use std::path::Path;
use tower::ServiceExt;

fn state() -> AppState {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/delivery_time.json");
    let bundle = ArtifactBundle::load(&path).expect("fixture bundle should load");
    AppState::new(bundle, true)
}

fn record(weather: &str, distance_km: f64) -> RawRecord {
    RawRecord {
        order_id: 1,
        distance_km,
        weather: weather.into(),
        traffic_level: "Low".into(),
        time_of_day: "Morning".into(),
        vehicle_type: "Bike".into(),
        preparation_time_min: 15,
        courier_experience_yrs: 2,
    }
}

#[tokio::test]
async fn test_predict_success() {
    println!("\n=== Test: POST /predict ===");
    let Json(out) = server::predict(State(state()), Ok(Json(record("Sunny", 10.0))))
        .await
        .expect("prediction should succeed");

    assert!((out.prediction - 57.2744).abs() < 1e-9);
    assert_eq!(out.rounded, 57.27);
    assert_eq!(out.message, "Estimated Delivery Time: 57.27 minutes");
    println!("✓ {}", out.message);
}

#[tokio::test]
async fn test_predict_unknown_category() {
    let (status, Json(body)) = server::predict(State(state()), Ok(Json(record("Hail", 10.0))))
        .await
        .expect_err("unknown weather must fail");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "encoding");
    assert_eq!(body["error"], "Error: unknown Weather category \"Hail\"");
}

#[tokio::test]
async fn test_predict_validation_error() {
    let (status, Json(body)) = server::predict(State(state()), Ok(Json(record("Sunny", -1.0))))
        .await
        .expect_err("negative distance must fail");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("Distance_km"));
}

#[tokio::test]
async fn test_options_follow_encoder_order() {
    println!("\n=== Test: GET /options ===");
    let Json(opts) = server::options(State(state())).await;

    let names: Vec<_> = opts.categorical.iter().map(|c| c.name).collect();
    assert_eq!(names, ["Weather", "Traffic_Level", "Time_of_Day", "Vehicle_Type"]);
    assert_eq!(
        opts.categorical[3].options,
        vec!["Scooter".to_string(), "Bike".into(), "Car".into()]
    );

    let distance = opts
        .numeric
        .iter()
        .find(|f| f.name == "Distance_km")
        .unwrap();
    assert_eq!(distance.min, 0.0);
    assert_eq!(distance.step, 0.1);
    assert!(!distance.integer);
    println!("✓ {} categorical, {} numeric", opts.categorical.len(), opts.numeric.len());
}

#[tokio::test]
async fn test_health_reports_dimensions() {
    let Json(body) = server::health(State(state())).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["in_dim"], 8);
    assert_eq!(body["expanded_dim"], 45);
}

// ---------- Through the router ----------

async fn post_predict(body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = server::router(state()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    println!("\n=== Test: Missing Field ===");
    let (status, body) = post_predict(
        r#"{"order_id":1,"distance_km":10.0,"traffic_level":"Low","time_of_day":"Morning",
            "vehicle_type":"Bike","preparation_time_min":15,"courier_experience_yrs":2}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");
    let msg = body["error"].as_str().unwrap();
    assert!(msg.starts_with("Error: "));
    assert!(msg.contains("weather"));
    println!("✓ {}", msg);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let (status, body) = post_predict(r#"{"order_id":1,"distance_km":"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_router_predicts_dataset_column_names() {
    let (status, body) = post_predict(
        r#"{"Order_ID":1,"Distance_km":10.0,"Weather":"Sunny","Traffic_Level":"Low",
            "Time_of_Day":"Morning","Vehicle_Type":"Bike","Preparation_Time_min":15,
            "Courier_Experience_yrs":2}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounded"], 57.27);
    assert_eq!(body["message"], "Estimated Delivery Time: 57.27 minutes");
}
