use std::str::FromStr;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use stocky_server::{api::app_router, build_state, config::Config};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const USER: &str = "3f2b8c4e-9d1a-4e5b-8f6c-7a2d1e0b9c3f";

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "STOCKY_DB_PATH" => Some(db_path.clone()),
        "PRICE_RANDOM_SEED" => Some("42".to_string()),
        _ => None,
    })
    .unwrap();
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.to_string().trim_matches('"')).unwrap()
}

fn reward_body(event_id: &str, symbol: &str, shares: &str) -> Value {
    json!({
        "userId": USER,
        "symbol": symbol,
        "shares": shares,
        "eventId": event_id,
    })
}

#[tokio::test]
async fn healthz_works() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn reward_is_created_and_priced_with_fees() {
    let (app, _tmp) = build_test_router().await;

    let (status, event) = send(
        &app,
        Method::POST,
        "/api/v1/reward",
        Some(reward_body("evt-1", " reliance ", "10.5")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["symbol"], "RELIANCE");
    assert_eq!(event["userId"], USER);
    assert_eq!(event["eventKey"], "evt-1");

    let price = decimal(&event["grantedPrice"]);
    assert!(price > Decimal::ZERO);
    let cost = (price * dec!(10.5)).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    let total = decimal(&event["totalCashOutInr"]);
    assert_eq!(
        total,
        cost + decimal(&event["brokerageInr"]) + decimal(&event["taxesInr"])
    );

    let id = event["id"].as_str().unwrap();
    let (status, detail) = send(&app, Method::GET, &format!("/api/v1/rewards/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let ledger = detail["ledger"].as_array().unwrap();
    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger[0]["accountCode"], "stock_inventory:RELIANCE");
    let debits: Decimal = ledger.iter().map(|e| decimal(&e["debitInr"])).sum();
    let credits: Decimal = ledger.iter().map(|e| decimal(&e["creditInr"])).sum();
    assert_eq!(debits, credits);
    assert_eq!(credits, total);
}

#[tokio::test]
async fn duplicate_event_is_a_conflict() {
    let (app, _tmp) = build_test_router().await;
    let body = reward_body("evt-dup", "TCS", "2");

    let (status, _) = send(&app, Method::POST, "/api/v1/reward", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&app, Method::POST, "/api/v1/reward", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], 409);
    assert!(error["message"].as_str().unwrap().contains("evt-dup"));

    let (_, positions) = send(&app, Method::GET, &format!("/api/v1/portfolio/{}", USER), None).await;
    assert_eq!(decimal(&positions[0]["shares"]), dec!(2));
}

#[tokio::test]
async fn invalid_requests_are_rejected_with_400() {
    let (app, _tmp) = build_test_router().await;

    let mut not_uuid = reward_body("evt-x", "TCS", "1");
    not_uuid["userId"] = json!("alice");
    let (status, error) = send(&app, Method::POST, "/api/v1/reward", Some(not_uuid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/reward",
        Some(reward_body("evt-y", "TCS", "0")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, error) = send(&app, Method::POST, "/api/v1/reward", Some(json!({"symbol": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);

    let (status, _) = send(&app, Method::GET, "/api/v1/stats/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn read_views_reflect_todays_rewards() {
    let (app, _tmp) = build_test_router().await;
    for (event_id, symbol, shares) in [("e1", "TCS", "1"), ("e2", "TCS", "2"), ("e3", "INFY", "4")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/reward",
            Some(reward_body(event_id, symbol, shares)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, today) = send(&app, Method::GET, &format!("/api/v1/today-stocks/{}", USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today.as_array().unwrap().len(), 3);

    let (_, stats) = send(&app, Method::GET, &format!("/api/v1/stats/{}", USER), None).await;
    let totals = stats["totalsToday"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["symbol"], "INFY");
    assert_eq!(decimal(&totals[1]["shares"]), dec!(3));
    assert!(decimal(&stats["portfolioInr"]) > Decimal::ZERO);

    let (_, positions) = send(&app, Method::GET, &format!("/api/v1/portfolio/{}", USER), None).await;
    let positions = positions.as_array().unwrap();
    assert_eq!(positions.len(), 2);
    for position in positions {
        let value = decimal(&position["currentValueInr"]);
        let shares = decimal(&position["shares"]);
        let price = decimal(&position["currentPriceInr"]);
        assert_eq!(
            value,
            (shares * price).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        );
    }

    let (status, history) = send(&app, Method::GET, &format!("/api/v1/historical-inr/{}", USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_reward_is_404_and_unknown_user_is_empty() {
    let (app, _tmp) = build_test_router().await;

    let (status, error) = send(&app, Method::GET, "/api/v1/rewards/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], 404);

    let stranger = "00000000-0000-4000-8000-000000000000";
    let (status, stats) = send(&app, Method::GET, &format!("/api/v1/stats/{}", stranger), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["totalsToday"].as_array().unwrap().is_empty());
    assert_eq!(decimal(&stats["portfolioInr"]), Decimal::ZERO);
}

#[tokio::test]
async fn oversized_share_count_is_rejected_with_400() {
    let (app, _tmp) = build_test_router().await;

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/reward",
        Some(reward_body("evt-huge", "TCS", "10000000000000000000000000")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);
    assert!(error["message"].as_str().unwrap().contains("out of range"));

    let (status, positions) = send(&app, Method::GET, &format!("/api/v1/portfolio/{}", USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(positions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reward_time_round_trips_at_stored_precision() {
    let (app, _tmp) = build_test_router().await;

    let mut body = reward_body("evt-nanos", "TCS", "1");
    body["rewardedAt"] = json!("2024-05-01T10:00:00.123456789Z");
    let (status, created) = send(&app, Method::POST, "/api/v1/reward", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let parse = |value: &Value| {
        chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap())
            .unwrap()
            .with_timezone(&chrono::Utc)
    };
    let expected = parse(&json!("2024-05-01T10:00:00.123456Z"));
    assert_eq!(parse(&created["rewardedAt"]), expected);

    let id = created["id"].as_str().unwrap();
    let (status, detail) = send(&app, Method::GET, &format!("/api/v1/rewards/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&detail["rewardedAt"]), expected);

    let mut far_future = reward_body("evt-far", "TCS", "1");
    far_future["rewardedAt"] = json!("+10000-01-01T00:00:00Z");
    let (status, _) = send(&app, Method::POST, "/api/v1/reward", Some(far_future)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
