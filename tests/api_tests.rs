mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{csv_text, test_state, Row};
use hedgescan::api::router::create_router;
use hedgescan::AppState;

const BOUNDARY: &str = "----hedgescan-test-boundary";

fn build_test_app() -> axum::Router {
    create_router(test_state())
}

fn multipart_body(file_name: &str, content: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
    ));
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn sample_csv() -> String {
    csv_text(&[
        Row::new("h1", "LONG", "NQM5", 100.0).owner("user_1", "acct_1"),
        Row::new("h2", "SHORT", "MNQM5", 101.0).owner("user_2", "acct_2"),
        Row::new("h3", "SHORT", "NQM5", 100.5).owner("user_1", "acct_3"),
        Row::new("h4", "LONG", "ESU4", 5000.0).owner("user_3", "acct_4"),
    ])
}

#[tokio::test]
async fn test_health_check() {
    let app = build_test_app();

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = build_test_app();

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_analyze_upload() {
    let app = build_test_app();
    let body = multipart_body(
        "trades.csv",
        &sample_csv(),
        &[
            ("price_threshold", "5"),
            ("confidence_threshold", "0.5"),
            ("include_close_price", "false"),
        ],
    );

    let resp = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    let pairs = json["hedge_pairs"].as_array().unwrap();
    // h1-h2 (cross-actor) and h1-h3 (self); h2-h3 share a direction
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["id"], 1);
    assert_eq!(pairs[0]["type"], "cross-actor");
    assert_eq!(pairs[0]["instrument"], "NQ");
    assert_eq!(pairs[0]["trade1"]["entry_time"], "2024-03-01 14:30:00");
    assert_eq!(pairs[1]["type"], "self");

    assert_eq!(json["total_matching"], 2);
    assert_eq!(json["summary_stats"]["total_hedges"], 2);
    assert_eq!(json["summary_stats"]["self_hedges"], 1);
    assert_eq!(json["summary_stats"]["cross_actor_hedges"], 1);
    assert_eq!(json["summary_stats"]["actors_involved"], 2);
    assert_eq!(json["notable_patterns"]["instrument_distribution"][0]["instrument"], "NQ");
    assert_eq!(json["notable_patterns"]["peak_hours"][0]["hour"], 14);
    assert_eq!(json["distributions"]["hourly"][14], 2);
}

#[tokio::test]
async fn test_analyze_upload_with_view() {
    let app = build_test_app();
    let body = multipart_body(
        "trades.csv",
        &sample_csv(),
        &[("confidence_threshold", "0.5"), ("include_close_price", "false")],
    );

    let resp = app
        .oneshot(upload_request("/api/analyze?type=self&sort=confidence-desc", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    assert_eq!(json["hedge_pairs"].as_array().unwrap().len(), 1);
    assert_eq!(json["hedge_pairs"][0]["type"], "self");
    assert_eq!(json["total_matching"], 1);
    // stats still cover every pair
    assert_eq!(json["summary_stats"]["total_hedges"], 2);
}

#[tokio::test]
async fn test_analyze_rejects_non_csv() {
    let app = build_test_app();
    let body = multipart_body("trades.xlsx", &sample_csv(), &[]);

    let resp = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = read_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "File must be a CSV");
}

#[tokio::test]
async fn test_analyze_missing_column() {
    let app = build_test_app();
    let body = multipart_body("trades.csv", "tradehash,short_long\nh1,LONG\n", &[]);

    let resp = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = read_json(resp).await;
    assert_eq!(json["error"], "Required column 'asset' not found in trade table");
}

#[tokio::test]
async fn test_analyze_invalid_threshold() {
    let app = build_test_app();
    let body = multipart_body("trades.csv", &sample_csv(), &[("price_threshold", "0")]);

    let resp = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_json_rows() {
    let app = build_test_app();
    let request = json!({
        "price_threshold": 5,
        "confidence_threshold": 0.5,
        "include_close_price": false,
        "rows": [
            {
                "tradehash": "j1", "short_long": "LONG", "asset": "MESU4",
                "entry_datetimes": [1709303400000i64], "market_entries": [5000],
                "close_datetimes": [1709305200000i64], "market_closes": [5001],
                "account_id": "a1", "user_id": 1, "net_profit": 25.0,
                "total_contracts": 2, "avg_market_entry": 5000, "avg_market_close": 5001
            },
            {
                "tradehash": "j2", "short_long": "SHORT", "asset": "ESU4",
                "entry_datetimes": "[1709304000000]", "market_entries": "[5001]",
                "close_datetimes": "[1709306000000]", "market_closes": "[5002]",
                "account_id": "a2", "user_id": 2, "net_profit": -20.0,
                "total_contracts": 2, "avg_market_entry": 5001, "avg_market_close": 5002
            }
        ]
    });

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze/json")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    let pairs = json["hedge_pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["instrument"], "ES");
    assert_eq!(pairs[0]["trade1"]["actor_id"], "1");
    assert_eq!(pairs[0]["net_profit"], 5.0);
}

#[tokio::test]
async fn test_export_csv_roundtrip_from_analysis() {
    let app = build_test_app();
    let body = multipart_body(
        "trades.csv",
        &sample_csv(),
        &[("confidence_threshold", "0.5"), ("include_close_price", "false")],
    );
    let resp = app
        .clone()
        .oneshot(upload_request("/api/analyze", body))
        .await
        .unwrap();
    let json = read_json(resp).await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/export/csv")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json["hedge_pairs"].to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("hedge_pairs_export.csv"));

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Pair ID,Type,Instrument"));
    assert!(lines[1].starts_with("1,cross-actor,NQ,"));
}

#[tokio::test]
async fn test_api_token_required_when_configured() {
    let mut state: AppState = test_state();
    state.config.api_token = Some("secret".into());
    let app = create_router(state);

    let body = multipart_body("trades.csv", &sample_csv(), &[]);
    let resp = app
        .clone()
        .oneshot(upload_request("/api/analyze", body.clone()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let mut authed = upload_request("/api/analyze", body);
    authed
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
    let resp = app.oneshot(authed).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // health stays public
    let resp = build_test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
