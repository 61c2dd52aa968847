use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use ridereel_api::{AppStateInner, router};
use ridereel_db::{MemStore, Store};
use ridereel_payments::{CardProvider, WalletProvider};
use ridereel_types::{NewEvent, NewPurchase, NewRider, PaymentMethod};

const ADMIN_PASSWORD: &str = "correct-horse-battery";

fn test_app() -> (Router, Arc<dyn Store>) {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();
    store.create_user("admin", &hash).unwrap();

    let state = Arc::new(AppStateInner {
        store: store.clone(),
        jwt_secret: "test-secret".to_string(),
        card: Arc::new(CardProvider),
        wallet: Arc::new(WalletProvider),
    });

    (router(state), store)
}

fn seed_event(store: &dyn Store, name: &str) -> i64 {
    store
        .create_event(&NewEvent {
            name: name.to_string(),
            date: "June 15-17, 2023".to_string(),
            thumbnail_url: "https://example.com/e.jpg".to_string(),
        })
        .unwrap()
        .id
}

fn seed_rider(store: &dyn Store, event_id: i64, name: &str) -> i64 {
    store
        .create_rider(&NewRider {
            name: name.to_string(),
            event_id,
            price: 80,
            thumbnail_url: "https://example.com/r.jpg".to_string(),
            video_url: "https://example.com/r.mp4".to_string(),
        })
        .unwrap()
        .id
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_token(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    req
}

async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, req).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/login",
            &json!({ "username": "admin", "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "username": "admin", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "username": "nobody", "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn current_user_reflects_token() {
    let (app, _store) = test_app();
    let token = login(&app).await;

    let (status, body) = send(&app, with_token(get("/api/user"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");

    let (status, _) = send(&app, get("/api/user")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_writes_require_auth() {
    let (app, _store) = test_app();

    let event = json!({
        "name": "Spring Classic",
        "date": "May 1-2, 2024",
        "thumbnailUrl": "https://example.com/e.jpg"
    });

    let (status, body) = send(&app, post_json("/api/events", &event)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let token = login(&app).await;
    let (status, created) = send(&app, with_token(post_json("/api/events", &event), &token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Spring Classic");

    let (status, listed) = send(&app, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_event_cascades_and_404s_after() {
    let (app, store) = test_app();
    let token = login(&app).await;

    let event_id = seed_event(store.as_ref(), "Gone Soon");
    seed_rider(store.as_ref(), event_id, "Jane");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/events/{}", event_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, with_token(req, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = send(&app, get(&format!("/api/events/{}", event_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, riders) = send(&app, get(&format!("/api/riders?eventId={}", event_id))).await;
    assert_eq!(riders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn rider_creation_rejects_unknown_event() {
    let (app, _store) = test_app();
    let token = login(&app).await;

    let rider = json!({
        "name": "Jane",
        "eventId": 999,
        "price": 80,
        "thumbnailUrl": "https://example.com/t.jpg",
        "videoUrl": "https://example.com/v.mp4"
    });
    let (status, body) = send(&app, with_token(post_json("/api/riders", &rider), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "eventId");
}

#[tokio::test]
async fn purchase_unlocks_exactly_one_rider() {
    let (app, store) = test_app();
    let event_id = seed_event(store.as_ref(), "Summer Showdown");
    let rider_id = seed_rider(store.as_ref(), event_id, "Jane");
    let other_id = seed_rider(store.as_ref(), event_id, "Amy");

    let check = format!("/api/purchases/check?email=Jane@Example.com&riderId={}", rider_id);
    let (status, body) = send(&app, get(&check)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purchased"], false);

    let (status, created) = send(
        &app,
        post_json(
            "/api/purchases",
            &json!({
                "email": "jane@example.com",
                "riderId": rider_id,
                "paymentMethod": "stripe",
                "amount": 40,
                "quantity": 2
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["paymentMethod"], "stripe");
    assert_eq!(created["amount"], 40);

    // Case-insensitive on email.
    let (_, body) = send(&app, get(&check)).await;
    assert_eq!(body["purchased"], true);

    let other_check = format!("/api/purchases/check?email=jane@example.com&riderId={}", other_id);
    let (_, body) = send(&app, get(&other_check)).await;
    assert_eq!(body["purchased"], false);
}

#[tokio::test]
async fn purchase_validation_lists_field_errors() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/purchases",
            &json!({
                "email": "  ",
                "riderId": 1,
                "paymentMethod": "cash",
                "amount": 20,
                "quantity": 9
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid purchase data");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn check_requires_both_params() {
    let (app, _store) = test_app();
    let (status, body) = send(&app, get("/api/purchases/check?email=jane@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and riderId are required");
}

#[tokio::test]
async fn sales_stats_survive_rider_deletion() {
    let (app, store) = test_app();
    let token = login(&app).await;

    let event_id = seed_event(store.as_ref(), "Fall Finals");
    let r1 = seed_rider(store.as_ref(), event_id, "Jane");
    let r2 = seed_rider(store.as_ref(), event_id, "Amy");

    for (email, rider_id) in [("a@x.com", r1), ("b@x.com", r1), ("c@x.com", r2)] {
        store
            .record_purchase(&NewPurchase {
                email: email.to_string(),
                rider_id,
                payment_method: PaymentMethod::Paypal,
                amount: 20,
            })
            .unwrap();
    }
    store.delete_rider(r1).unwrap();

    let (status, body) = send(&app, with_token(get("/api/stats/sales"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let row = body
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["eventId"] == event_id)
        .unwrap();
    assert_eq!(row["salesCount"], 3);
    // Fixed $80 reporting price, not the rider's own.
    assert_eq!(row["revenue"], 240);
}

#[tokio::test]
async fn import_commits_only_valid_rows() {
    let (app, store) = test_app();
    let token = login(&app).await;
    seed_event(store.as_ref(), "Spring Classic");

    let csv = "Rider Name,Event,Price,Video URL,Thumbnail URL\n\
               \"Jane Doe\",\"Spring Classic\",80,\"https://youtu.be/abc123\",\"\"\n\
               \"Bob\",\"No Such Event\",80,\"https://example.com/b.mp4\",\"\"";

    let (status, preview) = send(
        &app,
        with_token(post_json("/api/riders/import/preview", &json!({ "csv": csv })), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["valid"], 1);
    assert_eq!(preview["invalid"], 1);
    assert_eq!(preview["rows"][1]["error"], "Event not found");

    let (status, summary) = send(
        &app,
        with_token(post_json("/api/riders/import", &json!({ "csv": csv })), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["success"], 1);
    assert_eq!(summary["failed"], 0);

    let riders = store.list_riders().unwrap();
    assert_eq!(riders.len(), 1);
    assert_eq!(riders[0].name, "Jane Doe");
    assert_eq!(
        riders[0].thumbnail_url,
        "https://img.youtube.com/vi/abc123/hqdefault.jpg"
    );
}

#[tokio::test]
async fn structurally_broken_import_fails_whole_batch() {
    let (app, _store) = test_app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        with_token(
            post_json("/api/riders/import", &json!({ "csv": "just one line" })),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "CSV file must have at least a header row and one data row"
    );
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let (app, store) = test_app();
    let token = login(&app).await;
    let event_id = seed_event(store.as_ref(), "Spring Classic");
    seed_rider(store.as_ref(), event_id, "Jane Doe");

    let resp = app
        .clone()
        .oneshot(with_token(get("/api/riders/export"), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Rider Name,Event,Price,Video URL,Thumbnail URL\n"));
    assert!(text.contains("\"Jane Doe\",\"Spring Classic\""));
}

#[tokio::test]
async fn payment_intent_returns_simulated_secret() {
    let (app, _store) = test_app();
    let (status, body) = send(
        &app,
        post_json("/api/create-payment-intent", &json!({ "amount": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["clientSecret"]
            .as_str()
            .unwrap()
            .starts_with("pi_simulated_")
    );
}

#[tokio::test]
async fn paypal_order_validation_and_capture() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        post_json("/paypal/order", &json!({ "amount": "40.00", "intent": "capture" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid currency. Currency is required.");

    let (status, order) = send(
        &app,
        post_json(
            "/paypal/order",
            &json!({ "amount": "40.00", "currency": "USD", "intent": "capture" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = order["id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("SIMULATED_ORDER_"));
    assert_eq!(order["status"], "CREATED");

    let (status, capture) = send(
        &app,
        post_json(&format!("/paypal/order/{}/capture", order_id), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(capture["status"], "COMPLETED");
    assert_eq!(capture["payer"]["email_address"], "simulated-buyer@example.com");

    // A confirmation failure grants nothing and is surfaced as retryable.
    let (status, _) = send(
        &app,
        post_json("/paypal/order/not-a-real-order/capture", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn paypal_setup_returns_client_token() {
    let (app, _store) = test_app();
    let (status, body) = send(&app, get("/paypal/setup")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["clientToken"],
        "placeholder_token_until_real_credentials_are_provided"
    );
}
