mod common;

use {
    axum::{
        body::Body,
        http::{Request, StatusCode},
    },
    common::*,
    hmac::{Hmac, Mac},
    order_sync::{
        AppState, CheckoutSettings, WebhookSettings, app,
        domain::money::Currency,
        infra::postgres::PgStore,
    },
    sha2::Sha256,
    sqlx::PgPool,
    std::sync::Arc,
    tower::ServiceExt,
};

const SECRET: &str = "test-secret";

fn test_state(pool: &PgPool, gateway: Arc<FakeGateway>, enforce_signature: bool) -> AppState {
    AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        gateway,
        webhook: WebhookSettings {
            secret: SECRET.into(),
            enforce_signature,
        },
        checkout: CheckoutSettings {
            base_url: "https://shop.example".into(),
            notification_url: "https://shop.example/webhooks/mercadopago".into(),
            currency: Currency::Mxn,
        },
    }
}

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    format!("ts=1704908010,v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/mercadopago")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-signature", sig);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ── 1. malformed_body_is_acknowledged_without_writes ───────────────────────

#[tokio::test]
async fn malformed_body_is_acknowledged_without_writes() {
    let pool = setup_pool("order_sync_test_webhook").await;
    let gateway = Arc::new(FakeGateway::new());
    let app = app(test_state(&pool, gateway.clone(), false));

    let response = app
        .oneshot(webhook_request("{not json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(gateway.fetches.lock().unwrap().is_empty());
}

// ── 2. non_payment_topic_is_acknowledged_without_writes ────────────────────

#[tokio::test]
async fn non_payment_topic_is_acknowledged_without_writes() {
    let pool = setup_pool("order_sync_test_webhook").await;
    let gateway = Arc::new(FakeGateway::new());
    let app = app(test_state(&pool, gateway.clone(), false));

    let body = r#"{"type":"merchant_order","data":{"id":"555111"}}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(gateway.fetches.lock().unwrap().is_empty());
    assert!(get_payment_row(&pool, "555111").await.is_none());
}

// ── 3. missing_payment_id_is_acknowledged ──────────────────────────────────

#[tokio::test]
async fn missing_payment_id_is_acknowledged() {
    let pool = setup_pool("order_sync_test_webhook").await;
    let gateway = Arc::new(FakeGateway::new());
    let app = app(test_state(&pool, gateway.clone(), false));

    let body = r#"{"type":"payment"}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(gateway.fetches.lock().unwrap().is_empty());
}

// ── 4. payment_notification_reconciles_order ───────────────────────────────
// End-to-end through the router, signature enforcement off (no header at
// all): order ends up paid and audited.

#[tokio::test]
async fn payment_notification_reconciles_order() {
    let pool = setup_pool("order_sync_test_webhook").await;
    seed_order(&pool, "ORD-WH-1", "pending_payment").await;

    let gateway = Arc::new(
        FakeGateway::new().with_payment(fake_payment("999", "approved", 800, Some("ORD-WH-1"))),
    );
    let app = app(test_state(&pool, gateway, false));

    let body = r#"{"type":"payment","data":{"id":"999"}}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let order = get_order(&pool, "ORD-WH-1").await.unwrap();
    assert_eq!(order.status, "paid");
    assert_eq!(order.payment_id.as_deref(), Some("999"));
    assert_eq!(count_payments_for(&pool, "999").await, 1);
    let audit = get_payment_row(&pool, "999").await.unwrap();
    assert_eq!(audit.amount_cents, 80000);
}

// ── 5. top_level_action_and_id_shape_is_accepted ───────────────────────────

#[tokio::test]
async fn top_level_action_and_id_shape_is_accepted() {
    let pool = setup_pool("order_sync_test_webhook").await;
    seed_order(&pool, "ORD-WH-2", "pending_payment").await;

    let gateway = Arc::new(
        FakeGateway::new().with_payment(fake_payment("123456", "rejected", 300, Some("ORD-WH-2"))),
    );
    let app = app(test_state(&pool, gateway, false));

    let body = r#"{"action":"payment","id":123456}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let order = get_order(&pool, "ORD-WH-2").await.unwrap();
    assert_eq!(order.status, "created");
}

// ── 6. enforced_bad_signature_is_rejected_without_writes ───────────────────

#[tokio::test]
async fn enforced_bad_signature_is_rejected_without_writes() {
    let pool = setup_pool("order_sync_test_webhook").await;
    seed_order(&pool, "ORD-WH-3", "pending_payment").await;

    let gateway = Arc::new(
        FakeGateway::new().with_payment(fake_payment("42", "approved", 100, Some("ORD-WH-3"))),
    );
    let app = app(test_state(&pool, gateway.clone(), true));

    let body = r#"{"type":"payment","data":{"id":"42"}}"#;
    let bad_sig = "ts=1704908010,v1=0000000000000000000000000000000000000000000000000000000000000000";
    let response = app.oneshot(webhook_request(body, Some(bad_sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(gateway.fetches.lock().unwrap().is_empty());
    assert!(get_payment_row(&pool, "42").await.is_none());
    let order = get_order(&pool, "ORD-WH-3").await.unwrap();
    assert_eq!(order.status, "pending_payment");
}

// ── 7. enforced_missing_signature_is_rejected ──────────────────────────────

#[tokio::test]
async fn enforced_missing_signature_is_rejected() {
    let pool = setup_pool("order_sync_test_webhook").await;
    let gateway = Arc::new(FakeGateway::new());
    let app = app(test_state(&pool, gateway.clone(), true));

    let body = r#"{"type":"payment","data":{"id":"42"}}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(gateway.fetches.lock().unwrap().is_empty());
}

// ── 8. enforced_valid_signature_is_processed ───────────────────────────────

#[tokio::test]
async fn enforced_valid_signature_is_processed() {
    let pool = setup_pool("order_sync_test_webhook").await;
    seed_order(&pool, "ORD-WH-4", "pending_payment").await;

    let gateway = Arc::new(
        FakeGateway::new().with_payment(fake_payment("314", "approved", 150, Some("ORD-WH-4"))),
    );
    let app = app(test_state(&pool, gateway, true));

    let body = r#"{"type":"payment","data":{"id":"314"}}"#;
    let sig = sign(body);
    let response = app.oneshot(webhook_request(body, Some(&sig))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let order = get_order(&pool, "ORD-WH-4").await.unwrap();
    assert_eq!(order.status, "paid");
}

// ── 9. provider_fetch_failure_returns_retryable_error ──────────────────────
// Unknown payment id → gateway 404s → the handler must NOT ack, so the
// provider's redelivery covers the gap.

#[tokio::test]
async fn provider_fetch_failure_returns_retryable_error() {
    let pool = setup_pool("order_sync_test_webhook").await;
    let gateway = Arc::new(FakeGateway::new());
    let app = app(test_state(&pool, gateway, false));

    let body = r#"{"type":"payment","data":{"id":"31415"}}"#;
    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(get_payment_row(&pool, "31415").await.is_none());
}
