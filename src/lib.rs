pub mod adapters;
pub mod domain;
pub mod infra;
pub mod services;

use {
    crate::domain::{money::Currency, provider::PaymentGateway, store::Store},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    std::{sync::Arc, time::Duration},
    tower_http::timeout::TimeoutLayer,
};

#[derive(Clone)]
pub struct WebhookSettings {
    pub secret: Arc<str>,
    /// When off (the default), a signature mismatch is logged and the
    /// notification still processed; when on, it is rejected with 401.
    pub enforce_signature: bool,
}

#[derive(Clone)]
pub struct CheckoutSettings {
    pub base_url: Arc<str>,
    pub notification_url: Arc<str>,
    pub currency: Currency,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub webhook: WebhookSettings,
    pub checkout: CheckoutSettings,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/checkout/preference",
            post(adapters::checkout::create_preference_handler),
        )
        .route(
            adapters::webhook::WEBHOOK_PATH,
            post(adapters::webhook::mercadopago_webhook_handler),
        )
        .layer(DefaultBodyLimit::max(64 * 1024)) // notifications are tiny
        .layer(TimeoutLayer::new(Duration::from_secs(15)))
        .with_state(state)
}
