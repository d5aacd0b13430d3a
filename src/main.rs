use {
    order_sync::{
        AppState, CheckoutSettings, WebhookSettings,
        adapters::{mercadopago::MercadoPagoGateway, webhook::WEBHOOK_PATH},
        domain::money::Currency,
        infra::postgres::PgStore,
    },
    sqlx::postgres::PgPoolOptions,
    std::{env, sync::Arc, time::Duration},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let access_token = env::var("MP_ACCESS_TOKEN").expect("MP_ACCESS_TOKEN must be set");
    let webhook_secret = env::var("MP_WEBHOOK_SECRET").expect("MP_WEBHOOK_SECRET must be set");
    let base_url = env::var("PUBLIC_BASE_URL").expect("PUBLIC_BASE_URL must be set");
    let enforce_signature = env::var("MP_ENFORCE_SIGNATURE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .expect("failed to connect to database");

    let base_url = base_url.trim_end_matches('/').to_string();
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        gateway: Arc::new(MercadoPagoGateway::new(access_token)),
        webhook: WebhookSettings {
            secret: webhook_secret.into(),
            enforce_signature,
        },
        checkout: CheckoutSettings {
            notification_url: format!("{base_url}{WEBHOOK_PATH}").into(),
            base_url: base_url.into(),
            currency: Currency::Mxn,
        },
    };

    let app = order_sync::app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on 0.0.0.0:3000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
