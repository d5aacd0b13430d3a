use {
    crate::{
        AppState,
        adapters::{api_errors::ApiError, signature},
        domain::{error::SyncError, id::PaymentId},
        services::reconciler::{ReconcileOutcome, WebhookNotification, reconcile_payment},
    },
    axum::{Json, extract::State, http::HeaderMap},
};

pub const WEBHOOK_PATH: &str = "/webhooks/mercadopago";

/// Mercado Pago notification endpoint. The body is taken raw so signature
/// verification runs over the exact bytes received; parsing happens after.
/// Malformed bodies and foreign topics are acknowledged without any writes so
/// the provider stops redelivering them. Provider and database failures
/// bubble up as 5xx and Mercado Pago's own redelivery acts as the retry.
#[tracing::instrument(
    name = "mp_webhook",
    skip_all,
    fields(payment_id = tracing::field::Empty, topic = tracing::field::Empty)
)]
pub async fn mercadopago_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "malformed webhook body, acknowledging");
            return Ok(Json(serde_json::json!({"status": "ignored_malformed"})));
        }
    };

    let sig_header = headers.get("x-signature").and_then(|v| v.to_str().ok());
    let verified = match sig_header {
        Some(header) => signature::verify(header, &state.webhook.secret, body.as_bytes()),
        None => Err(SyncError::Signature("missing x-signature header".into())),
    };
    if let Err(err) = verified {
        if state.webhook.enforce_signature {
            return Err(err.into());
        }
        tracing::warn!(error = %err, "webhook signature verification failed, continuing");
    }

    let topic = extract_topic(&payload);
    let payment_id = extract_payment_id(&payload);
    tracing::Span::current().record("topic", tracing::field::debug(&topic));

    let (Some("payment"), Some(payment_id)) = (topic, payment_id) else {
        tracing::info!("non-payment notification, acknowledging");
        return Ok(Json(serde_json::json!({"status": "ignored_topic"})));
    };
    tracing::Span::current().record("payment_id", tracing::field::display(&payment_id));

    let notification = WebhookNotification {
        payment_id: PaymentId::new(payment_id)?,
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    match reconcile_payment(&*state.store, &*state.gateway, &notification).await? {
        ReconcileOutcome::Applied {
            order_id,
            order_status,
        } => {
            tracing::info!(order_id = %order_id, status = %order_status, "order reconciled");
            Ok(Json(serde_json::json!({"status": "applied"})))
        }
        ReconcileOutcome::Orphan { payment_id } => {
            tracing::warn!(payment_id = %payment_id, "payment has no external reference");
            Ok(Json(serde_json::json!({"status": "orphan"})))
        }
        ReconcileOutcome::OrderMissing { order_id } => {
            tracing::warn!(order_id = %order_id, "no order row for external reference");
            Ok(Json(serde_json::json!({"status": "order_missing"})))
        }
    }
}

/// Topic arrives as `type` on most notifications and as `action` on older
/// ones; first one present wins.
fn extract_topic(payload: &serde_json::Value) -> Option<&str> {
    payload
        .get("type")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("action").and_then(|v| v.as_str()))
}

/// Payment id arrives as `data.id` or top-level `id`, as a string or a
/// number.
fn extract_payment_id(payload: &serde_json::Value) -> Option<String> {
    let value = payload
        .get("data")
        .and_then(|d| d.get("id"))
        .or_else(|| payload.get("id"))?;
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
