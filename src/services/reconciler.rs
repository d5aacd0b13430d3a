use crate::domain::{
    error::SyncError,
    id::{OrderId, PaymentId},
    order::{OrderPaymentUpdate, OrderStatus},
    payment::PaymentRecord,
    provider::PaymentGateway,
    store::Store,
};

pub const PROVIDER_NAME: &str = "mercadopago";

/// Payment notification after the handler has peeled it out of the webhook
/// payload.
#[derive(Debug, Clone)]
pub struct WebhookNotification {
    pub payment_id: PaymentId,
    /// Provider `x-request-id`, stored on the order for traceability.
    pub request_id: Option<String>,
}

#[derive(Debug)]
pub enum ReconcileOutcome {
    /// Audit row upserted and the order written.
    Applied {
        order_id: OrderId,
        order_status: OrderStatus,
    },
    /// Payment carries no external reference — audit row upserted, no order
    /// touched.
    Orphan { payment_id: PaymentId },
    /// External reference matched no order row — audit row upserted, nothing
    /// updated.
    OrderMissing { order_id: OrderId },
}

/// Webhook Reconciler. Fetches the authoritative payment resource (the
/// notification payload is never trusted for amounts or status), upserts the
/// audit record keyed by payment id, then maps the provider status onto the
/// order named by the provider's external reference. The audit upsert and the
/// order write are each idempotent, so redelivery of the same notification is
/// harmless.
pub async fn reconcile_payment(
    store: &dyn Store,
    gateway: &dyn PaymentGateway,
    notification: &WebhookNotification,
) -> Result<ReconcileOutcome, SyncError> {
    let fetched = gateway.fetch_payment(&notification.payment_id).await?;

    let record = PaymentRecord::from_fetched(PROVIDER_NAME, &fetched);
    store.upsert_payment(&record).await?;

    let Some(order_id) = fetched.external_reference.clone() else {
        return Ok(ReconcileOutcome::Orphan {
            payment_id: fetched.payment_id,
        });
    };

    let order_status = fetched.status.order_status();
    let update = OrderPaymentUpdate {
        status: order_status,
        payment_id: fetched.payment_id.into_inner(),
        payment_status: fetched.raw_status,
        merchant_order_id: fetched.merchant_order_id,
        request_id: notification.request_id.clone(),
    };

    if store.apply_payment(&order_id, &update).await? {
        Ok(ReconcileOutcome::Applied {
            order_id,
            order_status,
        })
    } else {
        Ok(ReconcileOutcome::OrderMissing { order_id })
    }
}
