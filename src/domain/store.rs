use {
    super::error::SyncError,
    super::id::OrderId,
    super::order::{LineItem, OrderPaymentUpdate},
    super::payment::PaymentRecord,
    std::{future::Future, pin::Pin},
};

/// Persistence seam for the order store and the payment audit log. The
/// Postgres implementation lives in `infra`; tests substitute an in-memory
/// double.
pub trait Store: Send + Sync {
    /// Line-item snapshot for an order, in line order. Empty when the order
    /// does not exist or has no items.
    fn line_items(
        &self,
        order_id: &OrderId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<LineItem>, SyncError>> + Send + '_>>;

    /// Persist the created preference id and move the order to
    /// `pending_payment`.
    fn mark_awaiting_payment(
        &self,
        order_id: &OrderId,
        preference_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>>;

    /// Replace-on-conflict upsert keyed by the provider payment id. Safe to
    /// call repeatedly for the same payment.
    fn upsert_payment(
        &self,
        record: &PaymentRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>>;

    /// Write reconciled payment state onto the order. Returns `false` when no
    /// order row matched (last-writer-wins when one did).
    fn apply_payment(
        &self,
        order_id: &OrderId,
        update: &OrderPaymentUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<bool, SyncError>> + Send + '_>>;
}
