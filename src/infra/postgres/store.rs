use {
    super::{order_repo, payment_repo},
    crate::domain::{
        error::SyncError,
        id::OrderId,
        order::{LineItem, OrderPaymentUpdate},
        payment::PaymentRecord,
        store::Store,
    },
    sqlx::PgPool,
    std::{future::Future, pin::Pin},
};

/// Postgres-backed `Store`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for PgStore {
    fn line_items(
        &self,
        order_id: &OrderId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<LineItem>, SyncError>> + Send + '_>> {
        let order_id = order_id.clone();
        Box::pin(async move { order_repo::fetch_line_items(&self.pool, &order_id).await })
    }

    fn mark_awaiting_payment(
        &self,
        order_id: &OrderId,
        preference_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>> {
        let order_id = order_id.clone();
        let preference_id = preference_id.to_string();
        Box::pin(async move {
            order_repo::set_preference(&self.pool, &order_id, &preference_id).await
        })
    }

    fn upsert_payment(
        &self,
        record: &PaymentRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + '_>> {
        let record = record.clone();
        Box::pin(async move { payment_repo::upsert_payment(&self.pool, &record).await })
    }

    fn apply_payment(
        &self,
        order_id: &OrderId,
        update: &OrderPaymentUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<bool, SyncError>> + Send + '_>> {
        let order_id = order_id.clone();
        let update = update.clone();
        Box::pin(async move {
            order_repo::apply_payment_update(&self.pool, &order_id, &update).await
        })
    }
}
