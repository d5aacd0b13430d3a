use {
    crate::domain::{error::SyncError, payment::PaymentRecord},
    sqlx::PgPool,
};

/// Replace-on-conflict upsert keyed by the provider payment id. At-least-once
/// webhook delivery means the same payment id arrives repeatedly; the row
/// always ends up reflecting the latest delivered values.
pub async fn upsert_payment(pool: &PgPool, record: &PaymentRecord) -> Result<(), SyncError> {
    sqlx::query(
        r#"
        INSERT INTO payments
            (id, provider, payment_id, order_id, status, status_detail,
             amount_cents, currency, preference_id, merchant_order_id,
             external_reference, approved_at, raw)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (payment_id) DO UPDATE SET
            order_id = EXCLUDED.order_id,
            status = EXCLUDED.status,
            status_detail = EXCLUDED.status_detail,
            amount_cents = EXCLUDED.amount_cents,
            currency = EXCLUDED.currency,
            preference_id = EXCLUDED.preference_id,
            merchant_order_id = EXCLUDED.merchant_order_id,
            external_reference = EXCLUDED.external_reference,
            approved_at = EXCLUDED.approved_at,
            raw = EXCLUDED.raw,
            updated_at = now()
        "#,
    )
    .bind(record.id)
    .bind(&record.provider)
    .bind(record.payment_id.as_str())
    .bind(record.order_id.as_ref().map(|o| o.as_str()))
    .bind(&record.status)
    .bind(record.status_detail.as_deref())
    .bind(record.amount.cents())
    .bind(record.currency.as_str())
    .bind(record.preference_id.as_deref())
    .bind(record.merchant_order_id.as_deref())
    .bind(record.order_id.as_ref().map(|o| o.as_str()))
    .bind(record.approved_at)
    .bind(&record.raw)
    .execute(pool)
    .await?;

    Ok(())
}
