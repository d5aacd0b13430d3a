use {
    crate::domain::{
        error::SyncError,
        id::OrderId,
        money::MoneyAmount,
        order::{LineItem, OrderPaymentUpdate, OrderStatus},
    },
    sqlx::PgPool,
};

/// Line-item snapshot in line order. An order with no rows yields an empty
/// vec; the caller decides whether that is an error.
pub async fn fetch_line_items(
    pool: &PgPool,
    order_id: &OrderId,
) -> Result<Vec<LineItem>, SyncError> {
    let rows = sqlx::query_as::<_, (String, i64, i32)>(
        "SELECT title, unit_price_cents, quantity
         FROM order_items
         WHERE order_id = $1
         ORDER BY line_no",
    )
    .bind(order_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(title, unit_price_cents, quantity)| {
            Ok(LineItem {
                title,
                unit_price: MoneyAmount::new(unit_price_cents)?,
                quantity: u32::try_from(quantity).map_err(|_| {
                    SyncError::Validation(format!("negative quantity for order {order_id}"))
                })?,
            })
        })
        .collect()
}

/// Persist the created preference and move the order to `pending_payment`.
pub async fn set_preference(
    pool: &PgPool,
    order_id: &OrderId,
    preference_id: &str,
) -> Result<(), SyncError> {
    sqlx::query(
        "UPDATE orders
         SET preference_id = $2, status = $3, updated_at = now()
         WHERE id = $1",
    )
    .bind(order_id.as_str())
    .bind(preference_id)
    .bind(OrderStatus::PendingPayment.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Last-writer-wins write-back of reconciled payment state. Returns `false`
/// when no order row matched the external reference.
pub async fn apply_payment_update(
    pool: &PgPool,
    order_id: &OrderId,
    update: &OrderPaymentUpdate,
) -> Result<bool, SyncError> {
    let result = sqlx::query(
        "UPDATE orders
         SET status = $2,
             payment_id = $3,
             payment_status = $4,
             merchant_order_id = $5,
             mp_request_id = COALESCE($6, mp_request_id),
             updated_at = now()
         WHERE id = $1",
    )
    .bind(order_id.as_str())
    .bind(update.status.as_str())
    .bind(&update.payment_id)
    .bind(&update.payment_status)
    .bind(update.merchant_order_id.as_deref())
    .bind(update.request_id.as_deref())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
