use {
    crate::CheckoutSettings,
    crate::domain::{
        error::SyncError,
        id::OrderId,
        order::LineItem,
        provider::{BackUrls, PaymentGateway, PreferenceItem, PreferenceRequest},
        store::Store,
    },
};

/// What the caller gets back: the provider preference id and the buyer
/// redirect URL.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub preference_id: String,
    pub init_point: String,
}

/// Loads the order's line-item snapshot, opens a payment session with the
/// provider, and marks the order as awaiting payment with the preference id
/// persisted. One provider call, one database write, no retries; a provider
/// failure propagates to the caller.
pub async fn create_checkout_preference(
    store: &dyn Store,
    gateway: &dyn PaymentGateway,
    settings: &CheckoutSettings,
    order_id: &OrderId,
) -> Result<CheckoutSession, SyncError> {
    let items = store.line_items(order_id).await?;
    if items.is_empty() {
        return Err(SyncError::NotFound(format!(
            "no line items for order {order_id}"
        )));
    }

    let request = build_preference(settings, order_id, &items);
    let created = gateway.create_preference(&request).await?;
    store.mark_awaiting_payment(order_id, &created.id).await?;

    Ok(CheckoutSession {
        preference_id: created.id,
        init_point: created.init_point,
    })
}

fn build_preference(
    settings: &CheckoutSettings,
    order_id: &OrderId,
    items: &[LineItem],
) -> PreferenceRequest {
    PreferenceRequest {
        items: items
            .iter()
            .enumerate()
            .map(|(index, item)| PreferenceItem {
                id: format!("{order_id}-{index}"),
                title: item.title.clone(),
                quantity: item.quantity,
                currency_id: settings.currency,
                unit_price: item.unit_price.major_units(),
            })
            .collect(),
        external_reference: order_id.as_str().to_string(),
        back_urls: BackUrls {
            success: format!("{}/checkout/success", settings.base_url),
            failure: format!("{}/checkout/failure", settings.base_url),
            pending: format!("{}/checkout/pending", settings.base_url),
        },
        auto_return: "approved".to_string(),
        notification_url: settings.notification_url.to_string(),
    }
}
