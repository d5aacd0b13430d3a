use {
    super::error::SyncError,
    super::id::{OrderId, PaymentId},
    super::money::{Currency, MoneyAmount},
    super::payment::PaymentStatus,
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::Serialize,
    std::{future::Future, pin::Pin},
};

/// Payment-session request sent to the provider. The Issuer constructs this;
/// the gateway posts it verbatim, so the field names follow the wire format.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub external_reference: String,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub notification_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferenceItem {
    /// Stable per-line id: `"{orderId}-{index}"`.
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub currency_id: Currency,
    /// Decimal major units on the wire, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// What the provider hands back for a created preference.
#[derive(Debug, Clone)]
pub struct CreatedPreference {
    pub id: String,
    /// Buyer redirect URL.
    pub init_point: String,
}

/// Authoritative payment state fetched from the provider API. Webhook
/// payloads are never trusted for amounts or status; this is.
#[derive(Debug, Clone)]
pub struct FetchedPayment {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    /// Raw provider status string, kept for the audit trail.
    pub raw_status: String,
    pub status_detail: Option<String>,
    pub amount: MoneyAmount,
    pub currency: Currency,
    /// The merchant's own order id, passed through by the provider.
    pub external_reference: Option<OrderId>,
    pub preference_id: Option<String>,
    pub merchant_order_id: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Full provider payload as received.
    pub raw: serde_json::Value,
}

pub trait PaymentGateway: Send + Sync {
    fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CreatedPreference, SyncError>> + Send + '_>>;

    fn fetch_payment(
        &self,
        id: &PaymentId,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedPayment, SyncError>> + Send + '_>>;
}
