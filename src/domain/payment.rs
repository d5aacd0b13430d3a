use {
    super::id::{OrderId, PaymentId},
    super::money::{Currency, MoneyAmount},
    super::order::OrderStatus,
    super::provider::FetchedPayment,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Mercado Pago payment status. Parsing is total — statuses we have never
/// seen land in `Unknown` and the raw string is kept alongside for the audit
/// trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    Authorized,
    InProcess,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    Unknown,
}

impl PaymentStatus {
    pub fn from_raw(s: &str) -> Self {
        match s {
            "approved" => Self::Approved,
            "pending" => Self::Pending,
            "authorized" => Self::Authorized,
            "in_process" => Self::InProcess,
            "in_mediation" => Self::InMediation,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            "refunded" => Self::Refunded,
            "charged_back" => Self::ChargedBack,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::InProcess => "in_process",
            Self::InMediation => "in_mediation",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::ChargedBack => "charged_back",
            Self::Unknown => "unknown",
        }
    }

    /// Total mapping onto the order lifecycle. Adding a provider status is a
    /// single-point change here; the match is exhaustive on purpose.
    pub fn order_status(&self) -> OrderStatus {
        match self {
            Self::Approved => OrderStatus::Paid,
            Self::Refunded => OrderStatus::Refunded,
            Self::InProcess => OrderStatus::PendingPayment,
            // Rejected payments send the order back to its pre-payment state.
            Self::Rejected => OrderStatus::Created,
            Self::Pending
            | Self::Authorized
            | Self::InMediation
            | Self::Cancelled
            | Self::ChargedBack
            | Self::Unknown => OrderStatus::PendingPayment,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit row, one per provider payment id. Upserted (replace-on-conflict by
/// `payment_id`) and never deleted; not authoritative for order state.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub provider: String,
    pub payment_id: PaymentId,
    pub order_id: Option<OrderId>,
    /// Raw provider status string.
    pub status: String,
    pub status_detail: Option<String>,
    pub amount: MoneyAmount,
    pub currency: Currency,
    pub preference_id: Option<String>,
    pub merchant_order_id: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub raw: serde_json::Value,
}

impl PaymentRecord {
    pub fn from_fetched(provider: &str, fetched: &FetchedPayment) -> Self {
        Self {
            id: Uuid::now_v7(),
            provider: provider.to_string(),
            payment_id: fetched.payment_id.clone(),
            order_id: fetched.external_reference.clone(),
            status: fetched.raw_status.clone(),
            status_detail: fetched.status_detail.clone(),
            amount: fetched.amount,
            currency: fetched.currency,
            preference_id: fetched.preference_id.clone(),
            merchant_order_id: fetched.merchant_order_id.clone(),
            approved_at: fetched.approved_at,
            raw: fetched.raw.clone(),
        }
    }
}
