use {
    super::error::SyncError,
    super::money::MoneyAmount,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Storefront order lifecycle. Only this service moves orders between
/// `created`, `pending_payment` and the payment-terminal states; the
/// storefront creates rows as `created`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    PendingPayment,
    Paid,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::PendingPayment => "pending_payment",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = SyncError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "created" => Ok(Self::Created),
            "pending_payment" => Ok(Self::PendingPayment),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(SyncError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Immutable snapshot of one order line at order-creation time. Read-only
/// input to preference construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub title: String,
    pub unit_price: MoneyAmount,
    pub quantity: u32,
}

/// Write-back applied to an order after a payment notification has been
/// reconciled against the provider's payment resource.
#[derive(Debug, Clone)]
pub struct OrderPaymentUpdate {
    pub status: OrderStatus,
    pub payment_id: String,
    /// Raw provider status string, informational.
    pub payment_status: String,
    pub merchant_order_id: Option<String>,
    /// Provider `x-request-id` header, when present.
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for s in [
            OrderStatus::Created,
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(OrderStatus::try_from(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(OrderStatus::try_from("shipped").is_err());
    }
}
