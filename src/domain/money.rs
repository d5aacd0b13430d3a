use {
    super::error::SyncError,
    rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Amount in integer minor units (cents). Line-item prices and audit amounts
/// are stored this way; the provider wire format wants decimal major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub fn new(cents: i64) -> Result<Self, SyncError> {
        if cents < 0 {
            return Err(SyncError::Validation(format!(
                "MoneyAmount cannot be negative, got: {cents}"
            )));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Exact decimal major-unit representation: 50000 cents → 500.00.
    pub fn major_units(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Convert a provider decimal amount (major units) to cents, rounding
    /// half-away-from-zero: 800 → 80000, 12.345 → 1235.
    pub fn from_major(amount: Decimal) -> Result<Self, SyncError> {
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| SyncError::Validation(format!("amount out of range: {amount}")))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| SyncError::Validation(format!("amount out of range: {amount}")))?;
        Self::new(cents)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency codes we accept from the provider. Checkout always charges in MXN;
/// the payment resource echoes whatever the buyer actually paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Mxn,
    Ars,
    Brl,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mxn => "MXN",
            Self::Ars => "ARS",
            Self::Brl => "BRL",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = SyncError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "MXN" => Ok(Self::Mxn),
            "ARS" => Ok(Self::Ars),
            "BRL" => Ok(Self::Brl),
            "USD" => Ok(Self::Usd),
            other => Err(SyncError::Validation(format!("unknown currency: {other}"))),
        }
    }
}
