use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::SyncError;

/// Merchant-side order identifier. Opaque: the storefront mints these and we
/// only pass them through as Mercado Pago's `external_reference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Result<Self, SyncError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SyncError::Validation("OrderId cannot be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Provider payment identifier. Mercado Pago sends these as numbers in the
/// payment resource and as strings in webhook payloads; we normalize to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Result<Self, SyncError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SyncError::Validation("PaymentId cannot be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
