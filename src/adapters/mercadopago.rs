use {
    crate::domain::{
        error::SyncError,
        id::{OrderId, PaymentId},
        money::{Currency, MoneyAmount},
        payment::PaymentStatus,
        provider::{CreatedPreference, FetchedPayment, PaymentGateway, PreferenceRequest},
    },
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::{Deserialize, Deserializer},
    std::{future::Future, pin::Pin},
};

const DEFAULT_API_BASE: &str = "https://api.mercadopago.com";

/// Mercado Pago REST client. Implements the `PaymentGateway` seam over the
/// two endpoints this service touches: preference creation and payment
/// lookup.
pub struct MercadoPagoGateway {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MercadoPagoGateway {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Point the client at a different host (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn create_preference_inner(
        &self,
        request: &PreferenceRequest,
    ) -> Result<CreatedPreference, SyncError> {
        let response = self
            .http
            .post(format!("{}/checkout/preferences", self.base_url))
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| SyncError::Provider(format!("preference request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SyncError::Provider(format!(
                "preference creation returned {}",
                response.status()
            )));
        }

        let created: PreferenceResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Provider(format!("malformed preference response: {e}")))?;
        Ok(CreatedPreference {
            id: created.id,
            init_point: created.init_point,
        })
    }

    async fn fetch_payment_inner(&self, id: &PaymentId) -> Result<FetchedPayment, SyncError> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{}", self.base_url, id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SyncError::Provider(format!("payment lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SyncError::Provider(format!(
                "payment lookup for {id} returned {}",
                response.status()
            )));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SyncError::Provider(format!("malformed payment response: {e}")))?;
        convert_payment(raw)
    }
}

impl PaymentGateway for MercadoPagoGateway {
    fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CreatedPreference, SyncError>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move { self.create_preference_inner(&request).await })
    }

    fn fetch_payment(
        &self,
        id: &PaymentId,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedPayment, SyncError>> + Send + '_>> {
        let id = id.clone();
        Box::pin(async move { self.fetch_payment_inner(&id).await })
    }
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

/// Subset of the payment resource we read. Ids arrive as numbers here and as
/// strings in webhook payloads, so both are accepted everywhere.
#[derive(Debug, Deserialize)]
struct PaymentResource {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    status: Option<String>,
    status_detail: Option<String>,
    transaction_amount: Option<Decimal>,
    currency_id: Option<String>,
    external_reference: Option<String>,
    date_approved: Option<DateTime<Utc>>,
    #[serde(default)]
    point_of_interaction: Option<PointOfInteraction>,
    #[serde(default)]
    order: Option<MerchantOrderRef>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    #[serde(default)]
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    preference_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MerchantOrderRef {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
}

/// Map a raw payment resource into the domain view. Missing amounts count as
/// zero and a missing currency falls back to MXN, matching what the provider
/// actually omits for some payment methods.
fn convert_payment(raw: serde_json::Value) -> Result<FetchedPayment, SyncError> {
    let resource: PaymentResource = serde_json::from_value(raw.clone())?;

    let payment_id = resource
        .id
        .ok_or_else(|| SyncError::Provider("payment resource has no id".into()))
        .and_then(PaymentId::new)?;

    let raw_status = resource.status.unwrap_or_else(|| "unknown".to_string());
    let status = PaymentStatus::from_raw(&raw_status);

    let amount = MoneyAmount::from_major(resource.transaction_amount.unwrap_or(Decimal::ZERO))?;
    let currency = match resource.currency_id.as_deref() {
        Some(code) => Currency::try_from(code)?,
        None => Currency::Mxn,
    };

    let external_reference = resource
        .external_reference
        .filter(|r| !r.trim().is_empty())
        .map(OrderId::new)
        .transpose()?;

    let preference_id = resource
        .point_of_interaction
        .and_then(|poi| poi.transaction_data)
        .and_then(|td| td.preference_id);

    Ok(FetchedPayment {
        payment_id,
        status,
        raw_status,
        status_detail: resource.status_detail,
        amount,
        currency,
        external_reference,
        preference_id,
        merchant_order_id: resource.order.and_then(|o| o.id),
        approved_at: resource.date_approved,
        raw,
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
