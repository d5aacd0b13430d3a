use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::id::OrderId,
        services::checkout::create_checkout_preference,
    },
    axum::{Json, extract::State},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Deserialize)]
pub struct CreatePreferenceBody {
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePreferenceResponse {
    pub preference_id: String,
    pub init_point: String,
}

/// Opens a payment session for an order. Errors propagate to the caller as a
/// failed checkout attempt.
#[tracing::instrument(name = "checkout_preference", skip_all, fields(order_id = %body.order_id))]
pub async fn create_preference_handler(
    State(state): State<AppState>,
    Json(body): Json<CreatePreferenceBody>,
) -> Result<Json<CreatePreferenceResponse>, ApiError> {
    let order_id = OrderId::new(body.order_id)?;
    let session =
        create_checkout_preference(&*state.store, &*state.gateway, &state.checkout, &order_id)
            .await?;

    tracing::info!(preference_id = %session.preference_id, "preference created");
    Ok(Json(CreatePreferenceResponse {
        preference_id: session.preference_id,
        init_point: session.init_point,
    }))
}
