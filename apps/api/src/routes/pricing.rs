use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::llm_client::pricing::{cost, table_for_model};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingQuery {
    pub model: Option<String>,
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub model: String,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost: f64,
}

/// GET /api/v1/pricing?model=&inputTokens=&outputTokens=
///
/// Unknown models are priced at their vendor's default model.
pub async fn handle_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> Json<PricingResponse> {
    let model = query
        .model
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.llm.default_model().to_string());

    let price = table_for_model(&model).price_for(&model);
    Json(PricingResponse {
        cost: cost(&model, query.input_tokens, query.output_tokens),
        input_per_1k: price.input_per_1k,
        output_per_1k: price.output_per_1k,
        input_tokens: query.input_tokens,
        output_tokens: query.output_tokens,
        model,
    })
}
