use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::ApiError;
use super::schema::{
    self, BatchMetadata, BatchRequest, BatchResponse, InvokeMetadata, InvokeRequest,
    InvokeResponse,
};
use super::AppState;

pub async fn invoke(
    State(state): State<AppState>,
    payload: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Json<InvokeResponse>, ApiError> {
    let Json(request) = payload?;
    let run_id = Uuid::new_v4().to_string();

    tracing::info!(%run_id, player = %request.input.player, "invoke");
    let output = state.chain.invoke(&request.input).await?;

    Ok(Json(InvokeResponse {
        output,
        metadata: InvokeMetadata {
            run_id,
            feedback_tokens: Vec::new(),
        },
    }))
}

pub async fn batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload?;
    let run_ids: Vec<String> = request
        .inputs
        .iter()
        .map(|_| Uuid::new_v4().to_string())
        .collect();

    tracing::info!(size = request.inputs.len(), "batch");
    let output = state.chain.batch(&request.inputs).await?;

    Ok(Json(BatchResponse {
        output,
        metadata: BatchMetadata { run_ids },
    }))
}

pub async fn input_schema() -> Json<Value> {
    Json(schema::input_schema())
}

pub async fn output_schema() -> Json<Value> {
    Json(schema::output_schema())
}

pub async fn config_schema() -> Json<Value> {
    Json(schema::config_schema())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
