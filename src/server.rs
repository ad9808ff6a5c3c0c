use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    bundle::ArtifactBundle,
    encoder::Encoder,
    error::{ErrorKind, PredictError},
    expander::Expander,
    model::Regressor,
    pipeline,
    types::{numeric_fields, CategoricalField, FormOptions, PredictionOut, RawRecord, COLUMNS},
};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ArtifactBundle>,
    pub log_predictions: bool,
}

impl AppState {
    pub fn new(bundle: ArtifactBundle, log_predictions: bool) -> Self {
        Self {
            bundle: Arc::new(bundle),
            log_predictions,
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn error_response(kind: ErrorKind, msg: impl std::fmt::Display) -> ApiError {
    let status = if kind.is_user_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "kind": kind, "error": format!("Error: {}", msg) })))
}

fn pipeline_error(e: PredictError) -> ApiError {
    error_response(e.kind(), e)
}

// ---------- Handlers ----------

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawRecord>, JsonRejection>,
) -> Result<Json<PredictionOut>, ApiError> {
    let Json(record) =
        payload.map_err(|rej| error_response(ErrorKind::Validation, rej.body_text()))?;

    let bundle = &*state.bundle;
    let features = pipeline::encode(bundle, &record).map_err(|e| {
        tracing::info!("rejected order_id={}: {}", record.order_id, e);
        pipeline_error(e)
    })?;

    if state.log_predictions {
        log_features(&features);
    }

    let prediction = pipeline::predict_encoded(bundle, &features).map_err(|e| {
        tracing::error!("inference failed for order_id={}: {}", record.order_id, e);
        pipeline_error(e)
    })?;

    tracing::debug!(
        "order_id={} prediction={:.4}",
        record.order_id,
        prediction.value
    );
    Ok(Json(prediction.into()))
}

pub async fn options(State(state): State<AppState>) -> Json<FormOptions> {
    Json(form_options(&*state.bundle))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "in_dim": state.bundle.expander().n_features_in(),
        "expanded_dim": state.bundle.expander().n_features_out(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/options", get(options))
        .route("/health", get(health))
        .with_state(state)
}

// ---------- Helpers ----------

/// Selectable options per categorical column, in encoder order.
pub fn form_options<E, X, M>(bundle: &ArtifactBundle<E, X, M>) -> FormOptions
where
    E: Encoder,
    X: Expander,
    M: Regressor,
{
    FormOptions {
        numeric: numeric_fields(),
        categorical: bundle
            .encoders()
            .iter()
            .map(|(name, enc)| CategoricalField {
                name,
                options: enc.classes().to_vec(),
            })
            .collect(),
    }
}

fn log_features(vec: &[f64]) {
    let nz = vec.iter().filter(|x| **x != 0.0).count();
    let sample: Vec<String> = COLUMNS
        .iter()
        .zip(vec)
        .map(|(name, v)| format!("{}={:.3}", name, v))
        .collect();
    tracing::info!(
        "recv in_dim={} nonzero={} features=[{}]",
        vec.len(),
        nz,
        sample.join(", ")
    );
}
