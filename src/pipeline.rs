//! Record → encoded vector → polynomial features → prediction.
//!
//! Every function here is pure: the bundle is only read and no I/O happens.

use crate::{
    bundle::ArtifactBundle,
    encoder::Encoder,
    error::PredictError,
    expander::Expander,
    model::Regressor,
    types::{Prediction, RawRecord, N_COLUMNS},
};

/// Numeric minimums. Categorical fields are checked by their encoders.
pub fn validate(record: &RawRecord) -> Result<(), PredictError> {
    if record.order_id < 1 {
        return Err(PredictError::validation("Order_ID", "must be >= 1"));
    }
    if !record.distance_km.is_finite() {
        return Err(PredictError::validation("Distance_km", "must be a finite number"));
    }
    if record.distance_km < 0.0 {
        return Err(PredictError::validation("Distance_km", "must be >= 0.0"));
    }
    if record.preparation_time_min < 0 {
        return Err(PredictError::validation("Preparation_Time_min", "must be >= 0"));
    }
    if record.courier_experience_yrs < 0 {
        return Err(PredictError::validation("Courier_Experience_yrs", "must be >= 0"));
    }
    Ok(())
}

fn encode_field<E: Encoder>(
    enc: &E,
    field: &'static str,
    value: &str,
) -> Result<f64, PredictError> {
    enc.encode(value)
        .map(|i| i as f64)
        .map_err(|e| PredictError::Encoding { field, value: e.value })
}

/// Validates and encodes a record into the fixed column order.
pub fn encode<E, X, M>(
    bundle: &ArtifactBundle<E, X, M>,
    record: &RawRecord,
) -> Result<[f64; N_COLUMNS], PredictError>
where
    E: Encoder,
    X: Expander,
    M: Regressor,
{
    validate(record)?;

    let enc = bundle.encoders();
    let weather = encode_field(enc.weather(), "Weather", &record.weather)?;
    let traffic = encode_field(enc.traffic_level(), "Traffic_Level", &record.traffic_level)?;
    let time_of_day = encode_field(enc.time_of_day(), "Time_of_Day", &record.time_of_day)?;
    let vehicle = encode_field(enc.vehicle_type(), "Vehicle_Type", &record.vehicle_type)?;

    // order_id stays a model input: the artifact was fitted with it
    Ok([
        record.order_id as f64,
        record.distance_km,
        weather,
        traffic,
        time_of_day,
        vehicle,
        record.preparation_time_min as f64,
        record.courier_experience_yrs as f64,
    ])
}

/// Expands an already encoded vector and runs the model.
pub fn predict_encoded<E, X, M>(
    bundle: &ArtifactBundle<E, X, M>,
    features: &[f64],
) -> Result<Prediction, PredictError>
where
    E: Encoder,
    X: Expander,
    M: Regressor,
{
    let expanded = bundle.expander().expand(features)?;
    let expected = bundle.model().n_features();
    if expanded.len() != expected {
        return Err(PredictError::DimensionMismatch {
            stage: "expanded features",
            expected,
            got: expanded.len(),
        });
    }
    let value = bundle.model().predict(&expanded)?;
    if !value.is_finite() {
        return Err(PredictError::NonFinite { value });
    }
    Ok(Prediction { value })
}

pub fn predict<E, X, M>(
    bundle: &ArtifactBundle<E, X, M>,
    record: &RawRecord,
) -> Result<Prediction, PredictError>
where
    E: Encoder,
    X: Expander,
    M: Regressor,
{
    let features = encode(bundle, record)?;
    predict_encoded(bundle, &features)
}

/// Smallest record the form can submit: first option of every vocabulary and
/// every numeric field at its minimum.
pub fn warmup_record<E, X, M>(bundle: &ArtifactBundle<E, X, M>) -> RawRecord
where
    E: Encoder,
    X: Expander,
    M: Regressor,
{
    let first = |e: &E| e.classes().first().cloned().unwrap_or_default();
    let enc = bundle.encoders();
    RawRecord {
        order_id: 1,
        distance_km: 0.0,
        weather: first(enc.weather()),
        traffic_level: first(enc.traffic_level()),
        time_of_day: first(enc.time_of_day()),
        vehicle_type: first(enc.vehicle_type()),
        preparation_time_min: 0,
        courier_experience_yrs: 0,
    }
}
