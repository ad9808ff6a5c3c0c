use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use crate::{
    encoder::{Encoder, LabelEncoder},
    expander::{Expander, PolynomialFeatures},
    model::{LinearRegression, Regressor},
    types::{CATEGORICAL, COLUMNS, N_COLUMNS},
};

// ---------- Encoders ----------

/// One encoder per categorical column.
#[derive(Debug, Clone)]
pub struct EncoderSet<E> {
    weather: E,
    traffic_level: E,
    time_of_day: E,
    vehicle_type: E,
}

impl<E: Encoder> EncoderSet<E> {
    pub fn new(weather: E, traffic_level: E, time_of_day: E, vehicle_type: E) -> Self {
        Self {
            weather,
            traffic_level,
            time_of_day,
            vehicle_type,
        }
    }

    /// Builds the set from a column-name keyed map; every categorical column
    /// must be present and no other key is allowed.
    pub fn from_map(mut map: HashMap<String, E>) -> Result<Self> {
        let mut take = |col: &str| {
            map.remove(col)
                .with_context(|| format!("no encoder for column {}", col))
        };
        let set = Self::new(
            take("Weather")?,
            take("Traffic_Level")?,
            take("Time_of_Day")?,
            take("Vehicle_Type")?,
        );
        if let Some(extra) = map.keys().next() {
            bail!("encoder for unknown column {}", extra);
        }
        Ok(set)
    }

    pub fn weather(&self) -> &E {
        &self.weather
    }

    pub fn traffic_level(&self) -> &E {
        &self.traffic_level
    }

    pub fn time_of_day(&self) -> &E {
        &self.time_of_day
    }

    pub fn vehicle_type(&self) -> &E {
        &self.vehicle_type
    }

    /// `(column, encoder)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &E)> {
        CATEGORICAL
            .into_iter()
            .zip([&self.weather, &self.traffic_level, &self.time_of_day, &self.vehicle_type])
    }
}

// ---------- Bundle ----------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleJson {
    model: LinearRegression,
    poly: PolynomialFeatures,
    label_encoders: HashMap<String, LabelEncoder>,
}

/// Fitted encoders, expander and model. Built once at startup and only
/// ever read afterwards.
#[derive(Debug, Clone)]
pub struct ArtifactBundle<E = LabelEncoder, X = PolynomialFeatures, M = LinearRegression> {
    model: M,
    poly: X,
    encoders: EncoderSet<E>,
}

impl<E: Encoder, X: Expander, M: Regressor> ArtifactBundle<E, X, M> {
    /// Assembles a bundle, checking the three artifacts agree on dimensions.
    pub fn from_parts(model: M, poly: X, encoders: EncoderSet<E>) -> Result<Self> {
        if poly.n_features_in() != N_COLUMNS {
            bail!(
                "expander expects {} input features, record has {}",
                poly.n_features_in(),
                N_COLUMNS
            );
        }
        if poly.n_features_out() != model.n_features() {
            bail!(
                "expander produces {} features but model expects {}",
                poly.n_features_out(),
                model.n_features()
            );
        }
        Ok(Self {
            model,
            poly,
            encoders,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn expander(&self) -> &X {
        &self.poly
    }

    pub fn encoders(&self) -> &EncoderSet<E> {
        &self.encoders
    }
}

impl ArtifactBundle {
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read bundle at {}", path.display()))?;
        Self::from_json_str(&txt)
            .with_context(|| format!("invalid bundle at {}", path.display()))
    }

    pub fn from_json_str(txt: &str) -> Result<Self> {
        let raw: BundleJson =
            serde_json::from_str(txt).with_context(|| "failed to parse bundle json")?;

        if let Some(names) = raw.poly.feature_names_in() {
            if names.iter().map(String::as_str).ne(COLUMNS) {
                bail!(
                    "expander was fitted on columns {:?}, expected {:?}",
                    names,
                    COLUMNS
                );
            }
        }

        let encoders = EncoderSet::from_map(raw.label_encoders)?;
        Self::from_parts(raw.model, raw.poly, encoders)
    }
}
