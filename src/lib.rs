//! Delivery time prediction from a fitted polynomial regression bundle.
//!
//! A request record is validated, its categorical columns label-encoded, the
//! resulting 8-vector expanded into polynomial features and fed to a linear
//! model. The artifacts are loaded once into an [`ArtifactBundle`] and shared
//! read-only.

pub mod bundle;
pub mod config;
pub mod encoder;
pub mod error;
pub mod expander;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod types;

pub use bundle::{ArtifactBundle, EncoderSet};
pub use error::{ErrorKind, PredictError, UnknownCategory};
pub use types::{Prediction, RawRecord};
