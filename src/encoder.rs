use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::UnknownCategory;

/// Maps a category string onto its index in a fitted vocabulary.
pub trait Encoder {
    fn encode(&self, value: &str) -> Result<usize, UnknownCategory>;

    /// Inverse of `encode`.
    fn decode(&self, index: usize) -> Option<&str>;

    /// Vocabulary in index order.
    fn classes(&self) -> &[String];
}

#[derive(Deserialize)]
struct LabelEncoderJson {
    classes: Vec<String>,
}

/// Fitted label encoder: index of a category is its position in `classes`.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            bail!("encoder vocabulary is empty");
        }
        let mut index = HashMap::with_capacity(classes.len());
        for (i, c) in classes.iter().enumerate() {
            if index.insert(c.clone(), i).is_some() {
                bail!("duplicate category {:?} in vocabulary", c);
            }
        }
        Ok(Self { classes, index })
    }
}

impl<'de> Deserialize<'de> for LabelEncoder {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = LabelEncoderJson::deserialize(deserializer)?;
        LabelEncoder::new(raw.classes).map_err(serde::de::Error::custom)
    }
}

impl Encoder for LabelEncoder {
    fn encode(&self, value: &str) -> Result<usize, UnknownCategory> {
        self.index.get(value).copied().ok_or_else(|| UnknownCategory {
            value: value.to_string(),
        })
    }

    fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}
