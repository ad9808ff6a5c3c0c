use anyhow::{bail, Result};
use serde::Deserialize;

use crate::error::PredictError;

/// Post-fit feature expansion.
pub trait Expander {
    fn n_features_in(&self) -> usize;
    fn n_features_out(&self) -> usize;
    fn expand(&self, x: &[f64]) -> Result<Vec<f64>, PredictError>;
}

#[derive(Deserialize)]
struct PolyJson {
    degree: u32,
    #[serde(default)]
    min_degree: u32,
    #[serde(default = "default_true")]
    include_bias: bool,
    #[serde(default)]
    interaction_only: bool,
    n_features_in: usize,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

/// Fitted polynomial feature transform.
///
/// Terms are enumerated as: the bias column (when `include_bias`, whatever
/// `min_degree` is), then every degree from `max(1, min_degree)` up to
/// `degree`, each as the lexicographically ordered index combinations of that
/// size (with replacement unless `interaction_only`).
#[derive(Debug, Clone)]
pub struct PolynomialFeatures {
    degree: u32,
    n_features_in: usize,
    feature_names_in: Option<Vec<String>>,
    terms: Vec<Vec<usize>>,
}

impl PolynomialFeatures {
    pub fn new(
        degree: u32,
        min_degree: u32,
        include_bias: bool,
        interaction_only: bool,
        n_features_in: usize,
    ) -> Result<Self> {
        if degree == 0 {
            bail!("polynomial degree must be >= 1");
        }
        if min_degree > degree {
            bail!("min_degree ({}) > degree ({})", min_degree, degree);
        }
        if n_features_in == 0 {
            bail!("polynomial expander has no input features");
        }

        let mut terms = Vec::new();
        if include_bias {
            terms.push(Vec::new());
        }
        for d in min_degree.max(1)..=degree {
            combinations(n_features_in, d as usize, !interaction_only, &mut terms);
        }

        Ok(Self {
            degree,
            n_features_in,
            feature_names_in: None,
            terms,
        })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Column names the transform was fitted on, when recorded.
    pub fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }
}

impl<'de> Deserialize<'de> for PolynomialFeatures {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = PolyJson::deserialize(deserializer)?;
        let mut poly = PolynomialFeatures::new(
            raw.degree,
            raw.min_degree,
            raw.include_bias,
            raw.interaction_only,
            raw.n_features_in,
        )
        .map_err(serde::de::Error::custom)?;
        if let Some(names) = &raw.feature_names_in {
            if names.len() != raw.n_features_in {
                return Err(serde::de::Error::custom(format!(
                    "feature_names_in has {} names for {} features",
                    names.len(),
                    raw.n_features_in
                )));
            }
        }
        poly.feature_names_in = raw.feature_names_in;
        Ok(poly)
    }
}

impl Expander for PolynomialFeatures {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.terms.len()
    }

    fn expand(&self, x: &[f64]) -> Result<Vec<f64>, PredictError> {
        if x.len() != self.n_features_in {
            return Err(PredictError::DimensionMismatch {
                stage: "expander",
                expected: self.n_features_in,
                got: x.len(),
            });
        }
        Ok(self
            .terms
            .iter()
            .map(|t| t.iter().map(|&i| x[i]).product())
            .collect())
    }
}

/// Appends every size-`k` index combination over `0..n` in lexicographic order.
fn combinations(n: usize, k: usize, with_replacement: bool, out: &mut Vec<Vec<usize>>) {
    fn rec(
        start: usize,
        n: usize,
        k: usize,
        with_replacement: bool,
        cur: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            let next = if with_replacement { i } else { i + 1 };
            rec(next, n, k, with_replacement, cur, out);
            cur.pop();
        }
    }
    rec(0, n, k, with_replacement, &mut Vec::with_capacity(k), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_two_with_bias() {
        let p = PolynomialFeatures::new(2, 0, true, false, 2).unwrap();
        // 1, a, b, a^2, ab, b^2
        assert_eq!(p.n_features_out(), 6);
        assert_eq!(p.expand(&[2.0, 3.0]).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 6.0, 9.0]);
    }

    #[test]
    fn terms_are_lexicographic() {
        let p = PolynomialFeatures::new(2, 0, false, false, 3).unwrap();
        let expected: Vec<Vec<usize>> = vec![
            vec![0],
            vec![1],
            vec![2],
            vec![0, 0],
            vec![0, 1],
            vec![0, 2],
            vec![1, 1],
            vec![1, 2],
            vec![2, 2],
        ];
        assert_eq!(p.terms, expected);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn eight_inputs_degree_two() {
        let p = PolynomialFeatures::new(2, 0, true, false, 8).unwrap();
        assert_eq!(p.n_features_out(), 45);
        let p = PolynomialFeatures::new(2, 0, false, false, 8).unwrap();
        assert_eq!(p.n_features_out(), 44);
    }

    #[test]
    fn interaction_only_skips_powers() {
        let p = PolynomialFeatures::new(2, 0, false, true, 3).unwrap();
        // a, b, c, ab, ac, bc
        assert_eq!(
            p.expand(&[2.0, 3.0, 5.0]).unwrap(),
            vec![2.0, 3.0, 5.0, 6.0, 10.0, 15.0]
        );
    }

    #[test]
    fn min_degree_drops_low_terms_but_keeps_bias() {
        let p = PolynomialFeatures::new(2, 2, true, false, 2).unwrap();
        assert_eq!(p.expand(&[2.0, 3.0]).unwrap(), vec![1.0, 4.0, 6.0, 9.0]);

        let p = PolynomialFeatures::new(3, 2, false, false, 2).unwrap();
        // a^2, ab, b^2, a^3, a^2b, ab^2, b^3
        assert_eq!(
            p.expand(&[2.0, 3.0]).unwrap(),
            vec![4.0, 6.0, 9.0, 8.0, 12.0, 18.0, 27.0]
        );
    }

    #[test]
    fn min_degree_zero_and_one_agree() {
        let a = PolynomialFeatures::new(2, 0, true, false, 3).unwrap();
        let b = PolynomialFeatures::new(2, 1, true, false, 3).unwrap();
        assert_eq!(a.terms, b.terms);
    }

    #[test]
    fn wrong_input_width_is_dimension_mismatch() {
        let p = PolynomialFeatures::new(2, 0, true, false, 3).unwrap();
        let err = p.expand(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            PredictError::DimensionMismatch { stage: "expander", expected: 3, got: 2 }
        );
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(PolynomialFeatures::new(0, 0, true, false, 3).is_err());
        assert!(PolynomialFeatures::new(2, 3, true, false, 3).is_err());
        assert!(PolynomialFeatures::new(2, 0, true, false, 0).is_err());
        assert!(serde_json::from_str::<PolynomialFeatures>(
            r#"{"degree":2,"n_features_in":2,"feature_names_in":["a"]}"#
        )
        .is_err());
    }
}
