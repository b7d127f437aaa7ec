//! Normalization of mapping-table values into weighted distributions.
//!
//! Mapping tables arrive in three value shapes: a single replacement string,
//! a list of equally likely replacements, or an explicit replacement→weight
//! map. All three normalize into one canonical [`WeightedDistribution`]
//! whose weights sum to 1.0.

use hashbrown::HashMap;
use itertools::Itertools;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::NoiseError;
use crate::sampler::Sampler;

/// One mapping-table value, before normalization.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MappingValue {
    /// A single replacement, drawn with certainty.
    Single(SmolStr),
    /// Equally likely replacements.
    List(Vec<SmolStr>),
    /// Replacements with explicit relative weights.
    Weighted(HashMap<SmolStr, f64>),
}

/// A normalized probability distribution over candidate replacements.
#[derive(Clone, Debug)]
pub struct WeightedDistribution {
    candidates: Vec<SmolStr>,
    weights: Vec<f64>,
}

impl WeightedDistribution {
    /// Normalizes a mapping value. `key` is only used in error reports.
    pub fn from_value(key: &str, value: &MappingValue) -> Result<WeightedDistribution, NoiseError> {
        match value {
            MappingValue::Single(s) => Ok(WeightedDistribution {
                candidates: vec![s.clone()],
                weights: vec![1.0],
            }),
            MappingValue::List(items) => {
                if items.is_empty() {
                    return Err(NoiseError::EmptyCandidates(key.to_string()));
                }
                let uniform = 1.0 / items.len() as f64;
                Ok(WeightedDistribution {
                    candidates: items.clone(),
                    weights: vec![uniform; items.len()],
                })
            }
            MappingValue::Weighted(map) => {
                if map.is_empty() {
                    return Err(NoiseError::EmptyCandidates(key.to_string()));
                }
                let mut candidates = Vec::with_capacity(map.len());
                let mut weights = Vec::with_capacity(map.len());
                let mut total = 0.0;
                // Lexicographic candidate order keeps seeded draws stable
                // across identical tables.
                for (candidate, &weight) in map.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
                    if !weight.is_finite() || weight < 0.0 {
                        return Err(NoiseError::InvalidWeight {
                            key: key.to_string(),
                            weight,
                        });
                    }
                    total += weight;
                    candidates.push(candidate.clone());
                    weights.push(weight);
                }
                if total == 0.0 {
                    return Err(NoiseError::ZeroWeightSum(key.to_string()));
                }
                for w in weights.iter_mut() {
                    *w /= total;
                }
                Ok(WeightedDistribution { candidates, weights })
            }
        }
    }

    /// The candidate replacements, in draw order.
    pub fn candidates(&self) -> &[SmolStr] {
        &self.candidates
    }

    /// Normalized weights, parallel to [`candidates`](Self::candidates).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Draws one candidate according to the weights.
    pub(crate) fn sample<'a>(&'a self, sampler: &mut Sampler) -> &'a SmolStr {
        let i = sampler.weighted(&self.weights);
        &self.candidates[i]
    }
}
