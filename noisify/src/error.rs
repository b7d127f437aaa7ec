//! Error types for noising operations.

/// Errors that can occur while building mappings or applying noise.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NoiseError {
    /// A probability parameter lies outside `[0.0, 1.0]`
    #[error("probability must lie within [0.0, 1.0], got {0}")]
    ProbabilityOutOfRange(f64),

    /// A min/max pair of run bounds is inconsistent
    #[error("invalid bounds for {what}: min {min} exceeds max {max}")]
    InvalidBounds {
        /// which parameter pair was rejected
        what: &'static str,
        /// lower bound as given
        min: usize,
        /// upper bound as given
        max: usize,
    },

    /// A run bound that must be at least one was zero
    #[error("{0} must be at least 1")]
    ZeroBound(&'static str),

    /// The replacement charset contained no characters
    #[error("charset must not be empty")]
    EmptyCharset,

    /// A mapping key carried an empty candidate list
    #[error("replacement list for key {0:?} must not be empty")]
    EmptyCandidates(String),

    /// A candidate weight was negative or not finite
    #[error("weight {weight} for key {key:?} is not a finite non-negative number")]
    InvalidWeight {
        /// mapping key owning the weight
        key: String,
        /// offending weight value
        weight: f64,
    },

    /// All candidate weights for a key summed to zero
    #[error("weights for key {0:?} sum to zero, cannot normalize")]
    ZeroWeightSum(String),

    /// A trigram path is saturated and the model accepts no further indexing
    #[error("trigram path {0:?} is at capacity, cannot index further")]
    Capacity(String),

    /// An increment would push a trigram count past the representable maximum
    #[error("trigram count for path {0:?} would overflow")]
    Overflow(String),

    /// A serialized Markov structure failed validation
    #[error("malformed model structure: {0}")]
    MalformedModel(String),

    /// A mapping table had a key or value of the wrong shape
    #[error("malformed mapping table: {0}")]
    MalformedMapping(String),

    /// Reading a mapping table from disk failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parsing a mapping table as JSON failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub(crate) fn check_probability(p: f64) -> Result<(), NoiseError> {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return Err(NoiseError::ProbabilityOutOfRange(p));
    }
    Ok(())
}
