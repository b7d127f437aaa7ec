//! Free-form charset replacement.
//!
//! Replaces variable-length runs of input characters with variable-length
//! runs drawn uniformly from a caller-supplied charset. No mapping table is
//! involved; this is pure noise injection.

use crate::error::{check_probability, NoiseError};
use crate::sampler::Sampler;

/// Configuration for [`replace_charset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharsetConfig {
    /// Shortest run of input characters consumed per replacement.
    pub min_chars_in: usize,
    /// Longest run of input characters consumed per replacement.
    pub max_chars_in: usize,
    /// Shortest replacement run emitted.
    pub min_chars_out: usize,
    /// Longest replacement run emitted.
    pub max_chars_out: usize,
    /// Probability of replacing each run.
    pub probability: f64,
}

impl CharsetConfig {
    /// The default configuration.
    pub const fn default() -> CharsetConfig {
        CharsetConfig {
            min_chars_in: 1,
            max_chars_in: 2,
            min_chars_out: 1,
            max_chars_out: 2,
            probability: 0.1,
        }
    }

    fn validate(&self) -> Result<(), NoiseError> {
        check_probability(self.probability)?;
        if self.max_chars_in < self.min_chars_in {
            return Err(NoiseError::InvalidBounds {
                what: "chars_in",
                min: self.min_chars_in,
                max: self.max_chars_in,
            });
        }
        if self.max_chars_out < self.min_chars_out {
            return Err(NoiseError::InvalidBounds {
                what: "chars_out",
                min: self.min_chars_out,
                max: self.max_chars_out,
            });
        }
        Ok(())
    }
}

/// Replaces runs of `text` with runs of characters drawn uniformly from
/// `charset`.
///
/// Whitespace is never consumed or replaced. A consumed run is truncated at
/// the first whitespace character; when `min_chars_in` permits a zero-length
/// run, the original character is kept and the replacement inserted after
/// it. Replacement characters are whole code points of `charset`.
pub fn replace_charset(
    text: &str,
    charset: &str,
    config: &CharsetConfig,
    seed: i64,
) -> Result<String, NoiseError> {
    config.validate()?;
    let alphabet: Vec<char> = charset.chars().collect();
    if alphabet.is_empty() {
        return Err(NoiseError::EmptyCharset);
    }

    let mut sampler = Sampler::from_seed(seed);
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            out.push(ch);
            i += 1;
            continue;
        }

        if !sampler.bernoulli(config.probability) {
            out.push(ch);
            i += 1;
            continue;
        }

        let mut chars_in = sampler.length(config.min_chars_in, config.max_chars_in);
        let chars_out = sampler.length(config.min_chars_out, config.max_chars_out);

        chars_in = chars_in.min(chars.len() - i);
        if let Some(stop) = chars[i..i + chars_in].iter().position(|c| c.is_whitespace()) {
            chars_in = stop;
        }

        if chars_in == 0 {
            out.push(ch);
        }
        for _ in 0..chars_out {
            if let Some(&c) = sampler.choose(&alphabet) {
                out.push(c);
            }
        }
        i += chars_in.max(1);
    }

    Ok(out)
}
