//! Character-class-aware masking.
//!
//! Each non-whitespace character belongs to exactly one class; masked runs
//! are replaced by per-class marker characters, or by a class-agnostic
//! general marker. The markers for multi-byte classes occupy the same
//! encoded width as the characters they replace, so class-specific masking
//! preserves the byte length of the input as well as its character count.

use unic_ucd_category::GeneralCategory;

use crate::constants::{
    DEFAULT_2BYTE_MASK, DEFAULT_3BYTE_MASK, DEFAULT_4BYTE_MASK, DEFAULT_CONSONANT_MASK,
    DEFAULT_DIGIT_MASK, DEFAULT_GENERAL_MASK, DEFAULT_NWS_MASK, DEFAULT_VOWEL_MASK,
};
use crate::error::{check_probability, NoiseError};
use crate::sampler::Sampler;

/// The masking class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// ASCII vowel, either case.
    Vowel,
    /// Letter that is not a vowel.
    Consonant,
    /// ASCII digit.
    Digit,
    /// Any other non-whitespace character with a 1-byte encoding.
    Other,
    /// Character with a 2-byte UTF-8 encoding.
    TwoByte,
    /// Character with a 3-byte UTF-8 encoding.
    ThreeByte,
    /// Character with a 4-byte UTF-8 encoding.
    FourByte,
}

impl CharClass {
    /// Classifies a character. Encoding width takes precedence over the
    /// letter and digit classes.
    pub fn of(ch: char) -> CharClass {
        match ch.len_utf8() {
            2 => CharClass::TwoByte,
            3 => CharClass::ThreeByte,
            4 => CharClass::FourByte,
            _ => {
                if matches!(ch.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u') {
                    CharClass::Vowel
                } else if GeneralCategory::of(ch).is_letter() {
                    CharClass::Consonant
                } else if ch.is_ascii_digit() {
                    CharClass::Digit
                } else {
                    CharClass::Other
                }
            }
        }
    }
}

/// Marker characters used for each masking class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSet {
    /// Marker for vowels.
    pub vowel: char,
    /// Marker for consonants.
    pub consonant: char,
    /// Marker for digits.
    pub digit: char,
    /// Marker for other non-whitespace characters.
    pub nws: char,
    /// Class-agnostic marker.
    pub general: char,
    /// Marker for 2-byte characters.
    pub two_byte: char,
    /// Marker for 3-byte characters.
    pub three_byte: char,
    /// Marker for 4-byte characters.
    pub four_byte: char,
}

impl MaskSet {
    /// The default marker set.
    pub const fn default() -> MaskSet {
        MaskSet {
            vowel: DEFAULT_VOWEL_MASK,
            consonant: DEFAULT_CONSONANT_MASK,
            digit: DEFAULT_DIGIT_MASK,
            nws: DEFAULT_NWS_MASK,
            general: DEFAULT_GENERAL_MASK,
            two_byte: DEFAULT_2BYTE_MASK,
            three_byte: DEFAULT_3BYTE_MASK,
            four_byte: DEFAULT_4BYTE_MASK,
        }
    }

    fn for_class(&self, class: CharClass) -> char {
        match class {
            CharClass::Vowel => self.vowel,
            CharClass::Consonant => self.consonant,
            CharClass::Digit => self.digit,
            CharClass::Other => self.nws,
            CharClass::TwoByte => self.two_byte,
            CharClass::ThreeByte => self.three_byte,
            CharClass::FourByte => self.four_byte,
        }
    }
}

/// Configuration for [`mask`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskConfig {
    /// Probability of masking each run.
    pub probability: f64,
    /// Shortest run length considered for masking.
    pub min_consecutive: usize,
    /// Longest run length considered for masking.
    pub max_consecutive: usize,
    /// Marker characters per class.
    pub masks: MaskSet,
    /// Probability that a masked run uses the general marker throughout
    /// instead of per-character class markers.
    pub general_mask_probability: f64,
    /// Exclude digits from masking entirely.
    pub skip_digits: bool,
}

impl MaskConfig {
    /// The default configuration.
    pub const fn default() -> MaskConfig {
        MaskConfig {
            probability: 0.1,
            min_consecutive: 1,
            max_consecutive: 2,
            masks: MaskSet::default(),
            general_mask_probability: 0.5,
            skip_digits: false,
        }
    }

    fn validate(&self) -> Result<(), NoiseError> {
        check_probability(self.probability)?;
        check_probability(self.general_mask_probability)?;
        if self.max_consecutive < 1 {
            return Err(NoiseError::ZeroBound("max_consecutive"));
        }
        if self.min_consecutive > self.max_consecutive {
            return Err(NoiseError::InvalidBounds {
                what: "consecutive",
                min: self.min_consecutive,
                max: self.max_consecutive,
            });
        }
        Ok(())
    }
}

/// Masks runs of `text` according to `config`. The character count of the
/// output always equals that of the input.
pub fn mask(text: &str, config: &MaskConfig, seed: i64) -> Result<String, NoiseError> {
    config.validate()?;
    let mut sampler = Sampler::from_seed(seed);
    Ok(mask_with(text, config, &mut sampler))
}

/// Masks each element independently, all drawing from one seed stream.
pub fn mask_batch<S: AsRef<str>>(
    texts: &[S],
    config: &MaskConfig,
    seed: i64,
) -> Result<Vec<String>, NoiseError> {
    config.validate()?;
    let mut sampler = Sampler::from_seed(seed);
    Ok(texts
        .iter()
        .map(|text| mask_with(text.as_ref(), config, &mut sampler))
        .collect())
}

/// Whether a character terminates masking runs and is never masked itself.
fn is_barrier(ch: char, skip_digits: bool) -> bool {
    ch.is_whitespace() || (skip_digits && ch.is_ascii_digit())
}

fn mask_with(text: &str, config: &MaskConfig, sampler: &mut Sampler) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let remaining = chars.len() - i;

        if is_barrier(ch, config.skip_digits) || remaining < config.min_consecutive {
            out.push(ch);
            i += 1;
            continue;
        }

        if !sampler.bernoulli(config.probability) {
            out.push(ch);
            i += 1;
            continue;
        }

        let drawn = sampler.length(config.min_consecutive, config.max_consecutive);
        let mut run = drawn.min(remaining);
        if let Some(stop) = chars[i..i + run]
            .iter()
            .position(|&c| is_barrier(c, config.skip_digits))
        {
            run = stop;
        }
        if run == 0 {
            out.push(ch);
            i += 1;
            continue;
        }

        let general = sampler.bernoulli(config.general_mask_probability);
        for &c in &chars[i..i + run] {
            out.push(if general {
                config.masks.general
            } else {
                config.masks.for_class(CharClass::of(c))
            });
        }
        i += run;
    }

    out
}
