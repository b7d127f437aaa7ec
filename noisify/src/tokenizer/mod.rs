//! Word-boundary tokenization for word-level noising.

use unic_segment::{WordBoundIndices, Words};

pub mod case_handling;

/// Unicode word-boundary segmentation of text.
pub trait Tokenize {
    /// Every boundary-delimited segment with its byte offset.
    fn word_bound_indices(&self) -> WordBoundIndices;
    /// Only the segments containing an alphanumeric character.
    fn words(&self) -> Words;
}

impl Tokenize for str {
    fn word_bound_indices(&self) -> WordBoundIndices {
        WordBoundIndices::new(self)
    }

    fn words(&self) -> Words {
        Words::new(self, |s| s.chars().any(|ch| ch.is_alphanumeric()))
    }
}
