//! Shared constants: the seed sentinel, count saturation, default markers.

/// Seed value requesting a fresh, non-reproducible random source.
pub const SEED_UNSET: i64 = -1;

/// Largest count a Markov trigram cell can hold.
pub const COUNT_MAX: u32 = u32::MAX;

/// Default marker for masked vowels.
pub const DEFAULT_VOWEL_MASK: char = '\u{10}';
/// Default marker for masked consonants.
pub const DEFAULT_CONSONANT_MASK: char = '\u{11}';
/// Default marker for masked digits.
pub const DEFAULT_DIGIT_MASK: char = '\u{12}';
/// Default marker for masked non-whitespace characters of no other class.
pub const DEFAULT_NWS_MASK: char = '\u{13}';
/// Default class-agnostic marker.
pub const DEFAULT_GENERAL_MASK: char = '\u{14}';
/// Default marker for characters with a 2-byte UTF-8 encoding. Itself 2 bytes.
pub const DEFAULT_2BYTE_MASK: char = '\u{95}';
/// Default marker for characters with a 3-byte UTF-8 encoding. Itself 3 bytes.
pub const DEFAULT_3BYTE_MASK: char = '\u{FFFD}';
/// Default marker for characters with a 4-byte UTF-8 encoding. Itself 4 bytes.
pub const DEFAULT_4BYTE_MASK: char = '\u{10FFFD}';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_masks_match_their_class() {
        assert_eq!(DEFAULT_2BYTE_MASK.len_utf8(), 2);
        assert_eq!(DEFAULT_3BYTE_MASK.len_utf8(), 3);
        assert_eq!(DEFAULT_4BYTE_MASK.len_utf8(), 4);
    }
}
