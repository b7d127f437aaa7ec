//! Case folding and case matching for word replacement.

use smol_str::SmolStr;

/// Lowercases every character, including multi-char expansions.
#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

/// Uppercases every character, including multi-char expansions.
#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

/// Uppercases the first character only.
#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

/// Whether the word is entirely upper case.
pub fn is_all_caps(word: &str) -> bool {
    upper_case(word) == word
}

/// Whether the word carries an initial capital.
pub fn is_first_caps(word: &str) -> bool {
    upper_first(word) == word
}

/// Re-cases `replacement` to match the shape of `original`: all-caps stays
/// all-caps, an initial capital is kept, anything else is lowercased.
pub fn match_case(original: &str, replacement: &str) -> SmolStr {
    let has_upper = original.chars().any(|c| c.is_uppercase());
    if is_all_caps(original) && has_upper {
        upper_case(replacement)
    } else if is_first_caps(original) && has_upper {
        upper_first(&lower_case(replacement))
    } else {
        lower_case(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_predicates() {
        assert!(is_all_caps("IDENTITETE"));
        assert!(!is_all_caps("Identitete"));
        assert!(is_first_caps("Identitete"));
        assert!(!is_first_caps("identitete"));
    }

    #[test]
    fn match_case_shapes() {
        assert_eq!(match_case("WORD", "teh"), "TEH");
        assert_eq!(match_case("Word", "teh"), "Teh");
        assert_eq!(match_case("word", "TEH"), "teh");
        assert_eq!(match_case("wOrd", "Teh"), "teh");
    }

    #[test]
    fn match_case_ignores_uncased_originals() {
        assert_eq!(match_case("123", "teh"), "teh");
        assert_eq!(match_case("-", "Teh"), "teh");
    }

    #[test]
    fn upper_first_handles_empty_and_unicode() {
        assert_eq!(upper_first(""), "");
        assert_eq!(upper_first("ábc"), "Ábc");
        assert_eq!(match_case("Æbleskive", "aebleskive"), "Aebleskive");
    }
}
