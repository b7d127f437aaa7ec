//! Word-level misspelling substitution.
//!
//! A [`MisspellingDict`] maps case-folded words to misspelling candidates
//! through a word trie with exact lookup. Replacement walks the input's
//! Unicode word boundaries and re-cases every substituted word to match the
//! original.

use serde_json::Value;
use smol_str::SmolStr;

use crate::error::{check_probability, NoiseError};
use crate::sampler::Sampler;
use crate::tokenizer::case_handling::{lower_case, match_case};
use crate::tokenizer::Tokenize;
use crate::trie::Trie;

/// Dictionary of word → misspelling candidates, keyed case-insensitively.
pub struct MisspellingDict {
    trie: Trie<Vec<SmolStr>>,
}

impl MisspellingDict {
    /// Creates an empty dictionary.
    pub fn new() -> MisspellingDict {
        MisspellingDict { trie: Trie::new() }
    }

    /// Builds a dictionary from `(word, candidates)` pairs.
    pub fn from_pairs<K, C, I>(pairs: I) -> MisspellingDict
    where
        K: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
        I: IntoIterator<Item = (K, C)>,
    {
        let mut dict = MisspellingDict::new();
        for (word, candidates) in pairs {
            dict.insert(
                word.as_ref(),
                candidates
                    .into_iter()
                    .map(|c| SmolStr::new(c.as_ref()))
                    .collect(),
            );
        }
        dict
    }

    /// Builds a dictionary from a JSON object of word → list-of-strings.
    ///
    /// Any other value shape is a mapping type error.
    pub fn from_json(value: &Value) -> Result<MisspellingDict, NoiseError> {
        let obj = value.as_object().ok_or_else(|| {
            NoiseError::MalformedMapping("expected an object of word lists".into())
        })?;
        let mut dict = MisspellingDict::new();
        for (word, candidates) in obj {
            let list = candidates.as_array().ok_or_else(|| {
                NoiseError::MalformedMapping(format!(
                    "candidates for {:?} must be a list of strings",
                    word
                ))
            })?;
            let mut out = Vec::with_capacity(list.len());
            for item in list {
                let s = item.as_str().ok_or_else(|| {
                    NoiseError::MalformedMapping(format!(
                        "candidates for {:?} must be a list of strings",
                        word
                    ))
                })?;
                out.push(SmolStr::new(s));
            }
            dict.insert(word, out);
        }
        Ok(dict)
    }

    /// Inserts a word, case-folding the key. Replaces prior candidates.
    pub fn insert(&mut self, word: &str, candidates: Vec<SmolStr>) {
        self.trie.insert(&lower_case(word), candidates);
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Whether the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Exact, case-insensitive lookup of one word.
    pub fn lookup(&self, word: &str) -> Option<&[SmolStr]> {
        self.trie.get(&lower_case(word)).map(Vec::as_slice)
    }

    /// Replaces known words of `text` with misspelling candidates, each
    /// with the given probability, matching the original word's casing.
    pub fn replace(&self, text: &str, probability: f64, seed: i64) -> Result<String, NoiseError> {
        check_probability(probability)?;
        let mut sampler = Sampler::from_seed(seed);
        let mut out = String::with_capacity(text.len());

        for (_, segment) in text.word_bound_indices() {
            let is_word = segment.chars().any(|ch| ch.is_alphanumeric());
            if !is_word || !sampler.bernoulli(probability) {
                out.push_str(segment);
                continue;
            }
            let candidates = self.lookup(segment).filter(|c| !c.is_empty());
            match candidates {
                Some(candidates) => {
                    let chosen = sampler.choose(candidates).map(SmolStr::as_str);
                    match chosen {
                        Some(chosen) => out.push_str(&match_case(segment, chosen)),
                        None => out.push_str(segment),
                    }
                }
                None => out.push_str(segment),
            }
        }

        Ok(out)
    }
}
