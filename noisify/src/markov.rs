//! Trigram Markov model over ASCII text.
//!
//! Two three-level count tries record character-triple statistics: the
//! forward trie keys the first two characters of each window and counts the
//! third, the reverse trie keys the last two and counts the first. The model
//! is grown by [`MarkovModel::index`], serialized with
//! [`MarkovModel::dump`]/[`MarkovModel::load`], and drives context-sensitive
//! character substitution through [`MarkovModel::replace`].

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::trace;
use serde_json::{Map, Value};

use crate::constants::COUNT_MAX;
use crate::error::{check_probability, NoiseError};
use crate::sampler::Sampler;

/// How [`MarkovModel::replace`] treats whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// Whitespace is never substituted and never introduced.
    None,
    /// Whitespace positions are eligible for substitution, but whitespace
    /// candidates are dropped from every distribution; a context whose whole
    /// distribution is whitespace leaves the text unchanged.
    Zero,
    /// Whitespace drawn from the model is honored only at token boundaries;
    /// interior draws of whitespace leave the character unchanged.
    Boundary,
}

type NodeId = usize;

/// One trie node, holding both child edges and third-character counts.
/// Counts are only populated at bigram depth.
#[derive(Default)]
struct CountNode {
    children: HashMap<char, NodeId>,
    counts: BTreeMap<char, u32>,
}

/// Arena-indexed three-level count trie.
struct CountTrie {
    nodes: Vec<CountNode>,
}

impl CountTrie {
    fn new() -> CountTrie {
        CountTrie {
            nodes: vec![CountNode::default()],
        }
    }

    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[node].children.get(&ch).copied()
    }

    fn child_or_insert(&mut self, node: NodeId, ch: char) -> NodeId {
        if let Some(&id) = self.nodes[node].children.get(&ch) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(CountNode::default());
        self.nodes[node].children.insert(ch, id);
        id
    }

    /// Counts stored under the two-character context path, if present.
    fn counts(&self, first: char, second: char) -> Option<&BTreeMap<char, u32>> {
        let a = self.child(0, first)?;
        let b = self.child(a, second)?;
        Some(&self.nodes[b].counts)
    }

    fn counts_mut(&mut self, first: char, second: char) -> &mut BTreeMap<char, u32> {
        let a = self.child_or_insert(0, first);
        let b = self.child_or_insert(a, second);
        &mut self.nodes[b].counts
    }

    /// Increments the count for `third` under the given context. Returns
    /// `false` without changing anything when the cell is saturated.
    fn bump(&mut self, first: char, second: char, third: char) -> bool {
        let cell = self.counts_mut(first, second).entry(third).or_insert(0);
        if *cell == COUNT_MAX {
            return false;
        }
        *cell += 1;
        true
    }

    /// Serializes the trie as nested single-character-keyed objects.
    fn to_value(&self) -> Value {
        Value::Object(self.level_value(0, 0))
    }

    fn level_value(&self, node: NodeId, depth: usize) -> Map<String, Value> {
        let mut map = Map::new();
        if depth < 2 {
            for (&ch, &child) in self.nodes[node].children.iter() {
                map.insert(
                    ch.to_string(),
                    Value::Object(self.level_value(child, depth + 1)),
                );
            }
        } else {
            for (&ch, &count) in self.nodes[node].counts.iter() {
                map.insert(ch.to_string(), Value::from(count));
            }
        }
        map
    }
}

/// Paired forward/reverse trigram count tries with saturation tracking.
pub struct MarkovModel {
    forward: CountTrie,
    reverse: CountTrie,
    /// Description of the first saturated path, once any cell reaches
    /// [`COUNT_MAX`]; the model then refuses all further indexing.
    saturated: Option<String>,
}

impl MarkovModel {
    /// Creates an empty model.
    pub fn new() -> MarkovModel {
        MarkovModel {
            forward: CountTrie::new(),
            reverse: CountTrie::new(),
            saturated: None,
        }
    }

    /// Whether some count cell is saturated and indexing is refused.
    pub fn is_at_capacity(&self) -> bool {
        self.saturated.is_some()
    }

    /// Indexes every 3-character window of `text` that lies wholly within
    /// the supported alphabet (ASCII); other windows are skipped silently.
    /// Returns the number of windows indexed.
    ///
    /// Fails with [`NoiseError::Capacity`] when the model is already
    /// saturated, and with [`NoiseError::Overflow`] when an increment finds
    /// its cell at the representable maximum.
    pub fn index(&mut self, text: &str) -> Result<usize, NoiseError> {
        if let Some(path) = &self.saturated {
            return Err(NoiseError::Capacity(path.clone()));
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() < 3 {
            return Ok(0);
        }

        let mut indexed = 0;
        for window in chars.windows(3) {
            if !window.iter().all(|c| c.is_ascii()) {
                continue;
            }
            let (a, b, c) = (window[0], window[1], window[2]);
            if !self.forward.bump(a, b, c) {
                let path = format!("forward {}{}{}", a, b, c);
                self.saturated = Some(path.clone());
                return Err(NoiseError::Overflow(path));
            }
            if !self.reverse.bump(c, b, a) {
                let path = format!("reverse {}{}{}", c, b, a);
                self.saturated = Some(path.clone());
                return Err(NoiseError::Overflow(path));
            }
            indexed += 1;
        }

        trace!("indexed {} trigram windows", indexed);
        Ok(indexed)
    }

    /// Substitutes characters of `text` according to the local trigram
    /// statistics, each position with the given probability.
    ///
    /// A position's candidate distribution sums the forward counts under the
    /// two preceding characters and the reverse counts under the two
    /// following ones; positions with no distribution are left unchanged.
    /// Characters outside the supported alphabet always pass through.
    pub fn replace(
        &self,
        text: &str,
        probability: f64,
        mode: WhitespaceMode,
        seed: i64,
    ) -> Result<String, NoiseError> {
        check_probability(probability)?;
        let mut sampler = Sampler::from_seed(seed);
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let mut out = String::with_capacity(text.len());

        for i in 0..n {
            let ch = chars[i];

            if !sampler.bernoulli(probability) {
                out.push(ch);
                continue;
            }
            if !ch.is_ascii() {
                out.push(ch);
                continue;
            }
            if ch.is_whitespace() && mode != WhitespaceMode::Zero {
                out.push(ch);
                continue;
            }

            let mut tally: BTreeMap<char, u64> = BTreeMap::new();
            if i >= 2 && chars[i - 2].is_ascii() && chars[i - 1].is_ascii() {
                if let Some(counts) = self.forward.counts(chars[i - 2], chars[i - 1]) {
                    for (&candidate, &count) in counts.iter().filter(|(_, &c)| c > 0) {
                        *tally.entry(candidate).or_insert(0) += u64::from(count);
                    }
                }
            }
            if i + 2 < n && chars[i + 1].is_ascii() && chars[i + 2].is_ascii() {
                if let Some(counts) = self.reverse.counts(chars[i + 2], chars[i + 1]) {
                    for (&candidate, &count) in counts.iter().filter(|(_, &c)| c > 0) {
                        *tally.entry(candidate).or_insert(0) += u64::from(count);
                    }
                }
            }

            if matches!(mode, WhitespaceMode::None | WhitespaceMode::Zero) {
                tally.retain(|candidate, _| !candidate.is_whitespace());
            }
            if tally.is_empty() {
                out.push(ch);
                continue;
            }

            let candidates: Vec<char> = tally.keys().copied().collect();
            let counts: Vec<u64> = tally.values().copied().collect();
            let drawn = candidates[sampler.weighted_counts(&counts)];

            if drawn.is_whitespace() && !boundary(&chars, i) {
                // Boundary mode: interior whitespace draws are suppressed.
                out.push(ch);
            } else {
                out.push(drawn);
            }
        }

        Ok(out)
    }

    /// Serializes the full count structure as nested JSON-compatible data
    /// with top-level `forward` and `reverse` keys.
    pub fn dump(&self) -> Value {
        let mut map = Map::new();
        map.insert("forward".into(), self.forward.to_value());
        map.insert("reverse".into(), self.reverse.to_value());
        Value::Object(map)
    }

    /// Replaces the model's contents with a structure produced by
    /// [`dump`](Self::dump).
    ///
    /// The whole structure is validated before any mutation: single-ASCII-
    /// character keys throughout, objects at the two context levels, and
    /// non-negative integer counts at the leaves. Counts beyond the
    /// representable maximum fail with [`NoiseError::Overflow`]; a count at
    /// the maximum loads, but leaves the model saturated.
    pub fn load(&mut self, value: &Value) -> Result<(), NoiseError> {
        let obj = value
            .as_object()
            .ok_or_else(|| NoiseError::MalformedModel("expected an object".into()))?;
        for key in obj.keys() {
            if key != "forward" && key != "reverse" {
                return Err(NoiseError::MalformedModel(format!(
                    "unexpected top-level key {:?}",
                    key
                )));
            }
        }
        let forward = obj
            .get("forward")
            .ok_or_else(|| NoiseError::MalformedModel("missing \"forward\"".into()))?;
        let reverse = obj
            .get("reverse")
            .ok_or_else(|| NoiseError::MalformedModel("missing \"reverse\"".into()))?;

        validate_side(forward, 0)?;
        validate_side(reverse, 0)?;

        let mut saturated = None;
        self.forward = build_side(forward, "forward", &mut saturated);
        self.reverse = build_side(reverse, "reverse", &mut saturated);
        self.saturated = saturated;
        Ok(())
    }
}

/// Whether position `i` sits at the start or end of a run of non-whitespace.
fn boundary(chars: &[char], i: usize) -> bool {
    i == 0
        || i + 1 == chars.len()
        || chars[i - 1].is_whitespace()
        || chars[i + 1].is_whitespace()
}

fn key_char(key: &str) -> Result<char, NoiseError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => Ok(ch),
        _ => Err(NoiseError::MalformedModel(format!(
            "keys must be single ASCII characters, got {:?}",
            key
        ))),
    }
}

fn validate_side(value: &Value, depth: usize) -> Result<(), NoiseError> {
    let obj = value.as_object().ok_or_else(|| {
        NoiseError::MalformedModel(format!("expected an object at depth {}", depth))
    })?;
    for (key, child) in obj {
        key_char(key)?;
        if depth < 2 {
            validate_side(child, depth + 1)?;
        } else {
            let count = child.as_u64().ok_or_else(|| {
                NoiseError::MalformedModel(format!(
                    "count for {:?} must be a non-negative integer",
                    key
                ))
            })?;
            if count > u64::from(COUNT_MAX) {
                return Err(NoiseError::Overflow(format!("loaded count for {:?}", key)));
            }
        }
    }
    Ok(())
}

/// Builds one trie from a validated structure, recording the first
/// saturated path seen.
fn build_side(value: &Value, direction: &str, saturated: &mut Option<String>) -> CountTrie {
    let mut trie = CountTrie::new();
    let root = value.as_object().expect("validated as object");
    for (k1, level1) in root {
        let c1 = key_char(k1).expect("validated as single char");
        let first = trie.child_or_insert(0, c1);
        let level1 = level1.as_object().expect("validated as object");
        for (k2, level2) in level1 {
            let c2 = key_char(k2).expect("validated as single char");
            let second = trie.child_or_insert(first, c2);
            let level2 = level2.as_object().expect("validated as object");
            for (k3, leaf) in level2 {
                let c3 = key_char(k3).expect("validated as single char");
                let count = leaf.as_u64().expect("validated as integer") as u32;
                trie.nodes[second].counts.insert(c3, count);
                if count == COUNT_MAX && saturated.is_none() {
                    *saturated = Some(format!("{} {}{}{}", direction, c1, c2, c3));
                }
            }
        }
    }
    trie
}
