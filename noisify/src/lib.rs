/*! Text noising for training-data augmentation.

Perturbs text with controllable, reproducible noise: character substitution
driven by weighted mapping tables (OCR-error, leet-speak, keyboard-adjacency,
homoglyph or phonetic maps), word-level misspelling substitution,
character-class-aware masking, free-form charset replacement, and a trigram
Markov model that learns and replays local character transition statistics.

Every operation takes an explicit seed: any non-negative seed reproduces the
output byte for byte, `-1` draws from the operating system. Mapping tables
are plain JSON fed through [`mapper::Mapper`]; their content (which OCR or
leet table to ship) is the caller's business.

# Usage examples

```
use noisify::augment::{augment, ReplacementMap, SortOrder};
use noisify::distribution::MappingValue;

let map = ReplacementMap::from_pairs([
    ("rn", MappingValue::Single("m".into())),
])?;
assert_eq!(augment("morning", &map, 1.0, SortOrder::Ascending, 42)?, "moming");
# Ok::<(), noisify::error::NoiseError>(())
```

```
use noisify::markov::{MarkovModel, WhitespaceMode};

let mut model = MarkovModel::new();
model.index("the quick brown fox")?;
let noised = model.replace("the quick brown fox", 0.3, WhitespaceMode::None, 7)?;
assert_eq!(noised.chars().count(), "the quick brown fox".chars().count());
# Ok::<(), noisify::error::NoiseError>(())
```
*/

#![warn(missing_docs)]

pub mod augment;
pub mod charset;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod mapper;
pub mod markov;
pub mod mask;
pub mod sampler;
pub mod tokenizer;
pub mod trie;
pub mod words;
