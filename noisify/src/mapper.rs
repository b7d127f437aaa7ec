//! Loading of mapping tables from JSON.
//!
//! A mapping table file is a JSON object whose values take any of the three
//! [`MappingValue`] shapes. The [`Mapper`] owns the normalized
//! [`ReplacementMap`] and offers the augmentation calls directly, so a
//! loaded table can be applied as-is.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hashbrown::HashMap;
use serde_json::Value;

use crate::augment::{augment, augment_batch, ReplacementMap, SortOrder};
use crate::distribution::MappingValue;
use crate::error::NoiseError;

/// A loaded, normalized mapping table.
pub struct Mapper {
    map: ReplacementMap,
}

impl Mapper {
    /// Loads a JSON mapping table from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Mapper, NoiseError> {
        let file = File::open(path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        Mapper::from_value(&value)
    }

    /// Builds a mapper from an in-memory JSON value.
    pub fn from_value(value: &Value) -> Result<Mapper, NoiseError> {
        let table: HashMap<String, MappingValue> = serde_json::from_value(value.clone())
            .map_err(|e| NoiseError::MalformedMapping(e.to_string()))?;
        Ok(Mapper {
            map: ReplacementMap::from_pairs(table)?,
        })
    }

    /// The normalized replacement map.
    pub fn map(&self) -> &ReplacementMap {
        &self.map
    }

    /// Applies the table to one string; see [`augment`].
    pub fn augment(
        &self,
        text: &str,
        probability: f64,
        order: SortOrder,
        seed: i64,
    ) -> Result<String, NoiseError> {
        augment(text, &self.map, probability, order, seed)
    }

    /// Applies the table to each element; see [`augment_batch`].
    pub fn augment_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        probability: f64,
        order: SortOrder,
        seed: i64,
    ) -> Result<Vec<String>, NoiseError> {
        augment_batch(texts, &self.map, probability, order, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn from_value_accepts_all_three_shapes() {
        let mapper = Mapper::from_value(&json!({
            "a": "x",
            "b": ["y", "z"],
            "c": {"p": 0.75, "q": 0.25}
        }))
        .unwrap();
        assert_eq!(mapper.map().len(), 3);
    }

    #[test]
    fn from_value_rejects_wrong_shapes() {
        assert!(matches!(
            Mapper::from_value(&json!({"a": 5})),
            Err(NoiseError::MalformedMapping(_))
        ));
        assert!(matches!(
            Mapper::from_value(&json!(["a"])),
            Err(NoiseError::MalformedMapping(_))
        ));
    }

    #[test]
    fn from_path_round_trips_a_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json!({"o": ["0"], "l": ["1"]})).unwrap();
        let mapper = Mapper::from_path(file.path()).unwrap();
        assert_eq!(
            mapper.augment("look", 1.0, SortOrder::Ascending, 3).unwrap(),
            "100k"
        );
    }

    #[test]
    fn from_path_surfaces_io_and_parse_errors() {
        assert!(matches!(
            Mapper::from_path("/definitely/not/here.json"),
            Err(NoiseError::Io(_))
        ));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Mapper::from_path(file.path()),
            Err(NoiseError::Json(_))
        ));
    }

    #[test]
    fn mapper_batches_share_a_seed_stream() {
        let mapper = Mapper::from_value(&json!({"a": ["1", "2", "3"]})).unwrap();
        let a = mapper
            .augment_batch(&["aa", "aaa"], 1.0, SortOrder::Ascending, 8)
            .unwrap();
        let b = mapper
            .augment_batch(&["aa", "aaa"], 1.0, SortOrder::Ascending, 8)
            .unwrap();
        assert_eq!(a, b);
    }
}
