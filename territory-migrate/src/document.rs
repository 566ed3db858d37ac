//! The target document, grouped by territory.
//!
//! Territories and squares are kept in first-encounter order and serialized
//! by hand so the output reads in the same order as the legacy input.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SquareEntry {
    pub edges: Value,
    pub square_marker: Option<Value>,
}

impl Serialize for SquareEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("edges", &self.edges)?;
        map.serialize_entry("squareMarker", &self.square_marker)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryRecord {
    pub color: Value,
    pub terr_marker: Value,
    squares: Vec<(char, SquareEntry)>,
}

impl TerritoryRecord {
    pub fn new(color: Value, terr_marker: Value) -> Self {
        Self {
            color,
            terr_marker,
            squares: Vec::new(),
        }
    }

    /// Attach a square. Returns the replaced entry if the letter was already
    /// present; the replacement keeps the original position.
    pub fn insert_square(&mut self, letter: char, entry: SquareEntry) -> Option<SquareEntry> {
        match self.squares.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, existing)) => Some(std::mem::replace(existing, entry)),
            None => {
                self.squares.push((letter, entry));
                None
            }
        }
    }

    pub fn square(&self, letter: char) -> Option<&SquareEntry> {
        self.squares
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, entry)| entry)
    }

    pub fn squares(&self) -> impl Iterator<Item = (char, &SquareEntry)> {
        self.squares.iter().map(|(l, entry)| (*l, entry))
    }

    pub fn square_count(&self) -> usize {
        self.squares.len()
    }
}

impl Serialize for TerritoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.squares.len()))?;
        map.serialize_entry("color", &self.color)?;
        map.serialize_entry("terrMarker", &self.terr_marker)?;
        for (letter, entry) in &self.squares {
            map.serialize_entry(&format!("Square{}", letter), entry)?;
        }
        map.end()
    }
}

/// `{"territories": {"terr<N>": ...}}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetDocument {
    territories: Vec<(u32, TerritoryRecord)>,
    index: HashMap<u32, usize>,
}

impl TargetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn territory(&self, number: u32) -> Option<&TerritoryRecord> {
        self.index.get(&number).map(|&i| &self.territories[i].1)
    }

    /// Fetch the record for `number`, creating it with `init` on first use.
    /// An existing record is never rebuilt.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        number: u32,
        init: impl FnOnce() -> Result<TerritoryRecord, E>,
    ) -> Result<&mut TerritoryRecord, E> {
        let i = match self.index.get(&number) {
            Some(&i) => i,
            None => {
                let record = init()?;
                self.territories.push((number, record));
                let i = self.territories.len() - 1;
                self.index.insert(number, i);
                i
            }
        };
        Ok(&mut self.territories[i].1)
    }

    /// Territory numbers and records in first-encounter order.
    pub fn territories(&self) -> impl Iterator<Item = (u32, &TerritoryRecord)> {
        self.territories.iter().map(|(n, record)| (*n, record))
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }
}

struct Territories<'a>(&'a [(u32, TerritoryRecord)]);

impl Serialize for Territories<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (number, record) in self.0 {
            map.serialize_entry(&format!("terr{}", number), record)?;
        }
        map.end()
    }
}

impl Serialize for TargetDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("territories", &Territories(&self.territories))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(edges: Value, marker: Option<Value>) -> SquareEntry {
        SquareEntry {
            edges,
            square_marker: marker,
        }
    }

    #[test]
    fn test_serializes_target_shape() {
        let mut doc = TargetDocument::new();
        let record = doc
            .get_or_try_insert_with::<()>(1, || Ok(TerritoryRecord::new(json!("red"), json!("M1"))))
            .unwrap();
        record.insert_square('A', entry(json!([[0, 0]]), Some(json!("a1"))));
        record.insert_square('B', entry(json!([[2, 2]]), None));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "territories": {
                    "terr1": {
                        "color": "red",
                        "terrMarker": "M1",
                        "SquareA": {"edges": [[0, 0]], "squareMarker": "a1"},
                        "SquareB": {"edges": [[2, 2]], "squareMarker": null}
                    }
                }
            })
        );
    }

    #[test]
    fn test_output_keeps_insertion_order() {
        let mut doc = TargetDocument::new();
        for n in [3, 1, 2] {
            let record = doc
                .get_or_try_insert_with::<()>(n, || Ok(TerritoryRecord::new(json!(n), json!(n))))
                .unwrap();
            record.insert_square('C', entry(json!([]), None));
            record.insert_square('A', entry(json!([]), None));
        }
        let text = serde_json::to_string(&doc).unwrap();
        let t3 = text.find("terr3").unwrap();
        let t1 = text.find("terr1").unwrap();
        let t2 = text.find("terr2").unwrap();
        assert!(t3 < t1 && t1 < t2);
        assert!(text.find("SquareC").unwrap() < text.find("SquareA").unwrap());
    }

    #[test]
    fn test_record_created_once() {
        let mut doc = TargetDocument::new();
        doc.get_or_try_insert_with::<()>(4, || Ok(TerritoryRecord::new(json!("a"), json!(1))))
            .unwrap();
        let record = doc
            .get_or_try_insert_with::<()>(4, || panic!("record rebuilt"))
            .unwrap();
        assert_eq!(record.color, json!("a"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_init_error_leaves_document_untouched() {
        let mut doc = TargetDocument::new();
        let result = doc.get_or_try_insert_with(9, || Err("no color"));
        assert_eq!(result.err(), Some("no color"));
        assert!(doc.is_empty());
        assert!(doc.territory(9).is_none());
    }

    #[test]
    fn test_duplicate_square_replaces_in_place() {
        let mut record = TerritoryRecord::new(json!("red"), json!(null));
        record.insert_square('A', entry(json!(1), Some(json!("first"))));
        record.insert_square('B', entry(json!(2), None));
        let old = record.insert_square('A', entry(json!(3), Some(json!("second"))));

        assert_eq!(old, Some(entry(json!(1), Some(json!("first")))));
        assert_eq!(record.square_count(), 2);
        let letters: Vec<char> = record.squares().map(|(l, _)| l).collect();
        assert_eq!(letters, vec!['A', 'B']);
        assert_eq!(record.square('A').unwrap().edges, json!(3));
    }
}
