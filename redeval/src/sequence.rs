use std::collections::HashMap;
use std::ops::Index;

/// A single named sequence.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SequenceRecord {
    identifier: String,
    sequence: String,
}

impl SequenceRecord {
    /// Creates a new `SequenceRecord`.
    ///
    /// # Examples
    /// ```
    /// use redeval::sequence::SequenceRecord;
    ///
    /// let record = SequenceRecord::new("seq1", "ATTGCATCAT");
    /// assert_eq!(record.identifier(), "seq1");
    /// assert_eq!(record.sequence(), "ATTGCATCAT");
    /// ```
    #[must_use]
    pub fn new<T, U>(identifier: T, sequence: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Consumes this record and returns its identifier and sequence.
    #[must_use]
    pub fn into_data(self) -> (String, String) {
        (self.identifier, self.sequence)
    }
}

/// Mapping of sequence identifiers to sequences, preserving insertion order.
///
/// Inserting an identifier that is already present replaces its sequence in
/// place, so every identifier occurs exactly once.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SequenceCollection {
    records: Vec<SequenceRecord>,
    index: HashMap<String, usize>,
}

impl SequenceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sequence to the collection. Returns the previous sequence stored
    /// under the same identifier, if any.
    ///
    /// # Examples
    /// ```
    /// use redeval::sequence::SequenceCollection;
    ///
    /// let mut sequences = SequenceCollection::new();
    /// assert_eq!(sequences.insert("seq1", "ATG"), None);
    /// assert_eq!(sequences.insert("seq1", "GCA"), Some("ATG".to_owned()));
    /// assert_eq!(sequences.len(), 1);
    /// assert_eq!(sequences.get("seq1"), Some("GCA"));
    /// ```
    pub fn insert<T, U>(&mut self, identifier: T, sequence: U) -> Option<String>
    where
        T: Into<String>,
        U: Into<String>,
    {
        let record = SequenceRecord::new(identifier, sequence);

        if let Some(&position) = self.index.get(record.identifier()) {
            let old = std::mem::replace(&mut self.records[position], record);
            return Some(old.sequence);
        }

        self.index
            .insert(record.identifier.clone(), self.records.len());
        self.records.push(record);
        None
    }

    /// Returns the sequence stored under given identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.index
            .get(identifier)
            .map(|&position| self.records[position].sequence())
    }

    /// Returns the record at given insertion position.
    #[must_use]
    pub fn record(&self, position: usize) -> Option<&SequenceRecord> {
        self.records.get(position)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    /// Iterates over the identifiers in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(SequenceRecord::identifier)
    }
}

impl<T: Into<String>, U: Into<String>> FromIterator<(T, U)> for SequenceCollection {
    fn from_iter<I: IntoIterator<Item = (T, U)>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<T: Into<String>, U: Into<String>> Extend<(T, U)> for SequenceCollection {
    fn extend<I: IntoIterator<Item = (T, U)>>(&mut self, iter: I) {
        for (identifier, sequence) in iter {
            self.insert(identifier, sequence);
        }
    }
}

impl FromIterator<SequenceRecord> for SequenceCollection {
    fn from_iter<I: IntoIterator<Item = SequenceRecord>>(iter: I) -> Self {
        iter.into_iter().map(SequenceRecord::into_data).collect()
    }
}

impl Index<usize> for SequenceCollection {
    type Output = SequenceRecord;

    fn index(&self, position: usize) -> &Self::Output {
        &self.records[position]
    }
}

impl<'a> IntoIterator for &'a SequenceCollection {
    type Item = &'a SequenceRecord;
    type IntoIter = std::slice::Iter<'a, SequenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::{SequenceCollection, SequenceRecord};

    #[test]
    fn test_collection_preserves_order() {
        let sequences = SequenceCollection::from_iter([
            ("seq3", "GTCAGGCATA"),
            ("seq1", "ATTGCATCAT"),
            ("seq2", "AGTCAGGCAG"),
        ]);

        let identifiers: Vec<&str> = sequences.identifiers().collect();
        assert_eq!(identifiers, ["seq3", "seq1", "seq2"]);
        assert_eq!(sequences.get("seq1"), Some("ATTGCATCAT"));
        assert_eq!(sequences.get("seq4"), None);
        assert_eq!(sequences[1].identifier(), "seq1");
        assert_eq!(
            sequences.record(2),
            Some(&SequenceRecord::new("seq2", "AGTCAGGCAG"))
        );
    }

    #[test]
    fn test_collection_replace() {
        let mut sequences = SequenceCollection::new();
        sequences.insert("a", "AAA");
        sequences.insert("b", "CCC");
        sequences.insert("a", "GGG");

        let identifiers: Vec<&str> = sequences.identifiers().collect();
        assert_eq!(identifiers, ["a", "b"]);
        assert_eq!(sequences.get("a"), Some("GGG"));
        assert!(sequences.contains("b"));
        assert!(!sequences.contains("c"));
    }
}
