use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{ReduceError, ReduceResult};

/// Table value marking a window that produces no output symbol.
pub const DELETION_MARKER: &str = ".";

/// Output of a single window of a [`ReductionMapping`].
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MappedSymbol {
    /// Window is replaced by given symbol(s).
    Symbol(String),
    /// Window is dropped.
    Deletion,
}

impl MappedSymbol {
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        matches!(self, MappedSymbol::Deletion)
    }

    /// Returns the table representation of this symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            MappedSymbol::Symbol(symbol) => symbol,
            MappedSymbol::Deletion => DELETION_MARKER,
        }
    }
}

impl From<String> for MappedSymbol {
    fn from(value: String) -> Self {
        if value == DELETION_MARKER {
            Self::Deletion
        } else {
            Self::Symbol(value)
        }
    }
}

impl From<&str> for MappedSymbol {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<MappedSymbol> for String {
    fn from(symbol: MappedSymbol) -> Self {
        match symbol {
            MappedSymbol::Symbol(symbol) => symbol,
            MappedSymbol::Deletion => DELETION_MARKER.to_owned(),
        }
    }
}

impl Display for MappedSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Table mapping every fixed-length window of input symbols to an output
/// symbol or to a deletion.
///
/// All keys have the same length, which becomes the window length of the
/// [`SequenceTransducer`](crate::reduction::transducer::SequenceTransducer)
/// built from the table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReductionMapping {
    table: HashMap<String, MappedSymbol>,
    window: usize,
}

impl ReductionMapping {
    /// Creates a new `ReductionMapping` from `(window, output)` pairs.
    ///
    /// # Errors
    /// Fails if there are no entries, or if the keys are not all of the same
    /// non-zero length.
    ///
    /// # Examples
    /// ```
    /// use redeval::reduction::mapping::{MappedSymbol, ReductionMapping};
    ///
    /// let mapping = ReductionMapping::new([("AA", "."), ("AC", "C")]).unwrap();
    /// assert_eq!(mapping.window(), 2);
    /// assert_eq!(mapping.get("AA"), Some(&MappedSymbol::Deletion));
    /// assert_eq!(mapping.get("AC"), Some(&MappedSymbol::Symbol("C".to_owned())));
    /// assert!(ReductionMapping::new([("AA", "A"), ("ACG", "C")]).is_err());
    /// ```
    pub fn new<I, K, V>(entries: I) -> ReduceResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MappedSymbol>,
    {
        let table: HashMap<String, MappedSymbol> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let window = table
            .keys()
            .next()
            .map(String::len)
            .ok_or(ReduceError::EmptyMapping)?;
        if window == 0 {
            return Err(ReduceError::InconsistentWindow {
                expected: 1,
                found: 0,
            });
        }
        if let Some(key) = table.keys().find(|key| key.len() != window) {
            return Err(ReduceError::InconsistentWindow {
                expected: window,
                found: key.len(),
            });
        }

        Ok(Self { table, window })
    }

    /// Window length, i.e. the length of every key.
    #[inline]
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    #[must_use]
    pub fn get(&self, window: &str) -> Option<&MappedSymbol> {
        self.table.get(window)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappedSymbol)> + '_ {
        self.table.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Reads a table stored as a flat JSON object of strings.
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let table: HashMap<String, MappedSymbol> = serde_json::from_reader(reader)?;
        Ok(Self::new(table)?)
    }

    /// Writes the table as a flat JSON object of strings, keys sorted.
    pub fn write_json<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let sorted: BTreeMap<&str, &MappedSymbol> = self.iter().collect();
        serde_json::to_writer_pretty(writer, &sorted)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::_internal_test_data::HOMOPOLYMER_2MER_TABLE;
    use crate::error::ReduceError;
    use crate::reduction::mapping::{MappedSymbol, ReductionMapping};

    #[test]
    fn test_mapping_window() {
        let mapping = ReductionMapping::new(HOMOPOLYMER_2MER_TABLE).unwrap();
        assert_eq!(mapping.window(), 2);
        assert_eq!(mapping.len(), 16);
        assert!(mapping.get("TT").unwrap().is_deletion());
        assert_eq!(mapping.get("TG").unwrap().as_str(), "G");
        assert_eq!(mapping.get("TGA"), None);
    }

    #[test]
    fn test_mapping_invalid() {
        let empty: [(&str, &str); 0] = [];
        assert_eq!(ReductionMapping::new(empty), Err(ReduceError::EmptyMapping));
        assert_eq!(
            ReductionMapping::new([("", "A")]),
            Err(ReduceError::InconsistentWindow {
                expected: 1,
                found: 0
            })
        );
        assert!(matches!(
            ReductionMapping::new([("AA", "A"), ("A", "A")]),
            Err(ReduceError::InconsistentWindow { .. })
        ));
    }

    #[test]
    fn test_mapped_symbol() {
        assert_eq!(MappedSymbol::from("."), MappedSymbol::Deletion);
        assert_eq!(MappedSymbol::from("AC"), MappedSymbol::Symbol("AC".into()));
        assert_eq!(String::from(MappedSymbol::Deletion), ".");
        assert_eq!(MappedSymbol::Symbol("G".into()).to_string(), "G");
    }

    #[test]
    fn test_json_round_trip() {
        let mapping = ReductionMapping::new(HOMOPOLYMER_2MER_TABLE).unwrap();

        let mut data = Vec::new();
        mapping.write_json(&mut data).unwrap();
        let json = String::from_utf8(data.clone()).unwrap();
        assert!(json.contains("\"AA\": \".\""));
        assert!(json.contains("\"AC\": \"C\""));

        let read = ReductionMapping::read_json(data.as_slice()).unwrap();
        assert_eq!(read, mapping);
    }

    #[test]
    fn test_json_invalid() {
        assert!(ReductionMapping::read_json(&b"{}"[..]).is_err());
        assert!(ReductionMapping::read_json(&b"{\"AA\": 1}"[..]).is_err());
        assert!(ReductionMapping::read_json(&b"{\"AA\": \"A\", \"C\": \"C\"}"[..]).is_err());
    }
}
