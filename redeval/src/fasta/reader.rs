use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::BufRead;
use std::mem;

use log::{debug, warn};

use crate::fasta::FASTA_TITLE_PREFIX;
use crate::sequence::{SequenceCollection, SequenceRecord};

/// Error occurring during parsing a FASTA file.
#[derive(Debug)]
pub enum FastaReaderError {
    /// I/O error occurred when reading the FASTA file.
    IoError(std::io::Error),
    /// End-Of-File reached before a record started.
    EofReached,
    /// Not a valid FASTA file.
    InvalidFormat,
    /// The clean and the noisy file of a paired dataset have different
    /// numbers of records.
    PairedLengthMismatch { clean: usize, noisy: usize },
}

impl From<std::io::Error> for FastaReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for FastaReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaReaderError::IoError(e) => write!(f, "IO error: {}", e),
            FastaReaderError::EofReached => write!(f, "Reached the end of file"),
            FastaReaderError::InvalidFormat => write!(f, "Invalid format"),
            FastaReaderError::PairedLengthMismatch { clean, noisy } => write!(
                f,
                "Paired files length mismatch (clean: {} records, noisy: {} records)",
                clean, noisy
            ),
        }
    }
}

impl Error for FastaReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FastaReaderError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a FASTA reading operation.
pub type FastaResult<T> = Result<T, FastaReaderError>;

/// A builder for `FastaReaderParams`.
#[derive(Debug, Clone)]
pub struct FastaReaderParamsBuilder {
    delimiter: u8,
}

impl FastaReaderParamsBuilder {
    /// Returns a new instance of `FastaReaderParamsBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self { delimiter: b'\n' }
    }

    /// Sets the delimiter character to use instead of a newline.
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        let mut new = self;
        new.delimiter = delimiter;
        new
    }

    /// Builds and returns [`FastaReaderParams`].
    pub fn build(&self) -> FastaReaderParams {
        FastaReaderParams {
            delimiter: self.delimiter,
        }
    }
}

impl Default for FastaReaderParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// FASTA reading params.
#[derive(Debug, Clone)]
pub struct FastaReaderParams {
    delimiter: u8,
}

impl FastaReaderParams {
    /// Returns new builder for `FastaReaderParams`.
    #[must_use]
    pub fn builder() -> FastaReaderParamsBuilder {
        FastaReaderParamsBuilder::new()
    }
}

impl Default for FastaReaderParams {
    fn default() -> Self {
        FastaReaderParamsBuilder::default().build()
    }
}

enum Line {
    Title(String),
    Sequence(String),
    Blank,
    Eof,
}

/// FASTA format reader producing [`SequenceRecord`]s.
///
/// The whole title line (without the `>` prefix and surrounding whitespace)
/// becomes the identifier. Sequences may span multiple lines, and blank lines
/// are ignored.
#[derive(Debug)]
pub struct FastaReader<R> {
    reader: R,
    params: FastaReaderParams,
    buffer: Vec<u8>,
    next_title: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    /// Creates new `FastaReader` instance with default parameters.
    ///
    /// # Examples
    /// ```
    /// use redeval::fasta::reader::FastaReader;
    ///
    /// let buf = Vec::new();
    /// let _reader = FastaReader::new(buf.as_slice());
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_params(reader, FastaReaderParams::default())
    }

    /// Creates new `FastaReader` instance with given parameters.
    #[must_use]
    pub fn with_params(reader: R, params: FastaReaderParams) -> Self {
        Self {
            reader,
            params,
            buffer: Vec::with_capacity(4096),
            next_title: None,
        }
    }

    /// Reads a single FASTA record.
    ///
    /// # Errors
    /// Returns [`FastaReaderError::EofReached`] if there are no more records,
    /// and [`FastaReaderError::InvalidFormat`] if the first non-blank line is
    /// not a title line.
    pub fn read_sequence(&mut self) -> FastaResult<SequenceRecord> {
        let title = self.parse_title()?;
        let sequence = self.parse_sequence()?;

        Ok(SequenceRecord::new(title, sequence))
    }

    fn parse_title(&mut self) -> FastaResult<String> {
        if let Some(title) = self.next_title.take() {
            return Ok(title);
        }

        loop {
            match self.read_line()? {
                Line::Title(title) => return Ok(title),
                Line::Blank => continue,
                Line::Sequence(_) => return Err(FastaReaderError::InvalidFormat),
                Line::Eof => return Err(FastaReaderError::EofReached),
            }
        }
    }

    fn parse_sequence(&mut self) -> FastaResult<String> {
        let mut sequence = String::new();

        loop {
            match self.read_line()? {
                Line::Sequence(line) => sequence.push_str(&line),
                Line::Blank => continue,
                Line::Title(title) => {
                    self.next_title = Some(title);
                    break;
                }
                Line::Eof => break,
            }
        }

        Ok(sequence)
    }

    fn read_line(&mut self) -> FastaResult<Line> {
        self.buffer.clear();
        let bytes_read = self
            .reader
            .read_until(self.params.delimiter, &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(Line::Eof);
        }

        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end_matches(self.params.delimiter as char).trim();

        let line = if line.is_empty() {
            Line::Blank
        } else if let Some(title) = line.strip_prefix(FASTA_TITLE_PREFIX) {
            Line::Title(title.trim().to_owned())
        } else {
            Line::Sequence(line.to_owned())
        };
        Ok(line)
    }
}

impl<R: BufRead> IntoIterator for FastaReader<R> {
    type Item = FastaResult<SequenceRecord>;
    type IntoIter = FastaReaderIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            reader: self,
            no_errors: true,
        }
    }
}

/// Iterator implementation for [`FastaReader`] which iterates over all
/// records in a file.
#[derive(Debug)]
pub struct FastaReaderIterator<R> {
    reader: FastaReader<R>,
    no_errors: bool,
}

impl<R: BufRead> Iterator for FastaReaderIterator<R> {
    type Item = FastaResult<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.no_errors {
            return None;
        }

        let result = self.reader.read_sequence();
        if result.is_err() {
            self.no_errors = false;
            if matches!(result, Err(FastaReaderError::EofReached)) {
                return None;
            }
        }
        Some(result)
    }
}

/// Reads every record of a FASTA file into a [`SequenceCollection`].
///
/// A repeated identifier replaces the sequence read before it.
///
/// # Examples
/// ```
/// use redeval::fasta::reader::read_collection;
///
/// let sequences = read_collection(">seq1\nATTG\nCATCAT\n>seq2\nAGTC\n".as_bytes()).unwrap();
/// assert_eq!(sequences.get("seq1"), Some("ATTGCATCAT"));
/// assert_eq!(sequences.get("seq2"), Some("AGTC"));
/// ```
pub fn read_collection<R: BufRead>(reader: R) -> FastaResult<SequenceCollection> {
    let mut sequences = SequenceCollection::new();

    for record in FastaReader::new(reader) {
        let (identifier, sequence) = record?.into_data();
        if sequences.insert(identifier.as_str(), sequence).is_some() {
            warn!("Duplicate sequence identifier `{}`, keeping the last one", identifier);
        }
    }

    debug!("Read {} sequences", sequences.len());
    Ok(sequences)
}
