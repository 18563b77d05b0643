use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

use crate::fasta::{FASTA_ALIGNMENT_KEY, FASTA_TITLE_PREFIX};
use crate::reduction::transducer::TransducedRead;
use crate::sequence::SequenceRecord;

#[derive(Debug)]
pub enum FastaWriterError {
    IoError(std::io::Error),
}

impl From<std::io::Error> for FastaWriterError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for FastaWriterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaWriterError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl Error for FastaWriterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FastaWriterError::IoError(e) => Some(e),
        }
    }
}

pub type FastaWriteResult<T> = Result<T, FastaWriterError>;

#[derive(Debug, Clone)]
pub struct FastaWriterParams {
    line_width: usize,
}

impl FastaWriterParams {
    #[must_use]
    pub fn builder() -> FastaWriterParamsBuilder {
        FastaWriterParamsBuilder::new()
    }
}

impl Default for FastaWriterParams {
    fn default() -> Self {
        FastaWriterParamsBuilder::default().build()
    }
}

#[derive(Debug, Clone)]
pub struct FastaWriterParamsBuilder {
    line_width: usize,
}

impl FastaWriterParamsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { line_width: 0 }
    }

    /// Wraps sequences after `line_width` symbols. `0` disables wrapping.
    pub fn line_width(&mut self, line_width: usize) -> &mut Self {
        let mut new = self;
        new.line_width = line_width;
        new
    }

    #[must_use]
    pub fn build(&self) -> FastaWriterParams {
        FastaWriterParams {
            line_width: self.line_width,
        }
    }
}

impl Default for FastaWriterParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct FastaWriter<W> {
    writer: W,
    params: FastaWriterParams,
}

impl<W: Write> FastaWriter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_params(writer, FastaWriterParams::default())
    }

    #[must_use]
    pub fn with_params(writer: W, params: FastaWriterParams) -> Self {
        Self { writer, params }
    }

    pub fn write_sequence(&mut self, record: &SequenceRecord) -> FastaWriteResult<()> {
        writeln!(
            &mut self.writer,
            "{}{}",
            FASTA_TITLE_PREFIX,
            record.identifier()
        )?;
        self.output_sequence(record.sequence())?;

        Ok(())
    }

    /// Writes a transduced read. If it carries an alignment, the alignment is
    /// appended to the title as `alignment=<encoding>`.
    pub fn write_transduced(
        &mut self,
        identifier: &str,
        read: &TransducedRead,
    ) -> FastaWriteResult<()> {
        write!(&mut self.writer, "{}{}", FASTA_TITLE_PREFIX, identifier)?;
        if let Some(alignment) = read.alignment() {
            write!(&mut self.writer, " {}{}", FASTA_ALIGNMENT_KEY, alignment)?;
        }
        writeln!(&mut self.writer)?;
        self.output_sequence(read.sequence())?;

        Ok(())
    }

    fn output_sequence(&mut self, sequence: &str) -> FastaWriteResult<()> {
        if self.params.line_width == 0 || sequence.is_empty() {
            writeln!(&mut self.writer, "{}", sequence)?;
            return Ok(());
        }

        for line in sequence.as_bytes().chunks(self.params.line_width) {
            self.writer.write_all(line)?;
            writeln!(&mut self.writer)?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> FastaWriteResult<()> {
        self.writer.flush()?;

        Ok(())
    }
}
