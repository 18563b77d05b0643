use std::io::Write;

use serde::Serialize;

/// CSV sink writing one serialized record per row, header taken from the
/// first record.
pub(crate) struct CsvOutput {
    writer: csv::Writer<Box<dyn Write + Send>>,
}

impl CsvOutput {
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn add_record<T: Serialize>(&mut self, record: &T) -> anyhow::Result<()> {
        self.writer.serialize(record)?;

        anyhow::Ok(())
    }

    pub fn add_all<'a, T, I>(&mut self, records: I) -> anyhow::Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for record in records {
            self.add_record(record)?;
        }

        anyhow::Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;

        anyhow::Ok(())
    }
}
