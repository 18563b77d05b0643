use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

const STDIO_PATH: &str = "-";

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let result = InputStream {
        path: PathBuf::from(path),
    };

    Ok(result)
}

/// Path to read from; `-` is the standard input.
#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from(STDIO_PATH),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File(File),
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        info!("Input file: {}", path.display());

        let val = if path.to_string_lossy() == STDIO_PATH {
            Self::Stdin(io::stdin())
        } else {
            Self::File(File::open(path)?)
        };
        Ok(val)
    }

    #[must_use]
    pub fn into_buf_read(self) -> Box<dyn BufRead + Send> {
        let read: Box<dyn Read + Send> = match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File(file) => Box::new(file),
        };

        Box::new(BufReader::new(read))
    }
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    /// Opens `output` for writing, or the standard output if it is `None`
    /// or `-`.
    pub fn from_path(output: &Option<PathBuf>) -> anyhow::Result<Self> {
        let path = output
            .clone()
            .unwrap_or_else(|| PathBuf::from(STDIO_PATH));
        info!("Output file: {}", path.display());

        let writer = if path.to_string_lossy() == STDIO_PATH {
            Self::Stdout(io::stdout())
        } else {
            Self::File(File::create(path)?)
        };

        Ok(writer)
    }

    #[must_use]
    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(BufWriter::new(file)),
        }
    }
}
