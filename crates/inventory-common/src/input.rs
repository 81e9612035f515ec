//! Line-oriented console input.

use anyhow::{Context, Result};
use std::io::{self, BufRead, StdinLock, Write};

/// Blocking line reader for interactive prompts.
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
}

impl LineInput<StdinLock<'static>> {
    /// Read from the process's stdin.
    pub fn from_stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next line with surrounding whitespace trimmed.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    /// Returns `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    /// Print `label` (no newline) and read the answer.
    pub fn prompt<W: Write>(&mut self, out: &mut W, label: &str) -> Result<Option<String>> {
        write!(out, "{}", label)?;
        out.flush()?;
        self.read_line()
    }
}
