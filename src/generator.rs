//! Dialect generation.
//!
//! This module provides the [`Generator`], which serializes rows of fields
//! into a document that a [`Scanner`](crate::Scanner) with the same
//! [`DialectConfig`] reads back unchanged.
//!
//! ## Quoting
//!
//! Fields are written bare unless they would be misread. A field is wrapped
//! in `"` (with every inner `"` doubled) when it contains:
//!
//! - the separator, a line terminator or any enabled quote character
//! - the active suffix
//!
//! It is also quoted when it starts with the comment character as the first
//! field of a row, or when it is empty and an empty bare field would be
//! rejected or read as a blank line.
//!
//! Records are separated by `\n`; no terminator follows the last record.
//!
//! ## Usage
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Generator};
//!
//! let mut generator = Generator::new(DialectConfig::default());
//! generator.write_row(&["aaa", "b\nbb", "cc,c"]).unwrap();
//! generator.write_row(&["say \"hi\""]).unwrap();
//!
//! let bytes = generator.finish().unwrap();
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     "aaa,\"b\nbb\",\"cc,c\"\n\"say \"\"hi\"\"\""
//! );
//! ```

use crate::error::{Error, Result};
use crate::options::DialectConfig;
use log::{debug, trace};
use std::io::Write;

/// The dialect generator.
///
/// Accumulates records in memory until [`Generator::finish`] or
/// [`Generator::finish_into`] seals it. A sealed generator rejects every
/// further write with [`Error::Sealed`].
pub struct Generator {
    config: DialectConfig,
    output: String,
    records: usize,
    sealed: bool,
}

impl Generator {
    pub fn new(config: DialectConfig) -> Self {
        Generator {
            config,
            output: String::with_capacity(256),
            records: 0,
            sealed: false,
        }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Whether [`Generator::finish`] has been called.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Writes the header record, wrapped with the header prefix and suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] after finishing, and [`Error::Custom`] if a
    /// data record was already written.
    pub fn write_header<S: AsRef<str>>(&mut self, header: &[S]) -> Result<()> {
        self.ensure_open()?;
        if self.records > 0 {
            return Err(Error::custom("header must precede every data record"));
        }
        let (prefix, suffix) = (self.config.header_prefix(), self.config.header_suffix());
        self.write_record(header, prefix, suffix);
        Ok(())
    }

    /// Appends one record.
    ///
    /// A row without fields is written as an empty line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] after finishing.
    pub fn write_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        self.ensure_open()?;
        let (prefix, suffix) = (self.config.field_prefix(), self.config.field_suffix());
        self.write_record(row, prefix, suffix);
        Ok(())
    }

    /// Appends many records, equivalent to repeated [`Generator::write_row`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] after finishing, before anything is written.
    pub fn write_rows<I, R, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        for row in rows {
            self.write_row(row.as_ref())?;
        }
        Ok(())
    }

    /// Seals the generator and returns the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] if the generator was already finished.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.sealed = true;
        debug!(
            "generator finished with {} records, {} bytes",
            self.records,
            self.output.len()
        );
        Ok(std::mem::take(&mut self.output).into_bytes())
    }

    /// Seals the generator and writes the document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] if the generator was already finished and
    /// [`Error::Io`] if the writer fails.
    pub fn finish_into<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let bytes = self.finish()?;
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::io("Generator failed", &e))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            Err(Error::Sealed)
        } else {
            Ok(())
        }
    }

    fn write_record<S: AsRef<str>>(
        &mut self,
        row: &[S],
        prefix: Option<char>,
        suffix: Option<char>,
    ) {
        if self.records > 0 {
            self.output.push('\n');
        }
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                self.output.push(self.config.separator());
            }
            if let Some(prefix) = prefix {
                self.output.push(prefix);
            }
            self.write_field(field.as_ref(), i == 0, row.len() == 1, suffix);
            if let Some(suffix) = suffix {
                self.output.push(suffix);
            }
        }
        self.records += 1;
        trace!("wrote record {} with {} fields", self.records, row.len());
    }

    #[inline]
    fn write_field(&mut self, field: &str, first: bool, only: bool, suffix: Option<char>) {
        if self.needs_quotes(field, first, only, suffix) {
            let quote = self.config.escape_quote();
            self.output.push(quote);
            for ch in field.chars() {
                if ch == quote {
                    self.output.push(quote);
                }
                self.output.push(ch);
            }
            self.output.push(quote);
        } else {
            self.output.push_str(field);
        }
    }

    fn needs_quotes(&self, field: &str, first: bool, only: bool, suffix: Option<char>) -> bool {
        if field.is_empty() {
            return only || !self.config.allow_empty_field();
        }
        if first && self.config.allow_comment() && field.starts_with(self.config.comment()) {
            return true;
        }
        field.chars().any(|c| {
            c == self.config.separator()
                || c == '\n'
                || c == '\r'
                || self.config.is_quote(c)
                || Some(c) == suffix
        })
    }
}
