//! Dialect scanning.
//!
//! This module provides the [`Scanner`], a pull-based tokenizer that turns a
//! character source into rows of fields under a [`DialectConfig`].
//!
//! ## Overview
//!
//! The scanner is a rune-at-a-time automaton working on one physical line at
//! a time:
//!
//! - **Line admission**: comment lines and blank lines are skipped before a record starts
//! - **Quoted fields**: `"..."` (and `'...'` unless disabled), with doubled-quote escaping
//!   and embedded line breaks spanning several physical lines
//! - **Wrappers**: optional prefix and suffix runes around every field
//! - **Trimming**: optional leading and trailing whitespace removal
//! - **Error reporting**: every syntax error carries the line and column it was found at
//!
//! A scanner that returned an error is exhausted: later calls report
//! [`Error::Exhausted`].
//!
//! ## Usage
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Scanner};
//!
//! let mut scanner = Scanner::from_str("a,b\n; skipped\n\"c\nd\",e", DialectConfig::default());
//! assert_eq!(scanner.scan_row().unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
//! assert_eq!(scanner.scan_row().unwrap(), Some(vec!["c\nd".to_string(), "e".to_string()]));
//! assert_eq!(scanner.scan_row().unwrap(), None);
//! ```

use crate::error::{Error, Position, Result, SyntaxKind};
use crate::map::NamedRow;
use crate::options::DialectConfig;
use log::{debug, trace};
use std::io::{BufRead, BufReader, Read};

/// An ordered sequence of fields.
pub type Row = Vec<String>;

/// Everything scanned from a document: the optional header and the data rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub header: Option<Row>,
    pub rows: Vec<Row>,
}

impl Document {
    /// Pairs every data row with the header names.
    ///
    /// Returns `None` if the document has no header. Fields beyond the header
    /// width are dropped, missing trailing fields are absent from the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csv_dialect::{DialectConfig, Scanner};
    ///
    /// let config = DialectConfig::builder().with_header(true).build().unwrap();
    /// let document = Scanner::from_str("id,name\n1,Ann", config).scan_all().unwrap();
    /// let named = document.named_rows().unwrap();
    /// assert_eq!(named[0].get("name"), Some("Ann"));
    /// ```
    #[must_use]
    pub fn named_rows(&self) -> Option<Vec<NamedRow>> {
        let header = self.header.as_ref()?;
        Some(
            self.rows
                .iter()
                .map(|row| NamedRow::from_pairs(header, row))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineEnd {
    Lf,
    CrLf,
}

impl LineEnd {
    fn as_str(self) -> &'static str {
        match self {
            LineEnd::Lf => "\n",
            LineEnd::CrLf => "\r\n",
        }
    }
}

/// What the scanner is looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    Char(char),
    LineEnd,
    Eof,
}

/// Prefix and suffix in effect for the record being scanned.
#[derive(Clone, Copy, Debug)]
struct Wrap {
    prefix: Option<char>,
    suffix: Option<char>,
}

impl Wrap {
    fn field(config: &DialectConfig) -> Self {
        Wrap {
            prefix: config.field_prefix(),
            suffix: config.field_suffix(),
        }
    }

    fn header(config: &DialectConfig) -> Self {
        Wrap {
            prefix: config.header_prefix(),
            suffix: config.header_suffix(),
        }
    }
}

/// The dialect scanner.
///
/// Reads from any [`BufRead`] source one physical line at a time. Created via
/// [`Scanner::new`], [`Scanner::from_str`], [`Scanner::from_slice`] or
/// [`Scanner::from_reader`].
///
/// Iterating a scanner yields data rows only; the header, if any, is scanned
/// first and kept available through [`Scanner::header`].
pub struct Scanner<R> {
    reader: R,
    config: DialectConfig,
    raw: String,
    line: Vec<char>,
    line_end: Option<LineEnd>,
    line_no: usize,
    pos: usize,
    record_line: usize,
    started: bool,
    eof: bool,
    trailing_break: bool,
    failed: bool,
    header: Option<Row>,
}

impl<'a> Scanner<&'a [u8]> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str, config: DialectConfig) -> Self {
        Scanner::new(input.as_bytes(), config)
    }

    pub fn from_slice(input: &'a [u8], config: DialectConfig) -> Self {
        Scanner::new(input, config)
    }
}

impl<R: Read> Scanner<BufReader<R>> {
    /// Wraps an unbuffered reader.
    pub fn from_reader(reader: R, config: DialectConfig) -> Self {
        Scanner::new(BufReader::new(reader), config)
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R, config: DialectConfig) -> Self {
        Scanner {
            reader,
            config,
            raw: String::new(),
            line: Vec::new(),
            line_end: None,
            line_no: 0,
            pos: 0,
            record_line: 0,
            started: false,
            eof: false,
            trailing_break: false,
            failed: false,
            header: None,
        }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// The current line and column of the cursor.
    pub fn position(&self) -> Position {
        Position {
            line: self.line_no,
            col: self.pos,
        }
    }

    /// The physical line the most recently scanned record started on.
    pub fn record_line(&self) -> usize {
        self.record_line
    }

    /// The header, once it has been scanned.
    pub fn header(&self) -> Option<&Row> {
        self.header.as_ref()
    }

    /// Scans the next logical record, header included.
    ///
    /// When the dialect has a header, the first record returned is the header.
    /// Returns `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] on malformed input, [`Error::Io`] if the source
    /// fails, and [`Error::Exhausted`] if a previous call failed.
    pub fn scan_row(&mut self) -> Result<Option<Row>> {
        if self.failed {
            return Err(Error::Exhausted);
        }
        let result = self.next_record();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    /// Scans the header if it is still pending and returns it.
    ///
    /// Returns `Ok(None)` when the dialect has no header or the input is empty.
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::scan_row`].
    pub fn scan_header(&mut self) -> Result<Option<&Row>> {
        if self.config.has_header() && self.header.is_none() {
            self.scan_row()?;
        } else if self.failed {
            return Err(Error::Exhausted);
        }
        Ok(self.header.as_ref())
    }

    /// Scans every remaining record.
    ///
    /// The returned document includes the header even if it was already
    /// consumed through [`Scanner::scan_row`].
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::scan_row`]. No rows are returned on failure.
    pub fn scan_all(&mut self) -> Result<Document> {
        self.scan_header()?;
        let mut rows = Vec::new();
        while let Some(row) = self.scan_row()? {
            rows.push(row);
        }
        Ok(Document {
            header: self.header.clone(),
            rows,
        })
    }

    fn next_record(&mut self) -> Result<Option<Row>> {
        if !self.started {
            self.started = true;
            self.admit_line()?;
        }
        if self.eof {
            return Ok(None);
        }

        let is_header = self.config.has_header() && self.header.is_none();
        let wrap = if is_header {
            Wrap::header(&self.config)
        } else {
            Wrap::field(&self.config)
        };
        self.record_line = self.line_no;
        let row = self.scan_record(wrap)?;

        if is_header {
            debug!("scanned header with {} columns", row.len());
            self.header = Some(row.clone());
        } else {
            trace!("scanned record at line {}: {:?}", self.record_line, row);
        }
        Ok(Some(row))
    }

    #[inline]
    fn current(&self) -> Cursor {
        match self.line.get(self.pos) {
            Some(&c) => Cursor::Char(c),
            None if self.line_end.is_some() => Cursor::LineEnd,
            None => Cursor::Eof,
        }
    }

    fn error(&self, kind: SyntaxKind) -> Error {
        Error::syntax(self.position(), kind)
    }

    /// Reads one physical line into the buffer. Returns `false` at end of input.
    fn read_line(&mut self) -> Result<bool> {
        let prev_terminated = self.line_end.is_some();
        self.raw.clear();
        let read = self.reader.read_line(&mut self.raw).map_err(|e| {
            Error::io(&format!("Scanner failed at line {}", self.line_no + 1), &e)
        })?;

        if read == 0 {
            // The cursor rests right after the last rune of the input.
            if prev_terminated || self.line_no == 0 {
                self.line_no += 1;
                self.pos = 0;
            } else {
                self.pos = self.line.len();
            }
            self.line.clear();
            self.line_end = None;
            self.trailing_break = prev_terminated;
            return Ok(false);
        }

        self.line_no += 1;
        self.pos = 0;
        let mut text = self.raw.as_str();
        self.line_end = if let Some(body) = text.strip_suffix("\r\n") {
            text = body;
            Some(LineEnd::CrLf)
        } else if let Some(body) = text.strip_suffix('\n') {
            text = body;
            Some(LineEnd::Lf)
        } else {
            None
        };
        self.line.clear();
        self.line.extend(text.chars());
        Ok(true)
    }

    /// Moves to the first line a record may start on, skipping comments and
    /// blank lines.
    fn admit_line(&mut self) -> Result<()> {
        loop {
            if !self.read_line()? {
                self.eof = true;
                if self.trailing_break && !self.config.allow_trailing_line_break() {
                    return Err(self.error(SyntaxKind::TrailingLineBreak));
                }
                return Ok(());
            }
            if self.config.is_comment_line(&self.line) {
                debug!("skipping comment at line {}", self.line_no);
            } else if self.config.omit_empty_lines() && self.line.is_empty() {
                debug!("skipping empty line {}", self.line_no);
            } else {
                return Ok(());
            }
        }
    }

    fn scan_record(&mut self, wrap: Wrap) -> Result<Row> {
        let mut fields = vec![self.scan_field(wrap)?];
        loop {
            match self.current() {
                Cursor::Char(c) if c == self.config.separator() => {
                    self.pos += 1;
                    fields.push(self.scan_field(wrap)?);
                }
                Cursor::Char(c) if self.config.is_quote(c) => {
                    return Err(self.error(SyntaxKind::UnexpectedQuote { found: c }));
                }
                Cursor::Char(c) => {
                    return Err(self.error(SyntaxKind::ExpectedSeparator {
                        expected: self.config.separator(),
                        found: c,
                    }));
                }
                Cursor::LineEnd => {
                    self.admit_line()?;
                    return Ok(fields);
                }
                Cursor::Eof => {
                    self.eof = true;
                    return Ok(fields);
                }
            }
        }
    }

    fn scan_field(&mut self, wrap: Wrap) -> Result<String> {
        if self.config.omit_leading_space() {
            self.skip_spaces();
        }

        if let Some(prefix) = wrap.prefix {
            match self.current() {
                Cursor::Char(c) if c == prefix => self.pos += 1,
                _ => return Err(self.error(SyntaxKind::PrefixNotFound { expected: prefix })),
            }
        }

        let mut field = match self.current() {
            Cursor::Char(c) if self.config.is_quote(c) => self.scan_quoted(c)?,
            _ => self.scan_unquoted(wrap)?,
        };

        if let Some(suffix) = wrap.suffix {
            match self.current() {
                Cursor::Char(c) if c == suffix => self.pos += 1,
                _ => return Err(self.error(SyntaxKind::SuffixNotFound { expected: suffix })),
            }
        }

        if self.config.omit_trailing_space() {
            let trimmed = field.trim_end_matches(|c: char| self.config.is_space(c)).len();
            field.truncate(trimmed);
            self.skip_spaces();
        }
        Ok(field)
    }

    fn skip_spaces(&mut self) {
        while let Cursor::Char(c) = self.current() {
            if !self.config.is_space(c) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Scans a field body opened by `leading`. Only `leading` can close it;
    /// the other quote style is plain text inside.
    fn scan_quoted(&mut self, leading: char) -> Result<String> {
        self.pos += 1;
        let mut field = String::new();
        let mut pending_close = false;
        loop {
            match self.current() {
                Cursor::Char(c) if c == leading => {
                    // Second half of a doubled quote
                    if pending_close {
                        field.push(c);
                    }
                    pending_close = !pending_close;
                    self.pos += 1;
                }
                _ if pending_close => return Ok(field),
                Cursor::Char(c) => {
                    field.push(c);
                    self.pos += 1;
                }
                Cursor::LineEnd => {
                    if let Some(end) = self.line_end {
                        field.push_str(end.as_str());
                    }
                    self.read_line()?;
                }
                Cursor::Eof => return Err(self.error(SyntaxKind::UnterminatedQuote)),
            }
        }
    }

    fn scan_unquoted(&mut self, wrap: Wrap) -> Result<String> {
        let start = self.pos;
        while let Cursor::Char(c) = self.current() {
            if c == self.config.separator() || Some(c) == wrap.suffix {
                break;
            }
            if !self.config.allow_bare_quote() && self.config.is_quote(c) {
                return Err(self.error(SyntaxKind::UnexpectedQuote { found: c }));
            }
            self.pos += 1;
        }

        if start == self.pos && !self.config.allow_empty_field() {
            return Err(self.error(SyntaxKind::EmptyField));
        }
        Ok(self.line[start..self.pos].iter().collect())
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Row>;

    /// Yields data rows, skipping over the header. Fused after an error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Err(err) = self.scan_header() {
            return Some(Err(err));
        }
        self.scan_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DialectBuilder, Preset};

    fn scan(input: &str, config: DialectConfig) -> Result<Vec<Row>> {
        Scanner::from_str(input, config).scan_all().map(|d| d.rows)
    }

    fn rows(expected: &[&[&str]]) -> Vec<Row> {
        expected
            .iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_standard_document() {
        let input = "aaa,bbb,ccc\n\"aaa\",bbb,\"ccc\"\naaa,\"b\nbb\",\"ccc\"";
        let result = scan(input, DialectConfig::default()).unwrap();
        assert_eq!(
            result,
            rows(&[
                &["aaa", "bbb", "ccc"],
                &["aaa", "bbb", "ccc"],
                &["aaa", "b\nbb", "ccc"],
            ])
        );
    }

    #[test]
    fn test_doubled_quotes() {
        let input = "\"aa\"\"a\",bbb\naaa,\"b\"\"\nb\"\"b\"";
        let result = scan(input, DialectConfig::default()).unwrap();
        assert_eq!(
            result,
            rows(&[&["aa\"a", "bbb"], &["aaa", "b\"\nb\"b"]])
        );
    }

    #[test]
    fn test_mixed_quote_styles() {
        let input = "\"aa'a\",'bb\"\"b','cc\"c'\n'aa''a','b''\nb''b',\"c''cc\"";
        let result = scan(input, DialectConfig::default()).unwrap();
        assert_eq!(
            result,
            rows(&[
                &["aa'a", "bb\"\"b", "cc\"c"],
                &["aa'a", "b'\nb'b", "c''cc"],
            ])
        );
    }

    #[test]
    fn test_single_quote_disabled_is_text() {
        let config = DialectBuilder::new().with_single_quote(false).build().unwrap();
        let result = scan("'a',b'c", config).unwrap();
        assert_eq!(result, rows(&[&["'a'", "b'c"]]));
    }

    #[test]
    fn test_crlf_terminators() {
        let input = "a,b\r\nc,\"d\r\ne\"\r\n";
        let result = scan(input, DialectConfig::default()).unwrap();
        assert_eq!(result, rows(&[&["a", "b"], &["c", "d\r\ne"]]));
    }

    #[test]
    fn test_empty_input() {
        let mut scanner = Scanner::from_str("", DialectConfig::default());
        assert_eq!(scanner.scan_row().unwrap(), None);
        assert_eq!(scanner.scan_row().unwrap(), None);
    }

    #[test]
    fn test_only_comments_and_blanks() {
        let result = scan("; one\n\n; two\n", DialectConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_blank_line_kept_when_not_omitted() {
        let config = DialectBuilder::new()
            .with_empty_lines_omitted(false)
            .build()
            .unwrap();
        let result = scan("a\n\nb", config).unwrap();
        assert_eq!(result, rows(&[&["a"], &[""], &["b"]]));
    }

    #[test]
    fn test_comment_inside_quotes_is_text() {
        let result = scan("\"a\n; not a comment\",b", DialectConfig::default()).unwrap();
        assert_eq!(result, rows(&[&["a\n; not a comment", "b"]]));
    }

    #[test]
    fn test_variable_length_records() {
        let result = scan("a\nb,c,d\ne,f", DialectConfig::default()).unwrap();
        assert_eq!(result, rows(&[&["a"], &["b", "c", "d"], &["e", "f"]]));
    }

    #[test]
    fn test_unterminated_quote_position() {
        let err = scan("a,b\nc,\"d\ne", DialectConfig::default()).unwrap_err();
        match err {
            Error::Syntax { line, col, kind } => {
                assert_eq!(kind, SyntaxKind::UnterminatedQuote);
                assert_eq!(line, 3);
                assert_eq!(col, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_separator_position() {
        let err = scan("ab,\"c\"d", DialectConfig::default()).unwrap_err();
        assert_eq!(
            err.position(),
            Some(Position { line: 1, col: 6 })
        );
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::ExpectedSeparator { found: 'd', .. },
                ..
            }
        ));
    }

    #[test]
    fn test_quote_after_closed_field() {
        let err = scan("\"a\"'b'", DialectConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::UnexpectedQuote { found: '\'' },
                ..
            }
        ));
    }

    #[test]
    fn test_strict_rejects_bare_quote() {
        let err = scan("a,'bb\"\"b'", DialectConfig::strict()).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::UnexpectedQuote { found: '"' },
                col: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_prefix_and_suffix() {
        let config = DialectBuilder::new()
            .with_field_prefix('(')
            .with_field_suffix(')')
            .with_header_prefix('[')
            .with_header_suffix(']')
            .build()
            .unwrap();
        let input = "[Col A],[Col B]\n(aaa),(\"b\nb)\")\n( c ) ,(d)";
        let document = Scanner::from_str(input, config).scan_all().unwrap();
        assert_eq!(
            document.header,
            Some(vec!["Col A".to_string(), "Col B".to_string()])
        );
        assert_eq!(
            document.rows,
            rows(&[&["aaa", "b\nb)"], &[" c", "d"]])
        );
    }

    #[test]
    fn test_prefix_not_found() {
        let config = DialectBuilder::new().with_field_prefix('(').build().unwrap();
        let err = scan("(a),b", config).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::PrefixNotFound { expected: '(' },
                line: 1,
                col: 4,
            }
        ));
    }

    #[test]
    fn test_suffix_not_found_after_quote() {
        let config = DialectBuilder::new().with_field_suffix(')').build().unwrap();
        let err = scan("\"a\"x)", config).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::SuffixNotFound { expected: ')' },
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_line_break_rejected() {
        let config = DialectBuilder::new()
            .with_trailing_line_break(false)
            .build()
            .unwrap();
        assert!(scan("a,b", config.clone()).is_ok());
        let err = scan("a,b\n", config).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxKind::TrailingLineBreak,
                line: 2,
                col: 0,
            }
        ));
    }

    #[test]
    fn test_trailing_line_break_allowed() {
        let result = scan("a,b\n", DialectConfig::default()).unwrap();
        assert_eq!(result, rows(&[&["a", "b"]]));
    }

    #[test]
    fn test_tab_separator_with_trimming() {
        let config = DialectBuilder::new().with_separator('\t').build().unwrap();
        let result = scan(" a \t\tb ", config).unwrap();
        assert_eq!(result, rows(&[&["a", "", "b"]]));
    }

    #[test]
    fn test_exhausted_after_error() {
        let mut scanner = Scanner::from_str("\"a", DialectConfig::default());
        assert!(scanner.scan_row().is_err());
        assert!(matches!(scanner.scan_row(), Err(Error::Exhausted)));
    }

    #[test]
    fn test_header_then_rows() {
        let config = DialectBuilder::new().with_header(true).build().unwrap();
        let mut scanner = Scanner::from_str("x,y\n1,2\n3,4", config);
        assert_eq!(
            scanner.scan_row().unwrap(),
            Some(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(scanner.header().map(|h| h.len()), Some(2));
        let document = scanner.scan_all().unwrap();
        assert_eq!(document.header, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(document.rows, rows(&[&["1", "2"], &["3", "4"]]));
    }

    #[test]
    fn test_iterator_skips_header() {
        let config = DialectBuilder::new().with_header(true).build().unwrap();
        let collected: Result<Vec<Row>> = Scanner::from_str("x\n1\n2", config).collect();
        assert_eq!(collected.unwrap(), rows(&[&["1"], &["2"]]));
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut scanner = Scanner::from_str("a\n\"b", DialectConfig::default());
        assert!(matches!(scanner.next(), Some(Ok(_))));
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_record_line_tracks_multiline_records() {
        let mut scanner = Scanner::from_str("\"a\nb\"\n; c\nd", DialectConfig::default());
        scanner.scan_row().unwrap();
        assert_eq!(scanner.record_line(), 1);
        scanner.scan_row().unwrap();
        assert_eq!(scanner.record_line(), 4);
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let bytes: &[u8] = b"a,b\n\xff\xfe";
        let err = Scanner::from_slice(bytes, DialectConfig::default())
            .scan_all()
            .unwrap_err();
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_strict_preset_builder_equivalence() {
        let built = DialectBuilder::new().preset(Preset::Strict).build().unwrap();
        assert_eq!(
            scan("a,b\nc,d", built).unwrap(),
            scan("a,b\nc,d", DialectConfig::strict()).unwrap()
        );
    }
}
