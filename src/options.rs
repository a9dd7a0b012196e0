//! Dialect configuration.
//!
//! This module provides the types that describe a CSV-like dialect:
//!
//! - [`DialectConfig`]: Immutable, validated bundle of scanning and generating rules
//! - [`DialectBuilder`]: Accumulates overrides on top of the default dialect
//! - [`DialectOption`]: A single named override
//! - [`Preset`]: A named list of overrides (e.g. the strict RFC 4180 grammar)
//!
//! Overrides are applied left to right, so a later override wins over an
//! earlier one touching the same rule. A preset is itself an override list,
//! which means options applied after a preset refine it.
//!
//! ## Examples
//!
//! ```rust
//! use csv_dialect::{DialectConfig, DialectOption, Preset};
//!
//! // Pipe separated, '#' comments
//! let config = DialectConfig::builder()
//!     .with_separator('|')
//!     .with_comment('#')
//!     .build()
//!     .unwrap();
//! assert_eq!(config.separator(), '|');
//!
//! // Strict grammar, but tolerate empty fields
//! let config = DialectConfig::builder()
//!     .preset(Preset::Strict)
//!     .apply(DialectOption::AllowEmptyField(true))
//!     .build()
//!     .unwrap();
//! assert!(config.allow_empty_field());
//! assert!(!config.allow_single_quote());
//! ```

use crate::error::{Error, Result};

/// The comment character of the default dialect.
pub const DEFAULT_COMMENT: char = ';';

const DOUBLE_QUOTE: char = '"';
const SINGLE_QUOTE: char = '\'';

/// A single override of one dialect rule.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::{DialectConfig, DialectOption};
///
/// let config = DialectConfig::from_options(&[
///     DialectOption::Separator(';'),
///     DialectOption::AllowComment(false),
///     DialectOption::Separator('\t'),
/// ])
/// .unwrap();
/// assert_eq!(config.separator(), '\t');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialectOption {
    /// Field delimiter.
    Separator(char),
    /// Whether `'` opens a quoted field in addition to `"`.
    AllowSingleQuote(bool),
    /// Literal rune required before every field.
    FieldPrefix(Option<char>),
    /// Literal rune required after every field.
    FieldSuffix(Option<char>),
    /// Literal rune required before every header name. `Some` implies a header.
    HeaderPrefix(Option<char>),
    /// Literal rune required after every header name. `Some` implies a header.
    HeaderSuffix(Option<char>),
    /// Whether an empty unquoted field is accepted.
    AllowEmptyField(bool),
    /// Trim whitespace before the field body.
    OmitLeadingSpace(bool),
    /// Trim whitespace after the field body.
    OmitTrailingSpace(bool),
    /// Skip lines starting with the comment character.
    AllowComment(bool),
    /// Sets the comment character and enables comments.
    Comment(char),
    /// Skip lines holding nothing but a line terminator.
    OmitEmptyLines(bool),
    /// The first record is a header.
    Header(bool),
    /// Tolerate a line terminator after the last record.
    AllowTrailingLineBreak(bool),
    /// Whether a quote character inside an unquoted field is plain text.
    AllowBareQuote(bool),
}

/// Named override lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// The conservative grammar of RFC 4180: `,` separator, `"` quotes only,
    /// no wrappers, no empty fields, no trimming, no comments, no blank-line skipping,
    /// and no quote characters inside unquoted fields.
    Strict,
}

impl Preset {
    /// Expands this preset into its override list.
    #[must_use]
    pub fn options(&self) -> Vec<DialectOption> {
        match self {
            Preset::Strict => vec![
                DialectOption::Separator(','),
                DialectOption::HeaderPrefix(None),
                DialectOption::HeaderSuffix(None),
                DialectOption::FieldPrefix(None),
                DialectOption::FieldSuffix(None),
                DialectOption::AllowSingleQuote(false),
                DialectOption::AllowEmptyField(false),
                DialectOption::OmitLeadingSpace(false),
                DialectOption::OmitTrailingSpace(false),
                DialectOption::AllowComment(false),
                DialectOption::OmitEmptyLines(false),
                DialectOption::AllowBareQuote(false),
            ],
        }
    }
}

/// Immutable set of rules shared by [`Scanner`](crate::Scanner) and
/// [`Generator`](crate::Generator).
///
/// A `DialectConfig` can only be obtained through [`DialectConfig::default`],
/// [`DialectConfig::strict`] or a validating constructor, so every instance
/// is free of conflicting punctuation. It is cheap to clone and safe to share
/// between threads.
///
/// | Rule | Default |
/// |---|---|
/// | separator | `,` |
/// | quotes | `"` and `'` |
/// | field / header prefix and suffix | none |
/// | empty fields | allowed |
/// | leading / trailing space | trimmed |
/// | comments | enabled, `;` |
/// | empty lines | skipped |
/// | header | no |
/// | trailing line break | allowed |
/// | quotes inside unquoted fields | plain text |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialectConfig {
    separator: char,
    allow_single_quote: bool,
    field_prefix: Option<char>,
    field_suffix: Option<char>,
    header_prefix: Option<char>,
    header_suffix: Option<char>,
    allow_empty_field: bool,
    omit_leading_space: bool,
    omit_trailing_space: bool,
    allow_comment: bool,
    comment: char,
    omit_empty_lines: bool,
    has_header: bool,
    allow_trailing_line_break: bool,
    allow_bare_quote: bool,
}

const DEFAULT: DialectConfig = DialectConfig {
    separator: ',',
    allow_single_quote: true,
    field_prefix: None,
    field_suffix: None,
    header_prefix: None,
    header_suffix: None,
    allow_empty_field: true,
    omit_leading_space: true,
    omit_trailing_space: true,
    allow_comment: true,
    comment: DEFAULT_COMMENT,
    omit_empty_lines: true,
    has_header: false,
    allow_trailing_line_break: true,
    allow_bare_quote: true,
};

impl Default for DialectConfig {
    fn default() -> Self {
        DEFAULT
    }
}

impl DialectConfig {
    /// Starts a builder from the default dialect.
    #[must_use]
    pub fn builder() -> DialectBuilder {
        DialectBuilder::new()
    }

    /// The [`Preset::Strict`] dialect.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csv_dialect::DialectConfig;
    ///
    /// let strict = DialectConfig::strict();
    /// assert!(!strict.allow_empty_field());
    /// assert!(!strict.omit_leading_space());
    /// assert_eq!(strict.quote_chars(), &['"']);
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        let mut config = DEFAULT;
        for option in Preset::Strict.options() {
            config.apply(option);
        }
        config
    }

    /// Builds a dialect from the default plus an ordered override list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the resulting punctuation conflicts.
    pub fn from_options(options: &[DialectOption]) -> Result<Self> {
        options
            .iter()
            .cloned()
            .fold(DialectBuilder::new(), DialectBuilder::apply)
            .build()
    }

    /// Returns a builder seeded with this dialect, to derive a replacement.
    #[must_use]
    pub fn to_builder(&self) -> DialectBuilder {
        DialectBuilder {
            config: self.clone(),
        }
    }

    /// The same dialect with the header turned on. Cannot introduce a conflict.
    pub(crate) fn with_header(mut self) -> Self {
        self.has_header = true;
        self
    }

    fn apply(&mut self, option: DialectOption) {
        match option {
            DialectOption::Separator(c) => self.separator = c,
            DialectOption::AllowSingleQuote(b) => self.allow_single_quote = b,
            DialectOption::FieldPrefix(c) => self.field_prefix = c,
            DialectOption::FieldSuffix(c) => self.field_suffix = c,
            DialectOption::HeaderPrefix(c) => {
                if c.is_some() {
                    self.has_header = true;
                }
                self.header_prefix = c;
            }
            DialectOption::HeaderSuffix(c) => {
                if c.is_some() {
                    self.has_header = true;
                }
                self.header_suffix = c;
            }
            DialectOption::AllowEmptyField(b) => self.allow_empty_field = b,
            DialectOption::OmitLeadingSpace(b) => self.omit_leading_space = b,
            DialectOption::OmitTrailingSpace(b) => self.omit_trailing_space = b,
            DialectOption::AllowComment(b) => self.allow_comment = b,
            DialectOption::Comment(c) => {
                self.allow_comment = true;
                self.comment = c;
            }
            DialectOption::OmitEmptyLines(b) => self.omit_empty_lines = b,
            DialectOption::Header(b) => self.has_header = b,
            DialectOption::AllowTrailingLineBreak(b) => self.allow_trailing_line_break = b,
            DialectOption::AllowBareQuote(b) => self.allow_bare_quote = b,
        }
    }

    fn validate(&self) -> Result<()> {
        let wrappers = [
            ("field prefix", self.field_prefix),
            ("field suffix", self.field_suffix),
            ("header prefix", self.header_prefix),
            ("header suffix", self.header_suffix),
        ];
        let mut punctuation = vec![("separator", self.separator)];
        punctuation.extend(wrappers.iter().filter_map(|(n, c)| c.map(|c| (*n, c))));
        if self.allow_comment {
            punctuation.push(("comment", self.comment));
        }

        for (name, c) in &punctuation {
            if *c == '\n' || *c == '\r' {
                return Err(Error::config(&format!("{} cannot be a line terminator", name)));
            }
        }

        for quote in self.quote_chars() {
            if let Some((name, _)) = punctuation.iter().find(|(_, c)| c == quote) {
                return Err(Error::config(&format!(
                    "quote {:?} conflicts with the {}",
                    quote, name
                )));
            }
        }

        for (name, c) in &wrappers {
            if *c == Some(self.separator) {
                return Err(Error::config(&format!(
                    "separator {:?} conflicts with the {}",
                    self.separator, name
                )));
            }
            if self.allow_comment && *c == Some(self.comment) {
                return Err(Error::config(&format!(
                    "comment {:?} conflicts with the {}",
                    self.comment, name
                )));
            }
        }
        if self.allow_comment && self.comment == self.separator {
            return Err(Error::config(&format!(
                "comment {:?} conflicts with the separator",
                self.comment
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    #[must_use]
    pub fn allow_single_quote(&self) -> bool {
        self.allow_single_quote
    }

    /// The runes that open and close a quoted field.
    #[must_use]
    pub fn quote_chars(&self) -> &'static [char] {
        if self.allow_single_quote {
            &[DOUBLE_QUOTE, SINGLE_QUOTE]
        } else {
            &[DOUBLE_QUOTE]
        }
    }

    /// The quote the generator wraps and escapes fields with.
    #[must_use]
    pub fn escape_quote(&self) -> char {
        DOUBLE_QUOTE
    }

    #[must_use]
    pub fn field_prefix(&self) -> Option<char> {
        self.field_prefix
    }

    #[must_use]
    pub fn field_suffix(&self) -> Option<char> {
        self.field_suffix
    }

    /// Prefix of header names, falling back to the field prefix.
    #[must_use]
    pub fn header_prefix(&self) -> Option<char> {
        self.header_prefix.or(self.field_prefix)
    }

    /// Suffix of header names, falling back to the field suffix.
    #[must_use]
    pub fn header_suffix(&self) -> Option<char> {
        self.header_suffix.or(self.field_suffix)
    }

    #[must_use]
    pub fn allow_empty_field(&self) -> bool {
        self.allow_empty_field
    }

    #[must_use]
    pub fn omit_leading_space(&self) -> bool {
        self.omit_leading_space
    }

    #[must_use]
    pub fn omit_trailing_space(&self) -> bool {
        self.omit_trailing_space
    }

    #[must_use]
    pub fn allow_comment(&self) -> bool {
        self.allow_comment
    }

    /// The comment character, whether or not comments are enabled.
    #[must_use]
    pub fn comment(&self) -> char {
        self.comment
    }

    #[must_use]
    pub fn omit_empty_lines(&self) -> bool {
        self.omit_empty_lines
    }

    #[must_use]
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    #[must_use]
    pub fn allow_trailing_line_break(&self) -> bool {
        self.allow_trailing_line_break
    }

    #[must_use]
    pub fn allow_bare_quote(&self) -> bool {
        self.allow_bare_quote
    }

    #[inline]
    pub(crate) fn is_quote(&self, c: char) -> bool {
        c == DOUBLE_QUOTE || (self.allow_single_quote && c == SINGLE_QUOTE)
    }

    /// Whitespace trimmed around fields. The separator is never whitespace.
    #[inline]
    pub(crate) fn is_space(&self, c: char) -> bool {
        c != self.separator
            && matches!(c, '\t' | '\u{0B}' | '\u{0C}' | ' ' | '\u{85}' | '\u{A0}')
    }

    #[inline]
    pub(crate) fn is_comment_line(&self, line: &[char]) -> bool {
        self.allow_comment && line.first() == Some(&self.comment)
    }
}

/// Accumulates overrides into a [`DialectConfig`].
///
/// # Examples
///
/// ```rust
/// use csv_dialect::DialectBuilder;
///
/// let config = DialectBuilder::new()
///     .with_field_prefix('(')
///     .with_field_suffix(')')
///     .with_header(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.field_prefix(), Some('('));
///
/// // A quote character cannot double as the separator
/// assert!(DialectBuilder::new().with_separator('"').build().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DialectBuilder {
    config: DialectConfig,
}

impl DialectBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single override.
    #[must_use]
    pub fn apply(mut self, option: DialectOption) -> Self {
        self.config.apply(option);
        self
    }

    /// Applies every override of a preset, in order.
    #[must_use]
    pub fn preset(self, preset: Preset) -> Self {
        preset.options().into_iter().fold(self, Self::apply)
    }

    #[must_use]
    pub fn with_separator(self, separator: char) -> Self {
        self.apply(DialectOption::Separator(separator))
    }

    #[must_use]
    pub fn with_single_quote(self, allow: bool) -> Self {
        self.apply(DialectOption::AllowSingleQuote(allow))
    }

    #[must_use]
    pub fn with_field_prefix(self, prefix: char) -> Self {
        self.apply(DialectOption::FieldPrefix(Some(prefix)))
    }

    #[must_use]
    pub fn with_field_suffix(self, suffix: char) -> Self {
        self.apply(DialectOption::FieldSuffix(Some(suffix)))
    }

    /// Sets the header name prefix. Also turns the header on.
    #[must_use]
    pub fn with_header_prefix(self, prefix: char) -> Self {
        self.apply(DialectOption::HeaderPrefix(Some(prefix)))
    }

    /// Sets the header name suffix. Also turns the header on.
    #[must_use]
    pub fn with_header_suffix(self, suffix: char) -> Self {
        self.apply(DialectOption::HeaderSuffix(Some(suffix)))
    }

    #[must_use]
    pub fn with_empty_field(self, allow: bool) -> Self {
        self.apply(DialectOption::AllowEmptyField(allow))
    }

    #[must_use]
    pub fn with_leading_space_omitted(self, omit: bool) -> Self {
        self.apply(DialectOption::OmitLeadingSpace(omit))
    }

    #[must_use]
    pub fn with_trailing_space_omitted(self, omit: bool) -> Self {
        self.apply(DialectOption::OmitTrailingSpace(omit))
    }

    #[must_use]
    pub fn with_comments(self, allow: bool) -> Self {
        self.apply(DialectOption::AllowComment(allow))
    }

    /// Sets the comment character and enables comments.
    #[must_use]
    pub fn with_comment(self, comment: char) -> Self {
        self.apply(DialectOption::Comment(comment))
    }

    #[must_use]
    pub fn with_empty_lines_omitted(self, omit: bool) -> Self {
        self.apply(DialectOption::OmitEmptyLines(omit))
    }

    #[must_use]
    pub fn with_header(self, has_header: bool) -> Self {
        self.apply(DialectOption::Header(has_header))
    }

    #[must_use]
    pub fn with_trailing_line_break(self, allow: bool) -> Self {
        self.apply(DialectOption::AllowTrailingLineBreak(allow))
    }

    #[must_use]
    pub fn with_bare_quote(self, allow: bool) -> Self {
        self.apply(DialectOption::AllowBareQuote(allow))
    }

    /// Validates the accumulated rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a quote or comment character collides
    /// with the separator or a wrapper, when the separator collides with a
    /// wrapper, or when any punctuation is a line terminator.
    pub fn build(self) -> Result<DialectConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
