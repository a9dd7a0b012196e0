//! Dialect Format Reference
//!
//! This module documents the family of comma-separated formats read by the
//! [`Scanner`](crate::Scanner) and written by the [`Generator`](crate::Generator).
//! Every punctuation character and behavior is chosen per document through a
//! [`DialectConfig`](crate::DialectConfig).
//!
//! # Overview
//!
//! A document is a sequence of physical lines separated by `\n` (a `\r\n`
//! pair counts as one terminator). Logical records are made of fields
//! separated by the separator character. A quoted field may span several
//! physical lines, so one record can occupy more than one line.
//!
//! ## Default Dialect
//!
//! | Setting | Default | Strict |
//! |---------|---------|--------|
//! | separator | `,` | `,` |
//! | quote characters | `"` and `'` | `"` |
//! | field prefix / suffix | none | none |
//! | empty unquoted fields | allowed | rejected |
//! | leading / trailing whitespace | trimmed | kept |
//! | comment lines | enabled, `;` | disabled |
//! | blank lines | skipped | kept (rejected as an empty field) |
//! | header | no | no |
//! | trailing line break | allowed | allowed |
//! | quotes inside unquoted fields | plain text | rejected |
//!
//! # Grammar
//!
//! Informally, with `SEP` the separator, `Q` an enabled quote character,
//! `P`/`S` the optional prefix and suffix and `WS` the whitespace set:
//!
//! ```text
//! document  := line*
//! line      := comment | blank | record
//! comment   := COMMENT <any text up to the terminator>
//! blank     := WS* terminator
//! record    := field (SEP field)*
//! field     := WS* P? (quoted | unquoted) S? WS*
//! quoted    := Q (<any char but Q> | Q Q)* Q
//! unquoted  := <chars other than SEP, S and the terminator>*
//! ```
//!
//! Comment and blank lines are only recognized where a record may start. A
//! line inside an open quoted field is always part of that field.
//!
//! ## Whitespace
//!
//! Whitespace is tab, vertical tab, form feed, space, U+0085 and U+00A0.
//! The separator is never whitespace, even when it is a tab.
//!
//! ## Quoting
//!
//! A field starting with a quote character is quoted. It ends at the next
//! occurrence of that same character not followed by another one; two
//! consecutive quote characters stand for one. The other quote character
//! has no special meaning inside:
//!
//! ```text
//! "it's", 'say "hi"'    ->  [it's] [say "hi"]
//! "a ""b"" c"           ->  [a "b" c]
//! ```
//!
//! After the closing quote only whitespace, the suffix, the separator or the
//! end of the line may follow.
//!
//! ## Wrappers
//!
//! With a prefix and suffix configured, every field must be wrapped:
//!
//! ```text
//! (aaa),("b,b"),(c)     ->  [aaa] [b,b] [c]
//! ```
//!
//! The header may use its own pair; otherwise it uses the field pair.
//!
//! ## Header
//!
//! When the dialect has a header, the first record holds the column names.
//! It follows the same rules as any other record.
//!
//! # Errors
//!
//! Every syntax error names the 1-based line and the 0-based column of the
//! offending character:
//!
//! | Error | Cause |
//! |-------|-------|
//! | trailing quote not found | end of input inside a quoted field |
//! | prefix not found | a field does not start with the prefix |
//! | suffix not found | a field does not end with the suffix |
//! | empty field | an empty unquoted field while those are rejected |
//! | expected separator | text after a closing quote |
//! | unexpected quote | a quote inside an unquoted field while those are rejected |
//! | trailing line break | the document ends with a terminator while that is rejected |
//!
//! # Generation
//!
//! The generator joins records with `\n` and writes no terminator after the
//! last one. It quotes a field with `"` (doubling every inner `"`) whenever
//! the bare text would scan differently, so that any rows it accepts are read
//! back unchanged by a scanner using the same dialect with trimming disabled.
