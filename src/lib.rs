//! # csv_dialect
//!
//! A configurable-dialect CSV engine: a streaming [`Scanner`], a [`Generator`]
//! that round-trips with it, and Serde binding on top of both.
//!
//! ## What is a dialect?
//!
//! The comma-separated family has many members. Some quote with `'` as well
//! as `"`, some wrap every field in brackets, some allow `;` comment lines,
//! some use a tab separator. A [`DialectConfig`] captures one member as an
//! immutable, validated value shared by the reading and the writing side.
//!
//! ## Key Features
//!
//! - **Configurable**: separator, quote characters, field and header wrappers,
//!   trimming, comments, blank lines, header and trailing line break
//! - **Precise errors**: every syntax error carries its line and column
//! - **Round trip**: any rows the generator accepts scan back unchanged
//! - **Serde compatible**: read rows into `#[derive(Deserialize)]` types, with
//!   optional per-column validators, and write `#[derive(Serialize)]` values
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! csv_dialect = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Scanning and Generating
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Generator, Scanner};
//!
//! let input = "; inventory\naaa, 'b,b' ,\"c\"\"c\"\n";
//! let rows = Scanner::from_str(input, DialectConfig::default())
//!     .scan_all()
//!     .unwrap()
//!     .rows;
//! assert_eq!(rows, vec![vec!["aaa", "b,b", "c\"c"]]);
//!
//! let mut generator = Generator::new(DialectConfig::default());
//! generator.write_rows(&rows).unwrap();
//! let output = String::from_utf8(generator.finish().unwrap()).unwrap();
//! assert_eq!(output, "aaa,\"b,b\",\"c\"\"c\"");
//! ```
//!
//! ### Binding to Structs
//!
//! ```rust
//! use csv_dialect::{from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Item {
//!     id: u32,
//!     name: String,
//!     price: f64,
//! }
//!
//! let items = vec![
//!     Item { id: 1, name: "Widget".to_string(), price: 9.99 },
//!     Item { id: 2, name: "Gadget, large".to_string(), price: 14.5 },
//! ];
//!
//! let text = to_string(&items).unwrap();
//! assert_eq!(text, "id,name,price\n1,Widget,9.99\n2,\"Gadget, large\",14.5");
//!
//! let back: Vec<Item> = from_str(&text).unwrap();
//! assert_eq!(back, items);
//! ```
//!
//! ### Custom Dialects
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Scanner};
//!
//! let config = DialectConfig::builder()
//!     .with_separator('|')
//!     .with_field_prefix('[')
//!     .with_field_suffix(']')
//!     .build()
//!     .unwrap();
//!
//! let mut scanner = Scanner::from_str("[a]|[\"b|c\"]", config);
//! assert_eq!(scanner.scan_row().unwrap(), Some(vec!["a".to_string(), "b|c".to_string()]));
//! ```
//!
//! ## Format Reference
//!
//! See the [`format`] module for the grammar and the list of syntax errors.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Scanning and generating with the default dialect
//! - **`custom_options.rs`** - Building dialects and reading syntax errors
//! - **`struct_binding.rs`** - Serde binding with validators
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod format;
pub mod generator;
pub mod macros;
pub mod map;
pub mod options;
pub mod scanner;
pub mod ser;

pub use de::{RowDeserializer, Unmarshaler, ValidatorFn};
pub use error::{Error, Position, Result, SyntaxKind};
pub use generator::Generator;
pub use map::NamedRow;
pub use options::{DialectBuilder, DialectConfig, DialectOption, Preset};
pub use scanner::{Document, Row, Scanner};
pub use ser::Serializer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize a list of values to a document in the default dialect.
///
/// Struct and map values produce a header row from their field names.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&[Point { x: 1, y: 2 }]).unwrap();
/// assert_eq!(text, "x,y\n1,2");
/// ```
///
/// # Errors
///
/// Returns an error if a value cannot be flattened into a record.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(values: &[T]) -> Result<String>
where
    T: Serialize,
{
    to_string_with_options(values, DialectConfig::default())
}

/// Serialize a list of values to a document in the given dialect.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::{to_string_with_options, DialectConfig};
///
/// let config = DialectConfig::builder().with_separator('\t').build().unwrap();
/// let text = to_string_with_options(&[("a", 1), ("b", 2)], config).unwrap();
/// assert_eq!(text, "a\t1\nb\t2");
/// ```
///
/// # Errors
///
/// Returns an error if a value cannot be flattened into a record.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(values: &[T], config: DialectConfig) -> Result<String>
where
    T: Serialize,
{
    let mut serializer = Serializer::new(config);
    for value in values {
        serializer.serialize_record(value)?;
    }
    serializer.into_inner()
}

/// Serialize a list of values to bytes in the default dialect.
///
/// # Errors
///
/// Returns an error if a value cannot be flattened into a record.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(values: &[T]) -> Result<Vec<u8>>
where
    T: Serialize,
{
    to_string(values).map(String::into_bytes)
}

/// Serialize a list of values to a writer in the default dialect.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[("x", 1)]).unwrap();
/// assert_eq!(buffer, b"x,1");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, values: &[T]) -> Result<()>
where
    W: io::Write,
    T: Serialize,
{
    to_writer_with_options(writer, values, DialectConfig::default())
}

/// Serialize a list of values to a writer in the given dialect.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, values: &[T], config: DialectConfig) -> Result<()>
where
    W: io::Write,
    T: Serialize,
{
    let text = to_string_with_options(values, config)?;
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io("Generator failed", &e))
}

/// Deserialize every record of a headed document in the default dialect.
///
/// The first record is always read as the header, whatever the dialect says.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let points: Vec<Point> = from_str("x,y\n1,2\n3,4").unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed, has no header, or a value
/// cannot be converted. Errors name the line and column involved.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, DialectConfig::default())
}

/// Deserialize every record of a headed document in the given dialect.
///
/// # Errors
///
/// Same as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, config: DialectConfig) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    Unmarshaler::new(config).from_str(s)
}

/// Deserialize every record of a headed document read from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use csv_dialect::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let points: Vec<Point> = from_reader(Cursor::new(b"x,y\n1,2")).unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is malformed, or a value
/// cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<Vec<T>>
where
    R: io::Read,
    T: DeserializeOwned,
{
    Unmarshaler::new(DialectConfig::default()).from_reader(reader)
}

/// Deserialize every record of a headed document from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, the input is malformed,
/// or a value cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    Unmarshaler::new(DialectConfig::default()).from_slice(v)
}
