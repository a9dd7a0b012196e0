//! Binding rows to Rust values.
//!
//! This module maps the records of a headed document onto types implementing
//! `Deserialize`. Every record becomes one value: header names are matched
//! against serde field names (use `#[serde(rename = "...")]` for columns whose
//! names differ), unknown columns are ignored, and missing columns are left to
//! serde (`Option` fields become `None`, `#[serde(default)]` applies).
//!
//! ## Conversions
//!
//! Each field text is converted through a closed set of kinds:
//!
//! - **Integers**: decimal, range-checked against the destination width
//! - **Floats**: decimal; `f32` destinations are range-checked
//! - **Booleans**: `1 t T TRUE true True` and `0 f F FALSE false False`
//! - **Text**: `String`, `char`
//! - **Optional**: an empty field is `None`
//! - **Enums**: unit variants by name
//! - **Custom**: any type whose `Deserialize` accepts a string (`FromStr`
//!   wrappers via `#[serde(try_from = "String")]`, `chrono` dates, ...)
//!
//! ## Validators
//!
//! Named predicates are registered on an [`Unmarshaler`] and bound to columns.
//! They run on the raw field text before conversion.
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Error, Unmarshaler};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! let unmarshaler = Unmarshaler::new(DialectConfig::default())
//!     .validator("non_empty", |v| !v.is_empty())
//!     .validate("name", ["non_empty"]);
//!
//! let people: Vec<Person> = unmarshaler.from_str("name,age\nAnn,31").unwrap();
//! assert_eq!(people, vec![Person { name: "Ann".to_string(), age: 31 }]);
//!
//! let err = unmarshaler.from_str::<Person>("name,age\n,31").unwrap_err();
//! assert!(matches!(err, Error::Validation { line: 2, .. }));
//! ```

use crate::error::{Error, Result};
use crate::options::DialectConfig;
use crate::scanner::{Row, Scanner};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};

/// A named predicate over raw field text.
pub type ValidatorFn = dyn Fn(&str) -> bool + Send + Sync;

/// Unmarshals headed documents into values, applying column validators.
///
/// The header is always scanned, whatever the dialect says.
pub struct Unmarshaler {
    config: DialectConfig,
    validators: HashMap<String, Box<ValidatorFn>>,
    bindings: Vec<(String, Vec<String>)>,
}

impl fmt::Debug for Unmarshaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("Unmarshaler")
            .field("config", &self.config)
            .field("validators", &names)
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl Unmarshaler {
    pub fn new(config: DialectConfig) -> Self {
        Unmarshaler {
            config: config.with_header(),
            validators: HashMap::new(),
            bindings: Vec::new(),
        }
    }

    /// Registers a predicate under `name`, replacing any previous one.
    #[must_use]
    pub fn validator<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(name.to_string(), Box::new(predicate));
        self
    }

    /// Binds validators, applied in order, to a column.
    #[must_use]
    pub fn validate<I, S>(mut self, column: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        self.bindings.push((column.to_string(), names));
        self
    }

    /// Unmarshals every record of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownValidator`] before scanning if a bound name was
    /// never registered, [`Error::MissingHeader`] for an empty document, any
    /// scanning error, [`Error::Validation`] when a predicate rejects a value,
    /// and conversion errors from the destination type.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str<T: DeserializeOwned>(&self, input: &str) -> Result<Vec<T>> {
        self.unmarshal(Scanner::from_str(input, self.config.clone()))
    }

    /// Unmarshals every record of a UTF-8 byte slice.
    ///
    /// # Errors
    ///
    /// Same as [`Unmarshaler::from_str`].
    pub fn from_slice<T: DeserializeOwned>(&self, input: &[u8]) -> Result<Vec<T>> {
        self.unmarshal(Scanner::from_slice(input, self.config.clone()))
    }

    /// Unmarshals every record read from `reader`.
    ///
    /// # Errors
    ///
    /// Same as [`Unmarshaler::from_str`], plus [`Error::Io`] if reading fails.
    pub fn from_reader<T: DeserializeOwned, R: Read>(&self, reader: R) -> Result<Vec<T>> {
        self.unmarshal(Scanner::new(BufReader::new(reader), self.config.clone()))
    }

    /// Resolves every bound validator name up front.
    fn resolve(&self) -> Result<HashMap<&str, Vec<(&str, &ValidatorFn)>>> {
        let mut resolved: HashMap<&str, Vec<(&str, &ValidatorFn)>> = HashMap::new();
        for (column, names) in &self.bindings {
            for name in names {
                let predicate = self
                    .validators
                    .get(name)
                    .ok_or_else(|| Error::UnknownValidator(name.clone()))?;
                resolved
                    .entry(column.as_str())
                    .or_default()
                    .push((name.as_str(), predicate.as_ref()));
            }
        }
        Ok(resolved)
    }

    fn unmarshal<T, R>(&self, mut scanner: Scanner<R>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: BufRead,
    {
        let resolved = self.resolve()?;
        let header = scanner.scan_header()?.cloned().ok_or(Error::MissingHeader)?;
        let checks: Vec<&[(&str, &ValidatorFn)]> = header
            .iter()
            .map(|name| resolved.get(name.as_str()).map_or(&[][..], Vec::as_slice))
            .collect();

        let mut items = Vec::new();
        while let Some(row) = scanner.scan_row()? {
            let line = scanner.record_line();
            for ((value, column), predicates) in row.iter().zip(&header).zip(&checks) {
                if let Some((name, _)) = predicates.iter().find(|(_, p)| !p(value.as_str())) {
                    log::debug!("validator {} rejected column {} at line {}", name, column, line);
                    return Err(Error::Validation {
                        line,
                        column: column.clone(),
                        value: value.clone(),
                    });
                }
            }
            items.push(T::deserialize(RowDeserializer::new(&header, row, line))?);
        }
        Ok(items)
    }
}

/// Presents one record as a map of header name to field.
///
/// Sequence-shaped destinations (`Vec<String>`, tuples) receive the fields
/// positionally instead.
pub struct RowDeserializer<'a> {
    header: &'a [String],
    row: Row,
    line: usize,
}

impl<'a> RowDeserializer<'a> {
    pub fn new(header: &'a [String], row: Row, line: usize) -> Self {
        RowDeserializer { header, row, line }
    }
}

impl<'de, 'a> de::Deserializer<'de> for RowDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(RowAccess {
            header: self.header.iter(),
            fields: self.row.into_iter(),
            value: None,
            line: self.line,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let line = self.line;
        let fields = self
            .row
            .into_iter()
            .enumerate()
            .map(move |(i, value)| FieldDeserializer::new(value, Column::Index(i), line));
        visitor.visit_seq(de::value::SeqDeserializer::new(fields))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct enum
        identifier ignored_any
    }
}

struct RowAccess<'a> {
    header: std::slice::Iter<'a, String>,
    fields: std::vec::IntoIter<String>,
    value: Option<(String, &'a str)>,
    line: usize,
}

impl<'de, 'a> de::MapAccess<'de> for RowAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match (self.header.next(), self.fields.next()) {
            (Some(name), Some(value)) => {
                self.value = Some((value, name.as_str()));
                seed.deserialize(name.as_str().into_deserializer()).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some((value, name)) => {
                seed.deserialize(FieldDeserializer::new(value, Column::Name(name), self.line))
            }
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.header.len().min(self.fields.len()))
    }
}

/// Where a field came from, for error messages.
#[derive(Clone, Copy, Debug)]
enum Column<'a> {
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name(name) => f.write_str(name),
            Column::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// Converts the text of a single field.
struct FieldDeserializer<'a> {
    value: String,
    column: Column<'a>,
    line: usize,
}

impl<'a> FieldDeserializer<'a> {
    fn new(value: String, column: Column<'a>, line: usize) -> Self {
        FieldDeserializer {
            value,
            column,
            line,
        }
    }

    fn conversion(&self, target: &str) -> Error {
        Error::Conversion {
            line: self.line,
            column: self.column.to_string(),
            value: self.value.clone(),
            target: target.to_string(),
        }
    }

    fn out_of_range(&self, target: &str) -> Error {
        Error::OutOfRange {
            line: self.line,
            column: self.column.to_string(),
            value: self.value.clone(),
            target: target.to_string(),
        }
    }

    fn parse_bool(&self) -> Result<bool> {
        match self.value.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(self.conversion("bool")),
        }
    }

    fn parse_f64(&self, target: &str) -> Result<f64> {
        self.value.parse().map_err(|_| self.conversion(target))
    }

    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_type(&format!(
            "column {} at line {} cannot hold a {}",
            self.column, self.line, kind
        ))
    }
}

impl<'de> de::IntoDeserializer<'de, Error> for FieldDeserializer<'_> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $ty:ty, $wide:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            let wide: $wide = self
                .value
                .parse()
                .map_err(|_| self.conversion(stringify!($ty)))?;
            let narrow = <$ty>::try_from(wide).map_err(|_| self.out_of_range(stringify!($ty)))?;
            visitor.$visit(narrow)
        }
    };
}

impl<'de> de::Deserializer<'de> for FieldDeserializer<'_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.parse_bool()?)
    }

    deserialize_integer!(deserialize_i8, visit_i8, i8, i128);
    deserialize_integer!(deserialize_i16, visit_i16, i16, i128);
    deserialize_integer!(deserialize_i32, visit_i32, i32, i128);
    deserialize_integer!(deserialize_i64, visit_i64, i64, i128);
    deserialize_integer!(deserialize_i128, visit_i128, i128, i128);
    deserialize_integer!(deserialize_u8, visit_u8, u8, i128);
    deserialize_integer!(deserialize_u16, visit_u16, u16, i128);
    deserialize_integer!(deserialize_u32, visit_u32, u32, i128);
    deserialize_integer!(deserialize_u64, visit_u64, u64, i128);
    deserialize_integer!(deserialize_u128, visit_u128, u128, u128);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.parse_f64("f32")?;
        if v.is_finite() && v.abs() > f64::from(f32::MAX) {
            return Err(self.out_of_range("f32"));
        }
        visitor.visit_f32(v as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.parse_f64("f64")?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.conversion("char")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_byte_buf(self.value.into_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_byte_buf(self.value.into_bytes())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.conversion("unit"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(self.unsupported("sequence"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(self.unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(self.unsupported("tuple struct"))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(self.unsupported("map"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(self.unsupported(&format!("struct {}", name)))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let variant: de::value::StringDeserializer<Error> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
