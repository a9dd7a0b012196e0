//! Record serialization.
//!
//! This module provides the [`Serializer`], which turns a list of values
//! implementing `Serialize` into rows written through a [`Generator`].
//!
//! ## Overview
//!
//! Each element of the list becomes one record:
//!
//! - **Structs and maps**: flattened into named columns; the first element's
//!   column names become the header, and every later element must agree
//! - **Tuples and sequences**: written positionally, without a header
//! - **Scalars**: written as a single-field record
//!
//! Field values are rendered as text: integers and floats in decimal, `bool`
//! as `true`/`false`, `None` and `()` as an empty field, unit enum variants by
//! name. Nested structs, maps and sequences inside a field are rejected with
//! [`Error::UnsupportedType`].
//!
//! ## Usage
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Serializer};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let mut serializer = Serializer::new(DialectConfig::default());
//! serializer.serialize_record(&Point { x: 1, y: 2 }).unwrap();
//! serializer.serialize_record(&Point { x: 3, y: 4 }).unwrap();
//! assert_eq!(serializer.into_inner().unwrap(), "x,y\n1,2\n3,4");
//! ```

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::map::NamedRow;
use crate::options::DialectConfig;
use serde::ser::{self, Impossible, Serializer as _};
use serde::Serialize;

/// The record serializer.
///
/// Created via [`Serializer::new`]; values are appended one record at a time
/// with [`Serializer::serialize_record`].
pub struct Serializer {
    generator: Generator,
    header: Option<Vec<String>>,
    records: usize,
}

impl Serializer {
    pub fn new(config: DialectConfig) -> Self {
        Serializer {
            generator: Generator::new(config),
            header: None,
            records: 0,
        }
    }

    /// Appends one value as a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] for values that do not fit in a
    /// flat record, and [`Error::Custom`] when the columns of a struct or map
    /// differ from the header set by the first record.
    pub fn serialize_record<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let record = value.serialize(RecordSerializer)?;
        if let Some(columns) = record.header {
            if let Some(expected) = &self.header {
                if *expected != columns {
                    return Err(Error::custom(format!(
                        "record {} has columns [{}], expected [{}]",
                        self.records + 1,
                        columns.join(","),
                        expected.join(",")
                    )));
                }
            } else if self.records == 0 {
                self.generator.write_header(columns.as_slice())?;
                self.header = Some(columns);
            }
        }
        self.generator.write_row(record.fields.as_slice())?;
        self.records += 1;
        Ok(())
    }

    /// Finishes the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] if the underlying generator was already
    /// finished.
    pub fn into_inner(mut self) -> Result<String> {
        let bytes = self.generator.finish()?;
        String::from_utf8(bytes).map_err(Error::custom)
    }
}

/// One flattened value: the column names, if the value had any, and the fields.
struct Record {
    header: Option<Vec<String>>,
    fields: Vec<String>,
}

impl Record {
    fn single(field: String) -> Self {
        Record {
            header: None,
            fields: vec![field],
        }
    }

    fn named(row: NamedRow) -> Self {
        let (header, fields) = row.into_parts();
        Record {
            header: Some(header),
            fields,
        }
    }
}

/// Serializes one top-level value into a [`Record`].
struct RecordSerializer;

macro_rules! serialize_scalar {
    ($method:ident, $ty:ty) => {
        fn $method(self, v: $ty) -> Result<Record> {
            FieldSerializer.$method(v).map(Record::single)
        }
    };
}

impl ser::Serializer for RecordSerializer {
    type Ok = Record;
    type Error = Error;

    type SerializeSeq = SeqRecord;
    type SerializeTuple = SeqRecord;
    type SerializeTupleStruct = SeqRecord;
    type SerializeTupleVariant = Impossible<Record, Error>;
    type SerializeMap = MapRecord;
    type SerializeStruct = MapRecord;
    type SerializeStructVariant = Impossible<Record, Error>;

    serialize_scalar!(serialize_bool, bool);
    serialize_scalar!(serialize_i8, i8);
    serialize_scalar!(serialize_i16, i16);
    serialize_scalar!(serialize_i32, i32);
    serialize_scalar!(serialize_i64, i64);
    serialize_scalar!(serialize_i128, i128);
    serialize_scalar!(serialize_u8, u8);
    serialize_scalar!(serialize_u16, u16);
    serialize_scalar!(serialize_u32, u32);
    serialize_scalar!(serialize_u64, u64);
    serialize_scalar!(serialize_u128, u128);
    serialize_scalar!(serialize_f32, f32);
    serialize_scalar!(serialize_f64, f64);
    serialize_scalar!(serialize_char, char);
    serialize_scalar!(serialize_str, &str);
    serialize_scalar!(serialize_bytes, &[u8]);

    fn serialize_none(self) -> Result<Record> {
        Ok(Record::single(String::new()))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Record>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Record> {
        Ok(Record::single(String::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Record> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Record> {
        Ok(Record::single(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Record>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Record>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported(name, variant))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqRecord> {
        Ok(SeqRecord {
            fields: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqRecord> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqRecord> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(name, variant))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapRecord> {
        Ok(MapRecord {
            row: NamedRow::with_capacity(len.unwrap_or(0)),
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapRecord> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(name, variant))
    }
}

fn unsupported(name: &str, variant: &str) -> Error {
    Error::unsupported_type(&format!(
        "enum variant {}::{} carries data",
        name, variant
    ))
}

/// Positional fields of a tuple or sequence.
struct SeqRecord {
    fields: Vec<String>,
}

impl ser::SerializeSeq for SeqRecord {
    type Ok = Record;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push(value.serialize(FieldSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Record> {
        Ok(Record {
            header: None,
            fields: self.fields,
        })
    }
}

impl ser::SerializeTuple for SeqRecord {
    type Ok = Record;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Record> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqRecord {
    type Ok = Record;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Record> {
        ser::SerializeSeq::end(self)
    }
}

/// Named fields of a struct or map, in declaration order.
struct MapRecord {
    row: NamedRow,
    key: Option<String>,
}

impl ser::SerializeMap for MapRecord {
    type Ok = Record;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.key = Some(key.serialize(FieldSerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.row.insert(key, value.serialize(FieldSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Record> {
        Ok(Record::named(self.row))
    }
}

impl ser::SerializeStruct for MapRecord {
    type Ok = Record;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.row
            .insert(key.to_string(), value.serialize(FieldSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Record> {
        Ok(Record::named(self.row))
    }
}

/// Renders a single field value as text.
struct FieldSerializer;

impl FieldSerializer {
    fn nested(kind: &str) -> Error {
        Error::unsupported_type(&format!("a field cannot hold a {}", kind))
    }
}

impl ser::Serializer for FieldSerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(if v { "true" } else { "false" }.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        String::from_utf8(v.to_vec()).map_err(|_| Self::nested("non UTF-8 byte string"))
    }

    fn serialize_none(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported(name, variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Self::nested("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Self::nested("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Self::nested(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(name, variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Self::nested("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Self::nested(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(name, variant))
    }
}
