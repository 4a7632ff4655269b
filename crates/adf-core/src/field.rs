//! Field contracts for attribute records.
//!
//! Every record declares its fields as a static [`FieldSpec`] table and is
//! built in two phases: a [`RecordReader`] pulls raw values out of the wire
//! map and validates them, then the record is constructed in one step. A
//! missing required field is therefore an error *before* the record exists,
//! never a placeholder found later.
//!
//! Serialization goes the other way through [`RecordWriter`], which omits
//! [`Field::Absent`] values entirely.

use std::collections::HashMap;
use std::sync::RwLock;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};

use crate::error::{json_kind, AdfError, Result};

/// An optional wire field.
///
/// `Absent` means the key was not supplied and is omitted again on output;
/// `Null` means the key was supplied as JSON `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// The value, if one was given.
    pub fn get(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Present(value) => Field::Present(value),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Present(value)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

impl Field<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.get().map(String::as_str)
    }
}

/// How a declared field behaves when the key is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Absence is a decode error.
    Required,
    /// Absence is kept as [`Field::Absent`].
    Optional,
    /// Absence yields a fixed literal.
    Defaulted,
}

/// One entry of a record's field declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Required,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Optional,
        }
    }

    pub const fn defaulted(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Defaulted,
        }
    }
}

/// Field lookup table for one record type.
pub type FieldTable = IndexMap<&'static str, FieldKind>;

static FIELD_TABLES: Lazy<RwLock<HashMap<&'static str, &'static FieldTable>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Field table for `type_name`, built from `specs` on first use.
///
/// Entries never change once written, so a racing second writer simply
/// keeps the first table.
pub fn field_table(type_name: &'static str, specs: &'static [FieldSpec]) -> &'static FieldTable {
    if let Ok(tables) = FIELD_TABLES.read() {
        if let Some(table) = tables.get(type_name) {
            return table;
        }
    }

    let built: FieldTable = specs.iter().map(|spec| (spec.name, spec.kind)).collect();
    match FIELD_TABLES.write() {
        Ok(mut tables) => *tables
            .entry(type_name)
            .or_insert_with(|| Box::leak(Box::new(built))),
        // A poisoned lock only means another thread panicked mid-insert.
        Err(_) => Box::leak(Box::new(built)),
    }
}

/// Location of a field value, used for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct FieldAt<'a> {
    pub type_name: &'static str,
    pub field: &'static str,
    /// JSON pointer of the value itself.
    pub path: &'a str,
}

impl FieldAt<'_> {
    pub fn mismatch(&self, expected: &'static str, found: &Value) -> AdfError {
        AdfError::InvalidFieldType {
            type_name: self.type_name,
            field: self.field,
            expected,
            found: json_kind(found),
            path: self.path.to_string(),
        }
    }
}

/// A value that can sit in a record field.
pub trait FieldValue: Sized {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self>;
    fn encode_value(&self) -> Value;
}

impl FieldValue for String {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(at.mismatch("a string", other)),
        }
    }

    fn encode_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FieldValue for i64 {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        value.as_i64().ok_or_else(|| at.mismatch("an integer", value))
    }

    fn encode_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FieldValue for bool {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        value.as_bool().ok_or_else(|| at.mismatch("a boolean", value))
    }

    fn encode_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for Number {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n.clone()),
            other => Err(at.mismatch("a number", other)),
        }
    }

    fn encode_value(&self) -> Value {
        Value::Number(self.clone())
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(at.mismatch("an array", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}/{}", at.path, i);
                T::decode_value(item, &FieldAt { path: &path, ..*at })
            })
            .collect()
    }

    fn encode_value(&self) -> Value {
        Value::Array(self.iter().map(FieldValue::encode_value).collect())
    }
}

impl<T: FieldValue> FieldValue for IndexMap<String, T> {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(at.mismatch("an object", value));
        };
        entries
            .iter()
            .map(|(key, item)| {
                let path = format!("{}/{}", at.path, key);
                let decoded = T::decode_value(item, &FieldAt { path: &path, ..*at })?;
                Ok((key.clone(), decoded))
            })
            .collect()
    }

    fn encode_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, item)| (key.clone(), item.encode_value()))
                .collect(),
        )
    }
}

/// A typed attribute record with a declared field contract.
pub trait Record: Sized {
    /// Name used in error messages and as the field-table cache key.
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    /// Build the record from validated reader output.
    fn read(reader: &RecordReader<'_>) -> Result<Self>;

    /// Emit every non-absent field.
    fn write(&self, writer: &mut RecordWriter);

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Self::from_map_at(map, "")
    }

    fn from_map_at(map: &Map<String, Value>, path: &str) -> Result<Self> {
        let reader = RecordReader::new(Self::TYPE_NAME, Self::FIELDS, map, path);
        Self::read(&reader)
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut writer = RecordWriter::new();
        self.write(&mut writer);
        writer.finish()
    }
}

/// Implements [`FieldValue`] for records so they can nest inside other records.
macro_rules! record_field_value {
    ($($record:ty),* $(,)?) => {
        $(
            impl $crate::field::FieldValue for $record {
                fn decode_value(
                    value: &serde_json::Value,
                    at: &$crate::field::FieldAt<'_>,
                ) -> $crate::error::Result<Self> {
                    match value {
                        serde_json::Value::Object(map) => {
                            <$record as $crate::field::Record>::from_map_at(map, at.path)
                        }
                        other => Err(at.mismatch("an object", other)),
                    }
                }

                fn encode_value(&self) -> serde_json::Value {
                    serde_json::Value::Object($crate::field::Record::to_map(self))
                }
            }
        )*
    };
}
pub(crate) use record_field_value;

/// First phase of record construction: typed access to a wire map.
pub struct RecordReader<'a> {
    type_name: &'static str,
    table: &'static FieldTable,
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> RecordReader<'a> {
    pub fn new(
        type_name: &'static str,
        specs: &'static [FieldSpec],
        map: &'a Map<String, Value>,
        path: &'a str,
    ) -> Self {
        let table = field_table(type_name, specs);
        for key in map.keys() {
            if key != "type" && !table.contains_key(key.as_str()) {
                tracing::trace!(type_name, key = %key, path = %path, "Ignoring undeclared field");
            }
        }
        Self {
            type_name,
            table,
            map,
            path,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// Raw value under `name`, if the key exists.
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name)
    }

    /// JSON pointer of the value under `name`.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.path, name)
    }

    pub fn missing(&self, name: &'static str) -> AdfError {
        debug_assert_eq!(
            self.table.get(name),
            Some(&FieldKind::Required),
            "{} does not declare {} as required",
            self.type_name,
            name
        );
        AdfError::MissingRequiredField {
            type_name: self.type_name,
            field: name,
            path: self.path.to_string(),
        }
    }

    pub fn required<T: FieldValue>(&self, name: &'static str) -> Result<T> {
        match self.map.get(name) {
            None | Some(Value::Null) => Err(self.missing(name)),
            Some(value) => self.decode(name, value),
        }
    }

    pub fn optional<T: FieldValue>(&self, name: &'static str) -> Result<Field<T>> {
        match self.map.get(name) {
            None => Ok(Field::Absent),
            Some(Value::Null) => Ok(Field::Null),
            Some(value) => self.decode(name, value).map(Field::Present),
        }
    }

    pub fn defaulted<T: FieldValue>(&self, name: &'static str, default: impl FnOnce() -> T) -> Result<T> {
        match self.map.get(name) {
            None | Some(Value::Null) => Ok(default()),
            Some(value) => self.decode(name, value),
        }
    }

    fn decode<T: FieldValue>(&self, name: &'static str, value: &Value) -> Result<T> {
        let path = self.child_path(name);
        T::decode_value(
            value,
            &FieldAt {
                type_name: self.type_name,
                field: name,
                path: &path,
            },
        )
    }
}

/// Serialization counterpart of [`RecordReader`].
#[derive(Debug, Default)]
pub struct RecordWriter {
    map: Map<String, Value>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: FieldValue>(&mut self, name: &str, value: &T) {
        self.map.insert(name.to_string(), value.encode_value());
    }

    pub fn put_field<T: FieldValue>(&mut self, name: &str, value: &Field<T>) {
        match value {
            Field::Absent => {}
            Field::Null => {
                self.map.insert(name.to_string(), Value::Null);
            }
            Field::Present(value) => self.put(name, value),
        }
    }

    pub fn put_raw(&mut self, name: &str, value: Value) {
        self.map.insert(name.to_string(), value);
    }

    pub fn finish(self) -> Map<String, Value> {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Degree {
        name: String,
        year: i64,
    }

    impl Record for Degree {
        const TYPE_NAME: &'static str = "test.degree";
        const FIELDS: &'static [FieldSpec] =
            &[FieldSpec::required("name"), FieldSpec::required("year")];

        fn read(reader: &RecordReader<'_>) -> Result<Self> {
            Ok(Self {
                name: reader.required("name")?,
                year: reader.required("year")?,
            })
        }

        fn write(&self, writer: &mut RecordWriter) {
            writer.put("name", &self.name);
            writer.put("year", &self.year);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: i64,
        nickname: Field<String>,
        kind: String,
        degrees: Field<Vec<Degree>>,
        records: Field<IndexMap<String, Degree>>,
    }

    impl Record for Person {
        const TYPE_NAME: &'static str = "test.person";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::required("id"),
            FieldSpec::optional("nickname"),
            FieldSpec::defaulted("kind"),
            FieldSpec::optional("degrees"),
            FieldSpec::optional("records"),
        ];

        fn read(reader: &RecordReader<'_>) -> Result<Self> {
            Ok(Self {
                id: reader.required("id")?,
                nickname: reader.optional("nickname")?,
                kind: reader.defaulted("kind", || "human".to_string())?,
                degrees: reader.optional("degrees")?,
                records: reader.optional("records")?,
            })
        }

        fn write(&self, writer: &mut RecordWriter) {
            writer.put("id", &self.id);
            writer.put_field("nickname", &self.nickname);
            writer.put("kind", &self.kind);
            writer.put_field("degrees", &self.degrees);
            writer.put_field("records", &self.records);
        }
    }

    record_field_value!(Degree);

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    fn check_round_trip<R: Record + PartialEq + std::fmt::Debug>(record: &R) {
        let data = record.to_map();
        let again = R::from_map(&data).unwrap();
        assert_eq!(&again, record);
        assert_eq!(again.to_map(), data);
    }

    #[test]
    fn test_required_field_missing() {
        let err = Person::from_map(&object(json!({}))).unwrap_err();
        match err {
            AdfError::MissingRequiredField {
                type_name, field, ..
            } => {
                assert_eq!(type_name, "test.person");
                assert_eq!(field, "id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_absent_null_and_empty_are_distinct() {
        let absent = Person::from_map(&object(json!({"id": 1}))).unwrap();
        let null = Person::from_map(&object(json!({"id": 1, "nickname": null}))).unwrap();
        let empty = Person::from_map(&object(json!({"id": 1, "nickname": ""}))).unwrap();

        assert_eq!(absent.nickname, Field::Absent);
        assert_eq!(null.nickname, Field::Null);
        assert_eq!(empty.nickname, Field::Present(String::new()));

        assert!(!absent.to_map().contains_key("nickname"));
        assert_eq!(null.to_map().get("nickname"), Some(&Value::Null));
        assert_eq!(empty.to_map().get("nickname"), Some(&json!("")));

        check_round_trip(&absent);
        check_round_trip(&null);
        check_round_trip(&empty);
    }

    #[test]
    fn test_defaulted_field() {
        let person = Person::from_map(&object(json!({"id": 1}))).unwrap();
        assert_eq!(person.kind, "human");
        assert_eq!(person.to_map().get("kind"), Some(&json!("human")));
    }

    #[test]
    fn test_list_and_map_of_records() {
        let data = object(json!({
            "id": 7,
            "degrees": [{"name": "BSc", "year": 2001}, {"name": "MSc", "year": 2003}],
            "records": {"r-2": {"name": "PhD", "year": 2008}, "r-1": {"name": "BA", "year": 1999}}
        }));
        let person = Person::from_map(&data).unwrap();

        let degrees = person.degrees.get().unwrap();
        assert_eq!(degrees[1].name, "MSc");
        let keys: Vec<&str> = person.records.get().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["r-2", "r-1"]);

        check_round_trip(&person);
    }

    #[test]
    fn test_nested_error_path() {
        let data = object(json!({"id": 1, "degrees": [{"name": "BSc", "year": 2001}, {"name": "MSc"}]}));
        let err = Person::from_map(&data).unwrap_err();
        assert_eq!(err.path(), Some("/degrees/1"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = Person::from_map(&object(json!({"id": "one"}))).unwrap_err();
        assert!(matches!(
            err,
            AdfError::InvalidFieldType {
                field: "id",
                expected: "an integer",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_field_table_is_cached() {
        let first = field_table(Person::TYPE_NAME, Person::FIELDS);
        let second = field_table(Person::TYPE_NAME, Person::FIELDS);
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.get("kind"), Some(&FieldKind::Defaulted));
    }

    #[test]
    fn test_field_table_concurrent_first_use() {
        static SPECS: &[FieldSpec] = &[FieldSpec::optional("a")];
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| field_table("test.concurrent", SPECS) as *const FieldTable as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.iter().all(|a| *a == addrs[0]));
    }
}
