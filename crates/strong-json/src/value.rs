//! The in-memory object graph the codec lowers to and raises from JSON.
//!
//! JSON itself only knows null, booleans, numbers, strings, arrays and
//! string-keyed objects. [`Value`] keeps the distinctions JSON erases:
//! tuple vs. list, set vs. list, ordered vs. plain mapping, non-string
//! keys, enumeration identity, dates, and user records.

use crate::enumeration::Enumeration;
use crate::record::{Object, Record};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

/// A node of the object graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// JSON integers beyond the `i64` range are rejected on decode rather
    /// than rounded into a float.
    Int(i64),
    /// Any float, including NaN and the infinities.
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Fixed-arity heterogeneous sequence.
    Tuple(Vec<Value>),
    Set(Set),
    Map(Mapping),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    Object(ObjectRef),
}

impl Value {
    /// Wrap a record in a shared handle.
    pub fn object<T: Record>(record: T) -> Self {
        Value::Object(ObjectRef::new(record))
    }

    pub fn enumeration<E: Enumeration>(member: E) -> Self {
        Value::Enum(EnumValue::of(member))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats as-is; integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Borrow the concrete record behind an `Object` value.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_object().and_then(ObjectRef::downcast_ref)
    }

    /// Resolve an `Enum` value to a member of `E` by symbolic name.
    pub fn to_enum<E: Enumeration>(&self) -> Option<E> {
        match self {
            Value::Enum(member) => member.to_enum(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Whether a mapping is an explicitly ordered variant.
///
/// Both kinds keep insertion order in memory; the distinction only affects
/// how the encoder is allowed to write the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapKind {
    #[default]
    Plain,
    Ordered,
}

/// Insertion-ordered mapping with arbitrary [`Value`] keys.
///
/// Lookups are linear; keys are compared with `Value` equality.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
    kind: MapKind,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordered() -> Self {
        Self {
            entries: Vec::new(),
            kind: MapKind::Ordered,
        }
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn with_kind(mut self, kind: MapKind) -> Self {
        self.kind = kind;
        self
    }

    /// Insert or replace. Replacing keeps the key's original position and
    /// returns the previous value.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// True when every key is a string, i.e. JSON could hold it directly.
    pub fn has_only_string_keys(&self) -> bool {
        self.keys().all(|k| matches!(k, Value::String(_)))
    }
}

/// Association equality: same keys mapped to equal values, in any order.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Set
// ---------------------------------------------------------------------------

/// Unordered collection of unique values.
#[derive(Debug, Clone, Default)]
pub struct Set {
    items: Vec<Value>,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an equal value was already present.
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T: Into<Value>> FromIterator<T> for Set {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl IntoIterator for Set {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Enumeration members and records
// ---------------------------------------------------------------------------

/// An enumeration member identified by its symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub member: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    pub fn of<E: Enumeration>(member: E) -> Self {
        Self::new(E::TYPE_NAME, member.name())
    }

    pub fn to_enum<E: Enumeration>(&self) -> Option<E> {
        if self.type_name != E::TYPE_NAME {
            return None;
        }
        E::from_name(&self.member)
    }
}

/// Shared handle to a user record.
///
/// Handles compare equal when the concrete types match and the records are
/// equal. Cloning a handle shares the record.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Object>);

impl ObjectRef {
    pub fn new<T: Record>(record: T) -> Self {
        ObjectRef(Arc::new(record))
    }

    /// Share an existing allocation, keeping pointer identity with `record`.
    pub fn from_arc<T: Record>(record: Arc<T>) -> Self {
        ObjectRef(record)
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    pub fn as_object(&self) -> &dyn Object {
        &*self.0
    }

    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Address of the shared allocation; stable for the handle's lifetime.
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.eq_object(other.as_object())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

// ---------------------------------------------------------------------------
// Conversions into Value
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Map(m)
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

// ---------------------------------------------------------------------------
// Conversions out of Value
// ---------------------------------------------------------------------------

/// Typed extraction used by constructors to pull arguments out of decoded
/// values.
pub trait FromValue: Sized {
    /// Human-readable expected shape, for error messages.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "32-bit int";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64().and_then(|i| i32::try_from(i).ok())
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "unsigned 32-bit int";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64().and_then(|i| u32::try_from(i).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for NaiveDate {
    const EXPECTED: &'static str = "date";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    const EXPECTED: &'static str = "datetime";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl FromValue for Mapping {
    const EXPECTED: &'static str = "map";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl FromValue for Set {
    const EXPECTED: &'static str = "set";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for ObjectRef {
    const EXPECTED: &'static str = "object";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// Lists and tuples both convert; every element must convert.
impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "sequence";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Tuple(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = "optional value";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
