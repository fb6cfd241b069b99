//! Plain-data records: named fields out, explicit constructor descriptors in.
//!
//! A record exposes its public fields through [`Record::fields`]; the encoder
//! writes them inline next to the type tag. To be decodable through the
//! default path a record also implements [`Constructible`], which names the
//! constructor parameters up front so missing inputs are detected before any
//! construction is attempted.

use crate::enumeration::Enumeration;
use crate::error::{Result, StrongJsonError};
use crate::hooks::Encodable;
use crate::value::{FromValue, Value};
use std::any::Any;
use std::fmt;

/// A user type that can appear in the object graph as [`Value::Object`].
pub trait Record: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Name written as the envelope tag and used as the registry key.
    const TYPE_NAME: &'static str;

    /// Public fields in declaration order.
    fn fields(&self) -> Vec<(&'static str, Value)>;

    /// Opt into custom encoding. Return `Some(self)` from types that
    /// implement [`Encodable`].
    fn as_encodable(&self) -> Option<&dyn Encodable> {
        None
    }
}

/// Object-safe view of a record, implemented for every [`Record`].
pub trait Object: Any + fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    fn reflect_fields(&self) -> Vec<(&'static str, Value)>;

    fn encodable(&self) -> Option<&dyn Encodable>;

    fn as_any(&self) -> &dyn Any;

    fn eq_object(&self, other: &dyn Object) -> bool;
}

impl<T: Record> Object for T {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn reflect_fields(&self) -> Vec<(&'static str, Value)> {
        self.fields()
    }

    fn encodable(&self) -> Option<&dyn Encodable> {
        self.as_encodable()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_object(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// One constructor parameter: a name and, if optional, its default.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: &'static str,
    default: Option<Value>,
}

impl Parameter {
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    pub fn optional(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A record the default decoder can rebuild from its envelope fields.
pub trait Constructible: Record {
    fn parameters() -> Vec<Parameter>;

    /// Build the record. Every parameter is present in `args`: decoded from
    /// the envelope, or filled from its default.
    fn construct(args: &mut Arguments) -> Result<Self>;
}

/// Decoded constructor arguments, keyed by parameter name.
#[derive(Debug)]
pub struct Arguments {
    type_name: &'static str,
    values: Vec<(&'static str, Value)>,
}

impl Arguments {
    pub fn new(type_name: &'static str, values: Vec<(&'static str, Value)>) -> Self {
        Self { type_name, values }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove the argument and return it as a raw value.
    pub fn take_value(&mut self, name: &str) -> Result<Value> {
        match self.values.iter().position(|(n, _)| *n == name) {
            Some(i) => Ok(self.values.remove(i).1),
            None => Err(self.error(format!("no argument named {name:?}"))),
        }
    }

    /// Remove the argument and convert it.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T> {
        let value = self.take_value(name)?;
        let kind = value.kind();
        T::from_value(value).ok_or_else(|| {
            self.error(format!(
                "parameter {name:?}: expected {}, found {kind}",
                T::EXPECTED
            ))
        })
    }

    /// Remove the argument and clone the record behind it.
    pub fn take_record<T: Record>(&mut self, name: &str) -> Result<T> {
        let value = self.take_value(name)?;
        match value.downcast_ref::<T>() {
            Some(record) => Ok(record.clone()),
            None => Err(self.error(format!(
                "parameter {name:?}: expected {}, found {}",
                T::TYPE_NAME,
                value.kind()
            ))),
        }
    }

    /// Remove the argument and resolve it as a member of `E`.
    pub fn take_enum<E: Enumeration>(&mut self, name: &str) -> Result<E> {
        let value = self.take_value(name)?;
        value.to_enum::<E>().ok_or_else(|| {
            self.error(format!(
                "parameter {name:?}: expected {} member, found {}",
                E::TYPE_NAME,
                value.kind()
            ))
        })
    }

    fn error(&self, reason: String) -> StrongJsonError {
        StrongJsonError::Construct {
            type_name: self.type_name.to_string(),
            reason,
        }
    }
}
