//! Shared fixture types for the integration tests.
#![allow(dead_code)]

use serde_json::{Map, Value as Json};
use std::fmt;
use std::sync::{Arc, Mutex};
use strong_json::{
    Arguments, Constructible, DecodeContext, Decodable, EncodeContext, Encodable, Enumeration,
    Parameter, Record, Registry, Result, StrongJsonError, Value,
};

// ============================================================================
// Plain-data records
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    pub fn value(first_name: &str, last_name: &str) -> Value {
        Value::object(Self::new(first_name, last_name))
    }
}

impl Record for User {
    const TYPE_NAME: &'static str = "User";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("first_name", self.first_name.clone().into()),
            ("last_name", self.last_name.clone().into()),
        ]
    }
}

impl Constructible for User {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::required("first_name"),
            Parameter::required("last_name"),
        ]
    }

    fn construct(args: &mut Arguments) -> Result<Self> {
        Ok(Self {
            first_name: args.take("first_name")?,
            last_name: args.take("last_name")?,
        })
    }
}

/// Record with defaulted parameters and a nested record.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub owner: User,
    pub balance: i64,
    pub tags: Vec<String>,
}

impl Record for Account {
    const TYPE_NAME: &'static str = "Account";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("owner", Value::object(self.owner.clone())),
            ("balance", self.balance.into()),
            ("tags", self.tags.clone().into()),
        ]
    }
}

impl Constructible for Account {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::required("owner"),
            Parameter::optional("balance", 0),
            Parameter::optional("tags", Value::List(Vec::new())),
        ]
    }

    fn construct(args: &mut Arguments) -> Result<Self> {
        Ok(Self {
            owner: args.take_record("owner")?,
            balance: args.take("balance")?,
            tags: args.take("tags")?,
        })
    }
}

/// Record whose field is named like the default type key.
#[derive(Debug, Clone, PartialEq)]
pub struct Clashing;

impl Record for Clashing {
    const TYPE_NAME: &'static str = "Clashing";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![("__type__", Value::from("oops"))]
    }
}

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Red,
    Blue,
}

impl Enumeration for Color {
    const TYPE_NAME: &'static str = "Color";

    fn members() -> &'static [Self] {
        &[Color::Red, Color::Blue]
    }

    fn name(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Blue => "Blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Food {
    Noodles,
    Rice,
}

impl Enumeration for Food {
    const TYPE_NAME: &'static str = "Food";

    fn members() -> &'static [Self] {
        &[Food::Noodles, Food::Rice]
    }

    fn name(&self) -> &'static str {
        match self {
            Food::Noodles => "NOODLES",
            Food::Rice => "RICE",
        }
    }
}

// ============================================================================
// Hook implementations
// ============================================================================

/// Temperature written as a single `"21.5C"` string.
#[derive(Debug, Clone, PartialEq)]
pub struct Celsius(pub f64);

impl Record for Celsius {
    const TYPE_NAME: &'static str = "Celsius";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![("degrees", self.0.into())]
    }

    fn as_encodable(&self) -> Option<&dyn Encodable> {
        Some(self)
    }
}

impl Encodable for Celsius {
    fn to_envelope(&self, cx: &mut EncodeContext<'_>) -> Result<Json> {
        Ok(cx.envelope(Self::TYPE_NAME, Json::from(format!("{}C", self.0))))
    }
}

impl Decodable for Celsius {
    fn from_envelope(envelope: &Map<String, Json>, cx: &mut DecodeContext<'_>) -> Result<Self> {
        let raw = cx.data(envelope, Self::TYPE_NAME)?;
        raw.as_str()
            .and_then(|s| s.strip_suffix('C'))
            .and_then(|s| s.parse().ok())
            .map(Celsius)
            .ok_or_else(|| StrongJsonError::MalformedPayload {
                tag: Self::TYPE_NAME.to_string(),
                reason: format!("not a temperature: {raw}"),
            })
    }
}

/// Encodes by reflection but records whether the decode hook built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked {
    pub name: String,
    pub via_hook: bool,
}

impl Record for Tracked {
    const TYPE_NAME: &'static str = "Tracked";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![("name", self.name.clone().into())]
    }
}

impl Decodable for Tracked {
    fn from_envelope(envelope: &Map<String, Json>, cx: &mut DecodeContext<'_>) -> Result<Self> {
        let name = match envelope.get("name") {
            Some(raw) => cx.decode(raw)?,
            None => Value::Null,
        };
        Ok(Self {
            name: name.as_str().unwrap_or_default().to_string(),
            via_hook: true,
        })
    }
}

// ============================================================================
// Self-referencing graph
// ============================================================================

/// Linked node whose successor can point back at itself.
#[derive(Clone)]
pub struct Node {
    pub name: String,
    next: Arc<Mutex<Option<Value>>>,
}

impl Node {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            next: Arc::new(Mutex::new(None)),
        })
    }

    pub fn link(&self, next: Value) {
        *self.next.lock().unwrap() = Some(next);
    }

    /// Drop the successor so reference cycles are released.
    pub fn unlink(&self) {
        *self.next.lock().unwrap() = None;
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("name", &self.name).finish()
    }
}

impl Record for Node {
    const TYPE_NAME: &'static str = "Node";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let next = self.next.lock().unwrap().clone().unwrap_or_default();
        vec![("name", self.name.clone().into()), ("next", next)]
    }
}

/// Every fixture type, registered the way an application would.
pub fn registry() -> Registry {
    Registry::builder()
        .enumeration::<Color>()
        .enumeration::<Food>()
        .record::<User>()
        .record::<Account>()
        .decodable::<Celsius>()
        .decodable::<Tracked>()
        .build()
}
