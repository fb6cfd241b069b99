//! Type registry: type tag → reconstruction strategy.
//!
//! Each registered type is classified once, at registration, into exactly
//! one [`Capability`]. The decoder dispatches on that classification; nothing
//! is inspected per value.

use crate::decoder::DecodeContext;
use crate::enumeration::Enumeration;
use crate::error::Result;
use crate::hooks::Decodable;
use crate::record::{Arguments, Constructible, Parameter};
use crate::value::Value;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// Custom reconstruction from the raw envelope.
pub type DecodeHook = fn(&Map<String, Json>, &mut DecodeContext<'_>) -> Result<Value>;

/// Construction from decoded, default-filled arguments.
pub type ConstructHook = fn(&mut Arguments) -> Result<Value>;

/// How a registered type is rebuilt.
#[derive(Debug, Clone)]
pub enum Capability {
    /// The type decodes itself from the raw envelope.
    Decodable(DecodeHook),
    /// Members are looked up by symbolic name.
    Enumeration { members: Vec<&'static str> },
    /// Fields are matched against the declared parameters, then the
    /// constructor runs.
    PlainData {
        parameters: Vec<Parameter>,
        construct: ConstructHook,
    },
}

/// A single registry entry.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    name: &'static str,
    capability: Capability,
}

impl TypeEntry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }
}

/// Immutable mapping from type name to [`TypeEntry`].
///
/// ```
/// use strong_json::Registry;
/// let registry = Registry::builder().build();
/// assert!(registry.is_empty());
/// assert!(registry.get("User").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<&'static str, TypeEntry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Collects types in order; a later registration of the same name
/// replaces the earlier one.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<&'static str, TypeEntry>,
}

impl RegistryBuilder {
    /// Register a plain-data record rebuilt through its parameter list.
    pub fn record<T: Constructible>(self) -> Self {
        self.insert(
            T::TYPE_NAME,
            Capability::PlainData {
                parameters: T::parameters(),
                construct: construct_via::<T>,
            },
        )
    }

    /// Register a type that reconstructs itself from the raw envelope.
    pub fn decodable<T: Decodable>(self) -> Self {
        self.insert(T::TYPE_NAME, Capability::Decodable(decode_via::<T>))
    }

    pub fn enumeration<E: Enumeration>(self) -> Self {
        self.insert(
            E::TYPE_NAME,
            Capability::Enumeration {
                members: E::member_names(),
            },
        )
    }

    /// Register a hand-built capability under `name`.
    pub fn entry(self, name: &'static str, capability: Capability) -> Self {
        self.insert(name, capability)
    }

    pub fn build(self) -> Registry {
        tracing::debug!(types = self.entries.len(), "registry built");
        Registry {
            entries: self.entries,
        }
    }

    fn insert(mut self, name: &'static str, capability: Capability) -> Self {
        let entry = TypeEntry { name, capability };
        if self.entries.insert(name, entry).is_some() {
            tracing::debug!(type_name = name, "registry entry overwritten");
        }
        self
    }
}

fn construct_via<T: Constructible>(args: &mut Arguments) -> Result<Value> {
    T::construct(args).map(Value::object)
}

fn decode_via<T: Decodable>(
    envelope: &Map<String, Json>,
    cx: &mut DecodeContext<'_>,
) -> Result<Value> {
    T::from_envelope(envelope, cx).map(Value::object)
}
