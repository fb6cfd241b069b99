//! Decoder: raises JSON-safe `serde_json::Value`s back into a [`Value`] graph.
//!
//! An object without the type key is a plain string-keyed mapping; a `dict`
//! envelope is an ordered one. An object with the type key is an envelope,
//! resolved in this order:
//!
//! 1. a registered type (custom hook, enumeration, or parameter-matched
//!    construction),
//! 2. a built-in sentinel (`dict`, `tuple`, `set`, `date`, `datetime`, `float`),
//! 3. an active adapter,
//! 4. otherwise [`MissingOptionalAdapter`](StrongJsonError::MissingOptionalAdapter)
//!    for reserved adapter tags and
//!    [`ClassMapLookupFail`](StrongJsonError::ClassMapLookupFail) for anything else.
//!
//! # Example
//! ```
//! use strong_json::{decode, Registry, Value};
//! let json = serde_json::json!({"__type__": "tuple", "__data__": [1, 2, 3]});
//! let value = decode(&json, &Registry::empty()).unwrap();
//! assert_eq!(value, Value::from((1, 2, 3)));
//! ```

use crate::adapter::{self, AdapterSet};
use crate::config::CodecConfig;
use crate::error::{Result, StrongJsonError};
use crate::record::{Arguments, Parameter};
use crate::registry::{Capability, ConstructHook, Registry, TypeEntry};
use crate::sentinel::{self, DATE_TAG, DATETIME_TAG, DICT_TAG, FLOAT_TAG, SET_TAG, TUPLE_TAG};
use crate::value::{EnumValue, Mapping, Set, Value};
use serde_json::{Map, Value as Json};
use std::sync::Arc;

/// Decode with the default configuration and the built-in adapters.
pub fn decode(json: &Json, registry: &Registry) -> Result<Value> {
    let config = CodecConfig::default();
    let adapters = AdapterSet::default();
    DecodeContext::new(&config, registry, &adapters).decode(json)
}

/// A configured, immutable decoder. Cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
    registry: Arc<Registry>,
    adapters: AdapterSet,
}

impl Decoder {
    pub fn new(config: CodecConfig, registry: Arc<Registry>, adapters: AdapterSet) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            adapters,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn decode(&self, json: &Json) -> Result<Value> {
        DecodeContext::new(&self.config, &self.registry, &self.adapters).decode(json)
    }
}

/// State of one decode call, handed to [`Decodable`](crate::Decodable)
/// hooks and adapters.
pub struct DecodeContext<'a> {
    config: &'a CodecConfig,
    registry: &'a Registry,
    adapters: &'a AdapterSet,
    depth: usize,
}

impl<'a> DecodeContext<'a> {
    fn new(config: &'a CodecConfig, registry: &'a Registry, adapters: &'a AdapterSet) -> Self {
        Self {
            config,
            registry,
            adapters,
            depth: 0,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        self.config
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn type_key(&self) -> &str {
        &self.config.type_key
    }

    pub fn data_key(&self) -> &str {
        &self.config.data_key
    }

    /// The envelope's data field, or a malformed-payload error naming `tag`.
    pub fn data<'j>(&self, envelope: &'j Map<String, Json>, tag: &str) -> Result<&'j Json> {
        envelope.get(self.data_key()).ok_or_else(|| {
            StrongJsonError::malformed(tag, format!("missing {:?} field", self.data_key()))
        })
    }

    /// Decode a nested value.
    pub fn decode(&mut self, json: &Json) -> Result<Value> {
        if self.depth >= self.config.max_depth {
            return Err(StrongJsonError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let out = self.decode_value(json);
        self.depth -= 1;
        out
    }

    fn decode_value(&mut self, json: &Json) -> Result<Value> {
        match json {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_u64() {
                    Err(StrongJsonError::malformed(
                        "number",
                        format!("integer {n} does not fit in 64 signed bits"),
                    ))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| StrongJsonError::malformed("number", n.to_string()))
                }
            }
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(items) => Ok(Value::List(self.decode_items(items)?)),
            Json::Object(map) => match map.get(self.type_key()) {
                None => self.decode_plain_mapping(map),
                Some(Json::String(tag)) => self.decode_envelope(tag, map),
                Some(other) => Err(StrongJsonError::ClassMapLookupFail {
                    tag: other.to_string(),
                }),
            },
        }
    }

    fn decode_items(&mut self, items: &[Json]) -> Result<Vec<Value>> {
        items.iter().map(|item| self.decode(item)).collect()
    }

    fn decode_plain_mapping(&mut self, map: &Map<String, Json>) -> Result<Value> {
        let mut mapping = Mapping::new();
        for (key, value) in map {
            mapping.insert(key.as_str(), self.decode(value)?);
        }
        Ok(Value::Map(mapping))
    }

    fn decode_envelope(&mut self, tag: &str, envelope: &Map<String, Json>) -> Result<Value> {
        let registry = self.registry;
        if let Some(entry) = registry.get(tag) {
            return self.decode_registered(entry, envelope);
        }

        match tag {
            DICT_TAG => self.decode_dict(envelope),
            TUPLE_TAG => {
                let items = self.sequence_data(envelope, TUPLE_TAG)?;
                Ok(Value::Tuple(self.decode_items(items)?))
            }
            SET_TAG => {
                let items = self.sequence_data(envelope, SET_TAG)?;
                let mut set = Set::new();
                for item in items {
                    set.insert(self.decode(item)?);
                }
                Ok(Value::Set(set))
            }
            DATE_TAG => Ok(Value::Date(sentinel::raise_date(
                envelope,
                self.data_key(),
            )?)),
            DATETIME_TAG => Ok(Value::DateTime(sentinel::raise_datetime(
                envelope,
                self.data_key(),
            )?)),
            FLOAT_TAG => {
                let payload = self.data(envelope, FLOAT_TAG)?;
                Ok(Value::Float(sentinel::parse_non_finite(payload)?))
            }
            _ => self.decode_adapter(tag, envelope),
        }
    }

    fn decode_registered(&mut self, entry: &TypeEntry, envelope: &Map<String, Json>) -> Result<Value> {
        match entry.capability() {
            Capability::Decodable(hook) => hook(envelope, self),
            Capability::Enumeration { members } => {
                let data = self.data(envelope, entry.name())?;
                let member = data.as_str().ok_or_else(|| {
                    StrongJsonError::malformed(entry.name(), "member name must be a string")
                })?;
                if !members.iter().any(|m| *m == member) {
                    return Err(StrongJsonError::UnknownEnumMember {
                        type_name: entry.name().to_string(),
                        member: member.to_string(),
                    });
                }
                Ok(Value::Enum(EnumValue::new(entry.name(), member)))
            }
            Capability::PlainData {
                parameters,
                construct,
            } => self.construct(entry.name(), parameters, *construct, envelope),
        }
    }

    /// Required parameters are all checked before anything is decoded;
    /// envelope fields that are not parameters are ignored.
    fn construct(
        &mut self,
        type_name: &'static str,
        parameters: &[Parameter],
        construct: ConstructHook,
        envelope: &Map<String, Json>,
    ) -> Result<Value> {
        if let Some(reserved) = parameters.iter().find(|p| self.config.is_reserved(p.name())) {
            return Err(StrongJsonError::ReservedField {
                type_name: type_name.to_string(),
                field: reserved.name().to_string(),
            });
        }

        let missing: Vec<String> = parameters
            .iter()
            .filter(|p| p.is_required() && !envelope.contains_key(p.name()))
            .map(|p| p.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StrongJsonError::MissingParameter {
                type_name: type_name.to_string(),
                missing,
            });
        }

        let mut values = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let value = match envelope.get(parameter.name()) {
                Some(raw) => self.decode(raw)?,
                None => parameter.default_value().cloned().unwrap_or_default(),
            };
            values.push((parameter.name(), value));
        }

        tracing::trace!(type_name, arguments = values.len(), "constructing record");
        construct(&mut Arguments::new(type_name, values))
    }

    fn decode_dict(&mut self, envelope: &Map<String, Json>) -> Result<Value> {
        let records = self.sequence_data(envelope, DICT_TAG)?;
        let mut mapping = Mapping::ordered();
        for record in records {
            let (key, value) = match record {
                Json::Object(fields) => match (fields.get("key"), fields.get("value")) {
                    (Some(key), Some(value)) => (key, value),
                    _ => {
                        return Err(StrongJsonError::malformed(
                            DICT_TAG,
                            "entries need \"key\" and \"value\" fields",
                        ))
                    }
                },
                other => {
                    return Err(StrongJsonError::malformed(
                        DICT_TAG,
                        format!("entry is not an object: {other}"),
                    ))
                }
            };
            let key = self.decode(key)?;
            let value = self.decode(value)?;
            mapping.insert(key, value);
        }
        Ok(Value::Map(mapping))
    }

    fn decode_adapter(&mut self, tag: &str, envelope: &Map<String, Json>) -> Result<Value> {
        let adapters = self.adapters;
        if let Some(adapter) = adapters.get(tag) {
            let payload = self.data(envelope, tag)?;
            return adapter.raise(payload, self);
        }
        if adapter::is_reserved_tag(tag) {
            return Err(StrongJsonError::MissingOptionalAdapter {
                tag: tag.to_string(),
            });
        }
        Err(StrongJsonError::ClassMapLookupFail {
            tag: tag.to_string(),
        })
    }

    fn sequence_data<'j>(&self, envelope: &'j Map<String, Json>, tag: &str) -> Result<&'j [Json]> {
        match self.data(envelope, tag)? {
            Json::Array(items) => Ok(items),
            other => Err(StrongJsonError::malformed(
                tag,
                format!("expected an array, found {other}"),
            )),
        }
    }
}
