//! Encoder: lowers a [`Value`] graph into JSON-safe `serde_json::Value`s.
//!
//! Dispatch precedence, first match wins:
//!
//! 1. Records with a custom hook ([`Encodable`](crate::Encodable))
//! 2. Mappings: `{}` when empty, a compact object when the policy allows,
//!    otherwise a `dict` envelope of `{key, value}` records
//! 3. Enumeration members, by symbolic name
//! 4. Tuples, 5. datetimes, 6. dates, 7. sets (sorted by encoded text)
//! 8. Lists, as plain arrays
//! 9. Non-finite floats, as `float` envelopes
//! 10. Primitives, unchanged
//! 11. Records claimed by an active adapter
//! 12. Any other record, by reflection over its fields
//!
//! # Example
//! ```
//! use strong_json::{encode, Value};
//! let json = encode(&Value::from((1, 2, 3))).unwrap();
//! assert_eq!(json, serde_json::json!({"__type__": "tuple", "__data__": [1, 2, 3]}));
//! ```

use crate::adapter::AdapterSet;
use crate::config::CodecConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{Result, StrongJsonError};
use crate::record::Object;
use crate::registry::Registry;
use crate::sentinel::{self, DICT_TAG, FLOAT_TAG, SET_TAG, TUPLE_TAG};
use crate::value::{MapKind, Mapping, ObjectRef, Set, Value};
use serde_json::{Map, Number, Value as Json};
use std::sync::Arc;

/// Encode with the default configuration, an empty registry and the
/// built-in adapters. Unregistered-type diagnostics go to `tracing`.
pub fn encode(value: &Value) -> Result<Json> {
    Encoder::default().encode(value)
}

/// A configured, immutable encoder. Cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
    registry: Arc<Registry>,
    adapters: AdapterSet,
}

impl Encoder {
    /// Validates `config`. The registry is only used to flag records that
    /// could not be decoded again.
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

    pub fn adapters(&self) -> &AdapterSet {
        &self.adapters
    }

    /// Encode, logging diagnostics through `tracing`.
    pub fn encode(&self, value: &Value) -> Result<Json> {
        self.encode_into_sink(value, &mut TracingSink)
    }

    /// Encode and return the diagnostics raised along the way.
    pub fn encode_with_diagnostics(&self, value: &Value) -> Result<(Json, Vec<Diagnostic>)> {
        let mut diagnostics = Vec::new();
        let json = self.encode_into_sink(value, &mut diagnostics)?;
        Ok((json, diagnostics))
    }

    pub fn encode_into_sink(&self, value: &Value, sink: &mut dyn DiagnosticSink) -> Result<Json> {
        let mut cx = EncodeContext::new(self, sink);
        cx.encode(value)
    }
}

/// State of one encode call, handed to [`Encodable`](crate::Encodable)
/// hooks and adapters so nested values are encoded consistently.
pub struct EncodeContext<'a> {
    encoder: &'a Encoder,
    sink: &'a mut dyn DiagnosticSink,
    depth: usize,
    /// Identities of the records currently being encoded, outermost first.
    active: Vec<usize>,
    /// Unregistered types already reported in this call.
    reported: Vec<String>,
}

impl<'a> EncodeContext<'a> {
    fn new(encoder: &'a Encoder, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            encoder,
            sink,
            depth: 0,
            active: Vec::new(),
            reported: Vec::new(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.encoder.config
    }

    pub fn type_key(&self) -> &str {
        &self.encoder.config.type_key
    }

    pub fn data_key(&self) -> &str {
        &self.encoder.config.data_key
    }

    /// Build `{type_key: tag, data_key: data}`.
    pub fn envelope(&self, tag: &str, data: Json) -> Json {
        let mut map = Map::new();
        map.insert(self.type_key().to_string(), Json::from(tag));
        map.insert(self.data_key().to_string(), data);
        Json::Object(map)
    }

    /// Encode a nested value.
    pub fn encode(&mut self, value: &Value) -> Result<Json> {
        if self.depth >= self.encoder.config.max_depth {
            return Err(StrongJsonError::DepthLimitExceeded {
                limit: self.encoder.config.max_depth,
            });
        }
        self.depth += 1;
        let out = self.encode_value(value);
        self.depth -= 1;
        out
    }

    /// The default record path: tag plus every field, each encoded.
    ///
    /// Available to [`Encodable`](crate::Encodable) implementations that only
    /// want to adjust the default output.
    pub fn reflect(&mut self, object: &dyn Object) -> Result<Json> {
        let type_name = object.type_name();
        if !self.encoder.registry.contains(type_name)
            && !self.reported.iter().any(|t| t == type_name)
        {
            self.reported.push(type_name.to_string());
            self.sink.report(Diagnostic::UnregisteredType {
                type_name: type_name.to_string(),
            });
        }

        let mut map = Map::new();
        map.insert(self.type_key().to_string(), Json::from(type_name));
        for (field, value) in object.reflect_fields() {
            if self.encoder.config.is_reserved(field) {
                return Err(StrongJsonError::ReservedField {
                    type_name: type_name.to_string(),
                    field: field.to_string(),
                });
            }
            map.insert(field.to_string(), self.encode(&value)?);
        }
        Ok(Json::Object(map))
    }

    fn encode_value(&mut self, value: &Value) -> Result<Json> {
        match value {
            Value::Object(object) => self.encode_object(object),
            Value::Map(mapping) => self.encode_mapping(mapping),
            Value::Enum(member) => {
                Ok(self.envelope(&member.type_name, Json::from(member.member.as_str())))
            }
            Value::Tuple(items) => {
                let data = self.encode_items(items)?;
                Ok(self.envelope(TUPLE_TAG, data))
            }
            Value::DateTime(dt) => Ok(sentinel::lower_datetime(dt, self.type_key())),
            Value::Date(date) => Ok(sentinel::lower_date(date, self.type_key())),
            Value::Set(set) => self.encode_set(set),
            Value::List(items) => self.encode_items(items),
            Value::Float(f) => match sentinel::non_finite_literal(*f) {
                Some(literal) => Ok(self.envelope(FLOAT_TAG, Json::from(literal))),
                None => Number::from_f64(*f).map(Json::Number).ok_or_else(|| {
                    StrongJsonError::malformed(FLOAT_TAG, format!("{f} is not representable"))
                }),
            },
            Value::Int(i) => Ok(Json::from(*i)),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::String(s) => Ok(Json::String(s.clone())),
            Value::Null => Ok(Json::Null),
        }
    }

    fn encode_items(&mut self, items: &[Value]) -> Result<Json> {
        let encoded = items
            .iter()
            .map(|item| self.encode(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Json::Array(encoded))
    }

    fn encode_mapping(&mut self, mapping: &Mapping) -> Result<Json> {
        if mapping.is_empty() {
            return Ok(Json::Object(Map::new()));
        }

        // A key equal to the type key would read back as an envelope.
        let compact = !self.encoder.config.treat_dict_as_ordered_dict
            && mapping.kind() == MapKind::Plain
            && mapping.has_only_string_keys()
            && mapping.get_str(self.type_key()).is_none();

        if compact {
            let mut map = Map::new();
            for (key, value) in mapping.iter() {
                if let Value::String(key) = key {
                    map.insert(key.clone(), self.encode(value)?);
                }
            }
            return Ok(Json::Object(map));
        }

        let mut records = Vec::with_capacity(mapping.len());
        for (key, value) in mapping.iter() {
            let mut record = Map::new();
            record.insert("key".to_string(), self.encode(key)?);
            record.insert("value".to_string(), self.encode(value)?);
            records.push(Json::Object(record));
        }
        Ok(self.envelope(DICT_TAG, Json::Array(records)))
    }

    /// Elements are sorted by their compact JSON text so output is stable.
    fn encode_set(&mut self, set: &Set) -> Result<Json> {
        let mut keyed = set
            .iter()
            .map(|item| {
                let json = self.encode(item)?;
                Ok((json.to_string(), json))
            })
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        let data = keyed.into_iter().map(|(_, json)| json).collect();
        Ok(self.envelope(SET_TAG, Json::Array(data)))
    }

    fn encode_object(&mut self, object: &ObjectRef) -> Result<Json> {
        let identity = object.identity();
        if self.active.contains(&identity) {
            return Err(StrongJsonError::CycleDetected {
                type_name: object.type_name().to_string(),
            });
        }
        self.active.push(identity);
        let out = self.encode_object_body(object.as_object());
        self.active.pop();
        out
    }

    fn encode_object_body(&mut self, object: &dyn Object) -> Result<Json> {
        if let Some(hook) = object.encodable() {
            return hook.to_envelope(self);
        }

        let encoder = self.encoder;
        for adapter in encoder.adapters.iter() {
            if let Some(payload) = adapter.lower(object, self) {
                let payload = payload?;
                return Ok(self.envelope(adapter.tag(), payload));
            }
        }

        self.reflect(object)
    }
}
