//! String-level facade pairing an encoder and a decoder over one
//! configuration and registry.

use crate::adapter::AdapterSet;
use crate::config::CodecConfig;
use crate::decoder::Decoder;
use crate::diagnostics::Diagnostic;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::registry::Registry;
use crate::value::Value;
use serde_json::Value as Json;
use std::sync::Arc;

/// A configured codec. Immutable once built; share it freely across threads.
///
/// ```
/// use strong_json::{Registry, StrongJson, Value};
///
/// let codec = StrongJson::default();
/// let text = codec.to_json(&Value::from((1, "a"))).unwrap();
/// assert_eq!(text, r#"{"__type__":"tuple","__data__":[1,"a"]}"#);
/// assert_eq!(codec.from_json(&text).unwrap(), Value::from((1, "a")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StrongJson {
    encoder: Encoder,
    decoder: Decoder,
}

impl StrongJson {
    /// Build a codec with the built-in adapters.
    pub fn new(config: CodecConfig, registry: Registry) -> Result<Self> {
        Self::with_adapters(config, registry, AdapterSet::builtin())
    }

    pub fn with_adapters(
        config: CodecConfig,
        registry: Registry,
        adapters: AdapterSet,
    ) -> Result<Self> {
        let registry = Arc::new(registry);
        let encoder = Encoder::new(config.clone(), Arc::clone(&registry), adapters.clone())?;
        let decoder = Decoder::new(config, registry, adapters)?;
        tracing::debug!(
            type_key = %encoder.config().type_key,
            data_key = %encoder.config().data_key,
            ordered = encoder.config().treat_dict_as_ordered_dict,
            "codec ready"
        );
        Ok(Self { encoder, decoder })
    }

    pub fn config(&self) -> &CodecConfig {
        self.encoder.config()
    }

    pub fn registry(&self) -> &Registry {
        self.decoder.registry()
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn to_json_value(&self, value: &Value) -> Result<Json> {
        self.encoder.encode(value)
    }

    pub fn to_json_value_with_diagnostics(&self, value: &Value) -> Result<(Json, Vec<Diagnostic>)> {
        self.encoder.encode_with_diagnostics(value)
    }

    pub fn from_json_value(&self, json: &Json) -> Result<Value> {
        self.decoder.decode(json)
    }

    /// Compact JSON text.
    pub fn to_json(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value(value)?)?)
    }

    /// JSON text indented by two spaces.
    pub fn to_json_pretty(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value(value)?)?)
    }

    pub fn from_json(&self, text: &str) -> Result<Value> {
        let json: Json = serde_json::from_str(text)?;
        self.from_json_value(&json)
    }
}
