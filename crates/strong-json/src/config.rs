//! Per-codec configuration: envelope key names, mapping policy, depth bound.

use crate::error::{Result, StrongJsonError};
use serde::{Deserialize, Serialize};

/// Default envelope type-tag key.
pub const DEFAULT_TYPE_KEY: &str = "__type__";
/// Default envelope data key.
pub const DEFAULT_DATA_KEY: &str = "__data__";
/// Default recursion bound shared by encoder and decoder.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration fixed for the lifetime of an encoder/decoder pair.
///
/// Every field has a default, so a partial JSON config file is accepted:
///
/// ```
/// use strong_json::CodecConfig;
/// let config: CodecConfig = serde_json::from_str(r#"{"type_key": "$t"}"#).unwrap();
/// assert_eq!(config.type_key, "$t");
/// assert_eq!(config.data_key, "__data__");
/// assert!(config.treat_dict_as_ordered_dict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub type_key: String,
    pub data_key: String,
    /// When set, every non-empty mapping is written as a `dict` envelope so
    /// insertion order survives. When clear, plain string-keyed mappings are
    /// written as compact JSON objects.
    pub treat_dict_as_ordered_dict: bool,
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            type_key: DEFAULT_TYPE_KEY.to_string(),
            data_key: DEFAULT_DATA_KEY.to_string(),
            treat_dict_as_ordered_dict: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Default keys with compact string-keyed mappings.
    pub fn compact() -> Self {
        Self {
            treat_dict_as_ordered_dict: false,
            ..Self::default()
        }
    }

    pub fn with_type_key(mut self, key: impl Into<String>) -> Self {
        self.type_key = key.into();
        self
    }

    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }

    pub fn with_ordered_dicts(mut self, ordered: bool) -> Self {
        self.treat_dict_as_ordered_dict = ordered;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Reject configurations that make envelopes ambiguous.
    pub fn validate(&self) -> Result<()> {
        if self.type_key.is_empty() {
            return Err(StrongJsonError::InvalidConfig(
                "type_key must not be empty".to_string(),
            ));
        }
        if self.data_key.is_empty() {
            return Err(StrongJsonError::InvalidConfig(
                "data_key must not be empty".to_string(),
            ));
        }
        if self.type_key == self.data_key {
            return Err(StrongJsonError::InvalidConfig(format!(
                "type_key and data_key are both {:?}",
                self.type_key
            )));
        }
        if self.max_depth == 0 {
            return Err(StrongJsonError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// True if `name` is one of the two envelope keys.
    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.type_key || name == self.data_key
    }
}
