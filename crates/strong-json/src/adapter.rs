//! Extension point for external numeric/table types.
//!
//! An adapter owns one tag. On encode it may claim a record (after custom
//! hooks, before reflection) and lower it to a payload; the encoder wraps
//! the payload in `{type_key: tag, data_key: payload}`. On decode it raises
//! the payload of an envelope carrying its tag.
//!
//! The tags in [`RESERVED_ADAPTER_TAGS`] belong to the optional built-in
//! adapters. When such a tag arrives and no adapter for it is active, the
//! decoder fails with
//! [`MissingOptionalAdapter`](crate::StrongJsonError::MissingOptionalAdapter)
//! rather than treating it as an unknown type.

use crate::decoder::DecodeContext;
use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::record::Object;
use crate::value::Value;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

pub const NDARRAY_TAG: &str = "ndarray";
pub const DATAFRAME_TAG: &str = "dataframe";

/// Tags owned by the optional built-in adapters.
pub const RESERVED_ADAPTER_TAGS: &[&str] = &[NDARRAY_TAG, DATAFRAME_TAG];

pub fn is_reserved_tag(tag: &str) -> bool {
    RESERVED_ADAPTER_TAGS.contains(&tag)
}

/// A (lower, raise) pair registered under a tag.
pub trait Adapter: fmt::Debug + Send + Sync {
    fn tag(&self) -> &'static str;

    /// `None` when `object` is not this adapter's type.
    fn lower(&self, object: &dyn Object, cx: &mut EncodeContext<'_>) -> Option<Result<Json>>;

    fn raise(&self, payload: &Json, cx: &mut DecodeContext<'_>) -> Result<Value>;
}

/// The adapters active for one codec.
#[derive(Debug, Clone)]
pub struct AdapterSet {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl AdapterSet {
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Every built-in adapter compiled into this build.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut set = Self::empty();
        #[cfg(feature = "ndarray")]
        {
            set = set.with(crate::adapters::ndarray::NdArrayAdapter);
        }
        #[cfg(feature = "dataframe")]
        {
            set = set.with(crate::adapters::dataframe::DataFrameAdapter);
        }
        set
    }

    /// Add an adapter, replacing any active adapter with the same tag.
    pub fn with(mut self, adapter: impl Adapter + 'static) -> Self {
        let tag = adapter.tag();
        self.adapters.retain(|a| a.tag() != tag);
        self.adapters.push(Arc::new(adapter));
        self
    }

    pub fn get(&self, tag: &str) -> Option<&dyn Adapter> {
        self.adapters
            .iter()
            .find(|a| a.tag() == tag)
            .map(|a| a.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Adapter> {
        self.adapters.iter().map(|a| a.as_ref())
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.tag()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterSet {
    fn default() -> Self {
        Self::builtin()
    }
}
