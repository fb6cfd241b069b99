//! Customization hooks that take precedence over the default record path.
//!
//! Precedence is fixed: a custom hook wins over built-in sentinel handling,
//! which wins over reflection. Both hooks receive the running context so
//! nested values go through the same configuration, depth bound and
//! diagnostics.

use crate::decoder::DecodeContext;
use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::record::Record;
use serde_json::{Map, Value as Json};

/// A value that produces its own envelope.
///
/// Implementors also override [`Record::as_encodable`] to return `Some(self)`.
pub trait Encodable {
    fn to_envelope(&self, cx: &mut EncodeContext<'_>) -> Result<Json>;
}

/// A type that rebuilds itself from the raw envelope mapping.
///
/// Registered with [`RegistryBuilder::decodable`](crate::RegistryBuilder::decodable);
/// the decoder hands over the whole mapping, type tag included.
pub trait Decodable: Record {
    fn from_envelope(envelope: &Map<String, Json>, cx: &mut DecodeContext<'_>) -> Result<Self>;
}
