//! # strong-json
//!
//! A type-preserving JSON codec. Plain JSON erases distinctions that matter
//! to a program: tuple vs. list, set vs. list, ordered vs. plain mapping,
//! non-string keys, enumeration identity, dates, and NaN/Infinity.
//! strong-json keeps them by wrapping such values in a self-describing
//! envelope:
//!
//! ```text
//! {"__type__": "tuple", "__data__": [1, 2, 3]}
//! {"__type__": "User", "first_name": "f", "last_name": "l"}
//! ```
//!
//! Decoding interprets the tags against a [`Registry`] of user types.
//!
//! ## Quick start
//!
//! ```rust
//! use strong_json::{
//!     Arguments, CodecConfig, Constructible, Parameter, Record, Registry, Result,
//!     StrongJson, Value,
//! };
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! impl Record for User {
//!     const TYPE_NAME: &'static str = "User";
//!     fn fields(&self) -> Vec<(&'static str, Value)> {
//!         vec![
//!             ("first_name", self.first_name.clone().into()),
//!             ("last_name", self.last_name.clone().into()),
//!         ]
//!     }
//! }
//!
//! impl Constructible for User {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::required("first_name"), Parameter::required("last_name")]
//!     }
//!     fn construct(args: &mut Arguments) -> Result<Self> {
//!         Ok(User {
//!             first_name: args.take("first_name")?,
//!             last_name: args.take("last_name")?,
//!         })
//!     }
//! }
//!
//! let registry = Registry::builder().record::<User>().build();
//! let codec = StrongJson::new(CodecConfig::default(), registry).unwrap();
//!
//! let user = Value::object(User { first_name: "f".into(), last_name: "l".into() });
//! let text = codec.to_json(&user).unwrap();
//! assert_eq!(text, r#"{"__type__":"User","first_name":"f","last_name":"l"}"#);
//! assert_eq!(codec.from_json(&text).unwrap(), user);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the object graph ([`Value`], [`Mapping`], [`Set`], ...)
//! - [`record`]: plain-data records and constructor descriptors
//! - [`hooks`]: [`Encodable`] / [`Decodable`] customization hooks
//! - [`enumeration`]: enumerations encoded by symbolic name
//! - [`registry`]: type tag → reconstruction strategy
//! - [`encoder`] / [`decoder`]: the two recursive passes
//! - [`sentinel`]: built-in tags (`dict`, `tuple`, `set`, `date`, `datetime`, `float`)
//! - [`adapter`]: extension point for external numeric/table types
//! - [`diagnostics`]: non-fatal advisories raised while encoding
//! - [`config`]: key names, mapping policy, depth bound
//! - [`error`]: error types

pub mod adapter;
pub mod adapters;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod diagnostics;
pub mod encoder;
pub mod enumeration;
pub mod error;
pub mod hooks;
pub mod record;
pub mod registry;
pub mod sentinel;
pub mod value;

pub use adapter::{Adapter, AdapterSet};
pub use codec::StrongJson;
pub use config::CodecConfig;
pub use decoder::{decode, DecodeContext, Decoder};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use encoder::{encode, EncodeContext, Encoder};
pub use enumeration::Enumeration;
pub use error::{Result, StrongJsonError};
pub use hooks::{Decodable, Encodable};
pub use record::{Arguments, Constructible, Object, Parameter, Record};
pub use registry::{Capability, Registry, RegistryBuilder, TypeEntry};
pub use value::{EnumValue, FromValue, MapKind, Mapping, ObjectRef, Set, Value};

#[cfg(feature = "dataframe")]
pub use adapters::dataframe::DataFrame;
#[cfg(feature = "ndarray")]
pub use adapters::ndarray::NdArray;
