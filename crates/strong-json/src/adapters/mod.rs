//! Built-in adapters, each compiled only with its cargo feature.

#[cfg(feature = "dataframe")]
pub mod dataframe;
#[cfg(feature = "ndarray")]
pub mod ndarray;
