//! Dense n-dimensional float arrays, written as nested sequences.
//!
//! Payload: `{"shape": [2, 3], "values": [[1, 2, 3], [4, 5, 6]]}`. The shape
//! is explicit so arrays with a zero-length axis keep their other axes.
//! Non-finite cells use the `float` sentinel envelope.

use crate::adapter::{Adapter, NDARRAY_TAG};
use crate::decoder::DecodeContext;
use crate::encoder::EncodeContext;
use crate::error::{Result, StrongJsonError};
use crate::record::{Object, Record};
use crate::value::Value;
use serde_json::{Map, Number, Value as Json};

/// Row-major array of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NdArray {
    /// `data.len()` must equal the product of `shape` (1 for a scalar).
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let Some(expected) = element_count(&shape) else {
            return Err(StrongJsonError::Construct {
                type_name: NDARRAY_TAG.to_string(),
                reason: format!("shape {shape:?} overflows the address space"),
            });
        };
        if expected != data.len() {
            return Err(StrongJsonError::Construct {
                type_name: NDARRAY_TAG.to_string(),
                reason: format!(
                    "shape {shape:?} holds {expected} values, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        self.data.get(offset).copied()
    }
}

impl Record for NdArray {
    const TYPE_NAME: &'static str = NDARRAY_TAG;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                "shape",
                Value::List(self.shape.iter().map(|&d| Value::Int(d as i64)).collect()),
            ),
            (
                "data",
                Value::List(self.data.iter().map(|&f| Value::Float(f)).collect()),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NdArrayAdapter;

impl Adapter for NdArrayAdapter {
    fn tag(&self) -> &'static str {
        NDARRAY_TAG
    }

    fn lower(&self, object: &dyn Object, cx: &mut EncodeContext<'_>) -> Option<Result<Json>> {
        let array = object.as_any().downcast_ref::<NdArray>()?;
        Some(lower_array(array, cx))
    }

    fn raise(&self, payload: &Json, cx: &mut DecodeContext<'_>) -> Result<Value> {
        let fields = payload
            .as_object()
            .ok_or_else(|| malformed("payload must be an object"))?;
        let shape = fields
            .get("shape")
            .and_then(Json::as_array)
            .ok_or_else(|| malformed("missing \"shape\" array"))?
            .iter()
            .map(|d| {
                d.as_u64()
                    .and_then(|d| usize::try_from(d).ok())
                    .ok_or_else(|| malformed(format!("bad dimension {d}")))
            })
            .collect::<Result<Vec<_>>>()?;
        check_rank(shape.len(), cx.config().max_depth)?;
        if element_count(&shape).is_none() {
            return Err(malformed(format!("shape {shape:?} is too large")));
        }
        let values = fields
            .get("values")
            .ok_or_else(|| malformed("missing \"values\""))?;

        // Lengths are checked against `values` while flattening.
        let mut data = Vec::new();
        flatten(values, &shape, cx, &mut data)?;
        Ok(Value::object(NdArray::new(shape, data)?))
    }
}

/// Number of cells, or `None` when the shape cannot be addressed.
///
/// Zero-length axes count as 1 here so every partial product of the
/// shape is known to fit as well.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim.max(1)))?;
    Some(shape.iter().product())
}

/// Each axis is one level of nesting.
fn check_rank(rank: usize, limit: usize) -> Result<()> {
    if rank >= limit {
        return Err(StrongJsonError::DepthLimitExceeded { limit });
    }
    Ok(())
}

fn lower_array(array: &NdArray, cx: &mut EncodeContext<'_>) -> Result<Json> {
    check_rank(array.shape.len(), cx.config().max_depth)?;
    let values = nest(&array.shape, &array.data, cx)?;
    let mut payload = Map::new();
    payload.insert(
        "shape".to_string(),
        Json::Array(array.shape.iter().map(|&d| Json::from(d)).collect()),
    );
    payload.insert("values".to_string(), values);
    Ok(Json::Object(payload))
}

fn nest(shape: &[usize], data: &[f64], cx: &mut EncodeContext<'_>) -> Result<Json> {
    let Some((&len, rest)) = shape.split_first() else {
        return match data.first() {
            Some(&f) => lower_cell(f, cx),
            None => Err(malformed("scalar array without a value")),
        };
    };
    let chunk: usize = rest.iter().product();
    let rows = (0..len)
        .map(|i| nest(rest, &data[i * chunk..(i + 1) * chunk], cx))
        .collect::<Result<Vec<_>>>()?;
    Ok(Json::Array(rows))
}

fn lower_cell(f: f64, cx: &mut EncodeContext<'_>) -> Result<Json> {
    match Number::from_f64(f) {
        Some(n) => Ok(Json::Number(n)),
        None => cx.encode(&Value::Float(f)),
    }
}

fn flatten(
    values: &Json,
    shape: &[usize],
    cx: &mut DecodeContext<'_>,
    out: &mut Vec<f64>,
) -> Result<()> {
    let Some((&len, rest)) = shape.split_first() else {
        out.push(raise_cell(values, cx)?);
        return Ok(());
    };
    let items = values
        .as_array()
        .filter(|items| items.len() == len)
        .ok_or_else(|| malformed(format!("expected an array of length {len}")))?;
    for item in items {
        flatten(item, rest, cx, out)?;
    }
    Ok(())
}

fn raise_cell(cell: &Json, cx: &mut DecodeContext<'_>) -> Result<f64> {
    if let Some(f) = cell.as_f64() {
        return Ok(f);
    }
    match cx.decode(cell)? {
        Value::Float(f) => Ok(f),
        other => Err(malformed(format!("cell is a {}, not a number", other.kind()))),
    }
}

fn malformed(reason: impl Into<String>) -> StrongJsonError {
    StrongJsonError::malformed(NDARRAY_TAG, reason)
}
