//! Column-labelled tables, written in the general mapping form.
//!
//! The payload is an ordered mapping `{column: [cells...]}` encoded through
//! the regular mapping rules, so column order survives and each cell keeps
//! its own type.

use crate::adapter::{Adapter, DATAFRAME_TAG};
use crate::decoder::DecodeContext;
use crate::encoder::EncodeContext;
use crate::error::{Result, StrongJsonError};
use crate::record::{Object, Record};
use crate::value::{Mapping, Value};
use serde_json::Value as Json;

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    /// Column names must be unique and every row as wide as the header.
    /// A frame without columns has no rows: the column-wise payload could
    /// not carry them.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if columns.is_empty() && !rows.is_empty() {
            return Err(construct_error(format!(
                "{} rows but no columns",
                rows.len()
            )));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(construct_error(format!("duplicate column {column:?}")));
            }
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(construct_error(format!(
                "row {i} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::ordered();
        for (i, column) in self.columns.iter().enumerate() {
            let cells = self.rows.iter().map(|row| row[i].clone()).collect();
            mapping.insert(column.as_str(), Value::List(cells));
        }
        mapping
    }

    fn from_mapping(mapping: Mapping) -> Result<Self> {
        let mut columns = Vec::with_capacity(mapping.len());
        let mut cells: Vec<Vec<Value>> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let column = match key {
                Value::String(column) => column,
                other => return Err(malformed(format!("column name is a {}", other.kind()))),
            };
            let Value::List(column_cells) = value else {
                return Err(malformed(format!("column {column:?} is not a list")));
            };
            columns.push(column);
            cells.push(column_cells);
        }

        let height = cells.first().map_or(0, Vec::len);
        if cells.iter().any(|c| c.len() != height) {
            return Err(malformed("columns have different lengths"));
        }

        let mut iters: Vec<_> = cells.into_iter().map(Vec::into_iter).collect();
        let rows: Vec<Vec<Value>> = (0..height)
            .map(|_| iters.iter_mut().filter_map(|cells| cells.next()).collect::<Vec<_>>())
            .collect();
        Self::new(columns, rows)
    }
}

impl Record for DataFrame {
    const TYPE_NAME: &'static str = DATAFRAME_TAG;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                "columns",
                Value::List(self.columns.iter().map(|c| Value::from(c.as_str())).collect()),
            ),
            (
                "rows",
                Value::List(self.rows.iter().cloned().map(Value::List).collect()),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataFrameAdapter;

impl Adapter for DataFrameAdapter {
    fn tag(&self) -> &'static str {
        DATAFRAME_TAG
    }

    fn lower(&self, object: &dyn Object, cx: &mut EncodeContext<'_>) -> Option<Result<Json>> {
        let frame = object.as_any().downcast_ref::<DataFrame>()?;
        Some(cx.encode(&Value::Map(frame.to_mapping())))
    }

    fn raise(&self, payload: &Json, cx: &mut DecodeContext<'_>) -> Result<Value> {
        match cx.decode(payload)? {
            Value::Map(mapping) => Ok(Value::object(DataFrame::from_mapping(mapping)?)),
            other => Err(malformed(format!("payload is a {}, not a map", other.kind()))),
        }
    }
}

fn malformed(reason: impl Into<String>) -> StrongJsonError {
    StrongJsonError::malformed(DATAFRAME_TAG, reason)
}

fn construct_error(reason: String) -> StrongJsonError {
    StrongJsonError::Construct {
        type_name: DATAFRAME_TAG.to_string(),
        reason,
    }
}
