//! Built-in sentinel tags and the fixed lowering/raising of special values.
//!
//! Wire shapes:
//!
//! - `{"__type__": "float", "__data__": "nan" | "inf" | "-inf"}`
//! - `{"__type__": "date", "year": 2019, "month": 8, "day": 23}`
//! - `{"__type__": "datetime", "year": .., "month": .., "day": .., "hour": ..,
//!   "minute": .., "second": .., "sub_second": <nanoseconds>}`
//!
//! Date fields are also accepted nested under the data key, and
//! `microsecond` is accepted in place of `sub_second`.

use crate::error::{Result, StrongJsonError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Value as Json};

pub const DICT_TAG: &str = "dict";
pub const TUPLE_TAG: &str = "tuple";
pub const SET_TAG: &str = "set";
pub const DATE_TAG: &str = "date";
pub const DATETIME_TAG: &str = "datetime";
pub const FLOAT_TAG: &str = "float";

/// Tags the decoder handles without consulting the registry.
pub const BUILTIN_TAGS: &[&str] = &[
    DICT_TAG,
    TUPLE_TAG,
    SET_TAG,
    DATE_TAG,
    DATETIME_TAG,
    FLOAT_TAG,
];

pub fn is_builtin_tag(tag: &str) -> bool {
    BUILTIN_TAGS.contains(&tag)
}

// ---------------------------------------------------------------------------
// Non-finite floats
// ---------------------------------------------------------------------------

/// The literal for a non-finite float, or `None` for finite values.
pub(crate) fn non_finite_literal(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("nan")
    } else if f == f64::INFINITY {
        Some("inf")
    } else if f == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

pub(crate) fn parse_non_finite(payload: &Json) -> Result<f64> {
    match payload.as_str() {
        Some("nan") => Ok(f64::NAN),
        Some("inf") => Ok(f64::INFINITY),
        Some("-inf") => Ok(f64::NEG_INFINITY),
        _ => Err(StrongJsonError::malformed(
            FLOAT_TAG,
            format!("expected \"nan\", \"inf\" or \"-inf\", found {payload}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub(crate) fn lower_date(date: &NaiveDate, type_key: &str) -> Json {
    let mut map = Map::new();
    map.insert(type_key.to_string(), Json::from(DATE_TAG));
    insert_date_fields(&mut map, date);
    Json::Object(map)
}

pub(crate) fn lower_datetime(dt: &NaiveDateTime, type_key: &str) -> Json {
    let mut map = Map::new();
    map.insert(type_key.to_string(), Json::from(DATETIME_TAG));
    insert_date_fields(&mut map, &dt.date());
    map.insert("hour".to_string(), Json::from(dt.hour()));
    map.insert("minute".to_string(), Json::from(dt.minute()));
    map.insert("second".to_string(), Json::from(dt.second()));
    map.insert("sub_second".to_string(), Json::from(dt.nanosecond()));
    Json::Object(map)
}

fn insert_date_fields(map: &mut Map<String, Json>, date: &NaiveDate) {
    map.insert("year".to_string(), Json::from(date.year()));
    map.insert("month".to_string(), Json::from(date.month()));
    map.insert("day".to_string(), Json::from(date.day()));
}

pub(crate) fn raise_date(envelope: &Map<String, Json>, data_key: &str) -> Result<NaiveDate> {
    let fields = date_fields(envelope, data_key);
    read_date(fields, DATE_TAG)
}

pub(crate) fn raise_datetime(
    envelope: &Map<String, Json>,
    data_key: &str,
) -> Result<NaiveDateTime> {
    let fields = date_fields(envelope, data_key);
    let date = read_date(fields, DATETIME_TAG)?;
    let hour = uint_field(fields, "hour", DATETIME_TAG)?;
    let minute = uint_field(fields, "minute", DATETIME_TAG)?;
    let second = uint_field(fields, "second", DATETIME_TAG)?;
    let nanos = if fields.contains_key("sub_second") {
        uint_field(fields, "sub_second", DATETIME_TAG)?
    } else if fields.contains_key("microsecond") {
        uint_field(fields, "microsecond", DATETIME_TAG)?
            .checked_mul(1_000)
            .ok_or_else(|| StrongJsonError::malformed(DATETIME_TAG, "microsecond out of range"))?
    } else {
        0
    };
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(|| {
        StrongJsonError::malformed(
            DATETIME_TAG,
            format!("invalid time {hour:02}:{minute:02}:{second:02}.{nanos:09}"),
        )
    })?;
    Ok(date.and_time(time))
}

/// Inline fields, or the object nested under the data key.
fn date_fields<'a>(envelope: &'a Map<String, Json>, data_key: &str) -> &'a Map<String, Json> {
    match envelope.get(data_key) {
        Some(Json::Object(nested)) => nested,
        _ => envelope,
    }
}

fn read_date(fields: &Map<String, Json>, tag: &str) -> Result<NaiveDate> {
    let year = fields
        .get("year")
        .and_then(Json::as_i64)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| StrongJsonError::malformed(tag, "missing or invalid \"year\""))?;
    let month = uint_field(fields, "month", tag)?;
    let day = uint_field(fields, "day", tag)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        StrongJsonError::malformed(tag, format!("invalid date {year:04}-{month:02}-{day:02}"))
    })
}

fn uint_field(fields: &Map<String, Json>, name: &str, tag: &str) -> Result<u32> {
    fields
        .get(name)
        .and_then(Json::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| StrongJsonError::malformed(tag, format!("missing or invalid {name:?}")))
}
