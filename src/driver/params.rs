use chrono::{Datelike, Timelike};

use crate::types::RowValues;

/// Convert a single `RowValues` to a driver value.
#[must_use]
pub fn row_value_to_mysql_value(value: &RowValues) -> mysql::Value {
    match value {
        RowValues::Int(i) => mysql::Value::Int(*i),
        RowValues::Float(f) => mysql::Value::Double(*f),
        RowValues::Text(s) => mysql::Value::Bytes(s.clone().into_bytes()),
        RowValues::Bool(b) => mysql::Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => mysql::Value::Date(
            dt.year().unsigned_abs() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.and_utc().timestamp_subsec_micros(),
        ),
        RowValues::Null => mysql::Value::NULL,
        RowValues::JSON(jval) => mysql::Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => mysql::Value::Bytes(bytes.clone()),
    }
}

/// Convert middleware row values into driver bind parameters.
///
/// An empty slice maps to `Params::Empty` so statements without placeholders
/// execute cleanly.
#[must_use]
pub fn convert_params(params: &[RowValues]) -> mysql::Params {
    if params.is_empty() {
        mysql::Params::Empty
    } else {
        mysql::Params::Positional(params.iter().map(row_value_to_mysql_value).collect())
    }
}
