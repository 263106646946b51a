use std::sync::Arc;

use crate::error::MysqlMiddlewareError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a driver row at the given column index.
///
/// # Errors
///
/// Returns `MysqlMiddlewareError::ExecutionError` if the column cannot be
/// retrieved.
pub fn mysql_extract_value(
    row: &mysql::Row,
    idx: usize,
) -> Result<RowValues, MysqlMiddlewareError> {
    let value: mysql::Value = row.get(idx).ok_or_else(|| {
        MysqlMiddlewareError::ExecutionError(format!("no value at column index {idx}"))
    })?;

    Ok(match value {
        mysql::Value::NULL => RowValues::Null,
        mysql::Value::Bytes(bytes) => {
            // Text columns come back as bytes; fall back to a blob when the
            // payload is not UTF-8.
            match String::from_utf8(bytes) {
                Ok(s) => RowValues::Text(s),
                Err(e) => RowValues::Blob(e.into_bytes()),
            }
        }
        mysql::Value::Int(i) => RowValues::Int(i),
        mysql::Value::UInt(u) => match i64::try_from(u) {
            Ok(i) => RowValues::Int(i),
            Err(_) => RowValues::Text(u.to_string()),
        },
        mysql::Value::Float(f) => RowValues::Float(f64::from(f)),
        mysql::Value::Double(d) => RowValues::Float(d),
        mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
            let date = chrono::NaiveDate::from_ymd_opt(
                i32::from(year),
                u32::from(month),
                u32::from(day),
            );
            let dt = date.and_then(|d| {
                d.and_hms_micro_opt(
                    u32::from(hour),
                    u32::from(minute),
                    u32::from(second),
                    micros,
                )
            });
            match dt {
                Some(dt) => RowValues::Timestamp(dt),
                None => RowValues::Null,
            }
        }
        mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = u32::from(days) * 24 + u32::from(hours);
            RowValues::Text(format!(
                "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    })
}

/// Build a [`ResultSet`] from driver rows plus the execution counters.
///
/// Column names are taken from the first row's metadata and shared across all
/// rows. An empty row set produces an empty result set carrying only the
/// counters.
///
/// # Errors
///
/// Returns errors from row value extraction.
pub fn build_result_set(
    rows: &[mysql::Row],
    rows_affected: u64,
    last_insert_id: Option<u64>,
) -> Result<ResultSet, MysqlMiddlewareError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.rows_affected = rows_affected;
    result_set.last_insert_id = last_insert_id;

    if let Some(row) = rows.first() {
        let column_names: Vec<String> = row
            .columns_ref()
            .iter()
            .map(|col| col.name_str().to_string())
            .collect();
        result_set.set_column_names(Arc::new(column_names));
    }

    for row in rows {
        let col_count = row.columns_ref().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(mysql_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
