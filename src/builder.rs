//! SQL statement assembly.
//!
//! Every function here builds a statement string plus its bind values; nothing
//! touches the connection. Bind values always travel separately from the SQL
//! text, so value positions are injection-safe. Identifier positions (table
//! names, field lists, index names, order tokens) are interpolated verbatim
//! and must come from trusted call sites — allow-list them there.

use crate::error::MysqlMiddlewareError;
use crate::query::{JoinQuery, Limit, OrderBy, QueryAndParams, SelectQuery, Where};
use crate::types::Record;

/// Serialize a record into an insert column list and placeholder list,
/// e.g. `("name,age", "?,?")`.
fn serialize_insert(data: &Record) -> (String, String) {
    let keys = data.keys().cloned().collect::<Vec<_>>().join(",");
    let placeholders = vec!["?"; data.len()].join(",");
    (keys, placeholders)
}

/// Serialize a record into an update SET list, e.g. `name=?,age=?`.
fn serialize_update(data: &Record) -> String {
    data.keys()
        .map(|k| format!("{k}=?"))
        .collect::<Vec<_>>()
        .join(",")
}

fn require_non_empty(data: &Record, verb: &str) -> Result<(), MysqlMiddlewareError> {
    if data.is_empty() {
        return Err(MysqlMiddlewareError::ParameterError(format!(
            "{verb} requires at least one column"
        )));
    }
    Ok(())
}

/// Append ` WHERE {clause}` when a non-empty filter is present and push its
/// binds. Validates the placeholder/bind count first, so an empty clause
/// carrying binds is rejected rather than silently widening the statement;
/// an empty clause with zero binds stays legal and absent.
fn append_where(
    sql: &mut String,
    params: &mut Vec<crate::types::RowValues>,
    filter: Option<&Where>,
) -> Result<(), MysqlMiddlewareError> {
    if let Some(filter) = filter {
        filter.validate()?;
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            params.extend_from_slice(filter.binds());
        }
    }
    Ok(())
}

fn append_order(sql: &mut String, order: Option<&OrderBy>) {
    if let Some(order) = order {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.field);
        if let Some(direction) = order.direction {
            sql.push(' ');
            sql.push_str(direction.as_sql());
        }
    }
}

fn append_limit(sql: &mut String, limit: Option<&Limit>) {
    if let Some(limit) = limit {
        match limit.offset {
            Some(offset) => sql.push_str(&format!(" LIMIT {offset}, {}", limit.count)),
            None => sql.push_str(&format!(" LIMIT {}", limit.count)),
        }
    }
}

/// Build a single-table SELECT.
///
/// Fields default to `*`; the table name is backtick-quoted (the join variant
/// is not, matching long-standing behavior callers depend on).
///
/// # Errors
///
/// Returns `ParameterError` if the filter's placeholder count does not match
/// its bind count.
pub fn build_select(
    table: &str,
    query: &SelectQuery,
) -> Result<QueryAndParams, MysqlMiddlewareError> {
    let fields = if query.fields.is_empty() {
        "*".to_string()
    } else {
        query.fields.join(",")
    };

    let mut sql = format!("SELECT {fields} FROM `{table}`");
    let mut params = Vec::new();

    append_where(&mut sql, &mut params, query.filter.as_ref())?;
    append_order(&mut sql, query.order.as_ref());
    append_limit(&mut sql, query.limit.as_ref());

    Ok(QueryAndParams::new(sql, params))
}

/// Build a two-table LEFT JOIN select.
///
/// Each select field is qualified with its table name; the join condition is
/// `tables.0.join_fields.0 = tables.1.join_fields.1`.
///
/// # Errors
///
/// Returns `ParameterError` if the filter's placeholder count does not match
/// its bind count.
pub fn build_left_join(query: &JoinQuery) -> Result<QueryAndParams, MysqlMiddlewareError> {
    let (left, right) = (&query.tables.0, &query.tables.1);

    let fields = query
        .fields
        .0
        .iter()
        .map(|f| format!("{left}.{f}"))
        .chain(query.fields.1.iter().map(|f| format!("{right}.{f}")))
        .collect::<Vec<_>>()
        .join(",");

    let mut sql = format!(
        "SELECT {fields} FROM {left} LEFT JOIN {right} ON ({left}.{} = {right}.{})",
        query.join_fields.0, query.join_fields.1
    );
    let mut params = Vec::new();

    append_where(&mut sql, &mut params, query.filter.as_ref())?;
    append_order(&mut sql, query.order.as_ref());
    append_limit(&mut sql, query.limit.as_ref());

    Ok(QueryAndParams::new(sql, params))
}

/// Build a single-record INSERT. Columns and binds follow the record's
/// iteration order.
///
/// # Errors
///
/// Returns `ParameterError` for an empty record.
pub fn build_insert(table: &str, data: &Record) -> Result<QueryAndParams, MysqlMiddlewareError> {
    require_non_empty(data, "insert")?;

    let (keys, placeholders) = serialize_insert(data);
    let sql = format!("INSERT INTO {table} ({keys}) VALUES({placeholders})");

    Ok(QueryAndParams::new(sql, data.values().cloned().collect()))
}

/// Build a multi-row INSERT with one VALUES group per record.
///
/// The column list comes from the first record; every later record must carry
/// the same columns in the same order.
///
/// # Errors
///
/// Returns `ParameterError` for an empty batch, an empty first record, or a
/// record whose columns differ from the first record's.
pub fn build_insert_batch(
    table: &str,
    rows: &[Record],
) -> Result<QueryAndParams, MysqlMiddlewareError> {
    let first = rows.first().ok_or_else(|| {
        MysqlMiddlewareError::ParameterError("batch insert requires at least one record".to_string())
    })?;
    require_non_empty(first, "batch insert")?;

    for (i, row) in rows.iter().enumerate().skip(1) {
        if !row.keys().eq(first.keys()) {
            return Err(MysqlMiddlewareError::ParameterError(format!(
                "batch insert record {i} has columns differing from the first record"
            )));
        }
    }

    let (keys, placeholders) = serialize_insert(first);
    let group = format!("({placeholders})");
    let groups = vec![group; rows.len()].join(",");
    let sql = format!("INSERT INTO {table} ({keys}) VALUES {groups}");

    let params = rows
        .iter()
        .flat_map(|row| row.values().cloned())
        .collect::<Vec<_>>();

    Ok(QueryAndParams::new(sql, params))
}

/// Build an UPDATE. Binds are the data values followed by the filter binds.
///
/// # Errors
///
/// Returns `ParameterError` for an empty record or a filter placeholder/bind
/// mismatch.
pub fn build_update(
    table: &str,
    data: &Record,
    filter: Option<&Where>,
) -> Result<QueryAndParams, MysqlMiddlewareError> {
    require_non_empty(data, "update")?;

    let mut sql = format!("UPDATE {table} SET {}", serialize_update(data));
    let mut params: Vec<_> = data.values().cloned().collect();

    append_where(&mut sql, &mut params, filter)?;

    Ok(QueryAndParams::new(sql, params))
}

/// Build an upsert: `INSERT ... ON DUPLICATE KEY UPDATE`.
///
/// `keys` names the conflict columns; they identify the row, so they appear in
/// the insert column list but are excluded from the SET clause. Binds are all
/// insert values followed by the non-key values.
///
/// # Errors
///
/// Returns `ParameterError` for an empty record or when every column is a key
/// (which would leave the SET clause empty).
pub fn build_upsert(
    table: &str,
    data: &Record,
    keys: &[&str],
) -> Result<QueryAndParams, MysqlMiddlewareError> {
    require_non_empty(data, "upsert")?;

    let update_data: Record = data
        .iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if update_data.is_empty() {
        return Err(MysqlMiddlewareError::ParameterError(
            "upsert requires at least one non-key column".to_string(),
        ));
    }

    let (insert_keys, placeholders) = serialize_insert(data);
    let sql = format!(
        "INSERT INTO {table} ({insert_keys}) VALUES({placeholders}) ON DUPLICATE KEY UPDATE {}",
        serialize_update(&update_data)
    );

    let mut params: Vec<_> = data.values().cloned().collect();
    params.extend(update_data.values().cloned());

    Ok(QueryAndParams::new(sql, params))
}

/// Build a DELETE with an optional WHERE.
///
/// # Errors
///
/// Returns `ParameterError` for a filter placeholder/bind mismatch.
pub fn build_delete(
    table: &str,
    filter: Option<&Where>,
) -> Result<QueryAndParams, MysqlMiddlewareError> {
    let mut sql = format!("DELETE FROM {table}");
    let mut params = Vec::new();

    append_where(&mut sql, &mut params, filter)?;

    Ok(QueryAndParams::new(sql, params))
}

/// Build an `ALTER TABLE ... ADD INDEX` statement. Identifiers are
/// interpolated verbatim; no bind parameters are involved.
#[must_use]
pub fn build_add_index(table: &str, index_name: &str, fields: &[&str]) -> String {
    format!(
        "ALTER TABLE {table} ADD INDEX {index_name} ({})",
        fields.join(",")
    )
}

/// Build an `ALTER TABLE ... DROP INDEX` statement.
#[must_use]
pub fn build_drop_index(table: &str, index_name: &str) -> String {
    format!("ALTER TABLE {table} DROP INDEX {index_name}")
}

/// Build a stored-procedure call with one placeholder per argument.
#[must_use]
pub fn build_call(procedure_name: &str, arg_count: usize) -> String {
    format!("CALL {procedure_name}({})", vec!["?"; arg_count].join(","))
}
