use std::sync::Arc;

use crate::types::{Record, RowValues};

/// A row from a query result.
///
/// Column names are shared across all rows of a result set; values are stored
/// positionally in column order. This is also the row shape returned by
/// [`MysqlClient::left_join`](crate::client::MysqlClient::left_join), where
/// callers get ordered fields rather than name-keyed records.
#[derive(Debug, Clone)]
pub struct DbRow {
    /// The column names for this row (shared across the result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, in column order
    pub values: Vec<RowValues>,
}

impl DbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Convert this row into a name-keyed [`Record`], preserving column order.
    #[must_use]
    pub fn to_record(&self) -> Record {
        self.column_names
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

/// A result set from a query execution.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query (empty for DML statements)
    pub results: Vec<DbRow>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: u64,
    /// The last auto-increment id generated by this statement, if any
    pub last_insert_id: Option<u64>,
    /// Column names shared by all rows
    column_names: Option<Arc<Vec<String>>>,
}

impl ResultSet {
    /// Create a new result set with a known row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            last_insert_id: None,
            column_names: None,
        }
    }

    /// Set the column names shared by all rows in this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = Some(column_names);
    }

    /// Get the shared column names, if any rows were returned.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row of values sharing this result set's column names.
    pub fn add_row_values(&mut self, values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(DbRow::new(column_names.clone(), values));
        }
    }
}
