use crate::builder::{
    build_add_index, build_call, build_delete, build_drop_index, build_insert, build_insert_batch,
    build_left_join, build_select, build_update, build_upsert,
};
use crate::driver::config::MysqlConfig;
use crate::driver::executor::{MysqlExecutor, QueryRunner, run_with_reconnect};
use crate::error::MysqlMiddlewareError;
use crate::query::{JoinQuery, Limit, SelectQuery, Where};
use crate::results::{DbRow, ResultSet};
use crate::types::{Record, RowValues};

/// A stateful client holding one connection to one MySQL server.
///
/// Each CRUD method assembles a statement, forwards it to the driver through
/// the shared execution primitive (which reconnects and retries exactly once
/// on a lost connection), and shapes the raw results for the caller.
///
/// The client owns its connection exclusively; it is not safe to share one
/// instance across threads without external synchronization. The connection
/// is released when the client is dropped, or earlier via [`close`].
///
/// ```no_run
/// use mysql_middleware::prelude::*;
///
/// # fn main() -> Result<(), MysqlMiddlewareError> {
/// let mut client = MysqlClient::connect(MysqlConfig::new("appdb", "appuser", "secret"))?;
///
/// let mut row = Record::new();
/// row.insert("name".to_string(), RowValues::Text("alice".into()));
/// row.insert("age".to_string(), RowValues::Int(1));
/// client.insert("users", &row)?;
///
/// let found = client.get_one(
///     "users",
///     &SelectQuery::new().filter(Where::new("name=?", vec!["alice".into()])),
/// )?;
/// # let _ = found;
/// # Ok(())
/// # }
/// ```
///
/// [`close`]: MysqlClient::close
pub struct MysqlClient {
    config: MysqlConfig,
    executor: Option<Box<dyn QueryRunner>>,
    last_query: Option<String>,
    last_insert_id: Option<u64>,
}

impl MysqlClient {
    /// Establish a connection using the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid configuration and propagates the
    /// driver's error when the connection cannot be established. There is no
    /// retry at this stage.
    pub fn connect(config: MysqlConfig) -> Result<Self, MysqlMiddlewareError> {
        let opts = config.to_opts()?;
        let executor = MysqlExecutor::connect(opts)?;
        Ok(Self {
            config,
            executor: Some(Box::new(executor)),
            last_query: None,
            last_insert_id: None,
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    /// Execute a raw SQL string with optional bind parameters.
    ///
    /// This is the execution primitive every other operation goes through: on
    /// a lost connection it reconnects and retries exactly once; any other
    /// error propagates after logging.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the client is closed, otherwise the
    /// driver's error.
    pub fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, MysqlMiddlewareError> {
        let executor = self
            .executor
            .as_mut()
            .ok_or_else(|| MysqlMiddlewareError::ConnectionError("not connected".to_string()))?;

        tracing::debug!(sql, "executing statement");
        self.last_query = Some(sql.to_string());

        let result_set = run_with_reconnect(executor.as_mut(), sql, params)?;
        self.last_insert_id = result_set.last_insert_id;
        Ok(result_set)
    }

    /// Fetch a single record, or `None` when no row matched.
    ///
    /// Applies `LIMIT 0, 1` when the caller set no limit.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an invalid filter, `ConnectionError` if
    /// closed, or the driver's error.
    pub fn get_one(
        &mut self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Option<Record>, MysqlMiddlewareError> {
        let mut query = query.clone();
        if query.limit.is_none() {
            query.limit = Some(Limit::one());
        }

        let qp = build_select(table, &query)?;
        let result_set = self.query(&qp.query, &qp.params)?;
        Ok(result_set.results.first().map(DbRow::to_record))
    }

    /// Fetch all matching records as name-keyed rows.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an invalid filter, `ConnectionError` if
    /// closed, or the driver's error.
    pub fn get_all(
        &mut self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Vec<Record>, MysqlMiddlewareError> {
        let qp = build_select(table, query)?;
        let result_set = self.query(&qp.query, &qp.params)?;
        Ok(result_set.results.iter().map(DbRow::to_record).collect())
    }

    /// Run a two-table LEFT JOIN.
    ///
    /// Returns ordered-field rows (column metadata plus positional values)
    /// rather than name-keyed records; use [`DbRow::to_record`] if the keyed
    /// shape is wanted.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an invalid filter, `ConnectionError` if
    /// closed, or the driver's error.
    pub fn left_join(&mut self, query: &JoinQuery) -> Result<Vec<DbRow>, MysqlMiddlewareError> {
        let qp = build_left_join(query)?;
        let result_set = self.query(&qp.query, &qp.params)?;
        Ok(result_set.results)
    }

    /// Insert a single record. Returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an empty record, `ConnectionError` if
    /// closed, or the driver's error.
    pub fn insert(&mut self, table: &str, data: &Record) -> Result<u64, MysqlMiddlewareError> {
        let qp = build_insert(table, data)?;
        Ok(self.query(&qp.query, &qp.params)?.rows_affected)
    }

    /// Insert multiple records in one statement. Returns the affected-row
    /// count for the whole batch.
    ///
    /// Every record must carry the same columns in the same order as the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an empty or heterogeneous batch,
    /// `ConnectionError` if closed, or the driver's error.
    pub fn insert_batch(
        &mut self,
        table: &str,
        rows: &[Record],
    ) -> Result<u64, MysqlMiddlewareError> {
        let qp = build_insert_batch(table, rows)?;
        Ok(self.query(&qp.query, &qp.params)?.rows_affected)
    }

    /// Update matching rows. Returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an empty record or invalid filter,
    /// `ConnectionError` if closed, or the driver's error.
    pub fn update(
        &mut self,
        table: &str,
        data: &Record,
        filter: Option<&Where>,
    ) -> Result<u64, MysqlMiddlewareError> {
        let qp = build_update(table, data, filter)?;
        Ok(self.query(&qp.query, &qp.params)?.rows_affected)
    }

    /// Insert-or-update keyed by `keys` (the conflict columns, excluded from
    /// the update clause). Returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an empty record or when every column is a
    /// key, `ConnectionError` if closed, or the driver's error.
    pub fn insert_or_update(
        &mut self,
        table: &str,
        data: &Record,
        keys: &[&str],
    ) -> Result<u64, MysqlMiddlewareError> {
        let qp = build_upsert(table, data, keys)?;
        Ok(self.query(&qp.query, &qp.params)?.rows_affected)
    }

    /// Delete matching rows. Returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` for an invalid filter, `ConnectionError` if
    /// closed, or the driver's error.
    pub fn delete(
        &mut self,
        table: &str,
        filter: Option<&Where>,
    ) -> Result<u64, MysqlMiddlewareError> {
        let qp = build_delete(table, filter)?;
        Ok(self.query(&qp.query, &qp.params)?.rows_affected)
    }

    /// Add an index. DDL passthrough: the table, index, and field names are
    /// interpolated verbatim and must come from trusted call sites.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if closed, or the driver's error.
    pub fn add_index(
        &mut self,
        table: &str,
        index_name: &str,
        fields: &[&str],
    ) -> Result<ResultSet, MysqlMiddlewareError> {
        let sql = build_add_index(table, index_name, fields);
        self.query(&sql, &[])
    }

    /// Drop an index. Same trust boundary as [`add_index`](MysqlClient::add_index).
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if closed, or the driver's error.
    pub fn drop_index(
        &mut self,
        table: &str,
        index_name: &str,
    ) -> Result<ResultSet, MysqlMiddlewareError> {
        let sql = build_drop_index(table, index_name);
        self.query(&sql, &[])
    }

    /// Call a stored procedure with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if closed, or the driver's error.
    pub fn call_proc(
        &mut self,
        procedure_name: &str,
        args: &[RowValues],
    ) -> Result<(), MysqlMiddlewareError> {
        let sql = build_call(procedure_name, args.len());
        self.query(&sql, args)?;
        Ok(())
    }

    /// Commit the current transaction (transactional engines require this
    /// when autocommit is off).
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if closed, or the driver's error.
    pub fn commit(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.executor
            .as_mut()
            .ok_or_else(|| MysqlMiddlewareError::ConnectionError("not connected".to_string()))?
            .commit()
    }

    /// The auto-increment id generated by the most recent statement, if any.
    #[must_use]
    pub fn last_id(&self) -> Option<u64> {
        self.last_insert_id
    }

    /// The most recently executed SQL text.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Whether the connection is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.executor.is_some()
    }

    /// Close the connection. Dropping the client does this implicitly; call
    /// it explicitly to surface the closed state to later operations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the client was already closed.
    pub fn close(&mut self) -> Result<(), MysqlMiddlewareError> {
        match self.executor.take() {
            Some(_) => Ok(()),
            None => Err(MysqlMiddlewareError::ConnectionError(
                "connection already closed".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::query::OrderBy;

    /// Hands back a canned result set for every statement.
    struct StubRunner {
        next: ResultSet,
    }

    impl StubRunner {
        fn empty() -> Self {
            Self {
                next: ResultSet::default(),
            }
        }

        fn with_rows(rows: Vec<Vec<RowValues>>, columns: &[&str]) -> Self {
            let mut next = ResultSet::with_capacity(rows.len());
            next.set_column_names(Arc::new(
                columns.iter().map(|c| (*c).to_string()).collect(),
            ));
            for row in rows {
                next.add_row_values(row);
            }
            Self { next }
        }
    }

    impl QueryRunner for StubRunner {
        fn run(
            &mut self,
            _sql: &str,
            _params: &[RowValues],
        ) -> Result<ResultSet, MysqlMiddlewareError> {
            Ok(self.next.clone())
        }

        fn reconnect(&mut self) -> Result<(), MysqlMiddlewareError> {
            Ok(())
        }

        fn commit(&mut self) -> Result<(), MysqlMiddlewareError> {
            Ok(())
        }
    }

    fn client_with(runner: StubRunner) -> MysqlClient {
        MysqlClient {
            config: MysqlConfig::new("testdb", "tester", "secret"),
            executor: Some(Box::new(runner)),
            last_query: None,
            last_insert_id: None,
        }
    }

    #[test]
    fn get_one_with_no_rows_returns_none() {
        let mut client = client_with(StubRunner::empty());
        let result = client.get_one("users", &SelectQuery::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn get_one_forces_single_row_limit_when_unset() {
        let mut client = client_with(StubRunner::empty());
        client.get_one("users", &SelectQuery::new()).unwrap();
        assert_eq!(
            client.last_query(),
            Some("SELECT * FROM `users` LIMIT 0, 1")
        );

        // An explicit limit wins.
        let query = SelectQuery::new().limit(Limit::count(5));
        client.get_one("users", &query).unwrap();
        assert_eq!(client.last_query(), Some("SELECT * FROM `users` LIMIT 5"));
    }

    #[test]
    fn get_one_shapes_the_first_row_as_a_record() {
        let runner = StubRunner::with_rows(
            vec![vec![RowValues::Int(1), RowValues::Text("alice".into())]],
            &["id", "name"],
        );
        let mut client = client_with(runner);

        let record = client.get_one("users", &SelectQuery::new()).unwrap().unwrap();
        assert_eq!(record.get("id"), Some(&RowValues::Int(1)));
        assert_eq!(record.get("name"), Some(&RowValues::Text("alice".into())));
    }

    #[test]
    fn get_all_with_no_rows_returns_empty_vec() {
        let mut client = client_with(StubRunner::empty());
        let rows = client.get_all("users", &SelectQuery::new()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn get_all_returns_name_keyed_records() {
        let runner = StubRunner::with_rows(
            vec![
                vec![RowValues::Int(1), RowValues::Text("alice".into())],
                vec![RowValues::Int(2), RowValues::Text("bob".into())],
            ],
            &["id", "name"],
        );
        let mut client = client_with(runner);

        let rows = client
            .get_all("users", &SelectQuery::new().order_by(OrderBy::asc("id")))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some(&RowValues::Text("bob".into())));
    }

    #[test]
    fn left_join_returns_ordered_field_rows() {
        let runner = StubRunner::with_rows(
            vec![vec![RowValues::Int(1), RowValues::Text("alice".into())]],
            &["x", "y"],
        );
        let mut client = client_with(runner);

        let join = JoinQuery::new(("a", "b"), (&["x"], &["y"]), ("id", "a_id"));
        let rows = client.left_join(&join).unwrap();
        assert_eq!(rows.len(), 1);
        // Positional values with column metadata, not a keyed record.
        assert_eq!(rows[0].get_by_index(0), Some(&RowValues::Int(1)));
        assert_eq!(rows[0].column_index("y"), Some(1));

        let mut client = client_with(StubRunner::empty());
        assert!(client.left_join(&join).unwrap().is_empty());
    }

    #[test]
    fn last_id_tracks_the_most_recent_statement() {
        let mut runner = StubRunner::empty();
        runner.next.rows_affected = 1;
        runner.next.last_insert_id = Some(42);
        let mut client = client_with(runner);

        let mut row = Record::new();
        row.insert("name".to_string(), RowValues::Text("alice".into()));
        assert_eq!(client.insert("users", &row).unwrap(), 1);
        assert_eq!(client.last_id(), Some(42));
        assert_eq!(
            client.last_query(),
            Some("INSERT INTO users (name) VALUES(?)")
        );
    }

    #[test]
    fn closed_client_rejects_operations() {
        let mut client = client_with(StubRunner::empty());
        assert!(client.is_open());

        client.close().unwrap();
        assert!(!client.is_open());

        assert!(matches!(
            client.close(),
            Err(MysqlMiddlewareError::ConnectionError(_))
        ));
        assert!(matches!(
            client.query("SELECT 1", &[]),
            Err(MysqlMiddlewareError::ConnectionError(_))
        ));
        assert!(matches!(
            client.commit(),
            Err(MysqlMiddlewareError::ConnectionError(_))
        ));
    }
}
