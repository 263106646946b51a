use mysql::prelude::Queryable;

use crate::driver::params::convert_params;
use crate::driver::query::build_result_set;
use crate::error::{ErrorKind, MysqlMiddlewareError, error_kind};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Low-level execution seam.
///
/// The retry policy is written against this trait so it can be exercised
/// without a live server.
pub(crate) trait QueryRunner {
    fn run(&mut self, sql: &str, params: &[RowValues])
    -> Result<ResultSet, MysqlMiddlewareError>;

    fn reconnect(&mut self) -> Result<(), MysqlMiddlewareError>;

    fn commit(&mut self) -> Result<(), MysqlMiddlewareError>;
}

/// Owns the one live connection and the options needed to re-establish it.
pub(crate) struct MysqlExecutor {
    conn: mysql::Conn,
    opts: mysql::Opts,
}

impl MysqlExecutor {
    /// Open a connection with the given options.
    ///
    /// # Errors
    ///
    /// Propagates the driver's connection error.
    pub(crate) fn connect(opts: mysql::Opts) -> Result<Self, MysqlMiddlewareError> {
        let conn = mysql::Conn::new(opts.clone()).map_err(|e| {
            tracing::error!(error = %e, "mysql connection failed");
            MysqlMiddlewareError::from(e)
        })?;
        Ok(Self { conn, opts })
    }
}

impl QueryRunner for MysqlExecutor {
    fn run(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, MysqlMiddlewareError> {
        let converted = convert_params(params);
        let rows: Vec<mysql::Row> = self.conn.exec(sql, converted)?;
        let rows_affected = self.conn.affected_rows();
        let last_insert_id = match self.conn.last_insert_id() {
            0 => None,
            id => Some(id),
        };
        build_result_set(&rows, rows_affected, last_insert_id)
    }

    fn reconnect(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.conn = mysql::Conn::new(self.opts.clone())?;
        Ok(())
    }

    /// Passthrough transaction commit.
    fn commit(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.conn.query_drop("COMMIT")?;
        Ok(())
    }
}

/// Execute a statement, reconnecting and retrying exactly once if the
/// connection was lost. Any other error propagates immediately; a second
/// connection loss after the retry propagates too.
pub(crate) fn run_with_reconnect(
    runner: &mut dyn QueryRunner,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, MysqlMiddlewareError> {
    match runner.run(sql, params) {
        Err(err) if error_kind(&err) == ErrorKind::ConnectionLost => {
            tracing::warn!(error = %err, "connection lost, reconnecting once");
            runner.reconnect()?;
            runner.run(sql, params)
        }
        Err(err) => {
            tracing::error!(error = %err, "query failed");
            Err(err)
        }
        ok => ok,
    }
}
