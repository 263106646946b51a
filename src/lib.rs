//! A lightweight synchronous convenience layer over the `mysql` driver.
//!
//! The crate assembles SQL strings for common CRUD operations (select, insert,
//! batch insert, upsert, update, delete, left join, stored-procedure call) and
//! forwards parameterized execution to the driver through one owned
//! connection. The only resilience behavior is a single reconnect-and-retry
//! when the server drops the connection mid-statement.
//!
//! Bind-value positions are parameterized and injection-safe; identifier
//! positions (table names, field lists, index names, order tokens) are
//! interpolated verbatim and are the caller's trust boundary.

pub mod builder;
pub mod client;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod query;
pub mod results;
pub mod types;

pub use client::MysqlClient;
pub use driver::config::MysqlConfig;
pub use error::{ErrorKind, MysqlMiddlewareError, error_kind};
pub use query::{Direction, JoinQuery, Limit, OrderBy, QueryAndParams, SelectQuery, Where};
pub use results::{DbRow, ResultSet};
pub use types::{Record, RowValues};
