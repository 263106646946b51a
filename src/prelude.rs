//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::builder::{
    build_add_index, build_call, build_delete, build_drop_index, build_insert, build_insert_batch,
    build_left_join, build_select, build_update, build_upsert,
};
pub use crate::client::MysqlClient;
pub use crate::driver::config::MysqlConfig;
pub use crate::error::{ErrorKind, MysqlMiddlewareError, error_kind};
pub use crate::query::{Direction, JoinQuery, Limit, OrderBy, QueryAndParams, SelectQuery, Where};
pub use crate::results::{DbRow, ResultSet};
pub use crate::types::{Record, RowValues};
