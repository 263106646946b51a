// Driver-facing layer - everything that touches the mysql crate directly
//
// Split into sub-modules by concern:
// - config: connection configuration and option building
// - params: parameter conversion between middleware and driver types
// - query: result extraction and building
// - executor: statement execution and the reconnect-once policy

pub mod config;
pub(crate) mod executor;
pub mod params;
pub mod query;

pub use config::MysqlConfig;
pub use params::convert_params;
pub use query::build_result_set;
