use mysql::{Opts, OptsBuilder, SslOpts};
use serde::{Deserialize, Serialize};

use crate::error::MysqlMiddlewareError;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8".to_string()
}

/// Connection configuration for [`MysqlClient`](crate::client::MysqlClient).
///
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let cfg = MysqlConfig::new("appdb", "appuser", "secret")
///     .host("db.internal")
///     .autocommit(true);
/// # let _ = cfg;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MysqlConfig {
    /// Database (schema) name
    pub database: String,
    /// Server hostname or IP, default `localhost`
    #[serde(default = "default_host")]
    pub host: String,
    /// Server TCP port, default 3306
    #[serde(default = "default_port")]
    pub port: u16,
    /// User name
    pub user: String,
    /// Password
    pub password: String,
    /// Connection character set, default `utf8`
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Stored for callers that manage their own keepalive; the middleware
    /// itself does not act on it.
    #[serde(default)]
    pub keep_alive: bool,
    /// Enable autocommit on the session, default off
    #[serde(default)]
    pub autocommit: bool,
    /// Connect over TLS using the driver's default TLS settings
    #[serde(default)]
    pub ssl: bool,
}

impl MysqlConfig {
    /// Create a config with the required fields and defaults for the rest.
    pub fn new(
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            host: default_host(),
            port: default_port(),
            user: user.into(),
            password: password.into(),
            charset: default_charset(),
            keep_alive: false,
            autocommit: false,
            ssl: false,
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    #[must_use]
    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    #[must_use]
    pub fn ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns `MysqlMiddlewareError::ConfigError` if `database` or `user` is
    /// empty.
    pub fn validate(&self) -> Result<(), MysqlMiddlewareError> {
        if self.database.is_empty() {
            return Err(MysqlMiddlewareError::ConfigError(
                "database is required".to_string(),
            ));
        }
        if self.user.is_empty() {
            return Err(MysqlMiddlewareError::ConfigError(
                "user is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Build driver connection options from this config.
    ///
    /// Charset and autocommit are applied as session init statements; the TLS
    /// flag selects the driver's TLS connection path.
    ///
    /// # Errors
    ///
    /// Returns `MysqlMiddlewareError::ConfigError` if validation fails.
    pub fn to_opts(&self) -> Result<Opts, MysqlMiddlewareError> {
        self.validate()?;

        let init = vec![
            format!("SET NAMES {}", self.charset),
            format!("SET autocommit={}", u8::from(self.autocommit)),
        ];

        let mut builder = OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .init(init);

        if self.ssl {
            builder = builder.ssl_opts(SslOpts::default());
        }

        Ok(Opts::from(builder))
    }
}
