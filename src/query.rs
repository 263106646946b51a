use crate::error::MysqlMiddlewareError;
use crate::types::RowValues;

/// A SQL string and its bound parameters bundled together.
///
/// Every statement-assembly function returns one of these so the query text
/// and bind values never lose alignment:
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let qp = QueryAndParams::new(
///     "INSERT INTO t (id, name) VALUES(?,?)",
///     vec![RowValues::Int(1), RowValues::Text("alice".into())],
/// );
/// # let _ = qp;
/// ```
#[derive(Debug, Clone)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters.
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters.
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }
}

/// A parameterized WHERE condition: clause text with `?` placeholders plus the
/// bind values, e.g. `Where::new("id=? AND name=?", vec![1.into(), "a".into()])`.
///
/// The clause text is appended to statements verbatim; only the bind values go
/// through the driver's placeholder substitution.
#[derive(Debug, Clone)]
pub struct Where {
    clause: String,
    binds: Vec<RowValues>,
}

impl Where {
    pub fn new(clause: impl Into<String>, binds: Vec<RowValues>) -> Self {
        Self {
            clause: clause.into(),
            binds,
        }
    }

    #[must_use]
    pub fn clause(&self) -> &str {
        &self.clause
    }

    #[must_use]
    pub fn binds(&self) -> &[RowValues] {
        &self.binds
    }

    /// An empty clause never contributes a WHERE segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Check that the clause's placeholder count matches the bind count.
    ///
    /// The count is a plain byte scan for `?`, so a literal `?` inside a quoted
    /// string in the clause will be miscounted; keep literals in the binds.
    ///
    /// # Errors
    ///
    /// Returns `MysqlMiddlewareError::ParameterError` on a mismatch.
    pub fn validate(&self) -> Result<(), MysqlMiddlewareError> {
        let placeholders = self.clause.bytes().filter(|b| *b == b'?').count();
        if placeholders != self.binds.len() {
            return Err(MysqlMiddlewareError::ParameterError(format!(
                "where clause has {placeholders} placeholders but {} bind values",
                self.binds.len()
            )));
        }
        Ok(())
    }
}

/// Sort direction for an ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// An ORDER BY field with an optional direction token.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Option<Direction>,
}

impl OrderBy {
    /// Order by a field with no explicit direction.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: None,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(Direction::Desc),
        }
    }
}

/// A LIMIT clause: `LIMIT n` or the offset form `LIMIT from, n`.
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub offset: Option<u64>,
    pub count: u64,
}

impl Limit {
    /// `LIMIT count`
    #[must_use]
    pub fn count(count: u64) -> Self {
        Self {
            offset: None,
            count,
        }
    }

    /// `LIMIT offset, count`
    #[must_use]
    pub fn range(offset: u64, count: u64) -> Self {
        Self {
            offset: Some(offset),
            count,
        }
    }

    /// The single-row window used by `get_one` when the caller set no limit.
    #[must_use]
    pub fn one() -> Self {
        Self::range(0, 1)
    }
}

/// Options for a single-table SELECT.
///
/// Omission governs clause presence: a clause is only emitted when its field
/// is set. Fields default to `*`.
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let q = SelectQuery::new()
///     .fields(&["id", "name"])
///     .filter(Where::new("age > ?", vec![RowValues::Int(21)]))
///     .order_by(OrderBy::desc("id"))
///     .limit(Limit::count(10));
/// # let _ = q;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub fields: Vec<String>,
    pub filter: Option<Where>,
    pub order: Option<OrderBy>,
    pub limit: Option<Limit>,
}

impl SelectQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the given fields instead of `*`.
    #[must_use]
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A two-table LEFT JOIN description.
///
/// Joins `tables.0` to `tables.1` on
/// `tables.0.join_fields.0 = tables.1.join_fields.1`; each field list is
/// qualified with its table name in the select list.
#[derive(Debug, Clone)]
pub struct JoinQuery {
    pub tables: (String, String),
    pub fields: (Vec<String>, Vec<String>),
    pub join_fields: (String, String),
    pub filter: Option<Where>,
    pub order: Option<OrderBy>,
    pub limit: Option<Limit>,
}

impl JoinQuery {
    pub fn new(
        tables: (&str, &str),
        fields: (&[&str], &[&str]),
        join_fields: (&str, &str),
    ) -> Self {
        Self {
            tables: (tables.0.to_string(), tables.1.to_string()),
            fields: (
                fields.0.iter().map(|f| (*f).to_string()).collect(),
                fields.1.iter().map(|f| (*f).to_string()).collect(),
            ),
            join_fields: (join_fields.0.to_string(), join_fields.1.to_string()),
            filter: None,
            order: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}
