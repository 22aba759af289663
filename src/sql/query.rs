//! Query builder - construct SQL queries with a fluent API.
//!
//! A [`Query`] is a *handle* onto shared builder state. Every mutating
//! method takes `&self` and returns the same handle, so chains and
//! separate statements mutate one query:
//!
//! ```ignore
//! let q = query(&schema);
//! q.select(["a", "b"]).from("t");
//! q.limit(10);
//! assert_eq!(q.build()?, "SELECT a, b\nFROM t\nLIMIT 10");
//! ```
//!
//! Cloning a `Query` clones the handle, not the state. Use
//! [`Query::deep_clone`] for an independent copy.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::escape::{escape, EscapeError, Value};
use crate::model::Schema;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while rendering a query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Cannot render value for column `{column}`: {source}")]
    Escape {
        column: String,
        #[source]
        source: EscapeError,
    },
}

pub type QueryResult<T> = Result<T, QueryError>;

// =============================================================================
// Conditions
// =============================================================================

/// Right-hand side of a `column op value` condition.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Comparison {
    pub op: String,
    pub value: Value,
}

impl Comparison {
    /// Any operator. Operators are not validated.
    pub fn new(op: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: op.into(),
            value: value.into(),
        }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new("=", value)
    }

    pub fn ne(value: impl Into<Value>) -> Self {
        Self::new("!=", value)
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new(">", value)
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new(">=", value)
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new("<", value)
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new("<=", value)
    }

    pub fn like(value: impl Into<Value>) -> Self {
        Self::new("LIKE", value)
    }
}

/// A WHERE / HAVING condition, kept structured until render time.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Pre-formed SQL, emitted verbatim.
    Raw(String),
    /// `column op escape(value)`
    Compare {
        column: String,
        op: String,
        value: Value,
    },
}

impl Condition {
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    pub fn compare(column: impl Into<String>, comparison: Comparison) -> Self {
        Condition::Compare {
            column: column.into(),
            op: comparison.op,
            value: comparison.value,
        }
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        match self {
            Condition::Raw(sql) => Ok(sql.clone()),
            Condition::Compare { column, op, value } => {
                let rendered = escape(value).map_err(|source| QueryError::Escape {
                    column: column.clone(),
                    source,
                })?;
                Ok(format!("{} {} {}", column, op, rendered))
            }
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::raw(sql)
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl From<(&str, Comparison)> for Condition {
    fn from((column, comparison): (&str, Comparison)) -> Self {
        Condition::compare(column, comparison)
    }
}

impl From<(String, Comparison)> for Condition {
    fn from((column, comparison): (String, Comparison)) -> Self {
        Condition::compare(column, comparison)
    }
}

/// Boolean keyword prefixed to a WHERE fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// One WHERE fragment with the connective it was added with.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereFragment {
    pub connective: Option<Connective>,
    pub condition: Condition,
}

impl WhereFragment {
    fn to_sql(&self) -> QueryResult<String> {
        let condition = self.condition.to_sql()?;
        Ok(match self.connective {
            Some(conn) => format!("{} {}", conn.as_str(), condition),
            None => condition,
        })
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on: String,
}

impl Join {
    pub fn to_sql(&self) -> String {
        format!("{} JOIN {} ON {}", self.join_type.as_str(), self.table, self.on)
    }
}

// =============================================================================
// Set Operations (UNION, INTERSECT, EXCEPT)
// =============================================================================

/// Operator joining a query to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    UnionAll,
    UnionDistinct,
    Intersect,
    Except,
}

impl SetOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperator::Union => "UNION",
            SetOperator::UnionAll => "UNION ALL",
            SetOperator::UnionDistinct => "UNION DISTINCT",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::Except => "EXCEPT",
        }
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FROM targets and CTEs
// =============================================================================

/// The single FROM target of a query.
#[derive(Debug, Clone)]
pub enum FromTarget {
    Table(String),
    /// `(<sql>) AS alias`. The query is a snapshot taken by [`Query::subquery`].
    Subquery { alias: String, query: Query },
}

impl FromTarget {
    fn to_sql(&self) -> QueryResult<String> {
        match self {
            FromTarget::Table(table) => Ok(table.clone()),
            FromTarget::Subquery { alias, query } => {
                Ok(format!("({}) AS {}", query.build()?, alias))
            }
        }
    }
}

/// Body of a common table expression.
#[derive(Debug, Clone)]
pub enum CteSource {
    /// A snapshot of another builder.
    Query(Query),
    Sql(String),
}

impl CteSource {
    fn to_sql(&self) -> QueryResult<String> {
        match self {
            CteSource::Query(query) => query.build(),
            CteSource::Sql(sql) => Ok(sql.clone()),
        }
    }
}

impl From<&Query> for CteSource {
    fn from(query: &Query) -> Self {
        CteSource::Query(query.deep_clone())
    }
}

impl From<&str> for CteSource {
    fn from(sql: &str) -> Self {
        CteSource::Sql(sql.to_string())
    }
}

impl From<String> for CteSource {
    fn from(sql: String) -> Self {
        CteSource::Sql(sql)
    }
}

/// A Common Table Expression (WITH clause entry).
#[derive(Debug, Clone)]
pub struct Cte {
    pub alias: String,
    pub source: CteSource,
}

// =============================================================================
// Query State
// =============================================================================

/// Accumulated clauses of one query.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub schema: Option<Schema>,
    pub select: Vec<String>,
    pub from: Option<FromTarget>,
    pub joins: Vec<Join>,
    pub where_clause: Vec<WhereFragment>,
    pub group_by: Vec<String>,
    pub having: Vec<Condition>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Other queries appended with a set operator, in insertion order.
    pub unions: Vec<(Query, SetOperator)>,
    pub ctes: Vec<Cte>,
    /// When set, `build()` returns this verbatim and ignores everything else.
    pub raw: Option<String>,
}

// =============================================================================
// Query Builder
// =============================================================================

/// Create a query over the given schema.
///
/// The schema is kept for inspection only: column names are never validated.
pub fn query(schema: &Schema) -> Query {
    let q = Query::new();
    q.state.borrow_mut().schema = Some(schema.clone());
    q
}

/// A SELECT query builder handle.
#[derive(Debug, Clone, Default)]
pub struct Query {
    state: Rc<RefCell<QueryState>>,
}

impl Query {
    /// Create a new empty query with no schema attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// An independent copy of this query's state.
    ///
    /// Queries recorded through `union*` stay shared with the original:
    /// they are references to other builders, not part of this one.
    pub fn deep_clone(&self) -> Self {
        Self {
            state: Rc::new(RefCell::new(self.state.borrow().clone())),
        }
    }

    /// Whether two handles point at the same state.
    pub fn same_as(&self, other: &Query) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// The schema this query was created with, if any.
    pub fn schema(&self) -> Option<Schema> {
        self.state.borrow().schema.clone()
    }

    /// Snapshot of the WHERE fragments added so far.
    pub fn where_fragments(&self) -> Vec<WhereFragment> {
        self.state.borrow().where_clause.clone()
    }

    /// Append columns to the SELECT list.
    pub fn select<I, S>(&self, columns: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .borrow_mut()
            .select
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one raw expression to the SELECT list.
    pub fn select_raw(&self, sql: impl Into<String>) -> &Self {
        self.state.borrow_mut().select.push(sql.into());
        self
    }

    /// Set the FROM table. Replaces any previous target.
    pub fn from(&self, table: impl Into<String>) -> &Self {
        self.state.borrow_mut().from = Some(FromTarget::Table(table.into()));
        self
    }

    /// Add a WHERE condition.
    ///
    /// Never inserts a connective, even when conditions already exist:
    /// `q.filter("a = 1").filter("b = 2")` renders `WHERE a = 1 b = 2`.
    /// Use [`and`](Self::and) / [`or`](Self::or) to combine conditions.
    pub fn filter(&self, condition: impl Into<Condition>) -> &Self {
        self.push_where(None, condition.into())
    }

    /// Add a condition prefixed with `AND` (no prefix if it is the first).
    pub fn and(&self, condition: impl Into<Condition>) -> &Self {
        self.push_where(Some(Connective::And), condition.into())
    }

    /// Add a condition prefixed with `OR` (no prefix if it is the first).
    pub fn or(&self, condition: impl Into<Condition>) -> &Self {
        self.push_where(Some(Connective::Or), condition.into())
    }

    fn push_where(&self, connective: Option<Connective>, condition: Condition) -> &Self {
        let mut state = self.state.borrow_mut();
        let connective = if state.where_clause.is_empty() {
            None
        } else {
            connective
        };
        state.where_clause.push(WhereFragment {
            connective,
            condition,
        });
        drop(state);
        self
    }

    /// Add an INNER JOIN.
    pub fn join(&self, table: impl Into<String>, on: impl Into<String>) -> &Self {
        self.join_with(table, on, JoinType::Inner)
    }

    /// Add a JOIN of the given type.
    pub fn join_with(
        &self,
        table: impl Into<String>,
        on: impl Into<String>,
        join_type: JoinType,
    ) -> &Self {
        self.state.borrow_mut().joins.push(Join {
            join_type,
            table: table.into(),
            on: on.into(),
        });
        self
    }

    /// Add a LEFT JOIN.
    pub fn left_join(&self, table: impl Into<String>, on: impl Into<String>) -> &Self {
        self.join_with(table, on, JoinType::Left)
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(&self, table: impl Into<String>, on: impl Into<String>) -> &Self {
        self.join_with(table, on, JoinType::Right)
    }

    /// Add a FULL JOIN.
    pub fn full_join(&self, table: impl Into<String>, on: impl Into<String>) -> &Self {
        self.join_with(table, on, JoinType::Full)
    }

    /// Append GROUP BY columns.
    pub fn group_by<I, S>(&self, columns: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .borrow_mut()
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a HAVING condition. Multiple conditions are ANDed.
    pub fn having(&self, condition: impl Into<Condition>) -> &Self {
        self.state.borrow_mut().having.push(condition.into());
        self
    }

    /// Append ORDER BY expressions (`"ts DESC"` etc).
    pub fn order_by<I, S>(&self, exprs: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .borrow_mut()
            .order_by
            .extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Set LIMIT.
    pub fn limit(&self, limit: u64) -> &Self {
        self.state.borrow_mut().limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(&self, offset: u64) -> &Self {
        self.state.borrow_mut().offset = Some(offset);
        self
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    /// Append another query with the given operator.
    ///
    /// `other` is recorded by reference: later changes to it show up in
    /// this query's output. A query that reaches itself through unions
    /// recurses without bound when built.
    pub fn union(&self, other: &Query, op: SetOperator) -> &Self {
        self.state.borrow_mut().unions.push((other.clone(), op));
        self
    }

    pub fn union_all(&self, other: &Query) -> &Self {
        self.union(other, SetOperator::UnionAll)
    }

    pub fn union_distinct(&self, other: &Query) -> &Self {
        self.union(other, SetOperator::UnionDistinct)
    }

    pub fn intersect(&self, other: &Query) -> &Self {
        self.union(other, SetOperator::Intersect)
    }

    pub fn except(&self, other: &Query) -> &Self {
        self.union(other, SetOperator::Except)
    }

    // =========================================================================
    // Subqueries and CTEs
    // =========================================================================

    /// Use `(<other>) AS alias` as the FROM target.
    ///
    /// `other` is snapshotted now; later changes to it are not reflected.
    pub fn subquery(&self, alias: impl Into<String>, other: &Query) -> &Self {
        let snapshot = other.deep_clone();
        self.state.borrow_mut().from = Some(FromTarget::Subquery {
            alias: alias.into(),
            query: snapshot,
        });
        self
    }

    /// `EXISTS (<other>)`
    pub fn exists_subquery(other: &Query) -> QueryResult<String> {
        Ok(format!("EXISTS ({})", other.build()?))
    }

    /// `NOT EXISTS (<other>)`
    pub fn not_exists_subquery(other: &Query) -> QueryResult<String> {
        Ok(format!("NOT EXISTS ({})", other.build()?))
    }

    /// `column IN (<other>)`
    pub fn in_subquery(column: &str, other: &Query) -> QueryResult<String> {
        Ok(format!("{} IN ({})", column, other.build()?))
    }

    /// `column NOT IN (<other>)`
    pub fn not_in_subquery(column: &str, other: &Query) -> QueryResult<String> {
        Ok(format!("{} NOT IN ({})", column, other.build()?))
    }

    /// Add a CTE rendered as `alias AS (<sql>)` ahead of the main query.
    pub fn with(&self, alias: impl Into<String>, source: impl Into<CteSource>) -> &Self {
        let source = source.into();
        self.state.borrow_mut().ctes.push(Cte {
            alias: alias.into(),
            source,
        });
        self
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(&self, condition: bool, f: F) -> &Self
    where
        F: FnOnce(&Self) -> &Self,
    {
        if condition {
            f(self);
        }
        self
    }

    /// Replace the whole query with raw SQL.
    pub fn raw(&self, sql: impl Into<String>) -> &Self {
        self.state.borrow_mut().raw = Some(sql.into());
        self
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the query to SQL.
    ///
    /// Clause order is fixed: WITH, SELECT, FROM, JOIN, WHERE, GROUP BY,
    /// HAVING, ORDER BY, LIMIT, OFFSET, one per line, followed by any
    /// set operations in the order they were added.
    pub fn build(&self) -> QueryResult<String> {
        let state = self.state.borrow();

        if let Some(raw) = &state.raw {
            return Ok(raw.clone());
        }

        let mut sql = String::new();

        // WITH
        if !state.ctes.is_empty() {
            let ctes = state
                .ctes
                .iter()
                .map(|cte| -> QueryResult<String> {
                    Ok(format!("{} AS ({})", cte.alias, cte.source.to_sql()?))
                })
                .collect::<QueryResult<Vec<_>>>()?;
            sql.push_str("WITH ");
            sql.push_str(&ctes.join(",\n"));
            sql.push('\n');
        }

        let mut lines = Vec::new();

        // SELECT
        if state.select.is_empty() {
            lines.push("SELECT *".to_string());
        } else {
            lines.push(format!("SELECT {}", state.select.join(", ")));
        }

        // FROM
        if let Some(from) = &state.from {
            lines.push(format!("FROM {}", from.to_sql()?));
        }

        // JOINs
        lines.extend(state.joins.iter().map(Join::to_sql));

        // WHERE
        if !state.where_clause.is_empty() {
            let fragments = state
                .where_clause
                .iter()
                .map(WhereFragment::to_sql)
                .collect::<QueryResult<Vec<_>>>()?;
            lines.push(format!("WHERE {}", fragments.join(" ")));
        }

        // GROUP BY
        if !state.group_by.is_empty() {
            lines.push(format!("GROUP BY {}", state.group_by.join(", ")));
        }

        // HAVING
        if !state.having.is_empty() {
            let conditions = state
                .having
                .iter()
                .map(Condition::to_sql)
                .collect::<QueryResult<Vec<_>>>()?;
            lines.push(format!("HAVING {}", conditions.join(" AND ")));
        }

        // ORDER BY
        if !state.order_by.is_empty() {
            lines.push(format!("ORDER BY {}", state.order_by.join(", ")));
        }

        // LIMIT / OFFSET
        if let Some(limit) = state.limit {
            lines.push(format!("LIMIT {}", limit));
        }
        if let Some(offset) = state.offset {
            lines.push(format!("OFFSET {}", offset));
        }

        sql.push_str(&lines.join("\n"));

        // Set operations
        for (other, op) in &state.unions {
            sql.push('\n');
            sql.push_str(op.as_str());
            sql.push('\n');
            sql.push_str(&other.build()?);
        }

        tracing::trace!(
            columns = state.select.len(),
            conditions = state.where_clause.len(),
            unions = state.unions.len(),
            ctes = state.ctes.len(),
            "built query"
        );

        Ok(sql)
    }
}

// =============================================================================
// Tests
// =============================================================================
