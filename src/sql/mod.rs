//! SQL generation module.
//!
//! - [`query`] - SELECT query builder and renderer
//! - [`escape`] - literal escaping
//! - [`window`] - window-function helpers

pub mod escape;
pub mod query;
pub mod window;

#[cfg(test)]
pub mod test_utils;

pub use escape::{escape, EscapeError, Value};
pub use query::{
    query, Comparison, Condition, Connective, CteSource, JoinType, Query, QueryError,
    QueryResult, SetOperator,
};
pub use window::{
    dense_rank, first_value, lag, last_value, lead, rank, row_number, Offset, Over,
};
