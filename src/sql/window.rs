//! Window-function helpers.
//!
//! Stateless string builders producing `FUNC(args) OVER (...)` fragments
//! that can be passed to [`Query::select_raw`](super::query::Query::select_raw).
//!
//! ```ignore
//! let over = Over::new().partition_by("user_id").order_by("ts DESC");
//! assert_eq!(
//!     row_number(&over),
//!     "ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY ts DESC)"
//! );
//! ```

// =============================================================================
// Window Specification
// =============================================================================

/// The `OVER (...)` part of a window function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct Over {
    pub partition_by: Option<String>,
    pub order_by: Option<String>,
}

impl Over {
    /// An empty window: renders as `OVER ()`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(mut self, expr: impl Into<String>) -> Self {
        self.partition_by = Some(expr.into());
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    /// Render the `OVER (...)` clause.
    pub fn to_sql(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(partition) = &self.partition_by {
            parts.push(format!("PARTITION BY {}", partition));
        }
        if let Some(order) = &self.order_by {
            parts.push(format!("ORDER BY {}", order));
        }
        format!("OVER ({})", parts.join(" "))
    }
}

fn window_call(func: &str, args: &[&str], over: &Over) -> String {
    format!("{}({}) {}", func, args.join(", "), over.to_sql())
}

// =============================================================================
// Ranking Functions
// =============================================================================

/// `ROW_NUMBER() OVER (...)`
pub fn row_number(over: &Over) -> String {
    window_call("ROW_NUMBER", &[], over)
}

/// `RANK() OVER (...)` - ranks with gaps for ties.
pub fn rank(over: &Over) -> String {
    window_call("RANK", &[], over)
}

/// `DENSE_RANK() OVER (...)` - ranks without gaps.
pub fn dense_rank(over: &Over) -> String {
    window_call("DENSE_RANK", &[], over)
}

// =============================================================================
// Offset Functions
// =============================================================================

/// Offset and fallback for [`lag`] / [`lead`].
///
/// An offset of 1 is omitted unless a default is set: the default is the
/// third positional argument, so the offset must be written before it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct Offset {
    pub rows: u32,
    /// SQL expression returned when the offset row does not exist.
    pub default: Option<String>,
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            rows: 1,
            default: None,
        }
    }
}

impl Offset {
    pub fn rows(rows: u32) -> Self {
        Self {
            rows,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn args<'a>(&'a self, column: &'a str, rows: &'a str) -> Vec<&'a str> {
        let mut args = vec![column];
        // The default is positional, so it forces the offset to be spelled out.
        if self.rows != 1 || self.default.is_some() {
            args.push(rows);
        }
        if let Some(default) = &self.default {
            args.push(default.as_str());
        }
        args
    }
}

/// `LAG(column[, offset[, default]]) OVER (...)`
pub fn lag(column: &str, offset: &Offset, over: &Over) -> String {
    let rows = offset.rows.to_string();
    window_call("LAG", &offset.args(column, &rows), over)
}

/// `LEAD(column[, offset[, default]]) OVER (...)`
pub fn lead(column: &str, offset: &Offset, over: &Over) -> String {
    let rows = offset.rows.to_string();
    window_call("LEAD", &offset.args(column, &rows), over)
}

// =============================================================================
// Value Functions
// =============================================================================

/// `FIRST_VALUE(column) OVER (...)`
pub fn first_value(column: &str, over: &Over) -> String {
    window_call("FIRST_VALUE", &[column], over)
}

/// `LAST_VALUE(column) OVER (...)`
pub fn last_value(column: &str, over: &Over) -> String {
    window_call("LAST_VALUE", &[column], over)
}
