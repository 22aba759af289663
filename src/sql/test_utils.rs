//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that built SQL is syntactically correct
//! using sqlparser-rs for roundtrip validation.

use sqlparser::dialect::ClickHouseDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string parses with the ClickHouse dialect.
///
/// Template placeholders (`{{ ... }}`) are not SQL; only validate bodies
/// that do not contain them.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    Parser::parse_sql(&ClickHouseDialect {}, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::query::{Comparison, Query};
    use crate::sql::window::{row_number, Over};

    #[test]
    fn test_validate_invalid_sql() {
        assert!(validate_sql("SELEC * FORM users").is_err());
    }

    #[test]
    fn test_built_select_parses() {
        let sql = Query::new()
            .select(["region", "count() AS n"])
            .from("orders")
            .join("users", "users.id = orders.user_id")
            .filter(("status", Comparison::eq("paid")))
            .and(("total", Comparison::gte(10)))
            .group_by(["region"])
            .having("n > 1")
            .order_by(["n DESC"])
            .limit(10)
            .build()
            .unwrap();
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_built_union_and_cte_parses() {
        let a = Query::new();
        a.select(["id"]).from("a");
        let b = Query::new();
        b.select(["id"]).from("b");

        let sql = Query::new()
            .with("ids", &a)
            .select(["id"])
            .from("ids")
            .union_all(&b)
            .build()
            .unwrap();
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_window_function_parses() {
        let over = Over::new().partition_by("user_id").order_by("ts");
        let sql = Query::new()
            .select(["user_id"])
            .select_raw(format!("{} AS rn", row_number(&over)))
            .from("events")
            .build()
            .unwrap();
        validate_sql(&sql).unwrap();
    }
}
