#[cfg(test)]
mod tests {
    use pipeql::sql::{escape, EscapeError, Value};
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(escape(&Value::Null).unwrap(), "NULL");
        assert_eq!(escape(&true.into()).unwrap(), "1");
        assert_eq!(escape(&false.into()).unwrap(), "0");
        assert_eq!(escape(&7i64.into()).unwrap(), "7");
        assert_eq!(escape(&0.25.into()).unwrap(), "0.25");
    }

    #[test]
    fn test_strings_are_quoted_and_doubled() {
        assert_eq!(escape(&"US".into()).unwrap(), "'US'");
        assert_eq!(escape(&"it's".into()).unwrap(), "'it''s'");
        assert_eq!(escape(&"".into()).unwrap(), "''");
    }

    #[test]
    fn test_expression_strings_pass_through() {
        assert_eq!(escape(&"toDate(ts)".into()).unwrap(), "toDate(ts)");
        assert_eq!(
            escape(&"{{ String(country) }}".into()).unwrap(),
            "{{ String(country) }}"
        );
    }

    #[test]
    fn test_json_values() {
        assert_eq!(escape(&json!(null).into()).unwrap(), "NULL");
        assert_eq!(escape(&json!(3).into()).unwrap(), "3");
        assert_eq!(escape(&json!("x").into()).unwrap(), "'x'");
    }

    #[test]
    fn test_compound_values_rejected() {
        assert_eq!(
            escape(&json!([1, 2]).into()),
            Err(EscapeError::UnsupportedValueType("array"))
        );
        assert_eq!(
            escape(&json!({"a": 1}).into()),
            Err(EscapeError::UnsupportedValueType("object"))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            escape(&f64::INFINITY.into()),
            Err(EscapeError::NonFiniteNumber(_))
        ));
        assert!(matches!(
            escape(&f64::NAN.into()),
            Err(EscapeError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn test_display_matches_escape() {
        assert_eq!(Value::from("a'b").to_string(), "'a''b'");
        assert_eq!(Value::from(Some(5i64)).to_string(), "5");
    }
}
