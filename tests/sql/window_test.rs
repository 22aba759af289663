#[cfg(test)]
mod tests {
    use pipeql::sql::{
        dense_rank, first_value, lag, last_value, lead, rank, row_number, Offset, Over, Query,
    };

    fn by_user() -> Over {
        Over::new().partition_by("user_id").order_by("ts")
    }

    #[test]
    fn test_ranking_functions() {
        assert_eq!(
            row_number(&by_user()),
            "ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY ts)"
        );
        assert_eq!(rank(&Over::new().order_by("score DESC")), "RANK() OVER (ORDER BY score DESC)");
        assert_eq!(
            dense_rank(&Over::new().partition_by("team")),
            "DENSE_RANK() OVER (PARTITION BY team)"
        );
    }

    #[test]
    fn test_offset_functions() {
        assert_eq!(
            lag("price", &Offset::default(), &by_user()),
            "LAG(price) OVER (PARTITION BY user_id ORDER BY ts)"
        );
        assert_eq!(
            lead("price", &Offset::rows(3), &Over::new()),
            "LEAD(price, 3) OVER ()"
        );
        assert_eq!(
            lag("price", &Offset::default().with_default("0"), &Over::new()),
            "LAG(price, 1, 0) OVER ()"
        );
    }

    #[test]
    fn test_value_functions() {
        assert_eq!(
            first_value("page", &by_user()),
            "FIRST_VALUE(page) OVER (PARTITION BY user_id ORDER BY ts)"
        );
        assert_eq!(last_value("page", &Over::new()), "LAST_VALUE(page) OVER ()");
    }

    #[test]
    fn test_window_in_select() {
        let q = Query::new();
        q.select(["user_id"])
            .select_raw(format!("{} AS n", row_number(&by_user())))
            .from("events");
        assert_eq!(
            q.build().unwrap(),
            "SELECT user_id, ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY ts) AS n\nFROM events"
        );
    }
}
