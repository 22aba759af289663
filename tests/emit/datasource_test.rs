#[cfg(test)]
mod tests {
    use pipeql::emit::{emit_datasource, DatasourceDef, Engine};
    use pipeql::model::{column, Schema};

    fn page_views() -> Schema {
        Schema::new()
            .column("ts", column::date_time().json_path("$.timestamp"))
            .column("session_id", column::string())
            .column("country", column::string().nullable())
            .column(
                "duration_ms",
                column::uint64().comment("time on page in milliseconds"),
            )
            .column("tags", column::array("String"))
    }

    #[test]
    fn test_full_datasource() {
        let def = DatasourceDef::new(page_views())
            .version(2)
            .description("Raw page views")
            .engine(
                Engine::merge_tree()
                    .sorting_key(["session_id", "ts"])
                    .partition_by("toYYYYMM(ts)")
                    .ttl("ts + INTERVAL 90 DAY"),
            );

        insta::assert_snapshot!(emit_datasource(&def), @r#"
        VERSION 2

        DESCRIPTION >
            Raw page views

        SCHEMA >
            `ts` DateTime `json:$.timestamp`,
            `session_id` String `json:$.session_id`,
            `country` Nullable(String) `json:$.country`,
            `duration_ms` UInt64 `json:$.duration_ms`,
            # time on page in milliseconds
            `tags` Array(String) `json:$.tags`

        ENGINE "MergeTree"
        ENGINE_SORTING_KEY "session_id,ts"
        ENGINE_PARTITION_KEY "toYYYYMM(ts)"
        ENGINE_TTL "ts + INTERVAL 90 DAY"
        "#);
    }

    #[test]
    fn test_minimal_datasource() {
        let def = DatasourceDef::new(Schema::new().column("id", column::int64()));
        assert_eq!(
            emit_datasource(&def),
            "SCHEMA >\n    `id` Int64 `json:$.id`\n\nENGINE \"MergeTree\"\n"
        );
    }

    #[test]
    fn test_replacing_engine_version_column() {
        let def = DatasourceDef::new(
            Schema::new()
                .column("id", column::string())
                .column("updated_at", column::date_time64(3)),
        )
        .engine(
            Engine::replacing_merge_tree()
                .sorting_key(["id"])
                .ver("updated_at"),
        );

        let out = emit_datasource(&def);
        assert!(out.contains("`updated_at` DateTime64(3) `json:$.updated_at`\n"));
        assert!(out.ends_with(
            "ENGINE \"ReplacingMergeTree\"\nENGINE_SORTING_KEY \"id\"\nENGINE_VER \"updated_at\"\n"
        ));
    }

    #[test]
    fn test_directive_values_are_escaped() {
        let def = DatasourceDef::new(Schema::new().column("id", column::string()))
            .engine(Engine::merge_tree().ttl(r#"ts + toIntervalDay("30")"#));
        assert!(emit_datasource(&def).contains(r#"ENGINE_TTL "ts + toIntervalDay(\"30\")""#));
    }
}
