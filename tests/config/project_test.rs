#[cfg(test)]
mod tests {
    use pipeql::config::{ConfigError, Project};
    use pipeql::generate::{project_artifact, project_artifacts, ArtifactKind, GenerateError};
    use pipeql::model::ParamType;
    use pipeql::pipe::placeholders;
    use std::fs;

    const PROJECT: &str = r#"
[datasources.page_views]
version = 1
description = "Raw page views"
engine = { kind = "MergeTree", sorting_key = ["session_id", "ts"] }

[datasources.page_views.columns]
ts = { type = "DateTime", json_path = "$.timestamp" }
session_id = { type = "String" }
country = { type = "String", nullable = true, comment = "ISO code" }

[pipes.top_pages]
version = 3
sql = """
SELECT page, count() AS hits
FROM page_views
WHERE country = {{ String(country) }}
LIMIT {{ Int64(limit, 10) }}"""

[pipes.top_pages.params]
country = { type = "String" }
limit = { type = "Int64", default = 10 }
"#;

    #[test]
    fn test_declaration_order_is_kept() {
        let project: Project = PROJECT.parse().unwrap();
        let columns: Vec<&str> = project.datasources["page_views"].columns.names().collect();
        assert_eq!(columns, vec!["ts", "session_id", "country"]);

        let params = &project.pipes["top_pages"].params;
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["country", "limit"]);
        assert_eq!(params.get("limit").unwrap().param_type, ParamType::Int64);
    }

    #[test]
    fn test_render_project() {
        let project: Project = PROJECT.parse().unwrap();
        let artifacts = project_artifacts(&project).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].file_name(), "page_views.datasource");
        assert_eq!(artifacts[1].file_name(), "top_pages.pipe");

        insta::assert_snapshot!(artifacts[0].contents, @r#"
        VERSION 1

        DESCRIPTION >
            Raw page views

        SCHEMA >
            `ts` DateTime `json:$.timestamp`,
            `session_id` String `json:$.session_id`,
            `country` Nullable(String) `json:$.country`
            # ISO code

        ENGINE "MergeTree"
        ENGINE_SORTING_KEY "session_id,ts"
        "#);

        insta::assert_snapshot!(artifacts[1].contents, @r"
        VERSION 3

        NODE endpoint
        SQL >
            %
            SELECT page, count() AS hits
            FROM page_views
            WHERE country = {% if defined(country) %}{{ String(country) }}{% end %}
            LIMIT {{ Int64(limit, 10) }}
        ");
    }

    #[test]
    fn test_render_single_definition() {
        let project: Project = PROJECT.parse().unwrap();
        let artifact = project_artifact(&project, "page_views").unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Datasource);
        assert!(matches!(
            project_artifact(&project, "missing"),
            Err(GenerateError::NotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_undeclared_parameter_in_declared_pipe() {
        let project: Project = r#"
            [pipes.bad]
            sql = "SELECT * FROM t WHERE id = {{ Int64(id) }}"
        "#
        .parse()
        .unwrap();

        let err = project_artifacts(&project).unwrap_err();
        assert!(matches!(err, GenerateError::Pipe { ref name, .. } if name == "bad"));
    }

    #[test]
    fn test_date_defaults_render_quoted() {
        let project: Project = r#"
            [pipes.daily]
            sql = "SELECT * FROM t WHERE day >= {{ Date(since, '2024-01-01') }} AND ts < {{ DateTime(until, '2024-02-01T00:00:00') }}"

            [pipes.daily.params]
            since = { type = "Date", default = 2024-01-01 }
            until = { type = "DateTime", default = 2024-02-01T00:00:00 }
        "#
        .parse()
        .unwrap();

        let tokens = placeholders(&project.pipes["daily"].params);
        assert_eq!(&tokens["since"], "{{ Date(since, '2024-01-01') }}");
        assert_eq!(&tokens["until"], "{{ DateTime(until, '2024-02-01T00:00:00') }}");

        let artifact = project_artifact(&project, "daily").unwrap();
        assert!(artifact
            .contents
            .contains("day >= {{ Date(since, '2024-01-01') }} AND ts < {{ DateTime(until, '2024-02-01T00:00:00') }}"));
    }

    #[test]
    fn test_from_file_with_env_expansion() {
        std::env::set_var("PIPEQL_PROJECT_TEST_TTL", "ts + INTERVAL 7 DAY");
        let dir = std::env::temp_dir().join("pipeql_project_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pipeql.toml");
        fs::write(
            &path,
            r#"
[datasources.events]
engine = { ttl = "${PIPEQL_PROJECT_TEST_TTL}" }

[datasources.events.columns]
id = { type = "String" }
"#,
        )
        .unwrap();

        let project = Project::from_file(&path).unwrap();
        let events = &project.datasources["events"];
        assert_eq!(events.engine.kind, "MergeTree");
        assert_eq!(events.engine.ttl.as_deref(), Some("ts + INTERVAL 7 DAY"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_env_var_is_reported() {
        let err = "[datasources.x]\nengine = { ttl = \"${PIPEQL_PROJECT_TEST_UNSET}\" }\n"
            .parse::<Project>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(v) if v == "PIPEQL_PROJECT_TEST_UNSET"));
    }
}
