#[cfg(test)]
mod tests {
    use pipeql::model::{ParamType, Parameter, Parameters};
    use pipeql::pipe::{compile_body, compile_pipe, placeholders, PipeDef, TemplateError};
    use pipeql::sql::{Comparison, Query};

    fn params() -> Parameters {
        Parameters::new()
            .param("country", Parameter::string().required())
            .param("limit", Parameter::int64().default_value(10))
            .param("device", Parameter::enumeration(["mobile", "desktop"]))
            .param("since", Parameter::date())
    }

    #[test]
    fn test_placeholders_in_declaration_order() {
        let tokens = placeholders(&params());
        let names: Vec<&str> = tokens.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["country", "limit", "device", "since"]);

        assert_eq!(&tokens["country"], "{{ String(country, required=True) }}");
        assert_eq!(&tokens["limit"], "{{ Int64(limit, 10) }}");
        assert_eq!(&tokens["device"], "{{ String(device) }}");
        assert_eq!(&tokens["since"], "{{ Date(since) }}");
        assert!(tokens.get("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "no parameter named `missing`")]
    fn test_index_unknown_placeholder_panics() {
        let tokens = placeholders(&params());
        let _ = &tokens["missing"];
    }

    #[test]
    fn test_only_conditional_params_are_wrapped() {
        let body = compile_body(&params(), |q, p| {
            q.select(["page"])
                .from("events")
                .filter(("country", Comparison::eq(&p["country"])))
                .and(("device", Comparison::eq(&p["device"])))
                .and(("day", Comparison::gte(&p["since"])))
                .order_by([format!("hits DESC LIMIT {}", &p["limit"])]);
            q
        })
        .unwrap();

        insta::assert_snapshot!(body, @r"
        SELECT page
        FROM events
        WHERE country = {{ String(country, required=True) }} AND device = {% if defined(device) %}{{ String(device) }}{% end %} AND day >= {% if defined(since) %}{{ Date(since) }}{% end %}
        ORDER BY hits DESC LIMIT {{ Int64(limit, 10) }}
        ");
    }

    #[test]
    fn test_query_fn_may_return_another_query() {
        let params = Parameters::new().param("id", Parameter::int64().required());
        let body = compile_body(&params, |_, p| {
            let q = Query::new();
            q.from("t").filter(("id", Comparison::eq(&p["id"])));
            q
        })
        .unwrap();
        assert_eq!(body, "SELECT *\nFROM t\nWHERE id = {{ Int64(id, required=True) }}");
    }

    #[test]
    fn test_hand_written_unknown_token_fails() {
        let err = compile_body(&Parameters::new(), |q, _| {
            q.from("t").filter("x = {{ DateTime(ghost) }}");
            q
        })
        .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownParameter { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_query_error_surfaces() {
        let err = compile_body(&Parameters::new(), |q, _| {
            q.from("t").filter(("x", Comparison::eq(f64::NAN)));
            q
        })
        .unwrap_err();
        assert!(matches!(err, TemplateError::Query(_)));
    }

    #[test]
    fn test_compile_pipe_header() {
        let def = PipeDef::new(Parameters::new().param("q", Parameter::string()))
            .version(1)
            .description("Search by term");
        let text = compile_pipe(&def, |q, p| {
            q.from("docs").filter(("term", Comparison::like(&p["q"])));
            q
        })
        .unwrap();

        insta::assert_snapshot!(text, @r"
        VERSION 1

        DESCRIPTION >
            Search by term

        NODE endpoint
        SQL >
            %
            SELECT *
            FROM docs
            WHERE term LIKE {% if defined(q) %}{{ String(q) }}{% end %}
        ");
    }

    #[test]
    fn test_param_type_names() {
        let names: Vec<&str> = ParamType::ALL.iter().map(ParamType::as_str).collect();
        assert_eq!(
            names,
            vec!["String", "Int64", "Float64", "DateTime", "Date", "Boolean"]
        );
        assert_eq!(ParamType::from_name("Int64"), Some(ParamType::Int64));
        assert_eq!(ParamType::from_name("columns"), None);
    }
}
