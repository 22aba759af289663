//! Pipe definitions and compilation to `.pipe` text.
//!
//! ```ignore
//! let def = PipeDef::new(
//!     Parameters::new()
//!         .param("country", Parameter::string())
//!         .param("min_hits", Parameter::int64().default_value(10)),
//! )
//! .version(2);
//!
//! let text = compile_pipe(&def, |q, p| {
//!     q.select(["page", "count() AS hits"])
//!         .from("events")
//!         .filter(("country", Comparison::eq(&p["country"])))
//!         .group_by(["page"])
//!         .having(format!("hits >= {}", &p["min_hits"]))
//!         .order_by(["hits DESC"]);
//!     q
//! })?;
//! ```

pub mod template;

use serde::{Deserialize, Serialize};

use crate::emit::pipe::emit_pipe;
use crate::model::Parameters;
use crate::sql::query::Query;

pub use template::{
    compile_body, placeholder, placeholders, scan_tokens, wrap_conditionals, Placeholders,
    TemplateError, TemplateResult, TokenSpan,
};

/// A pipe: parameters plus header metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct PipeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub params: Parameters,

    /// Query body for pipes declared in configuration files. Pipes built
    /// in code pass a query function instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

impl PipeDef {
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }
}

/// Compile a pipe whose body is produced by `query_fn`.
pub fn compile_pipe<F>(def: &PipeDef, query_fn: F) -> TemplateResult<String>
where
    F: FnOnce(Query, &Placeholders) -> Query,
{
    let body = compile_body(&def.params, query_fn)?;
    Ok(emit_pipe(def.version, def.description.as_deref(), &body))
}

/// Compile a pipe from its declared SQL body.
///
/// The body is installed as a raw query, so it may already contain
/// placeholder tokens; conditional wrapping and parameter checks still
/// apply. A pipe without a body compiles to `SELECT *`.
pub fn compile_declared_pipe(def: &PipeDef) -> TemplateResult<String> {
    compile_pipe(def, |q, _| {
        if let Some(sql) = &def.sql {
            q.raw(sql.as_str());
        }
        q
    })
}
