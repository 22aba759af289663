//! Datasource definition → `.datasource` text.
//!
//! ```text
//! VERSION 1
//!
//! SCHEMA >
//!     `id` String `json:$.id`,
//!     `ts` DateTime `json:$.timestamp`
//!     # event time
//!
//! ENGINE "MergeTree"
//! ENGINE_SORTING_KEY "ts,id"
//! ```

use serde::{Deserialize, Serialize};

use super::format::IndentWriter;
use crate::model::{Column, Schema};

fn default_engine_kind() -> String {
    "MergeTree".to_string()
}

/// Storage-engine directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Engine {
    #[serde(default = "default_engine_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting_key: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,

    /// Version column for `ReplacingMergeTree`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(default_engine_kind())
    }
}

impl Engine {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            sorting_key: Vec::new(),
            partition_by: None,
            ttl: None,
            ver: None,
        }
    }

    pub fn merge_tree() -> Self {
        Self::new("MergeTree")
    }

    pub fn replacing_merge_tree() -> Self {
        Self::new("ReplacingMergeTree")
    }

    pub fn summing_merge_tree() -> Self {
        Self::new("SummingMergeTree")
    }

    pub fn aggregating_merge_tree() -> Self {
        Self::new("AggregatingMergeTree")
    }

    pub fn sorting_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sorting_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn partition_by(mut self, expr: impl Into<String>) -> Self {
        self.partition_by = Some(expr.into());
        self
    }

    pub fn ttl(mut self, expr: impl Into<String>) -> Self {
        self.ttl = Some(expr.into());
        self
    }

    pub fn ver(mut self, column: impl Into<String>) -> Self {
        self.ver = Some(column.into());
        self
    }
}

/// A datasource: schema plus engine metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct DatasourceDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: Schema,

    #[serde(default)]
    pub engine: Engine,
}

impl DatasourceDef {
    pub fn new(columns: Schema) -> Self {
        Self {
            columns,
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

    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }
}

/// Emit a single schema column line.
fn emit_column(name: &str, col: &Column) -> String {
    format!(
        "`{}` {} `json:{}`",
        name,
        col.rendered_type(),
        col.resolved_json_path(name)
    )
}

/// Render a datasource definition to `.datasource` text.
pub fn emit_datasource(def: &DatasourceDef) -> String {
    let mut w = IndentWriter::new();

    w.write_version(def.version);
    w.write_description(def.description.as_deref());

    w.write_line("SCHEMA >");
    w.indent();
    let count = def.columns.len();
    for (i, (name, col)) in def.columns.iter().enumerate() {
        let line = emit_column(name, col);
        if i + 1 < count {
            w.write_line(&format!("{},", line));
        } else {
            w.write_line(&line);
        }
        if let Some(comment) = &col.comment {
            w.write_comment(comment);
        }
    }
    w.dedent();
    w.blank_line();

    let engine = &def.engine;
    w.write_directive("ENGINE", &engine.kind);
    if !engine.sorting_key.is_empty() {
        w.write_directive("ENGINE_SORTING_KEY", &engine.sorting_key.join(","));
    }
    if let Some(partition) = &engine.partition_by {
        w.write_directive("ENGINE_PARTITION_KEY", partition);
    }
    if let Some(ttl) = &engine.ttl {
        w.write_directive("ENGINE_TTL", ttl);
    }
    if let Some(ver) = &engine.ver {
        w.write_directive("ENGINE_VER", ver);
    }

    let text = w.into_string();
    tracing::debug!(columns = count, bytes = text.len(), "emitted datasource");
    text
}
