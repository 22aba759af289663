//! Artifact generation entry points.
//!
//! This module provides the high-level API used by deployment tooling:
//!
//! ```text
//! DatasourceDef ──────────────────────────────► .datasource
//! PipeDef + query fn → Query → template → emit ► .pipe
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pipeql::generate::{datasource_artifact, pipe_artifact};
//!
//! let ds = datasource_artifact("events", &events_def);
//! let pipe = pipe_artifact("top_pages", &pipe_def, |q, p| {
//!     q.select(["page"]).from("events").filter(("country", Comparison::eq(&p["country"])));
//!     q
//! })?;
//! println!("{}", pipe.contents);
//! ```

use std::fmt;

use crate::config::Project;
use crate::emit::{emit_datasource, DatasourceDef};
use crate::pipe::{compile_declared_pipe, compile_pipe, PipeDef, Placeholders, TemplateError};
use crate::sql::query::Query;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Pipe `{name}`: {source}")]
    Pipe {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("Definition not found: {0}")]
    NotFound(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

// ============================================================================
// Result Types
// ============================================================================

/// Kind of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Datasource,
    Pipe,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Datasource => "datasource",
            ArtifactKind::Pipe => "pipe",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered artifact, ready to be written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub contents: String,
}

impl Artifact {
    /// `<name>.datasource` or `<name>.pipe`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.kind.extension())
    }
}

// ============================================================================
// Generation Functions
// ============================================================================

/// Render a datasource artifact.
pub fn datasource_artifact(name: &str, def: &DatasourceDef) -> Artifact {
    tracing::debug!(name, "generating datasource");
    Artifact {
        name: name.to_string(),
        kind: ArtifactKind::Datasource,
        contents: emit_datasource(def),
    }
}

/// Render a pipe artifact whose body is built by `query_fn`.
pub fn pipe_artifact<F>(name: &str, def: &PipeDef, query_fn: F) -> GenerateResult<Artifact>
where
    F: FnOnce(Query, &Placeholders) -> Query,
{
    tracing::debug!(name, params = def.params.len(), "generating pipe");
    let contents = compile_pipe(def, query_fn).map_err(|source| GenerateError::Pipe {
        name: name.to_string(),
        source,
    })?;
    Ok(Artifact {
        name: name.to_string(),
        kind: ArtifactKind::Pipe,
        contents,
    })
}

/// Render a pipe artifact from its declared SQL body.
pub fn declared_pipe_artifact(name: &str, def: &PipeDef) -> GenerateResult<Artifact> {
    tracing::debug!(name, params = def.params.len(), "generating declared pipe");
    let contents = compile_declared_pipe(def).map_err(|source| GenerateError::Pipe {
        name: name.to_string(),
        source,
    })?;
    Ok(Artifact {
        name: name.to_string(),
        kind: ArtifactKind::Pipe,
        contents,
    })
}

/// Render every definition in a project: datasources first, then pipes,
/// each in declaration order.
pub fn project_artifacts(project: &Project) -> GenerateResult<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = project
        .datasources
        .iter()
        .map(|(name, def)| datasource_artifact(name, def))
        .collect();

    for (name, def) in &project.pipes {
        artifacts.push(declared_pipe_artifact(name, def)?);
    }

    Ok(artifacts)
}

/// Render a single named definition from a project.
pub fn project_artifact(project: &Project, name: &str) -> GenerateResult<Artifact> {
    if let Some(def) = project.datasources.get(name) {
        return Ok(datasource_artifact(name, def));
    }
    match project.pipes.get(name) {
        Some(def) => declared_pipe_artifact(name, def),
        None => Err(GenerateError::NotFound(name.to_string())),
    }
}
