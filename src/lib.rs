//! # pipeql
//!
//! SQL generation for analytics-platform deployment artifacts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │  Schema (columns)        │     │  Parameters              │
//! └──────────────────────────┘     └──────────────────────────┘
//!              │                                │
//!              │                                ▼ [placeholders]
//!              │                   ┌──────────────────────────┐
//!              │                   │  Query builder → SQL     │
//!              │                   └──────────────────────────┘
//!              │                                │
//!              │                                ▼ [conditional wrapping]
//!              ▼ [emit]                         ▼ [emit]
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │  .datasource text        │     │  .pipe text              │
//! └──────────────────────────┘     └──────────────────────────┘
//! ```
//!
//! Everything here is synchronous and free of I/O, apart from reading
//! project files in [`config`].

pub mod config;
pub mod emit;
pub mod generate;
pub mod model;
pub mod pipe;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::emit::{emit_datasource, emit_pipe, DatasourceDef, Engine};
    pub use crate::generate::{datasource_artifact, pipe_artifact, Artifact, ArtifactKind};
    pub use crate::model::{column, Column, ParamType, Parameter, Parameters, Schema};
    pub use crate::pipe::{compile_pipe, PipeDef, Placeholders};
    pub use crate::sql::{
        escape, query, Comparison, Condition, JoinType, Offset, Over, Query, SetOperator, Value,
    };
}

// Also export at crate root for convenience
pub use sql::{escape, query, Comparison, Condition, Query, Value};
