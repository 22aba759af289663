//! Artifact emission: datasource and pipe definition texts.

pub mod datasource;
pub mod format;
pub mod pipe;

pub use datasource::{emit_datasource, DatasourceDef, Engine};
pub use format::IndentWriter;
pub use pipe::{emit_pipe, NODE_NAME};
