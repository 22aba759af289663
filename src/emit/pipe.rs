//! Compiled pipe body → `.pipe` text.

use super::format::IndentWriter;

/// Name of the single node every pipe is emitted with.
pub const NODE_NAME: &str = "endpoint";

/// Wrap a compiled SQL body into `.pipe` text.
///
/// ```text
/// VERSION 3
///
/// NODE endpoint
/// SQL >
///     %
///     SELECT ...
/// ```
pub fn emit_pipe(version: Option<u32>, description: Option<&str>, body: &str) -> String {
    let mut w = IndentWriter::new();

    w.write_version(version);
    w.write_description(description);

    w.write_line(&format!("NODE {}", NODE_NAME));
    w.write_line("SQL >");
    w.indent();
    w.write_line("%");
    w.write_block(body);
    w.dedent();

    let text = w.into_string();
    tracing::debug!(bytes = text.len(), "emitted pipe");
    text
}
