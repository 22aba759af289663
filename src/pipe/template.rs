//! Parameter template compilation.
//!
//! Pipe queries reference parameters through platform placeholders such as
//! `{{ String(country, required=True) }}`. The query author never writes
//! those by hand: [`compile_body`] hands the query function a
//! [`Placeholders`] map whose values are the tokens, builds the query, and
//! then wraps every token of a conditional parameter in
//! `{% if defined(name) %} ... {% end %}`.

use std::ops::Index;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::model::{ParamType, Parameter, Parameters};
use crate::sql::query::{Query, QueryError};

/// Errors raised while compiling a pipe template.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to build pipe query: {0}")]
    Query(#[from] QueryError),

    #[error("Query references undeclared parameter `{name}` in `{token}`")]
    UnknownParameter { name: String, token: String },
}

pub type TemplateResult<T> = Result<T, TemplateError>;

// =============================================================================
// Placeholder tokens
// =============================================================================

/// Parameter name to placeholder token, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    tokens: IndexMap<String, String>,
}

impl Placeholders {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Index<&str> for Placeholders {
    type Output = str;

    /// # Panics
    ///
    /// Panics if `name` is not a declared parameter.
    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(token) => token,
            None => panic!("no parameter named `{}`", name),
        }
    }
}

/// Placeholder token for a single parameter.
///
/// | Parameter | Token |
/// |---|---|
/// | required | `{{ T(name, required=True) }}` |
/// | with default | `{{ T(name, <default>) }}` |
/// | neither | `{{ T(name) }}` |
pub fn placeholder(name: &str, param: &Parameter) -> String {
    let type_name = param.token_type().as_str();
    if param.required {
        format!("{{{{ {}({}, required=True) }}}}", type_name, name)
    } else if let Some(default) = &param.default {
        let default = format_default(param.token_type(), default);
        format!("{{{{ {}({}, {}) }}}}", type_name, name, default)
    } else {
        format!("{{{{ {}({}) }}}}", type_name, name)
    }
}

/// Tokens for every parameter.
pub fn placeholders(params: &Parameters) -> Placeholders {
    Placeholders {
        tokens: params
            .iter()
            .map(|(name, param)| (name.to_string(), placeholder(name, param)))
            .collect(),
    }
}

/// Render a default value as a template argument.
///
/// Strings and date-like types are quoted, numbers and booleans are bare,
/// and an explicit null is the literal `null`.
fn format_default(param_type: ParamType, value: &JsonValue) -> String {
    let text = match value {
        JsonValue::Null => return "null".to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    if param_type.is_quoted() {
        quote_template_string(&text)
    } else {
        text
    }
}

fn quote_template_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

// =============================================================================
// Token scanner
// =============================================================================

/// A `{{ TYPE(name ...) }}` span found in a query body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan<'a> {
    /// Byte offset of the opening `{{`.
    pub start: usize,
    /// Byte offset just past the closing `}}`.
    pub end: usize,
    pub type_name: &'a str,
    pub name: &'a str,
    /// Whether anything follows the name inside the parentheses.
    pub has_args: bool,
}

impl<'a> TokenSpan<'a> {
    pub fn text<'b>(&self, body: &'b str) -> &'b str {
        &body[self.start..self.end]
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a leading identifier off `s`.
fn take_ident(s: &str) -> Option<(&str, &str)> {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let len = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    if len == 0 {
        None
    } else {
        Some(s.split_at(len))
    }
}

/// Parse the inside of `{{ ... }}` as `TYPE(name[, args])`.
fn parse_call(inner: &str) -> Option<(&str, &str, bool)> {
    let (type_name, rest) = take_ident(inner.trim())?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let (name, rest) = take_ident(rest.trim_start())?;
    let rest = rest.trim_start();
    let has_args = if rest.starts_with(',') {
        true
    } else if rest.starts_with(')') {
        false
    } else {
        return None;
    };
    // Whatever follows must end in the closing parenthesis of this call.
    if !rest.trim_end().ends_with(')') {
        return None;
    }
    Some((type_name, name, has_args))
}

/// Find every `{{ TYPE(name ...) }}` token in `body`.
///
/// Unterminated `{{` and expressions that are not a call with a leading
/// identifier argument are skipped.
pub fn scan_tokens(body: &str) -> Vec<TokenSpan<'_>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(open) = body[pos..].find("{{") {
        let start = pos + open;
        let Some(close) = body[start + 2..].find("}}") else {
            break;
        };
        let inner_end = start + 2 + close;
        let end = inner_end + 2;

        if let Some((type_name, name, has_args)) = parse_call(&body[start + 2..inner_end]) {
            spans.push(TokenSpan {
                start,
                end,
                type_name,
                name,
                has_args,
            });
        }
        pos = end;
    }

    spans
}

// =============================================================================
// Compilation
// =============================================================================

/// Wrap bare tokens of conditional parameters and reject tokens that name
/// undeclared parameters.
///
/// A token is only attributed to a parameter when both its name and its
/// type match, so `id` never matches inside `{{ String(user_id) }}` and an
/// `Int64` parameter `id` never claims `{{ String(id) }}`.
pub fn wrap_conditionals(body: &str, params: &Parameters) -> TemplateResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    let mut wrapped = 0usize;

    for span in scan_tokens(body) {
        let param = match params.get(span.name) {
            Some(param) => param,
            None if ParamType::from_name(span.type_name).is_some() => {
                return Err(TemplateError::UnknownParameter {
                    name: span.name.to_string(),
                    token: span.text(body).to_string(),
                });
            }
            // Some other template function, e.g. `{{ columns(cols) }}`.
            None => continue,
        };

        if !param.is_conditional()
            || span.has_args
            || span.type_name != param.token_type().as_str()
        {
            continue;
        }

        out.push_str(&body[last..span.start]);
        out.push_str(&format!(
            "{{% if defined({}) %}}{}{{% end %}}",
            span.name,
            span.text(body)
        ));
        last = span.end;
        wrapped += 1;
    }
    out.push_str(&body[last..]);

    tracing::debug!(wrapped, "wrapped conditional parameter tokens");
    Ok(out)
}

/// Build the pipe query with placeholder tokens and apply conditional wrapping.
///
/// `query_fn` receives a fresh [`Query`] and the placeholder map, and
/// returns the query to render (usually the one it was given).
pub fn compile_body<F>(params: &Parameters, query_fn: F) -> TemplateResult<String>
where
    F: FnOnce(Query, &Placeholders) -> Query,
{
    let tokens = placeholders(params);
    let query = query_fn(Query::new(), &tokens);
    let body = query.build()?;

    tracing::debug!(
        params = params.len(),
        bytes = body.len(),
        "compiling pipe template"
    );
    wrap_conditionals(&body, params)
}
