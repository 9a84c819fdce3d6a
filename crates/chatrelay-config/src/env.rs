use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Failure while expanding `{{ env.VAR }}` placeholders
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder references an unset variable and has no default
    #[error("environment variable not found: `{0}` (line {1})")]
    MissingVariable(String, usize),

    /// Placeholder uses a scope other than `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}` (line {1})")]
    UnsupportedScope(String, usize),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: the key (e.g. `env.AZURE_OPENAI_KEY`)
    // Group 2: optional default value inside default("...")
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw configuration text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are passed through untouched so that
/// commented-out secrets never have to be present in the environment.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for (index, line) in input.lines().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        output.push_str(&expand_line(line, index + 1)?);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str, line_number: usize) -> Result<String, ExpandError> {
    let mut result = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(line) {
        let (Some(overall), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let key = key.as_str();

        result.push_str(&line[last_end..overall.start()]);

        let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
            return Err(ExpandError::UnsupportedScope(key.to_owned(), line_number));
        };

        match (std::env::var(var_name), captures.get(2)) {
            (Ok(value), _) => result.push_str(&value),
            (Err(_), Some(default)) => result.push_str(default.as_str()),
            (Err(_), None) => return Err(ExpandError::MissingVariable(var_name.to_owned(), line_number)),
        }

        last_end = overall.end();
    }

    result.push_str(&line[last_end..]);
    Ok(result)
}
