// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics.
//!
//! Figment extraction errors are converted into [`ConfigError`]s that point
//! at the offending key in the TOML source and suggest the closest valid key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable with source context.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config section accepts.
    #[error("unknown configuration key `{key}` in {section}")]
    #[diagnostic(
        code(veil::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted section path, or `top level`.
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("invalid type for `{key}`: found {found}")]
    #[diagnostic(code(veil::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    /// A key the config cannot do without.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(veil::config::missing_key),
        help("add `{key} = <value>` to your veil.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but is out of range.
    #[error("validation error: {message}")]
    #[diagnostic(code(veil::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(veil::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` pairs used to locate unknown keys.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let section = section_path(&error.path, field);
                let (span, src) = locate_key(&error, &section, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section: if section.is_empty() {
                        "top level".to_string()
                    } else {
                        format!("[{}]", section.join("."))
                    },
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted(&section_path(&error.path, field), field),
            },
            Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                found: found.to_string(),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// The table holding `field`.
///
/// Figment ends the error path with the offending key itself; that element
/// is dropped so only the enclosing sections remain.
fn section_path(path: &[String], field: &str) -> Vec<String> {
    match path.split_last() {
        Some((last, parent)) if last == field => parent.to_vec(),
        _ => path.to_vec(),
    }
}

fn dotted(section: &[String], field: &str) -> String {
    if section.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", section.join("."))
    }
}

/// Span and source for `field` if the error came from a known TOML file.
fn locate_key(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline strings have no file path; fall back to the only source given.
    let source = match origin {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    let Some((path, content)) = source else {
        return (None, None);
    };
    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` in `content`, searched after the `[a.b]` header
/// named by `section` (or from the start for top-level keys).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = if section.is_empty() {
        0
    } else {
        let header = format!("[{}]", section.join("."));
        content.find(&header)? + header.len()
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && offset != start {
            // Next section: the key is not in this one.
            break;
        }
        if let Some(rest) = trimmed.strip_prefix(field) {
            if rest.trim_start().starts_with('=') {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// The valid key closest to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render errors to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["default_ttl_ms", "sweep_interval_ms", "sweep_enabled"];
        assert_eq!(
            suggest_key("default_tll_ms", valid),
            Some("default_ttl_ms".to_string())
        );
        assert_eq!(suggest_key("levle", &["level"]), Some("level".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_key() {
        assert_eq!(suggest_key("zzzzzz", &["level"]), None);
    }

    #[test]
    fn finds_key_in_named_section() {
        let content = "[log]\nlevel = \"info\"\n\n[cache]\nsweep_enabeld = true\n";
        let offset = find_key_offset(content, &["cache".to_string()], "sweep_enabeld").unwrap();
        assert_eq!(&content[offset..offset + 13], "sweep_enabeld");
    }

    #[test]
    fn finds_key_in_dotted_section() {
        let content = "[plugins.zk]\n  enabeld = false\n";
        let section = vec!["plugins".to_string(), "zk".to_string()];
        let offset = find_key_offset(content, &section, "enabeld").unwrap();
        assert_eq!(&content[offset..offset + 7], "enabeld");
    }

    #[test]
    fn section_path_drops_trailing_key() {
        let path = vec!["cache".to_string(), "default_tll_ms".to_string()];
        assert_eq!(section_path(&path, "default_tll_ms"), vec!["cache".to_string()]);
        assert_eq!(section_path(&path, "other"), path);
        assert!(section_path(&["telemetry".to_string()], "telemetry").is_empty());
    }

    #[test]
    fn missing_key_is_not_doubled() {
        let section = section_path(&["log".to_string(), "level".to_string()], "level");
        assert_eq!(dotted(&section, "level"), "log.level");
    }

    #[test]
    fn key_in_other_section_is_not_matched() {
        let content = "[log]\n\n[cache]\nlevel = 1\n";
        assert_eq!(find_key_offset(content, &["log".to_string()], "level"), None);
    }
}
