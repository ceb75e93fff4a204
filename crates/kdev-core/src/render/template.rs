//! `{{placeholder}}` substitution
//!
//! Templates are plain text with `{{name}}` markers (inner whitespace
//! allowed). Names are lowercase ASCII identifiers. There is no conditional
//! or loop syntax.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },

    #[error("invalid placeholder name '{name}'")]
    InvalidName { name: String },

    #[error("no value for placeholder '{name}'")]
    Unresolved { name: String },
}

#[derive(Debug, Clone, Copy)]
enum Piece<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn pieces(source: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut out = Vec::new();
    let mut rest = source;
    let mut consumed = 0;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            out.push(Piece::Text(&rest[..open]));
        }
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or(TemplateError::Unterminated {
                offset: consumed + open,
            })?;
        let name = after_open[..close].trim();
        if !is_valid_name(name) {
            return Err(TemplateError::InvalidName {
                name: name.to_string(),
            });
        }
        out.push(Piece::Placeholder(name));

        let advance = open + 2 + close + 2;
        consumed += advance;
        rest = &rest[advance..];
    }
    if !rest.is_empty() {
        out.push(Piece::Text(rest));
    }
    Ok(out)
}

/// Distinct placeholder names in order of first appearance
///
/// # Errors
///
/// Returns `Unterminated` or `InvalidName` for malformed markers.
pub fn placeholders(source: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for piece in pieces(source)? {
        if let Piece::Placeholder(name) = piece {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Replace every placeholder with its value
///
/// Values not referenced by the template are ignored here; callers decide
/// whether extra parameters are an error.
///
/// # Errors
///
/// Returns `Unresolved` for the first placeholder without a value.
pub fn substitute(
    source: &str,
    values: &BTreeMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    for piece in pieces(source)? {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Placeholder(name) => {
                let value = values.get(name).ok_or_else(|| TemplateError::Unresolved {
                    name: name.to_string(),
                })?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders_in_first_appearance_order() {
        let names = placeholders("{{name}} in {{ namespace }} again {{name}}").unwrap();
        assert_eq!(names, vec!["name", "namespace"]);
    }

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        let out = substitute(
            "name: {{name}}\nnamespace: {{namespace}}\nselector: {{name}}",
            &values(&[("name", "redis"), ("namespace", "dev")]),
        )
        .unwrap();
        assert_eq!(out, "name: redis\nnamespace: dev\nselector: redis");
    }

    #[test]
    fn test_substitute_reports_unresolved() {
        let err = substitute("a: {{missing}}", &values(&[])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unresolved {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_marker() {
        let err = placeholders("ok\nbad: {{name").unwrap_err();
        assert_eq!(err, TemplateError::Unterminated { offset: 8 });
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(matches!(
            placeholders("{{}}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            placeholders("{{Name}}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            placeholders("{{1st}}"),
            Err(TemplateError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_text_without_markers_is_unchanged() {
        let src = "kind: Namespace\nmetadata: {}\n";
        assert_eq!(substitute(src, &values(&[])).unwrap(), src);
        assert!(placeholders(src).unwrap().is_empty());
    }

    #[test]
    fn test_single_braces_are_text() {
        let out = substitute("data: {a: {{v}}}", &values(&[("v", "1")])).unwrap();
        assert_eq!(out, "data: {a: 1}");
    }
}
