//! CrateDB SQL dialect utilities.
//!
//! The host ORM emits statements in its "format" (`%s`) and "pyformat"
//! (`%(name)s`) placeholder styles; CrateDB accepts "qmark" (`?`) and
//! "named" (`:name`). [`convert_query`] rewrites between them. A literal
//! percent sign is escaped in the host styles as `%%` and collapses to a
//! single `%` in the rewritten statement.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BackendError, Result};

/// Matches the host positional placeholder token. Escaping is a preceding
/// sentinel byte, checked outside the pattern because the regex engine has
/// no lookbehind.
fn format_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%s").expect("valid placeholder regex"))
}

/// Matches an escaped sentinel or a named placeholder token.
fn named_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%%|%\((\w+)\)s").expect("valid placeholder regex"))
}

/// Rewrite a host-style statement into CrateDB placeholder syntax.
///
/// With no `param_names`, the statement uses the positional convention:
/// every unescaped `%s` becomes `?`. With `param_names`, the statement uses
/// the named convention: every `%(name)s` becomes `:name`, and a template
/// name absent from `param_names` is a fatal formatting error.
pub fn convert_query(sql: &str, param_names: Option<&[String]>) -> Result<String> {
    match param_names {
        None => Ok(convert_positional(sql)),
        Some(names) => convert_named(sql, names),
    }
}

fn convert_positional(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    for m in format_token_re().find_iter(sql) {
        // A token directly preceded by the sentinel is escaped: leave it for
        // the unescape pass below.
        if m.start() > 0 && bytes[m.start() - 1] == b'%' {
            continue;
        }
        out.push_str(&sql[last..m.start()]);
        out.push('?');
        last = m.end();
    }
    out.push_str(&sql[last..]);
    out.replace("%%", "%")
}

fn convert_named(sql: &str, names: &[String]) -> Result<String> {
    let mut missing: Option<String> = None;
    let out = named_token_re().replace_all(sql, |caps: &regex::Captures<'_>| {
        if &caps[0] == "%%" {
            return "%".to_string();
        }
        let name = &caps[1];
        if names.iter().any(|n| n == name) {
            format!(":{name}")
        } else {
            missing.get_or_insert_with(|| name.to_string());
            String::new()
        }
    });
    if let Some(name) = missing {
        return Err(BackendError::MissingParameter { name });
    }
    Ok(out.into_owned())
}

/// Quote an identifier for CrateDB (double quotes, embedded quotes doubled).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL fragment for an ORM lookup operator, with the comparison value as a
/// host-style placeholder.
pub fn lookup_operator(lookup: &str) -> Option<&'static str> {
    Some(match lookup {
        "exact" => "= %s",
        "iexact" => "= UPPER(%s)",
        "contains" => "LIKE %s",
        "icontains" => "LIKE UPPER(%s)",
        "regex" => "~ %s",
        "iregex" => "~* %s",
        "gt" => "> %s",
        "gte" => ">= %s",
        "lt" => "< %s",
        "lte" => "<= %s",
        "startswith" | "endswith" => "LIKE %s",
        "istartswith" | "iendswith" => "LIKE UPPER(%s)",
        _ => return None,
    })
}
