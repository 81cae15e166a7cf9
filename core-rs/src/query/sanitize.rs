/**
 * sanitize.rs
 * Query-string cleanup applied before user input reaches a pattern
 */

use once_cell::sync::Lazy;
use oxigraph::model::NamedNode;
use regex::{NoExpand, Regex};

use crate::errors::{KbqError, Result};

static SPACE_OR_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[[:space:][:cntrl:]]+").expect("valid whitespace regex"));

static FTS_RESERVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[[:punct:][:space:][:cntrl:]~+*(){}\[\]]+").expect("valid FTS reserved regex")
});

static REGEX_META: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[{}()\[\].+*?^$\\|]+").expect("valid metacharacter regex"));

const SOFT_HYPHEN: char = '\u{00AD}';

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\'' || c == '"'
}

/// Strip surrounding whitespace and quotes.
///
/// If the input ended in whitespace and something was stripped, one trailing space is kept so
/// that prefix matching can tell a completed word from one still being typed.
pub fn trim_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let trailing_space = query.chars().last().map_or(false, char::is_whitespace);
    let trimmed = query.trim_matches(is_trimmable);

    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.len() == query.len() {
        return query.to_string();
    }

    if trailing_space {
        format!("{} ", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Collapse whitespace and control characters for regex and VALUES matching
pub fn sanitize_no_fts(query: &str) -> String {
    SPACE_OR_CONTROL
        .replace_all(query, NoExpand(" "))
        .trim()
        .to_string()
}

/// Collapse punctuation, whitespace and control characters that carry meaning for text
/// indexes, then drop soft hyphens
pub fn sanitize_fts(query: &str) -> String {
    FTS_RESERVED
        .replace_all(query, NoExpand(" "))
        .chars()
        .filter(|c| *c != SOFT_HYPHEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Turn a sanitized query into an edit-distance query.
///
/// Tokens longer than 4 characters get a `~`, tokens of 3-4 characters stay exact and
/// shorter tokens are dropped.
pub fn convert_to_fuzzy_matching_query(query: &str) -> String {
    query
        .split(' ')
        .filter_map(|term| {
            let len = term.chars().count();
            if len > 4 {
                Some(format!("{}~", term))
            } else if len >= 3 {
                Some(term.to_string())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn user input into a lenient regular expression.
///
/// Runs of regex metacharacters become `.+` and runs of whitespace become `\s+`, so the
/// expression tolerates extra spacing and never fails to compile.
pub fn as_regexp(value: &str) -> String {
    let value = REGEX_META.replace_all(value, NoExpand(".+"));
    SPACE_OR_CONTROL
        .replace_all(&value, NoExpand(r"\s+"))
        .into_owned()
}

/// False when nothing but whitespace, quotes and regex metacharacters is left; such input
/// would turn into a wildcard that matches every label
pub fn is_searchable(query: &str) -> bool {
    REGEX_META
        .replace_all(query, NoExpand(""))
        .chars()
        .any(|c| !is_trimmable(c) && c != SOFT_HYPHEN && !c.is_control())
}

/// Accept only absolute IRIs that can be written between `<` and `>` unchanged
pub fn checked_iri(iri: &str) -> Result<&str> {
    NamedNode::new(iri)
        .map(|_| iri)
        .map_err(|e| KbqError::InvalidIri {
            iri: iri.to_string(),
            message: e.to_string(),
        })
}
