/**
 * fts.rs
 * Label matching strategies for each full-text search backend
 *
 * `strategy(engine, style)` selects a pure function that turns the trimmed user values into
 * one graph pattern plus the priority bucket it belongs in. Strategies never touch builder
 * state; the builder applies the returned `LabelMatch`.
 */

use std::fmt;

use super::assemble::Priority;
use super::pattern::{var, Expression, GraphPattern, Prefix, PropertyPath, Term};
use super::sanitize::{as_regexp, convert_to_fuzzy_matching_query, sanitize_fts, sanitize_no_fts};
use crate::errors::{KbqError, Result};
use crate::vocab::{fts, fuseki, lucene, virtuoso, wikidata};

pub const LUCENE_PREFIX: Prefix = Prefix::new(lucene::PREFIX, lucene::NAMESPACE);
pub const FUSEKI_PREFIX: Prefix = Prefix::new(fuseki::PREFIX, fuseki::NAMESPACE);
pub const WIKIBASE_PREFIX: Prefix = Prefix::new(wikidata::WIKIBASE_PREFIX, wikidata::WIKIBASE);
pub const BD_PREFIX: Prefix = Prefix::new(wikidata::BD_PREFIX, wikidata::BD);
pub const MWAPI_PREFIX: Prefix = Prefix::new(wikidata::MWAPI_PREFIX, wikidata::MWAPI);

/// Full-text search backend of a knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FtsEngine {
    None,
    Lucene,
    Fuseki,
    Virtuoso,
    Wikidata,
}

impl FtsEngine {
    /// Resolve the engine configured on a knowledge base; absent means no FTS
    pub fn from_iri(iri: Option<&str>) -> Result<Self> {
        match iri {
            None => Ok(FtsEngine::None),
            Some(fts::NONE) => Ok(FtsEngine::None),
            Some(fts::LUCENE) => Ok(FtsEngine::Lucene),
            Some(fts::FUSEKI) => Ok(FtsEngine::Fuseki),
            Some(fts::VIRTUOSO) => Ok(FtsEngine::Virtuoso),
            Some(fts::WIKIDATA) => Ok(FtsEngine::Wikidata),
            Some(other) => Err(KbqError::UnknownFtsEngine(other.to_string())),
        }
    }

    pub fn iri(self) -> &'static str {
        match self {
            FtsEngine::None => fts::NONE,
            FtsEngine::Lucene => fts::LUCENE,
            FtsEngine::Fuseki => fts::FUSEKI,
            FtsEngine::Virtuoso => fts::VIRTUOSO,
            FtsEngine::Wikidata => fts::WIKIDATA,
        }
    }
}

impl fmt::Display for FtsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStyle {
    /// Whole label equals the value
    Exact,
    /// Fuzzy index match; degrades to `Contains` without an index
    Matching,
    Contains,
    StartsWith,
}

/// Everything a strategy may look at
#[derive(Debug, Clone)]
pub struct MatchRequest<'a> {
    /// Trimmed, non-blank user values; `StartsWith` uses only the first
    pub values: &'a [String],
    pub case_insensitive: bool,
    pub language: Option<&'a str>,
    /// Binds `?pMatch` to the label property and its sub-properties
    pub match_term_binding: GraphPattern,
}

/// Outcome of a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatch {
    /// `None` when sanitization left nothing to search for
    pub pattern: Option<GraphPattern>,
    pub priority: Priority,
    pub prefixes: Vec<Prefix>,
}

impl LabelMatch {
    fn primary(pattern: Option<GraphPattern>, prefixes: Vec<Prefix>) -> Self {
        Self {
            pattern,
            priority: Priority::Primary,
            prefixes,
        }
    }

    fn secondary(pattern: Option<GraphPattern>) -> Self {
        Self {
            pattern,
            priority: Priority::Secondary,
            prefixes: Vec::new(),
        }
    }
}

pub type MatchStrategy = fn(&MatchRequest<'_>) -> LabelMatch;

/// Strategy table keyed by backend and match style
pub fn strategy(engine: FtsEngine, style: MatchStyle) -> MatchStrategy {
    use FtsEngine as E;
    use MatchStyle as S;

    match (engine, style) {
        (E::None, S::Exact) => no_fts_exact,
        (E::None, S::Matching) | (E::None, S::Contains) => no_fts_contains,
        (E::None, S::StartsWith) => no_fts_starts_with,

        (E::Lucene, S::Exact) => lucene_exact,
        (E::Lucene, S::Matching) => lucene_matching,
        (E::Lucene, S::Contains) => lucene_contains,
        (E::Lucene, S::StartsWith) => lucene_starts_with,

        (E::Fuseki, S::Exact) => fuseki_exact,
        (E::Fuseki, S::Matching) => fuseki_matching,
        (E::Fuseki, S::Contains) => fuseki_contains,
        (E::Fuseki, S::StartsWith) => fuseki_starts_with,

        (E::Virtuoso, S::Exact) => virtuoso_exact,
        (E::Virtuoso, S::Matching) => virtuoso_matching,
        (E::Virtuoso, S::Contains) => virtuoso_contains,
        (E::Virtuoso, S::StartsWith) => virtuoso_starts_with,

        (E::Wikidata, S::Exact) => wikidata_exact,
        (E::Wikidata, S::Matching) => wikidata_matching,
        (E::Wikidata, S::Contains) => wikidata_contains,
        (E::Wikidata, S::StartsWith) => wikidata_starts_with,
    }
}

// Regex post-filters

/// `regex` must match `?m`, which must carry the default language or no language at all
pub fn match_filter(regex: String, case_insensitive: bool, language: Option<&str>) -> Expression {
    let untagged = Expression::regex(var::MATCH_TERM, regex.clone(), case_insensitive)
        .and(Expression::lang_matches(var::MATCH_TERM, ""));

    match language {
        Some(language) => Expression::regex(var::MATCH_TERM, regex, case_insensitive)
            .and(Expression::lang_matches(var::MATCH_TERM, language))
            .or(untagged),
        None => untagged,
    }
}

fn equals_filter(req: &MatchRequest<'_>, value: &str) -> Expression {
    match_filter(format!("^{}$", as_regexp(value)), req.case_insensitive, req.language)
}

fn starts_with_filter(req: &MatchRequest<'_>, value: &str) -> Expression {
    match_filter(format!("^{}", as_regexp(value)), req.case_insensitive, req.language)
}

fn contains_filter(req: &MatchRequest<'_>, value: &str) -> Expression {
    match_filter(format!(".*{}.*", as_regexp(value)), req.case_insensitive, req.language)
}

// Shared building blocks

fn subject() -> Term {
    Term::var(var::SUBJECT)
}

/// `?subj ?pMatch ?m`
fn subject_match_term() -> GraphPattern {
    subject().has(PropertyPath::var(var::MATCH_TERM_PROPERTY), Term::var(var::MATCH_TERM))
}

/// Binding plus a union over the per-value branches; `None` if every value was dropped
fn union_of_values<F>(req: &MatchRequest<'_>, branch: F) -> Option<GraphPattern>
where
    F: Fn(&str) -> Option<GraphPattern>,
{
    let branches: Vec<GraphPattern> = req.values.iter().filter_map(|v| branch(v.as_str())).collect();
    if branches.is_empty() {
        return None;
    }
    Some(GraphPattern::and(vec![
        req.match_term_binding.clone(),
        GraphPattern::union(branches),
    ]))
}

fn single_value<F>(req: &MatchRequest<'_>, branch: F) -> Option<GraphPattern>
where
    F: Fn(&str) -> Option<GraphPattern>,
{
    let value = req.values.first()?;
    let pattern = branch(value.as_str())?;
    Some(GraphPattern::and(vec![req.match_term_binding.clone(), pattern]))
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn lower_if_insensitive(req: &MatchRequest<'_>, value: String) -> String {
    if req.case_insensitive {
        value.to_lowercase()
    } else {
        value
    }
}

/// Users mark a finished word with a trailing space
fn word_complete(raw: &str) -> bool {
    raw.ends_with(' ')
}

// No FTS: VALUES for exact matches, regex scans otherwise

fn no_fts_exact(req: &MatchRequest<'_>) -> LabelMatch {
    let mut literals = Vec::new();
    for value in req.values {
        let Some(sanitized) = non_blank(sanitize_no_fts(value)) else {
            continue;
        };
        if let Some(language) = req.language {
            literals.push(Term::lang_literal(sanitized.clone(), language));
        }
        literals.push(Term::literal(sanitized));
    }

    let pattern = (!literals.is_empty()).then(|| {
        GraphPattern::and(vec![
            req.match_term_binding.clone(),
            GraphPattern::values(var::MATCH_TERM, literals),
            subject_match_term(),
        ])
    });

    // No regex involved, so this stays a selective condition
    LabelMatch::primary(pattern, Vec::new())
}

fn no_fts_contains(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        Some(subject_match_term().filter(contains_filter(req, value)))
    });
    LabelMatch::secondary(pattern)
}

fn no_fts_starts_with(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = single_value(req, |value| {
        Some(subject_match_term().filter(starts_with_filter(req, value)))
    });
    LabelMatch::secondary(pattern)
}

// Lucene sidecar index

/// `?subj search:matches [ search:query "q" ; search:property ?pMatch ] . ?subj ?pMatch ?m .`
fn lucene_hit(query: String) -> GraphPattern {
    let node = Term::Node(vec![
        (PropertyPath::prefixed("search:query"), Term::literal(query)),
        (
            PropertyPath::prefixed("search:property"),
            Term::var(var::MATCH_TERM_PROPERTY),
        ),
    ]);
    GraphPattern::and(vec![
        subject().has(lucene::MATCHES, node),
        subject_match_term(),
    ])
}

fn lucene_exact(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(lucene_hit(sanitized).filter(equals_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![LUCENE_PREFIX])
}

fn lucene_matching(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        let fuzzy = non_blank(convert_to_fuzzy_matching_query(&sanitized))?;
        Some(GraphPattern::group(vec![lucene_hit(fuzzy)]))
    });
    LabelMatch::primary(pattern, vec![LUCENE_PREFIX])
}

fn lucene_contains(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(lucene_hit(sanitized).filter(contains_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![LUCENE_PREFIX])
}

fn lucene_starts_with(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = single_value(req, |value| {
        let mut query = non_blank(sanitize_fts(value))?;
        if !word_complete(value) {
            query.push('*');
        }
        Some(lucene_hit(query).filter(starts_with_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![LUCENE_PREFIX])
}

// Jena text index

/// `( ?subj ?sc ?m ) text:query ( ?pMatch "q" ) .`
fn fuseki_hit(query: String) -> GraphPattern {
    Term::Collection(vec![
        subject(),
        Term::var(var::SCORE),
        Term::var(var::MATCH_TERM),
    ])
    .has(
        PropertyPath::prefixed("text:query"),
        Term::Collection(vec![
            Term::var(var::MATCH_TERM_PROPERTY),
            Term::literal(query),
        ]),
    )
}

fn fuseki_exact(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let query = non_blank(lower_if_insensitive(req, sanitize_fts(value)))?;
        Some(fuseki_hit(query).filter(equals_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![FUSEKI_PREFIX])
}

fn fuseki_matching(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(lower_if_insensitive(req, sanitize_fts(value)))?;
        let fuzzy = non_blank(convert_to_fuzzy_matching_query(&sanitized))?;
        Some(GraphPattern::group(vec![fuseki_hit(fuzzy)]))
    });
    LabelMatch::primary(pattern, vec![FUSEKI_PREFIX])
}

fn fuseki_contains(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let query = non_blank(lower_if_insensitive(req, sanitize_fts(value)))?;
        Some(fuseki_hit(query).filter(contains_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![FUSEKI_PREFIX])
}

fn fuseki_starts_with(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = single_value(req, |value| {
        let mut query = non_blank(lower_if_insensitive(req, sanitize_fts(value)))?;
        if !word_complete(value) {
            query.push('*');
        }
        Some(fuseki_hit(query).filter(starts_with_filter(req, value)))
    });
    LabelMatch::primary(pattern, vec![FUSEKI_PREFIX])
}

// Virtuoso text index

/// `?subj ?pMatch ?m . ?m <bif:contains> "\"q\"" .`
fn virtuoso_hit(phrase: &str) -> GraphPattern {
    GraphPattern::and(vec![
        subject_match_term(),
        Term::var(var::MATCH_TERM).has(virtuoso::CONTAINS, Term::literal(format!("\"{}\"", phrase))),
    ])
}

/// Phrase for prefix search: the last token is wildcarded when it has at least 4
/// characters and dropped otherwise, unless the word is already complete
pub fn virtuoso_prefix_phrase(raw: &str) -> String {
    let sanitized = sanitize_fts(raw);
    if word_complete(raw) || sanitized.is_empty() {
        return sanitized;
    }

    let mut tokens: Vec<String> = sanitized.split(' ').map(str::to_string).collect();
    if let Some(last) = tokens.pop() {
        if last.chars().count() >= 4 {
            tokens.push(format!("{}*", last));
        }
    }
    tokens.join(" ")
}

fn virtuoso_exact(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(virtuoso_hit(&sanitized).filter(equals_filter(req, value)))
    });
    LabelMatch::primary(pattern, Vec::new())
}

fn virtuoso_matching(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(GraphPattern::group(vec![virtuoso_hit(&sanitized)]))
    });
    LabelMatch::primary(pattern, Vec::new())
}

fn virtuoso_contains(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(virtuoso_hit(&sanitized).filter(contains_filter(req, value)))
    });
    LabelMatch::primary(pattern, Vec::new())
}

fn virtuoso_starts_with(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = single_value(req, |value| {
        let phrase = non_blank(virtuoso_prefix_phrase(value))?;
        Some(virtuoso_hit(&phrase).filter(starts_with_filter(req, value)))
    });
    LabelMatch::primary(pattern, Vec::new())
}

// Wikidata entity search

fn wikidata_prefixes() -> Vec<Prefix> {
    vec![WIKIBASE_PREFIX, BD_PREFIX, MWAPI_PREFIX]
}

/// `SERVICE wikibase:mwapi { ... }` binding `?subj` to the entities found by the search API
fn entity_search(query: String, language: &str) -> GraphPattern {
    let param = || Term::prefixed("bd:serviceParam");
    GraphPattern::Service {
        endpoint: Term::prefixed("wikibase:mwapi"),
        body: vec![
            param().has(PropertyPath::prefixed("wikibase:api"), Term::literal("EntitySearch")),
            param().has(
                PropertyPath::prefixed("wikibase:endpoint"),
                Term::literal(wikidata::ENDPOINT),
            ),
            param().has(PropertyPath::prefixed("mwapi:search"), Term::literal(query)),
            param().has(PropertyPath::prefixed("mwapi:language"), Term::literal(language)),
            subject().has(
                PropertyPath::prefixed("wikibase:apiOutputItem"),
                Term::prefixed("mwapi:item"),
            ),
        ],
    }
}

fn wikidata_language<'a>(req: &MatchRequest<'a>) -> &'a str {
    req.language.unwrap_or(wikidata::DEFAULT_LANGUAGE)
}

fn wikidata_hit(req: &MatchRequest<'_>, query: String, filter: Option<Expression>) -> GraphPattern {
    let label = match filter {
        Some(filter) => subject_match_term().filter(filter),
        None => GraphPattern::group(vec![subject_match_term()]),
    };
    GraphPattern::group(vec![entity_search(query, wikidata_language(req)), label])
}

fn wikidata_exact(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(wikidata_hit(req, sanitized, Some(equals_filter(req, value))))
    });
    LabelMatch::primary(pattern, wikidata_prefixes())
}

fn wikidata_matching(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(wikidata_hit(req, sanitized, None))
    });
    LabelMatch::primary(pattern, wikidata_prefixes())
}

fn wikidata_contains(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = union_of_values(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(wikidata_hit(req, sanitized, Some(contains_filter(req, value))))
    });
    LabelMatch::primary(pattern, wikidata_prefixes())
}

fn wikidata_starts_with(req: &MatchRequest<'_>) -> LabelMatch {
    let pattern = single_value(req, |value| {
        let sanitized = non_blank(sanitize_fts(value))?;
        Some(wikidata_hit(req, sanitized, Some(starts_with_filter(req, value))))
    });
    LabelMatch::primary(pattern, wikidata_prefixes())
}
