/**
 * builder.rs
 * Fluent SPARQL query builder over a knowledge base
 *
 * A builder is created for one mode, collects primary conditions, label matching and
 * optional retrievals, and ends in exactly one terminal operation:
 *
 * ```ignore
 * let classes = SparqlQueryBuilder::for_classes(&kb)
 *     .with_label_starting_with("Gob")?
 *     .retrieve_label()
 *     .retrieve_description()
 *     .as_handles(&repo, false)?;
 * ```
 */

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::time::Instant;
use tracing::{debug, trace};

use super::assemble::{PatternAccumulator, Priority};
use super::extract::extract_handle;
use super::fts::{self, FtsEngine, MatchRequest, MatchStyle};
use super::handle::KbHandle;
use super::mode::{matching_domain_pattern, Mode, ModeResolver};
use super::pattern::{var, Expression, GraphPattern, PropertyPath, Term};
use super::reduce::reduce_redundant_results;
use super::sanitize::{checked_iri, is_searchable, trim_query_string};
use crate::errors::Result;
use crate::kb::KnowledgeBase;
use crate::repository::RepositoryConnection;
use crate::vocab::{fts as fts_iri, rdfs};

/// Flags threaded through the construction of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BuilderState {
    case_insensitive: bool,
    include_inferred: bool,
    limit_override: Option<usize>,
    /// Set once the subject is bound by identity or hierarchy; label matching then uses
    /// plain regex filters instead of a text index
    force_disable_fts: bool,
    /// A label-matching condition already binds `?m`
    label_implicitly_retrieved: bool,
    /// Sanitization left nothing to search for; terminal operations return nothing
    return_empty_result: bool,
}

#[derive(Debug, Clone)]
pub struct SparqlQueryBuilder<'kb> {
    kb: &'kb KnowledgeBase,
    mode: Mode,
    patterns: PatternAccumulator,
    state: BuilderState,
}

impl<'kb> SparqlQueryBuilder<'kb> {
    fn new(kb: &'kb KnowledgeBase, mode: Mode) -> Self {
        // The entity search service never returns properties
        let force_disable_fts =
            mode == Mode::Property && kb.full_text_search.as_deref() == Some(fts_iri::WIKIDATA);

        let mut builder = Self {
            kb,
            mode,
            patterns: PatternAccumulator::new(),
            state: BuilderState {
                case_insensitive: !kb.case_sensitive,
                include_inferred: true,
                limit_override: None,
                force_disable_fts,
                label_implicitly_retrieved: false,
                return_empty_result: false,
            },
        };

        if let Some(restriction) = mode.resolver().type_restriction(kb) {
            builder.patterns.add_pattern(Priority::PrimaryRestriction, restriction);
        }

        builder
    }

    /// Anything: classes, instances and properties alike
    pub fn for_items(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, Mode::Item)
    }

    pub fn for_classes(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, Mode::Class)
    }

    pub fn for_instances(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, Mode::Instance)
    }

    pub fn for_properties(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, Mode::Property)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn kb(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    fn resolver(&self) -> &'static dyn ModeResolver {
        self.mode.resolver()
    }

    // Settings

    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.state.case_insensitive = !enabled;
        self
    }

    pub fn include_inferred(mut self, enabled: bool) -> Self {
        self.state.include_inferred = enabled;
        self
    }

    /// Override the knowledge base's result limit; 0 restores it
    pub fn limit(mut self, limit: usize) -> Self {
        self.state.limit_override = (limit > 0).then_some(limit);
        self
    }

    fn effective_limit(&self) -> usize {
        self.state.limit_override.unwrap_or(self.kb.max_results)
    }

    // Primary conditions

    /// Restrict to the given subjects; fails on anything that is not an absolute IRI
    pub fn with_identifier<S: AsRef<str>>(mut self, identifiers: &[S]) -> Result<Self> {
        self.state.force_disable_fts = true;

        if identifiers.is_empty() {
            self.state.return_empty_result = true;
            return Ok(self);
        }

        let values = identifiers
            .iter()
            .map(|id| checked_iri(id.as_ref()).map(Term::iri))
            .collect::<Result<Vec<_>>>()?;
        self.patterns
            .add_pattern(Priority::Primary, GraphPattern::values(var::SUBJECT, values));
        Ok(self)
    }

    /// Properties applicable to instances of the given class
    pub fn matching_domain(mut self, domain: &str) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = matching_domain_pattern(self.kb, checked_iri(domain)?);
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    pub fn roots(mut self) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = self.resolver().roots_pattern(self.kb)?;
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    pub fn ancestors_of(mut self, iri: &str) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = self.resolver().ancestors_pattern(self.kb, checked_iri(iri)?)?;
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    pub fn descendants_of(mut self, iri: &str) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = self.resolver().descendants_pattern(self.kb, checked_iri(iri)?)?;
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    pub fn children_of(mut self, iri: &str) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = self.resolver().children_pattern(self.kb, checked_iri(iri)?)?;
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    pub fn parents_of(mut self, iri: &str) -> Result<Self> {
        self.state.force_disable_fts = true;
        let pattern = self.resolver().parents_pattern(self.kb, checked_iri(iri)?)?;
        self.patterns.add_pattern(Priority::Primary, pattern);
        Ok(self)
    }

    // Label matching

    pub fn with_label_matching_exactly_any_of<S: AsRef<str>>(self, values: &[S]) -> Result<Self> {
        self.match_label(values, MatchStyle::Exact)
    }

    /// Fuzzy match through the text index; a substring match without one
    pub fn with_label_matching_any_of<S: AsRef<str>>(self, values: &[S]) -> Result<Self> {
        self.match_label(values, MatchStyle::Matching)
    }

    pub fn with_label_containing_any_of<S: AsRef<str>>(self, values: &[S]) -> Result<Self> {
        self.match_label(values, MatchStyle::Contains)
    }

    pub fn with_label_starting_with(self, prefix: &str) -> Result<Self> {
        self.match_label(&[prefix], MatchStyle::StartsWith)
    }

    fn fts_engine(&self) -> Result<FtsEngine> {
        if self.state.force_disable_fts {
            return Ok(FtsEngine::None);
        }
        FtsEngine::from_iri(self.kb.full_text_search.as_deref())
    }

    fn match_label<S: AsRef<str>>(mut self, values: &[S], style: MatchStyle) -> Result<Self> {
        let kb = self.kb;

        let values: Vec<String> = values
            .iter()
            .map(|value| trim_query_string(value.as_ref()))
            .filter(|value| is_searchable(value))
            .collect();

        if values.is_empty() {
            self.state.return_empty_result = true;
            return Ok(self);
        }

        let engine = self.fts_engine()?;

        let request = MatchRequest {
            values: &values,
            case_insensitive: self.state.case_insensitive,
            language: kb.default_language.as_deref(),
            match_term_binding: self.match_term_binding(),
        };
        let label_match = fts::strategy(engine, style)(&request);

        for prefix in label_match.prefixes {
            self.patterns.add_prefix(prefix);
        }
        match label_match.pattern {
            Some(pattern) => self.patterns.add_pattern(label_match.priority, pattern),
            None => self.state.return_empty_result = true,
        }

        self.patterns.add_projection(var::MATCH_TERM);
        self.state.label_implicitly_retrieved = true;

        Ok(self)
    }

    /// Binds `?pMatch` to the label property, every additional matching property, and their
    /// sub-properties
    fn match_term_binding(&self) -> GraphPattern {
        let resolver = self.resolver();
        let properties: Vec<&str> = iter::once(resolver.label_property(self.kb))
            .chain(resolver.additional_matching_properties(self.kb).iter().map(String::as_str))
            .collect();
        self.bind_sub_properties(var::MATCH_TERM_PROPERTY, &properties)
    }

    /// `{ VALUES ?v { <p> ... } } UNION { ?v subPropertyOf+ <p> } ...`
    ///
    /// Never empty, so `?v` is bound even when the store holds no triple about the
    /// properties themselves. A zero-length `subPropertyOf*` path gives no guarantee of that,
    /// and an unbound `?v` would match every predicate.
    fn bind_sub_properties(&self, variable: &str, properties: &[&str]) -> GraphPattern {
        let mut branches = vec![GraphPattern::values(
            variable,
            properties.iter().map(|property| Term::iri(*property)).collect(),
        )];
        branches.extend(properties.iter().map(|property| {
            Term::var(variable).has(
                PropertyPath::iri(&self.kb.mapping.subproperty_of).one_or_more(),
                Term::iri(*property),
            )
        }));
        GraphPattern::union(branches)
    }

    // Optional elements

    pub fn retrieve_label(mut self) -> Self {
        let kb = self.kb;
        let resolver = self.resolver();

        if !resolver.additional_matching_properties(kb).is_empty() {
            self.patterns.add_projection(var::PREF_LABEL);
            let binding = self.bind_sub_properties(var::PREF_LABEL_PROPERTY, &[resolver.label_property(kb)]);
            self.retrieve_optional(Some(binding), PropertyPath::var(var::PREF_LABEL_PROPERTY), var::PREF_LABEL);
        }

        if self.state.label_implicitly_retrieved {
            return self;
        }

        self.patterns.add_projection(var::MATCH_TERM);
        let binding = self.match_term_binding();
        self.retrieve_optional(Some(binding), PropertyPath::var(var::MATCH_TERM_PROPERTY), var::MATCH_TERM);

        self
    }

    pub fn retrieve_description(mut self) -> Self {
        self.patterns.add_projection(var::DESC_CANDIDATE);
        let property = self.resolver().description_property(self.kb);
        self.retrieve_optional(None, PropertyPath::iri(property), var::DESC_CANDIDATE);
        self
    }

    pub fn retrieve_domain_and_range(mut self) -> Self {
        self.patterns.add_projection(var::RANGE);
        self.patterns.add_projection(var::DOMAIN);

        let subject = || Term::var(var::SUBJECT);
        self.patterns.add_pattern(
            Priority::Secondary,
            GraphPattern::optional(subject().has(rdfs::RANGE, Term::var(var::RANGE))),
        );
        self.patterns.add_pattern(
            Priority::Secondary,
            GraphPattern::optional(subject().has(rdfs::DOMAIN, Term::var(var::DOMAIN))),
        );
        self
    }

    /// Optionally bind `?subj <path> ?variable` to an untagged literal or one in the default
    /// language. A single OPTIONAL holding a UNION keeps Virtuoso from dropping rows.
    ///
    /// A `binding` for a variable predicate goes inside the same OPTIONAL, so a subject
    /// without a matching triple yields one unbound row rather than one per bound predicate.
    fn retrieve_optional(&mut self, binding: Option<GraphPattern>, path: PropertyPath, variable: &str) {
        let triple = || Term::var(var::SUBJECT).has(path.clone(), Term::var(variable));

        let mut branches = vec![triple().filter(Expression::lang_matches(variable, ""))];
        if let Some(language) = &self.kb.default_language {
            branches.push(triple().filter(Expression::lang_matches(variable, language.as_str())));
        }

        let body = if branches.len() == 1 {
            branches.remove(0)
        } else {
            GraphPattern::union(branches)
        };
        let body = match binding {
            Some(binding) => match body {
                GraphPattern::Group(_) => GraphPattern::and(vec![binding, body]),
                body => GraphPattern::and(vec![binding, GraphPattern::group(vec![body])]),
            },
            None => body,
        };
        self.patterns.add_pattern(Priority::Secondary, GraphPattern::optional(body));
    }

    // Rendering

    /// The SELECT query as it would be sent; asks for twice the effective limit because each
    /// entity may come back once per label language
    pub fn select_query(&self) -> String {
        self.patterns.render_select(
            self.kb.default_dataset.as_deref(),
            self.effective_limit().saturating_mul(2),
        )
    }

    // Terminal operations

    /// All matching handles, deduplicated and sorted by display label
    pub fn as_handles(&self, conn: &dyn RepositoryConnection, all: bool) -> Result<Vec<KbHandle>> {
        let start = Instant::now();
        let query = self.select_query();
        let query_id = query_id(&query);
        trace!(query_id = %query_id, query = %query, "query.as_handles");

        if self.state.return_empty_result {
            debug!(query_id = %query_id, "query.skipped");
            return Ok(Vec::new());
        }

        let mut results = self.evaluate_list_query(conn, &query, all)?;
        results.sort_by_cached_key(|handle| handle.ui_label().to_lowercase());

        debug!(
            query_id = %query_id,
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query.as_handles.done"
        );
        Ok(results)
    }

    /// The first matching handle; limits the query to one result
    pub fn as_handle(&mut self, conn: &dyn RepositoryConnection, all: bool) -> Result<Option<KbHandle>> {
        let start = Instant::now();
        self.state.limit_override = Some(1);

        let query = self.select_query();
        let query_id = query_id(&query);
        trace!(query_id = %query_id, query = %query, "query.as_handle");

        if self.state.return_empty_result {
            debug!(query_id = %query_id, "query.skipped");
            return Ok(None);
        }

        let result = self.evaluate_list_query(conn, &query, all)?.into_iter().next();

        debug!(
            query_id = %query_id,
            found = result.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query.as_handle.done"
        );
        Ok(result)
    }

    /// Whether anything matches; limits the query to one result
    pub fn exists(&mut self, conn: &dyn RepositoryConnection, all: bool) -> Result<bool> {
        let start = Instant::now();
        self.state.limit_override = Some(1);

        let query = self.select_query();
        let query_id = query_id(&query);
        trace!(query_id = %query_id, query = %query, "query.exists");

        if self.state.return_empty_result {
            debug!(query_id = %query_id, "query.skipped");
            return Ok(false);
        }

        let result = !self.evaluate_list_query(conn, &query, all)?.is_empty();

        debug!(
            query_id = %query_id,
            result,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query.exists.done"
        );
        Ok(result)
    }

    fn evaluate_list_query(
        &self,
        conn: &dyn RepositoryConnection,
        query: &str,
        all: bool,
    ) -> Result<Vec<KbHandle>> {
        let mut prepared = conn.prepare_query(query).map_err(|e| e.while_running(query))?;
        prepared.set_include_inferred(self.state.include_inferred);

        let rows = prepared.evaluate().map_err(|e| e.while_running(query))?;
        let mut handles = Vec::new();
        for row in rows {
            let row = row.map_err(|e| e.while_running(query))?;
            if let Some(handle) = extract_handle(self.kb, self.mode, &row, all) {
                handles.push(handle);
            }
        }

        Ok(reduce_redundant_results(
            handles,
            self.kb.default_language.as_deref(),
            self.effective_limit(),
        ))
    }
}

/// Short id correlating the log lines of one query
fn query_id(query: &str) -> String {
    hex::encode(crc32fast::hash(query.as_bytes()).to_be_bytes())
}

// Two builders are interchangeable exactly when they send the same query text

impl PartialEq for SparqlQueryBuilder<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.select_query() == other.select_query()
    }
}

impl Eq for SparqlQueryBuilder<'_> {}

impl Hash for SparqlQueryBuilder<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.select_query().hash(state);
    }
}

impl fmt::Display for SparqlQueryBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.select_query())
    }
}
