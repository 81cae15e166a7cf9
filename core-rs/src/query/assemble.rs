/**
 * assemble.rs
 * Priority buckets of graph patterns and their rendering into one SELECT query
 *
 * Layout of the rendered query:
 * ```text
 * PREFIX ...
 * SELECT DISTINCT <projections> ?subj
 * FROM <dataset>
 * WHERE {
 *   {
 *     <primary patterns>
 *     <primary restrictions>
 *   }
 *   <secondary patterns>
 * }
 * LIMIT <2 x effective limit>
 * ```
 */

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::pattern::{var, GraphPattern, Prefix};

/// Assembly order of a pattern; declaration order is the rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Selective, identity-defining conditions
    Primary,
    /// Kind filters such as "is a class"
    PrimaryRestriction,
    /// Enrichments evaluated after the candidates are known
    Secondary,
}

/// Append-only pattern buckets plus the prefixes and projections they require
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternAccumulator {
    buckets: BTreeMap<Priority, Vec<GraphPattern>>,
    prefixes: Vec<Prefix>,
    projections: Vec<String>,
}

impl PatternAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pattern(&mut self, priority: Priority, pattern: GraphPattern) {
        self.buckets.entry(priority).or_default().push(pattern);
    }

    pub fn add_prefix(&mut self, prefix: Prefix) {
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    pub fn add_projection(&mut self, variable: &str) {
        if variable != var::SUBJECT && !self.projections.iter().any(|p| p == variable) {
            self.projections.push(variable.to_string());
        }
    }

    pub fn patterns(&self, priority: Priority) -> &[GraphPattern] {
        self.buckets.get(&priority).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    /// Requested projections; `?subj` is implied and always rendered last
    pub fn projections(&self) -> &[String] {
        &self.projections
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Render the SELECT query. `limit` is sent as-is; callers pass the doubled limit.
    pub fn render_select(&self, dataset: Option<&str>, limit: usize) -> String {
        let mut query = String::new();

        for prefix in &self.prefixes {
            let _ = writeln!(query, "{}", prefix);
        }

        query.push_str("SELECT DISTINCT");
        for projection in &self.projections {
            let _ = write!(query, " ?{}", projection);
        }
        let _ = writeln!(query, " ?{}", var::SUBJECT);

        if let Some(dataset) = dataset {
            let _ = writeln!(query, "FROM <{}>", dataset);
        }

        query.push_str("WHERE {\n");

        // Restrictive part first, isolated in one group
        query.push_str("  {\n");
        for priority in [Priority::Primary, Priority::PrimaryRestriction] {
            for pattern in self.patterns(priority) {
                pattern.render(&mut query, 2);
            }
        }
        query.push_str("  }\n");

        for pattern in self.patterns(Priority::Secondary) {
            pattern.render(&mut query, 1);
        }

        query.push_str("}\n");
        let _ = write!(query, "LIMIT {}", limit);

        query
    }
}
