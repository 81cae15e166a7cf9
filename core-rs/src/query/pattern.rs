//! Graph pattern AST and its rendering to SPARQL text.
//!
//! Patterns are plain values; the builder composes them and the assembler renders the final
//! SELECT. Rendering is deterministic: the same pattern tree always yields the same text.
//!
//! | Variant | Renders as |
//! |---------|------------|
//! | `Triple` | `s p o .` |
//! | `Values` | `VALUES ?v { ... }` |
//! | `And` | members spliced into the enclosing group |
//! | `Group` | `{ ... }` |
//! | `Union` | `{ ... } UNION { ... }` |
//! | `Optional` | `OPTIONAL { ... }` |
//! | `Filter` | `FILTER (...)` |
//! | `NotExists` | `FILTER NOT EXISTS { ... }` |
//! | `Service` | `SERVICE <iri> { ... }` |

use std::fmt::{self, Write as _};

/// Variable names shared by every generated query
pub mod var {
    pub const SUBJECT: &str = "subj";
    pub const MATCH_TERM_PROPERTY: &str = "pMatch";
    pub const PREF_LABEL_PROPERTY: &str = "pPrefLabel";
    pub const PREF_LABEL: &str = "l";
    pub const MATCH_TERM: &str = "m";
    pub const SCORE: &str = "sc";
    pub const DESCRIPTION: &str = "d";
    pub const DESC_CANDIDATE: &str = "dc";
    pub const RANGE: &str = "range";
    pub const DOMAIN: &str = "domain";
}

/// A namespace prefix declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub label: &'static str,
    pub namespace: &'static str,
}

impl Prefix {
    pub const fn new(label: &'static str, namespace: &'static str) -> Self {
        Self { label, namespace }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PREFIX {}: <{}>", self.label, self.namespace)
    }
}

/// A node in subject or object position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Var(String),
    Iri(String),
    /// Prefixed name; the prefix must be declared by whoever adds the pattern
    Prefixed(String),
    Literal {
        value: String,
        language: Option<String>,
    },
    /// Anonymous blank node `[]`
    Anon,
    /// Blank node property list `[ p o ; p o ]`
    Node(Vec<(PropertyPath, Term)>),
    /// RDF collection `( a b c )`
    Collection(Vec<Term>),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Var(name.to_string())
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn prefixed(name: impl Into<String>) -> Self {
        Term::Prefixed(name.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            language: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            language: Some(language.into()),
        }
    }

    /// Triple with this term as subject
    pub fn has(self, path: impl Into<PropertyPath>, object: Term) -> GraphPattern {
        GraphPattern::Triple(TriplePattern {
            subject: self,
            path: path.into(),
            object,
        })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "?{}", name),
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Prefixed(name) => f.write_str(name),
            Term::Literal { value, language } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                if let Some(language) = language {
                    write!(f, "@{}", language)?;
                }
                Ok(())
            }
            Term::Anon => f.write_str("[]"),
            Term::Node(properties) => {
                f.write_str("[ ")?;
                for (i, (path, object)) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ; ")?;
                    }
                    write!(f, "{} {}", path, object)?;
                }
                f.write_str(" ]")
            }
            Term::Collection(items) => {
                f.write_str("(")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                f.write_str(" )")
            }
        }
    }
}

/// Escape a string for use inside a double-quoted SPARQL literal
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Predicate position: a link, a variable, or a path over links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    Link(Term),
    Sequence(Vec<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
}

impl PropertyPath {
    pub fn iri(iri: impl Into<String>) -> Self {
        PropertyPath::Link(Term::iri(iri))
    }

    pub fn var(name: &str) -> Self {
        PropertyPath::Link(Term::var(name))
    }

    pub fn prefixed(name: impl Into<String>) -> Self {
        PropertyPath::Link(Term::prefixed(name))
    }

    pub fn sequence(steps: Vec<PropertyPath>) -> Self {
        PropertyPath::Sequence(steps)
    }

    pub fn zero_or_more(self) -> Self {
        PropertyPath::ZeroOrMore(Box::new(self))
    }

    pub fn one_or_more(self) -> Self {
        PropertyPath::OneOrMore(Box::new(self))
    }

    fn fmt_step(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Sequence(_) => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl From<&str> for PropertyPath {
    fn from(iri: &str) -> Self {
        PropertyPath::iri(iri)
    }
}

impl From<&String> for PropertyPath {
    fn from(iri: &String) -> Self {
        PropertyPath::iri(iri.as_str())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Link(term) => write!(f, "{}", term),
            PropertyPath::Sequence(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    step.fmt_step(f)?;
                }
                Ok(())
            }
            PropertyPath::ZeroOrMore(path) => {
                path.fmt_step(f)?;
                f.write_str("*")
            }
            PropertyPath::OneOrMore(path) => {
                path.fmt_step(f)?;
                f.write_str("+")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Term,
    pub path: PropertyPath,
    pub object: Term,
}

/// Filter expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Regex {
        var: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// `LANGMATCHES(LANG(?var), "range")`; an empty range only matches untagged literals
    LangMatches { var: String, range: String },
    NotEqual(String, String),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

impl Expression {
    pub fn regex(var: &str, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Expression::Regex {
            var: var.to_string(),
            pattern: pattern.into(),
            case_insensitive,
        }
    }

    pub fn lang_matches(var: &str, range: impl Into<String>) -> Self {
        Expression::LangMatches {
            var: var.to_string(),
            range: range.into(),
        }
    }

    pub fn not_equal(left: &str, right: &str) -> Self {
        Expression::NotEqual(left.to_string(), right.to_string())
    }

    pub fn and(self, other: Expression) -> Self {
        Expression::And(vec![self, other])
    }

    pub fn or(self, other: Expression) -> Self {
        Expression::Or(vec![self, other])
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Regex {
                var,
                pattern,
                case_insensitive,
            } => {
                write!(f, "REGEX(?{}, \"{}\"", var, escape_literal(pattern))?;
                if *case_insensitive {
                    f.write_str(", \"i\"")?;
                }
                f.write_str(")")
            }
            Expression::LangMatches { var, range } => {
                write!(f, "LANGMATCHES(LANG(?{}), \"{}\")", var, escape_literal(range))
            }
            Expression::NotEqual(left, right) => write!(f, "?{} != ?{}", left, right),
            Expression::And(operands) => fmt_operands(f, operands, " && "),
            Expression::Or(operands) => fmt_operands(f, operands, " || "),
        }
    }
}

fn fmt_operands(f: &mut fmt::Formatter<'_>, operands: &[Expression], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(op)?;
        }
        write!(f, "{}", operand)?;
    }
    f.write_str(")")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphPattern {
    Triple(TriplePattern),
    Values { var: String, values: Vec<Term> },
    And(Vec<GraphPattern>),
    Group(Vec<GraphPattern>),
    Union(Vec<GraphPattern>),
    Optional(Box<GraphPattern>),
    Filter(Expression),
    NotExists(Box<GraphPattern>),
    Service { endpoint: Term, body: Vec<GraphPattern> },
}

impl GraphPattern {
    pub fn and(patterns: Vec<GraphPattern>) -> Self {
        GraphPattern::And(patterns)
    }

    pub fn group(patterns: Vec<GraphPattern>) -> Self {
        GraphPattern::Group(patterns)
    }

    pub fn union(patterns: Vec<GraphPattern>) -> Self {
        GraphPattern::Union(patterns)
    }

    pub fn optional(pattern: GraphPattern) -> Self {
        GraphPattern::Optional(Box::new(pattern))
    }

    pub fn values(var: &str, values: Vec<Term>) -> Self {
        GraphPattern::Values {
            var: var.to_string(),
            values,
        }
    }

    pub fn not_exists(pattern: GraphPattern) -> Self {
        GraphPattern::NotExists(Box::new(pattern))
    }

    /// Scope a filter to this pattern by placing both in one group
    pub fn filter(self, expression: Expression) -> Self {
        match self {
            GraphPattern::Group(mut patterns) => {
                patterns.push(GraphPattern::Filter(expression));
                GraphPattern::Group(patterns)
            }
            pattern => GraphPattern::Group(vec![pattern, GraphPattern::Filter(expression)]),
        }
    }

    /// Scope a `FILTER NOT EXISTS` to this pattern
    pub fn filter_not_exists(self, pattern: GraphPattern) -> Self {
        match self {
            GraphPattern::Group(mut patterns) => {
                patterns.push(GraphPattern::not_exists(pattern));
                GraphPattern::Group(patterns)
            }
            this => GraphPattern::Group(vec![this, GraphPattern::not_exists(pattern)]),
        }
    }

    /// Render as members of an enclosing group
    pub fn render(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            GraphPattern::Triple(triple) => {
                let _ = writeln!(out, "{}{} {} {} .", pad, triple.subject, triple.path, triple.object);
            }
            GraphPattern::Values { var, values } => {
                let _ = write!(out, "{}VALUES ?{} {{", pad, var);
                for value in values {
                    let _ = write!(out, " {}", value);
                }
                out.push_str(" }\n");
            }
            GraphPattern::And(patterns) => {
                for pattern in patterns {
                    pattern.render(out, indent);
                }
            }
            GraphPattern::Group(_) => self.render_braced(out, indent),
            GraphPattern::Union(patterns) => {
                if patterns.is_empty() {
                    let _ = writeln!(out, "{}{{}}", pad);
                }
                for (i, pattern) in patterns.iter().enumerate() {
                    if i > 0 {
                        let _ = writeln!(out, "{}UNION", pad);
                    }
                    pattern.render_braced(out, indent);
                }
            }
            GraphPattern::Optional(pattern) => {
                let _ = writeln!(out, "{}OPTIONAL {{", pad);
                pattern.render_body(out, indent + 1);
                let _ = writeln!(out, "{}}}", pad);
            }
            GraphPattern::Filter(expression) => {
                let _ = writeln!(out, "{}FILTER ({})", pad, expression);
            }
            GraphPattern::NotExists(pattern) => {
                let _ = writeln!(out, "{}FILTER NOT EXISTS {{", pad);
                pattern.render_body(out, indent + 1);
                let _ = writeln!(out, "{}}}", pad);
            }
            GraphPattern::Service { endpoint, body } => {
                let _ = writeln!(out, "{}SERVICE {} {{", pad, endpoint);
                for pattern in body {
                    pattern.render(out, indent + 1);
                }
                let _ = writeln!(out, "{}}}", pad);
            }
        }
    }

    /// Render wrapped in its own group braces
    pub fn render_braced(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = writeln!(out, "{}{{", pad);
        self.render_body(out, indent + 1);
        let _ = writeln!(out, "{}}}", pad);
    }

    /// Render the contents that belong between a pair of braces
    fn render_body(&self, out: &mut String, indent: usize) {
        match self {
            GraphPattern::Group(patterns) => {
                for pattern in patterns {
                    pattern.render(out, indent);
                }
            }
            pattern => pattern.render(out, indent),
        }
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, 0);
        f.write_str(out.trim_end())
    }
}
