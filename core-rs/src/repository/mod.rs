/**
 * Repository connection seam
 *
 * The query builder only needs to prepare a SELECT query, toggle inference and iterate the
 * solution rows. Everything else about the triple store stays behind these traits.
 */

pub mod store;

pub use store::StoreRepository;

use crate::errors::Result;

/// A connection able to prepare SELECT queries
pub trait RepositoryConnection {
    fn prepare_query(&self, query: &str) -> Result<Box<dyn PreparedQuery + '_>>;
}

pub type BindingIter<'a> = Box<dyn Iterator<Item = Result<BindingSet>> + 'a>;

pub trait PreparedQuery {
    fn set_include_inferred(&mut self, include_inferred: bool);

    fn evaluate(&self) -> Result<BindingIter<'_>>;
}

/// Value bound to a solution variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Iri(String),
    BlankNode(String),
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl BoundValue {
    pub fn literal(value: impl Into<String>) -> Self {
        BoundValue::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        BoundValue::Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Lexical form, IRI or blank node id without any syntax
    pub fn string_value(&self) -> &str {
        match self {
            BoundValue::Iri(iri) => iri,
            BoundValue::BlankNode(id) => id,
            BoundValue::Literal { value, .. } => value,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            BoundValue::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }
}

/// One solution row; unbound variables are absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    bindings: Vec<(String, BoundValue)>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: impl Into<String>, value: BoundValue) -> Self {
        self.insert(variable, value);
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: BoundValue) {
        let variable = variable.into();
        match self.bindings.iter_mut().find(|(name, _)| *name == variable) {
            Some((_, existing)) => *existing = value,
            None => self.bindings.push((variable, value)),
        }
    }

    pub fn get(&self, variable: &str) -> Option<&BoundValue> {
        self.bindings
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
