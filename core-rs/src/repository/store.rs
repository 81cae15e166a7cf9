/**
 * store.rs
 * In-memory repository backed by an oxigraph store
 *
 * Oxigraph has no reasoner, so the include-inferred switch is recorded and ignored.
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::Term as RdfTerm;
use oxigraph::sparql::{QueryResults, QuerySolution};
use oxigraph::store::Store;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use super::{BindingIter, BindingSet, BoundValue, PreparedQuery, RepositoryConnection};
use crate::errors::{KbqError, Result};

pub struct StoreRepository {
    store: Store,
}

impl StoreRepository {
    pub fn new() -> Result<Self> {
        let store = Store::new().map_err(|e| KbqError::Repository(e.to_string()))?;
        Ok(Self { store })
    }

    /// Create a repository holding the given Turtle document
    pub fn from_turtle(data: &str) -> Result<Self> {
        let repo = Self::new()?;
        repo.load_turtle(data)?;
        Ok(repo)
    }

    pub fn load_turtle(&self, data: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfFormat::Turtle, data.as_bytes())
            .map_err(|e| KbqError::Repository(e.to_string()))
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KbqError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        self.load_turtle(&content)
            .map_err(|e| KbqError::Repository(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "repository.load_file");
        Ok(())
    }

    /// Load a Turtle file, or every `.ttl` file below a directory. Returns the file count.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if path.is_file() {
            self.load_file(path)?;
            return Ok(1);
        }
        if !path.exists() {
            return Err(KbqError::FileNotFound(path.display().to_string()));
        }

        let mut loaded = 0;
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| KbqError::Repository(e.to_string()))?;
            let is_turtle = entry.path().extension().map_or(false, |ext| ext == "ttl");
            if entry.file_type().is_file() && is_turtle {
                self.load_file(entry.path())?;
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len().map_err(|e| KbqError::Repository(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty().map_err(|e| KbqError::Repository(e.to_string()))
    }
}

impl RepositoryConnection for StoreRepository {
    fn prepare_query(&self, query: &str) -> Result<Box<dyn PreparedQuery + '_>> {
        Ok(Box::new(StoreQuery {
            store: &self.store,
            query: query.to_string(),
            include_inferred: true,
        }))
    }
}

struct StoreQuery<'a> {
    store: &'a Store,
    query: String,
    include_inferred: bool,
}

impl PreparedQuery for StoreQuery<'_> {
    fn set_include_inferred(&mut self, include_inferred: bool) {
        self.include_inferred = include_inferred;
    }

    fn evaluate(&self) -> Result<BindingIter<'_>> {
        let results = self
            .store
            .query(self.query.as_str())
            .map_err(|e| KbqError::Repository(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => Ok(Box::new(solutions.map(|solution| {
                solution
                    .map(|s| to_binding_set(&s))
                    .map_err(|e| KbqError::Repository(e.to_string()))
            }))),
            QueryResults::Boolean(_) | QueryResults::Graph(_) => Err(KbqError::Repository(
                "Only SELECT queries are supported".to_string(),
            )),
        }
    }
}

fn to_binding_set(solution: &QuerySolution) -> BindingSet {
    let mut bindings = BindingSet::new();
    for (variable, term) in solution.iter() {
        if let Some(value) = to_bound_value(term) {
            bindings.insert(variable.as_str(), value);
        }
    }
    bindings
}

fn to_bound_value(term: &RdfTerm) -> Option<BoundValue> {
    match term {
        RdfTerm::NamedNode(node) => Some(BoundValue::Iri(node.as_str().to_string())),
        RdfTerm::BlankNode(node) => Some(BoundValue::BlankNode(node.as_str().to_string())),
        RdfTerm::Literal(literal) => Some(BoundValue::Literal {
            value: literal.value().to_string(),
            language: literal.language().map(str::to_string),
            datatype: Some(literal.datatype().as_str().to_string()),
        }),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
