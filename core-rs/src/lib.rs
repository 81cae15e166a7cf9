//! # KBQ Core - Knowledge Base Query Builder
//!
//! Translates search intents ("classes whose label starts with X", "children of Y",
//! "properties applicable to Z") into SPARQL SELECT queries and turns the solutions into
//! deduplicated result handles.
//!
//! ## Key Features
//!
//! - One fluent builder per entity kind: items, classes, instances, properties
//! - Hierarchy traversal: roots, ancestors, descendants, parents, children
//! - Label matching through pluggable full-text search backends (none, Lucene sidecar,
//!   Jena text, Virtuoso, Wikidata entity search) behind one interface
//! - Language-aware label and description retrieval with result reduction
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ KnowledgeBase│──▶│ SparqlQuery    │──▶│ Repository       │
//! │ (YAML config)│   │ Builder        │   │ Connection       │
//! └──────────────┘   │  mode resolver │   │  (oxigraph store)│
//!                    │  fts strategy  │   └────────┬─────────┘
//!                    │  assembler     │            │ bindings
//!                    └───────▲────────┘            ▼
//!                            │            extract ─▶ reduce ─▶ KbHandle
//! ```

pub mod errors;
pub mod kb;
pub mod query;
pub mod repository;
pub mod vocab;

pub use errors::{KbqError, Result};
pub use kb::{KnowledgeBase, KnowledgeBaseAccess, KnowledgeBaseMapping, KnowledgeBaseProfile, RepositoryKind};
pub use query::{FtsEngine, KbHandle, MatchStyle, MatchTerm, Mode, SparqlQueryBuilder};
pub use repository::{BindingSet, BoundValue, PreparedQuery, RepositoryConnection, StoreRepository};

/// Version of the query builder
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
