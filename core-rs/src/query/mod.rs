/**
 * Query construction and execution
 *
 * Layers, bottom-up:
 * - `pattern`: SPARQL graph pattern model and rendering
 * - `sanitize`: user input cleanup
 * - `mode`: per-mode membership and hierarchy patterns
 * - `fts`: label matching per full-text search backend
 * - `assemble`: priority buckets and SELECT rendering
 * - `builder`: the fluent builder and its terminal operations
 * - `extract`, `reduce`: solution rows to deduplicated handles
 */

pub mod assemble;
pub mod builder;
pub mod extract;
pub mod fts;
pub mod handle;
pub mod mode;
pub mod pattern;
pub mod reduce;
pub mod sanitize;

pub use assemble::{PatternAccumulator, Priority};
pub use builder::SparqlQueryBuilder;
pub use fts::{FtsEngine, MatchStyle};
pub use handle::{KbHandle, MatchTerm};
pub use mode::{Mode, ModeResolver};
pub use pattern::{GraphPattern, Prefix, PropertyPath, Term};
pub use reduce::reduce_redundant_results;
