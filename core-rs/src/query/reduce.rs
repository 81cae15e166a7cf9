/**
 * reduce.rs
 * Collapse the per-language rows of one entity into a single handle
 */

use std::collections::HashMap;
use tracing::trace;

use super::handle::KbHandle;

/// Keep one handle per identifier, in first-seen order.
///
/// A later handle replaces the kept one when the kept one has no name and the later one
/// does, or when the later one carries exactly the default language. The result is cut to
/// `limit`.
pub fn reduce_redundant_results(
    handles: Vec<KbHandle>,
    default_language: Option<&str>,
    limit: usize,
) -> Vec<KbHandle> {
    let input_len = handles.len();
    let mut kept: Vec<KbHandle> = Vec::with_capacity(handles.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for handle in handles {
        match index.get(&handle.identifier) {
            None => {
                index.insert(handle.identifier.clone(), kept.len());
                kept.push(handle);
            }
            Some(&pos) => {
                let current = &kept[pos];
                let gains_name = current.name.is_none() && handle.name.is_some();
                let exact_language =
                    default_language.is_some() && handle.language.as_deref() == default_language;
                if gains_name || exact_language {
                    kept[pos] = handle;
                }
            }
        }
    }

    kept.truncate(limit);
    trace!(input = input_len, output = kept.len(), "reduce.redundant_results");
    kept
}
