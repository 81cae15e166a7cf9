/**
 * extract.rs
 * Turn solution rows into result handles
 */

use super::handle::KbHandle;
use super::mode::Mode;
use super::pattern::var;
use crate::kb::KnowledgeBase;
use crate::repository::{BindingSet, BoundValue};
use crate::vocab::has_implicit_namespace;

/// Build a handle from one row, or `None` if the row must be skipped.
///
/// Rows without bindings, subjects without a namespace separator and, unless `all` is set,
/// subjects in implicit namespaces are skipped.
pub fn extract_handle(kb: &KnowledgeBase, mode: Mode, bindings: &BindingSet, all: bool) -> Option<KbHandle> {
    if bindings.is_empty() {
        return None;
    }

    let id = bindings.get(var::SUBJECT)?.string_value();
    if !id.contains(':') || (!all && has_implicit_namespace(kb, id)) {
        return None;
    }

    let mut handle = KbHandle::new(id);
    handle.kb = Some(kb.id.clone());

    extract_label(kb, mode, &mut handle, bindings);
    handle.description = bindings
        .get(var::DESCRIPTION)
        .or_else(|| bindings.get(var::DESC_CANDIDATE))
        .map(|value| value.string_value().to_string());
    handle.range = string_of(bindings.get(var::RANGE));
    handle.domain = string_of(bindings.get(var::DOMAIN));

    Some(handle)
}

fn extract_label(kb: &KnowledgeBase, mode: Mode, handle: &mut KbHandle, bindings: &BindingSet) {
    let pref_label = bindings.get(var::PREF_LABEL);
    let match_term = bindings.get(var::MATCH_TERM);

    if let Some(label) = pref_label.or(match_term) {
        handle.name = Some(label.string_value().to_string());
        handle.language = language_of(label);
    }

    // Record why the handle matched when several label-like properties are searched
    if !mode.resolver().additional_matching_properties(kb).is_empty() {
        if let Some(term) = match_term {
            handle.add_match_term(term.string_value(), language_of(term));
        }
    }
}

fn language_of(value: &BoundValue) -> Option<String> {
    value.language().map(str::to_string)
}

fn string_of(value: Option<&BoundValue>) -> Option<String> {
    value.map(|v| v.string_value().to_string())
}
