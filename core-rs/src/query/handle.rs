/**
 * handle.rs
 * Result record produced for every matched entity
 */

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A label-like term that caused a match, with its language if tagged
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchTerm {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KbHandle {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Id of the knowledge base the handle was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_terms: Vec<MatchTerm>,
}

impl KbHandle {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn add_match_term(&mut self, term: impl Into<String>, language: Option<String>) {
        self.match_terms.push(MatchTerm {
            term: term.into(),
            language,
        });
    }

    /// Display label: the name if known, otherwise the local part of the identifier
    pub fn ui_label(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => local_name(&self.identifier),
        }
    }
}

fn local_name(identifier: &str) -> &str {
    let cut = identifier
        .rfind('#')
        .or_else(|| identifier.rfind('/'))
        .or_else(|| identifier.rfind(':'));
    match cut {
        Some(idx) if idx + 1 < identifier.len() => &identifier[idx + 1..],
        _ => identifier,
    }
}

// Equality and hashing cover the same identifying fields; match terms and the owning
// knowledge base are annotations.
impl PartialEq for KbHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.name == other.name
            && self.language == other.language
            && self.description == other.description
            && self.domain == other.domain
            && self.range == other.range
    }
}

impl Eq for KbHandle {}

/// Hashes exactly the fields `eq` compares, so equal handles always hash alike. No field is
/// hashed conditionally: swapping in the description only for unnamed handles would let
/// handles that compare equal land in different buckets.
impl Hash for KbHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.name.hash(state);
        self.language.hash(state);
        self.description.hash(state);
        self.domain.hash(state);
        self.range.hash(state);
    }
}
