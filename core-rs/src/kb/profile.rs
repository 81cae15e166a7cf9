/**
 * profile.rs
 * Predefined knowledge base profiles (YAML catalog)
 *
 * Format:
 * ```yaml
 * wikidata:
 *   name: Wikidata (official/direct mapping)
 *   type: remote
 *   access:
 *     url: https://query.wikidata.org/sparql
 *     full-text-search: https://www.mediawiki.org/ontology#API/
 *   mapping:
 *     class: http://www.wikidata.org/entity/Q35120
 *     ...
 *   default-language: en
 * ```
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{KnowledgeBase, KnowledgeBaseMapping, DEFAULT_MAX_RESULTS};
use crate::errors::{KbqError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct KnowledgeBaseAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text_search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KnowledgeBaseProfile {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: RepositoryKind,

    #[serde(default)]
    pub access: KnowledgeBaseAccess,

    pub mapping: KnowledgeBaseMapping,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_concepts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_matching_properties: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<String>,
}

impl KnowledgeBaseProfile {
    /// Parse a profile catalog keyed by profile id
    pub fn from_yaml_str(yaml: &str) -> Result<BTreeMap<String, KnowledgeBaseProfile>> {
        let profiles: BTreeMap<String, KnowledgeBaseProfile> = serde_yaml::from_str(yaml)
            .map_err(|e| KbqError::Config(format!("Invalid profile catalog: {}", e)))?;

        for (id, profile) in &profiles {
            profile
                .mapping
                .validate()
                .map_err(|e| KbqError::Config(format!("Profile '{}': {}", id, e)))?;
        }

        Ok(profiles)
    }

    /// Load a profile catalog from disk
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, KnowledgeBaseProfile>> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KbqError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Instantiate a knowledge base from this profile
    pub fn to_knowledge_base(&self, id: impl Into<String>) -> KnowledgeBase {
        KnowledgeBase {
            id: id.into(),
            name: self.name.clone(),
            mapping: self.mapping.clone(),
            default_language: self.default_language.clone(),
            max_results: DEFAULT_MAX_RESULTS,
            full_text_search: self.access.full_text_search.clone(),
            root_concepts: self.root_concepts.clone(),
            additional_matching_properties: self.additional_matching_properties.clone(),
            default_dataset: self.default_dataset.clone(),
            case_sensitive: false,
        }
    }
}
