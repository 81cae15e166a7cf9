/**
 * Knowledge base configuration
 *
 * A knowledge base couples a schema mapping with the search settings the query builder
 * consults: default language, result limit, full-text search engine, explicit roots and
 * additional label-like properties.
 *
 * Format:
 * ```yaml
 * id: goblins
 * name: Goblin Index
 * mapping:
 *   class: http://www.w3.org/2000/01/rdf-schema#Class
 *   ...
 * default-language: en
 * max-results: 1000
 * full-text-search: http://www.openrdf.org/contrib/lucenesail#matches
 * root-concepts: []
 * ```
 */

pub mod mapping;
pub mod profile;

pub use mapping::KnowledgeBaseMapping;
pub use profile::{KnowledgeBaseAccess, KnowledgeBaseProfile, RepositoryKind};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{KbqError, Result};

pub const DEFAULT_MAX_RESULTS: usize = 1000;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KnowledgeBase {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mapping: KnowledgeBaseMapping,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// IRI of the full-text search engine; absent means regex matching only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text_search: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_concepts: Vec<String>,

    /// Label-like properties searched alongside the label property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_matching_properties: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<String>,

    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            mapping: KnowledgeBaseMapping::default(),
            default_language: None,
            max_results: DEFAULT_MAX_RESULTS,
            full_text_search: None,
            root_concepts: Vec::new(),
            additional_matching_properties: Vec::new(),
            default_dataset: None,
            case_sensitive: false,
        }
    }
}

impl KnowledgeBase {
    pub fn new(id: impl Into<String>, mapping: KnowledgeBaseMapping) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            mapping,
            ..Self::default()
        }
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_full_text_search(mut self, engine_iri: impl Into<String>) -> Self {
        self.full_text_search = Some(engine_iri.into());
        self
    }

    pub fn with_root_concepts<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_concepts = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_additional_matching_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_matching_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.default_dataset = Some(dataset.into());
        self
    }

    /// Load a knowledge base definition from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KbqError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let kb: KnowledgeBase = serde_yaml::from_str(&content).map_err(|e| {
            KbqError::Config(format!("Invalid knowledge base YAML {}: {}", path.display(), e))
        })?;

        kb.validate()?;
        Ok(kb)
    }

    /// Write the knowledge base definition as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.mapping.validate()?;

        if let Some(language) = &self.default_language {
            if language.trim().is_empty() {
                return Err(KbqError::Config(
                    "default-language must be omitted rather than empty".to_string(),
                ));
            }
        }

        for property in &self.additional_matching_properties {
            if !property.contains(':') {
                return Err(KbqError::Config(format!(
                    "Additional matching property is not an absolute IRI: {}",
                    property
                )));
            }
        }

        Ok(())
    }
}
