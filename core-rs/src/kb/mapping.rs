/**
 * mapping.rs
 * IRIs that play the structural roles of a knowledge base schema
 *
 * Format:
 * ```yaml
 * class: http://www.w3.org/2000/01/rdf-schema#Class
 * subclass-of: http://www.w3.org/2000/01/rdf-schema#subClassOf
 * instance-of: http://www.w3.org/1999/02/22-rdf-syntax-ns#type
 * subproperty-of: http://www.w3.org/2000/01/rdf-schema#subPropertyOf
 * label: http://www.w3.org/2000/01/rdf-schema#label
 * description: http://www.w3.org/2000/01/rdf-schema#comment
 * property-type: http://www.w3.org/1999/02/22-rdf-syntax-ns#Property
 * property-label: http://www.w3.org/2000/01/rdf-schema#label
 * property-description: http://www.w3.org/2000/01/rdf-schema#comment
 * ```
 */

use serde::{Deserialize, Serialize};

use crate::errors::{KbqError, Result};
use crate::vocab::{owl, rdf, rdfs, schema, skos};

const WIKIDATA_ENTITY: &str = "http://www.wikidata.org/entity/";
const WIKIDATA_DIRECT: &str = "http://www.wikidata.org/prop/direct/";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct KnowledgeBaseMapping {
    pub class: String,
    pub subclass_of: String,
    pub instance_of: String,
    pub subproperty_of: String,
    pub label: String,
    pub description: String,
    pub property_type: String,
    pub property_label: String,
    pub property_description: String,
}

impl Default for KnowledgeBaseMapping {
    fn default() -> Self {
        Self::rdfs()
    }
}

impl KnowledgeBaseMapping {
    /// Plain RDF Schema
    pub fn rdfs() -> Self {
        Self {
            class: rdfs::CLASS.to_string(),
            subclass_of: rdfs::SUB_CLASS_OF.to_string(),
            instance_of: rdf::TYPE.to_string(),
            subproperty_of: rdfs::SUB_PROPERTY_OF.to_string(),
            label: rdfs::LABEL.to_string(),
            description: rdfs::COMMENT.to_string(),
            property_type: rdf::PROPERTY.to_string(),
            property_label: rdfs::LABEL.to_string(),
            property_description: rdfs::COMMENT.to_string(),
        }
    }

    /// OWL ontologies; classes may be defined as intersections
    pub fn owl() -> Self {
        Self {
            class: owl::CLASS.to_string(),
            property_type: owl::OBJECT_PROPERTY.to_string(),
            ..Self::rdfs()
        }
    }

    /// SKOS concept schemes
    pub fn skos() -> Self {
        Self {
            class: skos::CONCEPT.to_string(),
            subclass_of: skos::BROADER.to_string(),
            label: skos::PREF_LABEL.to_string(),
            description: skos::DEFINITION.to_string(),
            property_label: skos::PREF_LABEL.to_string(),
            property_description: skos::DEFINITION.to_string(),
            ..Self::rdfs()
        }
    }

    /// Wikidata direct-claim vocabulary
    pub fn wikidata() -> Self {
        Self {
            class: format!("{}Q35120", WIKIDATA_ENTITY),
            subclass_of: format!("{}P279", WIKIDATA_DIRECT),
            instance_of: format!("{}P31", WIKIDATA_DIRECT),
            subproperty_of: format!("{}P1647", WIKIDATA_DIRECT),
            label: rdfs::LABEL.to_string(),
            description: schema::DESCRIPTION.to_string(),
            property_type: format!("{}Q18616576", WIKIDATA_ENTITY),
            property_label: rdfs::LABEL.to_string(),
            property_description: schema::DESCRIPTION.to_string(),
        }
    }

    /// Look up a preset by its short name (`rdfs`, `owl`, `skos`, `wikidata`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rdfs" => Some(Self::rdfs()),
            "owl" => Some(Self::owl()),
            "skos" => Some(Self::skos()),
            "wikidata" => Some(Self::wikidata()),
            _ => None,
        }
    }

    /// Ensure every role is filled with an absolute IRI
    pub fn validate(&self) -> Result<()> {
        let roles = [
            ("class", &self.class),
            ("subclass-of", &self.subclass_of),
            ("instance-of", &self.instance_of),
            ("subproperty-of", &self.subproperty_of),
            ("label", &self.label),
            ("description", &self.description),
            ("property-type", &self.property_type),
            ("property-label", &self.property_label),
            ("property-description", &self.property_description),
        ];

        for (role, iri) in roles {
            if iri.trim().is_empty() {
                return Err(KbqError::Config(format!("Mapping role '{}' is empty", role)));
            }
            if !iri.contains(':') {
                return Err(KbqError::Config(format!(
                    "Mapping role '{}' is not an absolute IRI: {}",
                    role, iri
                )));
            }
        }

        Ok(())
    }
}
