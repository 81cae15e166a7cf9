//! RDF vocabulary constants used when generating graph patterns
//!
//! Constants are organized by vocabulary:
//! - `rdf`, `rdfs`, `owl`, `xsd`, `skos`, `schema` - mapping presets and structural patterns
//! - `fts` - identifiers of the supported full-text search engines
//! - `lucene`, `fuseki`, `virtuoso`, `wikidata` - IRIs used inside backend-specific patterns

use crate::kb::KnowledgeBase;

/// RDF vocabulary constants
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:Property IRI
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
}

/// RDFS vocabulary constants
pub mod rdfs {
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

/// OWL vocabulary constants
pub mod owl {
    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:Class IRI; enables the set-intersection traversal branch
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
}

/// XSD vocabulary constants
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
}

/// SKOS vocabulary constants
pub mod skos {
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
}

/// schema.org constants
pub mod schema {
    pub const DESCRIPTION: &str = "http://schema.org/description";
}

/// Full-text search engine identifiers as stored in a knowledge base configuration
pub mod fts {
    pub const NONE: &str = "http://inception-project.github.io/kbexport#noFts";
    pub const LUCENE: &str = "http://www.openrdf.org/contrib/lucenesail#matches";
    pub const FUSEKI: &str = "http://jena.apache.org/text#query";
    pub const VIRTUOSO: &str = "bif:contains";
    pub const WIKIDATA: &str = "https://www.mediawiki.org/ontology#API/";
}

/// Lucene sidecar index vocabulary
pub mod lucene {
    pub const PREFIX: &str = "search";
    pub const NAMESPACE: &str = "http://www.openrdf.org/contrib/lucenesail#";
    pub const MATCHES: &str = "http://www.openrdf.org/contrib/lucenesail#matches";
}

/// Jena text index vocabulary
pub mod fuseki {
    pub const PREFIX: &str = "text";
    pub const NAMESPACE: &str = "http://jena.apache.org/text#";
}

/// Virtuoso built-in text functions
pub mod virtuoso {
    pub const CONTAINS: &str = "bif:contains";
}

/// Wikidata entity-search service vocabulary
pub mod wikidata {
    pub const WIKIBASE_PREFIX: &str = "wikibase";
    pub const WIKIBASE: &str = "http://wikiba.se/ontology#";
    pub const BD_PREFIX: &str = "bd";
    pub const BD: &str = "http://www.bigdata.com/rdf#";
    pub const MWAPI_PREFIX: &str = "mwapi";
    pub const MWAPI: &str = "https://www.mediawiki.org/ontology#API/";
    pub const ENDPOINT: &str = "www.wikidata.org";
    pub const DEFAULT_LANGUAGE: &str = "en";
}

/// Namespaces whose members are vocabulary-internal and never meaningful search results.
pub const IMPLICIT_NAMESPACES: [&str; 4] = [
    rdf::NAMESPACE,
    rdfs::NAMESPACE,
    xsd::NAMESPACE,
    owl::NAMESPACE,
];

/// Check whether an identifier lives in an implicit namespace.
///
/// Identifiers that the knowledge base lists as explicit root concepts are never implicit,
/// so a knowledge base may declare e.g. `owl:Thing` as its root.
pub fn has_implicit_namespace(kb: &KnowledgeBase, identifier: &str) -> bool {
    if kb.root_concepts.iter().any(|root| root == identifier) {
        return false;
    }

    IMPLICIT_NAMESPACES
        .iter()
        .any(|ns| identifier.starts_with(ns))
}
