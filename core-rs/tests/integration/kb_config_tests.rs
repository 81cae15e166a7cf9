//! Knowledge Base Configuration Integration Tests
//!
//! Tests the path from YAML configuration on disk to evaluated queries:
//! - knowledge base files and profile catalogs
//! - Turtle data directories loaded recursively
//! - SKOS mapping driving hierarchy and label patterns
//!
//! Uses tempfile for isolation - NO /tmp pollution

use kbq_core::{
    KbqError, KnowledgeBase, KnowledgeBaseMapping, KnowledgeBaseProfile, RepositoryKind,
    SparqlQueryBuilder, StoreRepository,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SKOS_DATA: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix ex: <http://example.org/animals#> .

ex:animal a skos:Concept ;
    skos:prefLabel "Animal"@en , "Tier"@de ;
    skos:definition "A living organism"@en .
ex:mammal a skos:Concept ;
    skos:broader ex:animal ;
    skos:prefLabel "Mammal"@en , "Säugetier"@de .
"#;

const MORE_SKOS_DATA: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://example.org/animals#> .

ex:cat a skos:Concept ;
    skos:broader ex:mammal ;
    skos:prefLabel "Cat"@en , "Katze"@de .
"#;

const KB_YAML: &str = r#"
id: animals
name: Animal Thesaurus
mapping:
  class: http://www.w3.org/2004/02/skos/core#Concept
  subclass-of: http://www.w3.org/2004/02/skos/core#broader
  instance-of: http://www.w3.org/1999/02/22-rdf-syntax-ns#type
  subproperty-of: http://www.w3.org/2000/01/rdf-schema#subPropertyOf
  label: http://www.w3.org/2004/02/skos/core#prefLabel
  description: http://www.w3.org/2004/02/skos/core#definition
  property-type: http://www.w3.org/1999/02/22-rdf-syntax-ns#Property
  property-label: http://www.w3.org/2004/02/skos/core#prefLabel
  property-description: http://www.w3.org/2004/02/skos/core#definition
default-language: de
max-results: 10
"#;

const PROFILES_YAML: &str = r#"
animals:
  name: Animal Thesaurus
  type: local
  mapping:
    class: http://www.w3.org/2004/02/skos/core#Concept
    subclass-of: http://www.w3.org/2004/02/skos/core#broader
    instance-of: http://www.w3.org/1999/02/22-rdf-syntax-ns#type
    subproperty-of: http://www.w3.org/2000/01/rdf-schema#subPropertyOf
    label: http://www.w3.org/2004/02/skos/core#prefLabel
    description: http://www.w3.org/2004/02/skos/core#definition
    property-type: http://www.w3.org/1999/02/22-rdf-syntax-ns#Property
    property-label: http://www.w3.org/2004/02/skos/core#prefLabel
    property-description: http://www.w3.org/2004/02/skos/core#definition
  root-concepts:
    - http://example.org/animals#animal
  default-language: en
dbpedia:
  name: DBpedia
  type: remote
  access:
    url: https://dbpedia.org/sparql
    full-text-search: bif:contains
  mapping:
    class: http://www.w3.org/2002/07/owl#Class
    subclass-of: http://www.w3.org/2000/01/rdf-schema#subClassOf
    instance-of: http://www.w3.org/1999/02/22-rdf-syntax-ns#type
    subproperty-of: http://www.w3.org/2000/01/rdf-schema#subPropertyOf
    label: http://www.w3.org/2000/01/rdf-schema#label
    description: http://www.w3.org/2000/01/rdf-schema#comment
    property-type: http://www.w3.org/2002/07/owl#ObjectProperty
    property-label: http://www.w3.org/2000/01/rdf-schema#label
    property-description: http://www.w3.org/2000/01/rdf-schema#comment
  default-language: en
  default-dataset: http://dbpedia.org
"#;

const ANIMAL: &str = "http://example.org/animals#animal";
const MAMMAL: &str = "http://example.org/animals#mammal";
const CAT: &str = "http://example.org/animals#cat";

/// Helper to create a data directory with nested Turtle files and a stray non-Turtle file
fn create_data_dir(root: &Path) {
    let nested = root.join("data").join("more");
    fs::create_dir_all(&nested).unwrap();
    fs::write(root.join("data").join("animals.ttl"), SKOS_DATA).unwrap();
    fs::write(nested.join("cats.ttl"), MORE_SKOS_DATA).unwrap();
    fs::write(nested.join("README.md"), "not turtle").unwrap();
}

#[test]
fn test_knowledge_base_from_yaml_drives_queries() {
    let temp = TempDir::new().unwrap();
    create_data_dir(temp.path());
    let kb_path = temp.path().join("animals.yaml");
    fs::write(&kb_path, KB_YAML).unwrap();

    let kb = KnowledgeBase::load(&kb_path).unwrap();
    assert_eq!(kb.id, "animals");
    assert_eq!(kb.mapping, KnowledgeBaseMapping::skos());
    assert_eq!(kb.max_results, 10);

    let repo = StoreRepository::new().unwrap();
    assert_eq!(repo.load_path(temp.path().join("data")).unwrap(), 2);

    let handles = SparqlQueryBuilder::for_classes(&kb)
        .descendants_of(ANIMAL)
        .unwrap()
        .retrieve_label()
        .as_handles(&repo, false)
        .unwrap();

    // Only German labels and untagged ones are eligible with default-language: de
    let labels: Vec<(&str, Option<&str>)> = handles
        .iter()
        .map(|h| (h.ui_label(), h.language.as_deref()))
        .collect();
    assert_eq!(labels, vec![("Katze", Some("de")), ("Säugetier", Some("de"))]);
}

#[test]
fn test_skos_roots_and_description() {
    let repo = StoreRepository::from_turtle(&format!("{}{}", SKOS_DATA, MORE_SKOS_DATA)).unwrap();
    let kb = KnowledgeBase::new("animals", KnowledgeBaseMapping::skos()).with_default_language("en");

    let roots = SparqlQueryBuilder::for_classes(&kb)
        .roots()
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].identifier, ANIMAL);
    assert_eq!(roots[0].name.as_deref(), Some("Animal"));
    assert_eq!(roots[0].description.as_deref(), Some("A living organism"));

    let parents = SparqlQueryBuilder::for_classes(&kb)
        .parents_of(CAT)
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].identifier, MAMMAL);
}

#[test]
fn test_profile_catalog_to_knowledge_base() {
    let temp = TempDir::new().unwrap();
    let catalog_path = temp.path().join("profiles.yaml");
    fs::write(&catalog_path, PROFILES_YAML).unwrap();

    let profiles = KnowledgeBaseProfile::load_all(&catalog_path).unwrap();
    assert_eq!(profiles.keys().collect::<Vec<_>>(), vec!["animals", "dbpedia"]);

    let dbpedia = &profiles["dbpedia"];
    assert_eq!(dbpedia.kind, RepositoryKind::Remote);
    assert_eq!(dbpedia.access.url.as_deref(), Some("https://dbpedia.org/sparql"));

    let kb = dbpedia.to_knowledge_base("dbpedia");
    assert_eq!(kb.mapping, KnowledgeBaseMapping::owl());
    let query = SparqlQueryBuilder::for_items(&kb)
        .with_label_starting_with("Barack Ob")
        .unwrap()
        .select_query();
    assert!(query.contains("FROM <http://dbpedia.org>"));
    // Too short to wildcard, so only the completed word is sent to the index
    assert!(query.contains(r#"?m <bif:contains> "\"Barack\"" ."#));
}

#[test]
fn test_profile_root_concepts_restrict_roots() {
    let profiles = KnowledgeBaseProfile::from_yaml_str(PROFILES_YAML).unwrap();
    let kb = profiles["animals"].to_knowledge_base("animals");
    assert_eq!(kb.root_concepts, vec![ANIMAL.to_string()]);

    let repo = StoreRepository::from_turtle(SKOS_DATA).unwrap();
    let roots = SparqlQueryBuilder::for_classes(&kb)
        .roots()
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].identifier, ANIMAL);
}

#[test]
fn test_knowledge_base_round_trip_through_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kb.yaml");

    let kb = KnowledgeBase::new("wd", KnowledgeBaseMapping::wikidata())
        .with_default_language("fr")
        .with_full_text_search("https://www.mediawiki.org/ontology#API/")
        .with_root_concepts(["http://www.wikidata.org/entity/Q35120"]);
    kb.save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("full-text-search:"));
    assert!(!content.contains("default-dataset"));

    assert_eq!(KnowledgeBase::load(&path).unwrap(), kb);
}

#[test]
fn test_invalid_configuration_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.yaml");
    fs::write(&path, KB_YAML.replace("http://www.w3.org/2004/02/skos/core#broader", "broader")).unwrap();

    let err = KnowledgeBase::load(&path).unwrap_err();
    assert!(matches!(err, KbqError::Config(_)));
    assert!(err.to_string().contains("subclass-of"));

    let missing = KnowledgeBase::load(temp.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(missing, KbqError::FileNotFound(_)));
}

#[test]
fn test_malformed_turtle_is_a_repository_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.ttl");
    fs::write(&path, "<http://example.org/a> <http://example.org/b> .").unwrap();

    let repo = StoreRepository::new().unwrap();
    let err = repo.load_path(&path).unwrap_err();
    assert!(matches!(err, KbqError::Repository(ref message) if message.contains("broken.ttl")));
}
