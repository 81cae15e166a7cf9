//! Label Search Integration Tests
//!
//! Runs label matching and label/description retrieval against an in-memory store loaded
//! with small Turtle fixtures. Covers:
//! - exact, prefix and substring matching without a full-text index
//! - language preference and strict untagged retrieval
//! - label sub-properties and additional matching properties
//! - descriptions staying out of label matching
//! - rejection of malformed identifiers
//!
//! **Pattern 3: Direct API Testing**
//! Builds queries through SparqlQueryBuilder and evaluates them on StoreRepository,
//! no CLI binary involved.

use kbq_core::{KbHandle, KbqError, KnowledgeBase, KnowledgeBaseMapping, SparqlQueryBuilder, StoreRepository};

const TURTLE_PREFIX: &str = "\
@base <http://example.org/> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix so: <http://schema.org/> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
";

const DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE: &str = "
<#green-goblin>
    rdfs:label 'Green Goblin' ;
    rdfs:label 'Green Goblin'@en ;
    rdfs:label 'Grüner Goblin'@de ;
    rdfs:label 'Goblin vert'@fr ;
    rdfs:comment 'Little green monster' ;
    rdfs:comment 'Little green monster'@en ;
    rdfs:comment 'Kleines grünes Monster'@de .

<#lucky-green>
    rdfs:label 'Lucky Green' ;
    rdfs:label 'Lucky Green'@en ;
    rdfs:comment 'Lucky Irish charm' ;
    rdfs:comment 'Lucky Irish charm'@en .

<#red-goblin>
    rdfs:label 'Red Goblin' ;
    rdfs:comment 'Little red monster' .
";

const DATA_LABELS_WITHOUT_LANGUAGE: &str = "
<#green-goblin>
    rdfs:label 'Green Goblin' .

<#lucky-green>
    rdfs:label 'Lucky Green' .

<#red-goblin>
    rdfs:label 'Red Goblin' .
";

const DATA_MULTIPLE_LABELS: &str = "
<#example>
    rdfs:label 'specimen' ;
    rdfs:label 'sample' ;
    rdfs:label 'instance' ;
    rdfs:label 'case' .
";

const DATA_ADDITIONAL_SEARCH_PROPERTIES: &str = "
<#example>
    rdfs:prefLabel 'specimen' ;
    rdfs:label 'sample' ;
    rdfs:label 'instance' ;
    rdfs:label 'case' .
";

const LABEL_SUBPROPERTY: &str = "
<#sublabel>
    rdfs:subPropertyOf rdfs:label .

<#green-goblin>
    <#sublabel> 'Green Goblin' .
";

const LABEL_SUBPROPERTY_WITH_DESCRIPTION: &str = "
<#sublabel>
    rdfs:subPropertyOf rdfs:label .

<#green-goblin>
    <#sublabel> 'Green Goblin' ;
    rdfs:comment 'Little green monster' .
";

const GREEN_GOBLIN: &str = "http://example.org/#green-goblin";
const RED_GOBLIN: &str = "http://example.org/#red-goblin";
const LUCKY_GREEN: &str = "http://example.org/#lucky-green";
const EXAMPLE: &str = "http://example.org/#example";

/// Helper to load fixtures into a fresh store
fn repository(data: &str) -> StoreRepository {
    StoreRepository::from_turtle(&format!("{}{}", TURTLE_PREFIX, data)).unwrap()
}

/// RDFS knowledge base with English as default language
fn english_kb() -> KnowledgeBase {
    KnowledgeBase::new("goblins", KnowledgeBaseMapping::rdfs())
        .with_default_language("en")
        .with_max_results(100)
}

/// RDFS knowledge base without a default language
fn untagged_kb() -> KnowledgeBase {
    KnowledgeBase::new("goblins", KnowledgeBaseMapping::rdfs()).with_max_results(100)
}

fn identifiers(handles: &[KbHandle]) -> Vec<&str> {
    handles.iter().map(|h| h.identifier.as_str()).collect()
}

#[test]
fn test_only_untagged_label_and_description_without_default_language() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = untagged_kb();

    let handle = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[GREEN_GOBLIN])
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handle(&repo, false)
        .unwrap()
        .expect("green goblin should be found");

    assert_eq!(handle.identifier, GREEN_GOBLIN);
    assert_eq!(handle.name.as_deref(), Some("Green Goblin"));
    assert_eq!(handle.description.as_deref(), Some("Little green monster"));
    assert_eq!(handle.language, None);
    assert_eq!(handle.kb.as_deref(), Some("goblins"));
}

#[test]
fn test_default_language_label_preferred() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = untagged_kb().with_default_language("fr");

    let handle = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[GREEN_GOBLIN])
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handle(&repo, false)
        .unwrap()
        .expect("green goblin should be found");

    assert_eq!(handle.name.as_deref(), Some("Goblin vert"));
    assert_eq!(handle.language.as_deref(), Some("fr"));
    // No French description: the untagged one is used
    assert_eq!(handle.description.as_deref(), Some("Little green monster"));
}

#[test]
fn test_item_info_for_identifier() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = untagged_kb().with_default_language("fr");

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[RED_GOBLIN])
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handles(&repo, true)
        .unwrap();

    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].name.as_deref(), Some("Red Goblin"));
    assert_eq!(handles[0].description.as_deref(), Some("Little red monster"));
    assert_eq!(handles[0].language, None);
}

#[test]
fn test_label_starting_with_without_language() {
    let repo = repository(DATA_LABELS_WITHOUT_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_starting_with("Green")
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(handles, vec![KbHandle::new(GREEN_GOBLIN).with_name("Green Goblin")]);
}

#[test]
fn test_label_starting_with_prefers_default_language() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_starting_with("Green Goblin")
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(
        handles,
        vec![KbHandle::new(GREEN_GOBLIN).with_name("Green Goblin").with_language("en")]
    );
}

#[test]
fn test_label_containing_any_of() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_containing_any_of(&["goblin"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    // Sorted by label; German label never considered
    assert_eq!(identifiers(&handles), vec![GREEN_GOBLIN, RED_GOBLIN]);
    assert_eq!(handles[0].language.as_deref(), Some("en"));
    assert_eq!(handles[1].language, None);
}

#[test]
fn test_label_containing_respects_case_sensitivity() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .case_sensitive(true)
        .with_label_containing_any_of(&["goblin"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();
    assert!(handles.is_empty());

    let handles = SparqlQueryBuilder::for_items(&kb)
        .case_sensitive(true)
        .with_label_containing_any_of(&["Green"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();
    assert_eq!(identifiers(&handles), vec![GREEN_GOBLIN, LUCKY_GREEN]);
}

#[test]
fn test_label_matching_any_of() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_matching_any_of(&["Goblin"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert!(!handles.is_empty());
    assert!(handles.iter().all(|h| h.ui_label().contains("Goblin")));
    assert!(!identifiers(&handles).contains(&LUCKY_GREEN));
}

#[test]
fn test_label_matching_exactly_any_of() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_matching_exactly_any_of(&["Green Goblin", "Lucky Green"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(identifiers(&handles), vec![GREEN_GOBLIN, LUCKY_GREEN]);
    assert!(handles.iter().all(|h| h.language.as_deref() == Some("en")));

    // A fragment is not an exact match
    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_matching_exactly_any_of(&["Green"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();
    assert!(handles.is_empty());
}

#[test]
fn test_label_sub_property_is_matched() {
    let repo = repository(LABEL_SUBPROPERTY);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_matching_exactly_any_of(&["Green Goblin"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(handles, vec![KbHandle::new(GREEN_GOBLIN).with_name("Green Goblin")]);
}

#[test]
fn test_search_over_multiple_labels() {
    let repo = repository(DATA_MULTIPLE_LABELS);
    let kb = english_kb();

    for term in ["specimen", "sample", "instance", "case"] {
        let handles = SparqlQueryBuilder::for_items(&kb)
            .with_label_matching_any_of(&[term])
            .unwrap()
            .retrieve_label()
            .as_handles(&repo, true)
            .unwrap();

        assert_eq!(handles.len(), 1, "term {}", term);
        assert_eq!(handles[0].identifier, EXAMPLE);
        assert_eq!(handles[0].name.as_deref(), Some(term));
    }
}

#[test]
fn test_matching_against_additional_search_properties() {
    let repo = repository(DATA_ADDITIONAL_SEARCH_PROPERTIES);
    let mut kb = english_kb()
        .with_additional_matching_properties(["http://www.w3.org/2000/01/rdf-schema#label"]);
    kb.mapping.label = "http://www.w3.org/2000/01/rdf-schema#prefLabel".to_string();

    for term in ["specimen", "sample", "instance", "case"] {
        let handles = SparqlQueryBuilder::for_items(&kb)
            .with_label_starting_with(term)
            .unwrap()
            .retrieve_label()
            .as_handles(&repo, true)
            .unwrap();

        assert_eq!(handles.len(), 1, "term {}", term);
        assert_eq!(handles[0].identifier, EXAMPLE);
        // The preferred label names the handle whichever property matched
        assert_eq!(handles[0].name.as_deref(), Some("specimen"));
        assert!(handles[0].match_terms.iter().any(|t| t.term == term));
    }
}

#[test]
fn test_line_breaks_do_not_break_matching() {
    let repo = repository(DATA_LABELS_WITHOUT_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_containing_any_of(&["Red\n\rGoblin"])
        .unwrap()
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(identifiers(&handles), vec![RED_GOBLIN]);
}

#[test]
fn test_limit_caps_results() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_containing_any_of(&["e"])
        .unwrap()
        .limit(1)
        .as_handles(&repo, false)
        .unwrap();

    assert_eq!(handles.len(), 1);
}

#[test]
fn test_description_is_not_matched_as_label() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_starting_with("Little")
        .unwrap()
        .as_handles(&repo, true)
        .unwrap();
    assert!(handles.is_empty(), "matched descriptions: {:?}", handles);

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_containing_any_of(&["monster"])
        .unwrap()
        .as_handles(&repo, true)
        .unwrap();
    assert!(handles.is_empty(), "matched descriptions: {:?}", handles);
}

#[test]
fn test_retrieved_label_is_not_the_description() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = untagged_kb();

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[GREEN_GOBLIN, RED_GOBLIN])
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handles(&repo, true)
        .unwrap();

    assert_eq!(identifiers(&handles), vec![GREEN_GOBLIN, RED_GOBLIN]);
    assert_eq!(handles[0].name.as_deref(), Some("Green Goblin"));
    assert_eq!(handles[0].description.as_deref(), Some("Little green monster"));
    assert_eq!(handles[1].name.as_deref(), Some("Red Goblin"));
    assert_eq!(handles[1].description.as_deref(), Some("Little red monster"));
}

#[test]
fn test_label_sub_property_names_handle_beside_description() {
    let repo = repository(LABEL_SUBPROPERTY_WITH_DESCRIPTION);
    let kb = untagged_kb();

    let handle = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[GREEN_GOBLIN])
        .unwrap()
        .retrieve_label()
        .retrieve_description()
        .as_handle(&repo, true)
        .unwrap()
        .expect("green goblin should be found");

    assert_eq!(handle.name.as_deref(), Some("Green Goblin"));
    assert_eq!(handle.description.as_deref(), Some("Little green monster"));

    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_label_starting_with("Little")
        .unwrap()
        .as_handles(&repo, true)
        .unwrap();
    assert!(handles.is_empty());
}

#[test]
fn test_input_without_searchable_characters_finds_nothing() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = english_kb();

    for value in ["***", "\u{00AD}", ".*"] {
        let handles = SparqlQueryBuilder::for_items(&kb)
            .with_label_containing_any_of(&[value])
            .unwrap()
            .as_handles(&repo, true)
            .unwrap();
        assert!(handles.is_empty(), "value {:?} matched {:?}", value, handles);
    }
}

#[test]
fn test_malformed_identifier_is_rejected() {
    let repo = repository(DATA_LABELS_AND_DESCRIPTIONS_WITH_LANGUAGE);
    let kb = untagged_kb();
    let injected = "http://example.org/#a> } ?subj ?p ?o . { VALUES ?x { <urn:x";

    let err = SparqlQueryBuilder::for_items(&kb).with_identifier(&[injected]).unwrap_err();
    assert!(matches!(err, KbqError::InvalidIri { ref iri, .. } if iri == injected));
    assert!(err.is_configuration_error());

    assert!(SparqlQueryBuilder::for_classes(&kb).children_of(injected).is_err());
    assert!(SparqlQueryBuilder::for_properties(&kb).matching_domain("not an iri").is_err());

    // A well-formed identifier still works alongside
    let handles = SparqlQueryBuilder::for_items(&kb)
        .with_identifier(&[GREEN_GOBLIN])
        .unwrap()
        .as_handles(&repo, true)
        .unwrap();
    assert_eq!(identifiers(&handles), vec![GREEN_GOBLIN]);
}
