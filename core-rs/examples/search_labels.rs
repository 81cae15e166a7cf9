/// Example: Search a small in-memory knowledge base by label
///
/// This example loads an inline RDFS vocabulary into a StoreRepository, then runs a
/// prefix search over classes, lists the class roots and shows the generated SPARQL.
///
/// Usage:
///   cargo run --example search_labels
///   cargo run --example search_labels Ani
///   cargo run --example search_labels Ani --query

use kbq_core::{KnowledgeBase, KnowledgeBaseMapping, SparqlQueryBuilder, StoreRepository};
use std::env;

const ZOO: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix zoo: <http://example.org/zoo#> .

zoo:Animal a rdfs:Class ;
    rdfs:label "Animal"@en , "Tier"@de ;
    rdfs:comment "A living organism that feeds on organic matter"@en .

zoo:Mammal a rdfs:Class ;
    rdfs:subClassOf zoo:Animal ;
    rdfs:label "Mammal"@en , "Säugetier"@de .

zoo:Anteater a rdfs:Class ;
    rdfs:subClassOf zoo:Mammal ;
    rdfs:label "Anteater"@en .

zoo:Enclosure a rdfs:Class ;
    rdfs:label "Enclosure"@en .

zoo:bruno a zoo:Anteater ;
    rdfs:label "Bruno"@en .
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let prefix = args.get(1).map(String::as_str).unwrap_or("An");
    let show_query = args.iter().any(|a| a == "--query");

    let repo = StoreRepository::from_turtle(ZOO)?;
    println!("Loaded {} triples\n", repo.len()?);

    let kb = KnowledgeBase::new("zoo", KnowledgeBaseMapping::rdfs())
        .with_default_language("en");

    // Prefix search over classes
    let search = SparqlQueryBuilder::for_classes(&kb)
        .with_label_starting_with(prefix)?
        .retrieve_label()
        .retrieve_description();

    if show_query {
        println!("{}\n", search.select_query());
    }

    let classes = search.as_handles(&repo, false)?;
    println!("Classes starting with '{}': {}", prefix, classes.len());
    for class in &classes {
        println!("  {} ({})", class.ui_label(), class.identifier);
        if let Some(description) = &class.description {
            println!("      {}", description);
        }
    }

    // Class roots
    let roots = SparqlQueryBuilder::for_classes(&kb)
        .roots()?
        .retrieve_label()
        .as_handles(&repo, false)?;
    println!("\nRoot classes: {}", roots.len());
    for root in &roots {
        println!("  {}", root.ui_label());
    }

    // Everything below Animal
    let below = SparqlQueryBuilder::for_items(&kb)
        .descendants_of("http://example.org/zoo#Animal")?
        .retrieve_label()
        .as_handles(&repo, false)?;
    println!("\nBelow Animal: {}", below.len());
    for item in &below {
        println!("  {}", item.ui_label());
    }

    Ok(())
}
