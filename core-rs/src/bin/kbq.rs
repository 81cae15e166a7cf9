//! KBQ - knowledge base query CLI
//!
//! Builds SPARQL queries from a knowledge base configuration and runs them against Turtle
//! data loaded into an in-memory store.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use kbq_core::{
    KbHandle, KnowledgeBase, KnowledgeBaseMapping, KnowledgeBaseProfile, Mode, SparqlQueryBuilder,
    StoreRepository,
};

#[derive(Parser)]
#[command(name = "kbq")]
#[command(version = kbq_core::VERSION)]
#[command(about = "Knowledge base SPARQL query builder", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SPARQL query without running it
    Render {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Run the query against Turtle data
    Search {
        #[command(flatten)]
        query: QueryArgs,
        /// Turtle files or directories (searched recursively for .ttl)
        #[arg(long = "data", short = 'd', required = true)]
        data: Vec<PathBuf>,
        /// Include entities from the RDF, RDFS, OWL and XSD namespaces
        #[arg(long)]
        all: bool,
        /// Return only whether anything matches
        #[arg(long, conflicts_with = "first")]
        exists: bool,
        /// Return only the first match
        #[arg(long)]
        first: bool,
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the profiles of a profile catalog
    Profiles {
        /// Profile catalog (YAML)
        path: PathBuf,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Knowledge base configuration (YAML)
    #[arg(long)]
    kb: Option<PathBuf>,
    /// Profile catalog to take the knowledge base from
    #[arg(long, requires = "profile", conflicts_with = "kb")]
    profiles: Option<PathBuf>,
    /// Profile id within --profiles
    #[arg(long, requires = "profiles")]
    profile: Option<String>,
    /// Override the default language
    #[arg(long)]
    language: Option<String>,
    /// Override the full-text search engine IRI
    #[arg(long)]
    fts: Option<String>,

    /// items, classes, instances or properties
    #[arg(long, short = 'm', default_value = "items")]
    mode: String,

    /// Restrict to these identifiers
    #[arg(long = "id")]
    ids: Vec<String>,
    /// Properties applicable to this class
    #[arg(long)]
    matching_domain: Option<String>,
    #[arg(long)]
    roots: bool,
    #[arg(long)]
    ancestors_of: Option<String>,
    #[arg(long)]
    descendants_of: Option<String>,
    #[arg(long)]
    children_of: Option<String>,
    #[arg(long)]
    parents_of: Option<String>,

    /// Label equals any of these
    #[arg(long)]
    exact: Vec<String>,
    /// Label fuzzily matches any of these
    #[arg(long)]
    matching: Vec<String>,
    /// Label contains any of these
    #[arg(long)]
    containing: Vec<String>,
    /// Label starts with this prefix
    #[arg(long)]
    starting_with: Option<String>,

    #[arg(long)]
    label: bool,
    #[arg(long)]
    description: bool,
    #[arg(long)]
    domain_and_range: bool,

    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    case_sensitive: bool,
    /// Ask the repository to leave out inferred statements
    #[arg(long)]
    exclude_inferred: bool,
}

impl QueryArgs {
    fn load_kb(&self) -> anyhow::Result<KnowledgeBase> {
        let mut kb = match (&self.kb, &self.profiles, &self.profile) {
            (Some(path), _, _) => KnowledgeBase::load(path)
                .with_context(|| format!("Failed to load knowledge base {}", path.display()))?,
            (None, Some(path), Some(id)) => {
                let profiles = KnowledgeBaseProfile::load_all(path)?;
                let profile = profiles
                    .get(id)
                    .with_context(|| format!("Unknown profile '{}' in {}", id, path.display()))?;
                profile.to_knowledge_base(id.as_str())
            }
            _ => KnowledgeBase::new("default", KnowledgeBaseMapping::default()),
        };

        if let Some(language) = &self.language {
            kb.default_language = Some(language.clone());
        }
        if let Some(fts) = &self.fts {
            kb.full_text_search = Some(fts.clone());
        }
        Ok(kb)
    }

    fn build<'kb>(&self, kb: &'kb KnowledgeBase) -> kbq_core::Result<SparqlQueryBuilder<'kb>> {
        let mut builder = match self.mode.parse::<Mode>()? {
            Mode::Item => SparqlQueryBuilder::for_items(kb),
            Mode::Class => SparqlQueryBuilder::for_classes(kb),
            Mode::Instance => SparqlQueryBuilder::for_instances(kb),
            Mode::Property => SparqlQueryBuilder::for_properties(kb),
        };

        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if self.case_sensitive {
            builder = builder.case_sensitive(true);
        }
        if self.exclude_inferred {
            builder = builder.include_inferred(false);
        }

        if !self.ids.is_empty() {
            builder = builder.with_identifier(&self.ids)?;
        }
        if let Some(domain) = &self.matching_domain {
            builder = builder.matching_domain(domain)?;
        }
        if self.roots {
            builder = builder.roots()?;
        }
        if let Some(iri) = &self.ancestors_of {
            builder = builder.ancestors_of(iri)?;
        }
        if let Some(iri) = &self.descendants_of {
            builder = builder.descendants_of(iri)?;
        }
        if let Some(iri) = &self.children_of {
            builder = builder.children_of(iri)?;
        }
        if let Some(iri) = &self.parents_of {
            builder = builder.parents_of(iri)?;
        }

        if !self.exact.is_empty() {
            builder = builder.with_label_matching_exactly_any_of(&self.exact)?;
        }
        if !self.matching.is_empty() {
            builder = builder.with_label_matching_any_of(&self.matching)?;
        }
        if !self.containing.is_empty() {
            builder = builder.with_label_containing_any_of(&self.containing)?;
        }
        if let Some(prefix) = &self.starting_with {
            builder = builder.with_label_starting_with(prefix)?;
        }

        if self.label {
            builder = builder.retrieve_label();
        }
        if self.description {
            builder = builder.retrieve_description();
        }
        if self.domain_and_range {
            builder = builder.retrieve_domain_and_range();
        }

        Ok(builder)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render { query } => {
            let kb = query.load_kb()?;
            let builder = query.build(&kb)?;
            println!("{}", builder.select_query());
        }

        Commands::Search { query, data, all, exists, first, format } => {
            if format != "table" && format != "json" {
                bail!("Unknown format '{}'. Use: table or json", format);
            }

            let kb = query.load_kb()?;
            let repo = StoreRepository::new()?;
            let mut files = 0;
            for path in &data {
                files += repo.load_path(path)?;
            }
            let triples = repo.len()?;
            tracing::info!(files, triples, "kbq.data_loaded");

            let mut builder = query.build(&kb)?;

            if exists {
                let found = builder.exists(&repo, all)?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::json!({ "exists": found })),
                    _ => println!("{}", if found { "yes".green() } else { "no".red() }),
                }
                return Ok(());
            }

            let handles = if first {
                builder.as_handle(&repo, all)?.into_iter().collect()
            } else {
                builder.as_handles(&repo, all)?
            };

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&handles)?),
                _ => print_table(&handles),
            }
        }

        Commands::Profiles { path } => {
            let profiles = KnowledgeBaseProfile::load_all(&path)?;
            if profiles.is_empty() {
                println!("No profiles in {}", path.display());
                return Ok(());
            }

            println!("\n{:<20} {:<8} {:<40} {}", "ID", "TYPE", "NAME", "URL");
            println!("{}", "-".repeat(100));
            for (id, profile) in &profiles {
                let kind = match profile.kind {
                    kbq_core::RepositoryKind::Local => "local",
                    kbq_core::RepositoryKind::Remote => "remote",
                };
                println!(
                    "{:<20} {:<8} {:<40} {}",
                    id.cyan(),
                    kind,
                    profile.name,
                    profile.access.url.as_deref().unwrap_or("-")
                );
            }
            println!("\nTotal: {} profile(s)", profiles.len());
        }
    }

    Ok(())
}

fn print_table(handles: &[KbHandle]) {
    if handles.is_empty() {
        println!("No results.");
        return;
    }

    println!("\n{:<40} {:<6} {:<50}", "LABEL", "LANG", "IDENTIFIER");
    println!("{}", "-".repeat(100));
    for handle in handles {
        println!(
            "{:<40} {:<6} {:<50}",
            handle.ui_label().bold(),
            handle.language.as_deref().unwrap_or("-"),
            handle.identifier
        );
        if let Some(description) = &handle.description {
            println!("  {} {}", "→".cyan(), description.dimmed());
        }
    }
    println!("\nTotal: {} result(s)", handles.len());
}
