/**
 * mode.rs
 * Per-mode membership and hierarchy patterns
 *
 * Each mode is a resolver with the same fixed method set. Hierarchy operations a mode does
 * not define return `KbqError::UnsupportedOperation` instead of an empty pattern.
 */

use std::fmt;
use std::str::FromStr;

use super::pattern::{var, Expression, GraphPattern, PropertyPath, Term};
use crate::errors::{KbqError, Result};
use crate::kb::KnowledgeBase;
use crate::vocab::{owl, rdf, rdfs};

const OTHER_SUBCLASS: &str = "otherSubclass";
const SUPER_CLASS: &str = "superClass";

/// The kind of entity a builder searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Item,
    Class,
    Instance,
    Property,
}

impl Mode {
    pub fn resolver(self) -> &'static dyn ModeResolver {
        match self {
            Mode::Item => &ItemMode,
            Mode::Class => &ClassMode,
            Mode::Instance => &InstanceMode,
            Mode::Property => &PropertyMode,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Item => "item",
            Mode::Class => "class",
            Mode::Instance => "instance",
            Mode::Property => "property",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = KbqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "item" | "items" => Ok(Mode::Item),
            "class" | "classes" => Ok(Mode::Class),
            "instance" | "instances" => Ok(Mode::Instance),
            "property" | "properties" => Ok(Mode::Property),
            other => Err(KbqError::Config(format!("Unknown mode: {}", other))),
        }
    }
}

/// Hierarchy and label rules of one mode
pub trait ModeResolver: Sync {
    fn mode(&self) -> Mode;

    /// Membership condition added when a builder is created for this mode. It binds
    /// `?subj` itself so it restricts even when nothing else in the restrictive group does.
    fn type_restriction(&self, kb: &KnowledgeBase) -> Option<GraphPattern>;

    fn roots_pattern(&self, _kb: &KnowledgeBase) -> Result<GraphPattern> {
        Err(unsupported(self.mode(), "roots"))
    }

    fn ancestors_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern>;

    fn descendants_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern>;

    fn children_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern>;

    fn parents_pattern(&self, _kb: &KnowledgeBase, _context: &str) -> Result<GraphPattern> {
        Err(unsupported(self.mode(), "parents"))
    }

    fn label_property<'kb>(&self, kb: &'kb KnowledgeBase) -> &'kb str {
        &kb.mapping.label
    }

    fn description_property<'kb>(&self, kb: &'kb KnowledgeBase) -> &'kb str {
        &kb.mapping.description
    }

    fn additional_matching_properties<'kb>(&self, kb: &'kb KnowledgeBase) -> &'kb [String] {
        &kb.additional_matching_properties
    }
}

fn unsupported(mode: Mode, operation: &'static str) -> KbqError {
    KbqError::UnsupportedOperation { mode, operation }
}

pub struct ItemMode;
pub struct ClassMode;
pub struct InstanceMode;
pub struct PropertyMode;

impl ModeResolver for ItemMode {
    fn mode(&self) -> Mode {
        Mode::Item
    }

    fn type_restriction(&self, _kb: &KnowledgeBase) -> Option<GraphPattern> {
        None
    }

    fn ancestors_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(upward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of).one_or_more(), true))
    }

    fn descendants_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(downward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of).one_or_more(), true))
    }

    fn children_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(downward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of), true))
    }
}

impl ModeResolver for ClassMode {
    fn mode(&self) -> Mode {
        Mode::Class
    }

    fn type_restriction(&self, kb: &KnowledgeBase) -> Option<GraphPattern> {
        let mut branches = vec![
            subject().has(&kb.mapping.instance_of, Term::iri(&kb.mapping.class)),
            Term::Anon.has(&kb.mapping.subclass_of, subject()),
            subject().has(&kb.mapping.subclass_of, Term::Anon),
        ];
        if is_owl_class(kb) {
            branches.push(subject().has(intersection_path(), Term::Anon));
        }
        Some(GraphPattern::union(branches))
    }

    fn roots_pattern(&self, kb: &KnowledgeBase) -> Result<GraphPattern> {
        if !kb.root_concepts.is_empty() {
            let roots = kb.root_concepts.iter().map(Term::iri).collect();
            return Ok(GraphPattern::values(var::SUBJECT, roots));
        }

        let candidates = GraphPattern::union(vec![
            subject().has(&kb.mapping.instance_of, Term::iri(&kb.mapping.class)),
            Term::Anon.has(&kb.mapping.subclass_of, subject()),
        ]);

        let mut non_roots = vec![subject()
            .has(&kb.mapping.subclass_of, Term::var(OTHER_SUBCLASS))
            .filter(Expression::not_equal(var::SUBJECT, OTHER_SUBCLASS))];
        if is_owl_class(kb) {
            non_roots.push(subject().has(owl::INTERSECTION_OF, Term::Anon));
        }

        Ok(candidates.filter_not_exists(GraphPattern::union(non_roots)))
    }

    fn ancestors_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(upward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of).one_or_more(), true))
    }

    fn descendants_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(downward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of).one_or_more(), false))
    }

    fn children_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(downward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of), false))
    }

    fn parents_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(upward_union(kb, context, PropertyPath::iri(&kb.mapping.subclass_of), false))
    }
}

impl ModeResolver for InstanceMode {
    fn mode(&self) -> Mode {
        Mode::Instance
    }

    fn type_restriction(&self, kb: &KnowledgeBase) -> Option<GraphPattern> {
        Some(
            subject()
                .has(&kb.mapping.instance_of, Term::Anon)
                .filter_not_exists(subject().has(&kb.mapping.instance_of, Term::iri(&kb.mapping.class)))
                .filter_not_exists(Term::Anon.has(&kb.mapping.subclass_of, subject()))
                .filter_not_exists(subject().has(&kb.mapping.subclass_of, Term::Anon)),
        )
    }

    fn ancestors_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(Term::iri(context).has(type_then_subclasses(kb), subject()))
    }

    fn descendants_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(subject().has(type_then_subclasses(kb), Term::iri(context)))
    }

    fn children_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(subject().has(&kb.mapping.instance_of, Term::iri(context)))
    }
}

impl ModeResolver for PropertyMode {
    fn mode(&self) -> Mode {
        Mode::Property
    }

    fn type_restriction(&self, kb: &KnowledgeBase) -> Option<GraphPattern> {
        Some(is_property_pattern(kb))
    }

    fn ancestors_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(Term::iri(context).has(PropertyPath::iri(&kb.mapping.subproperty_of).one_or_more(), subject()))
    }

    fn descendants_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(subject().has(PropertyPath::iri(&kb.mapping.subproperty_of).one_or_more(), Term::iri(context)))
    }

    fn children_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(subject().has(&kb.mapping.subproperty_of, Term::iri(context)))
    }

    fn parents_pattern(&self, kb: &KnowledgeBase, context: &str) -> Result<GraphPattern> {
        Ok(Term::iri(context).has(&kb.mapping.subproperty_of, subject()))
    }

    fn label_property<'kb>(&self, kb: &'kb KnowledgeBase) -> &'kb str {
        &kb.mapping.property_label
    }

    fn description_property<'kb>(&self, kb: &'kb KnowledgeBase) -> &'kb str {
        &kb.mapping.property_description
    }

    fn additional_matching_properties<'kb>(&self, _kb: &'kb KnowledgeBase) -> &'kb [String] {
        &[]
    }
}

fn subject() -> Term {
    Term::var(var::SUBJECT)
}

fn is_owl_class(kb: &KnowledgeBase) -> bool {
    kb.mapping.class == owl::CLASS
}

/// `owl:intersectionOf/rdf:rest*/rdf:first`
fn intersection_path() -> PropertyPath {
    PropertyPath::sequence(vec![
        PropertyPath::iri(owl::INTERSECTION_OF),
        PropertyPath::iri(rdf::REST).zero_or_more(),
        PropertyPath::iri(rdf::FIRST),
    ])
}

/// `type/subClassOf*`
fn type_then_subclasses(kb: &KnowledgeBase) -> PropertyPath {
    PropertyPath::sequence(vec![
        PropertyPath::iri(&kb.mapping.instance_of),
        PropertyPath::iri(&kb.mapping.subclass_of).zero_or_more(),
    ])
}

/// `?subj` below the context: via `subclass_step`, optionally via typing, and via
/// intersection definitions on OWL knowledge bases
fn downward_union(
    kb: &KnowledgeBase,
    context: &str,
    subclass_step: PropertyPath,
    through_type: bool,
) -> GraphPattern {
    let direct = matches!(subclass_step, PropertyPath::Link(_));
    let mut branches = vec![subject().has(subclass_step, Term::iri(context))];
    if through_type {
        let type_step = if direct {
            PropertyPath::iri(&kb.mapping.instance_of)
        } else {
            type_then_subclasses(kb)
        };
        branches.push(subject().has(type_step, Term::iri(context)));
    }
    if is_owl_class(kb) {
        branches.push(subject().has(intersection_path(), Term::iri(context)));
    }
    GraphPattern::union(branches)
}

/// `?subj` above the context; mirror image of [`downward_union`]
fn upward_union(
    kb: &KnowledgeBase,
    context: &str,
    subclass_step: PropertyPath,
    transitive_type: bool,
) -> GraphPattern {
    let type_step = if transitive_type {
        type_then_subclasses(kb)
    } else {
        PropertyPath::iri(&kb.mapping.instance_of)
    };
    let mut branches = vec![
        Term::iri(context).has(subclass_step, subject()),
        Term::iri(context).has(type_step, subject()),
    ];
    if is_owl_class(kb) {
        branches.push(Term::iri(context).has(intersection_path(), subject()));
    }
    GraphPattern::union(branches)
}

/// `?subj` is declared, inferred, or used as a property
pub(crate) fn is_property_pattern(kb: &KnowledgeBase) -> GraphPattern {
    GraphPattern::union(vec![
        subject().has(type_then_subclasses(kb), Term::iri(&kb.mapping.property_type)),
        Term::Anon.has(&kb.mapping.subproperty_of, subject()),
        subject().has(&kb.mapping.subproperty_of, Term::Anon),
    ])
}

/// Properties applicable to instances of `domain`: those whose declared domain is the class
/// or one of its super-classes, plus properties without any declared or inherited domain
pub(crate) fn matching_domain_pattern(kb: &KnowledgeBase, domain: &str) -> GraphPattern {
    let declared = GraphPattern::group(vec![
        Term::iri(domain).has(
            PropertyPath::iri(&kb.mapping.subclass_of).zero_or_more(),
            Term::var(SUPER_CLASS),
        ),
        subject().has(rdfs::DOMAIN, Term::var(SUPER_CLASS)),
    ]);

    let undeclared = is_property_pattern(kb).filter_not_exists(subject().has(
        PropertyPath::sequence(vec![
            PropertyPath::iri(&kb.mapping.subproperty_of).zero_or_more(),
            PropertyPath::iri(rdfs::DOMAIN),
        ]),
        Term::Anon,
    ));

    GraphPattern::union(vec![declared, undeclared])
}
