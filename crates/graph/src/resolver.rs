use crate::config::ExtractConfig;
use crate::links::LinkSet;
use crate::registry::Registry;
use crate::symbol::{Syntax, SyntaxUnit, TypeExpr};
use crate::types::Subtype;
use rayon::prelude::*;

/// Usage links discovered in syntax outlines.
///
/// Every reference is attributed to its innermost enclosing declaration that
/// resolves to a tracked node. Units are walked in parallel and merged by
/// set union.
pub struct ReferenceResolver<'a> {
    registry: &'a Registry,
    config: &'a ExtractConfig,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a Registry, config: &'a ExtractConfig) -> Self {
        Self { registry, config }
    }

    pub fn resolve(&self, units: &[SyntaxUnit]) -> LinkSet {
        units
            .par_iter()
            .map(|unit| self.resolve_unit(unit))
            .reduce(LinkSet::new, LinkSet::union)
    }

    pub fn resolve_unit(&self, unit: &SyntaxUnit) -> LinkSet {
        let mut links = LinkSet::new();
        for item in &unit.items {
            self.walk(item, None, &mut links);
        }
        log::debug!("Resolved {} candidate links in {}", links.len(), unit.file);
        links
    }

    fn walk(&self, syntax: &Syntax, enclosing: Option<&str>, links: &mut LinkSet) {
        match syntax {
            Syntax::Declaration { declares, children } => {
                let declared = declares
                    .as_ref()
                    .map(|symbol| symbol.id())
                    .filter(|id| self.registry.contains(id));
                let enclosing = declared.as_deref().or(enclosing);
                for child in children {
                    self.walk(child, enclosing, links);
                }
            }
            Syntax::Name(target) => {
                if let Some(from) = enclosing {
                    links.insert(from, target.id());
                }
            }
            Syntax::MemberAccess {
                member,
                receiver,
                children,
            } => {
                if let (Some(from), Some(member), Some(receiver)) = (enclosing, member, receiver) {
                    self.member_links(from, member, receiver, links);
                }
                for child in children {
                    self.walk(child, enclosing, links);
                }
            }
        }
    }

    fn member_links(&self, from: &str, member: &str, receiver: &TypeExpr, links: &mut LinkSet) {
        for named in receiver.named_types() {
            let owner = named.id();
            let Some(node) = self.registry.get(&owner) else {
                continue;
            };
            let eligible = match node.subtype {
                Some(Subtype::Struct) => true,
                Some(Subtype::Interface) => self.config.interface_member_links,
                _ => false,
            };
            if eligible {
                links.insert(from, format!("({owner}).{member}"));
            }
        }
    }
}
