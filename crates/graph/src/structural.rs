use crate::links::LinkSet;
use crate::registry::Registry;
use crate::symbol::{Symbol, SymbolKind, SymbolRef, TypeShape, TypeSymbol};
use rayon::prelude::*;

/// Links implied by type declarations alone: method ownership, interface
/// composition and struct field types.
pub struct StructuralDeriver<'a> {
    registry: &'a Registry,
}

impl<'a> StructuralDeriver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn derive(&self, symbols: &[Symbol]) -> LinkSet {
        symbols
            .par_iter()
            .filter_map(|symbol| match &symbol.kind {
                SymbolKind::Type(ty) => Some((symbol, ty)),
                _ => None,
            })
            .fold(LinkSet::new, |mut links, (symbol, ty)| {
                self.derive_type(symbol, ty, &mut links);
                links
            })
            .reduce(LinkSet::new, LinkSet::union)
    }

    fn derive_type(&self, symbol: &Symbol, ty: &TypeSymbol, links: &mut LinkSet) {
        let type_id = symbol.symbol_ref().id();
        if !self.registry.contains(&type_id) {
            return;
        }

        for method in &ty.methods {
            links.insert(method.symbol_ref().id(), type_id.as_str());
        }

        match &ty.shape {
            TypeShape::Interface { methods, embeds } => {
                for method in methods {
                    links.insert(method.symbol_ref().id(), type_id.as_str());
                }
                for embedded in embeds.iter().flat_map(|e| e.named_types()) {
                    let embedded_id = embedded.id();
                    if self.registry.contains(&embedded_id) {
                        links.insert(type_id.as_str(), embedded_id);
                    }
                }
            }
            TypeShape::Struct { fields } => {
                for field in fields {
                    let field_id = SymbolRef::member(type_id.as_str(), field.name.as_str()).id();
                    for used in field.ty.named_types() {
                        let used_id = used.id();
                        if self.registry.contains(&used_id) {
                            links.insert(field_id.as_str(), used_id);
                        }
                    }
                    links.insert(field_id, type_id.as_str());
                }
            }
            TypeShape::Basic | TypeShape::Signature | TypeShape::Opaque => {}
        }
    }
}
