use crate::config::ExtractConfig;
use crate::symbol::{MethodSymbol, SourceRange, Symbol, SymbolKind, SymbolRef, TypeShape};
use crate::types::{Node, NodeKind, Subtype};
use std::collections::HashMap;

/// Node table built in one pass over all program symbols.
///
/// Once built it is only read: the link passes share it across threads.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: HashMap<String, Node>,
}

impl Registry {
    pub fn build(symbols: &[Symbol], config: &ExtractConfig) -> Self {
        let mut registry = Self::default();

        for symbol in symbols {
            if symbol.test && !config.include_tests {
                continue;
            }
            registry.register_symbol(symbol, config);
        }

        log::debug!("Registered {} nodes from {} symbols", registry.len(), symbols.len());
        registry
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes sorted by id.
    pub fn into_nodes(self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.into_values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    fn register_symbol(&mut self, symbol: &Symbol, config: &ExtractConfig) {
        let package = symbol.package.clone().unwrap_or_default();
        let id = symbol.symbol_ref().id();
        let test = symbol.test;

        match &symbol.kind {
            SymbolKind::Function { receiver: None } => {
                self.insert(Node {
                    kind: NodeKind::Func,
                    subtype: Some(Subtype::Func),
                    package,
                    id,
                    display_name: symbol.name.clone(),
                    parent_id: None,
                    is_test: test,
                    source_range: render(&symbol.range),
                });
            }
            SymbolKind::Function {
                receiver: Some(receiver),
            } => {
                self.insert(Node {
                    kind: NodeKind::Func,
                    subtype: Some(Subtype::Method),
                    package,
                    id,
                    display_name: format!("{}.{}", receiver_name(receiver), symbol.name),
                    parent_id: None,
                    is_test: test,
                    source_range: render(&symbol.range),
                });
            }
            SymbolKind::Constant => {
                self.insert(Node {
                    kind: NodeKind::Const,
                    subtype: None,
                    package,
                    id,
                    display_name: symbol.name.clone(),
                    parent_id: None,
                    is_test: test,
                    source_range: render(&symbol.range),
                });
            }
            SymbolKind::Variable => {
                self.insert(Node {
                    kind: NodeKind::Var,
                    subtype: Some(Subtype::Basic),
                    package,
                    id,
                    display_name: symbol.name.clone(),
                    parent_id: None,
                    is_test: test,
                    source_range: render(&symbol.range),
                });
            }
            SymbolKind::Type(ty) => {
                let subtype = match &ty.shape {
                    TypeShape::Struct { .. } => Subtype::Struct,
                    TypeShape::Interface { .. } => Subtype::Interface,
                    TypeShape::Basic => Subtype::Basic,
                    TypeShape::Signature => Subtype::Func,
                    TypeShape::Opaque => Subtype::Name,
                };
                self.insert(Node {
                    kind: NodeKind::Type,
                    subtype: Some(subtype),
                    package: package.clone(),
                    id: id.clone(),
                    display_name: symbol.name.clone(),
                    parent_id: None,
                    is_test: test,
                    source_range: render(&symbol.range),
                });

                match &ty.shape {
                    TypeShape::Struct { fields } => {
                        for field in fields {
                            self.insert(Node {
                                kind: NodeKind::Var,
                                subtype: Some(Subtype::Field),
                                package: package.clone(),
                                id: SymbolRef::member(id.clone(), field.name.clone()).id(),
                                display_name: format!("{}.{}", symbol.name, field.name),
                                parent_id: Some(id.clone()),
                                is_test: test,
                                source_range: render(&field.range),
                            });
                        }
                    }
                    TypeShape::Interface { methods, .. } => {
                        for method in methods {
                            self.insert_method(&package, &id, &symbol.name, method, test);
                        }
                    }
                    TypeShape::Basic | TypeShape::Signature | TypeShape::Opaque => {}
                }

                for method in &ty.methods {
                    if method.test && !config.include_tests {
                        continue;
                    }
                    self.insert_method(&package, &id, &symbol.name, method, method.test);
                }
            }
            SymbolKind::Unknown(what) => {
                log::debug!("Skipping symbol {} of unsupported kind {}", id, what);
            }
        }
    }

    fn insert_method(
        &mut self,
        package: &str,
        owner_id: &str,
        owner_name: &str,
        method: &MethodSymbol,
        test: bool,
    ) {
        self.insert(Node {
            kind: NodeKind::Func,
            subtype: Some(Subtype::Method),
            package: package.to_string(),
            id: method.symbol_ref().id(),
            display_name: format!("{}.{}", owner_name, method.name),
            parent_id: Some(owner_id.to_string()),
            is_test: test,
            source_range: render(&method.range),
        });
    }

    fn insert(&mut self, node: Node) {
        if let Some(previous) = self.nodes.insert(node.id.clone(), node) {
            log::debug!("Duplicate node id {}, keeping the later symbol", previous.id);
        }
    }
}

fn render(range: &Option<SourceRange>) -> Option<String> {
    range.as_ref().map(ToString::to_string)
}

/// Bare type name of a printed receiver: `*example.com/m/pkg.Account` -> `Account`.
fn receiver_name(receiver: &str) -> &str {
    let receiver = receiver.trim_start_matches('*');
    let base = receiver.rsplit('/').next().unwrap_or(receiver);
    match base.split_once('.') {
        Some((_, name)) => name,
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{FieldSymbol, Position, TypeExpr, TypeSymbol};
    use pretty_assertions::assert_eq;

    fn symbol(name: &str, kind: SymbolKind) -> Symbol {
        Symbol {
            package: Some("pkg".to_string()),
            name: name.to_string(),
            kind,
            test: false,
            range: None,
        }
    }

    fn account() -> Symbol {
        symbol(
            "Account",
            SymbolKind::Type(TypeSymbol {
                shape: TypeShape::Struct {
                    fields: vec![FieldSymbol {
                        name: "Balance".to_string(),
                        ty: TypeExpr::Other,
                        range: Some(SourceRange {
                            file: "account.go".to_string(),
                            start: Position { line: 4, column: 2 },
                            end: Position { line: 4, column: 13 },
                        }),
                    }],
                },
                methods: vec![MethodSymbol {
                    name: "Withdraw".to_string(),
                    receiver: "*pkg.Account".to_string(),
                    test: false,
                    range: None,
                }],
            }),
        )
    }

    #[test]
    fn struct_emits_type_field_and_method_nodes() {
        let registry = Registry::build(&[account()], &ExtractConfig::default());
        let ids: Vec<String> = registry.into_nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(
            ids,
            vec![
                "(*pkg.Account).Withdraw".to_string(),
                "(pkg.Account).Balance".to_string(),
                "pkg.Account".to_string(),
            ]
        );
    }

    #[test]
    fn field_and_method_nodes_point_at_their_type() {
        let registry = Registry::build(&[account()], &ExtractConfig::default());

        let field = registry.get("(pkg.Account).Balance").unwrap();
        assert_eq!(field.kind, NodeKind::Var);
        assert_eq!(field.subtype, Some(Subtype::Field));
        assert_eq!(field.display_name, "Account.Balance");
        assert_eq!(field.parent_id.as_deref(), Some("pkg.Account"));
        assert_eq!(field.source_range.as_deref(), Some("account.go:4:2-4:13"));

        let method = registry.get("(*pkg.Account).Withdraw").unwrap();
        assert!(method.is_method());
        assert_eq!(method.display_name, "Account.Withdraw");
        assert_eq!(method.parent_id.as_deref(), Some("pkg.Account"));
    }

    #[test]
    fn interface_methods_use_interface_id() {
        let reader = symbol(
            "Reader",
            SymbolKind::Type(TypeSymbol {
                shape: TypeShape::Interface {
                    methods: vec![MethodSymbol {
                        name: "Read".to_string(),
                        receiver: "pkg.Reader".to_string(),
                        test: false,
                        range: None,
                    }],
                    embeds: vec![],
                },
                methods: vec![],
            }),
        );
        let registry = Registry::build(&[reader], &ExtractConfig::default());

        let method = registry.get("(pkg.Reader).Read").unwrap();
        assert_eq!(method.parent_id.as_deref(), Some("pkg.Reader"));
        assert_eq!(
            registry.get("pkg.Reader").unwrap().subtype,
            Some(Subtype::Interface)
        );
    }

    #[test]
    fn values_and_plain_functions() {
        let symbols = vec![
            symbol("Limit", SymbolKind::Constant),
            symbol("Default", SymbolKind::Variable),
            symbol("Open", SymbolKind::Function { receiver: None }),
        ];
        let registry = Registry::build(&symbols, &ExtractConfig::default());

        let limit = registry.get("pkg.Limit").unwrap();
        assert_eq!(limit.kind, NodeKind::Const);
        assert_eq!(limit.subtype, None);

        let default = registry.get("pkg.Default").unwrap();
        assert_eq!(default.subtype, Some(Subtype::Basic));

        let open = registry.get("pkg.Open").unwrap();
        assert_eq!(open.subtype, Some(Subtype::Func));
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let symbols = vec![symbol("fmt", SymbolKind::Unknown("package name".to_string()))];
        let registry = Registry::build(&symbols, &ExtractConfig::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let mut first = symbol("Thing", SymbolKind::Constant);
        first.test = true;
        let second = symbol("Thing", SymbolKind::Variable);

        let registry = Registry::build(&[first, second], &ExtractConfig::default());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("pkg.Thing").unwrap().kind, NodeKind::Var);
    }

    #[test]
    fn test_symbols_are_tagged_or_dropped() {
        let mut helper = symbol("helper", SymbolKind::Function { receiver: None });
        helper.test = true;

        let registry = Registry::build(std::slice::from_ref(&helper), &ExtractConfig::default());
        assert!(registry.get("pkg.helper").unwrap().is_test);

        let registry = Registry::build(&[helper], &ExtractConfig::default().without_tests());
        assert!(registry.is_empty());
    }

    #[test]
    fn standalone_method_display_name() {
        let method = symbol(
            "Close",
            SymbolKind::Function {
                receiver: Some("*example.com/m/pkg.File".to_string()),
            },
        );
        let registry = Registry::build(&[method], &ExtractConfig::default());
        let node = registry.get("(*example.com/m/pkg.File).Close").unwrap();
        assert_eq!(node.display_name, "File.Close");
        assert!(node.is_method());
    }
}
