use pretty_assertions::assert_eq;
use symgraph_graph::{
    ExtractConfig, FieldSymbol, GraphBuilder, Link, MethodSymbol, NodeKind, Position,
    ResolvedProgram, SourceRange, Subtype, Symbol, SymbolKind, SymbolRef, Syntax, SyntaxUnit,
    TypeExpr, TypeShape, TypeSymbol,
};

fn range(line: usize, column: usize, end_line: usize, end_column: usize) -> Option<SourceRange> {
    Some(SourceRange {
        file: "account.go".to_string(),
        start: Position { line, column },
        end: Position {
            line: end_line,
            column: end_column,
        },
    })
}

fn account_ref() -> SymbolRef {
    SymbolRef::package("pkg", "Account")
}

/// ```go
/// package pkg
///
/// type Account struct {
///     Balance int
/// }
///
/// func (a *Account) Withdraw(n int) {
///     a.Balance -= n
/// }
/// ```
fn account_program() -> ResolvedProgram {
    let account = Symbol {
        package: Some("pkg".to_string()),
        name: "Account".to_string(),
        kind: SymbolKind::Type(TypeSymbol {
            shape: TypeShape::Struct {
                fields: vec![FieldSymbol {
                    name: "Balance".to_string(),
                    ty: TypeExpr::Other,
                    range: range(4, 2, 4, 13),
                }],
            },
            methods: vec![MethodSymbol {
                name: "Withdraw".to_string(),
                receiver: "*pkg.Account".to_string(),
                test: false,
                range: range(7, 1, 9, 2),
            }],
        }),
        test: false,
        range: range(3, 6, 5, 2),
    };

    let unit = SyntaxUnit {
        file: "account.go".to_string(),
        items: vec![
            Syntax::Declaration {
                declares: Some(account_ref()),
                children: vec![Syntax::Declaration {
                    declares: Some(SymbolRef::member("pkg.Account", "Balance")),
                    children: vec![],
                }],
            },
            Syntax::Declaration {
                declares: Some(SymbolRef::method("*pkg.Account", "Withdraw")),
                children: vec![
                    Syntax::Declaration {
                        declares: Some(SymbolRef::package("pkg", "a")),
                        children: vec![Syntax::Name(account_ref())],
                    },
                    Syntax::Declaration {
                        declares: Some(SymbolRef::package("pkg", "n")),
                        children: vec![],
                    },
                    Syntax::MemberAccess {
                        member: Some("Balance".to_string()),
                        receiver: Some(TypeExpr::Pointer(Box::new(TypeExpr::Named(
                            account_ref(),
                        )))),
                        children: vec![],
                    },
                ],
            },
        ],
    };

    ResolvedProgram {
        symbols: vec![account],
        units: vec![unit],
    }
}

#[test]
fn account_example_produces_expected_graph() {
    let graph = GraphBuilder::default().build(&account_program());

    let nodes: Vec<(&str, NodeKind, Option<Subtype>, &str)> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.kind, n.subtype, n.display_name.as_str()))
        .collect();
    assert_eq!(
        nodes,
        vec![
            (
                "(*pkg.Account).Withdraw",
                NodeKind::Func,
                Some(Subtype::Method),
                "Account.Withdraw"
            ),
            (
                "(pkg.Account).Balance",
                NodeKind::Var,
                Some(Subtype::Field),
                "Account.Balance"
            ),
            ("pkg.Account", NodeKind::Type, Some(Subtype::Struct), "Account"),
        ]
    );

    assert_eq!(
        graph.links,
        vec![
            Link::new("(*pkg.Account).Withdraw", "(pkg.Account).Balance"),
            Link::new("(*pkg.Account).Withdraw", "pkg.Account"),
            Link::new("(pkg.Account).Balance", "pkg.Account"),
        ]
    );
}

#[test]
fn positions_are_rendered_on_nodes() {
    let graph = GraphBuilder::default().build(&account_program());
    let account = graph.node("pkg.Account").unwrap();
    assert_eq!(account.source_range.as_deref(), Some("account.go:3:6-5:2"));
}

#[test]
fn every_link_endpoint_is_a_node() {
    let mut program = account_program();
    program.units[0].items.push(Syntax::Declaration {
        declares: Some(SymbolRef::method("*pkg.Account", "Withdraw")),
        children: vec![
            Syntax::Name(SymbolRef::package("fmt", "Println")),
            Syntax::MemberAccess {
                member: Some("Missing".to_string()),
                receiver: Some(TypeExpr::Named(account_ref())),
                children: vec![],
            },
        ],
    });

    let graph = GraphBuilder::default().build(&program);
    for link in &graph.links {
        assert!(graph.node(&link.from).is_some(), "dangling from {}", link.from);
        assert!(graph.node(&link.to).is_some(), "dangling to {}", link.to);
    }
}

#[test]
fn output_is_identical_across_runs_and_unit_order() {
    let mut program = account_program();
    program.units.push(SyntaxUnit {
        file: "other.go".to_string(),
        items: vec![Syntax::Declaration {
            declares: Some(account_ref()),
            children: vec![Syntax::Name(account_ref())],
        }],
    });

    let first = GraphBuilder::default().build(&program).to_json().unwrap();
    program.units.reverse();
    let second = GraphBuilder::default().build(&program).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn node_ids_are_unique() {
    let graph = GraphBuilder::default().build(&account_program());
    let mut ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_symbols_can_be_excluded() {
    let mut program = account_program();
    program.symbols.push(Symbol {
        package: Some("pkg".to_string()),
        name: "TestWithdraw".to_string(),
        kind: SymbolKind::Function { receiver: None },
        test: true,
        range: None,
    });

    let with_tests = GraphBuilder::default().build(&program);
    assert!(with_tests.node("pkg.TestWithdraw").unwrap().is_test);

    let without = GraphBuilder::new(ExtractConfig::default().without_tests()).build(&program);
    assert!(without.node("pkg.TestWithdraw").is_none());
}
