use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use symgraph_go::{GoError, LoadConfig};
use symgraph_graph::{ExtractConfig, Graph, GraphBuilder, Link, NodeKind, Subtype};
use tempfile::TempDir;

const ACCOUNT: &str = "package bank

type Account struct {
\tBalance int
}

func (a *Account) Withdraw(n int) {
\ta.Balance -= n
}
";

fn module(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "go.mod", "module example.com/m\n\ngo 1.22\n");
    for (path, source) in files {
        write(dir.path(), path, source);
    }
    dir
}

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn graph_with(dir: &TempDir, patterns: &[&str], load: LoadConfig, extract: ExtractConfig) -> Graph {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    let program = symgraph_go::load(&patterns, &load).unwrap();
    GraphBuilder::new(extract).build(&program)
}

fn graph(dir: &TempDir, patterns: &[&str]) -> Graph {
    graph_with(
        dir,
        patterns,
        LoadConfig::new(dir.path()),
        ExtractConfig::default(),
    )
}

fn ids(graph: &Graph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn account_example_end_to_end() {
    let dir = module(&[("bank/account.go", ACCOUNT)]);
    let graph = graph(&dir, &["./..."]);

    assert_eq!(
        ids(&graph),
        vec![
            "(*example.com/m/bank.Account).Withdraw",
            "(example.com/m/bank.Account).Balance",
            "example.com/m/bank.Account",
        ]
    );
    assert_eq!(
        graph.links,
        vec![
            Link::new(
                "(*example.com/m/bank.Account).Withdraw",
                "(example.com/m/bank.Account).Balance"
            ),
            Link::new(
                "(*example.com/m/bank.Account).Withdraw",
                "example.com/m/bank.Account"
            ),
            Link::new(
                "(example.com/m/bank.Account).Balance",
                "example.com/m/bank.Account"
            ),
        ]
    );

    let withdraw = graph.node("(*example.com/m/bank.Account).Withdraw").unwrap();
    assert_eq!(withdraw.kind, NodeKind::Func);
    assert_eq!(withdraw.subtype, Some(Subtype::Method));
    assert_eq!(withdraw.display_name, "Account.Withdraw");
    assert_eq!(withdraw.parent_id.as_deref(), Some("example.com/m/bank.Account"));
    assert_eq!(withdraw.package, "example.com/m/bank");

    let balance = graph.node("(example.com/m/bank.Account).Balance").unwrap();
    assert_eq!(balance.subtype, Some(Subtype::Field));
    assert_eq!(balance.source_range.as_deref(), Some("bank/account.go:4:2-4:13"));

    let account = graph.node("example.com/m/bank.Account").unwrap();
    assert_eq!(account.subtype, Some(Subtype::Struct));
    assert_eq!(account.source_range.as_deref(), Some("bank/account.go:3:6-5:2"));
}

#[test]
fn references_cross_package_boundaries() {
    let dir = module(&[
        ("bank/account.go", ACCOUNT),
        (
            "main.go",
            "package main

import \"example.com/m/bank\"

func main() {
\tacct := &bank.Account{Balance: 10}
\tacct.Withdraw(1)
}
",
        ),
    ]);
    let graph = graph(&dir, &["./..."]);

    let from_main: Vec<&str> = graph
        .links
        .iter()
        .filter(|l| l.from == "example.com/m.main")
        .map(|l| l.to.as_str())
        .collect();
    assert_eq!(
        from_main,
        vec![
            "(*example.com/m/bank.Account).Withdraw",
            "example.com/m/bank.Account",
        ]
    );
}

#[test]
fn interface_method_calls_link_to_the_method() {
    let dir = module(&[(
        "bank/store.go",
        "package bank

type Store interface {
\tLoad(id string) error
}

type ClosingStore interface {
\tStore
\tClose() error
}

type Backend Store

func Sync(s Store) error {
\treturn s.Load(\"x\")
}

func Shutdown(c ClosingStore) error {
\tc.Load(\"y\")
\treturn c.Close()
}

func Flush(b Backend) error {
\treturn b.Load(\"z\")
}
",
    )]);

    let plain = graph(&dir, &["./bank"]);
    for link in [
        ("(example.com/m/bank.Store).Load", "example.com/m/bank.Store"),
        ("example.com/m/bank.Sync", "(example.com/m/bank.Store).Load"),
        ("example.com/m/bank.Shutdown", "(example.com/m/bank.Store).Load"),
        (
            "example.com/m/bank.Shutdown",
            "(example.com/m/bank.ClosingStore).Close",
        ),
        ("example.com/m/bank.Flush", "(example.com/m/bank.Store).Load"),
    ] {
        assert!(plain.links.contains(&Link::new(link.0, link.1)), "{link:?}");
    }

    let linked = graph_with(
        &dir,
        &["./bank"],
        LoadConfig::new(dir.path()),
        ExtractConfig::default().with_interface_member_links(true),
    );
    assert!(linked.links.contains(&Link::new(
        "example.com/m/bank.Sync",
        "(example.com/m/bank.Store).Load"
    )));
    assert!(linked
        .links
        .iter()
        .all(|l| linked.node(&l.from).is_some() && linked.node(&l.to).is_some()));
}

#[test]
fn methods_on_alias_receivers_bind_to_the_target_type() {
    let dir = module(&[
        ("bank/account.go", ACCOUNT),
        (
            "bank/alias.go",
            "package bank

type Acct = Account

func (a *Acct) Deposit(n int) {
\ta.Balance += n
}

func Pay(a *Acct) {
\ta.Deposit(1)
}
",
        ),
    ]);
    let graph = graph(&dir, &["./bank"]);

    let deposit = graph.node("(*example.com/m/bank.Account).Deposit").unwrap();
    assert_eq!(deposit.subtype, Some(Subtype::Method));
    assert_eq!(deposit.parent_id.as_deref(), Some("example.com/m/bank.Account"));
    assert!(graph.node("(*example.com/m/bank.Acct).Deposit").is_none());

    for link in [
        (
            "(*example.com/m/bank.Account).Deposit",
            "example.com/m/bank.Account",
        ),
        (
            "(*example.com/m/bank.Account).Deposit",
            "(example.com/m/bank.Account).Balance",
        ),
        (
            "example.com/m/bank.Pay",
            "(*example.com/m/bank.Account).Deposit",
        ),
    ] {
        assert!(graph.links.contains(&Link::new(link.0, link.1)), "{link:?}");
    }
}

#[test]
fn test_files_are_tagged_or_excluded() {
    let dir = module(&[
        ("bank/account.go", ACCOUNT),
        (
            "bank/account_test.go",
            "package bank

import \"testing\"

func TestWithdraw(t *testing.T) {
\ta := &Account{Balance: 5}
\ta.Withdraw(1)
}
",
        ),
    ]);

    let with_tests = graph(&dir, &["./..."]);
    let test = with_tests.node("example.com/m/bank.TestWithdraw").unwrap();
    assert!(test.is_test);
    assert!(with_tests.links.contains(&Link::new(
        "example.com/m/bank.TestWithdraw",
        "(*example.com/m/bank.Account).Withdraw"
    )));

    let without = graph_with(
        &dir,
        &["./..."],
        LoadConfig::new(dir.path()).with_tests(false),
        ExtractConfig::default().without_tests(),
    );
    assert!(without.node("example.com/m/bank.TestWithdraw").is_none());
    assert!(without.nodes.iter().all(|n| !n.is_test));
}

#[test]
fn import_path_patterns_resolve_inside_module() {
    let dir = module(&[
        ("bank/account.go", ACCOUNT),
        ("util/util.go", "package util\n\nfunc Helper() {}\n"),
    ]);

    let graph = graph(&dir, &["example.com/m/util"]);
    assert_eq!(ids(&graph), vec!["example.com/m/util.Helper"]);
}

#[test]
fn syntax_errors_abort_loading() {
    let dir = module(&[("bad/bad.go", "package bad\n\nfunc Broken( {\n")]);
    let err = symgraph_go::load(&["./...".to_string()], &LoadConfig::new(dir.path())).unwrap_err();
    match err {
        GoError::Syntax { file, .. } => assert_eq!(file, "bad/bad.go"),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn missing_module_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.go", "package main\n");
    let err = symgraph_go::load(&[".".to_string()], &LoadConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, GoError::NoModule(_)));
}

#[test]
fn unknown_pattern_is_reported() {
    let dir = module(&[("bank/account.go", ACCOUNT)]);
    let err = symgraph_go::load(&["./missing".to_string()], &LoadConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, GoError::PackageNotFound(_)));
}
