use crate::ast::{NodeMap, Syntax};
use crate::parse;
use crate::scope::{build_scopes, BindingId, BindingKind, ScopeId, ScopeKind, ScopeTree};
use crate::source::SourceRange;

fn scopes(src: &str) -> ScopeTree {
    let program = parse(src.as_bytes().to_vec()).unwrap();
    build_scopes(&program.node_map, program.root).unwrap()
}

fn lookup(tree: &ScopeTree, scope: ScopeId, name: &str) -> Option<BindingId> {
    tree.scope(scope).lookup(&SourceRange::anonymous(name))
}

fn child(tree: &ScopeTree, scope: ScopeId, i: usize) -> ScopeId {
    tree.scope(scope).children()[i]
}

#[test]
fn test_var_hoists_to_function_scope() {
    let tree = scopes("function f() { { var x = 1; let y; } }");
    let root = tree.root();
    assert!(lookup(&tree, root, "f").is_some());
    let func = child(&tree, root, 0);
    assert_eq!(tree.scope(func).kind(), ScopeKind::Function);
    let block = child(&tree, func, 0);
    assert_eq!(tree.scope(block).kind(), ScopeKind::Block);

    let x = lookup(&tree, func, "x").unwrap();
    assert_eq!(tree.binding(x).kind(), BindingKind::Var);
    assert!(lookup(&tree, block, "x").is_none());
    let y = lookup(&tree, block, "y").unwrap();
    assert_eq!(tree.binding(y).kind(), BindingKind::Let);
    assert!(lookup(&tree, func, "y").is_none());
}

#[test]
fn test_lexical_declarations_stay_in_block() {
    let tree = scopes("{ let a = 1; const b = 2; class C {} } a;");
    let root = tree.root();
    assert!(lookup(&tree, root, "a").is_none());
    assert!(tree.free_names().contains(&SourceRange::anonymous("a")));
    let block = child(&tree, root, 0);
    let b = lookup(&tree, block, "b").unwrap();
    assert_eq!(tree.binding(b).kind(), BindingKind::Const);
    let c = lookup(&tree, block, "C").unwrap();
    assert_eq!(tree.binding(c).kind(), BindingKind::Class);
}

#[test]
fn test_references_before_declaration_resolve() {
    let tree = scopes("f(); function f() {} g = x; var x;");
    let root = tree.root();
    let f = lookup(&tree, root, "f").unwrap();
    assert_eq!(tree.binding(f).references().len(), 1);
    let x = lookup(&tree, root, "x").unwrap();
    assert_eq!(tree.binding(x).references().len(), 1);
    assert!(tree.free_names().contains(&SourceRange::anonymous("g")));
    assert!(!tree.free_names().contains(&SourceRange::anonymous("x")));
}

#[test]
fn test_redeclaration_reuses_binding() {
    let tree = scopes("var a = 1; var a = 2; a;");
    let root = tree.root();
    let a = lookup(&tree, root, "a").unwrap();
    assert_eq!(tree.binding(a).declarations().len(), 2);
    assert_eq!(tree.binding(a).references().len(), 1);
    assert_eq!(tree.scope(root).bindings().len(), 1);
}

#[test]
fn test_shadowing_parameter() {
    let tree = scopes("let a = 1; function f(a) { return a; }");
    let root = tree.root();
    let outer = lookup(&tree, root, "a").unwrap();
    assert!(tree.binding(outer).references().is_empty());
    let func = child(&tree, root, 0);
    let param = lookup(&tree, func, "a").unwrap();
    assert_eq!(tree.binding(param).kind(), BindingKind::Parameter);
    assert_eq!(tree.binding(param).references().len(), 1);
}

#[test]
fn test_block_function_shares_binding_with_closure() {
    let tree = scopes("function outer() { { function inner() {} } inner(); }");
    let func = child(&tree, tree.root(), 0);
    let block = child(&tree, func, 0);
    let in_block = lookup(&tree, block, "inner").unwrap();
    let in_func = lookup(&tree, func, "inner").unwrap();
    assert_eq!(in_block, in_func);
    let b = tree.binding(in_block);
    assert_eq!(b.kind(), BindingKind::Function);
    assert_eq!(b.scope(), block);
    assert_eq!(b.hoisted(), Some(func));
    assert_eq!(b.references().len(), 1);
}

#[test]
fn test_catch_parameter_scope() {
    let tree = scopes("try {} catch (e) { e; }");
    let root = tree.root();
    assert!(lookup(&tree, root, "e").is_none());
    let e = tree
        .binding_ids()
        .find(|&b| *tree.binding(b).name() == *"e")
        .unwrap();
    assert_eq!(tree.binding(e).kind(), BindingKind::CatchParameter);
    assert_eq!(tree.binding(e).references().len(), 1);
    assert!(tree.free_names().is_empty());
}

#[test]
fn test_function_expression_name_is_local() {
    let tree = scopes("(function self() { return self; });");
    let root = tree.root();
    assert!(lookup(&tree, root, "self").is_none());
    let func = child(&tree, root, 0);
    let s = lookup(&tree, func, "self").unwrap();
    assert_eq!(tree.binding(s).kind(), BindingKind::Function);
    assert_eq!(tree.binding(s).references().len(), 1);
}

#[test]
fn test_outer_references() {
    let tree = scopes("function f(a) { let b; return () => a + c; }");
    let func = child(&tree, tree.root(), 0);
    let arrow = child(&tree, func, 0);
    let a = lookup(&tree, func, "a").unwrap();
    let b = lookup(&tree, func, "b").unwrap();
    let outer = tree.scope(arrow).outer_references();
    assert!(outer.contains(&a));
    assert!(!outer.contains(&b));
    assert_eq!(outer.len(), 1);
    assert!(tree.free_names().contains(&SourceRange::anonymous("c")));
}

#[test]
fn test_eval_marks_enclosing_scopes_dynamic() {
    let tree = scopes("function f() { function g() { eval('1'); } } function h() {}");
    let root = tree.root();
    let f = child(&tree, root, 0);
    let g = child(&tree, f, 0);
    let h = child(&tree, root, 1);
    assert!(tree.scope(g).is_dynamic());
    assert!(tree.scope(f).is_dynamic());
    assert!(tree.scope(root).is_dynamic());
    assert!(!tree.scope(h).is_dynamic());
}

#[test]
fn test_shadowed_eval_is_not_dynamic() {
    let tree = scopes("function f(eval) { eval('1'); }");
    let func = child(&tree, tree.root(), 0);
    assert!(!tree.scope(func).is_dynamic());
}

#[test]
fn test_with_marks_scope_dynamic() {
    let tree = scopes("function f(o) { with (o) { x; } } function g(p) {}");
    let root = tree.root();
    let f = child(&tree, root, 0);
    let g = child(&tree, root, 1);
    assert!(tree.scope(f).is_dynamic());
    assert!(!tree.scope(g).is_dynamic());
    let o = lookup(&tree, f, "o").unwrap();
    assert!(tree.is_binding_exposed(o));
}

#[test]
fn test_binding_exposure() {
    let tree = scopes("var g; function f(a) { { function inner() {} } }");
    let root = tree.root();
    let g = lookup(&tree, root, "g").unwrap();
    assert!(tree.is_binding_exposed(g));
    let func = child(&tree, root, 0);
    let a = lookup(&tree, func, "a").unwrap();
    assert!(!tree.is_binding_exposed(a));
    let inner = lookup(&tree, func, "inner").unwrap();
    assert!(!tree.is_binding_exposed(inner));
}

#[test]
fn test_closure_of_block() {
    let tree = scopes("function f() { { { let a; } } }");
    let func = child(&tree, tree.root(), 0);
    let inner = child(&tree, child(&tree, func, 0), 0);
    assert_eq!(tree.closure_of(inner), func);
    assert_eq!(tree.closure_of(tree.root()), tree.root());
}

#[test]
fn test_malformed_root() {
    let mut map = NodeMap::new();
    let n = map.create_node(SourceRange::anonymous(""), Syntax::EmptyStmt {});
    let err = build_scopes(&map, n).err().unwrap();
    assert_eq!(err.expected, "top level");
}
