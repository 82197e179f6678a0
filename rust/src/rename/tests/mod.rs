use std::collections::HashSet;

use serde_json::{json, Value};

use crate::emit::emit_js;
use crate::error::ConfigError;
use crate::parse;
use crate::rename::{
    drop_unused_function_expression_names, get_index, get_name, rename_bindings, Alphabet,
    ReservedWords,
};
use crate::scope::build_scopes;
use crate::util::test::evaluate_test_input_files;

fn name(alphabet: &Alphabet, index: usize) -> String {
    String::from_utf8(get_name(alphabet, index)).unwrap()
}

fn rename_with(alphabet: &Alphabet, src: &str) -> String {
    let mut program = parse(src.as_bytes().to_vec()).unwrap();
    let tree = build_scopes(&program.node_map, program.root).unwrap();
    rename_bindings(&mut program.node_map, &tree, alphabet, &ReservedWords::new()).unwrap();
    let mut out = Vec::new();
    emit_js(&mut out, &program.node_map, program.root);
    String::from_utf8(out).unwrap()
}

fn rename(src: &str) -> String {
    rename_with(&Alphabet::default(), src)
}

#[test]
fn test_get_name_default_alphabet() {
    let a = Alphabet::default();
    assert_eq!(name(&a, 0), "a");
    assert_eq!(name(&a, 1), "b");
    assert_eq!(name(&a, 2), "c");
    assert_eq!(name(&a, 25), "z");
    assert_eq!(name(&a, 26), "A");
    assert_eq!(name(&a, 53), "$");
    assert_eq!(name(&a, 54), "aa");
    assert_eq!(name(&a, 55), "ba");
    assert_eq!(name(&a, 117), "jb");
    assert_eq!(name(&a, 118), "kb");
}

#[test]
fn test_get_name_is_bijective() {
    let a = Alphabet::default();
    let mut seen = HashSet::new();
    for i in 0..100_000 {
        let n = get_name(&a, i);
        assert_eq!(get_index(&a, &n), Some(i), "index of {:?}", n);
        assert!(seen.insert(n));
    }
}

#[test]
fn test_get_index_rejects_foreign_names() {
    let a = Alphabet::default();
    assert_eq!(get_index(&a, b""), None);
    assert_eq!(get_index(&a, b"0a"), None);
    assert_eq!(get_index(&a, b"a-"), None);
    assert_eq!(get_index(&a, b"a0"), Some(54 + 54 * 54));
}

#[test]
fn test_custom_alphabet() {
    let a = Alphabet::new("xy", "xyz").unwrap();
    let names: Vec<String> = (0..9).map(|i| name(&a, i)).collect();
    assert_eq!(
        names,
        vec!["x", "y", "xx", "yx", "xy", "yy", "xz", "yz", "xxx"]
    );
}

#[test]
fn test_alphabet_validation() {
    assert_eq!(Alphabet::new("", "abc"), Err(ConfigError::EmptyAlphabet));
    assert_eq!(Alphabet::new("ab", ""), Err(ConfigError::EmptyAlphabet));
    assert_eq!(
        Alphabet::new("aa", "a"),
        Err(ConfigError::DuplicateAlphabetChar('a'))
    );
    assert_eq!(
        Alphabet::new("1", "1"),
        Err(ConfigError::InvalidAlphabetChar('1'))
    );
    assert_eq!(
        Alphabet::new("a", "a-"),
        Err(ConfigError::InvalidAlphabetChar('-'))
    );
    assert_eq!(
        Alphabet::new("ab", "a"),
        Err(ConfigError::StartCharNotContinue('b'))
    );
    assert!(Alphabet::new("_$", "_$0").is_ok());
}

#[test]
fn test_reserved_words() {
    let r = ReservedWords::new();
    assert!(r.contains(b"do"));
    assert!(r.contains(b"in"));
    assert!(r.contains(b"undefined"));
    assert!(r.contains(b"arguments"));
    assert!(!r.contains(b"of"));
    assert!(!r.contains(b"async"));
    assert!(!r.contains(b"a"));
}

#[test]
fn test_rename_parameters() {
    assert_eq!(
        rename("function f(first, second) { return first + second; }"),
        "function f(a,b){return a+b}"
    );
}

#[test]
fn test_rename_avoids_free_names() {
    assert_eq!(
        rename("function f(x) { return a + x; }"),
        "function f(b){return a+b}"
    );
}

#[test]
fn test_rename_nested_closure() {
    assert_eq!(
        rename("function f(x) { return function (y) { return x + y; }; }"),
        "function f(a){return function(b){return a+b}}"
    );
}

#[test]
fn test_rename_siblings_reuse_names() {
    assert_eq!(
        rename("var f = function (x) { return x; }, g = function (y) { return y; };"),
        "var f=function(a){return a},g=function(a){return a}"
    );
}

#[test]
fn test_rename_expands_shorthand() {
    assert_eq!(
        rename("function f(value) { return { value }; }"),
        "function f(a){return{value:a}}"
    );
    assert_eq!(
        rename("function f({ value }) { return value; }"),
        "function f({value:a}){return a}"
    );
}

#[test]
fn test_rename_keeps_globals() {
    assert_eq!(
        rename("var longName = 1; function g() { return longName; }"),
        "var longName=1;function g(){return longName}"
    );
}

#[test]
fn test_rename_skips_dynamic_scopes() {
    assert_eq!(
        rename("function f(longName, code) { eval(code); return longName; }"),
        "function f(longName,code){eval(code);return longName}"
    );
    let out = rename("function f(obj) { with (obj) { x; } } function g(arg) { return arg; }");
    assert!(out.starts_with("function f(obj)"), "{}", out);
    assert!(out.ends_with("function g(a){return a}"), "{}", out);
}

#[test]
fn test_rename_catch_parameter() {
    assert_eq!(
        rename("try {} catch (err) { log(err); }"),
        "try{}catch(a){log(a)}"
    );
}

#[test]
fn test_rename_skips_reserved_words() {
    let alphabet = Alphabet::new("io", "iof").unwrap();
    assert_eq!(
        rename_with(
            &alphabet,
            "function f(p1, p2, p3, p4, p5, p6, p7, p8) { return p8; }"
        ),
        "function f(i,o,ii,oi,io,oo,of,iii){return iii}"
    );
}

// Every identifier must resolve to the same binding, or stay free, after renaming.
fn assert_resolution_preserved(src: &str) -> String {
    let original = parse(src.as_bytes().to_vec()).unwrap();
    let before = build_scopes(&original.node_map, original.root).unwrap();
    let renamed = rename(src);
    let program = parse(renamed.as_bytes().to_vec()).unwrap();
    let after = build_scopes(&program.node_map, program.root).unwrap();
    assert_eq!(before.binding_count(), after.binding_count(), "{}", renamed);
    assert_eq!(original.node_map.len(), program.node_map.len(), "{}", renamed);
    for n in original.node_map.ids() {
        assert_eq!(before.binding_of(n), after.binding_of(n), "node {} of {}", n.id(), renamed);
        assert_eq!(before.is_free(n), after.is_free(n), "node {} of {}", n.id(), renamed);
    }
    renamed
}

#[test]
fn test_rename_preserves_resolution() {
    let src = r#"
        var top = 1;
        function outer(a, b) {
            let c = a + b + top;
            {
                function inner() { return c + d; }
                const e = inner();
            }
            return function (f) { try { f(); } catch (g) { return g + a; } };
        }
        class K { m(x) { return x + top; } }
    "#;
    let renamed = assert_resolution_preserved(src);
    assert_eq!(rename(&renamed), renamed);

    for src in [
        "x = function () { var a = 1; { let b = 2; var c = a + b } return c }",
        "function f() { for (let q of c) { q; { var zz } } }",
        "a => { for (let b of c) { b, a; { var d } } }",
        "function f(a) { let b = 0; if (a === 0) { return 0 } else { let b = 3; return b } }",
        "function g(p) { { function h() { return p } } return h() }",
        "function k() { var v; try {} catch (e) { var v2 = e; { let w = v2; w(v) } } }",
        "x = function () { let first; { let second; { var third; second(first) } } third() }",
        "x = (p, q) => { switch (p) { case 0: let r = q; var s = r; } return s }",
    ] {
        assert_resolution_preserved(src);
    }
}

#[test]
fn test_rename_fixtures() {
    evaluate_test_input_files("rename/tests/fixtures", |input| -> Value {
        let src = String::from_utf8(input).unwrap();
        json!({ "output": rename(src.trim_end()) })
    });
}

#[test]
fn test_drop_unused_function_expression_names() {
    let mut program = parse(
        b"var f = function named() { return 1; }, g = function self() { return self; };".to_vec(),
    )
    .unwrap();
    let tree = build_scopes(&program.node_map, program.root).unwrap();
    assert_eq!(
        drop_unused_function_expression_names(&mut program.node_map, &tree),
        1
    );
    let mut out = Vec::new();
    emit_js(&mut out, &program.node_map, program.root);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "var f=function(){return 1},g=function self(){return self}"
    );
}
