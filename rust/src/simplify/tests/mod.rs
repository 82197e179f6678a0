use serde_json::{json, Value};

use crate::emit::emit_js;
use crate::simplify::{simplify, SimplifyContext};
use crate::util::test::evaluate_test_input_files;
use crate::version::{VersionPolicy, LATEST};
use crate::{minify, parse, Config};

fn simplified(version: u16, src: &str) -> String {
    let mut program = parse(src.as_bytes().to_vec()).unwrap();
    let policy = VersionPolicy::new();
    let ctx = SimplifyContext {
        policy: &policy,
        target_version: version,
    };
    simplify(&mut program.node_map, program.root, &ctx).unwrap();
    // Another run must find nothing left to do.
    assert_eq!(
        simplify(&mut program.node_map, program.root, &ctx).unwrap(),
        1,
        "not at a fixpoint: {}",
        src
    );
    let mut out = Vec::new();
    emit_js(&mut out, &program.node_map, program.root);
    String::from_utf8(out).unwrap()
}

fn check_version(version: u16, src: &str, expected: &str) {
    assert_eq!(simplified(version, src), expected, "simplifying {}", src);
}

fn check(src: &str, expected: &str) {
    check_version(LATEST, src, expected);
}

#[test]
fn test_nullish_coalescing_is_version_gated() {
    check_version(2019, "a == null ? b : a", "a==null?b:a");
    check_version(2020, "a == null ? b : a", "a??b");
    check_version(2020, "x = a != null ? a : b", "x=a??b");
}

#[test]
fn test_catch_binding_is_version_gated() {
    check_version(2018, "try {} catch (a) {}", "try{}catch(a){}");
    check_version(2019, "try {} catch (a) {}", "try{}catch{}");
    check_version(2019, "try {} catch (a) { log(a); }", "try{}catch(a){log(a)}");
}

#[test]
fn test_optional_chaining_is_version_gated() {
    check_version(2019, "x = a == null ? void 0 : a.b", "x=a==null?void 0:a.b");
    check_version(2020, "x = a == null ? void 0 : a.b", "x=a?.b");
}

#[test]
fn test_logical_assignment_is_version_gated() {
    check_version(2020, "a || (a = b)", "a||(a=b)");
    check_version(2021, "a || (a = b)", "a||=b");
    check_version(2021, "a && (a = b)", "a&&=b");
}

#[test]
fn test_if_returns_become_conditional() {
    check(
        "function f() { if (a) { return b; } else { return c; } }",
        "function f(){return a?b:c}",
    );
    check(
        "function f() { if (a) return b; return c; }",
        "function f(){return a?b:c}",
    );
    check(
        "function f() { if (a) { throw b; } else { throw c; } }",
        "function f(){throw a?b:c}",
    );
}

#[test]
fn test_adjacent_var_statements_merge() {
    check("var a; var b; a, b", "var a,b;a,b");
    check("let a = 1; let b = 2; f(a, b)", "let a=1,b=2;f(a,b)");
    check("var a = 1; const b = 2; f(a, b)", "var a=1;const b=2;f(a,b)");
}

#[test]
fn test_nested_if_becomes_expression() {
    check("if (a) { if (b) c; else false } else { d }", "a?!!b&&c:d");
}

#[test]
fn test_if_becomes_logical() {
    check("if (a) b()", "a&&b()");
    check("if (!a) b()", "a||b()");
    check("if (!!a) b()", "a&&b()");
    check("if (a) b(); else c()", "a?b():c()");
    check("if (a) b(); else b()", "a,b()");
    check("if (a) {} else b()", "a||b()");
    check("if (a) {}", "a");
}

#[test]
fn test_negated_test_swaps_branches() {
    check("if (!a) { b(); var x } else { c(); var y }", "if(a){c();var y}else{b();var x}");
}

#[test]
fn test_constant_tests() {
    check("if (0) { var x = 1 } else y()", "y();var x");
    check("if (1) y(); else z()", "y()");
    check("x = 1 ? a : b", "x=a");
    check("x = 0 || a", "x=a");
    check("x = 1 && a", "x=a");
    check("x = null ?? a", "x=a");
    check("if (NaN) a(); else b()", "b()");
    check("x = NaN ? a : b", "x=b");
    check("x = Infinity ? a : b", "x=a");
    check("if (0 / 0) a(); b()", "b()");
}

#[test]
fn test_dropped_branch_keeps_block_functions_declared() {
    check("if (0) { function f() {} } f", "var f;f");
    check("if (0) { function f() {} var g } f(g)", "var f,g;f(g)");
}

#[test]
fn test_loops() {
    check("while (a) b()", "for(;a;)b()");
    check("while (true) b()", "for(;;)b()");
    check("while (false) { var x = b() }", "var x");
    check("for (;1;) b()", "for(;;)b()");
}

#[test]
fn test_unreachable_statements() {
    check(
        "function f() { return 1; g(); var h = 2; function k() {} }",
        "function f(){return 1;var h;function k(){}}",
    );
}

#[test]
fn test_redundant_jumps() {
    check("function f() { a(); return; }", "function f(){a()}");
    check("for (;;) { a(); continue; }", "for(;;)a()");
}

#[test]
fn test_returns_of_undefined() {
    check("function g() { return undefined }", "function g(){}");
    check("function g() { return void 0 }", "function g(){}");
    check("function g() { a++; return void 0 }", "function g(){a++}");
    check("function g() { return a(), b(), void 0 }", "function g(){a(),b()}");
    check("function g() { if (a) return; else return }", "function g(){a}");
    check("function* g() { yield undefined }", "function*g(){yield}");
    check("function* g() { yield* undefined }", "function*g(){yield*void 0}");
}

#[test]
fn test_bare_vars_move_to_later_declarations() {
    check("var a; f(); var b = c", "f();var a,b=c");
    check("while (a); var b; var c", "for(var b,c;a;);");
    check("while (a) { d() } var b; var c", "for(var b,c;a;)d()");
    check("var a = 1; f(); var b = c", "var a=1;f();var b=c");
}

#[test]
fn test_expressions_merge_into_next_statement() {
    check("function f() { a(); return b; }", "function f(){return a(),b}");
    check("a(); b(); c()", "a(),b(),c()");
    check("a(); if (b) { c(); d(); e = 1 }", "a(),b&&(c(),d(),e=1)");
    check("function f() { a(); throw b; }", "function f(){throw a(),b}");
}

#[test]
fn test_else_after_return_is_hoisted() {
    check(
        "function f() { if (a) { b(); return } else c(); d() }",
        "function f(){if(a){b();return}c(),d()}",
    );
}

#[test]
fn test_unused_lexicals_are_dropped() {
    check("function f() { let a = 1; const b = g(); }", "function f(){const b=g()}");
    check("let a = 1", "let a=1");
}

#[test]
fn test_negated_function_call() {
    check("(function () { a() })()", "!function(){a()}()");
}

#[test]
fn test_global_constants() {
    check("x = undefined", "x=void 0");
    check("x = Infinity", "x=1/0");
    check("x = NaN", "x=0/0");
    check(
        "function f(undefined) { return undefined }",
        "function f(undefined){return undefined}",
    );
}

#[test]
fn test_not() {
    check("x = !(a == b)", "x=a!=b");
    check("x = !(a === b && c !== d)", "x=a!==b||c===d");
    check("x = !!a", "x=!!a");
    check("x = !0", "x=!0");
    check("x = !'a'", "x=!1");
}

#[test]
fn test_not_distributes_when_no_longer() {
    check("x = !(a || b)", "x=!a&&!b");
    check("x = !(a && b)", "x=!a||!b");
    check("x = !((a || b) && (c || d))", "x=!a&&!b||!c&&!d");
    check("x = !(a == b || c)", "x=a!=b&&!c");
    check("if (!(!a || b)) c()", "a&&!b&&c()");
    check("if (!a && !b) c()", "a||b||c()");
}

#[test]
fn test_equality() {
    check("x = typeof a === 'string'", "x=typeof a==\"string\"");
    check("x = a === b", "x=a===b");
    check("x = a == undefined", "x=a==null");
    check("x = a === null || a === void 0", "x=a==null");
    check("x = a !== null && a !== undefined", "x=a!=null");
}

#[test]
fn test_strings_and_members() {
    check("x = 'a' + 'b'", "x=\"ab\"");
    check("x = a + 'b' + 'c'", "x=a+\"bc\"");
    check("x = o['a']", "x=o.a");
    check("x = o['1']", "x=o[1]");
    check("x = o['a-b']", "x=o[\"a-b\"]");
}

#[test]
fn test_conditional_expressions() {
    check("x = a ? !0 : !1", "x=!!a");
    check("x = a ? !1 : !0", "x=!a");
    check("x = a ? b : b", "x=(a,b)");
    check("x = a ? a : b", "x=a||b");
    check("x = !a ? b : c", "x=a?c:b");
    check("a ? b() : 0", "a&&b()");
    check("a ? 0 : b()", "a||b()");
}

#[test]
fn test_common_callee_is_hoisted() {
    check(
        "function g(f) { return a ? f(1) : f(2) }",
        "function g(f){return f(a?1:2)}",
    );
    check("x = a ? f(1) : f(2)", "x=a?f(1):f(2)");
}

#[test]
fn test_arrow_body() {
    check("x = () => { return a }", "x=()=>a");
    check("x = () => { return {} }", "x=()=>({})");
}

#[test]
fn test_discarded_pure_operands() {
    check("0, b()", "b()");
    check("x = (0, b)", "x=(0,b)");
}

#[test]
fn test_directives_are_preserved() {
    check("'use strict'; x()", "\"use strict\";x()");
    check(
        "function f() { 'use strict'; return 1 }",
        "function f(){\"use strict\";return 1}",
    );
    check("'a' + 'b'", "\"a\"+\"b\"");
}

#[test]
fn test_minify_fixtures() {
    evaluate_test_input_files("simplify/tests/fixtures", |input| -> Value {
        let mut out = Vec::new();
        minify(&Config::default(), input, &mut out).unwrap();
        json!({ "output": String::from_utf8(out).unwrap() })
    });
}
