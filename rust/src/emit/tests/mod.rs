use crate::emit::emit_js;
use crate::parse;

fn check(src: &str, expected: &str) {
    let program = parse(src.as_bytes().to_vec()).unwrap();
    let mut out = Vec::new();
    emit_js(&mut out, &program.node_map, program.root);
    assert_eq!(String::from_utf8(out).unwrap(), expected, "emitting {}", src);
}

#[test]
fn test_emit_string_quotes() {
    check(r#"x = "string\'string""#, r#"x="string'string""#);
    check(r#"x = "\"""#, r#"x='"'"#);
    check(r#"x = '\'\"\"'"#, "x=`'\"\"`");
    check(r#""use strict";"#, r#""use strict""#);
    check(r#"'\'"\''"#, r#""'\"'""#);
}

#[test]
fn test_emit_statements_without_redundant_semicolons() {
    check("a(); b();", "a();b()");
    check("if (a) { b() } c()", "if(a){b()}c()");
    check("if (a) for (;;); b()", "if(a)for(;;);b()");
    check("function f() {} g()", "function f(){}g()");
    check("do a(); while (b); c()", "do a();while(b);c()");
}

#[test]
fn test_emit_token_separation() {
    check("x = a + +b", "x=a+ +b");
    check("x = a - -b", "x=a- -b");
    check("x = a < !--b", "x=a< !--b");
    check("x = typeof a", "x=typeof a");
    check("x = a instanceof b", "x=a instanceof b");
    check("function f() { return a }", "function f(){return a}");
    check("function f() { return (a) }", "function f(){return a}");
}

#[test]
fn test_emit_parentheses() {
    check("x = (a, b) * c", "x=(a,b)*c");
    check("x = a * (b + c)", "x=a*(b+c)");
    check("x = (a + b) + c", "x=a+b+c");
    check("x = a + (b + c)", "x=a+(b+c)");
    check("x = (a ** b) ** c", "x=(a**b)**c");
    check("x = a ** (b ** c)", "x=a**b**c");
    check("x = (a ?? b) || c", "x=(a??b)||c");
    check("x = () => ({})", "x=()=>({})");
    check("(function () {})()", "(function(){}())");
    check("x = a ? (b, c) : d", "x=a?(b,c):d");
}

#[test]
fn test_emit_dangling_else() {
    check("if (a) { if (b) c() } else d()", "if(a){if(b)c()}else d()");
}

#[test]
fn test_emit_literals() {
    check("x = 1.50", "x=1.5");
    check("x = 1000", "x=1e3");
    check("x = 0.5", "x=.5");
    check("x = true", "x=!0");
    check("x = false", "x=!1");
    check("x = null", "x=null");
    check("x = [1, , 2]", "x=[1,,2]");
    check("x = { a: 1, 'b': 2, 'c-d': 3 }", "x={a:1,b:2,\"c-d\":3}");
}

#[test]
fn test_emit_number_member_access() {
    check("(2).toFixed()", "2..toFixed()");
    check("(0.5).toFixed()", ".5.toFixed()");
    check("(1000).toString()", "1e3.toString()");
}

#[test]
fn test_emit_declarations() {
    check("var a = 1, b", "var a=1,b");
    check("let { a, b: c } = d", "let{a,b:c}=d");
    check("const [a, ...b] = c", "const[a,...b]=c");
    check(
        "class A extends B { constructor() { super() } get x() { return 1 } }",
        "class A extends B{constructor(){super()}get x(){return 1}}",
    );
}
