use std::io::{self, ErrorKind, Write};

use crate::ast::{NodeMap, Syntax};
use crate::error::{ConfigError, SyntaxErrorType};
use crate::rename::Alphabet;
use crate::source::SourceRange;
use crate::{minify, transform, Config, MinifyError};

fn minified_with(config: &Config, src: &str) -> String {
    let mut out = Vec::new();
    minify(config, src.as_bytes().to_vec(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn check(src: &str, expected: &str) {
    assert_eq!(minified_with(&Config::default(), src), expected);
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_minify() {
    check(
        "const main = () => { let my_first_variable = 1; return my_first_variable; };",
        "const main=()=>{let a=1;return a}",
    );
    check(
        "function f() { if (a) { return b } else { return c } }",
        "function f(){return a?b:c}",
    );
    check("var a; var b; a, b", "var a,b;a,b");
    check("if (a) { if (b) c; else false } else { d }", "a?!!b&&c:d");
    check(r#"x = "string\'string""#, r#"x="string'string""#);
    check(r#"x = "\"""#, r#"x='"'"#);
}

#[test]
fn test_accessors() {
    check(
        "class a { get g() { return 1 } set g(v) {} }",
        "class a{get g(){return 1}set g(a){}}",
    );
    check(
        "x = { get g() { return 1 }, set g(v) {} }",
        "x={get g(){return 1},set g(a){}}",
    );
    check("class A { set x(e) {} }", "class A{set x(a){}}");
}

#[test]
fn test_newer_syntax() {
    check(
        "class A { static { let x = 1; f(x) } }",
        "class A{static{let a=1;f(a)}}",
    );
    check(
        "async function f() { for await (const x of y) g(x) }",
        "async function f(){for await(const a of y)g(a)}",
    );
    check("function F() { return new.target }", "function F(){return new.target}");
    check("x = import.meta.url", "x=import.meta.url");
    check(r#"x = "\udFEb""#, r#"x="\udfeb""#);
    check("function g() { await(fun()()) }", "function g(){await(fun()())}");
}

#[test]
fn test_minify_renames_and_simplifies_together() {
    check(
        "function pick(value, fallback) { if (value == null) { return fallback; } return value; }",
        "function pick(a,b){return a??b}",
    );
}

#[test]
fn test_minify_is_idempotent() {
    let src = r#"
        function sum(list, fallback) {
            var total = 0;
            for (var i = 0; i < list.length; i++) {
                if (list[i] == null) { continue; }
                total += list[i];
            }
            if (total) { return total; } else { return fallback; }
        }
        (function () { var unused = sum([1, 2], undefined); log(unused); })();
    "#;
    let once = minified_with(&Config::default(), src);
    let twice = minified_with(&Config::default(), &once);
    assert_eq!(once, twice);
}

#[test]
fn test_keep_var_names() {
    let config = Config {
        keep_var_names: true,
        ..Config::default()
    };
    assert_eq!(
        minified_with(&config, "function f(longName) { return longName; }"),
        "function f(longName){return longName}"
    );
}

#[test]
fn test_custom_alphabet() {
    let config = Config {
        alphabet: Alphabet::new("xy", "xy").unwrap(),
        ..Config::default()
    };
    assert_eq!(
        minified_with(&config, "function f(p, q, r) { return p + q + r; }"),
        "function f(x,y,xx){return x+y+xx}"
    );
}

#[test]
fn test_target_version() {
    let config = Config {
        version: 2019,
        ..Config::default()
    };
    assert_eq!(minified_with(&config, "x = a == null ? b : a"), "x=a==null?b:a");
    assert_eq!(
        minified_with(&Config::default(), "x = a == null ? b : a"),
        "x=a??b"
    );
    // Separators are removed at every version, including ones that predate them.
    let config = Config {
        version: 2015,
        ..Config::default()
    };
    assert_eq!(minified_with(&config, "x = [1_000_000, 2_5]"), "x=[1e6,25]");
}

#[test]
fn test_unsupported_version() {
    let config = Config {
        version: 2014,
        ..Config::default()
    };
    let mut out = Vec::new();
    match minify(&config, b"a".to_vec(), &mut out) {
        Err(MinifyError::Config(e)) => assert_eq!(e, ConfigError::UnsupportedVersion(2014)),
        other => panic!("unexpected result {:?}", other),
    };
    assert!(out.is_empty());
}

#[test]
fn test_syntax_errors() {
    let mut out = Vec::new();
    match minify(&Config::default(), b"let a = \xff;".to_vec(), &mut out) {
        Err(MinifyError::Syntax(e)) => {
            assert_eq!(e.typ(), SyntaxErrorType::InvalidUtf8);
            assert_eq!(e.position(), 8);
        }
        other => panic!("unexpected result {:?}", other),
    };
    match minify(&Config::default(), b"try {}".to_vec(), &mut out) {
        Err(MinifyError::Syntax(e)) => {
            assert_eq!(e.typ(), SyntaxErrorType::TryStatementHasNoCatchOrFinally)
        }
        other => panic!("unexpected result {:?}", other),
    };
    assert!(out.is_empty());
}

#[test]
fn test_io_error_surfaces_unchanged() {
    match minify(&Config::default(), b"a()".to_vec(), &mut FailingWriter) {
        Err(MinifyError::Io(e)) => {
            assert_eq!(e.kind(), ErrorKind::Other);
            assert_eq!(e.to_string(), "disk full");
        }
        other => panic!("unexpected result {:?}", other),
    };
}

#[test]
fn test_transform_rejects_malformed_tree() {
    let mut map = NodeMap::new();
    let root = map.create_node(SourceRange::anonymous(""), Syntax::EmptyStmt {});
    match transform(&Config::default(), &mut map, root) {
        Err(MinifyError::Malformed(e)) => assert_eq!(e.expected, "top level"),
        other => panic!("unexpected result {:?}", other),
    };
}
