use crate::error::SyntaxErrorType::{self, *};
use crate::lex::{lex_next, lex_template_string_continue, LexMode, Lexer};
use crate::token::TokenType::{self, *};

fn check(code: &str, expecteds: &[TokenType], expected_err: Option<SyntaxErrorType>) {
    let mut lexer = Lexer::new(code.as_bytes().to_vec());
    for expected in expecteds {
        match lex_next(&mut lexer, LexMode::Standard) {
            Err(e) => panic!("Failed to lex code with error {:?}: {}", e.typ(), code),
            Ok(t) => assert_eq!(t.typ(), *expected, "in {}", code),
        };
    }
    match lex_next(&mut lexer, LexMode::Standard) {
        Err(e) => match expected_err {
            Some(expected) => assert_eq!(e.typ(), expected),
            None => panic!("Failed to lex code with error {:?}: {}", e.typ(), code),
        },
        Ok(t) => match expected_err {
            Some(_) => panic!("Code lexed successfully: {}", code),
            None => assert_eq!(EOF, t.typ()),
        },
    };
}

#[test]
fn test_lex_keywords() {
    check("class", &[KeywordClass], None);
    check("instanceof", &[KeywordInstanceof], None);
    check("classes", &[Identifier], None);
    check("undefined", &[Identifier], None);
}

#[test]
fn test_lex_identifiers() {
    check("h929", &[Identifier], None);
    check("$_x", &[Identifier], None);
    check("caf\u{e9} na\u{ef}ve", &[Identifier, Identifier], None);
}

#[test]
fn test_lex_literal_numbers() {
    check("1", &[LiteralNumber], None);
    check("929", &[LiteralNumber], None);
    check(".929", &[LiteralNumber], None);
    check(". 929", &[Dot, LiteralNumber], None);
    check(". 929.2.", &[Dot, LiteralNumber, Dot], None);
    check(".929.2..", &[LiteralNumber, LiteralNumber, Dot, Dot], None);
    check("?.929", &[Question, LiteralNumber], None);
    check("?..929", &[QuestionDot, LiteralNumber], None);
    check("1_000_000", &[LiteralNumber], None);
    check("0xFF 0b101 0o17", &[LiteralNumber, LiteralNumber, LiteralNumber], None);
    check("1e10 1E-3", &[LiteralNumber, LiteralNumber], None);
    check("1e", &[], Some(MalformedLiteralNumber));
    check("3in", &[], Some(MalformedLiteralNumber));
    check("0x", &[], Some(MalformedLiteralNumber));
}

#[test]
fn test_lex_literal_bigints() {
    check("10n", &[LiteralBigInt], None);
    check("0xffn", &[LiteralBigInt], None);
    check("1.5n", &[], Some(MalformedLiteralNumber));
}

#[test]
fn test_lex_literal_strings() {
    check("'hello world'", &[LiteralString], None);
    check("\"it's\"", &[LiteralString], None);
    check("'a\\'b'", &[LiteralString], None);
    check("'line\\\ncontinued'", &[LiteralString], None);
    check("'hello world\n'", &[], Some(LineTerminatorInString));
}

#[test]
fn test_lex_comments() {
    check("a /* b */ c", &[Identifier, Identifier], None);
    check("a // trailing", &[Identifier], None);
    check("/* unterminated", &[], Some(UnexpectedEnd));
}

#[test]
fn test_lex_line_terminators() {
    let mut lexer = Lexer::new(b"a /*\n*/ b\nc // x\nd".to_vec());
    let a = lex_next(&mut lexer, LexMode::Standard).unwrap();
    let b = lex_next(&mut lexer, LexMode::Standard).unwrap();
    let c = lex_next(&mut lexer, LexMode::Standard).unwrap();
    let d = lex_next(&mut lexer, LexMode::Standard).unwrap();
    assert!(!a.preceded_by_line_terminator());
    assert!(b.preceded_by_line_terminator());
    assert!(c.preceded_by_line_terminator());
    assert!(d.preceded_by_line_terminator());
}

#[test]
fn test_lex_regex() {
    let mut lexer = Lexer::new(b"/[/]\\//gi.x".to_vec());
    let t = lex_next(&mut lexer, LexMode::SlashIsRegex).unwrap();
    assert_eq!(t.typ(), LiteralRegex);
    assert_eq!(t.loc().as_str(), "/[/]\\//gi");
    assert_eq!(lex_next(&mut lexer, LexMode::Standard).unwrap().typ(), Dot);
}

#[test]
fn test_lex_template() {
    let mut lexer = Lexer::new(b"`a${b}c`".to_vec());
    let head = lex_next(&mut lexer, LexMode::Standard).unwrap();
    assert_eq!(head.typ(), LiteralTemplatePartString);
    assert_eq!(head.loc().as_str(), "a");
    assert_eq!(lex_next(&mut lexer, LexMode::Standard).unwrap().typ(), Identifier);
    assert_eq!(lex_next(&mut lexer, LexMode::Standard).unwrap().typ(), BraceClose);
    let tail = lex_template_string_continue(&mut lexer, false).unwrap();
    assert_eq!(tail.typ(), LiteralTemplatePartStringEnd);
    assert_eq!(tail.loc().as_str(), "c");
}

#[test]
fn test_lex_private_member() {
    check("#secret", &[PrivateMember], None);
    check("this.#x", &[KeywordThis, Dot, PrivateMember], None);
}

#[test]
fn test_lex_import_statement() {
    check(
        "import * as a from './a';",
        &[
            KeywordImport,
            Asterisk,
            KeywordAs,
            Identifier,
            KeywordFrom,
            LiteralString,
            Semicolon,
        ],
        None,
    );
}
