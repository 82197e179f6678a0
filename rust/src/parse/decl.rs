use crate::ast::{NodeId, Syntax, VarDeclMode, VariableDeclarator};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::parser::Parser;
use crate::parse::pattern::parse_pattern;
use crate::parse::signature::parse_signature_function;
use crate::source::SourceRange;
use crate::parse::stmt::parse_function_body;
use crate::token::TokenType;

use super::class_or_object::{parse_class_body, ParseClassBodyResult};
use super::expr::{parse_expr, parse_expr_until_either_with_asi, Asi};
use super::pattern::is_valid_pattern_identifier;

/// How a declarator list ends.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum VarDeclParseMode {
    // A `var`, `let` or `const` statement, terminated by `;` or automatic semicolon insertion.
    Asi,
    // The head of a `for`: stop before the first token that is not a comma, such as `;`, `in` or
    // `of`.
    Leftmost,
}

fn parse_var_decl_mode(parser: &mut Parser) -> SyntaxResult<(VarDeclMode, SourceRange)> {
    let t = parser.next()?;
    let mode = match t.typ() {
        TokenType::KeywordVar => VarDeclMode::Var,
        TokenType::KeywordLet => VarDeclMode::Let,
        TokenType::KeywordConst => VarDeclMode::Const,
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("variable declaration"))),
    };
    Ok((mode, t.loc_take()))
}

// <declarator> = <pattern> [ '=' <expr> ]?
fn parse_declarator(parser: &mut Parser, asi: &mut Asi) -> SyntaxResult<VariableDeclarator> {
    let pattern = parse_pattern(parser)?;
    let initializer = if parser.consume_if(TokenType::Equals)?.is_match() {
        Some(parse_expr_until_either_with_asi(
            parser,
            TokenType::Semicolon,
            TokenType::Comma,
            asi,
        )?)
    } else {
        None
    };
    Ok(VariableDeclarator {
        pattern,
        initializer,
    })
}

// Consumes the separator after a declarator. Returns false once the list is over.
fn continue_declarator_list(
    parser: &mut Parser,
    parse_mode: VarDeclParseMode,
    asi: &Asi,
) -> SyntaxResult<bool> {
    if parse_mode == VarDeclParseMode::Leftmost {
        return Ok(parser.consume_if(TokenType::Comma)?.is_match());
    };
    if asi.did_end_with_asi || parser.consume_if(TokenType::Semicolon)?.is_match() {
        return Ok(false);
    };
    let next = parser.peek()?;
    let ends = match next.typ() {
        TokenType::Comma => false,
        TokenType::BraceClose | TokenType::EOF => true,
        _ => next.preceded_by_line_terminator(),
    };
    if !ends {
        parser.require(TokenType::Comma)?;
    };
    Ok(!ends)
}

pub fn parse_decl_var(parser: &mut Parser, parse_mode: VarDeclParseMode) -> SyntaxResult<NodeId> {
    let (mode, mut loc) = parse_var_decl_mode(parser)?;
    let mut declarators = Vec::new();
    loop {
        let mut asi = match parse_mode {
            VarDeclParseMode::Asi => Asi::can(),
            VarDeclParseMode::Leftmost => Asi::no(),
        };
        let declarator = parse_declarator(parser, &mut asi)?;
        let last = declarator.initializer.unwrap_or(declarator.pattern);
        loc.extend(parser[last].loc());
        declarators.push(declarator);
        if !continue_declarator_list(parser, parse_mode, &asi)? {
            break;
        };
    }
    Ok(parser.create_node(loc, Syntax::VarDecl { mode, declarators }))
}

// Binds in the enclosing scope, not the function's own: `function a() { let a }` is legal. Only a
// default export may omit it.
fn parse_decl_name(parser: &mut Parser) -> SyntaxResult<Option<NodeId>> {
    let name = parser
        .consume_if_pred(|t| is_valid_pattern_identifier(t.typ()))?
        .match_loc_take();
    Ok(name.map(|name| parser.create_node(name.clone(), Syntax::ClassOrFunctionName { name })))
}

pub fn parse_decl_function(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    let is_async = parser.consume_if(TokenType::KeywordAsync)?.is_match();
    parser.require(TokenType::KeywordFunction)?;
    let generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    let name = parse_decl_name(parser)?;
    let signature = parse_signature_function(parser)?;
    let body = parse_function_body(parser, is_async)?;
    Ok(parser.create_node(
        parser.since_checkpoint(&cp),
        Syntax::FunctionDecl {
            is_async,
            generator,
            name,
            signature,
            body,
        },
    ))
}

pub fn parse_decl_class(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordClass)?.loc_take();
    let name = parse_decl_name(parser)?;
    let extends = if parser.consume_if(TokenType::KeywordExtends)?.is_match() {
        Some(parse_expr(parser, TokenType::BraceOpen)?)
    } else {
        None
    };
    let ParseClassBodyResult { end, members } = parse_class_body(parser)?;
    Ok(parser.create_node(
        &start + &end,
        Syntax::ClassDecl {
            name,
            extends,
            members,
        },
    ))
}
