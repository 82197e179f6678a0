use crate::ast::{NodeId, Syntax};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::expr::parse_expr_until_either;
use crate::parse::parser::Parser;
use crate::parse::pattern::parse_pattern;
use crate::token::TokenType;

// <param> = '...'? <pattern> [ '=' <expr> ]?
fn parse_parameter(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.checkpoint();
    let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
    let pattern = parse_pattern(parser)?;
    let default_value = if parser.consume_if(TokenType::Equals)?.is_match() {
        Some(parse_expr_until_either(
            parser,
            TokenType::Comma,
            TokenType::ParenthesisClose,
        )?)
    } else {
        None
    };
    let loc = parser.since_checkpoint(&start);
    Ok(parser.create_node(loc, Syntax::ParamDecl {
        rest,
        pattern,
        default_value,
    }))
}

/// Parses `(a, b = 1, ...c)` into a `FunctionSignature` node. A trailing comma is allowed except
/// after the rest parameter, which must be last.
pub fn parse_signature_function(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.checkpoint();
    parser.require(TokenType::ParenthesisOpen)?;
    let mut parameters = Vec::new();
    while !parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
        let parameter = parse_parameter(parser)?;
        parameters.push(parameter);
        let is_rest = matches!(parser[parameter].stx(), Syntax::ParamDecl { rest: true, .. });
        if is_rest {
            let close = parser.next()?;
            if close.typ() != TokenType::ParenthesisClose {
                return Err(close.error(SyntaxErrorType::RestParameterNotLast));
            };
            break;
        };
        if !parser.consume_if(TokenType::Comma)?.is_match() {
            parser.require(TokenType::ParenthesisClose)?;
            break;
        };
    }
    let loc = parser.since_checkpoint(&start);
    Ok(parser.create_node(loc, Syntax::FunctionSignature { parameters }))
}
