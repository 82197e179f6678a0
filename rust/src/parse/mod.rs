//! Recursive descent parser producing the node arena. Each submodule parses one family of syntax;
//! they share a single `Parser` over the token stream.

use crate::ast::{NodeId, Syntax};
use crate::error::SyntaxResult;
use crate::token::TokenType;

use parser::Parser;
use stmt::parse_stmt;

pub mod class_or_object;
pub mod decl;
pub mod expr;
pub mod literal;
pub mod operator;
pub mod parser;
pub mod pattern;
pub mod signature;
pub mod stmt;
#[cfg(test)]
mod tests;

/// Parses statements until the end of input into a `TopLevel` node.
pub fn parse_top_level(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.checkpoint();
    let mut body = Vec::new();
    while !parser.consume_if(TokenType::EOF)?.is_match() {
        body.push(parse_stmt(parser)?);
    }
    let loc = parser.since_checkpoint(&start);
    Ok(parser.create_node(loc, Syntax::TopLevel { body }))
}
