use crate::ast::{ArrayPatternElement, ClassOrObjectMemberKey, NodeId, Syntax};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::expr::parse_expr_until_either;
use crate::parse::literal::parse_class_or_object_member_key;
use crate::parse::parser::Parser;
use crate::token::TokenType;

/// Whether a token can be used as a binding or reference name. Contextual keywords are only
/// reserved in specific positions, so they're allowed here. `await` is only an operator inside
/// async functions, which the expression parser checks before getting here.
pub fn is_valid_pattern_identifier(typ: TokenType) -> bool {
    matches!(
        typ,
        TokenType::Identifier
            | TokenType::KeywordAs
            | TokenType::KeywordAsync
            | TokenType::KeywordAwait
            | TokenType::KeywordConstructor
            | TokenType::KeywordFrom
            | TokenType::KeywordGet
            | TokenType::KeywordLet
            | TokenType::KeywordOf
            | TokenType::KeywordSet
            | TokenType::KeywordStatic
    )
}

pub fn parse_pattern_identifier(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let t = parser.require_predicate(is_valid_pattern_identifier, "identifier")?;
    let name = t.loc_take();
    Ok(parser.create_node(name.clone(), Syntax::IdentifierPattern { name }))
}

fn parse_object_pattern_property(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.checkpoint();
    let key_token = parser.peek()?;
    let key = parse_class_or_object_member_key(parser)?;
    let target = if parser.consume_if(TokenType::Colon)?.is_match() {
        parse_pattern(parser)?
    } else {
        match &key {
            ClassOrObjectMemberKey::Direct(name) if is_valid_pattern_identifier(key_token.typ()) => {
                parser.create_node(name.clone(), Syntax::IdentifierPattern { name: name.clone() })
            }
            _ => {
                return Err(key_token.error(SyntaxErrorType::ExpectedSyntax(
                    "object pattern property subpattern",
                )))
            }
        }
    };
    let default_value = parser
        .consume_if(TokenType::Equals)?
        .and_then(|| parse_expr_until_either(parser, TokenType::Comma, TokenType::BraceClose))?;
    Ok(parser.create_node(
        parser.since_checkpoint(&start),
        Syntax::ObjectPatternProperty {
            key,
            target,
            default_value,
        },
    ))
}

pub fn parse_pattern(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let checkpoint = parser.checkpoint();
    let t = parser.next()?;
    Ok(match t.typ() {
        typ if is_valid_pattern_identifier(typ) => {
            parser.restore_checkpoint(checkpoint);
            parse_pattern_identifier(parser)?
        }
        TokenType::BraceOpen => {
            let mut properties = Vec::<NodeId>::new();
            let mut rest = None;
            loop {
                if parser.peek()?.typ() == TokenType::BraceClose {
                    break;
                };
                // Check inside loop to ensure that it must come first or after a comma.
                if parser.consume_if(TokenType::DotDotDot)?.is_match() {
                    rest = Some(parse_pattern_identifier(parser)?);
                    break;
                };
                properties.push(parse_object_pattern_property(parser)?);
                // This will break if `}`.
                if !parser.consume_if(TokenType::Comma)?.is_match() {
                    break;
                };
            }
            let close = parser.require(TokenType::BraceClose)?;
            parser.create_node(
                t.loc() + close.loc(),
                Syntax::ObjectPattern { properties, rest },
            )
        }
        TokenType::BracketOpen => {
            let mut elements = Vec::<Option<ArrayPatternElement>>::new();
            let mut rest = None;
            loop {
                if parser.peek()?.typ() == TokenType::BracketClose {
                    break;
                };
                // Check inside loop to ensure that it must come first or after a comma.
                if parser.consume_if(TokenType::DotDotDot)?.is_match() {
                    rest = Some(parse_pattern(parser)?);
                    break;
                };

                // An unnamed element is allowed to ignore that element.
                if parser.consume_if(TokenType::Comma)?.is_match() {
                    elements.push(None);
                    continue;
                };
                let target = parse_pattern(parser)?;
                let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
                    parse_expr_until_either(parser, TokenType::Comma, TokenType::BracketClose)
                })?;
                elements.push(Some(ArrayPatternElement {
                    target,
                    default_value,
                }));
                // This will break if `]`.
                if !parser.consume_if(TokenType::Comma)?.is_match() {
                    break;
                };
            }
            let close = parser.require(TokenType::BracketClose)?;
            parser.create_node(
                t.loc() + close.loc(),
                Syntax::ArrayPattern { elements, rest },
            )
        }
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("pattern"))),
    })
}
