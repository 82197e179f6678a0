use crate::{
    ast::{ClassMember, ClassOrObjectMemberKey, ClassOrObjectMemberValue, Syntax},
    error::SyntaxResult,
    operator::OperatorName,
    source::SourceRange,
    token::TokenType,
};

use super::{
    expr::{parse_expr_until_either_with_asi, Asi},
    literal::parse_class_or_object_member_key,
    parser::Parser,
    pattern::{is_valid_pattern_identifier, parse_pattern},
    signature::parse_signature_function,
    stmt::parse_function_body,
};

pub struct ParseClassBodyResult {
    pub members: Vec<ClassMember>,
    pub end: SourceRange,
}

pub fn parse_class_body(parser: &mut Parser) -> SyntaxResult<ParseClassBodyResult> {
    parser.require(TokenType::BraceOpen)?;
    let mut members = Vec::<ClassMember>::new();
    loop {
        if parser.consume_if(TokenType::Semicolon)?.is_match() {
            continue;
        };
        if parser.peek()?.typ() == TokenType::BraceClose {
            break;
        };
        // `static` must always come first if present, but can also be the member's name.
        let cp = parser.checkpoint();
        let static_keyword = parser.consume_if(TokenType::KeywordStatic)?.match_loc_take();
        let mut statik = static_keyword.is_some();
        if statik && ends_member_name(parser.peek()?.typ(), TokenType::Equals) {
            parser.restore_checkpoint(cp);
            statik = false;
        };
        if let Some(keyword) = static_keyword.filter(|_| statik) {
            if parser.peek()?.typ() == TokenType::BraceOpen {
                let body = parse_function_body(parser, false)?;
                members.push(ClassMember {
                    key: ClassOrObjectMemberKey::Direct(keyword),
                    statik,
                    value: ClassOrObjectMemberValue::StaticBlock { body },
                });
                continue;
            };
        };
        let ParseClassOrObjectMemberResult { key, value } = parse_class_or_object_member(
            parser,
            TokenType::Equals,
            TokenType::Semicolon,
            &mut Asi::can(),
        )?;
        parser.consume_if(TokenType::Semicolon)?;
        members.push(ClassMember { key, statik, value });
    }
    let end = parser.require(TokenType::BraceClose)?.loc_take();
    Ok(ParseClassBodyResult { members, end })
}

pub struct ParseClassOrObjectMemberResult {
    pub key: ClassOrObjectMemberKey,
    pub value: ClassOrObjectMemberValue,
}

// Whether a token following `get`, `set`, `async` or `static` means that word was the member name.
fn ends_member_name(next: TokenType, value_delimiter: TokenType) -> bool {
    next == value_delimiter
        || matches!(
            next,
            TokenType::ParenthesisOpen
                | TokenType::Comma
                | TokenType::Semicolon
                | TokenType::BraceClose
                | TokenType::Equals
        )
}

// It's strictly one of these:
// <key> [ '=' <expr> ]? [ <asi> | ';' ]
// async? '*'? <key> '(' ...
// [ get | set ] <key> '(' ...
// <ident> [ '=' <expr> ]?  (object shorthand, the default only valid once it becomes a pattern)
pub fn parse_class_or_object_member(
    parser: &mut Parser,
    value_delimiter: TokenType,
    statement_delimiter: TokenType,
    property_initialiser_asi: &mut Asi,
) -> SyntaxResult<ParseClassOrObjectMemberResult> {
    let checkpoint = parser.checkpoint();
    let mut is_getter = false;
    let mut is_setter = false;
    let mut is_async = false;
    if parser.consume_if(TokenType::KeywordGet)?.is_match() {
        is_getter = true;
    } else if parser.consume_if(TokenType::KeywordSet)?.is_match() {
        is_setter = true;
    } else if parser.consume_if(TokenType::KeywordAsync)?.is_match() {
        is_async = true;
    }
    if is_getter || is_setter || is_async {
        let next = parser.peek()?;
        if ends_member_name(next.typ(), value_delimiter)
            || (is_async && next.preceded_by_line_terminator())
        {
            // Not actually a modifier, just using `get`/`set`/`async` as property name.
            parser.restore_checkpoint(checkpoint);
            is_getter = false;
            is_setter = false;
            is_async = false;
        };
    }
    let is_generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    let key_token = parser.peek()?;
    let key = parse_class_or_object_member_key(parser)?;
    let is_object = value_delimiter == TokenType::Colon;
    // Accessors come first, as `get a(){}` is followed by `(` just like a method.
    let value = if is_getter {
        parser.require(TokenType::ParenthesisOpen)?;
        parser.require(TokenType::ParenthesisClose)?;
        ClassOrObjectMemberValue::Getter {
            body: parse_function_body(parser, false)?,
        }
    } else if is_setter {
        parser.require(TokenType::ParenthesisOpen)?;
        let parameter = parse_pattern(parser)?;
        parser.require(TokenType::ParenthesisClose)?;
        ClassOrObjectMemberValue::Setter {
            parameter,
            body: parse_function_body(parser, false)?,
        }
    } else if is_generator || is_async || parser.peek()?.typ() == TokenType::ParenthesisOpen {
        let signature = parse_signature_function(parser)?;
        ClassOrObjectMemberValue::Method {
            is_async,
            generator: is_generator,
            signature,
            body: parse_function_body(parser, is_async)?,
        }
    } else if is_object {
        let next = parser.peek()?.typ();
        match &key {
            ClassOrObjectMemberKey::Direct(name)
                if is_valid_pattern_identifier(key_token.typ())
                    && matches!(
                        next,
                        TokenType::Comma | TokenType::BraceClose | TokenType::Equals
                    ) =>
            {
                let initializer = if parser.consume_if(TokenType::Equals)?.is_match() {
                    // `{a = 1}` is only legal as a destructuring target, where it becomes a
                    // property with a default value.
                    let target = parser
                        .create_node(name.clone(), Syntax::IdentifierPattern { name: name.clone() });
                    let default = parse_expr_until_either_with_asi(
                        parser,
                        TokenType::Comma,
                        TokenType::BraceClose,
                        &mut Asi::no(),
                    )?;
                    parser.create_node(
                        name + parser[default].loc(),
                        Syntax::BinaryExpr {
                            operator: OperatorName::Assignment,
                            left: target,
                            right: default,
                        },
                    )
                } else {
                    parser.create_node(name.clone(), Syntax::IdentifierExpr { name: name.clone() })
                };
                ClassOrObjectMemberValue::Property {
                    initializer: Some(initializer),
                }
            }
            _ => {
                parser.require(value_delimiter)?;
                let value = parse_expr_until_either_with_asi(
                    parser,
                    statement_delimiter,
                    TokenType::BraceClose,
                    property_initialiser_asi,
                )?;
                ClassOrObjectMemberValue::Property {
                    initializer: Some(value),
                }
            }
        }
    } else {
        let next = parser.peek()?;
        // Given `class A {a}`, `class A {a;}` or `class A {a\nb}`, the fields have no initializer.
        if next.typ() == TokenType::BraceClose
            || next.typ() == statement_delimiter
            || (property_initialiser_asi.can_end_with_asi
                && next.preceded_by_line_terminator()
                && next.typ() != value_delimiter)
        {
            ClassOrObjectMemberValue::Property { initializer: None }
        } else {
            parser.require(value_delimiter)?;
            let value = parse_expr_until_either_with_asi(
                parser,
                statement_delimiter,
                TokenType::BraceClose,
                property_initialiser_asi,
            )?;
            ClassOrObjectMemberValue::Property {
                initializer: Some(value),
            }
        }
    };
    Ok(ParseClassOrObjectMemberResult { key, value })
}
