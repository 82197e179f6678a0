use crate::ast::{
    ArrayElement, ArrayPatternElement, ClassOrObjectMemberValue, LiteralTemplatePart, NodeId,
    ObjectMemberType, Syntax,
};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::LexMode;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::parse::literal::{
    is_member_key_name, normalise_literal_bigint, normalise_literal_number,
    normalise_literal_string,
};
use crate::parse::operator::{multary_operator, unary_operator};
use crate::parse::parser::Parser;
use crate::parse::signature::parse_signature_function;
use crate::source::SourceRange;
use crate::token::{Token, TokenType};

use super::class_or_object::{
    parse_class_body, parse_class_or_object_member, ParseClassBodyResult,
    ParseClassOrObjectMemberResult,
};
use super::pattern::is_valid_pattern_identifier;
use super::stmt::parse_function_body;

pub struct Asi {
    pub can_end_with_asi: bool,
    pub did_end_with_asi: bool,
}

impl Asi {
    pub fn can() -> Asi {
        Asi {
            can_end_with_asi: true,
            did_end_with_asi: false,
        }
    }

    pub fn no() -> Asi {
        Asi {
            can_end_with_asi: false,
            did_end_with_asi: false,
        }
    }
}

// Lowest precedence that still excludes the comma operator, i.e. an AssignmentExpression.
fn assignment_expr_prec() -> u8 {
    OperatorName::ConditionalAlternate.precedence()
}

pub fn parse_call_args(parser: &mut Parser) -> SyntaxResult<Vec<NodeId>> {
    let mut args = Vec::<NodeId>::new();
    loop {
        if parser.peek()?.typ() == TokenType::ParenthesisClose {
            break;
        };
        let spread = parser.consume_if(TokenType::DotDotDot)?.is_match();
        let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::ParenthesisClose)?;
        args.push(parser.create_node(
            parser[value].loc().clone(),
            Syntax::CallArg { spread, value },
        ));
        if !parser.consume_if(TokenType::Comma)?.is_match() {
            break;
        };
    }
    Ok(args)
}

pub fn parse_expr(parser: &mut Parser, terminator: TokenType) -> SyntaxResult<NodeId> {
    let mut asi = Asi::no();
    parse_expr_with_min_prec(parser, 1, terminator, TokenType::_Dummy, &mut asi)
}

pub fn parse_expr_with_asi(
    parser: &mut Parser,
    terminator: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(parser, 1, terminator, TokenType::_Dummy, asi)
}

pub fn parse_expr_until_either(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
) -> SyntaxResult<NodeId> {
    let mut asi = Asi::no();
    parse_expr_with_min_prec(parser, 1, terminator_a, terminator_b, &mut asi)
}

pub fn parse_expr_until_either_with_asi(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(parser, 1, terminator_a, terminator_b, asi)
}

pub fn parse_grouping(parser: &mut Parser) -> SyntaxResult<NodeId> {
    parser.require(TokenType::ParenthesisOpen)?;
    let expr = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    Ok(expr)
}

pub fn parse_expr_array(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let loc_start = parser.require(TokenType::BracketOpen)?.loc_take();
    let mut elements = Vec::<ArrayElement>::new();
    loop {
        if parser.consume_if(TokenType::Comma)?.is_match() {
            elements.push(ArrayElement::Empty);
            continue;
        };
        if parser.peek()?.typ() == TokenType::BracketClose {
            break;
        };
        let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
        let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::BracketClose)?;
        elements.push(if rest {
            ArrayElement::Rest(value)
        } else {
            ArrayElement::Single(value)
        });
        if parser.peek()?.typ() == TokenType::BracketClose {
            break;
        };
        parser.require(TokenType::Comma)?;
    }
    let loc_end = parser.require(TokenType::BracketClose)?.loc_take();
    Ok(parser.create_node(&loc_start + &loc_end, Syntax::LiteralArrayExpr { elements }))
}

pub fn parse_expr_object(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let loc_start = parser.require(TokenType::BraceOpen)?.loc_take();
    let mut members = Vec::<NodeId>::new();
    loop {
        if parser.peek()?.typ() == TokenType::BraceClose {
            break;
        };
        let loc_checkpoint = parser.checkpoint();
        let typ = if parser.consume_if(TokenType::DotDotDot)?.is_match() {
            let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::BraceClose)?;
            ObjectMemberType::Rest { value }
        } else {
            let ParseClassOrObjectMemberResult { key, value } = parse_class_or_object_member(
                parser,
                TokenType::Colon,
                TokenType::Comma,
                &mut Asi::no(),
            )?;
            ObjectMemberType::Valued { key, value }
        };
        members.push(parser.create_node(
            parser.since_checkpoint(&loc_checkpoint),
            Syntax::ObjectMember { typ },
        ));
        if parser.peek()?.typ() == TokenType::BraceClose {
            break;
        };
        parser.require(TokenType::Comma)?;
    }
    let loc_end = parser.require(TokenType::BraceClose)?.loc_take();
    Ok(parser.create_node(&loc_start + &loc_end, Syntax::LiteralObjectExpr { members }))
}

fn require_arrow(parser: &mut Parser) -> SyntaxResult<()> {
    let arrow = parser.require(TokenType::EqualsChevronRight)?;
    if arrow.preceded_by_line_terminator() {
        // Illegal under Automatic Semicolon Insertion rules.
        return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
    };
    Ok(())
}

fn parse_arrow_function_body(
    parser: &mut Parser,
    is_async: bool,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    match parser.peek()?.typ() {
        TokenType::BraceOpen => parse_function_body(parser, is_async),
        _ => parser.with_async(is_async, |parser| {
            parse_expr_with_min_prec(
                parser,
                assignment_expr_prec(),
                terminator_a,
                terminator_b,
                asi,
            )
        }),
    }
}

// `x => ...` or `async x => ...`, with the parameter token already consumed.
fn parse_expr_arrow_function_single_param(
    parser: &mut Parser,
    start: &SourceRange,
    param: Token,
    is_async: bool,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    let name = param.loc_take();
    let pattern = parser.create_node(name.clone(), Syntax::IdentifierPattern { name: name.clone() });
    let param = parser.create_node(
        name.clone(),
        Syntax::ParamDecl {
            rest: false,
            pattern,
            default_value: None,
        },
    );
    let signature = parser.create_node(
        name,
        Syntax::FunctionSignature {
            parameters: vec![param],
        },
    );
    require_arrow(parser)?;
    let body = parse_arrow_function_body(parser, is_async, terminator_a, terminator_b, asi)?;
    Ok(parser.create_node(
        start + parser[body].loc(),
        Syntax::ArrowFunctionExpr {
            is_async,
            signature,
            body,
        },
    ))
}

pub fn parse_expr_arrow_function_or_grouping(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    // Try and parse as arrow function signature first.
    // If we fail, backtrack and parse as grouping instead.
    // After we see `=>`, we assume it's definitely an arrow function and do not backtrack.
    let cp = parser.checkpoint();
    let signature = match parse_signature_function(parser).and_then(|sig| {
        require_arrow(parser)?;
        Ok(sig)
    }) {
        Ok(sig) => sig,
        Err(err) if err.typ() == SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
            return Err(err)
        }
        Err(_) => {
            parser.restore_checkpoint(cp);
            return parse_grouping(parser);
        }
    };
    let body = parse_arrow_function_body(parser, false, terminator_a, terminator_b, asi)?;
    Ok(parser.create_node(
        parser[signature].loc() + parser[body].loc(),
        Syntax::ArrowFunctionExpr {
            is_async: false,
            signature,
            body,
        },
    ))
}

// Starts at `async`. Falls back to an identifier named `async` if no arrow function follows.
fn parse_expr_async_arrow_function_or_identifier(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    let async_token = parser.require(TokenType::KeywordAsync)?;
    let start = async_token.loc().clone();
    let next = parser.peek()?;
    if next.typ() == TokenType::EqualsChevronRight {
        // `async => ...` names its parameter `async`.
        return parse_expr_arrow_function_single_param(
            parser,
            &start,
            async_token,
            false,
            terminator_a,
            terminator_b,
            asi,
        );
    };
    if !next.preceded_by_line_terminator() {
        if next.typ() == TokenType::KeywordFunction {
            parser.restore_checkpoint(cp);
            return parse_expr_function(parser);
        };
        if is_valid_pattern_identifier(next.typ()) {
            parser.consume_peeked();
            if parser.peek()?.typ() == TokenType::EqualsChevronRight {
                return parse_expr_arrow_function_single_param(
                    parser,
                    &start,
                    next,
                    true,
                    terminator_a,
                    terminator_b,
                    asi,
                );
            };
        } else if next.typ() == TokenType::ParenthesisOpen {
            let signature = parse_signature_function(parser).and_then(|sig| {
                require_arrow(parser)?;
                Ok(sig)
            });
            match signature {
                Ok(signature) => {
                    let body =
                        parse_arrow_function_body(parser, true, terminator_a, terminator_b, asi)?;
                    return Ok(parser.create_node(
                        &start + parser[body].loc(),
                        Syntax::ArrowFunctionExpr {
                            is_async: true,
                            signature,
                            body,
                        },
                    ));
                }
                Err(err)
                    if err.typ() == SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters =>
                {
                    return Err(err)
                }
                // A call to a function named `async`.
                Err(_) => {}
            };
        };
    };
    parser.restore_checkpoint(cp);
    let name = parser.require(TokenType::KeywordAsync)?.loc_take();
    Ok(parser.create_node(name.clone(), Syntax::IdentifierExpr { name }))
}

pub fn parse_expr_import(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordImport)?;
    if parser.consume_if(TokenType::Dot)?.is_match() {
        let property = parser.next()?;
        if property.typ() != TokenType::Identifier || *property.loc() != *"meta" {
            return Err(property.error(SyntaxErrorType::ExpectedSyntax("import.meta")));
        };
        return Ok(parser.create_node(start.loc() + property.loc(), Syntax::ImportMetaExpr {}));
    };
    parser.require(TokenType::ParenthesisOpen)?;
    let module = parse_expr_until_either(parser, TokenType::ParenthesisClose, TokenType::Comma)?;
    let end = parser.require(TokenType::ParenthesisClose)?;
    Ok(parser.create_node(start.loc() + end.loc(), Syntax::ImportExpr { module }))
}

pub fn parse_expr_function(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    let is_async = parser.consume_if(TokenType::KeywordAsync)?.is_match();
    parser.require(TokenType::KeywordFunction)?;
    let generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    // The name is only visible inside the function itself.
    let name = match parser
        .consume_if_pred(|t| is_valid_pattern_identifier(t.typ()))?
        .match_loc_take()
    {
        Some(name) => Some(
            parser.create_node(name.clone(), Syntax::ClassOrFunctionName { name }),
        ),
        None => None,
    };
    let signature = parse_signature_function(parser)?;
    let body = parse_function_body(parser, is_async)?;
    Ok(parser.create_node(
        parser.since_checkpoint(&cp),
        Syntax::FunctionExpr {
            is_async,
            generator,
            name,
            signature,
            body,
        },
    ))
}

pub fn parse_expr_class(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordClass)?.loc_take();
    let name = match parser
        .consume_if_pred(|t| is_valid_pattern_identifier(t.typ()))?
        .match_loc_take()
    {
        Some(name) => Some(
            parser.create_node(name.clone(), Syntax::ClassOrFunctionName { name }),
        ),
        None => None,
    };
    let extends = if parser.consume_if(TokenType::KeywordExtends)?.is_match() {
        Some(parse_expr(parser, TokenType::BraceOpen)?)
    } else {
        None
    };
    let ParseClassBodyResult { members, end } = parse_class_body(parser)?;
    Ok(parser.create_node(
        &start + &end,
        Syntax::ClassExpr {
            name,
            extends,
            members,
        },
    ))
}

// Parses the rest of a template after its first token, which is the raw text up to the first `${`
// or the whole template.
fn parse_template_parts(parser: &mut Parser, first: Token) -> SyntaxResult<Vec<LiteralTemplatePart>> {
    let mut done = first.typ() == TokenType::LiteralTemplatePartStringEnd;
    let mut parts = vec![LiteralTemplatePart::String(first.loc_take())];
    while !done {
        let substitution = parse_expr(parser, TokenType::BraceClose)?;
        parser.require(TokenType::BraceClose)?;
        parts.push(LiteralTemplatePart::Substitution(substitution));
        let string = parser.template_continue()?;
        done = string.typ() == TokenType::LiteralTemplatePartStringEnd;
        parts.push(LiteralTemplatePart::String(string.loc_take()));
    }
    Ok(parts)
}

fn parse_member_name(parser: &mut Parser) -> SyntaxResult<SourceRange> {
    let t = parser.next()?;
    if !is_member_key_name(t.typ()) {
        return Err(t.error(SyntaxErrorType::ExpectedSyntax("member access property")));
    };
    Ok(t.loc_take())
}

// The callee of `new` is a member expression without calls, so `new a.b()` constructs `a.b` and
// `new a().b` reads `b` from the constructed object.
fn parse_expr_new(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    let new = parser.require(TokenType::KeywordNew)?;
    if parser.consume_if(TokenType::Dot)?.is_match() {
        let property = parser.next()?;
        if property.typ() != TokenType::Identifier || *property.loc() != *"target" {
            return Err(property.error(SyntaxErrorType::ExpectedSyntax("new.target")));
        };
        return Ok(parser.create_node(new.loc() + property.loc(), Syntax::NewTargetExpr {}));
    };
    let mut callee = parse_expr_operand(
        parser,
        TokenType::_Dummy,
        TokenType::_Dummy,
        &mut Asi::no(),
    )?;
    loop {
        let t = parser.peek()?;
        callee = match t.typ() {
            TokenType::Dot => {
                parser.consume_peeked();
                let right = parse_member_name(parser)?;
                parser.create_node(
                    parser[callee].loc() + &right,
                    Syntax::MemberExpr {
                        optional_chaining: false,
                        left: callee,
                        right,
                    },
                )
            }
            TokenType::BracketOpen => {
                parser.consume_peeked();
                let member = parse_expr(parser, TokenType::BracketClose)?;
                let end = parser.require(TokenType::BracketClose)?;
                parser.create_node(
                    parser[callee].loc() + end.loc(),
                    Syntax::ComputedMemberExpr {
                        optional_chaining: false,
                        object: callee,
                        member,
                    },
                )
            }
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
                parser.consume_peeked();
                let parts = parse_template_parts(parser, t)?;
                parser.create_node(
                    parser.since_checkpoint(&cp),
                    Syntax::TaggedTemplateExpr {
                        function: callee,
                        parts,
                    },
                )
            }
            _ => break,
        };
    }
    // `new A` is stored as `new A()`; the emitter drops empty parentheses where it can.
    let arguments = if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
        let arguments = parse_call_args(parser)?;
        parser.require(TokenType::ParenthesisClose)?;
        arguments
    } else {
        Vec::new()
    };
    let loc = parser.since_checkpoint(&cp);
    let call = parser.create_node(
        loc.clone(),
        Syntax::CallExpr {
            optional_chaining: false,
            callee,
            arguments,
        },
    );
    Ok(parser.create_node(
        loc,
        Syntax::UnaryExpr {
            operator: OperatorName::New,
            argument: call,
        },
    ))
}

// `yield` can appear without an operand.
fn yield_has_operand(next: &Token) -> bool {
    !next.preceded_by_line_terminator()
        && !matches!(
            next.typ(),
            TokenType::ParenthesisClose
                | TokenType::BracketClose
                | TokenType::BraceClose
                | TokenType::Comma
                | TokenType::Semicolon
                | TokenType::Colon
                | TokenType::EOF
        )
}

fn parse_expr_operand(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    let t = parser.next_with_mode(LexMode::SlashIsRegex)?;
    // Outside async functions `await` is an ordinary identifier.
    let operator =
        unary_operator(t.typ()).filter(|op| *op != OperatorName::Await || parser.in_async());
    let operand = if let Some(operator) = operator {
        let operator = if operator == OperatorName::Yield
            && parser.consume_if(TokenType::Asterisk)?.is_match()
        {
            OperatorName::YieldDelegated
        } else {
            operator
        };
        let next_min_prec = operator.right_operand_precedence();
        let operand = if operator == OperatorName::Yield
            && !yield_has_operand(&parser.peek_with_mode(LexMode::SlashIsRegex)?)
        {
            // A bare `yield` produces undefined, so it's stored as `yield void 0` and printed bare.
            let zero = parser.create_node(
                t.loc().clone(),
                Syntax::LiteralNumberExpr {
                    value: JsNumber(0.0),
                },
            );
            parser.create_node(
                t.loc().clone(),
                Syntax::UnaryExpr {
                    operator: OperatorName::Void,
                    argument: zero,
                },
            )
        } else {
            parse_expr_with_min_prec(parser, next_min_prec, terminator_a, terminator_b, asi)?
        };
        parser.create_node(
            t.loc() + parser[operand].loc(),
            Syntax::UnaryExpr {
                operator,
                argument: operand,
            },
        )
    } else {
        match t.typ() {
            TokenType::BracketOpen => {
                parser.restore_checkpoint(cp);
                parse_expr_array(parser)?
            }
            TokenType::BraceOpen => {
                parser.restore_checkpoint(cp);
                parse_expr_object(parser)?
            }
            TokenType::KeywordAsync => {
                parser.restore_checkpoint(cp);
                parse_expr_async_arrow_function_or_identifier(
                    parser,
                    terminator_a,
                    terminator_b,
                    asi,
                )?
            }
            typ if is_valid_pattern_identifier(typ) => {
                if parser.peek()?.typ() == TokenType::EqualsChevronRight {
                    // Single-unparenthesised-parameter arrow function.
                    let start = t.loc().clone();
                    parse_expr_arrow_function_single_param(
                        parser,
                        &start,
                        t,
                        false,
                        terminator_a,
                        terminator_b,
                        asi,
                    )?
                } else {
                    let name = t.loc_take();
                    parser.create_node(name.clone(), Syntax::IdentifierExpr { name })
                }
            }
            TokenType::KeywordClass => {
                parser.restore_checkpoint(cp);
                parse_expr_class(parser)?
            }
            TokenType::KeywordFunction => {
                parser.restore_checkpoint(cp);
                parse_expr_function(parser)?
            }
            TokenType::KeywordImport => {
                parser.restore_checkpoint(cp);
                parse_expr_import(parser)?
            }
            TokenType::KeywordNew => {
                parser.restore_checkpoint(cp);
                parse_expr_new(parser)?
            }
            TokenType::KeywordSuper => parser.create_node(t.loc_take(), Syntax::SuperExpr {}),
            TokenType::KeywordThis => parser.create_node(t.loc_take(), Syntax::ThisExpr {}),
            TokenType::LiteralTrue | TokenType::LiteralFalse => parser.create_node(
                t.loc().clone(),
                Syntax::LiteralBooleanExpr {
                    value: t.typ() == TokenType::LiteralTrue,
                },
            ),
            TokenType::LiteralNull => parser.create_node(t.loc_take(), Syntax::LiteralNull {}),
            TokenType::LiteralNumber => parser.create_node(
                t.loc().clone(),
                Syntax::LiteralNumberExpr {
                    value: normalise_literal_number(t.loc())?,
                },
            ),
            TokenType::LiteralBigInt => parser.create_node(
                t.loc().clone(),
                Syntax::LiteralBigIntExpr {
                    value: normalise_literal_bigint(t.loc()),
                },
            ),
            TokenType::LiteralRegex => parser.create_node(t.loc_take(), Syntax::LiteralRegexExpr {}),
            TokenType::LiteralString => parser.create_node(
                t.loc().clone(),
                Syntax::LiteralStringExpr {
                    value: normalise_literal_string(t.loc())?,
                },
            ),
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
                let parts = parse_template_parts(parser, t)?;
                parser.create_node(
                    parser.since_checkpoint(&cp),
                    Syntax::LiteralTemplateExpr { parts },
                )
            }
            TokenType::ParenthesisOpen => {
                parser.restore_checkpoint(cp);
                parse_expr_arrow_function_or_grouping(parser, terminator_a, terminator_b, asi)?
            }
            _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
        }
    };
    Ok(operand)
}

fn invalid_target(parser: &Parser, node: NodeId) -> SyntaxError {
    parser[node].error(SyntaxErrorType::InvalidAssigmentTarget)
}

// `x = d` inside a destructuring literal is a target with a default value.
fn transform_target_with_default(
    parser: &mut Parser,
    node: NodeId,
) -> SyntaxResult<(NodeId, Option<NodeId>)> {
    match parser[node].stx() {
        Syntax::BinaryExpr {
            operator: OperatorName::Assignment,
            left,
            right,
        } => {
            let (left, right) = (*left, *right);
            Ok((
                transform_literal_expr_to_destructuring_pattern(parser, left)?,
                Some(right),
            ))
        }
        _ => Ok((
            transform_literal_expr_to_destructuring_pattern(parser, node)?,
            None,
        )),
    }
}

fn transform_literal_expr_to_destructuring_pattern(
    parser: &mut Parser,
    node: NodeId,
) -> SyntaxResult<NodeId> {
    let loc = parser[node].loc().clone();
    match parser[node].stx().clone() {
        Syntax::LiteralArrayExpr { elements } => {
            let mut pat_elements = Vec::<Option<ArrayPatternElement>>::new();
            let mut rest = None;
            for element in elements {
                if rest.is_some() {
                    return Err(invalid_target(parser, node));
                };
                match element {
                    ArrayElement::Single(elem) => {
                        let (target, default_value) = transform_target_with_default(parser, elem)?;
                        pat_elements.push(Some(ArrayPatternElement {
                            target,
                            default_value,
                        }));
                    }
                    ArrayElement::Rest(expr) => {
                        rest = Some(transform_literal_expr_to_destructuring_pattern(parser, expr)?);
                    }
                    ArrayElement::Empty => pat_elements.push(None),
                };
            }
            Ok(parser.create_node(
                loc,
                Syntax::ArrayPattern {
                    elements: pat_elements,
                    rest,
                },
            ))
        }
        Syntax::LiteralObjectExpr { members } => {
            let mut properties = Vec::<NodeId>::new();
            let mut rest = None;
            for member in members {
                if rest.is_some() {
                    return Err(invalid_target(parser, node));
                };
                let member_loc = parser[member].loc().clone();
                match parser[member].stx().clone() {
                    Syntax::ObjectMember {
                        typ:
                            ObjectMemberType::Valued {
                                key,
                                value:
                                    ClassOrObjectMemberValue::Property {
                                        initializer: Some(initializer),
                                    },
                            },
                    } => {
                        let (target, default_value) =
                            transform_target_with_default(parser, initializer)?;
                        properties.push(parser.create_node(
                            member_loc,
                            Syntax::ObjectPatternProperty {
                                key,
                                target,
                                default_value,
                            },
                        ));
                    }
                    Syntax::ObjectMember {
                        typ: ObjectMemberType::Rest { value },
                    } => {
                        rest = Some(transform_literal_expr_to_destructuring_pattern(parser, value)?);
                    }
                    _ => return Err(invalid_target(parser, node)),
                };
            }
            Ok(parser.create_node(loc, Syntax::ObjectPattern { properties, rest }))
        }
        Syntax::IdentifierExpr { name } => {
            Ok(parser.create_node(loc, Syntax::IdentifierPattern { name }))
        }
        // Already a target, e.g. `b` in `{ a: b = 1 } = x` where `b = 1` was parsed as an
        // assignment first.
        Syntax::IdentifierPattern { .. }
        | Syntax::ArrayPattern { .. }
        | Syntax::ObjectPattern { .. }
        | Syntax::MemberExpr {
            optional_chaining: false,
            ..
        }
        | Syntax::ComputedMemberExpr {
            optional_chaining: false,
            ..
        } => Ok(node),
        _ => Err(invalid_target(parser, node)),
    }
}

// Trying to check if every object, array, or identifier expression operand is actually an assignment target first is too expensive, so simply retroactively transform the LHS of a BinaryExpr with Assignment* operator into a target, raising an error if it can't (and is an invalid assignment target). A valid target is:
// - A chain of non-optional-chaining member, computed member, and call operators, not ending in a call.
// - A pattern.
fn convert_assignment_lhs_to_target(
    parser: &mut Parser,
    lhs: NodeId,
    operator_name: OperatorName,
) -> SyntaxResult<NodeId> {
    match parser[lhs].stx() {
        Syntax::LiteralArrayExpr { .. } | Syntax::LiteralObjectExpr { .. } => {
            if operator_name != OperatorName::Assignment {
                return Err(invalid_target(parser, lhs));
            };
            // We must transform into a pattern.
            transform_literal_expr_to_destructuring_pattern(parser, lhs)
        }
        Syntax::IdentifierExpr { .. } => transform_literal_expr_to_destructuring_pattern(parser, lhs),
        Syntax::ComputedMemberExpr {
            optional_chaining: false,
            ..
        }
        | Syntax::MemberExpr {
            optional_chaining: false,
            ..
        } => {
            // As long as the expression ends with ComputedMemberExpr or MemberExpr, it's valid e.g. `(a, b?.a ?? 3, c = d || {})[1] = x`.
            Ok(lhs)
        }
        _ => Err(invalid_target(parser, lhs)),
    }
}

pub fn parse_expr_with_min_prec(
    parser: &mut Parser,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<NodeId> {
    let mut left = parse_expr_operand(parser, terminator_a, terminator_b, asi)?;
    let member_prec = OperatorName::MemberAccess.precedence();

    loop {
        let cp = parser.checkpoint();
        let t = parser.next()?;

        if t.typ() == terminator_a || t.typ() == terminator_b {
            parser.restore_checkpoint(cp);
            break;
        };

        match t.typ() {
            // Automatic Semicolon Insertion rules: no newline between operand and postfix operator.
            TokenType::PlusPlus | TokenType::HyphenHyphen if !t.preceded_by_line_terminator() => {
                let operator_name = if t.typ() == TokenType::PlusPlus {
                    OperatorName::PostfixIncrement
                } else {
                    OperatorName::PostfixDecrement
                };
                if operator_name.precedence() < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };
                left = parser.create_node(
                    parser[left].loc() + t.loc(),
                    Syntax::UnaryPostfixExpr {
                        operator: operator_name,
                        argument: left,
                    },
                );
                continue;
            }
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
                if member_prec < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };
                let loc = parser[left].loc().clone();
                let parts = parse_template_parts(parser, t)?;
                left = parser.create_node(
                    &loc + &parser.since_checkpoint(&cp),
                    Syntax::TaggedTemplateExpr {
                        function: left,
                        parts,
                    },
                );
                continue;
            }
            _ => {}
        };

        match multary_operator(t.typ()) {
            None => {
                if asi.can_end_with_asi
                    && (t.preceded_by_line_terminator()
                        || t.typ() == TokenType::BraceClose
                        || t.typ() == TokenType::EOF)
                {
                    // Automatic Semicolon Insertion.
                    parser.restore_checkpoint(cp);
                    asi.did_end_with_asi = true;
                    break;
                };
                return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operator")));
            }
            Some(operator) => {
                if operator.precedence() < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };

                let next_min_prec = operator.right_operand_precedence();

                left = match operator {
                    OperatorName::Call => {
                        let arguments = parse_call_args(parser)?;
                        let end = parser.require(TokenType::ParenthesisClose)?;
                        parser.create_node(
                            parser[left].loc() + end.loc(),
                            Syntax::CallExpr {
                                optional_chaining: false,
                                arguments,
                                callee: left,
                            },
                        )
                    }
                    OperatorName::ComputedMemberAccess => {
                        let member = parse_expr(parser, TokenType::BracketClose)?;
                        let end = parser.require(TokenType::BracketClose)?;
                        parser.create_node(
                            parser[left].loc() + end.loc(),
                            Syntax::ComputedMemberExpr {
                                optional_chaining: false,
                                object: left,
                                member,
                            },
                        )
                    }
                    // `?.` is followed by `[`, `(` or a name.
                    OperatorName::OptionalChainingMemberAccess => {
                        if parser.consume_if(TokenType::BracketOpen)?.is_match() {
                            let member = parse_expr(parser, TokenType::BracketClose)?;
                            let end = parser.require(TokenType::BracketClose)?;
                            parser.create_node(
                                parser[left].loc() + end.loc(),
                                Syntax::ComputedMemberExpr {
                                    optional_chaining: true,
                                    object: left,
                                    member,
                                },
                            )
                        } else if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
                            let arguments = parse_call_args(parser)?;
                            let end = parser.require(TokenType::ParenthesisClose)?;
                            parser.create_node(
                                parser[left].loc() + end.loc(),
                                Syntax::CallExpr {
                                    optional_chaining: true,
                                    arguments,
                                    callee: left,
                                },
                            )
                        } else {
                            let right = parse_member_name(parser)?;
                            parser.create_node(
                                parser[left].loc() + &right,
                                Syntax::MemberExpr {
                                    optional_chaining: true,
                                    left,
                                    right,
                                },
                            )
                        }
                    }
                    OperatorName::Conditional => {
                        let consequent = parse_expr_with_min_prec(
                            parser,
                            1,
                            TokenType::Colon,
                            TokenType::_Dummy,
                            &mut Asi::no(),
                        )?;
                        parser.require(TokenType::Colon)?;
                        let alternate = parse_expr_with_min_prec(
                            parser,
                            assignment_expr_prec(),
                            terminator_a,
                            terminator_b,
                            asi,
                        )?;
                        parser.create_node(
                            parser[left].loc() + parser[alternate].loc(),
                            Syntax::ConditionalExpr {
                                test: left,
                                consequent,
                                alternate,
                            },
                        )
                    }
                    OperatorName::MemberAccess => {
                        let right = parse_member_name(parser)?;
                        parser.create_node(
                            parser[left].loc() + &right,
                            Syntax::MemberExpr {
                                optional_chaining: false,
                                left,
                                right,
                            },
                        )
                    }
                    _ => {
                        if operator.is_assignment() {
                            left = convert_assignment_lhs_to_target(parser, left, operator)?;
                        };
                        let right = parse_expr_with_min_prec(
                            parser,
                            next_min_prec,
                            terminator_a,
                            terminator_b,
                            asi,
                        )?;
                        parser.create_node(
                            parser[left].loc() + parser[right].loc(),
                            Syntax::BinaryExpr {
                                operator,
                                left,
                                right,
                            },
                        )
                    }
                };
            }
        };
    }

    Ok(left)
}
