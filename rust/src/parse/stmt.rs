use crate::ast::{
    ExportName, ExportNames, ForInOfStmtHeaderLhs, ForStmtHeader, ForThreeInit, NodeId, Syntax,
};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::decl::{parse_decl_function, parse_decl_var};
use crate::parse::expr::parse_expr;
use crate::parse::literal::{is_member_key_name, parse_and_normalise_literal_string};
use crate::parse::parser::Parser;
use crate::parse::pattern::{parse_pattern, parse_pattern_identifier};
use crate::source::SourceRange;
use crate::token::TokenType;

use super::decl::{parse_decl_class, VarDeclParseMode};
use super::expr::{parse_expr_with_asi, Asi};
use super::pattern::is_valid_pattern_identifier;

// Consumes a `;`, or accepts its absence where Automatic Semicolon Insertion applies.
fn require_semicolon_or_asi(parser: &mut Parser) -> SyntaxResult<()> {
    if parser.consume_if(TokenType::Semicolon)?.is_match() {
        return Ok(());
    };
    let t = parser.peek()?;
    if t.preceded_by_line_terminator()
        || t.typ() == TokenType::BraceClose
        || t.typ() == TokenType::EOF
    {
        Ok(())
    } else {
        Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TokenType::Semicolon)))
    }
}

// Parses `a`, `a as b`, `default as b`, `a as default`.
fn parse_import_or_export_name(parser: &mut Parser) -> SyntaxResult<ExportName> {
    let target = parser
        .require_predicate(is_member_key_name, "import or export name")?
        .loc_take();
    let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
        parser
            .require_predicate(is_member_key_name, "import or export alias")?
            .loc_take()
    } else {
        target.clone()
    };
    let alias = parser.create_node(alias.clone(), Syntax::IdentifierPattern { name: alias });
    Ok(ExportName { target, alias })
}

fn parse_import_or_export_names(parser: &mut Parser) -> SyntaxResult<Vec<ExportName>> {
    parser.require(TokenType::BraceOpen)?;
    let mut names = Vec::<ExportName>::new();
    loop {
        if parser.consume_if(TokenType::BraceClose)?.is_match() {
            break;
        };
        names.push(parse_import_or_export_name(parser)?);
        if !parser.consume_if(TokenType::Comma)?.is_match() {
            parser.require(TokenType::BraceClose)?;
            break;
        };
    }
    Ok(names)
}

// Whether `async` starts an async function declaration rather than an expression.
fn is_async_function(parser: &mut Parser) -> SyntaxResult<bool> {
    let cp = parser.checkpoint();
    parser.require(TokenType::KeywordAsync)?;
    let next = parser.peek()?;
    parser.restore_checkpoint(cp);
    Ok(next.typ() == TokenType::KeywordFunction && !next.preceded_by_line_terminator())
}

pub fn parse_stmt(parser: &mut Parser) -> SyntaxResult<NodeId> {
    match parser.peek()?.typ() {
        TokenType::BraceOpen => parse_stmt_block(parser),
        TokenType::KeywordBreak => parse_stmt_break(parser),
        TokenType::KeywordClass => parse_decl_class(parser),
        TokenType::KeywordConst | TokenType::KeywordLet | TokenType::KeywordVar => {
            parse_stmt_var(parser)
        }
        TokenType::KeywordContinue => parse_stmt_continue(parser),
        TokenType::KeywordDebugger => parse_stmt_debugger(parser),
        TokenType::KeywordDo => parse_stmt_do_while(parser),
        TokenType::KeywordExport => parse_stmt_export(parser),
        TokenType::KeywordFor => parse_stmt_for(parser),
        TokenType::KeywordAsync if is_async_function(parser)? => parse_decl_function(parser),
        TokenType::KeywordFunction => parse_decl_function(parser),
        TokenType::KeywordIf => parse_stmt_if(parser),
        TokenType::KeywordImport => parse_stmt_import_or_expr_import(parser),
        TokenType::KeywordReturn => parse_stmt_return(parser),
        TokenType::KeywordSwitch => parse_stmt_switch(parser),
        TokenType::KeywordThrow => parse_stmt_throw(parser),
        TokenType::KeywordTry => parse_stmt_try(parser),
        TokenType::KeywordWhile => parse_stmt_while(parser),
        TokenType::KeywordWith => parse_stmt_with(parser),
        TokenType::Semicolon => parse_stmt_empty(parser),
        t if is_valid_pattern_identifier(t) => {
            let checkpoint = parser.checkpoint();
            let label_name = parser.next()?.loc_take();
            if parser.consume_if(TokenType::Colon)?.is_match() {
                let statement = parse_stmt(parser)?;
                Ok(parser.create_node(
                    parser.since_checkpoint(&checkpoint),
                    Syntax::LabelStmt {
                        name: label_name,
                        statement,
                    },
                ))
            } else {
                parser.restore_checkpoint(checkpoint);
                parse_stmt_expression(parser)
            }
        }
        _ => parse_stmt_expression(parser),
    }
}

pub fn parse_stmt_empty(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let loc = parser.require(TokenType::Semicolon)?.loc_take();
    Ok(parser.create_node(loc, Syntax::EmptyStmt {}))
}

pub fn parse_stmt_block(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::BraceOpen)?;
    let mut body: Vec<NodeId> = Vec::new();
    loop {
        if let Some(end_loc) = parser.consume_if(TokenType::BraceClose)?.match_loc() {
            return Ok(parser.create_node(start.loc() + end_loc, Syntax::BlockStmt { body }));
        };
        body.push(parse_stmt(parser)?);
    }
}

/// Body of a function, method or accessor.
pub fn parse_function_body(parser: &mut Parser, is_async: bool) -> SyntaxResult<NodeId> {
    parser.with_async(is_async, parse_stmt_block)
}

pub fn parse_stmt_var(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let declaration = parse_decl_var(parser, VarDeclParseMode::Asi)?;
    Ok(parser.create_node(
        parser[declaration].loc().clone(),
        Syntax::VarStmt { declaration },
    ))
}

struct BreakOrContinue {
    loc: SourceRange,
    label: Option<SourceRange>,
}

fn parse_stmt_break_or_continue(
    parser: &mut Parser,
    t: TokenType,
) -> SyntaxResult<BreakOrContinue> {
    let mut loc = parser.require(t)?.loc_take();
    let next = parser.peek()?;
    let label = if is_valid_pattern_identifier(next.typ()) && !next.preceded_by_line_terminator() {
        // Label.
        parser.consume_peeked();
        loc.extend(next.loc());
        Some(next.loc_take())
    } else {
        None
    };
    require_semicolon_or_asi(parser)?;
    Ok(BreakOrContinue { loc, label })
}

pub fn parse_stmt_break(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordBreak)?;
    Ok(parser.create_node(stmt.loc, Syntax::BreakStmt { label: stmt.label }))
}

pub fn parse_stmt_continue(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordContinue)?;
    Ok(parser.create_node(stmt.loc, Syntax::ContinueStmt { label: stmt.label }))
}

pub fn parse_stmt_debugger(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let loc = parser.require(TokenType::KeywordDebugger)?.loc_take();
    require_semicolon_or_asi(parser)?;
    Ok(parser.create_node(loc, Syntax::DebuggerStmt {}))
}

// https://tc39.es/ecma262/#sec-exports
// https://jakearchibald.com/2021/export-default-thing-vs-thing-as-default/
pub fn parse_stmt_export(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let cp_start = parser.checkpoint();
    let start = parser.require(TokenType::KeywordExport)?;
    let t = parser.peek()?;
    Ok(match t.typ() {
        TokenType::BraceOpen => {
            let names = parse_import_or_export_names(parser)?;
            let from = parser
                .consume_if(TokenType::KeywordFrom)?
                .and_then(|| parse_and_normalise_literal_string(parser))?;
            require_semicolon_or_asi(parser)?;
            parser.create_node(
                parser.since_checkpoint(&cp_start),
                Syntax::ExportListStmt {
                    names: ExportNames::Specific(names),
                    from,
                },
            )
        }
        TokenType::Asterisk => {
            parser.consume_peeked();
            let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
                let alias = parser
                    .require_predicate(is_member_key_name, "export alias")?
                    .loc_take();
                // Not exposed within the module's scope.
                Some(parser.create_node(alias.clone(), Syntax::IdentifierPattern { name: alias }))
            } else {
                None
            };
            parser.require(TokenType::KeywordFrom)?;
            let from = parse_and_normalise_literal_string(parser)?;
            require_semicolon_or_asi(parser)?;
            parser.create_node(
                parser.since_checkpoint(&cp_start),
                Syntax::ExportListStmt {
                    names: ExportNames::All(alias),
                    from: Some(from),
                },
            )
        }
        TokenType::KeywordDefault => {
            parser.consume_peeked();
            match parser.peek()?.typ() {
                // `class` and `function` are treated as statements that are hoisted, not expressions; however, they can be unnamed, which gives them the name `default`.
                TokenType::KeywordClass | TokenType::KeywordFunction => {
                    let declaration = parse_stmt(parser)?;
                    parser.create_node(
                        start.loc() + parser[declaration].loc(),
                        Syntax::ExportDeclStmt {
                            declaration,
                            default: true,
                        },
                    )
                }
                TokenType::KeywordAsync if is_async_function(parser)? => {
                    let declaration = parse_decl_function(parser)?;
                    parser.create_node(
                        start.loc() + parser[declaration].loc(),
                        Syntax::ExportDeclStmt {
                            declaration,
                            default: true,
                        },
                    )
                }
                _ => {
                    let mut asi = Asi::can();
                    let expression = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
                    if !asi.did_end_with_asi {
                        require_semicolon_or_asi(parser)?;
                    };
                    parser.create_node(
                        start.loc() + parser[expression].loc(),
                        Syntax::ExportDefaultExprStmt { expression },
                    )
                }
            }
        }
        TokenType::KeywordVar
        | TokenType::KeywordLet
        | TokenType::KeywordConst
        | TokenType::KeywordFunction
        | TokenType::KeywordAsync
        | TokenType::KeywordClass => {
            let declaration = parse_stmt(parser)?;
            parser.create_node(
                start.loc() + parser[declaration].loc(),
                Syntax::ExportDeclStmt {
                    declaration,
                    default: false,
                },
            )
        }
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("exportable"))),
    })
}

// WARNING: Do not reuse this functions for other statements, as this will output a statement node, not an expression, which can lead to double semicolons that cause invalid code when outputting.
pub fn parse_stmt_expression(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let mut asi = Asi::can();
    let expression = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
    if !asi.did_end_with_asi {
        require_semicolon_or_asi(parser)?;
    };
    Ok(parser.create_node(
        parser[expression].loc().clone(),
        Syntax::ExpressionStmt { expression },
    ))
}

pub fn parse_stmt_for(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordFor)?;
    let is_await = parser.consume_if(TokenType::KeywordAwait)?.is_match();
    parser.require(TokenType::ParenthesisOpen)?;
    enum LhsRaw {
        Declaration(NodeId),
        Expression(NodeId),
        Pattern(NodeId),
        Empty,
    }
    let lhs_raw = match parser.peek()?.typ() {
        TokenType::KeywordVar | TokenType::KeywordLet | TokenType::KeywordConst => {
            LhsRaw::Declaration(parse_decl_var(parser, VarDeclParseMode::Leftmost)?)
        }
        TokenType::Semicolon => LhsRaw::Empty,
        _ => {
            // A pattern could be reinterpreted as an expression (and vice versa), so we can only try parsing both.
            let checkpoint = parser.checkpoint();
            let pattern = match parse_pattern(parser) {
                Ok(node) => match parser.peek()?.typ() {
                    TokenType::KeywordIn | TokenType::KeywordOf => Some(LhsRaw::Pattern(node)),
                    // Mistakenly interpreted as pattern.
                    _ => None,
                },
                Err(_) => None,
            };
            match pattern {
                Some(p) => p,
                None => {
                    parser.restore_checkpoint(checkpoint);
                    LhsRaw::Expression(parse_expr(parser, TokenType::Semicolon)?)
                }
            }
        }
    };
    let header = match parser.peek()?.typ() {
        TokenType::KeywordOf | TokenType::KeywordIn => {
            // for-of or for-in statement.
            let of = parser.next()?.typ() == TokenType::KeywordOf;
            if is_await && !of {
                return Err(start.error(SyntaxErrorType::ExpectedSyntax("for await of")));
            };
            let lhs = match lhs_raw {
                LhsRaw::Empty => return Err(start.error(SyntaxErrorType::ForLoopHeaderHasNoLhs)),
                LhsRaw::Declaration(node) => match parser[node].stx() {
                    Syntax::VarDecl { declarators, .. } if declarators.len() == 1 => {
                        ForInOfStmtHeaderLhs::Declaration(node)
                    }
                    _ => {
                        return Err(start.error(SyntaxErrorType::ForLoopHeaderHasMultipleDeclarators))
                    }
                },
                LhsRaw::Pattern(pat) => ForInOfStmtHeaderLhs::Pattern(pat),
                LhsRaw::Expression(_) => {
                    return Err(start.error(SyntaxErrorType::ForLoopHeaderHasInvalidLhs))
                }
            };
            let rhs = parse_expr(parser, TokenType::ParenthesisClose)?;
            parser.require(TokenType::ParenthesisClose)?;
            ForStmtHeader::InOf {
                of,
                is_await,
                lhs,
                rhs,
            }
        }
        _ => {
            // for statement.
            if is_await {
                return Err(start.error(SyntaxErrorType::ExpectedSyntax("for await of")));
            };
            let init = match lhs_raw {
                LhsRaw::Declaration(decl) => ForThreeInit::Declaration(decl),
                LhsRaw::Expression(expr) => ForThreeInit::Expression(expr),
                LhsRaw::Empty => ForThreeInit::None,
                LhsRaw::Pattern(_) => {
                    return Err(start.error(SyntaxErrorType::ForLoopHeaderHasInvalidLhs))
                }
            };
            // We must check, due to possibility of illegal ASI.
            parser.require(TokenType::Semicolon)?;
            let condition = if parser.consume_if(TokenType::Semicolon)?.is_match() {
                None
            } else {
                let expr = parse_expr(parser, TokenType::Semicolon)?;
                parser.require(TokenType::Semicolon)?;
                Some(expr)
            };
            let post = if parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
                None
            } else {
                let expr = parse_expr(parser, TokenType::ParenthesisClose)?;
                parser.require(TokenType::ParenthesisClose)?;
                Some(expr)
            };
            ForStmtHeader::Three {
                init,
                condition,
                post,
            }
        }
    };
    let body = parse_stmt(parser)?;
    Ok(parser.create_node(
        start.loc() + parser[body].loc(),
        Syntax::ForStmt { header, body },
    ))
}

pub fn parse_stmt_if(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordIf)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let consequent = parse_stmt(parser)?;
    let alternate = if parser.consume_if(TokenType::KeywordElse)?.is_match() {
        Some(parse_stmt(parser)?)
    } else {
        None
    };
    let end = alternate.unwrap_or(consequent);
    Ok(parser.create_node(
        start.loc() + parser[end].loc(),
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        },
    ))
}

pub fn parse_stmt_import_or_expr_import(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let cp = parser.checkpoint();
    parser.require(TokenType::KeywordImport)?;
    if matches!(parser.peek()?.typ(), TokenType::ParenthesisOpen | TokenType::Dot) {
        parser.restore_checkpoint(cp);
        return parse_stmt_expression(parser);
    };

    // `import "module"` only runs the module.
    if parser.peek()?.typ() == TokenType::LiteralString {
        let module = parse_and_normalise_literal_string(parser)?;
        require_semicolon_or_asi(parser)?;
        return Ok(parser.create_node(
            parser.since_checkpoint(&cp),
            Syntax::ImportStmt {
                default: None,
                names: None,
                module,
            },
        ));
    };

    let (default, can_have_names) = if is_valid_pattern_identifier(parser.peek()?.typ()) {
        let alias = parse_pattern_identifier(parser)?;
        (Some(alias), parser.consume_if(TokenType::Comma)?.is_match())
    } else {
        (None, true)
    };
    let names = if !can_have_names {
        None
    } else if parser.consume_if(TokenType::Asterisk)?.is_match() {
        parser.require(TokenType::KeywordAs)?;
        Some(ExportNames::All(Some(parse_pattern_identifier(parser)?)))
    } else {
        Some(ExportNames::Specific(parse_import_or_export_names(parser)?))
    };
    parser.require(TokenType::KeywordFrom)?;
    let module = parse_and_normalise_literal_string(parser)?;
    require_semicolon_or_asi(parser)?;
    Ok(parser.create_node(
        parser.since_checkpoint(&cp),
        Syntax::ImportStmt {
            default,
            module,
            names,
        },
    ))
}

pub fn parse_stmt_return(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordReturn)?;
    let mut loc = start.loc().clone();
    let next = parser.peek()?;
    let value = if next.preceded_by_line_terminator()
        || next.typ() == TokenType::BraceClose
        || next.typ() == TokenType::EOF
    {
        // Automatic Semicolon Insertion.
        None
    } else if parser.consume_if(TokenType::Semicolon)?.is_match() {
        None
    } else {
        let mut asi = Asi::can();
        let value = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
        if !asi.did_end_with_asi {
            require_semicolon_or_asi(parser)?;
        };
        loc.extend(parser[value].loc());
        Some(value)
    };
    Ok(parser.create_node(loc, Syntax::ReturnStmt { value }))
}

pub fn parse_stmt_throw(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordThrow)?;
    if parser.peek()?.preceded_by_line_terminator() {
        // Illegal under Automatic Semicolon Insertion rules.
        return Err(start.error(SyntaxErrorType::LineTerminatorAfterThrow));
    }
    let mut asi = Asi::can();
    let value = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
    if !asi.did_end_with_asi {
        require_semicolon_or_asi(parser)?;
    };
    Ok(parser.create_node(
        start.loc() + parser[value].loc(),
        Syntax::ThrowStmt { value },
    ))
}

pub fn parse_stmt_try(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordTry)?;
    let mut loc = start.loc().clone();
    let wrapped = parse_stmt_block(parser)?;
    let catch = if let Some(catch_loc) = parser.consume_if(TokenType::KeywordCatch)?.match_loc_take()
    {
        let parameter = if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
            let pattern = parse_pattern(parser)?;
            parser.require(TokenType::ParenthesisClose)?;
            Some(pattern)
        } else {
            None
        };
        let body = parse_stmt_block(parser)?;
        loc.extend(parser[body].loc());
        Some(parser.create_node(
            &catch_loc + parser[body].loc(),
            Syntax::CatchBlock { parameter, body },
        ))
    } else {
        None
    };
    let finally = if parser.consume_if(TokenType::KeywordFinally)?.is_match() {
        let body = parse_stmt_block(parser)?;
        loc.extend(parser[body].loc());
        Some(body)
    } else {
        None
    };
    if catch.is_none() && finally.is_none() {
        return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
    }
    Ok(parser.create_node(
        loc,
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        },
    ))
}

pub fn parse_stmt_while(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordWhile)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(parser)?;
    Ok(parser.create_node(
        start.loc() + parser[body].loc(),
        Syntax::WhileStmt { condition, body },
    ))
}

pub fn parse_stmt_with(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordWith)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let object = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(parser)?;
    Ok(parser.create_node(
        start.loc() + parser[body].loc(),
        Syntax::WithStmt { object, body },
    ))
}

pub fn parse_stmt_do_while(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordDo)?;
    let body = parse_stmt(parser)?;
    parser.require(TokenType::KeywordWhile)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(parser, TokenType::ParenthesisClose)?;
    let end = parser.require(TokenType::ParenthesisClose)?;
    parser.consume_if(TokenType::Semicolon)?;
    Ok(parser.create_node(
        start.loc() + end.loc(),
        Syntax::DoWhileStmt { condition, body },
    ))
}

pub fn parse_stmt_switch(parser: &mut Parser) -> SyntaxResult<NodeId> {
    let start = parser.require(TokenType::KeywordSwitch)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    parser.require(TokenType::BraceOpen)?;
    let mut branches = Vec::<NodeId>::new();
    while parser.peek()?.typ() != TokenType::BraceClose {
        let mut loc = parser.peek()?.loc_take();
        let case = if parser.consume_if(TokenType::KeywordCase)?.is_match() {
            Some(parse_expr(parser, TokenType::Colon)?)
        } else {
            parser.require(TokenType::KeywordDefault)?;
            None
        };
        parser.require(TokenType::Colon)?;
        let mut body: Vec<NodeId> = Vec::new();
        loop {
            match parser.peek()?.typ() {
                TokenType::KeywordCase | TokenType::KeywordDefault | TokenType::BraceClose => break,
                _ => {
                    let stmt = parse_stmt(parser)?;
                    body.push(stmt);
                    loc.extend(parser[stmt].loc());
                }
            }
        }
        branches.push(parser.create_node(loc, Syntax::SwitchBranch { case, body }));
    }
    let end = parser.require(TokenType::BraceClose)?;
    Ok(parser.create_node(
        start.loc() + end.loc(),
        Syntax::SwitchStmt { test, branches },
    ))
}
