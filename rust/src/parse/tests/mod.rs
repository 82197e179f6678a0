use crate::ast::{
    ClassOrObjectMemberKey, ClassOrObjectMemberValue, ForStmtHeader, LiteralTemplatePart, NodeId,
    NodeMap, ObjectMemberType, Syntax, VarDeclMode,
};
use crate::error::SyntaxErrorType;
use crate::operator::OperatorName;
use crate::parse;

fn top_level(src: &str) -> (NodeMap, Vec<NodeId>) {
    let program = parse(src.as_bytes().to_vec()).unwrap();
    let body = match program.node_map[program.root].stx() {
        Syntax::TopLevel { body } => body.clone(),
        _ => panic!("root is not a top level node"),
    };
    (program.node_map, body)
}

// The expression of a single expression statement.
fn expression(src: &str) -> (NodeMap, NodeId) {
    let (map, body) = top_level(src);
    assert_eq!(body.len(), 1, "{}", src);
    let expr = match map[body[0]].stx() {
        Syntax::ExpressionStmt { expression } => *expression,
        _ => panic!("not an expression statement: {}", src),
    };
    (map, expr)
}

fn error(src: &str) -> SyntaxErrorType {
    match parse(src.as_bytes().to_vec()) {
        Ok(_) => panic!("parsed successfully: {}", src),
        Err(e) => e.typ(),
    }
}

#[test]
fn test_parse_precedence() {
    let (map, e) = expression("a + b * c");
    match map[e].stx() {
        Syntax::BinaryExpr {
            operator: OperatorName::Addition,
            left,
            right,
        } => {
            assert!(matches!(map[*left].stx(), Syntax::IdentifierExpr { .. }));
            assert!(matches!(map[*right].stx(), Syntax::BinaryExpr {
                operator: OperatorName::Multiplication,
                ..
            }));
        }
        _ => panic!("expected addition"),
    };

    let (map, e) = expression("a ? b : c ? d : e");
    match map[e].stx() {
        Syntax::ConditionalExpr { alternate, .. } => {
            assert!(matches!(map[*alternate].stx(), Syntax::ConditionalExpr { .. }));
        }
        _ => panic!("expected conditional"),
    };
}

#[test]
fn test_parse_assignment_targets() {
    let (map, e) = expression("a = b");
    match map[e].stx() {
        Syntax::BinaryExpr {
            operator: OperatorName::Assignment,
            left,
            ..
        } => assert!(matches!(map[*left].stx(), Syntax::IdentifierPattern { name } if *name == *"a")),
        _ => panic!("expected assignment"),
    };

    let (map, e) = expression("a.b += c");
    match map[e].stx() {
        Syntax::BinaryExpr { left, .. } => {
            assert!(matches!(map[*left].stx(), Syntax::MemberExpr { .. }))
        }
        _ => panic!("expected assignment"),
    };

    assert_eq!(error("a + b = c"), SyntaxErrorType::InvalidAssigmentTarget);
}

#[test]
fn test_parse_update_keeps_identifier_expression() {
    let (map, e) = expression("a++");
    match map[e].stx() {
        Syntax::UnaryPostfixExpr {
            operator: OperatorName::PostfixIncrement,
            argument,
        } => assert!(matches!(map[*argument].stx(), Syntax::IdentifierExpr { .. })),
        _ => panic!("expected postfix increment"),
    };
}

#[test]
fn test_parse_shorthand_property() {
    let (map, e) = expression("x = { a, 'b-c': 1 }");
    let object = match map[e].stx() {
        Syntax::BinaryExpr { right, .. } => *right,
        _ => panic!("expected assignment"),
    };
    let members = match map[object].stx() {
        Syntax::LiteralObjectExpr { members } => members.clone(),
        _ => panic!("expected object literal"),
    };
    assert_eq!(members.len(), 2);
    match map[members[0]].stx() {
        Syntax::ObjectMember {
            typ:
                ObjectMemberType::Valued {
                    key: ClassOrObjectMemberKey::Direct(key),
                    value:
                        ClassOrObjectMemberValue::Property {
                            initializer: Some(init),
                        },
                },
        } => {
            assert_eq!(*key, *"a");
            assert!(matches!(map[*init].stx(), Syntax::IdentifierExpr { name } if *name == *"a"));
        }
        _ => panic!("expected shorthand property"),
    };
    assert!(matches!(map[members[1]].stx(), Syntax::ObjectMember {
        typ: ObjectMemberType::Valued {
            key: ClassOrObjectMemberKey::String(k),
            ..
        },
    } if k == "b-c"));
}

#[test]
fn test_parse_var_declarations() {
    let (map, body) = top_level("let a = 1, b; const [c] = d; var { e } = f;");
    assert_eq!(body.len(), 3);
    let modes: Vec<(VarDeclMode, usize)> = body
        .iter()
        .map(|s| match map[*s].stx() {
            Syntax::VarStmt { declaration } => match map[*declaration].stx() {
                Syntax::VarDecl { mode, declarators } => (*mode, declarators.len()),
                _ => panic!("expected declaration"),
            },
            _ => panic!("expected variable statement"),
        })
        .collect();
    assert_eq!(modes, vec![
        (VarDeclMode::Let, 2),
        (VarDeclMode::Const, 1),
        (VarDeclMode::Var, 1),
    ]);
}

#[test]
fn test_parse_functions() {
    let (map, e) = expression("x = async (a, b = 1, ...c) => a");
    let arrow = match map[e].stx() {
        Syntax::BinaryExpr { right, .. } => *right,
        _ => panic!("expected assignment"),
    };
    match map[arrow].stx() {
        Syntax::ArrowFunctionExpr {
            is_async: true,
            signature,
            body,
        } => {
            assert!(matches!(map[*body].stx(), Syntax::IdentifierExpr { .. }));
            match map[*signature].stx() {
                Syntax::FunctionSignature { parameters } => {
                    assert_eq!(parameters.len(), 3);
                    assert!(matches!(map[parameters[2]].stx(), Syntax::ParamDecl { rest: true, .. }));
                }
                _ => panic!("expected signature"),
            };
        }
        _ => panic!("expected async arrow function"),
    };

    let (map, body) = top_level("function* gen() { yield 1 } class A { static m() {} }");
    assert!(matches!(map[body[0]].stx(), Syntax::FunctionDecl { generator: true, .. }));
    match map[body[1]].stx() {
        Syntax::ClassDecl { members, .. } => {
            assert_eq!(members.len(), 1);
            assert!(members[0].statik);
        }
        _ => panic!("expected class"),
    };
}

#[test]
fn test_parse_accessors() {
    let (map, body) = top_level("class a { get g() { return 1 } set g(v) {} get() {} }");
    let members = match map[body[0]].stx() {
        Syntax::ClassDecl { members, .. } => members.clone(),
        _ => panic!("expected class"),
    };
    assert_eq!(members.len(), 3);
    assert!(matches!(members[0].value, ClassOrObjectMemberValue::Getter { .. }));
    assert!(matches!(members[1].value, ClassOrObjectMemberValue::Setter { .. }));
    assert!(matches!(members[2].value, ClassOrObjectMemberValue::Method { .. }));

    let (map, e) = expression("x = { get g() { return 1 }, set g(v) {} }");
    let object = match map[e].stx() {
        Syntax::BinaryExpr { right, .. } => *right,
        _ => panic!("expected assignment"),
    };
    match map[object].stx() {
        Syntax::LiteralObjectExpr { members } => {
            let values: Vec<_> = members
                .iter()
                .map(|m| match map[*m].stx() {
                    Syntax::ObjectMember {
                        typ: ObjectMemberType::Valued { value, .. },
                    } => value.clone(),
                    _ => panic!("expected valued member"),
                })
                .collect();
            assert!(matches!(values[0], ClassOrObjectMemberValue::Getter { .. }));
            assert!(matches!(values[1], ClassOrObjectMemberValue::Setter { .. }));
        }
        _ => panic!("expected object"),
    };
}

#[test]
fn test_parse_newer_syntax() {
    let (map, body) = top_level("class A { static {} static = 1 }");
    match map[body[0]].stx() {
        Syntax::ClassDecl { members, .. } => {
            assert!(matches!(members[0].value, ClassOrObjectMemberValue::StaticBlock { .. }));
            assert!(!members[1].statik);
        }
        _ => panic!("expected class"),
    };

    let (map, body) = top_level("async function f() { for await (const x of y); }");
    let statements = match map[body[0]].stx() {
        Syntax::FunctionDecl { body, .. } => match map[*body].stx() {
            Syntax::BlockStmt { body } => body.clone(),
            _ => panic!("expected block"),
        },
        _ => panic!("expected function"),
    };
    assert!(matches!(map[statements[0]].stx(), Syntax::ForStmt {
        header: ForStmtHeader::InOf { of: true, is_await: true, .. },
        ..
    }));

    let (map, e) = expression("new.target");
    assert!(matches!(map[e].stx(), Syntax::NewTargetExpr {}));
    let (map, e) = expression("import.meta.url");
    assert!(matches!(map[e].stx(), Syntax::MemberExpr { left, .. }
        if matches!(map[*left].stx(), Syntax::ImportMetaExpr {})));
    assert!(parse(b"import.metal".to_vec()).is_err());
    assert!(parse(b"for await (x in y);".to_vec()).is_err());
}

#[test]
fn test_parse_await_outside_async_function() {
    // A call of a function named `await`.
    let (map, body) = top_level("function g() { await(f()) }");
    let statements = match map[body[0]].stx() {
        Syntax::FunctionDecl { body, .. } => match map[*body].stx() {
            Syntax::BlockStmt { body } => body.clone(),
            _ => panic!("expected block"),
        },
        _ => panic!("expected function"),
    };
    assert!(matches!(map[statements[0]].stx(), Syntax::ExpressionStmt { expression }
        if matches!(map[*expression].stx(), Syntax::CallExpr { .. })));

    let (map, e) = expression("async () => await f()");
    assert!(matches!(map[e].stx(), Syntax::ArrowFunctionExpr { body, .. }
        if matches!(map[*body].stx(), Syntax::UnaryExpr { operator: OperatorName::Await, .. })));
}

#[test]
fn test_parse_parameters() {
    let (map, body) = top_level("function f(a, [b] = c, ...{ d }) {}");
    let signature = match map[body[0]].stx() {
        Syntax::FunctionDecl { signature, .. } => *signature,
        _ => panic!("expected function"),
    };
    let parameters = match map[signature].stx() {
        Syntax::FunctionSignature { parameters } => parameters.clone(),
        _ => panic!("expected signature"),
    };
    assert_eq!(parameters.len(), 3);
    assert!(matches!(map[parameters[1]].stx(), Syntax::ParamDecl { rest: false, default_value: Some(_), .. }));
    assert!(matches!(map[parameters[2]].stx(), Syntax::ParamDecl { rest: true, default_value: None, .. }));

    let (_, body) = top_level("function f(a, b,) {}");
    assert_eq!(body.len(), 1);
    assert_eq!(error("function f(...a, b) {}"), SyntaxErrorType::RestParameterNotLast);
    assert_eq!(error("function f(...a,) {}"), SyntaxErrorType::RestParameterNotLast);
}

#[test]
fn test_parse_literals() {
    let (map, e) = expression("'a\\nb'");
    assert!(matches!(map[e].stx(), Syntax::LiteralStringExpr { value } if value == "a\nb"));
    let (map, e) = expression("0x10");
    assert!(matches!(map[e].stx(), Syntax::LiteralNumberExpr { value } if value.0 == 16.0));
    let (map, e) = expression("`a${b}c`");
    match map[e].stx() {
        Syntax::LiteralTemplateExpr { parts } => {
            assert_eq!(parts.len(), 3);
            assert!(matches!(parts[1], LiteralTemplatePart::Substitution(_)));
        }
        _ => panic!("expected template"),
    };
    let (map, e) = expression("x = /a+/g");
    assert!(matches!(map[e].stx(), Syntax::BinaryExpr { right, .. }
        if matches!(map[*right].stx(), Syntax::LiteralRegexExpr {})));
}

#[test]
fn test_parse_automatic_semicolons() {
    let (_, body) = top_level("a\nb\nc");
    assert_eq!(body.len(), 3);
    let (map, body) = top_level("function f() { return\na }");
    let statements = match map[body[0]].stx() {
        Syntax::FunctionDecl { body, .. } => match map[*body].stx() {
            Syntax::BlockStmt { body } => body.clone(),
            _ => panic!("expected block"),
        },
        _ => panic!("expected function"),
    };
    assert_eq!(statements.len(), 2);
    assert!(matches!(map[statements[0]].stx(), Syntax::ReturnStmt { value: None }));
}

#[test]
fn test_parse_errors() {
    assert_eq!(error("try {}"), SyntaxErrorType::TryStatementHasNoCatchOrFinally);
    assert_eq!(error("throw\na"), SyntaxErrorType::LineTerminatorAfterThrow);
    assert!(parse(b"var = 1".to_vec()).is_err());
    assert!(parse(b"a +".to_vec()).is_err());
    assert!(parse(b"if (a".to_vec()).is_err());
}
