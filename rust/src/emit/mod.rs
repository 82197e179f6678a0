use crate::ast::{
    ArrayElement, ClassMember, ClassOrObjectMemberKey, ClassOrObjectMemberValue, ExportNames,
    ForInOfStmtHeaderLhs, ForStmtHeader, ForThreeInit, LiteralTemplatePart, NodeId, NodeMap,
    ObjectMemberType, Syntax, VarDeclMode, VariableDeclarator,
};
use crate::char::{is_identifier_byte, is_identifier_name};
use crate::num::JsNumber;
use crate::operator::{Associativity, OperatorName};

pub use string::emit_string;

mod string;
#[cfg(test)]
mod tests;

// Literals, identifiers, and bracketed forms never need parentheses.
const PRIMARY_PRECEDENCE: u8 = 19;

fn member_precedence() -> u8 {
    OperatorName::MemberAccess.precedence()
}

fn assignment_precedence() -> u8 {
    OperatorName::Assignment.precedence()
}

// Writes a token, separating it from the previous one when the two would otherwise lex as one
// token (`a in`, `a+ +b`, `a/ /b/`) or start a comment (`a< !--b`).
fn write(out: &mut Vec<u8>, code: &[u8]) {
    if let (Some(&prev), Some(&next)) = (out.last(), code.first()) {
        let glue = (is_identifier_byte(prev) && is_identifier_byte(next))
            || (prev == b'+' && next == b'+')
            || (prev == b'-' && next == b'-')
            || (prev == b'/' && (next == b'/' || next == b'*'))
            || (prev == b'<' && next == b'!');
        if glue {
            out.push(b' ');
        };
    };
    out.extend_from_slice(code);
}

fn expr_precedence(map: &NodeMap, n: NodeId) -> u8 {
    match map[n].stx() {
        Syntax::BinaryExpr { operator, .. }
        | Syntax::UnaryExpr { operator, .. }
        | Syntax::UnaryPostfixExpr { operator, .. } => operator.precedence(),
        Syntax::ConditionalExpr { .. } => OperatorName::Conditional.precedence(),
        Syntax::ArrowFunctionExpr { .. } => assignment_precedence(),
        Syntax::CallExpr { .. }
        | Syntax::ComputedMemberExpr { .. }
        | Syntax::ImportExpr { .. }
        | Syntax::MemberExpr { .. }
        | Syntax::TaggedTemplateExpr { .. } => member_precedence(),
        // Emitted as `!0` and `!1`.
        Syntax::LiteralBooleanExpr { .. } => OperatorName::LogicalNot.precedence(),
        Syntax::LiteralNumberExpr { value } if value.0 < 0.0 => {
            OperatorName::UnaryNegation.precedence()
        }
        _ => PRIMARY_PRECEDENCE,
    }
}

// `??` cannot be mixed with `&&` or `||` without parentheses.
fn mixes_nullish_with_logical(parent: OperatorName, child: OperatorName) -> bool {
    let logical = |o: OperatorName| matches!(o, OperatorName::LogicalAnd | OperatorName::LogicalOr);
    (parent == OperatorName::NullishCoalescing && logical(child))
        || (child == OperatorName::NullishCoalescing && logical(parent))
}

fn binary_operand_precedence(
    map: &NodeMap,
    operator: OperatorName,
    operand: NodeId,
    is_left: bool,
) -> u8 {
    let prec = operator.precedence();
    if let Syntax::BinaryExpr { operator: child, .. } = map[operand].stx() {
        if mixes_nullish_with_logical(operator, *child) {
            return PRIMARY_PRECEDENCE;
        };
    };
    match (operator.associativity(), is_left) {
        // `-a**b` is a syntax error, so unary operands of `**` are always wrapped.
        (_, true) if operator == OperatorName::Exponentiation => {
            OperatorName::PostfixIncrement.precedence()
        }
        (Associativity::Left, true) | (Associativity::Right, false) => prec,
        (Associativity::Left, false) | (Associativity::Right, true) => prec + 1,
    }
}

fn is_void_zero(map: &NodeMap, n: NodeId) -> bool {
    match map[n].stx() {
        Syntax::UnaryExpr {
            operator: OperatorName::Void,
            argument,
        } => matches!(map[*argument].stx(), Syntax::LiteralNumberExpr { value } if value.0 == 0.0),
        _ => false,
    }
}

// A call anywhere along the callee chain of `new` would take the constructor's arguments.
fn callee_contains_call(map: &NodeMap, n: NodeId) -> bool {
    match map[n].stx() {
        Syntax::CallExpr { .. } | Syntax::ImportExpr { .. } => true,
        Syntax::MemberExpr {
            optional_chaining,
            left,
            ..
        } => *optional_chaining || callee_contains_call(map, *left),
        Syntax::ComputedMemberExpr {
            optional_chaining,
            object,
            ..
        } => *optional_chaining || callee_contains_call(map, *object),
        Syntax::TaggedTemplateExpr { function, .. } => callee_contains_call(map, *function),
        _ => false,
    }
}

// Whether an unbracketed `in` operator appears, which would end a `for` initializer early.
fn contains_in_operator(map: &NodeMap, n: NodeId) -> bool {
    match map[n].stx() {
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => {
            *operator == OperatorName::In
                || contains_in_operator(map, *left)
                || contains_in_operator(map, *right)
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => {
            contains_in_operator(map, *test)
                || contains_in_operator(map, *consequent)
                || contains_in_operator(map, *alternate)
        }
        Syntax::UnaryExpr { argument, .. } | Syntax::UnaryPostfixExpr { argument, .. } => {
            contains_in_operator(map, *argument)
        }
        Syntax::CallExpr { callee, .. } => contains_in_operator(map, *callee),
        Syntax::MemberExpr { left, .. } => contains_in_operator(map, *left),
        Syntax::ComputedMemberExpr { object, .. } => contains_in_operator(map, *object),
        Syntax::ArrowFunctionExpr { body, .. } => contains_in_operator(map, *body),
        _ => false,
    }
}

fn starts_with_word(code: &[u8], word: &[u8]) -> bool {
    code.starts_with(word)
        && code
            .get(word.len())
            .map_or(true, |c| !is_identifier_byte(*c))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LeadingPosition {
    ArrowBody,
    ExportDefault,
    Statement,
}

// Wraps the code emitted since `start` in parentheses if it would otherwise be read as a
// declaration or block.
fn parenthesise_ambiguous_start(out: &mut Vec<u8>, start: usize, position: LeadingPosition) {
    let start = if out.get(start) == Some(&b' ') {
        start + 1
    } else {
        start
    };
    let code = &out[start..];
    let declaration_like = starts_with_word(code, b"function")
        || starts_with_word(code, b"class")
        || starts_with_word(code, b"async function");
    let ambiguous = match position {
        LeadingPosition::ArrowBody => code.starts_with(b"{"),
        LeadingPosition::ExportDefault => declaration_like,
        LeadingPosition::Statement => {
            declaration_like || code.starts_with(b"{") || code.starts_with(b"let[")
        }
    };
    if ambiguous {
        out.insert(start, b'(');
        out.push(b')');
    };
}

fn emit_member_key(out: &mut Vec<u8>, map: &NodeMap, key: &ClassOrObjectMemberKey) {
    match key {
        ClassOrObjectMemberKey::Direct(name) => write(out, name.as_slice()),
        ClassOrObjectMemberKey::String(value) => {
            if is_identifier_name(value.as_bytes()) || JsNumber::is_canonical_index(value.as_bytes())
            {
                write(out, value.as_bytes());
            } else {
                emit_string(out, value, false);
            };
        }
        ClassOrObjectMemberKey::Number(value) => write(out, value.shortest_literal().as_bytes()),
        ClassOrObjectMemberKey::Computed(expr) => {
            write(out, b"[");
            emit_js_under_operator(out, map, *expr, assignment_precedence());
            write(out, b"]");
        }
    };
}

fn emit_function_tail(out: &mut Vec<u8>, map: &NodeMap, signature: NodeId, body: NodeId) {
    write(out, b"(");
    emit_js(out, map, signature);
    write(out, b")");
    emit_js(out, map, body);
}

// Returns whether the member was a property, which needs a delimiter before the next class member.
fn emit_class_or_object_member(
    out: &mut Vec<u8>,
    map: &NodeMap,
    key: &ClassOrObjectMemberKey,
    value: &ClassOrObjectMemberValue,
    value_delimiter: &[u8],
) -> bool {
    let mut is_property = false;
    match value {
        ClassOrObjectMemberValue::Getter { body } => {
            write(out, b"get");
            emit_member_key(out, map, key);
            write(out, b"()");
            emit_js(out, map, *body);
        }
        ClassOrObjectMemberValue::Method {
            is_async,
            generator,
            signature,
            body,
        } => {
            if *is_async {
                write(out, b"async");
            }
            if *generator {
                write(out, b"*");
            }
            emit_member_key(out, map, key);
            emit_function_tail(out, map, *signature, *body);
        }
        ClassOrObjectMemberValue::Property { initializer } => {
            let shorthand = match (key, initializer) {
                (ClassOrObjectMemberKey::Direct(name), Some(init)) if value_delimiter == b":" => {
                    matches!(map[*init].stx(), Syntax::IdentifierExpr { name: ident } if ident == name)
                }
                _ => false,
            };
            emit_member_key(out, map, key);
            if let Some(v) = initializer.filter(|_| !shorthand) {
                write(out, value_delimiter);
                emit_js_under_operator(out, map, v, assignment_precedence());
            };
            is_property = true;
        }
        ClassOrObjectMemberValue::Setter { body, parameter } => {
            write(out, b"set");
            emit_member_key(out, map, key);
            write(out, b"(");
            emit_js(out, map, *parameter);
            write(out, b")");
            emit_js(out, map, *body);
        }
        ClassOrObjectMemberValue::StaticBlock { body } => {
            emit_js(out, map, *body);
        }
    };
    is_property
}

fn emit_class(
    out: &mut Vec<u8>,
    map: &NodeMap,
    name: &Option<NodeId>,
    extends: &Option<NodeId>,
    members: &[ClassMember],
) {
    write(out, b"class");
    if let Some(n) = name {
        emit_js(out, map, *n);
    }
    if let Some(s) = extends {
        write(out, b"extends");
        emit_js_under_operator(out, map, *s, member_precedence());
    }
    write(out, b"{");
    let mut last_member_was_property = false;
    for (i, m) in members.iter().enumerate() {
        if i > 0 && last_member_was_property {
            write(out, b";");
        }
        if m.statik {
            write(out, b"static");
        }
        last_member_was_property = emit_class_or_object_member(out, map, &m.key, &m.value, b"=");
    }
    write(out, b"}");
}

fn emit_function(
    out: &mut Vec<u8>,
    map: &NodeMap,
    is_async: bool,
    generator: bool,
    name: &Option<NodeId>,
    signature: NodeId,
    body: NodeId,
) {
    if is_async {
        write(out, b"async");
    }
    write(out, b"function");
    if generator {
        write(out, b"*");
    }
    if let Some(name) = name {
        emit_js(out, map, *name);
    }
    emit_function_tail(out, map, signature, body);
}

fn emit_export_names(out: &mut Vec<u8>, map: &NodeMap, names: &ExportNames) {
    match names {
        ExportNames::All(alias) => {
            write(out, b"*");
            if let Some(alias) = alias {
                write(out, b"as");
                emit_js(out, map, *alias);
            };
        }
        ExportNames::Specific(names) => {
            write(out, b"{");
            for (i, e) in names.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                }
                write(out, e.target.as_slice());
                if map[e.alias].stx().identifier_name() != Some(&e.target) {
                    write(out, b"as");
                    emit_js(out, map, e.alias);
                };
            }
            write(out, b"}");
        }
    };
}

fn emit_template_parts(out: &mut Vec<u8>, map: &NodeMap, parts: &[LiteralTemplatePart]) {
    write(out, b"`");
    for p in parts {
        match p {
            LiteralTemplatePart::Substitution(sub) => {
                out.extend_from_slice(b"${");
                emit_js(out, map, *sub);
                out.extend_from_slice(b"}");
            }
            LiteralTemplatePart::String(raw) => {
                // Raw text must not pass through token separation.
                out.extend_from_slice(raw.as_slice());
            }
        }
    }
    out.extend_from_slice(b"`");
}

fn emit_call_args(out: &mut Vec<u8>, map: &NodeMap, arguments: &[NodeId]) {
    write(out, b"(");
    for (i, a) in arguments.iter().enumerate() {
        if i > 0 {
            write(out, b",");
        }
        emit_js(out, map, *a);
    }
    write(out, b")");
}

fn emit_var_decl(
    out: &mut Vec<u8>,
    map: &NodeMap,
    mode: VarDeclMode,
    declarators: &[VariableDeclarator],
    in_for_init: bool,
) {
    let keyword: &[u8] = match mode {
        VarDeclMode::Const => b"const",
        VarDeclMode::Let => b"let",
        VarDeclMode::Var => b"var",
    };
    write(out, keyword);
    for (i, decl) in declarators.iter().enumerate() {
        if i > 0 {
            write(out, b",");
        }
        emit_js(out, map, decl.pattern);
        if let Some(expr) = decl.initializer {
            write(out, b"=");
            if in_for_init && contains_in_operator(map, expr) {
                write(out, b"(");
                emit_js(out, map, expr);
                write(out, b")");
            } else {
                emit_js_under_operator(out, map, expr, assignment_precedence());
            };
        };
    }
}

fn emit_arrow_function(
    out: &mut Vec<u8>,
    map: &NodeMap,
    is_async: bool,
    signature: NodeId,
    body: NodeId,
) {
    if is_async {
        write(out, b"async");
    }
    let single_identifier_param = match map[signature].stx() {
        Syntax::FunctionSignature { parameters } if parameters.len() == 1 => {
            matches!(
                map[parameters[0]].stx(),
                Syntax::ParamDecl { rest: false, default_value: None, pattern }
                    if matches!(map[*pattern].stx(), Syntax::IdentifierPattern { .. })
            )
        }
        _ => false,
    };
    if single_identifier_param {
        emit_js(out, map, signature);
    } else {
        write(out, b"(");
        emit_js(out, map, signature);
        write(out, b")");
    };
    write(out, b"=>");
    if let Syntax::BlockStmt { .. } = map[body].stx() {
        emit_js(out, map, body);
    } else {
        let start = out.len();
        emit_js_under_operator(out, map, body, assignment_precedence());
        parenthesise_ambiguous_start(out, start, LeadingPosition::ArrowBody);
    };
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LeafNodeType {
    EmptyStmt,
    Other,
    Block,
}

fn get_leaf_node_type(map: &NodeMap, n: NodeId) -> LeafNodeType {
    match map[n].stx() {
        Syntax::WhileStmt { body, .. }
        | Syntax::ForStmt { body, .. }
        | Syntax::WithStmt { body, .. } => get_leaf_node_type(map, *body),
        Syntax::LabelStmt { statement, .. } => get_leaf_node_type(map, *statement),
        Syntax::IfStmt {
            consequent,
            alternate,
            ..
        } => match alternate {
            Some(n) => get_leaf_node_type(map, *n),
            None => get_leaf_node_type(map, *consequent),
        },
        Syntax::ExportDeclStmt { declaration, .. } => get_leaf_node_type(map, *declaration),
        Syntax::BlockStmt { .. }
        | Syntax::ClassDecl { .. }
        | Syntax::FunctionDecl { .. }
        | Syntax::SwitchStmt { .. }
        | Syntax::TryStmt { .. } => LeafNodeType::Block,
        Syntax::EmptyStmt {} => LeafNodeType::EmptyStmt,
        _ => LeafNodeType::Other,
    }
}

// Whether an `else` placed after this statement would attach to an inner `if`.
fn ends_with_open_if(map: &NodeMap, n: NodeId) -> bool {
    match map[n].stx() {
        Syntax::IfStmt {
            alternate: None, ..
        } => true,
        Syntax::IfStmt {
            alternate: Some(alternate),
            ..
        } => ends_with_open_if(map, *alternate),
        Syntax::WhileStmt { body, .. }
        | Syntax::ForStmt { body, .. }
        | Syntax::WithStmt { body, .. } => ends_with_open_if(map, *body),
        Syntax::LabelStmt { statement, .. } => ends_with_open_if(map, *statement),
        _ => false,
    }
}

// Omits semicolons where possible, and terminates any statement whose leaf is an empty statement
// e.g. `if (x) for (;;);`. Returns whether a semicolon is needed before anything that follows.
fn emit_statements(out: &mut Vec<u8>, map: &NodeMap, statements: &[NodeId]) -> bool {
    let mut needs_separator = false;
    for &n in statements {
        if let Syntax::EmptyStmt {} = map[n].stx() {
            continue;
        };
        if needs_separator {
            write(out, b";");
        };
        emit_js(out, map, n);
        needs_separator = match get_leaf_node_type(map, n) {
            LeafNodeType::EmptyStmt => {
                write(out, b";");
                false
            }
            LeafNodeType::Block => false,
            LeafNodeType::Other => true,
        };
    }
    needs_separator
}

fn emit_switch_branch(
    out: &mut Vec<u8>,
    map: &NodeMap,
    case: &Option<NodeId>,
    body: &[NodeId],
) -> bool {
    match case {
        Some(case) => {
            write(out, b"case");
            emit_js(out, map, *case);
            write(out, b":");
        }
        None => {
            write(out, b"default:");
        }
    };
    emit_statements(out, map, body)
}

// Emits a statement body, bracing it if required, then the `;` needed before a following keyword
// such as `else` or `while`.
fn emit_body_before_keyword(out: &mut Vec<u8>, map: &NodeMap, body: NodeId, brace: bool) {
    if brace {
        write(out, b"{");
        emit_js(out, map, body);
        write(out, b"}");
    } else {
        emit_js(out, map, body);
        if get_leaf_node_type(map, body) != LeafNodeType::Block {
            write(out, b";");
        };
    };
}

// Output is always built in memory, as the tree is fully materialised before emitting anyway.
pub fn emit_js(out: &mut Vec<u8>, map: &NodeMap, n: NodeId) {
    emit_js_under_operator(out, map, n, 0);
}

/// Emits `n`, wrapped in parentheses if its precedence is lower than `min_prec`. Statements are
/// unaffected by `min_prec`.
pub fn emit_js_under_operator(out: &mut Vec<u8>, map: &NodeMap, n: NodeId, min_prec: u8) {
    if expr_precedence(map, n) < min_prec {
        write(out, b"(");
        emit_node(out, map, n, 0);
        write(out, b")");
    } else {
        emit_node(out, map, n, min_prec);
    };
}

fn emit_node(out: &mut Vec<u8>, map: &NodeMap, n: NodeId, min_prec: u8) {
    match map[n].stx() {
        Syntax::EmptyStmt {} => {}
        Syntax::LiteralBigIntExpr { value } => {
            write(out, value.as_bytes());
        }
        Syntax::LiteralRegexExpr {} => {
            write(out, map[n].loc().as_slice());
        }
        Syntax::LiteralBooleanExpr { value } => {
            write(out, if *value { b"!0" } else { b"!1" });
        }
        Syntax::LiteralNumberExpr { value } => {
            write(out, value.shortest_literal().as_bytes());
        }
        Syntax::LiteralStringExpr { value } => {
            emit_string(out, value, true);
        }
        Syntax::LiteralTemplateExpr { parts } => {
            emit_template_parts(out, map, parts);
        }
        Syntax::LiteralNull {} => {
            write(out, b"null");
        }
        Syntax::VarDecl { mode, declarators } => {
            emit_var_decl(out, map, *mode, declarators, false);
        }
        Syntax::VarStmt { declaration } => {
            emit_js(out, map, *declaration);
        }
        Syntax::IdentifierPattern { name }
        | Syntax::IdentifierExpr { name }
        | Syntax::ClassOrFunctionName { name } => {
            write(out, name.as_slice());
        }
        Syntax::ArrayPattern { elements, rest } => {
            write(out, b"[");
            for (i, e) in elements.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                }
                if let Some(e) = e {
                    emit_js(out, map, e.target);
                    if let Some(v) = e.default_value {
                        write(out, b"=");
                        emit_js_under_operator(out, map, v, assignment_precedence());
                    }
                };
            }
            if let Some(r) = rest {
                if !elements.is_empty() {
                    write(out, b",");
                }
                write(out, b"...");
                emit_js(out, map, *r);
            } else if let Some(None) = elements.last() {
                // A trailing hole needs its own comma.
                write(out, b",");
            };
            write(out, b"]");
        }
        Syntax::ObjectPattern { properties, rest } => {
            write(out, b"{");
            for (i, e) in properties.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                }
                emit_js(out, map, *e);
            }
            if let Some(r) = rest {
                if !properties.is_empty() {
                    write(out, b",");
                }
                write(out, b"...");
                emit_js(out, map, *r);
            };
            write(out, b"}");
        }
        Syntax::ObjectPatternProperty {
            key,
            target,
            default_value,
        } => {
            let shorthand = match key {
                ClassOrObjectMemberKey::Direct(name) => {
                    matches!(map[*target].stx(), Syntax::IdentifierPattern { name: t } if t == name)
                }
                _ => false,
            };
            emit_member_key(out, map, key);
            if !shorthand {
                write(out, b":");
                emit_js(out, map, *target);
            };
            if let Some(v) = default_value {
                write(out, b"=");
                emit_js_under_operator(out, map, *v, assignment_precedence());
            };
        }
        Syntax::FunctionSignature { parameters } => {
            for (i, p) in parameters.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                };
                emit_js(out, map, *p);
            }
        }
        Syntax::ParamDecl {
            rest,
            pattern,
            default_value,
        } => {
            if *rest {
                write(out, b"...");
            };
            emit_js(out, map, *pattern);
            if let Some(v) = default_value {
                write(out, b"=");
                emit_js_under_operator(out, map, *v, assignment_precedence());
            }
        }
        Syntax::ClassDecl {
            name,
            extends,
            members,
        }
        | Syntax::ClassExpr {
            name,
            extends,
            members,
        } => {
            emit_class(out, map, name, extends, members);
        }
        Syntax::FunctionDecl {
            is_async,
            generator,
            name,
            signature,
            body,
        }
        | Syntax::FunctionExpr {
            is_async,
            generator,
            name,
            signature,
            body,
        } => {
            emit_function(out, map, *is_async, *generator, name, *signature, *body);
        }
        Syntax::ArrowFunctionExpr {
            is_async,
            signature,
            body,
        } => {
            emit_arrow_function(out, map, *is_async, *signature, *body);
        }
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => {
            emit_js_under_operator(
                out,
                map,
                *left,
                binary_operand_precedence(map, *operator, *left, true),
            );
            write(out, operator.text().as_bytes());
            emit_js_under_operator(
                out,
                map,
                *right,
                binary_operand_precedence(map, *operator, *right, false),
            );
        }
        Syntax::CallExpr {
            optional_chaining,
            callee,
            arguments,
        } => {
            emit_js_under_operator(out, map, *callee, member_precedence());
            if *optional_chaining {
                write(out, b"?.");
            }
            emit_call_args(out, map, arguments);
        }
        Syntax::CallArg { spread, value } => {
            if *spread {
                write(out, b"...");
            }
            emit_js_under_operator(out, map, *value, assignment_precedence());
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => {
            emit_js_under_operator(
                out,
                map,
                *test,
                OperatorName::Conditional.precedence() + 1,
            );
            write(out, b"?");
            emit_js_under_operator(out, map, *consequent, assignment_precedence());
            write(out, b":");
            emit_js_under_operator(out, map, *alternate, assignment_precedence());
        }
        Syntax::ImportExpr { module } => {
            write(out, b"import(");
            emit_js_under_operator(out, map, *module, assignment_precedence());
            write(out, b")");
        }
        Syntax::LiteralArrayExpr { elements } => {
            write(out, b"[");
            for (i, e) in elements.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                };
                match e {
                    ArrayElement::Single(expr) => {
                        emit_js_under_operator(out, map, *expr, assignment_precedence());
                    }
                    ArrayElement::Rest(expr) => {
                        write(out, b"...");
                        emit_js_under_operator(out, map, *expr, assignment_precedence());
                    }
                    ArrayElement::Empty => {}
                };
            }
            if let Some(ArrayElement::Empty) = elements.last() {
                write(out, b",");
            };
            write(out, b"]");
        }
        Syntax::LiteralObjectExpr { members } => {
            write(out, b"{");
            for (i, e) in members.iter().enumerate() {
                if i > 0 {
                    write(out, b",");
                }
                emit_js(out, map, *e);
            }
            write(out, b"}");
        }
        Syntax::ObjectMember { typ } => {
            match typ {
                ObjectMemberType::Valued { key, value } => {
                    emit_class_or_object_member(out, map, key, value, b":");
                }
                ObjectMemberType::Rest { value } => {
                    write(out, b"...");
                    emit_js_under_operator(out, map, *value, assignment_precedence());
                }
            };
        }
        Syntax::UnaryExpr {
            operator: OperatorName::New,
            argument,
        } => {
            let (callee, arguments) = match map[*argument].stx() {
                Syntax::CallExpr {
                    optional_chaining: false,
                    callee,
                    arguments,
                } => (*callee, &arguments[..]),
                _ => (*argument, &[][..]),
            };
            write(out, b"new");
            let callee_prec = if callee_contains_call(map, callee) {
                PRIMARY_PRECEDENCE
            } else {
                member_precedence()
            };
            emit_js_under_operator(out, map, callee, callee_prec);
            // `new a` is only equivalent to `new a()` when nothing is applied to the result.
            if !arguments.is_empty() || min_prec >= member_precedence() {
                emit_call_args(out, map, arguments);
            };
        }
        Syntax::UnaryExpr {
            operator: OperatorName::Yield,
            argument,
        } if is_void_zero(map, *argument) => {
            write(out, b"yield");
        }
        Syntax::UnaryExpr { operator, argument } => {
            write(out, operator.text().as_bytes());
            emit_js_under_operator(out, map, *argument, operator.precedence());
        }
        Syntax::UnaryPostfixExpr { operator, argument } => {
            emit_js_under_operator(out, map, *argument, member_precedence());
            write(out, operator.text().as_bytes());
        }
        Syntax::MemberExpr {
            optional_chaining,
            left,
            right,
        } => {
            emit_js_under_operator(out, map, *left, member_precedence());
            if let Syntax::LiteralNumberExpr { value } = map[*left].stx() {
                // `1.a` would lex as the number `1.` followed by `a`.
                if value.shortest_literal().bytes().all(|c| c.is_ascii_digit()) {
                    write(out, b".");
                };
            };
            let access: &[u8] = if *optional_chaining { b"?." } else { b"." };
            write(out, access);
            write(out, right.as_slice());
        }
        Syntax::ComputedMemberExpr {
            optional_chaining,
            object,
            member,
        } => {
            emit_js_under_operator(out, map, *object, member_precedence());
            if *optional_chaining {
                write(out, b"?.");
            };
            write(out, b"[");
            emit_js(out, map, *member);
            write(out, b"]");
        }
        Syntax::TaggedTemplateExpr { function, parts } => {
            emit_js_under_operator(out, map, *function, member_precedence());
            emit_template_parts(out, map, parts);
        }
        Syntax::SuperExpr {} => {
            write(out, b"super");
        }
        Syntax::ThisExpr {} => {
            write(out, b"this");
        }
        Syntax::NewTargetExpr {} => {
            write(out, b"new.target");
        }
        Syntax::ImportMetaExpr {} => {
            write(out, b"import.meta");
        }
        Syntax::BlockStmt { body } => {
            write(out, b"{");
            emit_statements(out, map, body);
            write(out, b"}");
        }
        Syntax::BreakStmt { label } => {
            write(out, b"break");
            if let Some(label) = label {
                write(out, label.as_slice());
            };
        }
        Syntax::ContinueStmt { label } => {
            write(out, b"continue");
            if let Some(label) = label {
                write(out, label.as_slice());
            };
        }
        Syntax::DebuggerStmt {} => {
            write(out, b"debugger");
        }
        Syntax::DoWhileStmt { condition, body } => {
            write(out, b"do");
            emit_body_before_keyword(out, map, *body, false);
            write(out, b"while(");
            emit_js(out, map, *condition);
            write(out, b")");
        }
        Syntax::ExportDeclStmt {
            declaration,
            default,
        } => {
            write(out, b"export");
            if *default {
                write(out, b"default");
            };
            emit_js(out, map, *declaration);
        }
        Syntax::ExportDefaultExprStmt { expression } => {
            write(out, b"export default");
            let start = out.len();
            emit_js_under_operator(out, map, *expression, assignment_precedence());
            parenthesise_ambiguous_start(out, start, LeadingPosition::ExportDefault);
        }
        Syntax::ExportListStmt { names, from } => {
            write(out, b"export");
            emit_export_names(out, map, names);
            if let Some(from) = from {
                write(out, b"from");
                emit_string(out, from, false);
            };
        }
        Syntax::ExpressionStmt { expression } => {
            let start = out.len();
            match map[*expression].stx() {
                // Directives must keep a plain string literal.
                Syntax::LiteralStringExpr { value } => emit_string(out, value, false),
                _ => emit_js(out, map, *expression),
            };
            parenthesise_ambiguous_start(out, start, LeadingPosition::Statement);
        }
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        } => {
            write(out, b"if(");
            emit_js(out, map, *test);
            write(out, b")");
            match alternate {
                Some(alternate) => {
                    emit_body_before_keyword(
                        out,
                        map,
                        *consequent,
                        ends_with_open_if(map, *consequent),
                    );
                    write(out, b"else");
                    emit_js(out, map, *alternate);
                }
                None => emit_js(out, map, *consequent),
            };
        }
        Syntax::ForStmt { header, body } => {
            write(out, b"for");
            if matches!(header, ForStmtHeader::InOf { is_await: true, .. }) {
                write(out, b"await");
            };
            write(out, b"(");
            match header {
                ForStmtHeader::Three {
                    init,
                    condition,
                    post,
                } => {
                    match init {
                        ForThreeInit::None => {}
                        ForThreeInit::Expression(n) => {
                            if contains_in_operator(map, *n) {
                                write(out, b"(");
                                emit_js(out, map, *n);
                                write(out, b")");
                            } else {
                                emit_js(out, map, *n);
                            };
                        }
                        ForThreeInit::Declaration(n) => match map[*n].stx() {
                            Syntax::VarDecl { mode, declarators } => {
                                emit_var_decl(out, map, *mode, declarators, true);
                            }
                            _ => emit_js(out, map, *n),
                        },
                    };
                    write(out, b";");
                    if let Some(n) = condition {
                        emit_js(out, map, *n);
                    };
                    write(out, b";");
                    if let Some(n) = post {
                        emit_js(out, map, *n);
                    };
                }
                ForStmtHeader::InOf { of, lhs, rhs, .. } => {
                    match lhs {
                        ForInOfStmtHeaderLhs::Declaration(n) | ForInOfStmtHeaderLhs::Pattern(n) => {
                            emit_js(out, map, *n);
                        }
                    };
                    if *of {
                        write(out, b"of");
                        emit_js_under_operator(out, map, *rhs, assignment_precedence());
                    } else {
                        write(out, b"in");
                        emit_js(out, map, *rhs);
                    };
                }
            };
            write(out, b")");
            emit_js(out, map, *body);
        }
        Syntax::ImportStmt {
            default,
            names,
            module,
        } => {
            write(out, b"import");
            if let Some(default) = default {
                emit_js(out, map, *default);
                if names.is_some() {
                    write(out, b",");
                };
            };
            if let Some(names) = names {
                emit_export_names(out, map, names);
            };
            if default.is_some() || names.is_some() {
                write(out, b"from");
            };
            emit_string(out, module, false);
        }
        Syntax::LabelStmt { name, statement } => {
            write(out, name.as_slice());
            write(out, b":");
            emit_js(out, map, *statement);
        }
        Syntax::ReturnStmt { value } => {
            write(out, b"return");
            if let Some(value) = value {
                emit_js(out, map, *value);
            };
        }
        Syntax::ThrowStmt { value } => {
            write(out, b"throw");
            emit_js(out, map, *value);
        }
        Syntax::TopLevel { body } => {
            emit_statements(out, map, body);
        }
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        } => {
            write(out, b"try");
            emit_js(out, map, *wrapped);
            if let Some(c) = catch {
                emit_js(out, map, *c);
            }
            if let Some(f) = finally {
                write(out, b"finally");
                emit_js(out, map, *f);
            };
        }
        Syntax::CatchBlock { parameter, body } => {
            write(out, b"catch");
            if let Some(p) = parameter {
                write(out, b"(");
                emit_js(out, map, *p);
                write(out, b")");
            }
            emit_js(out, map, *body);
        }
        Syntax::WhileStmt { condition, body } => {
            write(out, b"while(");
            emit_js(out, map, *condition);
            write(out, b")");
            emit_js(out, map, *body);
        }
        Syntax::WithStmt { object, body } => {
            write(out, b"with(");
            emit_js(out, map, *object);
            write(out, b")");
            emit_js(out, map, *body);
        }
        Syntax::SwitchStmt { test, branches } => {
            write(out, b"switch(");
            emit_js(out, map, *test);
            write(out, b"){");
            let mut needs_separator = false;
            for branch in branches {
                if needs_separator {
                    write(out, b";");
                };
                needs_separator = match map[*branch].stx() {
                    Syntax::SwitchBranch { case, body } => emit_switch_branch(out, map, case, body),
                    _ => {
                        emit_js(out, map, *branch);
                        false
                    }
                };
            }
            write(out, b"}");
        }
        Syntax::SwitchBranch { case, body } => {
            emit_switch_branch(out, map, case, body);
        }
    };
}
