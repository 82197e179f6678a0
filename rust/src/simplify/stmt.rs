use std::collections::HashSet;

use crate::ast::{
    ClassMember, ClassOrObjectMemberKey, ClassOrObjectMemberValue, ForInOfStmtHeaderLhs,
    ForStmtHeader, ForThreeInit, NodeId, NodeMap, Syntax, VarDeclMode, VariableDeclarator,
};
use crate::operator::OperatorName;
use crate::scope::{BindingKind, ScopeKind};
use crate::source::SourceRange;
use crate::version::Feature;

use super::{ListKind, Simplifier, Usage};

// Output statements of a list being rebuilt, plus what is known about them so far.
struct StmtList {
    out: Vec<NodeId>,
    prologue: usize,
    kind: ListKind,
    // Names declared by `var` statements earlier in this list.
    var_names: HashSet<SourceRange>,
    // The last statement never completes normally, so anything after it is unreachable.
    terminated: bool,
}

enum Merge {
    None,
    // The next statement was absorbed into the last one.
    IntoLast,
    // The last statement was absorbed into the next one.
    IntoNext,
}

fn is_lexical_declaration(stx: &Syntax, map: &NodeMap) -> bool {
    match stx {
        Syntax::ClassDecl { .. } | Syntax::FunctionDecl { .. } => true,
        Syntax::VarStmt { declaration } => matches!(
            map[*declaration].stx(),
            Syntax::VarDecl { mode, .. } if *mode != VarDeclMode::Var
        ),
        _ => false,
    }
}

impl<'a> Simplifier<'a> {
    fn is_directive(&self, n: NodeId) -> bool {
        matches!(self.stx(n), Syntax::ExpressionStmt { expression }
            if matches!(self.stx(*expression), Syntax::LiteralStringExpr { .. }))
    }

    fn has_lexical_declaration(&self, body: &[NodeId]) -> bool {
        body.iter()
            .any(|s| is_lexical_declaration(self.stx(*s), self.map))
    }

    // Whether control never continues past the statement.
    fn is_abrupt(&self, n: NodeId) -> bool {
        match self.stx(n) {
            Syntax::ReturnStmt { .. }
            | Syntax::ThrowStmt { .. }
            | Syntax::BreakStmt { .. }
            | Syntax::ContinueStmt { .. } => true,
            Syntax::BlockStmt { body } => body.last().map_or(false, |s| self.is_abrupt(*s)),
            Syntax::IfStmt {
                consequent,
                alternate: Some(alternate),
                ..
            } => self.is_abrupt(*consequent) && self.is_abrupt(*alternate),
            _ => false,
        }
    }

    pub(super) fn visit_top_level(&mut self, root: NodeId) {
        let body = match self.map[root].stx_mut() {
            Syntax::TopLevel { body } => std::mem::take(body),
            _ => return,
        };
        let body = self.simplify_list(body, ListKind::TopLevel);
        if let Syntax::TopLevel { body: slot } = self.map[root].stx_mut() {
            *slot = body;
        };
    }

    fn visit_block(&mut self, n: NodeId, kind: ListKind) {
        if !matches!(self.stx(n), Syntax::BlockStmt { .. }) {
            return self.visit_stmt(n);
        };
        let body = match self.map[n].stx_mut() {
            Syntax::BlockStmt { body } => std::mem::take(body),
            _ => return,
        };
        let body = self.simplify_list(body, kind);
        if let Syntax::BlockStmt { body: slot } = self.map[n].stx_mut() {
            *slot = body;
        };
    }

    // A statement in a position that takes exactly one statement, such as a loop body.
    fn visit_body(&mut self, n: NodeId, kind: ListKind) {
        if !matches!(self.stx(n), Syntax::BlockStmt { .. }) {
            return self.visit_stmt(n);
        };
        self.visit_block(n, kind);
        let single = match self.stx(n) {
            Syntax::BlockStmt { body } if body.is_empty() => None,
            Syntax::BlockStmt { body } if body.len() == 1 => Some(body[0]),
            _ => return,
        };
        match single {
            None => self.map.set_stx(n, Syntax::EmptyStmt {}),
            Some(s) if !is_lexical_declaration(self.stx(s), self.map) => self.move_into(s, n),
            Some(_) => {}
        };
    }

    pub(super) fn visit_function(&mut self, signature: Option<NodeId>, body: NodeId) {
        let outer = self.closure;
        self.closure = self.tree.scope_of_node(body);
        if let Some(signature) = signature {
            self.visit_signature(signature);
        };
        self.visit_block(body, ListKind::FunctionBody);
        self.closure = outer;
    }

    pub(super) fn visit_signature(&mut self, signature: NodeId) {
        let parameters = match self.stx(signature) {
            Syntax::FunctionSignature { parameters } => parameters.clone(),
            _ => return,
        };
        for p in parameters {
            if let Syntax::ParamDecl {
                pattern,
                default_value,
                ..
            } = self.stx(p).clone()
            {
                self.visit_pattern(pattern);
                if let Some(d) = default_value {
                    self.visit_expr(d, Usage::Value);
                };
            };
        }
    }

    pub(super) fn visit_pattern(&mut self, n: NodeId) {
        match self.stx(n).clone() {
            Syntax::ArrayPattern { elements, rest } => {
                for e in elements.into_iter().flatten() {
                    self.visit_pattern(e.target);
                    if let Some(d) = e.default_value {
                        self.visit_expr(d, Usage::Value);
                    };
                }
                if let Some(rest) = rest {
                    self.visit_pattern(rest);
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for p in properties {
                    if let Syntax::ObjectPatternProperty {
                        key,
                        target,
                        default_value,
                    } = self.stx(p).clone()
                    {
                        if let ClassOrObjectMemberKey::Computed(k) = key {
                            self.visit_expr(k, Usage::Value);
                        };
                        self.visit_pattern(target);
                        if let Some(d) = default_value {
                            self.visit_expr(d, Usage::Value);
                        };
                    };
                }
                if let Some(rest) = rest {
                    self.visit_pattern(rest);
                };
            }
            Syntax::MemberExpr { .. } | Syntax::ComputedMemberExpr { .. } => {
                self.visit_expr(n, Usage::Value)
            }
            _ => {}
        }
    }

    pub(super) fn visit_class(&mut self, extends: Option<NodeId>, members: &[ClassMember]) {
        if let Some(extends) = extends {
            self.visit_expr(extends, Usage::Value);
        };
        for member in members {
            if let ClassOrObjectMemberKey::Computed(k) = &member.key {
                self.visit_expr(*k, Usage::Value);
            };
            self.visit_member_value(&member.value);
        }
    }

    pub(super) fn visit_member_value(&mut self, value: &ClassOrObjectMemberValue) {
        match value {
            ClassOrObjectMemberValue::Getter { body }
            | ClassOrObjectMemberValue::StaticBlock { body } => self.visit_function(None, *body),
            ClassOrObjectMemberValue::Method {
                signature, body, ..
            } => self.visit_function(Some(*signature), *body),
            ClassOrObjectMemberValue::Property { initializer } => {
                if let Some(i) = initializer {
                    self.visit_expr(*i, Usage::Value);
                };
            }
            ClassOrObjectMemberValue::Setter { body, parameter } => {
                self.visit_pattern(*parameter);
                self.visit_function(None, *body);
            }
        }
    }

    fn visit_var_decl(&mut self, n: NodeId) {
        let declarators = match self.stx(n) {
            Syntax::VarDecl { declarators, .. } => declarators.clone(),
            _ => return,
        };
        for d in declarators {
            self.visit_pattern(d.pattern);
            if let Some(i) = d.initializer {
                self.visit_expr(i, Usage::Value);
            };
        }
    }

    fn visit_catch(&mut self, n: NodeId) {
        let (parameter, body) = match self.stx(n) {
            Syntax::CatchBlock { parameter, body } => (*parameter, *body),
            _ => return,
        };
        if let Some(p) = parameter {
            self.visit_pattern(p);
        };
        self.visit_block(body, ListKind::Block);
        if let Some(p) = parameter {
            if self.ctx.allowed(Feature::CatchWithoutBinding) && self.is_unreferenced(p) {
                if let Syntax::CatchBlock { parameter, .. } = self.map[n].stx_mut() {
                    *parameter = None;
                };
            };
        };
    }

    // An identifier pattern whose binding is never read or written and cannot be observed by name.
    fn is_unreferenced(&self, pattern: NodeId) -> bool {
        if !matches!(self.stx(pattern), Syntax::IdentifierPattern { .. }) {
            return false;
        };
        self.tree.binding_of(pattern).map_or(false, |b| {
            let binding = self.tree.binding(b);
            let scope = self.tree.scope(binding.scope());
            binding.references().is_empty()
                && !scope.is_dynamic()
                && scope.kind() != ScopeKind::Global
        })
    }

    // A `var` binding owned by the function currently being simplified.
    fn is_local_var(&self, pattern: NodeId) -> bool {
        if !matches!(self.stx(pattern), Syntax::IdentifierPattern { .. }) {
            return false;
        };
        match (self.closure, self.tree.binding_of(pattern)) {
            (Some(closure), Some(b)) => {
                let binding = self.tree.binding(b);
                binding.kind() == BindingKind::Var && binding.scope() == closure
            }
            _ => false,
        }
    }

    pub(super) fn visit_stmt(&mut self, n: NodeId) {
        match self.stx(n).clone() {
            Syntax::BlockStmt { .. } => self.visit_block(n, ListKind::Block),
            Syntax::ClassDecl {
                extends, members, ..
            } => self.visit_class(extends, &members),
            Syntax::FunctionDecl {
                signature, body, ..
            } => self.visit_function(Some(signature), body),
            Syntax::DoWhileStmt { condition, body } => {
                self.visit_body(body, ListKind::LoopBody);
                self.visit_expr(condition, Usage::Boolean);
            }
            Syntax::ExportDeclStmt { declaration, .. } => self.visit_stmt(declaration),
            Syntax::ExportDefaultExprStmt { expression } => {
                self.visit_expr(expression, Usage::Value)
            }
            Syntax::ExpressionStmt { expression } => {
                self.visit_expr(expression, Usage::Discarded);
                self.negate_discarded_call(expression);
            }
            Syntax::ForStmt { header, body } => {
                match header {
                    ForStmtHeader::Three {
                        init,
                        condition,
                        post,
                    } => {
                        match init {
                            ForThreeInit::None => {}
                            ForThreeInit::Expression(e) => self.visit_expr(e, Usage::Discarded),
                            ForThreeInit::Declaration(d) => self.visit_var_decl(d),
                        };
                        if let Some(c) = condition {
                            self.visit_expr(c, Usage::Boolean);
                        };
                        if let Some(p) = post {
                            self.visit_expr(p, Usage::Discarded);
                        };
                    }
                    ForStmtHeader::InOf { lhs, rhs, .. } => {
                        match lhs {
                            ForInOfStmtHeaderLhs::Declaration(d) => self.visit_var_decl(d),
                            ForInOfStmtHeaderLhs::Pattern(p) => self.visit_pattern(p),
                        };
                        self.visit_expr(rhs, Usage::Value);
                    }
                };
                self.visit_body(body, ListKind::LoopBody);
                self.simplify_for(n);
            }
            Syntax::IfStmt {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test, Usage::Boolean);
                self.visit_body(consequent, ListKind::Block);
                if let Some(alternate) = alternate {
                    self.visit_body(alternate, ListKind::Block);
                };
                self.simplify_if(n);
            }
            Syntax::LabelStmt { statement, .. } => self.visit_body(statement, ListKind::Block),
            Syntax::ReturnStmt { value: Some(value) } => {
                self.visit_expr(value, Usage::Value);
                if self.is_void(value) {
                    self.map.set_stx(n, Syntax::ReturnStmt { value: None });
                };
            }
            Syntax::ThrowStmt { value } => self.visit_expr(value, Usage::Value),
            Syntax::SwitchStmt { test, branches } => {
                self.visit_expr(test, Usage::Value);
                for branch in branches {
                    let (case, body) = match self.map[branch].stx_mut() {
                        Syntax::SwitchBranch { case, body } => (*case, std::mem::take(body)),
                        _ => continue,
                    };
                    if let Some(case) = case {
                        self.visit_expr(case, Usage::Value);
                    };
                    let body = self.simplify_list(body, ListKind::Block);
                    if let Syntax::SwitchBranch { body: slot, .. } = self.map[branch].stx_mut() {
                        *slot = body;
                    };
                }
            }
            Syntax::TryStmt {
                wrapped,
                catch,
                finally,
            } => {
                self.visit_block(wrapped, ListKind::Block);
                if let Some(catch) = catch {
                    self.visit_catch(catch);
                };
                if let Some(finally) = finally {
                    self.visit_block(finally, ListKind::Block);
                };
            }
            Syntax::VarStmt { declaration } => self.visit_var_decl(declaration),
            Syntax::WhileStmt { condition, body } => {
                self.visit_expr(condition, Usage::Boolean);
                self.visit_body(body, ListKind::LoopBody);
                self.simplify_while(n);
            }
            Syntax::WithStmt { object, body } => {
                self.visit_expr(object, Usage::Value);
                self.visit_body(body, ListKind::Block);
            }
            _ => {}
        }
    }

    // `(function(){})()` as a statement costs two characters more than `!function(){}()`.
    fn negate_discarded_call(&mut self, expression: NodeId) {
        let is_function_call = matches!(self.stx(expression), Syntax::CallExpr {
            optional_chaining: false,
            callee,
            ..
        } if matches!(self.stx(*callee), Syntax::FunctionExpr { .. }));
        if is_function_call {
            let call = self.map.take_stx(expression);
            let argument = self.derive(expression, call);
            self.map.set_stx(expression, Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument,
            });
        };
    }

    fn collect_pattern_names(&self, pattern: NodeId, names: &mut Vec<SourceRange>) {
        match self.stx(pattern) {
            Syntax::IdentifierPattern { name } => names.push(name.clone()),
            Syntax::ArrayPattern { elements, rest } => {
                for e in elements.iter().flatten() {
                    self.collect_pattern_names(e.target, names);
                }
                if let Some(rest) = rest {
                    self.collect_pattern_names(*rest, names);
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for p in properties {
                    if let Syntax::ObjectPatternProperty { target, .. } = self.stx(*p) {
                        self.collect_pattern_names(*target, names);
                    };
                }
                if let Some(rest) = rest {
                    self.collect_pattern_names(*rest, names);
                };
            }
            _ => {}
        }
    }

    fn collect_var_decl_names(&self, decl: NodeId, names: &mut Vec<SourceRange>) {
        if let Syntax::VarDecl {
            mode: VarDeclMode::Var,
            declarators,
        } = self.stx(decl)
        {
            for d in declarators {
                self.collect_pattern_names(d.pattern, names);
            }
        };
    }

    // Names that `var` statements within the statement declare in the enclosing function. Nested
    // functions have their own. Functions declared in blocks also declare their name there.
    fn collect_var_names(&self, n: NodeId, names: &mut Vec<SourceRange>) {
        match self.stx(n) {
            Syntax::VarStmt { declaration } => self.collect_var_decl_names(*declaration, names),
            Syntax::FunctionDecl {
                name: Some(name), ..
            } => {
                if let Some(name) = self.stx(*name).identifier_name() {
                    names.push(name.clone());
                };
            }
            Syntax::BlockStmt { body } => {
                for s in body {
                    self.collect_var_names(*s, names);
                }
            }
            Syntax::IfStmt {
                consequent,
                alternate,
                ..
            } => {
                self.collect_var_names(*consequent, names);
                if let Some(a) = alternate {
                    self.collect_var_names(*a, names);
                };
            }
            Syntax::ForStmt { header, body } => {
                match header {
                    ForStmtHeader::Three {
                        init: ForThreeInit::Declaration(d),
                        ..
                    }
                    | ForStmtHeader::InOf {
                        lhs: ForInOfStmtHeaderLhs::Declaration(d),
                        ..
                    } => self.collect_var_decl_names(*d, names),
                    _ => {}
                };
                self.collect_var_names(*body, names);
            }
            Syntax::WhileStmt { body, .. }
            | Syntax::DoWhileStmt { body, .. }
            | Syntax::WithStmt { body, .. }
            | Syntax::LabelStmt {
                statement: body, ..
            } => self.collect_var_names(*body, names),
            Syntax::TryStmt {
                wrapped,
                catch,
                finally,
            } => {
                self.collect_var_names(*wrapped, names);
                if let Some(catch) = catch {
                    if let Syntax::CatchBlock { body, .. } = self.stx(*catch) {
                        self.collect_var_names(*body, names);
                    };
                };
                if let Some(f) = finally {
                    self.collect_var_names(*f, names);
                };
            }
            Syntax::SwitchStmt { branches, .. } => {
                for b in branches {
                    if let Syntax::SwitchBranch { body, .. } = self.stx(*b) {
                        for s in body {
                            self.collect_var_names(*s, names);
                        }
                    };
                }
            }
            _ => {}
        }
    }

    /// A `var` statement without initializers for every `var` name the dropped statement declared,
    /// so that references elsewhere keep resolving to a local.
    fn redeclare_vars(&mut self, dropped: NodeId) -> Option<NodeId> {
        let mut names = Vec::new();
        self.collect_var_names(dropped, &mut names);
        if names.is_empty() {
            return None;
        };
        let mut seen = HashSet::new();
        let mut declarators = Vec::new();
        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            };
            let pattern = self.derive(dropped, Syntax::IdentifierPattern { name });
            declarators.push(VariableDeclarator {
                pattern,
                initializer: None,
            });
        }
        let declaration = self.derive(dropped, Syntax::VarDecl {
            mode: VarDeclMode::Var,
            declarators,
        });
        Some(self.derive(dropped, Syntax::VarStmt { declaration }))
    }

    // Replaces a statement with the statements it should become.
    fn replace_with_statements(&mut self, n: NodeId, stmts: Vec<NodeId>) {
        match stmts.len() {
            0 => self.map.set_stx(n, Syntax::EmptyStmt {}),
            1 => self.move_into(stmts[0], n),
            _ => self.map.set_stx(n, Syntax::BlockStmt { body: stmts }),
        }
    }

    // Splits `(a,b)` into `a` and `b` so a rewrite can wrap only the last operand.
    fn split_comma(&self, n: NodeId) -> (Option<NodeId>, NodeId) {
        match self.stx(n) {
            Syntax::BinaryExpr {
                operator: OperatorName::Comma,
                left,
                right,
            } => (Some(*left), *right),
            _ => (None, n),
        }
    }

    fn with_prefix(&mut self, prefix: Option<NodeId>, expr: NodeId) -> NodeId {
        match prefix {
            Some(prefix) => self.binary(expr, OperatorName::Comma, prefix, expr),
            None => expr,
        }
    }

    fn conditional(&mut self, test: NodeId, consequent: NodeId, alternate: NodeId) -> NodeId {
        let (prefix, test) = self.split_comma(test);
        let cond = self.derive(test, Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        });
        self.with_prefix(prefix, cond)
    }

    fn value_or_void(&mut self, value: Option<NodeId>, like: NodeId) -> NodeId {
        match value {
            Some(v) => v,
            None => self.void_zero(like),
        }
    }

    fn simplify_if(&mut self, n: NodeId) {
        let (mut test, mut consequent, mut alternate) = match self.stx(n) {
            Syntax::IfStmt {
                test,
                consequent,
                alternate,
            } => (*test, *consequent, *alternate),
            _ => return,
        };

        if let Some(truthy) = self.constant_test(test) {
            let (taken, dropped) = if truthy {
                (Some(consequent), alternate)
            } else {
                (alternate, Some(consequent))
            };
            let mut stmts: Vec<NodeId> = taken.into_iter().collect();
            if let Some(decl) = dropped.and_then(|d| self.redeclare_vars(d)) {
                stmts.push(decl);
            };
            return self.replace_with_statements(n, stmts);
        };

        if alternate.map_or(false, |a| matches!(self.stx(a), Syntax::EmptyStmt {})) {
            alternate = None;
        };
        if matches!(self.stx(consequent), Syntax::EmptyStmt {}) {
            match alternate {
                None => {
                    return self.map.set_stx(n, Syntax::ExpressionStmt { expression: test });
                }
                Some(a) => {
                    test = self.negation(test, Usage::Boolean);
                    consequent = a;
                    alternate = None;
                }
            };
        };

        let replacement = match (self.stx(consequent).clone(), alternate.map(|a| self.stx(a).clone())) {
            (
                Syntax::ExpressionStmt { expression: a },
                Some(Syntax::ExpressionStmt { expression: b }),
            ) => {
                let expression = if self.same_text(a, b) {
                    let (prefix, last) = self.split_comma(test);
                    let joined = self.binary(n, OperatorName::Comma, last, a);
                    self.with_prefix(prefix, joined)
                } else {
                    self.conditional(test, a, b)
                };
                Some(Syntax::ExpressionStmt { expression })
            }
            (Syntax::ExpressionStmt { expression: a }, None) => {
                let (prefix, last) = self.split_comma(test);
                let direct = self.binary(n, OperatorName::LogicalAnd, last, a);
                let negated = self.negation(last, Usage::Boolean);
                let inverse = self.binary(n, OperatorName::LogicalOr, negated, a);
                let logical = if self.text_len(inverse) < self.text_len(direct) {
                    inverse
                } else {
                    direct
                };
                Some(Syntax::ExpressionStmt {
                    expression: self.with_prefix(prefix, logical),
                })
            }
            (Syntax::ReturnStmt { value: a }, Some(Syntax::ReturnStmt { value: b }))
                if a.is_some() || b.is_some() =>
            {
                let a = self.value_or_void(a, consequent);
                let b = self.value_or_void(b, n);
                Some(Syntax::ReturnStmt {
                    value: Some(self.conditional(test, a, b)),
                })
            }
            (Syntax::ReturnStmt { value: None }, Some(Syntax::ReturnStmt { value: None })) => {
                let evaluated = self.derive(n, Syntax::ExpressionStmt { expression: test });
                Some(Syntax::BlockStmt {
                    body: vec![evaluated, consequent],
                })
            }
            (Syntax::ThrowStmt { value: a }, Some(Syntax::ThrowStmt { value: b })) => {
                Some(Syntax::ThrowStmt {
                    value: self.conditional(test, a, b),
                })
            }
            _ => None,
        };
        if let Some(stx) = replacement {
            return self.map.set_stx(n, stx);
        };

        if let (
            Some(a),
            Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument,
            },
        ) = (alternate, self.stx(test).clone())
        {
            test = argument;
            alternate = Some(consequent);
            consequent = a;
        };
        self.map.set_stx(n, Syntax::IfStmt {
            test,
            consequent,
            alternate,
        });
    }

    fn simplify_while(&mut self, n: NodeId) {
        let (condition, body) = match self.stx(n) {
            Syntax::WhileStmt { condition, body } => (*condition, *body),
            _ => return,
        };
        let condition = match self.constant_test(condition) {
            Some(false) => {
                let stmts = self.redeclare_vars(body).into_iter().collect();
                return self.replace_with_statements(n, stmts);
            }
            Some(true) => None,
            None => Some(condition),
        };
        self.map.set_stx(n, Syntax::ForStmt {
            header: ForStmtHeader::Three {
                init: ForThreeInit::None,
                condition,
                post: None,
            },
            body,
        });
    }

    fn simplify_for(&mut self, n: NodeId) {
        let (init, condition, body) = match self.stx(n) {
            Syntax::ForStmt {
                header:
                    ForStmtHeader::Three {
                        init,
                        condition: Some(condition),
                        ..
                    },
                body,
            } => (init.clone(), *condition, *body),
            _ => return,
        };
        match self.constant_test(condition) {
            Some(true) => {
                if let Syntax::ForStmt {
                    header: ForStmtHeader::Three { condition, .. },
                    ..
                } = self.map[n].stx_mut()
                {
                    *condition = None;
                };
            }
            Some(false) => {
                let mut stmts = Vec::new();
                match init {
                    ForThreeInit::None => {}
                    ForThreeInit::Expression(expression) => {
                        stmts.push(self.derive(n, Syntax::ExpressionStmt { expression }))
                    }
                    ForThreeInit::Declaration(declaration) => {
                        stmts.push(self.derive(n, Syntax::VarStmt { declaration }))
                    }
                };
                stmts.extend(self.redeclare_vars(body));
                self.replace_with_statements(n, stmts);
            }
            None => {}
        };
    }

    // Unreferenced `let` and `const` declarators in function or block scopes, whose initializers
    // have no side effects.
    fn drop_unused_lexicals(&mut self, stmt: NodeId) -> bool {
        let declaration = match self.stx(stmt) {
            Syntax::VarStmt { declaration } => *declaration,
            _ => return false,
        };
        let declarators = match self.stx(declaration) {
            Syntax::VarDecl {
                mode: VarDeclMode::Let | VarDeclMode::Const,
                declarators,
            } => declarators.clone(),
            _ => return false,
        };
        let kept: Vec<VariableDeclarator> = declarators
            .iter()
            .filter(|d| {
                !(self.is_unreferenced(d.pattern)
                    && d.initializer.map_or(true, |i| self.is_pure(i)))
            })
            .cloned()
            .collect();
        if kept.len() == declarators.len() {
            return false;
        };
        let empty = kept.is_empty();
        if let Syntax::VarDecl { declarators, .. } = self.map[declaration].stx_mut() {
            *declarators = kept;
        };
        empty
    }

    // `if(a){...;return}else{b}` → `if(a){...;return}b`. Returns the hoisted statements.
    fn hoist_else(&mut self, stmt: NodeId) -> Option<Vec<NodeId>> {
        let (consequent, alternate) = match self.stx(stmt) {
            Syntax::IfStmt {
                consequent,
                alternate: Some(alternate),
                ..
            } => (*consequent, *alternate),
            _ => return None,
        };
        if !self.is_abrupt(consequent) {
            return None;
        };
        let hoisted = match self.stx(alternate) {
            Syntax::BlockStmt { body } if !self.has_lexical_declaration(body) => body.clone(),
            Syntax::BlockStmt { .. } => vec![alternate],
            s if is_lexical_declaration(s, self.map) => return None,
            _ => vec![alternate],
        };
        if let Syntax::IfStmt { alternate, .. } = self.map[stmt].stx_mut() {
            *alternate = None;
        };
        Some(hoisted)
    }

    // `var a=1;...;var a=2` → `a=2`, so it can merge with neighbouring expressions.
    fn convert_redeclaration(&mut self, list: &StmtList, stmt: NodeId) {
        let declaration = match self.stx(stmt) {
            Syntax::VarStmt { declaration } => *declaration,
            _ => return,
        };
        let declarators = match self.stx(declaration) {
            Syntax::VarDecl {
                mode: VarDeclMode::Var,
                declarators,
            } => declarators.clone(),
            _ => return,
        };
        let redeclares_all = declarators.iter().all(|d| {
            d.initializer.is_some()
                && matches!(self.stx(d.pattern), Syntax::IdentifierPattern { name } if list.var_names.contains(name))
        });
        if !redeclares_all {
            return;
        };
        let mut expression: Option<NodeId> = None;
        for d in declarators {
            let Some(value) = d.initializer else {
                continue;
            };
            let assignment = self.binary(d.pattern, OperatorName::Assignment, d.pattern, value);
            expression = Some(match expression {
                Some(prev) => self.binary(stmt, OperatorName::Comma, prev, assignment),
                None => assignment,
            });
        }
        if let Some(expression) = expression {
            self.map.set_stx(stmt, Syntax::ExpressionStmt { expression });
        };
    }

    fn merge(&mut self, last: NodeId, next: NodeId) -> Merge {
        let last_stx = self.stx(last).clone();
        let next_stx = self.stx(next).clone();
        match (last_stx, next_stx) {
            (Syntax::VarStmt { declaration: a }, Syntax::VarStmt { declaration: b }) => {
                let (mode_a, mode_b) = match (self.stx(a), self.stx(b)) {
                    (Syntax::VarDecl { mode: ma, .. }, Syntax::VarDecl { mode: mb, .. }) => {
                        (*ma, *mb)
                    }
                    _ => return Merge::None,
                };
                if mode_a != mode_b {
                    return Merge::None;
                };
                let moved = match self.map[b].stx_mut() {
                    Syntax::VarDecl { declarators, .. } => std::mem::take(declarators),
                    _ => return Merge::None,
                };
                if let Syntax::VarDecl { declarators, .. } = self.map[a].stx_mut() {
                    declarators.extend(moved);
                };
                Merge::IntoLast
            }
            (Syntax::VarStmt { declaration }, Syntax::ExpressionStmt { expression }) => {
                let (pattern, value) = match self.stx(expression) {
                    Syntax::BinaryExpr {
                        operator: OperatorName::Assignment,
                        left,
                        right,
                    } => (*left, *right),
                    _ => return Merge::None,
                };
                let is_var = matches!(self.stx(declaration), Syntax::VarDecl {
                    mode: VarDeclMode::Var,
                    ..
                });
                if !is_var || !self.is_local_var(pattern) {
                    return Merge::None;
                };
                if let Syntax::VarDecl { declarators, .. } = self.map[declaration].stx_mut() {
                    declarators.push(VariableDeclarator {
                        pattern,
                        initializer: Some(value),
                    });
                };
                Merge::IntoLast
            }
            (Syntax::ExpressionStmt { expression: a }, Syntax::ExpressionStmt { expression: b }) => {
                let joined = self.binary(a, OperatorName::Comma, a, b);
                self.map.set_stx(last, Syntax::ExpressionStmt { expression: joined });
                Merge::IntoLast
            }
            (Syntax::ExpressionStmt { expression: a }, Syntax::ReturnStmt { value: Some(v) }) => {
                let joined = self.binary(a, OperatorName::Comma, a, v);
                self.map.set_stx(next, Syntax::ReturnStmt { value: Some(joined) });
                Merge::IntoNext
            }
            (Syntax::ExpressionStmt { expression: a }, Syntax::ThrowStmt { value }) => {
                let joined = self.binary(a, OperatorName::Comma, a, value);
                self.map.set_stx(next, Syntax::ThrowStmt { value: joined });
                Merge::IntoNext
            }
            (Syntax::ExpressionStmt { expression: a }, Syntax::IfStmt { test, .. }) => {
                let joined = self.binary(a, OperatorName::Comma, a, test);
                if let Syntax::IfStmt { test, .. } = self.map[next].stx_mut() {
                    *test = joined;
                };
                Merge::IntoNext
            }
            (Syntax::ExpressionStmt { expression: a }, Syntax::SwitchStmt { test, .. }) => {
                let joined = self.binary(a, OperatorName::Comma, a, test);
                if let Syntax::SwitchStmt { test, .. } = self.map[next].stx_mut() {
                    *test = joined;
                };
                Merge::IntoNext
            }
            (
                Syntax::ExpressionStmt { expression: a },
                Syntax::ForStmt {
                    header: ForStmtHeader::Three { init, .. },
                    ..
                },
            ) => {
                let joined = match init {
                    ForThreeInit::None => a,
                    ForThreeInit::Expression(e) => self.binary(a, OperatorName::Comma, a, e),
                    ForThreeInit::Declaration(_) => return Merge::None,
                };
                if let Syntax::ForStmt {
                    header: ForStmtHeader::Three { init, .. },
                    ..
                } = self.map[next].stx_mut()
                {
                    *init = ForThreeInit::Expression(joined);
                };
                Merge::IntoNext
            }
            (
                Syntax::VarStmt { declaration },
                Syntax::ForStmt {
                    header: ForStmtHeader::Three { init, .. },
                    ..
                },
            ) => {
                let is_var = matches!(self.stx(declaration), Syntax::VarDecl {
                    mode: VarDeclMode::Var,
                    ..
                });
                if !is_var {
                    return Merge::None;
                };
                match init {
                    ForThreeInit::None => {
                        if let Syntax::ForStmt {
                            header: ForStmtHeader::Three { init, .. },
                            ..
                        } = self.map[next].stx_mut()
                        {
                            *init = ForThreeInit::Declaration(declaration);
                        };
                        Merge::IntoNext
                    }
                    ForThreeInit::Declaration(d)
                        if matches!(self.stx(d), Syntax::VarDecl {
                            mode: VarDeclMode::Var,
                            ..
                        }) =>
                    {
                        let moved = match self.map[d].stx_mut() {
                            Syntax::VarDecl { declarators, .. } => std::mem::take(declarators),
                            _ => return Merge::None,
                        };
                        if let Syntax::VarDecl { declarators, .. } = self.map[declaration].stx_mut()
                        {
                            declarators.extend(moved);
                        };
                        if let Syntax::ForStmt {
                            header: ForStmtHeader::Three { init, .. },
                            ..
                        } = self.map[next].stx_mut()
                        {
                            *init = ForThreeInit::Declaration(declaration);
                        };
                        Merge::IntoNext
                    }
                    _ => Merge::None,
                }
            }
            // Declarations without values can move into the header of a preceding loop.
            (
                Syntax::ForStmt {
                    header: ForStmtHeader::Three { init, .. },
                    ..
                },
                Syntax::VarStmt { declaration },
            ) => {
                if !self.is_bare_var_decl(declaration) {
                    return Merge::None;
                };
                match init {
                    ForThreeInit::None => {
                        if let Syntax::ForStmt {
                            header: ForStmtHeader::Three { init, .. },
                            ..
                        } = self.map[last].stx_mut()
                        {
                            *init = ForThreeInit::Declaration(declaration);
                        };
                        Merge::IntoLast
                    }
                    ForThreeInit::Declaration(d)
                        if matches!(self.stx(d), Syntax::VarDecl {
                            mode: VarDeclMode::Var,
                            ..
                        }) =>
                    {
                        let moved = match self.map[declaration].stx_mut() {
                            Syntax::VarDecl { declarators, .. } => std::mem::take(declarators),
                            _ => return Merge::None,
                        };
                        if let Syntax::VarDecl { declarators, .. } = self.map[d].stx_mut() {
                            declarators.extend(moved);
                        };
                        Merge::IntoLast
                    }
                    _ => Merge::None,
                }
            }
            (
                Syntax::IfStmt {
                    test,
                    consequent,
                    alternate: None,
                },
                Syntax::ReturnStmt { value: b },
            ) => {
                let a = match self.stx(consequent) {
                    Syntax::ReturnStmt { value } => *value,
                    _ => return Merge::None,
                };
                if a.is_none() && b.is_none() {
                    return Merge::None;
                };
                let a = self.value_or_void(a, consequent);
                let b = self.value_or_void(b, next);
                let value = self.conditional(test, a, b);
                self.map.set_stx(next, Syntax::ReturnStmt { value: Some(value) });
                Merge::IntoNext
            }
            (
                Syntax::IfStmt {
                    test,
                    consequent,
                    alternate: None,
                },
                Syntax::ThrowStmt { value: b },
            ) => {
                let a = match self.stx(consequent) {
                    Syntax::ThrowStmt { value } => *value,
                    _ => return Merge::None,
                };
                let value = self.conditional(test, a, b);
                self.map.set_stx(next, Syntax::ThrowStmt { value });
                Merge::IntoNext
            }
            _ => Merge::None,
        }
    }

    // A `var` declaration in which no declarator has a value.
    fn is_bare_var_decl(&self, declaration: NodeId) -> bool {
        matches!(self.stx(declaration), Syntax::VarDecl {
            mode: VarDeclMode::Var,
            declarators,
        } if declarators.iter().all(|d| d.initializer.is_none()))
    }

    // `var a; f(); var b = c` becomes `f(); var a, b = c`.
    fn lift_bare_vars(&mut self, list: &mut StmtList, stmt: NodeId) {
        let declaration = match self.stx(stmt) {
            Syntax::VarStmt { declaration } => *declaration,
            _ => return,
        };
        if !matches!(self.stx(declaration), Syntax::VarDecl {
            mode: VarDeclMode::Var,
            ..
        }) {
            return;
        };
        let mut lifted = Vec::new();
        let mut i = list.prologue;
        while i < list.out.len() {
            let earlier = match self.stx(list.out[i]) {
                Syntax::VarStmt { declaration } if self.is_bare_var_decl(*declaration) => {
                    Some(*declaration)
                }
                _ => None,
            };
            match earlier {
                Some(earlier) => {
                    if let Syntax::VarDecl { declarators, .. } = self.map[earlier].stx_mut() {
                        lifted.append(declarators);
                    };
                    list.out.remove(i);
                }
                None => i += 1,
            };
        }
        if lifted.is_empty() {
            return;
        };
        if let Syntax::VarDecl { declarators, .. } = self.map[declaration].stx_mut() {
            lifted.append(declarators);
            *declarators = lifted;
        };
    }

    fn push_merged(&mut self, list: &mut StmtList, stmt: NodeId) {
        self.convert_redeclaration(list, stmt);
        self.lift_bare_vars(list, stmt);
        loop {
            let last = match list.out.last() {
                Some(&last) if list.out.len() > list.prologue => last,
                _ => break,
            };
            match self.merge(last, stmt) {
                Merge::None => break,
                Merge::IntoLast => {
                    self.note_pushed(list, last);
                    return;
                }
                Merge::IntoNext => {
                    list.out.pop();
                }
            };
        }
        list.out.push(stmt);
        self.note_pushed(list, stmt);
    }

    fn note_pushed(&mut self, list: &mut StmtList, stmt: NodeId) {
        if let Syntax::VarStmt { declaration } = self.stx(stmt) {
            let mut names = Vec::new();
            self.collect_var_decl_names(*declaration, &mut names);
            list.var_names.extend(names);
        };
        list.terminated = self.is_abrupt(stmt);
    }

    fn push_stmt(&mut self, list: &mut StmtList, stmt: NodeId) {
        let nested = match self.stx(stmt) {
            Syntax::EmptyStmt {} => return,
            Syntax::BlockStmt { body } if !self.has_lexical_declaration(body) => {
                let could_become_directive = list.kind.allows_directives()
                    && list.out.len() == list.prologue
                    && body.first().map_or(false, |s| self.is_directive(*s));
                if could_become_directive {
                    None
                } else {
                    Some(body.clone())
                }
            }
            _ => None,
        };
        if let Some(body) = nested {
            for s in body {
                self.push_stmt(list, s);
            }
            return;
        };

        if list.terminated {
            // Unreachable. Function declarations are still hoisted and `var` names still declared.
            if matches!(self.stx(stmt), Syntax::FunctionDecl { .. }) {
                list.out.push(stmt);
            } else if let Some(decl) = self.redeclare_vars(stmt) {
                list.out.push(decl);
            };
            return;
        };

        if self.drop_unused_lexicals(stmt) {
            return;
        };

        match self.hoist_else(stmt) {
            Some(hoisted) => {
                self.push_merged(list, stmt);
                for s in hoisted {
                    self.push_stmt(list, s);
                }
            }
            None => self.push_merged(list, stmt),
        };
    }

    pub(super) fn simplify_list(&mut self, body: Vec<NodeId>, kind: ListKind) -> Vec<NodeId> {
        for &stmt in &body {
            self.visit_stmt(stmt);
        }
        let prologue = if kind.allows_directives() {
            body.iter().take_while(|s| self.is_directive(**s)).count()
        } else {
            0
        };
        let mut list = StmtList {
            out: body[..prologue].to_vec(),
            prologue,
            kind,
            var_names: HashSet::new(),
            terminated: false,
        };
        for &stmt in &body[prologue..] {
            self.push_stmt(&mut list, stmt);
        }

        while list.out.len() > list.prologue {
            let Some(&last) = list.out.last() else {
                break;
            };
            let redundant = match self.stx(last) {
                Syntax::ReturnStmt { value: None } => kind == ListKind::FunctionBody,
                Syntax::ContinueStmt { label: None } => kind == ListKind::LoopBody,
                _ => false,
            };
            if !redundant {
                break;
            };
            list.out.pop();
        }

        // A final `return a(), void 0` only needs to evaluate `a()`.
        if kind == ListKind::FunctionBody && list.out.len() > list.prologue {
            if let Some(&last) = list.out.last() {
                let evaluated = match self.stx(last) {
                    Syntax::ReturnStmt { value: Some(value) } => match self.stx(*value) {
                        Syntax::BinaryExpr {
                            operator: OperatorName::Comma,
                            left,
                            right,
                        } if self.is_void(*right)
                            && !matches!(self.stx(*left), Syntax::LiteralStringExpr { .. }) =>
                        {
                            Some(*left)
                        }
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(expression) = evaluated {
                    self.map.set_stx(last, Syntax::ExpressionStmt { expression });
                };
            };
        };
        list.out
    }
}
