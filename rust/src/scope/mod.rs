use std::collections::{HashMap, HashSet};

use crate::ast::{
    ArrayElement, ClassMember, ClassOrObjectMemberKey, ClassOrObjectMemberValue, ExportNames,
    ForInOfStmtHeaderLhs, ForStmtHeader, ForThreeInit, LiteralTemplatePart, NodeId, NodeMap,
    ObjectMemberType, Syntax, VarDeclMode,
};
use crate::error::{MalformedInputError, MalformedResult};
use crate::source::SourceRange;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    CatchParameter,
    Parameter,
    Import,
}

pub struct ScopeData {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    // Declaration order.
    bindings: Vec<BindingId>,
    names: HashMap<SourceRange, BindingId>,
    children: Vec<ScopeId>,
    // Bindings visible from outside this scope that are referenced within it or its descendants.
    outer_references: HashSet<BindingId>,
    dynamic: bool,
}

impl ScopeData {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn bindings(&self) -> &[BindingId] {
        &self.bindings
    }

    pub fn lookup(&self, name: &SourceRange) -> Option<BindingId> {
        self.names.get(name).copied()
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn outer_references(&self) -> &HashSet<BindingId> {
        &self.outer_references
    }

    /// Set when `with` or a direct `eval` can observe names declared here.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

pub struct BindingData {
    name: SourceRange,
    kind: BindingKind,
    scope: ScopeId,
    // For a function declared in a block, the enclosing function or global scope it is also
    // visible from.
    hoisted: Option<ScopeId>,
    declarations: Vec<NodeId>,
    references: Vec<NodeId>,
}

impl BindingData {
    pub fn name(&self) -> &SourceRange {
        &self.name
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn hoisted(&self) -> Option<ScopeId> {
        self.hoisted
    }

    pub fn declarations(&self) -> &[NodeId] {
        &self.declarations
    }

    pub fn references(&self) -> &[NodeId] {
        &self.references
    }
}

/// Scopes and bindings of one syntax tree. Only valid until the tree is next modified.
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
    bindings: Vec<BindingData>,
    // Declaration and reference sites, keyed by node.
    resolved: HashMap<usize, BindingId>,
    // Scopes opened by function, block, class, `for`, `switch` and `catch` nodes.
    node_scopes: HashMap<usize, ScopeId>,
    free_names: HashSet<SourceRange>,
    free_references: HashSet<usize>,
}

impl ScopeTree {
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id.0]
    }

    pub fn binding(&self, id: BindingId) -> &BindingData {
        &self.bindings[id.0]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn binding_ids(&self) -> impl Iterator<Item = BindingId> {
        (0..self.bindings.len()).map(BindingId)
    }

    /// The binding declared or referenced by an identifier node.
    pub fn binding_of(&self, node: NodeId) -> Option<BindingId> {
        self.resolved.get(&node.id()).copied()
    }

    pub fn scope_of_node(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(&node.id()).copied()
    }

    /// Whether an identifier reference resolved to no binding, i.e. names a global.
    pub fn is_free(&self, node: NodeId) -> bool {
        self.free_references.contains(&node.id())
    }

    pub fn free_names(&self) -> &HashSet<SourceRange> {
        &self.free_names
    }

    /// The nearest enclosing function or global scope.
    pub fn closure_of(&self, scope: ScopeId) -> ScopeId {
        let mut id = scope;
        while self.scopes[id.0].kind == ScopeKind::Block {
            match self.scopes[id.0].parent {
                Some(parent) => id = parent,
                None => break,
            };
        }
        id
    }

    /// Whether a binding can be observed by name from outside the file or by `eval`/`with`.
    pub fn is_binding_exposed(&self, id: BindingId) -> bool {
        let b = &self.bindings[id.0];
        let scope = &self.scopes[b.scope.0];
        scope.kind == ScopeKind::Global
            || scope.dynamic
            || b.hoisted
                .map_or(false, |h| self.scopes[h.0].kind == ScopeKind::Global)
    }
}

struct PendingReference {
    node: NodeId,
    scope: ScopeId,
    name: SourceRange,
}

struct ScopeBuilder<'a> {
    map: &'a NodeMap,
    tree: ScopeTree,
    references: Vec<PendingReference>,
    // Scope of each `eval(...)` call, with its callee.
    eval_calls: Vec<(ScopeId, NodeId)>,
}

impl<'a> ScopeBuilder<'a> {
    fn new_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.tree.scopes.len());
        self.tree.scopes.push(ScopeData {
            parent,
            kind,
            bindings: Vec::new(),
            names: HashMap::new(),
            children: Vec::new(),
            outer_references: HashSet::new(),
            dynamic: false,
        });
        if let Some(p) = parent {
            self.tree.scopes[p.0].children.push(id);
        };
        id
    }

    fn new_scope_for_node(&mut self, node: NodeId, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = self.new_scope(Some(parent), kind);
        self.tree.node_scopes.insert(node.id(), id);
        id
    }

    fn add_binding(&mut self, scope: ScopeId, name: &SourceRange, kind: BindingKind) -> BindingId {
        let id = BindingId(self.tree.bindings.len());
        self.tree.bindings.push(BindingData {
            name: name.clone(),
            kind,
            scope,
            hoisted: None,
            declarations: Vec::new(),
            references: Vec::new(),
        });
        let s = &mut self.tree.scopes[scope.0];
        s.bindings.push(id);
        s.names.insert(name.clone(), id);
        id
    }

    fn add_declaration_site(&mut self, binding: BindingId, site: NodeId) {
        self.tree.bindings[binding.0].declarations.push(site);
        self.tree.resolved.insert(site.id(), binding);
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        site: NodeId,
        kind: BindingKind,
    ) -> MalformedResult<BindingId> {
        let map = self.map;
        let name = map[site]
            .stx()
            .identifier_name()
            .ok_or_else(|| MalformedInputError::new(site, "identifier"))?
            .clone();
        let binding = match self.tree.scopes[scope.0].lookup(&name) {
            // Redeclarations, e.g. `var a; var a;` or a var shadowing a parameter.
            Some(existing) => existing,
            None => self.add_binding(scope, &name, kind),
        };
        self.add_declaration_site(binding, site);
        Ok(binding)
    }

    // A binding declared in `from` but owned by the enclosing `owner` is live in every scope in
    // between, so none of them may give one of their own bindings the same name.
    fn mark_live_until(&mut self, from: ScopeId, owner: ScopeId, binding: BindingId) {
        let mut next = Some(from);
        while let Some(id) = next {
            if id == owner {
                break;
            };
            let s = &mut self.tree.scopes[id.0];
            s.outer_references.insert(binding);
            next = s.parent;
        }
    }

    // A function declared in a block is owned by the block but also visible from the enclosing
    // closure, sharing a binding with any existing declaration of the same name there.
    fn declare_block_function(&mut self, scope: ScopeId, site: NodeId) -> MalformedResult<()> {
        let map = self.map;
        let name = map[site]
            .stx()
            .identifier_name()
            .ok_or_else(|| MalformedInputError::new(site, "identifier"))?
            .clone();
        let closure = self.tree.closure_of(scope);
        let parent = self.tree.scopes[scope.0].parent;
        let binding = match (
            self.tree.scopes[scope.0].lookup(&name),
            self.tree.scopes[closure.0].lookup(&name),
        ) {
            (Some(existing), _) => existing,
            (None, Some(outer)) => {
                let s = &mut self.tree.scopes[scope.0];
                s.bindings.push(outer);
                s.names.insert(name, outer);
                outer
            }
            (None, None) => {
                let id = self.add_binding(scope, &name, BindingKind::Function);
                self.tree.bindings[id.0].hoisted = Some(closure);
                let c = &mut self.tree.scopes[closure.0];
                c.bindings.push(id);
                c.names.insert(name, id);
                id
            }
        };
        self.add_declaration_site(binding, site);
        if let Some(p) = parent {
            self.mark_live_until(p, closure, binding);
        };
        Ok(())
    }

    fn reference(&mut self, scope: ScopeId, node: NodeId, name: &SourceRange) {
        self.references.push(PendingReference {
            node,
            scope,
            name: name.clone(),
        });
    }

    fn mark_dynamic(&mut self, scope: ScopeId) {
        let mut next = Some(scope);
        while let Some(id) = next {
            let s = &mut self.tree.scopes[id.0];
            s.dynamic = true;
            next = s.parent;
        }
    }

    // Declares every name bound by `pattern`. Defaults and computed keys are evaluated in
    // `expr_scope`, which differs from `decl_scope` for hoisted `var` declarations.
    fn declare_pattern(
        &mut self,
        decl_scope: ScopeId,
        expr_scope: ScopeId,
        pattern: NodeId,
        kind: BindingKind,
    ) -> MalformedResult<()> {
        let map = self.map;
        match map[pattern].stx() {
            Syntax::IdentifierPattern { .. } => {
                let binding = self.declare(decl_scope, pattern, kind)?;
                self.mark_live_until(expr_scope, decl_scope, binding);
            }
            Syntax::ArrayPattern { elements, rest } => {
                for e in elements.iter().flatten() {
                    self.declare_pattern(decl_scope, expr_scope, e.target, kind)?;
                    if let Some(v) = e.default_value {
                        self.visit(expr_scope, v)?;
                    };
                }
                if let Some(r) = rest {
                    self.declare_pattern(decl_scope, expr_scope, *r, kind)?;
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for &p in properties {
                    match map[p].stx() {
                        Syntax::ObjectPatternProperty {
                            key,
                            target,
                            default_value,
                        } => {
                            self.visit_member_key(expr_scope, key)?;
                            self.declare_pattern(decl_scope, expr_scope, *target, kind)?;
                            if let Some(v) = default_value {
                                self.visit(expr_scope, *v)?;
                            };
                        }
                        _ => return Err(MalformedInputError::new(p, "object pattern property")),
                    };
                }
                if let Some(r) = rest {
                    self.declare_pattern(decl_scope, expr_scope, *r, kind)?;
                };
            }
            _ => return Err(MalformedInputError::new(pattern, "binding pattern")),
        };
        Ok(())
    }

    // Assignment targets: identifiers are references rather than declarations.
    fn visit_target(&mut self, scope: ScopeId, target: NodeId) -> MalformedResult<()> {
        let map = self.map;
        match map[target].stx() {
            Syntax::IdentifierPattern { name } => self.reference(scope, target, name),
            Syntax::ArrayPattern { elements, rest } => {
                for e in elements.iter().flatten() {
                    self.visit_target(scope, e.target)?;
                    if let Some(v) = e.default_value {
                        self.visit(scope, v)?;
                    };
                }
                if let Some(r) = rest {
                    self.visit_target(scope, *r)?;
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for &p in properties {
                    match map[p].stx() {
                        Syntax::ObjectPatternProperty {
                            key,
                            target,
                            default_value,
                        } => {
                            self.visit_member_key(scope, key)?;
                            self.visit_target(scope, *target)?;
                            if let Some(v) = default_value {
                                self.visit(scope, *v)?;
                            };
                        }
                        _ => return Err(MalformedInputError::new(p, "object pattern property")),
                    };
                }
                if let Some(r) = rest {
                    self.visit_target(scope, *r)?;
                };
            }
            _ => self.visit(scope, target)?,
        };
        Ok(())
    }

    fn visit_member_key(&mut self, scope: ScopeId, key: &ClassOrObjectMemberKey) -> MalformedResult<()> {
        if let ClassOrObjectMemberKey::Computed(expr) = key {
            self.visit(scope, *expr)?;
        };
        Ok(())
    }

    fn visit_all(&mut self, scope: ScopeId, nodes: &[NodeId]) -> MalformedResult<()> {
        for &n in nodes {
            self.visit(scope, n)?;
        }
        Ok(())
    }

    fn visit_template_parts(
        &mut self,
        scope: ScopeId,
        parts: &[LiteralTemplatePart],
    ) -> MalformedResult<()> {
        for p in parts {
            if let LiteralTemplatePart::Substitution(expr) = p {
                self.visit(scope, *expr)?;
            };
        }
        Ok(())
    }

    // Parameters and body share one scope. `own_name` is a function expression's name, which is
    // only visible inside it.
    fn visit_function(
        &mut self,
        node: NodeId,
        parent: ScopeId,
        own_name: Option<NodeId>,
        signature: NodeId,
        body: NodeId,
    ) -> MalformedResult<()> {
        let map = self.map;
        let scope = self.new_scope_for_node(node, parent, ScopeKind::Function);
        if let Some(name) = own_name {
            self.declare(scope, name, BindingKind::Function)?;
        };
        match map[signature].stx() {
            Syntax::FunctionSignature { parameters } => {
                for &p in parameters {
                    match map[p].stx() {
                        Syntax::ParamDecl {
                            pattern,
                            default_value,
                            ..
                        } => {
                            self.declare_pattern(scope, scope, *pattern, BindingKind::Parameter)?;
                            if let Some(v) = default_value {
                                self.visit(scope, *v)?;
                            };
                        }
                        _ => return Err(MalformedInputError::new(p, "parameter")),
                    };
                }
            }
            _ => return Err(MalformedInputError::new(signature, "function signature")),
        };
        match map[body].stx() {
            Syntax::BlockStmt { body: statements } => {
                self.tree.node_scopes.insert(body.id(), scope);
                self.visit_all(scope, statements)
            }
            _ => self.visit(scope, body),
        }
    }

    fn visit_class(
        &mut self,
        node: NodeId,
        parent: ScopeId,
        own_name: Option<NodeId>,
        extends: &Option<NodeId>,
        members: &[ClassMember],
    ) -> MalformedResult<()> {
        let scope = self.new_scope_for_node(node, parent, ScopeKind::Block);
        if let Some(name) = own_name {
            self.declare(scope, name, BindingKind::Class)?;
        };
        if let Some(e) = extends {
            self.visit(scope, *e)?;
        };
        for m in members {
            self.visit_member_key(scope, &m.key)?;
            self.visit_member_value(scope, &m.value)?;
        }
        Ok(())
    }

    fn visit_member_value(
        &mut self,
        scope: ScopeId,
        value: &ClassOrObjectMemberValue,
    ) -> MalformedResult<()> {
        match value {
            ClassOrObjectMemberValue::Getter { body }
            | ClassOrObjectMemberValue::StaticBlock { body } => {
                let fn_scope = self.new_scope_for_node(*body, scope, ScopeKind::Function);
                self.visit_block_body(fn_scope, *body)?;
            }
            ClassOrObjectMemberValue::Method {
                signature, body, ..
            } => {
                // The body node stands in for the method, which has no node of its own.
                self.visit_function(*body, scope, None, *signature, *body)?;
            }
            ClassOrObjectMemberValue::Property { initializer } => {
                if let Some(init) = initializer {
                    self.visit(scope, *init)?;
                };
            }
            ClassOrObjectMemberValue::Setter { body, parameter } => {
                let fn_scope = self.new_scope_for_node(*body, scope, ScopeKind::Function);
                self.declare_pattern(fn_scope, fn_scope, *parameter, BindingKind::Parameter)?;
                self.visit_block_body(fn_scope, *body)?;
            }
        };
        Ok(())
    }

    fn visit_block_body(&mut self, scope: ScopeId, block: NodeId) -> MalformedResult<()> {
        let map = self.map;
        match map[block].stx() {
            Syntax::BlockStmt { body } => self.visit_all(scope, body),
            _ => Err(MalformedInputError::new(block, "block statement")),
        }
    }

    fn visit_var_decl(&mut self, scope: ScopeId, decl: NodeId) -> MalformedResult<()> {
        let map = self.map;
        match map[decl].stx() {
            Syntax::VarDecl { mode, declarators } => {
                let (decl_scope, kind) = match mode {
                    VarDeclMode::Var => (self.tree.closure_of(scope), BindingKind::Var),
                    VarDeclMode::Let => (scope, BindingKind::Let),
                    VarDeclMode::Const => (scope, BindingKind::Const),
                };
                for d in declarators {
                    self.declare_pattern(decl_scope, scope, d.pattern, kind)?;
                    if let Some(init) = d.initializer {
                        self.visit(scope, init)?;
                    };
                }
                Ok(())
            }
            _ => Err(MalformedInputError::new(decl, "variable declaration")),
        }
    }

    fn visit(&mut self, scope: ScopeId, n: NodeId) -> MalformedResult<()> {
        let map = self.map;
        match map[n].stx() {
            Syntax::IdentifierExpr { name } => self.reference(scope, n, name),
            Syntax::IdentifierPattern { .. }
            | Syntax::ArrayPattern { .. }
            | Syntax::ObjectPattern { .. } => self.visit_target(scope, n)?,
            Syntax::ClassDecl {
                name,
                extends,
                members,
            } => {
                if let Some(name) = name {
                    self.declare(scope, *name, BindingKind::Class)?;
                };
                self.visit_class(n, scope, None, extends, members)?;
            }
            Syntax::ClassExpr {
                name,
                extends,
                members,
            } => self.visit_class(n, scope, *name, extends, members)?,
            Syntax::FunctionDecl {
                name,
                signature,
                body,
                ..
            } => {
                if let Some(name) = name {
                    if self.tree.scopes[scope.0].kind == ScopeKind::Block {
                        self.declare_block_function(scope, *name)?;
                    } else {
                        self.declare(scope, *name, BindingKind::Function)?;
                    };
                };
                self.visit_function(n, scope, None, *signature, *body)?;
            }
            Syntax::FunctionExpr {
                name,
                signature,
                body,
                ..
            } => self.visit_function(n, scope, *name, *signature, *body)?,
            Syntax::ArrowFunctionExpr {
                signature, body, ..
            } => self.visit_function(n, scope, None, *signature, *body)?,
            Syntax::VarDecl { .. } => self.visit_var_decl(scope, n)?,
            Syntax::VarStmt { declaration } => self.visit_var_decl(scope, *declaration)?,
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => {
                if operator.is_assignment() {
                    self.visit_target(scope, *left)?;
                } else {
                    self.visit(scope, *left)?;
                };
                self.visit(scope, *right)?;
            }
            Syntax::CallExpr {
                callee, arguments, ..
            } => {
                if map[*callee].stx().is_identifier_expr_named("eval") {
                    self.eval_calls.push((scope, *callee));
                };
                self.visit(scope, *callee)?;
                self.visit_all(scope, arguments)?;
            }
            Syntax::CallArg { value, .. } => self.visit(scope, *value)?,
            Syntax::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => {
                self.visit(scope, *test)?;
                self.visit(scope, *consequent)?;
                self.visit(scope, *alternate)?;
            }
            Syntax::ComputedMemberExpr { object, member, .. } => {
                self.visit(scope, *object)?;
                self.visit(scope, *member)?;
            }
            Syntax::MemberExpr { left, .. } => self.visit(scope, *left)?,
            Syntax::ImportExpr { module } => self.visit(scope, *module)?,
            Syntax::LiteralArrayExpr { elements } => {
                for e in elements {
                    match e {
                        ArrayElement::Single(v) | ArrayElement::Rest(v) => {
                            self.visit(scope, *v)?
                        }
                        ArrayElement::Empty => {}
                    };
                }
            }
            Syntax::LiteralObjectExpr { members } => self.visit_all(scope, members)?,
            Syntax::ObjectMember { typ } => match typ {
                ObjectMemberType::Valued { key, value } => {
                    self.visit_member_key(scope, key)?;
                    self.visit_member_value(scope, value)?;
                }
                ObjectMemberType::Rest { value } => self.visit(scope, *value)?,
            },
            Syntax::LiteralTemplateExpr { parts } => self.visit_template_parts(scope, parts)?,
            Syntax::TaggedTemplateExpr { function, parts } => {
                self.visit(scope, *function)?;
                self.visit_template_parts(scope, parts)?;
            }
            Syntax::UnaryExpr { argument, .. } | Syntax::UnaryPostfixExpr { argument, .. } => {
                self.visit(scope, *argument)?
            }
            Syntax::BlockStmt { body } => {
                let block = self.new_scope_for_node(n, scope, ScopeKind::Block);
                self.visit_all(block, body)?;
            }
            Syntax::DoWhileStmt { condition, body } | Syntax::WhileStmt { condition, body } => {
                self.visit(scope, *body)?;
                self.visit(scope, *condition)?;
            }
            Syntax::ExportDeclStmt { declaration, .. } => self.visit(scope, *declaration)?,
            Syntax::ExportDefaultExprStmt { expression } => self.visit(scope, *expression)?,
            Syntax::ExpressionStmt { expression } => self.visit(scope, *expression)?,
            Syntax::IfStmt {
                test,
                consequent,
                alternate,
            } => {
                self.visit(scope, *test)?;
                self.visit(scope, *consequent)?;
                if let Some(a) = alternate {
                    self.visit(scope, *a)?;
                };
            }
            Syntax::ForStmt { header, body } => {
                let header_scope = self.new_scope_for_node(n, scope, ScopeKind::Block);
                match header {
                    ForStmtHeader::Three {
                        init,
                        condition,
                        post,
                    } => {
                        match init {
                            ForThreeInit::None => {}
                            ForThreeInit::Expression(e) => self.visit(header_scope, *e)?,
                            ForThreeInit::Declaration(d) => self.visit_var_decl(header_scope, *d)?,
                        };
                        if let Some(c) = condition {
                            self.visit(header_scope, *c)?;
                        };
                        if let Some(p) = post {
                            self.visit(header_scope, *p)?;
                        };
                    }
                    ForStmtHeader::InOf { lhs, rhs, .. } => {
                        match lhs {
                            ForInOfStmtHeaderLhs::Declaration(d) => {
                                self.visit_var_decl(header_scope, *d)?
                            }
                            ForInOfStmtHeaderLhs::Pattern(p) => self.visit_target(header_scope, *p)?,
                        };
                        self.visit(header_scope, *rhs)?;
                    }
                };
                self.visit(header_scope, *body)?;
            }
            Syntax::ImportStmt { default, names, .. } => {
                if let Some(d) = default {
                    self.declare(scope, *d, BindingKind::Import)?;
                };
                match names {
                    Some(ExportNames::All(Some(alias))) => {
                        self.declare(scope, *alias, BindingKind::Import)?;
                    }
                    Some(ExportNames::Specific(names)) => {
                        for name in names {
                            self.declare(scope, name.alias, BindingKind::Import)?;
                        }
                    }
                    Some(ExportNames::All(None)) | None => {}
                };
            }
            Syntax::LabelStmt { statement, .. } => self.visit(scope, *statement)?,
            Syntax::ReturnStmt { value } => {
                if let Some(v) = value {
                    self.visit(scope, *v)?;
                };
            }
            Syntax::ThrowStmt { value } => self.visit(scope, *value)?,
            Syntax::SwitchStmt { test, branches } => {
                self.visit(scope, *test)?;
                let body_scope = self.new_scope_for_node(n, scope, ScopeKind::Block);
                for &b in branches {
                    match map[b].stx() {
                        Syntax::SwitchBranch { case, body } => {
                            if let Some(c) = case {
                                self.visit(body_scope, *c)?;
                            };
                            self.visit_all(body_scope, body)?;
                        }
                        _ => return Err(MalformedInputError::new(b, "switch branch")),
                    };
                }
            }
            Syntax::TryStmt {
                wrapped,
                catch,
                finally,
            } => {
                self.visit(scope, *wrapped)?;
                if let Some(c) = catch {
                    match map[*c].stx() {
                        Syntax::CatchBlock { parameter, body } => {
                            let catch_scope = self.new_scope_for_node(*c, scope, ScopeKind::Block);
                            if let Some(p) = parameter {
                                self.declare_pattern(
                                    catch_scope,
                                    catch_scope,
                                    *p,
                                    BindingKind::CatchParameter,
                                )?;
                            };
                            self.visit(catch_scope, *body)?;
                        }
                        _ => return Err(MalformedInputError::new(*c, "catch clause")),
                    };
                };
                if let Some(f) = finally {
                    self.visit(scope, *f)?;
                };
            }
            Syntax::WithStmt { object, body } => {
                self.mark_dynamic(scope);
                self.visit(scope, *object)?;
                self.visit(scope, *body)?;
            }
            Syntax::EmptyStmt {}
            | Syntax::BreakStmt { .. }
            | Syntax::ContinueStmt { .. }
            | Syntax::DebuggerStmt {}
            | Syntax::ExportListStmt { .. }
            | Syntax::LiteralBigIntExpr { .. }
            | Syntax::LiteralBooleanExpr { .. }
            | Syntax::LiteralNull {}
            | Syntax::LiteralNumberExpr { .. }
            | Syntax::LiteralRegexExpr {}
            | Syntax::LiteralStringExpr { .. }
            | Syntax::ImportMetaExpr {}
            | Syntax::NewTargetExpr {}
            | Syntax::SuperExpr {}
            | Syntax::ThisExpr {} => {}
            Syntax::ClassOrFunctionName { .. } => {
                return Err(MalformedInputError::new(n, "expression or statement"))
            }
            Syntax::FunctionSignature { .. } | Syntax::ParamDecl { .. } => {
                return Err(MalformedInputError::new(n, "function"))
            }
            Syntax::CatchBlock { .. } => return Err(MalformedInputError::new(n, "try statement")),
            Syntax::SwitchBranch { .. } => {
                return Err(MalformedInputError::new(n, "switch statement"))
            }
            Syntax::ObjectPatternProperty { .. } => {
                return Err(MalformedInputError::new(n, "object pattern"))
            }
            Syntax::TopLevel { .. } => return Err(MalformedInputError::new(n, "nested statement")),
        };
        Ok(())
    }

    fn resolve(&mut self) {
        let references = std::mem::take(&mut self.references);
        for r in references {
            let mut path = Vec::new();
            let mut next = Some(r.scope);
            let mut found = None;
            while let Some(id) = next {
                let s = &self.tree.scopes[id.0];
                if let Some(b) = s.lookup(&r.name) {
                    found = Some(b);
                    break;
                };
                path.push(id);
                next = s.parent;
            }
            match found {
                Some(b) => {
                    self.tree.bindings[b.0].references.push(r.node);
                    self.tree.resolved.insert(r.node.id(), b);
                    for id in path {
                        self.tree.scopes[id.0].outer_references.insert(b);
                    }
                }
                None => {
                    self.tree.free_references.insert(r.node.id());
                    self.tree.free_names.insert(r.name);
                }
            };
        }
        let eval_calls = std::mem::take(&mut self.eval_calls);
        for (scope, callee) in eval_calls {
            if self.tree.is_free(callee) {
                self.mark_dynamic(scope);
            };
        }
    }
}

/// Builds the scope tree of a whole program. Declarations in a scope are collected before any
/// reference is resolved, so hoisted and not-yet-initialised names still resolve.
pub fn build_scopes(map: &NodeMap, root: NodeId) -> MalformedResult<ScopeTree> {
    let body = match map[root].stx() {
        Syntax::TopLevel { body } => body,
        _ => return Err(MalformedInputError::new(root, "top level")),
    };
    let mut builder = ScopeBuilder {
        map,
        tree: ScopeTree {
            scopes: Vec::new(),
            bindings: Vec::new(),
            resolved: HashMap::new(),
            node_scopes: HashMap::new(),
            free_names: HashSet::new(),
            free_references: HashSet::new(),
        },
        references: Vec::new(),
        eval_calls: Vec::new(),
    };
    let global = builder.new_scope(None, ScopeKind::Global);
    builder.tree.node_scopes.insert(root.id(), global);
    builder.visit_all(global, body)?;
    builder.resolve();
    Ok(builder.tree)
}
