use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::ops::{Index, IndexMut};

use crate::error::{SyntaxError, SyntaxErrorType};
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::source::SourceRange;

/// Handle to a node in a `NodeMap`. Deliberately not `Eq`: two handles to equal-looking subtrees
/// say nothing about each other, so comparisons go through the map.
#[derive(Debug, Clone, Copy)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(id: usize) -> NodeId {
        NodeId(id)
    }

    pub fn id(&self) -> usize {
        self.0
    }
}

pub struct NodeData {
    stx: Syntax,
    // Span of the source text the node was parsed from. Nodes created by rewrites borrow the span
    // of the node they replace.
    loc: SourceRange,
}

impl NodeData {
    pub fn loc(&self) -> &SourceRange {
        &self.loc
    }

    pub fn stx(&self) -> &Syntax {
        &self.stx
    }

    pub fn stx_mut(&mut self) -> &mut Syntax {
        &mut self.stx
    }

    pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::from_loc(&self.loc, typ, None)
    }
}

impl Debug for NodeData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.stx, f)
    }
}

/// Arena owning every node of one program. Nodes are never freed; a rewrite that drops a subtree
/// simply stops referring to it.
#[derive(Default)]
pub struct NodeMap {
    nodes: Vec<NodeData>,
}

impl NodeMap {
    pub fn new() -> NodeMap {
        NodeMap::default()
    }

    pub fn create_node(&mut self, loc: SourceRange, stx: Syntax) -> NodeId {
        self.nodes.push(NodeData { stx, loc });
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node ever created, reachable or not, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Moves the syntax out of a node, leaving an empty statement in its place until `set_stx` is
    /// called. Lets rewrites consume child lists without cloning.
    pub fn take_stx(&mut self, id: NodeId) -> Syntax {
        mem::replace(&mut self[id].stx, Syntax::EmptyStmt {})
    }

    pub fn set_stx(&mut self, id: NodeId, stx: Syntax) {
        self[id].stx = stx;
    }
}

impl Index<NodeId> for NodeMap {
    type Output = NodeData;

    fn index(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeMap {
    fn index_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }
}

// Aliases documenting what kind of node a field holds.
type Declaration = NodeId;
type Expression = NodeId;
type Pattern = NodeId;
type Statement = NodeId;

/// `var` bindings hoist to the closure scope; `let` and `const` stay in their block.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VarDeclMode {
    Const,
    Let,
    Var,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarator {
    pub pattern: Pattern,
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug)]
pub struct ArrayPatternElement {
    pub target: Pattern,
    pub default_value: Option<Expression>,
}

#[derive(Clone, Debug)]
pub enum ArrayElement {
    Single(Expression),
    // `...x`
    Rest(Expression),
    // A hole, as in `[a,,b]`.
    Empty,
}

#[derive(Clone, Debug)]
pub enum ClassOrObjectMemberKey {
    // Identifier, keyword, or `#private` name, exactly as written.
    Direct(SourceRange),
    // Quoted key, decoded.
    String(String),
    Number(JsNumber),
    Computed(Expression),
}

#[derive(Clone, Debug)]
pub enum ClassOrObjectMemberValue {
    Property {
        // Always Some for object members. A shorthand `{a}` is stored as `{a: a}` with an
        // IdentifierExpr initializer and printed back as shorthand when the names still match.
        initializer: Option<Expression>,
    },
    Method {
        is_async: bool,
        generator: bool,
        signature: NodeId,
        body: Statement,
    },
    Getter {
        body: Statement,
    },
    Setter {
        parameter: Pattern,
        body: Statement,
    },
    // `static {}` in a class body. Its member key is the `static` keyword and is never printed.
    StaticBlock {
        body: Statement,
    },
}

#[derive(Clone, Debug)]
pub struct ClassMember {
    pub key: ClassOrObjectMemberKey,
    pub statik: bool,
    pub value: ClassOrObjectMemberValue,
}

#[derive(Clone, Debug)]
pub enum ObjectMemberType {
    Valued {
        key: ClassOrObjectMemberKey,
        value: ClassOrObjectMemberValue,
    },
    // `...x` in an object literal.
    Rest {
        value: Expression,
    },
}

/// One `a as b` pair of an import or export list.
#[derive(Clone, Debug)]
pub struct ExportName {
    // Name in the other module for imports, or the local name for exports. May be `default`.
    pub target: SourceRange,
    // IdentifierPattern. Declares the local binding of an import; the public name of an export,
    // which is never renamed.
    pub alias: Pattern,
}

#[derive(Clone, Debug)]
pub enum ExportNames {
    // `import * as x`, `export * from "m"` or `export * as x from "m"`.
    All(Option<Pattern>),
    // `import {a as b, c}` or `export {a as default, d}`.
    Specific(Vec<ExportName>),
}

#[derive(Clone, Debug)]
pub enum ForThreeInit {
    None,
    Expression(Expression),
    Declaration(Declaration),
}

#[derive(Clone, Debug)]
pub enum ForInOfStmtHeaderLhs {
    Declaration(Declaration),
    Pattern(Pattern),
}

#[derive(Clone, Debug)]
pub enum ForStmtHeader {
    // `for (init; condition; post)`
    Three {
        init: ForThreeInit,
        condition: Option<Expression>,
        post: Option<Expression>,
    },
    // `for (lhs in rhs)`, `for (lhs of rhs)` or `for await (lhs of rhs)`.
    InOf {
        of: bool,
        is_await: bool,
        lhs: ForInOfStmtHeaderLhs,
        rhs: Expression,
    },
}

#[derive(Clone, Debug)]
pub enum LiteralTemplatePart {
    Substitution(Expression),
    // Raw source text between substitutions, kept verbatim.
    String(SourceRange),
}

/// Every kind of node. Names that bind are `IdentifierPattern` and `ClassOrFunctionName`; names that
/// read a binding are `IdentifierExpr`. Property names are plain source ranges and never resolve.
#[derive(Clone, Debug)]
pub enum Syntax {
    // Binding names and destructuring.
    IdentifierPattern {
        name: SourceRange,
    },
    // Name of a class or function declaration or expression.
    ClassOrFunctionName {
        name: SourceRange,
    },
    ArrayPattern {
        // None for a hole.
        elements: Vec<Option<ArrayPatternElement>>,
        rest: Option<Pattern>,
    },
    ObjectPattern {
        // ObjectPatternProperty nodes.
        properties: Vec<NodeId>,
        // Always an IdentifierPattern.
        rest: Option<Pattern>,
    },
    ObjectPatternProperty {
        key: ClassOrObjectMemberKey,
        // For a shorthand this is an IdentifierPattern with the key's name, printed back as shorthand
        // while the names match.
        target: Pattern,
        default_value: Option<Expression>,
    },

    // Functions and classes. Each function opens a closure scope covering its signature and body.
    FunctionSignature {
        // ParamDecl nodes.
        parameters: Vec<Declaration>,
    },
    ParamDecl {
        rest: bool,
        pattern: Pattern,
        default_value: Option<Expression>,
    },
    FunctionDecl {
        is_async: bool,
        generator: bool,
        // None only for `export default function () {}`.
        name: Option<NodeId>,
        signature: NodeId,
        body: Statement,
    },
    FunctionExpr {
        is_async: bool,
        generator: bool,
        // Visible only inside the function itself.
        name: Option<NodeId>,
        signature: NodeId,
        body: Statement,
    },
    ArrowFunctionExpr {
        is_async: bool,
        signature: NodeId,
        // BlockStmt, or the expression of a concise body.
        body: NodeId,
    },
    ClassDecl {
        // None only for `export default class {}`.
        name: Option<NodeId>,
        extends: Option<Expression>,
        members: Vec<ClassMember>,
    },
    ClassExpr {
        name: Option<NodeId>,
        extends: Option<Expression>,
        members: Vec<ClassMember>,
    },

    // Declarations and modules.
    VarDecl {
        mode: VarDeclMode,
        declarators: Vec<VariableDeclarator>,
    },
    VarStmt {
        declaration: Declaration,
    },
    ImportStmt {
        // IdentifierPattern.
        default: Option<Pattern>,
        names: Option<ExportNames>,
        module: String,
    },
    ExportDeclStmt {
        declaration: Declaration,
        default: bool,
    },
    ExportDefaultExprStmt {
        expression: Expression,
    },
    ExportListStmt {
        names: ExportNames,
        from: Option<String>,
    },

    // Statements. Statement lists are what the statement simplifier rewrites.
    TopLevel {
        body: Vec<Statement>,
    },
    BlockStmt {
        body: Vec<Statement>,
    },
    EmptyStmt {},
    ExpressionStmt {
        expression: Expression,
    },
    IfStmt {
        test: Expression,
        consequent: Statement,
        alternate: Option<Statement>,
    },
    ForStmt {
        header: ForStmtHeader,
        body: Statement,
    },
    WhileStmt {
        condition: Expression,
        body: Statement,
    },
    DoWhileStmt {
        condition: Expression,
        body: Statement,
    },
    SwitchStmt {
        test: Expression,
        // SwitchBranch nodes.
        branches: Vec<NodeId>,
    },
    SwitchBranch {
        // None for `default`.
        case: Option<Expression>,
        body: Vec<Statement>,
    },
    TryStmt {
        wrapped: Statement,
        // At least one of these is present.
        catch: Option<NodeId>,
        finally: Option<Statement>,
    },
    CatchBlock {
        parameter: Option<Pattern>,
        // BlockStmt.
        body: Statement,
    },
    LabelStmt {
        name: SourceRange,
        statement: Statement,
    },
    BreakStmt {
        label: Option<SourceRange>,
    },
    ContinueStmt {
        label: Option<SourceRange>,
    },
    ReturnStmt {
        value: Option<Expression>,
    },
    ThrowStmt {
        value: Expression,
    },
    // Makes every enclosing scope dynamic.
    WithStmt {
        object: Expression,
        body: Statement,
    },
    DebuggerStmt {},

    // Expressions.
    IdentifierExpr {
        name: SourceRange,
    },
    ThisExpr {},
    SuperExpr {},
    /// `new.target`.
    NewTargetExpr {},
    /// `import.meta`.
    ImportMetaExpr {},
    /// `import(module)`.
    ImportExpr {
        module: Expression,
    },
    UnaryExpr {
        operator: OperatorName,
        argument: Expression,
    },
    UnaryPostfixExpr {
        operator: OperatorName,
        argument: Expression,
    },
    // Includes assignments and the comma operator.
    BinaryExpr {
        operator: OperatorName,
        left: Expression,
        right: Expression,
    },
    ConditionalExpr {
        test: Expression,
        consequent: Expression,
        alternate: Expression,
    },
    CallExpr {
        optional_chaining: bool,
        callee: Expression,
        // CallArg nodes.
        arguments: Vec<NodeId>,
    },
    CallArg {
        spread: bool,
        value: Expression,
    },
    // `left.right`. The property is a source range so it is never resolved as a variable.
    MemberExpr {
        optional_chaining: bool,
        left: Expression,
        right: SourceRange,
    },
    ComputedMemberExpr {
        optional_chaining: bool,
        object: Expression,
        member: Expression,
    },
    TaggedTemplateExpr {
        function: Expression,
        parts: Vec<LiteralTemplatePart>,
    },

    // Literals.
    LiteralArrayExpr {
        elements: Vec<ArrayElement>,
    },
    LiteralObjectExpr {
        // ObjectMember nodes.
        members: Vec<NodeId>,
    },
    ObjectMember {
        typ: ObjectMemberType,
    },
    LiteralBigIntExpr {
        // Digits as written without separators, including the `n` suffix.
        value: String,
    },
    LiteralBooleanExpr {
        value: bool,
    },
    LiteralNull {},
    LiteralNumberExpr {
        value: JsNumber,
    },
    // Emitted verbatim from its source range.
    LiteralRegexExpr {},
    LiteralStringExpr {
        // Decoded value; lone surrogates are mapped as described in `char`.
        value: String,
    },
    LiteralTemplateExpr {
        parts: Vec<LiteralTemplatePart>,
    },
}

impl Syntax {
    /// Name of an IdentifierExpr, IdentifierPattern or ClassOrFunctionName.
    pub fn identifier_name(&self) -> Option<&SourceRange> {
        match self {
            Syntax::IdentifierExpr { name }
            | Syntax::IdentifierPattern { name }
            | Syntax::ClassOrFunctionName { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_identifier_expr_named(&self, expected: &str) -> bool {
        matches!(self, Syntax::IdentifierExpr { name } if *name == *expected)
    }
}
