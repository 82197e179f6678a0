use tracing::debug;

use crate::ast::{ArrayElement, NodeId, NodeMap, Syntax};
use crate::emit::emit_js;
use crate::error::MalformedResult;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::scope::{build_scopes, ScopeId, ScopeTree};
use crate::version::{Feature, VersionPolicy};

mod expr;
mod stmt;
#[cfg(test)]
mod tests;

/// Upper bound on whole-program passes; each pass rebuilds scopes and reapplies every rule once.
pub const MAX_PASSES: usize = 16;

pub struct SimplifyContext<'a> {
    pub policy: &'a VersionPolicy,
    pub target_version: u16,
}

impl<'a> SimplifyContext<'a> {
    pub fn allowed(&self, feature: Feature) -> bool {
        self.policy.allowed(feature, self.target_version)
    }
}

// How the value of an expression is consumed by its parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Usage {
    Value,
    // Only truthiness is observed, e.g. an `if` test or the operand of `!`.
    Boolean,
    Discarded,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ListKind {
    TopLevel,
    FunctionBody,
    LoopBody,
    Block,
}

impl ListKind {
    fn allows_directives(self) -> bool {
        matches!(self, ListKind::TopLevel | ListKind::FunctionBody)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum StaticType {
    Boolean,
    Number,
    String,
}

pub(crate) struct Simplifier<'a> {
    map: &'a mut NodeMap,
    tree: &'a ScopeTree,
    ctx: &'a SimplifyContext<'a>,
    // Function or global scope owning the statements being visited. None inside nodes created
    // during the current pass.
    closure: Option<ScopeId>,
}

impl<'a> Simplifier<'a> {
    fn derive(&mut self, like: NodeId, stx: Syntax) -> NodeId {
        let loc = self.map[like].loc().clone();
        self.map.create_node(loc, stx)
    }

    fn stx(&self, n: NodeId) -> &Syntax {
        self.map[n].stx()
    }

    // Moves the syntax of `from` into `to`, orphaning `from`.
    fn move_into(&mut self, from: NodeId, to: NodeId) {
        let stx = self.map.take_stx(from);
        self.map.set_stx(to, stx);
    }

    fn binary(&mut self, like: NodeId, operator: OperatorName, left: NodeId, right: NodeId) -> NodeId {
        self.derive(like, Syntax::BinaryExpr {
            operator,
            left,
            right,
        })
    }

    fn not(&mut self, argument: NodeId) -> NodeId {
        self.derive(argument, Syntax::UnaryExpr {
            operator: OperatorName::LogicalNot,
            argument,
        })
    }

    fn void_zero(&mut self, like: NodeId) -> NodeId {
        let zero = self.number(like, 0.0);
        self.derive(like, Syntax::UnaryExpr {
            operator: OperatorName::Void,
            argument: zero,
        })
    }

    fn number(&mut self, like: NodeId, value: f64) -> NodeId {
        self.derive(like, Syntax::LiteralNumberExpr {
            value: JsNumber(value),
        })
    }

    fn same_text(&self, a: NodeId, b: NodeId) -> bool {
        render(self.map, a) == render(self.map, b)
    }

    // Emitted length of the expression on its own, ignoring any parentheses its parent may need.
    fn text_len(&self, n: NodeId) -> usize {
        render(self.map, n).len()
    }

    /// Whether evaluating the expression can neither have side effects nor throw.
    fn is_pure(&self, n: NodeId) -> bool {
        match self.stx(n) {
            Syntax::LiteralBooleanExpr { .. }
            | Syntax::LiteralBigIntExpr { .. }
            | Syntax::LiteralNull {}
            | Syntax::LiteralNumberExpr { .. }
            | Syntax::LiteralRegexExpr {}
            | Syntax::LiteralStringExpr { .. }
            | Syntax::FunctionExpr { .. }
            | Syntax::ArrowFunctionExpr { .. } => true,
            Syntax::UnaryExpr {
                operator: OperatorName::Void | OperatorName::LogicalNot | OperatorName::Typeof,
                argument,
            } => self.is_pure(*argument),
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => {
                !operator.is_assignment()
                    && *operator != OperatorName::Comma
                    && matches!(self.stx(*left), Syntax::LiteralNumberExpr { .. })
                    && matches!(self.stx(*right), Syntax::LiteralNumberExpr { .. })
            }
            Syntax::LiteralArrayExpr { elements } => elements.iter().all(|e| match e {
                ArrayElement::Single(v) => self.is_pure(*v),
                ArrayElement::Empty => true,
                ArrayElement::Rest(_) => false,
            }),
            _ => false,
        }
    }

    /// Truthiness known without evaluating the expression. Callers must check purity separately
    /// before dropping the expression.
    fn truthiness(&self, n: NodeId) -> Option<bool> {
        match self.stx(n) {
            Syntax::LiteralBooleanExpr { value } => Some(*value),
            Syntax::LiteralNumberExpr { value } => Some(value.0 != 0.0 && !value.0.is_nan()),
            Syntax::LiteralStringExpr { value } => Some(!value.is_empty()),
            Syntax::LiteralNull {} => Some(false),
            Syntax::LiteralBigIntExpr { value } => {
                if value == "0n" {
                    Some(false)
                } else if value.starts_with("0x")
                    || value.starts_with("0X")
                    || value.starts_with("0o")
                    || value.starts_with("0O")
                    || value.starts_with("0b")
                    || value.starts_with("0B")
                {
                    None
                } else {
                    Some(true)
                }
            }
            Syntax::UnaryExpr {
                operator: OperatorName::Void,
                ..
            } => Some(false),
            Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument,
            } => self.truthiness(*argument).map(|t| !t),
            Syntax::BinaryExpr { .. } => self.number_value(n).map(|v| v != 0.0 && !v.is_nan()),
            Syntax::FunctionExpr { .. }
            | Syntax::ArrowFunctionExpr { .. }
            | Syntax::LiteralArrayExpr { .. }
            | Syntax::LiteralObjectExpr { .. }
            | Syntax::LiteralRegexExpr {} => Some(true),
            _ => None,
        }
    }

    // Value of arithmetic on number literals, such as the `0/0` and `1/0` spellings of `NaN` and
    // `Infinity`.
    fn number_value(&self, n: NodeId) -> Option<f64> {
        match self.stx(n) {
            Syntax::LiteralNumberExpr { value } => Some(value.0),
            Syntax::UnaryExpr {
                operator: OperatorName::UnaryNegation,
                argument,
            } => self.number_value(*argument).map(|v| -v),
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => {
                let l = self.number_value(*left)?;
                let r = self.number_value(*right)?;
                match operator {
                    OperatorName::Addition => Some(l + r),
                    OperatorName::Subtraction => Some(l - r),
                    OperatorName::Multiplication => Some(l * r),
                    OperatorName::Division => Some(l / r),
                    OperatorName::Remainder => Some(l % r),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // Truthiness of a test expression that can be dropped entirely.
    fn constant_test(&self, n: NodeId) -> Option<bool> {
        if self.is_pure(n) {
            self.truthiness(n)
        } else {
            None
        }
    }

    fn is_void(&self, n: NodeId) -> bool {
        matches!(self.stx(n), Syntax::UnaryExpr {
            operator: OperatorName::Void,
            argument,
        } if self.is_pure(*argument))
    }

    fn static_type(&self, n: NodeId) -> Option<StaticType> {
        match self.stx(n) {
            Syntax::LiteralStringExpr { .. }
            | Syntax::UnaryExpr {
                operator: OperatorName::Typeof,
                ..
            } => Some(StaticType::String),
            Syntax::LiteralNumberExpr { .. } => Some(StaticType::Number),
            Syntax::LiteralBooleanExpr { .. }
            | Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                ..
            } => Some(StaticType::Boolean),
            Syntax::BinaryExpr { operator, .. } if operator.is_comparison() => {
                Some(StaticType::Boolean)
            }
            _ => None,
        }
    }
}

fn render(map: &NodeMap, root: NodeId) -> Vec<u8> {
    let mut out = Vec::new();
    emit_js(&mut out, map, root);
    out
}

/// Rewrites statements and expressions into shorter equivalents until the emitted program stops
/// changing or `MAX_PASSES` is reached. Returns the number of passes run.
pub fn simplify(map: &mut NodeMap, root: NodeId, ctx: &SimplifyContext) -> MalformedResult<usize> {
    let mut previous = render(map, root);
    for pass in 1..=MAX_PASSES {
        let tree = build_scopes(map, root)?;
        let mut simplifier = Simplifier {
            map: &mut *map,
            tree: &tree,
            ctx,
            closure: Some(tree.root()),
        };
        simplifier.visit_top_level(root);
        let current = render(map, root);
        if current == previous {
            debug!(pass, "simplifier reached a fixpoint");
            return Ok(pass);
        };
        debug!(pass, bytes = current.len(), "simplifier pass changed the program");
        previous = current;
    }
    debug!(passes = MAX_PASSES, "simplifier stopped at the pass cap");
    Ok(MAX_PASSES)
}
