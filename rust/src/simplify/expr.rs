use crate::ast::{ArrayElement, ClassOrObjectMemberKey, LiteralTemplatePart, NodeId, ObjectMemberType, Syntax};
use crate::char::is_identifier_name;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::source::SourceRange;
use crate::version::Feature;

use super::{Simplifier, Usage};

fn operand_usage(operator: OperatorName, usage: Usage) -> (Usage, Usage) {
    match operator {
        OperatorName::Comma => (Usage::Discarded, usage),
        OperatorName::LogicalAnd | OperatorName::LogicalOr => match usage {
            Usage::Value => (Usage::Value, Usage::Value),
            Usage::Boolean => (Usage::Boolean, Usage::Boolean),
            Usage::Discarded => (Usage::Boolean, Usage::Discarded),
        },
        OperatorName::NullishCoalescing => (Usage::Value, usage),
        _ => (Usage::Value, Usage::Value),
    }
}

fn logical_assignment(operator: OperatorName) -> Option<OperatorName> {
    match operator {
        OperatorName::LogicalAnd => Some(OperatorName::AssignmentLogicalAnd),
        OperatorName::LogicalOr => Some(OperatorName::AssignmentLogicalOr),
        OperatorName::NullishCoalescing => Some(OperatorName::AssignmentNullishCoalescing),
        _ => None,
    }
}

// One side of `X===null||X===void 0`.
struct NullComparison {
    subject: NodeId,
    operator: OperatorName,
    against_null: bool,
}

impl<'a> Simplifier<'a> {
    fn is_string_literal(&self, n: NodeId) -> bool {
        matches!(self.stx(n), Syntax::LiteralStringExpr { .. })
    }

    fn boolean_literal(&self, n: NodeId) -> Option<bool> {
        match self.stx(n) {
            Syntax::LiteralBooleanExpr { value } => Some(*value),
            _ => None,
        }
    }

    // Replaces `n` with one of its operands. A string literal left alone as a statement could be
    // mistaken for a directive, so those stay put.
    fn collapse_into(&mut self, n: NodeId, operand: NodeId, usage: Usage) -> bool {
        if usage == Usage::Discarded && self.is_string_literal(operand) {
            return false;
        };
        self.move_into(operand, n);
        true
    }

    pub(super) fn visit_expr(&mut self, n: NodeId, usage: Usage) {
        match self.stx(n).clone() {
            Syntax::ArrowFunctionExpr {
                signature, body, ..
            } => {
                if matches!(self.stx(body), Syntax::BlockStmt { .. }) {
                    self.visit_function(Some(signature), body);
                } else {
                    self.visit_signature(signature);
                    self.visit_expr(body, Usage::Value);
                };
            }
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => {
                let (left_usage, right_usage) = operand_usage(operator, usage);
                if operator.is_assignment() {
                    self.visit_pattern(left);
                } else {
                    self.visit_expr(left, left_usage);
                };
                self.visit_expr(right, right_usage);
            }
            Syntax::CallExpr {
                callee, arguments, ..
            } => {
                self.visit_expr(callee, Usage::Value);
                for arg in arguments {
                    if let Some(value) = self.call_arg_value(arg) {
                        self.visit_expr(value, Usage::Value);
                    };
                }
            }
            Syntax::ClassExpr {
                extends, members, ..
            } => self.visit_class(extends, &members),
            Syntax::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expr(test, Usage::Boolean);
                self.visit_expr(consequent, Usage::Value);
                self.visit_expr(alternate, Usage::Value);
            }
            Syntax::ComputedMemberExpr { object, member, .. } => {
                self.visit_expr(object, Usage::Value);
                self.visit_expr(member, Usage::Value);
            }
            Syntax::FunctionExpr {
                signature, body, ..
            } => self.visit_function(Some(signature), body),
            Syntax::ImportExpr { module } => self.visit_expr(module, Usage::Value),
            Syntax::LiteralArrayExpr { elements } => {
                for e in elements {
                    if let ArrayElement::Single(v) | ArrayElement::Rest(v) = e {
                        self.visit_expr(v, Usage::Value);
                    };
                }
            }
            Syntax::LiteralObjectExpr { members } => {
                for m in members {
                    let typ = match self.stx(m) {
                        Syntax::ObjectMember { typ } => typ.clone(),
                        _ => continue,
                    };
                    match typ {
                        ObjectMemberType::Valued { key, value } => {
                            if let ClassOrObjectMemberKey::Computed(k) = key {
                                self.visit_expr(k, Usage::Value);
                            };
                            self.visit_member_value(&value);
                        }
                        ObjectMemberType::Rest { value } => self.visit_expr(value, Usage::Value),
                    };
                }
            }
            Syntax::LiteralTemplateExpr { parts } => self.visit_template_parts(&parts),
            Syntax::TaggedTemplateExpr { function, parts } => {
                self.visit_expr(function, Usage::Value);
                self.visit_template_parts(&parts);
            }
            Syntax::MemberExpr { left, .. } => self.visit_expr(left, Usage::Value),
            Syntax::UnaryExpr { operator, argument } => {
                let writes_identifier = matches!(
                    operator,
                    OperatorName::Delete
                        | OperatorName::PrefixIncrement
                        | OperatorName::PrefixDecrement
                ) && matches!(self.stx(argument), Syntax::IdentifierExpr { .. });
                if !writes_identifier {
                    let argument_usage = match operator {
                        OperatorName::LogicalNot => Usage::Boolean,
                        OperatorName::Void => Usage::Discarded,
                        _ => Usage::Value,
                    };
                    self.visit_expr(argument, argument_usage);
                };
            }
            Syntax::UnaryPostfixExpr { argument, .. } => {
                if !matches!(self.stx(argument), Syntax::IdentifierExpr { .. }) {
                    self.visit_expr(argument, Usage::Value);
                };
            }
            _ => {}
        };
        self.rewrite_expr(n, usage);
    }

    fn call_arg_value(&self, arg: NodeId) -> Option<NodeId> {
        match self.stx(arg) {
            Syntax::CallArg { value, .. } => Some(*value),
            _ => None,
        }
    }

    fn visit_template_parts(&mut self, parts: &[LiteralTemplatePart]) {
        for part in parts {
            if let LiteralTemplatePart::Substitution(e) = part {
                self.visit_expr(*e, Usage::Value);
            };
        }
    }

    fn rewrite_expr(&mut self, n: NodeId, usage: Usage) {
        match self.stx(n).clone() {
            Syntax::ArrowFunctionExpr { body, .. } => self.collapse_arrow_body(n, body),
            Syntax::IdentifierExpr { name } => self.shorten_global(n, &name),
            Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument,
            } => self.simplify_not(n, argument, usage),
            Syntax::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => self.simplify_conditional(n, test, consequent, alternate, usage),
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => self.simplify_binary(n, operator, left, right, usage),
            Syntax::ComputedMemberExpr {
                optional_chaining,
                object,
                member,
            } => self.simplify_computed_member(n, optional_chaining, object, member),
            _ => {}
        }
    }

    // `()=>{return a}` → `()=>a`.
    fn collapse_arrow_body(&mut self, n: NodeId, body: NodeId) {
        let value = match self.stx(body) {
            Syntax::BlockStmt { body } if body.len() == 1 => match self.stx(body[0]) {
                Syntax::ReturnStmt { value: Some(value) } => *value,
                _ => return,
            },
            _ => return,
        };
        if let Syntax::ArrowFunctionExpr { body, .. } = self.map[n].stx_mut() {
            *body = value;
        };
    }

    // Unshadowed `undefined`, `Infinity` and `NaN` have shorter spellings. Only reads reach here.
    fn shorten_global(&mut self, n: NodeId, name: &SourceRange) {
        if !self.tree.is_free(n) {
            return;
        };
        let stx = match name.as_slice() {
            b"undefined" => {
                let zero = self.number(n, 0.0);
                Syntax::UnaryExpr {
                    operator: OperatorName::Void,
                    argument: zero,
                }
            }
            b"Infinity" => {
                let one = self.number(n, 1.0);
                let zero = self.number(n, 0.0);
                Syntax::BinaryExpr {
                    operator: OperatorName::Division,
                    left: one,
                    right: zero,
                }
            }
            b"NaN" => {
                let left = self.number(n, 0.0);
                let right = self.number(n, 0.0);
                Syntax::BinaryExpr {
                    operator: OperatorName::Division,
                    left,
                    right,
                }
            }
            _ => return,
        };
        self.map.set_stx(n, stx);
    }

    // An expression with the opposite truthiness of `n`, built from new nodes so that the caller
    // can still discard it. Produces a boolean unless `usage` only observes truthiness.
    pub(super) fn negation(&mut self, n: NodeId, usage: Usage) -> NodeId {
        match self.stx(n).clone() {
            Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument,
            } if usage == Usage::Boolean => argument,
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => match operator.inverted_equality() {
                Some(inverted) => self.binary(n, inverted, left, right),
                None if matches!(operator, OperatorName::LogicalAnd | OperatorName::LogicalOr) => {
                    let wrapped = self.not(n);
                    let distributed = self.de_morgan(n, operator, left, right, usage);
                    if self.text_len(distributed) < self.text_len(wrapped) {
                        distributed
                    } else {
                        wrapped
                    }
                }
                None => self.not(n),
            },
            Syntax::LiteralBooleanExpr { value } => {
                self.derive(n, Syntax::LiteralBooleanExpr { value: !value })
            }
            _ => self.not(n),
        }
    }

    // `!(a && b)` as `!a || !b`, and `!(a || b)` as `!a && !b`.
    fn de_morgan(
        &mut self,
        like: NodeId,
        operator: OperatorName,
        left: NodeId,
        right: NodeId,
        usage: Usage,
    ) -> NodeId {
        let flipped = if operator == OperatorName::LogicalAnd {
            OperatorName::LogicalOr
        } else {
            OperatorName::LogicalAnd
        };
        let left = self.negation(left, usage);
        let right = self.negation(right, usage);
        self.binary(like, flipped, left, right)
    }

    fn simplify_not(&mut self, n: NodeId, argument: NodeId, usage: Usage) {
        if self.is_pure(argument) {
            if let Some(truthy) = self.truthiness(argument) {
                return self.map.set_stx(n, Syntax::LiteralBooleanExpr { value: !truthy });
            };
        };
        match self.stx(argument).clone() {
            Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument: inner,
            } if usage == Usage::Boolean => self.move_into(inner, n),
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } if operator.is_equality() => {
                if let Some(operator) = operator.inverted_equality() {
                    self.map.set_stx(n, Syntax::BinaryExpr {
                        operator,
                        left,
                        right,
                    });
                };
            }
            // Applied whenever the result is no longer.
            Syntax::BinaryExpr {
                operator: operator @ (OperatorName::LogicalAnd | OperatorName::LogicalOr),
                left,
                right,
            } => {
                let distributed = self.de_morgan(argument, operator, left, right, usage);
                if self.text_len(distributed) <= self.text_len(n) {
                    self.move_into(distributed, n);
                };
            }
            _ => {}
        }
    }

    // The call or member access nearest to the root of a chain such as `a.b[c]()`, if the root is
    // the identifier `name`.
    fn chain_link_on(&self, n: NodeId, name: &SourceRange) -> Option<NodeId> {
        let inner = match self.stx(n) {
            Syntax::MemberExpr { left, .. } => *left,
            Syntax::ComputedMemberExpr { object, .. } => *object,
            Syntax::CallExpr { callee, .. } => *callee,
            _ => return None,
        };
        match self.stx(inner) {
            Syntax::IdentifierExpr { name: root } if root == name => Some(n),
            _ => self.chain_link_on(inner, name),
        }
    }

    // `X==null` or `X!=null` for an identifier `X`, as (X, is_equality).
    fn loose_null_test(&self, test: NodeId) -> Option<(NodeId, bool)> {
        match self.stx(test) {
            Syntax::BinaryExpr {
                operator: operator @ (OperatorName::Equality | OperatorName::Inequality),
                left,
                right,
            } if matches!(self.stx(*left), Syntax::IdentifierExpr { .. })
                && matches!(self.stx(*right), Syntax::LiteralNull {}) =>
            {
                Some((*left, *operator == OperatorName::Equality))
            }
            _ => None,
        }
    }

    fn simplify_conditional(
        &mut self,
        n: NodeId,
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
        usage: Usage,
    ) {
        if let Some(truthy) = self.constant_test(test) {
            let taken = if truthy { consequent } else { alternate };
            self.collapse_into(n, taken, usage);
            return;
        };

        if let Syntax::UnaryExpr {
            operator: OperatorName::LogicalNot,
            argument,
        } = self.stx(test).clone()
        {
            return self.map.set_stx(n, Syntax::ConditionalExpr {
                test: argument,
                consequent: alternate,
                alternate: consequent,
            });
        };

        if usage == Usage::Discarded {
            if self.is_pure(alternate) {
                return self.map.set_stx(n, Syntax::BinaryExpr {
                    operator: OperatorName::LogicalAnd,
                    left: test,
                    right: consequent,
                });
            };
            if self.is_pure(consequent) {
                return self.map.set_stx(n, Syntax::BinaryExpr {
                    operator: OperatorName::LogicalOr,
                    left: test,
                    right: alternate,
                });
            };
        };

        let logical = match (self.boolean_literal(consequent), self.boolean_literal(alternate)) {
            (Some(true), Some(false)) => {
                let once = self.not(test);
                Some(Syntax::UnaryExpr {
                    operator: OperatorName::LogicalNot,
                    argument: once,
                })
            }
            (Some(false), Some(true)) => Some(Syntax::UnaryExpr {
                operator: OperatorName::LogicalNot,
                argument: test,
            }),
            (Some(false), None) => Some(Syntax::BinaryExpr {
                operator: OperatorName::LogicalAnd,
                left: self.not(test),
                right: alternate,
            }),
            (Some(true), None) => {
                let once = self.not(test);
                Some(Syntax::BinaryExpr {
                    operator: OperatorName::LogicalOr,
                    left: self.not(once),
                    right: alternate,
                })
            }
            (None, Some(true)) => Some(Syntax::BinaryExpr {
                operator: OperatorName::LogicalOr,
                left: self.not(test),
                right: consequent,
            }),
            (None, Some(false)) => {
                let once = self.not(test);
                Some(Syntax::BinaryExpr {
                    operator: OperatorName::LogicalAnd,
                    left: self.not(once),
                    right: consequent,
                })
            }
            _ => None,
        };
        if let Some(stx) = logical {
            return self.map.set_stx(n, stx);
        };

        if self.same_text(consequent, alternate) {
            return self.map.set_stx(n, Syntax::BinaryExpr {
                operator: OperatorName::Comma,
                left: test,
                right: consequent,
            });
        };

        if matches!(self.stx(test), Syntax::IdentifierExpr { .. }) {
            if self.same_text(test, consequent) {
                return self.map.set_stx(n, Syntax::BinaryExpr {
                    operator: OperatorName::LogicalOr,
                    left: test,
                    right: alternate,
                });
            };
            if self.same_text(test, alternate) {
                return self.map.set_stx(n, Syntax::BinaryExpr {
                    operator: OperatorName::LogicalAnd,
                    left: test,
                    right: consequent,
                });
            };
        };

        if let Some((subject, is_null)) = self.loose_null_test(test) {
            // The branch taken when `X` is neither null nor undefined.
            let (when_nullish, otherwise) = if is_null {
                (consequent, alternate)
            } else {
                (alternate, consequent)
            };
            if self.ctx.allowed(Feature::NullishCoalescing) && self.same_text(subject, otherwise) {
                return self.map.set_stx(n, Syntax::BinaryExpr {
                    operator: OperatorName::NullishCoalescing,
                    left: otherwise,
                    right: when_nullish,
                });
            };
            if self.ctx.allowed(Feature::OptionalChaining) && self.is_void(when_nullish) {
                let name = self.stx(subject).identifier_name().cloned();
                if let Some(link) = name.and_then(|name| self.chain_link_on(otherwise, &name)) {
                    match self.map[link].stx_mut() {
                        Syntax::MemberExpr {
                            optional_chaining, ..
                        }
                        | Syntax::ComputedMemberExpr {
                            optional_chaining, ..
                        }
                        | Syntax::CallExpr {
                            optional_chaining, ..
                        } => *optional_chaining = true,
                        _ => return,
                    };
                    return self.move_into(otherwise, n);
                };
            };
        };

        self.hoist_common_callee(n, test, consequent, alternate);
    }

    // `a?f(x):f(y)` → `f(a?x:y)` when `f` is a local binding, so reading it early is unobservable.
    fn hoist_common_callee(&mut self, n: NodeId, test: NodeId, consequent: NodeId, alternate: NodeId) {
        let (callee_a, args_a) = match self.stx(consequent) {
            Syntax::CallExpr {
                optional_chaining: false,
                callee,
                arguments,
            } => (*callee, arguments.clone()),
            _ => return,
        };
        let (callee_b, args_b) = match self.stx(alternate) {
            Syntax::CallExpr {
                optional_chaining: false,
                callee,
                arguments,
            } => (*callee, arguments.clone()),
            _ => return,
        };
        if args_a.len() != 1 || args_b.len() != 1 {
            return;
        };
        let is_local = matches!(self.stx(callee_a), Syntax::IdentifierExpr { .. })
            && self.tree.binding_of(callee_a).is_some();
        if !is_local || !self.same_text(callee_a, callee_b) {
            return;
        };
        let (x, y) = match (self.stx(args_a[0]), self.stx(args_b[0])) {
            (
                Syntax::CallArg {
                    spread: false,
                    value: x,
                },
                Syntax::CallArg {
                    spread: false,
                    value: y,
                },
            ) => (*x, *y),
            _ => return,
        };
        let chosen = self.derive(n, Syntax::ConditionalExpr {
            test,
            consequent: x,
            alternate: y,
        });
        if let Syntax::CallArg { value, .. } = self.map[args_a[0]].stx_mut() {
            *value = chosen;
        };
        self.move_into(consequent, n);
    }

    fn null_comparison(&self, n: NodeId) -> Option<NullComparison> {
        let (operator, left, right) = match self.stx(n) {
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } if operator.is_equality() => (*operator, *left, *right),
            _ => return None,
        };
        let (subject, other) = if matches!(self.stx(left), Syntax::IdentifierExpr { .. }) {
            (left, right)
        } else if matches!(self.stx(right), Syntax::IdentifierExpr { .. }) {
            (right, left)
        } else {
            return None;
        };
        let against_null = if matches!(self.stx(other), Syntax::LiteralNull {}) {
            true
        } else if self.is_void(other) {
            false
        } else {
            return None;
        };
        Some(NullComparison {
            subject,
            operator,
            against_null,
        })
    }

    // `X===null||X===void 0` → `X==null`, and `X!==null&&X!==void 0` → `X!=null`.
    fn merge_null_checks(&mut self, n: NodeId, operator: OperatorName, left: NodeId, right: NodeId) -> bool {
        let (positive, merged) = match operator {
            OperatorName::LogicalOr => (true, OperatorName::Equality),
            OperatorName::LogicalAnd => (false, OperatorName::Inequality),
            _ => return false,
        };
        let (Some(a), Some(b)) = (self.null_comparison(left), self.null_comparison(right)) else {
            return false;
        };
        let polarity_matches = |c: &NullComparison| match c.operator {
            OperatorName::Equality | OperatorName::StrictEquality => positive,
            _ => !positive,
        };
        let is_loose = |c: &NullComparison| {
            matches!(c.operator, OperatorName::Equality | OperatorName::Inequality)
        };
        if !polarity_matches(&a) || !polarity_matches(&b) {
            return false;
        };
        if a.against_null == b.against_null && !is_loose(&a) && !is_loose(&b) {
            return false;
        };
        if !self.same_text(a.subject, b.subject) {
            return false;
        };
        let null = self.derive(n, Syntax::LiteralNull {});
        self.map.set_stx(n, Syntax::BinaryExpr {
            operator: merged,
            left: a.subject,
            right: null,
        });
        true
    }

    fn simplify_binary(
        &mut self,
        n: NodeId,
        operator: OperatorName,
        left: NodeId,
        right: NodeId,
        usage: Usage,
    ) {
        if operator.is_equality() {
            let loose = matches!(operator, OperatorName::Equality | OperatorName::Inequality);
            if loose && self.is_void(right) {
                return self.map.set_stx(right, Syntax::LiteralNull {});
            };
            if loose && self.is_void(left) {
                return self.map.set_stx(left, Syntax::LiteralNull {});
            };
            if let Some(loosened) = operator.loosened_equality() {
                let same_type = match (self.static_type(left), self.static_type(right)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                };
                if same_type {
                    self.map.set_stx(n, Syntax::BinaryExpr {
                        operator: loosened,
                        left,
                        right,
                    });
                };
            };
            return;
        };

        match operator {
            OperatorName::LogicalAnd | OperatorName::LogicalOr | OperatorName::NullishCoalescing => {
                if self.is_pure(left) {
                    let keep_left = match operator {
                        OperatorName::LogicalAnd => self.truthiness(left).map(|t| !t),
                        OperatorName::LogicalOr => self.truthiness(left),
                        _ => match self.stx(left) {
                            Syntax::LiteralNull {} => Some(false),
                            _ if self.is_void(left) => Some(false),
                            _ => self.truthiness(left).map(|_| true),
                        },
                    };
                    if let Some(keep_left) = keep_left {
                        let kept = if keep_left { left } else { right };
                        if self.collapse_into(n, kept, usage) {
                            return;
                        };
                    };
                };
                if self.merge_null_checks(n, operator, left, right) {
                    return;
                };
                if self.ctx.allowed(Feature::LogicalAssignment) {
                    self.synthesize_logical_assignment(n, operator, left, right);
                };
            }
            OperatorName::Addition if usage != Usage::Discarded => {
                let right_value = match self.stx(right) {
                    Syntax::LiteralStringExpr { value } => value.clone(),
                    _ => return,
                };
                match self.stx(left).clone() {
                    Syntax::LiteralStringExpr { value } => {
                        self.map.set_stx(n, Syntax::LiteralStringExpr {
                            value: value + &right_value,
                        });
                    }
                    Syntax::BinaryExpr {
                        operator: OperatorName::Addition,
                        right: inner,
                        ..
                    } => {
                        if let Syntax::LiteralStringExpr { value } = self.map[inner].stx_mut() {
                            value.push_str(&right_value);
                            self.move_into(left, n);
                        };
                    }
                    _ => {}
                };
            }
            OperatorName::Comma if usage != Usage::Value && self.is_pure(left) => {
                self.move_into(right, n);
            }
            _ => {}
        }
    }

    // `a||(a=b)` → `a||=b`.
    fn synthesize_logical_assignment(&mut self, n: NodeId, operator: OperatorName, left: NodeId, right: NodeId) {
        let Some(assignment) = logical_assignment(operator) else {
            return;
        };
        let name = match self.stx(left) {
            Syntax::IdentifierExpr { name } => name.clone(),
            _ => return,
        };
        let (target, value) = match self.stx(right) {
            Syntax::BinaryExpr {
                operator: OperatorName::Assignment,
                left: target,
                right: value,
            } if matches!(self.stx(*target), Syntax::IdentifierPattern { name: t } if *t == name) => {
                (*target, *value)
            }
            _ => return,
        };
        self.map.set_stx(n, Syntax::BinaryExpr {
            operator: assignment,
            left: target,
            right: value,
        });
    }

    // `o["a"]` → `o.a` and `o["1"]` → `o[1]`.
    fn simplify_computed_member(&mut self, n: NodeId, optional_chaining: bool, object: NodeId, member: NodeId) {
        let key = match self.stx(member) {
            Syntax::LiteralStringExpr { value } => value.clone(),
            _ => return,
        };
        if is_identifier_name(key.as_bytes()) {
            self.map.set_stx(n, Syntax::MemberExpr {
                optional_chaining,
                left: object,
                right: SourceRange::anonymous(key),
            });
        } else if JsNumber::is_canonical_index(key.as_bytes()) {
            if let Ok(value) = key.parse::<f64>() {
                self.map.set_stx(member, Syntax::LiteralNumberExpr {
                    value: JsNumber(value),
                });
            };
        };
    }
}
