use crate::operator::OperatorName::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorName {
    Addition,
    Assignment,
    AssignmentAddition,
    AssignmentBitwiseAnd,
    AssignmentBitwiseLeftShift,
    AssignmentBitwiseOr,
    AssignmentBitwiseRightShift,
    AssignmentBitwiseUnsignedRightShift,
    AssignmentBitwiseXor,
    AssignmentDivision,
    AssignmentExponentiation,
    AssignmentLogicalAnd,
    AssignmentLogicalOr,
    AssignmentMultiplication,
    AssignmentNullishCoalescing,
    AssignmentRemainder,
    AssignmentSubtraction,
    Await,
    BitwiseAnd,
    BitwiseLeftShift,
    BitwiseNot,
    BitwiseOr,
    BitwiseRightShift,
    BitwiseUnsignedRightShift,
    BitwiseXor,
    Call,
    Comma,
    ComputedMemberAccess,
    Conditional,
    // Only used during parsing.
    ConditionalAlternate,
    Delete,
    Division,
    Equality,
    Exponentiation,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Inequality,
    Instanceof,
    LessThan,
    LessThanOrEqual,
    LogicalAnd,
    LogicalNot,
    LogicalOr,
    MemberAccess,
    Multiplication,
    New,
    NullishCoalescing,
    OptionalChainingMemberAccess,
    OptionalChainingComputedMemberAccess,
    OptionalChainingCall,
    PostfixDecrement,
    PostfixIncrement,
    PrefixDecrement,
    PrefixIncrement,
    Remainder,
    StrictEquality,
    StrictInequality,
    Subtraction,
    Typeof,
    UnaryNegation,
    UnaryPlus,
    Void,
    Yield,
    YieldDelegated,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorName {
    /// Binding strength; higher binds tighter. Member access and calls bind tightest at 18, the
    /// comma operator loosest at 1.
    pub fn precedence(self) -> u8 {
        match self {
            MemberAccess
            | ComputedMemberAccess
            | Call
            | New
            | OptionalChainingMemberAccess
            | OptionalChainingComputedMemberAccess
            | OptionalChainingCall => 18,
            PostfixIncrement | PostfixDecrement => 17,
            LogicalNot | BitwiseNot | UnaryPlus | UnaryNegation | PrefixIncrement
            | PrefixDecrement | Typeof | Void | Delete | Await => 16,
            Exponentiation => 15,
            Multiplication | Division | Remainder => 14,
            Addition | Subtraction => 13,
            BitwiseLeftShift | BitwiseRightShift | BitwiseUnsignedRightShift => 12,
            LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | In | Instanceof => 11,
            Equality | Inequality | StrictEquality | StrictInequality => 10,
            BitwiseAnd => 9,
            BitwiseXor => 8,
            BitwiseOr => 7,
            LogicalAnd => 6,
            LogicalOr | NullishCoalescing => 5,
            Conditional => 4,
            // Given `a, b = true ? c : d = e, f`, the alternate is `d = e`, so it parses below
            // assignment.
            ConditionalAlternate => 2,
            Comma => 1,
            // Assignments and `yield`.
            _ => 3,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            Exponentiation | Conditional | ConditionalAlternate | Yield | YieldDelegated => {
                Associativity::Right
            }
            op if op.is_assignment() || op.is_prefix() => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Minimum precedence an operand must have to be parsed as this operator's right (or only)
    /// operand without parentheses.
    pub fn right_operand_precedence(self) -> u8 {
        self.precedence() + (self.associativity() == Associativity::Left) as u8
    }

    fn is_prefix(self) -> bool {
        matches!(
            self,
            New | LogicalNot
                | BitwiseNot
                | UnaryPlus
                | UnaryNegation
                | PrefixIncrement
                | PrefixDecrement
                | Typeof
                | Void
                | Delete
                | Await
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Assignment
                | AssignmentAddition
                | AssignmentBitwiseAnd
                | AssignmentBitwiseLeftShift
                | AssignmentBitwiseOr
                | AssignmentBitwiseRightShift
                | AssignmentBitwiseUnsignedRightShift
                | AssignmentBitwiseXor
                | AssignmentDivision
                | AssignmentExponentiation
                | AssignmentLogicalAnd
                | AssignmentLogicalOr
                | AssignmentMultiplication
                | AssignmentNullishCoalescing
                | AssignmentRemainder
                | AssignmentSubtraction
        )
    }

    /// `==`, `!=`, `===` or `!==`.
    pub fn is_equality(self) -> bool {
        matches!(
            self,
            Equality | Inequality | StrictEquality | StrictInequality
        )
    }

    /// The comparison producing the opposite boolean for every pair of operands.
    pub fn inverted_equality(self) -> Option<OperatorName> {
        match self {
            Equality => Some(Inequality),
            Inequality => Some(Equality),
            StrictEquality => Some(StrictInequality),
            StrictInequality => Some(StrictEquality),
            _ => None,
        }
    }

    pub fn loosened_equality(self) -> Option<OperatorName> {
        match self {
            StrictEquality => Some(Equality),
            StrictInequality => Some(Inequality),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.is_equality()
            || matches!(
                self,
                LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | In | Instanceof
            )
    }

    pub fn text(self) -> &'static str {
        match self {
            Addition => "+",
            Assignment => "=",
            AssignmentAddition => "+=",
            AssignmentBitwiseAnd => "&=",
            AssignmentBitwiseLeftShift => "<<=",
            AssignmentBitwiseOr => "|=",
            AssignmentBitwiseRightShift => ">>=",
            AssignmentBitwiseUnsignedRightShift => ">>>=",
            AssignmentBitwiseXor => "^=",
            AssignmentDivision => "/=",
            AssignmentExponentiation => "**=",
            AssignmentLogicalAnd => "&&=",
            AssignmentLogicalOr => "||=",
            AssignmentMultiplication => "*=",
            AssignmentNullishCoalescing => "??=",
            AssignmentRemainder => "%=",
            AssignmentSubtraction => "-=",
            Await => "await",
            BitwiseAnd => "&",
            BitwiseLeftShift => "<<",
            BitwiseNot => "~",
            BitwiseOr => "|",
            BitwiseRightShift => ">>",
            BitwiseUnsignedRightShift => ">>>",
            BitwiseXor => "^",
            Comma => ",",
            Delete => "delete",
            Division => "/",
            Equality => "==",
            Exponentiation => "**",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            In => "in",
            Inequality => "!=",
            Instanceof => "instanceof",
            LessThan => "<",
            LessThanOrEqual => "<=",
            LogicalAnd => "&&",
            LogicalNot => "!",
            LogicalOr => "||",
            Multiplication => "*",
            New => "new",
            NullishCoalescing => "??",
            PostfixDecrement | PrefixDecrement => "--",
            PostfixIncrement | PrefixIncrement => "++",
            Remainder => "%",
            StrictEquality => "===",
            StrictInequality => "!==",
            Subtraction => "-",
            Typeof => "typeof",
            UnaryNegation => "-",
            UnaryPlus => "+",
            Void => "void",
            Yield => "yield",
            YieldDelegated => "yield*",
            // Emitted structurally rather than as a single token.
            Call
            | ComputedMemberAccess
            | Conditional
            | ConditionalAlternate
            | MemberAccess
            | OptionalChainingMemberAccess
            | OptionalChainingComputedMemberAccess
            | OptionalChainingCall => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Associativity, OperatorName::*};

    #[test]
    fn test_precedence_order() {
        assert!(MemberAccess.precedence() > PostfixIncrement.precedence());
        assert!(Exponentiation.precedence() > Multiplication.precedence());
        assert_eq!(LogicalOr.precedence(), NullishCoalescing.precedence());
        assert!(Conditional.precedence() > Assignment.precedence());
        assert_eq!(Yield.precedence(), AssignmentAddition.precedence());
        assert!(ConditionalAlternate.precedence() > Comma.precedence());
    }

    #[test]
    fn test_associativity() {
        assert_eq!(Exponentiation.associativity(), Associativity::Right);
        assert_eq!(AssignmentLogicalOr.associativity(), Associativity::Right);
        assert_eq!(Subtraction.associativity(), Associativity::Left);
        // `a-b-c` nests left, `a**b**c` nests right.
        assert_eq!(Subtraction.right_operand_precedence(), Subtraction.precedence() + 1);
        assert_eq!(Exponentiation.right_operand_precedence(), Exponentiation.precedence());
    }
}
