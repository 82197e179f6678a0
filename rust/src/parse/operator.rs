use crate::operator::OperatorName;
use crate::token::TokenType;

// Operators that appear after an operand. `?.` is followed by a name, `[` or `(`, which the parser
// distinguishes itself.
const MULTARY: &[(TokenType, OperatorName)] = &[
    (TokenType::Plus, OperatorName::Addition),
    (TokenType::Equals, OperatorName::Assignment),
    (TokenType::PlusEquals, OperatorName::AssignmentAddition),
    (TokenType::AmpersandEquals, OperatorName::AssignmentBitwiseAnd),
    (TokenType::ChevronLeftChevronLeftEquals, OperatorName::AssignmentBitwiseLeftShift),
    (TokenType::BarEquals, OperatorName::AssignmentBitwiseOr),
    (TokenType::ChevronRightChevronRightEquals, OperatorName::AssignmentBitwiseRightShift),
    (TokenType::ChevronRightChevronRightChevronRightEquals, OperatorName::AssignmentBitwiseUnsignedRightShift),
    (TokenType::CaretEquals, OperatorName::AssignmentBitwiseXor),
    (TokenType::SlashEquals, OperatorName::AssignmentDivision),
    (TokenType::AsteriskAsteriskEquals, OperatorName::AssignmentExponentiation),
    (TokenType::AmpersandAmpersandEquals, OperatorName::AssignmentLogicalAnd),
    (TokenType::BarBarEquals, OperatorName::AssignmentLogicalOr),
    (TokenType::AsteriskEquals, OperatorName::AssignmentMultiplication),
    (TokenType::QuestionQuestionEquals, OperatorName::AssignmentNullishCoalescing),
    (TokenType::PercentEquals, OperatorName::AssignmentRemainder),
    (TokenType::HyphenEquals, OperatorName::AssignmentSubtraction),
    (TokenType::Ampersand, OperatorName::BitwiseAnd),
    (TokenType::ChevronLeftChevronLeft, OperatorName::BitwiseLeftShift),
    (TokenType::Bar, OperatorName::BitwiseOr),
    (TokenType::ChevronRightChevronRight, OperatorName::BitwiseRightShift),
    (TokenType::ChevronRightChevronRightChevronRight, OperatorName::BitwiseUnsignedRightShift),
    (TokenType::Caret, OperatorName::BitwiseXor),
    (TokenType::ParenthesisOpen, OperatorName::Call),
    (TokenType::Comma, OperatorName::Comma),
    (TokenType::BracketOpen, OperatorName::ComputedMemberAccess),
    (TokenType::Question, OperatorName::Conditional),
    (TokenType::Slash, OperatorName::Division),
    (TokenType::EqualsEquals, OperatorName::Equality),
    (TokenType::AsteriskAsterisk, OperatorName::Exponentiation),
    (TokenType::ChevronRight, OperatorName::GreaterThan),
    (TokenType::ChevronRightEquals, OperatorName::GreaterThanOrEqual),
    (TokenType::KeywordIn, OperatorName::In),
    (TokenType::ExclamationEquals, OperatorName::Inequality),
    (TokenType::KeywordInstanceof, OperatorName::Instanceof),
    (TokenType::ChevronLeft, OperatorName::LessThan),
    (TokenType::ChevronLeftEquals, OperatorName::LessThanOrEqual),
    (TokenType::AmpersandAmpersand, OperatorName::LogicalAnd),
    (TokenType::BarBar, OperatorName::LogicalOr),
    (TokenType::Dot, OperatorName::MemberAccess),
    (TokenType::Asterisk, OperatorName::Multiplication),
    (TokenType::QuestionQuestion, OperatorName::NullishCoalescing),
    (TokenType::QuestionDot, OperatorName::OptionalChainingMemberAccess),
    (TokenType::Percent, OperatorName::Remainder),
    (TokenType::EqualsEqualsEquals, OperatorName::StrictEquality),
    (TokenType::ExclamationEqualsEquals, OperatorName::StrictInequality),
    (TokenType::Hyphen, OperatorName::Subtraction),
];

// Postfix{Increment,Decrement}, New and YieldDelegated are handled manually.
const UNARY: &[(TokenType, OperatorName)] = &[
    (TokenType::KeywordAwait, OperatorName::Await),
    (TokenType::Tilde, OperatorName::BitwiseNot),
    (TokenType::KeywordDelete, OperatorName::Delete),
    (TokenType::Exclamation, OperatorName::LogicalNot),
    (TokenType::HyphenHyphen, OperatorName::PrefixDecrement),
    (TokenType::PlusPlus, OperatorName::PrefixIncrement),
    (TokenType::Hyphen, OperatorName::UnaryNegation),
    (TokenType::Plus, OperatorName::UnaryPlus),
    (TokenType::KeywordTypeof, OperatorName::Typeof),
    (TokenType::KeywordVoid, OperatorName::Void),
    (TokenType::KeywordYield, OperatorName::Yield),
];

fn lookup(pairs: &[(TokenType, OperatorName)], typ: TokenType) -> Option<OperatorName> {
    pairs.iter().find(|(t, _)| *t == typ).map(|(_, name)| *name)
}

/// The operator a token denotes when it follows an operand.
pub fn multary_operator(typ: TokenType) -> Option<OperatorName> {
    lookup(MULTARY, typ)
}

/// The prefix operator a token denotes when it starts an operand.
pub fn unary_operator(typ: TokenType) -> Option<OperatorName> {
    lookup(UNARY, typ)
}
