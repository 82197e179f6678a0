use crate::error::{SyntaxError, SyntaxErrorType};
use crate::source::SourceRange;

/// Kind of a lexed token. Punctuators are named after the characters they are spelled with.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TokenType {
    // Never produced by the lexer; stands in for "no token" where an `Option` would be clumsy.
    _Dummy,
    EOF,

    // Brackets and separators.
    BraceClose,
    BraceOpen,
    BracketClose,
    BracketOpen,
    ParenthesisClose,
    ParenthesisOpen,
    Colon,
    Comma,
    Dot,
    DotDotDot,
    EqualsChevronRight,
    Question,
    QuestionDot,
    Semicolon,

    // Operators.
    Ampersand,
    AmpersandAmpersand,
    Asterisk,
    AsteriskAsterisk,
    Bar,
    BarBar,
    Caret,
    ChevronLeft,
    ChevronLeftChevronLeft,
    ChevronLeftEquals,
    ChevronRight,
    ChevronRightChevronRight,
    ChevronRightChevronRightChevronRight,
    ChevronRightEquals,
    EqualsEquals,
    EqualsEqualsEquals,
    Exclamation,
    ExclamationEquals,
    ExclamationEqualsEquals,
    Hyphen,
    HyphenHyphen,
    Percent,
    Plus,
    PlusPlus,
    QuestionQuestion,
    Slash,
    Tilde,

    // Assignment operators.
    Equals,
    AmpersandAmpersandEquals,
    AmpersandEquals,
    AsteriskAsteriskEquals,
    AsteriskEquals,
    BarBarEquals,
    BarEquals,
    CaretEquals,
    ChevronLeftChevronLeftEquals,
    ChevronRightChevronRightChevronRightEquals,
    ChevronRightChevronRightEquals,
    HyphenEquals,
    PercentEquals,
    PlusEquals,
    QuestionQuestionEquals,
    SlashEquals,

    // Reserved and contextual words. Contextual ones are still valid binding names.
    KeywordAs,
    KeywordAsync,
    KeywordAwait,
    KeywordBreak,
    KeywordCase,
    KeywordCatch,
    KeywordClass,
    KeywordConst,
    KeywordConstructor,
    KeywordContinue,
    KeywordDebugger,
    KeywordDefault,
    KeywordDelete,
    KeywordDo,
    KeywordElse,
    KeywordExport,
    KeywordExtends,
    KeywordFinally,
    KeywordFor,
    KeywordFrom,
    KeywordFunction,
    KeywordGet,
    KeywordIf,
    KeywordImport,
    KeywordIn,
    KeywordInstanceof,
    KeywordLet,
    KeywordNew,
    KeywordOf,
    KeywordReturn,
    KeywordSet,
    KeywordStatic,
    KeywordSuper,
    KeywordSwitch,
    KeywordThis,
    KeywordThrow,
    KeywordTry,
    KeywordTypeof,
    KeywordVar,
    KeywordVoid,
    KeywordWhile,
    KeywordWith,
    KeywordYield,

    // Names and literals.
    Identifier,
    // `#name` in a class body or member access.
    PrivateMember,
    LiteralBigInt,
    LiteralFalse,
    LiteralNull,
    LiteralNumber,
    LiteralRegex,
    LiteralString,
    // Raw text of a template before a `${`.
    LiteralTemplatePartString,
    // Raw text of a template before the closing backtick.
    LiteralTemplatePartStringEnd,
    LiteralTrue,

    // Radix prefixes; the lexer turns these into LiteralNumber.
    LiteralNumberBin,
    LiteralNumberHex,
    LiteralNumberOct,

    // Comments are skipped by the lexer and never reach the parser.
    CommentMultiple,
    CommentSingle,
}

impl TokenType {
    /// Whether the token is spelled like an identifier: any keyword, or `true`, `false` and `null`.
    /// Such tokens may still name properties and import or export aliases.
    pub fn is_word(self) -> bool {
        use TokenType::*;
        matches!(
            self,
            KeywordAs
                | KeywordAsync
                | KeywordAwait
                | KeywordBreak
                | KeywordCase
                | KeywordCatch
                | KeywordClass
                | KeywordConst
                | KeywordConstructor
                | KeywordContinue
                | KeywordDebugger
                | KeywordDefault
                | KeywordDelete
                | KeywordDo
                | KeywordElse
                | KeywordExport
                | KeywordExtends
                | KeywordFinally
                | KeywordFor
                | KeywordFrom
                | KeywordFunction
                | KeywordGet
                | KeywordIf
                | KeywordImport
                | KeywordIn
                | KeywordInstanceof
                | KeywordLet
                | KeywordNew
                | KeywordOf
                | KeywordReturn
                | KeywordSet
                | KeywordStatic
                | KeywordSuper
                | KeywordSwitch
                | KeywordThis
                | KeywordThrow
                | KeywordTry
                | KeywordTypeof
                | KeywordVar
                | KeywordVoid
                | KeywordWhile
                | KeywordWith
                | KeywordYield
                | LiteralFalse
                | LiteralNull
                | LiteralTrue
        )
    }
}

/// A lexed token and where it came from. The lexer records line terminators in the whitespace
/// before a token because automatic semicolon insertion and restricted productions such as
/// `return` and `throw` depend on them.
#[derive(Clone, Debug)]
pub struct Token {
    typ: TokenType,
    loc: SourceRange,
    preceded_by_line_terminator: bool,
}

impl Token {
    pub fn new(loc: SourceRange, typ: TokenType, preceded_by_line_terminator: bool) -> Token {
        Token {
            typ,
            loc,
            preceded_by_line_terminator,
        }
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn loc(&self) -> &SourceRange {
        &self.loc
    }

    pub fn loc_take(self) -> SourceRange {
        self.loc
    }

    pub fn preceded_by_line_terminator(&self) -> bool {
        self.preceded_by_line_terminator
    }

    /// A syntax error located at this token, recording what was actually found.
    pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::from_loc(&self.loc, typ, Some(self.typ))
    }
}

#[cfg(test)]
mod tests {
    use super::TokenType;

    #[test]
    fn test_words() {
        assert!(TokenType::KeywordIf.is_word());
        assert!(TokenType::KeywordOf.is_word());
        assert!(TokenType::LiteralNull.is_word());
        assert!(!TokenType::Identifier.is_word());
        assert!(!TokenType::LiteralNumber.is_word());
        assert!(!TokenType::EqualsChevronRight.is_word());
    }
}
