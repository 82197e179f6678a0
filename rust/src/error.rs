use std::fmt::{self, Debug, Display, Formatter};

use thiserror::Error;

use crate::ast::NodeId;
use crate::source::SourceRange;
use crate::token::TokenType;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
    ExpectedNotFound,
    ExpectedSyntax(&'static str),
    ForLoopHeaderHasInvalidLhs,
    ForLoopHeaderHasMultipleDeclarators,
    ForLoopHeaderHasNoLhs,
    InvalidAssigmentTarget,
    InvalidCharacterEscape,
    InvalidUtf8,
    LineTerminatorAfterArrowFunctionParameters,
    LineTerminatorAfterThrow,
    LineTerminatorInRegex,
    LineTerminatorInString,
    ReservedCharacterInString,
    MalformedLiteralBigInt,
    MalformedLiteralNumber,
    RequiredTokenNotFound(TokenType),
    RestParameterNotLast,
    TryStatementHasNoCatchOrFinally,
    UnexpectedEnd,
}

#[derive(Clone)]
pub struct SyntaxError {
    position: usize,
    typ: SyntaxErrorType,
    actual_token: Option<TokenType>,
}

impl SyntaxError {
    pub fn new(
        typ: SyntaxErrorType,
        position: usize,
        actual_token: Option<TokenType>,
    ) -> SyntaxError {
        SyntaxError {
            typ,
            position,
            actual_token,
        }
    }

    pub fn from_loc(
        loc: &SourceRange,
        typ: SyntaxErrorType,
        actual_token: Option<TokenType>,
    ) -> SyntaxError {
        SyntaxError {
            typ,
            position: loc.start,
            actual_token,
        }
    }

    pub fn typ(&self) -> SyntaxErrorType {
        self.typ
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn actual_token(&self) -> Option<TokenType> {
        self.actual_token
    }
}

impl Debug for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} around index {}", self, self.position)
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.typ)?;
        if let Some(actual) = self.actual_token {
            write!(f, " (found {:?})", actual)?;
        };
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

impl PartialEq for SyntaxError {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
    }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Invalid options passed to the minifier. Rejected before any input is read.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("alphabet must have at least one start character and one continue character")]
    EmptyAlphabet,
    #[error("alphabet contains the character {0:?} more than once")]
    DuplicateAlphabetChar(char),
    #[error("{0:?} cannot appear in an identifier at that position")]
    InvalidAlphabetChar(char),
    #[error("start character {0:?} is missing from the continue characters")]
    StartCharNotContinue(char),
    #[error("unsupported ECMAScript version {0}; expected 0 or a year from 2015 to 2025")]
    UnsupportedVersion(u16),
}

/// A tree that does not have the shape the parser produces, e.g. a variable statement whose child
/// is not a declarator. Only reachable when callers build or edit trees themselves.
#[derive(Clone, Debug, Error)]
#[error("malformed syntax tree at node {node:?}: expected {expected}")]
pub struct MalformedInputError {
    pub node: NodeId,
    pub expected: &'static str,
}

impl MalformedInputError {
    pub fn new(node: NodeId, expected: &'static str) -> MalformedInputError {
        MalformedInputError { node, expected }
    }
}

pub type MalformedResult<T> = Result<T, MalformedInputError>;
