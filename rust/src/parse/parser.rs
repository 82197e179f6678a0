use std::ops::{Index, IndexMut};

use crate::ast::{NodeData, NodeId, NodeMap, Syntax};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::{lex_next, lex_template_string_continue, LexMode, Lexer, LexerCheckpoint};
use crate::source::SourceRange;
use crate::token::{Token, TokenType};

#[derive(Debug)]
pub struct MaybeToken {
    typ: TokenType,
    range: SourceRange,
    matched: bool,
}

impl MaybeToken {
    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn match_loc(&self) -> Option<&SourceRange> {
        if self.matched {
            Some(&self.range)
        } else {
            None
        }
    }

    pub fn match_loc_take(self) -> Option<SourceRange> {
        if self.matched {
            Some(self.range)
        } else {
            None
        }
    }

    pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
        debug_assert!(!self.matched);
        SyntaxError::from_loc(&self.range, err, Some(self.typ))
    }

    pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
        Ok(if self.matched { Some(f()?) } else { None })
    }
}

pub struct ParserCheckpoint {
    checkpoint: LexerCheckpoint,
}

struct BufferedToken {
    token: Token,
    lex_mode: LexMode,
    after_checkpoint: LexerCheckpoint,
}

pub struct Parser {
    lexer: Lexer,
    buffered: Option<BufferedToken>,
    node_map: NodeMap,
    // Whether `await` is an operator here rather than an identifier.
    in_async: bool,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        Parser {
            lexer,
            buffered: None,
            node_map: NodeMap::new(),
            // Module code allows `await` at the top level.
            in_async: true,
        }
    }

    pub fn in_async(&self) -> bool {
        self.in_async
    }

    /// Runs `f` with `await` treated as an operator only if `is_async`, restoring the outer
    /// context afterwards.
    pub fn with_async<T, F: FnOnce(&mut Parser) -> SyntaxResult<T>>(
        &mut self,
        is_async: bool,
        f: F,
    ) -> SyntaxResult<T> {
        let outer = std::mem::replace(&mut self.in_async, is_async);
        let result = f(self);
        self.in_async = outer;
        result
    }

    pub fn create_node(&mut self, loc: SourceRange, stx: Syntax) -> NodeId {
        self.node_map.create_node(loc, stx)
    }

    pub fn node_map(&self) -> &NodeMap {
        &self.node_map
    }

    pub fn take(self) -> NodeMap {
        self.node_map
    }

    pub fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            checkpoint: self.lexer.checkpoint(),
        }
    }

    pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> SourceRange {
        self.lexer.since_checkpoint(checkpoint.checkpoint)
    }

    pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
        self.buffered = None;
        self.lexer.apply_checkpoint(checkpoint.checkpoint);
    }

    fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> SyntaxResult<Token> {
        if let Some(b) = self.buffered.take() {
            if b.lex_mode == mode {
                return Ok(if keep(&b.token) {
                    self.lexer.apply_checkpoint(b.after_checkpoint);
                    b.token
                } else {
                    let token = b.token.clone();
                    self.buffered = Some(b);
                    token
                });
            };
        };
        // The lexer is never advanced past a buffered token, so it is positioned correctly here.
        let cp = self.lexer.checkpoint();
        let t = lex_next(&mut self.lexer, mode)?;
        if !keep(&t) {
            let after_checkpoint = self.lexer.checkpoint();
            self.lexer.apply_checkpoint(cp);
            self.buffered = Some(BufferedToken {
                token: t.clone(),
                lex_mode: mode,
                after_checkpoint,
            });
        };
        Ok(t)
    }

    pub fn next_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        self.forward(mode, |_| true)
    }

    pub fn next(&mut self) -> SyntaxResult<Token> {
        self.next_with_mode(LexMode::Standard)
    }

    pub fn peek_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        self.forward(mode, |_| false)
    }

    pub fn peek(&mut self) -> SyntaxResult<Token> {
        self.peek_with_mode(LexMode::Standard)
    }

    pub fn consume_peeked(&mut self) {
        if let Some(b) = self.buffered.take() {
            self.lexer.apply_checkpoint(b.after_checkpoint);
        };
    }

    /// Lexes the template text following the `}` of a substitution.
    pub fn template_continue(&mut self) -> SyntaxResult<Token> {
        self.buffered = None;
        lex_template_string_continue(&mut self.lexer, false)
    }

    pub fn maybe_with_mode(&mut self, typ: TokenType, mode: LexMode) -> SyntaxResult<MaybeToken> {
        let t = self.forward(mode, |t| t.typ() == typ)?;
        Ok(MaybeToken {
            typ: t.typ(),
            matched: t.typ() == typ,
            range: t.loc_take(),
        })
    }

    pub fn consume_if(&mut self, typ: TokenType) -> SyntaxResult<MaybeToken> {
        self.maybe_with_mode(typ, LexMode::Standard)
    }

    pub fn consume_if_pred<P: FnOnce(&Token) -> bool>(
        &mut self,
        pred: P,
    ) -> SyntaxResult<MaybeToken> {
        let mut matched = false;
        let t = self.forward(LexMode::Standard, |t| {
            matched = pred(t);
            matched
        })?;
        Ok(MaybeToken {
            typ: t.typ(),
            matched,
            range: t.loc_take(),
        })
    }

    pub fn require_with_mode(&mut self, typ: TokenType, mode: LexMode) -> SyntaxResult<Token> {
        let t = self.next_with_mode(mode)?;
        if t.typ() != typ {
            Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
        } else {
            Ok(t)
        }
    }

    pub fn require_predicate<P: FnOnce(TokenType) -> bool>(
        &mut self,
        pred: P,
        expected: &'static str,
    ) -> SyntaxResult<Token> {
        let t = self.next_with_mode(LexMode::Standard)?;
        if !pred(t.typ()) {
            Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)))
        } else {
            Ok(t)
        }
    }

    pub fn require(&mut self, typ: TokenType) -> SyntaxResult<Token> {
        self.require_with_mode(typ, LexMode::Standard)
    }
}

impl Index<NodeId> for Parser {
    type Output = NodeData;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.node_map[index]
    }
}

impl IndexMut<NodeId> for Parser {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.node_map[index]
    }
}
