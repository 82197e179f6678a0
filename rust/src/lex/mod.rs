use std::collections::HashSet;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use lazy_static::lazy_static;
use memchr::{memchr, memchr3};

use crate::char::{
    is_identifier_byte, CharFilter, DIGIT_BIN, DIGIT_CHARSTR, DIGIT_HEX, DIGIT_OCT, DIGIT_SEP,
    ID_CONTINUE, ID_START, ID_START_CHARSTR, WHITESPACE,
};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::source::{Source, SourceRange};
use crate::token::{Token, TokenType};

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
    SlashIsRegex,
    Standard,
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
    next: usize,
}

#[derive(Copy, Clone)]
struct Match {
    len: usize,
}

pub struct Lexer {
    source: Source,
    next: usize,
}

impl Lexer {
    pub fn new(code: Vec<u8>) -> Lexer {
        Lexer {
            source: Source::new(code),
            next: 0,
        }
    }

    fn code(&self) -> &[u8] {
        self.source.code()
    }

    fn end(&self) -> usize {
        self.code().len()
    }

    fn remaining(&self) -> usize {
        self.end() - self.next
    }

    fn eof_range(&self) -> SourceRange {
        self.source.range(self.end(), self.end())
    }

    fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(typ, self.next, None)
    }

    fn at_end(&self) -> bool {
        self.next >= self.end()
    }

    fn peek(&self, n: usize) -> SyntaxResult<u8> {
        self.peek_or_eof(n)
            .ok_or_else(|| self.error(SyntaxErrorType::UnexpectedEnd))
    }

    fn peek_or_eof(&self, n: usize) -> Option<u8> {
        self.code().get(self.next + n).copied()
    }

    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint { next: self.next }
    }

    pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> SourceRange {
        self.source.range(checkpoint.next, self.next)
    }

    pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
        self.next = checkpoint.next;
    }

    fn if_char(&self, c: u8) -> Match {
        Match {
            len: (self.peek_or_eof(0) == Some(c)) as usize,
        }
    }

    fn while_chars(&self, chars: &CharFilter) -> Match {
        let len = self.code()[self.next..]
            .iter()
            .position(|c| !chars.has(*c))
            .unwrap_or(self.remaining());
        Match { len }
    }

    fn while_not_3_chars(&self, a: u8, b: u8, c: u8) -> Match {
        Match {
            len: memchr3(a, b, c, &self.code()[self.next..]).unwrap_or(self.remaining()),
        }
    }

    fn consume(&mut self, m: Match) {
        self.next += m.len;
    }

    fn consume_next(&mut self) -> SyntaxResult<u8> {
        let c = self.peek(0)?;
        self.next += 1;
        Ok(c)
    }

    fn skip_expect(&mut self, n: usize) {
        debug_assert!(self.next + n <= self.end());
        self.next += n;
    }
}

const OPERATOR_TEXT: &[(TokenType, &[u8])] = &[
    (TokenType::Ampersand, b"&"),
    (TokenType::AmpersandAmpersand, b"&&"),
    (TokenType::AmpersandAmpersandEquals, b"&&="),
    (TokenType::AmpersandEquals, b"&="),
    (TokenType::Asterisk, b"*"),
    (TokenType::AsteriskAsterisk, b"**"),
    (TokenType::AsteriskAsteriskEquals, b"**="),
    (TokenType::AsteriskEquals, b"*="),
    (TokenType::Bar, b"|"),
    (TokenType::BarBar, b"||"),
    (TokenType::BarBarEquals, b"||="),
    (TokenType::BarEquals, b"|="),
    (TokenType::BraceClose, b"}"),
    (TokenType::BraceOpen, b"{"),
    (TokenType::BracketClose, b"]"),
    (TokenType::BracketOpen, b"["),
    (TokenType::Caret, b"^"),
    (TokenType::CaretEquals, b"^="),
    (TokenType::ChevronLeft, b"<"),
    (TokenType::ChevronLeftChevronLeft, b"<<"),
    (TokenType::ChevronLeftChevronLeftEquals, b"<<="),
    (TokenType::ChevronLeftEquals, b"<="),
    (TokenType::ChevronRight, b">"),
    (TokenType::ChevronRightChevronRight, b">>"),
    (TokenType::ChevronRightChevronRightChevronRight, b">>>"),
    (TokenType::ChevronRightChevronRightChevronRightEquals, b">>>="),
    (TokenType::ChevronRightChevronRightEquals, b">>="),
    (TokenType::ChevronRightEquals, b">="),
    (TokenType::Colon, b":"),
    (TokenType::Comma, b","),
    (TokenType::Dot, b"."),
    (TokenType::DotDotDot, b"..."),
    (TokenType::Equals, b"="),
    (TokenType::EqualsChevronRight, b"=>"),
    (TokenType::EqualsEquals, b"=="),
    (TokenType::EqualsEqualsEquals, b"==="),
    (TokenType::Exclamation, b"!"),
    (TokenType::ExclamationEquals, b"!="),
    (TokenType::ExclamationEqualsEquals, b"!=="),
    (TokenType::Hyphen, b"-"),
    (TokenType::HyphenEquals, b"-="),
    (TokenType::HyphenHyphen, b"--"),
    (TokenType::ParenthesisClose, b")"),
    (TokenType::ParenthesisOpen, b"("),
    (TokenType::Percent, b"%"),
    (TokenType::PercentEquals, b"%="),
    (TokenType::Plus, b"+"),
    (TokenType::PlusEquals, b"+="),
    (TokenType::PlusPlus, b"++"),
    (TokenType::PrivateMember, b"#"),
    (TokenType::Question, b"?"),
    (TokenType::QuestionDot, b"?."),
    (TokenType::QuestionQuestion, b"??"),
    (TokenType::QuestionQuestionEquals, b"??="),
    (TokenType::Semicolon, b";"),
    (TokenType::Slash, b"/"),
    (TokenType::SlashEquals, b"/="),
    (TokenType::Tilde, b"~"),
];

const KEYWORD_TEXT: &[(TokenType, &[u8])] = &[
    (TokenType::KeywordAs, b"as"),
    (TokenType::KeywordAsync, b"async"),
    (TokenType::KeywordAwait, b"await"),
    (TokenType::KeywordBreak, b"break"),
    (TokenType::KeywordCase, b"case"),
    (TokenType::KeywordCatch, b"catch"),
    (TokenType::KeywordClass, b"class"),
    (TokenType::KeywordConst, b"const"),
    (TokenType::KeywordConstructor, b"constructor"),
    (TokenType::KeywordContinue, b"continue"),
    (TokenType::KeywordDebugger, b"debugger"),
    (TokenType::KeywordDefault, b"default"),
    (TokenType::KeywordDelete, b"delete"),
    (TokenType::KeywordDo, b"do"),
    (TokenType::KeywordElse, b"else"),
    (TokenType::KeywordExport, b"export"),
    (TokenType::KeywordExtends, b"extends"),
    (TokenType::KeywordFinally, b"finally"),
    (TokenType::KeywordFor, b"for"),
    (TokenType::KeywordFrom, b"from"),
    (TokenType::KeywordFunction, b"function"),
    (TokenType::KeywordGet, b"get"),
    (TokenType::KeywordIf, b"if"),
    (TokenType::KeywordImport, b"import"),
    (TokenType::KeywordIn, b"in"),
    (TokenType::KeywordInstanceof, b"instanceof"),
    (TokenType::KeywordLet, b"let"),
    (TokenType::KeywordNew, b"new"),
    (TokenType::KeywordOf, b"of"),
    (TokenType::KeywordReturn, b"return"),
    (TokenType::KeywordSet, b"set"),
    (TokenType::KeywordStatic, b"static"),
    (TokenType::KeywordSuper, b"super"),
    (TokenType::KeywordSwitch, b"switch"),
    (TokenType::KeywordThis, b"this"),
    (TokenType::KeywordThrow, b"throw"),
    (TokenType::KeywordTry, b"try"),
    (TokenType::KeywordTypeof, b"typeof"),
    (TokenType::KeywordVar, b"var"),
    (TokenType::KeywordVoid, b"void"),
    (TokenType::KeywordWhile, b"while"),
    (TokenType::KeywordWith, b"with"),
    (TokenType::KeywordYield, b"yield"),
    (TokenType::LiteralFalse, b"false"),
    (TokenType::LiteralNull, b"null"),
    (TokenType::LiteralTrue, b"true"),
];

const RADIX_PREFIXES: &[(TokenType, &[u8])] = &[
    (TokenType::LiteralNumberBin, b"0b"),
    (TokenType::LiteralNumberBin, b"0B"),
    (TokenType::LiteralNumberHex, b"0x"),
    (TokenType::LiteralNumberHex, b"0X"),
    (TokenType::LiteralNumberOct, b"0o"),
    (TokenType::LiteralNumberOct, b"0O"),
];

lazy_static! {
    pub static ref KEYWORD_STRS: HashSet<&'static [u8]> =
        KEYWORD_TEXT.iter().map(|(_, text)| *text).collect();

    // Index into this list is the pattern ID reported by MATCHER.
    static ref PATTERNS: Vec<(TokenType, &'static [u8])> = {
        let mut patterns: Vec<(TokenType, &'static [u8])> = Vec::new();
        patterns.extend_from_slice(OPERATOR_TEXT);
        patterns.extend_from_slice(KEYWORD_TEXT);
        patterns.extend_from_slice(RADIX_PREFIXES);
        patterns.push((TokenType::CommentMultiple, b"/*"));
        patterns.push((TokenType::CommentSingle, b"//"));
        for c in ID_START_CHARSTR.chunks(1) {
            patterns.push((TokenType::Identifier, c));
        };
        for c in DIGIT_CHARSTR.chunks(1) {
            patterns.push((TokenType::LiteralNumber, c));
        };
        // `.5` is a number, not a member access.
        for c in b".0.1.2.3.4.5.6.7.8.9".chunks(2) {
            patterns.push((TokenType::LiteralNumber, c));
        };
        // `a?.5:b` is a conditional, not an optional chain.
        for c in b"?.0?.1?.2?.3?.4?.5?.6?.7?.8?.9".chunks(3) {
            patterns.push((TokenType::Question, c));
        };
        patterns.push((TokenType::LiteralString, b"\""));
        patterns.push((TokenType::LiteralString, b"'"));
        patterns.push((TokenType::LiteralTemplatePartString, b"`"));
        patterns
    };

    static ref MATCHER: AhoCorasick = AhoCorasickBuilder::new()
        .anchored(true)
        .dfa(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(PATTERNS.iter().map(|(_, pat)| pat));

    static ref COMMENT_END: AhoCorasick = AhoCorasick::new(&[b"*/"]);
}

// Returns whether the comment spans a line terminator.
fn lex_multiple_comment(lexer: &mut Lexer) -> SyntaxResult<bool> {
    // Consume `/*`.
    lexer.skip_expect(2);
    let m = COMMENT_END
        .find(&lexer.code()[lexer.next..])
        .ok_or_else(|| lexer.error(SyntaxErrorType::UnexpectedEnd))?;
    // WARNING: Does not consider other line terminators allowed by ECMAScript.
    let has_newline = memchr(b'\n', &lexer.code()[lexer.next..lexer.next + m.start()]).is_some();
    lexer.consume(Match { len: m.end() });
    Ok(has_newline)
}

fn lex_single_comment(lexer: &mut Lexer) {
    // Consume `//`.
    lexer.skip_expect(2);
    // WARNING: Does not consider other line terminators allowed by ECMAScript.
    let len = memchr(b'\n', &lexer.code()[lexer.next..])
        .map(|pos| pos + 1)
        .unwrap_or(lexer.remaining());
    lexer.consume(Match { len });
}

fn consume_identifier_rest(lexer: &mut Lexer) {
    // Non-ASCII bytes are assumed to be part of a UTF-8 sequence encoding a valid identifier code
    // point.
    let len = lexer.code()[lexer.next..]
        .iter()
        .position(|c| !is_identifier_byte(*c))
        .unwrap_or(lexer.remaining());
    lexer.consume(Match { len });
}

fn lex_identifier(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> Token {
    let cp = lexer.checkpoint();
    // Consume starter.
    lexer.skip_expect(1);
    consume_identifier_rest(lexer);
    Token::new(
        lexer.since_checkpoint(cp),
        TokenType::Identifier,
        preceded_by_line_terminator,
    )
}

// Consumes an optional BigInt suffix and rejects a number immediately followed by an identifier,
// like `3in`.
fn finish_number(
    lexer: &mut Lexer,
    cp: LexerCheckpoint,
    allow_bigint: bool,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let mut typ = TokenType::LiteralNumber;
    if allow_bigint && lexer.peek_or_eof(0) == Some(b'n') {
        lexer.skip_expect(1);
        typ = TokenType::LiteralBigInt;
    };
    if lexer.peek_or_eof(0).filter(|c| is_identifier_byte(*c)).is_some() {
        return Err(lexer.error(if typ == TokenType::LiteralBigInt {
            SyntaxErrorType::MalformedLiteralBigInt
        } else {
            SyntaxErrorType::MalformedLiteralNumber
        }));
    };
    Ok(Token::new(
        lexer.since_checkpoint(cp),
        typ,
        preceded_by_line_terminator,
    ))
}

fn lex_number(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.consume(lexer.while_chars(&DIGIT_SEP));
    let mut is_integer = true;
    let dot = lexer.if_char(b'.');
    if dot.len > 0 {
        is_integer = false;
        lexer.consume(dot);
        lexer.consume(lexer.while_chars(&DIGIT_SEP));
    };
    if let Some(b'e' | b'E') = lexer.peek_or_eof(0) {
        is_integer = false;
        lexer.skip_expect(1);
        if let Some(b'+' | b'-') = lexer.peek_or_eof(0) {
            lexer.skip_expect(1);
        };
        let exp = lexer.while_chars(&DIGIT_SEP);
        if exp.len == 0 {
            return Err(lexer.error(SyntaxErrorType::MalformedLiteralNumber));
        };
        lexer.consume(exp);
    };
    finish_number(lexer, cp, is_integer, preceded_by_line_terminator)
}

fn lex_radix_number(
    lexer: &mut Lexer,
    digits: &CharFilter,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    // Consume `0x`, `0b` or `0o`.
    lexer.skip_expect(2);
    let m = lexer.while_chars(digits);
    if m.len == 0 {
        return Err(lexer.error(SyntaxErrorType::MalformedLiteralNumber));
    };
    lexer.consume(m);
    finish_number(lexer, cp, true, preceded_by_line_terminator)
}

fn lex_private_member(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    // Include the `#` in the token.
    lexer.skip_expect(1);
    let c = lexer.peek(0)?;
    if c.is_ascii() && !ID_START.has(c) {
        return Err(lexer.error(SyntaxErrorType::ExpectedSyntax("private member")));
    };
    lexer.skip_expect(1);
    consume_identifier_rest(lexer);
    Ok(Token::new(
        lexer.since_checkpoint(cp),
        TokenType::PrivateMember,
        preceded_by_line_terminator,
    ))
}

fn lex_regex(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    // Consume slash.
    lexer.skip_expect(1);
    let mut in_charset = false;
    loop {
        // WARNING: Does not consider other line terminators allowed by ECMAScript.
        match lexer.consume_next()? {
            b'\\' => {
                if lexer.peek(0)? == b'\n' {
                    return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex));
                };
                lexer.skip_expect(1);
            }
            b'/' if !in_charset => break,
            b'[' => in_charset = true,
            b']' if in_charset => in_charset = false,
            b'\n' => return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex)),
            _ => {}
        };
    }
    // Flags.
    lexer.consume(lexer.while_chars(&ID_CONTINUE));
    Ok(Token::new(
        lexer.since_checkpoint(cp),
        TokenType::LiteralRegex,
        preceded_by_line_terminator,
    ))
}

fn lex_string(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    let quote = lexer.consume_next()?;
    loop {
        // WARNING: Does not consider other line terminators allowed by ECMAScript.
        lexer.consume(lexer.while_not_3_chars(b'\\', b'\n', quote));
        match lexer.consume_next()? {
            b'\\' => {
                // Escaped character, which may be a line continuation.
                lexer.consume_next()?;
            }
            b'\n' => return Err(lexer.error(SyntaxErrorType::LineTerminatorInString)),
            _ => break,
        };
    }
    Ok(Token::new(
        lexer.since_checkpoint(cp),
        TokenType::LiteralString,
        preceded_by_line_terminator,
    ))
}

/// Lexes the raw text of a template from the current position up to and including the next `${`
/// or closing backtick. The token's range excludes those delimiters. Called by the parser after
/// the `}` that closes a substitution.
pub fn lex_template_string_continue(
    lexer: &mut Lexer,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    loop {
        lexer.consume(lexer.while_not_3_chars(b'\\', b'`', b'$'));
        match lexer.peek(0)? {
            b'\\' => {
                lexer.skip_expect(1);
                lexer.consume_next()?;
            }
            b'`' => {
                let loc = lexer.since_checkpoint(cp);
                lexer.skip_expect(1);
                return Ok(Token::new(
                    loc,
                    TokenType::LiteralTemplatePartStringEnd,
                    preceded_by_line_terminator,
                ));
            }
            _ => {
                if lexer.peek(1)? == b'{' {
                    let loc = lexer.since_checkpoint(cp);
                    lexer.skip_expect(2);
                    return Ok(Token::new(
                        loc,
                        TokenType::LiteralTemplatePartString,
                        preceded_by_line_terminator,
                    ));
                };
                lexer.skip_expect(1);
            }
        };
    }
}

fn lex_template(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    // Consume backtick.
    lexer.skip_expect(1);
    lex_template_string_continue(lexer, preceded_by_line_terminator)
}

pub fn lex_next(lexer: &mut Lexer, mode: LexMode) -> SyntaxResult<Token> {
    let mut preceded_by_line_terminator = false;
    loop {
        let ws = lexer.while_chars(&WHITESPACE);
        // WARNING: Does not consider other line terminators allowed by ECMAScript.
        preceded_by_line_terminator |=
            memchr(b'\n', &lexer.code()[lexer.next..lexer.next + ws.len]).is_some();
        lexer.consume(ws);

        if lexer.at_end() {
            return Ok(Token::new(
                lexer.eof_range(),
                TokenType::EOF,
                preceded_by_line_terminator,
            ));
        };

        // Any non-ASCII start byte is assumed to begin an identifier.
        if lexer.peek_or_eof(0).filter(|c| !c.is_ascii()).is_some() {
            return Ok(lex_identifier(lexer, preceded_by_line_terminator));
        };

        let m = MATCHER
            .find(&lexer.code()[lexer.next..])
            .ok_or_else(|| lexer.error(SyntaxErrorType::ExpectedNotFound))?;
        let mut mat = Match { len: m.end() };
        match PATTERNS[m.pattern()].0 {
            TokenType::CommentMultiple => {
                preceded_by_line_terminator |= lex_multiple_comment(lexer)?;
            }
            TokenType::CommentSingle => {
                // The comment consumes its line terminator, so whatever follows is on a new line.
                preceded_by_line_terminator = true;
                lex_single_comment(lexer);
            }
            TokenType::Identifier => return Ok(lex_identifier(lexer, preceded_by_line_terminator)),
            TokenType::LiteralNumber => return lex_number(lexer, preceded_by_line_terminator),
            TokenType::LiteralNumberBin => {
                return lex_radix_number(lexer, &DIGIT_BIN, preceded_by_line_terminator)
            }
            TokenType::LiteralNumberHex => {
                return lex_radix_number(lexer, &DIGIT_HEX, preceded_by_line_terminator)
            }
            TokenType::LiteralNumberOct => {
                return lex_radix_number(lexer, &DIGIT_OCT, preceded_by_line_terminator)
            }
            TokenType::LiteralString => return lex_string(lexer, preceded_by_line_terminator),
            TokenType::LiteralTemplatePartString => {
                return lex_template(lexer, preceded_by_line_terminator)
            }
            TokenType::PrivateMember => {
                return lex_private_member(lexer, preceded_by_line_terminator)
            }
            TokenType::Slash | TokenType::SlashEquals if mode == LexMode::SlashIsRegex => {
                return lex_regex(lexer, preceded_by_line_terminator);
            }
            typ => {
                if typ == TokenType::Question && mat.len != 1 {
                    // We've matched `?.[0-9]`.
                    mat = Match { len: 1 };
                } else if typ.is_word()
                    && lexer
                        .peek_or_eof(mat.len)
                        .filter(|c| is_identifier_byte(*c))
                        .is_some()
                {
                    // We've matched a keyword that is only a prefix of an identifier.
                    return Ok(lex_identifier(lexer, preceded_by_line_terminator));
                };
                let loc = lexer.source.range(lexer.next, lexer.next + mat.len);
                lexer.consume(mat);
                return Ok(Token::new(loc, typ, preceded_by_line_terminator));
            }
        };
    }
}
