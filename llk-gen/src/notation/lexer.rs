//! Lexer for grammar files.
//!
//! Built on [`logos`]: a private raw token enum recognizes the notation's
//! lexemes, and [`Lexer`] turns them into [`Token`]s while keeping the line
//! every token starts on. Whitespace and `--` comments are skipped.
//!
//! ```text
//! -- comment to end of line
//! %token a b
//! %%
//! S : a S b | ;
//! ```

use super::NotationError;
use logos::Logos;
use smartstring::alias::String;
use std::fmt;

/// Tokens of the grammar notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `%token`, introducing terminal declarations.
    Decl,
    /// `%%`, separating declarations from rules.
    Split,
    Colon,
    Bar,
    Semi,
    /// An identifier; terminal iff declared.
    Name(String),
    /// A quoted literal, without its quotes; always a terminal.
    Literal(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Decl => f.write_str("%token"),
            Token::Split => f.write_str("%%"),
            Token::Colon => f.write_str(":"),
            Token::Bar => f.write_str("|"),
            Token::Semi => f.write_str(";"),
            Token::Name(name) => f.write_str(name),
            Token::Literal(value) => write!(f, "'{}'", value),
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum LogosToken {
    #[regex(r"\n")]
    LineFeed,

    #[regex(r"--[^\n]*")]
    Comment,

    #[token("%token")]
    Decl,

    #[token("%%")]
    Split,

    #[token(":")]
    Colon,

    #[token("|")]
    Bar,

    #[token(";")]
    Semi,

    #[regex(r"[A-Za-z_][A-Za-z0-9_']*")]
    Name,

    #[regex(r"'[^'\n]+'")]
    SingleQuoted,

    #[regex(r#""[^"\n]+""#)]
    DoubleQuoted,
}

/// Tokens of a whole input with the line each one starts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    /// `lines[i]` is the 1-based line of `tokens[i]`.
    pub lines: Vec<usize>,
    /// Line of the end of input.
    pub last_line: usize,
}

impl Lexed {
    /// Line of the token at `idx`, or of the end of input past the last token.
    pub fn line_of(&self, idx: usize) -> usize {
        self.lines.get(idx).copied().unwrap_or(self.last_line)
    }
}

pub struct Lexer<'source> {
    inner: logos::Lexer<'source, LogosToken>,
    line: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            line: 1,
        }
    }

    /// Current line, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next token, `Ok(None)` at end of input.
    ///
    /// # Errors
    /// [`NotationError::Lex`] on a character sequence no token matches.
    pub fn next_token(&mut self) -> Result<Option<Token>, NotationError> {
        while let Some(kind) = self.inner.next() {
            let slice = self.inner.slice();
            let token = match kind {
                Ok(LogosToken::LineFeed) => {
                    self.line += 1;
                    continue;
                }
                Ok(LogosToken::Comment) => continue,
                Ok(LogosToken::Decl) => Token::Decl,
                Ok(LogosToken::Split) => Token::Split,
                Ok(LogosToken::Colon) => Token::Colon,
                Ok(LogosToken::Bar) => Token::Bar,
                Ok(LogosToken::Semi) => Token::Semi,
                Ok(LogosToken::Name) => Token::Name(slice.into()),
                Ok(LogosToken::SingleQuoted | LogosToken::DoubleQuoted) => {
                    Token::Literal(slice[1..slice.len() - 1].into())
                }
                Err(()) => {
                    return Err(NotationError::Lex {
                        line: self.line,
                        text: slice.into(),
                    });
                }
            };
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// Lexes all of `input`.
    pub fn tokenize_all(input: &'source str) -> Result<Lexed, NotationError> {
        let mut lex = Lexer::new(input);
        let mut out = Lexed::default();
        while let Some(token) = lex.next_token()? {
            out.tokens.push(token);
            out.lines.push(lex.line());
        }
        out.last_line = lex.line();
        log::debug!("lexed {} tokens over {} lines", out.tokens.len(), out.last_line);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Token {
        Token::Name(s.into())
    }

    #[test]
    fn declarations_and_rules() {
        let input = "%token a b\n%%\nS : a S b\n  | ;\n";
        let lexed = Lexer::tokenize_all(input).unwrap();
        assert_eq!(
            lexed.tokens,
            vec![
                Token::Decl,
                name("a"),
                name("b"),
                Token::Split,
                name("S"),
                Token::Colon,
                name("a"),
                name("S"),
                name("b"),
                Token::Bar,
                Token::Semi,
            ]
        );
        assert_eq!(lexed.lines, vec![1, 1, 1, 2, 3, 3, 3, 3, 3, 4, 4]);
        assert_eq!(lexed.last_line, 5);
    }

    #[test]
    fn literals_comments_and_primes() {
        let input = "-- header\nE' : \"+\" T E' | '(' ; -- trailing\n";
        let lexed = Lexer::tokenize_all(input).unwrap();
        assert_eq!(
            lexed.tokens,
            vec![
                name("E'"),
                Token::Colon,
                Token::Literal("+".into()),
                name("T"),
                name("E'"),
                Token::Bar,
                Token::Literal("(".into()),
                Token::Semi,
            ]
        );
        assert!(lexed.lines.iter().all(|&line| line == 2));
    }

    #[test]
    fn unrecognized_character_reports_line() {
        let err = Lexer::tokenize_all("%%\nS : a\n  # ;\n").unwrap_err();
        assert_eq!(
            err,
            NotationError::Lex {
                line: 3,
                text: "#".into()
            }
        );
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn display_round_trips_punctuation() {
        let shown: Vec<_> = [Token::Decl, Token::Split, Token::Bar, Token::Literal("x".into())]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(shown, vec!["%token", "%%", "|", "'x'"]);
    }
}
