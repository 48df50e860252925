use super::lexer::{Lexed, Token};
use super::NotationError;
use chumsky::prelude::*;
use chumsky::span::Span;
use llk::SymbolRef;
use smartstring::alias::String;

/// One rule as written: a left side and its alternatives in textual order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub lhs: String,
    pub alternatives: Vec<Vec<SymbolRef>>,
}

/// A parsed grammar file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notation {
    /// Declared terminal values, in declaration order.
    pub terminals: Vec<String>,
    pub rules: Vec<RuleDef>,
}

pub fn parser<'a>() -> impl Parser<'a, &'a [Token], Notation, extra::Err<Rich<'a, Token>>> {
    let name = select! { Token::Name(n) => n };

    let symbol = select! {
        Token::Name(n) => SymbolRef::name(n),
        Token::Literal(l) => SymbolRef::literal(l),
    };

    let decl_kw = select! { Token::Decl => () };
    let split = select! { Token::Split => () };
    let colon = select! { Token::Colon => () };
    let bar = select! { Token::Bar => () };
    let semi = select! { Token::Semi => () };

    let declared = select! {
        Token::Name(n) => n,
        Token::Literal(l) => l,
    };
    let decl = decl_kw.ignore_then(declared.repeated().at_least(1).collect::<Vec<_>>());

    let alternative = symbol.repeated().collect::<Vec<_>>();

    let rule = name
        .then_ignore(colon)
        .then(alternative.separated_by(bar).collect::<Vec<_>>())
        .then_ignore(semi)
        .map(|(lhs, alternatives)| RuleDef { lhs, alternatives });

    decl.repeated()
        .collect::<Vec<_>>()
        .then_ignore(split)
        .then(rule.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(decls, rules)| Notation {
            terminals: decls.into_iter().flatten().collect(),
            rules,
        })
}

/// Parses lexed tokens, mapping the first syntax error to its line.
pub fn parse(lexed: &Lexed) -> Result<Notation, NotationError> {
    parser()
        .parse(lexed.tokens.as_slice())
        .into_result()
        .map_err(|errs| {
            let Some(err) = errs.into_iter().next() else {
                return NotationError::Syntax {
                    line: lexed.last_line,
                    message: "invalid grammar".into(),
                };
            };
            let message = match err.found() {
                Some(token) => format!("unexpected `{}`", token),
                None => "unexpected end of input".into(),
            };
            NotationError::Syntax {
                line: lexed.line_of(err.span().start()),
                message,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::super::lexer::Lexer;
    use super::*;

    fn parse_text(text: &str) -> Result<Notation, NotationError> {
        parse(&Lexer::tokenize_all(text)?)
    }

    #[test]
    fn single_rule_with_empty_alternative() {
        let notation = parse_text("%token a b\n%%\nS : a S b | ;\n").unwrap();
        assert_eq!(notation.terminals, vec![String::from("a"), String::from("b")]);
        assert_eq!(notation.rules.len(), 1);
        let rule = &notation.rules[0];
        assert_eq!(rule.lhs, "S");
        assert_eq!(rule.alternatives.len(), 2);
        assert_eq!(
            rule.alternatives[0],
            vec![SymbolRef::name("a"), SymbolRef::name("S"), SymbolRef::name("b")]
        );
        assert!(rule.alternatives[1].is_empty());
    }

    #[test]
    fn several_declarations_and_literals() {
        let text = "%token id\n%token '+' \"*\"\n%%\nE : T \"+\" E | T ;\nT : id ;\n";
        let notation = parse_text(text).unwrap();
        assert_eq!(notation.terminals.len(), 3);
        assert_eq!(notation.rules.len(), 2);
        assert!(notation.rules[0].alternatives[0][1].is_literal());
        assert_eq!(notation.rules[1].lhs, "T");
    }

    #[test]
    fn no_declarations() {
        let notation = parse_text("%%\nS : 'x' ;").unwrap();
        assert!(notation.terminals.is_empty());
        assert_eq!(notation.rules[0].alternatives, vec![vec![SymbolRef::literal("x")]]);
    }

    #[test]
    fn missing_semicolon_reports_line() {
        let err = parse_text("%%\nS : a\nT : b ;\n").unwrap_err();
        // `T` is read as a symbol of S's alternative; the `:` on line 3 is unexpected
        assert_eq!(err.line(), 3);
        assert!(matches!(err, NotationError::Syntax { .. }));
    }

    #[test]
    fn missing_split_reports_end() {
        let err = parse_text("%token a\n").unwrap_err();
        assert_eq!(err.line(), 2);
    }
}
