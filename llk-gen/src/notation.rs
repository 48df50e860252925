//! Grammar text notation.
//!
//! A grammar file declares its terminals, then lists its rules yacc-style:
//!
//! ```text
//! -- comment to end of line
//! %token a b c
//! %%
//! S : a S b
//!   |            -- empty alternative
//!   ;
//! E : T "+" E | T ;
//! ```
//!
//! Quoted literals are always terminals; an identifier is a terminal iff a
//! `%token` line declares it. The parsed file is replayed into a
//! [`GrammarBuilder`] as a sequence of [`Event`]s.

pub mod lexer;
pub mod parser;

use anyhow::Result;
use llk::{Grammar, GrammarBuilder, SymbolRef};
use smartstring::alias::String;
use thiserror::Error;

pub use parser::{Notation, RuleDef};

/// Errors in grammar text, with the 1-based line they occur on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("line {line}: unrecognized input {text:?}")]
    Lex { line: usize, text: std::string::String },

    #[error("line {line}: {message}")]
    Syntax {
        line: usize,
        message: std::string::String,
    },
}

impl NotationError {
    pub fn line(&self) -> usize {
        match self {
            NotationError::Lex { line, .. } | NotationError::Syntax { line, .. } => *line,
        }
    }
}

/// One construction step for a [`GrammarBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Terminals(Vec<String>),
    /// An alternative waiting for the left side of the next full rule.
    HalfRule(Vec<SymbolRef>),
    Rule {
        left: SymbolRef,
        right: Vec<SymbolRef>,
    },
}

impl Notation {
    /// Construction events in the order a bottom-up parser of the notation
    /// would emit them: the terminal declarations, then for every rule the
    /// alternatives `n..=2` as half-rules followed by alternative 1 as the full
    /// rule.
    pub fn events(self) -> Vec<Event> {
        let mut events = vec![Event::Terminals(self.terminals)];
        for rule in self.rules {
            let mut alternatives = rule.alternatives.into_iter();
            let first = alternatives.next().unwrap_or_default();
            let mut rest: Vec<_> = alternatives.map(Event::HalfRule).collect();
            rest.reverse();
            events.extend(rest);
            events.push(Event::Rule {
                left: SymbolRef::name(rule.lhs),
                right: first,
            });
        }
        events
    }
}

/// Replays `events` into `builder`.
pub fn feed(builder: &mut GrammarBuilder, events: Vec<Event>) -> llk::Result<()> {
    for event in events {
        match event {
            Event::Terminals(values) => builder.declare_terminals(values),
            Event::HalfRule(right) => builder.half_rule(right),
            Event::Rule { left, right } => builder.rule(left, right)?,
        }
    }
    Ok(())
}

/// Lexes, parses and validates grammar text.
///
/// Errors are either a [`NotationError`] or an [`llk::LlkError`], unwrapped, so
/// callers can downcast them.
pub fn read_grammar(text: &str) -> Result<Grammar> {
    let lexed = lexer::Lexer::tokenize_all(text)?;
    let notation = parser::parse(&lexed)?;
    log::debug!("notation: {} rules", notation.rules.len());
    let mut builder = GrammarBuilder::new();
    feed(&mut builder, notation.events())?;
    Ok(builder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use llk::LlkError;

    fn n(value: &str) -> SymbolRef {
        SymbolRef::name(value)
    }

    #[test]
    fn events_replay_alternatives_backwards() {
        let lexed = lexer::Lexer::tokenize_all("%token a b c\n%%\nS : a | b | c ;\n").unwrap();
        let events = parser::parse(&lexed).unwrap().events();
        assert_eq!(
            events,
            vec![
                Event::Terminals(vec!["a".into(), "b".into(), "c".into()]),
                Event::HalfRule(vec![n("c")]),
                Event::HalfRule(vec![n("b")]),
                Event::Rule {
                    left: n("S"),
                    right: vec![n("a")],
                },
            ]
        );
    }

    #[test]
    fn rules_keep_textual_order() {
        let grammar = read_grammar("%token a b\n%%\nS : a S b | ;\nT : S | a ;\n").unwrap();
        let rendered: Vec<_> = grammar
            .rules()
            .iter()
            .map(|rule| grammar.display_rule(rule).to_string())
            .collect();
        assert_eq!(
            rendered,
            vec!["1: S -> a S b", "2: S -> ε", "3: T -> S", "4: T -> a"]
        );
    }

    #[test]
    fn errors_surface_unchanged() {
        let err = read_grammar("%%\nS : a ?\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<NotationError>().map(NotationError::line),
            Some(2)
        );

        let err = read_grammar("%token a\n%%\nA : A a | a ;\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LlkError>(),
            Some(&LlkError::LeftRecursive("A".to_owned()))
        );

        let err = read_grammar("%token a\n%%\na : a ;\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LlkError>(),
            Some(&LlkError::TerminalOnLeft("a".to_owned()))
        );
    }
}
