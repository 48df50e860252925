//! Grammar model: interned symbols, numbered rules and the grammar container.
//!
//! A [`Grammar`] can only be obtained from
//! [`GrammarBuilder::finish`](crate::GrammarBuilder::finish), so every value of
//! this type has passed the validation pipeline: the start symbol is the left
//! side of the first rule, rules are pairwise distinct, every nonterminal used
//! on a right-hand side has rules, and no nonterminal is left recursive.

use crate::error::{LlkError, Result};
use crate::symtab::{SymbolId, Symtab};
use std::fmt;

/// Index of a terminal in [`Grammar::terminals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub usize);

/// Index of a nonterminal in [`Grammar::nonterminals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NontermId(pub usize);

impl SymbolId for TermId {
    fn from_index(idx: usize) -> Self {
        TermId(idx)
    }
    fn index(self) -> usize {
        self.0
    }
}

impl SymbolId for NontermId {
    fn from_index(idx: usize) -> Self {
        NontermId(idx)
    }
    fn index(self) -> usize {
        self.0
    }
}

/// Kind of a grammar symbol, fixed once resolved by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

/// A resolved symbol occurrence on a right-hand side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Term(TermId),
    NonTerm(NontermId),
}

impl Symbol {
    pub fn kind(self) -> SymbolKind {
        match self {
            Symbol::Term(_) => SymbolKind::Terminal,
            Symbol::NonTerm(_) => SymbolKind::Nonterminal,
        }
    }
}

/// One production `lhs -> rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Position in insertion order, starting at 1.
    pub number: usize,
    pub lhs: NontermId,
    /// Possibly empty (ε).
    pub rhs: Vec<Symbol>,
}

/// A validated context-free grammar.
#[derive(Clone, Debug)]
pub struct Grammar {
    terms: Symtab<TermId>,
    nonterms: Symtab<NontermId>,
    rules: Vec<Rule>,
    /// rule indices per nonterminal, in rule order
    by_lhs: Vec<Vec<usize>>,
    start: NontermId,
}

impl Grammar {
    /// Assembles a grammar from already interned parts.
    ///
    /// Callers guarantee that `rules` is non-empty and numbered `1..=n`.
    pub(crate) fn new(terms: Symtab<TermId>, nonterms: Symtab<NontermId>, rules: Vec<Rule>) -> Self {
        let mut by_lhs = vec![Vec::new(); nonterms.len()];
        for (i, rule) in rules.iter().enumerate() {
            by_lhs[rule.lhs.0].push(i);
        }
        let start = rules[0].lhs;
        Self {
            terms,
            nonterms,
            rules,
            by_lhs,
            start,
        }
    }

    pub fn terminals(&self) -> &Symtab<TermId> {
        &self.terms
    }

    pub fn nonterminals(&self) -> &Symtab<NontermId> {
        &self.nonterms
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks a rule up by its 1-based number.
    pub fn rule(&self, number: usize) -> Option<&Rule> {
        number.checked_sub(1).and_then(|i| self.rules.get(i))
    }

    /// Rules with `lhs` on the left, in rule order; none for an id this grammar
    /// never issued.
    pub fn rules_for(&self, lhs: NontermId) -> impl DoubleEndedIterator<Item = &Rule> + '_ {
        self.by_lhs
            .get(lhs.0)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.rules.get(i))
    }

    pub fn start(&self) -> NontermId {
        self.start
    }

    pub fn term_name(&self, id: TermId) -> &str {
        self.terms.sym(id).unwrap_or("?")
    }

    pub fn nonterm_name(&self, id: NontermId) -> &str {
        self.nonterms.sym(id).unwrap_or("?")
    }

    pub fn symbol_name(&self, sym: Symbol) -> &str {
        match sym {
            Symbol::Term(t) => self.term_name(t),
            Symbol::NonTerm(n) => self.nonterm_name(n),
        }
    }

    /// Maps terminal names to ids, e.g. to feed a pushdown driver.
    pub fn tokenize<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<TermId>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.terms
                    .idx(name)
                    .ok_or_else(|| LlkError::UnknownTerminal(name.to_owned()))
            })
            .collect()
    }

    /// Displays a rule as `number: lhs -> rhs`, with `ε` for an empty right side.
    pub fn display_rule<'a>(&'a self, rule: &'a Rule) -> DisplayRule<'a> {
        DisplayRule { grammar: self, rule }
    }
}

pub struct DisplayRule<'a> {
    grammar: &'a Grammar,
    rule: &'a Rule,
}

impl fmt::Display for DisplayRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ->",
            self.rule.number,
            self.grammar.nonterm_name(self.rule.lhs)
        )?;
        if self.rule.rhs.is_empty() {
            return write!(f, " ε");
        }
        for &sym in &self.rule.rhs {
            write!(f, " {}", self.grammar.symbol_name(sym))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GrammarBuilder, SymbolRef};

    fn a_s_b() -> Grammar {
        let mut builder = GrammarBuilder::new();
        builder.declare_terminals(["a", "b"]);
        builder
            .rule(
                SymbolRef::name("S"),
                [SymbolRef::name("a"), SymbolRef::name("S"), SymbolRef::name("b")],
            )
            .unwrap();
        builder.rule(SymbolRef::name("S"), Vec::<SymbolRef>::new()).unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn tokenize_known_terminals() {
        let g = a_s_b();
        assert_eq!(g.tokenize(&["a", "b", "a"]), Ok(vec![TermId(0), TermId(1), TermId(0)]));
        assert_eq!(g.tokenize::<&str>(&[]), Ok(vec![]));
    }

    #[test]
    fn tokenize_unknown_terminal() {
        let g = a_s_b();
        assert_eq!(
            g.tokenize(&["a", "zz"]),
            Err(LlkError::UnknownTerminal("zz".to_owned()))
        );
        // nonterminal names are not input
        assert_eq!(
            g.tokenize(&["S"]),
            Err(LlkError::UnknownTerminal("S".to_owned()))
        );
    }

    #[test]
    fn foreign_ids_do_not_panic() {
        let g = a_s_b();
        assert_eq!(g.rules_for(NontermId(0)).count(), 2);
        assert_eq!(g.rules_for(NontermId(7)).count(), 0);
        assert_eq!(g.rules_for(NontermId(7)).next_back(), None);
        assert_eq!(g.nonterm_name(NontermId(7)), "?");
        assert_eq!(g.term_name(TermId(7)), "?");
        assert!(g.rule(0).is_none());
        assert!(g.rule(3).is_none());
    }
}
