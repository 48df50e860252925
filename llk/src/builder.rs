//! Grammar construction from front-end events, and the validation pipeline.
//!
//! A notation front end drives a [`GrammarBuilder`] with
//! [`declare_terminals`](GrammarBuilder::declare_terminals), then any sequence
//! of [`rule`](GrammarBuilder::rule) and [`half_rule`](GrammarBuilder::half_rule)
//! calls, and finally [`finish`](GrammarBuilder::finish), which consumes the
//! builder. Nothing outlives a run.
//!
//! Symbol kinds are resolved when a rule arrives: a literal is always a
//! terminal, any other symbol is a terminal iff its value was declared before.
//! Terminals must therefore be declared before the rules that use them.
//!
//! Validation stages, each aborting the run:
//!
//! 1. terminal on the left side (checked by [`GrammarBuilder::rule`]);
//! 2. duplicate rules;
//! 3. nonterminals without rules;
//! 4. left recursion, direct or through nullable prefixes.
//!
//! # Example
//!
//! ```rust
//! use llk::{GrammarBuilder, SymbolRef};
//!
//! let mut builder = GrammarBuilder::new();
//! builder.declare_terminals(["a", "b"]);
//! builder
//!     .rule(SymbolRef::name("S"), [SymbolRef::name("a"), SymbolRef::name("S"), SymbolRef::name("b")])
//!     .unwrap();
//! builder.rule(SymbolRef::name("S"), Vec::<SymbolRef>::new()).unwrap();
//! let grammar = builder.finish().unwrap();
//! assert_eq!(grammar.rules().len(), 2);
//! assert_eq!(grammar.nonterm_name(grammar.start()), "S");
//! ```

use crate::error::{LlkError, Result};
use crate::grammar::{Grammar, NontermId, Rule, Symbol, SymbolKind, TermId};
use crate::sets;
use crate::symtab::Symtab;
use indexmap::IndexSet;
use smartstring::alias::String;
use std::collections::HashSet;

/// A symbol as delivered by a front end, before its kind is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRef {
    value: String,
    literal: bool,
}

impl SymbolRef {
    /// A named symbol; terminal iff its value has been declared.
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal: false,
        }
    }

    /// A literal value; always a terminal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

#[derive(Clone, Debug)]
struct Resolved {
    value: String,
    kind: SymbolKind,
}

#[derive(Clone, Debug)]
struct PendingRule {
    lhs: String,
    rhs: Vec<Resolved>,
}

/// Per-run grammar construction state.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    declared: IndexSet<String>,
    rules: Vec<PendingRule>,
    halves: Vec<Vec<Resolved>>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_terminals<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared.extend(values.into_iter().map(Into::into));
    }

    /// Number of rules accepted so far.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn resolve(&self, sym: SymbolRef) -> Resolved {
        let kind = if sym.literal || self.declared.contains(sym.value.as_str()) {
            SymbolKind::Terminal
        } else {
            SymbolKind::Nonterminal
        };
        Resolved {
            value: sym.value,
            kind,
        }
    }

    /// Holds an alternative whose left side arrives with the next full rule.
    pub fn half_rule(&mut self, right: impl IntoIterator<Item = SymbolRef>) {
        let rhs = right.into_iter().map(|sym| self.resolve(sym)).collect();
        self.halves.push(rhs);
    }

    /// Adds `left -> right`, then every held half-rule with the same left side
    /// in reverse arrival order.
    pub fn rule(&mut self, left: SymbolRef, right: impl IntoIterator<Item = SymbolRef>) -> Result<()> {
        let lhs = self.resolve(left);
        if lhs.kind == SymbolKind::Terminal {
            return Err(LlkError::TerminalOnLeft(lhs.value.to_string()));
        }
        let rhs = right.into_iter().map(|sym| self.resolve(sym)).collect();
        self.rules.push(PendingRule {
            lhs: lhs.value.clone(),
            rhs,
        });
        while let Some(rhs) = self.halves.pop() {
            self.rules.push(PendingRule {
                lhs: lhs.value.clone(),
                rhs,
            });
        }
        Ok(())
    }

    /// Validates the collected rules and produces the grammar.
    pub fn finish(self) -> Result<Grammar> {
        if !self.halves.is_empty() {
            return Err(LlkError::UnattachedAlternatives(self.halves.len()));
        }
        if self.rules.is_empty() {
            return Err(LlkError::EmptyGrammar);
        }
        check_duplicates(&self.rules)?;
        check_missing(&self.rules)?;
        let grammar = intern(self.rules);
        check_left_recursion(&grammar)?;
        log::debug!(
            "grammar: {} rules, {} terminals, {} nonterminals",
            grammar.rules().len(),
            grammar.terminals().len(),
            grammar.nonterminals().len()
        );
        Ok(grammar)
    }
}

fn check_duplicates(rules: &[PendingRule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        let key = (
            rule.lhs.as_str(),
            rule.rhs.iter().map(|sym| sym.value.as_str()).collect::<Vec<_>>(),
        );
        if !seen.insert(key) {
            return Err(LlkError::DuplicateRule(rule.lhs.to_string()));
        }
    }
    Ok(())
}

fn check_missing(rules: &[PendingRule]) -> Result<()> {
    let defined: HashSet<&str> = rules.iter().map(|rule| rule.lhs.as_str()).collect();
    for rule in rules {
        for sym in &rule.rhs {
            if sym.kind == SymbolKind::Nonterminal && !defined.contains(sym.value.as_str()) {
                return Err(LlkError::MissingRule(sym.value.to_string()));
            }
        }
    }
    Ok(())
}

/// Final pass: fills the symbol tables in order of first appearance.
fn intern(pending: Vec<PendingRule>) -> Grammar {
    let mut terms = Symtab::<TermId>::new();
    let mut nonterms = Symtab::<NontermId>::new();
    let rules = pending
        .into_iter()
        .enumerate()
        .map(|(i, rule)| {
            let lhs = nonterms.add(&rule.lhs);
            let rhs = rule
                .rhs
                .iter()
                .map(|sym| match sym.kind {
                    SymbolKind::Terminal => Symbol::Term(terms.add(&sym.value)),
                    SymbolKind::Nonterminal => Symbol::NonTerm(nonterms.add(&sym.value)),
                })
                .collect();
            Rule {
                number: i + 1,
                lhs,
                rhs,
            }
        })
        .collect();
    Grammar::new(terms, nonterms, rules)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    OnChain,
    Done,
}

/// Depth-first walk over the left-corner graph; a nonterminal met again while
/// still on the current chain is left recursive.
fn check_left_recursion(grammar: &Grammar) -> Result<()> {
    let nullable = sets::nullable(grammar);
    let corners: Vec<Vec<NontermId>> = grammar
        .nonterminals()
        .ids()
        .map(|n| {
            grammar
                .rules_for(n)
                .flat_map(|rule| sets::left_corners(&rule.rhs, &nullable))
                .collect()
        })
        .collect();

    let mut mark = vec![Mark::New; corners.len()];
    for rule in grammar.rules() {
        for root in sets::left_corners(&rule.rhs, &nullable) {
            if mark[root.0] != Mark::New {
                continue;
            }
            mark[root.0] = Mark::OnChain;
            let mut chain = vec![(root, 0usize)];
            while let Some(top) = chain.last_mut() {
                let (node, next) = *top;
                match corners[node.0].get(next) {
                    Some(&child) => {
                        top.1 += 1;
                        match mark[child.0] {
                            Mark::OnChain => {
                                return Err(LlkError::LeftRecursive(
                                    grammar.nonterm_name(child).to_owned(),
                                ));
                            }
                            Mark::New => {
                                mark[child.0] = Mark::OnChain;
                                chain.push((child, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        mark[node.0] = Mark::Done;
                        chain.pop();
                    }
                }
            }
        }
    }
    Ok(())
}
