// Nullability, FIRST(k) strings, truncated concatenation and follow contexts.

use crate::error::{LlkError, Result};
use crate::grammar::{Grammar, NontermId, Rule, Symbol, TermId};
use std::collections::BTreeSet;

/// A terminal string of at most `k` symbols: a prefix of some derivable string.
///
/// A string shorter than `k` means every derivation it stands for ended there;
/// the empty string stands for ε (end of input once concatenated with a follow
/// context).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirstKString {
    terms: Vec<TermId>,
    k: usize,
}

impl FirstKString {
    /// The empty string with capacity `k`.
    pub fn empty(k: usize) -> Self {
        Self {
            terms: Vec::with_capacity(k),
            k,
        }
    }

    /// Builds a string from `terms`, truncated to `k` symbols.
    pub fn from_terms(terms: &[TermId], k: usize) -> Self {
        Self {
            terms: terms[..terms.len().min(k)].to_vec(),
            k,
        }
    }

    /// Appends a terminal; returns `false` and leaves the string unchanged when
    /// it is already full.
    pub fn push(&mut self, term: TermId) -> bool {
        if self.is_complete() {
            return false;
        }
        self.terms.push(term);
        true
    }

    pub fn terms(&self) -> &[TermId] {
        &self.terms
    }

    pub fn first(&self) -> Option<TermId> {
        self.terms.first().copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Remaining room before the string holds `k` symbols.
    pub fn capacity(&self) -> usize {
        self.k - self.terms.len()
    }

    pub fn is_complete(&self) -> bool {
        self.terms.len() >= self.k
    }
}

/// A set of k-strings with structural equality, ordered for stable output.
pub type KSet = BTreeSet<FirstKString>;

/// Continuations after one nonterminal occurrence of a rule's right side.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FollowContext {
    pub nonterm: NontermId,
    pub set: KSet,
}

/// Nullable flag per nonterminal, computed by fixpoint.
pub fn nullable(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.nonterminals().len()];
    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules() {
            if nullable[rule.lhs.0] {
                continue;
            }
            let all_nullable = rule.rhs.iter().all(|sym| match sym {
                Symbol::Term(_) => false,
                Symbol::NonTerm(n) => nullable[n.0],
            });
            if all_nullable {
                nullable[rule.lhs.0] = true;
                changed = true;
            }
        }
    }
    nullable
}

/// Nonterminals a derivation of `rhs` can start with without consuming input:
/// the leading run of nonterminals, up to and including the first one that is
/// not nullable.
pub(crate) fn left_corners(rhs: &[Symbol], nullable: &[bool]) -> Vec<NontermId> {
    let mut corners = Vec::new();
    for &sym in rhs {
        match sym {
            Symbol::Term(_) => break,
            Symbol::NonTerm(n) => {
                corners.push(n);
                if !nullable[n.0] {
                    break;
                }
            }
        }
    }
    corners
}

enum Step {
    Sym(Symbol),
    /// leaves the innermost open nonterminal
    Leave,
}

struct Branch {
    prefix: FirstKString,
    /// stack: next symbol on top
    pending: Vec<Step>,
    /// open nonterminals with the prefix length at entry
    chain: Vec<(NontermId, usize)>,
}

/// FIRST(k) of the symbol string `alpha`.
///
/// Every returned string has at most `k` terminals. Each nonterminal occurrence
/// branches once per rule; a branch stops expanding as soon as its prefix is
/// complete. Entering a nonterminal that is still open with nothing consumed
/// since means left recursion, which [`GrammarBuilder`](crate::GrammarBuilder)
/// already rules out; it is reported rather than looped on.
pub fn first(grammar: &Grammar, alpha: &[Symbol], k: usize) -> Result<KSet> {
    let mut result = KSet::new();
    let mut work = vec![Branch {
        prefix: FirstKString::empty(k),
        pending: alpha.iter().rev().map(|&sym| Step::Sym(sym)).collect(),
        chain: Vec::new(),
    }];

    while let Some(mut branch) = work.pop() {
        loop {
            if branch.prefix.is_complete() {
                result.insert(branch.prefix);
                break;
            }
            match branch.pending.pop() {
                None => {
                    result.insert(branch.prefix);
                    break;
                }
                Some(Step::Leave) => {
                    branch.chain.pop();
                }
                Some(Step::Sym(Symbol::Term(t))) => {
                    branch.prefix.push(t);
                }
                Some(Step::Sym(Symbol::NonTerm(n))) => {
                    let at = branch.prefix.len();
                    if branch.chain.iter().any(|&(open, entry)| open == n && entry == at) {
                        return Err(LlkError::LeftRecursive(grammar.nonterm_name(n).to_owned()));
                    }
                    // pushed in reverse so the first rule is explored first
                    for rule in grammar.rules_for(n).rev() {
                        let mut pending = Vec::with_capacity(branch.pending.len() + rule.rhs.len() + 1);
                        pending.extend(branch.pending.iter().map(Step::copy));
                        pending.push(Step::Leave);
                        pending.extend(rule.rhs.iter().rev().map(|&sym| Step::Sym(sym)));
                        let mut chain = branch.chain.clone();
                        chain.push((n, at));
                        work.push(Branch {
                            prefix: branch.prefix.clone(),
                            pending,
                            chain,
                        });
                    }
                    break;
                }
            }
        }
    }
    Ok(result)
}

impl Step {
    fn copy(&self) -> Step {
        match self {
            Step::Sym(sym) => Step::Sym(*sym),
            Step::Leave => Step::Leave,
        }
    }
}

/// Pairwise truncated concatenation: every `s1` followed by as much of every
/// `s2` as fits into `k` symbols.
pub fn first_plus(s1: &KSet, s2: &KSet, k: usize) -> KSet {
    let mut result = KSet::new();
    for a in s1 {
        for b in s2 {
            let mut joined = FirstKString::empty(k);
            for &t in a.terms().iter().chain(b.terms()) {
                if !joined.push(t) {
                    break;
                }
            }
            result.insert(joined);
        }
    }
    result
}

/// One follow context per nonterminal occurrence in `rule`'s right side, given
/// the follow set `l` of the rule's left side.
pub fn follow(grammar: &Grammar, rule: &Rule, l: &KSet, k: usize) -> Result<Vec<FollowContext>> {
    let mut contexts = Vec::new();
    for (i, &sym) in rule.rhs.iter().enumerate() {
        if let Symbol::NonTerm(nonterm) = sym {
            let rest = first(grammar, &rule.rhs[i + 1..], k)?;
            contexts.push(FollowContext {
                nonterm,
                set: first_plus(&rest, l, k),
            });
        }
    }
    Ok(contexts)
}

/// The follow set of the start symbol: just ε.
pub fn end_of_input(k: usize) -> KSet {
    KSet::from([FirstKString::empty(k)])
}
