//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! LL(k) parsing tables.
//!
//! `llk` turns a context-free grammar into the canonical LL(k) parsing table
//! and into its extended form, a pushdown automaton that reads one input
//! symbol per step:
//!  * [`GrammarBuilder`] collects rules and validates them into a [`Grammar`];
//!  * [`ParsingTable`] discovers the canonical states `(nonterminal, follow set)`
//!    and fills the {Accept, Pop, Expand} table;
//!  * [`ExtendedParsingTable`] re-indexes it with an extra Change action;
//!  * [`parse`] and [`parse_extended`] run either table over input.
//!
//! # Example
//!
//! ```rust
//! use llk::{GrammarBuilder, SymbolRef, build_tables, parse};
//!
//! let mut builder = GrammarBuilder::new();
//! builder.declare_terminals(["a", "b"]);
//! let sym = SymbolRef::name;
//! builder.rule(sym("S"), [sym("a"), sym("S"), sym("b")]).unwrap();
//! builder.rule(sym("S"), Vec::<SymbolRef>::new()).unwrap();
//! let grammar = builder.finish().unwrap();
//!
//! let tables = build_tables(&grammar, 1).unwrap();
//! let input = grammar.tokenize(&["a", "b"]).unwrap();
//! let (derivation, _) = parse(&grammar, &tables.standard, &input).unwrap();
//! assert_eq!(derivation.rules, vec![1, 2]);
//! ```

mod builder;
mod config;
mod driver;
mod error;
mod extended;
mod grammar;
mod sets;
mod symtab;
mod table;

pub use crate::builder::{GrammarBuilder, SymbolRef};
pub use crate::config::{Config, MAX_K, OutputDetail, check_k};
pub use crate::driver::{Derivation, DriverStats, parse, parse_extended};
pub use crate::error::{LlkError, Result};
pub use crate::extended::{BufSym, ExtAction, ExtRow, ExtendedParsingTable, format_buffer};
pub use crate::grammar::{DisplayRule, Grammar, NontermId, Rule, Symbol, SymbolKind, TermId};
pub use crate::sets::{FirstKString, FollowContext, KSet, end_of_input, first, first_plus, follow, nullable};
pub use crate::symtab::{SymbolId, Symtab};
pub use crate::table::{
    Action, LlkState, ParsingTable, PushdownSymbol, StateId, StateKey, TableRow, format_lookahead,
};

/// Both table forms for one grammar and lookahead length.
#[derive(Clone, Debug)]
pub struct Tables {
    pub standard: ParsingTable,
    pub extended: ExtendedParsingTable,
}

/// Builds the standard table and, when it is deterministic, the extended one.
///
/// # Errors
/// [`LlkError::InvalidK`] for `k` outside `1..=MAX_K`, [`LlkError::TableConflict`]
/// when the grammar is not LL(k) for this `k`.
pub fn build_tables(grammar: &Grammar, k: usize) -> Result<Tables> {
    let standard = ParsingTable::build(grammar, k)?;
    standard.ensure_deterministic()?;
    let extended = ExtendedParsingTable::from_table(&standard);
    Ok(Tables { standard, extended })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn build(rules: &[(&str, &str)], terms: &[&str]) -> Grammar {
        let mut builder = GrammarBuilder::new();
        builder.declare_terminals(terms.iter().copied());
        for (lhs, rhs) in rules {
            builder
                .rule(SymbolRef::name(*lhs), rhs.split_whitespace().map(SymbolRef::name))
                .unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn retry_with_larger_k() {
        init_logger();
        let grammar = build(&[("S", "a b"), ("S", "a c")], &["a", "b", "c"]);
        let err = build_tables(&grammar, 1).unwrap_err();
        assert_eq!(err, LlkError::TableConflict { k: 1, cells: 1 });
        let tables = build_tables(&grammar, 2).unwrap();
        assert_eq!(tables.standard.k(), 2);
        assert!(tables.extended.is_deterministic());
    }

    #[test]
    fn invalid_k_before_construction() {
        let grammar = build(&[("S", "a")], &["a"]);
        assert_eq!(build_tables(&grammar, 0).unwrap_err(), LlkError::InvalidK(0));
        assert_eq!(
            build_tables(&grammar, MAX_K + 1).unwrap_err(),
            LlkError::InvalidK(MAX_K + 1)
        );
    }

    #[test]
    fn epsilon_only_grammar() {
        let grammar = build(&[("S", "")], &[]);
        let tables = build_tables(&grammar, 2).unwrap();
        assert_eq!(tables.standard.columns().count(), 1);
        let (derivation, _) = parse_extended(&grammar, &tables.extended, &[]).unwrap();
        assert_eq!(derivation.rules, vec![1]);
    }
}
