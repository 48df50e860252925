//! The extended parsing table: the canonical LL(k) table re-indexed so that a
//! pushdown automaton reads one input symbol per step.
//!
//! Where the standard table looks at `k` input terminals at once, the
//! automaton keeps them in a buffer that is part of its state. A buffer shorter
//! than `k` is filled one symbol at a time by [`ExtAction::Change`]; a full
//! buffer selects the expand, pop or accept action the standard table would
//! have chosen for the same lookahead.
//!
//! Rows: every [`PushdownSymbol`] row of the standard table, then one input row
//! per terminal and an input-end row. Columns: the empty buffer, every pure
//! terminal buffer of length `1..k`, then every standard column padded to
//! length `k` with [`BufSym::End`].

use crate::grammar::{Grammar, TermId};
use crate::table::{Action, ParsingTable, PushdownSymbol, StateId};
use indexmap::IndexSet;
use std::collections::BTreeMap;

/// Symbol of a lookahead buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BufSym {
    Term(TermId),
    /// Past the end of the input.
    End,
}

/// Row of the extended table; the derived order is the row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtRow {
    State(StateId),
    PushdownTerm(TermId),
    Bottom,
    /// Next input symbol, for buffer changes.
    InputTerm(TermId),
    InputEnd,
}

impl From<PushdownSymbol> for ExtRow {
    fn from(sym: PushdownSymbol) -> Self {
        match sym {
            PushdownSymbol::State(s) => ExtRow::State(s),
            PushdownSymbol::Term(t) => ExtRow::PushdownTerm(t),
            PushdownSymbol::Bottom => ExtRow::Bottom,
        }
    }
}

impl ExtRow {
    /// Pushdown rows as in the standard table, `|name` for input rows and `|$`
    /// for the input end.
    pub fn name(self, grammar: &Grammar) -> String {
        match self {
            ExtRow::State(id) => id.to_string(),
            ExtRow::PushdownTerm(t) => grammar.term_name(t).to_owned(),
            ExtRow::Bottom => "#".to_owned(),
            ExtRow::InputTerm(t) => format!("|{}", grammar.term_name(t)),
            ExtRow::InputEnd => "|$".to_owned(),
        }
    }
}

/// Space-separated buffer contents, `$` for the end marker and `ε` for the
/// empty buffer.
pub fn format_buffer(grammar: &Grammar, buf: &[BufSym]) -> String {
    if buf.is_empty() {
        return "ε".to_owned();
    }
    buf.iter()
        .map(|sym| match sym {
            BufSym::Term(t) => grammar.term_name(*t),
            BufSym::End => "$",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExtAction {
    Accept,
    /// Pop the top terminal; the buffer becomes `target`.
    Pop { target: Vec<BufSym> },
    /// Replace the top state, exactly as in the standard table.
    Expand {
        rule: usize,
        rhs: Vec<PushdownSymbol>,
    },
    /// Consume one input symbol; the buffer becomes `target`.
    Change { target: Vec<BufSym> },
}

#[derive(Clone, Debug)]
pub struct ExtendedParsingTable {
    k: usize,
    terminals: usize,
    states: usize,
    columns: IndexSet<Vec<BufSym>>,
    cells: BTreeMap<(ExtRow, usize), Vec<ExtAction>>,
}

impl ExtendedParsingTable {
    /// Derives the extended table from a standard one.
    ///
    /// Every Accept, Pop and Expand of `table` gets exactly one counterpart;
    /// Change actions are added for every input row and every buffer shorter
    /// than `k`.
    pub fn from_table(table: &ParsingTable) -> Self {
        let k = table.k();
        let terminals = table.terminal_count();
        let mut ext = Self {
            k,
            terminals,
            states: table.states().len(),
            columns: columns(table, k),
            cells: BTreeMap::new(),
        };

        for (row, col, actions) in table.cells() {
            let Some(s) = table.column(col) else {
                log::warn!("column {} missing from the standard table", col);
                debug_assert!(false, "cell outside the column axis");
                continue;
            };
            let padded = ext.pad(s);
            let Some(pcol) = ext.columns.get_index_of(&padded) else {
                log::warn!("no buffer for column {}, {} action(s) skipped", col, actions.len());
                debug_assert!(false, "padded column outside the buffer axis");
                continue;
            };
            for action in actions {
                let converted = match action {
                    Action::Accept => ExtAction::Accept,
                    Action::Expand { rule, rhs } => ExtAction::Expand {
                        rule: *rule,
                        rhs: rhs.clone(),
                    },
                    Action::Pop => {
                        let mut target = padded[1..].to_vec();
                        if s.len() < k {
                            target.push(BufSym::End);
                        }
                        ExtAction::Pop { target }
                    }
                };
                ext.push(row.into(), pcol, converted);
            }
        }

        let short: Vec<(usize, Vec<BufSym>)> = ext
            .columns
            .iter()
            .enumerate()
            .filter(|(_, buf)| buf.len() < k)
            .map(|(col, buf)| (col, buf.clone()))
            .collect();
        for (col, buf) in short {
            for t in (0..terminals).map(TermId) {
                let mut target = buf.clone();
                target.push(BufSym::Term(t));
                ext.push(ExtRow::InputTerm(t), col, ExtAction::Change { target });
            }
            let mut target = buf;
            target.resize(k, BufSym::End);
            ext.push(ExtRow::InputEnd, col, ExtAction::Change { target });
        }

        log::debug!(
            "extended table: {} rows, {} columns, {} non-empty cells",
            ext.rows().count(),
            ext.columns.len(),
            ext.cells.len()
        );
        ext
    }

    fn push(&mut self, row: ExtRow, col: usize, action: ExtAction) {
        self.cells.entry((row, col)).or_default().push(action);
    }

    fn pad(&self, s: &[TermId]) -> Vec<BufSym> {
        let mut buf: Vec<BufSym> = s.iter().map(|&t| BufSym::Term(t)).collect();
        buf.resize(self.k, BufSym::End);
        buf
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// The state for the start symbol followed by end of input.
    pub fn start(&self) -> StateId {
        StateId(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = ExtRow> + '_ {
        let states = (0..self.states).map(|s| ExtRow::State(StateId(s)));
        let pushdown = (0..self.terminals).map(|t| ExtRow::PushdownTerm(TermId(t)));
        let input = (0..self.terminals).map(|t| ExtRow::InputTerm(TermId(t)));
        states
            .chain(pushdown)
            .chain(std::iter::once(ExtRow::Bottom))
            .chain(input)
            .chain(std::iter::once(ExtRow::InputEnd))
    }

    pub fn columns(&self) -> impl Iterator<Item = &[BufSym]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }

    pub fn column(&self, idx: usize) -> Option<&[BufSym]> {
        self.columns.get_index(idx).map(Vec::as_slice)
    }

    pub fn column_index(&self, buf: &[BufSym]) -> Option<usize> {
        self.columns.get_index_of(buf)
    }

    pub fn actions(&self, row: ExtRow, col: usize) -> &[ExtAction] {
        self.cells.get(&(row, col)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cells(&self) -> impl Iterator<Item = (ExtRow, usize, &[ExtAction])> + '_ {
        self.cells
            .iter()
            .map(|(&(row, col), actions)| (row, col, actions.as_slice()))
    }

    pub fn conflicts(&self) -> Vec<(ExtRow, usize)> {
        self.cells
            .iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(&cell, _)| cell)
            .collect()
    }

    pub fn is_deterministic(&self) -> bool {
        self.cells.values().all(|actions| actions.len() <= 1)
    }
}

fn columns(table: &ParsingTable, k: usize) -> IndexSet<Vec<BufSym>> {
    let mut columns = IndexSet::new();
    columns.insert(Vec::new());
    // pure buffers of length 1..k are exactly the short standard columns
    for s in table.columns().filter(|s| !s.is_empty() && s.len() < k) {
        columns.insert(s.iter().map(|&t| BufSym::Term(t)).collect());
    }
    for s in table.columns() {
        let mut buf: Vec<BufSym> = s.iter().map(|&t| BufSym::Term(t)).collect();
        buf.resize(k, BufSym::End);
        columns.insert(buf);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GrammarBuilder, SymbolRef};

    fn grammar(terms: &[&str], rules: &[(&str, &str)]) -> Grammar {
        let mut builder = GrammarBuilder::new();
        builder.declare_terminals(terms.iter().copied());
        for (lhs, rhs) in rules {
            builder
                .rule(SymbolRef::name(*lhs), rhs.split_whitespace().map(SymbolRef::name))
                .unwrap();
        }
        builder.finish().unwrap()
    }

    fn tables(k: usize) -> (Grammar, ParsingTable, ExtendedParsingTable) {
        let g = grammar(&["a", "b", "c"], &[("S", "a b"), ("S", "a c"), ("S", "")]);
        let table = ParsingTable::build(&g, k).unwrap();
        let ext = ExtendedParsingTable::from_table(&table);
        (g, table, ext)
    }

    #[test]
    fn buffer_axis() {
        let (_, table, ext) = tables(2);
        // empty, three of length 1, then the padded standard columns
        assert_eq!(ext.columns().count(), 1 + 3 + table.columns().count());
        assert_eq!(ext.column(0), Some(&[][..]));
        assert!(ext.columns().skip(4).all(|buf| buf.len() == 2));
        assert_eq!(
            ext.columns().last(),
            Some(&[BufSym::End, BufSym::End][..])
        );
    }

    #[test]
    fn every_expand_has_one_counterpart() {
        let (_, table, ext) = tables(2);
        let mut expands: Vec<_> = table
            .cells()
            .flat_map(|(row, _, actions)| {
                actions.iter().filter_map(move |action| match action {
                    Action::Expand { rule, rhs } => Some((ExtRow::from(row), *rule, rhs.clone())),
                    _ => None,
                })
            })
            .collect();
        let mut copied: Vec<_> = ext
            .cells()
            .flat_map(|(row, _, actions)| {
                actions.iter().filter_map(move |action| match action {
                    ExtAction::Expand { rule, rhs } => Some((row, *rule, rhs.clone())),
                    _ => None,
                })
            })
            .collect();
        expands.sort();
        copied.sort();
        assert_eq!(expands, copied);
    }

    #[test]
    fn no_standard_action_is_dropped() {
        for k in 1..=3 {
            let (_, table, ext) = tables(k);
            let standard: usize = table.cells().map(|(_, _, actions)| actions.len()).sum();
            let carried: usize = ext
                .cells()
                .flat_map(|(_, _, actions)| actions.iter())
                .filter(|action| !matches!(action, ExtAction::Change { .. }))
                .count();
            assert_eq!(standard, carried, "k = {}", k);
        }
    }

    #[test]
    fn accept_on_full_end_buffer() {
        let (_, _, ext) = tables(2);
        let end = ext.column_index(&[BufSym::End, BufSym::End]).unwrap();
        assert_eq!(ext.actions(ExtRow::Bottom, end), &[ExtAction::Accept]);
        let accepts = ext
            .cells()
            .filter(|(_, _, actions)| actions.contains(&ExtAction::Accept))
            .count();
        assert_eq!(accepts, 1);
    }

    #[test]
    fn pop_targets() {
        let (g, _, ext) = tables(2);
        let a = g.terminals().idx("a").unwrap();
        let b = g.terminals().idx("b").unwrap();
        let (sa, sb) = (BufSym::Term(a), BufSym::Term(b));

        let full = ext.column_index(&[sa, sb]).unwrap();
        assert_eq!(
            ext.actions(ExtRow::PushdownTerm(a), full),
            &[ExtAction::Pop { target: vec![sb] }]
        );
        let short = ext.column_index(&[sa, BufSym::End]).unwrap();
        assert_eq!(
            ext.actions(ExtRow::PushdownTerm(a), short),
            &[ExtAction::Pop {
                target: vec![BufSym::End, BufSym::End]
            }]
        );
    }

    #[test]
    fn changes_only_on_short_buffers() {
        let (g, _, ext) = tables(3);
        for (row, col, actions) in ext.cells() {
            for action in actions {
                if let ExtAction::Change { target } = action {
                    assert!(matches!(row, ExtRow::InputTerm(_) | ExtRow::InputEnd));
                    let buf = ext.column(col).unwrap();
                    assert!(buf.len() < 3);
                    assert!(ext.column_index(target).is_some());
                }
            }
        }
        let c = g.terminals().idx("c").unwrap();
        let empty = ext.column_index(&[]).unwrap();
        assert_eq!(
            ext.actions(ExtRow::InputTerm(c), empty),
            &[ExtAction::Change {
                target: vec![BufSym::Term(c)]
            }]
        );
        assert_eq!(
            ext.actions(ExtRow::InputEnd, empty),
            &[ExtAction::Change {
                target: vec![BufSym::End; 3]
            }]
        );
    }

    #[test]
    fn determinism_carries_over() {
        let (_, table, ext) = tables(1);
        assert!(!table.is_deterministic());
        assert!(!ext.is_deterministic());
        assert_eq!(table.conflicts().len(), ext.conflicts().len());
        let (_, table, ext) = tables(2);
        assert!(table.is_deterministic());
        assert!(ext.is_deterministic());
    }
}
