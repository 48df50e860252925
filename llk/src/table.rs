// Canonical LL(k) states and the standard parsing table over them.

use crate::config::check_k;
use crate::error::{LlkError, Result};
use crate::grammar::{Grammar, NontermId, Symbol, TermId};
use crate::sets::{self, FirstKString, FollowContext, KSet};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::fmt;

/// Number of a canonical state, assigned in discovery order.
///
/// Displays as `T0`, `T1`, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Identity of a canonical state: a nonterminal together with the strings
/// that may follow its expansion.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub nonterm: NontermId,
    pub follow: KSet,
}

/// One row of a canonical state: on `lookahead`, expand with `rule`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub lookahead: FirstKString,
    /// Rule number.
    pub rule: usize,
    /// One context per nonterminal occurrence of the rule's right side.
    pub follow: Vec<FollowContext>,
    /// The state each of those occurrences becomes on the pushdown.
    pub targets: Vec<StateId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlkState {
    pub id: StateId,
    pub key: StateKey,
    pub rows: Vec<TableRow>,
}

/// A pushdown symbol, and at the same time a row of the standard table.
///
/// The derived order is the row order: states, terminals, bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PushdownSymbol {
    State(StateId),
    Term(TermId),
    Bottom,
}

impl PushdownSymbol {
    /// `T<n>` for states, the terminal's name, `#` for the bottom.
    pub fn name(self, grammar: &Grammar) -> String {
        match self {
            PushdownSymbol::State(id) => id.to_string(),
            PushdownSymbol::Term(t) => grammar.term_name(t).to_owned(),
            PushdownSymbol::Bottom => "#".to_owned(),
        }
    }
}

/// Space-separated terminal names; `$` for the empty end-of-input string.
pub fn format_lookahead(grammar: &Grammar, lookahead: &[TermId]) -> String {
    if lookahead.is_empty() {
        return "$".to_owned();
    }
    lookahead
        .iter()
        .map(|&t| grammar.term_name(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// An entry of a standard table cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Accept,
    /// Match the top terminal against the input and advance.
    Pop,
    /// Replace the top state by `rhs`, leftmost symbol on top.
    Expand {
        rule: usize,
        rhs: Vec<PushdownSymbol>,
    },
}

/// The standard LL(k) parsing table.
///
/// Rows are [`PushdownSymbol`]s. Columns are lookahead strings: every
/// terminal string of length `1..=k` in odometer order over the terminal
/// alphabet, then the empty string standing for end of input. A column
/// shorter than `k` means the input ends right after it.
///
/// Cells are stored sparsely; a missing cell has no action.
#[derive(Clone, Debug)]
pub struct ParsingTable {
    k: usize,
    terminals: usize,
    states: Vec<LlkState>,
    columns: IndexSet<Vec<TermId>>,
    cells: BTreeMap<(PushdownSymbol, usize), Vec<Action>>,
}

impl ParsingTable {
    /// Discovers the canonical states of `grammar` and fills the table.
    ///
    /// # Parameters
    /// - `grammar`: A validated grammar.
    /// - `k`: Lookahead length, `1..=MAX_K`.
    ///
    /// # Returns
    /// The table, deterministic or not; see [`ParsingTable::conflicts`].
    ///
    /// # Errors
    /// [`LlkError::InvalidK`] before any construction.
    pub fn build(grammar: &Grammar, k: usize) -> Result<Self> {
        let k = check_k(k)?;
        let states = discover(grammar, k)?;
        let terminals = grammar.terminals().len();
        let mut table = Self {
            k,
            terminals,
            states,
            columns: columns(terminals, k),
            cells: BTreeMap::new(),
        };
        table.fill(grammar);
        log::debug!(
            "LL({}) table: {} states, {} columns, {} conflicting cells",
            k,
            table.states.len(),
            table.columns.len(),
            table.conflicts().len()
        );
        Ok(table)
    }

    fn fill(&mut self, grammar: &Grammar) {
        let mut cells: BTreeMap<(PushdownSymbol, usize), Vec<Action>> = BTreeMap::new();
        for state in &self.states {
            for row in &state.rows {
                let (Some(rule), Some(col)) = (
                    grammar.rule(row.rule),
                    self.columns.get_index_of(row.lookahead.terms()),
                ) else {
                    log::warn!("{}: no cell for rule {}, row skipped", state.id, row.rule);
                    debug_assert!(false, "row without rule or column");
                    continue;
                };
                let mut targets = row.targets.iter().copied();
                let rhs = rule
                    .rhs
                    .iter()
                    .filter_map(|&sym| match sym {
                        Symbol::Term(t) => Some(PushdownSymbol::Term(t)),
                        Symbol::NonTerm(_) => targets.next().map(PushdownSymbol::State),
                    })
                    .collect();
                cells
                    .entry((PushdownSymbol::State(state.id), col))
                    .or_default()
                    .push(Action::Expand {
                        rule: row.rule,
                        rhs,
                    });
            }
        }

        for (col, s) in self.columns.iter().enumerate() {
            if let Some(&a) = s.first() {
                cells.entry((PushdownSymbol::Term(a), col)).or_default().push(Action::Pop);
            }
        }

        cells
            .entry((PushdownSymbol::Bottom, self.end_column()))
            .or_default()
            .push(Action::Accept);

        self.cells = cells;
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of terminals, i.e. of `Term` rows.
    pub fn terminal_count(&self) -> usize {
        self.terminals
    }

    pub fn states(&self) -> &[LlkState] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&LlkState> {
        self.states.get(id.0)
    }

    /// The state for the start symbol followed by end of input.
    pub fn start(&self) -> StateId {
        StateId(0)
    }

    /// Rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = PushdownSymbol> + '_ {
        let states = self.states.iter().map(|state| PushdownSymbol::State(state.id));
        let terms = (0..self.terminals).map(|t| PushdownSymbol::Term(TermId(t)));
        states.chain(terms).chain(std::iter::once(PushdownSymbol::Bottom))
    }

    /// Columns in table order; the last one is the empty end-of-input string.
    pub fn columns(&self) -> impl Iterator<Item = &[TermId]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }

    pub fn column(&self, idx: usize) -> Option<&[TermId]> {
        self.columns.get_index(idx).map(Vec::as_slice)
    }

    pub fn column_index(&self, lookahead: &[TermId]) -> Option<usize> {
        self.columns.get_index_of(lookahead)
    }

    pub fn end_column(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn actions(&self, row: PushdownSymbol, col: usize) -> &[Action] {
        self.cells.get(&(row, col)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty cells in row, then column order.
    pub fn cells(&self) -> impl Iterator<Item = (PushdownSymbol, usize, &[Action])> + '_ {
        self.cells
            .iter()
            .map(|(&(row, col), actions)| (row, col, actions.as_slice()))
    }

    /// Cells holding more than one action.
    pub fn conflicts(&self) -> Vec<(PushdownSymbol, usize)> {
        self.cells
            .iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(&cell, _)| cell)
            .collect()
    }

    pub fn is_deterministic(&self) -> bool {
        self.cells.values().all(|actions| actions.len() <= 1)
    }

    /// Fails with [`LlkError::TableConflict`] unless every cell has at most
    /// one action.
    pub fn ensure_deterministic(&self) -> Result<()> {
        let cells = self.conflicts().len();
        if cells > 0 {
            log::debug!("LL({}) table has {} conflicting cells", self.k, cells);
            return Err(LlkError::TableConflict { k: self.k, cells });
        }
        Ok(())
    }
}

/// Breadth-first discovery of every state reachable from `(start, {ε})`.
fn discover(grammar: &Grammar, k: usize) -> Result<Vec<LlkState>> {
    let mut found: IndexMap<StateKey, Vec<TableRow>> = IndexMap::new();
    found.insert(
        StateKey {
            nonterm: grammar.start(),
            follow: sets::end_of_input(k),
        },
        Vec::new(),
    );

    let mut next = 0;
    while next < found.len() {
        let Some((key, _)) = found.get_index(next) else {
            break;
        };
        let key = key.clone();
        let mut rows = state_rows(grammar, &key, k)?;
        for row in &mut rows {
            for ctx in &row.follow {
                let candidate = StateKey {
                    nonterm: ctx.nonterm,
                    follow: ctx.set.clone(),
                };
                let idx = match found.get_index_of(&candidate) {
                    Some(idx) => idx,
                    None => {
                        log::debug!("state T{} for `{}`", found.len(), grammar.nonterm_name(ctx.nonterm));
                        found.insert_full(candidate, Vec::new()).0
                    }
                };
                row.targets.push(StateId(idx));
            }
        }
        found[next] = rows;
        next += 1;
    }

    Ok(found
        .into_iter()
        .enumerate()
        .map(|(i, (key, rows))| LlkState {
            id: StateId(i),
            key,
            rows,
        })
        .collect())
}

fn state_rows(grammar: &Grammar, key: &StateKey, k: usize) -> Result<Vec<TableRow>> {
    let mut rows = Vec::new();
    for rule in grammar.rules_for(key.nonterm) {
        let first = sets::first(grammar, &rule.rhs, k)?;
        let u = sets::first_plus(&first, &key.follow, k);
        let follow = sets::follow(grammar, rule, &key.follow, k)?;
        for lookahead in u {
            rows.push(TableRow {
                lookahead,
                rule: rule.number,
                follow: follow.clone(),
                targets: Vec::new(),
            });
        }
    }
    Ok(rows)
}

/// Every terminal string of length `1..=k` by length, each length in
/// odometer order, then the empty string.
fn columns(terminals: usize, k: usize) -> IndexSet<Vec<TermId>> {
    let mut columns = IndexSet::new();
    if terminals > 0 {
        for len in 1..=k {
            let mut digits = vec![0usize; len];
            loop {
                columns.insert(digits.iter().map(|&d| TermId(d)).collect());
                // advance the odometer, rightmost digit fastest
                let mut pos = len;
                loop {
                    if pos == 0 {
                        break;
                    }
                    pos -= 1;
                    digits[pos] += 1;
                    if digits[pos] < terminals {
                        break;
                    }
                    digits[pos] = 0;
                }
                if digits.iter().all(|&d| d == 0) {
                    break;
                }
            }
        }
    }
    columns.insert(Vec::new());
    columns
}
