//! Pushdown drivers for both table forms.
//!
//! [`parse`] runs the standard table, looking at up to `k` input terminals per
//! step. [`parse_extended`] runs the extended table as a one-symbol-at-a-time
//! automaton that keeps the lookahead in a buffer. For a deterministic table
//! both produce the same [`Derivation`].

use crate::error::{LlkError, Result};
use crate::extended::{BufSym, ExtAction, ExtRow, ExtendedParsingTable, format_buffer};
use crate::grammar::{Grammar, TermId};
use crate::table::{Action, ParsingTable, PushdownSymbol, format_lookahead};

/// Left parse: rule numbers in the order the leftmost derivation applies them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    pub rules: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub expansions: usize,
    pub pops: usize,
    pub changes: usize,
}

/// Runs the standard table over `input`.
///
/// The pushdown starts as `[#, T0]` (top last). On every step the top and the
/// next `min(k, remaining)` input terminals select one cell.
///
/// # Errors
/// [`LlkError::NoAction`] when the cell is empty, [`LlkError::Ambiguous`] when
/// it holds several actions.
pub fn parse(
    grammar: &Grammar,
    table: &ParsingTable,
    input: &[TermId],
) -> Result<(Derivation, DriverStats)> {
    let mut stack = vec![PushdownSymbol::Bottom, PushdownSymbol::State(table.start())];
    let mut derivation = Derivation::default();
    let mut stats = DriverStats::default();
    let mut pos = 0;

    loop {
        let window = &input[pos..input.len().min(pos + table.k())];
        let Some(&top) = stack.last() else {
            return Err(no_action(grammar, "ε".to_owned(), window, pos));
        };
        if log::log_enabled!(log::Level::Trace) {
            dump_stack(grammar, &stack, &format_lookahead(grammar, window));
        }
        let col = table
            .column_index(window)
            .ok_or_else(|| no_action(grammar, top.name(grammar), window, pos))?;
        match table.actions(top, col) {
            [] => return Err(no_action(grammar, top.name(grammar), window, pos)),
            [action] => match action {
                Action::Expand { rule, rhs } => {
                    log::trace!("Expand {}", rule);
                    stack.pop();
                    stack.extend(rhs.iter().rev());
                    derivation.rules.push(*rule);
                    stats.expansions += 1;
                }
                Action::Pop => {
                    log::trace!("Pop");
                    stack.pop();
                    pos += 1;
                    stats.pops += 1;
                }
                Action::Accept => {
                    log::trace!("Accept");
                    return Ok((derivation, stats));
                }
            },
            _ => {
                return Err(LlkError::Ambiguous {
                    top: top.name(grammar),
                    lookahead: format_lookahead(grammar, window),
                });
            }
        }
    }
}

/// Runs the extended table over `input`, one input symbol per buffer change.
///
/// # Errors
/// As for [`parse`]; the reported lookahead is the buffer.
pub fn parse_extended(
    grammar: &Grammar,
    table: &ExtendedParsingTable,
    input: &[TermId],
) -> Result<(Derivation, DriverStats)> {
    let mut stack = vec![PushdownSymbol::Bottom, PushdownSymbol::State(table.start())];
    let mut buf: Vec<BufSym> = Vec::with_capacity(table.k());
    let mut derivation = Derivation::default();
    let mut stats = DriverStats::default();
    let mut pos = 0;

    loop {
        let Some(&top) = stack.last() else {
            return Err(LlkError::NoAction {
                top: "ε".to_owned(),
                lookahead: format_buffer(grammar, &buf),
                position: pos,
            });
        };
        if log::log_enabled!(log::Level::Trace) {
            dump_stack(grammar, &stack, &format_buffer(grammar, &buf));
        }
        let row = if buf.len() < table.k() {
            match input.get(pos) {
                Some(&t) => ExtRow::InputTerm(t),
                None => ExtRow::InputEnd,
            }
        } else {
            ExtRow::from(top)
        };
        let fail = || LlkError::NoAction {
            top: row.name(grammar),
            lookahead: format_buffer(grammar, &buf),
            position: pos,
        };
        let col = table.column_index(&buf).ok_or_else(fail)?;
        match table.actions(row, col) {
            [] => return Err(fail()),
            [action] => match action {
                ExtAction::Change { target } => {
                    log::trace!("Change {}", format_buffer(grammar, target));
                    if let ExtRow::InputTerm(_) = row {
                        pos += 1;
                    }
                    buf.clone_from(target);
                    stats.changes += 1;
                }
                ExtAction::Expand { rule, rhs } => {
                    log::trace!("Expand {}", rule);
                    stack.pop();
                    stack.extend(rhs.iter().rev());
                    derivation.rules.push(*rule);
                    stats.expansions += 1;
                }
                ExtAction::Pop { target } => {
                    log::trace!("Pop");
                    stack.pop();
                    buf.clone_from(target);
                    stats.pops += 1;
                }
                ExtAction::Accept => {
                    log::trace!("Accept");
                    return Ok((derivation, stats));
                }
            },
            _ => {
                return Err(LlkError::Ambiguous {
                    top: row.name(grammar),
                    lookahead: format_buffer(grammar, &buf),
                });
            }
        }
    }
}

fn no_action(grammar: &Grammar, top: String, window: &[TermId], position: usize) -> LlkError {
    LlkError::NoAction {
        top,
        lookahead: format_lookahead(grammar, window),
        position,
    }
}

fn dump_stack(grammar: &Grammar, stack: &[PushdownSymbol], lookahead: &str) {
    let stack: Vec<String> = stack.iter().map(|sym| sym.name(grammar)).collect();
    log::trace!("stack [{}] lookahead [{}]", stack.join(" "), lookahead);
}
