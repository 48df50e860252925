//! Error type shared by every stage of table construction.
//!
//! A run either produces a complete, validated [`Grammar`](crate::Grammar) and
//! tables, or stops at the first [`LlkError`]. Variants are grouped by the stage
//! that raises them:
//!
//! - configuration: [`LlkError::InvalidK`], [`LlkError::InvalidDetail`];
//! - grammar building and validation: [`LlkError::EmptyGrammar`] through
//!   [`LlkError::LeftRecursive`];
//! - table construction: [`LlkError::TableConflict`];
//! - pushdown drivers: [`LlkError::UnknownTerminal`], [`LlkError::NoAction`],
//!   [`LlkError::Ambiguous`].
//!
//! # Examples
//!
//! ```rust
//! # use llk::LlkError;
//! let err = LlkError::LeftRecursive("Expr".into());
//! assert_eq!(err.to_string(), "left recursion through `Expr`");
//! ```

use crate::config::MAX_K;
use thiserror::Error;

/// Every failure a generation run can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlkError {
    /// Lookahead length outside `1..=MAX_K`.
    #[error("invalid lookahead length {0} (expected 1..={max})", max = MAX_K)]
    InvalidK(usize),

    /// Output detail other than `full` or `compact`.
    #[error("invalid output detail {0:?} (expected `full` or `compact`)")]
    InvalidDetail(String),

    /// `finish` was called without a single rule.
    #[error("grammar has no rules")]
    EmptyGrammar,

    /// Half-rules that no full rule ever picked up.
    #[error("{0} alternative(s) never attached to a left-hand side")]
    UnattachedAlternatives(usize),

    /// A rule whose left-hand side resolved to a terminal.
    #[error("rule with terminal `{0}` on the left side")]
    TerminalOnLeft(String),

    /// Two rules with identical left and right sides; carries the left symbol.
    #[error("duplicate rules for `{0}`")]
    DuplicateRule(String),

    /// A nonterminal used on a right-hand side but never defined.
    #[error("no rule for nonterminal `{0}`")]
    MissingRule(String),

    /// A nonterminal reachable from itself without consuming input.
    #[error("left recursion through `{0}`")]
    LeftRecursive(String),

    /// The canonical table has cells holding more than one action.
    #[error("grammar is not LL({k}): {cells} conflicting table cell(s)")]
    TableConflict {
        /// Lookahead length the table was built for.
        k: usize,
        /// Number of cells with two or more actions.
        cells: usize,
    },

    /// Driver input names a terminal the grammar does not know.
    #[error("unknown terminal `{0}`")]
    UnknownTerminal(String),

    /// Driver reached a cell without any action.
    #[error("no action for `{top}` with lookahead `{lookahead}` at input position {position}")]
    NoAction {
        /// Pushdown top, rendered.
        top: String,
        /// Lookahead string or buffer, rendered.
        lookahead: String,
        /// Index of the next unread input terminal.
        position: usize,
    },

    /// Driver reached a cell holding several actions.
    #[error("conflicting actions for `{top}` with lookahead `{lookahead}`")]
    Ambiguous {
        /// Pushdown top, rendered.
        top: String,
        /// Lookahead string or buffer, rendered.
        lookahead: String,
    },
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, LlkError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_error_trait_obj(e: &dyn std::error::Error) -> &dyn std::error::Error {
        e
    }

    #[test]
    fn messages_name_the_symbol() {
        let err = LlkError::DuplicateRule("A".into());
        let _ = _assert_error_trait_obj(&err);
        assert_eq!(err.to_string(), "duplicate rules for `A`");
        assert!(LlkError::MissingRule("B".into()).to_string().contains("`B`"));
        assert!(LlkError::InvalidK(0).to_string().contains("1..=100"));
    }

    #[test]
    fn conflict_reports_k_and_cells() {
        let err = LlkError::TableConflict { k: 1, cells: 3 };
        assert_eq!(err.to_string(), "grammar is not LL(1): 3 conflicting table cell(s)");
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}
    #[test]
    fn llk_error_is_send_sync_static() {
        _assert_send_sync_static::<LlkError>();
    }
}
