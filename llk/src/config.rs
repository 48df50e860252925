//! Run configuration: lookahead length and output detail.

use crate::error::{LlkError, Result};
use std::fmt;
use std::str::FromStr;

/// Largest accepted lookahead length.
pub const MAX_K: usize = 100;

/// How much a renderer should emit besides the tables.
///
/// Has no effect on the computation itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputDetail {
    /// Grammar, discovered states and tables.
    #[default]
    Full,
    /// Tables only.
    Compact,
}

impl OutputDetail {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputDetail::Full => "full",
            OutputDetail::Compact => "compact",
        }
    }
}

impl FromStr for OutputDetail {
    type Err = LlkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(OutputDetail::Full),
            "compact" => Ok(OutputDetail::Compact),
            other => Err(LlkError::InvalidDetail(other.to_owned())),
        }
    }
}

impl fmt::Display for OutputDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated options for one generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    k: usize,
    detail: OutputDetail,
}

impl Config {
    /// Creates a configuration, rejecting `k` outside `1..=MAX_K`.
    pub fn new(k: usize, detail: OutputDetail) -> Result<Self> {
        Ok(Self {
            k: check_k(k)?,
            detail,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn detail(&self) -> OutputDetail {
        self.detail
    }
}

/// Returns `k` unchanged when it is a usable lookahead length.
pub fn check_k(k: usize) -> Result<usize> {
    if (1..=MAX_K).contains(&k) {
        Ok(k)
    } else {
        Err(LlkError::InvalidK(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_bounds() {
        assert_eq!(Config::new(0, OutputDetail::Full), Err(LlkError::InvalidK(0)));
        assert_eq!(
            Config::new(MAX_K + 1, OutputDetail::Full),
            Err(LlkError::InvalidK(MAX_K + 1))
        );
        let config = Config::new(MAX_K, OutputDetail::Compact).unwrap();
        assert_eq!(config.k(), MAX_K);
        assert_eq!(config.detail(), OutputDetail::Compact);
    }

    #[test]
    fn detail_from_str() {
        assert_eq!("full".parse::<OutputDetail>(), Ok(OutputDetail::Full));
        assert_eq!("compact".parse::<OutputDetail>(), Ok(OutputDetail::Compact));
        assert_eq!(
            "html".parse::<OutputDetail>(),
            Err(LlkError::InvalidDetail("html".to_owned()))
        );
        assert_eq!(OutputDetail::Compact.to_string(), "compact");
    }
}
