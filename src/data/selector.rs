//! Sub-brick selectors for beta weights and t-statistics.

use crate::error::{GroupCmdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sub-brick holding the beta weight.
pub const DEFAULT_BETA_INDEX: usize = 0;
/// Default sub-brick holding the t-statistic.
pub const DEFAULT_TSTAT_INDEX: usize = 1;

/// A measurement channel within a dataset, by index or by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubBrick {
    /// Zero-based sub-brick index.
    Index(usize),
    /// Sub-brick label, resolved by the downstream program.
    Label(String),
}

impl SubBrick {
    /// Parse a selector: all digits is an index, anything else is a label.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GroupCmdError::config("empty sub-brick selector"));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            let index = s.parse().map_err(|_| {
                GroupCmdError::config(format!("sub-brick index '{}' is out of range", s))
            })?;
            return Ok(SubBrick::Index(index));
        }
        if s.contains(|c: char| matches!(c, '\'' | '[' | ']')) {
            return Err(GroupCmdError::config(format!(
                "invalid sub-brick label '{}': may not contain quotes or brackets",
                s
            )));
        }
        Ok(SubBrick::Label(s.to_string()))
    }
}

impl fmt::Display for SubBrick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubBrick::Index(i) => write!(f, "{}", i),
            SubBrick::Label(l) => write!(f, "{}", l),
        }
    }
}

/// Beta and t-stat selectors for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPair {
    pub beta: SubBrick,
    pub tstat: SubBrick,
}

impl Default for SelectorPair {
    fn default() -> Self {
        Self {
            beta: SubBrick::Index(DEFAULT_BETA_INDEX),
            tstat: SubBrick::Index(DEFAULT_TSTAT_INDEX),
        }
    }
}

/// Selectors for every group, in group order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    pairs: Vec<SelectorPair>,
}

impl SelectorSet {
    /// Default selectors (beta 0, t-stat 1) for `n_groups` groups.
    pub fn defaults(n_groups: usize) -> Self {
        Self {
            pairs: vec![SelectorPair::default(); n_groups],
        }
    }

    /// Selectors for group `index`.
    pub fn get(&self, index: usize) -> Option<&SelectorPair> {
        self.pairs.get(index)
    }

    /// Number of groups covered.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no group is covered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over per-group selectors.
    pub fn iter(&self) -> impl Iterator<Item = &SelectorPair> {
        self.pairs.iter()
    }
}

/// Resolve user-supplied selectors into one pair per group.
///
/// Betas and t-stats go together: both absent (or empty) gives the
/// defaults, one without the other is an error, and each list needs one
/// entry per group.
pub fn resolve_selectors(
    betas: Option<&[String]>,
    tstats: Option<&[String]>,
    n_groups: usize,
) -> Result<SelectorSet> {
    let betas = betas.filter(|b| !b.is_empty());
    let tstats = tstats.filter(|t| !t.is_empty());
    let (betas, tstats) = match (betas, tstats) {
        (None, None) => return Ok(SelectorSet::defaults(n_groups)),
        (Some(b), Some(t)) => (b, t),
        _ => {
            return Err(GroupCmdError::config(
                "betas and tstats must be specified together",
            ))
        }
    };

    for (name, list) in [("betas", betas), ("tstats", tstats)] {
        if list.len() != n_groups {
            return Err(GroupCmdError::config(format!(
                "have {} {} selector(s) for {} dataset group(s)",
                list.len(),
                name,
                n_groups
            )));
        }
    }

    let pairs = betas
        .iter()
        .zip(tstats)
        .map(|(b, t)| -> Result<SelectorPair> {
            Ok(SelectorPair {
                beta: SubBrick::parse(b)?,
                tstat: SubBrick::parse(t)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SelectorSet { pairs })
}
