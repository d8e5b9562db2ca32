//! Consistency checks run before any command is composed.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. at least one non-empty dataset group
//! 2. a program name
//! 3. one set label per group, if labels are given
//! 4. plain shell words for the prefix, subject prefix/suffix and datasets
//! 5. beta/t-stat selectors (see [`resolve_selectors`])
//! 6. a recognized program and test type
//! 7. the program's group-count rules

use super::dispatch::Dispatch;
use super::spec::{Program, TestType};
use crate::data::{resolve_selectors, SelectorSet};
use crate::error::{GroupCmdError, Result};
use crate::pipeline::CommandConfig;
use std::collections::HashSet;

/// Characters a shell would interpret inside an unquoted word.
const SHELL_SPECIAL: &[char] = &[
    '\'', '"', '`', '\\', '$', ';', '&', '|', '<', '>', '(', ')', '*', '?', '[', ']', '{', '}',
    '!',
];

/// Outcome of a successful validation.
#[derive(Debug, Clone)]
pub struct Validated {
    pub program: Program,
    pub test_type: Option<TestType>,
    pub selectors: SelectorSet,
}

/// Validate raw command inputs.
pub fn validate(config: &CommandConfig) -> Result<Validated> {
    let n_groups = config.dsets.len();

    if n_groups == 0 {
        return Err(GroupCmdError::config("missing datasets for command"));
    }
    if let Some(i) = config.dsets.iter().position(|g| g.is_empty()) {
        return Err(GroupCmdError::config(format!(
            "dataset group {} is empty",
            i + 1
        )));
    }

    if config.command.trim().is_empty() {
        return Err(GroupCmdError::config("missing program name for command"));
    }

    if let Some(labels) = config.given_labels() {
        check_labels(labels, n_groups)?;
    }

    if let Some(prefix) = config.prefix.as_deref().map(str::trim) {
        check_word("output prefix", prefix)?;
    }
    check_word("subject prefix", &config.subj_prefix)?;
    check_word("subject suffix", &config.subj_suffix)?;
    for dataset in config.dsets.iter().flatten() {
        check_word("dataset", dataset)?;
    }

    let selectors = resolve_selectors(
        config.subs_betas.as_deref(),
        config.subs_tstats.as_deref(),
        n_groups,
    )?;

    let program = Dispatch::Unselected.select(&config.command).program()?;
    let test_type = config
        .test_type
        .as_deref()
        .map(|t| program.parse_test_type(t))
        .transpose()?;

    check_group_count(program, test_type, n_groups)?;

    log::debug!(
        "validated {} command: {} group(s), test type {:?}",
        program,
        n_groups,
        test_type
    );

    Ok(Validated {
        program,
        test_type,
        selectors,
    })
}

fn check_labels(labels: &[String], n_groups: usize) -> Result<()> {
    if labels.len() != n_groups {
        return Err(GroupCmdError::config(format!(
            "have {} set label(s) for {} dataset group(s)",
            labels.len(),
            n_groups
        )));
    }

    let mut seen = HashSet::new();
    for (i, label) in labels.iter().enumerate() {
        let label = label.trim();
        if label.is_empty() {
            return Err(GroupCmdError::config(format!("set label {} is empty", i + 1)));
        }
        check_word("set label", label)?;
        if !seen.insert(label) {
            return Err(GroupCmdError::config(format!(
                "set label '{}' is used more than once",
                label
            )));
        }
    }
    Ok(())
}

/// Values are emitted unquoted, so they must read as one shell word.
fn check_word(what: &str, value: &str) -> Result<()> {
    if value
        .chars()
        .any(|c| c.is_whitespace() || SHELL_SPECIAL.contains(&c))
    {
        return Err(GroupCmdError::config(format!(
            "{} '{}' contains whitespace or shell special characters",
            what, value
        )));
    }
    Ok(())
}

fn check_group_count(program: Program, test_type: Option<TestType>, n_groups: usize) -> Result<()> {
    if n_groups > program.max_groups() {
        return Err(GroupCmdError::config(format!(
            "{} takes at most {} dataset groups, have {}",
            program,
            program.max_groups(),
            n_groups
        )));
    }
    if let Some(t) = test_type {
        if n_groups != 2 {
            return Err(GroupCmdError::config(format!(
                "test type '{}' requires 2 dataset groups, have {}",
                t, n_groups
            )));
        }
    }
    Ok(())
}
