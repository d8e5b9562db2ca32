//! Programs, test types and the validated command setup.

use super::validate::validate;
use crate::data::{Group, SelectorSet, SubjectList};
use crate::error::{GroupCmdError, Result};
use crate::pipeline::CommandConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A statistical program that commands can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    /// AFNI mixed-effects meta-analysis.
    #[serde(rename = "3dMEMA")]
    Mema,
}

impl Program {
    /// All supported programs.
    pub const ALL: &'static [Program] = &[Program::Mema];

    /// Look up a program by its command name.
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| GroupCmdError::UnsupportedProgram {
                name: name.to_string(),
            })
    }

    /// Command name as typed in a shell.
    pub fn name(&self) -> &'static str {
        match self {
            Program::Mema => "3dMEMA",
        }
    }

    /// Test types the program accepts.
    pub fn test_types(&self) -> &'static [TestType] {
        match self {
            Program::Mema => &[TestType::Paired, TestType::Unpaired],
        }
    }

    /// Maximum number of dataset groups in one command.
    pub fn max_groups(&self) -> usize {
        match self {
            Program::Mema => 2,
        }
    }

    /// Parse a test type, checking the program supports it.
    pub fn parse_test_type(&self, s: &str) -> Result<TestType> {
        let wanted = s.trim().to_lowercase();
        self.test_types()
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| GroupCmdError::UnsupportedTestType {
                program: self.name().to_string(),
                test_type: s.to_string(),
                valid: self
                    .test_types()
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of group comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Within-subject comparison across two conditions.
    Paired,
    /// Comparison between two independent samples.
    Unpaired,
}

impl TestType {
    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            TestType::Paired => "paired",
            TestType::Unpaired => "unpaired",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully validated command, ready for composition.
///
/// Only constructed through [`CommandSpec::from_config`], so every value
/// has passed the consistency checks in [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSpec {
    program: Program,
    test_type: Option<TestType>,
    prefix: Option<String>,
    groups: Vec<Group>,
    selectors: SelectorSet,
    options: Vec<String>,
}

impl CommandSpec {
    /// Validate raw inputs and derive subjects for each group.
    pub fn from_config(config: &CommandConfig) -> Result<Self> {
        let checked = validate(config)?;

        let labels: Vec<String> = match config.given_labels() {
            Some(labels) => labels.iter().map(|l| l.trim().to_string()).collect(),
            None => (0..config.dsets.len()).map(Group::default_label).collect(),
        };

        let groups = config
            .dsets
            .iter()
            .zip(labels)
            .map(|(dsets, label)| -> Result<Group> {
                let subjects =
                    SubjectList::from_datasets(dsets, &config.subj_prefix, &config.subj_suffix)?;
                Ok(Group::new(label, subjects))
            })
            .collect::<Result<Vec<_>>>()?;

        let prefix = config
            .prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);

        Ok(Self {
            program: checked.program,
            test_type: checked.test_type,
            prefix,
            groups,
            selectors: checked.selectors,
            options: config.options.clone(),
        })
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn test_type(&self) -> Option<TestType> {
        self.test_type
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Pass-through options, appended verbatim.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(GroupCmdError::from)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: Vec<String>| items.join(", ");

        writeln!(f, "Command Setup")?;
        writeln!(f, "=============")?;
        writeln!(f, "  program:          {}", self.program)?;
        writeln!(
            f,
            "  test type:        {}",
            self.test_type.map_or("default", |t| t.name())
        )?;
        writeln!(f, "  prefix:           {}", self.prefix.as_deref().unwrap_or("(none)"))?;
        writeln!(
            f,
            "  beta sub-bricks:  {}",
            join(self.selectors.iter().map(|p| p.beta.to_string()).collect())
        )?;
        writeln!(
            f,
            "  tstat sub-bricks: {}",
            join(self.selectors.iter().map(|p| p.tstat.to_string()).collect())
        )?;
        writeln!(f, "  options:          {}", self.options.join(" "))?;
        for (i, group) in self.groups.iter().enumerate() {
            writeln!(
                f,
                "  group {} ({}): {} subjects: {}",
                i + 1,
                group.label,
                group.len(),
                group.subjects.ids().join(", ")
            )?;
        }
        Ok(())
    }
}
