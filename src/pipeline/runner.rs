//! Command generation: configuration, builder and the end-to-end run.

use crate::command::{CommandSpec, Dispatch};
use crate::error::{GroupCmdError, Result};
use crate::format::{add_line_wrappers, WrapStyle};
use serde::{Deserialize, Deserializer, Serialize};

/// Raw inputs for one generated command.
///
/// Mirrors the command-line options; a YAML file with these fields can be
/// used in place of flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Program to generate a command for (e.g. `3dMEMA`).
    pub command: String,
    /// Test type, e.g. `paired` or `unpaired`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    /// Output prefix for the generated command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Dataset groups, one list per group.
    pub dsets: Vec<Vec<String>>,
    /// One set label per group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_labels: Option<Vec<String>>,
    /// Beta sub-bricks, one per group.
    #[serde(
        deserialize_with = "selector_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub subs_betas: Option<Vec<String>>,
    /// T-stat sub-bricks, one per group.
    #[serde(
        deserialize_with = "selector_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub subs_tstats: Option<Vec<String>>,
    /// Prefix applied to every subject ID.
    pub subj_prefix: String,
    /// Suffix applied to every subject ID.
    pub subj_suffix: String,
    /// Options passed verbatim to the generated command.
    pub options: Vec<String>,
}

impl CommandConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(GroupCmdError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(GroupCmdError::from)
    }

    /// Save to pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(GroupCmdError::from)
    }

    /// Set labels, with an empty list counted as none given.
    pub fn given_labels(&self) -> Option<&[String]> {
        self.set_labels.as_deref().filter(|labels| !labels.is_empty())
    }
}

/// Selector lists may be written as numbers or strings in YAML.
fn selector_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Selector {
        Index(u64),
        Label(String),
    }

    let list: Option<Vec<Selector>> = Option::deserialize(deserializer)?;
    Ok(list.map(|items| {
        items
            .into_iter()
            .map(|s| match s {
                Selector::Index(i) => i.to_string(),
                Selector::Label(l) => l,
            })
            .collect()
    }))
}

/// Builder for group commands.
#[derive(Debug, Clone, Default)]
pub struct GroupCommand {
    config: CommandConfig,
}

impl GroupCommand {
    /// Start a command for the named program.
    pub fn new(program: &str) -> Self {
        Self {
            config: CommandConfig {
                command: program.to_string(),
                ..Default::default()
            },
        }
    }

    /// Create from a config.
    pub fn from_config(config: &CommandConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Add a group of datasets. Call once per group.
    pub fn dsets<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dsets.push(to_strings(datasets));
        self
    }

    /// Set labels, one per group.
    pub fn set_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.set_labels = Some(to_strings(labels));
        self
    }

    /// Beta sub-brick selectors, one per group.
    pub fn subs_betas<I, S>(mut self, betas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.subs_betas = Some(to_strings(betas));
        self
    }

    /// T-stat sub-brick selectors, one per group.
    pub fn subs_tstats<I, S>(mut self, tstats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.subs_tstats = Some(to_strings(tstats));
        self
    }

    /// Set the test type.
    pub fn test_type(mut self, test_type: &str) -> Self {
        self.config.test_type = Some(test_type.to_string());
        self
    }

    /// Set the output prefix.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.config.prefix = Some(prefix.to_string());
        self
    }

    /// Prefix for every subject ID.
    pub fn subj_prefix(mut self, prefix: &str) -> Self {
        self.config.subj_prefix = prefix.to_string();
        self
    }

    /// Suffix for every subject ID.
    pub fn subj_suffix(mut self, suffix: &str) -> Self {
        self.config.subj_suffix = suffix.to_string();
        self
    }

    /// Options appended verbatim to the command.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.options.extend(to_strings(options));
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self) -> CommandConfig {
        self.config.clone()
    }

    /// Validate inputs and derive subjects.
    pub fn build(&self) -> Result<CommandSpec> {
        CommandSpec::from_config(&self.config)
    }

    /// Compose the command as a single line.
    pub fn compose(&self) -> Result<String> {
        let spec = self.build()?;
        compose_spec(&spec)
    }

    /// Compose and wrap the command for display.
    pub fn generate(&self, style: &WrapStyle) -> Result<String> {
        generate_command(&self.config, style)
    }
}

fn to_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Run a validated spec through program dispatch.
pub fn compose_spec(spec: &CommandSpec) -> Result<String> {
    let composed = Dispatch::Unselected
        .select(spec.program().name())
        .compose(spec)?;
    composed
        .command()
        .map(String::from)
        .ok_or_else(|| GroupCmdError::config("no command was composed"))
}

/// Generate a wrapped command from raw inputs.
pub fn generate_command(config: &CommandConfig, style: &WrapStyle) -> Result<String> {
    log::info!(
        "make {} command with {} set(s) of dsets of length(s): {}",
        config.command,
        config.dsets.len(),
        config
            .dsets
            .iter()
            .map(|d| d.len().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let spec = CommandSpec::from_config(config)?;
    log::debug!("command setup:\n{}", spec);

    let command = compose_spec(&spec)?;
    Ok(add_line_wrappers(&command, style))
}

/// An example configuration for a paired 3dMEMA test.
pub fn example_config() -> CommandConfig {
    GroupCommand::new("3dMEMA")
        .test_type("paired")
        .prefix("mema_vrel_arel")
        .dsets(["stats.FP+tlrc.HEAD", "stats.FT+tlrc.HEAD", "stats.FV+tlrc.HEAD"])
        .dsets(["stats.FP+tlrc.HEAD", "stats.FT+tlrc.HEAD", "stats.FV+tlrc.HEAD"])
        .set_labels(["Vrel", "Arel"])
        .subs_betas(["Vrel#0_Coef", "Arel#0_Coef"])
        .subs_tstats(["Vrel#0_Tstat", "Arel#0_Tstat"])
        .options(["-mask", "mask+tlrc", "-max_zeros", "0.25", "-jobs", "2"])
        .to_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builder() {
        let config = GroupCommand::new("3dMEMA")
            .dsets(["A.HEAD", "B.HEAD"])
            .prefix("out")
            .options(["-jobs", "2"])
            .to_config();

        assert_eq!(config.command, "3dMEMA");
        assert_eq!(config.dsets.len(), 1);
        assert_eq!(config.prefix.as_deref(), Some("out"));
        assert_eq!(config.options, vec!["-jobs", "2"]);
    }

    #[test]
    fn test_compose_single_line() {
        let cmd = GroupCommand::new("3dMEMA")
            .dsets(["A.HEAD", "B.HEAD"])
            .prefix("out")
            .compose()
            .unwrap();
        assert_eq!(
            cmd,
            "3dMEMA -prefix out -set Set1 A A.HEAD'[0]' A.HEAD'[1]' B B.HEAD'[0]' B.HEAD'[1]'"
        );
    }

    #[test]
    fn test_generate_wrapped() {
        let out = GroupCommand::new("3dMEMA")
            .dsets(["A.HEAD", "B.HEAD"])
            .prefix("out")
            .generate(&WrapStyle::default())
            .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("3dMEMA -prefix out"));
        assert!(lines[0].ends_with(" \\"));
        assert!(lines[1].trim_start().starts_with("-set Set1 A"));
    }

    #[test]
    fn test_config_yaml() {
        let config = example_config();
        let yaml = config.to_yaml().unwrap();

        // Verify it can be parsed back
        let parsed = CommandConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_yaml_numeric_selectors() {
        let yaml = "\
command: 3dMEMA
dsets:
  - [A.HEAD, B.HEAD]
  - [C.HEAD, D.HEAD]
set_labels: [Vrel, Arel]
subs_betas: [0, 2]
subs_tstats: ['1', 3]
";
        let config = CommandConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.subs_betas, Some(vec!["0".to_string(), "2".to_string()]));
        assert_eq!(config.subs_tstats, Some(vec!["1".to_string(), "3".to_string()]));
        assert_eq!(config.test_type, None);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "command: 3dMEMA").unwrap();
        writeln!(file, "type: unpaired").unwrap();
        writeln!(file, "dsets:").unwrap();
        writeln!(file, "  - [g1/s1.HEAD, g1/s2.HEAD]").unwrap();
        writeln!(file, "  - [g2/s3.HEAD, g2/s4.HEAD]").unwrap();
        file.flush().unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let config = CommandConfig::from_yaml(&text).unwrap();
        let cmd = GroupCommand::from_config(&config).compose().unwrap();
        assert!(cmd.starts_with("3dMEMA -groups Set1 Set2 -set Set1 s1 "));
    }

    #[test]
    fn test_example_config_generates() {
        let out = generate_command(&example_config(), &WrapStyle::default()).unwrap();
        assert!(out.starts_with("3dMEMA -prefix mema_vrel_arel"));
        assert!(out.contains("-conditions Vrel Arel"));
        assert!(out.contains("FP stats.FP+tlrc.HEAD'[Vrel#0_Coef]'"));
        assert!(out.trim_end().ends_with("-jobs 2"));
    }

    #[test]
    fn test_generate_error() {
        let err = generate_command(
            &GroupCommand::new("3dANOVA2").dsets(["A.HEAD"]).to_config(),
            &WrapStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GroupCmdError::UnsupportedProgram { .. }));
    }
}
