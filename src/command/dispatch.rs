//! Program dispatch.
//!
//! A command starts `Unselected`, becomes `Recognized` or `Rejected` once a
//! program name is selected, and a recognized program moves to `Composed`.
//! There are no other transitions.

use super::compose::compose;
use super::spec::{CommandSpec, Program};
use crate::error::{GroupCmdError, Result};

/// Dispatch state for a single command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Unselected,
    Recognized(Program),
    Composed(String),
    Rejected(String),
}

impl Dispatch {
    /// Select a program by name.
    ///
    /// Only an `Unselected` state selects; any other state is returned as is.
    pub fn select(self, name: &str) -> Self {
        match self {
            Dispatch::Unselected => match Program::from_name(name) {
                Ok(program) => Dispatch::Recognized(program),
                Err(_) => {
                    log::debug!("rejecting unsupported program '{}'", name.trim());
                    Dispatch::Rejected(name.trim().to_string())
                }
            },
            other => other,
        }
    }

    /// The recognized program.
    pub fn program(&self) -> Result<Program> {
        match self {
            Dispatch::Recognized(program) => Ok(*program),
            Dispatch::Rejected(name) => Err(GroupCmdError::UnsupportedProgram { name: name.clone() }),
            Dispatch::Unselected => Err(GroupCmdError::config("no program selected")),
            Dispatch::Composed(_) => Err(GroupCmdError::config("command already composed")),
        }
    }

    /// Compose the command for a recognized program.
    pub fn compose(self, spec: &CommandSpec) -> Result<Self> {
        let program = self.program()?;
        if program != spec.program() {
            return Err(GroupCmdError::config(format!(
                "selected program {} does not match command for {}",
                program,
                spec.program()
            )));
        }
        Ok(Dispatch::Composed(compose(spec)?))
    }

    /// The composed command, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            Dispatch::Composed(cmd) => Some(cmd.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CommandConfig;

    fn spec() -> CommandSpec {
        let config = CommandConfig {
            command: "3dMEMA".to_string(),
            dsets: vec![vec!["A.HEAD".to_string(), "B.HEAD".to_string()]],
            ..Default::default()
        };
        CommandSpec::from_config(&config).unwrap()
    }

    #[test]
    fn test_recognized_to_composed() {
        let state = Dispatch::Unselected.select("3dMEMA");
        assert_eq!(state, Dispatch::Recognized(Program::Mema));

        let state = state.compose(&spec()).unwrap();
        assert!(state.command().unwrap().starts_with("3dMEMA "));
    }

    #[test]
    fn test_rejected() {
        let state = Dispatch::Unselected.select("3dANOVA2");
        assert_eq!(state, Dispatch::Rejected("3dANOVA2".to_string()));

        let err = state.compose(&spec()).unwrap_err();
        assert!(matches!(err, GroupCmdError::UnsupportedProgram { ref name } if name == "3dANOVA2"));
    }

    #[test]
    fn test_no_retry() {
        let state = Dispatch::Unselected.select("3dANOVA2").select("3dMEMA");
        assert_eq!(state, Dispatch::Rejected("3dANOVA2".to_string()));

        let composed = Dispatch::Unselected
            .select("3dMEMA")
            .compose(&spec())
            .unwrap();
        assert!(composed.clone().compose(&spec()).is_err());
        assert!(composed.select("3dMEMA").command().is_some());
    }

    #[test]
    fn test_unselected() {
        assert!(Dispatch::Unselected.compose(&spec()).is_err());
        assert!(Dispatch::Unselected.command().is_none());
    }
}
