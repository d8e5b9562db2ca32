//! Group Command Generation Library
//!
//! Builds group-level analysis commands (currently AFNI's `3dMEMA`) from
//! lists of per-subject datasets, checking that labels, sub-brick selectors
//! and test types are consistent before anything is emitted.
//!
//! # Overview
//!
//! - **data**: Groups, subjects (ID derivation) and sub-brick selectors
//! - **command**: Programs, validation, dispatch and composition
//! - **format**: Shell line wrapping
//! - **pipeline**: Configuration, builder and end-to-end generation
//!
//! # Example
//!
//! ```
//! use group_command::prelude::*;
//!
//! let cmd = GroupCommand::new("3dMEMA")
//!     .dsets(["stats.FP+tlrc.HEAD", "stats.FT+tlrc.HEAD"])
//!     .prefix("mema_result")
//!     .generate(&WrapStyle::default())
//!     .unwrap();
//!
//! assert!(cmd.starts_with("3dMEMA -prefix mema_result"));
//! ```

pub mod command;
pub mod data;
pub mod error;
pub mod format;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::command::{
        compose, compose_tokens, validate, CommandSpec, Dispatch, Program, TestType, Validated,
    };
    pub use crate::data::{
        derive_subject_ids, resolve_selectors, Group, SelectorPair, SelectorSet, SubBrick,
        Subject, SubjectList,
    };
    pub use crate::error::{GroupCmdError, Result};
    pub use crate::format::{add_line_wrappers, WrapStyle};
    pub use crate::pipeline::{
        compose_spec, example_config, generate_command, CommandConfig, GroupCommand,
    };
}
