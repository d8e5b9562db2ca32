//! Command setup, validation, dispatch and composition.

mod compose;
mod dispatch;
mod spec;
mod validate;

pub use compose::{compose, compose_tokens};
pub use dispatch::Dispatch;
pub use spec::{CommandSpec, Program, TestType};
pub use validate::{validate, Validated};
