//! Display formatting for generated commands.

mod wrap;

pub use wrap::{add_line_wrappers, WrapStyle};
