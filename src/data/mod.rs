//! Data structures for group command generation.

mod group;
mod selector;
mod subject;

pub use group::Group;
pub use selector::{
    resolve_selectors, SelectorPair, SelectorSet, SubBrick, DEFAULT_BETA_INDEX,
    DEFAULT_TSTAT_INDEX,
};
pub use subject::{derive_subject_ids, Subject, SubjectList};
