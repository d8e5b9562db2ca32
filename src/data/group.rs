//! Dataset groups (one per condition or sample).

use super::subject::SubjectList;
use serde::{Deserialize, Serialize};

/// An ordered set of subject datasets for one condition or sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Set name used in the generated command.
    pub label: String,
    /// Subjects in dataset order.
    pub subjects: SubjectList,
}

impl Group {
    /// Create a group with an explicit label.
    pub fn new(label: impl Into<String>, subjects: SubjectList) -> Self {
        Self {
            label: label.into(),
            subjects,
        }
    }

    /// Positional set name for group `index` (0-based) when no labels are given.
    pub fn default_label(index: usize) -> String {
        format!("Set{}", index + 1)
    }

    /// Number of subjects in the group.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Check if the group has no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
