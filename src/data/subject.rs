//! Subject identity derivation from dataset names.
//!
//! Subject IDs are taken from the part of the dataset names that varies:
//! given `stats.FP+tlrc.HEAD` and `stats.FT+tlrc.HEAD`, the IDs are `FP` and
//! `FT`. A lone dataset falls back to its base name without extensions.

use crate::error::{GroupCmdError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Dataset file extensions removed when naming a lone dataset.
const DATASET_EXTENSIONS: &[&str] = &[
    ".BRIK.gz", ".HEAD", ".BRIK", ".nii.gz", ".nii", ".niml.dset", ".1D", ".gii",
];

/// AFNI view suffixes removed after the extension.
const VIEW_SUFFIXES: &[&str] = &["+orig", "+acpc", "+tlrc"];

/// One dataset's derived identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject ID, including any prefix/suffix.
    pub id: String,
    /// Dataset reference as given by the caller.
    pub dataset: String,
}

/// Ordered subjects for one group of datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectList {
    subjects: Vec<Subject>,
}

impl SubjectList {
    /// Build a subject list, deriving IDs from the dataset names.
    ///
    /// `prefix` and `suffix` are applied to every derived ID. Dataset order
    /// is preserved.
    pub fn from_datasets(datasets: &[String], prefix: &str, suffix: &str) -> Result<Self> {
        let ids = derive_subject_ids(datasets)?;
        let subjects = ids
            .into_iter()
            .zip(datasets)
            .map(|(id, dataset)| Subject {
                id: format!("{}{}{}", prefix, id, suffix),
                dataset: dataset.clone(),
            })
            .collect();

        Ok(Self { subjects })
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Iterate over subjects in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    /// Subject IDs in order.
    pub fn ids(&self) -> Vec<&str> {
        self.subjects.iter().map(|s| s.id.as_str()).collect()
    }

    /// Dataset references in order.
    pub fn datasets(&self) -> Vec<&str> {
        self.subjects.iter().map(|s| s.dataset.as_str()).collect()
    }
}

/// Derive one subject ID per name from the substring that varies across names.
///
/// Identical names cannot be told apart and are rejected, as are names that
/// produce an empty or duplicate ID.
pub fn derive_subject_ids(names: &[String]) -> Result<Vec<String>> {
    match names {
        [] => Ok(Vec::new()),
        [single] => {
            let id = strip_dataset_name(single);
            if id.is_empty() {
                return Err(GroupCmdError::SubjectId(format!(
                    "cannot derive a subject ID from dataset '{}'",
                    single
                )));
            }
            Ok(vec![id])
        }
        _ => derive_from_differences(names),
    }
}

fn derive_from_differences(names: &[String]) -> Result<Vec<String>> {
    let chars: Vec<Vec<char>> = names.iter().map(|n| n.chars().collect()).collect();
    let min_len = chars.iter().map(|c| c.len()).min().unwrap_or(0);

    let first = &chars[0];
    if chars.iter().all(|c| c == first) {
        return Err(GroupCmdError::SubjectId(format!(
            "all {} dataset names are identical ('{}')",
            names.len(),
            names[0]
        )));
    }

    let prefix_len = (0..min_len)
        .take_while(|&i| chars.iter().all(|c| c[i] == first[i]))
        .count();

    let max_suffix = min_len - prefix_len;
    let suffix_len = (1..=max_suffix)
        .take_while(|&k| {
            let ch = first[first.len() - k];
            chars.iter().all(|c| c[c.len() - k] == ch)
        })
        .count();

    // Widen the window so IDs do not start or end mid-word.
    let mut start = prefix_len;
    while start > 0 && first[start - 1].is_ascii_alphanumeric() {
        start -= 1;
    }
    let mut tail = suffix_len;
    while tail > 0 && first[first.len() - tail].is_ascii_alphanumeric() {
        tail -= 1;
    }

    let ids: Vec<String> = chars
        .iter()
        .map(|c| c[start..c.len() - tail].iter().collect())
        .collect();

    let mut seen = HashSet::new();
    for (id, name) in ids.iter().zip(names) {
        if id.is_empty() {
            return Err(GroupCmdError::SubjectId(format!(
                "empty subject ID derived from dataset '{}'",
                name
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(GroupCmdError::SubjectId(format!(
                "duplicate subject ID '{}' (dataset '{}')",
                id, name
            )));
        }
    }

    log::debug!(
        "subject IDs from {} datasets: common prefix {} chars, suffix {} chars",
        names.len(),
        start,
        tail
    );

    Ok(ids)
}

/// Base name of a dataset with directory, extension and view removed.
fn strip_dataset_name(name: &str) -> String {
    let mut base = name.rsplit('/').next().unwrap_or(name);

    if let Some(ext) = DATASET_EXTENSIONS.iter().find(|e| base.ends_with(*e)) {
        base = &base[..base.len() - ext.len()];
    }
    if let Some(view) = VIEW_SUFFIXES.iter().find(|v| base.ends_with(*v)) {
        base = &base[..base.len() - view.len()];
    }

    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_ids() {
        let ids = derive_subject_ids(&names(&["A.HEAD", "B.HEAD"])).unwrap();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_ids_widen_to_word() {
        let ids = derive_subject_ids(&names(&[
            "OLSQ.FP.betas+tlrc.HEAD",
            "OLSQ.FT.betas+tlrc.HEAD",
            "OLSQ.GM.betas+tlrc.HEAD",
        ]))
        .unwrap();
        assert_eq!(ids, vec!["FP", "FT", "GM"]);
    }

    #[test]
    fn test_ids_with_shared_digits() {
        let ids = derive_subject_ids(&names(&["s1.HEAD", "s10.HEAD", "s2.HEAD"])).unwrap();
        assert_eq!(ids, vec!["s1", "s10", "s2"]);
    }

    #[test]
    fn test_ids_with_directories() {
        let ids = derive_subject_ids(&names(&[
            "groupA/stats.subj01+tlrc.HEAD",
            "groupA/stats.subj02+tlrc.HEAD",
        ]))
        .unwrap();
        assert_eq!(ids, vec!["subj01", "subj02"]);
    }

    #[test]
    fn test_single_dataset() {
        let ids = derive_subject_ids(&names(&["data/stats.FP+tlrc.HEAD"])).unwrap();
        assert_eq!(ids, vec!["stats.FP"]);

        let ids = derive_subject_ids(&names(&["sub-01.nii.gz"])).unwrap();
        assert_eq!(ids, vec!["sub-01"]);
    }

    #[test]
    fn test_identical_names_rejected() {
        let err = derive_subject_ids(&names(&["A.HEAD", "A.HEAD"])).unwrap_err();
        assert!(matches!(err, GroupCmdError::SubjectId(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = derive_subject_ids(&names(&["A.HEAD", "B.HEAD", "A.HEAD"])).unwrap_err();
        assert!(err.to_string().contains("duplicate subject ID 'A'"));
    }

    #[test]
    fn test_empty_input() {
        assert!(derive_subject_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_subject_list_prefix_suffix() {
        let list =
            SubjectList::from_datasets(&names(&["A.HEAD", "B.HEAD"]), "subj_", "_v1").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.ids(), vec!["subj_A_v1", "subj_B_v1"]);
        assert_eq!(list.datasets(), vec!["A.HEAD", "B.HEAD"]);
    }
}
