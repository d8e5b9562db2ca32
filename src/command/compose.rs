//! Command composition.
//!
//! Produces a single-line command from a [`CommandSpec`]. For 3dMEMA the
//! layout is:
//!
//! ```text
//! 3dMEMA [-prefix P] [-groups|-conditions L1 L2]
//!        -set L1 ID dset'[BETA]' dset'[TSTAT]' ... [-set L2 ...] [OPTIONS]
//! ```

use super::spec::{CommandSpec, Program, TestType};
use crate::data::{Group, SelectorPair};
use crate::error::{GroupCmdError, Result};

/// Compose the command as one space-separated line.
pub fn compose(spec: &CommandSpec) -> Result<String> {
    Ok(compose_tokens(spec)?.join(" "))
}

/// Compose the command as an ordered token list.
pub fn compose_tokens(spec: &CommandSpec) -> Result<Vec<String>> {
    let mut tokens = vec![spec.program().name().to_string()];

    if let Some(prefix) = spec.prefix() {
        tokens.push("-prefix".to_string());
        tokens.push(prefix.to_string());
    }

    match spec.program() {
        Program::Mema => mema_tokens(spec, &mut tokens)?,
    }

    tokens.extend(spec.options().iter().cloned());
    Ok(tokens)
}

fn mema_tokens(spec: &CommandSpec, tokens: &mut Vec<String>) -> Result<()> {
    let groups = spec.groups();
    let selectors = spec.selectors();
    if selectors.len() != groups.len() {
        return Err(GroupCmdError::PairingMismatch {
            what: "selector pairs".to_string(),
            expected: groups.len(),
            actual: selectors.len(),
        });
    }

    match (groups, spec.test_type()) {
        // one-sample: a single set, no header
        ([_], None) => {}
        ([first, second], test_type) => {
            if test_type == Some(TestType::Paired) {
                check_pairing(first, second)?;
                tokens.push("-conditions".to_string());
            } else {
                tokens.push("-groups".to_string());
            }
            tokens.push(first.label.clone());
            tokens.push(second.label.clone());
        }
        _ => {
            return Err(GroupCmdError::PairingMismatch {
                what: "dataset groups".to_string(),
                expected: 2,
                actual: groups.len(),
            });
        }
    }

    for (group, pair) in groups.iter().zip(selectors.iter()) {
        push_set(tokens, group, pair);
    }
    Ok(())
}

/// Append `-set LABEL` and one `ID dset'[beta]' dset'[tstat]'` entry per subject.
fn push_set(tokens: &mut Vec<String>, group: &Group, pair: &SelectorPair) {
    tokens.push("-set".to_string());
    tokens.push(group.label.clone());
    for subject in group.subjects.iter() {
        tokens.push(subject.id.clone());
        tokens.push(format!("{}'[{}]'", subject.dataset, pair.beta));
        tokens.push(format!("{}'[{}]'", subject.dataset, pair.tstat));
    }
}

/// Paired sets need the same number of subjects; entries are matched by position.
fn check_pairing(first: &Group, second: &Group) -> Result<()> {
    if first.len() != second.len() {
        return Err(GroupCmdError::PairingMismatch {
            what: format!("subjects in set '{}'", second.label),
            expected: first.len(),
            actual: second.len(),
        });
    }

    let first_ids = first.subjects.ids();
    let second_ids = second.subjects.ids();
    let differing = first_ids
        .iter()
        .zip(&second_ids)
        .filter(|(a, b)| a != b)
        .count();
    if differing > 0 {
        log::warn!(
            "paired sets '{}' and '{}' differ in {} of {} subject IDs; pairing is by position",
            first.label,
            second.label,
            differing,
            first.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CommandConfig;

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn spec(config: CommandConfig) -> CommandSpec {
        CommandSpec::from_config(&config).unwrap()
    }

    #[test]
    fn test_one_sample() {
        let cmd = compose(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            dsets: vec![strs(&["A.HEAD", "B.HEAD"])],
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(
            cmd,
            "3dMEMA -set Set1 A A.HEAD'[0]' A.HEAD'[1]' B B.HEAD'[0]' B.HEAD'[1]'"
        );
    }

    #[test]
    fn test_prefix_and_options_placement() {
        let tokens = compose_tokens(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            prefix: Some("mema_result".to_string()),
            dsets: vec![strs(&["A.HEAD", "B.HEAD"])],
            options: strs(&["-jobs", "2", "-HKtest"]),
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(&tokens[..3], &["3dMEMA", "-prefix", "mema_result"]);
        assert_eq!(&tokens[tokens.len() - 3..], &["-jobs", "2", "-HKtest"]);
    }

    #[test]
    fn test_unpaired_two_sample() {
        let cmd = compose(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            dsets: vec![strs(&["a1.HEAD", "a2.HEAD"]), strs(&["b1.HEAD"])],
            set_labels: Some(strs(&["patients", "controls"])),
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(
            cmd,
            "3dMEMA -groups patients controls \
             -set patients a1 a1.HEAD'[0]' a1.HEAD'[1]' a2 a2.HEAD'[0]' a2.HEAD'[1]' \
             -set controls b1 b1.HEAD'[0]' b1.HEAD'[1]'"
        );
    }

    #[test]
    fn test_paired_two_sample() {
        let cmd = compose(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            test_type: Some("paired".to_string()),
            dsets: vec![strs(&["A.HEAD"]), strs(&["B.HEAD"])],
            set_labels: Some(strs(&["Vrel", "Arel"])),
            subs_betas: Some(strs(&["0", "2"])),
            subs_tstats: Some(strs(&["1", "3"])),
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(
            cmd,
            "3dMEMA -conditions Vrel Arel \
             -set Vrel A A.HEAD'[0]' A.HEAD'[1]' \
             -set Arel B B.HEAD'[2]' B.HEAD'[3]'"
        );
    }

    #[test]
    fn test_label_selectors() {
        let cmd = compose(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            dsets: vec![strs(&["s1.HEAD", "s2.HEAD"])],
            subs_betas: Some(strs(&["Vrel#0_Coef"])),
            subs_tstats: Some(strs(&["Vrel#0_Tstat"])),
            ..Default::default()
        }))
        .unwrap();

        assert!(cmd.contains("s1 s1.HEAD'[Vrel#0_Coef]' s1.HEAD'[Vrel#0_Tstat]'"));
    }

    #[test]
    fn test_paired_count_mismatch() {
        let err = compose(&spec(CommandConfig {
            command: "3dMEMA".to_string(),
            test_type: Some("paired".to_string()),
            dsets: vec![strs(&["a.HEAD", "b.HEAD", "c.HEAD"]), strs(&["a.HEAD", "b.HEAD"])],
            ..Default::default()
        }))
        .unwrap_err();

        match err {
            GroupCmdError::PairingMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_deterministic() {
        let s = spec(CommandConfig {
            command: "3dMEMA".to_string(),
            dsets: vec![strs(&["x1.HEAD", "x2.HEAD"]), strs(&["y1.HEAD", "y2.HEAD"])],
            ..Default::default()
        });
        assert_eq!(compose(&s).unwrap(), compose(&s).unwrap());
    }
}
