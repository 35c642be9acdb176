// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural checks run by the builder before a graph is handed out.
//!
//! The checks run in a fixed order and the first failure wins:
//!
//! 1. **Cycle detection**: DFS with three marks (unvisited, in progress,
//!    done). Reaching an in-progress node closes a cycle.
//! 2. **Duplicate references**: no node may reach the same node twice.
//! 3. **Unknown references**: every index must address a node. The builder
//!    never produces one, so this guards the resolver itself.
//!
//! Edges follow each node's reference list, i.e. from a node to the nodes
//! that start after it.

use crate::errors::BuildError;
use crate::utils::first_duplicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Run every check over `references`, where `references[i]` lists the node
/// indices referenced by the node named `names[i]`.
pub(crate) fn validate(names: &[&str], references: &[Vec<usize>]) -> Result<(), BuildError> {
    check_cycle(names, references)?;
    check_duplicate(names, references)?;
    check_unknown_reference(names, references)?;
    Ok(())
}

fn check_cycle(names: &[&str], references: &[Vec<usize>]) -> Result<(), BuildError> {
    let mut marks = vec![Mark::Unvisited; references.len()];

    for start in 0..references.len() {
        if marks[start] == Mark::Unvisited {
            if let Some(cycle) = visit(start, references, &mut marks) {
                return Err(BuildError::CycleDetected {
                    cycle: cycle.into_iter().map(|index| names[index].to_string()).collect(),
                });
            }
        }
    }
    Ok(())
}

/// Iterative DFS from `start`. Returns the node indices on the first cycle
/// found, closing node repeated.
///
/// Each stack entry is a node on the current path and the position of the
/// next reference to follow from it, so the stack doubles as the path.
fn visit(start: usize, references: &[Vec<usize>], marks: &mut [Mark]) -> Option<Vec<usize>> {
    let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
    marks[start] = Mark::InProgress;

    while let Some((index, cursor)) = stack.last_mut() {
        let index = *index;
        let Some(&next) = references[index].get(*cursor) else {
            marks[index] = Mark::Done;
            stack.pop();
            continue;
        };
        *cursor += 1;

        // Out-of-range indices are reported by check_unknown_reference.
        match marks.get(next) {
            Some(Mark::InProgress) => {
                let from = stack.iter().position(|&(on_path, _)| on_path == next)?;
                let mut cycle: Vec<usize> = stack[from..].iter().map(|&(node, _)| node).collect();
                cycle.push(next);
                return Some(cycle);
            }
            Some(Mark::Unvisited) => {
                marks[next] = Mark::InProgress;
                stack.push((next, 0));
            }
            Some(Mark::Done) | None => {}
        }
    }
    None
}

fn check_duplicate(names: &[&str], references: &[Vec<usize>]) -> Result<(), BuildError> {
    for (index, targets) in references.iter().enumerate() {
        if let Some(&duplicate) = first_duplicate(targets) {
            return Err(BuildError::DuplicateReference {
                node: names[index].to_string(),
                reference: names.get(duplicate).copied().unwrap_or("<unknown>").to_string(),
            });
        }
    }
    Ok(())
}

fn check_unknown_reference(names: &[&str], references: &[Vec<usize>]) -> Result<(), BuildError> {
    for (index, targets) in references.iter().enumerate() {
        if let Some(&unknown) = targets.iter().find(|&&target| target >= references.len()) {
            return Err(BuildError::UnknownReference {
                node: names[index].to_string(),
                index: unknown,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 4] = ["a", "b", "c", "d"];

    #[test]
    fn test_empty() {
        assert!(validate(&[], &[]).is_ok());
    }

    #[test]
    fn test_acyclic() {
        let references = vec![vec![], vec![0], vec![0, 1], vec![2]];
        assert!(check_cycle(&NAMES, &references).is_ok());
        assert!(validate(&NAMES, &references).is_ok());
    }

    #[test]
    fn test_cycle() {
        let references = vec![vec![3], vec![0], vec![0, 1], vec![2]];
        match check_cycle(&NAMES, &references) {
            Err(BuildError::CycleDetected { cycle }) => {
                assert_eq!(cycle, vec!["a", "d", "c", "a"]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let references = vec![vec![0]];
        assert!(matches!(
            check_cycle(&["a"], &references),
            Err(BuildError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let count = 200_000;
        let names: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut references: Vec<Vec<usize>> = (1..count).map(|next| vec![next]).collect();
        references.push(vec![]);

        assert!(validate(&names, &references).is_ok());

        references[count - 1].push(0);
        match check_cycle(&names, &references) {
            Err(BuildError::CycleDetected { cycle }) => {
                assert_eq!(cycle.len(), count + 1);
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate() {
        assert!(check_duplicate(&NAMES[..2], &[vec![1], vec![]]).is_ok());
        match check_duplicate(&NAMES[..2], &[vec![1, 1], vec![]]) {
            Err(BuildError::DuplicateReference { node, reference }) => {
                assert_eq!(node, "a");
                assert_eq!(reference, "b");
            }
            other => panic!("expected a duplicate, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_reference() {
        assert!(check_unknown_reference(&NAMES[..2], &[vec![1], vec![]]).is_ok());
        assert!(matches!(
            check_unknown_reference(&NAMES[..2], &[vec![1], vec![9]]),
            Err(BuildError::UnknownReference { index: 9, .. })
        ));
    }

    #[test]
    fn test_checks_run_in_order() {
        // Cycle and duplicate together: the cycle is reported.
        let references = vec![vec![1, 1], vec![0]];
        assert!(matches!(
            validate(&NAMES[..2], &references),
            Err(BuildError::CycleDetected { .. })
        ));

        // Unknown index does not trip the cycle check.
        let references = vec![vec![7], vec![]];
        assert!(matches!(
            validate(&NAMES[..2], &references),
            Err(BuildError::UnknownReference { .. })
        ));
    }
}
