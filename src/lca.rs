use itertools::Itertools;
use thiserror::Error;

/// Rank label emitted at positions where the group's lineages disagree.
pub const WILDCARD: &str = "*";

/// Depth to which a set of lineages can be compared positionally.
///
/// All lineages are cut to the length of the shallowest one before any rank
/// is compared; ranks below that depth are dropped from the consensus.
pub fn comparable_depth(lineages: &[Vec<String>]) -> usize {
    lineages.iter().map(Vec::len).min().unwrap_or(0)
}

/// Folds a group's lineages into their last common ancestor.
///
/// A single lineage is its own consensus, verbatim. For several, each rank
/// position up to `comparable_depth` is compared across all lineages:
/// agreement keeps the shared label, any disagreement yields `*`.
///
/// # Errors
///
/// Returns `ReduceErr::EmptyGroup` when called with no lineages at all. A
/// group without lineage data means the upstream grouping is broken, and the
/// run must stop rather than emit a malformed row.
pub fn last_common_ancestor(lineages: &[Vec<String>]) -> Result<Vec<String>, ReduceErr> {
    match lineages {
        [] => Err(ReduceErr::EmptyGroup),
        [only] => Ok(only.clone()),
        _ => {
            let depth = comparable_depth(lineages);

            Ok((0..depth)
                .map(|rank| {
                    if lineages.iter().map(|lineage| &lineage[rank]).all_equal() {
                        lineages[0][rank].clone()
                    } else {
                        WILDCARD.to_string()
                    }
                })
                .collect())
        }
    }
}

#[derive(Error, Debug)]
pub enum ReduceErr {
    #[error("group claims hits but carries no lineage data")]
    EmptyGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage(ranks: &[&str]) -> Vec<String> {
        ranks.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn a_single_lineage_is_its_own_consensus() {
        let only = lineage(&["Bacteria", "Firmicutes", "Bacillus"]);
        let lca = last_common_ancestor(&[only.clone()]).unwrap();
        assert_eq!(lca, only);
    }

    #[test]
    fn full_agreement_keeps_every_rank() {
        let l = lineage(&["Bacteria", "Firmicutes", "Bacillus"]);
        let lca = last_common_ancestor(&[l.clone(), l.clone(), l.clone()]).unwrap();
        assert_eq!(lca, l);
    }

    #[test]
    fn total_disagreement_is_all_wildcards() {
        let lca = last_common_ancestor(&[
            lineage(&["Bacteria", "Firmicutes"]),
            lineage(&["Archaea", "Euryarchaeota", "Halobacteria"]),
        ])
        .unwrap();

        assert_eq!(lca, lineage(&["*", "*"]));
    }

    #[test]
    fn partial_agreement_masks_only_the_contested_rank() {
        let lca = last_common_ancestor(&[
            lineage(&["A", "B", "C"]),
            lineage(&["A", "X", "C"]),
        ])
        .unwrap();

        assert_eq!(lca, lineage(&["A", "*", "C"]));
    }

    #[test]
    fn ranks_below_the_shallowest_lineage_are_dropped() {
        let lca = last_common_ancestor(&[
            lineage(&["A", "B", "C"]),
            lineage(&["A", "B"]),
        ])
        .unwrap();

        assert_eq!(lca, lineage(&["A", "B"]));
    }

    #[test]
    fn comparable_depth_is_the_shallowest_length() {
        assert_eq!(
            comparable_depth(&[lineage(&["A", "B", "C"]), lineage(&["A", "B"])]),
            2
        );
        assert_eq!(comparable_depth(&[lineage(&["A"])]), 1);
        assert_eq!(comparable_depth(&[]), 0);
    }

    #[test]
    fn an_empty_group_is_an_error() {
        assert!(matches!(
            last_common_ancestor(&[]),
            Err(ReduceErr::EmptyGroup)
        ));
    }
}
