use crate::group::Group;
use crate::record::NO_HIT;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters accumulated over one run, reported once at the end.
#[derive(Serialize, Debug, Default)]
pub struct MergeStatistics {
    pub files: usize,
    pub hits: usize,
    pub groups: usize,
    pub no_hit_groups: usize,
    pub multi_hit_groups: usize,
    /// group size -> number of groups of that size
    pub distribution: BTreeMap<usize, usize>,
}

impl MergeStatistics {
    pub fn record_group(&mut self, group: &Group) {
        let size = group.len();

        self.hits += size;
        self.groups += 1;
        *self.distribution.entry(size).or_insert(0) += 1;

        if size > 1 {
            self.multi_hit_groups += 1;
        }

        if group.accessions.iter().all(|a| a == NO_HIT) {
            self.no_hit_groups += 1;
        }
    }
}

/// Logs the end-of-run counters, both human-readable and as one JSON line.
pub fn report(stats: &MergeStatistics) -> Result<()> {
    info!(
        "Merged {} hit(s) into {} group(s) across {} file(s) ({} no-hit, {} with multiple hits)",
        stats.hits, stats.groups, stats.files, stats.no_hit_groups, stats.multi_hit_groups
    );
    info!("Summary: {}", serde_json::to_string(stats)?);

    Ok(())
}
