use crate::group::GroupReader;
use crate::lca;
use crate::record::{ConsensusRow, HitRecord};
use crate::summary::MergeStatistics;

use anyhow::{bail, Context, Result};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename prefix selecting input tables inside the target directory.
pub const HITS_PREFIX: &str = "hits.";

/// Prefix of the output table written next to each input table.
pub const RESULTS_PREFIX: &str = "results.";

pub struct MergeOpts {
    pub strict_groups: bool,
}

#[derive(Error, Debug)]
pub enum MergeErr {
    #[error("directory {} not found", .0.display())]
    MissingDirectory(PathBuf),

    #[error(
        "empty input file(s), refusing to process the batch:
{}",
        .0.join("\n")
    )]
    EmptyInputs(Vec<String>),
}

/// Merges every `hits.*` table under `directory` into a `results.*` sibling.
///
/// Files are handled one at a time in lexicographic filename order, each in
/// a single pass, with no state shared between them. The first error of any
/// kind aborts the run.
///
/// # Errors
///
/// Fails before touching any file if the directory does not exist, or if any
/// selected input is zero bytes long (an upstream failure signal; partial
/// results for the rest of the batch would silently misreport the run).
/// Afterwards, any malformed line or reduction failure aborts mid-file with
/// the offending file in the error chain.
pub fn merge(directory: &Path, opts: &MergeOpts) -> Result<MergeStatistics> {
    if !directory.is_dir() {
        bail!(MergeErr::MissingDirectory(directory.to_path_buf()));
    }

    let files = discover(directory)?;
    info!(
        "Found {} hits table(s) in {}",
        files.len(),
        directory.display()
    );

    preflight(&files)?;

    let mut stats = MergeStatistics::default();

    for input in &files {
        let output = results_path(input)?;
        info!("{} -> {}", input.display(), output.display());

        merge_file(input, &output, opts, &mut stats)
            .with_context(|| format!("while processing {}", input.display()))?;

        stats.files += 1;
    }

    Ok(stats)
}

/// Lists the `hits.*` tables of `directory` in lexicographic filename order.
fn discover(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries = fs::read_dir(directory)
        .with_context(|| format!("could not list directory {}", directory.display()))?;

    for entry in entries {
        let entry = entry?;
        let is_file = entry.file_type()?.is_file();

        if is_file && entry.file_name().to_string_lossy().starts_with(HITS_PREFIX) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Rejects the whole batch if any selected input is zero bytes long.
fn preflight(files: &[PathBuf]) -> Result<()> {
    let mut empty = Vec::new();

    for file in files {
        let metadata = fs::metadata(file)
            .with_context(|| format!("could not stat {}", file.display()))?;

        if metadata.len() == 0 {
            empty.push(file.display().to_string());
        }
    }

    if !empty.is_empty() {
        bail!(MergeErr::EmptyInputs(empty));
    }

    Ok(())
}

/// Maps `hits.X` to a `results.X` path in the same directory.
fn results_path(input: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("unreadable filename {}", input.display()))?;

    let suffix = name
        .strip_prefix(HITS_PREFIX)
        .with_context(|| format!("{name} does not start with `{HITS_PREFIX}`"))?;

    Ok(input.with_file_name(format!("{RESULTS_PREFIX}{suffix}")))
}

/// Processes one hits table into its results table.
///
/// One pass: lines are parsed, grouped on amplicon id boundaries, folded
/// into their last common ancestor and written out, one row per group, in
/// first-appearance order.
fn merge_file(
    input: &Path,
    output: &Path,
    opts: &MergeOpts,
    stats: &mut MergeStatistics,
) -> Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("could not open {}", input.display()))?,
    );

    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(output)
        .with_context(|| format!("could not create {}", output.display()))?;

    let records = reader
        .lines()
        .enumerate()
        .map(|(index, line)| -> Result<HitRecord> {
            let line = line?;
            let record = HitRecord::parse(line.trim_end())
                .with_context(|| format!("line {}", index + 1))?;
            Ok(record)
        });

    for group in GroupReader::new(records, opts.strict_groups) {
        let group = group?;

        let lineage = lca::last_common_ancestor(&group.lineages)
            .with_context(|| format!("amplicon `{}`", group.amplicon))?;

        stats.record_group(&group);

        wtr.serialize(ConsensusRow {
            amplicon: group.amplicon,
            abundance: group.abundance,
            identity: group.identity,
            lineage: lineage.join("|"),
            accessions: group.accessions.join(","),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
