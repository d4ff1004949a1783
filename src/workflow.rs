//! Automatic folder merges and manual two-file merges

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::PairingRules;
use crate::error::Result;
use crate::pairing::{merged_file_name, pair_buckets, scan_directory, FilePair};
use crate::pdf::{merge_pdfs, MergeOptions};
use crate::validate::{validate_auto, validate_manual};

/// A merged PDF written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFile {
    pub output: PathBuf,
    pub pages: usize,
}

/// A pair whose merge failed
#[derive(Debug, Clone)]
pub struct FailedPair {
    pub pair: FilePair,
    pub reason: String,
}

/// Outcome of [`auto_merge`]
#[derive(Debug, Clone, Default)]
pub struct AutoMergeReport {
    /// Number of resolution/stipulation pairs found
    pub pairs_found: usize,
    pub merged: Vec<(FilePair, MergedFile)>,
    pub failed: Vec<FailedPair>,
    /// PDFs skipped because their name lacks a leading number
    pub unkeyed: Vec<String>,
}

impl AutoMergeReport {
    /// No pair was found, so nothing was written
    pub fn is_empty(&self) -> bool {
        self.pairs_found == 0
    }
}

/// Pair every resolution in `input_dir` with its stipulation and merge them
///
/// Outputs go to `output_dir`, which is created when there is something to
/// write. A pair that fails to merge is logged and recorded; the remaining
/// pairs still run.
pub fn auto_merge(input_dir: &Path, output_dir: &Path, rules: &PairingRules) -> Result<AutoMergeReport> {
    let buckets = scan_directory(input_dir, rules)?;
    let mut report = AutoMergeReport {
        unkeyed: buckets.unkeyed.clone(),
        ..Default::default()
    };

    if buckets.is_unpairable() {
        info!(
            resolutions = buckets.resolutions.len(),
            stipulations = buckets.stipulations.len(),
            "no resolution/stipulation files to pair in {}",
            input_dir.display()
        );
        return Ok(report);
    }

    let pairs = pair_buckets(&buckets);
    report.pairs_found = pairs.len();
    if pairs.is_empty() {
        info!("no matching pairs in {}", input_dir.display());
        return Ok(report);
    }

    fs::create_dir_all(output_dir)?;

    let mut written: HashSet<PathBuf> = HashSet::new();
    for pair in pairs {
        let output = output_dir.join(merged_file_name(&pair.resolution, rules));
        if !written.insert(output.clone()) {
            warn!(
                resolution = %pair.resolution,
                stipulation = %pair.stipulation,
                "{} already written for key {}, overwriting",
                output.display(),
                pair.key
            );
        }

        let options = MergeOptions {
            input_paths: vec![
                input_dir.join(&pair.resolution),
                input_dir.join(&pair.stipulation),
            ],
            output_path: output.clone(),
        };

        match merge_pdfs(&options) {
            Ok(pages) => {
                info!(pages, "merged {} + {} -> {}", pair.resolution, pair.stipulation, output.display());
                report.merged.push((pair, MergedFile { output, pages }));
            }
            Err(e) => {
                error!("failed to merge {} + {}: {}", pair.resolution, pair.stipulation, e);
                report.failed.push(FailedPair { pair, reason: e.to_string() });
            }
        }
    }

    Ok(report)
}

/// Merge `first` then `second` into `output_dir/output_name`
pub fn manual_merge(first: &Path, second: &Path, output_name: &str, output_dir: &Path) -> Result<MergedFile> {
    let output = output_dir.join(output_name);
    let options = MergeOptions {
        input_paths: vec![first.to_path_buf(), second.to_path_buf()],
        output_path: output.clone(),
    };

    let pages = merge_pdfs(&options)?;
    info!(pages, "merged {} + {} -> {}", first.display(), second.display(), output.display());

    Ok(MergedFile { output, pages })
}

/// A merge requested by either front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRequest {
    Auto {
        input_dir: PathBuf,
        output_dir: PathBuf,
    },
    Manual {
        first: PathBuf,
        second: PathBuf,
        output_name: String,
        output_dir: PathBuf,
    },
}

/// What a completed request produced
#[derive(Debug, Clone)]
pub enum MergeSummary {
    Auto(AutoMergeReport),
    Manual(MergedFile),
}

impl MergeRequest {
    /// Check the request the same way the form does
    pub fn validate(&self) -> Result<()> {
        match self {
            MergeRequest::Auto { input_dir, output_dir } => validate_auto(input_dir, output_dir)?,
            MergeRequest::Manual { first, second, output_name, output_dir } => {
                validate_manual(first, second, output_name, output_dir)?
            }
        }
        Ok(())
    }
}

/// Validate and execute a request
pub fn run(request: &MergeRequest, rules: &PairingRules) -> Result<MergeSummary> {
    request.validate()?;

    match request {
        MergeRequest::Auto { input_dir, output_dir } => {
            auto_merge(input_dir, output_dir, rules).map(MergeSummary::Auto)
        }
        MergeRequest::Manual { first, second, output_name, output_dir } => {
            manual_merge(first, second, output_name, output_dir).map(MergeSummary::Manual)
        }
    }
}
