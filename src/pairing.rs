//! Filename classification and resolution/stipulation pairing
//!
//! Resolution and stipulation PDFs are matched by the integer at the start of
//! their filenames:
//!
//! ```text
//! 12 cb3 reso.pdf      ─┐
//!                       ├─► 12 cb3 reso wSTIPS.pdf
//! 12 stipulation.pdf   ─┘
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::PairingRules;
use crate::error::{Error, Result};

/// Optional leading whitespace followed by a run of ASCII digits
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+)").expect("leading number pattern is valid"));

/// Leading integer of a filename
///
/// Stored as its digits without leading zeros, so `007` and `7` compare equal
/// and arbitrarily long numbers never overflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairingKey(String);

impl PairingKey {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            PairingKey("0".to_string())
        } else {
            PairingKey(trimmed.to_string())
        }
    }

    /// Decimal digits of the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the leading integer from a filename
///
/// Returns `None` when the name does not start with digits (after optional
/// whitespace).
pub fn extract_key(filename: &str) -> Option<PairingKey> {
    LEADING_NUMBER
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| PairingKey::from_digits(m.as_str()))
}

/// Whether a filename has a `.pdf` extension (any case)
pub fn has_pdf_extension(filename: &str) -> bool {
    filename.len() >= 4
        && filename.is_char_boundary(filename.len() - 4)
        && filename[filename.len() - 4..].eq_ignore_ascii_case(".pdf")
}

/// A keyed PDF filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedFile {
    pub name: String,
    pub key: PairingKey,
}

/// PDF filenames split into resolutions and stipulations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    pub resolutions: Vec<KeyedFile>,
    pub stipulations: Vec<KeyedFile>,
    /// PDFs skipped because their name has no leading number
    pub unkeyed: Vec<String>,
}

impl Buckets {
    /// True when either side is empty, so no pair can exist
    pub fn is_unpairable(&self) -> bool {
        self.resolutions.is_empty() || self.stipulations.is_empty()
    }
}

/// A resolution and the stipulation that shares its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub key: PairingKey,
    pub resolution: String,
    pub stipulation: String,
}

/// Split PDF filenames into resolution and stipulation buckets
///
/// Non-PDF names are ignored. PDFs without a leading number are logged and
/// collected in [`Buckets::unkeyed`].
pub fn classify<I, S>(filenames: I, rules: &PairingRules) -> Buckets
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buckets = Buckets::default();

    for name in filenames {
        let name = name.as_ref();
        if !has_pdf_extension(name) {
            continue;
        }

        let Some(key) = extract_key(name) else {
            warn!(file = name, "filename missing the leading number, skipping");
            buckets.unkeyed.push(name.to_string());
            continue;
        };

        let file = KeyedFile { name: name.to_string(), key };
        if rules.is_resolution(name) {
            buckets.resolutions.push(file);
        } else {
            buckets.stipulations.push(file);
        }
    }

    buckets
}

/// List a directory and classify its PDF files
///
/// Only regular files directly inside `dir` are considered. Names are sorted
/// so pairing order does not depend on the filesystem.
pub fn scan_directory(dir: &Path, rules: &PairingRules) -> Result<Buckets> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks, like the PDF check in validation
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(file = ?raw, "skipping file with non UTF-8 name"),
        }
    }
    names.sort();

    let buckets = classify(names, rules);
    debug!(
        resolutions = buckets.resolutions.len(),
        stipulations = buckets.stipulations.len(),
        unkeyed = buckets.unkeyed.len(),
        "classified {}",
        dir.display()
    );
    Ok(buckets)
}

/// Pair every resolution with every stipulation that has the same key
///
/// This is a full cross product: a key shared by two stipulations yields two
/// pairs for the same resolution.
pub fn pair_buckets(buckets: &Buckets) -> Vec<FilePair> {
    let mut pairs = Vec::new();
    for resolution in &buckets.resolutions {
        for stipulation in &buckets.stipulations {
            if resolution.key == stipulation.key {
                pairs.push(FilePair {
                    key: resolution.key.clone(),
                    resolution: resolution.name.clone(),
                    stipulation: stipulation.name.clone(),
                });
            }
        }
    }
    pairs
}

/// Name of the merged output for a resolution file
///
/// The trailing `.pdf` is replaced with `<suffix>.pdf`.
pub fn merged_file_name(resolution: &str, rules: &PairingRules) -> String {
    let stem = if has_pdf_extension(resolution) {
        &resolution[..resolution.len() - 4]
    } else {
        resolution
    };
    format!("{}{}.pdf", stem, rules.suffix)
}
