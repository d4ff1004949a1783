//! reso-merge CLI tool
//!
//! Merges resolution PDFs with their stipulations, either for a whole folder
//! or for two chosen files.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use reso_merge::pairing::{pair_buckets, scan_directory};
use reso_merge::pdf::extract_metadata;
use reso_merge::validate::{validate_input_folder, validate_manual};
use reso_merge::workflow::{auto_merge, manual_merge};
use reso_merge::PairingRules;

/// reso-merge - Pair and merge resolution/stipulation PDFs
#[derive(Parser)]
#[command(name = "reso-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge every numbered resolution with its stipulation
    reso-merge auto \"Resolution Document Components\" -o \"SLA Resolutions wSTIPS\"

    # Preview which files would be paired
    reso-merge pairs \"Resolution Document Components\"

    # Merge two specific files
    reso-merge manual reso.pdf stips.pdf -o out --name \"12 combined.pdf\"")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Filename conventions used to pair files
#[derive(Args)]
struct RuleArgs {
    /// Case-insensitive text that marks a resolution filename [default: "cb3 reso"]
    #[arg(long)]
    marker: Option<String>,

    /// Text inserted before ".pdf" in merged filenames [default: " wSTIPS"]
    #[arg(long, allow_hyphen_values = true)]
    suffix: Option<String>,
}

impl RuleArgs {
    fn into_rules(self) -> PairingRules {
        PairingRules::new(self.marker, self.suffix)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pair every resolution in a folder with its stipulation and merge them
    Auto {
        /// Folder holding resolution and stipulation PDFs
        input: PathBuf,

        /// Folder for merged PDFs (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Open the output folder afterwards
        #[arg(long)]
        open: bool,
    },

    /// Merge two specific PDF files, first then second
    Manual {
        /// First PDF (its pages come first)
        first: PathBuf,

        /// Second PDF
        second: PathBuf,

        /// Folder for the merged PDF
        #[arg(short, long)]
        output: PathBuf,

        /// Filename of the merged PDF (must end in .pdf)
        #[arg(short, long)]
        name: String,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// List the pairs found in a folder without merging anything
    Pairs {
        /// Folder holding resolution and stipulation PDFs
        input: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    reso_merge::init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Auto { input, output, rules, open } => {
            cmd_auto(&input, &output, &rules.into_rules(), open)
        }
        Commands::Manual { first, second, output, name, open } => {
            cmd_manual(&first, &second, &output, &name, open)
        }
        Commands::Pairs { input, rules } => cmd_pairs(&input, &rules.into_rules()),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open a file or folder with the system default application
fn open_path(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Merge every pair in a folder
fn cmd_auto(input: &Path, output: &Path, rules: &PairingRules, open: bool) -> anyhow::Result<()> {
    validate_input_folder(input).with_context(|| input.display().to_string())?;

    let report = auto_merge(input, output, rules)?;

    for name in &report.unkeyed {
        eprintln!("Skipped (no leading number): {}", name);
    }

    if report.is_empty() {
        anyhow::bail!("folder does not contain files valid for auto-merge");
    }

    for (pair, merged) in &report.merged {
        eprintln!(
            "{} + {} -> {} ({} pages)",
            pair.resolution,
            pair.stipulation,
            merged.output.display(),
            merged.pages
        );
    }
    for failed in &report.failed {
        eprintln!("FAILED {} + {}: {}", failed.pair.resolution, failed.pair.stipulation, failed.reason);
    }

    eprintln!(
        "Merged {} of {} pairs into {}",
        report.merged.len(),
        report.pairs_found,
        output.display()
    );

    if open {
        open_path(output)?;
    }

    if !report.failed.is_empty() {
        anyhow::bail!("{} pair(s) failed to merge", report.failed.len());
    }
    Ok(())
}

/// Merge two chosen files
fn cmd_manual(first: &Path, second: &Path, output: &Path, name: &str, open: bool) -> anyhow::Result<()> {
    validate_manual(first, second, name, output)?;

    let merged = manual_merge(first, second, name, output)?;
    eprintln!("Merged to: {} ({} pages)", merged.output.display(), merged.pages);

    if open {
        open_path(&merged.output)?;
    }
    Ok(())
}

/// Print pairs and unkeyed files
fn cmd_pairs(input: &Path, rules: &PairingRules) -> anyhow::Result<()> {
    let buckets = scan_directory(input, rules)?;
    let pairs = pair_buckets(&buckets);

    for pair in &pairs {
        println!("[{}] {}  <->  {}", pair.key, pair.resolution, pair.stipulation);
    }
    for name in &buckets.unkeyed {
        println!("[-] {}  (no leading number, skipped)", name);
    }

    println!(
        "{} pair(s) from {} resolution(s) and {} stipulation(s)",
        pairs.len(),
        buckets.resolutions.len(),
        buckets.stipulations.len()
    );
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> anyhow::Result<()> {
    let metadata = extract_metadata(input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
