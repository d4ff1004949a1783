//! reso-merge library
//!
//! Pairs Community Board resolution PDFs with their stipulation PDFs by the
//! number at the start of each filename, and merges each pair into one file.
//! This library provides functionality to:
//! - Classify a folder's PDFs into resolutions and stipulations
//! - Pair them by leading number and derive the merged filename
//! - Merge PDFs page-by-page in order
//! - Validate operator input and drive the merge form
//!
//! # Example
//!
//! ```no_run
//! use reso_merge::{workflow, PairingRules};
//! use std::path::Path;
//!
//! let report = workflow::auto_merge(
//!     Path::new("Resolution Document Components"),
//!     Path::new("SLA Resolutions wSTIPS"),
//!     &PairingRules::default(),
//! )
//! .expect("Failed to merge folder");
//!
//! println!("merged {} pairs", report.merged.len());
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod pairing;
pub mod pdf;
pub mod validate;
pub mod workflow;

#[cfg(feature = "gui")]
pub mod gui;

// Re-export commonly used items
pub use config::PairingRules;
pub use error::{Error, Result};

/// Install the `tracing` subscriber used by both binaries
///
/// Defaults to `warn,reso_merge=info`; a set `RUST_LOG` replaces that.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,reso_merge=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
