//! PDF Merger desktop window

use clap::Parser;
use reso_merge::PairingRules;

/// PDF Merger - desktop form for pairing and merging resolution PDFs
#[derive(Parser)]
#[command(name = "reso-merge-gui")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Case-insensitive text that marks a resolution filename [default: "cb3 reso"]
    #[arg(long)]
    marker: Option<String>,

    /// Text inserted before ".pdf" in merged filenames [default: " wSTIPS"]
    #[arg(long, allow_hyphen_values = true)]
    suffix: Option<String>,
}

fn main() -> iced::Result {
    reso_merge::init_logging();
    let cli = Cli::parse();

    reso_merge::gui::run(PairingRules::new(cli.marker, cli.suffix))
}
