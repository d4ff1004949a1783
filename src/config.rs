//! Pairing rules shared by the CLI and the desktop form

/// Marker that identifies a Community Board resolution by filename
pub const DEFAULT_MARKER: &str = "cb3 reso";

/// Text inserted before `.pdf` in the name of a merged resolution
pub const DEFAULT_SUFFIX: &str = " wSTIPS";

/// How filenames are classified and how merged files are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRules {
    /// Case-insensitive substring marking a resolution document
    pub marker: String,
    /// Suffix appended to the resolution stem for the merged output
    pub suffix: String,
}

impl PairingRules {
    /// Build rules from optional overrides, falling back to the defaults
    pub fn new(marker: Option<String>, suffix: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            marker: marker.unwrap_or(defaults.marker),
            suffix: suffix.unwrap_or(defaults.suffix),
        }
    }

    /// Whether a filename contains the resolution marker
    pub fn is_resolution(&self, filename: &str) -> bool {
        filename.to_lowercase().contains(&self.marker.to_lowercase())
    }
}

impl Default for PairingRules {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}
