//! State of the merge form, independent of any GUI toolkit
//!
//! The desktop front end renders a [`MergeForm`] and forwards every edit to
//! it; all enable/disable and status decisions are made here.

use std::path::PathBuf;

use crate::config::PairingRules;
use crate::validate::ValidationError;
use crate::workflow::{self, MergeRequest, MergeSummary};

/// Status shown after a successful merge
pub const MERGE_SUCCESS: &str = "Merge completed successfully.";

/// Status shown when an automatic merge finds nothing to pair
pub const NOTHING_TO_PAIR: &str = "Error: folder does not contain files valid for auto-merge";

/// Status shown when every required field is filled and valid
pub const READY: &str = "Ready";

/// Which flow the operator picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Pair and merge every resolution/stipulation in a folder
    Auto,
    /// Merge two chosen PDFs under a chosen name
    Manual,
}

/// Editable inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    InputFolder,
    FirstPdf,
    SecondPdf,
    OutputName,
    OutputFolder,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::InputFolder,
        Field::FirstPdf,
        Field::SecondPdf,
        Field::OutputName,
        Field::OutputFolder,
    ];
}

/// How a status message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// Message shown next to the mode selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub tone: Tone,
}

impl Status {
    fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), tone: Tone::Success }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), tone: Tone::Error }
    }
}

/// Form fields, the selected mode and the derived button state
#[derive(Debug, Clone, Default)]
pub struct MergeForm {
    mode: Option<MergeMode>,
    input_folder: String,
    first_pdf: String,
    second_pdf: String,
    output_name: String,
    output_folder: String,
    status: Option<Status>,
    merge_enabled: bool,
}

impl MergeForm {
    /// Empty form with no mode selected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<MergeMode> {
        self.mode
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn merge_enabled(&self) -> bool {
        self.merge_enabled
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::InputFolder => &self.input_folder,
            Field::FirstPdf => &self.first_pdf,
            Field::SecondPdf => &self.second_pdf,
            Field::OutputName => &self.output_name,
            Field::OutputFolder => &self.output_folder,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::InputFolder => &mut self.input_folder,
            Field::FirstPdf => &mut self.first_pdf,
            Field::SecondPdf => &mut self.second_pdf,
            Field::OutputName => &mut self.output_name,
            Field::OutputFolder => &mut self.output_folder,
        }
    }

    /// Whether a field (and its browse button) accepts input in the current mode
    pub fn field_enabled(&self, field: Field) -> bool {
        match (self.mode, field) {
            (None, _) => false,
            (Some(_), Field::OutputFolder) => true,
            (Some(MergeMode::Auto), Field::InputFolder) => true,
            (Some(MergeMode::Auto), _) => false,
            (Some(MergeMode::Manual), Field::InputFolder) => false,
            (Some(MergeMode::Manual), _) => true,
        }
    }

    /// Switch flows, clearing every field and the status
    pub fn select_mode(&mut self, mode: MergeMode) {
        for field in Field::ALL {
            self.value_mut(field).clear();
        }
        self.mode = Some(mode);
        self.status = None;
        self.merge_enabled = false;
    }

    /// Update a field and re-evaluate whether merging is allowed
    ///
    /// Edits to fields disabled in the current mode are ignored.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if !self.field_enabled(field) {
            return;
        }
        *self.value_mut(field) = value.into();
        self.refresh();
    }

    fn required_filled(&self, mode: MergeMode) -> bool {
        let required: &[Field] = match mode {
            MergeMode::Auto => &[Field::InputFolder, Field::OutputFolder],
            MergeMode::Manual => &[
                Field::FirstPdf,
                Field::SecondPdf,
                Field::OutputName,
                Field::OutputFolder,
            ],
        };
        required.iter().all(|&field| !self.value(field).trim().is_empty())
    }

    /// Build the request for the current mode, if every required field is set
    pub fn request(&self) -> Option<MergeRequest> {
        let mode = self.mode?;
        if !self.required_filled(mode) {
            return None;
        }

        let request = match mode {
            MergeMode::Auto => MergeRequest::Auto {
                input_dir: PathBuf::from(self.input_folder.trim()),
                output_dir: PathBuf::from(self.output_folder.trim()),
            },
            MergeMode::Manual => MergeRequest::Manual {
                first: PathBuf::from(self.first_pdf.trim()),
                second: PathBuf::from(self.second_pdf.trim()),
                output_name: self.output_name.trim().to_string(),
                output_dir: PathBuf::from(self.output_folder.trim()),
            },
        };
        Some(request)
    }

    fn refresh(&mut self) {
        let Some(request) = self.request() else {
            self.merge_enabled = false;
            return;
        };

        match request.validate() {
            Ok(()) => {
                self.merge_enabled = true;
                self.status = Some(Status::success(READY));
            }
            Err(e) => {
                self.merge_enabled = false;
                self.status = Some(Status::error(e.to_string()));
            }
        }
    }

    /// Run the merge for the current inputs and report the outcome in the status
    ///
    /// Inputs are validated again since files may have changed since the last
    /// edit. Returns the summary when a merge ran.
    pub fn submit(&mut self, rules: &PairingRules) -> Option<MergeSummary> {
        if !self.merge_enabled {
            return None;
        }
        let request = self.request()?;

        match workflow::run(&request, rules) {
            Ok(summary) => {
                self.status = Some(summary_status(&summary));
                Some(summary)
            }
            Err(crate::Error::Invalid(e)) => {
                self.reject(e);
                None
            }
            Err(e) => {
                self.status = Some(Status::error(format!("Error: {e}")));
                None
            }
        }
    }

    fn reject(&mut self, error: ValidationError) {
        self.merge_enabled = false;
        self.status = Some(Status::error(error.to_string()));
    }
}

fn summary_status(summary: &MergeSummary) -> Status {
    match summary {
        MergeSummary::Manual(_) => Status::success(MERGE_SUCCESS),
        MergeSummary::Auto(report) if report.is_empty() => Status::error(NOTHING_TO_PAIR),
        MergeSummary::Auto(report) if report.failed.is_empty() => Status::success(MERGE_SUCCESS),
        MergeSummary::Auto(report) => Status::error(format!(
            "Merged {} of {} pairs; {} failed (see log)",
            report.merged.len(),
            report.pairs_found,
            report.failed.len()
        )),
    }
}
