//! Input checks run before a merge is allowed
//!
//! The `Display` text of [`ValidationError`] is shown to the operator as-is.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::pairing::has_pdf_extension;

/// Why a set of merge inputs was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Folder does not contain PDF files")]
    FolderWithoutPdfs,

    #[error("Invalid file selection - verify that PDF #1 is a PDF file")]
    FirstNotPdf,

    #[error("Invalid file selection - verify that PDF #2 is a PDF file")]
    SecondNotPdf,

    #[error("Invalid file selections - verify that chosen files are PDF files")]
    NeitherPdf,

    #[error("Output filename must end with .pdf")]
    OutputNameExtension,

    #[error("Output filename must not contain folder separators")]
    OutputNamePath,

    #[error("Invalid output folder selection")]
    OutputFolder,
}

/// An existing regular file whose name ends in `.pdf` (any case)
pub fn is_pdf_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(has_pdf_extension)
}

/// Whether a readable folder holds at least one `.pdf` entry
///
/// Unreadable or missing folders count as holding none.
pub fn folder_contains_pdfs(folder: &Path) -> bool {
    let Ok(entries) = fs::read_dir(folder) else {
        return false;
    };
    entries
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_name().to_str().is_some_and(has_pdf_extension))
}

/// Check the inputs of an automatic folder merge
pub fn validate_auto(input_folder: &Path, output_folder: &Path) -> Result<(), ValidationError> {
    validate_input_folder(input_folder)?;
    validate_output_folder(output_folder)
}

/// An existing folder with at least one PDF in it
pub fn validate_input_folder(folder: &Path) -> Result<(), ValidationError> {
    if folder.is_dir() && folder_contains_pdfs(folder) {
        Ok(())
    } else {
        Err(ValidationError::FolderWithoutPdfs)
    }
}

/// Check the inputs of a manual two-file merge
pub fn validate_manual(
    first: &Path,
    second: &Path,
    output_name: &str,
    output_folder: &Path,
) -> Result<(), ValidationError> {
    match (is_pdf_file(first), is_pdf_file(second)) {
        (true, true) => {}
        (false, true) => return Err(ValidationError::FirstNotPdf),
        (true, false) => return Err(ValidationError::SecondNotPdf),
        (false, false) => return Err(ValidationError::NeitherPdf),
    }
    validate_output_name(output_name)?;
    validate_output_folder(output_folder)
}

/// A bare filename ending in `.pdf` with a non-empty stem
pub fn validate_output_name(name: &str) -> Result<(), ValidationError> {
    if name.contains('/') || name.contains('\\') {
        return Err(ValidationError::OutputNamePath);
    }
    if name.len() <= 4 || !has_pdf_extension(name) {
        return Err(ValidationError::OutputNameExtension);
    }
    Ok(())
}

fn validate_output_folder(folder: &Path) -> Result<(), ValidationError> {
    if folder.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::OutputFolder)
    }
}
