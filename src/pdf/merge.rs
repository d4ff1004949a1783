//! PDF merging using lopdf
//!
//! Pages are appended in input order. Each source keeps its own objects
//! (renumbered to avoid collisions); only the page tree and catalog are rebuilt.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order their pages should appear
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Merge PDF files into a single PDF and return its page count
///
/// # Example
///
/// ```no_run
/// use reso_merge::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("12 cb3 reso.pdf"),
///         PathBuf::from("12 stipulation.pdf"),
///     ],
///     output_path: PathBuf::from("12 cb3 reso wSTIPS.pdf"),
/// };
///
/// let pages = merge_pdfs(&options).expect("Failed to merge");
/// println!("wrote {pages} pages");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<usize> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut documents = Vec::with_capacity(options.input_paths.len());
    for path in &options.input_paths {
        let doc = Document::load(path)?;
        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(path.clone()));
        }
        documents.push(doc);
    }

    let mut merged = concatenate(documents)?;
    let page_count = merged.get_pages().len();

    merged.compress();
    save_replacing(&mut merged, &options.output_path)?;
    debug!(pages = page_count, "saved {}", options.output_path.display());

    Ok(page_count)
}

/// Sibling path the document is written to before it replaces `output`
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("merged.pdf"));
    name.push(".partial");
    output.with_file_name(name)
}

/// Save next to `output` and rename into place
///
/// A failed write never leaves a truncated file under the output name; an
/// existing output is only replaced once the new one is complete.
fn save_replacing(doc: &mut Document, output: &Path) -> Result<()> {
    let partial = partial_path(output);

    let written = doc
        .save(&partial)
        .map(drop)
        .map_err(Error::from)
        .and_then(|()| fs::rename(&partial, output).map_err(Error::from));

    if let Err(e) = written {
        if partial.exists() {
            if let Err(cleanup) = fs::remove_file(&partial) {
                warn!(error = %cleanup, "could not remove {}", partial.display());
            }
        }
        return Err(e);
    }
    Ok(())
}

/// Append the pages of every document, in order, under one new page tree
fn concatenate(documents: Vec<Document>) -> Result<Document> {
    let mut next_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &pages {
            flatten_inherited_attributes(&mut doc, page_id)?;
        }
        page_ids.extend(pages);

        // The old page tree nodes and catalog are replaced below
        objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_tree_node(object)),
        );
    }

    let mut merged = Document::with_version("1.5");
    merged.objects.extend(objects);
    merged.max_id = next_id - 1;

    let pages_id = merged.new_object_id();
    let catalog_id = merged.new_object_id();

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_ids.len() as i64));
    pages.set(
        "Kids",
        Object::Array(page_ids.iter().map(|&id| Object::Reference(id)).collect()),
    );

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged.objects.insert(pages_id, Object::Dictionary(pages));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    Ok(merged)
}

/// Whether an object is a `/Pages` node or the `/Catalog`
fn is_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Pages" || name == b"Catalog"
        ),
        _ => false,
    }
}

/// Copy inherited page attributes onto the page itself
///
/// Once the source page tree is dropped, anything a page only inherited
/// (commonly `MediaBox` and `Resources`) would be lost.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    {
        let page = doc.get_dictionary(page_id)?;
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = find_in_ancestors(doc, page, key) {
                inherited.push((key, value));
            }
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }
    Ok(())
}

/// Walk `/Parent` links looking for `key`
fn find_in_ancestors(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Bounded walk so a cyclic Parent chain cannot hang us
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth > 64 {
            return None;
        }
        let node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    None
}
