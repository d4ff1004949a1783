//! Integration tests for the reso-merge library
//!
//! Test PDFs are generated with lopdf. Each page carries a distinct MediaBox
//! width so page order can be checked after merging.

use lopdf::{dictionary, Document, Object, Stream};
use reso_merge::form::{Field, MergeForm, MergeMode, Tone, MERGE_SUCCESS};
use reso_merge::pdf::{count_pages, merge_pdfs, MergeOptions};
use reso_merge::workflow::{auto_merge, manual_merge, run, MergeRequest, MergeSummary};
use reso_merge::PairingRules;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with one page per entry of `widths`
///
/// With `inherit_media_box`, the box is set on the page tree instead of the
/// pages, using the first width.
fn write_pdf(path: &Path, widths: &[i64], inherit_media_box: bool) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, &width) in widths.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 72 720 Td (page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !inherit_media_box {
            page.set("MediaBox", vec![0.into(), 0.into(), width.into(), 792.into()]);
        }
        kids.push(doc.add_object(page).into());
    }

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Count" => widths.len() as i64,
        "Kids" => kids,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    };
    if inherit_media_box {
        pages.set("MediaBox", vec![0.into(), 0.into(), widths[0].into(), 792.into()]);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to write test PDF");
}

/// MediaBox widths of every page, in page order
fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("page has its own MediaBox");
            media_box[2].as_i64().expect("integer width")
        })
        .collect()
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_merge_preserves_page_order() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");
    write_pdf(&first, &[500, 501], false);
    write_pdf(&second, &[600, 601, 602], false);

    let output_path = dir.path().join("merged.pdf");
    let pages = merge_pdfs(&MergeOptions {
        input_paths: vec![first, second],
        output_path: output_path.clone(),
    })
    .expect("Failed to merge PDFs");

    assert_eq!(pages, 5);
    assert_eq!(count_pages(&output_path).unwrap(), 5);
    assert_eq!(page_widths(&output_path), vec![500, 501, 600, 601, 602]);
    assert_eq!(names_in(dir.path()), vec!["first.pdf", "merged.pdf", "second.pdf"]);
}

#[test]
fn test_failed_save_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.pdf");
    write_pdf(&first, &[500], false);

    let output_path = dir.path().join("merged.pdf");
    // A directory where the intermediate file would go makes the write fail
    let blocker = dir.path().join("merged.pdf.partial");
    fs::create_dir(&blocker).unwrap();
    File::create(blocker.join("keep")).unwrap();

    let result = merge_pdfs(&MergeOptions {
        input_paths: vec![first],
        output_path: output_path.clone(),
    });

    assert!(result.is_err());
    assert!(!output_path.exists());
    assert!(blocker.join("keep").exists());
}

#[test]
fn test_failed_save_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.pdf");
    write_pdf(&first, &[500], false);

    let output_path = dir.path().join("merged.pdf");
    write_pdf(&output_path, &[999], false);
    fs::create_dir(dir.path().join("merged.pdf.partial")).unwrap();

    let result = merge_pdfs(&MergeOptions {
        input_paths: vec![first],
        output_path: output_path.clone(),
    });

    assert!(result.is_err());
    assert_eq!(page_widths(&output_path), vec![999]);
}

#[test]
fn test_merge_keeps_inherited_attributes() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let first = dir.path().join("inherits.pdf");
    let second = dir.path().join("direct.pdf");
    write_pdf(&first, &[700, 700], true);
    write_pdf(&second, &[612], false);

    let output_path = dir.path().join("merged.pdf");
    merge_pdfs(&MergeOptions {
        input_paths: vec![first, second],
        output_path: output_path.clone(),
    })
    .expect("Failed to merge PDFs");

    assert_eq!(page_widths(&output_path), vec![700, 700, 612]);

    let doc = Document::load(&output_path).unwrap();
    for id in doc.get_pages().values() {
        assert!(doc.get_dictionary(*id).unwrap().has(b"Resources"));
    }
}

#[test]
fn test_merge_rejects_invalid_pdf() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.pdf");
    fs::write(&bogus, b"not a pdf").unwrap();

    let result = merge_pdfs(&MergeOptions {
        input_paths: vec![bogus],
        output_path: dir.path().join("out.pdf"),
    });
    assert!(result.is_err());
    assert!(!dir.path().join("out.pdf").exists());
}

#[test]
fn test_auto_merge_named_pair() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf(&input.path().join("12 cb3 reso.pdf"), &[510], false);
    write_pdf(&input.path().join("12 stipulation.pdf"), &[520, 521], false);

    let report = auto_merge(input.path(), output.path(), &PairingRules::default()).unwrap();

    assert_eq!(report.pairs_found, 1);
    assert!(report.failed.is_empty());
    assert_eq!(names_in(output.path()), vec!["12 cb3 reso wSTIPS.pdf"]);

    let merged = output.path().join("12 cb3 reso wSTIPS.pdf");
    assert_eq!(report.merged[0].1.output, merged);
    assert_eq!(report.merged[0].1.pages, 3);
    assert_eq!(page_widths(&merged), vec![510, 520, 521]);
}

#[test]
fn test_auto_merge_folder() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let target = output.path().join("SLA Resolutions wSTIPS");

    write_pdf(&input.path().join("1 CB3 Reso bar.pdf"), &[101], false);
    write_pdf(&input.path().join("1 stips bar.pdf"), &[102], false);
    write_pdf(&input.path().join(" 2 cb3 reso cafe.pdf"), &[201], false);
    write_pdf(&input.path().join("02 stips cafe.pdf"), &[202], false);
    write_pdf(&input.path().join("3 cb3 reso unmatched.pdf"), &[301], false);
    write_pdf(&input.path().join("cb3 reso missing number.pdf"), &[401], false);
    write_pdf(&input.path().join("stips missing number.pdf"), &[402], false);
    fs::write(input.path().join("1 notes.txt"), b"ignored").unwrap();

    let report = auto_merge(input.path(), &target, &PairingRules::default()).unwrap();

    assert_eq!(report.pairs_found, 2);
    assert_eq!(report.merged.len(), 2);
    assert_eq!(
        report.unkeyed,
        vec!["cb3 reso missing number.pdf", "stips missing number.pdf"]
    );
    assert_eq!(
        names_in(&target),
        vec![" 2 cb3 reso cafe wSTIPS.pdf", "1 CB3 Reso bar wSTIPS.pdf"]
    );
    assert_eq!(page_widths(&target.join("1 CB3 Reso bar wSTIPS.pdf")), vec![101, 102]);
    assert_eq!(page_widths(&target.join(" 2 cb3 reso cafe wSTIPS.pdf")), vec![201, 202]);
}

#[test]
fn test_auto_merge_key_collision_keeps_last_pair() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf(&input.path().join("5 cb3 reso.pdf"), &[500], false);
    write_pdf(&input.path().join("5 stip a.pdf"), &[510], false);
    write_pdf(&input.path().join("05 stip b.pdf"), &[520], false);

    let report = auto_merge(input.path(), output.path(), &PairingRules::default()).unwrap();

    // Both pairs are reported and merged; they share one output name
    assert_eq!(report.pairs_found, 2);
    assert_eq!(report.merged.len(), 2);
    assert!(report.failed.is_empty());
    let stips: Vec<&str> = report.merged.iter().map(|(p, _)| p.stipulation.as_str()).collect();
    assert_eq!(stips, vec!["05 stip b.pdf", "5 stip a.pdf"]);

    // Names sort "05 stip b" first, so "5 stip a" is written last and wins
    assert_eq!(names_in(output.path()), vec!["5 cb3 reso wSTIPS.pdf"]);
    assert_eq!(
        page_widths(&output.path().join("5 cb3 reso wSTIPS.pdf")),
        vec![500, 510]
    );
}

#[test]
fn test_auto_merge_custom_rules() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf(&input.path().join("7 cannabis reso.pdf"), &[300], false);
    write_pdf(&input.path().join("7 stipulations.pdf"), &[301], false);

    let rules = PairingRules::new(Some("cannabis reso".to_string()), Some(" combined".to_string()));
    auto_merge(input.path(), output.path(), &rules).unwrap();

    assert_eq!(names_in(output.path()), vec!["7 cannabis reso combined.pdf"]);
}

#[test]
fn test_auto_merge_only_resolutions() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf(&input.path().join("12 cb3 reso.pdf"), &[500], false);
    write_pdf(&input.path().join("13 cb3 reso.pdf"), &[500], false);

    let report = auto_merge(input.path(), output.path(), &PairingRules::default()).unwrap();

    assert_eq!(report.pairs_found, 0);
    assert!(names_in(output.path()).is_empty());
}

#[test]
fn test_manual_merge() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("agenda.pdf");
    let second = dir.path().join("minutes.pdf");
    write_pdf(&first, &[610], false);
    write_pdf(&second, &[620], false);

    let merged = manual_merge(&second, &first, "combined.pdf", dir.path()).unwrap();

    assert_eq!(merged.output, dir.path().join("combined.pdf"));
    assert_eq!(merged.pages, 2);
    assert_eq!(page_widths(&merged.output), vec![620, 610]);
}

#[test]
fn test_run_manual_request() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let first = dir.path().join("a.pdf");
    let second = dir.path().join("b.pdf");
    write_pdf(&first, &[400], false);
    write_pdf(&second, &[401], false);

    let request = MergeRequest::Manual {
        first,
        second,
        output_name: "ab.pdf".to_string(),
        output_dir: out.path().to_path_buf(),
    };
    let summary = run(&request, &PairingRules::default()).unwrap();

    match summary {
        MergeSummary::Manual(merged) => assert_eq!(merged.pages, 2),
        other => panic!("unexpected summary: {:?}", other),
    }
}

#[test]
fn test_form_manual_merge_end_to_end() {
    let dir = TempDir::new().unwrap();
    let first: PathBuf = dir.path().join("12 cb3 reso.pdf");
    let second: PathBuf = dir.path().join("12 stipulation.pdf");
    write_pdf(&first, &[530], false);
    write_pdf(&second, &[540], false);

    let mut form = MergeForm::new();
    form.select_mode(MergeMode::Manual);
    form.set(Field::FirstPdf, first.to_string_lossy());
    form.set(Field::SecondPdf, second.to_string_lossy());
    form.set(Field::OutputName, "12 combined.pdf");
    form.set(Field::OutputFolder, dir.path().to_string_lossy());
    assert!(form.merge_enabled());

    let summary = form.submit(&PairingRules::default());
    assert!(matches!(summary, Some(MergeSummary::Manual(_))));

    let status = form.status().unwrap();
    assert_eq!(status.tone, Tone::Success);
    assert_eq!(status.message, MERGE_SUCCESS);
    assert_eq!(page_widths(&dir.path().join("12 combined.pdf")), vec![530, 540]);
}

#[test]
fn test_form_auto_merge_end_to_end() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf(&input.path().join("12 cb3 reso.pdf"), &[550], false);
    write_pdf(&input.path().join("12 stipulation.pdf"), &[560], false);
    File::create(input.path().join("readme.txt")).unwrap();

    let mut form = MergeForm::new();
    form.select_mode(MergeMode::Auto);
    form.set(Field::InputFolder, input.path().to_string_lossy());
    form.set(Field::OutputFolder, output.path().to_string_lossy());
    assert!(form.merge_enabled());

    form.submit(&PairingRules::default());

    assert_eq!(form.status().unwrap().message, MERGE_SUCCESS);
    assert_eq!(names_in(output.path()), vec!["12 cb3 reso wSTIPS.pdf"]);
}
