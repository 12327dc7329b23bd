//! Integration tests for the full names → render → write pipeline.

use certbatch::{
    Certbatch, DuplicatePolicy, Error, NamingMode, OutcomeStatus, OutputFormat, RenderConfig,
};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory with a names file and a blank 1000x700 template.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(names: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("names.txt"), names).unwrap();
        RgbaImage::from_pixel(1000, 700, Rgba([255, 255, 255, 255]))
            .save(dir.path().join("template.png"))
            .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn out(&self) -> PathBuf {
        self.path("out")
    }

    fn builder(&self, font: &Path) -> Certbatch {
        Certbatch::new()
            .with_names(self.path("names.txt"))
            .with_template(self.path("template.png"))
            .with_font(font)
            .with_output_dir(self.out())
            .with_render_config(
                RenderConfig::new()
                    .with_anchor(500, 400)
                    .with_font_size(48.0)
                    .centered(),
            )
    }

    fn output_files(&self) -> Vec<String> {
        let mut files: Vec<String> = fs::read_dir(self.out())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }
}

fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf")
}

#[test]
fn test_blank_lines_produce_no_output() {
    let font = fixture_font();
    let ws = Workspace::new("Alice Smith\n\nBob Lee\n  \nCara Diaz");

    let report = ws.builder(&font).load().unwrap().run();

    assert_eq!(report.total(), 3);
    assert_eq!(report.written, 3);
    assert!(report.is_success());

    let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Smith", "Bob Lee", "Cara Diaz"]);

    assert_eq!(
        ws.output_files(),
        vec!["Alice_Smith.png", "Bob_Lee.png", "Cara_Diaz.png"]
    );
}

#[test]
fn test_output_count_matches_names() {
    let font = fixture_font();
    let names: Vec<String> = (1..=12).map(|i| format!("Participant {}", i)).collect();
    let ws = Workspace::new(&names.join("\n"));

    let report = ws.builder(&font).load().unwrap().run();

    assert_eq!(report.written, 12);
    assert_eq!(ws.output_files().len(), 12);
    for path in report.written_paths() {
        let image = image::open(path).unwrap();
        assert_eq!((image.width(), image.height()), (1000, 700));
    }
}

#[test]
fn test_missing_names_file_is_fatal() {
    let font = fixture_font();
    let ws = Workspace::new("unused");
    fs::remove_file(ws.path("names.txt")).unwrap();

    let err = ws.builder(&font).load().unwrap_err();

    assert!(matches!(err, Error::MissingInput(_)));
    assert!(!ws.out().exists());
}

#[test]
fn test_missing_template_is_fatal() {
    let font = fixture_font();
    let ws = Workspace::new("Alice");
    fs::remove_file(ws.path("template.png")).unwrap();

    let err = ws.builder(&font).load().unwrap_err();
    assert!(matches!(err, Error::MissingInput(_)));
}

#[test]
fn test_corrupt_template_is_fatal() {
    let font = fixture_font();
    let ws = Workspace::new("Alice");
    fs::write(ws.path("template.png"), b"not really a png").unwrap();

    let err = ws.builder(&font).load().unwrap_err();
    assert!(matches!(err, Error::ImageLoad { .. }));
}

#[test]
fn test_missing_font_is_fatal() {
    let ws = Workspace::new("Alice");

    let err = ws.builder(&ws.path("nope.ttf")).load().unwrap_err();
    assert!(matches!(err, Error::FontLoad { .. }));
}

#[test]
fn test_bad_name_does_not_stop_batch() {
    let font = fixture_font();
    // "AC/DC" is not a single file name
    let ws = Workspace::new("Ann Lee\nAC/DC\nBo Chen\nCy Diaz\nDee Eng");

    let report = ws
        .builder(&font)
        .with_naming(NamingMode::Verbatim)
        .load()
        .unwrap()
        .run();

    assert_eq!(report.written, 4);
    assert_eq!(report.failed, 1);

    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name.as_str(), "AC/DC");
    assert_eq!(failed[0].ordinal, 2);
    assert!(failed[0].error().unwrap().contains("Cannot write"));

    assert_eq!(
        ws.output_files(),
        vec!["Ann_Lee.png", "Bo_Chen.png", "Cy_Diaz.png", "Dee_Eng.png"]
    );
}

#[test]
fn test_verbatim_names_stay_inside_output_dir() {
    let font = fixture_font();
    let ws = Workspace::new("../escaped\n/abs\nAnn");

    let report = ws
        .builder(&font)
        .with_naming(NamingMode::Verbatim)
        .load()
        .unwrap()
        .run();

    assert_eq!(report.written, 1);
    assert_eq!(report.failed, 2);
    assert!(report
        .failures()
        .all(|o| o.error().unwrap().contains("Cannot write")));

    assert!(!ws.path("escaped.png").exists());
    assert!(!Path::new("/abs.png").exists());
    assert_eq!(ws.output_files(), vec!["Ann.png"]);
}

#[test]
fn test_default_anchor_centers_name() {
    let font = fixture_font();
    let ws = Workspace::new("A Much Longer Name");

    let report = Certbatch::new()
        .with_names(ws.path("names.txt"))
        .with_template(ws.path("template.png"))
        .with_font(&font)
        .with_output_dir(ws.out())
        .load()
        .unwrap()
        .run();
    assert!(report.is_success());

    let image = image::open(ws.out().join("A_Much_Longer_Name.png"))
        .unwrap()
        .to_rgba8();
    let columns: Vec<u32> = image
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] < 160)
        .map(|(x, _, _)| x)
        .collect();
    let lo = *columns.iter().min().unwrap();
    let hi = *columns.iter().max().unwrap();
    assert!(lo > 0 && hi < 999, "ink spans {lo}..{hi}");
    assert!((((lo + hi) / 2) as i32 - 500).abs() <= 3);
}

#[test]
fn test_strict_mode_stops_after_failure() {
    let font = fixture_font();
    let ws = Workspace::new("Ann Lee\nAC/DC\nBo Chen\nCy Diaz\nDee Eng");

    let report = ws
        .builder(&font)
        .with_naming(NamingMode::Verbatim)
        .strict()
        .load()
        .unwrap()
        .run();

    assert_eq!(report.written, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 3);
    assert_eq!(report.outcomes[4].status, OutcomeStatus::Skipped);
    assert_eq!(ws.output_files(), vec!["Ann_Lee.png"]);
}

#[test]
fn test_sanitized_naming_writes_everything() {
    let font = fixture_font();
    let ws = Workspace::new("Ann Lee\nAC/DC\n???");

    let report = ws.builder(&font).load().unwrap().run();

    assert!(report.is_success());
    assert_eq!(
        ws.output_files(),
        vec!["ACDC.png", "Ann_Lee.png", "certificate_0003.png"]
    );
}

#[test]
fn test_duplicate_names_are_suffixed() {
    let font = fixture_font();
    let ws = Workspace::new("Sam Lee\nSam Lee\nSam Lee");

    let report = ws.builder(&font).load().unwrap().run();

    assert_eq!(report.written, 3);
    assert_eq!(
        ws.output_files(),
        vec!["Sam_Lee.png", "Sam_Lee_2.png", "Sam_Lee_3.png"]
    );
}

#[test]
fn test_duplicate_names_overwrite() {
    let font = fixture_font();
    let ws = Workspace::new("Sam Lee\nSam Lee");

    let report = ws
        .builder(&font)
        .with_duplicates(DuplicatePolicy::Overwrite)
        .load()
        .unwrap()
        .run();

    assert_eq!(report.written, 2);
    assert_eq!(ws.output_files(), vec!["Sam_Lee.png"]);
}

#[test]
fn test_parallel_matches_sequential() {
    let font = fixture_font();
    let names = "Alice Smith\nBob Lee\nCara Diaz\nDan Ng\nEve Moss\nFay Orr";
    let seq = Workspace::new(names);
    let par = Workspace::new(names);

    let seq_report = seq.builder(&font).load().unwrap().run();
    let par_report = par.builder(&font).parallel(true).load().unwrap().run();

    assert_eq!(seq_report.written, 6);
    assert_eq!(par_report.written, 6);
    assert_eq!(seq.output_files(), par.output_files());

    for file in seq.output_files() {
        let a = fs::read(seq.out().join(&file)).unwrap();
        let b = fs::read(par.out().join(&file)).unwrap();
        assert_eq!(a, b, "{file} differs");
    }
}

#[test]
fn test_jpeg_output() {
    let font = fixture_font();
    let ws = Workspace::new("Alice Smith");

    let report = ws
        .builder(&font)
        .with_format(OutputFormat::Jpeg)
        .load()
        .unwrap()
        .run();

    assert!(report.is_success());
    let bytes = fs::read(ws.out().join("Alice_Smith.jpg")).unwrap();
    assert_eq!(OutputFormat::detect(&bytes), Some(OutputFormat::Jpeg));
}

#[test]
fn test_report_json_lists_every_name() {
    let font = fixture_font();
    let ws = Workspace::new("Ann Lee\nAC/DC");

    let report = ws
        .builder(&font)
        .with_naming(NamingMode::Verbatim)
        .load()
        .unwrap()
        .run();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["status"], "written");
    assert_eq!(outcomes[1]["status"], "failed");
    assert_eq!(outcomes[1]["name"]["text"], "AC/DC");
}
