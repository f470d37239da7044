//! Console sessions driven from an in-memory transcript.

#![allow(clippy::unwrap_used)]

use std::io::Cursor;
use std::path::Path;

use northstar_advisor::{console, Advisor, AdvisorConfig};
use northstar_pipeline::TrainedPipeline;

fn advisor() -> Advisor {
    let json = northstar_test_helpers::logistic_pipeline_json();
    let pipeline = TrainedPipeline::from_json(&json, Path::new("fixture.json")).unwrap();
    Advisor::with_classifier(AdvisorConfig::default(), Box::new(pipeline), "AAAA".to_string())
}

fn transcript(advisor: &Advisor, input: &str) -> String {
    let mut out = Vec::new();
    console::run(advisor, Cursor::new(input.as_bytes()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn edit_and_predict() {
    let out = transcript(
        &advisor(),
        "predict\nset power 50\nset atmosphere Nitrogen\npredict\nquit\n",
    );
    assert!(out.contains("SUCCESS\nProbability of SUCCESS: 0.68604"));
    assert!(out.contains("power = 50"));
    assert!(out.contains("atmosphere = Nitrogen"));
    assert!(out.contains("FAIL\nProbability of SUCCESS: 0.24632"));
}

#[test]
fn errors_are_reported_and_the_session_continues() {
    let out = transcript(
        &advisor(),
        "set power 9000\nset nucleants N99\nfly\nset power 250\n",
    );
    assert!(out.contains("error: `power` must be between 50 and 500, got 9000"));
    assert!(out.contains("error: `nucleants` must be one of"));
    assert!(out.contains("error: unknown command `fly`"));
    assert!(out.contains("power = 250"));
}

#[test]
fn show_includes_the_last_result_until_the_next_edit() {
    let out = transcript(&advisor(), "predict\nshow\nset hatch 100\nshow\n");
    assert_eq!(out.matches("Probability of SUCCESS").count(), 2);
}

#[test]
fn quit_stops_reading() {
    let out = transcript(&advisor(), "quit\npredict\n");
    assert!(!out.contains("Probability"));
}

#[test]
fn page_command_writes_the_rendered_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    let input = format!("predict\npage {}\n", path.display());
    let out = transcript(&advisor(), &input);
    assert!(out.contains("wrote "));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("<code>0.68604</code>"));
}
