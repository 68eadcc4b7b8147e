use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("stree").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("semtree-cli"));
    cmd.current_dir(repo_root());
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf-8 stdout")
}

#[test]
fn cli_renders_svg_with_only_the_root() {
    let path = fixture("simple.json");
    let svg = stdout_of(cli().args(["render", path.to_string_lossy().as_ref()]));
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches(r#"class="node""#).count(), 1);
    assert!(svg.contains(r#"data-id="1""#));
    assert!(svg.contains("lightsteelblue"));
}

#[test]
fn cli_applies_operations_in_order() {
    let path = fixture("quadratic.json");
    let svg = stdout_of(cli().args([
        "--expand-all",
        "--toggle",
        "15",
        path.to_string_lossy().as_ref(),
    ]));
    // relseq, its two children; the collapsed sum hides the rest
    assert_eq!(svg.matches(r#"class="node""#).count(), 3);
}

#[test]
fn cli_layout_emits_json() {
    let out = stdout_of(cli().args([
        "layout",
        "--expanded",
        "--orientation",
        "left-right",
        fixture("fraction.json").to_string_lossy().as_ref(),
    ]));
    let value: serde_json::Value = serde_json::from_str(&out).expect("layout json");
    assert_eq!(value["orientation"], "left-right");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["nodes"][0]["label"], "/");
    assert_eq!(value["links"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_state_files_round_trip() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = tmp.path().join("state.json");
    let path = fixture("quadratic.json");

    cli()
        .args([
            "layout",
            "--toggle",
            "16",
            "--save-state",
            state.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).expect("read state")).expect("json");
    assert_eq!(saved["16"], true);
    assert_eq!(saved["15"], false);

    let out = stdout_of(cli().args([
        "layout",
        "--orientation",
        "left-right",
        "--state",
        state.to_string_lossy().as_ref(),
        path.to_string_lossy().as_ref(),
    ]));
    let value: serde_json::Value = serde_json::from_str(&out).expect("layout json");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
}

#[test]
fn cli_renders_png_with_default_out_path_for_file_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let tmp_fixture = tmp.path().join("fraction.json");
    fs::copy(fixture("fraction.json"), &tmp_fixture).expect("copy fixture");
    let expected_out = tmp_fixture.with_extension("png");

    cli()
        .args([
            "render",
            "--format",
            "png",
            "--scale",
            "0.5",
            "--background",
            "white",
            tmp_fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let file = fs::File::open(&expected_out).expect("open png");
    let reader = png::Decoder::new(file).read_info().expect("png header");
    assert_eq!(reader.info().width, 640);
    assert_eq!(reader.info().height, 400);
}

#[test]
fn cli_link_encode_and_decode() {
    let query = stdout_of(cli().args(["link", "encode", "--panels", "1001", "x^2 + 1"]));
    assert_eq!(query.trim(), "1001x%5E2%20+%201");

    let out = stdout_of(cli().args(["link", "decode", query.trim()]));
    let value: serde_json::Value = serde_json::from_str(&out).expect("link json");
    assert_eq!(value["input"], "x^2 + 1");
    assert_eq!(value["panels"], serde_json::json!([true, false, false, true]));
}

#[test]
fn cli_reports_missing_trees() {
    assert_cmd::Command::new(assert_cmd::cargo_bin!("semtree-cli"))
        .args(["render", "-"])
        .write_stdin("{}")
        .assert()
        .code(3);
    cli().args(["--help"]).assert().code(2);
}
