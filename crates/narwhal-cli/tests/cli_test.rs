use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn basic_fixture() -> PathBuf {
    let fixture = repo_root().join("fixtures").join("markdown").join("basic.md");
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());
    fixture
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("narwhal-cli"))
}

#[test]
fn outline_prints_heading_records() {
    let out = cli()
        .args(["outline", basic_fixture().to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let headings = json.as_array().expect("array");
    assert_eq!(headings.len(), 7);
    assert_eq!(headings[0]["name"], "Project");
}

#[test]
fn layout_reads_stdin_and_honours_collapse_depth() {
    let out = cli()
        .args(["layout", "--collapse-depth", "2", "-"])
        .write_stdin("# r\n## a\n### a1\n## b\n")
        .output()
        .expect("run");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let names: Vec<&str> = json["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .filter_map(|n| n["name"].as_str())
        .collect();
    assert_eq!(names, vec!["r", "a", "b"]);
    assert_eq!(json["links"].as_array().map(Vec::len), Some(2));
    assert!(json["viewport"]["zoomScale"].as_f64().is_some());
}

#[test]
fn layout_accepts_json_options() {
    let out = cli()
        .args([
            "layout",
            "--options",
            r#"{"nodeWidth": 100, "spacingHorizontal": 20, "autoFit": false}"#,
            "-",
        ])
        .write_stdin("# r\n## a\n")
        .output()
        .expect("run");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(json["nodes"][1]["x"].as_f64(), Some(120.0));
}

#[test]
fn render_writes_svg_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out_path = tmp.path().join("map.svg");

    cli()
        .current_dir(repo_root())
        .args([
            "render",
            "--preset",
            "colorful",
            "--out",
            out_path.to_string_lossy().as_ref(),
            basic_fixture().to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out_path).expect("read svg");
    assert!(svg.starts_with("<svg "), "{svg}");
    assert!(svg.contains(">Keep ids stable</text>"), "{svg}");
    // The colorful preset uses the plain renderer: no boxed outlines.
    assert!(!svg.contains(r#"rx="10""#), "{svg}");
}

#[test]
fn unknown_preset_fails_with_exit_code_1() {
    let out = cli()
        .args(["render", "--preset", "neon", "-"])
        .write_stdin("# r\n")
        .output()
        .expect("run");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("neon"));
}

#[test]
fn usage_errors_exit_with_code_2() {
    for args in [
        vec!["--nope"],
        vec!["layout", "--collapse-depth"],
        vec!["layout", "--viewport-width", "-5"],
        vec!["a.md", "b.md"],
    ] {
        let out = cli().args(&args).output().expect("run");
        assert_eq!(out.status.code(), Some(2), "{args:?}");
        assert!(
            String::from_utf8_lossy(&out.stderr).contains("USAGE:"),
            "{args:?}"
        );
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.md");
    let out = cli()
        .args(["outline", missing.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("I/O error"));
}
