use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn docweave() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("docweave"))
}

#[test]
fn build_orders_files_by_weight() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("a.md"), "---\nweight: 2\n---\nB");
    write_file(&content.join("b.md"), "---\nweight: 1\n---\nA");
    let output = temp.path().join("output.md");

    let assert = docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "---\nweight: 1\n---\nA\n---\nweight: 2\n---\nB\n"
    );

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["path"], "b.md");
    assert_eq!(items[0]["weight"], 1);
    assert_eq!(items[1]["path"], "a.md");
    assert_eq!(items[2]["kind"], "output");
    assert_eq!(items[2]["meta"]["files"], 2);
    assert_eq!(items[2]["meta"]["hash"].as_str().map(str::len), Some(16));
}

#[test]
fn build_fails_on_malformed_header_and_writes_nothing() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("good.md"), "---\nweight: 1\n---\nok");
    write_file(&content.join("broken.md"), "---\nweight: [1\n---\nbody");
    let output = temp.path().join("output.md");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode error"))
        .stderr(predicate::str::contains("broken.md"));

    assert!(!output.exists());
}

#[test]
fn build_keeps_previous_output_on_failure() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("bad.md"), "---\nweight: \"one\"\n---\n");
    let output = temp.path().join("output.md");
    fs::write(&output, "last good build").unwrap();

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema error"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "last good build");
}

#[test]
fn collect_mode_reports_every_bad_file() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("one.md"), "---\nweight: {\n---\n");
    write_file(&content.join("two.md"), "---\nweight: true\n---\n");
    write_file(&content.join("fine.md"), "---\nweight: 3\n---\n");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(temp.path().join("out.md"))
        .arg("--errors")
        .arg("collect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 file(s) failed"))
        .stderr(predicate::str::contains("one.md"))
        .stderr(predicate::str::contains("two.md"));
}

#[test]
fn unweighted_append_places_plain_files_last() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("notes.txt"), "plain notes");
    write_file(&content.join("w.md"), "---\nweight: 5\n---\nW");
    let output = temp.path().join("out.md");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .arg("--unweighted")
        .arg("append")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "---\nweight: 5\n---\nW\nplain notes\n"
    );
}

#[test]
fn unweighted_error_rejects_plain_files() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("notes.txt"), "plain notes");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(temp.path().join("out.md"))
        .arg("--unweighted")
        .arg("error")
        .assert()
        .failure()
        .stderr(predicate::str::contains("notes.txt"));
}

#[test]
fn empty_input_dir_writes_empty_output() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    fs::create_dir(&content).unwrap();
    let output = temp.path().join("out.md");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read(&output).unwrap(), Vec::<u8>::new());
}

#[test]
fn missing_input_dir_fails() {
    let temp = tempdir().unwrap();

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(temp.path().join("nowhere"))
        .arg("--output-file")
        .arg(temp.path().join("out.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn manifest_lists_order_without_writing() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("z.md"), "---\nweight: 1\n---\n");
    write_file(&content.join("y.md"), "---\nweight: 1\n---\n");
    write_file(&content.join("x.md"), "---\nweight: 0.5\n---\n");
    let output = temp.path().join("out.md");

    let assert = docweave()
        .arg("manifest")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    let paths: Vec<_> = items
        .iter()
        .map(|v| v["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["x.md", "y.md", "z.md"]);
    assert!(!output.exists());
}

#[test]
fn manifest_markdown_format() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("intro.md"), "---\nweight: 1\n---\n");

    docweave()
        .arg("--format")
        .arg("md")
        .arg("manifest")
        .arg("--input-dir")
        .arg(&content)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Manifest"))
        .stdout(predicate::str::contains("1. `intro.md` (weight 1)"));
}

#[test]
fn separator_normalize_avoids_blank_lines() {
    let temp = tempdir().unwrap();
    let content = temp.path().join("content");
    write_file(&content.join("a.md"), "---\nweight: 1\n---\nA\n");
    write_file(&content.join("b.md"), "---\nweight: 2\n---\nB\n");
    let output = temp.path().join("out.md");

    docweave()
        .arg("build")
        .arg("--input-dir")
        .arg(&content)
        .arg("--output-file")
        .arg(&output)
        .arg("--separator")
        .arg("normalize")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "---\nweight: 1\n---\nA\n---\nweight: 2\n---\nB\n"
    );
}

#[test]
fn config_file_supplies_paths_and_flags_override() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("notes/a.md"), "---\nweight: 1\n---\nA");
    write_file(&temp.path().join("notes/plain.md"), "plain");
    write_file(
        &temp.path().join("docweave.toml"),
        "[input]\ndir = \"notes\"\n\n[output]\nfile = \"dist/notes.md\"\n\n[policy]\nunweighted = \"error\"\n",
    );

    // The file's policy rejects plain.md
    docweave()
        .arg("--config")
        .arg(temp.path().join("docweave.toml"))
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("plain.md"));

    // A flag overrides it; paths still come from the file
    docweave()
        .arg("--config")
        .arg(temp.path().join("docweave.toml"))
        .arg("build")
        .arg("--unweighted")
        .arg("exclude")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("dist/notes.md")).unwrap(),
        "---\nweight: 1\n---\nA\n"
    );
}

#[test]
fn invalid_config_file_fails() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("bad.toml"), "[input]\nfolder = \"x\"\n");

    docweave()
        .arg("--config")
        .arg(temp.path().join("bad.toml"))
        .arg("manifest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn unknown_policy_value_is_rejected() {
    docweave()
        .arg("build")
        .arg("--tie-break")
        .arg("random")
        .assert()
        .failure()
        .stderr(predicate::str::contains("path, scan"));
}

#[test]
fn unknown_format_is_rejected() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("content")).unwrap();

    docweave()
        .arg("--format")
        .arg("yaml")
        .arg("manifest")
        .arg("--input-dir")
        .arg(temp.path().join("content"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}
