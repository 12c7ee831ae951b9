use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn reelshelfctl(workdir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("reelshelfctl");
    cmd.current_dir(workdir)
        .env_remove("REELSHELF_CONFIG")
        .env_remove("REELSHELF_MAX_BOUNDED_EPISODES")
        .env("REELSHELF_STORE_PATH", workdir.join("catalog.json"))
        .env("RUST_LOG", "warn");
    cmd
}

fn add_series(workdir: &Path) -> String {
    let output = reelshelfctl(workdir)
        .args(["series", "add", "--title", "Example", "--year", "2019"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).trim().to_string()
}

fn write_manifest(path: &Path, id: &str, items: &[(u16, u16)]) {
    let lines: Vec<String> = items
        .iter()
        .map(|(season, episode)| {
            serde_json::json!({
                "caption": format!("id:{id} season:{season} episode:{episode}"),
                "video_ref": format!("file-{season}-{episode}"),
            })
            .to_string()
        })
        .collect();
    fs::write(path, lines.join("\n")).expect("write manifest");
}

#[test]
fn bounded_batch_completes_and_reruns_are_idempotent() {
    let dir = tempdir().expect("tempdir");
    let id = add_series(dir.path());
    let manifest = dir.path().join("batch.jsonl");
    write_manifest(&manifest, &id, &[(1, 2), (1, 1), (1, 3)]);

    reelshelfctl(dir.path())
        .args(["ingest", &id, "--season", "1", "--range", "1-3", "--items"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Season 1: episodes 1,2,3"))
        .stdout(predicate::str::contains("3 added, 0 skipped, 0 rejected"));

    reelshelfctl(dir.path())
        .args(["ingest", &id, "--season", "1", "--range", "1-3", "--items"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("already in the catalog"))
        .stdout(predicate::str::contains("0 added, 3 skipped, 0 rejected"));

    reelshelfctl(dir.path())
        .args(["series", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 3 episodes"));
}

#[test]
fn open_batch_groups_by_season() {
    let dir = tempdir().expect("tempdir");
    let id = add_series(dir.path());
    let manifest = dir.path().join("open.jsonl");
    write_manifest(&manifest, &id, &[(1, 1), (2, 1), (1, 2)]);

    reelshelfctl(dir.path())
        .args(["ingest", &id, "--open", "--items"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Season 1: episodes 1,2"))
        .stdout(predicate::str::contains("Season 2: episodes 1"))
        .stdout(predicate::str::contains("total 3"));

    reelshelfctl(dir.path())
        .args(["series", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seasons: 1, 2"))
        .stdout(predicate::str::contains("Season 2: episodes 1"));
}

#[test]
fn oversized_ranges_fail() {
    let dir = tempdir().expect("tempdir");
    let id = add_series(dir.path());
    let manifest = dir.path().join("empty.jsonl");
    fs::write(&manifest, "").expect("write manifest");

    reelshelfctl(dir.path())
        .args(["ingest", &id, "--season", "1", "--range", "1-60", "--items"])
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bounded ingestion job"));
}
