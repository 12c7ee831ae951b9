use assert_cmd::cargo::cargo_bin_cmd;

fn help_text(args: &[&str]) -> String {
    let mut cmd = cargo_bin_cmd!("reelshelfctl");
    let output = cmd
        .args(args)
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn top_level_help_lists_commands() {
    let text = help_text(&[]);
    assert!(text.contains("series"), "help missing series command");
    assert!(text.contains("ingest"), "help missing ingest command");
    assert!(text.contains("--config"), "help missing --config flag");
}

#[test]
fn series_subcommands_present() {
    let text = help_text(&["series"]);
    assert!(text.contains("add"), "series help missing add");
    assert!(text.contains("list"), "series help missing list");
    assert!(text.contains("show"), "series help missing show");
}

#[test]
fn ingest_help_mentions_modes() {
    let text = help_text(&["ingest"]);
    assert!(text.contains("--season"), "ingest help missing --season");
    assert!(text.contains("--range"), "ingest help missing --range");
    assert!(text.contains("--open"), "ingest help missing --open");
    assert!(text.contains("--items"), "ingest help missing --items");
}

#[test]
fn open_and_bounded_flags_conflict() {
    let mut cmd = cargo_bin_cmd!("reelshelfctl");
    cmd.args([
        "ingest", "abc", "--open", "--season", "1", "--range", "1-3",
        "--items", "m.jsonl",
    ])
    .assert()
    .failure();
}
