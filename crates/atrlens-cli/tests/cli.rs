use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const GEMPLUS: &str = "3B A7 00 40 18 80 65 A2 08 01 01 52";
const TLV_CARD: &str = "3B 8E 80 01 80 31 80 66 B1 84 0C 01 6E 01 83 00 90 00 1C";

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("atrlens"));
    cmd.env_remove("ATRLENS_CARD_LIST").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_supports_decode_and_parse() {
    cmd().arg("decode").arg("--help").assert().success();
    cmd().arg("parse").arg("--help").assert().success();
    cmd().arg("batch").arg("--help").assert().success();
}

#[test]
fn decode_prints_text_report() {
    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg(GEMPLUS)
        .assert()
        .success()
        .stdout(contains("TS = 0x3B --> Direct Convention").and(contains("Protocol T=0")));
}

#[test]
fn split_arguments_are_joined() {
    let args: Vec<&str> = GEMPLUS.split(' ').collect();
    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .args(&args)
        .assert()
        .success()
        .stdout(contains(format!("ATR: {GEMPLUS}")));
}

#[test]
fn json_output_is_valid_structured_record() {
    let assert = cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("--format")
        .arg("json")
        .arg(TLV_CARD)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let json: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["hbn"], 14);
    assert_eq!(json["fields"]["TD1"]["value"], 0x80);
    assert_eq!(json["checksum"]["status"], "valid");
}

#[test]
fn simple_json_renders_descriptions() {
    let assert = cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("--format")
        .arg("simple-json")
        .arg("--pretty")
        .arg(TLV_CARD)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let json: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["atr"], TLV_CARD);
    assert_eq!(json["TCK"]["description"], "correct checksum");
}

#[test]
fn odd_length_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("3B A")
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn strict_fails_on_wrong_checksum() {
    let altered = TLV_CARD.replace(" 1C", " 1D");
    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg(&altered)
        .assert()
        .success()
        .stdout(contains("WRONG CHECKSUM, expected 0x1C"));
    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("--strict")
        .arg(&altered)
        .assert()
        .failure()
        .stderr(contains("ATR anomalies detected"));
}

#[test]
fn card_list_identifies_card() {
    let temp = TempDir::new().expect("tempdir");
    let list = temp.path().join("smartcard_list.txt");
    std::fs::write(
        &list,
        "# comment\n\n3B A7 00 40 .. 80 65 A2 08 .. .. ..\n\tGemplus GPK8000\n",
    )
    .expect("write list");

    cmd()
        .arg("decode")
        .arg("--card-list")
        .arg(&list)
        .arg(GEMPLUS)
        .assert()
        .success()
        .stdout(contains("Possibly identified card:").and(contains("Gemplus GPK8000")));

    cmd()
        .env("ATRLENS_CARD_LIST", &list)
        .arg("decode")
        .arg(GEMPLUS)
        .assert()
        .success()
        .stdout(contains("Gemplus GPK8000"));
}

#[test]
fn missing_card_list_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("decode")
        .arg("--card-list")
        .arg(temp.path().join("missing.txt"))
        .arg(GEMPLUS)
        .assert()
        .failure()
        .stderr(contains("card list not found").and(contains("hint:")));
}

#[test]
fn output_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("atr.html");

    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("--format")
        .arg("html")
        .arg("-o")
        .arg(&report)
        .arg(GEMPLUS)
        .assert()
        .success()
        .stdout(predicates::str::is_empty())
        .stderr(contains("OK: output written"));

    let html = std::fs::read_to_string(&report).expect("read report");
    assert!(html.contains("<title>ATR Parsing</title>"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("atr.json");

    cmd()
        .arg("decode")
        .arg("--no-card-list")
        .arg("--format")
        .arg("json")
        .arg("--quiet")
        .arg("-o")
        .arg(&report)
        .arg(GEMPLUS)
        .assert()
        .success()
        .stderr(contains("OK: output written").not());
}

#[test]
fn batch_summarizes_card_list() {
    let temp = TempDir::new().expect("tempdir");
    let list = temp.path().join("smartcard_list.txt");
    let altered = TLV_CARD.replace(" 1C", " 1D");
    std::fs::write(
        &list,
        format!(
            "# comment\n{GEMPLUS}\n\tGemplus\n3B A7 00 40 .. 80\n\tpattern\n{altered}\n\tbroken\n3B A\n\todd\n"
        ),
    )
    .expect("write list");

    cmd()
        .arg("batch")
        .arg(&list)
        .assert()
        .success()
        .stdout(
            contains("decoded: 2, with anomalies: 1, failed: 1")
                .and(contains("WRONG CHECKSUM"))
                .and(contains("line 8: 3B A")),
        );

    cmd()
        .arg("batch")
        .arg("--strict")
        .arg("--quiet")
        .arg(&list)
        .assert()
        .failure()
        .stdout(contains("line ").not())
        .stderr(contains("error:"));
}

#[test]
fn batch_glob_must_match_one_file() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::write(temp.path().join("a.txt"), format!("{GEMPLUS}\n")).expect("write a");
    let pattern = temp.path().join("*.txt");

    cmd()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .success()
        .stdout(contains("decoded: 1, with anomalies: 0, failed: 0"));

    std::fs::write(temp.path().join("b.txt"), format!("{GEMPLUS}\n")).expect("write b");
    cmd()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern"));
}
