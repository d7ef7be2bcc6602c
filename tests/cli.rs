use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("appdeck").unwrap();
        cmd.arg("--data-file")
            .arg(self.dir.path().join("apps.json"))
            .arg("--config-file")
            .arg(self.dir.path().join("config.json"));
        cmd
    }

    fn write(&self, name: &str, content: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

const SAMPLE: &str = r#"[
  {"id":"1","appName":"Zeta","company":"Acme","website":"https://z.io","domain":"Design","isFree":"Free","summary":"z","createdAt":"2024-01-03T00:00:00.000Z"},
  {"id":"2","appName":"alpha","company":"Bolt","website":"https://a.io","domain":"Health","isFree":"Paid","summary":"a","createdAt":"2024-01-01T00:00:00.000Z"},
  {"id":"3","appName":"Mid","company":"Core","website":"https://m.io","domain":"Design","isFree":"Free","summary":"m, \"quoted\"","createdAt":"2024-01-02T00:00:00.000Z"}
]"#;

#[test]
fn import_then_list_in_each_sort_mode() {
    let env = Env::new();
    let file = env.write("in.json", SAMPLE);
    let out = env.cmd().arg("import").arg(&file).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Import completed (3 apps)"));

    let expected = [
        ("name_asc", ["alpha", "Mid", "Zeta"]),
        ("name_desc", ["Zeta", "Mid", "alpha"]),
        ("createdAt_asc", ["alpha", "Mid", "Zeta"]),
        ("createdAt_desc", ["Zeta", "Mid", "alpha"]),
    ];
    for (mode, names) in expected {
        let out = env.cmd().args(["list", "--sort", mode]).output().unwrap();
        let stdout = String::from_utf8(out.stdout).unwrap();
        let got: Vec<&str> = stdout
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(got, names, "sort mode {mode}");
    }
}

#[test]
fn subcommands_log_at_info_by_default() {
    let env = Env::new();
    let file = env.write("in.json", SAMPLE);
    let out = env
        .cmd()
        .env_remove("APPDECK_LOG")
        .arg("import")
        .arg(&file)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("parsed import file"));
}

#[test]
fn non_array_import_fails_and_keeps_data() {
    let env = Env::new();
    let good = env.write("in.json", SAMPLE);
    env.cmd().arg("import").arg(&good).assert().success();

    let bad = env.write("bad.json", r#"{"apps":[]}"#);
    let out = env.cmd().arg("import").arg(&bad).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("expected a JSON array"));

    let out = env.cmd().arg("list").output().unwrap();
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Results: 3"));
}

#[test]
fn csv_export_has_fixed_header_and_quoted_values() {
    let env = Env::new();
    let file = env.write("in.json", SAMPLE);
    env.cmd().arg("import").arg(&file).assert().success();

    let csv_path = env.dir.path().join("apps.csv");
    env.cmd().arg("export").arg(&csv_path).assert().success();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("appName,company,website,domain,isFree,summary,logoUrl,audioUrl,videoUrl,createdAt")
    );
    assert!(csv.contains(r#""m, ""quoted""""#));
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn export_of_empty_store_fails() {
    let env = Env::new();
    let out_path = env.dir.path().join("apps.csv");
    let out = env.cmd().arg("export").arg(&out_path).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Nothing to export"));
    assert!(!out_path.exists());
}

#[test]
fn clear_with_yes_empties_store() {
    let env = Env::new();
    let file = env.write("in.json", SAMPLE);
    env.cmd().arg("import").arg(&file).assert().success();
    env.cmd().args(["clear", "--yes"]).assert().success();
    let out = env.cmd().arg("list").output().unwrap();
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Results: 0"));
}

#[test]
fn tui_refuses_non_tty_stdin() {
    let env = Env::new();
    let out = env.cmd().output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("stdin must be a tty"));
}
