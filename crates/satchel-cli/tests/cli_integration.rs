use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct CliFixture {
    tmp: TempDir,
    home_dir: PathBuf,
}

impl CliFixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let home_dir = tmp.path().join("home");
        std::fs::create_dir_all(&home_dir).unwrap();
        Self { tmp, home_dir }
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(satchel_binary_path());
        cmd.args(args);
        cmd.current_dir(&self.home_dir);
        cmd.env("HOME", &self.home_dir);
        cmd.env("SATCHEL_CONFIG", "");
        cmd.env("NO_COLOR", "1");
        cmd.output().unwrap()
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "command failed: {:?}\nstdout:\n{}\nstderr:\n{}",
                args,
                stdout(&output),
                stderr(&output)
            );
        }
        stdout(&output)
    }

    fn run_err(&self, args: &[&str]) -> (String, String) {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "command unexpectedly succeeded: {:?}\nstdout:\n{}\nstderr:\n{}",
            args,
            stdout(&output),
            stderr(&output)
        );
        (stdout(&output), stderr(&output))
    }

    /// Write a config with one profile whose staging dirs live in the fixture.
    fn write_config(&self) -> (PathBuf, PathBuf, PathBuf) {
        let include = self.path().join("include-me.txt");
        std::fs::write(&include, b"some dotfile content").unwrap();

        let source_dir = self.path().join("stage-source");
        let segment_dir = self.path().join("stage-segments");
        let config_path = self.path().join("satchel.yaml");
        let config = format!(
            r#"profiles:
  - name: test
    destination: "remote:backup/test/"
    files:
      - {include}
    source_dir: {source}
    segment_dir: {segments}
    size_threshold: 1M
"#,
            include = include.display(),
            source = source_dir.display(),
            segments = segment_dir.display(),
        );
        std::fs::write(&config_path, config).unwrap();
        (config_path, source_dir, segment_dir)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn satchel_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_satchel"))
}

#[test]
fn config_subcommand_prints_template() {
    let fixture = CliFixture::new();
    let output = fixture.run_ok(&["config"]);
    assert!(output.contains("profiles:"));
    assert!(output.contains("destination:"));
}

#[test]
fn config_subcommand_writes_file_once() {
    let fixture = CliFixture::new();
    let dest = fixture.path().join("generated.yaml");
    let dest_str = dest.to_string_lossy().to_string();

    fixture.run_ok(&["config", &dest_str]);
    assert!(dest.exists());

    // Refuses to overwrite
    let (_, stderr) = fixture.run_err(&["config", &dest_str]);
    assert!(stderr.contains("already exists"));
}

#[test]
fn missing_config_file_reports_search_paths() {
    let fixture = CliFixture::new();
    let (_, stderr) = fixture.run_err(&["archive"]);
    assert!(stderr.contains("no configuration file"));
    assert!(stderr.contains("satchel.yaml"));
}

#[test]
fn unknown_profile_lists_available_ones() {
    let fixture = CliFixture::new();
    let (config_path, _, _) = fixture.write_config();
    let config_str = config_path.to_string_lossy().to_string();

    let (_, stderr) = fixture.run_err(&["-c", &config_str, "-p", "nope", "archive"]);
    assert!(stderr.contains("no profile named 'nope'"));
    assert!(stderr.contains("test"));
}

#[cfg(unix)]
#[test]
fn archive_subcommand_stages_and_segments() {
    let fixture = CliFixture::new();
    let (config_path, source_dir, segment_dir) = fixture.write_config();
    let config_str = config_path.to_string_lossy().to_string();

    let output = fixture.run_ok(&["-c", &config_str, "-p", "test", "archive"]);
    assert!(output.contains("segment(s) staged"));

    // The include landed in the staging source, and one segment was cut.
    assert!(source_dir.join("include-me.txt").exists());
    assert!(segment_dir.join("0.tar").exists());
    let manifest = std::fs::read_to_string(segment_dir.join("0.txt")).unwrap();
    assert_eq!(manifest.trim(), "include-me.txt");
}

#[test]
fn upload_without_staged_segments_fails() {
    let fixture = CliFixture::new();
    let (config_path, _, _) = fixture.write_config();
    let config_str = config_path.to_string_lossy().to_string();

    let (_, stderr) = fixture.run_err(&["-c", &config_str, "-p", "test", "upload"]);
    assert!(stderr.contains("satchel archive"));
}
