//! Helpers for CLI end-to-end tests.
//!
//! Each test gets its own data directory so the queue and config never leak
//! between tests or into the user's home.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

pub struct Cli {
    data_dir: TempDir,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            data_dir: tempfile::tempdir().expect("create temp data dir"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Run the binary with `stdin` piped in; returns (stdout, stderr, code).
    pub fn run_with_input(&self, args: &[&str], stdin: &str) -> (String, String, i32) {
        self.run_with_bytes(args, stdin.as_bytes())
    }

    pub fn run_with_bytes(&self, args: &[&str], stdin: &[u8]) -> (String, String, i32) {
        let mut child = Command::new(env!("CARGO_BIN_EXE_asana-studio"))
            .args(args)
            .env("ASANA_STUDIO_DATA_DIR", self.data_dir())
            .env("ASANA_STUDIO_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn asana-studio");

        if let Some(mut input) = child.stdin.take() {
            input.write_all(stdin).expect("write stdin");
        }
        let output = child.wait_with_output().expect("wait for asana-studio");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_input(args, "")
    }

    /// Run and expect success; returns stdout.
    pub fn success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "command {args:?} failed: {stderr}");
        stdout
    }

    /// Run and expect failure; returns stderr.
    pub fn failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert_ne!(code, 0, "command {args:?} unexpectedly succeeded");
        stderr
    }

    /// Write a catalog record and add it to the queue without a server.
    pub fn add_pose_json(&self, json: &str) -> String {
        let path = self.data_dir().join("pose.json");
        std::fs::write(&path, json).expect("write pose json");
        self.success(&["queue", "add-json", path.to_str().expect("utf-8 path")])
    }
}

pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{haystack}' to contain '{needle}'"
    );
}

pub const TREE: &str = r#"{"id":7,"english_name":"Tree Pose","sanskrit_name":"Vrksasana",
    "category":"standing","tags":"balancing","is_bilateral":1,"default_hold_seconds":20}"#;

pub const CORPSE: &str = r#"{"id":1,"english_name":"Corpse Pose","category":"restorative",
    "is_bilateral":false}"#;
