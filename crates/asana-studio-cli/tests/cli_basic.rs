//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary data directory.

mod common;

use common::{assert_contains, Cli, CORPSE, TREE};

#[test]
fn test_queue_starts_empty() {
    let cli = Cli::new();
    let out = cli.success(&["queue", "show"]);
    assert_contains(&out, "(empty)");
    assert_contains(&out, "Total: 0m 0s (0 steps)");
}

#[test]
fn test_bilateral_pose_adds_two_steps() {
    let cli = Cli::new();
    let out = cli.add_pose_json(TREE);
    assert_contains(&out, "Added: Tree Pose (left) (20s)");
    assert_contains(&out, "Added: Tree Pose (right) (20s)");

    let json = cli.success(&["queue", "show", "--json"]);
    let steps: serde_json::Value = serde_json::from_str(&json).expect("queue json");
    let steps = steps.as_array().expect("array");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["side"], "left");
    assert_eq!(steps[1]["side"], "right");
}

#[test]
fn test_queue_persists_between_runs() {
    let cli = Cli::new();
    cli.add_pose_json(TREE);
    cli.add_pose_json(CORPSE);

    let out = cli.success(&["queue", "show"]);
    assert_contains(&out, "Corpse Pose");
    assert_contains(&out, "Total: 1m 10s (3 steps)");
    assert!(cli.data_dir().join("queue.json").exists());
}

#[test]
fn test_hold_edit_clamps_and_rejects() {
    let cli = Cli::new();
    cli.add_pose_json(CORPSE);

    let out = cli.success(&["queue", "hold", "1", "2"]);
    assert_contains(&out, "Corpse Pose: 5s");
    let out = cli.success(&["queue", "hold", "1", "9000"]);
    assert_contains(&out, "Corpse Pose: 600s");

    let err = cli.failure(&["queue", "hold", "1", "abc"]);
    assert_contains(&err, "invalid hold time");
    let err = cli.failure(&["queue", "hold", "4", "30"]);
    assert_contains(&err, "out of bounds");
}

#[test]
fn test_move_and_remove() {
    let cli = Cli::new();
    cli.add_pose_json(TREE);
    cli.add_pose_json(CORPSE);

    cli.success(&["queue", "move", "3", "1"]);
    let json = cli.success(&["queue", "show", "--json"]);
    let steps: serde_json::Value = serde_json::from_str(&json).expect("queue json");
    assert_eq!(steps[0]["english_name"], "Corpse Pose");

    let out = cli.success(&["queue", "remove", "1"]);
    assert_contains(&out, "Removed: Corpse Pose");
    cli.failure(&["queue", "remove", "0"]);
}

#[test]
fn test_export_lists_steps() {
    let cli = Cli::new();
    cli.add_pose_json(TREE);
    let out = cli.success(&["queue", "export", "--title", "Morning"]);
    assert_contains(&out, "# Morning");
    assert_contains(&out, "1. Tree Pose (left) — 20s");
    assert_contains(&out, "2. Tree Pose (right) — 20s");
}

#[test]
fn test_import_replaces_queue() {
    let cli = Cli::new();
    cli.add_pose_json(TREE);

    let path = cli.data_dir().join("steps.json");
    std::fs::write(
        &path,
        r#"[{"pose_id":3,"english_name":"Cat","side":"both","hold_seconds":15}]"#,
    )
    .expect("write steps");
    let out = cli.success(&["queue", "import", path.to_str().expect("utf-8 path")]);
    assert_contains(&out, "Queue loaded: 1 steps");

    cli.success(&["queue", "clear"]);
    assert_contains(&cli.success(&["queue", "show"]), "(empty)");
}

#[test]
fn test_play_runs_to_completion() {
    let cli = Cli::new();
    cli.add_pose_json(TREE);
    cli.success(&["queue", "hold", "1", "5"]);
    cli.success(&["queue", "hold", "2", "5"]);

    let (out, stderr, code) =
        cli.run(&["play", "--tick-ms", "1", "--no-voice", "--no-glyph"]);
    assert_eq!(code, 0, "play failed: {stderr}");
    assert_contains(&out, "Tree Pose");
    assert_contains(&out, "LEFT SIDE");
    assert_contains(&out, "RIGHT SIDE");
    assert_contains(&out, "Practice complete. Namaste.");
}

#[test]
fn test_play_quit_ends_session() {
    let cli = Cli::new();
    cli.add_pose_json(CORPSE);

    let (out, _, code) = cli.run_with_input(&["play", "--no-voice"], "q\n");
    assert_eq!(code, 0);
    assert_contains(&out, "Session ended.");
}

#[test]
fn test_play_survives_unreadable_stdin() {
    let cli = Cli::new();
    cli.add_pose_json(CORPSE);
    cli.success(&["queue", "hold", "1", "5"]);

    let (out, stderr, code) = cli.run_with_bytes(
        &["play", "--tick-ms", "1", "--no-voice", "--no-glyph"],
        b"\xff\xfe\n",
    );
    assert_eq!(code, 0, "play failed: {stderr}");
    assert_contains(&out, "Practice complete. Namaste.");
}

#[test]
fn test_play_empty_queue_fails() {
    let cli = Cli::new();
    let err = cli.failure(&["play"]);
    assert_contains(&err, "the queue is empty");
}

#[test]
fn test_config_get_set_reset() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["config", "get", "playback.tick_millis"]).trim(), "1000");

    cli.success(&["config", "set", "playback.voice_enabled", "false"]);
    assert_eq!(cli.success(&["config", "get", "playback.voice_enabled"]).trim(), "false");

    cli.failure(&["config", "set", "playback.nope", "1"]);
    cli.failure(&["config", "get", "nope"]);

    cli.success(&["config", "reset"]);
    assert_eq!(cli.success(&["config", "get", "playback.voice_enabled"]).trim(), "true");
}

#[test]
fn test_config_set_speech_command() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["config", "get", "speech.command"]).trim(), "null");

    cli.success(&["config", "set", "speech.command", "espeak"]);
    assert_eq!(cli.success(&["config", "get", "speech.command"]).trim(), "espeak");
    let saved = std::fs::read_to_string(cli.data_dir().join("config.toml")).expect("config");
    assert_contains(&saved, "command = \"espeak\"");
}

#[test]
fn test_unreachable_api_reports_error() {
    let cli = Cli::new();
    cli.success(&["config", "set", "api.base_url", "http://127.0.0.1:9/api"]);
    cli.success(&["config", "set", "api.timeout_secs", "1"]);

    let err = cli.failure(&["pose", "search", "tree"]);
    assert_contains(&err, "error:");
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let out = cli.success(&["completions", "bash"]);
    assert_contains(&out, "asana-studio");
}
