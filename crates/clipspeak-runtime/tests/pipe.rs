//! Process pipe tests driven by real shell commands.

#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use clipspeak_core::{FilteredText, Stage, StageCommand, TaskError, TaskId, TaskState};
use clipspeak_runtime::{ProcessPipe, StreamTransfer};
use tempfile::TempDir;
use tokio::time::{Instant, timeout};
use tokio_test::assert_err;
use tokio_util::sync::CancellationToken;

fn sh(script: &str) -> StageCommand {
    StageCommand::new("sh").args(["-c", script])
}

fn write_to(path: &Path) -> String {
    format!("cat > '{}'", path.display())
}

fn count_into(path: &Path) -> String {
    format!("wc -c > '{}'", path.display())
}

fn text(s: &str) -> FilteredText {
    FilteredText::new(s).unwrap()
}

async fn run(pipe: &ProcessPipe, content: &str) -> TaskState {
    let cancel = CancellationToken::new();
    let running = pipe.spawn(TaskId(1)).await.unwrap();
    timeout(Duration::from_secs(20), running.drive(&text(content), &cancel))
        .await
        .expect("pipe did not finish")
}

fn read_count(path: &Path) -> u64 {
    std::fs::read_to_string(path).unwrap().trim().parse().unwrap()
}

#[tokio::test]
async fn text_reaches_synthesizer_with_trailing_newline() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("played.raw");
    let pipe = ProcessPipe::new(sh("cat"), sh(&write_to(&out)));

    assert_eq!(run(&pipe, "你好").await, TaskState::Completed);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "你好\n");
}

#[tokio::test]
async fn every_synthesized_byte_reaches_the_player() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("count");
    let pipe = ProcessPipe::new(
        sh("cat > /dev/null; head -c 1000000 /dev/zero"),
        sh(&count_into(&out)),
    )
    .with_transfer(StreamTransfer::new(4096));

    assert_eq!(run(&pipe, "中文").await, TaskState::Completed);
    assert_eq!(read_count(&out), 1_000_000);
}

#[tokio::test]
async fn empty_synthesizer_output_still_closes_player() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("count");
    let pipe = ProcessPipe::new(sh("cat > /dev/null"), sh(&count_into(&out)));

    assert_eq!(run(&pipe, "字").await, TaskState::Completed);
    assert_eq!(read_count(&out), 0);
}

#[tokio::test]
async fn missing_synthesizer_is_a_spawn_failure() {
    let pipe = ProcessPipe::new(
        StageCommand::new("/nonexistent/piper"),
        sh("cat > /dev/null"),
    );
    let err = assert_err!(pipe.spawn(TaskId(1)).await);
    assert!(matches!(
        err,
        TaskError::Spawn {
            stage: Stage::Synthesizer,
            ..
        }
    ));
}

#[tokio::test]
async fn missing_player_is_a_spawn_failure() {
    let pipe = ProcessPipe::new(
        sh("cat > /dev/null; exec sleep 30"),
        StageCommand::new("/nonexistent/aplay"),
    )
    .with_shutdown_grace(Duration::from_secs(1));

    let started = Instant::now();
    let err = assert_err!(pipe.spawn(TaskId(1)).await);
    assert_eq!(err.stage(), Stage::Player);
    // The synthesizer was terminated rather than left to finish
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn player_exiting_early_fails_the_stream() {
    let pipe = ProcessPipe::new(
        sh("cat > /dev/null; head -c 50000000 /dev/zero"),
        sh("exit 0"),
    )
    .with_shutdown_grace(Duration::from_secs(1));

    match run(&pipe, "你好").await {
        TaskState::Failed(err) => assert_eq!(err.stage(), Stage::Player),
        other => panic!("expected player failure, got {other}"),
    }
}

#[tokio::test]
async fn synthesizer_refusing_input_fails_the_feed() {
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("player.pid");
    // Larger than any pipe buffer, so the write cannot complete
    let long_line = "中".repeat(1_000_000);
    let pipe = ProcessPipe::new(
        sh("exit 0"),
        sh(&format!("echo $$ > '{}'; exec cat > /dev/null", pid_file.display())),
    )
    .with_shutdown_grace(Duration::from_secs(1));

    let started = Instant::now();
    match run(&pipe, &long_line).await {
        TaskState::Failed(TaskError::Stream { stage, .. }) => {
            assert_eq!(stage, Stage::Synthesizer);
        }
        other => panic!("expected synthesizer stream failure, got {other}"),
    }
    assert!(started.elapsed() < Duration::from_secs(5));

    // The player was reaped before drive returned. It may have been stopped
    // before recording its pid, in which case there is nothing to look up.
    if let Ok(raw) = std::fs::read_to_string(&pid_file)
        && let Ok(pid) = raw.trim().parse::<i32>()
    {
        let alive = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None);
        assert_eq!(alive, Err(nix::errno::Errno::ESRCH));
    }
}

#[tokio::test]
async fn nonzero_exit_is_reported_per_stage() {
    let pipe = ProcessPipe::new(sh("cat > /dev/null; exit 2"), sh("cat > /dev/null"));
    assert!(matches!(
        run(&pipe, "你").await,
        TaskState::Failed(TaskError::Exit {
            stage: Stage::Synthesizer,
            ..
        })
    ));

    let pipe = ProcessPipe::new(sh("cat > /dev/null"), sh("cat > /dev/null; exit 3"));
    assert!(matches!(
        run(&pipe, "你").await,
        TaskState::Failed(TaskError::Exit {
            stage: Stage::Player,
            ..
        })
    ));
}

#[tokio::test]
async fn cancel_terminates_both_stages() {
    let pipe = ProcessPipe::new(
        sh("cat > /dev/null; exec sleep 30"),
        sh("exec cat > /dev/null"),
    )
    .with_shutdown_grace(Duration::from_secs(2));

    let cancel = CancellationToken::new();
    let running = pipe.spawn(TaskId(1)).await.unwrap();
    let driver = {
        let cancel = cancel.clone();
        tokio::spawn(async move { running.drive(&text("你好"), &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    let started = Instant::now();
    cancel.cancel();
    cancel.cancel();

    let state = timeout(Duration::from_secs(10), driver)
        .await
        .expect("cancelled pipe did not stop")
        .unwrap();
    assert_eq!(state, TaskState::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}
