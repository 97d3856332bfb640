//! Single-flight supervision tests.

#![cfg(unix)]

use std::time::Duration;

use clipspeak_core::{FilteredText, StageCommand, TaskError, TaskState};
use clipspeak_runtime::{ProcessPipe, TaskHandle, TaskSupervisor};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

fn sh(script: &str) -> StageCommand {
    StageCommand::new("sh").args(["-c", script])
}

/// A pipe whose synthesizer keeps running until terminated.
fn long_pipe() -> ProcessPipe {
    ProcessPipe::new(
        sh("cat > /dev/null; exec sleep 30"),
        sh("exec cat > /dev/null"),
    )
    .with_shutdown_grace(Duration::from_millis(500))
}

fn text(s: &str) -> FilteredText {
    FilteredText::new(s).unwrap()
}

async fn wait_until_running(handle: &TaskHandle) {
    timeout(Duration::from_secs(5), async {
        while !handle.is_running() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("task never started running");
}

#[tokio::test]
async fn supersede_cancels_previous_before_returning() {
    let mut supervisor = TaskSupervisor::new(long_pipe(), CancellationToken::new());

    let first = supervisor.supersede(text("你好"));
    wait_until_running(&first).await;

    let second = supervisor.supersede(text("世界"));
    // Triggered synchronously, without waiting for the first task's processes
    assert!(first.is_cancelled());
    assert!(!first.is_running());
    assert!(!second.is_cancelled());
    assert_ne!(first.id(), second.id());

    let first_state = timeout(Duration::from_secs(5), first.wait()).await.unwrap();
    assert_eq!(first_state, TaskState::Cancelled);

    wait_until_running(&second).await;
    assert_eq!(supervisor.shutdown(Duration::from_secs(5)).await, 2);
    assert_eq!(second.wait().await, TaskState::Cancelled);
}

#[tokio::test]
async fn at_most_one_task_runs_under_rapid_changes() {
    let mut supervisor = TaskSupervisor::new(long_pipe(), CancellationToken::new());
    let mut handles = Vec::new();

    for i in 0..10 {
        handles.push(supervisor.supersede(text(if i % 2 == 0 { "一" } else { "二" })));
        let running = handles.iter().filter(|h| h.is_running()).count();
        assert!(running <= 1, "{running} tasks running after change {i}");
        sleep(Duration::from_millis(5)).await;
    }

    for _ in 0..50 {
        let running = handles.iter().filter(|h| h.is_running()).count();
        assert!(running <= 1, "{running} tasks running");
        sleep(Duration::from_millis(10)).await;
    }

    let (last, superseded) = handles.split_last().unwrap();
    assert!(superseded.iter().all(TaskHandle::is_cancelled));
    assert!(!last.is_cancelled());

    supervisor.shutdown(Duration::from_secs(10)).await;
    for handle in &handles {
        assert_eq!(handle.wait().await, TaskState::Cancelled);
    }
}

#[tokio::test]
async fn spawn_failure_does_not_stop_the_supervisor() {
    let pipe = ProcessPipe::new(
        StageCommand::new("/nonexistent/piper"),
        sh("cat > /dev/null"),
    );
    let mut supervisor = TaskSupervisor::new(pipe, CancellationToken::new());

    let first = supervisor.supersede(text("你好"));
    assert!(matches!(
        first.wait().await,
        TaskState::Failed(TaskError::Spawn { .. })
    ));

    let second = supervisor.supersede(text("再见"));
    assert!(matches!(second.wait().await, TaskState::Failed(_)));
    // The first task may already have been drained by the second supersede
    assert!(supervisor.shutdown(Duration::from_secs(1)).await >= 1);
}

#[tokio::test]
async fn cancel_current_is_idempotent() {
    let mut supervisor = TaskSupervisor::new(long_pipe(), CancellationToken::new());
    assert!(!supervisor.cancel_current());

    let handle = supervisor.supersede(text("你好"));
    assert!(supervisor.cancel_current());
    assert!(!supervisor.cancel_current());
    handle.cancel();
    assert!(handle.is_cancelled());

    assert_eq!(
        timeout(Duration::from_secs(5), handle.wait()).await.unwrap(),
        TaskState::Cancelled
    );
    supervisor.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn root_cancellation_reaches_running_task() {
    let root = CancellationToken::new();
    let mut supervisor = TaskSupervisor::new(long_pipe(), root.clone());

    let handle = supervisor.supersede(text("你好"));
    wait_until_running(&handle).await;
    root.cancel();

    assert_eq!(
        timeout(Duration::from_secs(5), handle.wait()).await.unwrap(),
        TaskState::Cancelled
    );
    assert_eq!(supervisor.active_tasks(), 1);
    assert_eq!(supervisor.shutdown(Duration::from_secs(1)).await, 1);
}
