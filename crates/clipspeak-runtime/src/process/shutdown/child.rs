//! Stops one pipeline stage: SIGTERM, a grace period, then SIGKILL.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use tokio::time::timeout;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Stop `child` and reap it.
///
/// On unix the child gets SIGTERM and `grace` to exit before it is killed.
/// Elsewhere it is killed at once. A child that already exited is only
/// reaped, so calling this twice returns the same status.
///
/// The child is borrowed so both stages of a pipe can be stopped
/// concurrently by their owner.
pub async fn shutdown_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }

    #[cfg(unix)]
    {
        shutdown_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        shutdown_windows(child).await
    }
}

#[cfg(unix)]
async fn shutdown_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    // No PID means tokio already reaped it
    let Some(pid) = child.id() else {
        return child.wait().await;
    };
    let pid = i32::try_from(pid).map_err(io::Error::other)?;

    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        // Exited between try_wait and kill
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    tracing::debug!(pid, ?grace, "Stage ignored SIGTERM, sending SIGKILL");
    // Child::kill sends SIGKILL and reaps
    child.kill().await?;
    child.wait().await
}

#[cfg(not(unix))]
async fn shutdown_windows(child: &mut Child) -> io::Result<ExitStatus> {
    child.kill().await?;
    child.wait().await
}
