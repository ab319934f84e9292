use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::warn;

/// Stop a child: SIGTERM, bounded wait, then SIGKILL.
///
/// On non-Unix platforms there is no polite signal and the child is
/// killed directly.
pub(crate) async fn terminate_child(
    child: &mut Child,
    grace: Duration,
) -> std::io::Result<ExitStatus> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child may already be gone; a failed kill(2) is not an error.
        unsafe {
            let _ = libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(status) => return status,
            Err(_) => warn!(pid, "subprocess ignored SIGTERM within grace; killing"),
        }
    }

    #[cfg(not(unix))]
    let _ = grace;

    child.kill().await?;
    child.wait().await
}
