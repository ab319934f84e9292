use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{info, warn};

/// Configuration for subprocess output redirection.
///
/// Output is always captured and re-emitted; these knobs only shape how.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    /// Max line length before truncation.
    pub max_line_length: usize,
    /// Log stdout at INFO level (false = WARN is still used for stderr).
    pub stdout_info: bool,
    /// Log stderr at WARN level (false = INFO).
    pub stderr_warn: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stdout_info: true,
            stderr_warn: true,
        }
    }
}

/// Re-emit every line of a child stream through tracing.
///
/// Runs until EOF, which arrives once the child exits and the pipe
/// drains; the caller joins the pump after reaping the process.
pub(crate) async fn pump_lines<R>(process: String, stream: R, warn_level: bool, cfg: LogConfig)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = truncate(&line, cfg.max_line_length);
                if warn_level {
                    warn!(process = %process, "{line}");
                } else {
                    info!(process = %process, "{line}");
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(process = %process, "output stream error: {e}");
                break;
            }
        }
    }
}

/// Cut a line at `max` bytes without splitting a UTF-8 character.
fn truncate(line: &str, max: usize) -> &str {
    if line.len() <= max {
        return line;
    }
    let mut end = max;
    while end > 0 && !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}
