//! Access to the probe through BlueZ's `gatttool`.
//!
//! `gatttool` is run as a child process with an explicit argument vector.
//! Its stderr is kept alongside stdout, so connection errors printed on
//! stderr show up in the output just like regular values.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::ble::handles::format_handle;
use crate::error::{Error, Result};

/// Number of stdout lines read from a listen session.
///
/// The first line acknowledges the write, the second is the first
/// notification.
const LISTEN_LINES: usize = 2;

/// Operations the probe reader needs from a BLE tool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProbeTool: Send + Sync {
    /// Write `payload` to `handle`, listen for notifications and return
    /// any stderr lines followed by the last of the first two stdout
    /// lines, trimmed.
    async fn listen(&self, device: &str, handle: u16, payload: &str) -> Result<String>;

    /// Read `handle` and return the whole output, trimmed.
    async fn read(&self, device: &str, handle: u16) -> Result<String>;
}

/// [`ProbeTool`] backed by the `gatttool` executable.
#[derive(Debug, Clone)]
pub struct GattTool {
    /// Program to run.
    program: String,
    /// Upper bound for one invocation.
    timeout: Duration,
}

impl GattTool {
    /// Default program name.
    pub const DEFAULT_PROGRAM: &'static str = "gatttool";

    /// Default timeout per invocation (60 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a new GattTool.
    ///
    /// # Arguments
    ///
    /// * `program` - Path or name of the `gatttool` executable
    /// * `timeout` - Upper bound for each invocation
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Get the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the tool and collect its output.
    ///
    /// Stops after `limit` stdout lines. When the limit is reached or the
    /// timeout fires the child is killed and the lines collected so far
    /// are returned.
    async fn run(&self, args: &[String], limit: Option<usize>) -> Result<ToolOutput> {
        debug!("Executing: {} {}", self.program, args.join(" "));

        let mut child = match Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Err(Error::ProbeUnavailable {
                    output: format!("{}: {}", self.program, e),
                })
            }
        };

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "child output was not captured",
                )))
            }
        };

        let mut output = ToolOutput::default();
        let collected = tokio::time::timeout(
            self.timeout,
            collect_lines(stdout, stderr, limit, &mut output),
        )
        .await;

        // Ignore the error when the child already exited.
        let _ = child.kill().await;

        match collected {
            Ok(result) => result?,
            Err(_) => warn!(
                "{} timed out after {:?}, got {} line(s)",
                self.program,
                self.timeout,
                output.lines.len()
            ),
        }

        debug!("Result: {:?}", output.lines);
        Ok(output)
    }
}

impl Default for GattTool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM, Self::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl ProbeTool for GattTool {
    async fn listen(&self, device: &str, handle: u16, payload: &str) -> Result<String> {
        let args = vec![
            "-b".to_string(),
            device.to_string(),
            "--char-write-req".to_string(),
            format!("--handle={}", format_handle(handle)),
            "-n".to_string(),
            payload.to_string(),
            "--listen".to_string(),
        ];
        let output = self.run(&args, Some(LISTEN_LINES)).await?;
        Ok(output.listen_result())
    }

    async fn read(&self, device: &str, handle: u16) -> Result<String> {
        let args = vec![
            "-b".to_string(),
            device.to_string(),
            "--char-read".to_string(),
            format!("--handle={}", format_handle(handle)),
        ];
        let output = self.run(&args, None).await?;
        Ok(output.merged())
    }
}

/// Stream a line of tool output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Tool output lines in arrival order.
#[derive(Debug, Default)]
struct ToolOutput {
    lines: Vec<(Stream, String)>,
}

impl ToolOutput {
    fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.lines_from(Stream::Stdout)
    }

    fn stderr_lines(&self) -> impl Iterator<Item = &str> {
        self.lines_from(Stream::Stderr)
    }

    fn lines_from(&self, stream: Stream) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |(s, _)| *s == stream)
            .map(|(_, line)| line.as_str())
    }

    /// Every line in arrival order, trimmed as a whole.
    fn merged(&self) -> String {
        self.lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Stderr lines, then the last stdout line, trimmed as a whole.
    ///
    /// Only stdout goes through the two-line cut-off; stderr is passed on
    /// untouched and comes out before it.
    fn listen_result(&self) -> String {
        let mut parts: Vec<&str> = self.stderr_lines().collect();
        if let Some(last) = self.stdout_lines().last() {
            parts.push(last);
        }
        parts.join("\n").trim().to_string()
    }
}

/// Read lines from both streams in arrival order into `output`.
///
/// Stops once `limit` stdout lines were collected or both streams reached
/// EOF. Lines are pushed as they arrive, so a caller that cancels this
/// future still sees everything read up to that point.
async fn collect_lines<O, E>(
    stdout: O,
    stderr: E,
    limit: Option<usize>,
    output: &mut ToolOutput,
) -> Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out = BufReader::new(stdout).lines();
    let mut err = BufReader::new(stderr).lines();
    let mut out_open = true;
    let mut err_open = true;
    let mut stdout_count = 0;

    while out_open || err_open {
        if limit.is_some_and(|n| stdout_count >= n) {
            break;
        }

        tokio::select! {
            line = out.next_line(), if out_open => match line? {
                Some(line) => {
                    stdout_count += 1;
                    output.lines.push((Stream::Stdout, line));
                }
                None => out_open = false,
            },
            line = err.next_line(), if err_open => match line? {
                Some(line) => output.lines.push((Stream::Stderr, line)),
                None => err_open = false,
            },
        }
    }

    Ok(())
}
