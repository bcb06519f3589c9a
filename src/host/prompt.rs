//! Prompt requester implementations.

use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::host::PromptRequester;

/// Counts prompt requests without showing anything.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    requests: AtomicUsize,
}

impl RecordingPrompt {
    /// Create a requester with no recorded requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prompts requested so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PromptRequester for RecordingPrompt {
    fn request_prompt(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Announces the prompt request on stderr.
///
/// Used by the CLI when no prompt command is configured. Stdout is left to
/// the command output, so `--json` stays parseable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrPrompt;

/// Line printed by `StderrPrompt`.
pub const PROMPT_REQUESTED_LINE: &str = "rategate: review prompt requested";

impl PromptRequester for StderrPrompt {
    fn request_prompt(&self) {
        eprintln!("{}", PROMPT_REQUESTED_LINE);
    }
}

/// Runs a shell command to show the prompt.
///
/// The command is spawned and reaped on a background thread; the caller
/// never waits for it. Spawn failures are logged, not returned.
#[derive(Debug, Clone)]
pub struct CommandPrompt {
    command: String,
}

impl CommandPrompt {
    /// Run `command` through the platform shell on each request.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The configured command line.
    pub fn command(&self) -> &str {
        &self.command
    }

    #[cfg(unix)]
    fn shell_command(&self) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command);
        cmd
    }

    #[cfg(not(unix))]
    fn shell_command(&self) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(&self.command);
        cmd
    }
}

impl PromptRequester for CommandPrompt {
    fn request_prompt(&self) {
        let spawned = self
            .shell_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                let command = self.command.clone();
                thread::spawn(move || match child.wait() {
                    Ok(status) if !status.success() => {
                        tracing::warn!(command = %command, %status, "prompt command failed");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(command = %command, error = %e, "prompt command wait failed");
                    }
                });
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "failed to spawn prompt command");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_prompt_counts() {
        let prompt = RecordingPrompt::new();
        assert_eq!(prompt.requests(), 0);

        prompt.request_prompt();
        prompt.request_prompt();
        assert_eq!(prompt.requests(), 2);
    }

    #[test]
    fn test_command_prompt_keeps_command() {
        let prompt = CommandPrompt::new("open macappstore://review");
        assert_eq!(prompt.command(), "open macappstore://review");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_prompt_runs_command() {
        use std::time::{Duration, Instant};
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("prompted");
        let prompt = CommandPrompt::new(format!("touch '{}'", marker.display()));

        prompt.request_prompt();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !marker.exists() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_command_prompt_missing_binary_does_not_panic() {
        let prompt = CommandPrompt::new("definitely-not-a-real-binary-rategate");
        prompt.request_prompt();
    }
}
