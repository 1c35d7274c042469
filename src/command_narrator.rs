use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use game_core::{NarrativeService, NarratorError};

/// Hands each prompt to an external program on stdin and takes whatever it
/// prints as the reply. Any local text generator with a command line works.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
}

impl CommandNarrator {
    /// `command_line` is split on whitespace. No shell quoting is understood.
    pub fn from_command_line(command_line: &str) -> anyhow::Result<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| anyhow::anyhow!("narrator command is empty"))?;
        Ok(CommandNarrator {
            program,
            args: words.collect(),
        })
    }
}

impl NarrativeService for CommandNarrator {
    fn generate(&self, prompt: &str) -> Result<String, NarratorError> {
        log::debug!("Asking {} for [{}]", self.program, prompt);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // Programs that never read their input are allowed.
            if let Err(err) = stdin.write_all(prompt.as_bytes()) {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }
        let output = child.wait_with_output()?;
        if !output.stderr.is_empty() {
            log::debug!(
                "{} said on stderr: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        if !output.status.success() {
            return Err(NarratorError::Unavailable(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
