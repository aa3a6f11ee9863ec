use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SubtransError};

/// Abstract oracle process invocation
#[derive(Debug, Clone)]
pub struct OracleCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl OracleCommand {
    /// Create a new oracle command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Select a model, if one is configured
    pub fn model(self, model: Option<&str>) -> Self {
        match model {
            Some(model) => self.arg("-m").arg(model),
            None => self,
        }
    }

    /// Disable colored output
    pub fn no_color(self) -> Self {
        self.arg("--color").arg("never")
    }

    /// Write the agent's final message to a file
    pub fn last_message_to<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("--output-last-message")
            .arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Read the prompt from standard input
    pub fn prompt_from_stdin(self) -> Self {
        self.arg("-")
    }

    /// Run the command with `input` on stdin, discarding its output streams
    pub async fn execute_with_input(&self, input: &str) -> Result<()> {
        debug!("Executing oracle command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let mut child = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SubtransError::Oracle(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| SubtransError::Oracle(format!("Failed to write prompt: {}", e)))?;
            // Dropping stdin closes the pipe so the agent sees EOF
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SubtransError::Oracle(format!("Failed to wait for {}: {}", self.binary_path, e)))?;

        if !status.success() {
            return Err(SubtransError::Oracle(format!(
                "{} failed with {}",
                self.description, status
            )));
        }

        Ok(())
    }

    /// Run the command and capture stdout
    pub async fn output(&self) -> Result<String> {
        debug!("Executing oracle command: {} {:?}", self.binary_path, self.args);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SubtransError::Oracle(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubtransError::Oracle(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Builder for the agent invocations used by translation
pub struct OracleCommandBuilder {
    binary_path: String,
    model: Option<String>,
}

impl OracleCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S, model: Option<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            model,
        }
    }

    /// Build a non-interactive `exec` run that writes its final message to `output_path`
    pub fn exec<P: AsRef<Path>>(&self, output_path: P) -> OracleCommand {
        OracleCommand::new(&self.binary_path, "Oracle exec")
            .arg("exec")
            .model(self.model.as_deref())
            .no_color()
            .last_message_to(output_path)
            .prompt_from_stdin()
    }

    /// Build version check command
    pub fn version_check(&self) -> OracleCommand {
        OracleCommand::new(&self.binary_path, "Version check").arg("--version")
    }
}
