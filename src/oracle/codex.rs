use async_trait::async_trait;
use tracing::debug;

use crate::config::OracleConfig;
use crate::error::{Result, SubtransError};
use super::{Oracle, commands::OracleCommandBuilder};

/// Agent CLI driven through `exec`, one process per prompt
pub struct CodexOracle {
    builder: OracleCommandBuilder,
}

impl CodexOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            builder: OracleCommandBuilder::new(config.binary_path, config.model),
        }
    }
}

#[async_trait]
impl Oracle for CodexOracle {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // The agent's stdout is a transcript; only the last message is the answer
        let output_file = tempfile::NamedTempFile::new()
            .map_err(|e| SubtransError::Oracle(format!("Failed to create temp file: {}", e)))?;

        self.builder
            .exec(output_file.path())
            .execute_with_input(prompt)
            .await?;

        let response = tokio::fs::read_to_string(output_file.path())
            .await
            .map_err(|e| SubtransError::Oracle(format!("Failed to read oracle response: {}", e)))?;

        debug!("Oracle response: {} bytes", response.len());
        Ok(response.trim().to_string())
    }

    async fn check_availability(&self) -> Result<String> {
        self.builder.version_check().output().await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    // Echoes stdin into the --output-last-message file
    const FAKE_AGENT: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output-last-message" ]; then out="$2"; shift; fi
  shift
done
cat > "$out"
"#;

    const FAILING_AGENT: &str = "#!/bin/sh\ncat > /dev/null\nexit 3\n";

    fn install(dir: &std::path::Path, name: &str, script: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_complete_reads_last_message() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = CodexOracle::new(OracleConfig {
            binary_path: install(dir.path(), "agent", FAKE_AGENT),
            model: Some("test-model".to_string()),
        });

        let response = oracle.complete("  Привет  \n").await.unwrap();
        assert_eq!(response, "Привет");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_oracle_error() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = CodexOracle::new(OracleConfig {
            binary_path: install(dir.path(), "agent", FAILING_AGENT),
            model: None,
        });

        let err = oracle.complete("hello").await.unwrap_err();
        assert!(matches!(err, SubtransError::Oracle(_)));
    }
}
