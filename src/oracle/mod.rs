// Translation oracle abstraction
//
// The oracle is an opaque text-in/text-out capability. The translator never
// assumes anything about the shape of the response; it validates instead.
// - Codex: agent CLI invoked as a subprocess
// - Commands: process invocation builders

pub mod codex;
pub mod commands;

use async_trait::async_trait;

pub use commands::*;
use crate::config::OracleConfig;
use crate::error::Result;

/// A single request/response text generation capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send one prompt and return the raw response text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Verify the oracle can be reached, returning its version string
    async fn check_availability(&self) -> Result<String>;
}

/// Factory for creating oracle instances
pub struct OracleFactory;

impl OracleFactory {
    /// Create the default oracle implementation (agent CLI subprocess)
    pub fn create_oracle(config: OracleConfig) -> Box<dyn Oracle> {
        Box::new(codex::CodexOracle::new(config))
    }
}
