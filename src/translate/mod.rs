// Batch translation protocol
//
// Lines are translated in two tiers:
// - Structured: the whole batch as one JSON request, validated and retried
// - Fallback: one oracle call per non-empty line when structured mode fails

pub mod prompts;
pub mod response;

use tracing::{debug, info, warn};

pub use prompts::*;
pub use response::*;
use crate::config::TranslateConfig;
use crate::error::{Result, SubtransError};
use crate::oracle::Oracle;

/// Structured requests made for one batch before falling back to per-line mode
pub const STRUCTURED_ATTEMPTS: usize = 3;

/// Translates flattened subtitle lines through an [`Oracle`]
pub struct BatchTranslator {
    oracle: Box<dyn Oracle>,
    prompts: PromptBuilder,
}

impl BatchTranslator {
    pub fn new(oracle: Box<dyn Oracle>, config: &TranslateConfig) -> Self {
        Self {
            oracle,
            prompts: PromptBuilder::new(config),
        }
    }

    pub fn oracle(&self) -> &dyn Oracle {
        self.oracle.as_ref()
    }

    /// Translate `lines`, returning exactly one output per input in the same order.
    /// Empty input lines always map to empty output lines.
    pub async fn translate(&self, lines: &[String]) -> Result<Vec<String>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(translated) = self.translate_structured(lines).await? {
            return Ok(translated);
        }

        warn!(
            "Structured translation failed {} times, translating {} lines one by one",
            STRUCTURED_ATTEMPTS,
            lines.len()
        );
        self.translate_per_line(lines).await
    }

    /// `None` when no attempt produced a contract-valid response
    async fn translate_structured(&self, lines: &[String]) -> Result<Option<Vec<String>>> {
        let prompt = self.prompts.structured(lines)?;

        for attempt in 1..=STRUCTURED_ATTEMPTS {
            match self.structured_attempt(&prompt, lines).await {
                Ok(translated) => {
                    debug!("Structured attempt {} accepted", attempt);
                    return Ok(Some(translated));
                }
                Err(e) => {
                    warn!(
                        "Structured attempt {}/{} rejected: {}",
                        attempt, STRUCTURED_ATTEMPTS, e
                    );
                }
            }
        }

        Ok(None)
    }

    async fn structured_attempt(&self, prompt: &str, lines: &[String]) -> Result<Vec<String>> {
        let raw = self.oracle.complete(prompt).await?;
        let value = parse_json_response(&raw)?;
        let mut translated = extract_translations(value, lines.len())?;

        for (source, target) in lines.iter().zip(translated.iter_mut()) {
            if source.is_empty() && !target.is_empty() {
                debug!("Discarding text returned for an empty line: {}", target);
                target.clear();
            }
        }

        Ok(translated)
    }

    async fn translate_per_line(&self, lines: &[String]) -> Result<Vec<String>> {
        let mut translated = Vec::with_capacity(lines.len());

        for (idx, line) in lines.iter().enumerate() {
            if line.is_empty() {
                translated.push(String::new());
                continue;
            }

            info!("Fallback line {}/{}", idx + 1, lines.len());
            let response = self.oracle.complete(&self.prompts.single_line(line)).await?;
            translated.push(response.trim().to_string());
        }

        if translated.len() != lines.len() {
            return Err(SubtransError::LengthMismatch {
                expected: lines.len(),
                actual: translated.len(),
            });
        }

        Ok(translated)
    }
}
