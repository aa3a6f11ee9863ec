use std::fmt;

use crate::config::DiscoveryConfig;

/// Summary of one directory run
#[derive(Debug, Clone)]
pub struct TranslationReport {
    pub found: usize,
    pub translated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    extension: String,
    output_suffix: String,
}

impl TranslationReport {
    pub fn new(discovery: &DiscoveryConfig) -> Self {
        Self {
            found: 0,
            translated: 0,
            skipped: 0,
            errors: Vec::new(),
            extension: discovery.extension.clone(),
            output_suffix: discovery.output_suffix.clone(),
        }
    }

    /// True when no file failed
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for TranslationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Translation report")?;
        writeln!(f, "Found .{} files: {}", self.extension, self.found)?;
        writeln!(f, "Translated: {}", self.translated)?;
        writeln!(f, "Skipped (existing {}): {}", self.output_suffix, self.skipped)?;
        if self.errors.is_empty() {
            write!(f, "Errors: none")
        } else {
            write!(f, "Errors:")?;
            for error in &self.errors {
                write!(f, "\n- {}", error)?;
            }
            Ok(())
        }
    }
}
