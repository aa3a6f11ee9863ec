use serde::Serialize;

use crate::config::TranslateConfig;
use crate::error::Result;

/// One line of a structured request; `id` is its position in the flattened batch
#[derive(Debug, Clone, Serialize)]
pub struct TranslationEntry<'a> {
    pub id: usize,
    pub text: &'a str,
}

/// Builds the instructions sent to the oracle for both translation modes
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    source_language: String,
    target_language: String,
}

impl PromptBuilder {
    pub fn new(config: &TranslateConfig) -> Self {
        Self {
            source_language: language_code_to_name(&config.source_language),
            target_language: language_code_to_name(&config.target_language),
        }
    }

    /// Whole-batch request embedding every line as a JSON `{id, text}` entry
    pub fn structured(&self, lines: &[String]) -> Result<String> {
        let entries: Vec<TranslationEntry> = lines
            .iter()
            .enumerate()
            .map(|(id, text)| TranslationEntry { id, text })
            .collect();
        let payload = serde_json::to_string(&entries)?;

        Ok(format!(
            "Translate the field \"text\" of the following subtitle entries from {} to {}.\n\
             Return ONLY a JSON array of objects with fields \"id\" and \"text\".\n\
             Keep exactly {} entries, in the same order, with the same ids.\n\
             If an entry's text is empty, return an empty string in \"text\".\n\
             Entries:\n\
             {}\n",
            self.source_language,
            self.target_language,
            lines.len(),
            payload
        ))
    }

    /// Single-line request used by the fallback path
    pub fn single_line(&self, line: &str) -> String {
        format!(
            "Translate the following subtitle line from {} to {}.\n\
             Return ONLY the translated line with no extra text.\n\
             Line:\n\
             {}\n",
            self.source_language, self.target_language, line
        )
    }
}

/// Convert language code to full language name for clearer prompts
pub fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "English".to_string(),
        "ru" => "Russian".to_string(),
        "uk" => "Ukrainian".to_string(),
        "be" => "Belarusian".to_string(),
        "ja" => "Japanese".to_string(),
        "ko" => "Korean".to_string(),
        "zh" => "Chinese".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "es" => "Spanish".to_string(),
        "it" => "Italian".to_string(),
        "pt" => "Portuguese".to_string(),
        "pl" => "Polish".to_string(),
        "nl" => "Dutch".to_string(),
        "tr" => "Turkish".to_string(),
        "ar" => "Arabic".to_string(),
        "he" => "Hebrew".to_string(),
        "hi" => "Hindi".to_string(),
        "th" => "Thai".to_string(),
        "vi" => "Vietnamese".to_string(),
        "sv" => "Swedish".to_string(),
        "da" => "Danish".to_string(),
        "no" => "Norwegian".to_string(),
        "fi" => "Finnish".to_string(),
        "cs" => "Czech".to_string(),
        "sk" => "Slovak".to_string(),
        "hu" => "Hungarian".to_string(),
        "bg" => "Bulgarian".to_string(),
        "sr" => "Serbian".to_string(),
        "hr" => "Croatian".to_string(),
        "kk" => "Kazakh".to_string(),
        _ => code.to_string(),
    }
}
