use crate::error::{Result, SubtransError};

/// One subtitle caption unit: index line, time line, caption text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    /// Sequence number exactly as written in the file
    pub index_line: String,
    /// Time range exactly as written; absent for single-line blocks
    pub time_line: Option<String>,
    pub text_lines: Vec<String>,
}

impl SubtitleBlock {
    /// Build a block from a non-empty run of raw lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut lines = lines.into_iter();

        Self {
            index_line: lines.next().unwrap_or_default(),
            time_line: lines.next(),
            text_lines: lines.collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.text_lines.len()
    }

    /// Same index and time lines with replacement caption text
    pub fn with_text(&self, text_lines: Vec<String>) -> Self {
        Self {
            index_line: self.index_line.clone(),
            time_line: self.time_line.clone(),
            text_lines,
        }
    }
}

/// Split raw subtitle text into blocks, using whitespace-only lines as separators
pub fn parse_blocks(content: &str) -> Vec<SubtitleBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(SubtitleBlock::from_lines(std::mem::take(&mut current)));
            }
        } else {
            current.push(line.to_string());
        }
    }

    if !current.is_empty() {
        blocks.push(SubtitleBlock::from_lines(current));
    }

    blocks
}

/// Caption text of every block, in order, as one flat list
pub fn flatten_text(blocks: &[SubtitleBlock]) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| block.text_lines.iter().cloned())
        .collect()
}

/// Partition `translated` back into the blocks, one entry per original text line
pub fn refold(blocks: &[SubtitleBlock], translated: Vec<String>) -> Result<Vec<SubtitleBlock>> {
    let expected: usize = blocks.iter().map(SubtitleBlock::line_count).sum();
    if translated.len() != expected {
        return Err(SubtransError::LengthMismatch {
            expected,
            actual: translated.len(),
        });
    }

    let mut cursor = translated.into_iter();
    Ok(blocks
        .iter()
        .map(|block| block.with_text(cursor.by_ref().take(block.line_count()).collect()))
        .collect())
}

/// Serialize blocks, each followed by one blank separator line
pub fn render_blocks(blocks: &[SubtitleBlock]) -> String {
    let mut content = String::new();

    for block in blocks {
        content.push_str(&block.index_line);
        content.push('\n');
        content.push_str(block.time_line.as_deref().unwrap_or(""));
        content.push('\n');
        for line in &block.text_lines {
            content.push_str(line);
            content.push('\n');
        }
        content.push('\n');
    }

    content
}
