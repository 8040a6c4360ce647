//! Corpus assembly: per-command raw text into one scan target.

use super::types::CommandOutputs;

/// The ordered concatenation of all available raw command output for one
/// device, split into non-empty lines.
///
/// Line order is stable and matches command execution order. Extraction
/// rules scan it read-only and must not assume any particular line
/// position beyond "first matching line wins".
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Join all present text blocks in execution order. Absent or empty
    /// blocks contribute nothing; blank lines are dropped; trailing
    /// carriage returns are stripped (device output is usually CRLF).
    pub fn assemble(outputs: &CommandOutputs) -> Self {
        let mut lines = Vec::new();
        for (_, text) in outputs.blocks() {
            let Some(text) = text else {
                continue;
            };
            for line in text.lines() {
                let line = line.trim_end_matches('\r');
                if line.trim().is_empty() {
                    continue;
                }
                lines.push(line.to_string());
            }
        }
        Self { lines }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
