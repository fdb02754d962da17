use std::fs;
use std::path::Path;

use regex::bytes::Regex;
use tracing::warn;

use crate::error::ScanError;

/// A policy pattern that compiled successfully.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern text exactly as it appeared in the pattern file.
    pub source: String,
    pub regex: Regex,
}

/// Split pattern-file text into patterns.
///
/// One pattern per line. A trailing `\r` is dropped so files edited on
/// Windows behave the same. Blank lines are skipped: an empty regex matches
/// at every position and would fail every run.
pub fn parse_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the pattern file. Called once per job so edits apply without a restart.
pub fn load_patterns(path: &Path) -> Result<Vec<String>, ScanError> {
    let text = fs::read_to_string(path).map_err(|source| ScanError::PatternFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_patterns(&text))
}

/// Compile every pattern, logging and skipping the ones that do not parse.
///
/// Duplicates are kept; each copy counts its matches separately.
pub fn compile_patterns(patterns: &[String]) -> Vec<CompiledPattern> {
    patterns
        .iter()
        .filter_map(|source| match Regex::new(source) {
            Ok(regex) => Some(CompiledPattern {
                source: source.clone(),
                regex,
            }),
            Err(err) => {
                warn!(pattern = %source, error = %err, "error compiling regex pattern, skipping");
                None
            }
        })
        .collect()
}
