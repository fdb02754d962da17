//! Policy scan over an extracted configuration tree.
//!
//! Every regular file under the root is read in full and every pattern is
//! counted against its bytes. Matching runs on raw bytes, so files that are
//! not valid UTF-8 are still scanned.
//!
//! The result depends only on the tree contents and the pattern list:
//! the walk is sorted by file name and totals are keyed by pattern text in
//! a `BTreeMap`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::rules::patterns::compile_patterns;

/// Pattern text → total non-overlapping matches across the tree.
///
/// Only patterns with at least one match appear.
pub type MatchCounts = BTreeMap<String, u64>;

/// Count pattern matches in every regular file under `root`.
///
/// A missing `root` yields an empty result. Directories are descended,
/// symlinks are neither followed nor read. Blocking.
pub fn scan_tree(root: &Path, patterns: &[String]) -> Result<MatchCounts, ScanError> {
    let mut counts = MatchCounts::new();

    if !root.is_dir() {
        info!(root = %root.display(), "configuration directory not found, nothing to scan");
        return Ok(counts);
    }

    let compiled = compile_patterns(patterns);
    if compiled.is_empty() {
        return Ok(counts);
    }

    let mut files_scanned = 0u64;
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let content = fs::read(entry.path()).map_err(|source| ScanError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;
        files_scanned += 1;

        for pattern in &compiled {
            let found = pattern.regex.find_iter(&content).count() as u64;
            if found > 0 {
                debug!(
                    pattern = %pattern.source,
                    file = %entry.path().display(),
                    matches = found,
                    "pattern matched"
                );
                *counts.entry(pattern.source.clone()).or_insert(0) += found;
            }
        }
    }

    debug!(files_scanned, patterns = compiled.len(), "scan complete");
    Ok(counts)
}
