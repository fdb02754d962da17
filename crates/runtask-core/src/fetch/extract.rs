//! Gzip/tar extraction into a run workspace.
//!
//! Only directories and regular files are materialised. Any other entry
//! type (links, devices, FIFOs, ...) fails the whole extraction, as does an
//! entry whose stored name would land outside the destination or on top of
//! the workspace's own bundle and graph files.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error::FetchError;
use crate::workspace::{ARCHIVE_FILE_NAME, GRAPH_FILE_NAME};

/// What an extraction wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub directories: u64,
    pub files: u64,
    pub bytes: u64,
}

/// Extract the gzip-compressed tar at `archive` into `dest`.
///
/// Entries are processed in archive order. Blocking; call from
/// `spawn_blocking` inside async code.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<ExtractSummary, FetchError> {
    let file = File::open(archive).map_err(|e| FetchError::io(archive, e))?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut summary = ExtractSummary::default();

    for entry in tar.entries().map_err(|e| FetchError::io(archive, e))? {
        let mut entry = entry.map_err(|e| FetchError::io(archive, e))?;
        let stored = entry
            .path()
            .map_err(|e| FetchError::io(archive, e))?
            .into_owned();
        let name = stored.to_string_lossy().into_owned();

        let target =
            join_within(dest, &stored).ok_or(FetchError::UnsafeEntryPath { path: name.clone() })?;
        if [ARCHIVE_FILE_NAME, GRAPH_FILE_NAME]
            .iter()
            .any(|reserved| target == dest.join(reserved))
        {
            return Err(FetchError::ReservedEntryPath { path: name });
        }

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target).map_err(|e| FetchError::io(&target, e))?;
                summary.directories += 1;
            }
            EntryType::Regular => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
                }
                let mut out = File::create(&target).map_err(|e| FetchError::io(&target, e))?;
                let written =
                    io::copy(&mut entry, &mut out).map_err(|e| FetchError::io(&target, e))?;
                summary.files += 1;
                summary.bytes += written;
            }
            other => {
                return Err(FetchError::UnsupportedEntry {
                    path: name,
                    kind: format!("{other:?}"),
                });
            }
        }
    }

    Ok(summary)
}

/// Join `entry` onto `root`, refusing anything that could leave `root`.
///
/// Absolute paths, `..` segments and platform prefixes are rejected rather
/// than normalised away; `.` segments are dropped.
pub fn join_within(root: &Path, entry: &Path) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
