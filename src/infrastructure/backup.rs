// src/infrastructure/backup.rs
//
// Timestamped document backups
//
// RULES:
// - Backups live in `<data_dir>/backups/`
// - Name: `<file>.bak-<yyyyMMddTHHmmss>`, `-N` appended on collision
// - An existing backup is never overwritten or pruned

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::{AppError, AppResult};

pub const BACKUP_DIR: &str = "backups";

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Base backup name for a document file at a given instant
pub fn backup_name(file_name: &str, at: DateTime<Local>) -> String {
    format!("{}.bak-{}", file_name, at.format(STAMP_FORMAT))
}

/// Copy `document` into `backup_dir` under a fresh timestamped name.
pub fn create_backup(document: &Path, backup_dir: &Path) -> AppResult<PathBuf> {
    let file_name = file_name_of(document)?;
    fs::create_dir_all(backup_dir)?;

    let base = backup_name(&file_name, Local::now());
    let mut target = backup_dir.join(&base);
    let mut seq = 1u32;
    while target.exists() {
        target = backup_dir.join(format!("{}-{}", base, seq));
        seq += 1;
    }

    fs::copy(document, &target)?;
    log::debug!("Backed up {} to {}", document.display(), target.display());

    Ok(target)
}

/// All backups of `file_name`, oldest first
pub fn list_backups(file_name: &str, backup_dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}.bak-", file_name);
    let mut found: Vec<((NaiveDateTime, u32), PathBuf)> = Vec::new();

    for entry in fs::read_dir(backup_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(key) = name.strip_prefix(&prefix).and_then(parse_suffix) {
            found.push((key, path));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// `20261018T101500` or `20261018T101500-3`
fn parse_suffix(suffix: &str) -> Option<(NaiveDateTime, u32)> {
    let (stamp, seq) = match suffix.split_once('-') {
        Some((stamp, seq)) => (stamp, seq.parse().ok()?),
        None => (suffix, 0),
    };
    let at = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
    Some((at, seq))
}

pub(crate) fn file_name_of(document: &Path) -> AppResult<String> {
    document
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::Config(format!("Not a document path: {}", document.display())))
}
