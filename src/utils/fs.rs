//! Filesystem helpers for deployment folders.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Git metadata never travels from the site output into a deployment folder.
const SKIPPED_NAMES: &[&str] = &[".git"];

/// Remove every entry of `dir`, hidden ones included, creating `dir` if missing.
pub fn empty_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        return Ok(());
    }

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        // symlinks are removed as files, never followed
        let result = if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Whether `dir` has no entries at all (hidden ones count).
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Copy the contents of `src` into `dst`, hidden files included.
///
/// Existing files in `dst` are overwritten. Returns the number of files copied.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| {
            !e.file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_NAMES.contains(&name))
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            let copy = fs::copy(entry.path(), &target);
            copy.with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }
    Ok(copied)
}
