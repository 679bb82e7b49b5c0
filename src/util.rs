// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! File system helpers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Atomically write a file.
///
/// The contents go to a temporary file in the target's directory which then
/// replaces the target, so readers see either the old or the new file and
/// never a partial one. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the temporary file
/// cannot be written or renamed.
pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp_file = tempfile::Builder::new().tempfile_in(dir)?;
    tmp_file.as_file_mut().write_all(contents)?;
    tmp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
