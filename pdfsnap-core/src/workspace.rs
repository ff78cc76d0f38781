//! Filesystem setup and generated files

use crate::config::Settings;
use crate::error::{Result, SnapshotError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Remove a directory if it exists, then create it empty
pub fn recreate_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| {
            SnapshotError::Workspace(format!("cannot remove {}: {e}", path.display()))
        })?;
    }
    fs::create_dir_all(path)
        .map_err(|e| SnapshotError::Workspace(format!("cannot create {}: {e}", path.display())))
}

/// Recursively copy `src` into `dst`, creating `dst` when missing
pub fn copy_dir<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<u64> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Reset the generated folders and publish the projects to the viewer
pub fn prepare(settings: &Settings) -> Result<()> {
    if !settings.projects_dir.is_dir() {
        return Err(SnapshotError::Workspace(format!(
            "projects folder {} not found",
            settings.projects_dir.display()
        )));
    }

    recreate_dir(&settings.server_projects_dir)?;
    recreate_dir(&settings.output_dir)?;

    let copied = copy_dir(&settings.projects_dir, &settings.server_projects_dir).map_err(|e| {
        SnapshotError::Workspace(format!(
            "cannot copy {} to {}: {e}",
            settings.projects_dir.display(),
            settings.server_projects_dir.display()
        ))
    })?;

    info!(
        "Copied {} files from {} to {}",
        copied,
        settings.projects_dir.display(),
        settings.server_projects_dir.display()
    );
    Ok(())
}

/// Write a generated snapshot config and return its path
pub fn write_snapshot_config(dir: &Path, file_name: &str, yaml: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, yaml)?;
    debug!("Wrote snapshot config {}", path.display());
    Ok(path)
}

/// Names of the PDF files directly inside `dir`, sorted
pub fn list_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}
