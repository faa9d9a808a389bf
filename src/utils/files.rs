use crate::error::{AppError, Result};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Container extensions accepted as extraction input
pub const MEDIA_EXTENSIONS: [&str; 14] = [
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "mpg", "mpeg", "m4v", "3gp", "ts", "mts",
    "m2ts",
];

/// Check if a file is a supported media container
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// Resolve files and directories into a sorted, deduplicated list of media files
pub fn find_media_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            if is_media_file(path) {
                found.insert(path.to_path_buf());
            } else {
                debug!("Skipping non-media file {}", path.display());
            }
        } else if path.is_dir() {
            let walker = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| !is_hidden(e));
            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && is_media_file(entry.path()) => {
                        found.insert(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Error while scanning {}: {}", path.display(), e),
                }
            }
        } else {
            warn!("Path does not exist: {}", path.display());
        }
    }

    found.into_iter().collect()
}

/// Replace characters that are not allowed in file names
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitized file stem of a path
pub fn file_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    sanitize_filename(&stem)
}

/// Per-file output directory: `<output>/<stem>` when organizing, else `<output>`
pub fn output_dir_for(input: &Path, output_dir: &Path, organize_by_filename: bool) -> PathBuf {
    if organize_by_filename {
        output_dir.join(file_stem(input))
    } else {
        output_dir.to_path_buf()
    }
}

/// Output directory for each input, in input order.
///
/// Output names derive from the file stem, so inputs sharing a stem would
/// overwrite each other. Every repeat goes to `<output>/<stem>_<n>` with
/// the smallest free `n` from 2.
pub fn unique_output_dirs(inputs: &[PathBuf], output_dir: &Path, organize_by_filename: bool) -> Vec<PathBuf> {
    let mut claimed: HashSet<(PathBuf, String)> = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = file_stem(input);
            let mut dir = output_dir_for(input, output_dir, organize_by_filename);
            let mut n = 2;
            while claimed.contains(&(dir.clone(), stem.clone())) {
                dir = output_dir.join(format!("{}_{}", stem, n));
                n += 1;
            }
            if n > 2 {
                warn!(
                    "{} shares its name with another input, writing to {}",
                    input.display(),
                    dir.display()
                );
            }
            claimed.insert((dir.clone(), stem));
            dir
        })
        .collect()
}

/// Create a directory and its parents
pub fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| AppError::file_access(path, e))
}
