//! Resolve the SOURCE argument into statement files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A file is taken as-is, a directory is searched with `pattern`, and
/// anything else is treated as a glob pattern itself.
pub fn discover(source: &str, pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(source);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = if path.is_dir() {
        path.join(pattern).to_string_lossy().into_owned()
    } else {
        source.to_string()
    };

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("invalid pattern {pattern}"))? {
        match entry {
            Ok(p) if p.is_file() => files.push(p),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable path: {e}"),
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_directory_is_searched_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("2023/01")).unwrap();
        fs::write(dir.path().join("a.pdf"), b"").unwrap();
        fs::write(dir.path().join("2023/01/b.pdf"), b"").unwrap();
        fs::write(dir.path().join("2023/notes.txt"), b"").unwrap();

        let files = discover(dir.path().to_str().unwrap(), "**/*.pdf").unwrap();
        let mut names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_single_file_and_glob() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stmt.pdf");
        fs::write(&file, b"").unwrap();

        assert_eq!(discover(file.to_str().unwrap(), "**/*.pdf").unwrap(), vec![file.clone()]);

        let glob_source = format!("{}/*.pdf", dir.path().display());
        assert_eq!(discover(&glob_source, "ignored").unwrap(), vec![file]);
    }

    #[test]
    fn test_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        let glob_source = format!("{}/*.pdf", dir.path().display());
        assert!(discover(&glob_source, "**/*.pdf").unwrap().is_empty());
    }
}
