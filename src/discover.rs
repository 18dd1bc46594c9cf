use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extensions the instruments are known to produce.
const SPEC_EXTENSIONS: [&str; 3] = ["txt", "b", "transmission"];

/// List the instrument files in a directory (non-recursive), sorted by
/// file name so batch row order is deterministic across platforms.
pub fn spec_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading input directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|ext| SPEC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_up_known_extensions_in_name_order() {
        let dir = std::env::temp_dir().join(format!("specparse-discover-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b.txt", "a.transmission", "c.b", "notes.csv", "README"] {
            std::fs::write(dir.join(name), "400.0 1.0\n").unwrap();
        }

        let files = spec_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.transmission", "b.txt", "c.b"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(spec_files(Path::new("/definitely/not/here")).is_err());
    }
}
