use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const PAGE_EXTENSION: &str = "png";

/// Page images to process.
///
/// A directory yields the `.png` files directly inside it, sorted by path.
/// A file path is returned as the only page.
pub fn load_input(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("The folder {} doesn't exist.", path.display());
    }

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(path).with_context(|| format!("Failed to list {}", path.display()))? {
        let entry_path = entry?.path();
        let is_png = entry_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PAGE_EXTENSION));
        if entry_path.is_file() && is_png {
            pages.push(entry_path);
        }
    }
    pages.sort();
    Ok(pages)
}

/// File stem used to name a page's outputs
pub fn page_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}
