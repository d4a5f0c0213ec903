//! Filesystem-based asset source for loading piece and turn-flag SVGs.

use gpui::{AssetSource, SharedString};
use log::debug;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Filesystem-based asset source that looks for assets next to the executable,
/// then relative to the working directory
pub struct FileAssets {
    roots: Vec<PathBuf>,
}

impl FileAssets {
    pub fn new() -> Self {
        let mut roots = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        {
            roots.push(dir);
        }
        if let Ok(dir) = std::env::current_dir() {
            roots.push(dir);
        }
        roots.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        Self { roots }
    }
}

impl Default for FileAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for FileAssets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        for root in &self.roots {
            if let Ok(data) = fs::read(root.join(path)) {
                return Ok(Some(Cow::Owned(data)));
            }
        }
        debug!("asset not found: {path}");
        Ok(None)
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        let mut results = Vec::new();
        for root in &self.roots {
            if let Ok(entries) = fs::read_dir(root.join(path)) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        results.push(SharedString::from(name.to_string()));
                    }
                }
                break;
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::find_pieceset;

    #[test]
    fn test_default_pieceset_is_bundled() {
        let assets = FileAssets::new();
        let set = find_pieceset("cburnett", "Chessboard").unwrap();
        for (code, path) in set.images() {
            let data = assets.load(&path).unwrap();
            assert!(data.is_some_and(|d| d.starts_with(b"<svg")), "{code} missing");
        }
        assert_eq!(assets.list("assets/pieces/cburnett").unwrap().len(), 14);
        assert_eq!(assets.load("assets/pieces/none.svg").unwrap(), None);
    }
}
