//! Working directory and asset files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name of a card's logo file.
#[must_use]
pub fn icon_file_name(seq: u32) -> String {
    format!("card_{seq}_icon.png")
}

/// Name of a card image file, keyed by the image's row id.
///
/// Path separators in the id are replaced so the file stays inside the
/// working directory.
#[must_use]
pub fn asset_file_name(seq: u32, asset_id: &str) -> String {
    let asset_id = asset_id.replace(['/', '\\'], "_");
    format!("card_{seq}_{asset_id}.png")
}

/// Create the working directory if needed.
///
/// Existing files are kept; a rerun overwrites the names it produces.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn prepare_work_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Write `content` to `dir/name` and return the full path.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_asset(dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote asset");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(icon_file_name(3), "card_3_icon.png");
        assert_eq!(asset_file_name(3, "front"), "card_3_front.png");
        assert_eq!(asset_file_name(3, "../back"), "card_3_.._back.png");
    }

    #[test]
    fn test_write_asset() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("stocatima");
        prepare_work_dir(&dir).unwrap();
        prepare_work_dir(&dir).unwrap();

        let path = write_asset(&dir, &icon_file_name(1), b"\x89PNG").unwrap();

        assert_eq!(path, dir.join("card_1_icon.png"));
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG");
    }
}
