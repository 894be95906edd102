//! ZIP packaging of the working directory.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

/// Pack every regular file directly inside `dir` into a ZIP at `archive`.
///
/// Entries keep their file names, are Deflate-compressed and are added in
/// name order. Subdirectories are skipped. Returns the number of entries.
///
/// # Errors
///
/// Returns `Packaging` if the directory cannot be listed, a file cannot be
/// read or the archive cannot be written.
pub fn zip_dir(dir: &Path, archive: &Path) -> Result<usize> {
    let packaging = |e: io::Error| Error::packaging(archive, e.into());

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(packaging)? {
        let entry = entry.map_err(packaging)?;
        if !entry.file_type().map_err(packaging)?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push((name, entry.path())),
            Err(name) => tracing::warn!(?name, "skipping non UTF-8 file name"),
        }
    }
    files.sort();

    let out = File::create(archive).map_err(packaging)?;
    let mut zip = ZipWriter::new(BufWriter::new(out));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, path) in &files {
        zip.start_file(name.as_str(), options)
            .map_err(|e| Error::packaging(archive, e))?;
        let mut input = File::open(path).map_err(packaging)?;
        io::copy(&mut input, &mut zip).map_err(packaging)?;
    }

    zip.finish().map_err(|e| Error::packaging(archive, e))?;

    tracing::info!(
        archive = %archive.display(),
        entries = files.len(),
        "packaged working directory"
    );
    Ok(files.len())
}
