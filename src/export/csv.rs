//! `catima.csv` manifest writer.
//!
//! The manifest is a multi-section CSV: a format version, the group table,
//! the card table and the card-group membership table. Groups are never
//! exported, but Catima refuses the file without their sections.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// File name of the manifest inside the archive.
pub const MANIFEST_NAME: &str = "catima.csv";

/// Header of the card table.
pub const CARD_COLUMNS: &str = "_id,store,note,validfrom,expiry,balance,balancetype,cardid,barcodeid,barcodetype,headercolor,starstatus,lastused,archive";

/// Value written to every card's `lastused` column.
pub const LAST_USED: i64 = 1_750_855_369;

/// Format version followed by the (empty) group table.
const PREAMBLE: &str = "2\n\n_id\n\n";

/// Header of the (empty) card-group membership table.
const GROUP_MEMBERSHIP_HEADER: &str = "cardId,groupId";

/// One card of the manifest.
///
/// Columns not listed here are written with their fixed defaults: empty
/// note, validity, expiry, balance type and barcode id; zero balance, star
/// status and archive flag; [`LAST_USED`] for the last-used timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Sequence number, also the stem of the card's asset files
    pub id: u32,
    /// Store (provider) name
    pub store: String,
    /// Card number
    pub card_id: String,
    /// Barcode format, e.g. `QR_CODE`
    pub barcode_type: String,
    /// Signed ARGB header color
    pub header_color: i32,
}

impl ExportRow {
    /// Render the row as one CSV line, without the newline.
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},,,,0,,{},,{},{},0,{},0",
            self.id,
            csv_escape(&self.store),
            csv_escape(&self.card_id),
            csv_escape(&self.barcode_type),
            self.header_color,
            LAST_USED,
        )
    }
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Streaming writer for the manifest.
///
/// [`CatimaWriter::new`] writes everything up to the card header,
/// [`CatimaWriter::write_row`] appends cards and [`CatimaWriter::finish`]
/// writes the trailing membership section.
pub struct CatimaWriter<W: Write> {
    out: W,
    rows: usize,
}

impl CatimaWriter<BufWriter<File>> {
    /// Create `path` and write the manifest header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CatimaWriter<W> {
    /// Write the preamble and card header to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn new(mut out: W) -> Result<Self> {
        out.write_all(PREAMBLE.as_bytes())?;
        writeln!(out, "{CARD_COLUMNS}")?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one card.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        writeln!(self.out, "{}", row.to_csv_line())?;
        self.rows += 1;
        Ok(())
    }

    /// Number of cards written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write the membership section, flush, and hand back the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn finish(mut self) -> Result<W> {
        write!(self.out, "\n{GROUP_MEMBERSHIP_HEADER}\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> ExportRow {
        ExportRow {
            id: 1,
            store: "Cafe".into(),
            card_id: "1234".into(),
            barcode_type: "QR_CODE".into(),
            header_color: -65536,
        }
    }

    #[test]
    fn test_row_layout() {
        assert_eq!(
            cafe().to_csv_line(),
            "1,Cafe,,,,0,,1234,,QR_CODE,-65536,0,1750855369,0"
        );
    }

    #[test]
    fn test_row_has_fourteen_columns() {
        let header_columns = CARD_COLUMNS.split(',').count();
        assert_eq!(header_columns, 14);
        assert_eq!(cafe().to_csv_line().split(',').count(), header_columns);
    }

    #[test]
    fn test_store_name_escaped() {
        let row = ExportRow {
            store: "Smith, \"Jr\"".into(),
            ..cafe()
        };
        assert_eq!(
            row.to_csv_line(),
            "1,\"Smith, \"\"Jr\"\"\",,,,0,,1234,,QR_CODE,-65536,0,1750855369,0"
        );
    }

    #[test]
    fn test_full_manifest() {
        let mut writer = CatimaWriter::new(Vec::new()).unwrap();
        writer.write_row(&cafe()).unwrap();
        assert_eq!(writer.rows(), 1);

        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "2\n\n_id\n\n\
             _id,store,note,validfrom,expiry,balance,balancetype,cardid,barcodeid,barcodetype,headercolor,starstatus,lastused,archive\n\
             1,Cafe,,,,0,,1234,,QR_CODE,-65536,0,1750855369,0\n\
             \ncardId,groupId\n"
        );
    }

    #[test]
    fn test_empty_manifest_keeps_sections() {
        let bytes = CatimaWriter::new(Vec::new()).unwrap().finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("2\n\n_id\n\n_id,store,"));
        assert!(text.ends_with("archive\n\ncardId,groupId\n"));
    }
}
