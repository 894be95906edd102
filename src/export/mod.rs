//! Catima export.
//!
//! Catima imports a ZIP holding `catima.csv` and one PNG per card image:
//!
//! - **Manifest**: [`CatimaWriter`] writes the fixed preamble, the card
//!   table and the empty group table
//! - **Assets**: [`write_asset`] drops logo and card images into the working
//!   directory under names keyed by the card's sequence number
//!
//! # File Layout
//!
//! ```text
//! <work dir>/
//!   catima.csv
//!   card_1_icon.png
//!   card_1_front.png
//!   card_2_icon.png
//! ```

mod csv;
mod file;

pub use csv::{CARD_COLUMNS, CatimaWriter, ExportRow, LAST_USED, MANIFEST_NAME, csv_escape};
pub use file::{asset_file_name, icon_file_name, prepare_work_dir, write_asset};
