//! Stocard → Catima migration pipeline.
//!
//! The run is a single pass over the loyalty card rows:
//!
//! 1. Load every card row from the store
//! 2. Resolve each card to its provider, skipping providers already exported
//! 3. Extract the provider logo and the card images into the working directory
//! 4. Append one row per exported provider to `catima.csv`
//! 5. Zip the working directory
//!
//! Only store access, file I/O, icon decoding and packaging abort the run.
//! Everything wrong with an individual card is a [`SkipReason`].

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::color::{NO_ICON_COLOR, dominant_color};
use crate::config::MigrationConfig;
use crate::error::{Error, Result};
use crate::export::{
    CatimaWriter, ExportRow, MANIFEST_NAME, asset_file_name, icon_file_name, prepare_work_dir,
    write_asset,
};
use crate::model::{LoyaltyCard, Provider};
use crate::package::zip_dir;
use crate::storage::collection;
use crate::storage::{ResourceRow, ResourceStore};

/// Resolver state carried from one card to the next.
///
/// Sequence numbers are handed out densely from 1, only when a card is
/// actually exported, and each provider is exported once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    next_seq: u32,
    exported_providers: HashSet<String>,
}

impl MigrationState {
    /// Fresh state: nothing exported, next sequence number 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            exported_providers: HashSet::new(),
        }
    }

    /// Sequence number the next exported card will get.
    #[must_use]
    pub fn next_seq(&self) -> u32 {
        self.next_seq
    }

    /// Whether a card of this provider was already exported.
    #[must_use]
    pub fn is_exported(&self, provider_id: &str) -> bool {
        self.exported_providers.contains(provider_id)
    }

    /// Record an exported provider and advance the sequence.
    fn commit(&mut self, provider_id: &str) {
        self.exported_providers.insert(provider_id.to_string());
        self.next_seq += 1;
    }
}

impl Default for MigrationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a card row produced no export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Card content is not a card JSON document.
    InvalidCardJson { card_id: String },
    /// Card has no provider reference.
    MissingProviderReference { card_id: String },
    /// Another card of the same provider was already exported.
    DuplicateProvider { provider_id: String },
    /// No row with the provider's id exists.
    ProviderNotFound { provider_id: String },
    /// Provider content is not a provider JSON document.
    InvalidProviderJson { provider_id: String },
    /// Provider has no display name.
    ProviderWithoutName { provider_id: String },
}

impl SkipReason {
    /// Silent skips are only logged, never printed.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::InvalidCardJson { .. }
                | Self::MissingProviderReference { .. }
                | Self::DuplicateProvider { .. }
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCardJson { card_id } => write!(f, "Card {card_id} is not valid JSON"),
            Self::MissingProviderReference { card_id } => {
                write!(f, "Card {card_id} has no provider reference")
            }
            Self::DuplicateProvider { provider_id } => {
                write!(f, "Provider {provider_id} already exported")
            }
            Self::ProviderNotFound { provider_id } => {
                write!(f, "No content found for provider id={provider_id}")
            }
            Self::InvalidProviderJson { provider_id } => {
                write!(f, "Cannot parse JSON of provider {provider_id}")
            }
            Self::ProviderWithoutName { provider_id } => {
                write!(f, "Provider {provider_id} has no 'name' field")
            }
        }
    }
}

/// Result of resolving one card row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    /// The card was exported; its assets are already on disk.
    Exported {
        row: ExportRow,
        has_icon: bool,
        images: usize,
    },
    /// The card was skipped.
    Skipped(SkipReason),
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Loyalty card rows read from the store.
    pub cards: usize,
    /// Rows written to `catima.csv`.
    pub exported: usize,
    /// Card rows skipped for any reason.
    pub skipped: usize,
    /// Exported cards without a provider logo.
    pub missing_logos: usize,
    /// Card images extracted.
    pub images: usize,
    /// Files packed into the archive.
    pub archived_files: usize,
}

impl MigrationStats {
    fn record(&mut self, outcome: &CardOutcome) {
        match outcome {
            CardOutcome::Exported {
                has_icon, images, ..
            } => {
                self.exported += 1;
                self.images += *images;
                if !*has_icon {
                    self.missing_logos += 1;
                }
            }
            CardOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Resolve one loyalty card row.
///
/// On export, the provider logo and card images are written to `work_dir`
/// under the current sequence number and `state` advances. Skips leave
/// `state` untouched.
///
/// # Errors
///
/// Returns an error if a store query fails, an asset cannot be written or
/// the logo cannot be decoded.
pub fn resolve_card(
    store: &ResourceStore,
    work_dir: &Path,
    card_row: &ResourceRow,
    state: &mut MigrationState,
) -> Result<CardOutcome> {
    let skip = |reason: SkipReason| -> Result<CardOutcome> { Ok(CardOutcome::Skipped(reason)) };

    let Ok(card) = LoyaltyCard::from_slice(&card_row.content) else {
        return skip(SkipReason::InvalidCardJson {
            card_id: card_row.id.clone(),
        });
    };

    let user_id = collection::user_id(&card_row.collection).unwrap_or_default();
    let card_id = card_row.id.as_str();

    let Some(provider_id) = card.provider_id() else {
        return skip(SkipReason::MissingProviderReference {
            card_id: card_id.to_string(),
        });
    };

    if state.is_exported(provider_id) {
        return skip(SkipReason::DuplicateProvider {
            provider_id: provider_id.to_string(),
        });
    }

    let Some(content) = store.provider_content(provider_id)? else {
        return skip(SkipReason::ProviderNotFound {
            provider_id: provider_id.to_string(),
        });
    };

    let Ok(provider) = Provider::from_slice(&content) else {
        return skip(SkipReason::InvalidProviderJson {
            provider_id: provider_id.to_string(),
        });
    };

    let Some(name) = provider.name() else {
        return skip(SkipReason::ProviderWithoutName {
            provider_id: provider_id.to_string(),
        });
    };

    let barcode_type = provider.resolve_barcode_format(card.barcode_format());
    let seq = state.next_seq();

    // File names already taken by this card; an image never replaces the logo.
    let mut written: HashSet<String> = HashSet::new();

    let icon_path = match store.provider_logo(provider_id)? {
        Some(logo) => {
            let file_name = icon_file_name(seq);
            let path = write_asset(work_dir, &file_name, &logo)?;
            written.insert(file_name);
            Some(path)
        }
        None => {
            println!("Logo not found for card {name}");
            None
        }
    };

    let mut image_count = 0;
    for image in store.card_images(user_id, card_id)? {
        let file_name = asset_file_name(seq, &image.id);
        if written.contains(&file_name) {
            println!("Skipping image {} of card {card_id}: {file_name} already exists", image.id);
            continue;
        }
        write_asset(work_dir, &file_name, &image.content)?;
        written.insert(file_name);
        image_count += 1;
    }

    let header_color = match &icon_path {
        Some(path) => dominant_color(path)?,
        None => NO_ICON_COLOR,
    };

    let row = ExportRow {
        id: seq,
        store: name.to_string(),
        card_id: card.card_number().to_string(),
        barcode_type: barcode_type.to_string(),
        header_color,
    };

    state.commit(provider_id);

    Ok(CardOutcome::Exported {
        row,
        has_icon: icon_path.is_some(),
        images: image_count,
    })
}

/// Export every card of an open store into `work_dir`.
///
/// Writes `catima.csv` and the assets, but does not package them.
///
/// # Errors
///
/// Returns `NoLoyaltyCards` if the store holds no card rows, otherwise any
/// fatal error from [`resolve_card`] or from writing the manifest.
pub fn export_cards(
    store: &ResourceStore,
    store_path: &Path,
    work_dir: &Path,
) -> Result<MigrationStats> {
    let cards = store.loyalty_cards()?;
    if cards.is_empty() {
        return Err(Error::NoLoyaltyCards {
            path: store_path.to_path_buf(),
        });
    }

    prepare_work_dir(work_dir)?;
    let mut writer = CatimaWriter::create(&work_dir.join(MANIFEST_NAME))?;

    let mut state = MigrationState::new();
    let mut stats = MigrationStats {
        cards: cards.len(),
        ..MigrationStats::default()
    };

    for card_row in &cards {
        let outcome = resolve_card(store, work_dir, card_row, &mut state)?;
        stats.record(&outcome);

        match outcome {
            CardOutcome::Exported { row, .. } => {
                writer.write_row(&row)?;
                println!("Processed card: {} -> ID: {}", row.store, row.id);
            }
            CardOutcome::Skipped(reason) if reason.is_silent() => {
                tracing::debug!(card = %card_row.id, %reason, "skipped card");
            }
            CardOutcome::Skipped(reason) => println!("{reason}"),
        }
    }

    tracing::debug!(rows = writer.rows(), "finishing manifest");
    writer.finish()?;
    Ok(stats)
}

/// Run a full migration: open the store, export, package.
///
/// The working directory is left on disk afterwards, also when the run
/// fails halfway.
///
/// # Errors
///
/// Returns the first fatal error; see [`Error`].
pub fn run(config: &MigrationConfig) -> Result<MigrationStats> {
    let store = ResourceStore::open(&config.store_path)?;

    tracing::info!(
        store = %config.store_path.display(),
        work_dir = %config.work_dir.display(),
        "starting migration"
    );

    let mut stats = export_cards(&store, &config.store_path, &config.work_dir)?;
    stats.archived_files = zip_dir(&config.work_dir, &config.output_path)?;

    tracing::info!(?stats, "migration finished");
    Ok(stats)
}
