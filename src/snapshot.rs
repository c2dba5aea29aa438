//! In-memory snapshot of every category's records
//!
//! The snapshot is replaced wholesale on every refresh; nothing patches it in
//! place.

use crate::category::Category;
use crate::normalize::{normalize, AssetView};
use crate::record::Record;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: BTreeMap<Category, Vec<Record>>,
}

impl Snapshot {
    /// Build a snapshot from raw rows, one sequence per category.
    ///
    /// Rows that cannot be decoded are logged and skipped; the rest of the
    /// category still loads.
    pub fn from_rows(rows: BTreeMap<Category, Vec<Value>>) -> Self {
        let mut records = BTreeMap::new();
        for (category, raw) in rows {
            let decoded: Vec<Record> = raw
                .into_iter()
                .filter_map(|row| match Record::from_row(category, row) {
                    Ok(rec) => Some(rec),
                    Err(e) => {
                        warn!(table = category.table(), error = %e, "skipping malformed row");
                        None
                    }
                })
                .collect();
            records.insert(category, decoded);
        }
        Self { records }
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut map: BTreeMap<Category, Vec<Record>> = BTreeMap::new();
        for rec in records {
            map.entry(rec.category()).or_default().push(rec);
        }
        Self { records: map }
    }

    pub fn records(&self, category: Category) -> &[Record] {
        self.records.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, category: Category, id: &str) -> Option<&Record> {
        self.records(category).iter().find(|r| r.id == id)
    }

    /// Normalize every record once, newest first.
    pub fn assets(&self) -> Vec<AssetView> {
        let mut list: Vec<AssetView> = self
            .records
            .values()
            .flat_map(|recs| recs.iter().map(normalize))
            .collect();
        list.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        list
    }

    /// Record count per category (every category present, zero when empty).
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.records(*c).len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Derived "has a matching voice clone / original video" lookups.
///
/// Not a stored link: deepfake titles are matched case-insensitively against
/// voice clone titles, and against original video titles and tags.
#[derive(Debug, Clone, Default)]
pub struct Relations {
    voices: HashSet<String>,
    originals: HashSet<String>,
}

impl Relations {
    pub fn from_assets(assets: &[AssetView]) -> Self {
        let mut voices = HashSet::new();
        let mut originals = HashSet::new();
        for asset in assets {
            match asset.category {
                Category::VoiceClones => {
                    voices.insert(asset.title.to_lowercase());
                }
                Category::OriginalVideos => {
                    originals.insert(asset.title.to_lowercase());
                    for tag in &asset.tags {
                        originals.insert(tag.to_lowercase());
                    }
                }
                _ => {}
            }
        }
        Self { voices, originals }
    }

    pub fn has_voice(&self, title: &str) -> bool {
        self.voices.contains(&title.to_lowercase())
    }

    pub fn has_original(&self, title: &str) -> bool {
        self.originals.contains(&title.to_lowercase())
    }
}
