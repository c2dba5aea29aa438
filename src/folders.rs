//! Folder grouping
//!
//! Folders are category-scoped, flat groupings of records. Records without a
//! folder reference live in the virtual Raw bucket. A record whose reference
//! is not a live top-level folder of its own category (deleted, nested, or
//! owned by another category) keeps that reference and is reported under the
//! derived Orphaned bucket instead of Raw.

use crate::category::Category;
use crate::error::SessionError;
use crate::normalize::AssetView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RAW_LABEL: &str = "Raw Assets";
pub const ORPHANED_LABEL: &str = "Orphaned";

/// A row of the `folders` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "crate::record::id_string")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Owning collection name, e.g. `veo_assets`
    pub category: String,
    pub name: String,
    #[serde(default, deserialize_with = "crate::record::opt_id_string")]
    pub parent_id: Option<String>,
}

impl Folder {
    pub fn belongs_to(&self, category: Category) -> bool {
        self.category == category.table()
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Which bucket a listing refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FolderRef {
    Raw,
    Orphaned,
    Id(String),
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderRef::Raw => f.write_str("RAW"),
            FolderRef::Orphaned => f.write_str("ORPHANED"),
            FolderRef::Id(id) => f.write_str(id),
        }
    }
}

impl FolderRef {
    /// Parse a CLI folder argument (`raw`, `orphaned`, or a folder id).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            x if x.eq_ignore_ascii_case("raw") => FolderRef::Raw,
            x if x.eq_ignore_ascii_case("orphaned") => FolderRef::Orphaned,
            x => FolderRef::Id(x.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ActiveFolder {
    #[default]
    Root,
    Folder(FolderRef),
}

/// Root folder listing vs. asset grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FolderMode {
    #[default]
    Folders,
    Assets,
}

/// Trim a folder name, rejecting empty and whitespace-only input.
pub fn validate_name(name: &str) -> Result<String, SessionError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SessionError::Validation(
            "Folder name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Lookup over the loaded folders, used to tell a stale reference from a real one.
pub struct FolderIndex<'a> {
    folders: &'a [Folder],
}

impl<'a> FolderIndex<'a> {
    pub fn new(folders: &'a [Folder]) -> Self {
        Self { folders }
    }

    pub fn get(&self, id: &str) -> Option<&'a Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Top-level folders of one category, in load order.
    pub fn folders_for(&self, category: Category) -> Vec<&'a Folder> {
        self.folders
            .iter()
            .filter(|f| f.belongs_to(category) && f.is_top_level())
            .collect()
    }

    /// Is `id` a live top-level folder of `category`?
    pub fn is_home(&self, category: Category, id: &str) -> bool {
        self.get(id)
            .is_some_and(|f| f.belongs_to(category) && f.is_top_level())
    }

    /// A folder reference that no root card of `category` can show.
    pub fn is_orphaned(&self, category: Category, view: &AssetView) -> bool {
        matches!(&view.record.folder_id, Some(id) if !self.is_home(category, id))
    }

    /// Does `view` belong to the bucket `folder`?
    pub fn contains(&self, folder: &FolderRef, view: &AssetView) -> bool {
        match folder {
            FolderRef::Raw => view.record.folder_id.is_none(),
            FolderRef::Orphaned => self.is_orphaned(view.category, view),
            FolderRef::Id(id) => view.record.folder_id.as_deref() == Some(id.as_str()),
        }
    }

    /// Records in `folder` that pass `visible`.
    pub fn count_in_folder<'v, F>(
        &self,
        assets: impl IntoIterator<Item = &'v AssetView>,
        folder: &FolderRef,
        visible: F,
    ) -> usize
    where
        F: Fn(&AssetView) -> bool,
    {
        assets
            .into_iter()
            .filter(|&a| self.contains(folder, a) && visible(a))
            .count()
    }

    pub fn label(&self, folder: &FolderRef) -> String {
        match folder {
            FolderRef::Raw => RAW_LABEL.to_string(),
            FolderRef::Orphaned => ORPHANED_LABEL.to_string(),
            FolderRef::Id(id) => self
                .get(id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }

    /// Root listing of a category: Raw, then Orphaned, then the top-level
    /// folders. Entries with no visible records are left out.
    pub fn root_listing<F>(
        &self,
        category: Category,
        assets: &[AssetView],
        visible: F,
    ) -> Vec<FolderEntry>
    where
        F: Fn(&AssetView) -> bool,
    {
        let mut refs = vec![FolderRef::Raw, FolderRef::Orphaned];
        refs.extend(
            self.folders_for(category)
                .into_iter()
                .map(|f| FolderRef::Id(f.id.clone())),
        );

        refs.into_iter()
            .filter_map(|folder| {
                let count = self.count_in_folder(assets, &folder, &visible);
                (count > 0).then(|| FolderEntry {
                    name: self.label(&folder),
                    folder,
                    count,
                })
            })
            .collect()
    }
}

/// One card in the root folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub folder: FolderRef,
    pub name: String,
    pub count: usize,
}

impl FolderEntry {
    /// Raw and Orphaned cannot be renamed or deleted.
    pub fn is_virtual(&self) -> bool {
        !matches!(self.folder, FolderRef::Id(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::Record;
    use serde_json::json;

    fn folder(id: &str, name: &str, table: &str) -> Folder {
        serde_json::from_value(json!({
            "id": id, "created_at": "2024-01-01T00:00:00Z",
            "category": table, "name": name, "parent_id": null
        }))
        .unwrap()
    }

    fn asset(id: &str, folder_id: Option<&str>, nome: &str) -> AssetView {
        let row = json!({
            "id": id, "created_at": "2024-01-01T00:00:00Z",
            "nome": nome, "folder_id": folder_id
        });
        normalize(&Record::from_row(Category::Music, row).unwrap())
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Hooks ").unwrap(), "Hooks");
        assert!(validate_name("").is_err());
        assert!(validate_name("   \t").is_err());
    }

    #[test]
    fn test_root_listing_hides_empty_folders() {
        let folders = vec![folder("a", "A", "musicas"), folder("b", "B", "musicas")];
        let index = FolderIndex::new(&folders);
        let assets = vec![
            asset("1", Some("a"), "keep"),
            asset("2", Some("a"), "keep"),
            asset("3", Some("b"), "drop"),
        ];
        let listing = index.root_listing(Category::Music, &assets, |a| a.title == "keep");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "A");
        assert_eq!(listing[0].count, 2);
    }

    #[test]
    fn test_raw_listed_first_when_non_empty() {
        let folders = vec![folder("a", "A", "musicas")];
        let index = FolderIndex::new(&folders);
        let assets = vec![asset("1", None, "x"), asset("2", Some("a"), "x")];
        let listing = index.root_listing(Category::Music, &assets, |_| true);
        assert_eq!(listing[0].folder, FolderRef::Raw);
        assert_eq!(listing[0].name, RAW_LABEL);
        assert!(listing[0].is_virtual());
        assert_eq!(listing[1].folder, FolderRef::Id("a".into()));
    }

    #[test]
    fn test_orphans_not_counted_as_raw() {
        let folders = vec![folder("a", "A", "musicas")];
        let index = FolderIndex::new(&folders);
        let assets = vec![asset("1", Some("gone"), "x"), asset("2", None, "x")];

        assert_eq!(index.count_in_folder(&assets, &FolderRef::Raw, |_| true), 1);
        assert_eq!(index.count_in_folder(&assets, &FolderRef::Orphaned, |_| true), 1);
        assert_eq!(
            index.count_in_folder(&assets, &FolderRef::Id("gone".into()), |_| true),
            1
        );

        let listing = index.root_listing(Category::Music, &assets, |_| true);
        let refs: Vec<_> = listing.iter().map(|e| e.folder.clone()).collect();
        assert_eq!(refs, vec![FolderRef::Raw, FolderRef::Orphaned]);
    }

    #[test]
    fn test_foreign_and_nested_references_are_orphaned() {
        let mut nested = folder("n", "Nested", "musicas");
        nested.parent_id = Some("a".into());
        let folders = vec![folder("a", "A", "musicas"), folder("s", "S", "sfx"), nested];
        let index = FolderIndex::new(&folders);
        let assets = vec![
            asset("1", Some("s"), "x"),
            asset("2", Some("n"), "x"),
            asset("3", Some("a"), "x"),
        ];

        assert!(index.is_orphaned(Category::Music, &assets[0]));
        assert!(index.is_orphaned(Category::Music, &assets[1]));
        assert!(!index.is_orphaned(Category::Music, &assets[2]));
        assert!(index.is_home(Category::Sfx, "s"));
        assert!(!index.is_home(Category::Music, "n"));

        let listing = index.root_listing(Category::Music, &assets, |_| true);
        let listed: usize = listing.iter().map(|e| e.count).sum();
        assert_eq!(listed, assets.len());
        assert_eq!(listing[0].folder, FolderRef::Orphaned);
        assert_eq!(listing[0].count, 2);
    }

    #[test]
    fn test_folders_for_is_category_scoped_and_top_level() {
        let mut nested = folder("n", "Nested", "musicas");
        nested.parent_id = Some("a".into());
        let folders = vec![folder("a", "A", "musicas"), folder("s", "S", "sfx"), nested];
        let index = FolderIndex::new(&folders);
        let names: Vec<_> = index
            .folders_for(Category::Music)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_folder_ref_parse_and_label() {
        assert_eq!(FolderRef::parse("RAW"), FolderRef::Raw);
        assert_eq!(FolderRef::parse("orphaned"), FolderRef::Orphaned);
        assert_eq!(FolderRef::parse("42"), FolderRef::Id("42".into()));
        let folders = vec![folder("a", "Hooks", "musicas")];
        let index = FolderIndex::new(&folders);
        assert_eq!(index.label(&FolderRef::Id("a".into())), "Hooks");
        assert_eq!(index.label(&FolderRef::Id("zz".into())), "zz");
    }

    #[test]
    fn test_numeric_folder_ids_decode() {
        let f: Folder = serde_json::from_value(json!({
            "id": 7, "category": "sfx", "name": "Whoosh", "parent_id": 3
        }))
        .unwrap();
        assert_eq!(f.id, "7");
        assert_eq!(f.parent_id.as_deref(), Some("3"));
        assert!(!f.is_top_level());
    }
}
