//! Application session
//!
//! [`Session`] is the only owner of the record snapshot. Views read from it;
//! every change goes through the gateway, and a successful write is followed by
//! a full reload. A failed write leaves the session exactly as it was.

use crate::category::Category;
use crate::error::{Result, SessionError};
use crate::filter::{filter_options, FilterEngine, FilterOption, Scope};
use crate::folders::{validate_name, ActiveFolder, Folder, FolderEntry, FolderIndex, FolderMode, FolderRef};
use crate::gateway::{Backend, Gateway};
use crate::history::{NavHistory, ViewState};
use crate::normalize::AssetView;
use crate::snapshot::{Relations, Snapshot};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Which related collection a deepfake links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedTarget {
    Voice,
    Original,
}

impl RelatedTarget {
    pub fn category(&self) -> Category {
        match self {
            RelatedTarget::Voice => Category::VoiceClones,
            RelatedTarget::Original => Category::OriginalVideos,
        }
    }
}

/// Related-asset badges shown on a deepfake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelatedFlags {
    pub voice: bool,
    pub original: bool,
}

/// Dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total: usize,
    pub per_category: BTreeMap<Category, usize>,
    pub folders: usize,
    pub recent: Vec<AssetView>,
}

pub struct Session<B> {
    gateway: Gateway<B>,
    snapshot: Snapshot,
    assets: Vec<AssetView>,
    relations: Relations,
    folders: Vec<Folder>,
    view: ViewState,
    history: NavHistory,
}

impl<B: Backend> Session<B> {
    /// Empty session; nothing is fetched until [`Session::refresh`].
    pub fn new(backend: B) -> Self {
        Self {
            gateway: Gateway::new(backend),
            snapshot: Snapshot::default(),
            assets: Vec::new(),
            relations: Relations::default(),
            folders: Vec::new(),
            view: ViewState::default(),
            history: NavHistory::new(),
        }
    }

    /// Session with records and folders loaded.
    pub fn open(backend: B) -> Self {
        let mut session = Self::new(backend);
        session.refresh();
        session.refresh_folders();
        session
    }

    pub fn gateway(&self) -> &Gateway<B> {
        &self.gateway
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn history(&self) -> &NavHistory {
        &self.history
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn assets(&self) -> &[AssetView] {
        &self.assets
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Replace the snapshot with a fresh fetch of every category.
    pub fn refresh(&mut self) {
        let snapshot = Snapshot::from_rows(self.gateway.list_all());
        self.assets = snapshot.assets();
        self.relations = Relations::from_assets(&self.assets);
        self.snapshot = snapshot;
        debug!(records = self.assets.len(), "snapshot refreshed");
    }

    pub fn refresh_folders(&mut self) {
        self.folders = self.gateway.list_folders();
        debug!(folders = self.folders.len(), "folders refreshed");
    }

    // ---- view state ----

    /// Switch category from the sidebar. Clears history, filters, search and
    /// folder context.
    pub fn select_scope(&mut self, scope: Scope) {
        self.history.hard_reset(&mut self.view, scope);
    }

    pub fn set_search(&mut self, term: &str) {
        self.view.search = term.to_string();
    }

    fn active_category(&self) -> Result<Category> {
        self.view.scope.category().ok_or(SessionError::NoActiveCategory)
    }

    /// Set a filter of the active category. An empty value clears it.
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        let category = self.active_category()?;
        self.view.filters.set(category, key, value)?;
        Ok(())
    }

    pub fn toggle_filter(&mut self, key: &str) -> Result<bool> {
        let category = self.active_category()?;
        Ok(self.view.filters.toggle(category, key)?)
    }

    /// Close the category chip: back to everything, history dropped.
    pub fn close_category_filter(&mut self) {
        self.history.hard_reset(&mut self.view, Scope::All);
    }

    pub fn clear_filters(&mut self) {
        self.view.filters.clear_all();
    }

    /// Open a folder (or the Raw / Orphaned bucket) of the active category.
    pub fn open_folder(&mut self, folder: FolderRef) -> Result<()> {
        let category = self.active_category()?;
        if let FolderRef::Id(id) = &folder {
            if !FolderIndex::new(&self.folders).is_home(category, id) {
                return Err(SessionError::FolderNotFound(id.clone()));
            }
        }
        self.view.folder_mode = FolderMode::Assets;
        self.view.active_folder = ActiveFolder::Folder(folder);
        Ok(())
    }

    /// Back to the category's folder listing.
    pub fn close_folder(&mut self) {
        self.view.folder_mode = FolderMode::Folders;
        self.view.active_folder = ActiveFolder::Root;
    }

    /// "View related": remember this view, then search `term` in `target`.
    pub fn view_related(&mut self, target: Category, term: &str) {
        self.history.push_and_jump(&mut self.view, target, term);
    }

    /// Jump from a deepfake to its voice clone or original video.
    pub fn follow_related(&mut self, asset: &AssetView, target: RelatedTarget) {
        let title = asset.title.clone();
        self.view_related(target.category(), &title);
    }

    /// Returns false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        self.history.pop_and_restore(&mut self.view)
    }

    // ---- derived views ----

    fn engine(&self) -> FilterEngine<'_> {
        FilterEngine::new(self.view.scope, &self.view.filters, &self.relations)
    }

    /// Search plus category gate plus the active filter block.
    pub fn is_visible(&self, asset: &AssetView) -> bool {
        self.engine().matches(asset, &self.view.search)
    }

    /// Assets shown in the grid, honouring the open folder.
    pub fn visible_assets(&self) -> Vec<&AssetView> {
        let index = FolderIndex::new(&self.folders);
        let engine = self.engine();
        self.assets
            .iter()
            .filter(|a| match &self.view.active_folder {
                ActiveFolder::Folder(f) => index.contains(f, a),
                ActiveFolder::Root => true,
            })
            .filter(|a| engine.matches(a, &self.view.search))
            .collect()
    }

    /// Folder cards for the active category (empty under the ALL scope).
    pub fn root_listing(&self) -> Vec<FolderEntry> {
        let Some(category) = self.view.scope.category() else {
            return Vec::new();
        };
        let engine = self.engine();
        FolderIndex::new(&self.folders).root_listing(category, &self.assets, |a| {
            engine.matches(a, &self.view.search)
        })
    }

    /// Visible records in `folder` under the current search and filters.
    pub fn count_in_folder(&self, folder: &FolderRef) -> usize {
        let engine = self.engine();
        FolderIndex::new(&self.folders).count_in_folder(&self.assets, folder, |a| {
            engine.matches(a, &self.view.search)
        })
    }

    /// Top-level folders of a category.
    pub fn folders_for(&self, category: Category) -> Vec<&Folder> {
        FolderIndex::new(&self.folders).folders_for(category)
    }

    /// Breadcrumb name of the open folder.
    pub fn folder_label(&self) -> Option<String> {
        match &self.view.active_folder {
            ActiveFolder::Root => None,
            ActiveFolder::Folder(f) => Some(FolderIndex::new(&self.folders).label(f)),
        }
    }

    pub fn related_flags(&self, asset: &AssetView) -> RelatedFlags {
        if asset.category != Category::Deepfakes {
            return RelatedFlags::default();
        }
        RelatedFlags {
            voice: self.relations.has_voice(&asset.title),
            original: self.relations.has_original(&asset.title),
        }
    }

    /// Dropdown values for the active category's filters.
    pub fn filter_options(&self) -> Vec<FilterOption> {
        match self.view.scope.category() {
            Some(c) => filter_options(c, self.snapshot.records(c)),
            None => Vec::new(),
        }
    }

    pub fn find_asset(&self, category: Category, id: &str) -> Option<&AssetView> {
        self.assets
            .iter()
            .find(|a| a.category == category && a.id == id)
    }

    pub fn stats(&self, recent: usize) -> Stats {
        Stats {
            total: self.snapshot.total(),
            per_category: self.snapshot.category_counts(),
            folders: self.folders.len(),
            recent: self.assets.iter().take(recent).cloned().collect(),
        }
    }

    // ---- writes ----

    /// Create (`id == None`) or fully update a record, then reload.
    pub fn save_record(
        &mut self,
        category: Category,
        draft: &Map<String, Value>,
        id: Option<&str>,
    ) -> Result<()> {
        let missing: Vec<&str> = category
            .required_columns()
            .iter()
            .copied()
            .filter(|col| match draft.get(*col) {
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(Value::Null) | None => true,
                Some(_) => false,
            })
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }
        let existing = match id {
            Some(id) => Some(self.snapshot.find(category, id).ok_or_else(|| {
                SessionError::RecordNotFound {
                    category,
                    id: id.to_string(),
                }
            })?),
            None => None,
        };
        let folder = match draft.get("folder_id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        if let Some(folder) = folder {
            // An edit may keep the reference it already had, stale or not.
            let unchanged = existing.is_some_and(|r| r.folder_id.as_deref() == Some(folder.as_str()));
            if !unchanged && !FolderIndex::new(&self.folders).is_home(category, &folder) {
                return Err(SessionError::FolderNotFound(folder));
            }
        }

        self.gateway.save(category, draft, id)?;
        info!(category = category.table(), "record saved");
        self.refresh();
        Ok(())
    }

    /// Delete one record after `confirm` agrees. Returns false when declined.
    pub fn delete_record<F>(&mut self, category: Category, id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&AssetView) -> bool,
    {
        let asset = self
            .find_asset(category, id)
            .ok_or_else(|| SessionError::RecordNotFound {
                category,
                id: id.to_string(),
            })?;
        if !confirm(asset) {
            debug!(id, "delete declined");
            return Ok(false);
        }

        self.gateway.delete(category, id)?;
        self.refresh();
        Ok(true)
    }

    /// New top-level folder in the active category.
    pub fn create_folder(&mut self, name: &str) -> Result<()> {
        let category = self.active_category()?;
        let name = validate_name(name)?;
        self.gateway.create_folder(category, &name)?;
        self.refresh_folders();
        Ok(())
    }

    /// Rename a folder. `None` means the prompt was cancelled; nothing happens.
    pub fn rename_folder(&mut self, id: &str, name: Option<&str>) -> Result<bool> {
        let Some(name) = name else {
            return Ok(false);
        };
        if !self.folders.iter().any(|f| f.id == id) {
            return Err(SessionError::FolderNotFound(id.to_string()));
        }
        let name = validate_name(name)?;
        self.gateway.rename_folder(id, &name)?;
        self.refresh_folders();
        Ok(true)
    }

    /// Delete a folder after `confirm` agrees. Its records are left in place.
    pub fn delete_folder<F>(&mut self, id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&Folder) -> bool,
    {
        let folder = self
            .folders
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| SessionError::FolderNotFound(id.to_string()))?;
        if !confirm(folder) {
            return Ok(false);
        }

        self.gateway.delete_folder(id)?;
        if self.view.active_folder == ActiveFolder::Folder(FolderRef::Id(id.to_string())) {
            self.close_folder();
        }
        self.refresh_folders();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryBackend;
    use serde_json::json;

    fn draft(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_open_loads_demo_library() {
        let session = Session::open(MemoryBackend::demo());
        assert!(session.snapshot().total() > 0);
        assert_eq!(session.folders().len(), 4);
        assert_eq!(session.visible_assets().len(), session.assets().len());
    }

    #[test]
    fn test_set_filter_requires_category() {
        let mut session = Session::open(MemoryBackend::demo());
        assert!(matches!(
            session.set_filter("emocao", "x"),
            Err(SessionError::NoActiveCategory)
        ));
        session.select_scope(Scope::Category(Category::Music));
        session.set_filter("emocao", "Urgência").unwrap();
        assert!(session
            .visible_assets()
            .iter()
            .all(|a| a.record.column("emocao") == Some("Urgência")));
    }

    #[test]
    fn test_missing_required_field_never_reaches_backend() {
        let mut session = Session::open(MemoryBackend::demo());
        session.gateway().backend().fail_writes("should not be called");
        let err = session
            .save_record(Category::Music, &draft(json!({"nome": "  "})), None)
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }

    #[test]
    fn test_save_rejects_folder_outside_category() {
        let mut session = Session::open(MemoryBackend::demo());
        session.gateway().backend().fail_writes("should not be called");
        let sfx_folder = session.folders_for(Category::Sfx)[0].id.clone();
        for folder in [sfx_folder.as_str(), "missing"] {
            let err = session
                .save_record(
                    Category::Music,
                    &draft(json!({"nome": "X", "link_audio": "https://x/x.mp3", "folder_id": folder})),
                    None,
                )
                .unwrap_err();
            assert!(matches!(err, SessionError::FolderNotFound(_)));
        }
    }

    #[test]
    fn test_edit_keeps_existing_stale_folder() {
        let mut session = Session::open(MemoryBackend::demo());
        session.select_scope(Scope::Category(Category::Music));
        let id = session.assets().iter().find(|a| a.category == Category::Music).unwrap().id.clone();
        let mut edit = session.snapshot().find(Category::Music, &id).unwrap().to_draft();
        edit.insert("folder_id".to_string(), json!("f-hooks"));
        session.save_record(Category::Music, &edit, Some(&id)).unwrap();

        session.delete_folder("f-hooks", |_| true).unwrap();
        let mut edit = session.snapshot().find(Category::Music, &id).unwrap().to_draft();
        edit.insert("emocao".to_string(), json!("Alívio"));
        session.save_record(Category::Music, &edit, Some(&id)).unwrap();
        let rec = session.snapshot().find(Category::Music, &id).unwrap();
        assert_eq!(rec.folder_id.as_deref(), Some("f-hooks"));
    }

    #[test]
    fn test_stats_recent_matches_sorted_assets() {
        let session = Session::open(MemoryBackend::demo());
        let stats = session.stats(3);
        let expected: Vec<_> = session.assets().iter().take(3).cloned().collect();
        assert_eq!(stats.recent, expected);
    }

    #[test]
    fn test_related_flags_only_for_deepfakes() {
        let session = Session::open(MemoryBackend::demo());
        let deepfake = |name: &str| {
            session
                .assets()
                .iter()
                .find(|a| a.category == Category::Deepfakes && a.record.column("personagem") == Some(name))
                .unwrap()
        };
        assert_eq!(
            session.related_flags(deepfake("Adele")),
            RelatedFlags { voice: true, original: true }
        );
        // Version suffix is part of the title, so "Morgan V2" matches nothing.
        assert_eq!(session.related_flags(deepfake("Morgan")), RelatedFlags::default());

        let voice = session
            .assets()
            .iter()
            .find(|a| a.category == Category::VoiceClones)
            .unwrap();
        assert_eq!(session.related_flags(voice), RelatedFlags::default());
    }

    #[test]
    fn test_rename_cancel_is_noop() {
        let mut session = Session::open(MemoryBackend::demo());
        session.gateway().backend().fail_writes("should not be called");
        assert!(!session.rename_folder("f-hooks", None).unwrap());
        assert!(matches!(
            session.rename_folder("f-hooks", Some("   ")),
            Err(SessionError::Validation(_))
        ));
    }

    #[test]
    fn test_folder_label_breadcrumb() {
        let mut session = Session::open(MemoryBackend::demo());
        session.select_scope(Scope::Category(Category::Music));
        assert_eq!(session.folder_label(), None);
        session.open_folder(FolderRef::Id("f-hooks".into())).unwrap();
        assert_eq!(session.folder_label().as_deref(), Some("Hooks"));
        assert!(matches!(
            session.open_folder(FolderRef::Id("f-trans".into())),
            Err(SessionError::FolderNotFound(_))
        ));
    }
}
