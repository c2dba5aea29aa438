//! Application state for the TUI

use crate::category::Category;
use crate::cli::commands::DynSession;
use crate::config::Config;
use crate::filter::{FilterBlock, Scope};
use crate::folders::{ActiveFolder, FolderEntry, FolderMode};
use crate::normalize::AssetView;
use crate::record::Record;
use crate::session::RelatedTarget;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Detail { category: Category, id: String },
    Filters { cursor: usize },
    Form(FormState),
    Confirm(ConfirmAction),
    Prompt(PromptState),
}

/// Which panel of the browse screen receives arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: MessageLevel,
}

/// A destructive action waiting for y/N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteRecord {
        category: Category,
        id: String,
        title: String,
    },
    DeleteFolder {
        id: String,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    CreateFolder,
    RenameFolder { id: String },
}

/// Single-line text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
}

impl PromptState {
    pub fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::CreateFolder => "New folder",
            PromptKind::RenameFolder { .. } => "Rename folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub value: String,
    pub required: bool,
}

/// Create / edit form for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub category: Category,
    pub id: Option<String>,
    pub fields: Vec<FormField>,
    pub cursor: usize,
}

impl FormState {
    fn blank(category: Category, id: Option<String>) -> Self {
        let required = category.required_columns();
        let mut fields: Vec<FormField> = category
            .columns()
            .iter()
            .filter(|c| !matches!(**c, "tags" | "folder_id"))
            .map(|c| FormField {
                key: c.to_string(),
                value: String::new(),
                required: required.contains(c),
            })
            .collect();
        for key in ["tags_string", "folder_id"] {
            fields.push(FormField {
                key: key.to_string(),
                value: String::new(),
                required: false,
            });
        }
        Self {
            category,
            id,
            fields,
            cursor: 0,
        }
    }

    /// Empty form; new records land in `folder_id` when one is open.
    pub fn create(category: Category, folder_id: Option<String>) -> Self {
        let mut form = Self::blank(category, None);
        if let Some(folder_id) = folder_id {
            form.set("folder_id", &folder_id);
        }
        form
    }

    pub fn edit(record: &Record) -> Self {
        let mut form = Self::blank(record.category(), Some(record.id.clone()));
        for (key, value) in record.to_draft() {
            if let Value::String(s) = value {
                form.set(&key, &s);
            }
        }
        form
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.to_string();
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.cursor)
    }

    pub fn next(&mut self) {
        if !self.fields.is_empty() {
            self.cursor = (self.cursor + 1) % self.fields.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.fields.is_empty() {
            self.cursor = (self.cursor + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn to_draft(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.key.clone(), Value::String(f.value.clone())))
            .collect()
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}

/// Main application state
pub struct AppState {
    pub session: DynSession,
    pub screen: Screen,
    pub focus: Focus,
    pub sidebar_cursor: usize,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub search_mode: bool,
    pub refresh_pending: bool,
    pub message: Option<StatusMessage>,
    pub recent_limit: usize,
    pub tick_rate: Duration,
    pub tick: u64,             // animation tick counter
    pub visible_height: usize, // rows that fit in the main list
}

impl AppState {
    pub fn new(session: DynSession, config: &Config) -> Self {
        let mut state = Self {
            session,
            screen: Screen::Browse,
            focus: Focus::Main,
            sidebar_cursor: 0,
            cursor: 0,
            scroll_offset: 0,
            search_mode: false,
            refresh_pending: false,
            message: None,
            recent_limit: config.ui.recent_limit,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms.max(16)),
            tick: 0,
            visible_height: 20,
        };
        state.sync_sidebar();
        state
    }

    // ---- status line ----

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            level: MessageLevel::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(message = %text, "tui error");
        self.message = Some(StatusMessage {
            text,
            level: MessageLevel::Error,
        });
    }

    // ---- loading ----

    pub fn request_refresh(&mut self) {
        self.refresh_pending = true;
    }

    pub fn perform_refresh(&mut self) {
        self.refresh_pending = false;
        self.session.refresh();
        self.session.refresh_folders();
        self.clamp_cursor();
        let total = self.session.snapshot().total();
        info!(total, "library loaded");
        self.info(format!("{} assets loaded", total));
    }

    // ---- sidebar ----

    /// Sidebar entries: everything, then one per category.
    pub fn sidebar_scopes() -> Vec<Scope> {
        std::iter::once(Scope::All)
            .chain(Category::ALL.iter().map(|c| Scope::Category(*c)))
            .collect()
    }

    /// Point the sidebar cursor at the scope being shown.
    pub fn sync_sidebar(&mut self) {
        let scope = self.session.view().scope;
        self.sidebar_cursor = Self::sidebar_scopes()
            .iter()
            .position(|s| *s == scope)
            .unwrap_or(0);
    }

    pub fn select_sidebar(&mut self) {
        let scopes = Self::sidebar_scopes();
        if let Some(scope) = scopes.get(self.sidebar_cursor) {
            self.session.select_scope(*scope);
            self.reset_cursor();
            self.message = None;
        }
    }

    // ---- main list ----

    pub fn active_category(&self) -> Option<Category> {
        self.session.view().scope.category()
    }

    /// True when the main panel lists folder cards instead of assets.
    pub fn showing_folders(&self) -> bool {
        let view = self.session.view();
        view.scope.category().is_some() && view.folder_mode == FolderMode::Folders
    }

    pub fn listing(&self) -> Vec<FolderEntry> {
        self.session.root_listing()
    }

    pub fn item_count(&self) -> usize {
        if self.showing_folders() {
            self.listing().len()
        } else {
            self.session.visible_assets().len()
        }
    }

    pub fn selected_folder(&self) -> Option<FolderEntry> {
        if !self.showing_folders() {
            return None;
        }
        self.listing().into_iter().nth(self.cursor)
    }

    pub fn selected_asset(&self) -> Option<AssetView> {
        if self.showing_folders() {
            return None;
        }
        self.session.visible_assets().get(self.cursor).map(|a| (*a).clone())
    }

    /// Asset shown on the detail screen.
    pub fn detail_asset(&self) -> Option<&AssetView> {
        match &self.screen {
            Screen::Detail { category, id } => self.session.find_asset(*category, id),
            _ => None,
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.item_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
        self.scroll_to_cursor();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            self.reset_cursor();
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, count as isize - 1);
        self.cursor = next as usize;
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let height = self.visible_height.max(1);
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }

    // ---- navigation ----

    /// Enter on the main list: open a folder or show an asset.
    pub fn open_selected(&mut self) {
        if let Some(entry) = self.selected_folder() {
            match self.session.open_folder(entry.folder) {
                Ok(()) => self.reset_cursor(),
                Err(e) => self.error(e.to_string()),
            }
        } else if let Some(asset) = self.selected_asset() {
            self.screen = Screen::Detail {
                category: asset.category,
                id: asset.id,
            };
        }
    }

    /// Esc on the browse screen: leave the folder, then the related jump,
    /// then the category.
    pub fn go_back(&mut self) {
        let view = self.session.view();
        if matches!(view.active_folder, ActiveFolder::Folder(_)) {
            self.session.close_folder();
        } else if self.session.history().is_nested() {
            self.session.back();
        } else if view.scope.category().is_some() {
            self.session.close_category_filter();
        } else {
            return;
        }
        self.sync_sidebar();
        self.reset_cursor();
    }

    /// History back only (the "Voltar" button).
    pub fn history_back(&mut self) {
        if self.session.back() {
            self.sync_sidebar();
            self.reset_cursor();
        } else {
            self.info("Nothing to go back to");
        }
    }

    /// Jump from a deepfake to its voice clone or original video.
    pub fn follow_related(&mut self, asset: &AssetView, target: RelatedTarget) {
        let flags = self.session.related_flags(asset);
        let available = match target {
            RelatedTarget::Voice => flags.voice,
            RelatedTarget::Original => flags.original,
        };
        if !available {
            self.info(format!(
                "No {} linked to {}",
                target.category().label(),
                asset.title
            ));
            return;
        }
        self.session.follow_related(asset, target);
        self.screen = Screen::Browse;
        self.focus = Focus::Main;
        self.sync_sidebar();
        self.reset_cursor();
    }

    pub fn set_search(&mut self, term: &str) {
        self.session.set_search(term);
        self.reset_cursor();
    }

    // ---- filters ----

    pub fn filter_keys(&self) -> &'static [&'static str] {
        self.active_category()
            .and_then(FilterBlock::default_for)
            .map(|b| b.keys())
            .unwrap_or(&[])
    }

    pub fn filter_value(&self, key: &str) -> Option<String> {
        let category = self.active_category()?;
        self.session.view().filters.block(category)?.value(key)
    }

    /// Step a dropdown filter through "any" and its known values.
    pub fn cycle_filter(&mut self, key: &str, forward: bool) {
        if FilterBlock::is_toggle(key) {
            if let Err(e) = self.session.toggle_filter(key) {
                self.error(e.to_string());
            }
            self.clamp_cursor();
            return;
        }

        let mut choices = vec![String::new()];
        if let Some(option) = self.session.filter_options().into_iter().find(|o| o.key == key) {
            choices.extend(option.values);
        }
        let current = self.filter_value(key).unwrap_or_default();
        let pos = choices.iter().position(|c| *c == current).unwrap_or(0);
        let next = if forward {
            (pos + 1) % choices.len()
        } else {
            (pos + choices.len() - 1) % choices.len()
        };
        if let Err(e) = self.session.set_filter(key, &choices[next]) {
            self.error(e.to_string());
        }
        self.clamp_cursor();
    }

    // ---- writes ----

    /// Submit the open form. Stays on the form when the save fails.
    pub fn submit_form(&mut self) {
        let Screen::Form(form) = &self.screen else {
            return;
        };
        let form = form.clone();
        match self
            .session
            .save_record(form.category, &form.to_draft(), form.id.as_deref())
        {
            Ok(()) => {
                self.screen = Screen::Browse;
                self.clamp_cursor();
                self.info(if form.is_edit() {
                    "Asset updated"
                } else {
                    "Asset added"
                });
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn run_confirmed(&mut self, action: ConfirmAction) {
        let result = match &action {
            ConfirmAction::DeleteRecord { category, id, .. } => {
                self.session.delete_record(*category, id, |_| true)
            }
            ConfirmAction::DeleteFolder { id, .. } => self.session.delete_folder(id, |_| true),
        };
        self.screen = Screen::Browse;
        match result {
            Ok(_) => {
                self.clamp_cursor();
                self.info(match action {
                    ConfirmAction::DeleteRecord { title, .. } => format!("Deleted {}", title),
                    ConfirmAction::DeleteFolder { name, .. } => format!("Deleted folder {}", name),
                });
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    /// Submit (`Some`) or cancel (`None`) the open prompt.
    pub fn finish_prompt(&mut self, input: Option<String>) {
        let Screen::Prompt(prompt) = &self.screen else {
            return;
        };
        let kind = prompt.kind.clone();
        let result = match (&kind, input.as_deref()) {
            (PromptKind::CreateFolder, Some(name)) => self.session.create_folder(name).map(|_| true),
            (PromptKind::CreateFolder, None) => Ok(false),
            (PromptKind::RenameFolder { id }, name) => self.session.rename_folder(id, name),
        };
        match result {
            Ok(changed) => {
                self.screen = Screen::Browse;
                self.clamp_cursor();
                if changed {
                    self.info(match kind {
                        PromptKind::CreateFolder => "Folder created",
                        PromptKind::RenameFolder { .. } => "Folder renamed",
                    });
                }
            }
            // Keep the prompt open so the name can be fixed.
            Err(e) => self.error(e.to_string()),
        }
    }
}
