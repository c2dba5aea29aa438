//! "View related" / "back" navigation
//!
//! The stack only grows through [`NavHistory::push_and_jump`], one frame per
//! call, and only shrinks through [`NavHistory::pop_and_restore`] or
//! [`NavHistory::hard_reset`].

use crate::category::Category;
use crate::filter::{FilterSelections, Scope};
use crate::folders::{ActiveFolder, FolderMode};

/// Everything that decides what the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub scope: Scope,
    pub search: String,
    pub folder_mode: FolderMode,
    pub active_folder: ActiveFolder,
    pub filters: FilterSelections,
}

#[derive(Debug, Clone, Default)]
pub struct NavHistory {
    stack: Vec<ViewState>,
}

impl NavHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current view, then jump to `target` searching for `term`.
    pub fn push_and_jump(&mut self, state: &mut ViewState, target: Category, term: &str) {
        self.stack.push(state.clone());
        state.filters.clear_all();
        state.scope = Scope::Category(target);
        state.search = term.to_string();
        state.folder_mode = FolderMode::Assets;
        state.active_folder = ActiveFolder::Root;
    }

    /// Restore the most recent saved view. Returns false when there is none.
    pub fn pop_and_restore(&mut self, state: &mut ViewState) -> bool {
        match self.stack.pop() {
            Some(prev) => {
                *state = prev;
                true
            }
            None => false,
        }
    }

    /// Drop all history and start fresh on `scope`.
    pub fn hard_reset(&mut self, state: &mut ViewState, scope: Scope) {
        self.stack.clear();
        *state = ViewState {
            scope,
            ..ViewState::default()
        };
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_nested(&self) -> bool {
        !self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folders::FolderRef;

    fn busy_state() -> ViewState {
        let mut filters = FilterSelections::default();
        filters.set(Category::Music, "emocao", "Urgência").unwrap();
        filters.set(Category::Deepfakes, "only_with_voice", "on").unwrap();
        ViewState {
            scope: Scope::Category(Category::Music),
            search: "epic".into(),
            folder_mode: FolderMode::Assets,
            active_folder: ActiveFolder::Folder(FolderRef::Id("f1".into())),
            filters,
        }
    }

    #[test]
    fn test_jump_then_back_round_trips() {
        let mut history = NavHistory::new();
        let before = busy_state();
        let mut state = before.clone();

        history.push_and_jump(&mut state, Category::VoiceClones, "Adele");
        assert_eq!(state.scope, Scope::Category(Category::VoiceClones));
        assert_eq!(state.search, "Adele");
        assert_eq!(state.folder_mode, FolderMode::Assets);
        assert_eq!(state.active_folder, ActiveFolder::Root);
        assert_eq!(state.filters, FilterSelections::default());
        assert_eq!(history.depth(), 1);

        assert!(history.pop_and_restore(&mut state));
        assert_eq!(state, before);
        assert!(!history.is_nested());
    }

    #[test]
    fn test_back_on_empty_stack_is_noop() {
        let mut history = NavHistory::new();
        let mut state = busy_state();
        assert!(!history.pop_and_restore(&mut state));
        assert_eq!(state, busy_state());
    }

    #[test]
    fn test_each_push_adds_one_frame() {
        let mut history = NavHistory::new();
        let mut state = ViewState::default();
        history.push_and_jump(&mut state, Category::VoiceClones, "a");
        history.push_and_jump(&mut state, Category::OriginalVideos, "b");
        assert_eq!(history.depth(), 2);
        history.pop_and_restore(&mut state);
        assert_eq!(state.scope, Scope::Category(Category::VoiceClones));
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn test_hard_reset_clears_everything() {
        let mut history = NavHistory::new();
        let mut state = busy_state();
        history.push_and_jump(&mut state, Category::VoiceClones, "a");
        history.push_and_jump(&mut state, Category::OriginalVideos, "b");

        history.hard_reset(&mut state, Scope::Category(Category::Sfx));
        assert_eq!(history.depth(), 0);
        assert_eq!(state.scope, Scope::Category(Category::Sfx));
        assert!(state.search.is_empty());
        assert_eq!(state.folder_mode, FolderMode::Folders);
        assert_eq!(state.active_folder, ActiveFolder::Root);
        assert_eq!(state.filters, FilterSelections::default());
    }
}
