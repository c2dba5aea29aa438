//! Event handling for TUI

use crate::category::Category;
use crate::folders::{ActiveFolder, FolderRef};
use crate::session::RelatedTarget;
use crate::tui::state::{
    AppState, ConfirmAction, Focus, FormState, PromptKind, PromptState, Screen,
};
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

/// Handle a keyboard event
pub fn handle_event(app_state: &mut AppState, key: KeyCode, modifiers: KeyModifiers) -> EventResult {
    if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        return EventResult::Quit;
    }

    match app_state.screen {
        Screen::Browse => handle_browse_event(app_state, key),
        Screen::Detail { .. } => handle_detail_event(app_state, key),
        Screen::Filters { .. } => handle_filters_event(app_state, key),
        Screen::Form(_) => handle_form_event(app_state, key, modifiers),
        Screen::Confirm(_) => handle_confirm_event(app_state, key),
        Screen::Prompt(_) => handle_prompt_event(app_state, key),
    }
}

/// Handle a mouse event
pub fn handle_mouse_event(app_state: &mut AppState, mouse: MouseEvent) -> EventResult {
    let key = match mouse.kind {
        MouseEventKind::ScrollDown => KeyCode::Down,
        MouseEventKind::ScrollUp => KeyCode::Up,
        _ => return EventResult::Continue,
    };
    match app_state.screen {
        Screen::Browse | Screen::Filters { .. } | Screen::Form(_) => {
            handle_event(app_state, key, KeyModifiers::empty())
        }
        _ => EventResult::Continue,
    }
}

fn handle_browse_event(app_state: &mut AppState, key: KeyCode) -> EventResult {
    if app_state.search_mode {
        handle_search_input(app_state, key);
        return EventResult::Continue;
    }

    match key {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Tab | KeyCode::BackTab => {
            app_state.focus = match app_state.focus {
                Focus::Sidebar => Focus::Main,
                Focus::Main => Focus::Sidebar,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => navigate(app_state, -1),
        KeyCode::Down | KeyCode::Char('j') => navigate(app_state, 1),
        KeyCode::PageUp => navigate(app_state, -(app_state.visible_height.max(1) as isize)),
        KeyCode::PageDown => navigate(app_state, app_state.visible_height.max(1) as isize),
        KeyCode::Home => app_state.reset_cursor(),
        KeyCode::End => navigate(app_state, isize::MAX / 2),
        KeyCode::Enter => match app_state.focus {
            Focus::Sidebar => {
                app_state.select_sidebar();
                app_state.focus = Focus::Main;
            }
            Focus::Main => app_state.open_selected(),
        },
        KeyCode::Char('/') => {
            app_state.search_mode = true;
            app_state.focus = Focus::Main;
        }
        KeyCode::Esc => {
            if app_state.session.view().search.is_empty() {
                app_state.go_back();
            } else {
                app_state.set_search("");
            }
        }
        KeyCode::Backspace | KeyCode::Char('b') => app_state.history_back(),
        KeyCode::Char('r') => app_state.request_refresh(),
        KeyCode::Char('f') => {
            if app_state.filter_keys().is_empty() {
                app_state.info("Pick a category with filters first");
            } else {
                app_state.screen = Screen::Filters { cursor: 0 };
            }
        }
        KeyCode::Char('x') => {
            app_state.session.clear_filters();
            app_state.clamp_cursor();
            app_state.info("Filters cleared");
        }
        KeyCode::Char('n') => open_create_form(app_state),
        KeyCode::Char('N') => open_folder_prompt(app_state),
        KeyCode::Char('e') => edit_selected(app_state),
        KeyCode::Char('d') | KeyCode::Delete => delete_selected(app_state),
        KeyCode::Char('v') => follow_selected(app_state, RelatedTarget::Voice),
        KeyCode::Char('o') => follow_selected(app_state, RelatedTarget::Original),
        _ => {}
    }
    EventResult::Continue
}

fn navigate(app_state: &mut AppState, delta: isize) {
    match app_state.focus {
        Focus::Sidebar => {
            let len = AppState::sidebar_scopes().len() as isize;
            let next = (app_state.sidebar_cursor as isize + delta).clamp(0, len - 1);
            app_state.sidebar_cursor = next as usize;
        }
        Focus::Main => app_state.move_cursor(delta),
    }
}

fn handle_search_input(app_state: &mut AppState, key: KeyCode) {
    let mut term = app_state.session.view().search.clone();
    match key {
        KeyCode::Enter => app_state.search_mode = false,
        KeyCode::Esc => {
            app_state.search_mode = false;
            app_state.set_search("");
        }
        KeyCode::Up => app_state.move_cursor(-1),
        KeyCode::Down => app_state.move_cursor(1),
        KeyCode::Backspace => {
            term.pop();
            app_state.set_search(&term);
        }
        KeyCode::Char(c) => {
            term.push(c);
            app_state.set_search(&term);
        }
        _ => {}
    }
}

fn open_create_form(app_state: &mut AppState) {
    let Some(category) = app_state.active_category() else {
        app_state.info("Pick a category to add an asset");
        return;
    };
    let folder_id = match &app_state.session.view().active_folder {
        ActiveFolder::Folder(FolderRef::Id(id)) => Some(id.clone()),
        _ => None,
    };
    app_state.screen = Screen::Form(FormState::create(category, folder_id));
}

fn open_folder_prompt(app_state: &mut AppState) {
    if app_state.active_category().is_none() {
        app_state.info("Pick a category to create a folder");
        return;
    }
    app_state.screen = Screen::Prompt(PromptState {
        kind: PromptKind::CreateFolder,
        input: String::new(),
    });
}

fn edit_asset(app_state: &mut AppState, category: Category, id: &str) {
    match app_state.session.snapshot().find(category, id) {
        Some(record) => app_state.screen = Screen::Form(FormState::edit(record)),
        None => app_state.error(format!("{} record {} not found", category.label(), id)),
    }
}

fn edit_selected(app_state: &mut AppState) {
    if let Some(entry) = app_state.selected_folder() {
        if let FolderRef::Id(id) = entry.folder {
            app_state.screen = Screen::Prompt(PromptState {
                kind: PromptKind::RenameFolder { id },
                input: entry.name,
            });
        } else {
            app_state.info(format!("{} cannot be renamed", entry.name));
        }
    } else if let Some(asset) = app_state.selected_asset() {
        edit_asset(app_state, asset.category, &asset.id);
    }
}

fn delete_selected(app_state: &mut AppState) {
    if let Some(entry) = app_state.selected_folder() {
        if let FolderRef::Id(id) = entry.folder {
            app_state.screen = Screen::Confirm(ConfirmAction::DeleteFolder {
                id,
                name: entry.name,
            });
        } else {
            app_state.info(format!("{} cannot be deleted", entry.name));
        }
    } else if let Some(asset) = app_state.selected_asset() {
        app_state.screen = Screen::Confirm(ConfirmAction::DeleteRecord {
            category: asset.category,
            id: asset.id,
            title: asset.title,
        });
    }
}

fn follow_selected(app_state: &mut AppState, target: RelatedTarget) {
    if let Some(asset) = app_state.selected_asset() {
        app_state.follow_related(&asset, target);
    }
}

fn handle_detail_event(app_state: &mut AppState, key: KeyCode) -> EventResult {
    let Some(asset) = app_state.detail_asset().cloned() else {
        // Deleted or refreshed away underneath us.
        app_state.screen = Screen::Browse;
        return EventResult::Continue;
    };

    match key {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app_state.screen = Screen::Browse,
        KeyCode::Char('v') => app_state.follow_related(&asset, RelatedTarget::Voice),
        KeyCode::Char('o') => app_state.follow_related(&asset, RelatedTarget::Original),
        KeyCode::Char('e') => edit_asset(app_state, asset.category, &asset.id),
        KeyCode::Char('d') | KeyCode::Delete => {
            app_state.screen = Screen::Confirm(ConfirmAction::DeleteRecord {
                category: asset.category,
                id: asset.id,
                title: asset.title,
            });
        }
        _ => {}
    }
    EventResult::Continue
}

fn handle_filters_event(app_state: &mut AppState, key: KeyCode) -> EventResult {
    let Screen::Filters { cursor } = app_state.screen else {
        return EventResult::Continue;
    };
    let keys = app_state.filter_keys();
    if keys.is_empty() {
        app_state.screen = Screen::Browse;
        return EventResult::Continue;
    }
    let cursor = cursor.min(keys.len() - 1);

    match key {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('f') => app_state.screen = Screen::Browse,
        KeyCode::Up | KeyCode::Char('k') => {
            app_state.screen = Screen::Filters {
                cursor: cursor.saturating_sub(1),
            };
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app_state.screen = Screen::Filters {
                cursor: (cursor + 1).min(keys.len() - 1),
            };
        }
        KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => app_state.cycle_filter(keys[cursor], true),
        KeyCode::Left => app_state.cycle_filter(keys[cursor], false),
        KeyCode::Char('x') => {
            app_state.session.clear_filters();
            app_state.clamp_cursor();
        }
        _ => {}
    }
    EventResult::Continue
}

fn handle_form_event(app_state: &mut AppState, key: KeyCode, modifiers: KeyModifiers) -> EventResult {
    if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('s') {
        app_state.submit_form();
        return EventResult::Continue;
    }

    let Screen::Form(form) = &mut app_state.screen else {
        return EventResult::Continue;
    };
    match key {
        KeyCode::Esc => {
            app_state.screen = Screen::Browse;
            app_state.info("Edit cancelled");
        }
        KeyCode::Tab | KeyCode::Down => form.next(),
        KeyCode::BackTab | KeyCode::Up => form.prev(),
        KeyCode::Enter => {
            if form.cursor + 1 == form.fields.len() {
                app_state.submit_form();
            } else {
                form.next();
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = form.current_mut() {
                field.value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = form.current_mut() {
                field.value.push(c);
            }
        }
        _ => {}
    }
    EventResult::Continue
}

fn handle_confirm_event(app_state: &mut AppState, key: KeyCode) -> EventResult {
    let Screen::Confirm(action) = &app_state.screen else {
        return EventResult::Continue;
    };
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let action = action.clone();
            app_state.run_confirmed(action);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app_state.screen = Screen::Browse;
            app_state.info("Delete cancelled");
        }
        _ => {}
    }
    EventResult::Continue
}

fn handle_prompt_event(app_state: &mut AppState, key: KeyCode) -> EventResult {
    let Screen::Prompt(prompt) = &mut app_state.screen else {
        return EventResult::Continue;
    };
    match key {
        KeyCode::Enter => {
            let input = prompt.input.clone();
            app_state.finish_prompt(Some(input));
        }
        KeyCode::Esc => app_state.finish_prompt(None),
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) => prompt.input.push(c),
        _ => {}
    }
    EventResult::Continue
}
