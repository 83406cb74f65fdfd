//! Maps key and mouse events to state mutations and button presses.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::actions::{Action, ActionResult};
use crate::config::{Command, KeyBind};
use crate::ui::layout::AppLayout;

use super::buttons::{
    Activation, AddButton, DeleteButton, DeviceButton, MountPointButton, ResizeButton, ShowChangesButton,
    UndoAllButton,
};
use super::pages::Page;
use super::settings::{save_config, SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState, Dialog};

/// Total selectable rows in the controls submenu (commands + "Reset").
pub fn controls_item_count() -> usize {
    Command::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Only Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // A status message lasts until the next key.
    state.ctx.status = None;

    if !state.dialogs.is_empty() {
        handle_dialog_key(state, key);
        return;
    }

    match state.active_view {
        ActiveView::Table => handle_table_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Table view (configurable bindings) ──────────────────────────

fn handle_table_key(state: &mut AppState, key: KeyEvent) {
    if state.filter.editing && handle_filter_key(state, key) {
        return;
    }

    match key.code {
        KeyCode::Home => {
            let rows = state.table_rows();
            state.select_index(&rows, 0);
            return;
        }
        KeyCode::End => {
            let rows = state.table_rows();
            state.select_index(&rows, rows.len().saturating_sub(1));
            return;
        }
        KeyCode::Enter => {
            toggle_selected(state);
            return;
        }
        KeyCode::Esc if state.filter.is_active() => {
            state.filter.clear();
            state.sync_selection();
            return;
        }
        _ => {}
    }

    let Some(command) = state.config.match_key(key) else {
        return;
    };
    tracing::trace!("command {command:?}");

    match command {
        Command::Quit => state.should_quit = true,
        Command::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Command::MoveUp => {
            let rows = state.table_rows();
            let index = state.table_state.selected.saturating_sub(1);
            state.select_index(&rows, index);
        }
        Command::MoveDown => {
            let rows = state.table_rows();
            let index = (state.table_state.selected + 1).min(rows.len().saturating_sub(1));
            state.select_index(&rows, index);
        }
        Command::Expand => handle_expand(state),
        Command::Collapse => handle_collapse(state),
        Command::NextPage => {
            let page = state.page().next();
            switch_page(state, page);
        }
        Command::PrevPage => {
            let page = state.page().prev();
            switch_page(state, page);
        }
        Command::Delete => press(state, &DeleteButton),
        Command::EditMountPoint => press(state, &MountPointButton),
        Command::Resize => press(state, &ResizeButton),
        Command::Add => press(state, &AddButton),
        Command::UndoAll => {
            let activation = UndoAllButton.activation(&state.ctx);
            apply_activation(state, activation);
        }
        Command::ShowChanges => {
            let activation = ShowChangesButton.activation(&state.ctx);
            apply_activation(state, activation);
        }
        Command::Filter => state.filter.editing = true,
        Command::ToggleDescription => {
            state.config.show_description = !state.config.show_description;
            save_config(state);
        }
    }
}

/// Keys typed while the filter prompt is open.  Returns `false` for keys
/// that should still reach the table.
fn handle_filter_key(state: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => state.filter.clear(),
        KeyCode::Enter => state.filter.editing = false,
        KeyCode::Backspace => {
            state.filter.query.pop();
        }
        KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            state.filter.query.push(ch);
        }
        _ => return false,
    }
    state.sync_selection();
    true
}

fn switch_page(state: &mut AppState, page: Page) {
    state.ctx.ui.page = page;
    state.table_state.selected = 0;
    state.table_state.offset = 0;
    state.sync_selection();
    tracing::debug!("switched to page {}", page.label());
}

/// Open a closed row, or step into an open one.
fn handle_expand(state: &mut AppState) {
    let rows = state.table_rows();
    let index = state.table_state.selected;
    let Some(row) = rows.get(index) else {
        return;
    };
    if !row.has_children || state.filter.is_active() {
        return;
    }
    if row.open {
        state.select_index(&rows, index + 1);
    } else {
        let page = state.page();
        state.ctx.ui.set_open(page, row.id, true);
    }
}

/// Close an open row, or go to the parent row.
fn handle_collapse(state: &mut AppState) {
    let rows = state.table_rows();
    let index = state.table_state.selected;
    let Some(row) = rows.get(index) else {
        return;
    };
    if row.has_children && row.open && !state.filter.is_active() {
        let page = state.page();
        state.ctx.ui.set_open(page, row.id, false);
        return;
    }
    let depth = row.depth;
    if let Some(parent) = rows[..index].iter().rposition(|r| r.depth < depth) {
        state.select_index(&rows, parent);
    }
}

fn toggle_selected(state: &mut AppState) {
    if state.filter.is_active() {
        return;
    }
    let rows = state.table_rows();
    if let Some(row) = rows.get(state.table_state.selected) {
        if row.has_children {
            let page = state.page();
            state.ctx.ui.set_open(page, row.id, !row.open);
        }
    }
}

// ── Buttons, actions and dialogs ────────────────────────────────

fn press(state: &mut AppState, button: &dyn DeviceButton) {
    let activation = button.activate(&state.ctx, state.selected_target());
    apply_activation(state, activation);
}

fn apply_activation(state: &mut AppState, activation: Activation) {
    let dialog = match activation {
        Activation::Confirm { message, action } => Dialog::Confirm { message, action },
        Activation::Input {
            title,
            initial,
            on_submit,
        } => Dialog::Input {
            title,
            value: initial,
            on_submit,
        },
        Activation::Summary { title, lines } => Dialog::Summary { title, lines },
        Activation::Error(m) => Dialog::Error(m),
        Activation::Warning(m) => Dialog::Warning(m),
    };
    state.dialogs.push_back(dialog);
}

/// Run an action; on `Finish` the table is rebuilt from the current graph.
fn run_action(state: &mut AppState, mut action: Box<dyn Action>) {
    match action.run(&mut state.ctx) {
        ActionResult::Finish => state.refresh(),
        ActionResult::Abort => tracing::debug!("action aborted"),
    }
    state.show_notices();
}

fn handle_dialog_key(state: &mut AppState, key: KeyEvent) {
    let Some(dialog) = state.dialogs.pop_front() else {
        return;
    };
    match dialog {
        Dialog::Confirm { message, action } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => run_action(state, action),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
            _ => state.dialogs.push_front(Dialog::Confirm { message, action }),
        },
        Dialog::Input {
            title,
            mut value,
            on_submit,
        } => match key.code {
            KeyCode::Enter => run_action(state, on_submit(value)),
            KeyCode::Esc => {}
            code => {
                match code {
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    KeyCode::Char(ch)
                        if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
                    {
                        value.push(ch);
                    }
                    _ => {}
                }
                state.dialogs.push_front(Dialog::Input {
                    title,
                    value,
                    on_submit,
                });
            }
        },
        other => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q') => {}
            _ => state.dialogs.push_front(other),
        },
    }
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Table;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Table;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Command::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                state.config.reset_defaults();
                save_config(state);
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&command) = Command::ALL.get(state.controls_selected) {
                state.config.bindings.insert(command, Vec::new());
                save_config(state);
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Esc cancels rebinding.
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    let Some(&command) = Command::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    let bind = KeyBind::from_key_event(key);
    tracing::debug!("binding {} to {command:?}", bind.display());
    state.config.add_binding(command, bind);
    save_config(state);
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Table || !state.dialogs.is_empty() {
        return;
    }

    let layout = AppLayout::from_area(
        state.terminal_area,
        state.config.show_description,
        state.config.panel_split_pct,
    );

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(page) = layout.tab_at(mouse.column, mouse.row) {
                switch_page(state, page);
                return;
            }
            if !point_in_rect(layout.table_area, mouse.column, mouse.row) {
                return;
            }
            // Border and header row come before the first device row.
            let first_row = layout.table_area.y.saturating_add(2);
            let last_row = layout
                .table_area
                .y
                .saturating_add(layout.table_area.height.saturating_sub(1));
            if mouse.row < first_row || mouse.row >= last_row {
                return;
            }
            let clicked = (mouse.row - first_row) as usize + state.table_state.offset;
            let rows = state.table_rows();
            if clicked >= rows.len() {
                return;
            }
            if clicked == state.table_state.selected {
                toggle_selected(state);
            } else {
                state.select_index(&rows, clicked);
            }
        }
        MouseEventKind::ScrollDown => {
            let rows = state.table_rows();
            let index = (state.table_state.selected + 1).min(rows.len().saturating_sub(1));
            state.select_index(&rows, index);
        }
        MouseEventKind::ScrollUp => {
            let rows = state.table_rows();
            let index = state.table_state.selected.saturating_sub(1);
            state.select_index(&rows, index);
        }
        _ => {}
    }
}

fn point_in_rect(area: ratatui::layout::Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
