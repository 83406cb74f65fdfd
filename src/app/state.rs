//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::VecDeque;

use ratatui::layout::Rect;

use crate::actions::Action;
use crate::config::AppConfig;
use crate::core::entry::{DeviceTableEntry, EntryTarget, RowId, TableItem};
use crate::core::search::filter_entries;
use crate::ui::columns::BoundColumn;
use crate::ui::device_table::{flatten, DeviceTableState, TableRow};

use super::buttons::InputHandler;
use super::context::{AppContext, Notice};
use super::pages::Page;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Table,
    SettingsMenu,
    ControlsSubmenu,
}

/// Modal popup on top of the table.
pub enum Dialog {
    Error(String),
    Warning(String),
    Confirm {
        message: String,
        action: Box<dyn Action>,
    },
    Input {
        title: &'static str,
        value: String,
        on_submit: InputHandler,
    },
    Summary {
        title: &'static str,
        lines: Vec<String>,
    },
}

impl From<Notice> for Dialog {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::Error(m) => Dialog::Error(m),
            Notice::Warning(m) => Dialog::Warning(m),
        }
    }
}

/// Table filter typed after `/`.
#[derive(Debug, Default)]
pub struct FilterState {
    pub query: String,
    /// Keystrokes go to the query.
    pub editing: bool,
}

impl FilterState {
    /// The table is flattened and filtered.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.editing = false;
    }
}

/// Top-level application state.
pub struct AppState {
    /// Storage, per-page UI state and queued notices.
    pub ctx: AppContext,
    /// User-configurable keybindings and panel settings.
    pub config: AppConfig,
    /// Widget-level state (selected index, scroll).
    pub table_state: DeviceTableState,
    pub filter: FilterState,
    /// Popups waiting to be shown; the front one is visible.
    pub dialogs: VecDeque<Dialog>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the command at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Last known terminal size, for mouse hit testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(ctx: AppContext, config: AppConfig) -> Self {
        let mut state = Self {
            ctx,
            config,
            table_state: DeviceTableState::default(),
            filter: FilterState::default(),
            dialogs: VecDeque::new(),
            should_quit: false,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            terminal_area: Rect::default(),
        };
        state.sync_selection();
        state
    }

    pub fn page(&self) -> Page {
        self.ctx.ui.page
    }

    /// Rows of the current page: the entry trees of its roots, or the
    /// filtered flat list while a filter is active.
    pub fn table_items(&self) -> Vec<TableItem> {
        let page = self.page();
        let graph = self.ctx.storage.current();
        let system = self.ctx.storage.system();
        let columns: Vec<BoundColumn<'_>> = page.columns().iter().map(|c| c.bind(system)).collect();

        if self.filter.is_active() {
            let roots = page.roots(graph, true);
            let entries: Vec<&DeviceTableEntry<'_>> = roots.iter().flat_map(|r| r.all_entries()).collect();
            filter_entries(&entries, &self.filter.query, self.config.case_sensitive_filter)
                .into_iter()
                .map(|entry| entry.flat_item(&columns))
                .collect()
        } else {
            let open_state = self.ctx.ui.open_state(page);
            page.roots(graph, page.full_names())
                .iter()
                .map(|root| root.table_item(&columns, open_state))
                .collect()
        }
    }

    /// Visible rows of the current page.
    pub fn table_rows(&self) -> Vec<TableRow> {
        flatten(&self.table_items())
    }

    /// The device or fstab record behind the selected row.
    pub fn selected_target(&self) -> Option<EntryTarget<'_>> {
        let graph = self.ctx.storage.current();
        match self.ctx.ui.selected(self.page())? {
            RowId::Device(sid) => graph.find_device(sid).map(EntryTarget::Device),
            RowId::Fstab(index) => graph
                .fstab_entries()
                .get(index)
                .map(|entry| EntryTarget::Fstab { index, entry }),
        }
    }

    /// Select the row at `index` of `rows`.
    pub fn select_index(&mut self, rows: &[TableRow], index: usize) {
        let page = self.page();
        match rows.get(index) {
            Some(row) => {
                self.table_state.selected = index;
                self.ctx.ui.select(page, Some(row.id));
            }
            None => {
                self.table_state.selected = 0;
                self.ctx.ui.select(page, None);
            }
        }
    }

    /// Point the widget at the selected row id.  When that row is gone the
    /// row now at the old position is selected instead.
    pub fn sync_selection(&mut self) {
        let rows = self.table_rows();
        let found = self
            .ctx
            .ui
            .selected(self.page())
            .and_then(|id| rows.iter().position(|r| r.id == id));
        match found {
            Some(index) => self.table_state.selected = index,
            None => {
                let index = self.table_state.selected.min(rows.len().saturating_sub(1));
                self.select_index(&rows, index);
            }
        }
    }

    /// Rebuild after the current graph changed.
    pub fn refresh(&mut self) {
        let graph = self.ctx.storage.current();
        let fstab_len = graph.fstab_entries().len();
        self.ctx.ui.retain_rows(|id| match id {
            RowId::Device(sid) => graph.contains(sid),
            RowId::Fstab(index) => index < fstab_len,
        });
        tracing::debug!("table refreshed, {} devices in current graph", graph.len());
        self.sync_selection();
    }

    /// Move queued notices into popups.
    pub fn show_notices(&mut self) {
        let notices = self.ctx.take_notices();
        self.dialogs.extend(notices.into_iter().map(Dialog::from));
    }
}
