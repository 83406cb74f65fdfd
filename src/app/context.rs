//! Application context handed to buttons and actions.
//!
//! Owns the storage manager and the per-page UI state (which rows are open,
//! which row is selected).  Actions report problems by queueing notices here;
//! the input handler turns them into popups after the action returns.

use std::collections::HashMap;

use crate::core::entry::RowId;
use crate::core::storage::StorageManager;

use super::pages::Page;

/// Message an action wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

/// Open/closed rows and selection, kept per page.
#[derive(Debug)]
pub struct UiState {
    pub page: Page,
    open: [HashMap<RowId, bool>; Page::ALL.len()],
    selected: [Option<RowId>; Page::ALL.len()],
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            open: std::array::from_fn(|_| HashMap::new()),
            selected: [None; Page::ALL.len()],
        }
    }
}

impl UiState {
    pub fn open_state(&self, page: Page) -> &HashMap<RowId, bool> {
        &self.open[page.index()]
    }

    pub fn set_open(&mut self, page: Page, id: RowId, open: bool) {
        self.open[page.index()].insert(id, open);
    }

    pub fn selected(&self, page: Page) -> Option<RowId> {
        self.selected[page.index()]
    }

    pub fn select(&mut self, page: Page, id: Option<RowId>) {
        self.selected[page.index()] = id;
    }

    /// Forget rows that no longer exist in any page.
    pub fn retain_rows(&mut self, exists: impl Fn(RowId) -> bool) {
        for map in &mut self.open {
            map.retain(|id, _| exists(*id));
        }
        for selected in &mut self.selected {
            if selected.is_some_and(|id| !exists(id)) {
                *selected = None;
            }
        }
    }
}

pub struct AppContext {
    pub storage: StorageManager,
    pub ui: UiState,
    notices: Vec<Notice>,
    /// Set by finished actions; shown in the status bar.
    pub status: Option<String>,
}

impl AppContext {
    pub fn new(storage: StorageManager) -> Self {
        Self {
            storage,
            ui: UiState::default(),
            notices: Vec::new(),
            status: None,
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.notices.push(Notice::Error(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notices.push(Notice::Warning(message.into()));
    }

    /// Queued notices, oldest first; the queue is left empty.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::devicegraph::Devicegraph;

    #[test]
    fn rows_are_open_until_closed_per_page() {
        let mut ui = UiState::default();
        let id = RowId::Device(4);
        assert_eq!(ui.open_state(Page::System).get(&id), None);

        ui.set_open(Page::System, id, false);
        assert_eq!(ui.open_state(Page::System).get(&id), Some(&false));
        assert_eq!(ui.open_state(Page::HardDisks).get(&id), None);
    }

    #[test]
    fn retain_rows_drops_stale_selection_and_open_state() {
        let mut ui = UiState::default();
        ui.select(Page::Lvm, Some(RowId::Device(7)));
        ui.select(Page::Fstab, Some(RowId::Fstab(0)));
        ui.set_open(Page::Lvm, RowId::Device(7), false);

        ui.retain_rows(|id| id != RowId::Device(7));
        assert_eq!(ui.selected(Page::Lvm), None);
        assert_eq!(ui.selected(Page::Fstab), Some(RowId::Fstab(0)));
        assert!(ui.open_state(Page::Lvm).is_empty());
    }

    #[test]
    fn notices_are_drained_in_order() {
        let mut ctx = AppContext::new(StorageManager::new(Devicegraph::default()));
        ctx.error("first");
        ctx.warning("second");
        assert_eq!(
            ctx.take_notices(),
            vec![Notice::Error("first".into()), Notice::Warning("second".into())]
        );
        assert!(ctx.take_notices().is_empty());
    }
}
