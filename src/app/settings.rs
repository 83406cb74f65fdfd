//! Entries of the settings popup.  The handler activates them and the popup
//! widget renders them from the same table.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle read and written through accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. } | Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }
}

/// Write the config file, reporting a failure in the status bar.
pub fn save_config(state: &mut AppState) {
    if let Err(e) = state.config.save() {
        tracing::warn!("could not save config: {e:#}");
        state.ctx.status = Some("Could not save settings".into());
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Description Panel",
        get: |s| s.config.show_description,
        set: |s, v| {
            s.config.show_description = v;
            save_config(s);
        },
    },
    SettingsItem::Cycle {
        label: "Panel Split",
        value: |s| format!("{}%", s.config.panel_split_pct),
        cycle: |s| {
            s.config.cycle_panel_split();
            save_config(s);
            s.ctx.status = Some(format!("Panel split: {}%", s.config.panel_split_pct));
        },
    },
    SettingsItem::Toggle {
        label: "Case-Sensitive Filter",
        get: |s| s.config.case_sensitive_filter,
        set: |s, v| {
            s.config.case_sensitive_filter = v;
            save_config(s);
            s.sync_selection();
        },
    },
];
