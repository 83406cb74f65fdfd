//! User configuration: keybindings, panel settings and their TOML file.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/partree/config.toml`
//! (default `~/.config/partree/config.toml`).  A missing or unreadable file
//! means defaults; unknown commands and unparsable keys are skipped.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

// ───────────────────────────────────────── commands ──────────

/// All key-bindable commands of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    NextPage,
    PrevPage,
    Delete,
    EditMountPoint,
    Resize,
    Add,
    UndoAll,
    ShowChanges,
    Filter,
    ToggleDescription,
    OpenSettings,
    Quit,
}

impl Command {
    /// Ordered list of all commands (used for the controls menu).
    pub const ALL: &[Command] = &[
        Command::MoveUp,
        Command::MoveDown,
        Command::Expand,
        Command::Collapse,
        Command::NextPage,
        Command::PrevPage,
        Command::Delete,
        Command::EditMountPoint,
        Command::Resize,
        Command::Add,
        Command::UndoAll,
        Command::ShowChanges,
        Command::Filter,
        Command::ToggleDescription,
        Command::OpenSettings,
        Command::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Command::MoveUp => "Move Up",
            Command::MoveDown => "Move Down",
            Command::Expand => "Expand",
            Command::Collapse => "Collapse / Parent",
            Command::NextPage => "Next Page",
            Command::PrevPage => "Previous Page",
            Command::Delete => "Delete Device",
            Command::EditMountPoint => "Edit Mount Point",
            Command::Resize => "Resize",
            Command::Add => "Add",
            Command::UndoAll => "Undo All Changes",
            Command::ShowChanges => "Pending Changes",
            Command::Filter => "Filter",
            Command::ToggleDescription => "Toggle Description",
            Command::OpenSettings => "Open Settings",
            Command::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::Expand => "expand",
            Command::Collapse => "collapse",
            Command::NextPage => "next_page",
            Command::PrevPage => "prev_page",
            Command::Delete => "delete",
            Command::EditMountPoint => "edit_mount_point",
            Command::Resize => "resize",
            Command::Add => "add",
            Command::UndoAll => "undo_all",
            Command::ShowChanges => "show_changes",
            Command::Filter => "filter",
            Command::ToggleDescription => "toggle_description",
            Command::OpenSettings => "open_settings",
            Command::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    /// Terminals disagree on whether BackTab carries SHIFT, so it never
    /// compares SHIFT.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = if self.code == KeyCode::BackTab {
            MODIFIER_MASK - KeyModifiers::SHIFT
        } else {
            MODIFIER_MASK
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        let mut modifiers = event.modifiers & MODIFIER_MASK;
        if event.code == KeyCode::BackTab {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            code: event.code,
            modifiers,
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && self.code != KeyCode::BackTab {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::BackTab => "Shift+Tab".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::BackTab => "BackTab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        // A lone "+" is the plus key, not a separator.
        let parts: Vec<&str> = if s == "+" { vec!["+"] } else { s.split('+').collect() };
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case of single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// On-disk layout of the config file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    show_description: Option<bool>,
    panel_split_pct: Option<u16>,
    case_sensitive_filter: Option<bool>,
    /// command → keys, e.g. `delete = ["d", "Delete"]`.
    bindings: BTreeMap<String, Vec<String>>,
}

/// Allowed values of the table / description split.
pub const PANEL_SPLITS: &[u16] = &[50, 60, 70, 80];
const DEFAULT_PANEL_SPLIT: u16 = 60;

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Command, Vec<KeyBind>>,
    /// Show the description panel next to the table.
    pub show_description: bool,
    /// Share of the width given to the table when the description is shown.
    pub panel_split_pct: u16,
    /// Match the filter query case-sensitively.
    pub case_sensitive_filter: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            show_description: true,
            panel_split_pct: DEFAULT_PANEL_SPLIT,
            case_sensitive_filter: false,
        }
    }
}

impl AppConfig {
    /// Hard-coded default keybindings.
    pub fn default_bindings() -> HashMap<Command, Vec<KeyBind>> {
        use Command::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Expand, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Collapse, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(NextPage, vec![KeyBind::new(Tab, n), KeyBind::new(Char(']'), n)]);
        m.insert(
            PrevPage,
            vec![KeyBind::new(BackTab, n), KeyBind::new(Char('['), n)],
        );
        m.insert(Command::Delete, vec![KeyBind::new(Char('d'), n), KeyBind::new(KeyCode::Delete, n)]);
        m.insert(EditMountPoint, vec![KeyBind::new(Char('m'), n)]);
        m.insert(Resize, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Add, vec![KeyBind::new(Char('a'), n)]);
        m.insert(UndoAll, vec![KeyBind::new(Char('u'), n)]);
        m.insert(ShowChanges, vec![KeyBind::new(Char('c'), n)]);
        m.insert(Filter, vec![KeyBind::new(Char('/'), n)]);
        m.insert(ToggleDescription, vec![KeyBind::new(Char('i'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the command that matches a key event.  When multiple bindings
    /// match (shouldn't happen after conflict resolution), the one with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Command> {
        let mut best: Option<Command> = None;
        let mut best_mod_count = 0;

        for (&command, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(command);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `command`.  Removes this key from any other command
    /// to prevent conflicts, then appends it to `command`'s bindings.
    pub fn add_binding(&mut self, command: Command, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(command).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given command (e.g. `"↑/k"`).
    pub fn display_bindings(&self, command: Command) -> String {
        match self.bindings.get(&command) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, command: Command) -> String {
        match self.bindings.get(&command) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: page | {}: delete | {}: mount point | {}: changes | {}: filter | {}: settings",
            self.short_binding(Command::NextPage),
            self.short_binding(Command::Delete),
            self.short_binding(Command::EditMountPoint),
            self.short_binding(Command::ShowChanges),
            self.short_binding(Command::Filter),
            self.short_binding(Command::OpenSettings),
        )
    }

    /// Next value of the panel split, wrapping around.
    pub fn cycle_panel_split(&mut self) {
        let idx = PANEL_SPLITS
            .iter()
            .position(|p| *p == self.panel_split_pct)
            .unwrap_or(0);
        self.panel_split_pct = PANEL_SPLITS[(idx + 1) % PANEL_SPLITS.len()];
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring invalid config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_toml()?)?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }

    fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut config = Self::default();

        if let Some(v) = file.show_description {
            config.show_description = v;
        }
        if let Some(v) = file.panel_split_pct {
            config.panel_split_pct = v.clamp(PANEL_SPLITS[0], PANEL_SPLITS[PANEL_SPLITS.len() - 1]);
        }
        if let Some(v) = file.case_sensitive_filter {
            config.case_sensitive_filter = v;
        }

        for (key, keys) in &file.bindings {
            let Some(command) = Command::from_config_key(key) else {
                tracing::debug!("unknown command in config: {key}");
                continue;
            };
            let parsed: Vec<KeyBind> = keys.iter().filter_map(|k| KeyBind::parse(k.trim())).collect();
            if !parsed.is_empty() {
                config.bindings.insert(command, parsed);
            }
        }
        Ok(config)
    }

    fn to_toml(&self) -> anyhow::Result<String> {
        let bindings: BTreeMap<String, Vec<String>> = Command::ALL
            .iter()
            .filter_map(|&command| {
                let binds = self.bindings.get(&command)?;
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                Some((command.config_key().to_string(), keys))
            })
            .collect();
        let file = ConfigFile {
            show_description: Some(self.show_description),
            panel_split_pct: Some(self.panel_split_pct),
            case_sensitive_filter: Some(self.case_sensitive_filter),
            bindings,
        };
        let body = toml::to_string_pretty(&file)?;
        Ok(format!(
            "# partree configuration\n\
             # Key format: Ctrl+, Alt+, Shift+ prefixes; Up, Down, Left, Right, Enter,\n\
             # Esc, Tab, BackTab, Backspace, Delete, Home, End, PageUp, PageDown,\n\
             # Space, F1-F12 or a single character.\n\n{body}"
        ))
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/partree/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("partree").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_modifiers_and_special_keys() {
        assert_eq!(
            KeyBind::parse("Ctrl+Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::CONTROL | KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("D"), Some(KeyBind::new(KeyCode::Char('D'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn back_tab_matches_with_or_without_shift() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Command::PrevPage)
        );
        assert_eq!(
            config.match_key(key(KeyCode::BackTab, KeyModifiers::NONE)),
            Some(Command::PrevPage)
        );
    }

    #[test]
    fn rebinding_steals_the_key_from_other_commands() {
        let mut config = AppConfig::default();
        config.add_binding(Command::Quit, KeyBind::new(KeyCode::Char('d'), KeyModifiers::NONE));

        assert_eq!(
            config.match_key(key(KeyCode::Char('d'), KeyModifiers::NONE)),
            Some(Command::Quit)
        );
        assert_eq!(config.display_bindings(Command::Delete), "Del");
        config.reset_defaults();
        assert_eq!(config.display_bindings(Command::Delete), "d/Del");
    }

    #[test]
    fn toml_round_trip_keeps_settings() {
        let mut config = AppConfig::default();
        config.show_description = false;
        config.cycle_panel_split();
        config.add_binding(Command::Filter, KeyBind::new(KeyCode::Char('f'), KeyModifiers::CONTROL));

        let text = config.to_toml().expect("serialise");
        let back = AppConfig::from_toml(&text).expect("parse");
        assert_eq!(back, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = AppConfig::from_toml(
            "panel_split_pct = 5\n[bindings]\nquit = [\"x\"]\nteleport = [\"t\"]\ndelete = []\n",
        )
        .expect("parse");
        assert_eq!(config.panel_split_pct, 50);
        assert!(config.show_description);
        assert_eq!(config.display_bindings(Command::Quit), "x");
        assert_eq!(config.display_bindings(Command::Delete), "d/Del");
    }
}
