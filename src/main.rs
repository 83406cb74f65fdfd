//! A tree-based TUI to inspect and edit a storage setup.
//!
//! Run the binary to browse the built-in demo system, or pass
//! `--devicegraph FILE` to load a probed graph.  `--dump` prints a page as
//! plain text and exits.

mod actions;
mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::{
    context::AppContext,
    event::{spawn_event_reader, AppEvent},
    handler,
    pages::Page,
    state::{ActiveView, AppState},
};
use crate::core::{description::describe, Devicegraph, StorageManager};
use crate::ui::{
    description::DescriptionPanel,
    device_table::{plain_text, DeviceTable},
    layout::AppLayout,
    popup,
    tabs::PageTabs,
    theme::Theme,
};

/// Shown when no `--devicegraph` is given.
const DEMO_DEVICEGRAPH: &str = include_str!("../demos/devicegraph.json");

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Inspect and edit disks, partitions, RAID, LVM and Btrfs")]
struct Cli {
    /// Devicegraph JSON describing the probed system (defaults to a demo system).
    #[arg(long, value_name = "FILE")]
    devicegraph: Option<PathBuf>,

    /// Devicegraph JSON to start editing from instead of the probed system.
    #[arg(long, value_name = "FILE")]
    staging: Option<PathBuf>,

    /// Page shown first.
    #[arg(long, value_enum, default_value_t = Page::System)]
    page: Page,

    /// Print the page as plain text and exit.
    #[arg(long)]
    dump: bool,

    /// Write logs to this file (the terminal is taken by the UI).
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ───────────────────────────────────────── setup ─────────────

/// Logs go to `--log-file` when given, to stderr in dump mode, and nowhere
/// otherwise.  The returned guard flushes the file writer on drop.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(writer)
            .with_ansi(false)
            .init();
        return Ok(Some(guard));
    }

    if cli.dump {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr) // never pollute stdout
            .init();
    }
    Ok(None)
}

fn load_graph(path: &Path) -> Result<Devicegraph> {
    Devicegraph::load(path).with_context(|| format!("cannot load devicegraph {}", path.display()))
}

fn load_storage(cli: &Cli) -> Result<StorageManager> {
    let system = match &cli.devicegraph {
        Some(path) => load_graph(path)?,
        None => Devicegraph::from_json(DEMO_DEVICEGRAPH).context("built-in devicegraph is invalid")?,
    };
    Ok(match &cli.staging {
        Some(path) => StorageManager::with_staging(system, load_graph(path)?),
        None => StorageManager::new(system),
    })
}

/// The table of the context's current page as plain text.
fn dump_page(ctx: AppContext) -> String {
    let state = AppState::new(ctx, config::AppConfig::default());
    plain_text(state.page().columns(), &state.table_rows())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let layout = AppLayout::from_area(
        frame.area(),
        state.config.show_description,
        state.config.panel_split_pct,
    );
    let page = state.page();

    frame.render_widget(
        PageTabs {
            current: page,
            pending: state.ctx.storage.pending_changes().len(),
        },
        layout.tabs_area,
    );

    let title = if state.filter.is_active() {
        format!(" {} (filter: {}) ", page.label(), state.filter.query.trim())
    } else {
        format!(" {} ", page.label())
    };
    let table_block = Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    let rows = state.table_rows();
    let empty_text = if state.filter.is_active() {
        "No matching devices"
    } else {
        "No devices"
    };
    let table = DeviceTable::new(page.columns(), &rows)
        .block(table_block)
        .empty_text(empty_text);
    frame.render_stateful_widget(table, layout.table_area, &mut state.table_state);

    if let Some(area) = layout.description_area {
        let sections = state
            .selected_target()
            .map(|target| describe(state.ctx.storage.current(), target))
            .unwrap_or_default();
        let block = Block::default()
            .title(" Description ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        frame.render_widget(DescriptionPanel::new(&sections).block(block), area);
    }

    let hint = state.config.status_bar_hint();
    let status = if state.filter.editing {
        Paragraph::new(format!("/{}█", state.filter.query)).style(Theme::command_input_style())
    } else {
        let text = match state.active_view {
            ActiveView::Table => state.ctx.status.as_deref().unwrap_or(&hint),
            ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
        };
        Paragraph::new(text).style(Theme::status_bar_style())
    };
    frame.render_widget(status, layout.status_area);

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(popup::SettingsPopup { state }, frame.area());
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Table => {}
    }

    if let Some(dialog) = state.dialogs.front() {
        frame.render_widget(popup::DialogPopup { dialog }, frame.area());
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let storage = load_storage(&cli)?;
    tracing::info!(
        "{} devices, {} fstab entries",
        storage.system().len(),
        storage.system().fstab_entries().len()
    );
    let mut ctx = AppContext::new(storage);
    ctx.ui.page = cli.page;

    // ── dump mode ─────────────────────────────────────────────
    if cli.dump {
        print!("{}", dump_page(ctx));
        return Ok(());
    }

    let mut state = AppState::new(ctx, config::AppConfig::load());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(200));

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &mut state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize => {}
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let pending = state.ctx.storage.pending_changes();
    if !pending.is_empty() {
        tracing::info!("quit with {} pending changes", pending.len());
        eprintln!("{} pending changes were not committed:", pending.len());
        for change in &pending {
            eprintln!("  {}", change.summary());
        }
    }

    Ok(())
}
