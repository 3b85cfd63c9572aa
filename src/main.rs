use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard_table::config::TableSchema;
use dashboard_table::error::ConfigError;
use dashboard_table::fetch::{RowFetcher, Source};
use dashboard_table::loader::{self, Format};
use dashboard_table::{Column, DataTable, Filter, KeyAction, TableConfig};

/// Browse a JSON or CSV record set in a searchable, paginated table.
#[derive(Parser, Debug)]
#[command(name = "dtable", version, about)]
struct Args {
    /// File path, http(s) URL, or - for stdin
    #[arg(default_value = "-")]
    source: String,

    /// Input format (default: from the file extension, else JSON)
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// JSON table schema
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Row keys to show as columns, comma-separated
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Row keys searched, comma-separated (default: the shown columns)
    #[arg(long = "search", value_delimiter = ',')]
    search_fields: Vec<String>,

    /// Hide the search box
    #[arg(long)]
    no_search: bool,

    /// Filter as NAME or NAME=OPTION,...; options default to the values found
    #[arg(long = "filter", value_name = "SPEC")]
    filters: Vec<Filter>,

    /// Rows per page
    #[arg(long)]
    max_rows: Option<usize>,

    /// Table title
    #[arg(long)]
    title: Option<String>,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
/// Disables raw mode and leaves alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Log to a file; the terminal belongs to the TUI.
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Schema file, then command-line overrides.
fn build_config(args: &Args, source: &Source) -> Result<TableConfig, ConfigError> {
    let mut config = match &args.schema {
        Some(path) => TableSchema::load(path)?.into_config(),
        None => TableConfig::default(),
    };
    if !args.columns.is_empty() {
        config.headers = args
            .columns
            .iter()
            .map(|key| Column::new(key.as_str(), key.as_str()))
            .collect();
    }
    if !args.search_fields.is_empty() {
        config.searchable_fields = Some(args.search_fields.clone());
    }
    if args.no_search {
        config.searchable = false;
    }
    config.filters.extend(args.filters.iter().cloned());
    if let Some(max_rows) = args.max_rows {
        config.max_rows = max_rows;
    }
    if let Some(title) = &args.title {
        config.title = Some(title.clone());
    }
    if config.title.is_none() {
        config.title = Some(source.label());
    }
    Ok(config)
}

const HELP: &str = "/ search  Tab focus  f filter  ←/→ page  Enter open  r reload  q quit";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    // Read stdin before initializing TUI
    let source = if args.source == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Source::Text(input)
    } else {
        Source::from_arg(&args.source)
    };
    let format = args.format.unwrap_or(match &source {
        Source::File(path) => Format::detect(path),
        _ => Format::Json,
    });
    let config = build_config(&args, &source)?;

    let mut fetcher = RowFetcher::new(source, format);
    fetcher.refetch()?;
    info!(source = %fetcher.source().label(), ?format, "loading");

    let status: Rc<RefCell<String>> = Rc::new(RefCell::new(String::new()));
    let row_status = Rc::clone(&status);
    let add_status = Rc::clone(&status);
    let template = config.clone();
    let mut table = DataTable::new(config, Vec::new())
        .loading(true)
        .on_row_click(move |row, index| {
            let first = row.keys().next().map(|k| row.raw(k)).unwrap_or_default();
            *row_status.borrow_mut() = format!("Opened record {}: {}", index + 1, first);
        })
        .on_add_button_click(move || {
            *add_status.borrow_mut() = "Adding records is not supported here".to_string();
        });

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let result = run(&mut terminal, &mut table, &template, &mut fetcher, &status);

    // Clear terminal before exit
    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    table: &mut DataTable<'_>,
    template: &TableConfig,
    fetcher: &mut RowFetcher,
    status: &RefCell<String>,
) -> anyhow::Result<()> {
    loop {
        if let Some(result) = fetcher.poll() {
            match result {
                Ok(rows) => {
                    *status.borrow_mut() = format!("Loaded {} records", rows.len());
                    loader::apply_rows(table, template, rows);
                }
                // Keep whatever rows we had
                Err(e) => {
                    warn!(error = %e, "keeping previous rows");
                    *status.borrow_mut() = format!("Load failed: {}", e);
                }
            }
            table.set_loading(false);
        }
        table.tick();

        terminal.draw(|frame| {
            let [body, footer] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
            table.render(frame, body);

            let message = status.borrow();
            let line = if message.is_empty() {
                Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray)))
            } else {
                Line::from(vec![
                    Span::styled(message.as_str(), Style::default().fg(Color::Cyan)),
                    Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
                    Span::styled(HELP, Style::default().fg(Color::DarkGray)),
                ])
            };
            frame.render_widget(Paragraph::new(line), footer);
        })?;

        // Poll with 250ms timeout for responsive feel
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if table.handle_key(&key) != KeyAction::Unhandled {
                    continue;
                }
                match key.code {
                    // Quit on 'q' or Ctrl+C
                    KeyCode::Char('q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('r') => {
                        fetcher.refetch()?;
                        table.set_loading(true);
                        *status.borrow_mut() = "Reloading…".to_string();
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                table.handle_mouse(&mouse);
            }
            _ => {}
        }
    }
    Ok(())
}
