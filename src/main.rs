use gearopt_tui::app::AppState;
use gearopt_tui::cli::{init_config, run_command, set_profession, Cli, Commands};
use gearopt_tui::config::{Config, StoreKind};
use gearopt_tui::extras::{Catalog, ExtrasStore, MemoryStore, SelectionBridge};
use gearopt_tui::i18n::Translations;
use gearopt_tui::shortcuts::{ShortcutMap, ShortcutRouter};
use gearopt_tui::storage::{SqliteStore, UiCache};
use gearopt_tui::ui;
use gearopt_tui::ui::theme::Theme;
use gearopt_tui::utils::paths::{
    get_config_path, get_crash_log_path, get_database_path, get_logs_dir,
};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::panic;
use tracing_subscriber::EnvFilter;

/// Install a panic hook that writes crash information to a log file
fn install_crash_handler() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Ok(crash_log_path) = get_crash_log_path() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut crash_report = format!("=== CRASH at {timestamp} ===\n");

            if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            }

            if let Some(location) = panic_info.location() {
                crash_report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }

            crash_report.push_str(&format!(
                "\nBacktrace:\n{}\n\n",
                std::backtrace::Backtrace::force_capture()
            ));

            if let Some(parent) = crash_log_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log_path)
            {
                let _ = file.write_all(crash_report.as_bytes());
                eprintln!("\nCrash logged to: {}", crash_log_path.display());
            }
        }

        default_hook(panic_info);
    }));
}

/// Initialize file-based logging for the TUI mode.
///
/// Logs go to ~/.gearopt/logs/gearopt.log, rolled daily. The level follows
/// RUST_LOG (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {e}");
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "gearopt.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

/// Subcommands print their results to stdout, so logs go to stderr.
fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_store(config: &Config) -> Result<Box<dyn ExtrasStore>> {
    let store: Box<dyn ExtrasStore> = match config.store {
        StoreKind::Sqlite => Box::new(SqliteStore::open_default()?),
        StoreKind::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

fn load_translations(config: &Config) -> Translations {
    let Some(path) = &config.translations_path else {
        return Translations::default();
    };
    Translations::load(path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring translations: {e:#}");
        Translations::default()
    })
}

fn main() -> Result<()> {
    install_crash_handler();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Extras(command)) => {
            init_stderr_logging();

            let catalog = Catalog::load_or_bundled(config.catalog_path.as_deref())?;
            let translations = load_translations(&config);
            let mut bridge = SelectionBridge::new(open_store(&config)?);
            let mut stdout = io::stdout().lock();
            run_command(command, &catalog, &mut bridge, &translations, &mut stdout)?;
        }
        Some(Commands::Profession { name }) => {
            init_stderr_logging();

            let catalog = Catalog::load_or_bundled(config.catalog_path.as_deref())?;
            let mut cache = UiCache::load().unwrap_or_default();
            set_profession(&mut cache, &catalog, &name, &mut io::stdout().lock())?;
            cache.save()?;
        }
        Some(Commands::InitConfig { force }) => {
            init_stderr_logging();
            init_config(&get_config_path()?, force, &mut io::stdout().lock())?;
        }
        None => {
            // Guard must be kept alive for the duration of the app
            let _log_guard = init_file_logging();

            tracing::info!("gearopt starting");

            let catalog = Catalog::load_or_bundled(config.catalog_path.as_deref())?;
            tracing::info!(version = %catalog.version(), "Catalog loaded");

            let shortcuts = ShortcutRouter::new(ShortcutMap::from_config(&config.shortcuts));
            let state = AppState::new(
                catalog,
                open_store(&config)?,
                load_translations(&config),
                Theme::from_config(&config),
                shortcuts,
                UiCache::load().ok(),
            );

            // The subcommands write the same database; watch it for their changes.
            let database_path = match config.store {
                StoreKind::Sqlite => get_database_path().ok(),
                StoreKind::Memory => None,
            };
            let state = ui::run_tui(state, config.catalog_path.clone(), database_path)?;

            if let Err(e) = state.ui_cache().save() {
                tracing::warn!("Failed to save UI cache: {e:#}");
            }
            tracing::info!("gearopt exiting gracefully");
        }
    }

    Ok(())
}
