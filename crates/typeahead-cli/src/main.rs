use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typeahead_core::error::ExitCode;
use typeahead_core::{AppConfig, SuggestionClient, TypeaheadError};
use typeahead_tui::app::App;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "typeahead",
    about = "Search-as-you-type suggestions from a remote autocomplete service",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Suggestion service base URL (overrides `service.base_url`).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Quiet period after the last keystroke, in milliseconds.
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Number of suggestions to request.
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Config file to use instead of `~/.config/typeahead/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format.
    /// Also enabled by setting TYPEAHEAD_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch suggestions for one query and print them.
    Query { text: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location.
    Path,
    /// Print the effective config.
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("TYPEAHEAD_JSON").as_deref() == Ok("1");

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let load = || match load_config(&config_path, &cli) {
        Ok(config) => config,
        Err(e) => fail(&e, "invalid_config", json_output),
    };

    match &cli.command {
        None => run_interactive(load()),

        Some(Commands::Query { text }) => {
            let config = load();
            init_logging(&config, LogTarget::Stderr)?;
            run_query(&config, text, json_output, start)
        }

        // `path` and `init` must work even when the current file is broken.
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => run_config_path(&config_path, json_output),
            ConfigAction::Show => run_config_show(&load(), json_output),
            ConfigAction::Init { force } => run_config_init(&config_path, *force, json_output),
        },
    }
}

/// Config file plus command-line overrides, validated.
fn load_config(path: &Path, cli: &Cli) -> typeahead_core::Result<AppConfig> {
    let mut config = AppConfig::load_from(path).map_err(|e| match e {
        TypeaheadError::Config(msg) => {
            TypeaheadError::Config(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Report `e` in the selected output format and exit with its code.
fn fail(e: &TypeaheadError, kind: &str, json_output: bool) -> ! {
    if json_output {
        let _ = print_json(&serde_json::json!({
            "status": "error",
            "error": kind,
            "message": e.to_string(),
        }));
    } else {
        eprintln!("Error: {e}");
    }
    std::process::exit(e.exit_code() as i32);
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.service.base_url = url.clone();
    }
    if let Some(ms) = cli.debounce_ms {
        config.input.debounce_ms = ms;
    }
    if let Some(size) = cli.size {
        config.service.page_size = size;
    }
}

// ─── Logging ─────────────────────────────────────────────────────────────────

enum LogTarget {
    /// The TUI owns the terminal, so logs go to `config.log_path()`.
    File,
    Stderr,
}

fn init_logging(config: &AppConfig, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_env("TYPEAHEAD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match target {
        LogTarget::File => {
            let path = config.log_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

// ─── Commands ────────────────────────────────────────────────────────────────

fn run_interactive(config: AppConfig) -> Result<()> {
    init_logging(&config, LogTarget::File)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let client = SuggestionClient::from_config(&config.service)?;
    let label = client.base_url().to_string();
    tracing::info!(
        service = %label,
        debounce_ms = config.input.debounce_ms,
        page_size = config.service.page_size,
        discard_stale = config.input.discard_stale_responses,
        "loaded typeahead config"
    );

    let mut app = App::new(Arc::new(client), config.controller_options(), label);
    typeahead_tui::run_tui(&mut app)
}

fn run_query(config: &AppConfig, text: &str, json_output: bool, start: Instant) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let client = SuggestionClient::from_config(&config.service)?;

    let result = runtime.block_on(client.fetch_suggestions(text, config.service.page_size));
    let dur = start.elapsed().as_millis();

    match result {
        Ok(suggestions) => {
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "query": text, "suggestions": suggestions },
                    "meta": { "duration_ms": dur, "service": client.base_url() }
                }))?;
            } else if suggestions.is_empty() {
                println!("No suggestions.");
            } else {
                for suggestion in &suggestions {
                    println!("{suggestion}");
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!(query = text, duration_ms = dur as u64, error = %e, "query failed");
            fail(&e, "request_failed", json_output)
        }
    }
}

fn run_config_path(config_path: &Path, json_output: bool) -> Result<()> {
    if json_output {
        print_json(&serde_json::json!({"status":"ok","data":{"path":config_path}}))?;
    } else {
        println!("{}", config_path.display());
    }
    Ok(())
}

fn run_config_show(config: &AppConfig, json_output: bool) -> Result<()> {
    if json_output {
        print_json(&serde_json::json!({"status":"ok","data":config}))?;
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn run_config_init(config_path: &Path, force: bool, json_output: bool) -> Result<()> {
    let written = match init_config(config_path, force) {
        Ok(written) => written,
        Err(e) => fail(&e, "write_failed", json_output),
    };
    if !written {
        eprintln!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
        std::process::exit(ExitCode::GeneralError as i32);
    }
    if json_output {
        print_json(&serde_json::json!({"status":"ok","data":{"written":config_path}}))?;
    } else {
        println!("Wrote default config to {}", config_path.display());
    }
    Ok(())
}

/// Write the default config to `path`. Never reads the existing file, so a
/// broken config can always be replaced with `--force`. Returns `false` if
/// the file exists and `force` is not set.
fn init_config(path: &Path, force: bool) -> typeahead_core::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    AppConfig::default().save_to(path)?;
    Ok(true)
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
