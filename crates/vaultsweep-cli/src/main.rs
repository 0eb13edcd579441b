use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vaultsweep_core::storage::{load_document, resolve_output_path, save_document};
use vaultsweep_core::{
    AppConfig, Confirm, FixedAnswer, PairOrder, Pipeline, SweepError, SweepReport,
};

mod console;

use console::{ConsoleAnnouncer, StdinConfirm};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "vaultsweep",
    about = "Drop incomplete logins from a password vault export and merge duplicates",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting VAULTSWEEP_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a decrypted JSON export and write the result.
    Clean {
        /// Plaintext JSON export to clean.
        input: PathBuf,

        /// Where to write the cleaned export (default: `<input>.cleaned.json`).
        #[arg(long, short, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input file.
        #[arg(long)]
        in_place: bool,

        /// Merge every duplicate pair without asking.
        #[arg(long, short, conflicts_with = "no")]
        yes: bool,

        /// Decline every merge without asking.
        #[arg(long)]
        no: bool,

        /// Drop items from the export once merged into another item.
        #[arg(long)]
        remove_merged: bool,

        /// Offer each duplicate pair in both directions.
        #[arg(long)]
        ordered_pairs: bool,

        /// Run everything but don't write the cleaned export.
        #[arg(long)]
        dry_run: bool,
    },

    /// Report what `clean` would remove and which items look duplicated.
    Check {
        input: PathBuf,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all config values.
    List,
    /// Show the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<SweepError>()
            .map(SweepError::exit_code)
            .unwrap_or(vaultsweep_core::ExitCode::GeneralError);
        std::process::exit(code as i32);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("VAULTSWEEP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let json_output = cli.json || std::env::var("VAULTSWEEP_JSON").as_deref() == Ok("1");

    match cli.command {
        Commands::Clean {
            input,
            output,
            in_place,
            yes,
            no,
            remove_merged,
            ordered_pairs,
            dry_run,
        } => {
            let config = load_config()?;
            let mut options = config.pipeline;
            options.remove_merged |= remove_merged;
            if ordered_pairs {
                options.pair_order = PairOrder::Ordered;
            }

            let mut doc = load_document(&input)?;
            let out_path = if dry_run {
                None
            } else {
                Some(resolve_output_path(
                    &input,
                    output.as_deref(),
                    in_place,
                    &config.output.suffix,
                )?)
            };

            let mut confirm: Box<dyn Confirm> = if yes {
                Box::new(FixedAnswer(true))
            } else if no {
                Box::new(FixedAnswer(false))
            } else {
                Box::new(StdinConfirm::new(io::stdin().lock(), prompt_writer(json_output)))
            };
            let mut announcer = ConsoleAnnouncer {
                to_stderr: json_output,
            };

            let report = Pipeline::new(options).run(&mut doc, confirm.as_mut(), &mut announcer);

            if let Some(path) = &out_path {
                save_document(path, &doc)
                    .with_context(|| format!("writing cleaned export to {}", path.display()))?;
            }

            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "report": report, "output": out_path, "dry_run": dry_run },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_merge_summary(&report);
                match &out_path {
                    Some(path) => println!("Wrote cleaned export to {}", path.display()),
                    None => println!("Dry run: nothing written."),
                }
            }
        }

        Commands::Check { input } => {
            let config = load_config()?;
            let doc = load_document(&input)?;
            let mut announcer = ConsoleAnnouncer {
                to_stderr: json_output,
            };
            let report = Pipeline::new(config.pipeline).check(&doc, &mut announcer);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "report": report },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if report.duplicates.is_empty() {
                println!("No duplicate items found.");
            } else {
                println!("{} possible duplicate pair(s):", report.duplicates.len());
                for dup in &report.duplicates {
                    println!(
                        "  \"{}\" ({})  <->  \"{}\" ({})",
                        dup.first_name, dup.first_id, dup.second_name, dup.second_id
                    );
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::List => {
                let values = load_config()?.key_values();
                if json_output {
                    let map: serde_json::Map<String, serde_json::Value> = values
                        .into_iter()
                        .map(|(key, value)| (key.to_string(), value.into()))
                        .collect();
                    print_json(&serde_json::json!({"status":"ok","data":map}))?;
                } else {
                    for (key, value) in values {
                        println!("{key} = {value}");
                    }
                }
            }
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
        },

        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version}}))?;
            } else {
                println!("vaultsweep v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn load_config() -> Result<AppConfig> {
    let config = AppConfig::load().context("loading config")?;
    debug!(path = %AppConfig::config_path().display(), "config loaded");
    Ok(config)
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

/// Prompts share stdout with progress lines unless stdout carries JSON.
fn prompt_writer(json_output: bool) -> Box<dyn Write> {
    if json_output {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn print_merge_summary(report: &SweepReport) {
    if report.duplicates.is_empty() {
        return;
    }
    println!(
        "Duplicates: {} pair(s), {} merged, {} declined, {} skipped.",
        report.duplicates.len(),
        report.merges.len(),
        report.declined,
        report.skipped
    );
}
