use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use metadata_customizer as lib;
use lib::api::file::FileProvider;
use lib::api::MetadataProvider;
use lib::config::{Config, ConfigUpdate};
use lib::models::AlbumDetails;
use lib::store::{self, ConfigStore, FileStore};
use lib::template::TemplateEngine;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::subscriber as tracing_subscriber_global;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "metadata-customizer", version)]
struct Cli {
    /// Directory holding the settings record (defaults to the user config dir)
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single filter with explicit values
    Render {
        /// Filter text, e.g. "$tracks$, $discs$ [$disc_ratio$]"
        #[arg(long)]
        template: String,

        /// Token value as name=value (repeatable; empty value elides the token)
        #[arg(long = "value", value_parser = parse_key_val)]
        values: Vec<(String, String)>,

        /// Comma separated token vocabulary, in substitution order
        #[arg(long, value_delimiter = ',')]
        tokens: Option<Vec<String>>,
    },
    /// Render the stored filters against an album document
    Album {
        /// Album document (Spotify album JSON)
        #[arg(long, conflicts_with_all = ["dir", "id"])]
        file: Option<PathBuf>,

        /// Directory of saved album documents named <id>.json
        #[arg(long, requires = "id")]
        dir: Option<PathBuf>,

        /// Album id to look up in --dir
        #[arg(long, requires = "dir")]
        id: Option<String>,
    },
    /// Inspect or edit the stored settings
    Config {
        #[command(subcommand)]
        sub: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current settings as TOML
    Show,
    /// Warn about filters referencing unknown tokens
    Validate,
    /// Restore the default settings
    Reset,
    /// Replace the stored settings with a TOML file
    Import { file: PathBuf },
    /// Set the filter for a slot (0-2)
    SetFilter { slot: usize, template: String },
    /// Set the icon for a slot (0-2)
    SetIcon { slot: usize, icon: String },
    /// Set a named boolean option
    SetOption {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Remove a named option
    RemoveOption { name: String },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", s))?;
    if k.is_empty() {
        return Err(format!("empty token name in {:?}", s));
    }
    Ok((k.to_string(), v.to_string()))
}

/// Install the global subscriber. Logs go to stderr so rendered output on
/// stdout stays clean; the returned guard flushes the file writer.
fn init_logging(log_dir: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "metadata-customizer.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing_subscriber_global::set_global_default(subscriber)
        .context("installing tracing subscriber")?;
    Ok(guard)
}

fn update(store: &dyn ConfigStore, change: ConfigUpdate) -> Result<Config> {
    let cfg = store::load_or_default(store)?.apply(change)?;
    store.save(&cfg)?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_dir.as_ref())?;

    let settings = match &cli.store_dir {
        Some(dir) => FileStore::new(dir, store::DEFAULT_KEY),
        None => FileStore::user_default()?,
    };

    match cli.command {
        Commands::Render { template, values, tokens } => {
            let engine = match tokens {
                Some(t) => TemplateEngine::new(t),
                None => TemplateEngine::default(),
            };
            let values: HashMap<String, String> = values.into_iter().collect();
            println!("{}", engine.render(&template, &values));
        }
        Commands::Album { file, dir, id } => {
            let details = match (file, dir, id) {
                (Some(path), _, _) => {
                    let s = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading album document {}", path.display()))?;
                    AlbumDetails::from_json(&s)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                (None, Some(dir), Some(id)) => {
                    let provider = FileProvider::new(dir);
                    info!("loading album {} via {} provider", id, provider.name());
                    provider.album(&id).await?
                }
                _ => bail!("either --file or --dir with --id is required"),
            };
            let cfg = store::load_or_default(&settings)?;
            let engine = TemplateEngine::default();
            let values = lib::metadata::album_values(&details);
            let header = lib::header::build_header(&cfg, &engine, &values);
            if !header.replace_default_metadata {
                info!("keeping the default metadata rows alongside the custom header");
            }
            for line in header.lines {
                match line.icon {
                    Some(icon) => println!("[{}] {}", icon, line.text),
                    None => println!("{}", line.text),
                }
            }
        }
        Commands::Config { sub } => match sub {
            ConfigCommands::Show => {
                let cfg = store::load_or_default(&settings)?;
                print!("{}", cfg.to_toml_string()?);
            }
            ConfigCommands::Validate => {
                let cfg = store::load_or_default(&settings)?;
                let warnings = cfg.validate(&TemplateEngine::default());
                if warnings.is_empty() {
                    println!("OK");
                } else {
                    for w in &warnings {
                        warn!("{}", w);
                    }
                    // returning lets the log guard flush the file writer
                    return Ok(ExitCode::from(2));
                }
            }
            ConfigCommands::Reset => {
                update(&settings, ConfigUpdate::Reset)?;
                println!("Settings reset to defaults at {}", settings.path().display());
            }
            ConfigCommands::Import { file } => {
                let cfg = Config::from_path(&file)
                    .with_context(|| format!("loading settings from {}", file.display()))?;
                settings.save(&cfg)?;
                println!("Imported {} into {}", file.display(), settings.path().display());
            }
            ConfigCommands::SetFilter { slot, template } => {
                let cfg = update(&settings, ConfigUpdate::SetFilter { slot, template })?;
                println!("filter {} = {}", slot, cfg.filters[slot]);
            }
            ConfigCommands::SetIcon { slot, icon } => {
                let cfg = update(&settings, ConfigUpdate::SetIcon { slot, icon })?;
                println!("icon {} = {}", slot, cfg.icons[slot]);
            }
            ConfigCommands::SetOption { name, value } => {
                update(&settings, ConfigUpdate::SetOption { name: name.clone(), value })?;
                println!("{} = {}", name, value);
            }
            ConfigCommands::RemoveOption { name } => {
                update(&settings, ConfigUpdate::RemoveOption { name: name.clone() })?;
                println!("removed option {}", name);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
