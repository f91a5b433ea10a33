use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dump_targets::config::{self, expand_tilde, Begin, Config, LogLevel, ScheduleMode};
use dump_targets::{init_logging, TargetKind};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "dump-targets")]
#[command(about = "Inspect and resolve the backup targets of a dump configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (.yaml, or .toml)
    #[arg(short, long, env = "DUMP_TARGETS_CONFIG", default_value = "dump-targets.yaml")]
    config: PathBuf,

    /// Override the logging level from the configuration file
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Validate,

    /// List configured targets
    Targets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve targets into storage handles and describe them
    Resolve {
        /// Target to resolve (defaults to all targets)
        name: Option<String>,
    },

    /// Print the configuration as loaded
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Toml,
}

#[derive(Serialize)]
struct TargetRow<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: TargetKind,
    url: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Up before loading so decode warnings reach the console
    let logging = init_logging(cli.log_level.unwrap_or_default())
        .context("Failed to initialize logging")?;

    let config_path = expand_tilde(&cli.config);
    let config = config::load_config(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    if cli.log_level.is_none() {
        logging
            .set_level(config.logging)
            .context("Failed to apply logging level from configuration")?;
    }
    debug!("Loaded configuration from {:?}", config_path);

    // If no command specified, list targets
    let command = cli.command.unwrap_or(Commands::Targets { json: false });

    match command {
        Commands::Validate => handle_validate(&config)?,
        Commands::Targets { json } => handle_targets(&config, json)?,
        Commands::Resolve { name } => handle_resolve(&config, name.as_deref())?,
        Commands::Show { format } => {
            let rendered = match format {
                OutputFormat::Yaml => config.to_yaml()?,
                OutputFormat::Toml => config.to_toml()?,
            };
            print!("{}", rendered);
        }
    }

    Ok(())
}

fn handle_validate(config: &Config) -> Result<()> {
    let schedule = config.dump.schedule.mode()?;

    println!("Configuration is valid!");
    println!("Targets: {}", config.targets.len());
    println!("Dump targets: {}", config.dump.targets.join(", "));
    println!("Schedule: {}", describe_schedule(&schedule));

    for name in config.missing_dump_targets() {
        warn!("Dump target '{}' is not declared under targets", name);
        println!("Warning: dump target '{}' is not declared under targets", name);
    }

    Ok(())
}

fn handle_targets(config: &Config, json: bool) -> Result<()> {
    let rows: Vec<TargetRow> = config
        .targets
        .iter()
        .map(|(name, target)| TargetRow {
            name,
            kind: target.kind(),
            url: target.url(),
        })
        .collect();

    if json {
        let rendered = serde_json::to_string_pretty(&rows).context("Failed to encode targets")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Configured targets:");
    for row in &rows {
        println!("  {}", row.name);
        println!("    Type: {}", row.kind);
        println!("    URL: {}", row.url);
        println!();
    }

    Ok(())
}

fn handle_resolve(config: &Config, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let target = config
            .targets
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Target '{}' not found in configuration", name))?;
        let storage = target
            .resolve()
            .with_context(|| format!("Failed to resolve target '{}'", name))?;
        println!("✓ {}: {}", name, storage.summary());
        return Ok(());
    }

    let mut failed = 0;
    for (name, target) in config.targets.iter() {
        match target.resolve() {
            Ok(storage) => println!("✓ {}: {}", name, storage.summary()),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", name, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} targets failed to resolve", failed, config.targets.len());
    }

    Ok(())
}

fn describe_schedule(mode: &ScheduleMode) -> String {
    match mode {
        ScheduleMode::Once => "once".to_string(),
        ScheduleMode::Cron(expr) => format!("cron '{}'", expr),
        ScheduleMode::Interval { frequency, begin } => {
            let start = match begin {
                Begin::Immediately => "immediately".to_string(),
                Begin::At(time) => format!("at {}", time.format("%H:%M")),
                Begin::AfterMinutes(minutes) => format!("in {} minutes", minutes),
            };
            format!("every {} minutes, starting {}", frequency, start)
        }
    }
}

fn parse_log_level(raw: &str) -> std::result::Result<LogLevel, String> {
    match raw.to_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" | "warning" => Ok(LogLevel::Warning),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        other => Err(format!("unknown log level '{}'", other)),
    }
}
