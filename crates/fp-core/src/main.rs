//! Device fingerprint CLI.
//!
//! - `collect`: harvest the running host and print the fingerprint tree
//! - `labels`: print the label table for a version
//! - `check`: validate the version table and the active configuration

use clap::{Args, Parser, Subcommand};
use fp_common::{OutputFormat, Version};
use fp_core::config::{
    load_config, validate_version_table, Category, ConfigError, ConfigOptions, ResolvedConfig,
};
use fp_core::exit_codes::ExitCode;
use fp_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info_span};

/// Device fingerprint harvester
#[derive(Parser)]
#[command(name = "fp-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (JSON)
    #[arg(long, global = true, env = "FINGERPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum log level written to stderr
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log line format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Harvest this host and print its fingerprint
    Collect(CollectArgs),
    /// Print the labels each category emits at a version
    Labels(LabelsArgs),
    /// Validate the version table and configuration
    Check,
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// Fingerprint version (v1, v2, v3)
    #[arg(long)]
    fp_version: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct LabelsArgs {
    /// Fingerprint version (v1, v2, v3)
    #[arg(long)]
    fp_version: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else if cli.global.verbose > 0 {
        let base = cli.global.log_level.unwrap_or_default();
        Some((0..cli.global.verbose).fold(base, |level, _| level.louder()))
    } else {
        cli.global.log_level
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let exit_code = match &cli.command {
        Commands::Collect(args) => run_collect(&cli.global, args),
        Commands::Labels(args) => run_labels(&cli.global, args),
        Commands::Check => run_check(&cli.global),
    };

    debug!(exit_code = %exit_code, "done");
    std::process::exit(exit_code.as_i32());
}

fn resolve_config(
    global: &GlobalOpts,
    fp_version: Option<&str>,
) -> Result<ResolvedConfig, ExitCode> {
    let options = ConfigOptions {
        version: fp_version.map(str::to_string),
        config_path: global.config.clone(),
    };
    load_config(&options).map_err(|err| {
        report_config_error(&err);
        match err {
            ConfigError::InvalidVersion { origin, .. } if origin == "command line" => {
                ExitCode::ArgsError
            }
            _ => ExitCode::ConfigError,
        }
    })
}

fn report_config_error(err: &ConfigError) {
    error!(error = %err, "configuration error");
    eprintln!("fp-core: {}", err);
}

fn run_collect(global: &GlobalOpts, args: &CollectArgs) -> ExitCode {
    let resolved = match resolve_config(global, args.fp_version.as_deref()) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    debug!(version = %resolved.configuration.version, source = ?resolved.source, "collecting");

    let tree = fp_core::collect_fingerprint(&resolved.configuration);
    match args.format {
        OutputFormat::Text => {
            print!("{}", tree.render_text());
            ExitCode::Clean
        }
        format => print_json(&tree, format),
    }
}

#[derive(Serialize)]
struct CategoryLabels {
    category: Category,
    label: &'static str,
    items: &'static [&'static str],
}

#[derive(Serialize)]
struct LabelsReport {
    version: Version,
    categories: Vec<CategoryLabels>,
}

fn run_labels(global: &GlobalOpts, args: &LabelsArgs) -> ExitCode {
    let resolved = match resolve_config(global, args.fp_version.as_deref()) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let configuration = resolved.configuration;

    let report = LabelsReport {
        version: configuration.version,
        categories: Category::ALL
            .into_iter()
            .map(|category| CategoryLabels {
                category,
                label: category.label(),
                items: configuration.labels(category),
            })
            .filter(|entry| !entry.items.is_empty())
            .collect(),
    };

    match args.format {
        OutputFormat::Text => {
            println!("{}", report.version);
            for entry in &report.categories {
                println!("{}", entry.label);
                for item in entry.items {
                    println!("  {}", item);
                }
            }
            ExitCode::Clean
        }
        format => print_json(&report, format),
    }
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let mut results: Vec<serde_json::Value> = Vec::new();
    let mut exit_code = ExitCode::Clean;

    match validate_version_table() {
        Ok(()) => results.push(serde_json::json!({
            "check": "version_table",
            "status": "ok",
            "versions": Version::ALL.len(),
        })),
        Err(err) => {
            exit_code = ExitCode::InternalError;
            results.push(serde_json::json!({
                "check": "version_table",
                "status": "error",
                "error": err.to_structured(),
            }));
        }
    }

    match resolve_config(global, None) {
        Ok(resolved) => results.push(serde_json::json!({
            "check": "config",
            "status": "ok",
            "version": resolved.configuration.version,
            "source": format!("{:?}", resolved.source),
        })),
        Err(code) => {
            if exit_code == ExitCode::Clean {
                exit_code = code;
            }
            results.push(serde_json::json!({
                "check": "config",
                "status": "error",
            }));
        }
    }

    let report = serde_json::json!({
        "status": if exit_code.is_success() { "ok" } else { "error" },
        "checks": results,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("fp-core: failed to serialize check report: {}", err);
            return ExitCode::InternalError;
        }
    }
    exit_code
}

fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> ExitCode {
    let rendered = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        _ => serde_json::to_string(value),
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::Clean
        }
        Err(err) => {
            eprintln!("fp-core: failed to serialize output: {}", err);
            ExitCode::InternalError
        }
    }
}
