//! `carryover` - migrate a YAML config onto a newer template

use anyhow::{Context, Result};
use carryover_core::{KeyPath, MigrationConfig, MigrationEngine, MigrationReport};
use carryover_store::{load_settings, ConfigStore};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("User config file to migrate");
    let template = Arg::new("template")
        .long("template")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Template config carrying the current schema");
    let version_key = Arg::new("version-key")
        .long("version-key")
        .value_parser(value_parser!(KeyPath))
        .help("Key holding the config version (default: config-version)");
    let settings = Arg::new("settings")
        .long("settings")
        .value_parser(value_parser!(PathBuf))
        .help("YAML file with migration settings");

    Command::new("carryover")
        .version(carryover_core::VERSION)
        .about("Comment-preserving config migrations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("migrate")
                .about("Rewrite the config onto the template schema")
                .arg(config.clone())
                .arg(template.clone())
                .arg(version_key.clone())
                .arg(settings.clone())
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the migrated document instead of writing it"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the run report as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Exit with status 1 if the config is behind the template")
                .arg(config)
                .arg(template)
                .arg(version_key)
                .arg(settings),
        )
}

fn init_logging(json: bool) {
    // Logs go to stderr so --dry-run output stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn store_from(args: &ArgMatches) -> Result<ConfigStore> {
    let config_path = args
        .get_one::<PathBuf>("config")
        .context("--config is required")?;
    let template_path = args
        .get_one::<PathBuf>("template")
        .context("--template is required")?;

    let mut settings = match args.get_one::<PathBuf>("settings") {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => MigrationConfig::default(),
    };
    if let Some(key) = args.get_one::<KeyPath>("version-key") {
        settings = settings.with_version_key(key.clone());
    }

    Ok(ConfigStore::new(config_path, template_path).with_engine(MigrationEngine::new(settings)))
}

fn print_report(report: &MigrationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("Migration Report:");
    println!("  Template keys: {}", report.template_keys);
    println!("  Emitted: {}", report.emitted());
    println!("  Preserved: {}", report.preserved);
    println!("  Defaulted: {}", report.defaulted);
    println!("  Version stamped: {}", report.version_stamped);
    println!("  Commented: {}", report.commented);
    if report.comments_degraded {
        println!("  Comments: unavailable (template text could not be read)");
    }
    Ok(())
}

fn migrate(args: &ArgMatches) -> Result<ExitCode> {
    let store = store_from(args)?;
    let json = args.get_flag("json");

    if args.get_flag("dry-run") {
        let migration = store
            .preview()
            .with_context(|| format!("migrating {}", store.config_path().display()))?;
        if json {
            print_report(&migration.report, true)?;
        } else {
            println!("{}", migration.output);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = store
        .migrate()
        .with_context(|| format!("migrating {}", store.config_path().display()))?;
    print_report(&outcome.report, json)?;
    Ok(ExitCode::SUCCESS)
}

fn check(args: &ArgMatches) -> Result<ExitCode> {
    let store = store_from(args)?;
    let snapshot = store
        .reload()
        .with_context(|| format!("reading {}", store.config_path().display()))?;

    if snapshot.is_outdated() {
        println!(
            "{}: outdated (version {} < {})",
            store.config_path().display(),
            snapshot.config_version(),
            snapshot.latest_version()
        );
        Ok(ExitCode::FAILURE)
    } else {
        println!(
            "{}: current (version {})",
            store.config_path().display(),
            snapshot.config_version()
        );
        Ok(ExitCode::SUCCESS)
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    match matches.subcommand() {
        Some(("migrate", args)) => migrate(args),
        Some(("check", args)) => check(args),
        _ => Ok(ExitCode::from(2)),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
