//! DevAssist command line
//!
//! Argument definitions and subcommand handlers. `main.rs` only wires them
//! to the process; handlers write to any `io::Write` so they can be driven
//! from tests.

#![allow(missing_docs)]

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use devassist_core::{
    record_id_from_url, AssistReport, DevAssistConfig, HttpPrLookup, PrAggregator,
};
use devassist_paths::{RecordContext, SourceRoots, UserProfile};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed; individual lookups may still have failed
    Success,
    /// Every lookup failed, so the empty result means nothing
    AllLookupsFailed,
}

impl Outcome {
    /// Process exit code
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::AllLookupsFailed => 2,
        }
    }
}

/// Command definition
#[must_use]
pub fn cli() -> Command {
    Command::new("devassist")
        .version(devassist_core::VERSION)
        .about("Find the merged pull requests behind a Salesforce record's metadata")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .subcommand(
            with_context_args(Command::new("paths").about("Print the inferred metadata paths"))
                .arg(config_arg())
                .arg(root_arg())
                .arg(json_arg()),
        )
        .subcommand(
            with_context_args(
                Command::new("prs").about("List merged pull requests for the inferred paths"),
            )
            .arg(config_arg())
            .arg(root_arg())
            .arg(
                Arg::new("service-url")
                    .long("service-url")
                    .help("Merged pull-request search endpoint"),
            )
            .arg(
                Arg::new("repo-base-url")
                    .long("repo-base-url")
                    .help("Base URL changed-file paths are appended to"),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .value_parser(value_parser!(u64))
                    .help("Per-request timeout in seconds"),
            )
            .arg(
                Arg::new("max-concurrent")
                    .long("max-concurrent")
                    .value_parser(value_parser!(usize))
                    .help("Upper bound on lookups in flight"),
            )
            .arg(json_arg()),
        )
        .subcommand(
            Command::new("record-id")
                .about("Extract the record id from a Lightning record page URL")
                .arg(Arg::new("url").required(true).help("Record page URL")),
        )
}

fn with_context_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("object")
                .long("object")
                .short('o')
                .required(true)
                .help("Object API name, e.g. Contact or Invoice__c"),
        )
        .arg(
            Arg::new("record-type")
                .long("record-type")
                .short('t')
                .help("Record type developer name"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .short('p')
                .help("Profile of the viewing user"),
        )
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file")
}

fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .action(ArgAction::Append)
        .help("Source root to search, repeatable; replaces configured roots")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Install the global subscriber
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, defaulting to
/// `info`. Logs go to stderr so stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Subcommands do not all define every id; a missing id reads as unset.
fn opt<'a, T>(args: &'a ArgMatches, id: &str) -> Option<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.try_get_one::<T>(id).ok().flatten()
}

/// Configuration file (if any) with command line overrides applied
///
/// # Errors
/// Unreadable or invalid configuration, or an invalid override.
pub fn load_config(args: &ArgMatches) -> Result<DevAssistConfig> {
    let mut config = match opt::<PathBuf>(args, "config") {
        Some(path) => DevAssistConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DevAssistConfig::default(),
    };

    if let Ok(Some(roots)) = args.try_get_many::<String>("root") {
        config.source_roots = SourceRoots::new(roots.map(String::as_str))?;
    }
    if let Some(url) = opt::<String>(args, "service-url") {
        config.service_url = Some(url.clone());
    }
    if let Some(url) = opt::<String>(args, "repo-base-url") {
        config.repo_base_url = Some(url.clone());
    }
    if let Some(secs) = opt::<u64>(args, "timeout") {
        config.request_timeout_secs = *secs;
    }
    if let Some(max) = opt::<usize>(args, "max-concurrent") {
        config.max_concurrent_lookups = Some(*max);
    }

    config.validate()?;
    Ok(config)
}

/// Record context and profile given on the command line
#[must_use]
pub fn context_from_args(args: &ArgMatches) -> (RecordContext, Option<UserProfile>) {
    let object = opt::<String>(args, "object").map_or("", String::as_str);
    let mut context = RecordContext::new(object);
    if let Some(record_type) = opt::<String>(args, "record-type") {
        context = context.with_record_type(record_type.as_str());
    }
    let profile = opt::<String>(args, "profile").and_then(|p| UserProfile::non_blank(p.as_str()));
    (context, profile)
}

/// `devassist paths`
///
/// # Errors
/// Invalid configuration or record context, or a failed write.
pub fn run_paths<W: Write>(args: &ArgMatches, out: &mut W) -> Result<Outcome> {
    let config = load_config(args)?;
    let (context, profile) = context_from_args(args);
    let paths = config.inference_engine().infer(&context, profile.as_ref())?;

    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut *out, &paths)?;
        writeln!(out)?;
    } else {
        for path in &paths {
            writeln!(out, "{path}")?;
        }
    }
    Ok(Outcome::Success)
}

/// `devassist prs`
///
/// # Errors
/// Invalid configuration or record context, a missing service or repository
/// URL, or a failed write. Failing lookups are reported, not returned.
pub async fn run_prs<W: Write>(args: &ArgMatches, out: &mut W) -> Result<Outcome> {
    let config = load_config(args)?;
    let (context, profile) = context_from_args(args);
    let paths = config.inference_engine().infer(&context, profile.as_ref())?;

    let lookup = HttpPrLookup::from_config(&config)?;
    let links = config.link_builder()?;
    let aggregator =
        PrAggregator::new(lookup, links).with_max_in_flight(config.max_concurrent_lookups);
    let result = aggregator.aggregate(&paths).await;

    let report = AssistReport {
        context,
        profile,
        paths,
        result,
    };

    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_report(out, &report)?;
    }

    let all_failed =
        !report.paths.is_empty() && report.result.failures.len() == report.paths.len();
    if all_failed {
        tracing::error!(paths = report.paths.len(), "every lookup failed");
        return Ok(Outcome::AllLookupsFailed);
    }
    Ok(Outcome::Success)
}

fn write_report<W: Write>(out: &mut W, report: &AssistReport) -> std::io::Result<()> {
    writeln!(
        out,
        "{} metadata path(s) searched for {}",
        report.paths.len(),
        report.context.object_name
    )?;

    if report.result.is_empty() {
        writeln!(out, "No merged pull requests found")?;
    }
    for pr in &report.result {
        writeln!(
            out,
            "#{} {} (merged {})",
            pr.number(),
            pr.title(),
            pr.pull_request.merged_at.date_naive()
        )?;
        writeln!(out, "    via {}", pr.source_path)?;
        for link in &pr.file_links {
            writeln!(out, "    {}", link.url)?;
        }
    }

    for failure in &report.result.failures {
        writeln!(out, "lookup failed for {}: {}", failure.path, failure.reason)?;
    }
    Ok(())
}

/// `devassist record-id`
///
/// # Errors
/// The URL is not a Lightning record page, or a failed write.
pub fn run_record_id<W: Write>(args: &ArgMatches, out: &mut W) -> Result<Outcome> {
    let url = opt::<String>(args, "url").map_or("", String::as_str);
    let record_id =
        record_id_from_url(url).ok_or_else(|| anyhow!("no record id in URL '{url}'"))?;
    writeln!(out, "{record_id}")?;
    Ok(Outcome::Success)
}

/// Dispatch parsed arguments to a subcommand
///
/// # Errors
/// Whatever the subcommand returns.
pub async fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<Outcome> {
    match matches.subcommand() {
        Some(("paths", args)) => run_paths(args, out),
        Some(("prs", args)) => run_prs(args, out).await,
        Some(("record-id", args)) => run_record_id(args, out),
        Some((other, _)) => Err(anyhow!("unknown subcommand '{other}'")),
        None => Err(anyhow!("no subcommand given")),
    }
}
