//! ip2as - build an IP-prefix-to-AS attribution table.
//!
//! This is the command-line interface for the ip2as library.

use anyhow::{Context, Result};
use clap::Parser;
use ip2as::output::{write_json, write_text};
use ip2as::{BuildConfig, InputFiles, Ip2AsTable, RirFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Get the version string for ip2as
fn get_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(env!("CARGO_PKG_VERSION"), "-UNRELEASED")
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Command-line arguments for the table builder.
#[derive(Parser, Debug)]
#[clap(author, version = get_version(), about = "Build an IP-prefix-to-AS attribution table", long_about = None)]
struct Args {
    /// Prefix-to-AS file in the standard CAIDA format
    #[clap(short = 'p', long)]
    prefixes: PathBuf,

    /// PeeringDB JSON dump
    #[clap(short = 'P', long)]
    peeringdb: PathBuf,

    /// Registry delegation file
    #[clap(short = 'r', long)]
    rir: PathBuf,

    /// AS relationship file in the standard CAIDA format
    #[clap(short = 'R', long)]
    rels: PathBuf,

    /// AS customer cone file in the standard CAIDA format
    #[clap(short = 'c', long)]
    cone: PathBuf,

    /// AS-to-org mappings in the standard CAIDA format
    #[clap(short = 'a', long)]
    as2org: PathBuf,

    /// Output file (default: standard output)
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Layout of the registry file
    #[clap(long, value_enum, default_value_t = RirFormatArg::Auto)]
    rir_format: RirFormatArg,

    /// Longest IPv4 registry delegation to keep
    #[clap(long, default_value_t = ip2as::config::DEFAULT_IPV4_MAX_PREFIX_LEN)]
    ipv4_max_len: u8,

    /// Longest IPv6 registry delegation to keep
    #[clap(long, default_value_t = ip2as::config::DEFAULT_IPV6_MAX_PREFIX_LEN)]
    ipv6_max_len: u8,

    /// Do not reserve private and special-use address blocks
    #[clap(long)]
    no_private: bool,

    /// Output results in JSON format
    #[clap(long)]
    json: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RirFormatArg {
    Auto,
    Delegation,
    Prefix,
}

impl From<RirFormatArg> for RirFormat {
    fn from(arg: RirFormatArg) -> Self {
        match arg {
            RirFormatArg::Auto => RirFormat::Auto,
            RirFormatArg::Delegation => RirFormat::Delegation,
            RirFormatArg::Prefix => RirFormat::Prefix,
        }
    }
}

impl Args {
    fn build_config(&self) -> Result<BuildConfig> {
        Ok(BuildConfig::builder()
            .ipv4_max_prefix_len(self.ipv4_max_len)
            .ipv6_max_prefix_len(self.ipv6_max_len)
            .rir_format(self.rir_format.into())
            .reserve_private(!self.no_private)
            .build()?)
    }

    fn input_files(&self) -> InputFiles {
        InputFiles {
            prefixes: self.prefixes.clone(),
            peeringdb: self.peeringdb.clone(),
            rir: self.rir.clone(),
            rels: self.rels.clone(),
            cone: self.cone.clone(),
            as2org: self.as2org.clone(),
        }
    }
}

/// Map `-v` occurrences to a default filter; RUST_LOG wins when set
fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.build_config()?;
    let inputs = args
        .input_files()
        .load(&config)
        .context("failed to load inputs")?;

    let (table, stats) = inputs.build(&config);
    info!(
        "built table: {} reserved, {} exchange-point, {} routing, {} registry prefixes",
        stats.reserved, stats.exchange_point.inserted, stats.routing.inserted, stats.registry.inserted
    );
    for (rule, count) in &stats.rules {
        info!("multi-origin prefixes resolved by {}: {}", rule, count);
    }

    write_output(&table, args.output.as_deref(), args.json)
}

/// Write the table to `path`, or stdout when absent or `-`
fn write_output(table: &Ip2AsTable, path: Option<&Path>, json: bool) -> Result<()> {
    let out: Box<dyn Write> = match path {
        Some(path) if path != Path::new("-") => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        _ => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let written = if json {
        write_json(table, out)
    } else {
        write_text(table, out)
    };
    written.context("failed to write output")
}
