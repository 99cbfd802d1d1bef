use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::net::IpAddr;
use subcalc_cidr::open_enumerator;
use subcalc_cidr::tools::{reverse_name, stf_mapping, ReverseZone};
use subcalc_core::config::ServerConfig;
use subcalc_core::AddressFamily;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod output;
mod query;

use output::Style;
use query::Query;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SUBCALC_LOG";

/// IPv4 and IPv6 subnet calculator
#[derive(Parser)]
#[command(name = "subcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate an IPv4 block
    Inet(CalcArgs),
    /// Calculate an IPv6 block
    Inet6(CalcArgs),
    /// Print an ip6.arpa. pointer record
    Arpa6(ReverseArgs),
    /// Print a legacy ip6.int. pointer record
    Int6(ReverseArgs),
    /// Map between IPv4 addresses and 6to4 networks
    Stf(StfArgs),
    /// Serve calculations over HTTP
    Serve(ServeArgs),
}

#[derive(Parser)]
struct CalcArgs {
    /// `<address>/<prefix>`, `<address>`, or `hosts`
    #[arg(value_name = "TARGET")]
    target: String,

    /// `netmask <mask>`, `mask <wildcard>`, `prefixlen <n>`, a host count, `print`
    #[arg(value_name = "WORDS")]
    words: Vec<String>,
}

#[derive(Parser)]
struct ReverseArgs {
    /// IPv6 address
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// Host name the record points to
    #[arg(value_name = "HOSTNAME")]
    hostname: String,
}

#[derive(Parser)]
struct StfArgs {
    /// Family of the given address
    #[arg(value_enum)]
    family: FamilyArg,

    /// IPv4 parent or 6to4 address
    #[arg(value_name = "ADDRESS")]
    address: String,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind (overrides SUBCALC_BIND)
    #[arg(short, long)]
    bind: Option<IpAddr>,

    /// Port to listen on (overrides SUBCALC_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable labelled output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FamilyArg {
    Inet,
    Inet6,
}

impl From<FamilyArg> for AddressFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::Inet => AddressFamily::Inet,
            FamilyArg::Inet6 => AddressFamily::Inet6,
        }
    }
}

impl OutputFormat {
    fn style(self) -> Style {
        match self {
            OutputFormat::Human => Style::Human {
                color: io::stdout().is_terminal(),
            },
            OutputFormat::Json => Style::Json,
            OutputFormat::JsonCompact => Style::JsonCompact,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let style = cli.output.style();

    match cli.command {
        Commands::Inet(args) => handle_calc(AddressFamily::Inet, args, style),
        Commands::Inet6(args) => handle_calc(AddressFamily::Inet6, args, style),
        Commands::Arpa6(args) => handle_reverse(args, ReverseZone::Arpa, style),
        Commands::Int6(args) => handle_reverse(args, ReverseZone::Int, style),
        Commands::Stf(args) => handle_stf(args, style),
        Commands::Serve(args) => handle_serve(args),
    }
}

fn handle_calc(family: AddressFamily, args: CalcArgs, style: Style) -> Result<()> {
    debug!(%family, target = %args.target, words = ?args.words, "Calculating");
    let query = query::interpret(family, &args.target, &args.words)?;

    let mut out = io::BufWriter::new(io::stdout().lock());
    match query {
        Query::Block { block, print } => {
            let enumerator = print.then(|| open_enumerator(&block));
            output::write_block(&mut out, &block, enumerator, style)?;
        }
        Query::Hosts(fit) => output::write_hosts(&mut out, &fit, style)?,
    }
    out.flush()?;
    Ok(())
}

fn handle_reverse(args: ReverseArgs, zone: ReverseZone, style: Style) -> Result<()> {
    let name = reverse_name(&args.address, zone)?;
    let mut out = io::stdout().lock();
    output::write_reverse(&mut out, &name, &args.hostname, style)?;
    Ok(())
}

fn handle_stf(args: StfArgs, style: Style) -> Result<()> {
    let mapping = stf_mapping(args.family.into(), &args.address)?;
    let mut out = io::stdout().lock();
    output::write_stf(&mut out, &mapping, style)?;
    Ok(())
}

fn handle_serve(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(subcalc_http::serve(config))?;
    Ok(())
}
