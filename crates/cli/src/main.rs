use anyhow::{Context, Result};
use argdecl::{ArgParser, TypeRegistry};
use argdecl_schema::ArgSet;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit code used when the tokens do not satisfy the argument set.
const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "argdecl")]
#[command(version, about = "Parse argument tokens against a declared argument set", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse tokens and print the results as JSON
    Parse(ParseArgs),

    /// Print the usage line for an argument set
    Usage(UsageArgs),

    /// List the value types known to the parser
    Types,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the argument set JSON file
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Tokens to parse (pass them after `--`)
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the argument set JSON file
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Include each argument's help text
    #[arg(long)]
    help_text: bool,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse(args) => parse(args),
        Commands::Usage(args) => usage(args),
        Commands::Types => types(),
    }
}

fn load_parser(path: &Path, registry: &TypeRegistry) -> Result<ArgParser> {
    let set = ArgSet::from_file(path)
        .with_context(|| format!("failed to load argument set: {}", path.display()))?;
    set.to_parser(registry)
        .with_context(|| format!("invalid argument set: {}", path.display()))
}

fn parse(args: ParseArgs) -> Result<ExitCode> {
    tracing::debug!("executing parse command");
    let registry = TypeRegistry::new();
    let parser = load_parser(&args.schema, &registry)?;

    match parser.parse(&args.tokens) {
        Ok(results) => {
            let json = if args.compact {
                serde_json::to_string(&results)?
            } else {
                serde_json::to_string_pretty(&results)?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(argdecl::Error::Input(errors)) => {
            tracing::debug!(count = errors.len(), "input rejected");
            for message in errors.messages() {
                eprintln!("error: {message}");
            }
            eprintln!("\nUsage: {}", parser.usage(false));
            Ok(ExitCode::from(EXIT_INVALID_INPUT))
        }
        Err(err) => Err(err).context("failed to parse tokens"),
    }
}

fn usage(args: UsageArgs) -> Result<ExitCode> {
    tracing::debug!("executing usage command");
    let registry = TypeRegistry::new();
    let parser = load_parser(&args.schema, &registry)?;
    println!("{}", parser.usage(args.help_text));
    Ok(ExitCode::SUCCESS)
}

fn types() -> Result<ExitCode> {
    for tag in TypeRegistry::new().tags() {
        println!("{tag}");
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
