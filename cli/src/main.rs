use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdarg_core::{ArgSchema, ArgSpec, BoundArgument, bind, tokenize, validate_schema};
use cmdarg_registry::{Invocation, RegistryConfig};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdarg")]
#[command(about = "Tokenize, bind and dispatch chat-style command arguments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split argument text into tokens.
    Tokenize(TokenizeArgs),
    /// Bind argument text against a schema file.
    Bind(BindArgs),
    /// Validate one or more schema files.
    Check(CheckArgs),
    /// Run a message through a command config: prefix, lookup, guards, binding.
    Dispatch(DispatchArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Argument text. Required unless --stdin is given.
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    text: Option<String>,
    /// Read the argument text from stdin.
    #[arg(long)]
    stdin: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct BindArgs {
    /// Schema file: a YAML or JSON list of argument entries.
    #[arg(long)]
    schema: PathBuf,
    /// Argument text.
    text: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct DispatchArgs {
    /// Command config file (YAML or JSON).
    #[arg(long)]
    config: PathBuf,
    /// Id of the message author, checked by guards.
    #[arg(long)]
    author: String,
    /// Full message content, including the prefix.
    message: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Serialize)]
struct DispatchOutput<'a> {
    command: Vec<String>,
    arguments: &'a [BoundArgument],
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Bind(args) => run_bind(args),
        Command::Check(args) => run_check(args),
        Command::Dispatch(args) => run_dispatch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            buf
        }
    };

    print_output(&tokenize(&text), args.format)
}

fn run_bind(args: BindArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    let bound = bind(&tokenize(&args.text), &schema).map_err(|err| err.to_string())?;
    print_output(&bound, args.format)
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failed = 0usize;

    for path in &args.inputs {
        let entries = read_entries(path)?;
        let errors = validate_schema(&entries);
        if errors.is_empty() {
            continue;
        }

        failed += 1;
        eprintln!("{}:", path.display());
        for err in errors {
            eprintln!("  {err}");
        }
    }

    if failed > 0 {
        return Err(format!(
            "{failed} of {} schema file(s) failed validation",
            args.inputs.len()
        ));
    }

    println!("Validated {} schema file(s).", args.inputs.len());
    Ok(())
}

fn run_dispatch(args: DispatchArgs) -> Result<(), String> {
    let dispatcher = RegistryConfig::load(&args.config)
        .map_err(|err| format!("Failed to load {}: {err}", args.config.display()))?
        .with_env_admins()
        .into_dispatcher()
        .map_err(|err| err.to_string())?;

    let invocation = Invocation::new(args.author, args.message);
    let dispatch = dispatcher
        .dispatch(&invocation)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("message does not start with prefix `{}`", dispatcher.prefix()))?;

    print_output(
        &DispatchOutput {
            command: dispatch.path.clone(),
            arguments: dispatch.arguments.bound(),
        },
        args.format,
    )
}

/// Reads a schema file as a plain list so duplicate names are reported by
/// `validate_schema` rather than failing the parse.
fn read_entries(path: &Path) -> Result<Vec<ArgSpec>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;

    let parsed = if is_json(path) {
        serde_json::from_str(&raw).map_err(|err| err.to_string())
    } else {
        serde_yaml::from_str(&raw).map_err(|err| err.to_string())
    };
    let entries: Vec<ArgSpec> =
        parsed.map_err(|err| format!("Failed to parse {}: {err}", path.display()))?;

    debug!(path = %path.display(), entries = entries.len(), "loaded schema file");
    Ok(entries)
}

fn load_schema(path: &Path) -> Result<ArgSchema, String> {
    let entries = read_entries(path)?;

    let errors = validate_schema(&entries);
    if let Some(first) = errors.first() {
        return Err(format!("invalid schema {}: {first}", path.display()));
    }

    ArgSchema::from_entries(entries).map_err(|err| err.to_string())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn print_output<T: Serialize + ?Sized>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let output = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value).map_err(|err| err.to_string())?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value).map_err(|err| err.to_string())?,
    };
    println!("{}", output.trim_end());
    Ok(())
}
