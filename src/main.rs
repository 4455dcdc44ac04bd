//! `openapi-examples`: generates example requests and responses from OpenAPI specs.
//!
//! ```bash
//! openapi-examples generate microcks-api-examples openapi.yaml
//! cat openapi.json | openapi-examples generate microcks-api-examples --format json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use oas_examples::ExamplesGeneratorBuilder;
use oas_examples::input::read_specification;

/// openapi-examples can be used to generate examples for API requests and
/// responses from the schemas defined in an OpenAPI specification document.
#[derive(Parser)]
#[command(name = "openapi-examples", version, about, long_about = None)]
struct Cli {
    /// Log skipped fields and other diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generates examples in different output formats from OpenAPI spec
    #[command(subcommand)]
    Generate(GenerateCommand),
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generates Microcks APIExamples files from OpenAPI specs
    #[command(
        name = "microcks-api-examples",
        after_help = "Example: openapi-examples generate microcks-api-examples openapi.yaml"
    )]
    MicrocksApiExamples(MicrocksApiExamplesArgs),
}

#[derive(Args)]
struct MicrocksApiExamplesArgs {
    /// OpenAPI file (YAML or JSON); read from standard input when omitted
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Microcks)]
    format: OutputFormat,

    /// Emit bodies as single-line JSON
    #[arg(long)]
    compact: bool,

    /// Keep generated values even when they do not satisfy their schema
    #[arg(long)]
    no_validate: bool,

    /// Prefer the declared example with this name
    #[arg(long, value_name = "NAME")]
    example: Option<String>,

    /// Put `in: header` parameters under the request headers
    #[arg(long)]
    header_parameters: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Microcks APIExamples document
    Microcks,
    /// The examples model as JSON
    Json,
    /// The examples model as plain YAML
    Yaml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(GenerateCommand::MicrocksApiExamples(args)) => microcks_api_examples(&args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn microcks_api_examples(args: &MicrocksApiExamplesArgs) -> anyhow::Result<()> {
    let content =
        read_specification(args.file.as_deref()).context("error reading OpenAPI content")?;

    let mut builder = ExamplesGeneratorBuilder::new()
        .pretty(!args.compact)
        .validate(!args.no_validate)
        .header_parameters(args.header_parameters);
    if let Some(name) = &args.example {
        builder = builder.example_name(name.as_str());
    }
    let generator = builder.build()?;

    let examples = generator
        .generate(&content)
        .context("error generating API examples")?;
    let output = match args.format {
        OutputFormat::Microcks => generator.render(&examples)?,
        OutputFormat::Json => examples.to_json()?,
        OutputFormat::Yaml => examples.to_yaml()?,
    };

    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}
