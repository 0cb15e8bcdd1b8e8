use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use rayon::prelude::*;
use scip_stats_core::{StatsDocument, Table, cross_section};
use scip_stats_parser::output::{
    OutputFormat, format_cross_section, format_document, format_series, format_table,
    format_value,
};
use scip_stats_parser::{ActivityTimeline, ParserConfig, parse_stats_file, parse_stats_text};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "scip-stats")]
#[command(about = "Parse SCIP statistics reports and project their sections into tables")]
struct Cli {
    /// Parser configuration YAML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a report into a typed document.
    Parse(ParseArgs),
    /// List document keys in file order.
    Keys(KeysArgs),
    /// Look up one key; unknown keys print the `-` placeholder.
    Get(GetArgs),
    /// Project one section into a table.
    Section(SectionArgs),
    /// Element-wise difference of one section between two reports.
    Compare(CompareArgs),
    /// One column of a section across several reports, side by side.
    CrossSection(CrossSectionArgs),
    /// Activity of one section element over a sequence of frame reports.
    Timeline(TimelineArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Report file (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Wrap the document with source and timestamp metadata.
    #[arg(long)]
    with_meta: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct KeysArgs {
    /// Report file (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GetArgs {
    /// Report file (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Key to look up, e.g. `Presolved_Problem.Variables`.
    #[arg(long)]
    key: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SectionArgs {
    /// Report file (reads stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Section name, e.g. `Propagators` or `Conflict_Analysis`.
    #[arg(long)]
    name: String,
    /// Sort rows by label.
    #[arg(long)]
    sort: bool,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Report to subtract from.
    #[arg(long)]
    left: PathBuf,
    /// Report to subtract.
    #[arg(long)]
    right: PathBuf,
    /// Section to compare.
    #[arg(long)]
    section: String,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CrossSectionArgs {
    /// Section to slice.
    #[arg(long)]
    section: String,
    /// Column taken from every report.
    #[arg(long)]
    column: String,
    /// Report files; each becomes one output column labelled by file stem.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
    /// Number of parallel parse jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct TimelineArgs {
    /// Section containing the element.
    #[arg(long)]
    section: String,
    /// Element (sub-entry) name, e.g. `dual_LP`.
    #[arg(long)]
    element: String,
    /// Frame reports in frame order; the first argument is frame 0.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
    /// Number of parallel parse jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Parse(args) => run_parse(args, &config),
        Command::Keys(args) => run_keys(args, &config),
        Command::Get(args) => run_get(args, &config),
        Command::Section(args) => run_section(args, &config),
        Command::Compare(args) => run_compare(args, &config),
        Command::CrossSection(args) => run_cross_section(args, &config),
        Command::Timeline(args) => run_timeline(args, &config),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ParserConfig, String> {
    match path {
        Some(path) => {
            let config = ParserConfig::load(path)
                .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?;
            debug!(path = %path.display(), ?config, "Loaded parser config");
            Ok(config)
        }
        None => Ok(ParserConfig::default()),
    }
}

fn read_document(input: Option<&Path>, config: &ParserConfig) -> Result<StatsDocument, String> {
    match input {
        Some(path) => parse_file(path, config),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            parse_stats_text(&text, config).map_err(|e| format!("Failed to parse stdin: {e}"))
        }
    }
}

fn parse_file(path: &Path, config: &ParserConfig) -> Result<StatsDocument, String> {
    parse_stats_file(path, config).map_err(|e| format!("Failed to parse '{}': {e}", path.display()))
}

fn parse_files(
    paths: &[PathBuf],
    config: &ParserConfig,
    jobs: Option<usize>,
) -> Result<Vec<StatsDocument>, String> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let documents = pool.install(|| {
        paths
            .par_iter()
            .map(|path| parse_file(path, config))
            .collect::<Result<Vec<_>, String>>()
    })?;
    info!(files = documents.len(), "Parsed reports");
    Ok(documents)
}

fn project(document: &StatsDocument, section: &str, source: &str) -> Result<Table, String> {
    document
        .project(section)
        .map_err(|e| format!("Failed to project '{section}' from '{source}': {e}"))
}

fn source_label(input: Option<&Path>) -> String {
    input.map_or_else(|| "<stdin>".to_string(), |path| path.display().to_string())
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn emit(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}

fn run_parse(args: ParseArgs, config: &ParserConfig) -> Result<(), String> {
    let document = read_document(args.input.as_deref(), config)?;
    let format: OutputFormat = args.format.into();

    if !args.with_meta {
        emit(&format_document(&document, format)?);
        return Ok(());
    }

    #[derive(serde::Serialize)]
    struct ParseOutput<'a> {
        source: String,
        parsed_at: String,
        keys: usize,
        document: &'a StatsDocument,
    }

    let output = ParseOutput {
        source: source_label(args.input.as_deref()),
        parsed_at: chrono::Utc::now().to_rfc3339(),
        keys: document.len(),
        document: &document,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            emit(&yaml);
        }
        OutputFormat::Markdown => {
            println!("# {}\n", output.source);
            println!("- **Parsed at:** {}", output.parsed_at);
            println!("- **Keys:** {}\n", output.keys);
            emit(&format_document(&document, format)?);
        }
        OutputFormat::Table => {
            println!("{} ({} keys, parsed {})", output.source, output.keys, output.parsed_at);
            emit(&format_document(&document, format)?);
        }
    }
    Ok(())
}

fn run_keys(args: KeysArgs, config: &ParserConfig) -> Result<(), String> {
    let document = read_document(args.input.as_deref(), config)?;
    for key in document.keys() {
        println!("{key}");
    }
    Ok(())
}

fn run_get(args: GetArgs, config: &ParserConfig) -> Result<(), String> {
    let document = read_document(args.input.as_deref(), config)?;
    let value = document.get(&args.key);
    if value.is_missing() {
        debug!(key = %args.key, "Key not found");
    }
    emit(&format_value(&args.key, value, args.format.into())?);
    Ok(())
}

fn run_section(args: SectionArgs, config: &ParserConfig) -> Result<(), String> {
    let document = read_document(args.input.as_deref(), config)?;
    let mut table = project(&document, &args.name, &source_label(args.input.as_deref()))?;
    if args.sort {
        table.sort_rows();
    }
    emit(&format_table(&table, args.format.into())?);
    Ok(())
}

fn run_compare(args: CompareArgs, config: &ParserConfig) -> Result<(), String> {
    let paths = [args.left.clone(), args.right.clone()];
    let documents = parse_files(&paths, config, None)?;
    let left = project(&documents[0], &args.section, &args.left.display().to_string())?;
    let right = project(&documents[1], &args.section, &args.right.display().to_string())?;

    let diff = left.difference(&right);
    emit(&format_table(&diff, args.format.into())?);
    Ok(())
}

fn run_cross_section(args: CrossSectionArgs, config: &ParserConfig) -> Result<(), String> {
    let documents = parse_files(&args.inputs, config, args.jobs)?;
    let labels: Vec<String> = args.inputs.iter().map(|path| file_label(path)).collect();

    let tables = documents
        .iter()
        .zip(&args.inputs)
        .map(|(document, path)| project(document, &args.section, &path.display().to_string()))
        .collect::<Result<Vec<_>, String>>()?;
    let sources: Vec<(&str, &Table)> = labels
        .iter()
        .map(String::as_str)
        .zip(tables.iter())
        .collect();

    let joined = cross_section(&sources, &args.column).map_err(|e| e.to_string())?;
    emit(&format_cross_section(&joined, args.format.into())?);
    Ok(())
}

fn run_timeline(args: TimelineArgs, config: &ParserConfig) -> Result<(), String> {
    let documents = parse_files(&args.inputs, config, args.jobs)?;

    let mut timeline = ActivityTimeline::new();
    for (frame, (document, path)) in documents.iter().zip(&args.inputs).enumerate() {
        timeline
            .record_frame(frame, document, &[args.section.as_str()])
            .map_err(|e| format!("Frame {frame} ('{}'): {e}", path.display()))?;
    }

    let series = timeline
        .series(&args.section, &args.element)
        .ok_or_else(|| {
            format!(
                "No element '{}' in section '{}' in any frame",
                args.element, args.section
            )
        })?;
    emit(&format_series(series, args.format.into())?);
    Ok(())
}
