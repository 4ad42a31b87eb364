use std::fs;
use std::path::{Path, PathBuf};

use analysis_schema_config::AnalysesConfig;
use analysis_schema_core::{AnalysisId, Analyses, Resource, validate_resource};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Output format for built resources.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "analyses")]
#[command(about = "Build and inspect attribute definitions generated from analysis trees")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build definitions from an analyses config and print the resource.
    Build(BuildArgs),
    /// Build every configured definition and check the result.
    Validate(ValidateArgs),
    /// Print the analysis tree with effective categories.
    Tree(TreeArgs),
    /// Check a selection of analyses and print the categories it implies.
    Categories(CategoriesArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Path to the analyses config (.yaml, .yml or .json).
    #[arg(long)]
    config: PathBuf,
    /// Build only this definition type instead of the configured targets.
    #[arg(long = "type")]
    type_name: Option<String>,
    /// Name of the top-level choice item (defaults to the type name).
    #[arg(long, requires = "type_name")]
    label: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Path to the analyses config.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Path to the analyses config.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct CategoriesArgs {
    /// Path to the analyses config.
    #[arg(long)]
    config: PathBuf,
    /// Comma-separated names of the enabled analyses.
    #[arg(long)]
    select: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Validate(args) => run_validate(args),
        Command::Tree(args) => run_tree(args),
        Command::Categories(args) => run_categories(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<AnalysesConfig, String> {
    AnalysesConfig::load(path)
        .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let config = load_config(&args.config)?;

    let resource = match &args.type_name {
        Some(type_name) => {
            let analyses = config.to_analyses().map_err(|e| e.to_string())?;
            let label = args.label.as_deref().unwrap_or(type_name);
            let mut resource = Resource::new();
            analyses
                .build_analyses_definition(&mut resource, type_name, label)
                .map_err(|e| e.to_string())?;
            resource
        }
        None => {
            if config.definitions.is_empty() {
                return Err(
                    "Config lists no definitions; pass --type to build one explicitly".to_string(),
                );
            }
            config.build_resource().map_err(|e| e.to_string())?
        }
    };
    info!(definitions = resource.len(), "built resource");

    let raw = format_resource(&resource, args.format)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Wrote {} definition(s) to '{}'.",
                resource.len(),
                path.display()
            );
        }
        None => println!("{raw}"),
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let config = load_config(&args.config)?;
    let analyses = config.to_analyses().map_err(|e| e.to_string())?;
    let resource = config.build_resource().map_err(|e| e.to_string())?;

    let errors = validate_resource(&resource);
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(format!(
            "{} validation error(s): {}",
            errors.len(),
            messages.join("; ")
        ));
    }

    println!(
        "Validated {} analysis(es) and {} definition(s).",
        analyses.len(),
        resource.len()
    );
    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<(), String> {
    let config = load_config(&args.config)?;
    let analyses = config.to_analyses().map_err(|e| e.to_string())?;

    if analyses.top_level_exclusive() {
        println!("(top level is exclusive)");
    }
    let mut lines = Vec::new();
    for id in analyses.top_level() {
        render_tree(&analyses, id, 0, &mut lines);
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn render_tree(analyses: &Analyses, id: AnalysisId, depth: usize, lines: &mut Vec<String>) {
    let Some(analysis) = analyses.get(id) else {
        return;
    };
    let mut line = format!("{}{}", "  ".repeat(depth), analysis.name());
    if analysis.displayed_name() != analysis.name() {
        line.push_str(&format!(" \"{}\"", analysis.displayed_name()));
    }
    if analysis.is_exclusive() && !analysis.children().is_empty() {
        line.push_str(" [exclusive]");
    }
    let categories = analyses.categories(id);
    if !categories.is_empty() {
        let joined: Vec<&str> = categories.iter().map(String::as_str).collect();
        line.push_str(&format!(" {{{}}}", joined.join(", ")));
    }
    lines.push(line);

    for child in analysis.children() {
        render_tree(analyses, *child, depth + 1, lines);
    }
}

fn run_categories(args: CategoriesArgs) -> Result<(), String> {
    let config = load_config(&args.config)?;
    let analyses = config.to_analyses().map_err(|e| e.to_string())?;
    let selection = parse_csv_list(&args.select);
    debug!(?selection, "checking selection");

    let categories = analyses
        .selection_categories(&selection)
        .map_err(|e| e.to_string())?;
    for category in categories {
        println!("{category}");
    }
    Ok(())
}

fn format_resource(resource: &Resource, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(resource)
            .map_err(|err| format!("Failed to serialize resource: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(resource)
            .map_err(|err| format!("Failed to serialize resource: {err}")),
    }
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
