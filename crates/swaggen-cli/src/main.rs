use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swaggen_core::config::{self, CONFIG_FILE_NAME, SwaggenConfig};
use swaggen_core::parse::{self, document::Document};
use swaggen_core::resolve::Type;
use swaggen_core::{GenerationPlan, generate};

#[derive(Parser)]
#[command(
    name = "swaggen",
    about = "Swagger/OpenAPI client SDK generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a document and print its type pool and module plan
    Plan {
        /// Path to the Swagger/OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: PlanFormat,
    },

    /// Validate a document by running the full pipeline
    Validate {
        /// Path to the Swagger/OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new swaggen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum PlanFormat {
    Text,
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { input, format } => cmd_plan(input, format),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swaggen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwaggenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let document = match ext {
        "yaml" | "yml" => parse::from_yaml(&content)?,
        _ => parse::from_json(&content)?,
    };
    log::debug!("parsed {}", path.display());
    Ok(document)
}

fn cmd_plan(input: Option<PathBuf>, format: PlanFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let document = load_document(&input)?;
    let plan = generate(&document, &cfg)?;

    match format {
        PlanFormat::Text => print!("{}", plan.summary(&cfg.extension)),
        PlanFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&build_plan_summary(&plan, &cfg.extension))?;
            print!("{}", yaml);
        }
        PlanFormat::Json => {
            let json = serde_json::to_string_pretty(&build_plan_summary(&plan, &cfg.extension))?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let document = load_document(&input)?;
    let spec = document.spec();

    eprintln!(
        "Valid {} document: {}",
        spec.version().unwrap_or("unknown"),
        spec.info.title
    );
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Schemas: {}", spec.schemas().count());

    // Also validate that it resolves and groups cleanly
    let cfg = try_load_config()?.unwrap_or_default();
    let plan = generate(&document, &cfg)?;
    eprintln!("  Types: {}", plan.pool().len());
    eprintln!("  Modules: {}", plan.modules().len());

    eprintln!("Validation successful.");
    Ok(())
}

fn build_plan_summary(plan: &GenerationPlan, extension: &str) -> serde_json::Value {
    let pool = plan.pool();

    let types: Vec<serde_json::Value> = pool
        .iter()
        .map(|(id, ty)| {
            let mut entry = serde_json::json!({
                "name": ty.name(),
                "kind": ty.kind().as_str(),
                "dependencies": pool
                    .dependencies(id)
                    .into_iter()
                    .map(|d| pool.get(d).name())
                    .collect::<Vec<_>>(),
            });
            if let Type::Operation(op) = ty {
                entry["method"] = op.method.as_str().into();
                entry["path"] = op.path.clone().into();
            }
            entry
        })
        .collect();

    let modules: Vec<serde_json::Value> = plan
        .modules()
        .iter()
        .map(|(id, module)| {
            let imports: Vec<serde_json::Value> = plan
                .dependency_records(id)
                .iter()
                .map(|record| {
                    serde_json::json!({
                        "name": record.exported_name,
                        "module": record.module_name,
                        "path": record.relative_path(extension, false),
                    })
                })
                .collect();
            serde_json::json!({
                "name": module.name.original,
                "kind": module.kind.as_str(),
                "path": module.get_path(extension),
                "emittable": module.emittable,
                "exports": module.exports,
                "imports": imports,
            })
        })
        .collect();

    serde_json::json!({
        "types": types,
        "modules": modules,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
