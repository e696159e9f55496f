//! Galley CLI - declarative workflow runner
//!
//! Usage:
//!   galley run <recipe>            Run a recipe by name or path
//!   galley list                    List registered ingredients
//!   galley search <query>          Search the pantry
//!   galley info <id>               Show ingredient details
//!   galley deps <id>               Show ingredient dependencies
//!   galley validate                Validate every registered ingredient
//!   galley discover [paths..]      Scan for descriptors and register them

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use galley::pantry::access::Permission;
use galley::{
    Category, GalleyConfig, HandlerRegistry, KitchenEngine, Pantry, RunStatus, output,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "galley")]
#[command(about = "Declarative workflow runner with an ingredient pantry")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to ./galley.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pantry root directory
    #[arg(long, global = true, env = "GALLEY_PANTRY")]
    pantry: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a recipe to completion
    Run {
        /// Recipe name or path to a recipe file
        recipe: String,
    },

    /// List registered ingredients
    List {
        /// Restrict to one category (task, tool, module, skill, config, schema)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Restrict to ingredients carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Search ingredients by name, description, and tags
    Search {
        /// Query string
        query: String,

        /// Restrict to one category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Show ingredient details
    Info {
        /// Ingredient id
        id: String,
    },

    /// Show ingredient dependencies
    Deps {
        /// Ingredient id
        id: String,

        /// Show the full resolved dependency order
        #[arg(long)]
        resolve: bool,
    },

    /// Validate every registered ingredient
    Validate,

    /// Scan directories for descriptors and register what validates
    Discover {
        /// Directories to scan (config discovery paths if omitted)
        paths: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            output::error(&format!("{e:#}"));
            return ExitCode::from(2);
        }
    };

    init_tracing(&config);

    match run_command(cli, config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::from(2)
        }
    }
}

fn load_config(cli: &Cli) -> Result<GalleyConfig> {
    let mut config = GalleyConfig::load_or_default(cli.config.as_deref())?;
    if let Some(pantry) = &cli.pantry {
        config.pantry.root = pantry.clone();
    }
    Ok(config)
}

fn init_tracing(config: &GalleyConfig) {
    use tracing_subscriber::EnvFilter;

    let default = config.log_level.as_deref().unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(cli: Cli, config: GalleyConfig) -> Result<u8> {
    let pantry = Pantry::open(&config.pantry.root)
        .with_context(|| format!("cannot open pantry at {}", config.pantry.root.display()))?;

    match cli.command {
        Commands::Run { recipe } => {
            let path = resolve_recipe(&recipe, &config.recipes.path)?;
            output::detail(&format!("recipe {}", path.display()));
            let mut engine = KitchenEngine::new(pantry, HandlerRegistry::builtin(), &config);
            engine.build_registry(&config.pantry.discovery_paths)?;
            let record = engine.run_file(&path)?;
            Ok(match record.status {
                RunStatus::Completed => 0,
                RunStatus::CompletedWithFailures => 1,
                _ => 2,
            })
        }

        Commands::List { category, tag } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let ingredients = match tag {
                Some(tag) => pantry.list_by_tag(&tag),
                None => pantry.list(category),
            };
            if ingredients.is_empty() {
                output::info("no ingredients registered");
            }
            for ingredient in ingredients {
                output::list_item(
                    &ingredient.id,
                    &format!("[{} {}]", ingredient.category.as_str(), ingredient.version),
                    false,
                );
            }
            Ok(0)
        }

        Commands::Search { query, category } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let results = pantry.search(&query, category);
            if results.is_empty() {
                output::info(&format!("no ingredients matching '{query}'"));
            }
            for result in results {
                println!(
                    "  {} {} {}",
                    result.ingredient.id.bold(),
                    result.ingredient.version.cyan(),
                    result.ingredient.description.dimmed()
                );
            }
            Ok(0)
        }

        Commands::Info { id } => {
            let Some(ingredient) = pantry.get(&id) else {
                bail!("ingredient not found: {id}");
            };
            println!("{:<14} {}", "Id:".bold(), ingredient.id.bold().cyan());
            println!("{:<14} {}", "Name:".bold(), ingredient.name);
            println!("{:<14} {}", "Version:".bold(), ingredient.version.green());
            println!("{:<14} {}", "Category:".bold(), ingredient.category.as_str());
            if !ingredient.description.is_empty() {
                println!("{:<14} {}", "Description:".bold(), ingredient.description);
            }
            if !ingredient.dependencies.is_empty() {
                println!("{:<14} {}", "Depends:".bold(), ingredient.dependencies.join(", "));
            }
            if !ingredient.tags.is_empty() {
                println!("{:<14} {}", "Tags:".bold(), ingredient.tags.join(", "));
            }
            if !ingredient.author.is_empty() {
                println!("{:<14} {}", "Author:".bold(), ingredient.author);
            }
            println!("{:<14} {:?}", "Access:".bold(), ingredient.access_level);
            println!(
                "{:<14} {}",
                "Updated:".bold(),
                ingredient.updated.format("%Y-%m-%d %H:%M UTC").to_string().dimmed()
            );
            Ok(0)
        }

        Commands::Deps { id, resolve } => {
            if !pantry.contains(&id) {
                bail!("ingredient not found: {id}");
            }
            if resolve {
                let conflicts = pantry.check_conflicts(&id);
                for conflict in &conflicts {
                    output::warning(&conflict.to_string());
                }
                let order = pantry.resolve_dependencies(&id);
                output::info(&format!("Load order for {}:", id.bold()));
                if order.is_empty() {
                    println!("  {}", "(no dependencies)".dimmed());
                }
                for (i, dep) in order.iter().enumerate() {
                    let marker = if pantry.contains(dep) {
                        dep.green().to_string()
                    } else {
                        format!("{} {}", dep, "[missing]".red())
                    };
                    println!("  {}. {}", i + 1, marker);
                }
            } else {
                let deps = pantry.get_dependencies(&id);
                output::info(&format!("Dependencies for {}:", id.bold()));
                if deps.is_empty() {
                    println!("  {}", "(none)".dimmed());
                }
                for dep in deps {
                    println!("  {} {}", "-".cyan(), dep);
                }
            }
            Ok(0)
        }

        Commands::Validate => {
            let results = pantry.validate_all();
            for result in results.iter().filter(|r| !r.valid || !r.warnings.is_empty()) {
                for error in &result.errors {
                    output::error(&format!("{}: {error}", result.ingredient_id));
                }
                for warning in &result.warnings {
                    output::warning(&format!("{}: {warning}", result.ingredient_id));
                }
            }
            let summary = pantry.validation_summary();
            output::info(&format!(
                "{}/{} ingredients valid ({:.0}%)",
                summary.valid_ingredients,
                summary.total_ingredients,
                summary.validation_rate * 100.0
            ));
            Ok(if summary.invalid_ingredients == 0 { 0 } else { 1 })
        }

        Commands::Discover { paths } => {
            let mut pantry = pantry;
            let paths = if paths.is_empty() {
                config.pantry.discovery_paths.clone()
            } else {
                paths
            };
            if paths.is_empty() {
                bail!("no discovery paths given and none configured");
            }
            let results = pantry.discover_and_register(&paths)?;
            for result in &results {
                output::list_item(
                    &result.ingredient.id,
                    &result.file_path.display().to_string(),
                    pantry.can_access("anonymous", &result.ingredient.id, Permission::Read),
                );
            }
            output::success(&format!("{} descriptor(s) processed", results.len()));
            Ok(0)
        }
    }
}

fn parse_category(name: &str) -> Result<Category> {
    Category::from_name(name).ok_or_else(|| anyhow::anyhow!("unknown category: {name}"))
}

/// Validate a recipe name to prevent path traversal
fn validate_recipe_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("recipe name cannot be empty");
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        bail!(
            "invalid recipe name '{name}': only alphanumeric characters, underscores, and hyphens are allowed"
        );
    }
    Ok(())
}

/// Resolve a recipe name to a file path
fn resolve_recipe(recipe: &str, recipes_path: &std::path::Path) -> Result<PathBuf> {
    let is_explicit_path = recipe.contains('/') || recipe.ends_with(".json");
    if is_explicit_path {
        let as_path = PathBuf::from(recipe);
        if as_path.exists() {
            return Ok(as_path);
        }
        bail!("recipe file not found: {recipe}");
    }

    validate_recipe_name(recipe)?;

    let recipe_file = recipes_path.join(format!("{recipe}.json"));
    if recipe_file.exists() {
        return Ok(recipe_file);
    }

    bail!(
        "recipe not found: {recipe}\nsearched in: {}",
        recipes_path.display()
    )
}
