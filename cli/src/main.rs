mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cookify_core::local_state;
use cookify_core::{
    CandidateSource, DietFilter, FileStore, KeyValueStore, MealDbClient, ProbeStatus,
    RecipeCandidate, RecipeFinder, ReqwestClient, ResponseCache, SearchConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cookify")]
#[command(about = "Find recipes you can cook with what you have", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the saved ingredient list
    Ingredients {
        #[command(subcommand)]
        action: IngredientsAction,
    },
    /// Search for recipes
    Search {
        /// Ingredient to search with (repeatable). Overrides the saved list.
        #[arg(long = "ingredient", short = 'i')]
        ingredients: Vec<String>,
        /// all, veg, or non-veg
        #[arg(long, default_value = "all")]
        diet: DietFilter,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one recipe with steps and suggestions
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Save a custom recipe locally
    SaveRecipe {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 0)]
        matched: u32,
        #[arg(long, default_value_t = 0)]
        total: u32,
        #[arg(long)]
        category: Option<String>,
    },
    /// Check that the recipe source is reachable
    Probe,
    /// Manage the on-disk response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum IngredientsAction {
    /// Add ingredients to the saved list
    Add { names: Vec<String> },
    /// Print the saved list
    List,
    /// Remove every saved ingredient
    Clear,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete expired and corrupt cache entries
    Clean,
}

/// Data directory: `COOKIFY_DATA_DIR`, or `~/.cookify`.
fn data_dir() -> PathBuf {
    std::env::var_os("COOKIFY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(FileStore::default_dir)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn session_cache(dir: &std::path::Path) -> ResponseCache {
    ResponseCache::new(Arc::new(FileStore::new(dir.join("session-cache"))))
}

fn http_client(config: &SearchConfig) -> Result<ReqwestClient> {
    ReqwestClient::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")
}

fn finder(dir: &std::path::Path) -> Result<RecipeFinder<ReqwestClient>> {
    let config = SearchConfig::from_env()?;
    let http = http_client(&config)?;
    Ok(RecipeFinder::new(http, session_cache(dir), config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let dir = data_dir();
    let state = FileStore::new(dir.clone());

    match cli.command {
        Commands::Ingredients { action } => ingredients(&state, action)?,
        Commands::Search {
            ingredients,
            diet,
            json,
        } => search(&dir, &state, ingredients, diet, json).await?,
        Commands::Show { id, json } => show(&dir, &id, json).await?,
        Commands::SaveRecipe {
            id,
            title,
            matched,
            total,
            category,
        } => {
            let mut recipe = RecipeCandidate::new(id, CandidateSource::Custom)
                .with_title(title)
                .with_counts(matched, total);
            recipe.category = category;
            let saved = local_state::save_custom_recipe(&state, recipe);
            println!("Saved. {} custom recipe(s) stored.", saved.len());
        }
        Commands::Probe => probe().await?,
        Commands::Cache {
            action: CacheAction::Clean,
        } => {
            let removed = session_cache(&dir).clean_expired();
            println!("Removed {} expired cache entries.", removed);
        }
    }

    Ok(())
}

fn ingredients(state: &dyn KeyValueStore, action: IngredientsAction) -> Result<()> {
    match action {
        IngredientsAction::Add { names } => {
            let mut list = local_state::read_ingredients(state);
            list.extend(names.into_iter().filter(|n| !n.trim().is_empty()));
            local_state::write_ingredients(state, &list).context("Failed to save ingredients")?;
            println!("{} ingredient(s) saved.", list.len());
        }
        IngredientsAction::List => {
            let list = local_state::read_ingredients(state);
            if list.is_empty() {
                println!("No ingredients saved.");
            }
            for name in list {
                println!("{}", name);
            }
        }
        IngredientsAction::Clear => {
            local_state::clear_ingredients(state).context("Failed to clear ingredients")?;
            println!("Ingredient list cleared.");
        }
    }
    Ok(())
}

async fn search(
    dir: &std::path::Path,
    state: &dyn KeyValueStore,
    ingredients: Vec<String>,
    diet: DietFilter,
    json: bool,
) -> Result<()> {
    let ingredients = if ingredients.is_empty() {
        local_state::read_ingredients(state)
    } else {
        ingredients
    };
    let custom = local_state::read_custom_recipes(state);

    let finder = finder(dir)?;
    match finder.search(&ingredients, &custom, diet).await {
        Ok(results) if json => println!("{}", serde_json::to_string_pretty(&results)?),
        Ok(results) => render::print_results(&results),
        Err(e) if e.is_retryable() => {
            eprintln!("{}", e);
            eprintln!("Check your connection and run the search again.");
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn show(dir: &std::path::Path, id: &str, json: bool) -> Result<()> {
    let finder = finder(dir)?;
    let detail = finder
        .recipe_detail(id)
        .await
        .with_context(|| format!("Recipe {} could not be loaded", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        render::print_detail(&detail);
    }
    Ok(())
}

async fn probe() -> Result<()> {
    let config = SearchConfig::from_env()?;
    let db = MealDbClient::new(http_client(&config)?, &config.base_url)?;

    match db.probe().await {
        ProbeStatus::Working => println!("Recipe source is working: {}", db.base_url()),
        ProbeStatus::NoResults => println!("Recipe source answered but returned no recipes."),
        ProbeStatus::Failed(message) => anyhow::bail!("Recipe source unreachable: {}", message),
    }
    Ok(())
}
