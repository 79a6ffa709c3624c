//! cookbook - command-line front end for the recipe engine
//!
//! Wires the SQLite store, TheMealDB client and a static signed-in user to
//! the engine and runs one command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cookbook_common::config::{self as common_config, TomlConfig, ROOT_FOLDER_ENV};
use cookbook_common::events::EventBus;
use cookbook_engine::auth::StaticAuth;
use cookbook_engine::authoring::RecipeDraft;
use cookbook_engine::catalog::MealDbClient;
use cookbook_engine::config::EngineSettings;
use cookbook_engine::db;
use cookbook_engine::store::SqliteRecipeStore;
use cookbook_engine::types::{Filter, Ingredient, Recipe};
use cookbook_engine::CookbookEngine;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_PROFILE"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Command-line arguments for cookbook
#[derive(Parser, Debug)]
#[command(name = "cookbook")]
#[command(about = "Search, browse and favorite recipes from your store and TheMealDB")]
#[command(version, long_version = LONG_VERSION)]
struct Args {
    /// Root folder holding the recipe database
    #[arg(short, long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// TOML config file (defaults to the platform config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Signed-in user id (overrides configuration)
    #[arg(short, long)]
    user: Option<String>,

    /// Use a throwaway in-memory database
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search both sources by text and/or one filter
    Search {
        /// Free text (beats any filter on the catalog side)
        query: Option<String>,
        #[arg(long, conflicts_with_all = ["area", "ingredient", "diet"])]
        category: Option<String>,
        #[arg(long, conflicts_with_all = ["ingredient", "diet"])]
        area: Option<String>,
        #[arg(long, conflicts_with = "diet")]
        ingredient: Option<String>,
        /// Dietary preset: vegetarian, vegan or gluten-free
        #[arg(long)]
        diet: Option<String>,
    },
    /// Your own recipes (the default view)
    List,
    /// Your favorites
    Favorites,
    /// Favorite a catalog recipe by its catalog id
    Favorite { catalog_id: String },
    /// Unfavorite one of your favorites by store id
    Unfavorite { id: String },
    /// Create a recipe
    Add {
        title: String,
        #[arg(long, default_value = "Other")]
        category: String,
        /// Ingredient as NAME[:AMOUNT[:UNIT]], repeatable
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long, default_value = "")]
        instructions: String,
    },
    /// Delete one of your recipes by store id
    Delete { id: String },
    /// Show one catalog recipe
    Show { catalog_id: String },
    /// Show a random catalog recipe
    Random,
    /// List filter picker options
    Options,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = match &args.config {
        Some(path) => common_config::load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => common_config::load_default_toml_config(),
    };
    let mut settings = EngineSettings::resolve(&toml_config);
    if let Some(user) = &args.user {
        settings.user_id = Some(user.clone());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("cookbook={0},cookbook_engine={0}", settings.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = build_engine(&args, &toml_config, &settings).await?;
    run(engine, args.command).await
}

async fn build_engine(
    args: &Args,
    toml_config: &TomlConfig,
    settings: &EngineSettings,
) -> Result<CookbookEngine> {
    let pool = if args.ephemeral {
        info!("Using in-memory database");
        db::init_memory_pool()
            .await
            .context("Failed to open in-memory database")?
    } else {
        let root_folder = common_config::resolve_root_folder(
            args.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            toml_config,
        );
        let db_path = common_config::database_path(&root_folder);
        info!("Database: {}", db_path.display());
        db::init_database_pool(&db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?
    };

    let catalog = MealDbClient::new(settings.catalog_base_url.clone(), settings.catalog_timeout)
        .context("Failed to build catalog client")?;
    info!("Catalog: {}", catalog.base_url());

    let auth = match &settings.user_id {
        Some(user) => StaticAuth::signed_in(user.clone()),
        None => StaticAuth::signed_out(),
    };

    Ok(CookbookEngine::new(
        Arc::new(SqliteRecipeStore::new(pool)),
        Arc::new(catalog),
        Arc::new(auth),
        EventBus::default(),
        settings,
    ))
}

async fn run(engine: CookbookEngine, command: Command) -> Result<()> {
    match command {
        Command::Search {
            query,
            category,
            area,
            ingredient,
            diet,
        } => {
            let filter = match (category, area, ingredient, diet) {
                (Some(c), _, _, _) => Some(Filter::by_category(c)),
                (_, Some(a), _, _) => Some(Filter::by_area(a)),
                (_, _, Some(i), _) => Some(Filter::by_ingredient(i)),
                (_, _, _, Some(d)) => Some(diet_filter(&d)?),
                _ => None,
            };

            let results = engine.router().search(query.as_deref(), filter).await?;
            print_recipes(results.recipes());
        }
        Command::List => print_recipes(&engine.router().execute().await?.into_recipes()),
        Command::Favorites => print_recipes(&engine.local.favorites().await?),
        Command::Favorite { catalog_id } => {
            let Some(mut recipe) = engine.remote.lookup(&catalog_id).await? else {
                bail!("Catalog has no recipe {}", catalog_id);
            };
            let outcome = engine.reconciler.set_favorite(&mut recipe, true).await?;
            println!("{:?}: {}", outcome, recipe.title);
        }
        Command::Unfavorite { id } => {
            let favorites = engine.local.favorites().await?;
            let Some(mut recipe) = favorites
                .into_iter()
                .find(|r| r.id.as_deref() == Some(id.as_str()))
            else {
                bail!("No favorite with id {}", id);
            };
            let outcome = engine.reconciler.set_favorite(&mut recipe, false).await?;
            println!("{:?}: {}", outcome, recipe.title);
        }
        Command::Add {
            title,
            category,
            ingredients,
            instructions,
        } => {
            let draft = RecipeDraft {
                title,
                category,
                ingredients: ingredients.iter().map(|s| parse_ingredient(s)).collect(),
                instructions,
                image_url: None,
            };
            let recipe = engine.author.create_recipe(draft).await?;
            println!("Created {} ({})", recipe.title, recipe.id.unwrap_or_default());
        }
        Command::Delete { id } => {
            engine.author.delete_recipe(&id).await?;
            println!("Deleted {}", id);
        }
        Command::Show { catalog_id } => match engine.remote.lookup(&catalog_id).await? {
            Some(recipe) => print_detail(&recipe),
            None => bail!("Catalog has no recipe {}", catalog_id),
        },
        Command::Random => match engine.remote.random().await? {
            Some(recipe) => print_detail(&recipe),
            None => bail!("Catalog returned no random recipe"),
        },
        Command::Options => {
            let options = engine.filter_options().await;
            let categories: Vec<&str> =
                options.categories.iter().map(|c| c.name.as_str()).collect();
            println!("Categories: {}", categories.join(", "));
            println!("Areas: {}", options.areas.join(", "));
            println!("Ingredients: {} available", options.ingredients.len());
            if options.timed_out {
                println!("(partial: catalog did not answer in time)");
            }
        }
    }
    Ok(())
}

fn diet_filter(name: &str) -> Result<Filter> {
    match name.to_ascii_lowercase().as_str() {
        "vegetarian" => Ok(Filter::vegetarian_only()),
        "vegan" => Ok(Filter::vegan_only()),
        "gluten-free" | "gluten_free" | "glutenfree" => Ok(Filter::gluten_free_only()),
        other => bail!("Unknown diet '{}' (expected vegetarian, vegan or gluten-free)", other),
    }
}

/// `NAME[:AMOUNT[:UNIT]]` → user-entered ingredient
fn parse_ingredient(value: &str) -> Ingredient {
    let mut parts = value.splitn(3, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let amount = parts.next().filter(|a| !a.is_empty()).unwrap_or("1");
    let unit = parts.next().unwrap_or_default();
    Ingredient::custom(name, amount, unit)
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes");
        return;
    }
    for recipe in recipes {
        let source = if recipe.imported_from_catalog { "catalog" } else { "mine" };
        let heart = if recipe.favorite { " *" } else { "" };
        println!(
            "{}{} [{}] ({} {}){}",
            recipe.title,
            heart,
            recipe.category,
            source,
            recipe.key(),
            recipe.area.as_deref().map(|a| format!(" {}", a)).unwrap_or_default()
        );
    }
}

fn print_detail(recipe: &Recipe) {
    println!("{} [{}] ({})", recipe.title, recipe.category, recipe.key());
    for ingredient in &recipe.ingredients {
        println!("  - {} {} {}", ingredient.amount, ingredient.unit, ingredient.name);
    }
    if !recipe.instructions.is_empty() {
        println!();
        println!("{}", recipe.instructions);
    }
}
