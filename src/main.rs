use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use recipe_lens::acquisition::resolve_upload_path;
use recipe_lens::{
    analyze_image, recipe_detail, FlaskClient, ImageRef, LensConfig, LensError,
    StaticContentResolver, VOCABULARY,
};

#[derive(Parser)]
#[command(name = "recipe-lens", version, about = "Find recipes from a photo of your ingredients")]
struct Cli {
    /// Service root URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds, overrides the configuration
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and print the detected ingredients
    Analyze {
        /// Image path or file:// reference
        image: String,
        /// Also download the annotated output image to this path
        #[arg(long)]
        save_output: Option<PathBuf>,
    },
    /// Search recipes for a comma separated ingredient list
    Search {
        /// e.g. "egg,onion,garlic"
        ingredients: String,
    },
    /// Print the full record of a recipe
    Detail { id: i64 },
    /// List the ingredient names that can be added by hand
    Vocabulary,
    /// Show which local file a reference resolves to
    Resolve { reference: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.notice());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LensError> {
    let mut config = LensConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    let client = FlaskClient::new(config)?;

    match cli.command {
        Commands::Analyze { image, save_output } => {
            let path = resolve_local(&image).await?;
            let result = analyze_image(&client, &path).await?;
            println!("image: {}", result.image_url);
            for ingredient in &result.ingredients {
                println!("- {}", ingredient);
            }
            if let Some(out) = save_output {
                let bytes = client.download_image(&result.output_image).await?;
                tokio::fs::write(&out, bytes).await?;
                println!("saved: {}", out.display());
            }
        }
        Commands::Search { ingredients } => {
            let recipes = client.search_recipes(&ingredients).await?;
            if recipes.is_empty() {
                return Err(LensError::EmptyResult);
            }
            for recipe in recipes {
                println!(
                    "{:>8}  {} ({} likes, {} missing)",
                    recipe.id, recipe.title, recipe.likes, recipe.missed_ingredient_count
                );
            }
        }
        Commands::Detail { id } => {
            let detail = recipe_detail(&client, id).await?;
            println!("{}", detail.title);
            println!("\nIngredients");
            for line in detail.ingredient_lines() {
                println!("  {}", line);
            }
            println!("\nSteps");
            for step in detail.numbered_steps() {
                println!("  {}", step);
            }
        }
        Commands::Vocabulary => {
            for name in VOCABULARY {
                println!("{}", name);
            }
        }
        Commands::Resolve { reference } => {
            let path = resolve_local(&reference).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Only file references can be resolved outside a device
async fn resolve_local(reference: &str) -> Result<PathBuf, LensError> {
    let image = ImageRef::parse(reference);
    resolve_upload_path(image.as_ref(), &StaticContentResolver::new())
        .await
        .ok_or(LensError::NothingToUpload)
}
