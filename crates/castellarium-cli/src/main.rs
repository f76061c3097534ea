mod account;
mod app;
mod catalog;
mod map;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use account::AccountCommands;
use map::MapCommands;

#[derive(Debug, Parser)]
#[command(name = "castellarium")]
#[command(about = "Browse French castles and track the ones you have visited")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search castles by name, commune, department or region
    Search {
        /// Text to look for (case-insensitive)
        text: String,
        /// Also look up an illustration for the first results
        #[arg(long)]
        images: bool,
    },
    /// Show one castle in full
    Show {
        /// Castle id
        id: String,
    },
    /// Look up illustrations for castles
    Image {
        /// Castle ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Toggle a castle in the visited list
    Visit {
        /// Castle id
        id: String,
    },
    /// Toggle a castle in the wishlist
    Wish {
        /// Castle id
        id: String,
    },
    /// List visited or wishlisted castles
    List {
        #[arg(value_enum)]
        which: ListKind,
    },
    /// Visited counts by era and by region
    Stats,
    /// Map views over castle positions
    Map {
        #[command(subcommand)]
        command: MapCommands,
    },
    /// Sign in to sync lists, sign out, or show the session
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Convert a Mérimée monuments CSV export into the dataset JSON
    Import {
        /// `;`-delimited CSV export
        csv: PathBuf,
        /// Where to write the dataset
        #[arg(long, default_value = "chateaux.json")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    Visited,
    Wishlist,
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Converts a monuments CSV export. Needs neither the dataset nor storage.
fn run_import(csv: &std::path::Path, output: &std::path::Path) -> anyhow::Result<()> {
    let summary = castellarium_ingest::import_file(csv, output)?;
    println!(
        "{} castles selected from {} rows, written to {}",
        summary.selected,
        summary.total_rows,
        output.display()
    );
    if summary.skipped > 0 {
        eprintln!("warning: {} unreadable rows were skipped", summary.skipped);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = castellarium_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let command = match cli.command {
        Some(Commands::Import { csv, output }) => return run_import(&csv, &output),
        other => other,
    };

    let mut ctx = app::AppContext::load(config).await?;

    // A remembered session behaves like the identity provider reporting a
    // signed-in user at startup.
    let explicit_auth = matches!(
        command,
        Some(Commands::Account {
            command: AccountCommands::SignIn { .. } | AccountCommands::SignOut
        })
    );
    if !explicit_auth {
        ctx.restore_session().await?;
    }

    match command {
        Some(Commands::Search { text, images }) => catalog::run_search(&ctx, &text, images).await,
        Some(Commands::Show { id }) => catalog::run_show(&ctx, &id).await?,
        Some(Commands::Image { ids }) => catalog::run_image(&ctx, &ids).await?,
        Some(Commands::Visit { id }) => catalog::run_visit(&mut ctx, &id).await?,
        Some(Commands::Wish { id }) => catalog::run_wish(&mut ctx, &id).await?,
        Some(Commands::List { which }) => catalog::run_list(&ctx, which),
        Some(Commands::Stats) => catalog::run_stats(&ctx),
        Some(Commands::Map { command }) => map::run_map(&ctx, command)?,
        Some(Commands::Account { command }) => account::run_account(&mut ctx, command).await?,
        Some(Commands::Import { .. }) | None => catalog::run_overview(&ctx),
    }

    Ok(())
}
