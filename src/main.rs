//! Cafeteria menu - HTTP API for daily menus and serving-team rotation

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafeteria_menu::api::{self, AppState};
use cafeteria_menu::config::Config;
use cafeteria_menu::store::MenuDb;
use cafeteria_menu::types::Meal;

#[derive(Parser)]
#[command(name = "cafeteria-menu")]
#[command(about = "HTTP API for a cafeteria's daily menu and serving-team rotation")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides config and DATABASE_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the database and menu table
    Init,

    /// Print all stored menus
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("cafeteria_menu={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    let _ = dotenvy::dotenv();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let state = AppState::open(&config)?;
            tracing::info!("Using database at {}", config.database_path.display());

            let addr = config.bind_addr();
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Starting HTTP server on {}", addr);

            println!("Cafeteria menu server running at http://{}", addr);
            println!("  Menus:    http://{}/menu", addr);
            println!("  API Docs: http://{}/api/docs", addr);
            println!("  Health:   http://{}/health", addr);

            axum::serve(listener, api::create_router(state)).await?;
        }

        Commands::Init => {
            let db = MenuDb::open(&config.database_path)?;
            println!("✓ Database ready at {}", db.path().display());
        }

        Commands::List => {
            let db = MenuDb::open(&config.database_path)?;
            let menus = db.list()?;

            if menus.is_empty() {
                println!("No menus found");
            } else {
                for menu in menus {
                    let order: Vec<&str> = menu.order.teams().iter().map(|t| t.label()).collect();
                    println!("• {} (#{}) [{}]", menu.date, menu.id, order.join(" → "));
                    print_meal("lunch", &menu.meals.lunch);
                    print_meal("dinner", &menu.meals.dinner);
                }
            }
        }
    }

    Ok(())
}

fn print_meal(label: &str, meal: &Meal) {
    println!(
        "    {:<7} {} / {} / {} / {} / {}",
        format!("{}:", label),
        meal.rice,
        meal.soup,
        meal.dishes,
        meal.kimchi,
        meal.plus_corner
    );
}
