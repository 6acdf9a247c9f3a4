//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Markdown content collections and an RSS feed for a personal site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or note
    New {
        /// Layout to use (post, note)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new entry
        title: String,

        /// File name (without extension) relative to the collection directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Validate content and generate the feed
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, note, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            layout,
            title,
            path,
        } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            let file = site.new_entry(&title, &layout, path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Generate { watch } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Generating...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                folio::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip, r#static } => {
            let site = folio::Site::new(&base_dir)?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&site, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
