//! CLI entry point for techblog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "techblog-rs")]
#[command(version)]
#[command(about = "Index and serve a Markdown technical blog", long_about = None)]
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

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Group (subdirectory) to place the post in
        #[arg(short, long)]
        group: Option<String>,

        /// Tag to add; may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List posts, groups or tags
    List {
        /// Type of content to list (post, group, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list posts in this group
        #[arg(short, long)]
        group: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Show {
        /// Post slug, e.g. tutorials/getting-started
        slug: String,

        /// Print rendered HTML instead of the raw body
        #[arg(long)]
        html: bool,
    },

    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (overrides config)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "techblog_rs=debug,info"
    } else {
        "techblog_rs=info"
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
            techblog_rs::Blog::init(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, group, tags } => {
            let blog = techblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = blog.new_post(&title, group.as_deref(), &tags)?;
            println!("Created: {:?}", path);
        }

        Commands::List {
            r#type,
            group,
            json,
        } => {
            let blog = techblog_rs::Blog::new(&base_dir)?;
            techblog_rs::commands::list::run(&blog, &r#type, group.as_deref(), json)?;
        }

        Commands::Show { slug, html } => {
            let blog = techblog_rs::Blog::new(&base_dir)?;
            techblog_rs::commands::show::run(&blog, &slug, html)?;
        }

        Commands::Serve { port, ip } => {
            let blog = techblog_rs::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            techblog_rs::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("techblog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
