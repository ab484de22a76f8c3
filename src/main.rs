use bridal_folio::config::{self, Secrets, SiteConfig};
use bridal_folio::server::{self, AppState};
use bridal_folio::source::{self, ContentSource, ContentStore, DocumentWriter};
use bridal_folio::{output, pages};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bridal-folio")]
#[command(about = "Portfolio site for a bridal makeup and mehendi studio")]
#[command(long_about = "\
Portfolio site for a bridal makeup and mehendi studio

Pages are rendered on request from a headless content store and cached
until the store's webhook reports a change.

Site root:

  site/
  ├── config.toml            # Site config (optional, overrides stock defaults)
  └── content/               # Snapshot store (when content.backend = \"snapshot\")
      ├── categories.json    # Records carry their _type
      ├── media/*.ndjson
      └── writes.ndjson      # Location shares written by the site

Secrets come from the environment: REVALIDATE_SECRET, SANITY_API_READ_TOKEN,
SANITY_API_WRITE_TOKEN.

Run 'bridal-folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root containing config.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Address to bind, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load every collection and print a content inventory
    Check,
    /// Print the derived views (cards, batches, bento sizes) as JSON
    Views {
        /// Category filter; omit for "All"
        #[arg(long)]
        category: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Config, secrets and the content store for one site root.
struct Site {
    config: SiteConfig,
    secrets: Secrets,
    store: Arc<dyn ContentStore>,
    writer: Option<Arc<dyn DocumentWriter>>,
}

impl Site {
    fn open(root: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::load_config(root)?;
        let secrets = Secrets::from_env();
        let (store, writer) = source::open(root, &config, &secrets)?;
        Ok(Self {
            config,
            secrets,
            store,
            writer,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bridal_folio=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let site = Site::open(&cli.root)?;
            let bind = bind.unwrap_or_else(|| site.config.server.bind.clone());
            if site.writer.is_none() {
                tracing::warn!("no document writer configured; location shares will fail");
            }
            if site.secrets.revalidate_secret.is_none() {
                tracing::warn!("REVALIDATE_SECRET not set; /api/revalidate is disabled");
            }
            let state = AppState::new(site.store, site.writer, site.config, site.secrets);
            server::serve(state, &bind).await?;
        }
        Command::Check => {
            let site = Site::open(&cli.root)?;
            let source = ContentSource::new(site.store, &site.config.videos);
            let inventory = pages::inventory(&source).await?;
            output::print_check_output(&inventory);
        }
        Command::Views { category } => {
            let site = Site::open(&cli.root)?;
            let source = ContentSource::new(site.store, &site.config.videos);
            let views =
                pages::derived_views(&source, &site.config.layout, category.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
