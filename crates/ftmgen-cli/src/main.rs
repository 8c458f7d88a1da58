use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ftmgen::{generate_catalog, load_documents, write_sources, Config, SchemaSource};
use ftmgen_core::AttributeMode;
use ftmgen_parser::{SchemaCatalog, SchemaFetcher, DEFAULT_SCHEMA_URL};

#[derive(Parser)]
#[command(name = "ftmgen")]
#[command(about = "Generate Java sources from FollowTheMoney schemas", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one Java file per schema
    Generate(GenerateArgs),

    /// Download the schema YAML files only
    Fetch {
        /// Contents-API listing of the schema directory
        #[arg(short, long, default_value = DEFAULT_SCHEMA_URL)]
        url: String,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Directory of schema YAML files
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Contents-API listing to fetch schemas from
    #[arg(short, long)]
    url: Option<String>,

    /// Output directory for the Java files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Which properties become attributes
    #[arg(short = 'm', long, value_enum)]
    attribute_mode: Option<AttributeMode>,

    /// Generate interfaces with accessors only
    #[arg(long)]
    interfaces: bool,

    /// Known type names (defaults to every loaded schema)
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Java package of the generated sources
    #[arg(short, long)]
    package: Option<String>,

    /// Types that never hold state
    #[arg(long, value_delimiter = ',')]
    mixins: Option<Vec<String>>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Overlay command-line flags on the config file
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if self.input.is_some() || self.url.is_some() {
            config.input = self.input;
            config.url = self.url;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.mixins.is_some() {
            config.mixins = self.mixins;
        }
        if let Some(mode) = self.attribute_mode {
            config.generator.attribute_mode = mode;
        }
        if self.interfaces {
            config.generator.interfaces = true;
        }
        if let Some(models) = self.models {
            config.generator.models = Some(models.into_iter().collect::<BTreeSet<_>>());
        }
        if let Some(package) = self.package {
            config.generator.package = package;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => handle_generate(args.into_config()?).await,
        Commands::Fetch { url, output } => handle_fetch(&url, output).await,
    }
}

async fn handle_generate(config: Config) -> Result<()> {
    let source = match (&config.input, &config.url) {
        (Some(dir), _) => SchemaSource::Dir(dir.clone()),
        (None, Some(url)) => SchemaSource::Url(url.clone()),
        (None, None) => bail!("Either --input or --url is required"),
    };
    let Some(output) = &config.output else {
        bail!("--output is required");
    };

    let documents = load_documents(&source).await?;
    let catalog = SchemaCatalog::from_documents(&documents)?;
    info!(
        "Generating {} schemas with {} attributes",
        catalog.len(),
        config.generator.attribute_mode
    );

    let sources = generate_catalog(&catalog, &config.generator, config.mixins.as_deref())?;
    write_sources(&sources, output)?;
    Ok(())
}

async fn handle_fetch(url: &str, output: PathBuf) -> Result<()> {
    info!("Fetching schemas from {}", url);
    let fetcher = SchemaFetcher::new()?;
    let written = fetcher
        .fetch_to_dir(url, &output)
        .await
        .with_context(|| format!("Failed to fetch schemas from {}", url))?;
    info!("Saved {} schema files to {:?}", written.len(), output);
    Ok(())
}
