mod cli;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bl_core::config::Config;
use bl_db::ReviewCatalog;
use clap::Parser;
use cli::{Cli, Commands, DEFAULT_CONFIG_FILE};

/// `--config` when given, otherwise `burgerlog.json` if it exists.
fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    })
}

fn open_catalog(config: &Config) -> Result<ReviewCatalog> {
    let pool = bl_server::open_database(config).context("Failed to open database")?;
    Ok(ReviewCatalog::new(pool))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "burgerlog=trace,bl_server=trace,bl_db=debug,bl_media=debug,tower_http=debug".to_string()
        } else {
            "burgerlog=info,bl_server=info,bl_db=info,bl_media=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = Config::load_or_default(config_path.as_deref());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            tracing::info!("Starting burgerlog {}", env!("CARGO_PKG_VERSION"));
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(bl_server::start(config))?;
            Ok(())
        }
        Commands::Export { output } => {
            let config = Config::load_or_default(config_path.as_deref());
            export_reviews(&config, output.as_deref())
        }
        Commands::Import { file } => {
            let config = Config::load_or_default(config_path.as_deref());
            import_reviews(&config, &file)
        }
        Commands::Validate { config } => validate_config(config.or(config_path).as_deref()),
        Commands::Version => {
            println!("burgerlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn export_reviews(config: &Config, output: Option<&Path>) -> Result<()> {
    let reviews = open_catalog(config)?.export()?;
    let json = serde_json::to_string_pretty(&reviews)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} reviews to {}", reviews.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

fn import_reviews(config: &Config, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    let serde_json::Value::Array(records) = value else {
        anyhow::bail!("{} must contain a JSON array of reviews", file.display());
    };

    let imported = open_catalog(config)?.import(records)?;
    println!("Successfully imported {imported} reviews");
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Uploads: {} (served at {})", config.uploads.dir.display(), config.uploads.url_prefix);
    println!("  CORS origins: {}", config.cors.allowed_origins.join(", "));

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}
