use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments, validated once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
    pub database_url: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Memorial photo gallery")]
pub struct Args {
    /// Host to bind to (overrides MEMORIAL_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides MEMORIAL_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where image payloads are stored (overrides MEMORIAL_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides MEMORIAL_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Apply the schema and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |name| env::var(name))?;
        cfg.validate()?;
        Ok((cfg, migrate))
    }

    /// Merge CLI args over environment lookups over defaults.
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = lookup("MEMORIAL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match lookup("MEMORIAL_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing MEMORIAL_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading MEMORIAL_PORT"),
        };
        let env_storage =
            lookup("MEMORIAL_STORAGE_DIR").unwrap_or_else(|_| "./data/blobs".into());
        let env_db = lookup("MEMORIAL_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/memorial.db".into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
        })
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("port must be non-zero");
        }
        if self.storage_dir.trim().is_empty() {
            bail!("storage directory must not be empty");
        }
        if !self.database_url.starts_with("sqlite:") {
            bail!(
                "database URL `{}` is not a sqlite URL",
                self.database_url
            );
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
