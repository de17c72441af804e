use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use fieldcopy::{BatchConfig, FailurePolicy};

use super::error::DemoError;

#[derive(Parser)]
#[command(name = "fieldcopy-demo", about = "Drive sample records through the field copier")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy one sample record, with and without a converter
    Copy(CopyArgs),
    /// Map a batch of sample records
    Batch(BatchArgs),
    /// Print the field plan for Source → Target as JSON
    Plan,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Path to TOML config file
    #[arg(long, default_value = "fieldcopy.toml", env = "FIELDCOPY_CONFIG")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
pub struct CopyArgs {
    #[arg(long, default_value = "1")]
    pub id: String,

    #[arg(long, default_value = "name")]
    pub name: String,

    /// Age as text; parsed into the target's integer field
    #[arg(long, default_value = "22")]
    pub age: String,
}

#[derive(Args, Clone, Debug)]
pub struct BatchArgs {
    /// Number of sample records
    #[arg(long)]
    pub count: Option<usize>,

    /// Stop at the first failed element instead of skipping it
    #[arg(long)]
    pub abort: bool,

    /// Map with the transform variant instead of field copying
    #[arg(long)]
    pub transform: bool,
}

// ---- TOML Config ----

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub count: Option<usize>,
    pub name_prefix: Option<String>,
    pub age_base: Option<String>,
    /// Target fields parsed from text to integers.
    pub parse_fields: Option<Vec<String>>,
    #[serde(default)]
    pub batch: BatchConfig,
}

pub fn load_config(path: &str) -> Result<Config, DemoError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DemoError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content).map_err(|e| DemoError::Config(format!("bad config {path}: {e}")))
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Settings after merging: defaults < config file < CLI.
#[derive(Debug)]
pub struct Effective {
    pub count: usize,
    pub name_prefix: String,
    pub age_base: String,
    pub parse_fields: Vec<String>,
    pub batch: BatchConfig,
}

impl Effective {
    pub fn new(args: &CommonArgs) -> Result<Self, DemoError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };
        Ok(Self::from_config(cfg))
    }

    fn from_config(cfg: Config) -> Self {
        Self {
            count: cfg.count.unwrap_or(5),
            name_prefix: cfg.name_prefix.unwrap_or_else(|| "name".into()),
            age_base: cfg.age_base.unwrap_or_else(|| "11".into()),
            parse_fields: cfg.parse_fields.unwrap_or_else(|| vec!["age".into()]),
            batch: cfg.batch,
        }
    }

    /// Batch config with CLI overrides applied.
    pub fn batch_config(&self, args: &BatchArgs) -> BatchConfig {
        if args.abort {
            BatchConfig::with_policy(FailurePolicy::Abort)
        } else {
            self.batch.clone()
        }
    }
}
