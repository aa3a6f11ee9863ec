use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, DiscoveryConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the oracle (agent CLI) binary
    #[arg(long, global = true)]
    pub oracle_bin: Option<String>,

    /// Model passed to the oracle
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Subtitle blocks per translation request
    #[arg(short, long, global = true)]
    pub batch_size: Option<usize>,

    /// Source language code
    #[arg(long, global = true)]
    pub source_lang: Option<String>,

    /// Target language code
    #[arg(long, global = true)]
    pub target_lang: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate every subtitle file found under a directory
    Run {
        /// Directory to search recursively
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Translate a single subtitle file
    Translate {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to the translated name next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },

    /// Check that the oracle binary can be executed
    Check,

    /// Write the effective configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

impl Args {
    /// Apply command line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(bin) = &self.oracle_bin {
            config.oracle.binary_path = bin.clone();
        }
        if let Some(model) = &self.model {
            config.oracle.model = Some(model.clone());
        }
        if let Some(batch_size) = self.batch_size {
            config.translate.batch_size = batch_size;
        }
        if let Some(lang) = &self.source_lang {
            config.translate.source_language = lang.clone();
        }
        if let Some(lang) = &self.target_lang {
            config.translate.target_language = lang.clone();
            config.discovery = DiscoveryConfig::for_language(&config.discovery.extension, lang);
        }
    }
}
