//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtig")]
#[command(version, about = "Render DTIG templates against model configurations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one template
    Render {
        /// Template file
        template: PathBuf,

        /// Model configuration (.json or .toml)
        #[arg(short, long, env = "DTIG_MODEL")]
        model: PathBuf,

        /// Target language: python, cpp or matlab
        #[arg(short, long, default_value = "python")]
        language: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the targets listed in dtig.toml
    Generate {
        /// Output path of a single target (as written in dtig.toml)
        target: Option<PathBuf>,
    },

    /// Render a template and discard the result, reporting any error
    Check {
        /// Template file
        template: PathBuf,

        /// Model configuration (.json or .toml)
        #[arg(short, long, env = "DTIG_MODEL")]
        model: PathBuf,

        /// Target language: python, cpp or matlab
        #[arg(short, long, default_value = "python")]
        language: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List reserved directive names
    Vars {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
