//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    batch::BatchArgs, classify::ClassifyArgs, completions::CompletionsArgs, plan::PlanArgs,
    profiles::ProfilesArgs,
};

#[derive(Parser, Debug)]
#[command(name = "turnplan")]
#[command(author, version, about = "Lathe turnability classification and turning process planning")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file layered over the user config
    #[arg(long, global = true, env = "TURNPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a part digest and synthesize a turning process plan
    Plan(PlanArgs),

    /// Run the turnability gate and feature detection only
    Classify(ClassifyArgs),

    /// Plan every digest file under a directory
    Batch(BatchArgs),

    /// List material and machine profiles
    Profiles(ProfilesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Text report, or the format implied by the output file extension
    #[default]
    Auto,
    /// Human-readable report
    Text,
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}
