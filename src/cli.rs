use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flowreg-sync")]
#[command(version)]
#[command(about = "Replicate versioned flows between flow registry instances")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a flow and all of its versions to an on-disk snapshot
    Export(ExportArgs),
    /// Import a snapshot directory into a target registry
    Import(ImportArgs),
    /// Copy a flow directly from a source registry to a target registry
    Copy(CopyArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Base URL of the source registry API
    #[arg(value_name = "SOURCE_URL")]
    pub source_url: String,
    /// Identifier of the bucket holding the flow
    #[arg(value_name = "BUCKET_ID")]
    pub bucket_id: String,
    /// Identifier of the flow to export
    #[arg(value_name = "FLOW_ID")]
    pub flow_id: String,
    /// Directory to write the snapshot into (must not already exist)
    #[arg(value_name = "SAVE_DIR")]
    pub save_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Base URL of the target registry API
    #[arg(value_name = "TARGET_URL")]
    pub target_url: String,
    /// Snapshot directory produced by a previous export
    #[arg(value_name = "SAVE_DIR")]
    pub save_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Base URL of the source registry API
    #[arg(value_name = "SOURCE_URL")]
    pub source_url: String,
    /// Identifier of the bucket holding the flow
    #[arg(value_name = "BUCKET_ID")]
    pub bucket_id: String,
    /// Identifier of the flow to copy
    #[arg(value_name = "FLOW_ID")]
    pub flow_id: String,
    /// Base URL of the target registry API
    #[arg(value_name = "TARGET_URL")]
    pub target_url: String,
}
