use anyhow::Result;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use enum_as_inner::EnumAsInner;

use crate::command::convert::{self, Convert};
use crate::command::init::{self, Init};
use crate::command::upload::{self, Upload};

/// Blobpost.
#[derive(Debug, Parser)]
#[clap(version)]
#[clap(propagate_version = true)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: Command,
    /// Path to the 'config.toml'.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand, EnumAsInner)]
pub enum Command {
    Init(Init),
    Upload(Upload),
    Convert(Convert),
}

pub async fn run() -> Result<()> {
    let opts = Opts::parse();

    match opts.command {
        Command::Init(_) => init::run(opts).await,
        Command::Upload(_) => upload::run(opts).await,
        Command::Convert(_) => convert::run(opts).await,
    }
}
