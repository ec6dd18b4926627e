use anyhow::{anyhow, Result};
use std::path::PathBuf;
use clap::Parser;
use tokio::fs;

use crate::api::Client;
use crate::cli::Opts;
use crate::config::Config;

/// Upload a file, like the upload form does.
#[derive(Debug, Parser)]
pub struct Upload {
    /// The file to upload.
    path: PathBuf,
    /// Content type to declare for the file.
    #[clap(long)]
    mime: Option<String>,
}

pub async fn run(opts: Opts) -> Result<()> {
    let sub = opts.command.as_upload().expect("dispatched on Upload");
    let config = Config::load(opts.config.clone())?;

    let file_name = sub
        .path
        .file_name()
        .ok_or_else(|| anyhow!("{:?} does not name a file", sub.path))?
        .to_string_lossy()
        .into_owned();
    let data = fs::read(&sub.path).await?;

    tracing::debug!("Uploading {:?} ({} bytes)", sub.path, data.len());

    let api = Client::from_server_config(config.data.server.clone())?;
    let reply = api
        .upload_file(file_name, data, sub.mime.as_deref())
        .await?;

    println!("{}", reply);

    Ok(())
}
