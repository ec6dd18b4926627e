use anyhow::{anyhow, Result};
use std::path::PathBuf;
use clap::Parser;
use tokio::fs;

use common::Blob;
use crate::api::form::ImageForm;
use crate::cli::Opts;
use crate::image::find_image_src;

/// Convert an inline image into a form payload, without sending it.
#[derive(Debug, Parser)]
pub struct Convert {
    /// The data URL to convert.
    #[clap(long, conflicts_with = "html", required_unless_present = "html")]
    src: Option<String>,
    /// An HTML page containing the image.
    #[clap(long)]
    html: Option<PathBuf>,
    /// The id of the image on the page.
    #[clap(long, requires = "html")]
    id: Option<String>,
}

pub async fn run(opts: Opts) -> Result<()> {
    let sub = opts.command.as_convert().expect("dispatched on Convert");

    let src = match (&sub.src, &sub.html) {
        (Some(src), _) => src.clone(),
        (None, Some(path)) => {
            let html = fs::read_to_string(path).await?;
            find_image_src(&html, sub.id.as_deref())
                .ok_or_else(|| anyhow!("No matching <img> in {:?}", path))?
                .to_string()
        }
        (None, None) => return Err(anyhow!("Either --src or --html is required")),
    };

    let blob = Blob::from_data_url(&src).map_err(|e| {
        tracing::error!("Error converting image to blob: {}", e);
        e
    })?;

    let form = ImageForm::new(blob)?;

    eprintln!(
        "Prepared field \"{}\" ({}, {} bytes, {}) with boundary {}; not sent.",
        form.field(),
        form.file_name(),
        form.len(),
        form.mime(),
        form.boundary(),
    );

    Ok(())
}
