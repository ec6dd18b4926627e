use anyhow::Result;
use clap::Parser;
use reqwest::Url;

use crate::cli::Opts;
use crate::config::{ServerConfig, ConfigData, Config};

/// Init server endpoint config.
#[derive(Debug, Clone, Parser)]
pub struct Init {
    /// Server endpoint url.
    #[clap(short, long)]
    url: String,
}
impl From<Init> for ConfigData {
    fn from(init: Init) -> Self {
        let server = ServerConfig {
            endpoint: init.url,
        };

        ConfigData {
            server,
        }
    }
}

pub async fn run(opts: Opts) -> Result<()> {
    let sub: Init = opts.command.into_init().expect("dispatched on Init");

    // reject typos before they end up in the config
    Url::parse(&sub.url)?;

    let data: ConfigData = sub.into();

    let config = Config::new(opts.config, data)?;
    config.save()?;

    eprintln!("Saved configuration to {:?}", config.path);

    Ok(())
}
