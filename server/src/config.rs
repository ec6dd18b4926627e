use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use tokio::fs;

const CONFIG_PATH: &str = "/etc/blobpost/config.toml";
const LOCAL_CONFIG_PATH: &str = "./config.toml";

/// Loads the configuration.
///
/// An explicit path must exist. Otherwise `./config.toml` and then
/// `/etc/blobpost/config.toml` are tried, falling back to the defaults.
pub async fn load(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => match [LOCAL_CONFIG_PATH, CONFIG_PATH]
            .into_iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
        {
            Some(path) => path,
            None => {
                tracing::info!("No configuration file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    load_from(&path).await
}

async fn load_from(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read configuration from {:?}", path))?;

    let config = toml::from_str(&data)
        .with_context(|| format!("Invalid configuration in {:?}", path))?;

    tracing::debug!("Loaded configuration from {:?}", path);

    Ok(config)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Socket address to listen on.
    #[serde(default = "default_listen_address")]
    pub listen: SocketAddr,
    /// File uploads.
    #[serde(default = "Default::default")]
    pub upload: UploadConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_address(),
            upload: UploadConfig::default(),
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// The maximum size of an uploaded file, in bytes.
    ///
    /// Larger files are rejected with code 1. If 0, there is no limit.
    #[serde(rename = "max-file-size")]
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Directory holding files while a request is handled.
    ///
    /// If unspecified, the system temporary directory is used.
    #[serde(rename = "tmp-dir")]
    pub tmp_dir: Option<PathBuf>,
}
impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            tmp_dir: None,
        }
    }
}
impl UploadConfig {
    pub fn tmp_dir(&self) -> PathBuf {
        match &self.tmp_dir {
            Some(dir) => dir.clone(),
            None => env::temp_dir(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024 // 2 MiB
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tokio_test::block_on;

    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(default_listen_address(), config.listen);
        assert_eq!(2 * 1024 * 1024, config.upload.max_file_size);
        assert_eq!(env::temp_dir(), config.upload.tmp_dir());
    }

    #[test]
    fn test_upload_section() {
        let config: Config = toml::from_str(
            r#"
            listen = "0.0.0.0:9000"

            [upload]
            max-file-size = 1024
            tmp-dir = "/var/spool/blobpost"
            "#,
        )
        .unwrap();

        assert_eq!(9000, config.listen.port());
        assert_eq!(1024, config.upload.max_file_size);
        assert_eq!(PathBuf::from("/var/spool/blobpost"), config.upload.tmp_dir());
    }

    #[test]
    fn test_unknown_keys() {
        toml::from_str::<Config>("storage = \"s3\"").unwrap_err();
        toml::from_str::<Config>("[upload]\nmax_file_size = 1").unwrap_err();
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upload]\nmax-file-size = 10").unwrap();

        let config = block_on(load(Some(file.path().to_owned()))).unwrap();
        assert_eq!(10, config.upload.max_file_size);

        let missing = file.path().with_extension("missing");
        block_on(load(Some(missing))).unwrap_err();
    }
}
