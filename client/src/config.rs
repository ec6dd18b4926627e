use anyhow::{anyhow, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use xdg::BaseDirectories;

/// Application prefix in XDG base directories.
///
/// This will be concatenated into `$XDG_CONFIG_HOME/blobpost`.
const XDG_PREFIX: &str = "blobpost";

/// Config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Mode of a newly created configuration file.
const FILE_MODE: u32 = 0o600;

/// The client configuration and where it lives.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub data: ConfigData,
}

/// Client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    /// The server to upload to.
    pub server: ServerConfig,
}

/// Configuration of a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub endpoint: String,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
        }
    }
}

/// On-disk layout, tagged with `version`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "version")]
enum ConfigFile {
    #[serde(rename = "v1")]
    V1(ConfigData),
}

impl Config {
    pub fn new(path: Option<PathBuf>, data: ConfigData) -> Result<Self> {
        Ok(Self {
            path: resolve_path(path)?,
            data,
        })
    }

    /// Loads the configuration written by `blobpost init`.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_path(path)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(anyhow!(
                    "No config found at '{}'. Run `blobpost init` first.",
                    path.to_string_lossy()
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let ConfigFile::V1(data) = toml::from_str(&contents)?;

        Ok(Self { path, data })
    }

    /// Writes the configuration, replacing any previous one.
    pub fn save(&self) -> Result<()> {
        let serialized = toml::to_string(&ConfigFile::V1(self.data.clone()))?;

        // An existing file keeps its mode.
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(FILE_MODE)
            .open(&self.path)?;

        file.write_all(serialized.as_bytes())?;

        tracing::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }
}

/// Returns the given path, or the default one under `$XDG_CONFIG_HOME`.
fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => {
            let xdg_dirs = BaseDirectories::with_prefix(XDG_PREFIX)?;
            Ok(xdg_dirs.place_config_file(CONFIG_FILENAME)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let data = ConfigData {
            server: ServerConfig {
                endpoint: "https://files.example.com".to_string(),
            },
        };
        Config::new(Some(path.clone()), data).unwrap().save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(FILE_MODE, mode & 0o777);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("version = \"v1\""));

        let config = Config::load(Some(path)).unwrap();
        assert_eq!("https://files.example.com", config.data.server.endpoint);
    }

    #[test]
    fn test_save_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let long = ConfigData {
            server: ServerConfig {
                endpoint: "https://a-rather-long-host-name.example.com".to_string(),
            },
        };
        Config::new(Some(path.clone()), long).unwrap().save().unwrap();
        Config::new(Some(path.clone()), ConfigData::default()).unwrap().save().unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!("http://localhost:8080", config.data.server.endpoint);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join(CONFIG_FILENAME))).unwrap_err();

        assert!(err.to_string().contains("blobpost init"));
    }
}
