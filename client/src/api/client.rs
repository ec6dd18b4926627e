use anyhow::Result;
use const_format::concatcp;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Url};

use common::v1::upload::{ENDPOINT, FILE_FIELD};
use crate::config::ServerConfig;
use super::Error;

/// The User-Agent string.
const USER_AGENT: &str = concatcp!("Blobpost {}", env!("CARGO_PKG_VERSION"));

/// The API client.
#[derive(Debug, Clone)]
pub struct Client {
    /// Base endpoint of the server.
    endpoint: Url,
    /// An initialized HTTP client.
    client: HttpClient,
}

impl Client {
    pub fn from_server_config(config: ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            endpoint: Url::parse(&config.endpoint)?,
            client,
        })
    }

    /// Returns the URL files are posted to.
    pub fn upload_url(&self) -> Result<Url> {
        Ok(self.endpoint.join(ENDPOINT.trim_start_matches('/'))?)
    }

    /// Uploads a file the way the upload form does.
    ///
    /// Returns the reply of the server.
    pub async fn upload_file(
        &self,
        file_name: String,
        data: Vec<u8>,
        mime: Option<&str>,
    ) -> Result<String> {
        let mut part = Part::bytes(data).file_name(file_name);
        if let Some(mime) = mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part(FILE_FIELD, part);

        let res = self
            .client
            .post(self.upload_url()?)
            .multipart(form)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(res.text().await?)
        } else {
            let api_error = Error::try_from_response(res).await?;
            Err(api_error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> Client {
        Client::from_server_config(ServerConfig {
            endpoint: endpoint.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            "http://localhost:8080/upload",
            client("http://localhost:8080").upload_url().unwrap().as_str()
        );
        assert_eq!(
            "https://example.com/files/upload",
            client("https://example.com/files/").upload_url().unwrap().as_str()
        );
    }

    #[test]
    fn test_bad_endpoint() {
        Client::from_server_config(ServerConfig {
            endpoint: "not a url".to_string(),
        })
        .unwrap_err();
    }
}
