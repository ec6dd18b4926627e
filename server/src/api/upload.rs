use std::sync::Arc;
use axum::{
    body::Body,
    extract::{Extension, FromRequest, Multipart},
    http::{Method, Request},
};
use bytes::Bytes;
use tracing::instrument;

use common::v1::upload::{error_message, UploadErrorCode, NO_FILE_MESSAGE, SUCCESS_MESSAGE};
use crate::error::ServerResult;
use crate::upload::{receive, UploadedFile};
use crate::State;

/// What became of an uploaded file.
#[derive(Debug)]
pub enum Outcome {
    /// The transfer failed; nothing was read.
    Rejected(UploadErrorCode),
    /// The content was read into memory.
    Processed(Bytes),
}
impl Outcome {
    /// Returns the reply sent to the client.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected(code) => error_message(*code),
            Self::Processed(_) => SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Receives a single file.
///
/// Any method is routed here, so that clients get a reply rather than
/// a 405 when they do not POST.
#[instrument(skip_all, fields(method = %method))]
#[axum_macros::debug_handler]
pub async fn upload(
    Extension(state): Extension<Arc<State>>,
    method: Method,
    request: Request<Body>,
) -> ServerResult<String> {
    if method != Method::POST {
        return Ok(NO_FILE_MESSAGE.to_string());
    }

    let multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("Not a multipart request: {}", rejection);
            return Ok(NO_FILE_MESSAGE.to_string());
        }
    };

    let file = match receive(multipart, &state.config.upload).await {
        Some(file) => file,
        None => return Ok(NO_FILE_MESSAGE.to_string()),
    };

    let outcome = accept(&file).await?;

    Ok(outcome.message())
}

/// Checks the transfer status and reads the file if it arrived intact.
pub async fn accept(file: &UploadedFile) -> ServerResult<Outcome> {
    let code = file.error();
    if !code.is_ok() {
        tracing::info!(code = code.as_u32(), "Upload of \"{}\" failed", file.name());
        return Ok(Outcome::Rejected(code));
    }

    let contents = file.read().await?;

    tracing::info!(
        size = contents.len(),
        content_type = file.content_type().unwrap_or("unknown"),
        "Processed upload of \"{}\"",
        file.name()
    );

    Ok(Outcome::Processed(contents))
}
