//! Data URL decoding.
//!
//! Images embedded in a page carry their content inline:
//!
//! ```text
//! data:{mime};base64,{payload}
//! ```
//!
//! [`Blob::from_data_url`] turns such a string into raw bytes tagged with
//! the MIME type, ready to be attached to a multipart form.
//!
//! ## Decoding rules
//!
//! The string is split at the first comma. The MIME type is whatever sits
//! between the first colon and the next semicolon of the part before the
//! comma. The payload is decoded the way browsers decode it in `atob`:
//! ASCII whitespace is skipped and padding is optional.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};
use bytes::Bytes;
use displaydoc::Display;
use lazy_static::lazy_static;
use regex::Regex;

/// Base64 engine with the leniency of `atob`.
const FORGIVING_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

lazy_static! {
    static ref MIME_PATTERN: Regex = Regex::new(r":(.*?);").unwrap();
}

/// A data URL decoding error.
#[derive(Debug, Display)]
pub enum Error {
    /// The data URL lacks a comma separator.
    NoCommaSeparator,

    /// The data URL does not declare a MIME type.
    NoMimeType,

    /// Base64 decode error: {0}
    Base64DecodeError(DecodeError),
}

impl std::error::Error for Error {}

/// A data URL split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'s> {
    /// Everything before the first comma.
    metadata: &'s str,

    /// The declared MIME type.
    mime: &'s str,

    /// Everything after the first comma.
    payload: &'s str,
}

impl<'s> DataUrl<'s> {
    /// Splits a data URL without decoding the payload.
    pub fn parse(s: &'s str) -> Result<Self, Error> {
        let comma = s.find(',').ok_or(Error::NoCommaSeparator)?;
        let (metadata, comma_and_payload) = s.split_at(comma);

        let mime = MIME_PATTERN
            .captures(metadata)
            .and_then(|c| c.get(1))
            .ok_or(Error::NoMimeType)?
            .as_str();

        Ok(Self {
            metadata,
            mime,
            payload: &comma_and_payload[1..],
        })
    }

    pub fn metadata(&self) -> &'s str {
        self.metadata
    }

    pub fn mime(&self) -> &'s str {
        self.mime
    }

    pub fn payload(&self) -> &'s str {
        self.payload
    }

    /// Decodes the base64 payload.
    pub fn decode(&self) -> Result<Bytes, Error> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = FORGIVING_BASE64
            .decode(compact)
            .map_err(Error::Base64DecodeError)?;

        Ok(Bytes::from(bytes))
    }
}

/// Binary data tagged with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    mime: String,
    data: Bytes,
}

impl Blob {
    pub fn new(mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Decodes a data URL into a blob.
    pub fn from_data_url(s: &str) -> Result<Self, Error> {
        let url = DataUrl::parse(s)?;
        let data = url.decode()?;

        Ok(Self::new(url.mime(), data))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (String, Bytes) {
        (self.mime, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png() {
        let blob = Blob::from_data_url("data:image/png;base64,aGVsbG8=")
            .expect("Could not decode data URL");

        assert_eq!("image/png", blob.mime());
        assert_eq!(&b"hello"[..], &blob.data()[..]);
    }

    #[test]
    fn test_parts() {
        let url = DataUrl::parse("data:image/svg+xml;charset=utf-8;base64,PHN2Zy8+")
            .expect("Could not parse data URL");

        assert_eq!("data:image/svg+xml;charset=utf-8;base64", url.metadata());
        assert_eq!("image/svg+xml", url.mime());
        assert_eq!("PHN2Zy8+", url.payload());
        assert_eq!(&b"<svg/>"[..], &url.decode().unwrap()[..]);
    }

    #[test]
    fn test_forgiving_payload() {
        // missing padding and wrapped lines, as `atob` accepts them
        let blob = Blob::from_data_url("data:image/jpeg;base64,aGVs\r\nbG8")
            .expect("Could not decode data URL");

        assert_eq!(&b"hello"[..], &blob.data()[..]);
    }

    #[test]
    fn test_empty_payload() {
        let blob = Blob::from_data_url("data:image/gif;base64,").unwrap();

        assert_eq!("image/gif", blob.mime());
        assert!(blob.is_empty());
    }

    #[test]
    fn test_no_comma() {
        let err = Blob::from_data_url("data:image/png;base64aGVsbG8=").unwrap_err();
        assert!(matches!(err, Error::NoCommaSeparator));
    }

    #[test]
    fn test_no_mime() {
        let err = Blob::from_data_url("data,aGVsbG8=").unwrap_err();
        assert!(matches!(err, Error::NoMimeType));

        // the semicolon after the comma does not count
        let err = Blob::from_data_url("data:image/png,aGVs;bG8=").unwrap_err();
        assert!(matches!(err, Error::NoMimeType));
    }

    #[test]
    fn test_bad_base64() {
        let err = Blob::from_data_url("data:image/png;base64,a$b=").unwrap_err();
        assert!(matches!(err, Error::Base64DecodeError(_)));
    }
}
