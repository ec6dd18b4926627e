use anyhow::Result;
use reqwest::multipart::{Form, Part};

use common::v1::upload::{IMAGE_FIELD, IMAGE_FILENAME};
use common::Blob;

/// A multipart payload carrying a converted image.
///
/// Building it does not send anything.
#[derive(Debug)]
pub struct ImageForm {
    form: Form,
    mime: String,
    len: usize,
}

impl ImageForm {
    /// Appends the blob under the `image` field as `image.jpg`.
    pub fn new(blob: Blob) -> Result<Self> {
        let (mime, data) = blob.into_parts();
        let len = data.len();

        let part = Part::bytes(data.to_vec())
            .file_name(IMAGE_FILENAME)
            .mime_str(&mime)?;

        Ok(Self {
            form: Form::new().part(IMAGE_FIELD, part),
            mime,
            len,
        })
    }

    pub fn field(&self) -> &'static str {
        IMAGE_FIELD
    }

    pub fn file_name(&self) -> &'static str {
        IMAGE_FILENAME
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn boundary(&self) -> &str {
        self.form.boundary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_form() {
        let blob = Blob::from_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        let form = ImageForm::new(blob).unwrap();

        assert_eq!("image", form.field());
        assert_eq!("image.jpg", form.file_name());
        assert_eq!("image/png", form.mime());
        assert_eq!(5, form.len());
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_bad_mime() {
        let blob = Blob::new("not a mime type", &b"hello"[..]);
        ImageForm::new(blob).unwrap_err();
    }
}
