use std::fmt;

/// Path of the upload endpoint.
pub const ENDPOINT: &str = "/upload";

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "myFile";

/// Optional form field limiting the size of the file that follows it.
///
/// It only applies if sent before the file field.
pub const MAX_FILE_SIZE_FIELD: &str = "MAX_FILE_SIZE";

/// Name of the multipart field carrying a converted image.
pub const IMAGE_FIELD: &str = "image";

/// Filename attached to a converted image.
pub const IMAGE_FILENAME: &str = "image.jpg";

/// Reply when there is nothing to process.
pub const NO_FILE_MESSAGE: &str = "No file uploaded or invalid request method.";

/// Reply when the file was received and read.
pub const SUCCESS_MESSAGE: &str = "File uploaded and processed successfully.";

/// Prefix of the reply when the transfer failed.
pub const ERROR_MESSAGE_PREFIX: &str = "Error uploading file: ";

/// Returns the reply for a failed transfer.
pub fn error_message(code: UploadErrorCode) -> String {
    format!("{}{}", ERROR_MESSAGE_PREFIX, code)
}

/// Status of a file transfer.
///
/// The values follow the codes PHP reports for `$_FILES[...]['error']`.
/// Unknown values are preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadErrorCode(pub u32);

impl UploadErrorCode {
    /// The file was received completely.
    pub const OK: Self = Self(0);
    /// The file exceeds the server's size limit.
    pub const INI_SIZE: Self = Self(1);
    /// The file exceeds the limit given by the form.
    pub const FORM_SIZE: Self = Self(2);
    /// The file was only partially received.
    pub const PARTIAL: Self = Self(3);
    /// No file was selected.
    pub const NO_FILE: Self = Self(4);
    /// The temporary directory is missing.
    pub const NO_TMP_DIR: Self = Self(6);
    /// The file could not be written to disk.
    pub const CANT_WRITE: Self = Self(7);
    /// An extension stopped the transfer.
    pub const EXTENSION: Self = Self(8);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UploadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UploadErrorCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(
            "Error uploading file: 1",
            error_message(UploadErrorCode::INI_SIZE)
        );
        assert_eq!(
            "Error uploading file: 42",
            error_message(UploadErrorCode::from(42))
        );
    }

    #[test]
    fn test_only_zero_is_ok() {
        assert!(UploadErrorCode::OK.is_ok());
        assert!(!UploadErrorCode::PARTIAL.is_ok());
        assert!(!UploadErrorCode(5).is_ok());
    }
}
