//! PDF upload codec
//!
//! Uploaded PDFs are embedded in course records as `data:` URIs so that a
//! document viewer can render them straight from the stored text.

use crate::core::error::FileError;
use crate::models::course::PdfAttachment;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DEFAULT_MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

/// Where the bytes of an upload live
#[derive(Clone, Debug)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A file picked for upload, with the metadata declared by the picker
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl UploadedFile {
    pub fn from_bytes(name: &str, media_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            media_type: media_type.to_string(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Describe a file on disk; the media type is inferred from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            media_type: media_type_for(path).to_string(),
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }
}

fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

/// Encodes uploads into embeddable PDF attachments
#[derive(Clone, Debug)]
pub struct PdfCodec {
    max_bytes: u64,
}

impl Default for PdfCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PDF_BYTES)
    }
}

impl PdfCodec {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Reject non-PDF or oversized uploads before anything is read
    pub fn check(&self, file: &UploadedFile) -> Result<(), FileError> {
        if file.media_type != PDF_MEDIA_TYPE {
            return Err(FileError::NotPdf {
                media_type: file.media_type.clone(),
            });
        }
        self.check_size(file.size)
    }

    fn check_size(&self, size: u64) -> Result<(), FileError> {
        if size > self.max_bytes {
            return Err(FileError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Read the whole upload and produce its attachment
    pub async fn encode(&self, file: &UploadedFile) -> Result<PdfAttachment, FileError> {
        if let Err(e) = self.check(file) {
            warn!(file = %file.name, error = %e, "Upload rejected");
            return Err(e);
        }

        let bytes = match &file.source {
            FileSource::Path(path) => tokio::fs::read(path).await?,
            FileSource::Memory(bytes) => bytes.clone(),
        };

        // The declared size may not match what was actually read
        self.check_size(bytes.len() as u64)?;

        debug!(file = %file.name, bytes = bytes.len(), "PDF encoded");

        Ok(PdfAttachment {
            name: file.name.clone(),
            data: encode_data_uri(PDF_MEDIA_TYPE, &bytes),
        })
    }
}

pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Decoded `data:` URI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Parse a base64 `data:` URI back into its media type and bytes
pub fn decode_data_uri(token: &str) -> Result<DataUri, FileError> {
    let rest = token
        .strip_prefix("data:")
        .ok_or_else(|| FileError::MalformedDataUri("missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FileError::MalformedDataUri("missing ',' separator".to_string()))?;

    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| FileError::MalformedDataUri("payload is not base64".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| FileError::MalformedDataUri(e.to_string()))?;

    Ok(DataUri {
        media_type: media_type.to_string(),
        bytes,
    })
}

/// Verify that a stored token decodes to a PDF of at most `max_bytes`
pub fn check_pdf_data_uri(token: &str, max_bytes: u64) -> Result<(), FileError> {
    let uri = decode_data_uri(token)?;

    if uri.media_type != PDF_MEDIA_TYPE {
        return Err(FileError::NotPdf {
            media_type: uri.media_type,
        });
    }

    let size = uri.bytes.len() as u64;
    if size > max_bytes {
        return Err(FileError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}
