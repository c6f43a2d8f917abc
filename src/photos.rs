use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Photo is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

/// Builds a self-contained `data:` URL from raw bytes.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Infers the image MIME type from the file extension.
pub fn image_mime(path: &Path) -> Result<String, PhotoError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_().as_str() != "image" {
        return Err(PhotoError::NotAnImage(path.display().to_string()));
    }
    Ok(mime.essence_str().to_string())
}

/// Reads an image file and encodes it as an embeddable `data:` URL.
///
/// Files over `max_bytes` are rejected before being read.
pub async fn decode_photo(path: &Path, max_bytes: u64) -> Result<String, PhotoError> {
    let mime = image_mime(path)?;
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(PhotoError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let bytes = tokio::fs::read(path).await?;
    Ok(to_data_url(&mime, &bytes))
}

/// Decodes every file in its own task.
///
/// Results are delivered in completion order, not selection order. The
/// channel closes once every decode has finished. Must be called from
/// within a tokio runtime.
pub fn decode_photos(
    paths: Vec<PathBuf>,
    max_bytes: u64,
) -> mpsc::UnboundedReceiver<(PathBuf, Result<String, PhotoError>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    for path in paths {
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = decode_photo(&path, max_bytes).await;
            // Receiver gone means nobody wants the result any more
            let _ = tx.send((path, result));
        });
    }
    rx
}
