use std::path::Path;

use plot_logging::plot_debug;
use thiserror::Error;

use crate::decode::{decode_text, DecodeError};

/// Text content of a dataset file together with the encoding it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetText {
    pub text: String,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(String),
    #[error("file too large (max {max_bytes} bytes, actual {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Reads a dataset file as text. Content is not inspected beyond decoding.
pub async fn read_dataset(path: &Path, max_bytes: u64) -> Result<DatasetText, ReadError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|err| ReadError::Io(err.to_string()))?;
    if !meta.is_file() {
        return Err(ReadError::Io("not a regular file".to_string()));
    }
    if meta.len() > max_bytes {
        return Err(ReadError::TooLarge {
            max_bytes,
            actual: meta.len(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ReadError::Io(err.to_string()))?;
    let decoded = decode_text(&bytes)?;
    plot_debug!(
        "Read dataset {:?}: {} bytes as {}",
        path,
        bytes.len(),
        decoded.encoding_label
    );
    Ok(DatasetText {
        text: decoded.text,
        encoding: decoded.encoding_label,
    })
}
