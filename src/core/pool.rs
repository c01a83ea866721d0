use crate::core::Storage;
use crate::utils::error::{DrawError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Reads a newline-delimited list. A file that does not exist yet counts as an
/// empty list.
pub async fn load_list<S: Storage>(storage: &S, path: &str) -> Result<Vec<String>> {
    match storage.read_file(path).await {
        Ok(bytes) => parse_list(&bytes),
        Err(e) if e.is_not_found() => {
            tracing::debug!("List file {} not found, treating as empty", path);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// 每行一個項目，去除前後空白並略過空行
pub fn parse_list(bytes: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        DrawError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
