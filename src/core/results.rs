use crate::core::{DrawResults, Storage};
use crate::utils::error::Result;

pub async fn load_results<S: Storage>(storage: &S, path: &str) -> Result<DrawResults> {
    match storage.read_file(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.is_not_found() => Ok(DrawResults::new()),
        Err(e) => Err(e),
    }
}

/// Overwrites the results file with the whole mapping: pretty-printed,
/// draw order, non-ASCII kept as-is.
pub async fn save_results<S: Storage>(storage: &S, path: &str, results: &DrawResults) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    storage.write_file(path, json.as_bytes()).await?;
    tracing::debug!("Saved {} results to {}", results.len(), path);
    Ok(())
}
