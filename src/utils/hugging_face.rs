use std::path::{Path, PathBuf};

use hf_hub::api::tokio;

/// Download the given artifact files from a Hugging Face Hub model repo.
/// If files exist in the cache, they will not be downloaded again.
///
/// Returns the local snapshot directory holding the files.
pub async fn download_artifacts(repo_id: &str, files: &[&str]) -> anyhow::Result<PathBuf> {
    let api = tokio::Api::new()?;
    let repo = api.model(repo_id.to_string());

    let mut dir = None;
    for file in files {
        log::info!("Fetching {} from {}...", file, repo_id);

        let path = repo
            .get(file)
            .await
            .map_err(|e| anyhow!("Failed to download: {} from {}: {}", file, repo_id, e))?;

        dir = path.parent().map(Path::to_path_buf);
    }

    dir.ok_or_else(|| anyhow!("No artifact files requested from {}", repo_id))
}
