use crate::config::APP_NAME;
use crate::error::DotnetmanError;
use anyhow::{anyhow, Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
        .build()
        .context("Could not build HTTP client")?;
    Ok(client)
}

/// Stream `url` into `local_path`.
///
/// The body is written to a temporary file next to the destination and renamed
/// into place once complete, so an interrupted download never leaves a
/// truncated file at `local_path`.
pub async fn download_file(client: &reqwest::Client, url: &str, local_path: &Path) -> Result<()> {
    let filename = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Invalid download path: {}", local_path.display()))?;
    let parent = local_path
        .parent()
        .ok_or_else(|| anyhow!("Invalid download path: {}", local_path.display()))?;

    tracing::info!("Downloading {} from {}...", filename, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DotnetmanError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DotnetmanError::network(url, format!("status {}", status)).into());
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {}", filename));

    fs::create_dir_all(parent)
        .with_context(|| format!("Could not create {}", parent.display()))?;
    let mut file = NamedTempFile::new_in(parent)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DotnetmanError::network(url, e))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    file.flush()?;

    file.persist(local_path)
        .with_context(|| format!("Could not write {}", local_path.display()))?;

    pb.finish_with_message("Download complete");
    tracing::debug!("Saved {} bytes to {}", downloaded, local_path.display());
    Ok(())
}
