use std::path::Path;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use novadesk::models::Settings;

const MODEL_FILES: &[&str] = &[
    "onnx/model.onnx",
    "tokenizer.json",
    "config.json",
    "special_tokens_map.json",
    "tokenizer_config.json",
];

/// Download the embedding model into the configured model directory.
///
/// A file that fails to download is reported and skipped; only the model and
/// tokenizer are strictly required at load time.
pub async fn fetch_model(settings: &Settings, force: bool) -> Result<usize> {
    let dir = &settings.model.dir;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create model directory {}", dir.display()))?;

    println!("Downloading {} to {}...", settings.model.repo, dir.display());

    let client = reqwest::Client::new();
    let mut fetched = 0usize;

    for file in MODEL_FILES {
        let dest = dir.join(file);
        if dest.exists() && !force {
            println!("  {} already present, skipping", file);
            continue;
        }

        let url = format!("https://huggingface.co/{}/resolve/main/{}", settings.model.repo, file);
        println!("  Fetching {}...", file);
        match download(&client, &url, &dest).await {
            Ok(bytes) => {
                fetched += 1;
                log::info!("Downloaded {} ({} bytes)", file, bytes);
            }
            Err(e) => {
                log::warn!("Could not download {}: {:#}", file, e);
                println!("  ⚠️ Could not download {}: {}", file, e);
            }
        }
    }

    Ok(fetched)
}

async fn download(client: &reqwest::Client, url: &str, dest: &Path) -> Result<u64> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    if !response.status().is_success() {
        anyhow::bail!("{} returned {}", url, response.status());
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Write to a side file so an interrupted download never looks complete.
    let partial = dest.with_extension("part");
    let mut out = tokio::fs::File::create(&partial)
        .await
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Download interrupted")?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    drop(out);

    tokio::fs::rename(&partial, dest)
        .await
        .with_context(|| format!("Failed to move {} into place", dest.display()))?;
    Ok(written)
}
