//! Concurrent decode of every file in a directory.
//!
//! Each decode call owns its Key Ring, so files are decoded in parallel on
//! the blocking pool with no shared state beyond the metrics registry.
//! Results come back in file-name order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use snapmedia_core::error::{Result, SnapMediaError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::app::{App, DecodeReport};

/// Outcome for one file.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchLine {
    Decoded(DecodeReport),
    Failed {
        source: String,
        code: &'static str,
        error: String,
    },
}

impl BatchLine {
    fn failed(source: &str, e: &SnapMediaError) -> Self {
        BatchLine::Failed {
            source: source.to_owned(),
            code: e.code().as_str(),
            error: e.to_string(),
        }
    }
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

async fn decode_file(app: App, path: PathBuf) -> BatchLine {
    let source = path.display().to_string();

    let len = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta.len(),
        Err(e) => return BatchLine::failed(&source, &SnapMediaError::from(e)),
    };
    let limit = app.cfg().batch.max_payload_bytes;
    if len > limit {
        tracing::warn!(%source, len, limit, "payload over size limit skipped");
        app.metrics().failures.inc(&[("reason", "too_large")]);
        return BatchLine::failed(
            &source,
            &SnapMediaError::BadInput(format!("payload is {len} bytes, limit {limit}")),
        );
    }

    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => Bytes::from(raw),
        Err(e) => return BatchLine::failed(&source, &SnapMediaError::from(e)),
    };

    let task_source = source.clone();
    let decoded = tokio::task::spawn_blocking(move || app.decode(&task_source, raw, None)).await;
    match decoded {
        Ok(Ok(report)) => BatchLine::Decoded(report),
        Ok(Err(e)) => BatchLine::failed(&source, &e),
        Err(join) => BatchLine::failed(&source, &SnapMediaError::Internal(format!("decode task failed: {join}"))),
    }
}

pub async fn run(app: App, dir: &Path) -> Result<Vec<BatchLine>> {
    let files = list_files(dir).await?;
    let permits = Arc::new(Semaphore::new(app.cfg().batch.workers));
    tracing::info!(files = files.len(), workers = app.cfg().batch.workers, "batch starting");

    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        let app = app.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            (index, decode_file(app, path).await)
        });
    }

    let mut lines = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(line) => lines.push(line),
            Err(e) => return Err(SnapMediaError::Internal(format!("batch task failed: {e}"))),
        }
    }
    lines.sort_by_key(|(index, _)| *index);
    Ok(lines.into_iter().map(|(_, line)| line).collect())
}
