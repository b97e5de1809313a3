use anyhow::{Context, Result};
use cadenza_media::{MediaKind, MediaStore, UploadPayload, classify};
use std::path::Path;
use tracing::info;

pub(crate) async fn store(
    media: &MediaStore,
    file: &Path,
    subdir: &str,
    content_type: String,
    kind: Option<MediaKind>,
    name: Option<String>,
) -> Result<()> {
    let handle = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("Cannot open {}", file.display()))?;
    let len = handle
        .metadata()
        .await
        .with_context(|| format!("Cannot inspect {}", file.display()))?
        .len();

    let filename = name.unwrap_or_else(|| {
        file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    });
    let payload = UploadPayload::new(handle, len, filename, content_type);

    let reference = match kind {
        Some(kind) => media.store_as(payload, subdir, kind).await,
        None => media.store(payload, subdir).await,
    }
    .with_context(|| format!("Failed to store {}", file.display()))?;

    info!(reference = %reference, bytes = len, "Stored");
    println!("{reference}");
    Ok(())
}

pub(crate) async fn delete(media: &MediaStore, reference: &str) -> Result<()> {
    media.delete(reference).await.with_context(|| format!("Failed to delete {reference}"))?;
    println!("deleted {reference}");
    Ok(())
}

pub(crate) fn classify_upload(content_type: &str, filename: &str) {
    let kind = classify(content_type, filename);
    println!("{}", kind.map_or("none", MediaKind::as_str));
}

pub(crate) async fn purge(media: &MediaStore) {
    let report = media.purge_orphans().await;
    println!("removed {} orphaned temp file(s), {} failed", report.removed, report.failed);
}
