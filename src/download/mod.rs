//! Asset downloader
//!
//! Pulls records from a [`ContinuationCrawler`] one at a time, fetches each
//! asset and writes it into the output directory. Assets that cannot be
//! fetched are skipped; listing errors and filesystem errors stop the run.

mod filename;
mod summary;

pub use filename::{file_name_for, sanitize_file_name};
pub use summary::{print_summary, DownloadSummary};

use crate::api::ImageRecord;
use crate::crawler::ContinuationCrawler;
use crate::transport::{FetchResult, Transport};
use crate::CrawlError;
use std::path::{Path, PathBuf};

/// Outcome of downloading one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The asset was written to `path`
    Written { path: PathBuf, bytes: u64 },

    /// Nothing was written
    Skipped { reason: String },
}

/// Downloads every record the crawler yields into `output_dir`
///
/// The directory is created if needed. Files with the same name are
/// overwritten. Progress is recorded in `summary` as it happens, so it is
/// still accurate when the run stops early.
///
/// # Returns
///
/// * `Ok(())` - The listing was exhausted
/// * `Err(CrawlError)` - The listing failed or was cancelled, or a file could
///   not be written
pub async fn download_all(
    crawler: &mut ContinuationCrawler,
    transport: &dyn Transport,
    output_dir: &Path,
    summary: &mut DownloadSummary,
) -> Result<(), CrawlError> {
    tokio::fs::create_dir_all(output_dir).await?;

    while let Some(record) = crawler.next_record().await? {
        summary.records_seen += 1;

        match download_one(&record, transport, output_dir).await? {
            DownloadOutcome::Written { path, bytes } => {
                summary.files_written += 1;
                summary.bytes_written += bytes;
                tracing::info!("{}, {} bytes", path.display(), bytes);
            }
            DownloadOutcome::Skipped { reason } => {
                summary.skipped += 1;
                tracing::warn!("Skipped {}: {}", record.name, reason);
            }
        }
    }

    Ok(())
}

/// Fetches one asset and writes it under its derived file name
pub async fn download_one(
    record: &ImageRecord,
    transport: &dyn Transport,
    output_dir: &Path,
) -> Result<DownloadOutcome, CrawlError> {
    let bytes = match transport.get_bytes(&record.asset_url).await {
        FetchResult::Body(bytes) if !bytes.is_empty() => bytes,
        FetchResult::Body(_) => {
            return Ok(DownloadOutcome::Skipped {
                reason: "empty body".to_string(),
            })
        }
        FetchResult::NoData { reason } => return Ok(DownloadOutcome::Skipped { reason }),
    };

    let path = output_dir.join(file_name_for(record));
    tokio::fs::write(&path, &bytes).await?;

    Ok(DownloadOutcome::Written {
        path,
        bytes: bytes.len() as u64,
    })
}
