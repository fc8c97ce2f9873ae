use std::path::PathBuf;

use scraper::Html;
use tokio::sync::mpsc;
use tokio::time::Duration;
use url::Url;

use crate::client::SiteClient;
use crate::dataset;
use crate::error::{DownloadError, FetchError, ScrapeError};
use crate::locate;
use crate::log::{ReportEntry, ScrapeReport};
use crate::types::PortfolioEntry;

/// Pause between entries so independent third-party sites never see
/// back-to-back traffic from one run.
const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Options for a scraping run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// JSON dataset to read.
    pub dataset_path: PathBuf,
    /// Where the enriched dataset is written (defaults to the input path).
    pub output_path: PathBuf,
    /// Directory downloaded images are written into (created if absent).
    pub images_dir: PathBuf,
    /// URL-path prefix recorded in each entry's `localImage`.
    pub image_route: String,
    /// Politeness pause inserted after each entry.
    pub delay: Duration,
    /// Process only the first N entries; the rest pass through untouched.
    pub limit: Option<usize>,
    /// Fetch and locate but skip downloads and the dataset write.
    pub dry_run: bool,
}

impl ScrapeOptions {
    /// Create default options for a dataset path.
    pub fn new(dataset_path: PathBuf) -> Self {
        Self {
            output_path: dataset_path.clone(),
            dataset_path,
            images_dir: PathBuf::from("public/portfolio-images"),
            image_route: "/portfolio-images".to_string(),
            delay: DEFAULT_DELAY,
            limit: None,
            dry_run: false,
        }
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    /// Dataset loaded, total entries known.
    Started { total: usize },
    /// An entry has started processing.
    EntryStarted { index: usize, name: String },
    /// An entry got an image.
    EntryCompleted {
        index: usize,
        name: String,
        image_url: String,
    },
    /// An entry's page had no usable candidate (not an error).
    EntryNoImage { index: usize, name: String },
    /// An entry failed and was degraded to "no image" (non-fatal).
    EntryFailed {
        index: usize,
        name: String,
        reason: String,
    },
    /// All entries processed and the dataset written.
    Done,
}

/// Result of a whole scraping run.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub entries: Vec<PortfolioEntry>,
    pub report: ScrapeReport,
}

/// Failures recovered at the entry boundary.
#[derive(Debug, thiserror::Error)]
enum EntryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// File name for the image at a 0-based entry index.
pub fn image_filename(index: usize) -> String {
    format!("portfolio-{}.jpg", index + 1)
}

/// Enrich every dataset entry with a scraped image, sequentially and in
/// input order, then write the whole dataset back.
///
/// Individual entry failures degrade that entry to "no image" and never
/// abort the run; only dataset I/O errors are fatal.
pub async fn scrape_portfolios(
    client: &SiteClient,
    options: &ScrapeOptions,
    events: mpsc::UnboundedSender<ScrapeEvent>,
) -> Result<ScrapeOutcome, ScrapeError> {
    let entries = dataset::read_entries(&options.dataset_path)?;
    if !options.dry_run {
        std::fs::create_dir_all(&options.images_dir).map_err(|e| ScrapeError::ImageDir {
            path: options.images_dir.clone(),
            source: e,
        })?;
    }

    let total = entries.len();
    let _ = events.send(ScrapeEvent::Started { total });

    let to_process = options.limit.unwrap_or(total).min(total);
    let mut report = ScrapeReport::new();
    let mut out = Vec::with_capacity(total);

    for (index, entry) in entries.into_iter().enumerate() {
        if index >= to_process {
            out.push(entry);
            continue;
        }

        let _ = events.send(ScrapeEvent::EntryStarted {
            index,
            name: entry.name.clone(),
        });

        let (enriched, report_entry) = process_entry(client, entry, index, options).await;

        let event = match &report_entry {
            ReportEntry::Success {
                name, image_url, ..
            } => ScrapeEvent::EntryCompleted {
                index,
                name: name.clone(),
                image_url: image_url.clone(),
            },
            ReportEntry::NoImage { name } => ScrapeEvent::EntryNoImage {
                index,
                name: name.clone(),
            },
            ReportEntry::Error { name, message } => ScrapeEvent::EntryFailed {
                index,
                name: name.clone(),
                reason: message.clone(),
            },
        };
        let _ = events.send(event);

        report.add(report_entry);
        out.push(enriched);

        // Politeness pause, kept even after the final entry.
        tokio::time::sleep(options.delay).await;
    }

    if !options.dry_run {
        dataset::write_entries(&options.output_path, &out)?;
    }
    let _ = events.send(ScrapeEvent::Done);

    Ok(ScrapeOutcome {
        entries: out,
        report,
    })
}

/// Process one entry. Never propagates fetch/parse/locate/download errors;
/// any failure degrades the entry to "no image" and is reported.
async fn process_entry(
    client: &SiteClient,
    mut entry: PortfolioEntry,
    index: usize,
    options: &ScrapeOptions,
) -> (PortfolioEntry, ReportEntry) {
    match enrich_entry(client, &entry, index, options).await {
        Ok(Some((image_url, local_image))) => {
            if !options.dry_run {
                entry.image_url = Some(image_url.clone());
                entry.local_image = Some(local_image.clone());
            }
            let report = ReportEntry::Success {
                name: entry.name.clone(),
                image_url,
                local_image,
            };
            (entry, report)
        }
        Ok(None) => {
            log::debug!("no candidate image for {}", entry.name);
            entry.image_url = None;
            entry.local_image = None;
            let report = ReportEntry::NoImage {
                name: entry.name.clone(),
            };
            (entry, report)
        }
        Err(e) => {
            log::warn!("failed to process {}: {}", entry.name, e);
            // A located candidate with a failed download clears both
            // fields; a dangling imageUrl is never persisted.
            entry.image_url = None;
            entry.local_image = None;
            let report = ReportEntry::Error {
                name: entry.name.clone(),
                message: e.to_string(),
            };
            (entry, report)
        }
    }
}

/// Fetch, locate, and download for one entry. Returns the candidate URL and
/// local path on success, `None` when the page has no usable candidate.
async fn enrich_entry(
    client: &SiteClient,
    entry: &PortfolioEntry,
    index: usize,
    options: &ScrapeOptions,
) -> Result<Option<(String, String)>, EntryError> {
    let html = client.fetch_html(&entry.portfolio_url).await?;

    // The parsed document is dropped before the next await point.
    let candidate = {
        let document = Html::parse_document(&html);
        match Url::parse(&entry.portfolio_url) {
            Ok(base) => locate::find_best_image(&document, &base),
            Err(e) => {
                log::warn!("unparsable portfolio URL {}: {}", entry.portfolio_url, e);
                None
            }
        }
    };

    let Some(candidate) = candidate else {
        return Ok(None);
    };

    let filename = image_filename(index);
    let local_image = format!("{}/{}", options.image_route, filename);

    if !options.dry_run {
        let dest = options.images_dir.join(&filename);
        client.download_image(candidate.as_str(), &dest).await?;
    }

    Ok(Some((candidate.into(), local_image)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_filename_is_one_based() {
        assert_eq!(image_filename(0), "portfolio-1.jpg");
        assert_eq!(image_filename(11), "portfolio-12.jpg");
    }
}
