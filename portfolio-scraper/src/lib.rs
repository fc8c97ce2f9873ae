pub mod client;
pub mod dataset;
pub mod error;
pub mod locate;
pub mod log;
pub mod scrape;
pub mod types;

pub use client::SiteClient;
pub use error::{DatasetError, DownloadError, FetchError, ScrapeError};
pub use locate::find_best_image;
pub use log::{ReportEntry, ReportSummary, ScrapeReport};
pub use scrape::{
    ScrapeEvent, ScrapeOptions, ScrapeOutcome, image_filename, scrape_portfolios,
};
pub use types::PortfolioEntry;
