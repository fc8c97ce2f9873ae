use std::path::Path;

use futures::StreamExt;
use reqwest::header::LOCATION;
use tokio::io::AsyncWriteExt;
use tokio::time::Duration;
use url::Url;

use crate::error::{DownloadError, FetchError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Redirect hop cap shared by fetches and downloads.
const MAX_REDIRECTS: usize = 10;

/// HTTP client for third-party portfolio sites.
///
/// Automatic redirect following is disabled on the underlying client; both
/// operations walk redirect chains themselves with an explicit hop counter
/// so a loop can never hang a run.
pub struct SiteClient {
    http: reqwest::Client,
    fetch_timeout: Duration,
    download_timeout: Duration,
}

impl SiteClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(FETCH_TIMEOUT, DOWNLOAD_TIMEOUT)
    }

    /// Create a client with custom per-request timeouts.
    pub fn with_timeouts(
        fetch_timeout: Duration,
        download_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            fetch_timeout,
            download_timeout,
        })
    }

    /// Fetch a page's HTML as text.
    ///
    /// Follows up to [`MAX_REDIRECTS`] redirect hops; any non-2xx terminal
    /// status, timeout, or transport failure is an error. No retries.
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let mut current = url.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let resp = self
                .http
                .get(&current)
                .timeout(self.fetch_timeout)
                .send()
                .await
                .map_err(|e| fetch_transport(&current, e))?;

            let status = resp.status();
            if status.is_redirection() {
                if let Some(target) = redirect_target(&resp, &current) {
                    log::debug!("following redirect from {} to {}", current, target);
                    current = target;
                    continue;
                }
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: current,
                });
            }
            return resp.text().await.map_err(|e| fetch_transport(&current, e));
        }

        Err(FetchError::TooManyRedirects {
            url: url.to_string(),
        })
    }

    /// Download a remote resource into the file at `dest`.
    ///
    /// The destination is created before the request resolves and removed
    /// on every failure path: after this returns, either the file holds
    /// exactly the terminal resource's bytes or it does not exist.
    pub async fn download_image(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let mut current = url.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| io_failure(dest, e))?;

            let resp = match self
                .http
                .get(&current)
                .timeout(self.download_timeout)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    drop(file);
                    remove_dest(dest).await;
                    return Err(download_transport(&current, e));
                }
            };

            let status = resp.status();
            if status.is_redirection() {
                if let Some(target) = redirect_target(&resp, &current) {
                    log::debug!("following redirect from {} to {}", current, target);
                    drop(file);
                    remove_dest(dest).await;
                    current = target;
                    continue;
                }
            }
            if !status.is_success() {
                drop(file);
                remove_dest(dest).await;
                return Err(DownloadError::Status {
                    status: status.as_u16(),
                    url: current,
                });
            }

            let mut body = resp.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        drop(file);
                        remove_dest(dest).await;
                        return Err(download_transport(&current, e));
                    }
                };
                if let Err(e) = file.write_all(&chunk).await {
                    drop(file);
                    remove_dest(dest).await;
                    return Err(io_failure(dest, e));
                }
            }
            if let Err(e) = file.flush().await {
                drop(file);
                remove_dest(dest).await;
                return Err(io_failure(dest, e));
            }
            return Ok(());
        }

        Err(DownloadError::TooManyRedirects {
            url: url.to_string(),
        })
    }
}

/// Resolve a redirect's `Location` header against the current URL.
/// Returns `None` when the header is missing or unusable, in which case the
/// response is treated as a plain non-2xx status.
fn redirect_target(resp: &reqwest::Response, current: &str) -> Option<String> {
    let location = resp.headers().get(LOCATION)?.to_str().ok()?;
    match Url::parse(location) {
        Ok(url) => Some(url.into()),
        // Relative Location values are resolved against the redirecting URL
        Err(_) => Url::parse(current)
            .ok()?
            .join(location)
            .ok()
            .map(Into::into),
    }
}

fn fetch_transport(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

fn download_transport(url: &str, source: reqwest::Error) -> DownloadError {
    if source.is_timeout() {
        DownloadError::Timeout {
            url: url.to_string(),
        }
    } else {
        DownloadError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

fn io_failure(dest: &Path, source: std::io::Error) -> DownloadError {
    DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    }
}

async fn remove_dest(dest: &Path) {
    if let Err(e) = tokio::fs::remove_file(dest).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("could not remove partial download {}: {}", dest.display(), e);
        }
    }
}
