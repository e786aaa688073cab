//! Page retrieval
//!
//! Blocking HTTP client for fetching the ordered page sequence, plus the
//! page-location derivation rule: the start location must end in a decimal
//! digit run, and subsequent locations replace that run with successive
//! numbers. All pages are fetched before structural building begins, since
//! the builder needs one ordered node stream spanning page boundaries.

use std::time::Duration;

use dramatei_core::{DramaError, Result};

/// Request timeout per page.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout per page.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking fetcher for the source site's pages.
pub struct PageFetcher {
    client: reqwest::blocking::Client,
}

impl PageFetcher {
    /// Creates a fetcher with request and connect timeouts.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| DramaError::FetchError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetches `count` pages starting at `start_url`, in order.
    ///
    /// Fails fast on the first HTTP error; a partially fetched play would
    /// silently corrupt the structure builder's state.
    ///
    /// # Errors
    /// Returns an error for a start URL without a trailing page number, an
    /// unreachable host, or a non-success status code.
    pub fn fetch_pages(&self, start_url: &str, count: usize) -> Result<Vec<String>> {
        let locations = page_locations(start_url, count)?;
        let mut pages = Vec::with_capacity(locations.len());
        for url in &locations {
            log::info!("fetching {url}");
            pages.push(self.fetch_page(url)?);
        }
        Ok(pages)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DramaError::FetchError(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DramaError::FetchError(format!("HTTP {status} fetching {url}")));
        }

        response
            .text()
            .map_err(|e| DramaError::FetchError(format!("failed to read body of {url}: {e}")))
    }
}

/// Derives the ordered page locations from a start location.
///
/// The start location must end in a decimal digit run; each location replaces
/// that run with the next number, so `.../die-weber-9199/9` continues with
/// `.../die-weber-9199/10` and a start ending in `12` increments the whole
/// run.
///
/// # Errors
/// Returns an error if the start location does not end in a digit run or the
/// run does not fit a page number.
///
/// # Examples
///
/// ```rust
/// use dramatei_backend::page_locations;
///
/// let locations = page_locations("https://example.org/buch/4", 3).unwrap();
/// assert_eq!(
///     locations,
///     vec![
///         "https://example.org/buch/4",
///         "https://example.org/buch/5",
///         "https://example.org/buch/6",
///     ]
/// );
/// ```
pub fn page_locations(start: &str, count: usize) -> Result<Vec<String>> {
    let stem = start.trim_end_matches(|c: char| c.is_ascii_digit());
    let run = &start[stem.len()..];
    if run.is_empty() {
        return Err(DramaError::ConversionError(format!(
            "start location {start:?} does not end in a page number"
        )));
    }
    let first: u64 = run.parse().map_err(|_| {
        DramaError::ConversionError(format!("page number {run:?} in {start:?} is out of range"))
    })?;

    let mut locations = Vec::with_capacity(count);
    for offset in 0..count as u64 {
        let number = first.checked_add(offset).ok_or_else(|| {
            DramaError::ConversionError(format!(
                "page number {run:?} in {start:?} is out of range"
            ))
        })?;
        locations.push(format!("{stem}{number}"));
    }
    Ok(locations)
}
