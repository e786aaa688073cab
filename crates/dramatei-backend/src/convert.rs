//! Conversion facade
//!
//! One entry point over the pipeline: derive the page locations from the
//! start location, fetch (HTTP start) or read (filesystem start) the pages in
//! order, then hand them to the HTML backend. Fetching happens strictly
//! before building, and the facade itself holds no state between runs.

use std::path::PathBuf;

use dramatei_core::{Drama, Result};

use crate::fetch::{page_locations, PageFetcher};
use crate::html::{ConvertOptions, HtmlPlayBackend, PlayBackend};

/// Converts a play from its start location into a [`Drama`].
///
/// # Examples
///
/// ```rust,no_run
/// use dramatei_backend::{ConvertOptions, PlayConverter};
///
/// let options = ConvertOptions::new("Hauptmann, Gerhart", "Die Weber");
/// let converter = PlayConverter::new();
/// let drama = converter
///     .convert("https://gutenberg.spiegel.de/buch/die-weber-9199/4", 5, &options)?;
/// println!("{} lines", drama.total_lines());
/// # Ok::<(), dramatei_core::DramaError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayConverter {
    backend: HtmlPlayBackend,
}

impl PlayConverter {
    /// Creates a converter over the HTML backend.
    #[inline]
    #[must_use = "creates a converter that should be used"]
    pub const fn new() -> Self {
        Self {
            backend: HtmlPlayBackend::new(),
        }
    }

    /// Converts `count` pages starting at `start` into one drama.
    ///
    /// An `http://` or `https://` start is fetched; anything else is treated
    /// as the path of the first page file, with sibling pages derived by the
    /// same trailing-number rule as URLs. Either way the start location must
    /// end in the page number.
    ///
    /// # Errors
    /// Returns an error for a start location without a trailing page number
    /// or for fetch/read failures; the conversion core itself never fails.
    pub fn convert(&self, start: &str, count: usize, options: &ConvertOptions) -> Result<Drama> {
        let pages = if is_url(start) {
            PageFetcher::new()?.fetch_pages(start, count)?
        } else {
            let paths: Vec<PathBuf> = page_locations(start, count)?
                .into_iter()
                .map(PathBuf::from)
                .collect();
            log::info!("reading {} page files starting at {start}", paths.len());
            return self.backend.parse_files(&paths, options);
        };
        self.backend.parse_pages(&pages, options)
    }
}

fn is_url(start: &str) -> bool {
    start.starts_with("http://") || start.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramatei_core::DramaError;

    #[test]
    fn test_file_start_reads_derived_siblings() {
        let dir = tempfile::tempdir().unwrap();
        for (number, speaker) in [(3, "Hilse"), (4, "Pfeifer")] {
            std::fs::write(
                dir.path().join(format!("weber{number}")),
                format!("<div id=\"gutenb\"><p><span class=\"speaker\">{speaker}.</span> Zeile.</p></div>"),
            )
            .unwrap();
        }

        let start = dir.path().join("weber3");
        let options = ConvertOptions::new("Hauptmann, Gerhart", "Die Weber");
        let drama = PlayConverter::new()
            .convert(start.to_str().unwrap(), 2, &options)
            .unwrap();

        let speakers: Vec<&str> = drama.speeches().map(|s| s.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Hilse.", "Pfeifer."]);
    }

    #[test]
    fn test_start_without_page_number_is_an_error() {
        let options = ConvertOptions::new("A", "B");
        let result = PlayConverter::new().convert("/tmp/weber.html", 1, &options);
        assert!(matches!(result, Err(DramaError::ConversionError(_))));
    }

    #[test]
    fn test_missing_page_file_is_an_error() {
        let options = ConvertOptions::new("A", "B");
        let result = PlayConverter::new().convert("/nonexistent/weber1", 2, &options);
        assert!(matches!(result, Err(DramaError::IoError(_))));
    }
}
