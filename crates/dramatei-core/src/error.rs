//! Error types for drama conversion operations.
//!
//! The conversion core itself is written to never fail: malformed node streams
//! degrade into implicit parents and placeholder identifiers instead of errors.
//! The variants here cover the edges of the pipeline where real failures live,
//! such as page retrieval, file I/O and output encoding.

use thiserror::Error;

/// Error types that can occur around the conversion core.
///
/// # Examples
///
/// ```rust,ignore
/// use dramatei_backend::PlayConverter;
/// use dramatei_core::DramaError;
///
/// match converter.convert(start, pages, &options) {
///     Ok(drama) => println!("{} acts", drama.acts.len()),
///     Err(DramaError::FetchError(msg)) => eprintln!("Fetch failed: {msg}"),
///     Err(DramaError::IoError(e)) => eprintln!("File error: {e}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum DramaError {
    /// General conversion error.
    ///
    /// Raised for caller mistakes the core cannot absorb, such as a start
    /// location without a trailing page number.
    #[error("Conversion error: {0}")]
    ConversionError(String),

    /// File I/O error while reading page files or writing output.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error from the JSON output format.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML encoding error while writing the finished element tree.
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// HTTP failure while retrieving a page.
    #[error("Fetch error: {0}")]
    FetchError(String),
}

/// Type alias for [`Result<T, DramaError>`].
///
/// # Examples
///
/// ```rust,ignore
/// use dramatei_core::{Result, TeiSerializer};
///
/// fn to_tei_bytes(drama: &dramatei_core::Drama) -> Result<String> {
///     let tree = TeiSerializer::new().serialize_drama(drama);
///     tree.to_xml_document()
/// }
/// ```
pub type Result<T> = std::result::Result<T, DramaError>;
