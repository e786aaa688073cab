//! Drama serialization module
//!
//! This module provides serializers for converting a finished [`crate::Drama`]
//! tree to output formats: TEI-XML (the primary target) and JSON.

pub mod json;
pub mod tei;

pub use json::{JsonOptions, JsonSerializer};
pub use tei::{TeiOptions, TeiSerializer, TEI_NS};
