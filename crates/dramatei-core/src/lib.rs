//! # Dramatei Core - Drama Model and TEI Serialization
//!
//! Dramatei converts stage plays scraped from Projekt Gutenberg-DE pages into
//! TEI-XML. This crate holds the target side of that pipeline: the drama model
//! (acts, scenes, speeches, numbered lines, stage directions), the in-memory
//! XML tree, and the TEI/JSON serializers. The HTML side (classification and
//! structure building) lives in the `dramatei-backend` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use dramatei_core::{Drama, Scene, SceneItem, Speech, TeiSerializer};
//!
//! let mut drama = Drama::new("Hauptmann, Gerhart", "Die Weber");
//! let mut scene = Scene::new(Some("Erste Szene".to_string()));
//! scene.items.push(SceneItem::Speech(Speech::new("Hilse")));
//! drama.scenes.push(scene);
//!
//! let tree = TeiSerializer::new().serialize_drama(&drama);
//! let bytes = tree.to_xml_document().expect("well-formed tree");
//! assert!(bytes.starts_with(b"<?xml"));
//! ```
//!
//! ## Module Organization
//!
//! - [`drama`] - The drama tree produced by the structure builder
//! - [`xml`] - In-memory XML element tree and `quick-xml` emission
//! - [`serializer`] - TEI and JSON serializers over the drama tree
//! - [`error`] - Error types and the crate-wide `Result` alias
//!
//! ## Error Handling
//!
//! The serializers are pure structural transforms and do not fail; fallible
//! operations at the edges (XML encoding, JSON encoding, file I/O) return
//! [`Result<T, DramaError>`](error::DramaError).

pub mod drama;
pub mod error;
pub mod serializer;
pub mod xml;

// Re-exports for convenience
pub use drama::*;
pub use error::*;
pub use serializer::*;
pub use xml::*;
