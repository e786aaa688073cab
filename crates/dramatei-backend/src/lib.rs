//! # Dramatei Backend - HTML Parsing Pipeline
//!
//! The source side of the dramatei pipeline: fetch the play's pages, domify
//! them with `scraper`, classify each markup node, and fold the classified
//! stream into the drama model from `dramatei-core`.
//!
//! # Architecture
//!
//! ```text
//! start location ──► PageFetcher ──► page strings (ordered)
//!                                        │
//!                                        ▼
//!                    HtmlPlayBackend: domify + flatten
//!                                        │
//!                                        ▼
//!                    classify: TaggedNode stream (one pass, cross-page)
//!                                        │
//!                                        ▼
//!                    DramaBuilder: fold into Drama
//!                       └─ segment: lines + inline stage directions
//! ```
//!
//! The whole pipeline is sequential by design: pages are ordered and an act,
//! scene or speech may continue across a page boundary, so all pages are
//! fetched before the builder runs. The builder never fails on malformed
//! markup; it degrades into implicit parents and logs each recovery point.
//!
//! # Quick Start
//!
//! ```rust
//! use dramatei_backend::{ConvertOptions, HtmlPlayBackend, PlayBackend};
//!
//! let page = r#"<div id="gutenb">
//!     <h2>Erster Akt</h2>
//!     <p><span class="speaker">Hilse.</span> Nu ja ja!</p>
//! </div>"#;
//!
//! let options = ConvertOptions::new("Hauptmann, Gerhart", "Die Weber");
//! let drama = HtmlPlayBackend::new().parse_pages(&[page.to_string()], &options)?;
//! assert_eq!(drama.acts.len(), 1);
//! # Ok::<(), dramatei_core::DramaError>(())
//! ```

pub mod builder;
pub mod classify;
pub mod convert;
pub mod fetch;
pub mod html;
pub mod segment;

pub use builder::{BuilderState, DramaBuilder};
pub use classify::{classify_element, classify_text, NodeTag, TaggedNode};
pub use convert::PlayConverter;
pub use fetch::{page_locations, PageFetcher};
pub use html::{
    ConvertOptions, HtmlPlayBackend, PlayBackend, DEFAULT_ACT_TRIGGER, DEFAULT_SCENE_TRIGGER,
};
pub use segment::{Fragment, Fragments};
