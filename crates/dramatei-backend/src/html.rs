//! HTML play backend
//!
//! Domifies the fetched page strings with `scraper`, flattens the site's node
//! shapes into one classified stream spanning all pages, and runs the
//! structure builder over it. The site wraps the text of each page in
//! `div#gutenb`; when that container is missing the backend falls back to
//! walking `body`, so a stray page degrades into noise instead of aborting
//! the run.

use std::path::Path;

use dramatei_core::{Drama, DramaError, Result};
use scraper::{ElementRef, Html, Node, Selector};

use crate::builder::DramaBuilder;
use crate::classify::{self, NodeTag, TaggedNode};

/// Default trigger word for act headings.
pub const DEFAULT_ACT_TRIGGER: &str = "Akt";

/// Default trigger word for scene headings.
pub const DEFAULT_SCENE_TRIGGER: &str = "Szene";

/// Options for one conversion run.
///
/// Author and title are required and flow unparsed into the drama model; the
/// trigger words default to the German conventions of the source site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConvertOptions {
    /// Author name, e.g. "Hauptmann, Gerhart"
    pub author: String,

    /// Drama title
    pub title: String,

    /// Substring marking act headings (default "Akt")
    pub act_trigger: String,

    /// Substring marking scene headings (default "Szene")
    pub scene_trigger: String,
}

impl ConvertOptions {
    /// Creates options with the default trigger words.
    #[must_use = "creates options that should be passed to a backend"]
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            act_trigger: DEFAULT_ACT_TRIGGER.to_string(),
            scene_trigger: DEFAULT_SCENE_TRIGGER.to_string(),
        }
    }

    /// Overrides the act trigger word.
    #[must_use = "returns options with the act trigger configured"]
    pub fn with_act_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.act_trigger = trigger.into();
        self
    }

    /// Overrides the scene trigger word.
    #[must_use = "returns options with the scene trigger configured"]
    pub fn with_scene_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.scene_trigger = trigger.into();
        self
    }
}

/// Backend turning ordered page documents into one [`Drama`].
pub trait PlayBackend: Send + Sync {
    /// Parses the ordered page documents into one drama tree.
    ///
    /// Pages concatenate into a single logical node stream before building,
    /// so acts, scenes and speeches may continue across page boundaries.
    ///
    /// # Errors
    /// Returns an error only for edge failures (none in the HTML backend
    /// itself); malformed markup degrades instead of failing.
    fn parse_pages(&self, pages: &[String], options: &ConvertOptions) -> Result<Drama>;

    /// Reads the page files in order and delegates to
    /// [`parse_pages`](Self::parse_pages).
    ///
    /// # Errors
    /// Returns an error if a page file cannot be read.
    fn parse_files<P: AsRef<Path>>(&self, paths: &[P], options: &ConvertOptions) -> Result<Drama> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let page = std::fs::read_to_string(path.as_ref()).map_err(DramaError::IoError)?;
            pages.push(page);
        }
        self.parse_pages(&pages, options)
    }
}

/// HTML backend for the source site's markup conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HtmlPlayBackend;

impl HtmlPlayBackend {
    /// Creates a new backend instance.
    #[inline]
    #[must_use = "creates a backend instance that should be used for parsing"]
    pub const fn new() -> Self {
        Self
    }

    /// Flattens one page document into the tagged node stream.
    fn flatten_page(document: &Html, options: &ConvertOptions, stream: &mut Vec<TaggedNode>) {
        let container = content_container(document);
        for child in container.children() {
            let Some(element) = ElementRef::wrap(child) else {
                continue;
            };
            let name = element.value().name();

            if classify::is_heading(name) {
                let tag =
                    classify::classify_element(&element, &options.act_trigger, &options.scene_trigger);
                if tag != NodeTag::Ignore {
                    stream.push(TaggedNode {
                        tag,
                        text: normalized_text(&element),
                        verse: false,
                    });
                }
                continue;
            }

            if name == "p" {
                if element.value().attr("class").is_some() {
                    Self::flatten_classed_paragraph(&element, options, stream);
                } else {
                    Self::splice_paragraph(&element, options, stream);
                }
            }
            // Other container children are page furniture
        }
    }

    /// A classed paragraph is one node: a verse block or a stage direction.
    fn flatten_classed_paragraph(
        element: &ElementRef,
        options: &ConvertOptions,
        stream: &mut Vec<TaggedNode>,
    ) {
        match classify::classify_element(element, &options.act_trigger, &options.scene_trigger) {
            NodeTag::TextLine => stream.push(TaggedNode::verse(verse_text(element))),
            NodeTag::StageDirection => stream.push(TaggedNode::stage(normalized_text(element))),
            _ => {}
        }
    }

    /// A classless paragraph holds a speech: speaker and direction spans mixed
    /// with bare dialogue text. Its children splice into the stream in order.
    fn splice_paragraph(
        paragraph: &ElementRef,
        options: &ConvertOptions,
        stream: &mut Vec<TaggedNode>,
    ) {
        for child in paragraph.children() {
            match child.value() {
                Node::Text(text) => {
                    if classify::classify_text(text) == NodeTag::TextLine {
                        // Raw text: the builder's punctuation tolerances need
                        // the original leading characters
                        stream.push(TaggedNode::prose(prose_text(text)));
                    }
                }
                Node::Element(_) => {
                    let Some(element) = ElementRef::wrap(child) else {
                        continue;
                    };
                    match classify::classify_element(
                        &element,
                        &options.act_trigger,
                        &options.scene_trigger,
                    ) {
                        NodeTag::Speaker => stream.push(TaggedNode::speaker(normalized_text(&element))),
                        NodeTag::StageDirection => {
                            stream.push(TaggedNode::stage(normalized_text(&element)));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
}

impl PlayBackend for HtmlPlayBackend {
    fn parse_pages(&self, pages: &[String], options: &ConvertOptions) -> Result<Drama> {
        let mut stream = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let document = Html::parse_document(page);
            let before = stream.len();
            Self::flatten_page(&document, options, &mut stream);
            log::debug!("page {}: {} nodes", index + 1, stream.len() - before);
        }

        let mut builder = DramaBuilder::new(options.author.as_str(), options.title.as_str());
        builder.push_all(&stream);
        let drama = builder.finish();
        log::info!(
            "built drama \"{}\": {} acts, {} scenes, {} speeches, {} lines",
            drama.title,
            drama.acts.len(),
            drama.total_scenes(),
            drama.total_speeches(),
            drama.total_lines()
        );
        Ok(drama)
    }
}

/// The page's content container: `div#gutenb`, falling back to `body`, then
/// to the document root so a stray page never aborts the run.
fn content_container(document: &Html) -> ElementRef<'_> {
    for selector in ["div#gutenb", "body"] {
        if let Ok(selector) = Selector::parse(selector) {
            if let Some(element) = document.select(&selector).next() {
                return element;
            }
        }
    }
    log::warn!("page has neither div#gutenb nor body, walking the document root");
    document.root_element()
}

/// Element text with runs of whitespace collapsed to single spaces.
fn normalized_text(element: &ElementRef) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prose text-node content with source-wrapping newlines collapsed.
///
/// Newlines inside a bare prose text node are HTML source formatting, not the
/// site's line-break markers (those only exist where verse blocks put `<br>`),
/// so each wrapped run joins back into one line with a single space. Leading
/// punctuation survives untouched for the builder's glue tolerance.
fn prose_text(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    text.split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Verse block text: the direct bare text-node children joined with `\n`,
/// marking the positions of the block's `<br>` separators.
fn verse_text(element: &ElementRef) -> String {
    let mut lines = Vec::new();
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            let line = text.trim();
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramatei_core::{LineKind, SceneItem, SpeechUnit};

    const PAGE: &str = r#"<html><body>
        <div id="gutenb">
            <h2>Erster Akt</h2>
            <h3>Erste Szene</h3>
            <p class="stage">Ein geräumiges Zimmer.</p>
            <p><span class="speaker">Hilse.</span> Nu ja ja!</p>
            <p class="vers">Erste Verszeile<br/>Zweite Verszeile</p>
        </div>
    </body></html>"#;

    fn parse(pages: &[&str]) -> Drama {
        let pages: Vec<String> = pages.iter().map(|s| (*s).to_string()).collect();
        let options = ConvertOptions::new("Hauptmann, Gerhart", "Die Weber");
        HtmlPlayBackend::new()
            .parse_pages(&pages, &options)
            .expect("parsing never fails")
    }

    #[test]
    fn test_full_page() {
        let drama = parse(&[PAGE]);

        assert_eq!(drama.acts.len(), 1);
        assert_eq!(drama.acts[0].label.as_deref(), Some("Erster Akt"));
        let scene = &drama.acts[0].scenes[0];
        assert_eq!(scene.label.as_deref(), Some("Erste Szene"));

        match &scene.items[0] {
            SceneItem::Stage(direction) => assert_eq!(direction.text, "Ein geräumiges Zimmer."),
            other => panic!("expected stage direction, got {other:?}"),
        }

        let speech = drama.speeches().next().expect("one speech");
        assert_eq!(speech.speaker, "Hilse.");
        let texts: Vec<(&str, LineKind)> = drama
            .lines()
            .map(|line| (line.text.as_str(), line.kind))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("Nu ja ja!", LineKind::Prose),
                ("Erste Verszeile", LineKind::Verse),
                ("Zweite Verszeile", LineKind::Verse),
            ]
        );
    }

    #[test]
    fn test_structure_continues_across_pages() {
        let page_one = r#"<div id="gutenb">
            <h2>Erster Akt</h2>
            <p><span class="speaker">Hilse.</span> Zeile auf Seite eins.</p>
        </div>"#;
        let page_two = r#"<div id="gutenb">
            <p>Zeile auf Seite zwei.</p>
            <h2>Zweiter Akt</h2>
        </div>"#;

        let drama = parse(&[page_one, page_two]);

        assert_eq!(drama.acts.len(), 2);
        // The page-two line continues Hilse's open speech
        let speech = drama.speeches().next().unwrap();
        assert_eq!(speech.units.len(), 2);
        let numbers: Vec<usize> = drama.lines().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_missing_container_falls_back_to_body() {
        let page = r#"<html><body>
            <h3>Erste Szene</h3>
            <p><span class="speaker">Hilse.</span> Zeile.</p>
        </body></html>"#;

        let drama = parse(&[page]);
        assert_eq!(drama.total_scenes(), 1);
        assert_eq!(drama.total_lines(), 1);
    }

    #[test]
    fn test_page_furniture_is_ignored() {
        let page = r#"<div id="gutenb">
            <ul class="nav"><li>weiter</li></ul>
            <h1>Die Weber</h1>
            <p><span class="speaker">Hilse.</span> Zeile.</p>
            <table><tr><td>Seite 3</td></tr></table>
        </div>"#;

        let drama = parse(&[page]);
        assert_eq!(drama.total_lines(), 1, "furniture must not become content");
        assert!(drama.acts.is_empty());
    }

    #[test]
    fn test_regie_span_lands_inside_speech() {
        let page = r#"<div id="gutenb">
            <p><span class="speaker">Hilse.</span> Erste Zeile.
               <span class="regie">steht auf</span>, und weiter im Text.</p>
        </div>"#;

        let drama = parse(&[page]);
        let speech = drama.speeches().next().unwrap();
        let kinds: Vec<&str> = speech
            .units
            .iter()
            .map(|unit| match unit {
                SpeechUnit::Line(_) => "line",
                SpeechUnit::Stage(_) => "stage",
            })
            .collect();
        assert_eq!(kinds, vec!["line", "stage", "line"]);

        // The detached comma glued back onto the direction
        match &speech.units[1] {
            SpeechUnit::Stage(direction) => assert_eq!(direction.text, "steht auf,"),
            other => panic!("expected stage direction, got {other:?}"),
        }
    }

    #[test]
    fn test_source_wrapped_prose_stays_one_line() {
        // Newlines inside a prose text node are markup formatting; only verse
        // blocks carry real line-break markers
        let page = "<div id=\"gutenb\">\n\
            <p><span class=\"speaker\">Hilse.</span> Nu ja ja! 's wird\n\
            schlimmer nich.</p>\n\
        </div>";

        let drama = parse(&[page]);
        let texts: Vec<&str> = drama.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Nu ja ja! 's wird schlimmer nich."]);
        assert_eq!(drama.total_lines(), 1);
    }

    #[test]
    fn test_source_wrapping_keeps_detached_punctuation_prefix() {
        let page = "<div id=\"gutenb\">\n\
            <p><span class=\"speaker\">Hilse.</span> Erste Zeile.\n\
               <span class=\"regie\">steht auf</span>,\n\
               und dann ging er.</p>\n\
        </div>";

        let drama = parse(&[page]);
        let speech = drama.speeches().next().unwrap();
        match &speech.units[1] {
            SpeechUnit::Stage(direction) => assert_eq!(direction.text, "steht auf,"),
            other => panic!("expected stage direction, got {other:?}"),
        }
        match &speech.units[2] {
            SpeechUnit::Line(line) => assert_eq!(line.text, "und dann ging er."),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_pages_yield_empty_drama() {
        let drama = parse(&["<div id=\"gutenb\"></div>", "<html></html>"]);
        assert!(drama.acts.is_empty());
        assert!(drama.scenes.is_empty());
        assert_eq!(drama.author, "Hauptmann, Gerhart");
    }

    #[test]
    fn test_custom_triggers() {
        let page = r#"<div id="gutenb">
            <h2>Act One</h2>
            <h3>Scene Two</h3>
        </div>"#;
        let options = ConvertOptions::new("Shakespeare, William", "Macbeth")
            .with_act_trigger("Act")
            .with_scene_trigger("Scene");

        let drama = HtmlPlayBackend::new()
            .parse_pages(&[page.to_string()], &options)
            .unwrap();
        assert_eq!(drama.acts.len(), 1);
        assert_eq!(drama.acts[0].scenes.len(), 1);
    }

    #[test]
    fn test_parse_files_reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("page1");
        let two = dir.path().join("page2");
        std::fs::write(
            &one,
            "<div id=\"gutenb\"><p><span class=\"speaker\">A.</span> Eins.</p></div>",
        )
        .unwrap();
        std::fs::write(
            &two,
            "<div id=\"gutenb\"><p><span class=\"speaker\">B.</span> Zwei.</p></div>",
        )
        .unwrap();

        let options = ConvertOptions::new("Autor, Test", "Probestück");
        let drama = HtmlPlayBackend::new()
            .parse_files(&[&one, &two], &options)
            .unwrap();

        let speakers: Vec<&str> = drama.speeches().map(|s| s.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["A.", "B."]);
    }

    #[test]
    fn test_parse_files_missing_file_is_an_error() {
        let options = ConvertOptions::new("A", "B");
        let result =
            HtmlPlayBackend::new().parse_files(&[Path::new("/nonexistent/page1")], &options);
        assert!(matches!(result, Err(DramaError::IoError(_))));
    }
}
