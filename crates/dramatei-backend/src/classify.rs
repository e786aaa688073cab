//! Node classification
//!
//! Decides the drama-structural role of one markup node: act-break heading,
//! scene-break heading, speaker label, stage direction, dialogue text or
//! noise. The predicate table is explicit and pinned to the source site's
//! conventions (`p.vers`, `p.stage`, `span.speaker`, `span.stage`,
//! `span.regie`), so classification never depends on attribute-sniffing
//! inside the markup library.
//!
//! Classification is pure and never fails: node shapes outside the table
//! default to [`NodeTag::Ignore`], favoring silent omission of one node over
//! aborting the whole conversion.

use scraper::ElementRef;

/// Drama-structural role of one markup node.
///
/// Ephemeral: tags exist only for the duration of one build pass and are not
/// part of the persisted drama model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// Heading that opens a new act
    ActHeading,
    /// Heading that opens a new scene
    SceneHeading,
    /// Speaker label opening a new speech
    Speaker,
    /// Stage direction, standalone or inside a speech
    StageDirection,
    /// Verse or prose dialogue text
    TextLine,
    /// Page furniture, empty whitespace, unknown shapes
    Ignore,
}

/// One element of the flattened node stream the structure builder consumes.
///
/// Carries the tag, the node's text and whether dialogue text came from a
/// verse block, so the builder stays independent of the HTML library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedNode {
    /// Classification of the node
    pub tag: NodeTag,
    /// Text content of the node (raw for dialogue, normalized for the rest)
    pub text: String,
    /// Whether a `TextLine` came from a verse block
    pub verse: bool,
}

impl TaggedNode {
    /// An act heading with the given heading text.
    #[must_use = "creates a tagged node"]
    pub fn act_heading(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::ActHeading,
            text: text.into(),
            verse: false,
        }
    }

    /// A scene heading with the given heading text.
    #[must_use = "creates a tagged node"]
    pub fn scene_heading(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::SceneHeading,
            text: text.into(),
            verse: false,
        }
    }

    /// A speaker label.
    #[must_use = "creates a tagged node"]
    pub fn speaker(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::Speaker,
            text: text.into(),
            verse: false,
        }
    }

    /// A stage direction.
    #[must_use = "creates a tagged node"]
    pub fn stage(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::StageDirection,
            text: text.into(),
            verse: false,
        }
    }

    /// Prose dialogue text.
    #[must_use = "creates a tagged node"]
    pub fn prose(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::TextLine,
            text: text.into(),
            verse: false,
        }
    }

    /// Dialogue text from a verse block.
    #[must_use = "creates a tagged node"]
    pub fn verse(text: impl Into<String>) -> Self {
        Self {
            tag: NodeTag::TextLine,
            text: text.into(),
            verse: true,
        }
    }
}

/// Classifies one markup element against the predicate table.
///
/// Heading elements (`h1`-`h6`) match the caller-configured trigger words by
/// case-sensitive substring; a heading naming both triggers counts as an act
/// boundary (the act trigger is tested first). Everything outside the table
/// is [`NodeTag::Ignore`].
#[must_use = "returns the classification of the element"]
pub fn classify_element(element: &ElementRef, act_trigger: &str, scene_trigger: &str) -> NodeTag {
    let name = element.value().name();

    if is_heading(name) {
        let heading: String = element.text().collect();
        if heading.contains(act_trigger) {
            return NodeTag::ActHeading;
        }
        if heading.contains(scene_trigger) {
            return NodeTag::SceneHeading;
        }
        return NodeTag::Ignore;
    }

    match name {
        "p" if has_class(element, "vers") => NodeTag::TextLine,
        "p" if has_class(element, "stage") => NodeTag::StageDirection,
        "span" if has_class(element, "speaker") => NodeTag::Speaker,
        "span" if has_class(element, "stage") || has_class(element, "regie") => {
            NodeTag::StageDirection
        }
        _ => NodeTag::Ignore,
    }
}

/// Classifies one bare text node: dialogue when the trimmed content is
/// non-empty, noise otherwise.
#[inline]
#[must_use = "returns the classification of the text node"]
pub fn classify_text(text: &str) -> NodeTag {
    if text.trim().is_empty() {
        NodeTag::Ignore
    } else {
        NodeTag::TextLine
    }
}

/// Whether the tag name is a heading element (`h1`-`h6`).
#[inline]
#[must_use]
pub fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Whether the element carries the given class.
fn has_class(element: &ElementRef, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}
