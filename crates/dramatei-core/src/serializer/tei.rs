//! TEI-XML serialization for the drama model
//!
//! Walks a finished [`Drama`] tree and produces the nested TEI element
//! structure as an in-memory [`XmlElement`] tree: `teiHeader` with title,
//! author, language and the cast list, then `text > body` with one `div` per
//! act and scene, `sp` per speech and `stage` for directions. Verse lines nest
//! as `l` inside `lg`, prose lines become `p`; both carry the global line
//! number as `n`.
//!
//! Serialization is a pure structural transform: it never drops an entity that
//! exists in the drama tree, element order matches the tree's insertion order,
//! and serializing the same tree twice yields identical output.

use std::collections::{HashMap, HashSet};

use crate::drama::{Act, Drama, Line, LineKind, Scene, SceneItem, Speech, SpeechUnit};
use crate::xml::XmlElement;

/// TEI namespace, set as the default namespace on the root element.
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";

/// Identifier stem used when a speech has no speaker label; the speech's
/// 1-based document position is appended.
const SPEAKER_PLACEHOLDER: &str = "speaker";

/// Options for TEI serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeiOptions {
    /// `ident` attribute of the `language` element (default: "de")
    pub language_ident: String,
    /// `usage` attribute of the `language` element (default: "100")
    pub language_usage: String,
    /// Text content of the `language` element (default: "German")
    pub language_name: String,
}

impl Default for TeiOptions {
    #[inline]
    fn default() -> Self {
        Self {
            language_ident: "de".to_string(),
            language_usage: "100".to_string(),
            language_name: "German".to_string(),
        }
    }
}

/// TEI serializer for [`Drama`]
///
/// # Examples
///
/// ```rust
/// use dramatei_core::{Drama, TeiSerializer};
///
/// let drama = Drama::new("Hauptmann, Gerhart", "Die Weber");
/// let tree = TeiSerializer::new().serialize_drama(&drama);
///
/// assert_eq!(tree.name, "TEI");
/// assert!(tree.find("titleStmt").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeiSerializer {
    options: TeiOptions,
}

impl TeiSerializer {
    /// Create a new TEI serializer with default options
    #[inline]
    #[must_use = "creates serializer with default options"]
    pub fn new() -> Self {
        Self {
            options: TeiOptions::default(),
        }
    }

    /// Create a new TEI serializer with custom options
    #[inline]
    #[must_use = "creates serializer with custom options"]
    pub const fn with_options(options: TeiOptions) -> Self {
        Self { options }
    }

    /// Serialize a drama to a TEI element tree.
    ///
    /// Never fails: empty speakers fall back to placeholder identifiers and an
    /// empty drama still yields a well-formed header and body.
    #[must_use = "this function returns the TEI tree that should be used"]
    pub fn serialize_drama(&self, drama: &Drama) -> XmlElement {
        let mut ids = SpeakerIds::default();
        let body = self.body_element(drama, &mut ids);
        let header = self.header_element(drama, &ids);

        XmlElement::new("TEI")
            .with_attr("xmlns", TEI_NS)
            .with_child(header)
            .with_child(XmlElement::new("text").with_child(body))
    }

    fn header_element(&self, drama: &Drama, ids: &SpeakerIds) -> XmlElement {
        let title_stmt = XmlElement::new("titleStmt")
            .with_child(XmlElement::new("title").with_text(drama.title.as_str()))
            .with_child(XmlElement::new("author").with_text(drama.author.as_str()));

        let language = XmlElement::new("language")
            .with_attr("ident", self.options.language_ident.as_str())
            .with_attr("usage", self.options.language_usage.as_str())
            .with_text(self.options.language_name.as_str());

        let mut list_person = XmlElement::new("listPerson");
        for (id, surface) in ids.roster_sorted() {
            list_person = list_person.with_child(
                XmlElement::new("person")
                    .with_attr("xml:id", id)
                    .with_child(XmlElement::new("persName").with_text(surface)),
            );
        }

        XmlElement::new("teiHeader")
            .with_child(XmlElement::new("fileDesc").with_child(title_stmt))
            .with_child(
                XmlElement::new("profileDesc")
                    .with_child(XmlElement::new("langUsage").with_child(language))
                    .with_child(XmlElement::new("particDesc").with_child(list_person)),
            )
    }

    fn body_element(&self, drama: &Drama, ids: &mut SpeakerIds) -> XmlElement {
        let mut body = XmlElement::new("body");
        for (index, scene) in drama.scenes.iter().enumerate() {
            let element = self.scene_element(scene, index + 1, ids);
            body.push_element(element);
        }
        for (index, act) in drama.acts.iter().enumerate() {
            let element = self.act_element(act, index + 1, ids);
            body.push_element(element);
        }
        body
    }

    fn act_element(&self, act: &Act, position: usize, ids: &mut SpeakerIds) -> XmlElement {
        let mut div = XmlElement::new("div")
            .with_attr("type", "act")
            .with_attr("n", position.to_string());
        if let Some(label) = &act.label {
            div = div.with_child(XmlElement::new("head").with_text(label.as_str()));
        }
        for (index, scene) in act.scenes.iter().enumerate() {
            let element = self.scene_element(scene, index + 1, ids);
            div.push_element(element);
        }
        div
    }

    fn scene_element(&self, scene: &Scene, position: usize, ids: &mut SpeakerIds) -> XmlElement {
        let mut div = XmlElement::new("div")
            .with_attr("type", "scene")
            .with_attr("n", position.to_string());
        if let Some(label) = &scene.label {
            div = div.with_child(XmlElement::new("head").with_text(label.as_str()));
        }
        for item in &scene.items {
            match item {
                SceneItem::Speech(speech) => {
                    let id = ids.id_for(&speech.speaker);
                    let element = self.speech_element(speech, &id);
                    div.push_element(element);
                }
                SceneItem::Stage(direction) => {
                    div.push_element(XmlElement::new("stage").with_text(direction.text.as_str()));
                }
            }
        }
        div
    }

    fn speech_element(&self, speech: &Speech, id: &str) -> XmlElement {
        let mut sp = XmlElement::new("sp").with_attr("who", format!("#{id}"));

        let surface = clean_speaker(&speech.speaker);
        if !surface.is_empty() {
            sp = sp.with_child(XmlElement::new("speaker").with_text(surface));
        }

        // Maximal runs of consecutive verse lines share one lg group.
        let mut verse_group: Option<XmlElement> = None;
        for unit in &speech.units {
            match unit {
                SpeechUnit::Line(line) if line.kind == LineKind::Verse => {
                    verse_group
                        .get_or_insert_with(|| XmlElement::new("lg"))
                        .push_element(line_element(line));
                }
                SpeechUnit::Line(line) => {
                    flush_verse_group(&mut sp, &mut verse_group);
                    sp.push_element(
                        XmlElement::new("p")
                            .with_attr("n", line.number.to_string())
                            .with_text(line.text.as_str()),
                    );
                }
                SpeechUnit::Stage(direction) => {
                    flush_verse_group(&mut sp, &mut verse_group);
                    sp.push_element(XmlElement::new("stage").with_text(direction.text.as_str()));
                }
            }
        }
        flush_verse_group(&mut sp, &mut verse_group);
        sp
    }
}

fn line_element(line: &Line) -> XmlElement {
    XmlElement::new("l")
        .with_attr("n", line.number.to_string())
        .with_text(line.text.as_str())
}

fn flush_verse_group(sp: &mut XmlElement, verse_group: &mut Option<XmlElement>) {
    if let Some(group) = verse_group.take() {
        sp.push_element(group);
    }
}

/// Speaker surface form as displayed: trimmed, surrounding periods removed
/// (the site renders speaker labels with a trailing period).
fn clean_speaker(raw: &str) -> &str {
    raw.trim().trim_matches('.').trim()
}

/// Normalized speaker reference: lowercase, every non-alphanumeric character
/// replaced by an underscore.
fn normalize_reference(surface: &str) -> String {
    surface
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Assigns speaker-reference identifiers in document order.
///
/// Identical speaker names share one identifier; distinct names that normalize
/// alike get a counter suffix; empty names get a per-speech placeholder. The
/// roster keeps one `(id, surface)` pair per named speaker for `listPerson`.
#[derive(Debug, Default)]
struct SpeakerIds {
    by_name: HashMap<String, String>,
    taken: HashSet<String>,
    roster: Vec<(String, String)>,
    position: usize,
}

impl SpeakerIds {
    fn id_for(&mut self, raw_speaker: &str) -> String {
        self.position += 1;
        let surface = clean_speaker(raw_speaker);

        if surface.is_empty() {
            let id = self.claim(format!("{SPEAKER_PLACEHOLDER}_{}", self.position));
            log::debug!(
                "speech {} has no speaker label, using placeholder id '{id}'",
                self.position
            );
            return id;
        }

        if let Some(id) = self.by_name.get(surface) {
            return id.clone();
        }

        let id = self.claim(normalize_reference(surface));
        self.by_name.insert(surface.to_string(), id.clone());
        self.roster.push((id.clone(), surface.to_string()));
        id
    }

    fn claim(&mut self, base: String) -> String {
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base}_{counter}");
            if self.taken.insert(candidate.clone()) {
                log::debug!("speaker id collision on '{base}', using '{candidate}'");
                return candidate;
            }
            counter += 1;
        }
    }

    fn roster_sorted(&self) -> Vec<(&str, &str)> {
        let mut roster: Vec<(&str, &str)> = self
            .roster
            .iter()
            .map(|(id, surface)| (id.as_str(), surface.as_str()))
            .collect();
        roster.sort_unstable_by(|a, b| a.0.cmp(b.0));
        roster
    }
}
