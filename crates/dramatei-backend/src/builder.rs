//! Structure building
//!
//! Folds the classified node stream, in document order, into one [`Drama`]
//! tree. The builder is an explicit context object over "current act /
//! current scene / current speech" with a three-state machine; it is
//! reentrant across conversions in one process and never fails on malformed
//! ordering. Dialogue before any speaker label opens an anonymous speech,
//! structure before any heading attaches to implicit parents under the drama
//! root, and every recovery point is logged.

use dramatei_core::{Act, Drama, Line, LineKind, Scene, SceneItem, Speech, SpeechUnit, StageDirection};

use crate::classify::{NodeTag, TaggedNode};
use crate::segment::{Fragment, Fragments};

/// Position of the builder in the act/scene structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderState {
    /// No act heading seen yet
    NoAct,
    /// Inside an act, before its first scene heading
    InActNoScene,
    /// Inside a scene
    InScene,
}

/// Incremental builder for one [`Drama`] tree.
///
/// Feed it the tagged node stream with [`push`](Self::push) and close it with
/// [`finish`](Self::finish). At most one act, one scene and one speech are
/// open at any point; opening a new context finalizes and attaches the
/// previous one first, and the global line counter runs across all of them.
///
/// # Examples
///
/// ```rust
/// use dramatei_backend::{DramaBuilder, TaggedNode};
///
/// let mut builder = DramaBuilder::new("Hauptmann, Gerhart", "Die Weber");
/// builder.push(&TaggedNode::scene_heading("Erste Szene"));
/// builder.push(&TaggedNode::speaker("Hilse."));
/// builder.push(&TaggedNode::prose("Nu ja ja!"));
/// let drama = builder.finish();
///
/// assert_eq!(drama.total_scenes(), 1);
/// assert_eq!(drama.total_lines(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DramaBuilder {
    drama: Drama,
    state: BuilderState,
    current_act: Option<Act>,
    current_scene: Option<Scene>,
    current_speech: Option<Speech>,
    next_line_number: usize,
}

impl DramaBuilder {
    /// Creates a builder for a drama with the caller-supplied author and
    /// title.
    #[must_use = "creates a builder that should be fed the node stream"]
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            drama: Drama::new(author, title),
            state: BuilderState::NoAct,
            current_act: None,
            current_scene: None,
            current_speech: None,
            next_line_number: 1,
        }
    }

    /// Current state of the act/scene machine.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    /// Folds one tagged node into the tree.
    pub fn push(&mut self, node: &TaggedNode) {
        match node.tag {
            NodeTag::ActHeading => self.open_act(&node.text),
            NodeTag::SceneHeading => self.open_scene(&node.text),
            NodeTag::Speaker => self.open_speech(&node.text),
            NodeTag::StageDirection => self.add_stage_direction(&node.text),
            NodeTag::TextLine => self.add_text_line(&node.text, node.verse),
            NodeTag::Ignore => {}
        }
    }

    /// Folds a whole node stream in order.
    pub fn push_all<'a>(&mut self, nodes: impl IntoIterator<Item = &'a TaggedNode>) {
        for node in nodes {
            self.push(node);
        }
    }

    /// Finalizes any open speech, scene and act, in that order, and returns
    /// the finished drama.
    #[must_use = "returns the finished drama tree"]
    pub fn finish(mut self) -> Drama {
        self.finalize_speech();
        self.finalize_scene();
        self.finalize_act();
        self.drama
    }

    fn open_act(&mut self, label: &str) {
        self.finalize_speech();
        self.finalize_scene();
        self.finalize_act();
        self.current_act = Some(Act::new(non_empty(label)));
        self.state = BuilderState::InActNoScene;
    }

    fn open_scene(&mut self, label: &str) {
        self.finalize_speech();
        self.finalize_scene();
        if self.current_act.is_none() {
            log::debug!("scene heading {label:?} before any act heading, attaching to the drama root");
        }
        self.current_scene = Some(Scene::new(non_empty(label)));
        self.state = BuilderState::InScene;
    }

    fn open_speech(&mut self, speaker: &str) {
        self.finalize_speech();
        self.current_speech = Some(Speech::new(speaker.trim()));
    }

    fn add_stage_direction(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(speech) = &mut self.current_speech {
            speech
                .units
                .push(SpeechUnit::Stage(StageDirection::new(text)));
        } else {
            self.open_scene_mut()
                .items
                .push(SceneItem::Stage(StageDirection::new(text)));
        }
    }

    fn add_text_line(&mut self, text: &str, verse: bool) {
        let text = if verse { text } else { self.glue_prose(text) };

        // Markup debris: a lone character glues onto a preceding stage
        // direction and never becomes a line
        if !verse && text.trim().chars().count() == 1 {
            let character = text.trim();
            if let Some(direction) = self.last_stage_direction() {
                direction.text.push_str(character);
            } else {
                log::debug!("dropping stray character {character:?} with no preceding stage direction");
            }
            return;
        }

        if text.trim().is_empty() {
            return;
        }

        if self.current_speech.is_none() {
            log::warn!("dialogue text before any speaker label, opening an anonymous speech");
            self.current_speech = Some(Speech::new(""));
        }

        let kind = if verse { LineKind::Verse } else { LineKind::Prose };
        let mut units = Vec::new();
        for fragment in Fragments::new(text) {
            match fragment {
                Fragment::Line(line) => {
                    let line = if verse { strip_verse_prefix(line) } else { line };
                    if line.is_empty() {
                        continue;
                    }
                    units.push(SpeechUnit::Line(Line {
                        number: self.next_line_number,
                        text: line.to_string(),
                        kind,
                    }));
                    self.next_line_number += 1;
                }
                Fragment::Stage(direction) => {
                    units.push(SpeechUnit::Stage(StageDirection::new(direction)));
                }
            }
        }

        if let Some(speech) = &mut self.current_speech {
            speech.units.extend(units);
        }
    }

    /// Detached punctuation tolerance: a prose fragment starting with `", "`,
    /// `". "` or `": "` carries punctuation the site's markup split off a
    /// preceding stage direction. The punctuation glues back onto that
    /// direction when one directly precedes, and the two-character prefix is
    /// dropped either way.
    fn glue_prose<'a>(&mut self, text: &'a str) -> &'a str {
        for prefix in [", ", ". ", ": "] {
            if let Some(stripped) = text.strip_prefix(prefix) {
                if let Some(direction) = self.last_stage_direction() {
                    direction.text.push(prefix.chars().next().unwrap_or(','));
                }
                return stripped;
            }
        }
        text
    }

    /// The most recent stage direction, when one directly precedes: the last
    /// unit of the open speech, or the last item of the open scene when no
    /// speech is open.
    fn last_stage_direction(&mut self) -> Option<&mut StageDirection> {
        if let Some(speech) = &mut self.current_speech {
            return match speech.units.last_mut() {
                Some(SpeechUnit::Stage(direction)) => Some(direction),
                _ => None,
            };
        }
        match self.current_scene.as_mut().and_then(|s| s.items.last_mut()) {
            Some(SceneItem::Stage(direction)) => Some(direction),
            _ => None,
        }
    }

    /// The open scene, opening an implicit unlabeled one when none exists.
    fn open_scene_mut(&mut self) -> &mut Scene {
        if self.current_scene.is_none() {
            log::debug!("no open scene, opening an implicit one");
            self.state = BuilderState::InScene;
        }
        self.current_scene.get_or_insert_with(|| Scene::new(None))
    }

    fn finalize_speech(&mut self) {
        if let Some(speech) = self.current_speech.take() {
            self.open_scene_mut().items.push(SceneItem::Speech(speech));
        }
    }

    fn finalize_scene(&mut self) {
        if let Some(scene) = self.current_scene.take() {
            match &mut self.current_act {
                Some(act) => act.scenes.push(scene),
                None => self.drama.scenes.push(scene),
            }
        }
    }

    fn finalize_act(&mut self) {
        if let Some(act) = self.current_act.take() {
            self.drama.acts.push(act);
        }
    }
}

fn non_empty(label: &str) -> Option<String> {
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Verse fragments starting with `", "` or `". "` drop that prefix without
/// gluing it back anywhere.
fn strip_verse_prefix(line: &str) -> &str {
    line.strip_prefix(", ")
        .or_else(|| line.strip_prefix(". "))
        .unwrap_or(line)
        .trim()
}
