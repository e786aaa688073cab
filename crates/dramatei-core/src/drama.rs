//! Core drama model types
//!
//! This module defines the `Drama` tree produced by the structure builder and
//! consumed by the serializers: a play broken into acts, scenes, speeches and
//! numbered lines, with stage directions interleaved where the source put them.

use serde::{Deserialize, Serialize};

/// A complete stage play reconstructed from the source pages.
///
/// Owns an ordered sequence of [`Act`]s and, for plays (or play fragments)
/// without act-level division, a flat sequence of act-less [`Scene`]s. Act-less
/// scenes always precede the first act in document order, so serializing
/// `scenes` followed by `acts` reproduces the source order.
///
/// Author and title are supplied by the caller, never parsed from markup.
///
/// # Examples
///
/// ```rust
/// use dramatei_core::{Drama, Act, Scene};
///
/// let mut drama = Drama::new("Hauptmann, Gerhart", "Die Weber");
/// let mut act = Act::new(Some("Erster Akt".to_string()));
/// act.scenes.push(Scene::new(Some("Erste Szene".to_string())));
/// drama.acts.push(act);
///
/// assert_eq!(drama.title, "Die Weber");
/// assert_eq!(drama.total_scenes(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drama {
    /// Author name, as given by the caller (e.g. "Hauptmann, Gerhart")
    pub author: String,

    /// Drama title, as given by the caller
    pub title: String,

    /// Scenes that occur before any act heading (or the whole play when the
    /// source has no act-level division)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,

    /// Acts in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acts: Vec<Act>,
}

/// One act of the play. The 1-based position is its index within
/// [`Drama::acts`] plus one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Act {
    /// Heading text of the act (e.g. "Erster Akt"), when the source had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Scenes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,
}

/// One scene, either under an act or directly under the drama root.
///
/// Scenes synthesized by graceful degradation (dialogue with no preceding
/// scene heading) carry `label: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Scene {
    /// Heading text of the scene, when the source had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Speeches and standalone stage directions in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SceneItem>,
}

/// Ordered content of a scene: a speech or a standalone stage direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneItem {
    /// A speech attributed to one speaker
    Speech(Speech),
    /// A stage direction between speeches
    Stage(StageDirection),
}

/// A contiguous block of dialogue attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Speech {
    /// Raw speaker-label text; empty for the anonymous-speech fallback
    /// (dialogue that arrived before any speaker label)
    pub speaker: String,

    /// Lines and inline stage directions in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<SpeechUnit>,
}

/// Ordered content of a speech: a numbered line or an inline stage direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechUnit {
    /// A verse or prose dialogue line
    Line(Line),
    /// A stage direction inside the speech
    Stage(StageDirection),
}

/// One unit of dialogue text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Global sequence number, monotonic across the whole drama, starting at 1
    pub number: usize,

    /// Line text, trimmed
    pub text: String,

    /// Verse or prose, per the source markup
    pub kind: LineKind,
}

/// Whether a line came from a verse block or from running speech text.
///
/// The distinction is carried through to TEI output: verse lines nest as
/// `l` inside `lg`, prose lines become `p` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Line from a verse block
    Verse,
    /// Line from running prose speech text
    Prose,
}

/// Non-spoken descriptive text (action, setting). Carries no line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StageDirection {
    /// Direction text, trimmed
    pub text: String,
}

impl Drama {
    /// Creates an empty drama with the caller-supplied author and title.
    #[inline]
    #[must_use = "creates an empty drama"]
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            scenes: Vec::new(),
            acts: Vec::new(),
        }
    }

    /// Iterates all scenes in document order: act-less scenes first, then the
    /// scenes of each act.
    pub fn scenes_in_order(&self) -> impl Iterator<Item = &Scene> {
        self.scenes
            .iter()
            .chain(self.acts.iter().flat_map(|act| act.scenes.iter()))
    }

    /// Iterates all speeches in document order.
    pub fn speeches(&self) -> impl Iterator<Item = &Speech> {
        self.scenes_in_order().flat_map(|scene| {
            scene.items.iter().filter_map(|item| match item {
                SceneItem::Speech(speech) => Some(speech),
                SceneItem::Stage(_) => None,
            })
        })
    }

    /// Iterates all dialogue lines in document order.
    ///
    /// Useful for auditing the global numbering: the sequence of
    /// [`Line::number`] values is 1, 2, 3, … with no gaps.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.speeches().flat_map(|speech| {
            speech.units.iter().filter_map(|unit| match unit {
                SpeechUnit::Line(line) => Some(line),
                SpeechUnit::Stage(_) => None,
            })
        })
    }

    /// Total number of scenes, counting act-less scenes and scenes inside acts.
    #[inline]
    #[must_use = "returns the total scene count"]
    pub fn total_scenes(&self) -> usize {
        self.scenes_in_order().count()
    }

    /// Total number of speeches across the whole drama.
    #[inline]
    #[must_use = "returns the total speech count"]
    pub fn total_speeches(&self) -> usize {
        self.speeches().count()
    }

    /// Total number of dialogue lines across the whole drama.
    #[inline]
    #[must_use = "returns the total line count"]
    pub fn total_lines(&self) -> usize {
        self.lines().count()
    }
}

impl Act {
    /// Creates an empty act with an optional heading label.
    #[inline]
    #[must_use = "creates an empty act"]
    pub fn new(label: Option<String>) -> Self {
        Self {
            label,
            scenes: Vec::new(),
        }
    }
}

impl Scene {
    /// Creates an empty scene with an optional heading label.
    #[inline]
    #[must_use = "creates an empty scene"]
    pub fn new(label: Option<String>) -> Self {
        Self {
            label,
            items: Vec::new(),
        }
    }
}

impl Speech {
    /// Creates an empty speech for the given speaker label.
    #[inline]
    #[must_use = "creates an empty speech"]
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            units: Vec::new(),
        }
    }

    /// Whether this speech came from the anonymous fallback (no speaker label
    /// had been seen when its dialogue arrived).
    #[inline]
    #[must_use = "returns whether the speech has no speaker"]
    pub fn is_anonymous(&self) -> bool {
        self.speaker.trim().is_empty()
    }
}

impl StageDirection {
    /// Creates a stage direction from its text.
    #[inline]
    #[must_use = "creates a stage direction"]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verse => write!(f, "verse"),
            Self::Prose => write!(f, "prose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_drama() -> Drama {
        let mut drama = Drama::new("Hauptmann, Gerhart", "Die Weber");
        let mut scene = Scene::new(None);
        scene
            .items
            .push(SceneItem::Stage(StageDirection::new("Ein Zimmer.")));
        let mut speech = Speech::new("Dreissiger");
        speech.units.push(SpeechUnit::Line(Line {
            number: 1,
            text: "Nun, Pfeifer, was gibt's?".to_string(),
            kind: LineKind::Prose,
        }));
        scene.items.push(SceneItem::Speech(speech));
        drama.scenes.push(scene);

        let mut act = Act::new(Some("Zweiter Akt".to_string()));
        let mut act_scene = Scene::new(Some("Erste Szene".to_string()));
        let mut act_speech = Speech::new("Pfeifer");
        act_speech.units.push(SpeechUnit::Line(Line {
            number: 2,
            text: "Gleich, gleich!".to_string(),
            kind: LineKind::Verse,
        }));
        act_speech
            .units
            .push(SpeechUnit::Stage(StageDirection::new("ab")));
        act_scene.items.push(SceneItem::Speech(act_speech));
        act.scenes.push(act_scene);
        drama.acts.push(act);
        drama
    }

    #[test]
    fn test_new_drama_is_empty() {
        let drama = Drama::new("Author", "Title");
        assert_eq!(drama.author, "Author");
        assert_eq!(drama.title, "Title");
        assert!(drama.scenes.is_empty(), "new drama should have no scenes");
        assert!(drama.acts.is_empty(), "new drama should have no acts");
        assert_eq!(drama.total_lines(), 0);
    }

    #[test]
    fn test_scenes_in_order_puts_actless_scenes_first() {
        let drama = sample_drama();
        let labels: Vec<Option<&str>> = drama
            .scenes_in_order()
            .map(|s| s.label.as_deref())
            .collect();
        assert_eq!(labels, vec![None, Some("Erste Szene")]);
    }

    #[test]
    fn test_line_iteration_follows_document_order() {
        let drama = sample_drama();
        let numbers: Vec<usize> = drama.lines().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2], "lines should come out in document order");
    }

    #[test]
    fn test_counts() {
        let drama = sample_drama();
        assert_eq!(drama.total_scenes(), 2);
        assert_eq!(drama.total_speeches(), 2);
        assert_eq!(drama.total_lines(), 2);
    }

    #[test]
    fn test_anonymous_speech() {
        assert!(Speech::new("").is_anonymous());
        assert!(Speech::new("   ").is_anonymous());
        assert!(!Speech::new("Hilse").is_anonymous());
    }

    #[test]
    fn test_line_kind_display() {
        assert_eq!(LineKind::Verse.to_string(), "verse");
        assert_eq!(LineKind::Prose.to_string(), "prose");
    }

    #[test]
    fn test_serde_round_trip() {
        let drama = sample_drama();
        let json = serde_json::to_string(&drama).unwrap();
        let back: Drama = serde_json::from_str(&json).unwrap();
        assert_eq!(drama, back, "serde round trip should preserve the tree");
    }

    #[test]
    fn test_speech_unit_json_tagging() {
        let unit = SpeechUnit::Stage(StageDirection::new("ab"));
        let json = serde_json::to_string(&unit).unwrap();
        assert!(
            json.contains("\"type\":\"stage\""),
            "units should be tagged by type, got: {json}"
        );
    }

    #[test]
    fn test_empty_collections_skipped_in_json() {
        let drama = Drama::new("A", "B");
        let json = serde_json::to_string(&drama).unwrap();
        assert!(
            !json.contains("scenes") && !json.contains("acts"),
            "empty sequences should be skipped, got: {json}"
        );
    }
}
