//! JSON serialization for the drama model
//!
//! Since the whole model already implements Serialize, this is a convenience
//! wrapper over `serde_json` with formatting options, useful for corpus
//! pipelines that post-process the play outside of TEI tooling.

use crate::drama::Drama;
use serde_json::{self, to_string, to_string_pretty};

/// Options for JSON serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonOptions {
    /// Pretty-print with indentation (default: true)
    pub pretty: bool,
}

impl Default for JsonOptions {
    #[inline]
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// JSON serializer for [`Drama`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonSerializer {
    options: JsonOptions,
}

impl JsonSerializer {
    /// Create a new JSON serializer with default options (pretty-printed)
    #[inline]
    #[must_use = "creates serializer with default options"]
    pub fn new() -> Self {
        Self {
            options: JsonOptions::default(),
        }
    }

    /// Create a new JSON serializer with custom options
    #[inline]
    #[must_use = "creates serializer with custom options"]
    pub const fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    /// Serialize a drama to JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[must_use = "this function returns serialized JSON that should be used"]
    pub fn serialize_drama(&self, drama: &Drama) -> Result<String, serde_json::Error> {
        if self.options.pretty {
            to_string_pretty(drama)
        } else {
            to_string(drama)
        }
    }

    /// Serialize a drama to compact JSON (no pretty-printing)
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[must_use = "this function returns serialized JSON that should be used"]
    pub fn serialize_compact(drama: &Drama) -> Result<String, serde_json::Error> {
        to_string(drama)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drama::{Line, LineKind, SceneItem, Scene, Speech, SpeechUnit};

    fn sample_drama() -> Drama {
        let mut drama = Drama::new("Hauptmann, Gerhart", "Die Weber");
        let mut scene = Scene::new(Some("Erste Szene".to_string()));
        let mut speech = Speech::new("Hilse");
        speech.units.push(SpeechUnit::Line(Line {
            number: 1,
            text: "Nu ja ja!".to_string(),
            kind: LineKind::Prose,
        }));
        scene.items.push(SceneItem::Speech(speech));
        drama.scenes.push(scene);
        drama
    }

    #[test]
    fn test_json_serialization_basic() {
        let serializer = JsonSerializer::new();
        let json = serializer.serialize_drama(&sample_drama()).unwrap();

        assert!(json.contains("Die Weber"));
        assert!(json.contains("Hilse"));
        assert!(json.contains("Nu ja ja!"));

        // Should be pretty-printed (contains newlines)
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_json_serialization_compact() {
        let serializer = JsonSerializer::with_options(JsonOptions { pretty: false });
        let json = serializer.serialize_drama(&sample_drama()).unwrap();

        assert!(json.contains("Die Weber"));
        assert!(!json.contains("\n  "));
    }

    #[test]
    fn test_json_deserialization() {
        let drama = sample_drama();
        let serializer = JsonSerializer::new();
        let json = serializer.serialize_drama(&drama).unwrap();

        let deserialized: Drama = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, drama);
    }

    #[test]
    fn test_json_serializer_default() {
        let default = JsonSerializer::default();
        let new = JsonSerializer::new();
        assert_eq!(default, new);
    }
}
