use crate::analyzer::{Analysis, Tone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Key format of the diary file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub content: String,
    #[serde(default)]
    pub summary: String,
    /// `None` until the entry has been analyzed; written as `""`.
    #[serde(default, serialize_with = "write_tone", deserialize_with = "read_tone")]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub comment: String,
}

impl DiaryEntry {
    pub fn new(content: String) -> Self {
        DiaryEntry {
            content,
            summary: String::new(),
            tone: None,
            comment: String::new(),
        }
    }

    pub fn apply_analysis(&mut self, analysis: Analysis) {
        self.summary = analysis.summary;
        self.tone = Some(analysis.tone);
        self.comment = analysis.observation;
    }

    pub fn tone_label(&self) -> &'static str {
        self.tone.map(|t| t.as_str()).unwrap_or("")
    }
}

fn write_tone<S: Serializer>(tone: &Option<Tone>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tone.map(|t| t.as_str()).unwrap_or(""))
}

fn read_tone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Tone>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(raw.parse().unwrap_or_else(|e| {
        warn!("{} in diary file, reading it as neutral", e);
        Tone::Neutral
    })))
}
