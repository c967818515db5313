use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Mood label stored on a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Romantic,
    Fun,
    Excited,
    Neutral,
    Tough,
    Sad,
}

impl Tone {
    /// Declaration order, which is also the tie-break order of the heuristics.
    pub const ALL: [Tone; 6] = [
        Tone::Romantic,
        Tone::Fun,
        Tone::Excited,
        Tone::Neutral,
        Tone::Tough,
        Tone::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Romantic => "romantic",
            Tone::Fun => "fun",
            Tone::Excited => "excited",
            Tone::Neutral => "neutral",
            Tone::Tough => "tough",
            Tone::Sad => "sad",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// The vocabulary the remote model is asked to answer in. Softer words than
/// [`Tone`] so that diary text does not trip upstream content filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEmotion {
    Appreciative,
    Joyful,
    Content,
    Reflective,
    Concerned,
    Downhearted,
}

impl ModelEmotion {
    pub const ALL: [ModelEmotion; 6] = [
        ModelEmotion::Appreciative,
        ModelEmotion::Joyful,
        ModelEmotion::Content,
        ModelEmotion::Reflective,
        ModelEmotion::Concerned,
        ModelEmotion::Downhearted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelEmotion::Appreciative => "appreciative",
            ModelEmotion::Joyful => "joyful",
            ModelEmotion::Content => "content",
            ModelEmotion::Reflective => "reflective",
            ModelEmotion::Concerned => "concerned",
            ModelEmotion::Downhearted => "downhearted",
        }
    }

    /// Comma separated list used inside the prompt.
    pub fn prompt_options() -> String {
        ModelEmotion::ALL
            .iter()
            .map(ModelEmotion::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ModelEmotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelEmotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

impl From<ModelEmotion> for Tone {
    fn from(emotion: ModelEmotion) -> Self {
        match emotion {
            ModelEmotion::Appreciative => Tone::Romantic,
            ModelEmotion::Joyful => Tone::Fun,
            ModelEmotion::Content => Tone::Excited,
            ModelEmotion::Reflective => Tone::Neutral,
            ModelEmotion::Concerned => Tone::Tough,
            ModelEmotion::Downhearted => Tone::Sad,
        }
    }
}

/// A label that belongs to neither vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmotion(pub String);

impl fmt::Display for UnknownEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emotion label: {:?}", self.0)
    }
}

impl std::error::Error for UnknownEmotion {}

/// Translates a label returned by the model. Model vocabulary is mapped,
/// labels already in the stored vocabulary pass through, anything else is
/// rejected.
pub fn resolve_model_label(raw: &str) -> Result<Tone, UnknownEmotion> {
    match raw.parse::<ModelEmotion>() {
        Ok(emotion) => Ok(emotion.into()),
        Err(_) => raw.parse::<Tone>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_model_emotion_maps_to_a_distinct_tone() {
        let mapped: HashSet<Tone> = ModelEmotion::ALL.into_iter().map(Tone::from).collect();
        assert_eq!(mapped.len(), 6);
        assert_eq!(Tone::from(ModelEmotion::Appreciative), Tone::Romantic);
        assert_eq!(Tone::from(ModelEmotion::Concerned), Tone::Tough);
        assert_eq!(Tone::from(ModelEmotion::Downhearted), Tone::Sad);
    }

    #[test]
    fn resolve_maps_model_labels_and_passes_stored_labels_through() {
        assert_eq!(resolve_model_label("joyful"), Ok(Tone::Fun));
        assert_eq!(resolve_model_label(" Content "), Ok(Tone::Excited));
        assert_eq!(resolve_model_label("sad"), Ok(Tone::Sad));
        assert_eq!(
            resolve_model_label("ecstatic"),
            Err(UnknownEmotion("ecstatic".to_string()))
        );
    }

    #[test]
    fn tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Tough).unwrap(), "\"tough\"");
        assert_eq!("Romantic".parse::<Tone>(), Ok(Tone::Romantic));
    }
}
