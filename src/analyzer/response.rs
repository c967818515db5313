use color_eyre::{eyre::WrapErr, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{
    emotion::{resolve_model_label, Tone},
    Analysis,
};

const FALLBACK_ANALYSIS: &str = "Entry analyzed.";
const FALLBACK_OBSERVATION: &str = "Keep writing!";

const RESPONSE_KEYWORDS: [(Tone, &[&str]); 5] = [
    (
        Tone::Romantic,
        &["care", "appreciate", "connection", "feeling"],
    ),
    (Tone::Fun, &["happy", "joy", "laugh", "exciting"]),
    (Tone::Excited, &["thrilled", "eager", "looking forward"]),
    (Tone::Tough, &["difficult", "challenging", "hard"]),
    (Tone::Sad, &["unhappy", "down", "gloomy"]),
];

#[derive(Debug, Deserialize)]
struct StructuredReply {
    analysis: String,
    emotion: String,
    observation: String,
}

/// Removes surrounding code fences and a leading `json` language tag.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim().trim_matches('`').trim();
    trimmed
        .strip_prefix("json")
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Turns model output into an [`Analysis`]. Text that is not JSON at all goes
/// through the line heuristic; JSON that lacks the three string keys is an
/// error, as is any other malformed reply.
pub fn parse_reply(raw: &str) -> Result<Analysis> {
    let cleaned = strip_fences(raw);
    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Model reply is not JSON, extracting from text");
            return Ok(extract_structured_response(cleaned));
        }
    };

    let reply: StructuredReply =
        serde_json::from_value(value).wrap_err("Model reply has an unexpected shape")?;
    let tone = resolve_model_label(&reply.emotion).unwrap_or_else(|e| {
        warn!("{}, storing as neutral", e);
        Tone::Neutral
    });
    Ok(Analysis {
        summary: reply.analysis,
        tone,
        observation: reply.observation,
    })
}

/// Best effort for free-form replies: first line is the analysis, last line
/// the observation, tone comes from the first keyword group that matches.
pub fn extract_structured_response(text: &str) -> Analysis {
    let lines: Vec<&str> = text.split('\n').collect();

    let summary = match lines.first().map(|l| l.trim()) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => FALLBACK_ANALYSIS.to_string(),
    };
    let observation = match lines.as_slice() {
        [_, .., last] => last.trim().to_string(),
        _ => FALLBACK_OBSERVATION.to_string(),
    };

    let lowered = text.to_lowercase();
    let tone = RESPONSE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(tone, _)| *tone)
        .unwrap_or(Tone::Neutral);

    Analysis {
        summary,
        tone,
        observation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_language_tag() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn parses_fenced_json_and_maps_emotion() {
        let raw = "```json\n{\"analysis\": \"A calm day.\", \"emotion\": \"downhearted\", \"observation\": \"Rest up.\"}\n```";
        let analysis = parse_reply(raw).unwrap();
        assert_eq!(analysis.summary, "A calm day.");
        assert_eq!(analysis.tone, Tone::Sad);
        assert_eq!(analysis.observation, "Rest up.");
    }

    #[test]
    fn unknown_emotion_is_stored_as_neutral() {
        let raw = r#"{"analysis": "x", "emotion": "bewildered", "observation": "y"}"#;
        assert_eq!(parse_reply(raw).unwrap().tone, Tone::Neutral);
    }

    #[test]
    fn non_json_reply_goes_through_the_text_heuristic() {
        let raw = "You had a challenging week.\nThings will ease up.";
        let analysis = parse_reply(raw).unwrap();
        assert_eq!(analysis.summary, "You had a challenging week.");
        assert_eq!(analysis.observation, "Things will ease up.");
        assert_eq!(analysis.tone, Tone::Tough);
    }

    #[test]
    fn json_with_the_wrong_shape_is_an_error() {
        assert!(parse_reply(r#"{"analysis": "x", "emotion": "joyful"}"#).is_err());
        assert!(parse_reply(r#"{"analysis": "x", "emotion": null, "observation": "y"}"#).is_err());
        assert!(parse_reply("[1, 2, 3]").is_err());
        assert!(parse_reply("```json\nnull\n```").is_err());
    }

    #[test]
    fn trailing_text_after_json_counts_as_text() {
        let analysis = parse_reply("1. Great day\n2. Keep going").unwrap();
        assert_eq!(analysis.summary, "1. Great day");
        assert_eq!(analysis.observation, "2. Keep going");
    }

    #[test]
    fn single_line_uses_generic_observation() {
        let analysis = extract_structured_response("Just one line here");
        assert_eq!(analysis.summary, "Just one line here");
        assert_eq!(analysis.observation, "Keep writing!");
        assert_eq!(analysis.tone, Tone::Neutral);
    }

    #[test]
    fn first_matching_group_wins() {
        // "feeling" (romantic) is declared before "gloomy" (sad)
        let analysis = extract_structured_response("A gloomy feeling\nok");
        assert_eq!(analysis.tone, Tone::Romantic);
    }
}
