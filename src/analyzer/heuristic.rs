use super::{emotion::Tone, Analysis};

const INDICATORS: [(Tone, &[&str]); 6] = [
    (
        Tone::Romantic,
        &["appreciate", "care", "connection", "close", "together"],
    ),
    (
        Tone::Fun,
        &["happy", "joy", "laugh", "exciting", "wonderful"],
    ),
    (
        Tone::Excited,
        &["thrilled", "eager", "anticipate", "looking forward"],
    ),
    (Tone::Neutral, &["normal", "regular", "usual", "typical"]),
    (
        Tone::Tough,
        &["difficult", "challenging", "hard", "struggle"],
    ),
    (Tone::Sad, &["unhappy", "down", "gloomy", "disappointed"]),
];

const TIME_OF_DAY: [(&str, &str); 5] = [
    ("morning", "the start of the day"),
    ("afternoon", "the middle of the day"),
    ("evening", "the end of the day"),
    ("night", "the end of the day"),
    ("today", "throughout the day"),
];

/// Local stand-in for the remote model. Deterministic keyword scoring.
pub fn mock_classify(text: &str) -> Analysis {
    let lowered = text.to_lowercase();
    let tone = dominant_tone(&lowered);

    let word_count = text.split_whitespace().count();
    let time_context = TIME_OF_DAY
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, phrase)| *phrase)
        .unwrap_or("throughout the day");

    Analysis {
        summary: format!(
            "A {}-word entry reflecting on experiences from {}, expressing primarily {} sentiments.",
            word_count, time_context, tone
        ),
        tone,
        observation: observation_for(tone).to_string(),
    }
}

/// Highest keyword count wins; on a tie the group declared first wins.
fn dominant_tone(lowered: &str) -> Tone {
    let mut best = (INDICATORS[0].0, 0);
    for (tone, keywords) in INDICATORS.iter() {
        let score = keywords.iter().filter(|k| lowered.contains(*k)).count();
        if score > best.1 {
            best = (*tone, score);
        }
    }
    best.0
}

fn observation_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Romantic => "Your capacity for deep connection shines through your words.",
        Tone::Fun => "Your positive energy is clearly reflected in this entry.",
        Tone::Excited => "Your enthusiasm for what's ahead is wonderful to see.",
        Tone::Neutral => "Taking time to document your day shows good self-reflection.",
        Tone::Tough => "Remember that challenging times often lead to growth.",
        Tone::Sad => "Expression through writing can be very healing.",
    }
}
