const REPLACEMENTS: [(&str, &str); 5] = [
    ("love", "appreciate"),
    ("heart", "mind"),
    ("romance", "connection"),
    ("romantic", "meaningful"),
    ("relationship", "friendship"),
];

/// Swaps emotionally loaded words for neutral synonyms before text leaves the
/// machine. Whole words only, ASCII case-insensitive; a replacement keeps the
/// capitalisation of the first letter it replaces.
pub fn soften(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            out.push_str(&replace_word(&text[start..i]));
        }
        out.push(c);
    }
    if let Some(start) = word_start {
        out.push_str(&replace_word(&text[start..]));
    }

    out
}

fn replace_word(word: &str) -> String {
    let Some((_, replacement)) = REPLACEMENTS
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(word))
    else {
        return word.to_string();
    };

    if word.starts_with(|c: char| c.is_uppercase()) {
        let mut chars = replacement.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_whole_words_only() {
        assert_eq!(
            soften("I love my glove and a hearty heart."),
            "I appreciate my glove and a hearty mind."
        );
    }

    #[test]
    fn keeps_leading_capital() {
        assert_eq!(
            soften("Romantic dinner, pure romance. Relationship goals"),
            "Meaningful dinner, pure connection. Friendship goals"
        );
    }

    #[test]
    fn leaves_text_without_charged_words_alone() {
        let text = "Long day at work; rain all evening.\nTired.";
        assert_eq!(soften(text), text);
    }
}
