use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use super::emotion::Tone;
use crate::diary_entry::{DiaryEntry, DATE_FORMAT};

/// The three "most notable day" values shown next to the diary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySummaryStats {
    pub toughest_day: Option<NaiveDate>,
    pub most_fun_day: Option<NaiveDate>,
    pub most_romantic_day: Option<NaiveDate>,
}

/// Buckets entries by tone and picks the latest date for each statistic.
/// Entries without a tone count as neutral. Entries whose key is not a date
/// are logged and skipped.
pub fn aggregate(entries: &BTreeMap<String, DiaryEntry>) -> DailySummaryStats {
    let mut buckets: HashMap<Tone, Vec<NaiveDate>> = HashMap::new();

    for (key, entry) in entries {
        let date = match NaiveDate::parse_from_str(key, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                warn!("Could not process entry for date {}: {}", key, e);
                continue;
            }
        };
        let tone = entry.tone.unwrap_or(Tone::Neutral);
        buckets.entry(tone).or_default().push(date);
    }

    let latest = |tones: &[Tone]| {
        tones
            .iter()
            .filter_map(|tone| buckets.get(tone))
            .flatten()
            .max()
            .copied()
    };

    DailySummaryStats {
        toughest_day: latest(&[Tone::Tough, Tone::Sad]),
        most_fun_day: latest(&[Tone::Fun, Tone::Excited]),
        most_romantic_day: latest(&[Tone::Romantic]),
    }
}
