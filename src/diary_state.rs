use crate::analyzer::{Analysis, Tone};
use crate::diary_entry::{DiaryEntry, DATE_FORMAT};
use chrono::{Days, Local, NaiveDate};
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

/// All entries, one per day, backed by a JSON file.
pub struct DiaryState {
    path: PathBuf,
    entries: BTreeMap<String, DiaryEntry>,
}

fn key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Entries may only be written for today or yesterday.
pub fn is_valid_date(date: NaiveDate, today: NaiveDate) -> bool {
    date == today || today.checked_sub_days(Days::new(1)) == Some(date)
}

impl DiaryState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DiaryState {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Reads the diary file; a missing file is an empty diary.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let serialized = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No existing diary file at {}, starting a new diary", path.display());
                return Ok(DiaryState::new(path));
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("Failed to read {}", path.display()))
            }
        };
        let entries = serde_json::from_str(&serialized)
            .wrap_err_with(|| format!("Failed to parse diary file {}", path.display()))?;
        Ok(DiaryState {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn save_to_file(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, serialized)
            .wrap_err_with(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn add_entry(&mut self, date: NaiveDate, content: String) -> Result<()> {
        self.add_entry_as_of(Local::now().date_naive(), date, content)
    }

    pub fn add_entry_as_of(&mut self, today: NaiveDate, date: NaiveDate, content: String) -> Result<()> {
        if !is_valid_date(date, today) {
            return Err(eyre!("Entries can only be added for today or yesterday."));
        }
        self.entries.insert(key(date), DiaryEntry::new(content));
        info!(date = %date, "Saved entry");
        self.save_to_file()
    }

    pub fn get_entry(&self, date: NaiveDate) -> Option<&DiaryEntry> {
        self.entries.get(&key(date))
    }

    pub fn get_entries(&self) -> &BTreeMap<String, DiaryEntry> {
        &self.entries
    }

    pub fn update_entry_analysis(&mut self, date: NaiveDate, analysis: Analysis) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&key(date))
            .ok_or_else(|| eyre!("Entry not found for {}.", date))?;
        entry.apply_analysis(analysis);
        self.save_to_file()
    }

    pub fn delete_entry(&mut self, date: &str) -> Result<()> {
        if self.entries.remove(date).is_none() {
            return Err(eyre!("Entry not found for {}.", date));
        }
        info!(date, "Deleted entry");
        self.save_to_file()
    }

    pub fn search_entries(&self, query: &str) -> Vec<(String, DiaryEntry)> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(_, e)| {
                e.content.to_lowercase().contains(&query)
                    || e.summary.to_lowercase().contains(&query)
            })
            .map(|(date, e)| (date.clone(), e.clone()))
            .collect()
    }

    /// Number of analyzed entries per tone, in declaration order, zero counts included.
    pub fn mood_counts(&self) -> Vec<(Tone, u64)> {
        Tone::ALL
            .into_iter()
            .map(|tone| {
                let count = self
                    .entries
                    .values()
                    .filter(|e| e.tone == Some(tone))
                    .count() as u64;
                (tone, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "mood_diary_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn analysis(tone: Tone) -> Analysis {
        Analysis {
            summary: "summary".to_string(),
            tone,
            observation: "comment".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let state = DiaryState::load(temp_path("missing")).unwrap();
        assert!(state.get_entries().is_empty());
    }

    #[test]
    fn only_today_and_yesterday_are_accepted() {
        let today = date("2024-03-01");
        assert!(is_valid_date(today, today));
        assert!(is_valid_date(date("2024-02-29"), today));
        assert!(!is_valid_date(date("2024-02-28"), today));
        assert!(!is_valid_date(date("2024-03-02"), today));

        let mut state = DiaryState::new(temp_path("dates"));
        let err = state
            .add_entry_as_of(today, date("2024-01-01"), "old".to_string())
            .unwrap_err();
        assert!(err.to_string().contains("today or yesterday"));
        assert!(state.get_entries().is_empty());
    }

    #[test]
    fn save_analyze_and_reload() {
        let path = temp_path("reload");
        let today = date("2024-05-10");

        let mut state = DiaryState::new(&path);
        state
            .add_entry_as_of(today, today, "Went hiking".to_string())
            .unwrap();
        assert_eq!(state.get_entry(today).unwrap().tone, None);
        state.update_entry_analysis(today, analysis(Tone::Fun)).unwrap();

        let reloaded = DiaryState::load(&path).unwrap();
        let entry = reloaded.get_entry(today).unwrap();
        assert_eq!(entry.content, "Went hiking");
        assert_eq!(entry.tone, Some(Tone::Fun));
        assert_eq!(entry.comment, "comment");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn update_and_delete_require_an_entry() {
        let mut state = DiaryState::new(temp_path("absent"));
        assert!(state
            .update_entry_analysis(date("2024-01-01"), analysis(Tone::Sad))
            .is_err());
        assert!(state.delete_entry("2024-01-01").is_err());
    }

    #[test]
    fn delete_reports_a_failed_write() {
        let path = std::env::temp_dir()
            .join(format!("mood_diary_no_such_dir_{}", std::process::id()))
            .join("diary.json");
        let today = date("2024-08-09");

        let mut state = DiaryState::new(&path);
        assert!(state
            .add_entry_as_of(today, today, "Unwritable".to_string())
            .is_err());
        let err = state.delete_entry("2024-08-09").unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
    }

    #[test]
    fn search_and_mood_counts() {
        let path = temp_path("search");
        let today = date("2024-06-02");
        let yesterday = date("2024-06-01");

        let mut state = DiaryState::new(&path);
        state
            .add_entry_as_of(today, yesterday, "Beach with friends".to_string())
            .unwrap();
        state
            .add_entry_as_of(today, today, "Tax forms all day".to_string())
            .unwrap();
        state.update_entry_analysis(yesterday, analysis(Tone::Fun)).unwrap();

        let hits = state.search_entries("BEACH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "2024-06-01");

        let counts = state.mood_counts();
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[1], (Tone::Fun, 1));
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<u64>(), 1);

        state.delete_entry("2024-06-01").unwrap();
        assert!(state.get_entry(yesterday).is_none());

        fs::remove_file(path).unwrap();
    }
}
