mod ui;

use chrono::{Days, Local, NaiveDate};
use color_eyre::{eyre::WrapErr, Result};
use mood_diary::{
    analyzer::{aggregate, ToneClassifier},
    auth::Credentials,
    config::get_settings,
    diary_state::DiaryState,
    gemini::GeminiClient,
    telemetry,
};
use tracing::{error, info, warn};
use ui::{Action, UI};

struct App {
    diary_state: DiaryState,
    classifier: ToneClassifier,
    save_in_progress: bool,
    status: String,
}

impl App {
    /// Persists the entry first, then analyzes it and writes the result back.
    async fn save_entry(&mut self, ui: &mut UI, date: NaiveDate) -> Result<()> {
        if self.save_in_progress {
            ui.show_message("Busy", "Please wait for the current save to finish.")?;
            return Ok(());
        }

        let existing = self.diary_state.get_entry(date).map(|e| e.content.clone());
        let content = ui.get_new_entry(date, existing.as_deref())?;
        if content.is_empty() {
            ui.show_message("Nothing to save", "Please enter some content for your diary entry.")?;
            return Ok(());
        }

        self.save_in_progress = true;
        let result = self.save_and_analyze(ui, date, content).await;
        self.save_in_progress = false;

        if let Err(e) = result {
            error!("Save error: {:#}", e);
            ui.show_message("Error", &format!("Error saving entry: {}", e))?;
        }
        Ok(())
    }

    async fn save_and_analyze(&mut self, ui: &mut UI, date: NaiveDate, content: String) -> Result<()> {
        self.diary_state.add_entry(date, content.clone())?;
        ui.show_analyzing()?;

        let analysis = self.classifier.classify(&content).await;
        info!(date = %date, tone = %analysis.tone, "Analysis complete");
        self.diary_state.update_entry_analysis(date, analysis)?;

        self.status = format!("Entry for {} saved and analyzed.", date);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let settings = get_settings().wrap_err("Failed to read settings")?;
    let _guard = telemetry::init_subscriber(settings.debug, &settings.diary.log_dir)?;

    let diary_state = DiaryState::load(&settings.diary.file)?;
    let classifier = match &settings.gemini.api_key {
        Some(key) if !key.trim().is_empty() => ToneClassifier::new(Box::new(GeminiClient::new(
            settings.gemini.base_url.clone(),
            settings.gemini.model.clone(),
            key.trim(),
        ))),
        _ => {
            warn!("GEMINI_API_KEY is not set, entries will be analyzed locally");
            ToneClassifier::local_only()
        }
    };

    let mut app = App {
        diary_state,
        classifier,
        save_in_progress: false,
        status: String::new(),
    };
    let mut ui = UI::new()?;

    if !ui.login(&Credentials::from(&settings.auth))? {
        info!("Login cancelled");
        return Ok(());
    }

    loop {
        let stats = aggregate(app.diary_state.get_entries());
        ui.display(&app.diary_state, &stats, &app.status)?;

        let Some(action) = ui.handle_input(&app.diary_state)? else {
            continue;
        };
        app.status.clear();

        match action {
            Action::WriteToday => {
                let today = Local::now().date_naive();
                app.save_entry(&mut ui, today).await?;
            }
            Action::WriteYesterday => {
                if let Some(yesterday) = Local::now().date_naive().checked_sub_days(Days::new(1)) {
                    app.save_entry(&mut ui, yesterday).await?;
                }
            }
            Action::View => {
                let entries: Vec<_> = app
                    .diary_state
                    .get_entries()
                    .iter()
                    .rev()
                    .map(|(d, e)| (d.clone(), e.clone()))
                    .collect();
                ui.view_entries("View Entries", &entries)?;
            }
            Action::Delete => {
                if let Some(date) = ui.select_entry_to_delete(&app.diary_state)? {
                    match app.diary_state.delete_entry(&date) {
                        Ok(()) => app.status = format!("Deleted entry for {}.", date),
                        Err(e) => {
                            error!("Delete error: {:#}", e);
                            ui.show_message("Error", &format!("Error deleting entry: {}", e))?;
                        }
                    }
                }
            }
            Action::Search => {
                if let Some(query) = ui.get_search_query()? {
                    let results = app.diary_state.search_entries(&query);
                    ui.view_entries("Search Results", &results)?;
                }
            }
            Action::Chart => {
                ui.show_mood_chart(&app.diary_state.mood_counts())?;
            }
            Action::Quit => break,
        }
    }

    info!("Closing application");
    Ok(())
}
