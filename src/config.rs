use config::{builder::DefaultState, ConfigBuilder};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub debug: bool,
    pub gemini: GeminiSettings,
    pub diary: DiarySettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiarySettings {
    pub file: PathBuf,
    pub log_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
}

/// Defaults, then an optional `diary.yaml`, then `DIARY_*` environment
/// variables, e.g. `DIARY_GEMINI__MODEL=gemini-1.5-flash`. The plain
/// `GEMINI_API_KEY` variable is honoured as well.
pub fn get_settings() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    let mut builder = defaults()?
        .add_source(config::File::from(base_path.join("diary.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("DIARY")
                .prefix_separator("_")
                .separator("__"),
        );

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        builder = builder.set_override("gemini.api_key", key)?;
    }

    builder.build()?.try_deserialize::<Settings>()
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("debug", false)?
        .set_default("gemini.model", "gemini-2.0-flash")?
        .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("diary.file", "diary_entries.json")?
        .set_default("diary.log_dir", "logs")?
        .set_default("auth.username", "user")?
        .set_default("auth.password", "password")
}
