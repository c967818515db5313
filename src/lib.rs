pub mod analyzer;
pub mod auth;
pub mod config;
pub mod diary_entry;
pub mod diary_state;
pub mod gemini;
pub mod telemetry;
