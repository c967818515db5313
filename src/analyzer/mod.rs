//! Tone classification for diary entries.
//!
//! [`ToneClassifier`] asks a remote text model for a summary, a mood and a
//! short comment. The first time the remote call fails the classifier drops
//! to the local keyword heuristics for good; callers always get an
//! [`Analysis`] back and never an error.

pub mod emotion;
mod heuristic;
mod response;
mod sanitize;
mod stats;

use async_trait::async_trait;
use color_eyre::Result;
use tracing::{debug, error, info, warn};

pub use emotion::{resolve_model_label, ModelEmotion, Tone, UnknownEmotion};
pub use heuristic::mock_classify;
pub use response::{extract_structured_response, parse_reply, strip_fences};
pub use sanitize::soften;
pub use stats::{aggregate, DailySummaryStats};

/// Summary, mood and comment for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub summary: String,
    pub tone: Tone,
    pub observation: String,
}

/// A remote text-generation backend.
#[async_trait]
pub trait ToneModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    RemoteAvailable,
    LocalOnly,
}

pub struct ToneClassifier {
    model: Option<Box<dyn ToneModel>>,
    mode: Mode,
}

impl ToneClassifier {
    pub fn new(model: Box<dyn ToneModel>) -> Self {
        ToneClassifier {
            model: Some(model),
            mode: Mode::RemoteAvailable,
        }
    }

    /// A classifier that never calls out, e.g. when no API key is configured.
    pub fn local_only() -> Self {
        ToneClassifier {
            model: None,
            mode: Mode::LocalOnly,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub async fn classify(&mut self, text: &str) -> Analysis {
        if let (Mode::RemoteAvailable, Some(model)) = (self.mode, self.model.as_deref()) {
            match classify_remote(model, text).await {
                Ok(analysis) => return analysis,
                Err(e) => {
                    error!("Error in AI analysis: {:#}", e);
                    warn!("Switching to local heuristics for the rest of this session");
                    self.mode = Mode::LocalOnly;
                }
            }
        }

        mock_classify(text)
    }
}

async fn classify_remote(model: &dyn ToneModel, text: &str) -> Result<Analysis> {
    let softened = soften(text);
    debug!(chars = softened.len(), "Sending entry to model");

    let reply = model.generate(&build_prompt(&softened)).await?;
    info!("Received reply from model");

    parse_reply(&reply)
}

pub fn build_prompt(entry: &str) -> String {
    format!(
        "You are an AI diary analyst and the writer's best friend. The writer's name is Writer; \
respond in a friendly tone, as if talking to them. For the given diary entry, please provide:
1. An objective analysis focusing on the writer's daily experiences and emotional journey (2-3 sentences)
2. The primary emotional state expressed (options: {})
3. A constructive observation about the writer's experiences (1 sentence)
Format the response as JSON with keys: 'analysis', 'emotion', 'observation'

Diary entry: {}",
        ModelEmotion::prompt_options(),
        entry
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    struct Scripted {
        reply: Result<String, String>,
        calls: Arc<AtomicUsize>,
        last_prompt: Arc<Mutex<String>>,
    }

    #[async_trait]
    impl ToneModel for Scripted {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            self.reply.clone().map_err(|e| eyre!(e))
        }
    }

    fn scripted(reply: Result<&str, &str>) -> (ToneClassifier, Arc<AtomicUsize>, Arc<Mutex<String>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_prompt = Arc::new(Mutex::new(String::new()));
        let model = Scripted {
            reply: reply.map(str::to_string).map_err(str::to_string),
            calls: calls.clone(),
            last_prompt: last_prompt.clone(),
        };
        (ToneClassifier::new(Box::new(model)), calls, last_prompt)
    }

    #[tokio::test]
    async fn remote_reply_is_mapped() {
        let (mut classifier, calls, prompt) = scripted(Ok(
            r#"{"analysis": "Busy but good.", "emotion": "joyful", "observation": "Nice."}"#,
        ));
        let analysis = classifier.classify("I love weekends").await;

        assert_eq!(analysis.tone, Tone::Fun);
        assert_eq!(analysis.summary, "Busy but good.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(classifier.mode(), Mode::RemoteAvailable);

        let prompt = prompt.lock().unwrap().clone();
        assert!(prompt.ends_with("Diary entry: I appreciate weekends"));
        assert!(prompt.contains("appreciative, joyful, content, reflective, concerned, downhearted"));
    }

    #[tokio::test]
    async fn failure_switches_to_local_for_good() {
        let (mut classifier, calls, _) = scripted(Err("401 unauthorized"));

        let first = classifier.classify("A difficult day").await;
        assert_eq!(first.tone, Tone::Tough);
        assert_eq!(classifier.mode(), Mode::LocalOnly);

        let second = classifier.classify("Looking forward to the trip").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.tone, Tone::Excited);
        assert!(!second.summary.is_empty());
        assert!(!second.observation.is_empty());
    }

    #[tokio::test]
    async fn reply_missing_a_key_switches_to_local() {
        let (mut classifier, calls, _) = scripted(Ok(r#"{"analysis":"x","emotion":"joyful"}"#));

        let analysis = classifier.classify("a normal day").await;
        assert_eq!(classifier.mode(), Mode::LocalOnly);
        assert_eq!(analysis, mock_classify("a normal day"));

        classifier.classify("another normal day").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn local_only_never_calls_out() {
        let mut classifier = ToneClassifier::local_only();
        let analysis = classifier.classify("a normal day").await;
        assert_eq!(analysis.tone, Tone::Neutral);
        assert_eq!(classifier.mode(), Mode::LocalOnly);
    }
}
