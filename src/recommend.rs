//! Scent recommendations from a text-generation service.
//!
//! Callers never see a failure: an empty answer and an error each map to a
//! fixed line of copy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeminiConfig;

pub const EMPTY_FALLBACK: &str = "Our candles are crafted to match every mood. Try our Floral collection for a gentle reset.";
pub const ERROR_FALLBACK: &str = "The stars are aligning for a cozy night. We recommend our signature Sandalwood blend.";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Recommendation service is not configured")]
    NotConfigured,

    #[error("Mood and preference are both required")]
    MissingInput,

    #[error("A recommendation is already in flight")]
    Busy,
}

#[async_trait]
pub trait Recommender: Send + Sync {
    /// Raw model text; `None` when the service answered with nothing.
    async fn recommend(&self, mood: &str, preferences: &str) -> Result<Option<String>, RecommendError>;
}

pub fn prompt(mood: &str, preferences: &str) -> String {
    format!(
        "You are a world-class perfumer and scent specialist for an aesthetic candle brand called \"Lumière & Co.\". \
         A customer is feeling \"{mood}\" and usually likes \"{preferences}\". \
         Recommend which of our types (Floral, Woody, Fresh, or Gourmand) would suit them best and describe a \"vibe\" for their ideal candle. \
         Keep it poetic, aesthetic, and brief (max 3 sentences)."
    )
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiRecommender {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl GeminiRecommender {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, RecommendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, api_key: config.api_key.clone(), model: config.model.clone() })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> { contents: [Content<'a>; 1] }

#[derive(Serialize)]
struct Content<'a> { parts: [Part<'a>; 1] }

#[derive(Serialize)]
struct Part<'a> { text: &'a str }

#[derive(Deserialize, Default)]
struct GenerateResponse { #[serde(default)] candidates: Vec<Candidate> }

#[derive(Deserialize, Default)]
struct Candidate { #[serde(default)] content: CandidateContent }

#[derive(Deserialize, Default)]
struct CandidateContent { #[serde(default)] parts: Vec<CandidatePart> }

#[derive(Deserialize, Default)]
struct CandidatePart { #[serde(default)] text: Option<String> }

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self.candidates.into_iter().next()?
            .content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend(&self, mood: &str, preferences: &str) -> Result<Option<String>, RecommendError> {
        let url = format!("{BASE_URL}/{}:generateContent", self.model);
        let prompt = prompt(mood, preferences);
        let body = GenerateRequest { contents: [Content { parts: [Part { text: &prompt }] }] };

        let response = self.client.post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecommendError::Api { status: status.as_u16(), message });
        }
        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRecommender;

#[async_trait]
impl Recommender for OfflineRecommender {
    async fn recommend(&self, _mood: &str, _preferences: &str) -> Result<Option<String>, RecommendError> {
        Err(RecommendError::NotConfigured)
    }
}

/// Admits one request at a time.
#[derive(Clone)]
pub struct RecommendationDesk {
    recommender: Arc<dyn Recommender>,
    in_flight: Arc<AtomicBool>,
}

/// Held for the life of a request; releases the desk on drop.
pub struct InFlight {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) { self.flag.store(false, Ordering::Release); }
}

impl RecommendationDesk {
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self { recommender, in_flight: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_loading(&self) -> bool { self.in_flight.load(Ordering::Acquire) }

    /// Claims the desk for a request with both inputs present.
    pub fn begin(&self, mood: &str, preferences: &str) -> Result<InFlight, RecommendError> {
        if mood.is_empty() || preferences.is_empty() { return Err(RecommendError::MissingInput); }
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RecommendError::Busy)?;
        Ok(InFlight { flag: Arc::clone(&self.in_flight) })
    }

    /// Runs the request, substituting the fallback copy. Callers hold an [`InFlight`] meanwhile.
    pub async fn fetch(&self, mood: &str, preferences: &str) -> String {
        match self.recommender.recommend(mood, preferences).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation failed, using fallback copy");
                ERROR_FALLBACK.to_string()
            }
        }
    }
}
