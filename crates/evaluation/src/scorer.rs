//! Answer scoring.
//!
//! [`AnswerScorer`] is the seam between the pipeline and whatever produces
//! per-answer scores. [`LexicalScorer`] is the built-in deterministic
//! heuristic; [`RemoteScorer`] delegates to an external scoring service
//! over HTTP. Scorers must be deterministic for identical input, since
//! users re-run evaluations and compare results across attempts.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::EvaluationError;

/// HTTP request timeout for a single remote scoring call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Answer length (in words) at which the substance component maxes out.
const SUBSTANCE_TARGET_WORDS: usize = 40;

/// Points awarded for answer substance at the target length.
const SUBSTANCE_MAX_POINTS: f64 = 40.0;

/// Points awarded for full keyword overlap with the question.
const OVERLAP_MAX_POINTS: f64 = 60.0;

/// Scores a single answer against its question, 0 to 100.
#[async_trait]
pub trait AnswerScorer: Send + Sync {
    async fn score(&self, question: &str, answer: &str) -> Result<u8, EvaluationError>;
}

// ---------------------------------------------------------------------------
// LexicalScorer
// ---------------------------------------------------------------------------

/// Deterministic offline scorer.
///
/// Combines two signals: how much the candidate actually said (substance,
/// up to [`SUBSTANCE_MAX_POINTS`]) and how many of the question's
/// keywords the answer touches (overlap, up to [`OVERLAP_MAX_POINTS`]).
/// Used when no remote scoring service is configured, and by tests.
pub struct LexicalScorer;

#[async_trait]
impl AnswerScorer for LexicalScorer {
    async fn score(&self, question: &str, answer: &str) -> Result<u8, EvaluationError> {
        Ok(lexical_score(question, answer))
    }
}

fn lexical_score(question: &str, answer: &str) -> u8 {
    let answer_words: Vec<String> = answer
        .split_whitespace()
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect();
    if answer_words.is_empty() {
        return 0;
    }

    let substance = (answer_words.len() as f64 / SUBSTANCE_TARGET_WORDS as f64).min(1.0);

    // Keywords: question words longer than three characters, deduplicated.
    let keywords: HashSet<String> = question
        .split_whitespace()
        .map(normalize)
        .filter(|w| w.len() > 3)
        .collect();
    let overlap = if keywords.is_empty() {
        0.0
    } else {
        let answer_set: HashSet<&str> = answer_words.iter().map(String::as_str).collect();
        let matched = keywords
            .iter()
            .filter(|k| answer_set.contains(k.as_str()))
            .count();
        matched as f64 / keywords.len() as f64
    };

    (SUBSTANCE_MAX_POINTS * substance + OVERLAP_MAX_POINTS * overlap).round() as u8
}

fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// RemoteScorer
// ---------------------------------------------------------------------------

/// Scores answers via an external scoring service.
///
/// POSTs `{"question": ..., "answer": ...}` and expects
/// `{"score": 0-100}` back. Network failures, timeouts, and non-2xx
/// responses all surface as [`EvaluationError::ScorerUnavailable`]; the
/// pipeline never hangs past [`REQUEST_TIMEOUT`] per answer.
pub struct RemoteScorer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

/// Response body returned by the scoring service.
#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: u8,
}

impl RemoteScorer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl AnswerScorer for RemoteScorer {
    async fn score(&self, question: &str, answer: &str) -> Result<u8, EvaluationError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "question": question, "answer": answer }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EvaluationError::ScorerUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(EvaluationError::ScorerUnavailable(format!(
                "scoring service returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| EvaluationError::ScorerUnavailable(e.to_string()))?;
        Ok(body.score.min(100))
    }
}
