//! Transcript evaluation.
//!
//! Evaluation runs in two phases: [`parse_transcript`] turns the raw
//! transcript into question/answer exchanges, then an [`AnswerScorer`]
//! grades each answer and the per-answer grades fold into an
//! [`EvaluationResult`]. The result is written to the session row
//! before it is returned to the caller, so a stored analysis always
//! matches what the caller saw.

use std::sync::Arc;

use prepcall_core::types::SessionId;
use prepcall_db::repositories::SessionRepo;
use prepcall_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::scorer::AnswerScorer;
use crate::transcript::{parse_transcript, Exchange};

/// Scores at or above this mark classify as [`Classification::Perfect`].
const PERFECT_THRESHOLD: u8 = 75;
/// Scores at or above this mark classify as [`Classification::Moderate`].
const MODERATE_THRESHOLD: u8 = 40;

/// Quality band for a single scored answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Perfect,
    Moderate,
    Wrong,
}

impl Classification {
    pub fn from_score(score: u8) -> Self {
        if score >= PERFECT_THRESHOLD {
            Classification::Perfect
        } else if score >= MODERATE_THRESHOLD {
            Classification::Moderate
        } else {
            Classification::Wrong
        }
    }
}

/// One scored question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub question: String,
    pub answer: String,
    pub score: u8,
    pub classification: Classification,
}

/// Aggregate outcome persisted to `interview_sessions.analysis`.
///
/// Carries no timestamps: evaluating the same transcript with a
/// deterministic scorer yields byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question_count: usize,
    pub perfect_count: usize,
    pub moderate_count: usize,
    pub wrong_count: usize,
    /// Rounded mean of the per-answer scores.
    pub average_score: u8,
    pub answers: Vec<AnswerEvaluation>,
}

/// Scores transcripts and stores the aggregate on the session row.
pub struct EvaluationPipeline {
    pool: DbPool,
    scorer: Arc<dyn AnswerScorer>,
}

impl EvaluationPipeline {
    pub fn new(pool: DbPool, scorer: Arc<dyn AnswerScorer>) -> Self {
        Self { pool, scorer }
    }

    /// Evaluate `transcript` and persist the result on `session_id`.
    ///
    /// Fails with [`EvaluationError::MalformedTranscript`] when no
    /// question can be extracted, and with
    /// [`EvaluationError::SessionNotFound`] when the session row is
    /// gone; in both cases nothing is written.
    pub async fn evaluate(
        &self,
        session_id: SessionId,
        transcript: &str,
    ) -> Result<EvaluationResult, EvaluationError> {
        let exchanges = parse_transcript(transcript);
        if exchanges.is_empty() {
            return Err(EvaluationError::MalformedTranscript);
        }

        let mut answers = Vec::with_capacity(exchanges.len());
        for Exchange { question, answer } in exchanges {
            let score = self.scorer.score(&question, &answer).await?;
            answers.push(AnswerEvaluation {
                score,
                classification: Classification::from_score(score),
                question,
                answer,
            });
        }

        let result = aggregate(answers);
        let analysis = serde_json::to_value(&result)?;
        SessionRepo::set_analysis(&self.pool, session_id, &analysis)
            .await?
            .ok_or(EvaluationError::SessionNotFound(session_id))?;

        tracing::info!(
            %session_id,
            questions = result.question_count,
            average_score = result.average_score,
            "evaluation stored"
        );

        Ok(result)
    }
}

/// Fold per-answer evaluations into the aggregate result.
fn aggregate(answers: Vec<AnswerEvaluation>) -> EvaluationResult {
    let mut perfect_count = 0;
    let mut moderate_count = 0;
    let mut wrong_count = 0;
    let mut total: u32 = 0;

    for answer in &answers {
        total += u32::from(answer.score);
        match answer.classification {
            Classification::Perfect => perfect_count += 1,
            Classification::Moderate => moderate_count += 1,
            Classification::Wrong => wrong_count += 1,
        }
    }

    let average_score = if answers.is_empty() {
        0
    } else {
        (f64::from(total) / answers.len() as f64).round() as u8
    };

    EvaluationResult {
        question_count: answers.len(),
        perfect_count,
        moderate_count,
        wrong_count,
        average_score,
        answers,
    }
}
