use prepcall_core::types::SessionId;

/// Error type for evaluation failures.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// The transcript contained no recognizable question/answer exchanges.
    #[error("Transcript has no recognizable exchanges")]
    MalformedTranscript,

    /// The scoring dependency could not produce a score.
    #[error("Scorer unavailable: {0}")]
    ScorerUnavailable(String),

    /// The session to store the result on no longer exists.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Encoding the result for storage failed.
    #[error("Failed to encode evaluation result: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisting the result failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
