//! Transcript parsing.
//!
//! Voice transcripts arrive as labelled lines in a handful of formats the
//! provider has used over time:
//!
//! ```text
//! Q: Tell me about yourself.          Q1: Tell me about yourself.
//! A: I am a backend engineer...       A1: I am a backend engineer...
//!
//! Interviewer: Tell me about ...      Agent: Tell me about ...
//! Candidate: I am a backend ...       User: I am a backend ...
//! ```
//!
//! A line without a recognized label continues the preceding block, so
//! multi-line answers survive. Questions the candidate never answered are
//! kept with an empty answer and score zero downstream.

use serde::Serialize;

/// Speaker labels treated as the interviewer side.
const QUESTION_LABELS: &[&str] = &["interviewer", "agent"];

/// Speaker labels treated as the candidate side.
const ANSWER_LABELS: &[&str] = &["candidate", "user"];

/// One question/answer exchange extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Question,
    Answer,
}

/// Split a transcript into ordered question/answer exchanges.
///
/// Returns an empty vec when no line carries a recognizable label, which
/// callers treat as a malformed transcript.
pub fn parse_transcript(transcript: &str) -> Vec<Exchange> {
    let mut exchanges: Vec<Exchange> = Vec::new();
    let mut question: Option<String> = None;
    let mut answer: Option<String> = None;

    for raw_line in transcript.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        match classify_line(line) {
            Some((Role::Question, text)) => {
                if let Some(q) = question.take() {
                    exchanges.push(finish(q, answer.take()));
                }
                answer = None;
                question = Some(text.to_string());
            }
            Some((Role::Answer, text)) => {
                // An answer with no question to attach to is dropped.
                if question.is_some() {
                    append(&mut answer, text);
                }
            }
            None => {
                // Continuation of whichever block is open.
                if answer.is_some() {
                    append(&mut answer, line);
                } else if question.is_some() {
                    append(&mut question, line);
                }
            }
        }
    }
    if let Some(q) = question.take() {
        exchanges.push(finish(q, answer.take()));
    }
    exchanges
}

fn finish(question: String, answer: Option<String>) -> Exchange {
    Exchange {
        question: question.trim().to_string(),
        answer: answer.unwrap_or_default().trim().to_string(),
    }
}

fn append(block: &mut Option<String>, text: &str) {
    match block {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(text);
        }
        None => *block = Some(text.to_string()),
    }
}

/// Recognize a speaker label at the start of a line.
///
/// Accepts `Q:`/`A:` with an optional index (`Q1:`, `A12:`) and the
/// speaker-name labels, all case-insensitive.
fn classify_line(line: &str) -> Option<(Role, &str)> {
    let (label, rest) = line.split_once(':')?;
    let label = label.trim();
    let rest = rest.trim();

    let mut chars = label.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c.is_ascii_digit()) {
            match first {
                'q' | 'Q' => return Some((Role::Question, rest)),
                'a' | 'A' => return Some((Role::Answer, rest)),
                _ => {}
            }
        }
    }

    let lower = label.to_ascii_lowercase();
    if QUESTION_LABELS.contains(&lower.as_str()) {
        return Some((Role::Question, rest));
    }
    if ANSWER_LABELS.contains(&lower.as_str()) {
        return Some((Role::Answer, rest));
    }
    None
}
