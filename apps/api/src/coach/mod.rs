//! Generation orchestration — turns job context plus user input into a chat
//! reply or a schema-validated structured artifact.
//!
//! Flow for structured tasks: prompt → Completer → extract_json → schema parse.
//! All three operations are stateless: context arrives as arguments and a
//! result or typed failure goes back to the caller. Nothing here consults or
//! mutates the conversation store, and nothing retries — every failure kind
//! surfaces once and the caller decides whether to retry.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod schema;

use thiserror::Error;

use crate::coach::extract::extract_json;
use crate::coach::prompts::{
    CHAT_SYSTEM_TEMPLATE, JOB_INSIGHTS_PROMPT_TEMPLATE, JOB_INSIGHTS_SYSTEM,
    RESUME_FEEDBACK_PROMPT_TEMPLATE, RESUME_FEEDBACK_SYSTEM,
};
use crate::coach::schema::{parse_job_insights, parse_resume_feedback, JobInsights, ResumeFeedback};
use crate::llm_client::{ChatMessage, Completer, CompletionRequest, LlmError};

/// Free-form coaching keeps some variety.
const CHAT_TEMPERATURE: f32 = 0.5;
/// Schema-constrained tasks run cold.
const INSIGHTS_TEMPERATURE: f32 = 0.3;
const FEEDBACK_TEMPERATURE: f32 = 0.2;

/// Failure kinds of the generation pipeline. All are retryable by the caller;
/// none are retried here.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model provider unavailable: {0}")]
    Unavailable(String),

    #[error("model returned no usable content")]
    Empty,

    #[error("no JSON object found in model response")]
    Malformed,

    #[error("model output violates the {path} contract: expected {expected}")]
    Schema { path: String, expected: String },
}

impl GenerationError {
    /// Stable code string reported at the HTTP boundary.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Unavailable(_) => "GENERATION_UNAVAILABLE",
            GenerationError::Empty => "EMPTY_GENERATION",
            GenerationError::Malformed => "MALFORMED_GENERATION",
            GenerationError::Schema { .. } => "SCHEMA_VIOLATION",
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => GenerationError::Empty,
            LlmError::Http(e) => GenerationError::Unavailable(e.to_string()),
            LlmError::Api { status, message } => {
                GenerationError::Unavailable(format!("status {status}: {message}"))
            }
        }
    }
}

/// Generates the assistant's next coaching reply for a chat thread.
/// `history` is the full prior message sequence; `content` is the new user turn.
pub async fn reply_to_chat(
    llm: &dyn Completer,
    job_title: &str,
    job_description: &str,
    history: &[ChatMessage],
    content: &str,
) -> Result<String, GenerationError> {
    let system = CHAT_SYSTEM_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{job_description}", job_description);

    let mut messages = history.to_vec();
    messages.push(ChatMessage::new("user", content));

    let reply = llm
        .complete(CompletionRequest {
            system: &system,
            messages: &messages,
            temperature: CHAT_TEMPERATURE,
            json_object: false,
        })
        .await?;

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(reply.to_string())
}

/// Generates structured interview-preparation insights for a job description.
pub async fn generate_job_insights(
    llm: &dyn Completer,
    job_title: &str,
    job_description: &str,
) -> Result<JobInsights, GenerationError> {
    let prompt = JOB_INSIGHTS_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{job_description}", job_description);

    let raw = complete_json(llm, JOB_INSIGHTS_SYSTEM, &prompt, INSIGHTS_TEMPERATURE).await?;
    parse_job_insights(extract_json(&raw)?)
}

/// Generates structured resume feedback against a target role.
pub async fn generate_resume_feedback(
    llm: &dyn Completer,
    job_title: &str,
    job_description: &str,
    resume_text: &str,
) -> Result<ResumeFeedback, GenerationError> {
    let prompt = RESUME_FEEDBACK_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text);

    let raw = complete_json(llm, RESUME_FEEDBACK_SYSTEM, &prompt, FEEDBACK_TEMPERATURE).await?;
    parse_resume_feedback(extract_json(&raw)?)
}

/// One JSON-constrained completion: a single user turn, no history.
async fn complete_json(
    llm: &dyn Completer,
    system: &str,
    prompt: &str,
    temperature: f32,
) -> Result<String, GenerationError> {
    let messages = [ChatMessage::new("user", prompt)];
    Ok(llm
        .complete(CompletionRequest {
            system,
            messages: &messages,
            temperature,
            json_object: true,
        })
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub provider: returns a canned reply and records what it was asked.
    struct StubCompleter {
        reply: Result<String, &'static str>,
        seen: Mutex<Option<SeenRequest>>,
    }

    struct SeenRequest {
        system: String,
        message_count: usize,
        last_message: String,
        temperature: f32,
        json_object: bool,
    }

    impl StubCompleter {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn unavailable() -> Self {
            Self {
                reply: Err("connection refused"),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Completer for StubCompleter {
        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some(SeenRequest {
                system: request.system.to_string(),
                message_count: request.messages.len(),
                last_message: request
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default(),
                temperature: request.temperature,
                json_object: request.json_object,
            });

            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(message) => Err(LlmError::Api {
                    status: 503,
                    message: message.to_string(),
                }),
            }
        }
    }

    fn valid_insights_json() -> String {
        serde_json::json!({
            "roleSummary": "Owns backend services.",
            "requiredSkills": ["Rust", "SQL", "APIs"],
            "interviewTopics": ["design", "testing", "databases"],
            "codingFocusAreas": ["algorithms", "async", "SQL"],
            "suggestedPracticeQuestions": ["q1", "q2", "q3"],
            "days30_60_90": {
                "first30Days": ["a", "b"],
                "days31To60": ["c", "d"],
                "days61To90": ["e", "f"]
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_reply_to_chat_returns_trimmed_reply() {
        let stub = StubCompleter::replying("  Focus on system design.\n");
        let reply = reply_to_chat(&stub, "Backend Engineer", "Build APIs in Rust.", &[], "help")
            .await
            .unwrap();
        assert_eq!(reply, "Focus on system design.");
    }

    #[tokio::test]
    async fn test_reply_to_chat_sends_history_plus_new_turn() {
        let stub = StubCompleter::replying("ok");
        let history = vec![
            ChatMessage::new("user", "What should I prepare?"),
            ChatMessage::new("assistant", "Start with the basics."),
        ];
        reply_to_chat(&stub, "Backend Engineer", "Build APIs.", &history, "And then?")
            .await
            .unwrap();

        let seen = stub.seen.lock().unwrap();
        let seen = seen.as_ref().unwrap();
        assert_eq!(seen.message_count, 3);
        assert_eq!(seen.last_message, "And then?");
        assert!(!seen.json_object);
        assert!(seen.system.contains("Backend Engineer"));
        assert!(seen.system.contains("Build APIs."));
    }

    #[tokio::test]
    async fn test_reply_to_chat_whitespace_reply_is_empty_generation() {
        let stub = StubCompleter::replying("   \n\t");
        let result = reply_to_chat(&stub, "SRE", "Keep the site up and running.", &[], "hi").await;
        assert!(matches!(result, Err(GenerationError::Empty)));
    }

    #[tokio::test]
    async fn test_job_insights_recovers_json_wrapped_in_prose() {
        let wrapped = format!("Here are your insights:\n{}\nGood luck!", valid_insights_json());
        let stub = StubCompleter::replying(&wrapped);

        let insights = generate_job_insights(&stub, "Backend Engineer", "Build APIs in Rust.")
            .await
            .unwrap();
        assert_eq!(insights.required_skills, vec!["Rust", "SQL", "APIs"]);

        let seen = stub.seen.lock().unwrap();
        let seen = seen.as_ref().unwrap();
        assert!(seen.json_object);
        assert!((seen.temperature - INSIGHTS_TEMPERATURE).abs() < f32::EPSILON);
        assert!(seen.last_message.contains("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_job_insights_schema_violation_surfaces() {
        let mut value: serde_json::Value = serde_json::from_str(&valid_insights_json()).unwrap();
        value["requiredSkills"] = serde_json::json!(["Rust"]);
        let stub = StubCompleter::replying(&value.to_string());

        let result = generate_job_insights(&stub, "Backend Engineer", "Build APIs.").await;
        assert!(matches!(
            result,
            Err(GenerationError::Schema { path, .. }) if path == "requiredSkills"
        ));
    }

    #[tokio::test]
    async fn test_job_insights_prose_without_json_is_malformed() {
        let stub = StubCompleter::replying("I cannot produce JSON right now, sorry.");
        let result = generate_job_insights(&stub, "Backend Engineer", "Build APIs.").await;
        assert!(matches!(result, Err(GenerationError::Malformed)));
    }

    #[tokio::test]
    async fn test_resume_feedback_happy_path() {
        let reply = serde_json::json!({
            "overallAssessment": "Solid.",
            "strengths": ["metrics", "scope"],
            "gaps": ["cloud", "leadership"],
            "rewriteSuggestions": ["lead with impact", "trim old roles"],
            "atsTips": ["standard headings", "mirror the title"]
        })
        .to_string();
        let stub = StubCompleter::replying(&reply);

        let feedback = generate_resume_feedback(
            &stub,
            "Backend Engineer",
            "Build APIs in Rust.",
            "Ten years of backend work across three companies.",
        )
        .await
        .unwrap();
        assert_eq!(feedback.gaps.len(), 2);

        let seen = stub.seen.lock().unwrap();
        let seen = seen.as_ref().unwrap();
        assert!(seen.last_message.contains("Ten years of backend work"));
        assert!((seen.temperature - FEEDBACK_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_unavailable() {
        let stub = StubCompleter::unavailable();
        let result = generate_job_insights(&stub, "Backend Engineer", "Build APIs.").await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GenerationError::Unavailable("x".into()).code(),
            "GENERATION_UNAVAILABLE"
        );
        assert_eq!(GenerationError::Empty.code(), "EMPTY_GENERATION");
        assert_eq!(GenerationError::Malformed.code(), "MALFORMED_GENERATION");
        assert_eq!(
            GenerationError::Schema {
                path: "strengths".into(),
                expected: "2..=10 items".into()
            }
            .code(),
            "SCHEMA_VIOLATION"
        );
    }
}
