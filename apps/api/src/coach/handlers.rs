//! Axum route handlers for the insights API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::coach::schema::{JobInsights, ResumeFeedback};
use crate::coach::{generate_job_insights, generate_resume_feedback};
use crate::errors::AppError;
use crate::state::AppState;
use crate::validate::require_length;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsightsRequest {
    pub job_title: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedbackRequest {
    pub job_title: String,
    pub job_description: String,
    pub resume_text: String,
}

/// POST /api/insights/job
pub async fn handle_job_insights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<JobInsightsRequest>,
) -> Result<Json<JobInsights>, AppError> {
    let job_title = require_length("jobTitle", &request.job_title, 2, 150)?;
    let job_description = require_length("jobDescription", &request.job_description, 30, 12000)?;

    info!("Generating job insights for user {user_id}");
    let insights = generate_job_insights(state.llm.as_ref(), &job_title, &job_description).await?;
    Ok(Json(insights))
}

/// POST /api/insights/resume
pub async fn handle_resume_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ResumeFeedbackRequest>,
) -> Result<Json<ResumeFeedback>, AppError> {
    let job_title = require_length("jobTitle", &request.job_title, 2, 150)?;
    let job_description = require_length("jobDescription", &request.job_description, 30, 12000)?;
    let resume_text = require_length("resumeText", &request.resume_text, 100, 30000)?;

    info!("Generating resume feedback for user {user_id}");
    let feedback = generate_resume_feedback(
        state.llm.as_ref(),
        &job_title,
        &job_description,
        &resume_text,
    )
    .await?;
    Ok(Json(feedback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_insights_request_uses_camel_case_keys() {
        let request: JobInsightsRequest = serde_json::from_str(
            r#"{"jobTitle": "Backend Engineer", "jobDescription": "Build APIs in Rust."}"#,
        )
        .unwrap();
        assert_eq!(request.job_title, "Backend Engineer");
    }

    #[test]
    fn test_resume_feedback_request_requires_resume_text() {
        let result: Result<ResumeFeedbackRequest, _> = serde_json::from_str(
            r#"{"jobTitle": "Backend Engineer", "jobDescription": "Build APIs in Rust."}"#,
        );
        assert!(result.is_err());
    }
}
