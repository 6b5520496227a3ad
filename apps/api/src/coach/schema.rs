//! Artifact schemas — the declared shapes model output must conform to.
//!
//! Validation is structural: serde enforces field presence and types (unknown
//! extra fields are tolerated and dropped), then explicit checks enforce the
//! documented array length bounds. Violations carry the offending path and
//! the expectation so they can be logged for diagnosis.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coach::GenerationError;

/// Structured interview-preparation insights for one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsights {
    pub role_summary: String,
    pub required_skills: Vec<String>,
    pub interview_topics: Vec<String>,
    pub coding_focus_areas: Vec<String>,
    pub suggested_practice_questions: Vec<String>,
    #[serde(rename = "days30_60_90")]
    pub ramp_plan: RampPlan,
}

/// 30/60/90-day preparation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RampPlan {
    pub first30_days: Vec<String>,
    pub days31_to60: Vec<String>,
    pub days61_to90: Vec<String>,
}

/// Structured resume feedback against one target role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedback {
    pub overall_assessment: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub rewrite_suggestions: Vec<String>,
    pub ats_tips: Vec<String>,
}

/// Validates an extracted JSON value against the JobInsights shape.
pub fn parse_job_insights(value: Value) -> Result<JobInsights, GenerationError> {
    let insights: JobInsights = deserialize(value)?;

    check_bounds("requiredSkills", insights.required_skills.len(), 3, 12)?;
    check_bounds("interviewTopics", insights.interview_topics.len(), 3, 12)?;
    check_bounds("codingFocusAreas", insights.coding_focus_areas.len(), 3, 12)?;
    check_bounds(
        "suggestedPracticeQuestions",
        insights.suggested_practice_questions.len(),
        3,
        10,
    )?;
    check_bounds(
        "days30_60_90.first30Days",
        insights.ramp_plan.first30_days.len(),
        2,
        8,
    )?;
    check_bounds(
        "days30_60_90.days31To60",
        insights.ramp_plan.days31_to60.len(),
        2,
        8,
    )?;
    check_bounds(
        "days30_60_90.days61To90",
        insights.ramp_plan.days61_to90.len(),
        2,
        8,
    )?;

    Ok(insights)
}

/// Validates an extracted JSON value against the ResumeFeedback shape.
pub fn parse_resume_feedback(value: Value) -> Result<ResumeFeedback, GenerationError> {
    let feedback: ResumeFeedback = deserialize(value)?;

    check_bounds("strengths", feedback.strengths.len(), 2, 10)?;
    check_bounds("gaps", feedback.gaps.len(), 2, 10)?;
    check_bounds("rewriteSuggestions", feedback.rewrite_suggestions.len(), 2, 12)?;
    check_bounds("atsTips", feedback.ats_tips.len(), 2, 8)?;

    Ok(feedback)
}

fn deserialize<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, GenerationError> {
    serde_json::from_value(value).map_err(|e| GenerationError::Schema {
        path: "$".to_string(),
        expected: e.to_string(),
    })
}

fn check_bounds(path: &str, len: usize, min: usize, max: usize) -> Result<(), GenerationError> {
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(GenerationError::Schema {
            path: path.to_string(),
            expected: format!("{min}..={max} items, got {len}"),
        })
    }
}
