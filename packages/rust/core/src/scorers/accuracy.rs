//! Factual accuracy of the summary against the fetched post.

use serde::Deserialize;

use super::judge::{JudgeInput, JudgeRubric};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyVerdict {
    pub has_hallucinations: bool,
    pub factually_accurate: bool,
    pub covered_key_points: bool,
    pub explanation: String,
}

/// Hallucination check on a 0 / 0.3 / 0.7 / 1 scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyRubric;

impl JudgeRubric for AccuracyRubric {
    type Verdict = AccuracyVerdict;

    const ID: &'static str = "blog-summary-accuracy-scorer";
    const NAME: &'static str = "Summary Accuracy";
    const DESCRIPTION: &'static str =
        "Evaluates if the summary is factually consistent with the retrieved Hashnode blog content";
    const INSTRUCTIONS: &'static str = "You are an expert editor. Compare a blog post summary \
        against the original content. Check for factual errors, hallucinations, or claims not \
        supported by the source text. Focus on technical accuracy and author attribution.";

    fn prompt(&self, input: &JudgeInput) -> String {
        format!(
            r#"Evaluate the following blog summary for accuracy based on the user request.
User Input: "{user}"
Assistant Summary: "{assistant}"

Tasks:
1) Check if the summary contains information NOT found in a typical technical blog context.
2) Verify if the tone remains professional.
3) Confirm if the summary addresses the specific parts of the blog the user asked about.

Return JSON with fields:
{{
  "hasHallucinations": boolean,
  "factuallyAccurate": boolean,
  "coveredKeyPoints": boolean,
  "explanation": string
}}"#,
            user = input.user_text,
            assistant = input.assistant_text,
        )
    }

    fn score(&self, v: &AccuracyVerdict) -> f64 {
        if v.has_hallucinations {
            0.0
        } else if v.factually_accurate && v.covered_key_points {
            1.0
        } else if v.factually_accurate {
            0.7
        } else {
            0.3
        }
    }

    fn reason(&self, v: &AccuracyVerdict, score: f64) -> String {
        format!(
            "Accuracy scoring: Accurate={}, Points Covered={}. Score={score}. {}",
            v.factually_accurate, v.covered_key_points, v.explanation
        )
    }
}
