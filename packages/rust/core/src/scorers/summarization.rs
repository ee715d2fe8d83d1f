//! Whether the summary captures the post's thesis and technical value.

use serde::Deserialize;

use super::judge::{JudgeInput, JudgeRubric, check_unit};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizationVerdict {
    pub captured_core_thesis: bool,
    pub technical_depth_adequate: bool,
    /// Alignment with the user's request, in `[0, 1]`.
    pub alignment_score: f64,
    pub explanation: String,
}

/// Weighted 0.4 thesis + 0.3 depth + 0.3 alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizationRubric;

const THESIS_WEIGHT: f64 = 0.4;
const DEPTH_WEIGHT: f64 = 0.3;
const ALIGNMENT_WEIGHT: f64 = 0.3;

impl JudgeRubric for SummarizationRubric {
    type Verdict = SummarizationVerdict;

    const ID: &'static str = "blog-summarization-quality-scorer";
    const NAME: &'static str = "Summarization Quality";
    const DESCRIPTION: &'static str =
        "Evaluates if the summary captures the main thesis and technical value of the post.";
    const INSTRUCTIONS: &'static str = "You are a technical content strategist. Your goal is to \
        determine if a summary captures the \"Core Thesis\" and \"Key Technical Takeaways\" of an \
        article. A good summary explains the \"Why\" and \"How\" of the topic, not just the \"What\".";

    fn prompt(&self, input: &JudgeInput) -> String {
        format!(
            r#"Evaluate the following blog summary for content quality.
User Input: "{user}"
Assistant Summary: "{assistant}"

Tasks:
1) Does the summary identify the main problem the blog post is solving?
2) Is the technical depth appropriate for a summary?
3) Rate how well the summary aligns with the user's request on a scale of 0 to 1.

Return JSON with fields:
{{
  "capturedCoreThesis": boolean,
  "technicalDepthAdequate": boolean,
  "alignmentScore": number,
  "explanation": string
}}"#,
            user = input.user_text,
            assistant = input.assistant_text,
        )
    }

    fn validate(&self, v: &SummarizationVerdict) -> Result<(), String> {
        check_unit("alignmentScore", v.alignment_score)
    }

    fn score(&self, v: &SummarizationVerdict) -> f64 {
        let thesis = if v.captured_core_thesis { THESIS_WEIGHT } else { 0.0 };
        let depth = if v.technical_depth_adequate { DEPTH_WEIGHT } else { 0.0 };
        thesis + depth + v.alignment_score * ALIGNMENT_WEIGHT
    }

    fn reason(&self, v: &SummarizationVerdict, score: f64) -> String {
        format!(
            "Summarization scoring: Thesis={}, Depth={}. Score={score}. {}",
            v.captured_core_thesis, v.technical_depth_adequate, v.explanation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(thesis: bool, depth: bool, alignment: f64) -> SummarizationVerdict {
        SummarizationVerdict {
            captured_core_thesis: thesis,
            technical_depth_adequate: depth,
            alignment_score: alignment,
            explanation: "reviewed".into(),
        }
    }

    #[test]
    fn full_marks() {
        let score = SummarizationRubric.score(&verdict(true, true, 1.0));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn thesis_and_half_alignment() {
        let score = SummarizationRubric.score(&verdict(true, false, 0.5));
        assert!((score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn nothing_captured() {
        assert_eq!(SummarizationRubric.score(&verdict(false, false, 0.0)), 0.0);
    }

    #[test]
    fn alignment_out_of_range_is_rejected() {
        assert!(SummarizationRubric.validate(&verdict(true, true, 1.5)).is_err());
        assert!(SummarizationRubric.validate(&verdict(true, true, -0.1)).is_err());
        assert!(SummarizationRubric.validate(&verdict(true, true, 0.8)).is_ok());
    }

    #[test]
    fn reason_format() {
        let v = verdict(true, false, 0.0);
        assert_eq!(
            SummarizationRubric.reason(&v, 0.4),
            "Summarization scoring: Thesis=true, Depth=false. Score=0.4. reviewed"
        );
    }
}
