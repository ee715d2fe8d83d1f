//! Brevity and information density of the summary.

use serde::Deserialize;

use super::judge::{JudgeInput, JudgeRubric, check_unit};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcisenessVerdict {
    pub contains_filler: bool,
    pub is_repetitive: bool,
    /// Information per word, in `[0, 1]`.
    pub efficiency_score: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConcisenessRubric;

const REPETITION_PENALTY: f64 = 0.3;
const FILLER_PENALTY: f64 = 0.2;

impl JudgeRubric for ConcisenessRubric {
    type Verdict = ConcisenessVerdict;

    const ID: &'static str = "blog-conciseness-scorer";
    const NAME: &'static str = "Conciseness";
    const DESCRIPTION: &'static str = "Evaluates the brevity and information density of the summary.";
    const INSTRUCTIONS: &'static str = "You are a minimalist editor. You value information density. \
        Check if the summary uses unnecessary filler words, repetitive phrasing, or provides \
        excessive detail that belongs in the full article rather than a summary.";

    // Only the summary is judged.
    fn prompt(&self, input: &JudgeInput) -> String {
        format!(
            r#"Analyze the following summary for conciseness.
Assistant Summary: "{assistant}"

Tasks:
1) Look for "filler" phrases (e.g., "It is important to note that", "In the realm of").
2) Check if the same point is made more than once.
3) Rate the efficiency (information per word) from 0 to 1.

Return JSON with fields:
{{
  "containsFiller": boolean,
  "isRepetitive": boolean,
  "efficiencyScore": number,
  "explanation": string
}}"#,
            assistant = input.assistant_text,
        )
    }

    fn validate(&self, v: &ConcisenessVerdict) -> Result<(), String> {
        check_unit("efficiencyScore", v.efficiency_score)
    }

    fn score(&self, v: &ConcisenessVerdict) -> f64 {
        let mut score = v.efficiency_score;
        if v.is_repetitive {
            score -= REPETITION_PENALTY;
        }
        if v.contains_filler {
            score -= FILLER_PENALTY;
        }
        score.max(0.0)
    }

    fn reason(&self, v: &ConcisenessVerdict, score: f64) -> String {
        format!(
            "Conciseness scoring: Filler={}, Repetitive={}. Score={score}. {}",
            v.contains_filler, v.is_repetitive, v.explanation
        )
    }
}
